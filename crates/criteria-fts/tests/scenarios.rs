//! Compilation scenarios against the full FTS operation set.

use std::sync::Arc;

use criteria::{
    from_json, CompileError, Compiler, Condition, Operation, OperationRegistry, QueryBoost,
    RenderContext, Result, Rule, SearchNode, Signature, ValueType,
};
use criteria_fts::{register_operations, NamespaceResolver, PrefixResolver, TraversalTemplate};

// ============================================================================
// Test helpers
// ============================================================================

fn resolver() -> Arc<dyn NamespaceResolver> {
    Arc::new(
        PrefixResolver::new()
            .with_default_prefix("cm")
            .with_prefix("sys")
            .with_field("assignee", "app:assignee"),
    )
}

fn compiler() -> Compiler {
    Compiler::new(Arc::new(criteria_fts::registry(resolver()).unwrap()))
}

/// Accepts any prefix and passes bare names through.
fn permissive_compiler() -> Compiler {
    Compiler::new(Arc::new(
        criteria_fts::registry(Arc::new(PrefixResolver::new())).unwrap(),
    ))
}

fn equals(id: &str, field: &str, value: &str) -> Rule {
    Rule::new(id, field, ValueType::String, "equals").value(value)
}

fn active_people() -> SearchNode {
    Condition::and("people")
        .child(equals("p1", "status", "ACTIVE"))
        .child(Rule::new("p2", "age", ValueType::Numeric, "greater_or_equal").value("18"))
        .into()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn boolean_is_not_asserts_inverse_literal() {
    let rule = Rule::new("r1", "active", ValueType::Boolean, "is_not").value("true");
    assert_eq!(compiler().compile(&rule.into()).unwrap(), "cm:active:false");
}

#[test]
fn and_of_two_equalities() {
    let tree = Condition::and("root")
        .child(equals("r1", "status", "ACTIVE"))
        .child(equals("r2", "priority", "HIGH"));
    assert_eq!(
        compiler().compile(&tree.into()).unwrap(),
        r#"(cm:status:"ACTIVE" AND cm:priority:"HIGH")"#
    );
}

#[test]
fn empty_condition_is_an_empty_group() {
    assert_eq!(compiler().compile(&Condition::and("root").into()).unwrap(), "()");
}

#[test]
fn not_set_to_query_wraps_verbatim_nested_compilation() {
    let compiler = compiler();
    let nested = active_people();
    let rule = Rule::new("r1", "assignee", ValueType::Uri, "not_set_to_query").query(nested.clone());

    let out = compiler.compile(&rule.into()).unwrap();
    let inner = compiler.compile(&nested).unwrap();
    assert_eq!(inner, r#"(cm:status:"ACTIVE" AND cm:age:[18 TO MAX])"#);
    assert_eq!(out, format!("-(app:assignee:{{{inner}}})"));
}

#[test]
fn negation_is_the_excluded_positive_form() {
    let compiler = compiler();
    let nested = active_people();
    let positive = compiler
        .compile(&Rule::new("r", "assignee", ValueType::Uri, "set_to_query").query(nested.clone()).into())
        .unwrap();
    let negative = compiler
        .compile(&Rule::new("r", "assignee", ValueType::Uri, "not_set_to_query").query(nested.clone()).into())
        .unwrap();

    // Excluding a group around the positive form must give the same text.
    let manual = Condition::and("wrap")
        .boost(QueryBoost::Exclude)
        .child(Rule::new("r", "assignee", ValueType::Uri, "set_to_query").query(nested));
    let manual = compiler.compile(&manual.into()).unwrap();

    assert_eq!(negative, format!("-({positive})"));
    assert_eq!(negative, manual);
}

#[test]
fn inner_negation_is_not_conflated_with_outer() {
    let nested = Condition::and("n")
        .boost(QueryBoost::Exclude)
        .child(equals("n1", "status", "CLOSED"));
    let rule = Rule::new("r", "assignee", ValueType::Uri, "not_set_to_query").query(nested);

    let out = compiler().compile(&rule.into()).unwrap();
    assert_eq!(out, r#"-(app:assignee:{-(cm:status:"CLOSED")})"#);
}

#[test]
fn exclusion_marker_binds_to_second_child_group() {
    let tree = Condition::and("outer")
        .child(equals("r1", "type", "TICKET"))
        .child(
            Condition::and("closed")
                .boost(QueryBoost::Exclude)
                .child(equals("r2", "status", "CLOSED")),
        );
    assert_eq!(
        compiler().compile(&tree.into()).unwrap(),
        r#"(cm:type:"TICKET" AND -(cm:status:"CLOSED"))"#
    );
}

#[test]
fn unknown_operator_names_the_rule() {
    let rule = Rule::new("r1", "title", ValueType::String, "sounds_like").value("x");
    let err = compiler().compile(&rule.into()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "no operation 'sounds_like' registered for string values (field 'title')"
    );
}

#[test]
fn boolean_has_no_range_operations() {
    let rule = Rule::new("r1", "active", ValueType::Boolean, "greater_than").value("true");
    assert!(matches!(
        compiler().compile(&rule.into()),
        Err(CompileError::UnknownOperator { .. })
    ));
}

#[test]
fn unresolvable_field_is_malformed() {
    let rule = equals("r1", "ext:title", "x");
    assert!(matches!(
        compiler().compile(&rule.into()),
        Err(CompileError::MalformedRule { .. })
    ));
}

#[test]
fn set_to_query_requires_embedded_tree() {
    let rule = Rule::new("r1", "assignee", ValueType::Uri, "set_to_query").value("bob");
    assert!(matches!(
        compiler().compile(&rule.into()),
        Err(CompileError::MalformedRule { .. })
    ));
}

#[test]
fn field_names_cannot_break_out_of_their_group() {
    let compiler = permissive_compiler();
    let tree = Condition::and("root")
        .child(equals("r1", "owner", "me"))
        .child(equals("r2", "x) OR (y", "v"));

    let err = compiler.compile(&tree.into()).unwrap_err();
    assert!(matches!(
        err,
        CompileError::MalformedRule { ref field, .. } if field == "x) OR (y"
    ));
}

#[test]
fn field_names_cannot_smuggle_junctions_through_presence() {
    let rule = Rule::new("r1", "due OR x", ValueType::Date, "is_set");
    assert!(matches!(
        permissive_compiler().compile(&rule.into()),
        Err(CompileError::MalformedRule { .. })
    ));
}

#[test]
fn empty_embedded_query_is_malformed() {
    let nested = Rule::new("n", "x", ValueType::String, "fuzzy").optional();
    for operation in ["set_to_query", "not_set_to_query"] {
        let rule = Rule::new("r", "assignee", ValueType::Uri, operation).query(nested.clone());
        let err = compiler().compile(&rule.into()).unwrap_err();
        assert!(
            err.to_string().contains("embedded query compiled to nothing"),
            "{operation}: {err}"
        );
    }
}

#[test]
fn nested_compile_errors_propagate() {
    let nested = Rule::new("n", "x", ValueType::Numeric, "equals").value("abc");
    let rule = Rule::new("r", "assignee", ValueType::Uri, "set_to_query").query(nested);
    assert!(matches!(
        compiler().compile(&rule.into()),
        Err(CompileError::MalformedRule { ref field, .. }) if field == "x"
    ));
}

#[test]
fn decoded_document() {
    let tree = from_json(
        r#"{
          "id": "root", "nodeType": "CONDITION", "junction": "AND",
          "children": [
            {"id": "r1", "nodeType": "RULE", "field": "status", "type": "string",
             "operation": "in", "values": ["OPEN", "PENDING"]},
            {"id": "r2", "nodeType": "RULE", "field": "sys:created", "type": "date",
             "operation": "between", "values": ["2024-01-01", "2024-12-31"]},
            {"id": "r3", "nodeType": "RULE", "field": "colour", "type": "string",
             "operation": "sounds_like", "values": ["red"], "optional": true},
            {"id": "c1", "nodeType": "CONDITION", "junction": "OR", "boost": "MUST",
             "children": [
               {"id": "r4", "nodeType": "RULE", "field": "due", "type": "date",
                "operation": "is_not_set"},
               {"id": "r5", "nodeType": "RULE", "field": "title", "type": "string",
                "operation": "starts_with", "values": ["Q3 "]}
             ]}
          ]
        }"#,
    )
    .unwrap();

    assert_eq!(
        compiler().compile(&tree).unwrap(),
        concat!(
            r#"(cm:status:("OPEN" OR "PENDING")"#,
            r#" AND sys:created:["2024-01-01" TO "2024-12-31"]"#,
            r#" AND +(ISNULL:"cm:due" OR cm:title:Q3\ *))"#,
        )
    );
}

// ============================================================================
// Registration
// ============================================================================

struct CaseInsensitiveEquals {
    signature: Signature,
}

impl Operation for CaseInsensitiveEquals {
    fn name(&self) -> &str {
        "ci-equals"
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn render(&self, out: &mut String, rule: &Rule, _cx: &RenderContext<'_>) -> Result<()> {
        let value = rule.literal(0).unwrap_or_default().to_lowercase();
        out.push_str(&format!("{}:\"{}\"", rule.field, value));
        Ok(())
    }
}

#[test]
fn lower_priority_override_wins() {
    let builder = OperationRegistry::builder().register(
        CaseInsensitiveEquals {
            signature: Signature::new(ValueType::String, "equals"),
        },
        10,
    );
    let registry = register_operations(builder, resolver()).build().unwrap();
    let compiler = Compiler::new(Arc::new(registry));

    let out = compiler.compile(&equals("r", "status", "OPEN").into()).unwrap();
    assert_eq!(out, r#"status:"open""#);
}

#[test]
fn registering_the_backend_twice_is_ambiguous() {
    let builder = register_operations(OperationRegistry::builder(), resolver());
    let err = register_operations(builder, resolver()).build().unwrap_err();
    assert!(matches!(err, CompileError::AmbiguousOperator { .. }));
}

#[test]
fn every_registered_signature_is_unique() {
    let registry = criteria_fts::registry(resolver()).unwrap();
    let mut seen = std::collections::HashSet::new();
    for entry in registry.iter() {
        assert!(seen.insert(entry.signature().clone()), "{}", entry.signature());
    }
    assert!(registry.len() > 20);
}

#[test]
fn custom_traversal_template() {
    let template = TraversalTemplate::new("EXISTS[$field => $query]").unwrap();
    let registry =
        criteria_fts::register_operations_with(OperationRegistry::builder(), resolver(), template)
            .build()
            .unwrap();
    let rule = Rule::new("r", "assignee", ValueType::Uri, "set_to_query")
        .query(equals("n", "status", "ACTIVE"));

    let out = Compiler::new(Arc::new(registry)).compile(&rule.into()).unwrap();
    assert_eq!(out, r#"EXISTS[app:assignee => cm:status:"ACTIVE"]"#);
}
