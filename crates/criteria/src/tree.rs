//! Criteria tree model.
//!
//! A criteria tree is a nested boolean expression built from two node kinds:
//!
//! - [`Rule`]: a leaf predicate (field, value type, operation name, values)
//! - [`Condition`]: an AND/OR group of child nodes with a [`QueryBoost`]
//!
//! Both are wrapped by the closed [`SearchNode`] enum.
//!
//! # Building trees
//!
//! Trees are usually decoded from a client document with [`from_json`], but
//! can also be assembled directly:
//!
//! ```
//! use criteria::{Condition, Rule, ValueType};
//!
//! let tree = Condition::and("root")
//!     .child(Rule::new("r1", "status", ValueType::String, "equals").value("ACTIVE"))
//!     .child(Rule::new("r2", "priority", ValueType::String, "equals").value("HIGH"));
//!
//! assert_eq!(tree.children.len(), 2);
//! ```
//!
//! # JSON representation
//!
//! ```json
//! { "id": "c1", "nodeType": "CONDITION", "junction": "AND", "boost": "NONE",
//!   "children": [
//!     { "id": "r1", "nodeType": "RULE", "field": "status", "type": "string",
//!       "operation": "equals", "values": ["ACTIVE"] } ] }
//! ```
//!
//! An embedded sub-query is written as a JSON object inside `values`.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::boost::QueryBoost;
use crate::error::{CompileError, Result};

/// Discriminates the two node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Condition,
    Rule,
}

impl NodeType {
    /// Returns the wire name of this node type.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Condition => "CONDITION",
            NodeType::Rule => "RULE",
        }
    }

    fn parse(name: &str) -> Option<Self> {
        match name {
            "CONDITION" => Some(NodeType::Condition),
            "RULE" => Some(NodeType::Rule),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic kind of the values a rule compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    String,
    Numeric,
    Boolean,
    Date,
    Uri,
}

impl ValueType {
    /// All value types, in declaration order.
    pub const ALL: [ValueType; 5] = [
        ValueType::String,
        ValueType::Numeric,
        ValueType::Boolean,
        ValueType::Date,
        ValueType::Uri,
    ];

    /// Returns the wire name of this value type.
    pub fn as_str(self) -> &'static str {
        match self {
            ValueType::String => "string",
            ValueType::Numeric => "numeric",
            ValueType::Boolean => "boolean",
            ValueType::Date => "date",
            ValueType::Uri => "uri",
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Boolean connective joining the children of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Junction {
    #[default]
    And,
    Or,
}

/// A single value attached to a rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    /// A literal, kept as the client sent it.
    Literal(String),
    /// An embedded criteria tree, compiled independently by relation operations.
    Query(Box<SearchNode>),
}

impl RuleValue {
    /// Returns the literal text, or `None` for an embedded query.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            RuleValue::Literal(s) => Some(s),
            RuleValue::Query(_) => None,
        }
    }

    /// Returns the embedded tree, or `None` for a literal.
    pub fn as_query(&self) -> Option<&SearchNode> {
        match self {
            RuleValue::Literal(_) => None,
            RuleValue::Query(node) => Some(node),
        }
    }
}

impl From<&str> for RuleValue {
    fn from(s: &str) -> Self {
        RuleValue::Literal(s.to_string())
    }
}

impl From<String> for RuleValue {
    fn from(s: String) -> Self {
        RuleValue::Literal(s)
    }
}

impl From<SearchNode> for RuleValue {
    fn from(node: SearchNode) -> Self {
        RuleValue::Query(Box::new(node))
    }
}

/// A leaf predicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    /// Node id, unique within its tree.
    pub id: String,
    /// Target property name, as the client knows it.
    pub field: String,
    /// Kind of the values.
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Operator name, resolved against the registry.
    pub operation: String,
    /// Ordered operands. Empty for unary operators.
    #[serde(default)]
    pub values: Vec<RuleValue>,
    /// When set, the compiler drops this rule instead of failing if no
    /// operation matches it.
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl Rule {
    /// Creates a rule with no values.
    pub fn new(
        id: impl Into<String>,
        field: impl Into<String>,
        value_type: ValueType,
        operation: impl Into<String>,
    ) -> Self {
        Rule {
            id: id.into(),
            field: field.into(),
            value_type,
            operation: operation.into(),
            values: Vec::new(),
            optional: false,
        }
    }

    /// Appends a value.
    pub fn value(mut self, value: impl Into<RuleValue>) -> Self {
        self.values.push(value.into());
        self
    }

    /// Appends an embedded sub-query.
    pub fn query(mut self, node: impl Into<SearchNode>) -> Self {
        self.values.push(RuleValue::Query(Box::new(node.into())));
        self
    }

    /// Marks the rule as skippable when no operation matches it.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Returns the literal at `index`, if present and not an embedded query.
    pub fn literal(&self, index: usize) -> Option<&str> {
        self.values.get(index).and_then(RuleValue::as_literal)
    }

    /// Iterates over literal values, skipping embedded queries.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.values.iter().filter_map(RuleValue::as_literal)
    }
}

/// A boolean group of child nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Node id, unique within its tree.
    pub id: String,
    /// Connective placed between rendered children.
    #[serde(default)]
    pub junction: Junction,
    /// How this group participates in its parent.
    #[serde(default)]
    pub boost: QueryBoost,
    /// Ordered child nodes.
    #[serde(default)]
    pub children: Vec<SearchNode>,
}

impl Condition {
    /// Creates an empty group with the given junction.
    pub fn new(id: impl Into<String>, junction: Junction) -> Self {
        Condition {
            id: id.into(),
            junction,
            boost: QueryBoost::None,
            children: Vec::new(),
        }
    }

    /// Creates an empty AND group.
    pub fn and(id: impl Into<String>) -> Self {
        Condition::new(id, Junction::And)
    }

    /// Creates an empty OR group.
    pub fn or(id: impl Into<String>) -> Self {
        Condition::new(id, Junction::Or)
    }

    /// Sets the boost annotation.
    pub fn boost(mut self, boost: QueryBoost) -> Self {
        self.boost = boost;
        self
    }

    /// Appends a child node.
    pub fn child(mut self, node: impl Into<SearchNode>) -> Self {
        self.children.push(node.into());
        self
    }
}

/// A node of a criteria tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchNode {
    Rule(Rule),
    Condition(Condition),
}

impl SearchNode {
    /// Returns the node id.
    pub fn id(&self) -> &str {
        match self {
            SearchNode::Rule(rule) => &rule.id,
            SearchNode::Condition(condition) => &condition.id,
        }
    }

    /// Returns the node kind.
    pub fn node_type(&self) -> NodeType {
        match self {
            SearchNode::Rule(_) => NodeType::Rule,
            SearchNode::Condition(_) => NodeType::Condition,
        }
    }

    /// Counts the conditions of this tree, not descending into embedded
    /// sub-queries.
    pub fn condition_count(&self) -> usize {
        match self {
            SearchNode::Rule(_) => 0,
            SearchNode::Condition(condition) => {
                1 + condition
                    .children
                    .iter()
                    .map(SearchNode::condition_count)
                    .sum::<usize>()
            }
        }
    }

    /// Checks that ids are unique within this tree.
    ///
    /// Each embedded sub-query is its own tree and gets its own id scope.
    pub fn check_unique_ids(&self) -> Result<()> {
        let mut seen = HashSet::new();
        self.collect_ids(&mut seen)
    }

    fn collect_ids<'a>(&'a self, seen: &mut HashSet<&'a str>) -> Result<()> {
        if !seen.insert(self.id()) {
            return Err(CompileError::DuplicateNodeId(self.id().to_string()));
        }
        match self {
            SearchNode::Rule(rule) => {
                for nested in rule.values.iter().filter_map(RuleValue::as_query) {
                    nested.check_unique_ids()?;
                }
            }
            SearchNode::Condition(condition) => {
                for child in &condition.children {
                    child.collect_ids(seen)?;
                }
            }
        }
        Ok(())
    }
}

impl From<Rule> for SearchNode {
    fn from(rule: Rule) -> Self {
        SearchNode::Rule(rule)
    }
}

impl From<Condition> for SearchNode {
    fn from(condition: Condition) -> Self {
        SearchNode::Condition(condition)
    }
}

/// Decodes a criteria tree from its JSON representation.
///
/// Unknown `nodeType` tags are reported as
/// [`CompileError::UnsupportedNodeType`] rather than a generic decode error,
/// and duplicate ids as [`CompileError::DuplicateNodeId`].
pub fn from_json(input: &str) -> Result<SearchNode> {
    let value: Json = serde_json::from_str(input)?;
    from_value(value)
}

/// Decodes a criteria tree from an already parsed JSON value.
pub fn from_value(value: Json) -> Result<SearchNode> {
    check_node_types(&value)?;
    let node: SearchNode = serde_json::from_value(value)?;
    node.check_unique_ids()?;
    Ok(node)
}

fn check_node_types(value: &Json) -> Result<()> {
    let Some(object) = value.as_object() else {
        return Ok(());
    };
    if let Some(tag) = object.get("nodeType") {
        let name = tag.as_str().map_or_else(|| tag.to_string(), str::to_string);
        if NodeType::parse(&name).is_none() {
            let id = object
                .get("id")
                .and_then(Json::as_str)
                .unwrap_or_default()
                .to_string();
            return Err(CompileError::UnsupportedNodeType { id, node_type: name });
        }
    }
    for key in ["children", "values"] {
        if let Some(Json::Array(items)) = object.get(key) {
            for item in items {
                check_node_types(item)?;
            }
        }
    }
    Ok(())
}
