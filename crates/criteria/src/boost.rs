//! Boost and negation markers.
//!
//! A [`QueryBoost`] tells the compiler how a clause participates in its
//! enclosing group. [`BoostPolicy`] turns that hint into the marker written
//! in front of the clause:
//!
//! | Boost | Rendered |
//! |-------|----------|
//! | `NONE` | never |
//! | `MUST` / `SHOULD` | only when different from [`QuerySyntax::implicit_boost`] |
//! | `EXCLUDE` | always, directly before the clause or group |
//!
//! Exclusion binds to a whole group: the marker is written once before the
//! group's opening delimiter and never repeated per child.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::syntax::QuerySyntax;

/// Rendering hint for a clause inside its enclosing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum QueryBoost {
    #[default]
    None,
    Must,
    Should,
    Exclude,
}

/// Where the next clause lands relative to its enclosing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Nothing has been written in the enclosing group yet.
    GroupStart,
    /// The clause follows earlier output in the same group.
    AfterContent,
}

impl Position {
    /// Determines the position of the next write into `out`.
    pub fn of(out: &str, syntax: &QuerySyntax) -> Self {
        if out.is_empty() || out.ends_with(syntax.group_open.as_str()) {
            Position::GroupStart
        } else {
            Position::AfterContent
        }
    }
}

/// Decides and writes boost markers for one target syntax.
#[derive(Debug, Clone, Copy)]
pub struct BoostPolicy<'a> {
    syntax: &'a QuerySyntax,
}

impl<'a> BoostPolicy<'a> {
    pub fn new(syntax: &'a QuerySyntax) -> Self {
        BoostPolicy { syntax }
    }

    /// Returns the marker to write before a clause with `boost`, if any.
    pub fn marker(&self, boost: QueryBoost) -> Option<&'a str> {
        let syntax = self.syntax;
        let marker = match boost {
            QueryBoost::None => return None,
            QueryBoost::Exclude => &syntax.exclude_marker,
            b if b == syntax.implicit_boost => return None,
            QueryBoost::Must => &syntax.must_marker,
            QueryBoost::Should => &syntax.should_marker,
        };
        (!marker.is_empty()).then_some(marker.as_str())
    }

    /// Returns the text to write before a clause with `boost` at `position`.
    ///
    /// Away from the start of a group the marker is separated from earlier
    /// output by a space, unless `preceding` already ends on whitespace.
    pub fn prefix(&self, boost: QueryBoost, position: Position, preceding: &str) -> Option<String> {
        let marker = self.marker(boost)?;
        let needs_space = position == Position::AfterContent
            && !preceding.ends_with(char::is_whitespace);
        Some(if needs_space {
            format!(" {marker}")
        } else {
            marker.to_string()
        })
    }

    /// Writes the prefix for `boost` into `out`. Returns `true` if anything
    /// was written.
    pub fn write_prefix(&self, out: &mut String, boost: QueryBoost) -> bool {
        let position = Position::of(out, self.syntax);
        match self.prefix(boost, position, out) {
            Some(prefix) => {
                out.push_str(&prefix);
                true
            }
            None => false,
        }
    }

    /// Writes an excluded group around the clause produced by `clause`.
    ///
    /// The exclusion marker and the group delimiters are written exactly
    /// once; whatever `clause` writes is left untouched.
    pub fn write_negated<F>(&self, out: &mut String, clause: F) -> Result<()>
    where
        F: FnOnce(&mut String) -> Result<()>,
    {
        self.write_prefix(out, QueryBoost::Exclude);
        out.push_str(&self.syntax.group_open);
        clause(out)?;
        out.push_str(&self.syntax.group_close);
        Ok(())
    }
}
