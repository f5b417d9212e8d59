//! Relation identifiers with include and quote policies
//!
//! A [`Relation`] names a database object as three positional parts
//! (database, schema, identifier). Each part carries an include flag (is the
//! part rendered at all) and a quote flag (is it rendered quoted).
//! [`Relation::from_name`] reverse-engineers such a relation, including its
//! quoting, from a plain dotted name.

use crate::error::{CoreError, CoreResult};
use crate::serde_helpers::default_true;
use crate::sql_utils::{quote_with, strip_outer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter;
use std::str::FromStr;

/// One of the three positional parts of a relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationComponent {
    Database,
    Schema,
    Identifier,
}

impl RelationComponent {
    /// All components, left to right.
    pub const ALL: [RelationComponent; 3] = [
        RelationComponent::Database,
        RelationComponent::Schema,
        RelationComponent::Identifier,
    ];
}

impl fmt::Display for RelationComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationComponent::Database => write!(f, "database"),
            RelationComponent::Schema => write!(f, "schema"),
            RelationComponent::Identifier => write!(f, "identifier"),
        }
    }
}

/// Per-component boolean flags, used for both include and quote policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    #[serde(default = "default_true")]
    pub database: bool,

    #[serde(default = "default_true")]
    pub schema: bool,

    #[serde(default = "default_true")]
    pub identifier: bool,
}

impl Policy {
    /// Policy with every component set to `value`.
    pub const fn all(value: bool) -> Self {
        Self {
            database: value,
            schema: value,
            identifier: value,
        }
    }

    /// Flag for a single component
    pub fn get(&self, component: RelationComponent) -> bool {
        match component {
            RelationComponent::Database => self.database,
            RelationComponent::Schema => self.schema,
            RelationComponent::Identifier => self.identifier,
        }
    }

    /// Set the flag for a single component
    pub fn set(&mut self, component: RelationComponent, value: bool) {
        match component {
            RelationComponent::Database => self.database = value,
            RelationComponent::Schema => self.schema = value,
            RelationComponent::Identifier => self.identifier = value,
        }
    }
}

impl Default for Policy {
    fn default() -> Self {
        Self::all(true)
    }
}

/// Kind of a materialized database object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    Table,
    View,
    MaterializedView,
    Cte,
    External,
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationType::Table => write!(f, "table"),
            RelationType::View => write!(f, "view"),
            RelationType::MaterializedView => write!(f, "materialized_view"),
            RelationType::Cte => write!(f, "cte"),
            RelationType::External => write!(f, "external"),
        }
    }
}

impl FromStr for RelationType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(RelationType::Table),
            "view" => Ok(RelationType::View),
            "materialized_view" | "materializedview" => Ok(RelationType::MaterializedView),
            "cte" => Ok(RelationType::Cte),
            "external" => Ok(RelationType::External),
            _ => Err(CoreError::UnknownRelationType(s.to_string())),
        }
    }
}

/// Fallback values for the leftmost parts of a relation name.
///
/// Usually taken from the connection credentials.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationDefaults {
    pub database: Option<String>,
    pub schema: Option<String>,
}

impl RelationDefaults {
    fn get(&self, component: RelationComponent) -> Option<&str> {
        match component {
            RelationComponent::Database => self.database.as_deref(),
            RelationComponent::Schema => self.schema.as_deref(),
            RelationComponent::Identifier => None,
        }
    }
}

/// An adapter's relation conventions: its quote character and the
/// policies relations start from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationStyle {
    pub quote_character: char,
    pub quote_policy: Policy,
    pub include_policy: Policy,
}

impl Default for RelationStyle {
    fn default() -> Self {
        Self {
            quote_character: '"',
            quote_policy: Policy::default(),
            include_policy: Policy::default(),
        }
    }
}

/// Borrowed view of a single relation component and its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationPart<'a> {
    pub component: RelationComponent,
    pub value: Option<&'a str>,
    pub include: bool,
    pub quote: bool,
}

/// A reference to a database object plus its quoting metadata.
///
/// Relations are immutable once built and compare/hash by every field, so
/// they can be used directly as map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Relation {
    database: Option<String>,
    schema: Option<String>,
    identifier: Option<String>,
    #[serde(rename = "type")]
    relation_type: Option<RelationType>,
    include_policy: Policy,
    quote_policy: Policy,
    quote_character: char,
}

impl Relation {
    /// Build a relation from explicit parts using the style's default policies.
    pub fn new(
        database: Option<String>,
        schema: Option<String>,
        identifier: Option<String>,
        style: &RelationStyle,
    ) -> Self {
        Self {
            database,
            schema,
            identifier,
            relation_type: None,
            include_policy: style.include_policy,
            quote_policy: style.quote_policy,
            quote_character: style.quote_character,
        }
    }

    /// Reverse-engineer a relation, including quoting, from a dotted name.
    ///
    /// Segments are right-aligned against `database.schema.identifier`.
    /// Missing leftmost parts take their value from `defaults` and are
    /// excluded from rendering. A supplied segment is included, and is
    /// considered quoted when `quote` applied to the segment with its outer
    /// characters stripped reproduces the segment exactly.
    pub fn from_name<Q>(
        name: &str,
        defaults: &RelationDefaults,
        style: &RelationStyle,
        quote: Q,
    ) -> CoreResult<Self>
    where
        Q: Fn(&str) -> String,
    {
        let invalid = |reason: String| CoreError::InvalidRelationName {
            name: name.to_string(),
            reason,
        };

        if name.is_empty() {
            return Err(invalid("name is empty".to_string()));
        }
        let segments: Vec<&str> = name.split('.').collect();
        if segments.len() > RelationComponent::ALL.len() {
            return Err(invalid(format!(
                "expected at most 3 dot-separated parts, found {}",
                segments.len()
            )));
        }
        if segments.iter().any(|s| s.is_empty()) {
            return Err(invalid("contains an empty part".to_string()));
        }

        let padding = RelationComponent::ALL.len() - segments.len();
        let values = iter::repeat(None)
            .take(padding)
            .chain(segments.into_iter().map(Some));

        let mut relation = Self::new(None, None, None, style);
        for (component, value) in RelationComponent::ALL.into_iter().zip(values) {
            let resolved = match value {
                None => {
                    relation.include_policy.set(component, false);
                    defaults.get(component).map(str::to_string)
                }
                Some(raw) => {
                    relation.include_policy.set(component, true);
                    let trimmed = strip_outer(raw);
                    let quoted = quote(trimmed) == raw;
                    relation.quote_policy.set(component, quoted);
                    Some(if quoted { trimmed } else { raw }.to_string())
                }
            };
            *relation.slot_mut(component) = resolved;
        }

        log::debug!(
            "Reconstructed relation '{}' from name '{}'",
            relation,
            name
        );
        Ok(relation)
    }

    /// Attach the relation type observed in the catalog
    pub fn with_type(mut self, relation_type: RelationType) -> Self {
        self.relation_type = Some(relation_type);
        self
    }

    /// Replace the quote policy
    pub fn with_quote_policy(mut self, policy: Policy) -> Self {
        self.quote_policy = policy;
        self
    }

    pub fn database(&self) -> Option<&str> {
        self.get(RelationComponent::Database)
    }

    pub fn schema(&self) -> Option<&str> {
        self.get(RelationComponent::Schema)
    }

    pub fn identifier(&self) -> Option<&str> {
        self.get(RelationComponent::Identifier)
    }

    /// Value of a single component
    pub fn get(&self, component: RelationComponent) -> Option<&str> {
        match component {
            RelationComponent::Database => self.database.as_deref(),
            RelationComponent::Schema => self.schema.as_deref(),
            RelationComponent::Identifier => self.identifier.as_deref(),
        }
    }

    fn slot_mut(&mut self, component: RelationComponent) -> &mut Option<String> {
        match component {
            RelationComponent::Database => &mut self.database,
            RelationComponent::Schema => &mut self.schema,
            RelationComponent::Identifier => &mut self.identifier,
        }
    }

    pub fn relation_type(&self) -> Option<RelationType> {
        self.relation_type
    }

    pub fn include_policy(&self) -> Policy {
        self.include_policy
    }

    pub fn quote_policy(&self) -> Policy {
        self.quote_policy
    }

    pub fn quote_character(&self) -> char {
        self.quote_character
    }

    /// A component together with its include and quote flags
    pub fn part(&self, component: RelationComponent) -> RelationPart<'_> {
        RelationPart {
            component,
            value: self.get(component),
            include: self.include_policy.get(component),
            quote: self.quote_policy.get(component),
        }
    }

    /// All three parts, left to right
    pub fn parts(&self) -> [RelationPart<'_>; 3] {
        RelationComponent::ALL.map(|c| self.part(c))
    }

    /// The schema-level relation this relation lives in.
    pub fn without_identifier(&self) -> Self {
        let mut schema = self.clone();
        schema.identifier = None;
        schema
            .include_policy
            .set(RelationComponent::Identifier, false);
        schema.relation_type = None;
        schema
    }

    /// Render the relation as a SQL reference.
    ///
    /// Excluded or absent parts are skipped; the rest are quoted per the
    /// quote policy and joined with `.`.
    pub fn render(&self) -> String {
        self.parts()
            .iter()
            .filter(|p| p.include)
            .filter_map(|p| {
                p.value.map(|v| {
                    if p.quote {
                        quote_with(self.quote_character, v)
                    } else {
                        v.to_string()
                    }
                })
            })
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
#[path = "relation_test.rs"]
mod tests;
