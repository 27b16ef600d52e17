//! Situation types describing what the cursor is positioned to complete
//!
//! A [`Situation`] is produced by [`analyze`](crate::analyze) for every
//! completion request and consumed by the completion generator.

use crate::error::Error;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A label matcher already written in the query, e.g. `job="api"`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Label {
    /// Label name
    pub name: String,
    /// Matcher operator: `=`, `!=`, `=~` or `!~`
    pub operator: String,
    /// Unescaped value
    pub value: String,
}

impl Label {
    /// Create a new label matcher
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        operator: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            operator: operator.into(),
            value: value.into(),
        }
    }

    /// Create an equality matcher (`name="value"`)
    #[must_use]
    pub fn exact(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(name, "=", value)
    }

    /// Check whether this is a regex matcher (`=~` or `!~`)
    #[must_use]
    pub fn is_regex(&self) -> bool {
        matches!(self.operator.as_str(), "=~" | "!~")
    }

    /// Compile the value as a fully anchored regex
    pub fn regex(&self) -> Result<Regex, Error> {
        Ok(Regex::new(&format!("^(?:{})$", self.value))?)
    }

    /// Test a series' label value against this matcher
    ///
    /// A missing label matches as the empty string. Unknown operators
    /// never match.
    pub fn matches(&self, value: Option<&str>) -> Result<bool, Error> {
        let value = value.unwrap_or("");
        let matched = match self.operator.as_str() {
            "=" => value == self.value,
            "!=" => value != self.value,
            "=~" => self.regex()?.is_match(value),
            "!~" => !self.regex()?.is_match(value),
            _ => false,
        };
        Ok(matched)
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{:?}", self.name, self.operator, self.value)
    }
}

/// What kind of token the cursor is currently positioned to complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Situation {
    /// The whole query is blank
    Empty,
    /// Any root-level expression may start here
    AtRoot,
    /// Inside the argument list of a function call
    InFunction,
    /// Inside a duration literal (range brackets, subquery, `offset`)
    InDuration,
    /// Inside `{...}` before a label name has been completed
    #[serde(rename_all = "camelCase")]
    InLabelSelectorNoLabelName {
        metric_name: Option<String>,
        other_labels: Vec<Label>,
    },
    /// Inside `{...}` where the value for `label_name` belongs
    #[serde(rename_all = "camelCase")]
    InLabelSelectorWithLabelName {
        metric_name: Option<String>,
        label_name: String,
        between_quotes: bool,
        other_labels: Vec<Label>,
    },
    /// Inside a `by (...)` / `without (...)` / `on (...)` clause
    #[serde(rename_all = "camelCase")]
    InGrouping {
        metric_name: Option<String>,
        other_labels: Vec<Label>,
    },
}

impl Situation {
    /// Get the fieldless discriminant
    #[must_use]
    pub fn kind(&self) -> SituationKind {
        match self {
            Self::Empty => SituationKind::Empty,
            Self::AtRoot => SituationKind::AtRoot,
            Self::InFunction => SituationKind::InFunction,
            Self::InDuration => SituationKind::InDuration,
            Self::InLabelSelectorNoLabelName { .. } => SituationKind::InLabelSelectorNoLabelName,
            Self::InLabelSelectorWithLabelName { .. } => {
                SituationKind::InLabelSelectorWithLabelName
            }
            Self::InGrouping { .. } => SituationKind::InGrouping,
        }
    }

    /// Get the metric name the cursor context refers to, if any
    #[must_use]
    pub fn metric_name(&self) -> Option<&str> {
        match self {
            Self::InLabelSelectorNoLabelName { metric_name, .. }
            | Self::InLabelSelectorWithLabelName { metric_name, .. }
            | Self::InGrouping { metric_name, .. } => metric_name.as_deref(),
            _ => None,
        }
    }

    /// Get the label matchers already committed in the query
    #[must_use]
    pub fn other_labels(&self) -> &[Label] {
        match self {
            Self::InLabelSelectorNoLabelName { other_labels, .. }
            | Self::InLabelSelectorWithLabelName { other_labels, .. }
            | Self::InGrouping { other_labels, .. } => other_labels,
            _ => &[],
        }
    }
}

/// Discriminant of [`Situation`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SituationKind {
    Empty,
    AtRoot,
    InFunction,
    InDuration,
    InLabelSelectorNoLabelName,
    InLabelSelectorWithLabelName,
    InGrouping,
}

impl SituationKind {
    /// Every situation variant
    pub const ALL: [SituationKind; 7] = [
        Self::Empty,
        Self::AtRoot,
        Self::InFunction,
        Self::InDuration,
        Self::InLabelSelectorNoLabelName,
        Self::InLabelSelectorWithLabelName,
        Self::InGrouping,
    ];
}

impl std::fmt::Display for SituationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Empty => "EMPTY",
            Self::AtRoot => "AT_ROOT",
            Self::InFunction => "IN_FUNCTION",
            Self::InDuration => "IN_DURATION",
            Self::InLabelSelectorNoLabelName => "IN_LABEL_SELECTOR_NO_LABEL_NAME",
            Self::InLabelSelectorWithLabelName => "IN_LABEL_SELECTOR_WITH_LABEL_NAME",
            Self::InGrouping => "IN_GROUPING",
        };
        f.write_str(name)
    }
}
