//! Section-specific extractors.

use crate::xml::Element;

pub mod assessment;
pub mod care_team;
pub mod encounter;
pub mod generic;
pub mod hpi;
pub mod parties;
pub mod results;
pub mod social_history;
pub mod vitals;

const CLINICAL_STATEMENTS: [&str; 8] = [
    "observation",
    "organizer",
    "act",
    "encounter",
    "procedure",
    "substanceAdministration",
    "supply",
    "regionOfInterest",
];

/// The clinical statement carried by an `entry` or `entryRelationship`.
///
/// Falls back to `holder` itself when no known statement element is present.
pub(crate) fn statement_of(holder: Element<'_>) -> Element<'_> {
    holder
        .children()
        .find(|child| CLINICAL_STATEMENTS.contains(&child.name()))
        .unwrap_or(holder)
}

/// Literal values of `effectiveTime` (point, low, high).
#[derive(Debug, Default)]
pub(crate) struct EffectiveTime {
    pub value: String,
    pub low: String,
    pub high: String,
}

impl EffectiveTime {
    pub fn of(node: Element<'_>) -> Self {
        let Some(time) = node.child("effectiveTime") else {
            return Self::default();
        };
        let bound = |name: &str| {
            time.child(name)
                .map(|bound| bound.attr_or_empty("value"))
                .unwrap_or_default()
        };
        Self {
            value: time.attr_or_empty("value"),
            low: bound("low"),
            high: bound("high"),
        }
    }

    /// Point value, or the low bound for interval-only times.
    pub fn point_or_low(&self) -> String {
        if self.value.is_empty() {
            self.low.clone()
        } else {
            self.value.clone()
        }
    }
}

/// `statusCode/@code` of a clinical statement.
pub(crate) fn status_code(node: Element<'_>) -> String {
    node.child("statusCode")
        .map(|status| status.attr_or_empty("code"))
        .unwrap_or_default()
}

/// First non-empty string, or an empty one.
pub(crate) fn first_non_empty(candidates: impl IntoIterator<Item = String>) -> String {
    candidates
        .into_iter()
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default()
}
