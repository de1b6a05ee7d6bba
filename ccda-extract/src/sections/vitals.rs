//! Vital signs: one flat table keyed by LOINC code.

use ccda_core::{VitalSign, VitalsSection};
use indexmap::IndexMap;

use super::{first_non_empty, statement_of, EffectiveTime};
use crate::codes::resolve_code;
use crate::value::resolve_value;
use crate::xml::Element;

pub fn extract(sections: &[Element<'_>]) -> VitalsSection {
    let mut items: IndexMap<String, Vec<VitalSign>> = IndexMap::new();

    for section in sections {
        for entry in section.children_named("entry") {
            for observation in observations(statement_of(entry)) {
                if let Some(reading) = reading(observation, *section) {
                    items.entry(reading.code.code.clone()).or_default().push(reading);
                }
            }
        }
    }

    tracing::trace!(codes = items.len(), "vital signs extracted");
    VitalsSection { items }
}

/// Observations of a vital signs organizer, or the statement itself.
fn observations(statement: Element<'_>) -> Vec<Element<'_>> {
    let mut found: Vec<Element<'_>> = statement
        .children_named("component")
        .filter_map(|component| component.child("observation"))
        .collect();
    if found.is_empty() && statement.is("observation") {
        found.push(statement);
    }
    found
}

fn reading(observation: Element<'_>, section: Element<'_>) -> Option<VitalSign> {
    let code = resolve_code(observation);
    if !code.is_loinc() || code.code.is_empty() {
        return None;
    }

    let time = EffectiveTime::of(observation);
    Some(VitalSign {
        title: first_non_empty([code.display_name.clone(), code.code.clone()]),
        value: resolve_value(observation, section),
        unit: observation
            .child("value")
            .map(|value| value.attr_or_empty("unit"))
            .unwrap_or_default(),
        code,
        datetime: time.value,
        datetime_low: time.low,
        datetime_high: time.high,
    })
}
