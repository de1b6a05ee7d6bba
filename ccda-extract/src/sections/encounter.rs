//! Encounters section: the first encounter with its parties and diagnoses.

use ccda_core::{Diagnosis, EncounterRecord};

use super::parties::{author, participant, performer};
use super::{first_non_empty, status_code, EffectiveTime};
use crate::codes::resolve_code;
use crate::locator::section_title;
use crate::value::resolve_value;
use crate::xml::Element;

/// `None` when no section has an entry carrying an `encounter`.
pub fn extract(sections: &[Element<'_>]) -> Option<EncounterRecord> {
    let (section, encounter) = sections.iter().find_map(|section| {
        let encounter = section.child("entry")?.find("encounter")?;
        Some((*section, encounter))
    })?;

    let code = resolve_code(encounter);
    let time = EffectiveTime::of(encounter);
    let record = EncounterRecord {
        title: first_non_empty([
            code.display_name.clone(),
            section_title(section),
            code.code.clone(),
        ]),
        code,
        date: time.value,
        date_low: time.low,
        date_high: time.high,
        performers: encounter.children_named("performer").map(performer).collect(),
        participants: encounter
            .children_named("participant")
            .map(participant)
            .collect(),
        authors: encounter.children_named("author").map(author).collect(),
        diagnoses: diagnoses(encounter, section),
    };

    tracing::trace!(
        performers = record.performers.len(),
        participants = record.participants.len(),
        diagnoses = record.diagnoses.len(),
        "encounter extracted"
    );
    Some(record)
}

/// Observations directly under `entryRelationship`, or wrapped in an
/// Encounter Diagnosis act.
fn diagnoses(encounter: Element<'_>, section: Element<'_>) -> Vec<Diagnosis> {
    encounter
        .children_named("entryRelationship")
        .flat_map(|relationship| {
            if let Some(observation) = relationship.child("observation") {
                return vec![observation];
            }
            relationship
                .child("act")
                .map(|act| {
                    act.children_named("entryRelationship")
                        .filter_map(|inner| inner.child("observation"))
                        .collect()
                })
                .unwrap_or_default()
        })
        .map(|observation| diagnosis(observation, section))
        .collect()
}

fn diagnosis(observation: Element<'_>, section: Element<'_>) -> Diagnosis {
    let code = resolve_code(observation);
    let value_display = observation
        .child("value")
        .map(|value| value.attr_or_empty("displayName"))
        .unwrap_or_default();
    Diagnosis {
        display_name: first_non_empty([value_display, code.display_name.clone()]),
        code,
        value: resolve_value(observation, section),
        status_code: status_code(observation),
    }
}
