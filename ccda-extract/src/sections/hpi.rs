//! History of present illness: a single LOINC-coded narrative entry.

use ccda_core::HpiRecord;

use super::parties::{address, person_name};
use super::{first_non_empty, statement_of, EffectiveTime};
use crate::codes::resolve_code;
use crate::locator::section_title;
use crate::value::text_or_reference;
use crate::xml::Element;

/// `None` when the first entry is missing or not LOINC-coded.
pub fn extract(sections: &[Element<'_>]) -> Option<HpiRecord> {
    let section = *sections.first()?;
    let statement = statement_of(section.child("entry")?);
    let code = resolve_code(statement);
    if !code.is_loinc() {
        tracing::debug!(code = %code.code, "history of present illness entry is not LOINC-coded");
        return None;
    }

    let text = first_non_empty([
        statement
            .child("text")
            .map(|text| text_or_reference(text, section))
            .unwrap_or_default(),
        section
            .child("text")
            .map(|text| text.trimmed_text())
            .unwrap_or_default(),
    ]);

    let assigned = statement
        .child("author")
        .and_then(|author| author.child("assignedAuthor"));
    let author_name = assigned
        .and_then(|assigned| assigned.child("assignedPerson"))
        .and_then(|person| person.child("name"))
        .map(|name| person_name(name).full_name())
        .unwrap_or_default();

    Some(HpiRecord {
        title: first_non_empty([section_title(section), code.display_name]),
        text,
        datetime: EffectiveTime::of(statement).point_or_low(),
        author_name,
        address: assigned
            .and_then(|assigned| assigned.child("addr"))
            .map(address)
            .filter(|addr| !addr.is_empty()),
    })
}
