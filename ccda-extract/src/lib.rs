//! C-CDA document to `DocumentResult` extraction engine.
//!
//! The document is parsed once into a read-only element tree; every catalog
//! section present in it is then handed to the extractor its
//! [`ExtractorKind`] names, so a key always maps to the same content variant.
//! Social history, encounters, care teams and assessment stay raw in the
//! document result and are extracted on demand from the parsed [`Document`].

use std::collections::BTreeMap;

use ccda_core::{
    AssessmentRecord, CareTeamRecord, CcdaConfig, CcdaError, DocumentResult, EncounterRecord,
    ExtractorKind, SectionContent, SectionKey, SocialHistorySection,
};

pub mod codes;
pub mod locator;
pub mod sections;
pub mod value;
pub mod xml;

pub use ccda_core::{parse_optional_timestamp, parse_timestamp, LocalZone, Timestamp};
pub use codes::{coded_value, resolve_code};
pub use locator::{locate, locate_section};
pub use value::resolve_value;
pub use xml::{Document, Element};

/// Extract every catalog section from a document's XML text.
pub fn parse(xml: &str) -> Result<DocumentResult, CcdaError> {
    parse_with_config(xml, &CcdaConfig::default())
}

/// Extract the sections selected by `config`.
///
/// Malformed XML fails the whole call; missing sections are simply absent
/// from the result.
pub fn parse_with_config(xml: &str, config: &CcdaConfig) -> Result<DocumentResult, CcdaError> {
    let document = Document::parse(xml)?;
    let result = extract_document(&document, config);
    tracing::debug!(bytes = xml.len(), sections = result.len(), "document extracted");
    Ok(result)
}

/// Run the catalog over an already parsed document.
pub fn extract_document<'d>(document: &'d Document<'d>, config: &CcdaConfig) -> DocumentResult {
    let mut sections = BTreeMap::new();

    for &key in SectionKey::ALL {
        if !config.includes(key) {
            continue;
        }
        let found = locate_section(document, key);
        if found.is_empty() {
            tracing::debug!(section = %key, "section absent");
            continue;
        }
        sections.insert(key, extract_section(key, &found));
    }

    DocumentResult::new(sections)
}

fn extract_section(key: SectionKey, found: &[Element<'_>]) -> SectionContent {
    match key.extractor() {
        ExtractorKind::Raw => SectionContent::Raw(sections::generic::extract(found)),
        ExtractorKind::Results => SectionContent::Results(sections::results::extract(found)),
        ExtractorKind::Vitals => SectionContent::Vitals(sections::vitals::extract(found)),
        ExtractorKind::HistoryOfPresentIllness => {
            SectionContent::HistoryOfPresentIllness(sections::hpi::extract(found))
        }
    }
}

/// Social history tree of the document; empty when the section is absent.
pub fn social_history<'d>(document: &'d Document<'d>) -> SocialHistorySection {
    sections::social_history::extract(&locate_section(document, SectionKey::SocialHistory))
}

/// First encounter of the Encounters section.
pub fn encounter<'d>(document: &'d Document<'d>) -> Option<EncounterRecord> {
    sections::encounter::extract(&locate_section(document, SectionKey::Encounters))
}

/// First care team of the Care Teams section.
pub fn care_team<'d>(document: &'d Document<'d>) -> Option<CareTeamRecord> {
    sections::care_team::extract(&locate_section(document, SectionKey::CareTeams))
}

pub fn assessment<'d>(document: &'d Document<'d>) -> Option<AssessmentRecord> {
    sections::assessment::extract(&locate_section(document, SectionKey::Assessment))
}
