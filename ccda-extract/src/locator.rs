//! Section lookup by `templateId/@root`.

use ccda_core::SectionKey;

use crate::xml::{Document, Element};

/// Every `section` whose first `templateId` root is one of `ids`, in document order.
///
/// An empty result means the document does not carry the section.
pub fn locate<'d>(document: &'d Document<'d>, ids: &[&str]) -> Vec<Element<'d>> {
    document
        .elements()
        .filter(|element| element.is("section"))
        .filter(|section| {
            section
                .child("templateId")
                .and_then(|template| template.attr("root"))
                .is_some_and(|root| ids.iter().any(|id| *id == root.trim()))
        })
        .collect()
}

/// Sections matching any template version of a catalog entry.
pub fn locate_section<'d>(document: &'d Document<'d>, key: SectionKey) -> Vec<Element<'d>> {
    locate(document, key.template_ids())
}

/// Trimmed `title` of a section, empty when missing.
pub fn section_title(section: Element<'_>) -> String {
    section
        .child("title")
        .map(|title| title.trimmed_text())
        .unwrap_or_default()
}
