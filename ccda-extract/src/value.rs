//! Clinical value of an observation-like node.

use crate::xml::Element;

/// Resolve the value of `entry` (or its `observation` child when present).
///
/// Only leaf facts are considered: the node needs a direct `value` or
/// `interpretationCode` child. Fallback order is `value/@value`,
/// `value/@displayName`, the text of `value`, `interpretationCode/originalText`,
/// then a `reference` into the narrative block of `section`. Returns an empty
/// string when nothing applies.
pub fn resolve_value(entry: Element<'_>, section: Element<'_>) -> String {
    let node = entry.child("observation").unwrap_or(entry);
    let value = node.child("value");
    let interpretation = node.child("interpretationCode");
    if value.is_none() && interpretation.is_none() {
        return String::new();
    }

    if let Some(value) = value {
        for attribute in ["value", "displayName"] {
            let candidate = value.attr_or_empty(attribute);
            if !candidate.is_empty() {
                return candidate;
            }
        }
        let text = value.trimmed_text();
        if !text.is_empty() {
            return text;
        }
    }

    if let Some(text) = interpretation
        .and_then(|code| code.child("originalText"))
        .map(|text| text.trimmed_text())
        .filter(|text| !text.is_empty())
    {
        return text;
    }

    value
        .and_then(|value| narrative_reference(value, section))
        .unwrap_or_default()
}

/// Text of the narrative anchor referenced from `holder`.
///
/// `holder` may carry the `reference` directly or under `originalText`; the
/// anchor is looked up by `ID` inside the section's `text` block.
pub fn narrative_reference(holder: Element<'_>, section: Element<'_>) -> Option<String> {
    let reference = holder
        .child("reference")
        .or_else(|| holder.child("originalText")?.child("reference"))?;
    let target = reference.attr("value")?.trim();
    let id = target.strip_prefix('#').unwrap_or(target);
    if id.is_empty() {
        return None;
    }

    section
        .child("text")?
        .find_by_id(id)
        .map(|anchor| anchor.trimmed_text())
        .filter(|text| !text.is_empty())
}

/// Trimmed text of `element`, falling back to its narrative reference.
pub fn text_or_reference(element: Element<'_>, section: Element<'_>) -> String {
    let own = element.trimmed_text();
    if !own.is_empty() {
        return own;
    }
    narrative_reference(element, section).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Document;

    fn value_of(entry: &str) -> String {
        let xml = format!(
            r##"<section><text><content ID="v1"> See note </content></text><entry>{entry}</entry></section>"##
        );
        let doc = Document::parse(&xml).unwrap();
        let section = doc.root();
        resolve_value(section.child("entry").unwrap(), section)
    }

    #[test]
    fn fallback_order() {
        assert_eq!(value_of(r#"<observation><value value="7" displayName="seven">x</value></observation>"#), "7");
        assert_eq!(value_of(r#"<observation><value displayName="seven">x</value></observation>"#), "seven");
        assert_eq!(value_of(r#"<observation><value> x </value></observation>"#), "x");
        assert_eq!(
            value_of(r#"<observation><interpretationCode><originalText>High</originalText></interpretationCode></observation>"#),
            "High"
        );
        assert_eq!(
            value_of(r##"<observation><value><reference value="#v1"/></value></observation>"##),
            "See note"
        );
    }

    #[test]
    fn containers_have_no_value() {
        assert_eq!(
            value_of(r#"<observation><entryRelationship><observation><value value="1"/></observation></entryRelationship></observation>"#),
            ""
        );
        assert_eq!(value_of(r##"<observation><value><reference value="#missing"/></value></observation>"##), "");
    }
}
