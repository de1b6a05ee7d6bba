//! Coded-value resolution with SNOMED CT to LOINC translation.

use ccda_core::{CodedValue, LOINC_OID, SNOMED_CT_OID};

use crate::xml::Element;

/// Coded value of `element`'s `code` child; empty when there is none.
pub fn resolve_code(element: Element<'_>) -> CodedValue {
    element.child("code").map(coded_value).unwrap_or_default()
}

/// Reads a coded element directly (`code`, `value`, `functionCode`, ...).
///
/// A SNOMED CT code with a LOINC `translation` child resolves to the translation.
pub fn coded_value(code: Element<'_>) -> CodedValue {
    let primary = triple(code);
    if primary.code_system != SNOMED_CT_OID {
        return primary;
    }

    code.children_named("translation")
        .find(|translation| translation.attr("codeSystem").map(str::trim) == Some(LOINC_OID))
        .map(triple)
        .unwrap_or(primary)
}

fn triple(element: Element<'_>) -> CodedValue {
    let display_name = match element.attr_or_empty("displayName") {
        name if name.is_empty() => element
            .child("originalText")
            .map(|text| text.trimmed_text())
            .unwrap_or_default(),
        name => name,
    };

    CodedValue {
        code: element.attr_or_empty("code"),
        code_system: element.attr_or_empty("codeSystem"),
        display_name,
    }
}
