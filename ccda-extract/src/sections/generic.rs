//! Raw narrative passthrough for sections without a structured extractor.

use crate::xml::Element;

/// Inner markup of every matching section, concatenated unmodified.
pub fn extract(sections: &[Element<'_>]) -> String {
    sections.iter().map(|section| section.inner_xml()).collect()
}
