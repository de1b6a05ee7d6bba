//! Assessment section: title plus the first narrative block, as markup.

use ccda_core::AssessmentRecord;

use crate::locator::section_title;
use crate::xml::Element;

pub fn extract(sections: &[Element<'_>]) -> Option<AssessmentRecord> {
    let section = *sections.first()?;
    let text = section.find("text")?;
    Some(AssessmentRecord {
        title: section_title(section),
        text: text.inner_xml().trim().to_string(),
    })
}
