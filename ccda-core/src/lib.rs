//! Mô hình dữ liệu dùng chung cho engine trích xuất C-CDA.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod records;
pub mod timestamp;

pub use catalog::{ExtractorKind, SectionKey, LOINC_OID, SNOMED_CT_OID};
pub use records::{
    Address, AssessmentRecord, Author, CareTeamRecord, CodedValue, Diagnosis, EncounterRecord,
    HpiRecord, Organization, Participant, PersonName, Performer, ResultItem, ResultPanel,
    ResultsSection, SocialHistoryItem, SocialHistorySection, Telecom, VitalSign, VitalsSection,
};
pub use timestamp::{parse_optional_timestamp, parse_timestamp, LocalZone, Precision, Timestamp};

/// Cấu hình trích xuất.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CcdaConfig {
    /// Múi giờ dùng cho timestamp không có hậu tố `±HHMM`.
    #[serde(default)]
    pub local_zone: LocalZone,
    /// Chỉ trích xuất các section này; `None` nghĩa là toàn bộ danh mục.
    #[serde(default)]
    pub sections: Option<Vec<SectionKey>>,
}

impl CcdaConfig {
    /// Section có nằm trong phạm vi trích xuất không.
    pub fn includes(&self, key: SectionKey) -> bool {
        self.sections
            .as_ref()
            .map_or(true, |sections| sections.contains(&key))
    }
}

/// Nội dung đã trích xuất của một section.
///
/// Mỗi khoá luôn nhận cùng một biến thể, đúng với [`SectionKey::extractor`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum SectionContent {
    /// Markup narrative gốc của section.
    Raw(String),
    Results(ResultsSection),
    Vitals(VitalsSection),
    /// `None` khi entry đầu tiên không có mã LOINC.
    HistoryOfPresentIllness(Option<HpiRecord>),
}

impl SectionContent {
    /// Markup gốc nếu section được trả nguyên dạng.
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            SectionContent::Raw(markup) => Some(markup),
            _ => None,
        }
    }

    /// Bộ trích xuất đã tạo ra nội dung này.
    pub fn kind(&self) -> ExtractorKind {
        match self {
            SectionContent::Raw(_) => ExtractorKind::Raw,
            SectionContent::Results(_) => ExtractorKind::Results,
            SectionContent::Vitals(_) => ExtractorKind::Vitals,
            SectionContent::HistoryOfPresentIllness(_) => ExtractorKind::HistoryOfPresentIllness,
        }
    }
}

/// Kết quả trích xuất của cả tài liệu, theo thứ tự danh mục.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DocumentResult {
    sections: BTreeMap<SectionKey, SectionContent>,
}

impl DocumentResult {
    pub fn new(sections: BTreeMap<SectionKey, SectionContent>) -> Self {
        Self { sections }
    }

    pub fn get(&self, key: SectionKey) -> Option<&SectionContent> {
        self.sections.get(&key)
    }

    pub fn contains(&self, key: SectionKey) -> bool {
        self.sections.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = SectionKey> + '_ {
        self.sections.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (SectionKey, &SectionContent)> {
        self.sections.iter().map(|(key, content)| (*key, content))
    }

    pub fn into_inner(self) -> BTreeMap<SectionKey, SectionContent> {
        self.sections
    }
}

/// Lỗi của engine trích xuất.
#[derive(Debug, thiserror::Error)]
pub enum CcdaError {
    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),
    #[error("Không đọc được tài liệu XML: {0}")]
    Parse(String),
    #[error("Section không có trong danh mục: {0}")]
    UnknownSection(String),
}
