//! Bản ghi có cấu trúc trả về cho từng loại section.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::LOINC_OID;
use crate::timestamp::{parse_optional_timestamp, LocalZone, Timestamp};
use crate::CcdaError;

/// Bộ ba (mã, hệ mã, tên hiển thị) của một phần tử mã hoá.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodedValue {
    pub code: String,
    pub code_system: String,
    pub display_name: String,
}

impl CodedValue {
    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.code_system.is_empty() && self.display_name.is_empty()
    }

    /// Mã thuộc hệ LOINC.
    pub fn is_loinc(&self) -> bool {
        self.code_system == LOINC_OID
    }
}

/// Một kết quả xét nghiệm trong panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    pub title: String,
    pub code: CodedValue,
    pub value: String,
    pub unit: String,
    pub datetime: String,
    pub datetime_low: String,
    pub datetime_high: String,
    pub reference_range_low: String,
    pub reference_range_high: String,
    /// Văn bản của khoảng tham chiếu đầu tiên.
    pub reference_range_text: String,
    /// Văn bản của mọi khoảng tham chiếu, theo thứ tự trong tài liệu.
    pub reference_range_text_items: Vec<String>,
    pub is_out_of_range: bool,
}

impl ResultItem {
    /// Thời điểm ghi nhận kết quả, ưu tiên `effectiveTime/@value` rồi tới `low`.
    pub fn recorded_at(&self, zone: &LocalZone) -> Result<Option<Timestamp>, CcdaError> {
        first_timestamp(&[&self.datetime, &self.datetime_low], zone)
    }
}

/// Nhóm kết quả thuộc cùng một entry (thường là một result organizer).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPanel {
    pub title: String,
    pub code: CodedValue,
    pub items: Vec<ResultItem>,
    /// Hợp các mốc thời gian của các item, đã sắp xếp và loại trùng.
    pub dates: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultsSection {
    pub panels: Vec<ResultPanel>,
}

/// Một lần đo chỉ số sinh tồn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalSign {
    pub title: String,
    pub code: CodedValue,
    pub value: String,
    pub unit: String,
    pub datetime: String,
    pub datetime_low: String,
    pub datetime_high: String,
}

impl VitalSign {
    pub fn recorded_at(&self, zone: &LocalZone) -> Result<Option<Timestamp>, CcdaError> {
        first_timestamp(&[&self.datetime, &self.datetime_low], zone)
    }

    /// Giá trị dạng số nếu đọc được.
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

/// Bảng chỉ số sinh tồn, khoá theo mã LOINC.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VitalsSection {
    pub items: IndexMap<String, Vec<VitalSign>>,
}

/// Một mục tiền sử xã hội; có thể chứa các mục con qua `entryRelationship`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialHistoryItem {
    pub title: String,
    pub code: CodedValue,
    pub value: String,
    pub datetime: String,
    pub datetime_low: String,
    pub datetime_high: String,
    pub status_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_relationships: Option<IndexMap<String, SocialHistoryItem>>,
}

impl SocialHistoryItem {
    pub fn recorded_at(&self, zone: &LocalZone) -> Result<Option<Timestamp>, CcdaError> {
        first_timestamp(&[&self.datetime, &self.datetime_low], zone)
    }

    /// Mục con theo khoá.
    pub fn relationship(&self, key: &str) -> Option<&SocialHistoryItem> {
        self.entity_relationships.as_ref()?.get(key)
    }

    /// Độ sâu cây mục con (mục lá có độ sâu 0).
    pub fn depth(&self) -> usize {
        self.entity_relationships
            .as_ref()
            .and_then(|children| children.values().map(|child| child.depth() + 1).max())
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocialHistorySection {
    pub items: IndexMap<String, SocialHistoryItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub prefix: String,
    pub given: Vec<String>,
    pub family: String,
    pub suffix: String,
}

impl PersonName {
    pub fn is_empty(&self) -> bool {
        self.prefix.is_empty()
            && self.given.is_empty()
            && self.family.is_empty()
            && self.suffix.is_empty()
    }

    /// Tên đầy đủ dạng "given family".
    pub fn full_name(&self) -> String {
        let mut parts: Vec<&str> = self.given.iter().map(String::as_str).collect();
        if !self.family.is_empty() {
            parts.push(&self.family);
        }
        parts.join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub use_code: String,
    pub street_address_lines: Vec<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.street_address_lines.is_empty()
            && self.city.is_empty()
            && self.state.is_empty()
            && self.postal_code.is_empty()
            && self.country.is_empty()
    }

    /// Địa chỉ trên một dòng.
    pub fn single_line(&self) -> String {
        let mut parts: Vec<String> = self.street_address_lines.clone();
        let locality = format!("{} {}", self.state, self.postal_code)
            .trim()
            .to_string();
        for part in [self.city.clone(), locality, self.country.clone()] {
            if !part.is_empty() {
                parts.push(part);
            }
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Telecom {
    pub use_code: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    pub addresses: Vec<Address>,
    pub telecoms: Vec<Telecom>,
}

/// Người thực hiện (`performer/assignedEntity`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performer {
    pub name: Option<PersonName>,
    /// Chuyên khoa (`assignedEntity/code`).
    pub specialty: CodedValue,
    /// Vai trò trong nhóm chăm sóc (`performer/functionCode`).
    pub function_code: CodedValue,
    pub addresses: Vec<Address>,
    pub telecoms: Vec<Telecom>,
    pub organization: Option<Organization>,
}

/// Bên tham gia (`participant/participantRole`), thường là nơi diễn ra encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub type_code: String,
    pub role_code: CodedValue,
    pub addresses: Vec<Address>,
    pub telecoms: Vec<Telecom>,
    /// `playingEntity/name`.
    pub facility_name: String,
}

/// Tác giả (`author/assignedAuthor`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub time: String,
    pub name: Option<PersonName>,
    pub addresses: Vec<Address>,
    pub telecoms: Vec<Telecom>,
    pub organization: Option<Organization>,
}

/// Chẩn đoán gắn với encounter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub code: CodedValue,
    pub display_name: String,
    pub value: String,
    pub status_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterRecord {
    pub title: String,
    pub code: CodedValue,
    pub date: String,
    pub date_low: String,
    pub date_high: String,
    pub performers: Vec<Performer>,
    pub participants: Vec<Participant>,
    pub authors: Vec<Author>,
    pub diagnoses: Vec<Diagnosis>,
}

impl EncounterRecord {
    /// Thời điểm bắt đầu encounter.
    pub fn start(&self, zone: &LocalZone) -> Result<Option<Timestamp>, CcdaError> {
        first_timestamp(&[&self.date, &self.date_low], zone)
    }

    pub fn end(&self, zone: &LocalZone) -> Result<Option<Timestamp>, CcdaError> {
        parse_optional_timestamp(&self.date_high, zone)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareTeamRecord {
    pub title: String,
    pub code: CodedValue,
    pub status_code: String,
    pub effective_time: String,
    pub effective_time_low: String,
    pub effective_time_high: String,
    pub members: Vec<Performer>,
    pub participants: Vec<Participant>,
    pub authors: Vec<Author>,
}

impl CareTeamRecord {
    pub fn start(&self, zone: &LocalZone) -> Result<Option<Timestamp>, CcdaError> {
        first_timestamp(&[&self.effective_time, &self.effective_time_low], zone)
    }
}

/// Bệnh sử (History of Present Illness).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HpiRecord {
    pub title: String,
    pub text: String,
    pub datetime: String,
    /// Tên người viết dạng "given family".
    pub author_name: String,
    pub address: Option<Address>,
}

impl HpiRecord {
    pub fn recorded_at(&self, zone: &LocalZone) -> Result<Option<Timestamp>, CcdaError> {
        parse_optional_timestamp(&self.datetime, zone)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub title: String,
    /// Markup của khối narrative `text` đầu tiên, chưa qua làm sạch.
    pub text: String,
}

fn first_timestamp(
    literals: &[&String],
    zone: &LocalZone,
) -> Result<Option<Timestamp>, CcdaError> {
    for literal in literals {
        if let Some(ts) = parse_optional_timestamp(literal, zone)? {
            return Ok(Some(ts));
        }
    }
    Ok(None)
}
