//! Chuẩn hoá timestamp HL7 (kiểu TS) với độ chính xác từng phần.
//!
//! Độ dài chuỗi quyết định định dạng:
//!
//! | độ dài | trường |
//! |---|---|
//! | 8 | năm, tháng, ngày |
//! | 10 | + giờ |
//! | 12 | + phút |
//! | 14 | + giây |
//! | 13, 15, 17, 19 | như 8/10/12/14 kèm hậu tố `±HHMM` |
//!
//! Không có hậu tố múi giờ nghĩa là giờ địa phương của hệ thống hiển thị, không phải UTC.

use chrono::{
    DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

use crate::CcdaError;

const OFFSET_SUFFIX_LEN: usize = 5;

/// Múi giờ địa phương của hệ thống hiển thị kết quả.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocalZone {
    /// Múi giờ của máy chạy engine.
    #[default]
    System,
    /// Độ lệch cố định so với UTC, tính bằng phút (phía đông là số dương).
    Fixed { offset_minutes: i32 },
}

impl LocalZone {
    /// Múi giờ UTC cố định, tiện cho kiểm thử.
    pub fn utc() -> Self {
        LocalZone::Fixed { offset_minutes: 0 }
    }

    /// Quy đổi giờ tường (wall clock) tại múi giờ này sang thời điểm tuyệt đối.
    pub fn resolve(&self, naive: &NaiveDateTime) -> DateTime<Utc> {
        match self {
            LocalZone::System => resolve_wall_clock(&Local, naive),
            LocalZone::Fixed { offset_minutes } => {
                resolve_wall_clock(&fixed_offset(*offset_minutes), naive)
            }
        }
    }

    /// Biểu diễn thời điểm tuyệt đối theo giờ địa phương.
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            LocalZone::System => instant.with_timezone(&Local).fixed_offset(),
            LocalZone::Fixed { offset_minutes } => {
                instant.with_timezone(&fixed_offset(*offset_minutes))
            }
        }
    }
}

fn fixed_offset(offset_minutes: i32) -> FixedOffset {
    offset_minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

fn resolve_wall_clock<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> DateTime<Utc> {
    if let Some(resolved) = tz.from_local_datetime(naive).earliest() {
        return resolved.with_timezone(&Utc);
    }
    // Wall clock nằm trong khoảng nhảy giờ mùa hè: dời tới sau khoảng trống.
    let shifted = *naive + Duration::hours(1);
    tz.from_local_datetime(&shifted)
        .earliest()
        .map(|resolved| resolved.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(naive))
}

/// Độ chính xác thể hiện trong chuỗi timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precision {
    Day,
    Hour,
    Minute,
    Second,
}

impl Precision {
    fn from_digit_len(len: usize) -> Option<Self> {
        match len {
            8 => Some(Precision::Day),
            10 => Some(Precision::Hour),
            12 => Some(Precision::Minute),
            14 => Some(Precision::Second),
            _ => None,
        }
    }
}

/// Timestamp đã chuẩn hoá.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamp {
    pub instant: DateTime<Utc>,
    pub precision: Precision,
    /// Chuỗi gốc có hậu tố `±HHMM` hay không.
    pub has_offset: bool,
}

impl Timestamp {
    /// Thời điểm theo giờ địa phương.
    pub fn local(&self, zone: &LocalZone) -> DateTime<FixedOffset> {
        zone.to_local(self.instant)
    }

    /// Chuỗi hiển thị theo quy ước US, chỉ gồm các trường có trong chuỗi gốc.
    pub fn display(&self, zone: &LocalZone) -> String {
        let local = self.local(zone);
        let pattern = match self.precision {
            Precision::Day => "%m/%d/%Y",
            Precision::Hour | Precision::Minute => "%m/%d/%Y, %-I:%M %p",
            Precision::Second => "%m/%d/%Y, %-I:%M:%S %p",
        };
        local.format(pattern).to_string()
    }
}

/// Phân tích timestamp HL7 theo bảng độ dài.
///
/// Độ dài không nằm trong bảng, ký tự không phải chữ số hoặc giá trị trường
/// vượt miền hợp lệ đều trả về [`CcdaError::InvalidDateFormat`].
pub fn parse_timestamp(literal: &str, zone: &LocalZone) -> Result<Timestamp, CcdaError> {
    if !literal.is_ascii() {
        return Err(invalid(literal));
    }

    let (digits, suffix) = match literal.len() {
        8 | 10 | 12 | 14 => (literal, None),
        13 | 15 | 17 | 19 => {
            let split = literal.len() - OFFSET_SUFFIX_LEN;
            (&literal[..split], Some(&literal[split..]))
        }
        _ => return Err(invalid(literal)),
    };

    let precision = Precision::from_digit_len(digits.len()).ok_or_else(|| invalid(literal))?;
    let naive = wall_clock(digits).ok_or_else(|| invalid(literal))?;

    let instant = match suffix {
        Some(suffix) => {
            let offset = parse_offset(suffix).ok_or_else(|| invalid(literal))?;
            offset
                .from_local_datetime(&naive)
                .single()
                .ok_or_else(|| invalid(literal))?
                .with_timezone(&Utc)
        }
        None => zone.resolve(&naive),
    };

    Ok(Timestamp {
        instant,
        precision,
        has_offset: suffix.is_some(),
    })
}

/// Phân tích chuỗi có thể rỗng; chuỗi rỗng trả về `None`.
pub fn parse_optional_timestamp(
    literal: &str,
    zone: &LocalZone,
) -> Result<Option<Timestamp>, CcdaError> {
    let trimmed = literal.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_timestamp(trimmed, zone).map(Some)
}

fn invalid(literal: &str) -> CcdaError {
    CcdaError::InvalidDateFormat(literal.to_string())
}

fn wall_clock(digits: &str) -> Option<NaiveDateTime> {
    let year = field(digits, 0, 4)? as i32;
    let month = field(digits, 4, 6)?;
    let day = field(digits, 6, 8)?;
    let hour = optional_field(digits, 8, 10)?;
    let minute = optional_field(digits, 10, 12)?;
    let second = optional_field(digits, 12, 14)?;

    NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)
}

fn field(digits: &str, start: usize, end: usize) -> Option<u32> {
    let part = digits.get(start..end)?;
    if !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

fn optional_field(digits: &str, start: usize, end: usize) -> Option<u32> {
    if digits.len() < end {
        Some(0)
    } else {
        field(digits, start, end)
    }
}

fn parse_offset(suffix: &str) -> Option<FixedOffset> {
    let sign = match suffix.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let hours = field(suffix, 1, 3)? as i32;
    let minutes = field(suffix, 3, 5)? as i32;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
