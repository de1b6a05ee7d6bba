//! Bridge WASM <-> JavaScript trung lập framework.

use ccda_core::{parse_timestamp, CcdaConfig, CcdaError, LocalZone, SectionKey};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
struct JsCcdaConfig {
    /// Độ lệch múi giờ của người xem, tính bằng phút; bỏ trống để dùng múi giờ máy.
    #[serde(default)]
    utc_offset_minutes: Option<i32>,
    /// Tên section dạng `RESULTS_SECTION`.
    #[serde(default)]
    sections: Option<Vec<String>>,
}

impl TryFrom<JsCcdaConfig> for CcdaConfig {
    type Error = CcdaError;

    fn try_from(cfg: JsCcdaConfig) -> Result<Self, Self::Error> {
        let mut base = CcdaConfig::default();
        if let Some(offset_minutes) = cfg.utc_offset_minutes {
            base.local_zone = LocalZone::Fixed { offset_minutes };
        }
        if let Some(names) = cfg.sections {
            let keys = names
                .iter()
                .map(|name| name.parse::<SectionKey>())
                .collect::<Result<Vec<_>, _>>()?;
            base.sections = Some(keys);
        }
        Ok(base)
    }
}

fn zone_for(utc_offset_minutes: Option<i32>) -> LocalZone {
    utc_offset_minutes
        .map(|offset_minutes| LocalZone::Fixed { offset_minutes })
        .unwrap_or_default()
}

/// Trích xuất toàn bộ section của một tài liệu C-CDA.
#[wasm_bindgen]
pub fn parse_document(xml: &str, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsCcdaConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            CcdaConfig::try_from(cfg).map_err(|err| JsValue::from_str(&format_ccda_error(err)))?
        }
        None => CcdaConfig::default(),
    };

    let result = ccda_extract::parse_with_config(xml, &cfg)
        .map_err(|err| JsValue::from_str(&format_ccda_error(err)))?;

    to_value(&result).map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

/// Hiển thị một timestamp HL7 theo múi giờ người xem.
#[wasm_bindgen]
pub fn format_timestamp(literal: &str, utc_offset_minutes: Option<i32>) -> Result<String, JsValue> {
    let zone = zone_for(utc_offset_minutes);
    parse_timestamp(literal, &zone)
        .map(|ts| ts.display(&zone))
        .map_err(|err| JsValue::from_str(&format_ccda_error(err)))
}

fn format_ccda_error(err: CcdaError) -> String {
    format!("C-CDA error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn js_config(json: &str) -> JsCcdaConfig {
        serde_json::from_str(json).expect("config JSON hợp lệ")
    }

    #[test]
    fn empty_config_keeps_defaults() {
        let cfg = CcdaConfig::try_from(js_config("{}")).unwrap();
        assert_eq!(cfg, CcdaConfig::default());
    }

    #[test]
    fn offset_and_sections_are_applied() {
        let cfg = CcdaConfig::try_from(js_config(
            r#"{"utc_offset_minutes": -300, "sections": ["RESULTS_SECTION", "VITAL_SIGNS_SECTION"]}"#,
        ))
        .unwrap();
        assert_eq!(cfg.local_zone, LocalZone::Fixed { offset_minutes: -300 });
        assert_eq!(
            cfg.sections,
            Some(vec![SectionKey::Results, SectionKey::VitalSigns])
        );
    }

    #[test]
    fn unknown_section_name_is_rejected() {
        let err = CcdaConfig::try_from(js_config(r#"{"sections": ["NOT_A_SECTION"]}"#)).unwrap_err();
        assert!(matches!(err, CcdaError::UnknownSection(name) if name == "NOT_A_SECTION"));
    }

    #[test]
    fn zone_defaults_to_system() {
        assert_eq!(zone_for(None), LocalZone::System);
        assert_eq!(zone_for(Some(60)), LocalZone::Fixed { offset_minutes: 60 });
    }
}
