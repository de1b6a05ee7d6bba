use std::fs;

use ccda_core::{CcdaConfig, ExtractorKind, LocalZone, SectionContent, SectionKey};
use ccda_extract::{assessment, care_team, encounter, parse_with_config, social_history, Document};
use chrono::{TimeZone, Utc};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn eastern() -> LocalZone {
    LocalZone::Fixed {
        offset_minutes: -300,
    }
}

fn fixture_xml() -> String {
    fs::read_to_string(fixture_path("ambulatory_summary.xml")).expect("Không đọc được tài liệu mẫu")
}

fn summary() -> ccda_core::DocumentResult {
    let xml = fixture_xml();
    let config = CcdaConfig {
        local_zone: eastern(),
        ..CcdaConfig::default()
    };
    parse_with_config(&xml, &config).expect("Không trích xuất được tài liệu mẫu")
}

#[test]
fn present_sections_follow_catalog_order() {
    let result = summary();
    let keys: Vec<SectionKey> = result.keys().collect();
    assert_eq!(
        keys,
        vec![
            SectionKey::Assessment,
            SectionKey::CareTeams,
            SectionKey::Encounters,
            SectionKey::HistoryOfPresentIllness,
            SectionKey::Medications,
            SectionKey::Problem,
            SectionKey::Results,
            SectionKey::SocialHistory,
            SectionKey::VitalSigns,
        ]
    );
    assert!(!result.contains(SectionKey::Immunizations));
}

#[test]
fn each_key_has_a_fixed_content_kind() {
    let result = summary();
    for (key, content) in result.iter() {
        assert_eq!(content.kind(), key.extractor(), "{key}");
    }
    for key in [
        SectionKey::Assessment,
        SectionKey::CareTeams,
        SectionKey::Encounters,
        SectionKey::SocialHistory,
        SectionKey::Medications,
    ] {
        assert_eq!(result.get(key).map(SectionContent::kind), Some(ExtractorKind::Raw), "{key}");
    }
}

#[test]
fn results_are_grouped_into_panels() {
    let result = summary();
    let Some(SectionContent::Results(results)) = result.get(SectionKey::Results) else {
        panic!("thiếu section kết quả xét nghiệm");
    };
    assert_eq!(results.panels.len(), 2);

    let cbc = &results.panels[0];
    assert_eq!(cbc.title, "CBC panel - Blood by Automated count");
    assert_eq!(cbc.code.code, "58410-2");
    // Locally coded platelets are not LOINC and are skipped.
    assert_eq!(cbc.items.len(), 2);
    assert_eq!(cbc.dates, vec!["20121113080000-0500", "20121114"]);

    let hemoglobin = &cbc.items[0];
    assert_eq!(hemoglobin.title, "Hemoglobin [Mass/volume] in Blood");
    assert_eq!(hemoglobin.value, "12.1");
    assert_eq!(hemoglobin.unit, "g/dL");
    assert_eq!(hemoglobin.reference_range_low, "13.2");
    assert_eq!(hemoglobin.reference_range_high, "16.6");
    assert_eq!(hemoglobin.reference_range_text, "13.2 - 16.6 g/dL");
    assert!(hemoglobin.is_out_of_range);
    let recorded = hemoglobin
        .recorded_at(&eastern())
        .expect("timestamp hợp lệ")
        .expect("có thời điểm");
    assert_eq!(
        recorded.instant,
        Utc.with_ymd_and_hms(2012, 11, 13, 13, 0, 0).unwrap()
    );

    let erythrocytes = &cbc.items[1];
    assert_eq!(erythrocytes.reference_range_text, "4.35 - 5.65 10*6/uL");
    assert!(!erythrocytes.is_out_of_range);
}

#[test]
fn every_reference_range_text_is_kept() {
    let result = summary();
    let Some(SectionContent::Results(results)) = result.get(SectionKey::Results) else {
        panic!("thiếu section kết quả xét nghiệm");
    };

    let troponin = &results.panels[1];
    // SNOMED panel code resolved through its LOINC translation.
    assert_eq!(troponin.code.code, "6598-7");
    assert_eq!(troponin.code.code_system, ccda_core::LOINC_OID);

    let item = &troponin.items[0];
    assert_eq!(item.value, "negative");
    assert_eq!(item.reference_range_text, "Negative: < 0.1");
    assert_eq!(
        item.reference_range_text_items,
        vec!["Negative: < 0.1", "Positive: >= 0.1"]
    );
    assert!(item.reference_range_low.is_empty());
    assert!(!item.is_out_of_range);
}

#[test]
fn vitals_form_one_table_by_loinc_code() {
    let result = summary();
    let Some(SectionContent::Vitals(vitals)) = result.get(SectionKey::VitalSigns) else {
        panic!("thiếu section chỉ số sinh tồn");
    };

    let codes: Vec<&str> = vitals.items.keys().map(String::as_str).collect();
    assert_eq!(codes, vec!["8867-4", "8480-6"]);

    let heart_rate = &vitals.items["8867-4"];
    let values: Vec<Option<f64>> = heart_rate.iter().map(|v| v.numeric_value()).collect();
    assert_eq!(values, vec![Some(72.0), Some(80.0)]);
    assert_eq!(heart_rate[0].unit, "/min");
    assert_eq!(heart_rate[0].title, "Heart rate");
    assert_eq!(
        heart_rate[1]
            .recorded_at(&eastern())
            .unwrap()
            .unwrap()
            .display(&eastern()),
        "11/13/2012, 9:30:00 AM"
    );
}

#[test]
fn social_history_keeps_three_levels_of_nesting() {
    let xml = fixture_xml();
    let doc = Document::parse(&xml).expect("tài liệu mẫu hợp lệ");
    let social = social_history(&doc);

    let smoking = &social.items["72166-2"];
    assert_eq!(smoking.value, "Former smoker");
    assert_eq!(smoking.status_code, "completed");
    assert!(smoking.entity_relationships.is_none());

    let tobacco = &social.items["11367-0"];
    assert_eq!(tobacco.title, "History of Tobacco use");
    assert_eq!(tobacco.datetime_low, "19950101");
    assert_eq!(tobacco.datetime_high, "20050601");
    assert_eq!(tobacco.depth(), 3);

    let children: Vec<&str> = tobacco
        .entity_relationships
        .as_ref()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(children, vec!["64234-8", "401201003"]);

    let leaf = tobacco
        .relationship("64234-8")
        .and_then(|products| products.relationship("81228-9"))
        .and_then(|cigarettes| cigarettes.relationship("8663-7"))
        .expect("mục lá ở tầng thứ ba");
    assert_eq!(leaf.value, "1");
    assert!(leaf.entity_relationships.is_none());

    // Value taken from the narrative anchor.
    assert_eq!(
        tobacco.relationship("401201003").unwrap().value,
        "Former smoker, quit 2005"
    );
}

#[test]
fn encounter_lists_one_of_each_party() {
    let xml = fixture_xml();
    let doc = Document::parse(&xml).expect("tài liệu mẫu hợp lệ");
    let encounter = encounter(&doc).expect("thiếu encounter");

    assert_eq!(encounter.title, "Office outpatient visit 15 minutes");
    assert_eq!(encounter.code.code, "99213");
    assert_eq!(encounter.date_low, "201211130800-0500");
    assert_eq!(
        encounter.start(&LocalZone::utc()).unwrap().unwrap().instant,
        Utc.with_ymd_and_hms(2012, 11, 13, 13, 0, 0).unwrap()
    );
    assert!(encounter.end(&LocalZone::utc()).unwrap().is_some());

    assert_eq!(encounter.performers.len(), 1);
    let performer = &encounter.performers[0];
    let name = performer.name.as_ref().expect("có tên bác sĩ");
    assert_eq!(name.prefix, "Dr.");
    assert_eq!(name.full_name(), "Henry Seven");
    assert_eq!(performer.specialty.display_name, "Family Medicine");
    assert_eq!(
        performer.addresses[0].single_line(),
        "1001 Village Avenue, Portland, OR 99123, US"
    );
    assert_eq!(performer.telecoms[0].value, "tel:+1(555)555-1003");

    assert_eq!(encounter.participants.len(), 1);
    let location = &encounter.participants[0];
    assert_eq!(location.type_code, "LOC");
    assert_eq!(location.role_code.code, "1160-1");
    assert_eq!(location.facility_name, "Community Urgent Care Center");
    assert_eq!(location.addresses[0].postal_code, "97266");

    assert!(encounter.authors.is_empty());

    assert_eq!(encounter.diagnoses.len(), 1);
    let diagnosis = &encounter.diagnoses[0];
    assert_eq!(diagnosis.code.code, "282291009");
    assert_eq!(diagnosis.display_name, "Acute viral pharyngitis");
    assert_eq!(diagnosis.value, "Acute viral pharyngitis");
    assert_eq!(diagnosis.status_code, "completed");
}

#[test]
fn care_team_collects_members_from_member_acts() {
    let xml = fixture_xml();
    let doc = Document::parse(&xml).expect("tài liệu mẫu hợp lệ");
    let team = care_team(&doc).expect("thiếu care team");

    assert_eq!(team.title, "Care team");
    assert_eq!(team.status_code, "active");
    assert_eq!(team.effective_time_low, "20120101");
    assert_eq!(team.authors.len(), 1);
    assert_eq!(
        team.authors[0].organization.as_ref().unwrap().name,
        "Community Health and Hospitals"
    );

    let roles: Vec<&str> = team
        .members
        .iter()
        .map(|member| member.function_code.display_name.as_str())
        .collect();
    assert_eq!(roles, vec!["primary care physician", "Registered nurse"]);
    assert_eq!(
        team.members[1].name.as_ref().unwrap().full_name(),
        "Mary Ann Nurse"
    );
}

#[test]
fn history_of_present_illness_resolves_narrative() {
    let result = summary();
    let Some(SectionContent::HistoryOfPresentIllness(Some(hpi))) =
        result.get(SectionKey::HistoryOfPresentIllness)
    else {
        panic!("thiếu section bệnh sử");
    };

    assert_eq!(hpi.title, "History of Present Illness");
    assert_eq!(hpi.text, "Sore throat for three days, no fever.");
    assert_eq!(hpi.author_name, "Henry Seven");
    assert_eq!(hpi.address.as_ref().unwrap().city, "Portland");
    assert_eq!(
        hpi.recorded_at(&eastern()).unwrap().unwrap().display(&eastern()),
        "11/13/2012, 8:05 AM"
    );
}

#[test]
fn assessment_and_raw_sections_keep_markup() {
    let xml = fixture_xml();
    let doc = Document::parse(&xml).expect("tài liệu mẫu hợp lệ");
    let assessment = assessment(&doc).expect("thiếu section đánh giá");
    assert_eq!(assessment.title, "Assessment");
    assert_eq!(
        assessment.text,
        "<list><item>Viral pharyngitis, supportive care.</item></list>"
    );

    let result = summary();
    let medications = result
        .get(SectionKey::Medications)
        .and_then(SectionContent::as_raw)
        .expect("section thuốc trả nguyên markup");
    assert!(medications.contains(r#"<templateId root="2.16.840.1.113883.10.20.22.2.1.1""#));
    assert!(medications.contains("<td>Lisinopril 10 MG Oral Tablet</td>"));
}

#[test]
fn result_serializes_with_catalog_names() {
    let result = summary();
    let json = serde_json::to_value(&result).expect("Không serialize được kết quả");

    assert_eq!(json["ASSESSMENT_SECTION"]["kind"], "raw");
    assert_eq!(json["HISTORY_OF_PRESENT_ILLNESS_SECTION"]["kind"], "history_of_present_illness");
    assert_eq!(json["PROBLEM_SECTION"]["kind"], "raw");
    assert_eq!(
        json["VITAL_SIGNS_SECTION"]["data"]["items"]["8480-6"][0]["value"],
        "128"
    );
    assert_eq!(
        json["RESULTS_SECTION"]["data"]["panels"][0]["items"][0]["is_out_of_range"],
        true
    );

    let back: ccda_core::DocumentResult =
        serde_json::from_value(json).expect("Không đọc lại được kết quả");
    assert_eq!(back, result);
}
