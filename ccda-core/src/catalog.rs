//! Danh mục section C-CDA 2.1 và định danh hệ mã dùng chung.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::CcdaError;

/// OID hệ mã LOINC.
pub const LOINC_OID: &str = "2.16.840.1.113883.6.1";

/// OID hệ mã SNOMED CT.
pub const SNOMED_CT_OID: &str = "2.16.840.1.113883.6.96";

/// Cách `parse` trích xuất một section.
///
/// Các section có bản ghi riêng nhưng không nằm ở đây (tiền sử xã hội,
/// encounter, care team, đánh giá) được trả nguyên markup trong kết quả tài liệu
/// và trích xuất theo yêu cầu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractorKind {
    /// Trả nguyên markup narrative của section.
    Raw,
    Results,
    Vitals,
    HistoryOfPresentIllness,
}

macro_rules! section_catalog {
    ($( $variant:ident => $name:literal, [$($oid:literal),+ $(,)?], $kind:ident; )+) => {
        /// Khoá section trong danh mục C-CDA 2.1.
        ///
        /// Thứ tự khai báo là thứ tự hiển thị của `DocumentResult`.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum SectionKey {
            $( $variant, )+
        }

        impl SectionKey {
            /// Toàn bộ danh mục.
            pub const ALL: &'static [SectionKey] = &[$( SectionKey::$variant ),+];

            /// Tên section dạng `RESULTS_SECTION`.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( SectionKey::$variant => $name, )+
                }
            }

            /// Các OID `templateId/@root` có thể đại diện cho section qua các phiên bản template.
            pub fn template_ids(self) -> &'static [&'static str] {
                match self {
                    $( SectionKey::$variant => &[$( $oid ),+], )+
                }
            }

            /// Bộ trích xuất được gán cho section.
            pub fn extractor(self) -> ExtractorKind {
                match self {
                    $( SectionKey::$variant => ExtractorKind::$kind, )+
                }
            }
        }

        impl FromStr for SectionKey {
            type Err = CcdaError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                match value {
                    $( $name => Ok(SectionKey::$variant), )+
                    other => Err(CcdaError::UnknownSection(other.to_string())),
                }
            }
        }
    };
}

section_catalog! {
    AdvanceDirectives => "ADVANCE_DIRECTIVES_SECTION",
        ["2.16.840.1.113883.10.20.22.2.21", "2.16.840.1.113883.10.20.22.2.21.1"], Raw;
    AllergiesAndIntolerances => "ALLERGIES_AND_INTOLERANCES_SECTION",
        ["2.16.840.1.113883.10.20.22.2.6", "2.16.840.1.113883.10.20.22.2.6.1"], Raw;
    Anesthesia => "ANESTHESIA_SECTION", ["2.16.840.1.113883.10.20.22.2.25"], Raw;
    Assessment => "ASSESSMENT_SECTION", ["2.16.840.1.113883.10.20.22.2.8"], Raw;
    AssessmentAndPlan => "ASSESSMENT_AND_PLAN_SECTION", ["2.16.840.1.113883.10.20.22.2.9"], Raw;
    CareTeams => "CARE_TEAMS_SECTION", ["2.16.840.1.113883.10.20.22.2.500"], Raw;
    ChiefComplaint => "CHIEF_COMPLAINT_SECTION", ["1.3.6.1.4.1.19376.1.5.3.1.1.13.2.1"], Raw;
    ChiefComplaintAndReasonForVisit => "CHIEF_COMPLAINT_AND_REASON_FOR_VISIT_SECTION",
        ["2.16.840.1.113883.10.20.22.2.13"], Raw;
    Complications => "COMPLICATIONS_SECTION", ["2.16.840.1.113883.10.20.22.2.37"], Raw;
    CourseOfCare => "COURSE_OF_CARE_SECTION", ["2.16.840.1.113883.10.20.22.2.64"], Raw;
    DicomObjectCatalog => "DICOM_OBJECT_CATALOG_SECTION", ["2.16.840.1.113883.10.20.6.1.1"], Raw;
    DischargeDiet => "DISCHARGE_DIET_SECTION", ["1.3.6.1.4.1.19376.1.5.3.1.3.33"], Raw;
    DischargeMedications => "DISCHARGE_MEDICATIONS_SECTION",
        ["2.16.840.1.113883.10.20.22.2.11", "2.16.840.1.113883.10.20.22.2.11.1"], Raw;
    Encounters => "ENCOUNTERS_SECTION",
        ["2.16.840.1.113883.10.20.22.2.22", "2.16.840.1.113883.10.20.22.2.22.1"], Raw;
    FamilyHistory => "FAMILY_HISTORY_SECTION", ["2.16.840.1.113883.10.20.22.2.15"], Raw;
    Findings => "FINDINGS_SECTION", ["2.16.840.1.113883.10.20.6.1.2"], Raw;
    FunctionalStatus => "FUNCTIONAL_STATUS_SECTION", ["2.16.840.1.113883.10.20.22.2.14"], Raw;
    GeneralStatus => "GENERAL_STATUS_SECTION", ["2.16.840.1.113883.10.20.2.5"], Raw;
    Goals => "GOALS_SECTION", ["2.16.840.1.113883.10.20.22.2.60"], Raw;
    HealthConcerns => "HEALTH_CONCERNS_SECTION", ["2.16.840.1.113883.10.20.22.2.58"], Raw;
    HealthStatusEvaluationsAndOutcomes => "HEALTH_STATUS_EVALUATIONS_AND_OUTCOMES_SECTION",
        ["2.16.840.1.113883.10.20.22.2.61"], Raw;
    HistoryOfPastIllness => "HISTORY_OF_PAST_ILLNESS_SECTION", ["2.16.840.1.113883.10.20.22.2.20"], Raw;
    HistoryOfPresentIllness => "HISTORY_OF_PRESENT_ILLNESS_SECTION",
        ["1.3.6.1.4.1.19376.1.5.3.1.3.4"], HistoryOfPresentIllness;
    HospitalAdmissionDiagnosis => "HOSPITAL_ADMISSION_DIAGNOSIS_SECTION",
        ["2.16.840.1.113883.10.20.22.2.43"], Raw;
    HospitalAdmissionMedications => "HOSPITAL_ADMISSION_MEDICATIONS_SECTION",
        ["2.16.840.1.113883.10.20.22.2.44"], Raw;
    HospitalConsultations => "HOSPITAL_CONSULTATIONS_SECTION", ["2.16.840.1.113883.10.20.22.2.42"], Raw;
    HospitalCourse => "HOSPITAL_COURSE_SECTION", ["1.3.6.1.4.1.19376.1.5.3.1.3.5"], Raw;
    HospitalDischargeDiagnosis => "HOSPITAL_DISCHARGE_DIAGNOSIS_SECTION",
        ["2.16.840.1.113883.10.20.22.2.24"], Raw;
    HospitalDischargeInstructions => "HOSPITAL_DISCHARGE_INSTRUCTIONS_SECTION",
        ["2.16.840.1.113883.10.20.22.2.41"], Raw;
    HospitalDischargePhysical => "HOSPITAL_DISCHARGE_PHYSICAL_SECTION",
        ["1.3.6.1.4.1.19376.1.5.3.1.3.26"], Raw;
    HospitalDischargeStudiesSummary => "HOSPITAL_DISCHARGE_STUDIES_SUMMARY_SECTION",
        ["2.16.840.1.113883.10.20.22.2.16"], Raw;
    Immunizations => "IMMUNIZATIONS_SECTION",
        ["2.16.840.1.113883.10.20.22.2.2", "2.16.840.1.113883.10.20.22.2.2.1"], Raw;
    Instructions => "INSTRUCTIONS_SECTION", ["2.16.840.1.113883.10.20.22.2.45"], Raw;
    Interventions => "INTERVENTIONS_SECTION", ["2.16.840.1.113883.10.20.21.2.3"], Raw;
    MedicalEquipment => "MEDICAL_EQUIPMENT_SECTION", ["2.16.840.1.113883.10.20.22.2.23"], Raw;
    MedicalGeneralHistory => "MEDICAL_GENERAL_HISTORY_SECTION", ["2.16.840.1.113883.10.20.22.2.39"], Raw;
    Medications => "MEDICATIONS_SECTION",
        ["2.16.840.1.113883.10.20.22.2.1", "2.16.840.1.113883.10.20.22.2.1.1"], Raw;
    MedicationsAdministered => "MEDICATIONS_ADMINISTERED_SECTION",
        ["2.16.840.1.113883.10.20.22.2.38"], Raw;
    MentalStatus => "MENTAL_STATUS_SECTION", ["2.16.840.1.113883.10.20.22.2.56"], Raw;
    Notes => "NOTES_SECTION", ["2.16.840.1.113883.10.20.22.2.65"], Raw;
    Nutrition => "NUTRITION_SECTION", ["2.16.840.1.113883.10.20.22.2.57"], Raw;
    Objective => "OBJECTIVE_SECTION", ["2.16.840.1.113883.10.20.21.2.1"], Raw;
    OperativeNoteFluids => "OPERATIVE_NOTE_FLUIDS_SECTION", ["2.16.840.1.113883.10.20.7.12"], Raw;
    OperativeNoteSurgicalProcedure => "OPERATIVE_NOTE_SURGICAL_PROCEDURE_SECTION",
        ["2.16.840.1.113883.10.20.7.14"], Raw;
    Payers => "PAYERS_SECTION", ["2.16.840.1.113883.10.20.22.2.18"], Raw;
    PhysicalExam => "PHYSICAL_EXAM_SECTION", ["2.16.840.1.113883.10.20.2.10"], Raw;
    PlanOfTreatment => "PLAN_OF_TREATMENT_SECTION", ["2.16.840.1.113883.10.20.22.2.10"], Raw;
    PlannedProcedure => "PLANNED_PROCEDURE_SECTION", ["2.16.840.1.113883.10.20.22.2.30"], Raw;
    PostoperativeDiagnosis => "POSTOPERATIVE_DIAGNOSIS_SECTION", ["2.16.840.1.113883.10.20.22.2.35"], Raw;
    PostprocedureDiagnosis => "POSTPROCEDURE_DIAGNOSIS_SECTION", ["2.16.840.1.113883.10.20.22.2.36"], Raw;
    PreoperativeDiagnosis => "PREOPERATIVE_DIAGNOSIS_SECTION", ["2.16.840.1.113883.10.20.22.2.34"], Raw;
    Problem => "PROBLEM_SECTION",
        ["2.16.840.1.113883.10.20.22.2.5", "2.16.840.1.113883.10.20.22.2.5.1"], Raw;
    ProcedureDescription => "PROCEDURE_DESCRIPTION_SECTION", ["2.16.840.1.113883.10.20.22.2.27"], Raw;
    ProcedureDisposition => "PROCEDURE_DISPOSITION_SECTION", ["2.16.840.1.113883.10.20.18.2.12"], Raw;
    ProcedureEstimatedBloodLoss => "PROCEDURE_ESTIMATED_BLOOD_LOSS_SECTION",
        ["2.16.840.1.113883.10.20.18.2.9"], Raw;
    ProcedureFindings => "PROCEDURE_FINDINGS_SECTION", ["2.16.840.1.113883.10.20.22.2.28"], Raw;
    ProcedureImplants => "PROCEDURE_IMPLANTS_SECTION", ["2.16.840.1.113883.10.20.22.2.40"], Raw;
    ProcedureIndications => "PROCEDURE_INDICATIONS_SECTION", ["2.16.840.1.113883.10.20.22.2.29"], Raw;
    ProcedureSpecimensTaken => "PROCEDURE_SPECIMENS_TAKEN_SECTION",
        ["2.16.840.1.113883.10.20.22.2.31"], Raw;
    Procedures => "PROCEDURES_SECTION",
        ["2.16.840.1.113883.10.20.22.2.7", "2.16.840.1.113883.10.20.22.2.7.1"], Raw;
    ReasonForReferral => "REASON_FOR_REFERRAL_SECTION", ["1.3.6.1.4.1.19376.1.5.3.1.3.1"], Raw;
    ReasonForVisit => "REASON_FOR_VISIT_SECTION", ["2.16.840.1.113883.10.20.22.2.12"], Raw;
    Results => "RESULTS_SECTION",
        ["2.16.840.1.113883.10.20.22.2.3", "2.16.840.1.113883.10.20.22.2.3.1"], Results;
    ReviewOfSystems => "REVIEW_OF_SYSTEMS_SECTION", ["1.3.6.1.4.1.19376.1.5.3.1.3.18"], Raw;
    SocialHistory => "SOCIAL_HISTORY_SECTION", ["2.16.840.1.113883.10.20.22.2.17"], Raw;
    Subjective => "SUBJECTIVE_SECTION", ["2.16.840.1.113883.10.20.21.2.2"], Raw;
    SurgicalDrains => "SURGICAL_DRAINS_SECTION", ["2.16.840.1.113883.10.20.7.13"], Raw;
    VitalSigns => "VITAL_SIGNS_SECTION",
        ["2.16.840.1.113883.10.20.22.2.4", "2.16.840.1.113883.10.20.22.2.4.1"], Vitals;
}

impl fmt::Display for SectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for SectionKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for SectionKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}
