//! Case entities, payloads and the redacted read view.

use serde::{Deserialize, Serialize};
use shared_types::{
    parse_required, Amount, BloodType, CareError, CareResult, CaseId, FieldErrors, Organ,
    Timestamp, UserId,
};
use std::fmt;
use std::str::FromStr;

use hc_05_access_policy::{CaseScope, Redaction};

use super::status::CaseStatus;

/// Label shown instead of a redacted patient's name.
pub const ANONYMOUS: &str = "Anonymous";

const MIN_PATIENT_AGE: i32 = 0;
const MAX_PATIENT_AGE: i32 = 120;

/// How soon the transplant is needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrgencyLevel {
    Critical,
    High,
    Medium,
    Low,
}

impl UrgencyLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyLevel::Critical => "critical",
            UrgencyLevel::High => "high",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::Low => "low",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = CareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Ok(UrgencyLevel::Critical),
            "high" => Ok(UrgencyLevel::High),
            "medium" => Ok(UrgencyLevel::Medium),
            "low" => Ok(UrgencyLevel::Low),
            other => Err(CareError::field(
                "urgency_level",
                format!("unknown urgency level '{}'", other),
            )),
        }
    }
}

/// Clinical details attached to a case.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalDetails {
    pub blood_type: Option<BloodType>,
    pub age: Option<u8>,
    pub lab_results: Option<String>,
    pub chronic_illnesses: Option<String>,
    pub description: Option<String>,
}

/// Grouping folder for an attached file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    MedicalRecords,
    LabResults,
    Imaging,
    Other,
}

impl FileCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::MedicalRecords => "medical_records",
            FileCategory::LabResults => "lab_results",
            FileCategory::Imaging => "imaging",
            FileCategory::Other => "other",
        }
    }
}

/// Reference to a blob held by the file store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub url: String,
    pub path: String,
    pub size: u64,
    pub content_type: String,
    pub name: String,
    pub category: FileCategory,
}

/// File contents submitted with a case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileUpload {
    pub category: FileCategory,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(category: FileCategory, filename: &str, content_type: &str, bytes: Vec<u8>) -> Self {
        Self {
            category,
            filename: filename.to_string(),
            content_type: content_type.to_string(),
            bytes,
        }
    }

    /// Blob key: `{owner}/{case}/{category}/{filename}`.
    pub fn storage_path(&self, owner: UserId, case_id: CaseId) -> String {
        let filename: String = self
            .filename
            .trim()
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        format!("{}/{}/{}/{}", owner, case_id, self.category.as_str(), filename)
    }

    fn validate(&self, max_bytes: u64, errors: &mut FieldErrors) {
        if self.filename.trim().is_empty() {
            errors.push("files", "every file needs a name");
        }
        if self.bytes.len() as u64 > max_bytes {
            errors.push(
                "files",
                format!("{} exceeds the {} byte limit", self.filename.trim(), max_bytes),
            );
        }
    }
}

/// A patient's transplant case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub patient_id: UserId,
    pub organ_needed: Organ,
    pub urgency_level: UrgencyLevel,
    pub status: CaseStatus,
    pub assigned_hospital_id: Option<UserId>,
    pub matched_donor_id: Option<UserId>,
    pub funding_goal: Amount,
    /// Only the funding ledger changes this.
    pub funding_amount: Amount,
    pub medical: MedicalDetails,
    pub files: Vec<FileRef>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Case {
    /// Ownership facts the access rules need.
    pub fn scope(&self) -> CaseScope {
        CaseScope {
            patient_id: self.patient_id,
            assigned_hospital_id: self.assigned_hospital_id,
            matched_donor_id: self.matched_donor_id,
        }
    }

    /// Adds a contribution and flips to funded once the goal is reached.
    ///
    /// Returns the previous status when a flip happened. Only waiting and
    /// matched cases flip; a case without a goal never does.
    ///
    /// # Errors
    /// - `Validation` on `amount`: the total would overflow; the case is untouched
    pub fn apply_funding(&mut self, amount: Amount, now: Timestamp) -> CareResult<Option<CaseStatus>> {
        self.funding_amount = self
            .funding_amount
            .checked_add(amount)
            .ok_or_else(|| CareError::field("amount", "would overflow the case's funding total"))?;
        self.updated_at = now;
        let reached = self.funding_goal > 0 && self.funding_amount >= self.funding_goal;
        if reached && matches!(self.status, CaseStatus::Waiting | CaseStatus::Matched) {
            let previous = self.status;
            self.status = CaseStatus::Funded;
            Ok(Some(previous))
        } else {
            Ok(None)
        }
    }
}

/// Case creation payload. Enumerations arrive as raw strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCase {
    pub organ_needed: Option<String>,
    pub urgency_level: Option<String>,
    pub blood_type: Option<String>,
    pub age: Option<i32>,
    pub lab_results: Option<String>,
    pub chronic_illnesses: Option<String>,
    pub description: Option<String>,
    pub funding_goal: Option<Amount>,
    pub files: Vec<FileUpload>,
}

/// Parsed creation payload, ready to become a [`Case`].
#[derive(Debug, Clone)]
pub struct ValidCase {
    pub organ_needed: Organ,
    pub urgency_level: UrgencyLevel,
    pub medical: MedicalDetails,
    pub funding_goal: Amount,
}

impl NewCase {
    pub fn validate(&self, max_file_bytes: u64) -> Result<ValidCase, FieldErrors> {
        let mut errors = FieldErrors::new();
        let organ_needed: Option<Organ> =
            parse_required(self.organ_needed.as_deref(), "organ_needed", &mut errors);
        let urgency_level: Option<UrgencyLevel> =
            parse_required(self.urgency_level.as_deref(), "urgency_level", &mut errors);
        let medical = parse_medical(
            self.blood_type.as_deref(),
            self.age,
            &self.lab_results,
            &self.chronic_illnesses,
            &self.description,
            &mut errors,
        );
        let funding_goal = self.funding_goal.unwrap_or(0);
        check_goal(funding_goal, &mut errors);
        for file in &self.files {
            file.validate(max_file_bytes, &mut errors);
        }

        match (organ_needed, urgency_level) {
            (Some(organ_needed), Some(urgency_level)) if errors.is_empty() => Ok(ValidCase {
                organ_needed,
                urgency_level,
                medical,
                funding_goal,
            }),
            _ => Err(errors),
        }
    }
}

/// Patient edit of case details. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseUpdate {
    pub urgency_level: Option<String>,
    pub blood_type: Option<String>,
    pub age: Option<i32>,
    pub lab_results: Option<String>,
    pub chronic_illnesses: Option<String>,
    pub description: Option<String>,
    pub funding_goal: Option<Amount>,
}

impl CaseUpdate {
    pub fn is_empty(&self) -> bool {
        self.urgency_level.is_none()
            && self.blood_type.is_none()
            && self.age.is_none()
            && self.lab_results.is_none()
            && self.chronic_illnesses.is_none()
            && self.description.is_none()
            && self.funding_goal.is_none()
    }

    /// Validates and applies the update to `case`.
    pub fn apply(&self, case: &mut Case, now: Timestamp) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        let urgency: Option<UrgencyLevel> = self
            .urgency_level
            .as_deref()
            .and_then(|raw| parse_required(Some(raw), "urgency_level", &mut errors));
        let blood_type: Option<BloodType> = self
            .blood_type
            .as_deref()
            .and_then(|raw| parse_required(Some(raw), "blood_type", &mut errors));
        let age = self.age.and_then(|age| check_age(age, &mut errors));
        if let Some(goal) = self.funding_goal {
            check_goal(goal, &mut errors);
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        if let Some(urgency) = urgency {
            case.urgency_level = urgency;
        }
        if blood_type.is_some() {
            case.medical.blood_type = blood_type;
        }
        if age.is_some() {
            case.medical.age = age;
        }
        if let Some(text) = &self.lab_results {
            case.medical.lab_results = non_blank(text);
        }
        if let Some(text) = &self.chronic_illnesses {
            case.medical.chronic_illnesses = non_blank(text);
        }
        if let Some(text) = &self.description {
            case.medical.description = non_blank(text);
        }
        if let Some(goal) = self.funding_goal {
            case.funding_goal = goal;
        }
        case.updated_at = now;
        Ok(())
    }
}

/// Case as returned to a reader, after redaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseView {
    pub id: CaseId,
    /// `None` when the patient identity is redacted.
    pub patient_id: Option<UserId>,
    pub patient_name: String,
    pub organ_needed: Organ,
    pub urgency_level: UrgencyLevel,
    pub status: CaseStatus,
    pub assigned_hospital_id: Option<UserId>,
    pub matched_donor_id: Option<UserId>,
    pub funding_goal: Amount,
    pub funding_amount: Amount,
    pub medical: MedicalDetails,
    pub files: Vec<FileRef>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CaseView {
    pub fn render(case: Case, patient_name: Option<String>, redaction: Redaction) -> Self {
        let (patient_id, patient_name) = if redaction.patient_identity {
            (None, ANONYMOUS.to_string())
        } else {
            (
                Some(case.patient_id),
                patient_name.unwrap_or_else(|| ANONYMOUS.to_string()),
            )
        };
        let matched_donor_id = if redaction.donor_identity {
            None
        } else {
            case.matched_donor_id
        };
        Self {
            id: case.id,
            patient_id,
            patient_name,
            organ_needed: case.organ_needed,
            urgency_level: case.urgency_level,
            status: case.status,
            assigned_hospital_id: case.assigned_hospital_id,
            matched_donor_id,
            funding_goal: case.funding_goal,
            funding_amount: case.funding_amount,
            medical: case.medical,
            files: case.files,
            created_at: case.created_at,
            updated_at: case.updated_at,
        }
    }
}

/// Filters for [`list_cases`](crate::ports::CaseApi::list_cases).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaseFilter {
    pub status: Option<CaseStatus>,
    pub organ: Option<Organ>,
    pub urgency: Option<UrgencyLevel>,
}

impl CaseFilter {
    pub fn matches(&self, case: &Case) -> bool {
        self.status.map_or(true, |s| case.status == s)
            && self.organ.map_or(true, |o| case.organ_needed == o)
            && self.urgency.map_or(true, |u| case.urgency_level == u)
    }
}

fn parse_medical(
    blood_type: Option<&str>,
    age: Option<i32>,
    lab_results: &Option<String>,
    chronic_illnesses: &Option<String>,
    description: &Option<String>,
    errors: &mut FieldErrors,
) -> MedicalDetails {
    let blood_type = blood_type
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .and_then(|raw| parse_required(Some(raw), "blood_type", errors));
    MedicalDetails {
        blood_type,
        age: age.and_then(|age| check_age(age, errors)),
        lab_results: lab_results.as_deref().and_then(non_blank),
        chronic_illnesses: chronic_illnesses.as_deref().and_then(non_blank),
        description: description.as_deref().and_then(non_blank),
    }
}

fn check_age(age: i32, errors: &mut FieldErrors) -> Option<u8> {
    if (MIN_PATIENT_AGE..=MAX_PATIENT_AGE).contains(&age) {
        u8::try_from(age).ok()
    } else {
        errors.push(
            "age",
            format!("must be between {} and {}", MIN_PATIENT_AGE, MAX_PATIENT_AGE),
        );
        None
    }
}

fn check_goal(goal: Amount, errors: &mut FieldErrors) {
    if goal < 0 {
        errors.push("funding_goal", "cannot be negative");
    }
}

fn non_blank(text: &str) -> Option<String> {
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}
