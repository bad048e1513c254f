use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier wrapper for committed candidate applications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

impl ApplicantId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for ApplicantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Declared sex of the applicant, used only to derive the conditional
/// document requirements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const fn label(self) -> &'static str {
        match self {
            Sex::Male => "Masculino",
            Sex::Female => "Feminino",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value {
            "Masculino" => Some(Sex::Male),
            "Feminino" => Some(Sex::Female),
            _ => None,
        }
    }
}

/// Required-category document kinds. The `field_name` doubles as the
/// multipart slot carrying the file and as the stored business identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Rg,
    Cpf,
    ProofOfResidence,
    Photo3x4,
    ProfessionalQualification,
    ExperienceDeclaration,
    VoterTitle,
    ConscriptionCertificate,
}

impl DocumentKind {
    pub const fn field_name(self) -> &'static str {
        match self {
            DocumentKind::Rg => "rg",
            DocumentKind::Cpf => "cpf",
            DocumentKind::ProofOfResidence => "proof_of_residence",
            DocumentKind::Photo3x4 => "photo_3x4",
            DocumentKind::ProfessionalQualification => "professional_qualification",
            DocumentKind::ExperienceDeclaration => "experience_declaration",
            DocumentKind::VoterTitle => "voter_title",
            DocumentKind::ConscriptionCertificate => "conscription_certificate",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "rg" => Some(DocumentKind::Rg),
            "cpf" => Some(DocumentKind::Cpf),
            "proof_of_residence" => Some(DocumentKind::ProofOfResidence),
            "photo_3x4" => Some(DocumentKind::Photo3x4),
            "professional_qualification" => Some(DocumentKind::ProfessionalQualification),
            "experience_declaration" => Some(DocumentKind::ExperienceDeclaration),
            "voter_title" => Some(DocumentKind::VoterTitle),
            "conscription_certificate" => Some(DocumentKind::ConscriptionCertificate),
            _ => None,
        }
    }

    /// The conditionally-required set for an applicant, in the stable order
    /// used when reporting the first missing document.
    pub fn required_for(sex: Sex) -> Vec<DocumentKind> {
        let mut kinds = vec![
            DocumentKind::Rg,
            DocumentKind::Cpf,
            DocumentKind::ProofOfResidence,
            DocumentKind::Photo3x4,
            DocumentKind::ProfessionalQualification,
            DocumentKind::ExperienceDeclaration,
            DocumentKind::VoterTitle,
        ];
        if sex == Sex::Male {
            kinds.push(DocumentKind::ConscriptionCertificate);
        }
        kinds
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Optional supplementary-qualification kinds. `TeachingService` is the one
/// entry that normally carries no file, only a declared numeric value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TitleKind {
    Specialization,
    Masters,
    Doctorate,
    TeachingService,
}

impl TitleKind {
    pub const fn field_name(self) -> &'static str {
        match self {
            TitleKind::Specialization => "specialization",
            TitleKind::Masters => "masters",
            TitleKind::Doctorate => "doctorate",
            TitleKind::TeachingService => "teaching_service",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        match name {
            "specialization" => Some(TitleKind::Specialization),
            "masters" => Some(TitleKind::Masters),
            "doctorate" => Some(TitleKind::Doctorate),
            "teaching_service" => Some(TitleKind::TeachingService),
            _ => None,
        }
    }
}

impl fmt::Display for TitleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field_name())
    }
}

/// One part of the multipart payload that carried a file. `slot` is the form
/// field name the part was posted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub slot: String,
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Raw submission as extracted from the wire: text fields keyed by name plus
/// the uploaded file parts, untouched by any validation.
#[derive(Debug, Clone, Default)]
pub struct RawSubmission {
    pub fields: BTreeMap<String, String>,
    pub files: Vec<UploadedFile>,
}

/// Validated, normalized candidate data produced by the schema validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub full_name: String,
    /// Bare 11-digit form; uniqueness is checked against this normalization.
    pub tax_id: String,
    /// Lowercased.
    pub email: String,
    pub phone: String,
    pub education_unit: String,
    pub current_role: String,
    pub academic_background: String,
    pub management_experience_years: u32,
    pub sex: Sex,
    /// Declared years of teaching service; persisted as a numeric title when
    /// strictly positive.
    pub teaching_service_years: Option<f64>,
}

/// Durable candidate row, created atomically with its attachments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub id: ApplicantId,
    pub profile: CandidateProfile,
    pub created_at: DateTime<Utc>,
}

impl CandidateRecord {
    pub fn new(id: ApplicantId, profile: CandidateProfile) -> Self {
        Self {
            id,
            profile,
            created_at: Utc::now(),
        }
    }
}

/// Metadata row for one required-category attachment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredDocument {
    pub kind: DocumentKind,
    pub filename: String,
    pub locator: String,
    pub content_type: String,
    pub size: u64,
    pub applicant_id: ApplicantId,
}

/// Metadata row for one optional title. File attributes are absent for the
/// numeric teaching-service entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTitle {
    pub kind: TitleKind,
    pub filename: Option<String>,
    pub locator: Option<String>,
    pub content_type: Option<String>,
    pub size: Option<u64>,
    pub value: Option<f64>,
    pub description: Option<String>,
    pub applicant_id: ApplicantId,
}

/// Outcome handed back to the caller. `applicant_id` is `None` only for the
/// relaxed-mode synthetic result that was never durably stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionOutcome {
    pub protocol: String,
    pub applicant_id: Option<ApplicantId>,
    pub documents_count: usize,
    pub titles_count: usize,
}
