//! Candidate submission intake: multipart field/file separation, schema
//! validation, conditional document requirements, duplicate-identity
//! rejection, atomic commit, and protocol-number issuance, under a strict or
//! relaxed operating policy.

pub mod classifier;
pub mod domain;
pub mod files;
pub mod guard;
pub mod policy;
pub mod protocol;
pub mod repository;
pub mod router;
pub mod schema;
pub mod service;

#[cfg(test)]
mod tests;

pub use classifier::{ClassifiedUploads, MissingDocumentError};
pub use domain::{
    ApplicantId, CandidateProfile, CandidateRecord, DocumentKind, RawSubmission, Sex,
    StoredDocument, StoredTitle, SubmissionOutcome, TitleKind, UploadedFile,
};
pub use files::InvalidFileTypeError;
pub use guard::{DuplicateError, DuplicateGuard, GuardError};
pub use policy::IntakePolicy;
pub use repository::{
    CandidateRepository, ContentStore, IdentityField, RepositoryError, StorageError,
};
pub use router::{intake_router, SubmissionResponse};
pub use schema::ValidationError;
pub use service::{IntakeError, IntakeService, TEACHING_SERVICE_DESCRIPTION};
