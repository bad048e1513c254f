use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{CandidateRecord, StoredDocument, StoredTitle};

/// Which half of the applicant identity collided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityField {
    TaxId,
    Email,
}

impl IdentityField {
    pub const fn label(self) -> &'static str {
        match self {
            IdentityField::TaxId => "tax_id",
            IdentityField::Email => "email",
        }
    }
}

impl fmt::Display for IdentityField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error enumeration for record-store failures. `Conflict` is the store's
/// uniqueness constraint firing at commit time; the coordinator rewrites it
/// to a duplicate-identity error.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("an application with this {0} already exists")]
    Conflict(IdentityField),
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Durable record store abstraction so the coordinator can be exercised in
/// isolation. `commit` must insert the candidate and every attachment row in
/// one atomic operation and enforce the tax-id/email uniqueness constraints.
pub trait CandidateRepository: Send + Sync {
    fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<CandidateRecord>, RepositoryError>;
    fn find_by_email(&self, email: &str) -> Result<Option<CandidateRecord>, RepositoryError>;
    fn commit(
        &self,
        candidate: CandidateRecord,
        documents: Vec<StoredDocument>,
        titles: Vec<StoredTitle>,
    ) -> Result<(), RepositoryError>;
}

/// Content-store failure while persisting attachment bytes.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("content store unavailable: {0}")]
    Unavailable(String),
}

/// Opaque byte store for attachment contents, addressed by applicant key and
/// slot name so repeated attempts overwrite rather than accumulate.
pub trait ContentStore: Send + Sync {
    fn put(
        &self,
        bytes: &[u8],
        applicant_key: &str,
        slot: &str,
        filename: &str,
    ) -> Result<String, StorageError>;
}
