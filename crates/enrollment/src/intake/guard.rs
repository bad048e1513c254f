use super::repository::{CandidateRepository, IdentityField, RepositoryError};

/// Raised when either half of the applicant identity is already enrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("an application with this {field} already exists")]
pub struct DuplicateError {
    pub field: IdentityField,
}

/// Pre-commit identity-uniqueness check. This read is not atomic with the
/// later commit; the record store's own uniqueness constraint is the
/// correctness backstop and this check only fails fast.
pub struct DuplicateGuard<'a, R> {
    repository: &'a R,
}

impl<'a, R> DuplicateGuard<'a, R>
where
    R: CandidateRepository,
{
    pub fn new(repository: &'a R) -> Self {
        Self { repository }
    }

    pub fn ensure_unique(&self, tax_id: &str, email: &str) -> Result<(), GuardError> {
        if self.repository.find_by_tax_id(tax_id)?.is_some() {
            return Err(DuplicateError {
                field: IdentityField::TaxId,
            }
            .into());
        }

        if self.repository.find_by_email(email)?.is_some() {
            return Err(DuplicateError {
                field: IdentityField::Email,
            }
            .into());
        }

        Ok(())
    }
}

/// Guard failures: either a confirmed duplicate or a store that could not be
/// consulted at all.
#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error(transparent)]
    Duplicate(#[from] DuplicateError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
