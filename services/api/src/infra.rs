use std::fs;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use enrollment::config::AdminConfig;
use enrollment::intake::{
    CandidateRecord, CandidateRepository, ContentStore, IdentityField, RepositoryError,
    StorageError, StoredDocument, StoredTitle,
};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Credential/cookie settings consumed by the admin session handlers.
#[derive(Clone)]
pub(crate) struct AdminState {
    pub(crate) username: String,
    pub(crate) password: Option<String>,
    pub(crate) secure_cookies: bool,
}

impl AdminState {
    pub(crate) fn new(config: &AdminConfig, secure_cookies: bool) -> Self {
        Self {
            username: config.username.clone(),
            password: config.password.clone(),
            secure_cookies,
        }
    }
}

#[derive(Default)]
struct CandidateRows {
    candidates: Vec<CandidateRecord>,
    documents: Vec<StoredDocument>,
    titles: Vec<StoredTitle>,
}

/// In-memory record store. The single mutex makes the multi-row commit
/// atomic, and the tax-id/email scans stand in for the uniqueness
/// constraints a database schema would enforce.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateRepository {
    rows: Arc<Mutex<CandidateRows>>,
}

impl CandidateRepository for InMemoryCandidateRepository {
    fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("repository mutex poisoned");
        Ok(rows
            .candidates
            .iter()
            .find(|record| record.profile.tax_id == tax_id)
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("repository mutex poisoned");
        Ok(rows
            .candidates
            .iter()
            .find(|record| record.profile.email == email)
            .cloned())
    }

    fn commit(
        &self,
        candidate: CandidateRecord,
        documents: Vec<StoredDocument>,
        titles: Vec<StoredTitle>,
    ) -> Result<(), RepositoryError> {
        let mut rows = self.rows.lock().expect("repository mutex poisoned");
        if rows
            .candidates
            .iter()
            .any(|record| record.profile.tax_id == candidate.profile.tax_id)
        {
            return Err(RepositoryError::Conflict(IdentityField::TaxId));
        }
        if rows
            .candidates
            .iter()
            .any(|record| record.profile.email == candidate.profile.email)
        {
            return Err(RepositoryError::Conflict(IdentityField::Email));
        }

        rows.candidates.push(candidate);
        rows.documents.extend(documents);
        rows.titles.extend(titles);
        Ok(())
    }
}

/// Filesystem content store. Bytes land under
/// `<root>/<applicant_key>/<slot>_<filename>`, so a retried commit for the
/// same applicant overwrites instead of accumulating.
#[derive(Clone)]
pub(crate) struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub(crate) fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

impl ContentStore for FsContentStore {
    fn put(
        &self,
        bytes: &[u8],
        applicant_key: &str,
        slot: &str,
        filename: &str,
    ) -> Result<String, StorageError> {
        let dir = self.root.join(sanitize(applicant_key));
        fs::create_dir_all(&dir)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;

        let stored_name = format!("{}_{}", sanitize(slot), sanitize(filename));
        let path = dir.join(&stored_name);
        fs::write(&path, bytes).map_err(|err| StorageError::Unavailable(err.to_string()))?;

        Ok(path.to_string_lossy().into_owned())
    }
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}
