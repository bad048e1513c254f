use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::intake::domain::{
    CandidateRecord, DocumentKind, RawSubmission, Sex, StoredDocument, StoredTitle, UploadedFile,
};
use crate::intake::policy::IntakePolicy;
use crate::intake::repository::{
    CandidateRepository, ContentStore, IdentityField, RepositoryError, StorageError,
};
use crate::intake::router::intake_router;
use crate::intake::schema;
use crate::intake::service::IntakeService;

pub(super) const BOUNDARY: &str = "----EnrollmentTestBoundary";

pub(super) fn fields() -> BTreeMap<String, String> {
    let mut fields = BTreeMap::new();
    fields.insert(schema::FIELD_FULL_NAME.to_string(), "Maria da Silva".to_string());
    fields.insert(schema::FIELD_TAX_ID.to_string(), "529.982.247-25".to_string());
    fields.insert(schema::FIELD_EMAIL.to_string(), "Maria.Silva@Example.com".to_string());
    fields.insert(schema::FIELD_PHONE.to_string(), "(84) 99999-1234".to_string());
    fields.insert(
        schema::FIELD_EDUCATION_UNIT.to_string(),
        "Escola Municipal Central".to_string(),
    );
    fields.insert(schema::FIELD_CURRENT_ROLE.to_string(), "Teacher".to_string());
    fields.insert(
        schema::FIELD_ACADEMIC_BACKGROUND.to_string(),
        "Pedagogy".to_string(),
    );
    fields.insert(schema::FIELD_MANAGEMENT_EXPERIENCE.to_string(), "4".to_string());
    fields.insert(schema::FIELD_SEX.to_string(), "Feminino".to_string());
    fields
}

pub(super) fn male_fields() -> BTreeMap<String, String> {
    let mut fields = fields();
    fields.insert(schema::FIELD_FULL_NAME.to_string(), "João Souza".to_string());
    fields.insert(schema::FIELD_TAX_ID.to_string(), "111.444.777-35".to_string());
    fields.insert(schema::FIELD_EMAIL.to_string(), "joao.souza@example.com".to_string());
    fields.insert(schema::FIELD_SEX.to_string(), "Masculino".to_string());
    fields
}

pub(super) fn pdf_file(slot: &str) -> UploadedFile {
    UploadedFile {
        slot: slot.to_string(),
        filename: format!("{slot}.pdf"),
        content_type: "application/pdf".to_string(),
        bytes: b"%PDF-1.4 test".to_vec(),
    }
}

pub(super) fn image_file(slot: &str) -> UploadedFile {
    UploadedFile {
        slot: slot.to_string(),
        filename: format!("{slot}.jpg"),
        content_type: "image/jpeg".to_string(),
        bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

/// One file per slot in the applicant's required set.
pub(super) fn required_files(sex: Sex) -> Vec<UploadedFile> {
    DocumentKind::required_for(sex)
        .into_iter()
        .map(|kind| {
            if kind == DocumentKind::Photo3x4 {
                image_file(kind.field_name())
            } else {
                pdf_file(kind.field_name())
            }
        })
        .collect()
}

pub(super) fn complete_submission() -> RawSubmission {
    let mut files = required_files(Sex::Male);
    files.push(pdf_file("specialization"));
    RawSubmission {
        fields: male_fields(),
        files,
    }
}

pub(super) fn build_service(
    policy: IntakePolicy,
) -> (
    IntakeService<MemoryRepository, MemoryStore>,
    Arc<MemoryRepository>,
    Arc<MemoryStore>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let store = Arc::new(MemoryStore::default());
    let service = IntakeService::new(repository.clone(), store.clone(), policy);
    (service, repository, store)
}

#[derive(Default)]
struct MemoryRows {
    candidates: Vec<CandidateRecord>,
    documents: Vec<StoredDocument>,
    titles: Vec<StoredTitle>,
}

/// In-memory record store with the same atomic-commit and uniqueness
/// semantics the production adapter provides.
#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    rows: Arc<Mutex<MemoryRows>>,
}

impl MemoryRepository {
    pub(super) fn candidate_count(&self) -> usize {
        self.rows.lock().expect("rows mutex poisoned").candidates.len()
    }

    pub(super) fn document_count(&self) -> usize {
        self.rows.lock().expect("rows mutex poisoned").documents.len()
    }

    pub(super) fn title_count(&self) -> usize {
        self.rows.lock().expect("rows mutex poisoned").titles.len()
    }

    pub(super) fn titles(&self) -> Vec<StoredTitle> {
        self.rows.lock().expect("rows mutex poisoned").titles.clone()
    }
}

impl CandidateRepository for MemoryRepository {
    fn find_by_tax_id(&self, tax_id: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("rows mutex poisoned");
        Ok(rows
            .candidates
            .iter()
            .find(|record| record.profile.tax_id == tax_id)
            .cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        let rows = self.rows.lock().expect("rows mutex poisoned");
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
        let mut rows = self.rows.lock().expect("rows mutex poisoned");
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

/// Content store capturing every put without touching the filesystem.
#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    puts: Arc<Mutex<Vec<String>>>,
}

impl MemoryStore {
    pub(super) fn put_count(&self) -> usize {
        self.puts.lock().expect("puts mutex poisoned").len()
    }
}

impl ContentStore for MemoryStore {
    fn put(
        &self,
        _bytes: &[u8],
        applicant_key: &str,
        slot: &str,
        filename: &str,
    ) -> Result<String, StorageError> {
        let locator = format!("{applicant_key}/{slot}_{filename}");
        self.puts
            .lock()
            .expect("puts mutex poisoned")
            .push(locator.clone());
        Ok(locator)
    }
}

/// Content store that is always down.
pub(super) struct FailingStore;

impl ContentStore for FailingStore {
    fn put(
        &self,
        _bytes: &[u8],
        _applicant_key: &str,
        _slot: &str,
        _filename: &str,
    ) -> Result<String, StorageError> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }
}

/// Record store whose lookups see nothing but whose commit always collides,
/// simulating the guard/commit race losing to a concurrent submission.
pub(super) struct RacingRepository;

impl CandidateRepository for RacingRepository {
    fn find_by_tax_id(&self, _tax_id: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        Ok(None)
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        Ok(None)
    }

    fn commit(
        &self,
        _candidate: CandidateRecord,
        _documents: Vec<StoredDocument>,
        _titles: Vec<StoredTitle>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Conflict(IdentityField::TaxId))
    }
}

/// Record store that is entirely offline.
pub(super) struct UnavailableRepository;

impl CandidateRepository for UnavailableRepository {
    fn find_by_tax_id(&self, _tax_id: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<CandidateRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn commit(
        &self,
        _candidate: CandidateRecord,
        _documents: Vec<StoredDocument>,
        _titles: Vec<StoredTitle>,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) fn router_for<R, S>(service: IntakeService<R, S>) -> axum::Router
where
    R: CandidateRepository + 'static,
    S: ContentStore + 'static,
{
    intake_router(Arc::new(service))
}

/// Encode a submission as a multipart/form-data body for router tests.
pub(super) fn multipart_body(submission: &RawSubmission) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in &submission.fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    for file in &submission.files {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.slot, file.filename, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(&file.bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub(super) fn multipart_request(submission: &RawSubmission) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/v1/enrollment/applications")
        .header(
            axum::http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(multipart_body(submission)))
        .expect("request builds")
}

pub(super) async fn read_json_body(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
