use super::domain::{DocumentKind, Sex, TitleKind, UploadedFile};
use super::policy::IntakePolicy;

/// Raised when a required document slot has no uploaded file (strict mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("required document missing: {kind}")]
pub struct MissingDocumentError {
    pub kind: DocumentKind,
}

/// Three-way partition of the uploaded parts. Entries in `ignored` are never
/// persisted and never MIME-checked.
#[derive(Debug, Default)]
pub struct ClassifiedUploads<'a> {
    pub documents: Vec<(DocumentKind, &'a UploadedFile)>,
    pub titles: Vec<(TitleKind, &'a UploadedFile)>,
    pub ignored: Vec<&'a UploadedFile>,
}

/// Partition the uploaded files against the applicant's required-document
/// set. Under the strict policy, the first required slot with no upload
/// aborts classification; the relaxed policy accepts whatever is present,
/// including nothing at all.
pub fn classify<'a>(
    files: &'a [UploadedFile],
    sex: Sex,
    policy: IntakePolicy,
) -> Result<ClassifiedUploads<'a>, MissingDocumentError> {
    let required = DocumentKind::required_for(sex);

    if policy.enforces_required_documents() {
        for kind in &required {
            if !files.iter().any(|file| file.slot == kind.field_name()) {
                return Err(MissingDocumentError { kind: *kind });
            }
        }
    }

    let mut classified = ClassifiedUploads::default();
    for file in files {
        if let Some(kind) = DocumentKind::from_field_name(&file.slot) {
            if required.contains(&kind) {
                classified.documents.push((kind, file));
            } else {
                // Document kind outside this applicant's required set, e.g. a
                // conscription certificate on a female applicant's submission.
                classified.ignored.push(file);
            }
        } else if let Some(kind) = TitleKind::from_field_name(&file.slot) {
            classified.titles.push((kind, file));
        } else {
            classified.ignored.push(file);
        }
    }

    Ok(classified)
}
