use mime::Mime;

use super::classifier::ClassifiedUploads;
use super::domain::DocumentKind;

/// Raised when a classified file declares a MIME type outside its slot's
/// policy. The photo slot takes JPEG/PNG images; every other slot takes PDF.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFileTypeError {
    #[error("{slot} must be a JPG or PNG image, got '{got}'")]
    ExpectedImage { slot: String, got: String },
    #[error("{slot} must be a PDF file, got '{got}'")]
    ExpectedPdf { slot: String, got: String },
}

/// Enforce the per-slot MIME policy on every classified file. Runs after
/// classification and before the commit, independent of intake policy.
pub fn enforce(classified: &ClassifiedUploads<'_>) -> Result<(), InvalidFileTypeError> {
    for (kind, file) in &classified.documents {
        if *kind == DocumentKind::Photo3x4 {
            check_image(&file.slot, &file.content_type)?;
        } else {
            check_pdf(&file.slot, &file.content_type)?;
        }
    }

    for (_, file) in &classified.titles {
        check_pdf(&file.slot, &file.content_type)?;
    }

    Ok(())
}

fn check_image(slot: &str, declared: &str) -> Result<(), InvalidFileTypeError> {
    let accepted = declared
        .parse::<Mime>()
        .map(|mime| {
            mime.type_() == mime::IMAGE
                && (mime.subtype() == mime::JPEG || mime.subtype() == mime::PNG)
        })
        .unwrap_or(false);

    if accepted {
        Ok(())
    } else {
        Err(InvalidFileTypeError::ExpectedImage {
            slot: slot.to_string(),
            got: declared.to_string(),
        })
    }
}

fn check_pdf(slot: &str, declared: &str) -> Result<(), InvalidFileTypeError> {
    let accepted = declared
        .parse::<Mime>()
        .map(|mime| mime.type_() == mime::APPLICATION && mime.subtype() == mime::PDF)
        .unwrap_or(false);

    if accepted {
        Ok(())
    } else {
        Err(InvalidFileTypeError::ExpectedPdf {
            slot: slot.to_string(),
            got: declared.to_string(),
        })
    }
}
