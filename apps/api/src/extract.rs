//! Document text extraction for uploaded resumes and job descriptions.
//!
//! Dispatches on the file extension: PDF and DOCX are parsed, plain text is
//! decoded as UTF-8, everything else is rejected. Callers treat the output
//! as an opaque string.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("could not read document: {0}")]
    CorruptDocument(String),
}

/// Extracts plain text from an uploaded document, dispatching on the
/// lowercased file extension. Legacy `.doc` is not supported.
pub fn extract_text(file_name: &str, data: &[u8]) -> Result<String, ExtractError> {
    match extension(file_name).as_str() {
        "pdf" => extract_text_pdf(data),
        "docx" => extract_text_docx(data),
        "txt" => String::from_utf8(data.to_vec())
            .map_err(|e| ExtractError::CorruptDocument(e.to_string())),
        ext => Err(ExtractError::UnsupportedFormat(if ext.is_empty() {
            file_name.to_string()
        } else {
            ext.to_string()
        })),
    }
}

/// Candidate display name = filename with the final extension stripped.
pub fn candidate_name_from_filename(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

fn extension(file_name: &str) -> String {
    std::path::Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn extract_text_pdf(data: &[u8]) -> Result<String, ExtractError> {
    let text = pdf_extract::extract_text_from_mem(data)
        .map_err(|e| ExtractError::CorruptDocument(e.to_string()))?;

    if text.trim().is_empty() {
        return Err(ExtractError::CorruptDocument(
            "no text extracted from PDF".to_string(),
        ));
    }
    Ok(text)
}

fn extract_text_docx(data: &[u8]) -> Result<String, ExtractError> {
    let docx =
        docx_rs::read_docx(data).map_err(|e| ExtractError::CorruptDocument(e.to_string()))?;

    let mut text = String::new();
    for child in docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            for para_child in paragraph.children {
                if let docx_rs::ParagraphChild::Run(run) = para_child {
                    for run_child in run.children {
                        if let docx_rs::RunChild::Text(t) = run_child {
                            text.push_str(&t.text);
                        }
                    }
                }
            }
            text.push('\n');
        }
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_text() {
        let text = extract_text("resume.txt", b"Alice\nRust engineer").unwrap();
        assert_eq!(text, "Alice\nRust engineer");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let text = extract_text("resume.TXT", b"hello").unwrap();
        assert_eq!(text, "hello");
    }

    #[test]
    fn test_unsupported_extension() {
        let err = extract_text("resume.odt", b"irrelevant").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
        assert!(err.to_string().contains("odt"));
    }

    #[test]
    fn test_legacy_doc_is_unsupported() {
        let err = extract_text("resume.doc", b"irrelevant").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_extension_is_unsupported() {
        let err = extract_text("resume", b"irrelevant").unwrap_err();
        assert!(matches!(err, ExtractError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_invalid_utf8_txt_is_corrupt() {
        let err = extract_text("resume.txt", &[0xff, 0xfe, 0x00]).unwrap_err();
        assert!(matches!(err, ExtractError::CorruptDocument(_)));
    }

    #[test]
    fn test_garbage_pdf_is_corrupt() {
        let err = extract_text("resume.pdf", b"not a pdf at all").unwrap_err();
        assert!(matches!(err, ExtractError::CorruptDocument(_)));
    }

    #[test]
    fn test_candidate_name_strips_extension() {
        assert_eq!(candidate_name_from_filename("Alice Smith.pdf"), "Alice Smith");
        assert_eq!(
            candidate_name_from_filename("bob.resume.docx"),
            "bob.resume"
        );
    }

    #[test]
    fn test_candidate_name_without_extension() {
        assert_eq!(candidate_name_from_filename("alice"), "alice");
        assert_eq!(candidate_name_from_filename(".hidden"), ".hidden");
    }
}
