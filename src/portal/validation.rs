use crate::types::catalog;

const MAX_FILENAME_LEN: usize = 255;
const MAX_TEXT_LEN: usize = 200;
const PDF_MAGIC: &[u8] = b"%PDF-";

/// Requires a non-blank value.
pub fn validate_required(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    Ok(())
}

/// Requires one of the catalog options; the unset placeholder never passes.
pub fn validate_choice(value: &str, field: &str, options: &[&str]) -> Result<(), String> {
    let value = value.trim();
    if catalog::is_unset(Some(value)) {
        return Err(format!("Please select a {field}"));
    }
    if !options.iter().any(|option| option.eq_ignore_ascii_case(value)) {
        return Err(format!(
            "{field} must be one of: {}",
            options.join(", ")
        ));
    }
    Ok(())
}

pub fn validate_filename(filename: &str) -> Result<(), String> {
    let filename = filename.trim();
    if filename.is_empty() {
        return Err("File name cannot be empty".to_string());
    }
    if filename.len() > MAX_FILENAME_LEN {
        return Err(format!(
            "File name cannot exceed {MAX_FILENAME_LEN} characters"
        ));
    }
    if filename.contains(['/', '\\']) {
        return Err("File name cannot contain path separators".to_string());
    }
    Ok(())
}

/// Only PDFs are accepted: a `.pdf` name and the `%PDF-` header.
pub fn validate_pdf(filename: &str, bytes: &[u8]) -> Result<(), String> {
    let is_pdf_name = filename
        .trim()
        .rsplit_once('.')
        .is_some_and(|(stem, ext)| !stem.is_empty() && ext.eq_ignore_ascii_case("pdf"));
    if !is_pdf_name {
        return Err("Only .pdf files can be uploaded".to_string());
    }
    if !bytes.starts_with(PDF_MAGIC) {
        return Err("File is not a PDF document".to_string());
    }
    Ok(())
}

pub fn validate_subject(subject: &str) -> Result<(), String> {
    validate_required(subject, "Subject")?;
    if subject.trim().len() > MAX_TEXT_LEN {
        return Err(format!("Subject cannot exceed {MAX_TEXT_LEN} characters"));
    }
    Ok(())
}

pub fn validate_form_link(link: &str) -> Result<(), String> {
    let link = link.trim();
    validate_required(link, "Form link")?;
    if !(link.starts_with("https://") || link.starts_with("http://")) {
        return Err("Form link must be an http or https URL".to_string());
    }
    if link.contains(char::is_whitespace) {
        return Err("Form link cannot contain whitespace".to_string());
    }
    Ok(())
}
