// src/upload_validator.rs
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::path::Path;
use tokio::fs;
use tracing::{error, info};

use crate::utils::{content_type_for, get_file_extension};

const MAX_SIZE: usize = 10 * 1024 * 1024;
const PNG_SIGNATURE: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// Multipart field a file is attached under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UploadField {
    ProfilePicture,
    Resume,
    Certifications,
}

impl UploadField {
    pub fn form_name(&self) -> &'static str {
        match self {
            Self::ProfilePicture => "profile_picture",
            Self::Resume => "resume",
            Self::Certifications => "certifications",
        }
    }

    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            Self::ProfilePicture => &["png", "jpg", "jpeg"],
            Self::Resume | Self::Certifications => &["pdf", "doc", "docx"],
        }
    }
}

/// A file picked by the user, held in memory until submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub field: UploadField,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(field: UploadField, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        Self {
            field,
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            bytes,
        }
    }

    /// Read a file from disk for `field`
    pub async fn from_path(field: UploadField, path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid file name: {}", path.display()))?;

        Ok(Self::new(field, file_name, bytes))
    }

    /// Inline `data:` URL for previewing a picture before it is uploaded
    pub fn preview_data_url(&self) -> Option<String> {
        if !self.content_type.starts_with("image/") {
            return None;
        }
        Some(format!(
            "data:{};base64,{}",
            self.content_type,
            STANDARD.encode(&self.bytes)
        ))
    }
}

#[derive(Debug, Clone)]
pub struct UploadValidationError {
    pub field: UploadField,
    pub error_type: UploadErrorType,
    pub message: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadErrorType {
    EmptyFile,
    TooLarge,
    WrongFormat,
    CorruptedFile,
}

impl UploadErrorType {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyFile => "UPLOAD_EMPTY",
            Self::TooLarge => "UPLOAD_TOO_LARGE",
            Self::WrongFormat => "UPLOAD_WRONG_FORMAT",
            Self::CorruptedFile => "UPLOAD_CORRUPTED",
        }
    }
}

pub struct UploadValidator;

impl UploadValidator {
    /// Validate an upload before it is attached to a submission
    pub fn validate(upload: &Upload) -> Result<(), UploadValidationError> {
        let result = Self::check(upload);
        match &result {
            Ok(()) => info!(
                "Upload validation passed: {} ({})",
                upload.file_name,
                upload.field.form_name()
            ),
            Err(e) => error!("Upload validation failed: {}", e.message),
        }
        result
    }

    fn check(upload: &Upload) -> Result<(), UploadValidationError> {
        let fail = |error_type, message: String, suggestion: &str| UploadValidationError {
            field: upload.field,
            error_type,
            message,
            suggestion: suggestion.to_string(),
        };

        if upload.bytes.is_empty() {
            return Err(fail(
                UploadErrorType::EmptyFile,
                format!("{} is empty", upload.file_name),
                "Please upload a valid file",
            ));
        }

        if upload.bytes.len() > MAX_SIZE {
            return Err(fail(
                UploadErrorType::TooLarge,
                format!(
                    "File too large: {:.1}MB (max 10MB)",
                    upload.bytes.len() as f64 / 1024.0 / 1024.0
                ),
                "Please compress the file and try again",
            ));
        }

        let allowed = upload.field.allowed_extensions();
        let ext = get_file_extension(&upload.file_name).unwrap_or_default();
        if !allowed.contains(&ext.as_str()) {
            return Err(fail(
                UploadErrorType::WrongFormat,
                format!("Unsupported file format: {}", upload.file_name),
                &format!("Allowed formats: {}", allowed.join(", ")),
            ));
        }

        if upload.field == UploadField::ProfilePicture {
            Self::check_image_header(upload, &ext)?;
        }

        Ok(())
    }

    fn check_image_header(upload: &Upload, ext: &str) -> Result<(), UploadValidationError> {
        let header = &upload.bytes;
        let fail = |error_type, message: &str, suggestion: &str| UploadValidationError {
            field: upload.field,
            error_type,
            message: message.to_string(),
            suggestion: suggestion.to_string(),
        };

        if header.len() < PNG_SIGNATURE.len() {
            return Err(fail(
                UploadErrorType::CorruptedFile,
                "Image file too small or corrupted",
                "Please upload a valid image file",
            ));
        }

        if ext == "png" && !header.starts_with(PNG_SIGNATURE) {
            if header.starts_with(JPEG_SIGNATURE) {
                return Err(fail(
                    UploadErrorType::WrongFormat,
                    "File is JPEG but has .png extension",
                    "Please rename file to .jpg extension or convert to PNG format",
                ));
            }
            return Err(fail(
                UploadErrorType::CorruptedFile,
                "Invalid PNG file - corrupted or wrong format",
                "Please upload a valid PNG image file",
            ));
        }

        if (ext == "jpg" || ext == "jpeg") && !header.starts_with(JPEG_SIGNATURE) {
            if header.starts_with(PNG_SIGNATURE) {
                return Err(fail(
                    UploadErrorType::WrongFormat,
                    "File is PNG but has .jpg/.jpeg extension",
                    "Please rename file to .png extension or convert to JPEG format",
                ));
            }
            return Err(fail(
                UploadErrorType::CorruptedFile,
                "Invalid JPEG file - corrupted or wrong format",
                "Please upload a valid JPEG image file",
            ));
        }

        Ok(())
    }
}
