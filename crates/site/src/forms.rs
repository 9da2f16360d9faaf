//! Multipart form parsing for the admin dialogs.

use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;

use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;

/// Content type assumed when the browser sends none.
const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// A file chosen in a form's file picker.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    /// Name of the file on the admin's machine.
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadedFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl UploadedFile {
    /// Lowercased file extension, or `bin` if there is no usable one.
    #[must_use]
    pub fn extension(&self) -> String {
        Path::new(&self.file_name)
            .extension()
            .and_then(OsStr::to_str)
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map_or_else(|| "bin".to_string(), str::to_ascii_lowercase)
    }
}

/// Text fields and files of a submitted multipart form.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: HashMap<String, UploadedFile>,
}

impl MultipartForm {
    /// Read every part of the request body.
    ///
    /// File inputs left empty (no name, no bytes) are skipped, so
    /// [`take_file`](Self::take_file) only returns files the admin chose.
    ///
    /// # Errors
    ///
    /// Returns an error if the body is not valid multipart data.
    pub async fn read(mut multipart: Multipart) -> Result<Self, MultipartError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(ToString::to_string) else {
                continue;
            };

            if let Some(file_name) = field.file_name().map(ToString::to_string) {
                let content_type = field
                    .content_type()
                    .map_or_else(|| FALLBACK_CONTENT_TYPE.to_string(), ToString::to_string);
                let bytes = field.bytes().await?;
                if file_name.is_empty() && bytes.is_empty() {
                    continue;
                }
                form.files.insert(
                    name,
                    UploadedFile {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    },
                );
            } else {
                form.fields.insert(name, field.text().await?);
            }
        }

        Ok(form)
    }

    /// Build a form directly from parts.
    #[must_use]
    pub fn from_parts(fields: &[(&str, &str)], files: Vec<(&str, UploadedFile)>) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            files: files
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        }
    }

    /// Trimmed text value, or an empty string if absent.
    #[must_use]
    pub fn text(&self, name: &str) -> String {
        self.fields
            .get(name)
            .map(|value| value.trim().to_string())
            .unwrap_or_default()
    }

    /// Whether a checkbox was ticked.
    #[must_use]
    pub fn checkbox(&self, name: &str) -> bool {
        self.fields
            .get(name)
            .is_some_and(|value| matches!(value.trim(), "on" | "true" | "1"))
    }

    /// Remove and return a chosen file.
    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }
}

/// Where the image for a saved record comes from.
#[derive(Debug, Default)]
pub enum ImageInput {
    /// A newly chosen file, to be uploaded.
    Upload(UploadedFile),
    /// A URL typed into the form.
    Url(String),
    /// Nothing chosen; keep whatever the record already has.
    #[default]
    Unchanged,
}

impl ImageInput {
    /// Resolve the image source from a file input and a URL input.
    ///
    /// A chosen file wins over a typed URL.
    pub fn from_form(form: &mut MultipartForm, file_field: &str, url_field: &str) -> Self {
        if let Some(file) = form.take_file(file_field) {
            return Self::Upload(file);
        }
        let url = form.text(url_field);
        if url.is_empty() {
            Self::Unchanged
        } else {
            Self::Url(url)
        }
    }
}

/// `Some(value)` unless the value is empty.
#[must_use]
pub fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: "image/png".to_string(),
            bytes: vec![1, 2, 3],
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(file("Catfish.JPG").extension(), "jpg");
        assert_eq!(file("photo").extension(), "bin");
        assert_eq!(file("weird.p g").extension(), "bin");
        assert_eq!(file("archive.tar.gz").extension(), "gz");
    }

    #[test]
    fn test_text_and_checkbox() {
        let form = MultipartForm::from_parts(
            &[("name", "  Smoked Fish "), ("is_featured", "on"), ("is_approved", "off")],
            vec![],
        );
        assert_eq!(form.text("name"), "Smoked Fish");
        assert_eq!(form.text("missing"), "");
        assert!(form.checkbox("is_featured"));
        assert!(!form.checkbox("is_approved"));
        assert!(!form.checkbox("missing"));
    }

    #[test]
    fn test_image_input_prefers_file() {
        let mut form = MultipartForm::from_parts(
            &[("image_url", "https://cdn.example.com/a.png")],
            vec![("image", file("a.png"))],
        );
        assert!(matches!(
            ImageInput::from_form(&mut form, "image", "image_url"),
            ImageInput::Upload(_)
        ));

        let mut form =
            MultipartForm::from_parts(&[("image_url", "https://cdn.example.com/a.png")], vec![]);
        assert!(matches!(
            ImageInput::from_form(&mut form, "image", "image_url"),
            ImageInput::Url(url) if url == "https://cdn.example.com/a.png"
        ));

        let mut form = MultipartForm::from_parts(&[("image_url", "  ")], vec![]);
        assert!(matches!(
            ImageInput::from_form(&mut form, "image", "image_url"),
            ImageInput::Unchanged
        ));
    }
}
