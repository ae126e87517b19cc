//! Image uploads: format/size validation and preview decoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::InputError;

/// MIME types accepted for image analysis.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpeg", "image/jpg", "image/webp"];

/// Largest accepted image, in bytes (5 MiB).
pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

const SIZE_UNITS: &[&str] = &["Bytes", "KB", "MB", "GB"];

/// A file picked by the user for image analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Previewable form of an accepted image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePreview {
    pub file_name: String,
    /// Human-readable size, e.g. `1.5 MB`.
    pub size_label: String,
    /// `data:<mime>;base64,<payload>` URL suitable for an `<img src>`.
    pub data_url: String,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Check format first, then size. Exactly [`MAX_IMAGE_BYTES`] is accepted.
    pub fn validate(&self) -> Result<(), InputError> {
        if !ALLOWED_IMAGE_TYPES.contains(&self.mime_type.as_str()) {
            return Err(InputError::InvalidFormat {
                mime: self.mime_type.clone(),
            });
        }
        if self.size() > MAX_IMAGE_BYTES {
            return Err(InputError::TooLarge {
                size: self.size(),
                max: MAX_IMAGE_BYTES,
            });
        }
        Ok(())
    }

    /// Base64 payload without the `data:` prefix.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }

    pub fn preview(&self) -> ImagePreview {
        ImagePreview {
            file_name: self.name.clone(),
            size_label: format_file_size(self.size()),
            data_url: format!("data:{};base64,{}", self.mime_type, self.to_base64()),
        }
    }
}

/// Format a byte count with binary units and at most two decimals.
///
/// `0` → `0 Bytes`, `1536` → `1.5 KB`, `5242880` → `5 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    while unit + 1 < SIZE_UNITS.len() && bytes >= 1024u64.pow(unit as u32 + 1) {
        unit += 1;
    }

    let value = bytes as f64 / 1024f64.powi(unit as i32);
    let rounded = (value * 100.0).round() / 100.0;
    let mut text = format!("{rounded:.2}");
    if text.contains('.') {
        text = text.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    format!("{text} {}", SIZE_UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(mime: &str, len: usize) -> ImageFile {
        ImageFile::new("print.png", mime, vec![0u8; len])
    }

    #[test]
    fn allowed_types_accepted() {
        for mime in ALLOWED_IMAGE_TYPES {
            assert!(image(mime, 16).validate().is_ok(), "{mime} should pass");
        }
    }

    #[test]
    fn other_types_rejected() {
        for mime in ["image/gif", "application/pdf", "text/plain", "", "IMAGE/PNG"] {
            assert_eq!(
                image(mime, 16).validate(),
                Err(InputError::InvalidFormat {
                    mime: mime.to_string()
                })
            );
        }
    }

    #[test]
    fn exactly_five_mib_accepted() {
        assert!(image("image/png", MAX_IMAGE_BYTES as usize).validate().is_ok());
    }

    #[test]
    fn one_byte_over_rejected() {
        let err = image("image/webp", MAX_IMAGE_BYTES as usize + 1)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            InputError::TooLarge {
                size: MAX_IMAGE_BYTES + 1,
                max: MAX_IMAGE_BYTES
            }
        );
    }

    #[test]
    fn format_checked_before_size() {
        let err = image("image/gif", MAX_IMAGE_BYTES as usize + 1)
            .validate()
            .unwrap_err();
        assert!(matches!(err, InputError::InvalidFormat { .. }));
    }

    #[test]
    fn preview_is_data_url() {
        let file = ImageFile::new("a.png", "image/png", b"hello".to_vec());
        let preview = file.preview();
        assert_eq!(preview.file_name, "a.png");
        assert_eq!(preview.size_label, "5 Bytes");
        assert_eq!(preview.data_url, "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn file_sizes() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(500), "500 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(1300), "1.27 KB");
        assert_eq!(format_file_size(MAX_IMAGE_BYTES), "5 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }
}
