use thiserror::Error;

/// Input rejected before anything is sent to the webhook.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("unsupported image format: {mime}")]
    InvalidFormat { mime: String },

    #[error("image is {size} bytes, maximum is {max}")]
    TooLarge { size: u64, max: u64 },

    #[error("nothing to analyze")]
    EmptyInput,
}
