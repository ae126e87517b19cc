//! Short-lived toast notifications.

use guardinia_core::{InputError, InputMode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    /// User-facing notice for a rejected input. Empty input is a warning, the rest are errors.
    pub fn for_input_error(err: &InputError, mode: InputMode) -> Self {
        match err {
            InputError::InvalidFormat { .. } => {
                Self::new(NoticeLevel::Error, "Formato inválido! Use PNG, JPG ou WEBP")
            }
            InputError::TooLarge { .. } => {
                Self::new(NoticeLevel::Error, "Arquivo muito grande! Máximo 5MB")
            }
            InputError::EmptyInput => match mode {
                InputMode::Text => {
                    Self::new(NoticeLevel::Warning, "Digite uma mensagem para analisar.")
                }
                InputMode::Image => {
                    Self::new(NoticeLevel::Warning, "Selecione uma imagem para analisar.")
                }
            },
        }
    }
}
