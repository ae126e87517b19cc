//! Analysis requests and the JSON body sent to the webhook.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;

use crate::{ImageFile, InputError};

/// Which input the user is currently filling in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum InputMode {
    #[default]
    Text,
    Image,
}

impl InputMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
        }
    }
}

/// A validated submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    Text { message: String },
    Image { image_bytes: Vec<u8>, mime_type: String },
}

impl AnalysisRequest {
    /// Build a text request from raw input. Surrounding whitespace is dropped.
    pub fn text(raw: &str) -> Result<Self, InputError> {
        let message = raw.trim();
        if message.is_empty() {
            return Err(InputError::EmptyInput);
        }
        Ok(Self::Text {
            message: message.to_string(),
        })
    }

    pub fn image(file: &ImageFile) -> Result<Self, InputError> {
        file.validate()?;
        Ok(Self::Image {
            image_bytes: file.bytes.clone(),
            mime_type: file.mime_type.clone(),
        })
    }

    pub fn mode(&self) -> InputMode {
        match self {
            Self::Text { .. } => InputMode::Text,
            Self::Image { .. } => InputMode::Image,
        }
    }

    /// Canonical webhook body. `origin` becomes the `origem` tag when set.
    pub fn to_webhook(&self, origin: Option<&str>) -> WebhookRequest {
        let origin = origin.map(str::to_string);
        match self {
            Self::Text { message } => WebhookRequest::Text {
                message: message.clone(),
                origin,
            },
            Self::Image { image_bytes, .. } => WebhookRequest::Image {
                image: BASE64.encode(image_bytes),
                kind: IMAGE_KIND,
                origin,
            },
        }
    }
}

const IMAGE_KIND: &str = "imagem";

/// JSON body posted to the webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum WebhookRequest {
    Text {
        #[serde(rename = "mensagem")]
        message: String,
        #[serde(rename = "origem", skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
    },
    Image {
        #[serde(rename = "imagem")]
        image: String,
        #[serde(rename = "tipo")]
        kind: &'static str,
        #[serde(rename = "origem", skip_serializing_if = "Option::is_none")]
        origin: Option<String>,
    },
}
