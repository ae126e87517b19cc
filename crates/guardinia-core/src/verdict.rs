use serde::{Serialize, Serializer};

/// Three-level outcome reported by the webhook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    /// `verde`
    Safe,
    /// `amarelo`; also used when the webhook sends nothing usable.
    #[default]
    Caution,
    /// `vermelho`
    Danger,
}

impl Verdict {
    /// Parse the webhook's `cor` value. Only the three exact labels are recognised.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "verde" => Some(Self::Safe),
            "amarelo" => Some(Self::Caution),
            "vermelho" => Some(Self::Danger),
            _ => None,
        }
    }

    /// Map an optional `cor`, falling back to [`Verdict::Caution`].
    pub fn from_label(label: Option<&str>) -> Self {
        label.and_then(Self::parse).unwrap_or_default()
    }

    /// Wire label, also used as the CSS modifier of result panels.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "verde",
            Self::Caution => "amarelo",
            Self::Danger => "vermelho",
        }
    }
}

impl Serialize for Verdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
