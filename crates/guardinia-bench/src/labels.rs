//! Ground-truth classes and the mapping from webhook status to class.

use serde::{Deserialize, Serialize};

/// Benchmark class of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    /// Scam.
    Golpe,
    /// Grey zone.
    Ambigua,
    /// Legitimate.
    Legitima,
}

/// All classes, in report order.
pub const CLASSES: [Label; 3] = [Label::Golpe, Label::Ambigua, Label::Legitima];

/// Score at or above which an unlabelled status counts as a scam.
pub const SCAM_SCORE: f64 = 80.0;

/// Score at or above which an unlabelled status counts as ambiguous.
pub const AMBIGUOUS_SCORE: f64 = 30.0;

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Golpe => "GOLPE",
            Self::Ambigua => "AMBIGUA",
            Self::Legitima => "LEGITIMA",
        }
    }
}

/// Map the webhook's status line (and score, as a fallback) to a class.
///
/// Status tiers, matched case-insensitively in this order:
///
/// | status contains       | class      |
/// |-----------------------|------------|
/// | `GOLPE CONFIRMADO`    | `GOLPE`    |
/// | `ALTAMENTE SUSPEITO`  | `GOLPE`    |
/// | `SUSPEITO`            | `AMBIGUA`  |
/// | `BAIXO RISCO`         | `LEGITIMA` |
/// | `SEGURO`              | `LEGITIMA` |
///
/// `ALTAMENTE SUSPEITO` must be tested before `SUSPEITO`, which it contains.
pub fn status_to_label(status: &str, score: f64) -> Label {
    let status = status.to_uppercase();
    if status.contains("GOLPE CONFIRMADO") || status.contains("ALTAMENTE SUSPEITO") {
        Label::Golpe
    } else if status.contains("SUSPEITO") {
        Label::Ambigua
    } else if status.contains("BAIXO RISCO") || status.contains("SEGURO") {
        Label::Legitima
    } else if score >= SCAM_SCORE {
        Label::Golpe
    } else if score >= AMBIGUOUS_SCORE {
        Label::Ambigua
    } else {
        Label::Legitima
    }
}
