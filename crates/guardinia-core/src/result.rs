//! Webhook responses, read tolerantly.
//!
//! The webhook's JSON is treated as loosely typed: any field that is missing
//! or has the wrong type is simply absent. Only a body that is not JSON at
//! all is an error.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::Verdict;

/// Parsed analysis outcome.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct AnalysisResult {
    pub verdict: Verdict,
    /// Raw `cor` as received, kept for logging unrecognised values.
    pub verdict_label: Option<String>,
    pub recommended_action: Option<String>,
    pub reasons: Vec<String>,
    pub confidence_percent: Option<f64>,
    /// OCR text extracted from a submitted image.
    pub extracted_text: Option<String>,
    pub details: Option<String>,
    /// Free-form status line, e.g. `🟡 SUSPEITO`.
    pub status: Option<String>,
    pub score: Option<f64>,
    pub indicators: Indicators,
}

/// Technical indicators about how the webhook reached its verdict.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Indicators {
    /// The webhook escalated to a hosted model (`fusao_aplicada`).
    pub ai_escalated: bool,
    pub model: Option<String>,
    pub cost_usd: Option<f64>,
}

impl AnalysisResult {
    /// Parse a response body.
    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(&value))
    }

    /// Interpret an already-decoded JSON value. Never fails.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };

        let verdict_label = string_field(obj, "cor");
        let verdict = Verdict::from_label(verdict_label.as_deref());
        if let Some(label) = verdict_label.as_deref()
            && Verdict::parse(label).is_none()
        {
            tracing::debug!(label, "unrecognised verdict, using caution");
        }

        let reasons = obj
            .get("motivos")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let indicators = obj
            .get("indicadores")
            .and_then(Value::as_object)
            .map(|ind| Indicators {
                ai_escalated: ind
                    .get("fusao_aplicada")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                model: string_field(ind, "bedrock_modelo"),
                cost_usd: number_field(ind, "bedrock_custo_usd"),
            })
            .unwrap_or_default();

        Self {
            verdict,
            verdict_label,
            recommended_action: string_field(obj, "acao_recomendada"),
            reasons,
            confidence_percent: number_field(obj, "confianca"),
            extracted_text: string_field(obj, "texto_analisado"),
            details: string_field(obj, "detalhes"),
            status: string_field(obj, "status"),
            score: number_field(obj, "score"),
            indicators,
        }
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Numbers may arrive as JSON numbers or numeric strings. Non-finite values are absent.
fn number_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    let value = match obj.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    value.filter(|v: &f64| v.is_finite())
}
