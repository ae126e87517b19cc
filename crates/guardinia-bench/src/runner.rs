//! Sequential benchmark runner.

use std::time::{Duration, Instant};

use guardinia_client::Analyzer;
use guardinia_core::AnalysisRequest;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::{DatasetItem, Label, status_to_label};

/// Reasons kept per sample in the JSON output.
const KEPT_REASONS: usize = 3;

/// Outcome of one dataset item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub expected: Label,
    /// `None` when the request failed.
    pub predicted: Option<Label>,
    pub message: String,
    pub status: Option<String>,
    pub score: Option<f64>,
    pub confidence: Option<f64>,
    pub reasons: Vec<String>,
    pub latency_ms: f64,
    pub ai_escalated: bool,
    pub model: Option<String>,
    pub cost_usd: Option<f64>,
    pub error: Option<String>,
}

impl SampleResult {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_hit(&self) -> bool {
        self.predicted == Some(self.expected)
    }

    fn failed(item: &DatasetItem, latency_ms: f64, error: String) -> Self {
        Self {
            id: item.id.clone(),
            expected: item.category,
            predicted: None,
            message: item.message.clone(),
            status: None,
            score: None,
            confidence: None,
            reasons: Vec::new(),
            latency_ms,
            ai_escalated: false,
            model: None,
            cost_usd: None,
            error: Some(error),
        }
    }
}

/// Submit every item in order, pausing `delay` between requests.
///
/// `on_progress(done, total, item)` fires before each request.
pub async fn run_benchmark<A, F>(
    analyzer: &A,
    items: &[DatasetItem],
    delay: Duration,
    mut on_progress: F,
) -> Vec<SampleResult>
where
    A: Analyzer + ?Sized,
    F: FnMut(usize, usize, &DatasetItem),
{
    let total = items.len();
    let mut results = Vec::with_capacity(total);

    for (i, item) in items.iter().enumerate() {
        on_progress(i + 1, total, item);

        let result = match AnalysisRequest::text(&item.message) {
            Ok(request) => {
                let start = Instant::now();
                let response = analyzer.analyze(&request).await;
                let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
                match response {
                    Ok(analysis) => {
                        let score = analysis.score.unwrap_or(0.0);
                        let predicted =
                            status_to_label(analysis.status.as_deref().unwrap_or(""), score);
                        debug!(
                            index = i,
                            expected = item.category.as_str(),
                            predicted = predicted.as_str(),
                            latency_ms,
                            "sample classified"
                        );
                        SampleResult {
                            id: item.id.clone(),
                            expected: item.category,
                            predicted: Some(predicted),
                            message: item.message.clone(),
                            status: analysis.status,
                            score: Some(score),
                            confidence: analysis.confidence_percent,
                            reasons: analysis.reasons.into_iter().take(KEPT_REASONS).collect(),
                            latency_ms: round_to(latency_ms, 2),
                            ai_escalated: analysis.indicators.ai_escalated,
                            model: analysis.indicators.model,
                            cost_usd: analysis.indicators.cost_usd,
                            error: None,
                        }
                    }
                    Err(err) => {
                        warn!(index = i, error = %err, "sample request failed");
                        SampleResult::failed(item, latency_ms, err.to_string())
                    }
                }
            }
            Err(err) => SampleResult::failed(item, 0.0, err.to_string()),
        };
        results.push(result);

        if i + 1 < total && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    results
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
