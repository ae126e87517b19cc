//! Classification and latency metrics over a benchmark run.
//!
//! Failed samples count toward `errors` and nothing else. Per-class figures
//! are rounded to 4 decimals, latencies to 1, cost to 6.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::runner::round_to;
use crate::{CLASSES, Label, SampleResult};

/// Hits kept as examples.
const HIT_EXAMPLES: usize = 5;
/// Misses kept as examples.
const MISS_EXAMPLES: usize = 10;
/// Model name used when the webhook escalated without naming one.
const UNKNOWN_MODEL: &str = "unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total: usize,
    pub valid: usize,
    pub errors: usize,
    pub correct: usize,
    pub accuracy: f64,
    pub accuracy_pct: f64,
    pub macro_f1: f64,
    pub per_class: BTreeMap<Label, ClassMetrics>,
    /// Rows are the real class, columns the predicted one.
    pub confusion: BTreeMap<Label, BTreeMap<Label, usize>>,
    pub latency: LatencyStats,
    pub escalation: EscalationStats,
    /// Only classes with at least one valid sample.
    pub score_stats: BTreeMap<Label, ScoreStats>,
    pub hits: Vec<SampleResult>,
    pub misses: Vec<SampleResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassMetrics {
    pub tp: usize,
    pub fp: usize,
    #[serde(rename = "fn")]
    pub fn_: usize,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// Latencies in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LatencyStats {
    pub mean_ms: f64,
    pub median_ms: f64,
    pub p90_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub stdev_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct EscalationStats {
    pub total: usize,
    pub rate_pct: f64,
    pub by_category: BTreeMap<Label, usize>,
    pub by_model: BTreeMap<String, usize>,
    pub total_cost_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

pub fn compute_metrics(results: &[SampleResult]) -> Metrics {
    let mut confusion: BTreeMap<Label, BTreeMap<Label, usize>> = CLASSES
        .iter()
        .map(|&real| (real, CLASSES.iter().map(|&pred| (pred, 0)).collect()))
        .collect();

    let mut latencies = Vec::new();
    let mut escalation = EscalationStats::default();
    let mut scores: BTreeMap<Label, Vec<f64>> = BTreeMap::new();
    let mut hits = Vec::new();
    let mut misses = Vec::new();
    let mut errors = 0;

    for sample in results {
        let Some(predicted) = sample.predicted.filter(|_| !sample.is_error()) else {
            errors += 1;
            continue;
        };
        let real = sample.expected;
        latencies.push(sample.latency_ms);

        if let Some(row) = confusion.get_mut(&real) {
            *row.entry(predicted).or_insert(0) += 1;
        }

        if sample.ai_escalated {
            escalation.total += 1;
            *escalation.by_category.entry(real).or_insert(0) += 1;
            let model = sample.model.as_deref().unwrap_or(UNKNOWN_MODEL);
            *escalation.by_model.entry(model.to_string()).or_insert(0) += 1;
        }
        escalation.total_cost_usd += sample.cost_usd.unwrap_or(0.0);

        scores
            .entry(real)
            .or_default()
            .push(sample.score.unwrap_or(0.0));

        if predicted == real {
            hits.push(sample);
        } else {
            misses.push(sample);
        }
    }

    let valid = results.len() - errors;
    let cell = |real: Label, pred: Label| confusion[&real][&pred];
    let correct: usize = CLASSES.iter().map(|&c| cell(c, c)).sum();
    let accuracy = ratio(correct, valid);

    let per_class: BTreeMap<Label, ClassMetrics> = CLASSES
        .iter()
        .map(|&c| {
            let tp = cell(c, c);
            let fp: usize = CLASSES.iter().filter(|&&o| o != c).map(|&o| cell(o, c)).sum();
            let fn_: usize = CLASSES.iter().filter(|&&o| o != c).map(|&o| cell(c, o)).sum();
            let precision = ratio(tp, tp + fp);
            let recall = ratio(tp, tp + fn_);
            let f1 = if precision + recall > 0.0 {
                2.0 * precision * recall / (precision + recall)
            } else {
                0.0
            };
            let metrics = ClassMetrics {
                tp,
                fp,
                fn_,
                precision: round_to(precision, 4),
                recall: round_to(recall, 4),
                f1: round_to(f1, 4),
                support: confusion[&c].values().sum(),
            };
            (c, metrics)
        })
        .collect();

    let macro_f1 = per_class.values().map(|m| m.f1).sum::<f64>() / CLASSES.len() as f64;

    escalation.rate_pct = round_to(ratio(escalation.total, valid) * 100.0, 1);
    escalation.total_cost_usd = round_to(escalation.total_cost_usd, 6);

    let score_stats = scores
        .into_iter()
        .map(|(label, values)| {
            let stats = ScoreStats {
                mean: round_to(mean(&values), 1),
                median: round_to(median(&values), 1),
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            };
            (label, stats)
        })
        .collect();

    Metrics {
        total: results.len(),
        valid,
        errors,
        correct,
        accuracy: round_to(accuracy, 4),
        accuracy_pct: round_to(accuracy * 100.0, 2),
        macro_f1: round_to(macro_f1, 4),
        per_class,
        confusion,
        latency: latency_stats(&latencies),
        escalation,
        score_stats,
        hits: hits.into_iter().take(HIT_EXAMPLES).cloned().collect(),
        misses: misses.into_iter().take(MISS_EXAMPLES).cloned().collect(),
    }
}

fn latency_stats(latencies: &[f64]) -> LatencyStats {
    if latencies.is_empty() {
        return LatencyStats::default();
    }
    let mut sorted = latencies.to_vec();
    sorted.sort_by(f64::total_cmp);

    LatencyStats {
        mean_ms: round_to(mean(&sorted), 1),
        median_ms: round_to(median(&sorted), 1),
        p90_ms: round_to(percentile(&sorted, 90), 1),
        p95_ms: round_to(percentile(&sorted, 95), 1),
        p99_ms: round_to(percentile(&sorted, 99), 1),
        min_ms: round_to(sorted[0], 1),
        max_ms: round_to(sorted[sorted.len() - 1], 1),
        stdev_ms: round_to(sample_stdev(&sorted), 1),
    }
}

/// Nearest-rank-below percentile of an ascending slice:
/// index `max(0, floor(n * p / 100) - 1)`.
fn percentile(sorted: &[f64], p: usize) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (sorted.len() * p / 100).saturating_sub(1);
    sorted[idx]
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn sample_stdev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
