//! Benchmark reports: a plain-text summary and a full JSON document.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::runner::round_to;
use crate::{BenchError, CLASSES, Metrics, SampleResult};

/// Version of the report layout.
pub const REPORT_VERSION: &str = "1.0.0";

/// Misclassified examples printed in the text report.
const PRINTED_MISSES: usize = 6;
/// Characters of each misclassified message shown.
const MISS_PREVIEW_CHARS: usize = 80;
const WIDTH: usize = 70;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMeta {
    /// `YYYY-MM-DD HH:MM:SS UTC`.
    pub generated_at: String,
    pub endpoint: String,
    pub total_messages: usize,
    pub elapsed_secs: f64,
    pub version: &'static str,
}

impl ReportMeta {
    pub fn new(
        generated_at: DateTime<Utc>,
        endpoint: impl Into<String>,
        total_messages: usize,
        elapsed_secs: f64,
    ) -> Self {
        Self {
            generated_at: generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            endpoint: endpoint.into(),
            total_messages,
            elapsed_secs: round_to(elapsed_secs, 2),
            version: REPORT_VERSION,
        }
    }
}

/// Everything written to the JSON report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchReport {
    pub meta: ReportMeta,
    pub metrics: Metrics,
    pub results: Vec<SampleResult>,
}

// ── Text report ──

/// Render the ASCII report.
pub fn render_report(metrics: &Metrics, meta: &ReportMeta) -> String {
    let divider = "═".repeat(WIDTH);
    let thin = "─".repeat(WIDTH);
    let mut lines: Vec<String> = Vec::new();

    lines.push(String::new());
    lines.push(divider.clone());
    lines.push("  GuardinIA BENCHMARK REPORT".into());
    lines.push(format!("  Date: {}", meta.generated_at));
    lines.push(format!("  Endpoint: {}", meta.endpoint));
    lines.push(divider.clone());
    lines.push(String::new());

    let success_pct = if metrics.total > 0 {
        metrics.valid as f64 / metrics.total as f64 * 100.0
    } else {
        0.0
    };
    lines.push("  SUMMARY".into());
    lines.push(thin.clone());
    lines.push(format!("  Messages tested   : {:>6}", metrics.total));
    lines.push(format!("  Requests OK       : {:>6}", metrics.valid));
    lines.push(format!("  Request errors    : {:>6}", metrics.errors));
    lines.push(format!("  Request success   : {success_pct:.1}%"));
    lines.push(String::new());
    lines.push(format!("  Accuracy          : {:.2}%", metrics.accuracy_pct));
    lines.push(format!("  Macro F1          : {:.4}", metrics.macro_f1));
    lines.push(String::new());

    lines.push("  PER-CLASS METRICS".into());
    lines.push(thin.clone());
    lines.push(format!(
        "  {:<12} {:>10} {:>10} {:>10} {:>10}",
        "Class", "Precision", "Recall", "F1", "Support"
    ));
    lines.push(format!("  {} {}", "-".repeat(12), vec!["-".repeat(10); 4].join(" ")));
    for (label, m) in &metrics.per_class {
        lines.push(format!(
            "  {:<12} {:>10.4} {:>10.4} {:>10.4} {:>10}",
            label.as_str(),
            m.precision,
            m.recall,
            m.f1,
            m.support
        ));
    }
    lines.push(String::new());

    lines.push("  CONFUSION MATRIX".into());
    lines.push("  (rows = real, columns = predicted)".into());
    lines.push(thin.clone());
    let mut header = format!("  {:15}", "");
    for class in CLASSES {
        let _ = write!(header, " {:>10}", class.as_str());
    }
    lines.push(header);
    lines.push(format!("  {} {}", "-".repeat(15), vec!["-".repeat(10); 3].join(" ")));
    for real in CLASSES {
        let mut row = format!("  {:<15}", real.as_str());
        for pred in CLASSES {
            let count = metrics
                .confusion
                .get(&real)
                .and_then(|r| r.get(&pred))
                .copied()
                .unwrap_or(0);
            let _ = write!(row, " {count:>10}");
        }
        lines.push(row);
    }
    lines.push(String::new());

    let lat = &metrics.latency;
    lines.push("  LATENCY".into());
    lines.push(thin.clone());
    lines.push(format!("  Mean    : {:>7.1} ms", lat.mean_ms));
    lines.push(format!("  Median  : {:>7.1} ms", lat.median_ms));
    lines.push(format!("  P90     : {:>7.1} ms", lat.p90_ms));
    lines.push(format!("  P95     : {:>7.1} ms", lat.p95_ms));
    lines.push(format!("  P99     : {:>7.1} ms", lat.p99_ms));
    lines.push(format!("  Min     : {:>7.1} ms", lat.min_ms));
    lines.push(format!("  Max     : {:>7.1} ms", lat.max_ms));
    lines.push(format!("  StdDev  : {:>7.1} ms", lat.stdev_ms));
    lines.push(String::new());

    let esc = &metrics.escalation;
    lines.push("  AI ESCALATION".into());
    lines.push(thin.clone());
    lines.push(format!("  Escalations     : {}", esc.total));
    lines.push(format!("  Rate            : {:.1}%", esc.rate_pct));
    lines.push(format!("  Estimated cost  : USD {:.6}", esc.total_cost_usd));
    if !esc.by_category.is_empty() {
        lines.push("  By category:".into());
        for (label, count) in &esc.by_category {
            lines.push(format!("    • {}: {count}", label.as_str()));
        }
    }
    if !esc.by_model.is_empty() {
        lines.push("  By model:".into());
        for (model, count) in &esc.by_model {
            lines.push(format!("    • {model}: {count}"));
        }
    }
    lines.push(String::new());

    lines.push("  SCORE BY CATEGORY".into());
    lines.push(thin.clone());
    for (label, s) in &metrics.score_stats {
        lines.push(format!(
            "  {:<12}: mean={:.1}  median={:.1}  [{}-{}]",
            label.as_str(),
            s.mean,
            s.median,
            s.min,
            s.max
        ));
    }
    lines.push(String::new());

    if !metrics.misses.is_empty() {
        lines.push("  MISCLASSIFIED EXAMPLES".into());
        lines.push(thin.clone());
        for (i, miss) in metrics.misses.iter().take(PRINTED_MISSES).enumerate() {
            let preview: String = miss
                .message
                .chars()
                .take(MISS_PREVIEW_CHARS)
                .collect::<String>()
                .replace('\n', " ");
            let predicted = miss.predicted.map_or("ERROR", |p| p.as_str());
            lines.push(format!(
                "  [{}] Real: {} -> Predicted: {predicted}",
                i + 1,
                miss.expected.as_str()
            ));
            lines.push(format!(
                "      Score: {} | Status: {}",
                miss.score.unwrap_or(0.0),
                miss.status.as_deref().unwrap_or("-")
            ));
            lines.push(format!("      \"{preview}...\""));
            lines.push(String::new());
        }
    }

    lines.push(divider.clone());
    lines.push("  GuardinIA scam-check benchmark".into());
    lines.push(divider.clone());
    lines.push(String::new());

    lines.join("\n")
}

/// `[████░░░░]   12/100 (12.0%)`
pub fn progress_bar(current: usize, total: usize, width: usize) -> String {
    let pct = if total == 0 { 1.0 } else { current as f64 / total as f64 };
    let done = ((width as f64 * pct) as usize).min(width);
    format!(
        "[{}{}] {current:>4}/{total} ({:.1}%)",
        "█".repeat(done),
        "░".repeat(width - done),
        pct * 100.0
    )
}

// ── Files ──

/// Write `guardinia_benchmark_<stamp>.json` and `.txt` into `dir`.
///
/// Returns the JSON and text paths.
pub fn write_report(
    dir: &Path,
    stamp: NaiveDateTime,
    report: &BenchReport,
    text: &str,
) -> Result<(PathBuf, PathBuf), BenchError> {
    std::fs::create_dir_all(dir)?;
    let stem = format!("guardinia_benchmark_{}", stamp.format("%Y%m%d_%H%M%S"));
    let json_path = dir.join(format!("{stem}.json"));
    let txt_path = dir.join(format!("{stem}.txt"));

    std::fs::write(&json_path, serde_json::to_string_pretty(report)?)?;
    std::fs::write(&txt_path, text)?;

    info!(json = %json_path.display(), txt = %txt_path.display(), "wrote benchmark report");
    Ok((json_path, txt_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Label, compute_metrics};
    use chrono::{NaiveDate, TimeZone};

    fn sample(expected: Label, predicted: Option<Label>, message: &str) -> SampleResult {
        SampleResult {
            id: None,
            expected,
            predicted,
            message: message.into(),
            status: predicted.map(|_| "🟡 SUSPEITO".to_string()),
            score: predicted.map(|_| 45.0),
            confidence: None,
            reasons: Vec::new(),
            latency_ms: 120.0,
            ai_escalated: false,
            model: None,
            cost_usd: None,
            error: predicted.is_none().then(|| "timeout".to_string()),
        }
    }

    fn meta() -> ReportMeta {
        let at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 5).unwrap();
        ReportMeta::new(at, "http://localhost/teste", 3, 4.567)
    }

    fn results() -> Vec<SampleResult> {
        vec![
            sample(Label::Golpe, Some(Label::Golpe), "Seu PIX foi bloqueado"),
            sample(Label::Legitima, Some(Label::Ambigua), "Chego às 18h\nbeijos"),
            sample(Label::Ambigua, None, "Me empresta 50?"),
        ]
    }

    #[test]
    fn meta_formatting() {
        let meta = meta();
        assert_eq!(meta.generated_at, "2026-03-01 12:30:05 UTC");
        assert_eq!(meta.elapsed_secs, 4.57);
        assert_eq!(meta.version, REPORT_VERSION);
    }

    #[test]
    fn text_report_sections() {
        let metrics = compute_metrics(&results());
        let text = render_report(&metrics, &meta());

        assert!(text.contains("Endpoint: http://localhost/teste"));
        assert!(text.contains("Messages tested   :      3"));
        assert!(text.contains("Request errors    :      1"));
        assert!(text.contains("Request success   : 66.7%"));
        assert!(text.contains("Accuracy          : 50.00%"));
        assert!(text.contains("PER-CLASS METRICS"));
        assert!(text.contains("CONFUSION MATRIX"));
        assert!(text.contains("LATENCY"));
        assert!(text.contains("  Mean    :   120.0 ms"));
        assert!(text.contains("[1] Real: LEGITIMA -> Predicted: AMBIGUA"));
        assert!(text.contains("\"Chego às 18h beijos...\""));
        assert!(!text.contains("By model:"));
    }

    #[test]
    fn confusion_rows_render_counts() {
        let metrics = compute_metrics(&results());
        let text = render_report(&metrics, &meta());
        let row = text
            .lines()
            .skip_while(|l| !l.contains("CONFUSION MATRIX"))
        .find(|l| l.trim_start().starts_with("LEGITIMA "))
            .unwrap();
        let cells: Vec<&str> = row.split_whitespace().collect();
        assert_eq!(cells, vec!["LEGITIMA", "0", "1", "0"]);
    }

    #[test]
    fn progress_bar_shape() {
        assert_eq!(progress_bar(5, 10, 10), "[█████░░░░░]    5/10 (50.0%)");
        assert_eq!(progress_bar(10, 10, 4), "[████]   10/10 (100.0%)");
        assert_eq!(progress_bar(0, 0, 2), "[██]    0/0 (100.0%)");
    }

    #[test]
    fn writes_both_files() {
        let tmp = tempfile::TempDir::new().unwrap();
        let results = results();
        let report = BenchReport {
            meta: meta(),
            metrics: compute_metrics(&results),
            results,
        };
        let text = render_report(&report.metrics, &report.meta);
        let stamp = NaiveDate::from_ymd_opt(2026, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap();

        let out = tmp.path().join("reports");
        let (json_path, txt_path) = write_report(&out, stamp, &report, &text).unwrap();
        assert_eq!(
            json_path.file_name().unwrap(),
            "guardinia_benchmark_20260301_093005.json"
        );
        assert_eq!(std::fs::read_to_string(&txt_path).unwrap(), text);

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["meta"]["total_messages"], 3);
        assert_eq!(json["metrics"]["per_class"]["GOLPE"]["tp"], 1);
        assert_eq!(json["metrics"]["confusion"]["LEGITIMA"]["AMBIGUA"], 1);
        assert_eq!(json["results"][2]["error"], "timeout");
        assert!(json["results"][2]["predicted"].is_null());
    }
}
