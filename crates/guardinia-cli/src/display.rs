//! Terminal rendering for analysis results.
//!
//! [`TerminalView`] binds the session controller to the terminal: notices and
//! progress go to stderr, and the last rendered HTML panel is kept so it can
//! be saved with `--html`. The verdict itself is printed as a card on stdout.

use std::sync::Mutex;

use guardinia_core::{AnalysisResult, ImagePreview, InputMode};
use guardinia_ui::render::{
    BUSY_LABEL, MAX_OCR_CHARS, MAX_REASONS, escape_html, format_number, submit_label,
    truncate_chars, verdict_copy,
};
use guardinia_ui::{Notice, NoticeLevel, Panel, View};

const LABEL_WIDTH: usize = 12;

// ── View binding ──

#[derive(Default)]
pub struct TerminalView {
    last_panel: Mutex<Option<Panel>>,
}

impl TerminalView {
    /// The panel currently on display, if any.
    pub fn last_panel(&self) -> Option<Panel> {
        self.slot().clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Panel>> {
        self.last_panel
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl View for TerminalView {
    fn show_mode(&self, mode: InputMode) {
        tracing::debug!(mode = mode.as_str(), action = submit_label(mode), "mode selected");
    }

    fn show_char_count(&self, count: usize) {
        tracing::debug!(count, "message length");
    }

    fn show_preview(&self, preview: &ImagePreview) {
        eprintln!("  {} ({})", preview.file_name, preview.size_label);
    }

    fn clear_preview(&self) {}

    fn set_busy(&self, busy: bool, _mode: InputMode) {
        if busy {
            eprintln!("  {BUSY_LABEL}");
        }
    }

    fn show_panel(&self, panel: &Panel) {
        *self.slot() = Some(panel.clone());
    }

    fn hide_panel(&self) {
        *self.slot() = None;
    }

    fn notify(&self, notice: &Notice) {
        eprintln!("  {} {}", notice_icon(notice.level), notice.message);
    }
}

fn notice_icon(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Info => "ℹ️",
        NoticeLevel::Warning => "⚠️",
        NoticeLevel::Error => "❌",
    }
}

// ── Cards ──

/// Print a completed analysis as a vertical card.
pub fn print_result_card(result: &AnalysisResult, mode: InputMode) {
    print!("{}", result_card(result, mode));
}

pub fn print_connection_error(mode: InputMode) {
    println!("=== ❌ Erro de Conexão ===");
    println!("Não foi possível completar a análise. Verifique sua conexão e tente novamente.");
    if mode == InputMode::Image {
        println!("Dica: certifique-se de que a imagem contém texto visível.");
    }
}

fn result_card(result: &AnalysisResult, mode: InputMode) -> String {
    let copy = verdict_copy(result.verdict);
    let mut lines = vec![format!("=== {} ===", copy.title), copy.body.to_string(), String::new()];

    if let Some(action) = result.recommended_action.as_deref().filter(|a| !a.trim().is_empty()) {
        lines.push(field("Ação", action.trim()));
    }
    if mode == InputMode::Image
        && let Some(text) = result.extracted_text.as_deref().filter(|t| !t.trim().is_empty())
    {
        lines.push(field("OCR", &truncate_chars(text.trim(), MAX_OCR_CHARS)));
    }
    if let Some(details) = result.details.as_deref().filter(|d| !d.trim().is_empty()) {
        lines.push(field("Detalhes", details.trim()));
    }
    if let Some(confidence) = result.confidence_percent
        && confidence != 0.0
    {
        lines.push(field("Confiança", &format!("{}%", format_number(confidence))));
    }
    if let Some(status) = result.status.as_deref() {
        lines.push(field("Status", status));
    }

    if !result.reasons.is_empty() {
        lines.push(String::new());
        lines.push("Indicadores Detectados".to_string());
        for reason in result.reasons.iter().take(MAX_REASONS) {
            lines.push(format!("  • {reason}"));
        }
    }
    lines.push(String::new());
    lines.join("\n")
}

fn field(label: &str, value: &str) -> String {
    format!("  {label:<width$} {value}", width = LABEL_WIDTH)
}

// ── HTML export ──

/// Wrap a panel in a minimal standalone page.
pub fn panel_document(panel: &Panel) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"pt-BR\">\n<head><meta charset=\"utf-8\"><title>GuardinIA</title></head>\n\
         <body>\n<div id=\"resultado\" class=\"{}\">{}</div>\n</body>\n</html>\n",
        escape_html(&panel.class),
        panel.html
    )
}
