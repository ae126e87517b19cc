//! HTML panels for the result area.
//!
//! Every panel is a fragment meant for the `#resultado` container, tagged
//! with the container's CSS class. Text coming back from the webhook is
//! escaped before it is interpolated.

use std::fmt::Write as _;

use guardinia_core::{AnalysisResult, InputMode, Verdict};

/// Reasons past this count are dropped.
pub const MAX_REASONS: usize = 5;

/// OCR text longer than this many characters is cut and suffixed with `...`.
pub const MAX_OCR_CHARS: usize = 200;

const WHATSAPP_BOT_URL: &str = "https://api.whatsapp.com/send?phone=5541985086826";

/// A rendered fragment plus the class its container should carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Panel {
    pub class: String,
    pub html: String,
}

/// Title and body shown for a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictCopy {
    pub title: &'static str,
    pub body: &'static str,
}

// ── Verdict templates ──

pub fn verdict_copy(verdict: Verdict) -> VerdictCopy {
    match verdict {
        Verdict::Safe => VerdictCopy {
            title: "✅ Mensagem Segura",
            body: "Nenhuma ação necessária. A mensagem não apresenta indícios relevantes de golpe.",
        },
        Verdict::Caution => VerdictCopy {
            title: "⚠️ Atenção",
            body: "A mensagem apresenta alguns sinais suspeitos. Tenha cautela e não forneça dados pessoais.",
        },
        Verdict::Danger => VerdictCopy {
            title: "🚨 Possível Golpe Detectado",
            body: "A mensagem solicita ações sensíveis. Não responda, não clique em links e não forneça informações.",
        },
    }
}

/// Icon color for reason bullets.
pub fn accent_color(verdict: Verdict) -> &'static str {
    match verdict {
        Verdict::Safe => "#10b981",
        Verdict::Caution => "#f59e0b",
        Verdict::Danger => "#ef4444",
    }
}

// ── Button labels ──

pub fn submit_label(mode: InputMode) -> &'static str {
    match mode {
        InputMode::Text => "Analisar Mensagem",
        InputMode::Image => "Analisar Imagem",
    }
}

pub const BUSY_LABEL: &str = "Analisando...";

// ── Panels ──

/// Loading panel shown while a submission is pending.
pub fn pending_panel(mode: InputMode) -> Panel {
    let (subject, detail) = match mode {
        InputMode::Text => ("mensagem", "Verificando padrões de golpes e ameaças"),
        InputMode::Image => (
            "imagem",
            "Extraindo texto com OCR e verificando padrões de golpes",
        ),
    };
    Panel {
        class: "resultado".to_string(),
        html: format!(
            "<div class=\"resultado__loading\">\
             <i class=\"fas fa-spinner fa-spin\"></i>\
             <h2>Analisando {subject}...</h2>\
             <p>{detail}</p>\
             </div>"
        ),
    }
}

/// Panel for a completed analysis.
///
/// OCR text is only shown for image submissions. Sections whose field is
/// absent are left out entirely.
pub fn result_panel(result: &AnalysisResult, mode: InputMode) -> Panel {
    let verdict = result.verdict;
    let copy = verdict_copy(verdict);

    let mut html = String::new();
    let _ = write!(html, "<h2>{}</h2>", copy.title);
    let _ = write!(html, "<p class=\"resultado__texto\">{}</p>", copy.body);

    if let Some(action) = non_empty(result.recommended_action.as_deref()) {
        let _ = write!(
            html,
            "<p class=\"resultado__acao\"><strong>Ação recomendada:</strong> {}</p>",
            escape_html(action)
        );
    }

    if mode == InputMode::Image
        && let Some(text) = non_empty(result.extracted_text.as_deref())
    {
        let _ = write!(
            html,
            "<div class=\"resultado__ocr\">\
             <h4><i class=\"fas fa-file-alt\"></i> Texto Extraído (OCR):</h4>\
             <p>\"{}\"</p>\
             </div>",
            escape_html(&truncate_chars(text, MAX_OCR_CHARS))
        );
    }

    if !result.reasons.is_empty() {
        html.push_str(
            "<div class=\"resultado__motivos\">\
             <h3><i class=\"fas fa-list-ul\"></i> Indicadores Detectados:</h3>\
             <ul>",
        );
        for reason in result.reasons.iter().take(MAX_REASONS) {
            let _ = write!(
                html,
                "<li><i class=\"fas fa-exclamation-circle\" style=\"color: {};\"></i> {}</li>",
                accent_color(verdict),
                escape_html(reason)
            );
        }
        html.push_str("</ul></div>");
    }

    if let Some(details) = non_empty(result.details.as_deref()) {
        let _ = write!(
            html,
            "<p class=\"resultado__detalhes\">{}</p>",
            escape_html(details)
        );
    }

    // Zero confidence is treated as "not reported".
    if let Some(confidence) = result.confidence_percent
        && confidence != 0.0
    {
        let _ = write!(
            html,
            "<div class=\"resultado__confianca\"><strong>Confiança Técnica:</strong> {}%</div>",
            format_number(confidence)
        );
    }

    Panel {
        class: verdict_class(verdict),
        html,
    }
}

/// Generic failure panel. The cause is deliberately not shown.
pub fn connection_error_panel(mode: InputMode) -> Panel {
    let mut html = String::from(
        "<h2><i class=\"fas fa-exclamation-triangle\"></i> Erro de Conexão</h2>\
         <p>Não foi possível completar a análise. Verifique sua conexão e tente novamente.</p>",
    );
    if mode == InputMode::Image {
        html.push_str(
            "<p class=\"resultado__dica\"><strong>Dica:</strong> \
             Certifique-se de que a imagem contém texto visível.</p>",
        );
    }
    let _ = write!(
        html,
        "<p class=\"resultado__alternativa\"><strong>Alternativa:</strong> Teste pelo nosso \
         <a href=\"{WHATSAPP_BOT_URL}\" target=\"_blank\">WhatsApp Bot</a></p>"
    );
    Panel {
        class: verdict_class(Verdict::Danger),
        html,
    }
}

// ── Helpers ──

fn verdict_class(verdict: Verdict) -> String {
    format!("resultado resultado--{}", verdict.as_str())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Keep the first `max` characters, appending `...` when anything was cut.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Whole numbers print without decimals; others keep up to two.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        let text = format!("{value:.2}");
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> AnalysisResult {
        AnalysisResult::from_json(body).unwrap()
    }

    #[test]
    fn safe_verdict_without_reasons() {
        let panel = result_panel(&parse(r#"{"cor":"verde"}"#), InputMode::Text);
        assert_eq!(panel.class, "resultado resultado--verde");
        assert!(panel.html.contains("✅ Mensagem Segura"));
        assert!(!panel.html.contains("Indicadores Detectados"));
        assert!(!panel.html.contains("Confiança"));
    }

    #[test]
    fn danger_reasons_in_order() {
        let panel = result_panel(
            &parse(r#"{"cor":"vermelho","motivos":["link suspeito","urgência artificial"]}"#),
            InputMode::Text,
        );
        assert_eq!(panel.class, "resultado resultado--vermelho");
        assert!(panel.html.contains("🚨 Possível Golpe Detectado"));
        let first = panel.html.find("link suspeito").unwrap();
        let second = panel.html.find("urgência artificial").unwrap();
        assert!(first < second);
        assert!(panel.html.contains("#ef4444"));
    }

    #[test]
    fn unknown_or_missing_verdict_is_caution() {
        for body in [r#"{"cor":"laranja"}"#, r#"{}"#, r#"{"cor":null}"#] {
            let panel = result_panel(&parse(body), InputMode::Text);
            assert_eq!(panel.class, "resultado resultado--amarelo", "{body}");
            assert!(panel.html.contains("⚠️ Atenção"), "{body}");
        }
    }

    #[test]
    fn reasons_capped_at_five() {
        let panel = result_panel(
            &parse(r#"{"cor":"amarelo","motivos":["r1","r2","r3","r4","r5","r6"]}"#),
            InputMode::Text,
        );
        assert!(panel.html.contains("r5"));
        assert!(!panel.html.contains("r6"));
        assert_eq!(panel.html.matches("<li>").count(), MAX_REASONS);
    }

    #[test]
    fn confidence_shown_when_non_zero() {
        let panel = result_panel(&parse(r#"{"cor":"verde","confianca":95}"#), InputMode::Text);
        assert!(panel.html.contains("Confiança Técnica:</strong> 95%"));

        let panel = result_panel(&parse(r#"{"cor":"verde","confianca":0}"#), InputMode::Text);
        assert!(!panel.html.contains("Confiança"));
    }

    #[test]
    fn ocr_text_only_for_images() {
        let result = parse(r#"{"cor":"amarelo","texto_analisado":"Seu pacote foi retido"}"#);

        let text = result_panel(&result, InputMode::Text);
        assert!(!text.html.contains("OCR"));

        let image = result_panel(&result, InputMode::Image);
        assert!(image.html.contains("Texto Extraído (OCR)"));
        assert!(image.html.contains("\"Seu pacote foi retido\""));
    }

    #[test]
    fn long_ocr_text_truncated() {
        let long = "á".repeat(250);
        let result = AnalysisResult {
            extracted_text: Some(long),
            ..AnalysisResult::default()
        };
        let panel = result_panel(&result, InputMode::Image);
        let expected = format!("\"{}...\"", "á".repeat(MAX_OCR_CHARS));
        assert!(panel.html.contains(&expected));
    }

    #[test]
    fn server_text_is_escaped() {
        let panel = result_panel(
            &parse(r#"{"cor":"vermelho","motivos":["<script>alert(1)</script>"]}"#),
            InputMode::Text,
        );
        assert!(!panel.html.contains("<script>"));
        assert!(panel.html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn recommended_action_shown() {
        let panel = result_panel(
            &parse(r#"{"cor":"laranja","acao_recomendada":"⚠️ Muito provavelmente golpe. Não clique."}"#),
            InputMode::Text,
        );
        assert!(panel.html.contains("Ação recomendada:"));
        assert!(panel.html.contains("Muito provavelmente golpe"));
    }

    #[test]
    fn connection_error_panel_mentions_image_tip() {
        let text = connection_error_panel(InputMode::Text);
        assert_eq!(text.class, "resultado resultado--vermelho");
        assert!(text.html.contains("Erro de Conexão"));
        assert!(!text.html.contains("Dica"));

        let image = connection_error_panel(InputMode::Image);
        assert!(image.html.contains("Dica"));
    }

    #[test]
    fn pending_panel_per_mode() {
        assert!(pending_panel(InputMode::Text).html.contains("Analisando mensagem..."));
        assert!(pending_panel(InputMode::Image).html.contains("OCR"));
    }

    #[test]
    fn submit_label_per_mode() {
        assert_eq!(submit_label(InputMode::Text), "Analisar Mensagem");
        assert_eq!(submit_label(InputMode::Image), "Analisar Imagem");
    }

    #[test]
    fn helpers() {
        assert_eq!(truncate_chars("abc", 5), "abc");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        assert_eq!(format_number(95.0), "95");
        assert_eq!(format_number(87.5), "87.5");
        assert_eq!(escape_html("a & 'b'"), "a &amp; &#39;b&#39;");
    }
}
