//! Rendering of widget state. Nothing here holds state of its own.

use super::state::WidgetState;
use crate::language::{Language, LanguageMode, TextDirection};

pub const APP_NAME: &str = "Quick Translate";
pub const INPUT_PLACEHOLDER: &str = "Enter text here";
pub const OUTPUT_PLACEHOLDER: &str = "Translated text will appear here.";

pub const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 64 64" width="40" height="40"><rect width="64" height="64" rx="12" fill="#2f6fed"/><text x="14" y="42" font-family="sans-serif" font-size="26" fill="#fff">A</text><text x="34" y="46" font-family="sans-serif" font-size="22" fill="#cfe0ff">文</text></svg>"##;

/// Everything the template needs, already decided
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetView {
    pub input_text: String,
    pub output_text: String,
    pub output_is_placeholder: bool,
    pub counter: String,
    pub char_limit: usize,
    pub detect_checked: bool,
    pub select_checked: bool,
    pub select_disabled: bool,
    pub selected_language: Language,
    pub direction: TextDirection,
    pub toggle_label: &'static str,
    pub translate_label: &'static str,
    pub pending: bool,
    pub error_banner: Option<String>,
}

impl WidgetView {
    pub fn from_state(state: &WidgetState) -> Self {
        let (output_text, output_is_placeholder) = match state.translated_text.as_deref() {
            Some(text) if !text.is_empty() => (text.to_string(), false),
            _ => (OUTPUT_PLACEHOLDER.to_string(), true),
        };

        Self {
            input_text: state.input_text.clone(),
            output_text,
            output_is_placeholder,
            counter: format!("{}/{}", state.input_len(), state.char_limit),
            char_limit: state.char_limit,
            detect_checked: state.language_mode == LanguageMode::Detect,
            select_checked: state.language_mode == LanguageMode::Select,
            select_disabled: state.language_mode != LanguageMode::Select,
            selected_language: state.selected_language,
            direction: state.direction,
            toggle_label: match state.direction {
                TextDirection::Rtl => "Switch to LTR",
                TextDirection::Ltr => "Switch to RTL",
            },
            translate_label: if state.pending { "Translating…" } else { "Translate" },
            pending: state.pending,
            error_banner: state.error_message.clone(),
        }
    }

    /// Inner markup of the widget container; replaced wholesale on every update
    pub fn render_html(&self) -> String {
        let dir = self.direction.as_attr();
        let mut html = String::with_capacity(2048);

        if let Some(message) = &self.error_banner {
            html.push_str(&format!(
                r#"<div class="error-banner" role="alert">{}</div>"#,
                escape_html(message)
            ));
        }

        html.push_str(r#"<div class="language-options">"#);
        html.push_str(&format!(
            r#"<label><input type="radio" name="mode" value="detect"{}> Detect Language</label>"#,
            checked(self.detect_checked)
        ));
        html.push_str(&format!(
            r#"<label><input type="radio" name="mode" value="select"{}> Select Language:</label>"#,
            checked(self.select_checked)
        ));
        html.push_str(&format!(
            r#"<select id="language"{}>"#,
            if self.select_disabled { " disabled" } else { "" }
        ));
        for language in Language::ALL {
            html.push_str(&format!(
                r#"<option value="{}"{}>{}</option>"#,
                language.code(),
                if language == self.selected_language { " selected" } else { "" },
                language.display_name()
            ));
        }
        html.push_str("</select></div>");

        html.push_str(r#"<div class="fields">"#);
        html.push_str(&format!(
            r#"<textarea id="input" rows="6" dir="{}" maxlength="{}" placeholder="{}">{}</textarea>"#,
            dir,
            self.char_limit,
            INPUT_PLACEHOLDER,
            escape_html(&self.input_text)
        ));
        html.push_str(&format!(
            r#"<div class="counter">{}</div>"#,
            self.counter
        ));
        html.push_str(&format!(
            r#"<textarea id="output" rows="6" dir="{}" readonly class="{}">{}</textarea>"#,
            dir,
            if self.output_is_placeholder { "output placeholder" } else { "output" },
            escape_html(&self.output_text)
        ));
        html.push_str("</div>");

        html.push_str(&format!(
            r#"<button id="translate"{}>{}</button>"#,
            if self.pending { r#" aria-busy="true""# } else { "" },
            self.translate_label
        ));
        html.push_str(&format!(
            r#"<button id="toggle-direction">{}</button>"#,
            self.toggle_label
        ));

        html
    }
}

/// Static branding, no behaviour
pub fn header_html() -> String {
    format!(
        r#"<header class="header"><div class="header-content"><img src="/logo.svg" alt="Logo" class="logo"><h1 class="app-name">{}</h1></div></header>"#,
        APP_NAME
    )
}

/// Full page for the first load. Later updates arrive over the WebSocket.
pub fn page_html(state: &WidgetState) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<style>{style}</style>
</head>
<body>
<div class="app">
{header}
<main class="content"><div id="widget" class="input-section">{widget}</div></main>
</div>
<script>{script}</script>
</body>
</html>
"#,
        title = APP_NAME,
        style = STYLE,
        header = header_html(),
        widget = WidgetView::from_state(state).render_html(),
        script = CLIENT_SCRIPT,
    )
}

fn checked(on: bool) -> &'static str {
    if on {
        " checked"
    } else {
        ""
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

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 0; background: #fafafa; }
.header { background: #2f6fed; color: #fff; padding: 0.5rem 1rem; }
.header-content { display: flex; align-items: center; gap: 0.75rem; }
.app-name { font-size: 1.4rem; margin: 0; }
.content { max-width: 960px; margin: 1.5rem auto; padding: 0 1rem; }
.error-banner { background: #fdecea; color: #b71c1c; border: 1px solid #f5c2c0; padding: 0.6rem 0.8rem; margin-bottom: 1rem; border-radius: 4px; }
.language-options { display: flex; gap: 1rem; align-items: center; margin-bottom: 0.75rem; }
.fields { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; margin-bottom: 0.75rem; }
.fields textarea { width: 100%; box-sizing: border-box; font-size: 1rem; padding: 0.5rem; }
.output { background: #f0f0f0; }
.output.placeholder { color: #888; }
.counter { grid-column: 1; text-align: right; font-size: 0.85rem; color: #666; margin-top: -0.5rem; }
button { margin-right: 0.5rem; padding: 0.5rem 1rem; }
"#;

const CLIENT_SCRIPT: &str = r#"
(function () {
  const widget = document.getElementById("widget");
  const scheme = location.protocol === "https:" ? "wss://" : "ws://";
  const ws = new WebSocket(scheme + location.host + "/client-ws");
  const send = (msg) => { if (ws.readyState === WebSocket.OPEN) ws.send(JSON.stringify(msg)); };
  // revision of the last edit sent; echoes below it predate what is on screen
  let sentRevision = 0;

  ws.onmessage = (event) => {
    const msg = JSON.parse(event.data);
    if (msg.type !== "state-update") return;
    const current = document.getElementById("input");
    const liveValue = current ? current.value : "";
    const behind = msg.state.input_revision < sentRevision;
    const focusedInput = current !== null && document.activeElement === current;
    const start = focusedInput ? current.selectionStart : 0;
    const end = focusedInput ? current.selectionEnd : 0;
    widget.innerHTML = msg.html;
    const input = document.getElementById("input");
    if (behind) input.value = liveValue;
    if (focusedInput) {
      input.focus();
      input.setSelectionRange(start, end);
    }
  };

  widget.addEventListener("input", (e) => {
    if (e.target.id !== "input") return;
    sentRevision += 1;
    send({ type: "set-input-text", text: e.target.value, revision: sentRevision });
  });
  widget.addEventListener("change", (e) => {
    if (e.target.name === "mode") send({ type: "set-language-mode", mode: e.target.value });
    if (e.target.id === "language") send({ type: "set-selected-language", language: e.target.value });
  });
  widget.addEventListener("click", (e) => {
    if (e.target.id === "translate") send({ type: "translate" });
    if (e.target.id === "toggle-direction") send({ type: "toggle-direction" });
  });
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> WidgetState {
        WidgetState::new(1000, Language::En)
    }

    #[test]
    fn empty_output_shows_placeholder() {
        let view = WidgetView::from_state(&state());
        assert!(view.output_is_placeholder);
        assert_eq!(view.output_text, OUTPUT_PLACEHOLDER);
        assert_eq!(view.counter, "0/1000");
        assert!(view.render_html().contains(INPUT_PLACEHOLDER));
    }

    #[test]
    fn select_is_disabled_in_detect_mode() {
        let mut s = state();
        assert!(WidgetView::from_state(&s).render_html().contains(r#"<select id="language" disabled>"#));

        s.language_mode = LanguageMode::Select;
        s.selected_language = Language::Fr;
        let html = WidgetView::from_state(&s).render_html();
        assert!(html.contains(r#"<select id="language">"#));
        assert!(html.contains(r#"<option value="fr" selected>French</option>"#));
    }

    #[test]
    fn direction_drives_label_and_dir_attr() {
        let mut s = state();
        assert_eq!(WidgetView::from_state(&s).toggle_label, "Switch to RTL");

        s.direction = TextDirection::Rtl;
        let view = WidgetView::from_state(&s);
        assert_eq!(view.toggle_label, "Switch to LTR");
        let html = view.render_html();
        assert_eq!(html.matches(r#"dir="rtl""#).count(), 2);
    }

    #[test]
    fn error_banner_only_when_set() {
        let mut s = state();
        assert!(!WidgetView::from_state(&s).render_html().contains("error-banner"));

        s.error_message = Some("Input text cannot be empty.".to_string());
        assert!(WidgetView::from_state(&s)
            .render_html()
            .contains("Input text cannot be empty."));
    }

    #[test]
    fn user_text_is_escaped() {
        let mut s = state();
        s.input_text = "<script>alert('x')</script>".to_string();
        s.translated_text = Some("a & b".to_string());
        let html = WidgetView::from_state(&s).render_html();
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
        assert!(html.contains("a &amp; b"));
    }

    #[test]
    fn client_keeps_live_input_over_stale_echoes() {
        assert!(CLIENT_SCRIPT.contains("revision: sentRevision"));
        assert!(CLIENT_SCRIPT.contains("msg.state.input_revision < sentRevision"));
        assert!(CLIENT_SCRIPT.contains("if (behind) input.value = liveValue;"));
    }

    #[test]
    fn page_includes_header_and_widget() {
        let html = page_html(&state());
        assert!(html.contains(APP_NAME));
        assert!(html.contains(r#"id="widget""#));
        assert!(html.contains("/client-ws"));
    }
}
