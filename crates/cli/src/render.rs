//! Draw a [`SnippetView`] as terminal text.

use letsgo_config::theme::HighlightTheme;
use letsgo_config::Color;
use letsgo_snippet::highlight::token_color;
use letsgo_snippet::{Control, EditorView, ResultPanel, SnippetView, TokenKind};

const RESET: &str = "\x1b[0m";
const ERROR_RED: Color = Color::from_rgb(1.0, 0.333, 0.333);

pub struct Renderer<'a> {
    theme: &'a HighlightTheme,
    color: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(theme: &'a HighlightTheme, color: bool) -> Self {
        Self { theme, color }
    }

    pub fn view(&self, view: &SnippetView, file_name: &str) -> String {
        match view {
            SnippetView::Fallback(text) => format!("{}\n", text),
            SnippetView::Editor(editor) => self.editor(editor, file_name),
        }
    }

    fn editor(&self, editor: &EditorView, file_name: &str) -> String {
        let mut out = String::new();

        let mode = if editor.read_only { "read-only" } else { "editing" };
        out.push_str(&format!("── {} ── {} ({})\n", editor.header, file_name, mode));
        out.push_str(&self.code(editor));
        if !out.ends_with('\n') {
            out.push('\n');
        }
        out.push_str(&self.controls(&editor.controls));
        out.push('\n');

        if let Some(result) = &editor.result {
            out.push_str(&format!("── {} ──\n", result.header()));
            out.push_str(&self.result(result));
            if !out.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }

    /// Highlighted source.
    pub fn code(&self, editor: &EditorView) -> String {
        let mut out = String::new();
        for span in &editor.spans {
            match span.kind {
                TokenKind::Whitespace | TokenKind::Identifier => out.push_str(&span.text),
                kind => out.push_str(&self.paint(&span.text, token_color(self.theme, kind))),
            }
        }
        out
    }

    fn controls(&self, controls: &[Control]) -> String {
        controls
            .iter()
            .map(|control| {
                let label = format!("[{}]", control.label());
                if control.is_enabled() || !self.color {
                    label
                } else {
                    format!("\x1b[2m{}{}", label, RESET)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn result(&self, result: &ResultPanel) -> String {
        match result {
            ResultPanel::Error(text) => self.paint(text, ERROR_RED),
            other => other.text().to_string(),
        }
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if !self.color {
            return text.to_string();
        }
        let (r, g, b) = color.to_rgb8();
        // Color each line separately so pagers keep the style
        text.split('\n')
            .map(|line| {
                if line.is_empty() {
                    String::new()
                } else {
                    format!("\x1b[38;2;{};{};{}m{}{}", r, g, b, line, RESET)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use letsgo_snippet::Span;

    fn editor(result: Option<ResultPanel>) -> EditorView {
        EditorView {
            header: "Source (Go)",
            spans: vec![
                Span::new(TokenKind::Keyword, "package"),
                Span::new(TokenKind::Whitespace, " "),
                Span::new(TokenKind::Identifier, "main"),
            ],
            read_only: true,
            height: Some(1),
            controls: vec![
                Control::Run { busy: false },
                Control::Copy { copied: false },
                Control::Download,
            ],
            result,
        }
    }

    #[test]
    fn test_plain_render() {
        let theme = HighlightTheme::dark();
        let out = Renderer::new(&theme, false).view(
            &SnippetView::Editor(editor(Some(ResultPanel::Output("hi\n".into())))),
            "main.go",
        );
        assert_eq!(
            out,
            "── Source (Go) ── main.go (read-only)\n\
             package main\n\
             [▶ Run] [⎘ Copy] [⤓ Download]\n\
             ── Result ──\n\
             hi\n"
        );
    }

    #[test]
    fn test_fallback_render() {
        let theme = HighlightTheme::light();
        let out = Renderer::new(&theme, true)
            .view(&SnippetView::Fallback("Loading interactive editor..."), "main.go");
        assert_eq!(out, "Loading interactive editor...\n");
    }

    #[test]
    fn test_color_render_paints_keywords() {
        let theme = HighlightTheme::dark();
        let (r, g, b) = theme.keyword.to_rgb8();
        let code = Renderer::new(&theme, true).code(&editor(None));
        assert!(code.starts_with(&format!("\x1b[38;2;{};{};{}mpackage\x1b[0m", r, g, b)));
        assert!(code.ends_with(" main"));
    }
}
