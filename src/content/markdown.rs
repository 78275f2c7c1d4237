//! Markdown rendering with syntax highlighting
//!
//! Language-tagged fenced code blocks are replaced with a widget the front
//! end styles and wires up: class-based syntect highlighting, a line-number
//! gutter, and a copy-to-clipboard button whose transient "copied" state
//! duration is carried in a data attribute. Everything else is plain
//! pulldown-cmark output, passed through an HTML sanitizer so raw embedded
//! HTML in a post body cannot reach the page unfiltered.

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

/// How long the copy button shows its "copied" acknowledgment, in
/// milliseconds. Emitted as `data-feedback-ms` for the front end to honor.
pub const COPY_FEEDBACK_MS: u32 = 2000;

const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;

lazy_static! {
    static ref SYNTAX_SET: SyntaxSet = SyntaxSet::load_defaults_newlines();
    static ref THEME_SET: ThemeSet = ThemeSet::load_defaults();
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    theme_name: String,
    line_numbers: bool,
    sanitize: bool,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", true, true)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool, sanitize: bool) -> Self {
        Self {
            theme_name: theme.to_string(),
            line_numbers,
            sanitize,
        }
    }

    /// Render a post body to HTML.
    pub fn render(&self, markdown: &str) -> Result<String> {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_DEFINITION_LIST
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut fenced_lang: Option<String> = None;
        let mut fenced_code = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                    // The info string may carry attributes after the language
                    // token ("rust,no_run")
                    let lang = info.split([',', ' ']).next().unwrap_or("").trim();
                    if lang.is_empty() {
                        // Untagged fence: plain code block, no widget
                        events.push(Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))));
                    } else {
                        fenced_lang = Some(lang.to_string());
                        fenced_code.clear();
                    }
                }
                Event::Text(text) if fenced_lang.is_some() => {
                    fenced_code.push_str(&text);
                }
                Event::End(TagEnd::CodeBlock) => match fenced_lang.take() {
                    Some(lang) => {
                        let widget = self.code_widget(&fenced_code, &lang);
                        events.push(Event::Html(CowStr::from(widget)));
                    }
                    None => events.push(event),
                },
                other => events.push(other),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        if self.sanitize {
            Ok(sanitize(&html_output))
        } else {
            Ok(html_output)
        }
    }

    /// Build the code-block widget for a language-tagged fence.
    fn code_widget(&self, code: &str, lang: &str) -> String {
        let lang_attr = html_escape(lang);
        let header = format!(
            r#"<div class="code-header"><span class="code-lang">{}</span><button type="button" class="copy-button" data-feedback-ms="{}" aria-label="Copy code to clipboard">Copy</button></div>"#,
            lang_attr, COPY_FEEDBACK_MS
        );

        let highlighted = self
            .highlight(code, lang)
            .unwrap_or_else(|| html_escape(code));

        let body = if self.line_numbers {
            self.with_line_numbers(&highlighted)
        } else {
            format!(r#"<pre class="code"><code>{}</code></pre>"#, highlighted)
        };

        format!(
            r#"<figure class="code-block" data-lang="{}">{}{}</figure>"#,
            lang_attr, header, body
        )
    }

    /// Highlight a code block, emitting class-annotated spans. `None` when
    /// the highlighter fails (the caller falls back to escaped plain text).
    fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        let syntax = SYNTAX_SET
            .find_syntax_by_token(lang)
            .or_else(|| SYNTAX_SET.find_syntax_by_extension(lang))
            .unwrap_or_else(|| SYNTAX_SET.find_syntax_plain_text());

        let mut generator =
            ClassedHTMLGenerator::new_with_class_style(syntax, &SYNTAX_SET, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            if generator
                .parse_html_for_line_which_includes_newline(line)
                .is_err()
            {
                return None;
            }
        }
        Some(generator.finalize())
    }

    /// Wrap highlighted code in the gutter/code table.
    fn with_line_numbers(&self, highlighted: &str) -> String {
        let lines: Vec<&str> = highlighted.lines().collect();
        let count = lines.len();

        let mut gutter = String::new();
        let mut code_lines = String::new();

        for (i, line) in lines.iter().enumerate() {
            gutter.push_str(&format!(r#"<span class="line-number">{}</span>"#, i + 1));
            code_lines.push_str(line);
            if i < count - 1 {
                gutter.push('\n');
                code_lines.push('\n');
            }
        }

        format!(
            r#"<table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table>"#,
            gutter, code_lines
        )
    }

    /// Stylesheet for the configured highlight theme, matching the classes
    /// the widget emits.
    pub fn theme_css(&self) -> Result<String> {
        let theme = THEME_SET
            .themes
            .get(&self.theme_name)
            .or_else(|| THEME_SET.themes.values().next())
            .context("no highlight themes available")?;
        Ok(css_for_theme_with_class_style(theme, CLASS_STYLE)?)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip anything dangerous from rendered HTML while keeping the code
/// widget's tags and attributes intact.
fn sanitize(html: &str) -> String {
    ammonia::Builder::default()
        .add_tags(["figure", "figcaption", "button", "input"])
        .add_generic_attributes(["class"])
        .add_tag_attributes("figure", ["data-lang"])
        .add_tag_attributes("button", ["type", "data-feedback-ms", "aria-label"])
        .add_tag_attributes("input", ["type", "checked", "disabled"])
        .clean(html)
        .to_string()
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains("Hello World"));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_tagged_fence_gets_the_widget() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("```rust\nfn main() {}\nlet x = 1;\n```")
            .unwrap();
        assert!(html.contains("code-block"));
        assert!(html.contains("copy-button"));
        assert!(html.contains(r#"data-feedback-ms="2000""#));
        assert!(html.contains("line-number"));
        assert!(html.contains("rust"));
    }

    #[test]
    fn test_untagged_fence_stays_plain() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```\nplain text\n```").unwrap();
        assert!(html.contains("<pre>"));
        assert!(html.contains("plain text"));
        assert!(!html.contains("copy-button"));
    }

    #[test]
    fn test_inline_code_stays_plain() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("Use `cargo build` to compile.").unwrap();
        assert!(html.contains("<code>cargo build</code>"));
        assert!(!html.contains("copy-button"));
    }

    #[test]
    fn test_raw_html_is_sanitized() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("hello\n\n<script>alert(1)</script>\n\n<p onclick=\"x()\">para</p>")
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(!html.contains("onclick"));
        assert!(html.contains("para"));
    }

    #[test]
    fn test_sanitizer_can_be_disabled() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", true, false);
        let html = renderer.render("<em data-x=\"1\">kept</em>").unwrap();
        assert!(html.contains("data-x"));
    }

    #[test]
    fn test_widget_survives_sanitization() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nlet x = 1;\n```").unwrap();
        assert!(html.contains("copy-button"));
        assert!(html.contains(r#"data-feedback-ms="2000""#));
        assert!(html.contains("line-number"));
    }

    #[test]
    fn test_line_numbers_can_be_disabled() {
        let renderer = MarkdownRenderer::with_options("base16-ocean.dark", false, true);
        let html = renderer.render("```rust\nlet x = 1;\n```").unwrap();
        assert!(html.contains("copy-button"));
        assert!(!html.contains("line-number"));
    }

    #[test]
    fn test_unknown_language_still_renders() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```nosuchlang\nwords here\n```").unwrap();
        assert!(html.contains("code-block"));
        assert!(html.contains("words here"));
    }

    #[test]
    fn test_theme_css() {
        let renderer = MarkdownRenderer::new();
        let css = renderer.theme_css().unwrap();
        assert!(!css.is_empty());
    }
}
