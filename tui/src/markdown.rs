//! Markdown Rendering
//!
//! Turns assistant replies into styled terminal lines. Handles the subset a
//! chat reply actually uses: emphasis, strong, strikethrough, inline code,
//! fenced code, headings, lists, links and rules. Anything else falls
//! through as plain text.
//!
//! Partial input is fine, so a reply can be rendered mid-reveal.

use std::mem;

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::theme::{CODE_AMBER, DIM_GRAY};

/// Indent for code blocks and nested list levels
const INDENT: &str = "  ";

/// Render Markdown into unwrapped lines on top of `base`
pub fn render(markdown: &str, base: Style) -> Vec<Line<'static>> {
    let mut renderer = Renderer::new(base);
    let options = Options::ENABLE_STRIKETHROUGH;
    for event in Parser::new_ext(markdown, options) {
        renderer.event(event);
    }
    renderer.finish()
}

/// Lines of plain text, one per `\n`
pub fn plain(text: &str, style: Style) -> Vec<Line<'static>> {
    text.split('\n')
        .map(|line| Line::from(Span::styled(line.to_string(), style)))
        .collect()
}

/// Greedy word wrap that keeps span styles
///
/// Words wider than `width` are broken at character boundaries.
pub fn wrap(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut out = Vec::new();
    let mut current: Vec<Span<'static>> = Vec::new();
    let mut used = 0;

    for span in &line.spans {
        for token in split_words(&span.content) {
            let token_width = token.width();
            let blank = token.chars().all(char::is_whitespace);

            if used + token_width > width && used > 0 {
                out.push(Line::from(mem::take(&mut current)));
                used = 0;
                if blank {
                    continue;
                }
            }

            if token_width > width {
                for c in token.chars() {
                    let char_width = c.width().unwrap_or(0);
                    if used + char_width > width && used > 0 {
                        out.push(Line::from(mem::take(&mut current)));
                        used = 0;
                    }
                    push_text(&mut current, &c.to_string(), span.style);
                    used += char_width;
                }
                continue;
            }

            push_text(&mut current, token, span.style);
            used += token_width;
        }
    }

    if !current.is_empty() || out.is_empty() {
        out.push(Line::from(current));
    }
    out
}

/// Split into alternating runs of whitespace and non-whitespace
fn split_words(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut prev_blank = None;

    for (i, c) in text.char_indices() {
        let blank = c.is_whitespace();
        if prev_blank.is_some_and(|p| p != blank) {
            tokens.push(&text[start..i]);
            start = i;
        }
        prev_blank = Some(blank);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }
    tokens
}

/// Append text, merging with the previous span when the style matches
fn push_text(spans: &mut Vec<Span<'static>>, text: &str, style: Style) {
    match spans.last_mut() {
        Some(last) if last.style == style => {
            let mut merged = last.content.to_string();
            merged.push_str(text);
            last.content = merged.into();
        }
        _ => spans.push(Span::styled(text.to_string(), style)),
    }
}

struct Renderer {
    base: Style,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    /// Inline style stack; the top is applied to text
    styles: Vec<Style>,
    /// Next number per open list (`None` for bullets)
    lists: Vec<Option<u64>>,
    in_code_block: bool,
}

impl Renderer {
    fn new(base: Style) -> Self {
        Self {
            base,
            lines: Vec::new(),
            current: Vec::new(),
            styles: vec![base],
            lists: Vec::new(),
            in_code_block: false,
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or(self.base)
    }

    fn push_style(&mut self, patch: Style) {
        let next = self.style().patch(patch);
        self.styles.push(next);
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn code_style(&self) -> Style {
        self.base.fg(CODE_AMBER)
    }

    fn text(&mut self, text: &str, style: Style) {
        push_text(&mut self.current, text, style);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(mem::take(&mut self.current)));
        }
    }

    /// End a block with one blank line
    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|line| line.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) if self.in_code_block => self.code_text(&text),
            Event::Text(text) | Event::Html(text) | Event::InlineHtml(text) => {
                let style = self.style();
                self.text(&text, style);
            }
            Event::Code(code) => {
                let style = self.code_style();
                self.text(&code, style);
            }
            Event::SoftBreak => {
                let style = self.style();
                self.text(" ", style);
            }
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                self.lines
                    .push(Line::from(Span::styled("───", self.base.fg(DIM_GRAY))));
                self.blank();
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { .. } => {
                self.flush();
                self.push_style(Style::default().add_modifier(Modifier::BOLD));
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    let lang: &str = &lang;
                    if !lang.is_empty() {
                        self.lines.push(Line::from(Span::styled(
                            format!("{INDENT}{lang}"),
                            self.base.fg(DIM_GRAY),
                        )));
                    }
                }
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let marker = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => "• ".to_string(),
                };
                let style = self.base;
                self.text(&format!("{}{marker}", INDENT.repeat(depth)), style);
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT));
            }
            Tag::Link { .. } => {
                self.push_style(Style::default().add_modifier(Modifier::UNDERLINED));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.blank(),
            TagEnd::Heading(_) => {
                self.pop_style();
                self.blank();
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
                self.blank();
            }
            TagEnd::List(_) => {
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                } else {
                    self.flush();
                }
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough | TagEnd::Link => {
                self.pop_style();
            }
            _ => {}
        }
    }

    fn code_text(&mut self, text: &str) {
        let style = self.code_style();
        for line in text.lines() {
            self.lines
                .push(Line::from(Span::styled(format!("{INDENT}{line}"), style)));
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn texts(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(text_of).collect()
    }

    fn span_with<'a>(line: &'a Line<'_>, content: &str) -> &'a Span<'a> {
        line.spans
            .iter()
            .find(|s| s.content == content)
            .unwrap_or_else(|| panic!("no span {content:?} in {line:?}"))
    }

    #[test]
    fn test_plain_paragraph() {
        let lines = render("echo hi", Style::default());
        assert_eq!(texts(&lines), vec!["echo hi"]);
    }

    #[test]
    fn test_inline_styles() {
        let lines = render("a **bold** and *soft* `code`", Style::default());
        assert_eq!(lines.len(), 1);
        let line = &lines[0];
        assert!(span_with(line, "bold")
            .style
            .add_modifier
            .contains(Modifier::BOLD));
        assert!(span_with(line, "soft")
            .style
            .add_modifier
            .contains(Modifier::ITALIC));
        assert_eq!(span_with(line, "code").style.fg, Some(CODE_AMBER));
        assert_eq!(text_of(line), "a bold and soft code");
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        let lines = render("one\n\ntwo", Style::default());
        assert_eq!(texts(&lines), vec!["one", "", "two"]);
    }

    #[test]
    fn test_lists() {
        let lines = render("- apples\n- pears\n\n1. first\n2. second", Style::default());
        assert_eq!(
            texts(&lines),
            vec!["• apples", "• pears", "", "1. first", "2. second"]
        );
    }

    #[test]
    fn test_nested_list_indents() {
        let lines = render("- outer\n  - inner", Style::default());
        assert_eq!(texts(&lines), vec!["• outer", "  • inner"]);
    }

    #[test]
    fn test_fenced_code_block() {
        let lines = render("Run:\n\n```sh\ncargo run\n```", Style::default());
        assert_eq!(texts(&lines), vec!["Run:", "", "  sh", "  cargo run"]);
        assert_eq!(lines[3].spans[0].style.fg, Some(CODE_AMBER));
    }

    #[test]
    fn test_heading_is_bold() {
        let lines = render("# Title\nbody", Style::default());
        assert_eq!(texts(&lines), vec!["Title", "", "body"]);
        assert!(lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn test_unfinished_markup_renders() {
        let lines = render("some **bo", Style::default());
        assert_eq!(texts(&lines), vec!["some **bo"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(render("", Style::default()).is_empty());
    }

    #[test]
    fn test_wrap_keeps_styles() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::raw("hello "),
            Span::styled("brave new", bold),
            Span::raw(" world"),
        ]);

        let wrapped = wrap(&line, 11);
        assert_eq!(texts(&wrapped), vec!["hello brave", "new world"]);
        assert_eq!(wrapped[0].spans[1].style, bold);
        assert_eq!(wrapped[1].spans[0].style, bold);
    }

    #[test]
    fn test_wrap_breaks_long_words() {
        let line = Line::from("abcdefgh");
        assert_eq!(texts(&wrap(&line, 3)), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn test_wrap_empty_line() {
        assert_eq!(wrap(&Line::default(), 10).len(), 1);
    }

    #[test]
    fn test_plain_splits_newlines() {
        assert_eq!(
            texts(&plain("a\nb", Style::default())),
            vec!["a".to_string(), "b".to_string()]
        );
    }
}
