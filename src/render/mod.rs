//! Markdown rendering for the terminal
//!
//! Parsing is delegated to pulldown-cmark; this module owns only the
//! styling layer that maps each construct to terminal output. Styles come
//! from a [`Palette`] chosen by the dark-mode flag, which is the
//! process-wide presentation root the theme preference writes to.

use std::sync::atomic::{AtomicBool, Ordering};

use console::{measure_text_width, Style};
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Dark marker on the presentation root
static DARK_MODE: AtomicBool = AtomicBool::new(false);

/// Set or clear the process-wide dark flag
pub fn set_dark_mode(dark: bool) {
    DARK_MODE.store(dark, Ordering::Relaxed);
}

/// Whether dark mode is applied
pub fn is_dark_mode() -> bool {
    DARK_MODE.load(Ordering::Relaxed)
}

/// Styles for each rendered construct
#[derive(Debug, Clone)]
pub struct Palette {
    pub heading: Style,
    pub hash: Style,
    pub bullet: Style,
    pub code: Style,
    pub quote: Style,
    pub link: Style,
    pub url: Style,
    pub rule: Style,
    pub table_border: Style,
    pub table_header: Style,
}

impl Palette {
    /// Palette for light terminals
    pub fn light() -> Self {
        Self {
            heading: Style::new().blue().bold(),
            hash: Style::new().blue().dim(),
            bullet: Style::new().cyan(),
            code: Style::new().magenta(),
            quote: Style::new().dim().italic(),
            link: Style::new().blue().underlined(),
            url: Style::new().dim(),
            rule: Style::new().dim(),
            table_border: Style::new().dim(),
            table_header: Style::new().bold(),
        }
    }

    /// Palette for dark terminals
    pub fn dark() -> Self {
        Self {
            heading: Style::new().cyan().bold(),
            hash: Style::new().cyan().dim(),
            bullet: Style::new().yellow(),
            code: Style::new().yellow(),
            quote: Style::new().dim().italic(),
            link: Style::new().cyan().underlined(),
            url: Style::new().dim(),
            rule: Style::new().dim(),
            table_border: Style::new().dim(),
            table_header: Style::new().bold(),
        }
    }

    /// Palette matching the applied dark-mode flag
    pub fn active() -> Self {
        if is_dark_mode() {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// Render markdown to styled terminal text
///
/// Supports paragraphs, headings, ordered/unordered lists, inline and
/// fenced code, blockquotes, links (URL printed beside the text),
/// emphasis/strong, horizontal rules, and tables.
pub fn render_markdown(source: &str, palette: &Palette, width: usize) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = Parser::new_ext(source, options);
    let mut renderer = Renderer::new(palette, width.max(20));
    for event in parser {
        renderer.handle(event);
    }
    renderer.finish()
}

/// Tracks one table while its events stream by
struct TableState {
    rows: Vec<Vec<String>>,
    current_row: Vec<String>,
    in_cell: bool,
}

struct Renderer<'a> {
    palette: &'a Palette,
    width: usize,
    out: String,
    line: String,
    /// Inline style stack; top applies to text events
    styles: Vec<Style>,
    /// One entry per open list: next ordinal, or None for bullets
    list_stack: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
    in_image: bool,
    link_dest: Option<String>,
    table: Option<TableState>,
}

impl<'a> Renderer<'a> {
    fn new(palette: &'a Palette, width: usize) -> Self {
        Self {
            palette,
            width,
            out: String::new(),
            line: String::new(),
            styles: vec![Style::new()],
            list_stack: Vec::new(),
            quote_depth: 0,
            in_code_block: false,
            in_image: false,
            link_dest: None,
            table: None,
        }
    }

    fn handle(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => {
                if let Some(table) = &mut self.table {
                    if table.in_cell {
                        if let Some(cell) = table.current_row.last_mut() {
                            cell.push_str(&format!("`{}`", code));
                        }
                        return;
                    }
                }
                let styled = self.palette.code.apply_to(format!("`{}`", code));
                self.push_inline(&styled.to_string());
            }
            Event::SoftBreak => self.push_inline(" "),
            Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.blank_line();
                let rule = "─".repeat(self.width.min(60));
                self.out
                    .push_str(&self.palette.rule.apply_to(rule).to_string());
                self.out.push('\n');
            }
            Event::TaskListMarker(checked) => {
                self.push_inline(if checked { "[x] " } else { "[ ] " });
            }
            // Raw HTML has no terminal rendering
            Event::Html(_) | Event::InlineHtml(_) => {}
            Event::FootnoteReference(name) => {
                self.push_inline(&format!("[^{}]", name));
            }
            _ => {}
        }
    }

    fn start_tag(&mut self, tag: Tag) {
        match tag {
            Tag::Paragraph => {
                // A pending list marker stays glued to its first paragraph
                if self.table.is_none() && self.line.is_empty() {
                    self.blank_line();
                }
            }
            Tag::Heading { level, .. } => {
                self.blank_line();
                let hashes = "#".repeat(heading_depth(level));
                self.line
                    .push_str(&self.palette.hash.apply_to(hashes).to_string());
                self.line.push(' ');
                self.styles.push(self.palette.heading.clone());
            }
            Tag::BlockQuote(_) => {
                self.blank_line();
                self.quote_depth += 1;
                self.styles.push(self.palette.quote.clone());
            }
            Tag::CodeBlock(kind) => {
                self.blank_line();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        let label = self.palette.url.apply_to(format!("({})", lang));
                        self.out.push_str(&format!("    {}\n", label));
                    }
                }
            }
            Tag::List(start) => {
                if self.list_stack.is_empty() {
                    self.blank_line();
                }
                self.list_stack.push(start);
            }
            Tag::Item => {
                self.flush_line();
                let depth = self.list_stack.len().saturating_sub(1);
                self.line.push_str(&"  ".repeat(depth));

                let marker = match self.list_stack.last_mut() {
                    Some(Some(n)) => {
                        let m = format!("{}. ", n);
                        *n += 1;
                        m
                    }
                    _ => "• ".to_string(),
                };
                self.line
                    .push_str(&self.palette.bullet.apply_to(marker).to_string());
            }
            Tag::Emphasis => self.push_style(|s| s.italic()),
            Tag::Strong => self.push_style(|s| s.bold()),
            Tag::Strikethrough => self.push_style(|s| s.strikethrough()),
            Tag::Link { dest_url, .. } => {
                self.link_dest = Some(dest_url.to_string());
                self.styles.push(self.palette.link.clone());
            }
            Tag::Image { dest_url, .. } => {
                let marker = self.palette.url.apply_to(format!("[image: {}]", dest_url));
                self.push_inline(&marker.to_string());
                self.in_image = true;
            }
            Tag::Table(_) => {
                self.blank_line();
                self.table = Some(TableState {
                    rows: Vec::new(),
                    current_row: Vec::new(),
                    in_cell: false,
                });
            }
            Tag::TableHead | Tag::TableRow => {
                if let Some(table) = &mut self.table {
                    table.current_row.clear();
                }
            }
            Tag::TableCell => {
                if let Some(table) = &mut self.table {
                    table.current_row.push(String::new());
                    table.in_cell = true;
                }
            }
            _ => {}
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.flush_line(),
            TagEnd::Heading(_) => {
                self.pop_style();
                self.flush_line();
            }
            TagEnd::BlockQuote(_) => {
                self.flush_line();
                self.pop_style();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
            }
            TagEnd::List(_) => {
                self.flush_line();
                self.list_stack.pop();
            }
            TagEnd::Item => self.flush_line(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(dest) = self.link_dest.take() {
                    let url = self.palette.url.apply_to(format!(" ({})", dest));
                    self.push_inline(&url.to_string());
                }
            }
            TagEnd::Image => self.in_image = false,
            TagEnd::TableCell => {
                if let Some(table) = &mut self.table {
                    table.in_cell = false;
                }
            }
            TagEnd::TableHead | TagEnd::TableRow => {
                if let Some(table) = &mut self.table {
                    let row = std::mem::take(&mut table.current_row);
                    table.rows.push(row);
                }
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.render_table(table);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        // Alt text already surfaced by the image marker
        if self.in_image {
            return;
        }
        if self.in_code_block {
            for line in text.lines() {
                let styled = self.palette.code.apply_to(line);
                self.out.push_str(&format!("    {}\n", styled));
            }
            return;
        }

        if let Some(table) = &mut self.table {
            if table.in_cell {
                if let Some(cell) = table.current_row.last_mut() {
                    cell.push_str(text);
                }
                return;
            }
        }

        let styled = self.current_style().apply_to(text).to_string();
        self.push_inline(&styled);
    }

    fn current_style(&self) -> Style {
        self.styles.last().cloned().unwrap_or_else(Style::new)
    }

    fn push_style(&mut self, f: impl FnOnce(Style) -> Style) {
        let base = self.current_style();
        self.styles.push(f(base));
    }

    fn pop_style(&mut self) {
        if self.styles.len() > 1 {
            self.styles.pop();
        }
    }

    fn push_inline(&mut self, text: &str) {
        if self.line.is_empty() && self.quote_depth > 0 {
            let prefix = "│ ".repeat(self.quote_depth);
            self.line
                .push_str(&self.palette.quote.apply_to(prefix).to_string());
        }
        self.line.push_str(text);
    }

    /// Terminate the current line if it holds anything
    fn flush_line(&mut self) {
        if !self.line.is_empty() {
            self.out.push_str(&self.line);
            self.out.push('\n');
            self.line.clear();
        }
    }

    /// Ensure exactly one blank line separates blocks
    fn blank_line(&mut self) {
        self.flush_line();
        if !self.out.is_empty() && !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn render_table(&mut self, table: TableState) {
        if table.rows.is_empty() {
            return;
        }

        let columns = table.rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for row in &table.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(cell));
            }
        }

        let border = &self.palette.table_border;
        for (idx, row) in table.rows.iter().enumerate() {
            let mut line = String::new();
            for (i, width) in widths.iter().enumerate() {
                let cell = row.get(i).map(|s| s.as_str()).unwrap_or("");
                let pad = width - measure_text_width(cell);
                let text = format!("{}{}", cell, " ".repeat(pad));
                let styled = if idx == 0 {
                    self.palette.table_header.apply_to(text).to_string()
                } else {
                    text
                };
                line.push_str(&styled);
                if i + 1 < columns {
                    line.push_str(&border.apply_to(" │ ").to_string());
                }
            }
            self.out.push_str(line.trim_end());
            self.out.push('\n');

            // Separator under the header row
            if idx == 0 {
                let mut sep = String::new();
                for (i, width) in widths.iter().enumerate() {
                    sep.push_str(&"─".repeat(*width));
                    if i + 1 < columns {
                        sep.push_str("─┼─");
                    }
                }
                self.out.push_str(&border.apply_to(sep).to_string());
                self.out.push('\n');
            }
        }
    }

    fn finish(mut self) -> String {
        self.flush_line();
        let mut out = std::mem::take(&mut self.out);
        while out.ends_with('\n') {
            out.pop();
        }
        out
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console::strip_ansi_codes;

    fn plain(source: &str) -> String {
        let rendered = render_markdown(source, &Palette::light(), 80);
        strip_ansi_codes(&rendered).to_string()
    }

    #[test]
    fn test_paragraphs_separated_by_blank_line() {
        let out = plain("first paragraph\n\nsecond paragraph");
        assert_eq!(out, "first paragraph\n\nsecond paragraph");
    }

    #[test]
    fn test_soft_break_joins_lines() {
        let out = plain("one\ntwo");
        assert_eq!(out, "one two");
    }

    #[test]
    fn test_heading_keeps_depth_marker() {
        let out = plain("## Section");
        assert_eq!(out, "## Section");

        let out = plain("#### Deep");
        assert_eq!(out, "#### Deep");
    }

    #[test]
    fn test_unordered_list_uses_bullets() {
        let out = plain("- one\n- two");
        assert_eq!(out, "• one\n• two");
    }

    #[test]
    fn test_ordered_list_counts_from_start() {
        let out = plain("3. three\n4. four");
        assert_eq!(out, "3. three\n4. four");
    }

    #[test]
    fn test_nested_list_indents() {
        let out = plain("- outer\n  - inner");
        assert_eq!(out, "• outer\n  • inner");
    }

    #[test]
    fn test_inline_code_keeps_backticks() {
        let out = plain("run `memo list` now");
        assert_eq!(out, "run `memo list` now");
    }

    #[test]
    fn test_fenced_code_block_is_indented() {
        let out = plain("```\nlet x = 1;\n```");
        assert_eq!(out, "    let x = 1;");
    }

    #[test]
    fn test_fenced_code_block_shows_language() {
        let out = plain("```rust\nlet x = 1;\n```");
        assert_eq!(out, "    (rust)\n    let x = 1;");
    }

    #[test]
    fn test_blockquote_is_prefixed() {
        let out = plain("> quoted text");
        assert_eq!(out, "│ quoted text");
    }

    #[test]
    fn test_link_shows_destination() {
        let out = plain("see [the docs](https://example.com)");
        assert_eq!(out, "see the docs (https://example.com)");
    }

    #[test]
    fn test_rule_draws_a_line() {
        let out = plain("above\n\n---\n\nbelow");
        assert!(out.contains("────"));
        assert!(out.starts_with("above"));
        assert!(out.ends_with("below"));
    }

    #[test]
    fn test_emphasis_and_strong_survive_as_text() {
        let out = plain("*soft* and **loud**");
        assert_eq!(out, "soft and loud");
    }

    #[test]
    fn test_table_renders_rows_and_separator() {
        let out = plain("| a | b |\n|---|---|\n| 1 | 2 |");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains('a') && lines[0].contains('b'));
        assert!(lines[1].contains('┼'));
        assert!(lines[2].contains('1') && lines[2].contains('2'));
    }

    #[test]
    fn test_loose_list_keeps_marker_on_first_line() {
        let out = plain("- one\n\n- two");
        assert_eq!(out, "• one\n• two");
    }

    #[test]
    fn test_dark_mode_flag() {
        assert!(!is_dark_mode());
        set_dark_mode(true);
        assert!(is_dark_mode());
        set_dark_mode(false);
        assert!(!is_dark_mode());
    }
}
