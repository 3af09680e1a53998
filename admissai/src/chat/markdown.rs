//! Constrained markdown → HTML markup.
//!
//! Supports exactly the dialect the assistant backend produces: `**bold**`,
//! `*italic*`, `` `code` ``, `## ` / `### ` headings, `---` rules, `- ` / `* `
//! bullets, `N. ` numbered items and blank-line paragraphs. Anything else
//! passes through as (escaped) text.
//!
//! The renderer is a pure function: same input, same output, no state.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static ITALIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").unwrap());
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-*] (.+)$").unwrap());
static NUMBERED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\. (.+)$").unwrap());
static PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Which kind of list is currently open during the line scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Bullet,
    Numbered,
}

impl ListKind {
    const fn open_tag(self) -> &'static str {
        match self {
            Self::Bullet => "<ul>",
            Self::Numbered => "<ol>",
        }
    }

    const fn close_tag(self) -> &'static str {
        match self {
            Self::Bullet => "</ul>",
            Self::Numbered => "</ol>",
        }
    }
}

/// Classified source line.
enum Line<'a> {
    Item(ListKind, &'a str),
    Text(&'a str),
}

fn classify(line: &str) -> Line<'_> {
    if let Some(caps) = BULLET.captures(line) {
        if let Some(m) = caps.get(1) {
            return Line::Item(ListKind::Bullet, m.as_str());
        }
    }
    if let Some(caps) = NUMBERED.captures(line) {
        if let Some(m) = caps.get(1) {
            return Line::Item(ListKind::Numbered, m.as_str());
        }
    }
    Line::Text(line)
}

/// Render `text` to HTML markup.
pub fn render(text: &str) -> String {
    let text = text.replace("\r\n", "\n");

    // Each entry is one output line; an open list accumulates in `list`
    // and is flushed as a single line so no line breaks land inside it.
    let mut out: Vec<String> = Vec::new();
    let mut open: Option<ListKind> = None;
    let mut list = String::new();

    for raw in text.split('\n') {
        let escaped = escape_html(raw);
        match classify(&escaped) {
            Line::Item(kind, content) => {
                if let Some(current) = open.filter(|current| *current != kind) {
                    list.push_str(current.close_tag());
                    out.push(std::mem::take(&mut list));
                    open = None;
                }
                if open.is_none() {
                    list.push_str(kind.open_tag());
                    open = Some(kind);
                }
                list.push_str("<li>");
                list.push_str(&inline(content));
                list.push_str("</li>");
            }
            Line::Text(line) => {
                if let Some(current) = open.take() {
                    list.push_str(current.close_tag());
                    out.push(std::mem::take(&mut list));
                }
                out.push(block(line));
            }
        }
    }

    if let Some(current) = open {
        list.push_str(current.close_tag());
        out.push(list);
    }

    let joined = out.join("\n");
    PARAGRAPH_BREAK
        .replace_all(&joined, "</p><p>")
        .replace('\n', "<br>")
}

/// Heading / rule substitution for a non-list line, then inline styles.
fn block(line: &str) -> String {
    if line == "---" {
        return "<hr>".to_string();
    }
    if let Some(rest) = line.strip_prefix("### ").filter(|r| !r.is_empty()) {
        return format!("<h4>{}</h4>", inline(rest));
    }
    if let Some(rest) = line.strip_prefix("## ").filter(|r| !r.is_empty()) {
        return format!("<h3>{}</h3>", inline(rest));
    }
    inline(line)
}

/// Bold, then italic, then inline code. Bold must run first so `**x**` is
/// not read as two empty italics.
fn inline(text: &str) -> String {
    let text = BOLD.replace_all(text, "<strong>$1</strong>");
    let text = ITALIC.replace_all(&text, "<em>$1</em>");
    CODE.replace_all(&text, "<code>$1</code>").into_owned()
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
