//! Lightweight markdown → HTML renderer for note bodies.
//!
//! Rendering is a fixed chain of independent text passes. Block passes run
//! before inline passes, and the checklist pass runs before the generic
//! unordered-list pass because both match a leading `- ` / `* `.
//! Malformed markup is left as literal text; nothing here can fail.

use regex::{Captures, Regex};
use std::sync::LazyLock;

fn re(pattern: &str) -> Regex {
    // Patterns are literals in this file.
    Regex::new(pattern).expect("static markdown pattern")
}

static H3: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^### (.*)$"));
static H2: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^## (.*)$"));
static H1: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^# (.*)$"));
static BLOCKQUOTE: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^> (.*)$"));
static HR: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^(?:---|\*\*\*|___)[ \t]*$"));
static CHECKLIST: LazyLock<Regex> =
    LazyLock::new(|| re(r"(?m)^[ \t]*[-*] \[([ xX])\](?: (.*))?$"));
static UL_ITEM: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^[ \t]*[-*] (.*)$"));
static OL_ITEM: LazyLock<Regex> = LazyLock::new(|| re(r"(?m)^[ \t]*\d+\. (.*)$"));
static LINK: LazyLock<Regex> = LazyLock::new(|| re(r"\[([^\]\n]*)\]\(([^)\n]*)\)"));
static BOLD_STARS: LazyLock<Regex> = LazyLock::new(|| re(r"\*\*([^\n]+?)\*\*"));
static BOLD_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| re(r"\b__([^\n]+?)__\b"));
static ITALIC_STAR: LazyLock<Regex> = LazyLock::new(|| re(r"\*([^*\n]+)\*"));
static ITALIC_UNDERSCORE: LazyLock<Regex> = LazyLock::new(|| re(r"\b_([^_\n]+)_\b"));
static STRIKE: LazyLock<Regex> = LazyLock::new(|| re(r"~~([^\n]+?)~~"));
static CODE: LazyLock<Regex> = LazyLock::new(|| re(r"`([^`\n]+)`"));
static BLOCK_LINE: LazyLock<Regex> =
    LazyLock::new(|| re(r"^</?(?:h[1-3]|ul|ol|li|blockquote|hr|div)"));

const CHECKBOX_CHECKED: &str =
    r#"<div class="flex items-start gap-2"><input type="checkbox" checked disabled class="mt-1" /><span>"#;
const CHECKBOX_UNCHECKED: &str =
    r#"<div class="flex items-start gap-2"><input type="checkbox" disabled class="mt-1" /><span>"#;

/// Render note markdown to an HTML fragment.
pub(crate) fn render(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut html = escape_html(&text.replace("\r\n", "\n"));

    // Block passes.
    html = headings(&html);
    html = blockquotes(&html);
    html = horizontal_rules(&html);
    html = checklist_lines(&html);
    html = unordered_lists(&html);
    html = ordered_lists(&html);

    // Inline passes.
    html = links(&html);
    html = bold(&html);
    html = italic(&html);
    html = strikethrough(&html);
    html = inline_code(&html);

    paragraphs(&html)
}

/// `&`, `<` and `"` are neutralised; `>` is kept so blockquotes still parse.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn headings(html: &str) -> String {
    let html = H3.replace_all(html, "<h3>${1}</h3>");
    let html = H2.replace_all(&html, "<h2>${1}</h2>");
    H1.replace_all(&html, "<h1>${1}</h1>").into_owned()
}

pub(crate) fn blockquotes(html: &str) -> String {
    BLOCKQUOTE
        .replace_all(html, "<blockquote>${1}</blockquote>")
        .into_owned()
}

pub(crate) fn horizontal_rules(html: &str) -> String {
    HR.replace_all(html, "<hr>").into_owned()
}

pub(crate) fn checklist_lines(html: &str) -> String {
    CHECKLIST
        .replace_all(html, |caps: &Captures| {
            let open = if caps[1].trim().is_empty() {
                CHECKBOX_UNCHECKED
            } else {
                CHECKBOX_CHECKED
            };
            let text = caps.get(2).map_or("", |m| m.as_str());
            format!("{open}{text}</span></div>")
        })
        .into_owned()
}

pub(crate) fn unordered_lists(html: &str) -> String {
    UL_ITEM
        .replace_all(html, "<ul><li>${1}</li></ul>")
        .replace("</ul>\n<ul>", "")
}

pub(crate) fn ordered_lists(html: &str) -> String {
    OL_ITEM
        .replace_all(html, "<ol><li>${1}</li></ol>")
        .replace("</ol>\n<ol>", "")
}

pub(crate) fn links(html: &str) -> String {
    LINK.replace_all(html, |caps: &Captures| {
        let href = safe_href(&caps[2]);
        format!(
            r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            &caps[1]
        )
    })
    .into_owned()
}

fn safe_href(url: &str) -> &str {
    let scheme = url.trim_start().to_ascii_lowercase();
    if scheme.starts_with("javascript:") || scheme.starts_with("vbscript:") {
        "#"
    } else {
        url
    }
}

pub(crate) fn bold(html: &str) -> String {
    let html = BOLD_STARS.replace_all(html, "<strong>${1}</strong>");
    BOLD_UNDERSCORES
        .replace_all(&html, "<strong>${1}</strong>")
        .into_owned()
}

pub(crate) fn italic(html: &str) -> String {
    let html = ITALIC_STAR.replace_all(html, "<em>${1}</em>");
    ITALIC_UNDERSCORE
        .replace_all(&html, "<em>${1}</em>")
        .into_owned()
}

pub(crate) fn strikethrough(html: &str) -> String {
    STRIKE.replace_all(html, "<s>${1}</s>").into_owned()
}

pub(crate) fn inline_code(html: &str) -> String {
    CODE.replace_all(html, "<code>${1}</code>").into_owned()
}

/// Wraps every line that is not already a block element in `<p>`; blank
/// lines become `<br>`. Lines are joined without separators.
pub(crate) fn paragraphs(html: &str) -> String {
    html.split('\n')
        .map(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                "<br>".to_string()
            } else if BLOCK_LINE.is_match(trimmed) {
                line.to_string()
            } else {
                format!("<p>{line}</p>")
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_renders_nothing() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn test_whitespace_only_renders_line_breaks() {
        assert_eq!(render("\n\n"), "<br><br><br>");
        assert_eq!(render("  \n "), "<br><br>");
    }

    #[test]
    fn test_checked_item_renders_checkbox_not_bullet() {
        let html = render("- [x] done");
        assert_eq!(
            html,
            r#"<div class="flex items-start gap-2"><input type="checkbox" checked disabled class="mt-1" /><span>done</span></div>"#
        );
        assert!(!html.contains("<li>"));
    }

    #[test]
    fn test_unchecked_item_is_not_checked() {
        let html = render("- [ ] todo");
        assert!(html.contains(r#"<input type="checkbox" disabled"#));
        assert!(html.contains("<span>todo</span>"));
    }

    #[test]
    fn test_checklist_and_bullets_mix() {
        let html = render("- [X] a\n- b");
        assert!(html.contains("checked disabled"));
        assert!(html.contains("<ul><li>b</li></ul>"));
    }

    #[test]
    fn test_consecutive_list_items_merge() {
        assert_eq!(render("- a\n* b"), "<ul><li>a</li><li>b</li></ul>");
        assert_eq!(render("1. a\n2. b"), "<ol><li>a</li><li>b</li></ol>");
    }

    #[test]
    fn test_headings_quote_and_rule() {
        assert_eq!(render("# A"), "<h1>A</h1>");
        assert_eq!(render("## A"), "<h2>A</h2>");
        assert_eq!(render("### A"), "<h3>A</h3>");
        assert_eq!(render("> q"), "<blockquote>q</blockquote>");
        assert_eq!(render("---"), "<hr>");
        assert_eq!(render("***"), "<hr>");
    }

    #[test]
    fn test_inline_markup() {
        assert_eq!(render("**b** and *i*"), "<p><strong>b</strong> and <em>i</em></p>");
        assert_eq!(render("__b__ _i_"), "<p><strong>b</strong> <em>i</em></p>");
        assert_eq!(render("~~gone~~"), "<p><s>gone</s></p>");
        assert_eq!(render("use `cargo`"), "<p>use <code>cargo</code></p>");
    }

    #[test]
    fn test_link_renders_anchor() {
        assert_eq!(
            render("[site](https://example.com)"),
            r#"<p><a href="https://example.com" target="_blank" rel="noopener noreferrer">site</a></p>"#
        );
    }

    #[test]
    fn test_script_links_are_neutralised() {
        assert!(render("[x](javascript:alert(1)").contains(r##"href="#""##));
    }

    #[test]
    fn test_unterminated_bold_is_literal() {
        assert_eq!(render("a ** b"), "<p>a ** b</p>");
        assert_eq!(render("**open"), "<p>**open</p>");
    }

    #[test]
    fn test_snake_case_is_not_italicised() {
        assert_eq!(render("my_var_name"), "<p>my_var_name</p>");
    }

    #[test]
    fn test_html_is_escaped() {
        assert_eq!(render("<b>x</b>"), "<p>&lt;b>x&lt;/b></p>");
    }

    #[test]
    fn test_blank_lines_between_paragraphs() {
        assert_eq!(render("a\n\nb"), "<p>a</p><br><p>b</p>");
    }

    #[test]
    fn test_crlf_input() {
        assert_eq!(render("- a\r\n- b"), "<ul><li>a</li><li>b</li></ul>");
    }
}
