//! Note body normalisation: legacy checklist items vs. markdown text.

pub(crate) mod editor;

use crate::markdown::escape_html;
use crate::models::{ImageAttachment, ListItem, Note, NoteBody};
use std::borrow::Cow;

/// One line of an interactive checklist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub checked: bool,
}

/// A body is edited as a checklist when its trimmed text starts with a
/// checklist marker (`- [ ]`, `- [x]`, `- [X]`).
pub(crate) fn is_checklist(content: &str) -> bool {
    let bytes = content.trim().as_bytes();
    bytes.len() >= 5
        && bytes.starts_with(b"- [")
        && matches!(bytes[3], b' ' | b'x' | b'X')
        && bytes[4] == b']'
}

/// Parses `- [ ] text` / `- [x] text` lines. Blank lines and lines without
/// a marker are dropped.
pub(crate) fn parse_checklist(content: &str, id_seed: i64) -> Vec<ChecklistItem> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .filter_map(|(index, line)| {
            let (checked, text) = parse_checklist_line(line)?;
            Some(ChecklistItem {
                id: format!("{id_seed}-{index}"),
                text: text.to_string(),
                checked,
            })
        })
        .collect()
}

fn parse_checklist_line(line: &str) -> Option<(bool, &str)> {
    let rest = line.strip_prefix("- [")?;
    let mut chars = rest.chars();
    let mark = chars.next()?;
    let checked = match mark {
        'x' | 'X' => true,
        c if c.is_whitespace() => false,
        _ => return None,
    };
    let rest = chars.as_str().strip_prefix(']')?;
    // The space after `]` is optional only for an empty item.
    match rest.strip_prefix(' ') {
        Some(text) => Some((checked, text)),
        None if rest.trim().is_empty() => Some((checked, "")),
        None => None,
    }
}

fn checklist_line(checked: bool, text: &str) -> String {
    format!("- [{}] {}", if checked { 'x' } else { ' ' }, text)
}

pub(crate) fn checklist_to_markdown(items: &[ChecklistItem]) -> String {
    items
        .iter()
        .map(|item| checklist_line(item.checked, &item.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Legacy items as markdown checklist lines. Only the top level is emitted.
pub(crate) fn list_items_to_markdown(items: &[ListItem]) -> String {
    items
        .iter()
        .map(|item| checklist_line(item.checked, &item.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Markdown view of a body, suitable for rendering or editing.
pub(crate) fn body_markdown(body: &NoteBody) -> Cow<'_, str> {
    match body {
        NoteBody::Checklist(items) => Cow::Owned(list_items_to_markdown(items)),
        NoteBody::Markdown(text) => Cow::Borrowed(text),
    }
}

/// Every item text of a legacy checklist, nested items included.
pub(crate) fn flatten_item_texts(items: &[ListItem]) -> Vec<&str> {
    let mut out = Vec::new();
    for item in items {
        out.push(item.text.as_str());
        if let Some(sub) = &item.sub_items {
            out.extend(flatten_item_texts(sub));
        }
    }
    out
}

/// Plain text for copying: checklist lines become `☑ text` / `☐ text`.
pub(crate) fn copy_text(body: &NoteBody) -> String {
    match body {
        NoteBody::Checklist(items) => {
            let mut out = String::new();
            push_plain_items(&mut out, items, 0);
            out
        }
        NoteBody::Markdown(text) if is_checklist(text) => text
            .lines()
            .filter_map(parse_checklist_line)
            .map(|(checked, text)| format!("{} {}", checkbox_glyph(checked), text))
            .collect::<Vec<_>>()
            .join("\n"),
        NoteBody::Markdown(text) => text.clone(),
    }
}

fn checkbox_glyph(checked: bool) -> char {
    if checked {
        '☑'
    } else {
        '☐'
    }
}

fn push_plain_items(out: &mut String, items: &[ListItem], level: usize) {
    for item in items {
        out.push_str(&"  ".repeat(level));
        out.push(checkbox_glyph(item.checked));
        out.push(' ');
        out.push_str(&item.text);
        out.push('\n');
        if let Some(sub) = &item.sub_items {
            push_plain_items(out, sub, level + 1);
        }
    }
}

/// What one copy action puts on the clipboard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Clip {
    /// Copy text with the greeting token expanded.
    pub text: String,
    /// Attachment sources, in note order.
    pub images: Vec<String>,
}

impl Clip {
    pub fn new(body: &NoteBody, images: &[ImageAttachment], hour: u32) -> Self {
        let text = copy_text(body);
        Self {
            text: apply_greeting(&text, hour).into_owned(),
            images: images.iter().map(|img| img.src.clone()).collect(),
        }
    }

    pub fn of_note(note: &Note, hour: u32) -> Self {
        Self::new(&note.body, &note.images, hour)
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// The `text/html` flavour: the text in a `<div>` with line breaks, then
    /// every image inline. Attachments are data URLs, so the fragment is
    /// self-contained.
    pub fn html(&self) -> String {
        let mut html = format!("<div>{}</div>", escape_html(&self.text).replace('\n', "<br />"));
        for src in &self.images {
            html.push_str(&format!(
                r#"<br><img src="{}" alt="Attached image" style="max-width: 100%; height: auto;" />"#,
                escape_html(src)
            ));
        }
        html
    }
}

/// Short marker-free preview used by list-mode cards and quick search.
pub(crate) fn snippet(note: &Note) -> String {
    match &note.body {
        NoteBody::Checklist(items) => flatten_item_texts(items).join(" "),
        NoteBody::Markdown(text) => text
            .lines()
            .map(strip_line_markers)
            .collect::<Vec<_>>()
            .join("\n")
            .replace("**", "")
            .replace("__", "")
            .replace("~~", "")
            .replace('`', ""),
    }
}

fn strip_line_markers(line: &str) -> &str {
    let line = line.trim_start();
    let line = line.trim_start_matches('#').trim_start();
    if let Some(rest) = line
        .strip_prefix("- [ ] ")
        .or_else(|| line.strip_prefix("- [x] "))
        .or_else(|| line.strip_prefix("- [X] "))
    {
        return rest;
    }
    line.strip_prefix("- ")
        .or_else(|| line.strip_prefix("* "))
        .or_else(|| line.strip_prefix("+ "))
        .unwrap_or(line)
}

pub(crate) const GREETING_TOKEN: &str = "(Cordial greeting)";

pub(crate) fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        6..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    }
}

/// Expands the greeting token to a time-of-day greeting.
pub(crate) fn apply_greeting(text: &str, hour: u32) -> Cow<'_, str> {
    if text.contains(GREETING_TOKEN) {
        Cow::Owned(text.replace(GREETING_TOKEN, greeting_for_hour(hour)))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, NoteStatus};

    fn item(id: i64, text: &str, checked: bool) -> ListItem {
        ListItem {
            id,
            text: text.to_string(),
            checked,
            sub_items: None,
        }
    }

    fn note_with(body: NoteBody) -> Note {
        Note {
            id: 1,
            created_at: 1,
            title: String::new(),
            body,
            pinned: false,
            status: NoteStatus::Active,
            color: None,
            images: vec![],
            cover: None,
            folder_id: GroupId(1.0),
            category_id: GroupId(101.0),
            tags: vec![],
            history: vec![],
        }
    }

    #[test]
    fn test_checklist_detection() {
        assert!(is_checklist("- [ ] a"));
        assert!(is_checklist("  \n- [x] a"));
        assert!(is_checklist("- [X]"));
        assert!(!is_checklist("- a"));
        assert!(!is_checklist("text\n- [ ] a"));
        assert!(!is_checklist(""));
    }

    #[test]
    fn test_checklist_round_trip_preserves_pairs() {
        let items = vec![
            ChecklistItem { id: "a".into(), text: "milk".into(), checked: false },
            ChecklistItem { id: "b".into(), text: "eggs [x]".into(), checked: true },
            ChecklistItem { id: "c".into(), text: "".into(), checked: false },
            ChecklistItem { id: "d".into(), text: "  padded".into(), checked: true },
        ];
        let parsed = parse_checklist(&checklist_to_markdown(&items), 7);
        let pairs: Vec<_> = parsed.iter().map(|i| (i.text.as_str(), i.checked)).collect();
        assert_eq!(
            pairs,
            vec![("milk", false), ("eggs [x]", true), ("", false), ("  padded", true)]
        );
    }

    #[test]
    fn test_parse_drops_unmarked_lines() {
        let items = parse_checklist("- [x] a\nnot an item\n\n- [ ] b", 1);
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].text, "b");
    }

    #[test]
    fn test_legacy_items_to_markdown_ignores_nesting() {
        let mut parent = item(1, "parent", true);
        parent.sub_items = Some(vec![item(2, "child", false)]);
        let md = list_items_to_markdown(&[parent, item(3, "next", false)]);
        assert_eq!(md, "- [x] parent\n- [ ] next");
    }

    #[test]
    fn test_flatten_includes_nested_items() {
        let mut parent = item(1, "parent", true);
        parent.sub_items = Some(vec![item(2, "child", false)]);
        assert_eq!(flatten_item_texts(&[parent]), vec!["parent", "child"]);
    }

    #[test]
    fn test_copy_text_uses_checkbox_glyphs() {
        let note = note_with(NoteBody::Markdown("- [x] a\n- [ ] b".to_string()));
        assert_eq!(copy_text(&note.body), "☑ a\n☐ b");

        let mut parent = item(1, "p", false);
        parent.sub_items = Some(vec![item(2, "c", true)]);
        let legacy = note_with(NoteBody::Checklist(vec![parent]));
        assert_eq!(copy_text(&legacy.body), "☐ p\n  ☑ c\n");
    }

    #[test]
    fn test_clip_html_embeds_images_after_text() {
        let mut note = note_with(NoteBody::Markdown("(Cordial greeting)\nTom & Jerry <3".to_string()));
        note.images = vec![
            ImageAttachment::new("data:image/png;base64,AAA"),
            ImageAttachment::new("data:image/png;base64,BBB"),
        ];
        let clip = Clip::of_note(&note, 9);

        assert_eq!(clip.text, "Good morning\nTom & Jerry <3");
        assert!(clip.has_images());
        let html = clip.html();
        assert!(html.starts_with("<div>Good morning<br />Tom &amp; Jerry &lt;3</div>"));
        assert_eq!(html.matches("<img ").count(), 2);
        let first = html.find("AAA").expect("first image");
        let second = html.find("BBB").expect("second image");
        assert!(first < second);
    }

    #[test]
    fn test_clip_without_images_is_text_only() {
        let clip = Clip::of_note(&note_with(NoteBody::Markdown("- [ ] milk".to_string())), 20);
        assert_eq!(clip.text, "☐ milk");
        assert!(!clip.has_images());
        assert_eq!(clip.html(), "<div>☐ milk</div>");
    }

    #[test]
    fn test_snippet_strips_markers() {
        let note = note_with(NoteBody::Markdown("# Title\n- [ ] **task**\n* item".to_string()));
        assert_eq!(snippet(&note), "Title\ntask\nitem");
    }

    #[test]
    fn test_greeting_token() {
        assert_eq!(apply_greeting("(Cordial greeting), Ana", 9), "Good morning, Ana");
        assert_eq!(apply_greeting("(Cordial greeting)", 15), "Good afternoon");
        assert_eq!(apply_greeting("(Cordial greeting)", 23), "Good evening");
        assert_eq!(apply_greeting("(Cordial greeting)", 3), "Good evening");
        assert!(matches!(apply_greeting("plain", 9), Cow::Borrowed(_)));
    }
}
