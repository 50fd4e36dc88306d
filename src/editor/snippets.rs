//! Markdown fragments inserted from the toolbar and shortcuts.
//!
//! Wrapping snippets act on the selection; templates are dropped in at the
//! cursor as-is.

use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;

use super::EditorBuffer;

/// Text used in place of an empty selection for wrapping snippets.
pub const PLACEHOLDER: &str = "텍스트";
pub const LINK_PLACEHOLDER: &str = "링크 텍스트";
pub const IMAGE_PLACEHOLDER: &str = "이미지 설명";

pub const LINK_URL: &str = "https://url.com";
pub const IMAGE_URL: &str = "https://url.com/image.png";

const TABLE_STUB: &str = "
| 제목1 | 제목2 | 제목3 |
|-------|-------|-------|
| 내용1 | 내용2 | 내용3 |
| 내용4 | 내용5 | 내용6 |
";

const CODE_FENCE: &str = "
```javascript
// 코드를 입력하세요
console.log('Hello, World!');
```
";

const MATH_EXAMPLE: &str = "
수식 예제:
- 인라인: $E = mc^2$
- 블록: $$\\int_{a}^{b} f(x)dx = F(b) - F(a)$$
";

const DETAILS: &str = "
<details>
<summary>자세히 보기</summary>

접힌 내용을 입력하세요.

</details>
";

const HORIZONTAL_RULE: &str = "\n---\n";

const QUOTE: &str = "\n> 인용문을 입력하세요\n";

const FOOTNOTE_MAX: u32 = 9999;

static FOOTNOTE_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\[\^(\d+)\]").expect("footnote label pattern is valid")
});

/// Inline formats that wrap the selection in a pair of delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Wrap {
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
}

impl Wrap {
    pub const fn delimiters(self) -> (&'static str, &'static str) {
        match self {
            Self::Bold => ("**", "**"),
            Self::Italic => ("*", "*"),
            Self::Strikethrough => ("~~", "~~"),
            Self::InlineCode => ("`", "`"),
        }
    }
}

/// Fixed blocks inserted at the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Table,
    CodeFence,
    Math,
    Footnote,
    Details,
    HorizontalRule,
    Quote,
}

/// Any toolbar/shortcut insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Snippet {
    Wrap(Wrap),
    Link,
    Image,
    Template(Template),
}

/// Apply a snippet to the buffer.
pub fn apply(buffer: &mut EditorBuffer, snippet: Snippet) {
    match snippet {
        Snippet::Wrap(wrap) => {
            let (before, after) = wrap.delimiters();
            wrap_selection(buffer, before, after);
        }
        Snippet::Link => insert_link(buffer),
        Snippet::Image => insert_image(buffer),
        Snippet::Template(template) => insert_template(buffer, template),
    }
}

/// Wrap the selection in `before`/`after`.
///
/// With no selection, `before + PLACEHOLDER + after` is inserted and the
/// placeholder is left selected so typing replaces it.
pub fn wrap_selection(buffer: &mut EditorBuffer, before: &str, after: &str) {
    if let Some(selected) = buffer.selected_text() {
        buffer.replace_selection(&format!("{before}{selected}{after}"));
        return;
    }
    let start = buffer.cursor_offset() + before.chars().count();
    buffer.insert_str(&format!("{before}{PLACEHOLDER}{after}"));
    buffer.select_chars(start, start + PLACEHOLDER.chars().count());
}

/// `[text](https://url.com)` around the selection or the link placeholder.
pub fn insert_link(buffer: &mut EditorBuffer) {
    let text = buffer
        .selected_text()
        .unwrap_or_else(|| LINK_PLACEHOLDER.to_string());
    buffer.replace_selection(&format!("[{text}]({LINK_URL})"));
}

/// `![alt](https://url.com/image.png)` around the selection or the image placeholder.
pub fn insert_image(buffer: &mut EditorBuffer) {
    let alt = buffer
        .selected_text()
        .unwrap_or_else(|| IMAGE_PLACEHOLDER.to_string());
    buffer.replace_selection(&format!("![{alt}]({IMAGE_URL})"));
}

/// Insert a fixed template at the cursor.
///
/// Templates ignore the selection: it is collapsed, not replaced.
pub fn insert_template(buffer: &mut EditorBuffer, template: Template) {
    let text = match template {
        Template::Table => TABLE_STUB,
        Template::CodeFence => CODE_FENCE,
        Template::Math => MATH_EXAMPLE,
        Template::Details => DETAILS,
        Template::HorizontalRule => HORIZONTAL_RULE,
        Template::Quote => QUOTE,
        Template::Footnote => {
            insert_footnote(buffer, &mut rand::thread_rng());
            return;
        }
    };
    buffer.clear_selection();
    buffer.insert_str(text);
}

/// Insert a footnote reference at the cursor and its definition at the end
/// of the document.
///
/// Labels are drawn from `1..=9999` and redrawn while the buffer already
/// uses them. Returns the chosen label.
pub fn insert_footnote<R: Rng + ?Sized>(buffer: &mut EditorBuffer, rng: &mut R) -> u32 {
    let text = buffer.text();
    let label = unused_footnote_label(&text, rng);

    buffer.clear_selection();
    buffer.insert_str(&format!("[^{label}]"));
    let resume = buffer.cursor_offset();

    let current = buffer.text();
    let separator = if current.ends_with("\n\n") {
        ""
    } else if current.ends_with('\n') {
        "\n"
    } else {
        "\n\n"
    };
    buffer.move_to_offset(buffer.len_chars());
    buffer.insert_str(&format!("{separator}[^{label}]: 각주 내용\n"));

    buffer.move_to_offset(resume);
    label
}

/// Pick a label in `1..=9999` not already referenced in `text`.
///
/// Falls back to the smallest free number once every random draw has
/// collided, so a label is always returned.
pub fn unused_footnote_label<R: Rng + ?Sized>(text: &str, rng: &mut R) -> u32 {
    let used: std::collections::HashSet<u32> = FOOTNOTE_LABEL
        .captures_iter(text)
        .filter_map(|caps| caps.get(1)?.as_str().parse().ok())
        .collect();

    for _ in 0..64 {
        let candidate = rng.gen_range(1..=FOOTNOTE_MAX);
        if !used.contains(&candidate) {
            return candidate;
        }
    }
    (1..=FOOTNOTE_MAX)
        .find(|n| !used.contains(n))
        .unwrap_or(FOOTNOTE_MAX + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_bold_wraps_selection_and_clears_it() {
        let mut buf = EditorBuffer::from_text("hello world");
        buf.select_chars(0, 5);
        wrap_selection(&mut buf, "**", "**");
        assert_eq!(buf.text(), "**hello** world");
        assert!(!buf.has_selection());
    }

    #[test]
    fn test_wrap_without_selection_selects_placeholder() {
        let mut buf = EditorBuffer::from_text("");
        apply(&mut buf, Snippet::Wrap(Wrap::Strikethrough));
        assert_eq!(buf.text(), "~~텍스트~~");
        assert_eq!(buf.selected_text().as_deref(), Some(PLACEHOLDER));

        buf.insert_str("대체");
        assert_eq!(buf.text(), "~~대체~~");
    }

    #[test]
    fn test_italic_and_code_delimiters() {
        assert_eq!(Wrap::Italic.delimiters(), ("*", "*"));
        assert_eq!(Wrap::InlineCode.delimiters(), ("`", "`"));
    }

    #[test]
    fn test_link_uses_selection_as_text() {
        let mut buf = EditorBuffer::from_text("see docs");
        buf.select_chars(4, 8);
        insert_link(&mut buf);
        assert_eq!(buf.text(), "see [docs](https://url.com)");
    }

    #[test]
    fn test_link_without_selection_uses_placeholder() {
        let mut buf = EditorBuffer::from_text("");
        insert_link(&mut buf);
        assert_eq!(buf.text(), "[링크 텍스트](https://url.com)");
    }

    #[test]
    fn test_image_without_selection_uses_placeholder() {
        let mut buf = EditorBuffer::from_text("");
        insert_image(&mut buf);
        assert_eq!(buf.text(), "![이미지 설명](https://url.com/image.png)");
    }

    #[test]
    fn test_template_ignores_selection() {
        let mut buf = EditorBuffer::from_text("keep");
        buf.select_all();
        insert_template(&mut buf, Template::HorizontalRule);
        assert_eq!(buf.text(), "keep\n---\n");
    }

    #[test]
    fn test_table_stub_has_two_body_rows() {
        let mut buf = EditorBuffer::from_text("");
        insert_template(&mut buf, Template::Table);
        let text = buf.text();
        assert!(text.contains("| 제목1 | 제목2 | 제목3 |"));
        assert!(text.contains("| 내용4 | 내용5 | 내용6 |"));
    }

    #[test]
    fn test_code_fence_is_closed() {
        let mut buf = EditorBuffer::from_text("");
        insert_template(&mut buf, Template::CodeFence);
        assert_eq!(buf.text().matches("```").count(), 2);
    }

    #[test]
    fn test_footnote_inserts_reference_and_definition() {
        let mut buf = EditorBuffer::from_text("본문");
        buf.move_end();
        let mut rng = StdRng::seed_from_u64(7);
        let label = insert_footnote(&mut buf, &mut rng);
        assert!((1..=9999).contains(&label));
        assert_eq!(
            buf.text(),
            format!("본문[^{label}]\n\n[^{label}]: 각주 내용\n")
        );
        assert_eq!(buf.cursor_offset(), "본문".chars().count() + format!("[^{label}]").len());
    }

    #[test]
    fn test_footnote_label_avoids_existing_labels() {
        let taken: String = (1..=9998).map(|n| format!("[^{n}]")).collect();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(unused_footnote_label(&taken, &mut rng), 9999);
    }

    #[test]
    fn test_footnote_labels_stay_unique_across_inserts() {
        let mut buf = EditorBuffer::from_text("");
        let mut rng = StdRng::seed_from_u64(42);
        let first = insert_footnote(&mut buf, &mut rng);
        let second = insert_footnote(&mut buf, &mut rng);
        assert_ne!(first, second);
    }
}
