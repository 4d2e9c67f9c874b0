//! Plan-text to HTML list markup.
//!
//! Generated plans use an informal asterisk convention: `**` opens a section
//! item, `* ` separates items, `***` breaks into a fresh list. The formatter
//! is a fixed sequence of literal substitutions, not a markdown parser; text
//! that strays from the convention produces malformed markup, never an error.

/// Rewrite asterisk markers into `<ul>`/`<li>` tags.
///
/// Substitutions apply in order (longest marker first), then a closing
/// item/list pair is appended:
/// 1. `***` → `</ul><ul>`
/// 2. `**`  → `<ul><li>`
/// 3. `* `  → `</li><li>`
pub fn format_plan_text(raw: &str) -> String {
    let text = raw.replace("***", "</ul><ul>");
    let text = text.replace("**", "<ul><li>");
    let mut text = text.replace("* ", "</li><li>");
    text.push_str("</li></ul>");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_item_list() {
        assert_eq!(
            format_plan_text("**Item one* Item two"),
            "<ul><li>Item one</li><li>Item two</li></ul>"
        );
    }

    #[test]
    fn test_triple_asterisk_breaks_list_before_double_rule() {
        // "***" must be consumed as a section break, not as "**" + "*".
        assert_eq!(
            format_plan_text("**First* Second***Next"),
            "<ul><li>First</li><li>Second</ul><ul>Next</li></ul>"
        );
    }

    #[test]
    fn test_item_separator_needs_trailing_space() {
        // A bare "*" with no following space is left alone.
        assert_eq!(format_plan_text("5*3 sets"), "5*3 sets</li></ul>");
    }

    #[test]
    fn test_empty_input_still_closes_list() {
        assert_eq!(format_plan_text(""), "</li></ul>");
    }

    #[test]
    fn test_plain_text_passes_through() {
        assert_eq!(
            format_plan_text("Drink more water"),
            "Drink more water</li></ul>"
        );
    }
}
