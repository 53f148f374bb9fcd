//! Caption shaping helpers shared by the publish targets.

/// Truncate to at most `max_chars` characters without splitting a code point.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Truncate to `max_chars`, ending in `...` when anything was cut.
pub(crate) fn truncate_with_ellipsis(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    format!("{}...", truncate_chars(text, keep))
}

/// Join a caption and rendered hashtags with `separator`, omitting it when there are no tags.
pub(crate) fn with_hashtags(caption: &str, hashtags: &[String], separator: &str) -> String {
    if hashtags.is_empty() {
        caption.to_string()
    } else {
        format!("{}{}{}", caption, separator, hashtags.join(" "))
    }
}
