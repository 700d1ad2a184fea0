// src/util/text.rs

/// Extract the first non-empty line of a note body, trimmed.
///
/// # Examples
///
/// ```
/// use notex::util::text::first_line;
///
/// let content = "\n  Shopping list  \nmilk\neggs";
/// assert_eq!(first_line(content), "Shopping list");
/// ```
pub fn first_line(text: &str) -> &str {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("")
}

/// Shorten `text` to at most `max_chars` characters, marking the cut with `…`.
///
/// Counts characters, not bytes, so multi-byte text is never split.
pub fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut shortened: String = text.chars().take(max_chars - 1).collect();
    shortened.push('…');
    shortened
}

/// Pad or shorten `text` so it occupies exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let shortened = truncate(text, width);
    let padding = width.saturating_sub(shortened.chars().count());
    format!("{shortened}{}", " ".repeat(padding))
}

/// Hide all but the last four characters of a secret such as an API token.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_leading_blank_lines_when_extracting_first_line_then_skips_them() {
        assert_eq!(first_line("\n\n  Title\nbody"), "Title");
    }

    #[test]
    fn given_empty_text_when_extracting_first_line_then_returns_empty_string() {
        assert_eq!(first_line(""), "");
        assert_eq!(first_line("  \n \t\n"), "");
    }

    #[test]
    fn given_short_text_when_truncating_then_returns_unchanged() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exact", 5), "exact");
    }

    #[test]
    fn given_long_text_when_truncating_then_marks_cut() {
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
    }

    #[test]
    fn given_multibyte_text_when_truncating_then_counts_characters() {
        assert_eq!(truncate("äöüäöü", 4), "äöü…");
    }

    #[test]
    fn given_zero_width_when_truncating_then_returns_empty_string() {
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn given_short_text_when_fitting_then_pads_to_width() {
        assert_eq!(fit("ab", 4), "ab  ");
        assert_eq!(fit("abcdef", 4), "abc…");
    }

    #[test]
    fn given_token_when_masking_then_shows_last_four_characters() {
        assert_eq!(mask_secret("patABCDEFGH1234"), "***********1234");
        assert_eq!(mask_secret("abc"), "***");
    }
}
