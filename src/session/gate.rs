//! Activation keyword filter

/// If the first word of `text` is `keyword`, return the rest of the text.
///
/// Matching is case-insensitive and ignores trailing punctuation on the
/// first word ("Home, turn on..."). Anything else returns `None` and is left
/// to the assistant.
pub fn strip_activation_keyword<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let text = text.trim_start();
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    let (first, rest) = text.split_at(end);

    let first = first.trim_end_matches([',', '.', '!', '?', ':']);
    if first.eq_ignore_ascii_case(keyword) {
        Some(rest.trim_start())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_prefix() {
        assert_eq!(
            strip_activation_keyword("home turn on the office light", "home"),
            Some("turn on the office light")
        );
    }

    #[test]
    fn test_keyword_case_and_punctuation() {
        assert_eq!(
            strip_activation_keyword("Home, reboot the system", "home"),
            Some("reboot the system")
        );
    }

    #[test]
    fn test_keyword_alone() {
        assert_eq!(strip_activation_keyword("home", "home"), Some(""));
    }

    #[test]
    fn test_keyword_must_be_first_word() {
        assert_eq!(strip_activation_keyword("welcome home", "home"), None);
        assert_eq!(strip_activation_keyword("turn on the light at home", "home"), None);
    }

    #[test]
    fn test_keyword_must_be_whole_word() {
        assert_eq!(strip_activation_keyword("homework due tomorrow", "home"), None);
    }
}
