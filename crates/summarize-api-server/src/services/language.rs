/// Output languages the summarizer knows by name.
const LANGUAGE_NAMES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("zh", "Chinese"),
    ("ja", "Japanese"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("pt", "Portuguese"),
];

pub const DEFAULT_LANGUAGE_NAME: &str = "English";

/// Human-readable name for a language code; unknown codes fall back to English.
pub fn language_name(code: &str) -> &'static str {
    LANGUAGE_NAMES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
        .unwrap_or(DEFAULT_LANGUAGE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(language_name("en"), "English");
        assert_eq!(language_name("es"), "Spanish");
        assert_eq!(language_name("zh"), "Chinese");
        assert_eq!(language_name("hi"), "Hindi");
        assert_eq!(language_name("pt"), "Portuguese");
    }

    #[test]
    fn test_unknown_code_falls_back_to_english() {
        assert_eq!(language_name("xx"), "English");
        assert_eq!(language_name(""), "English");
        assert_eq!(language_name("EN"), "English");
    }
}
