/// Reduce a language tag to the canonical form used as a metadata file
/// suffix: lowercase, hyphen replaced by underscore ("en-US" -> "en_us").
/// Locale negotiation happens upstream; this is only defensive cleanup.
pub fn normalize(lang: &str) -> String {
    lang.to_ascii_lowercase().replace('-', "_")
}

/// Pick the primary tag out of an Accept-Language header value,
/// dropping any quality weight. Falls back to the given default.
pub fn parse_accept_language(accept: &str, default: &str) -> String {
    let primary = accept.split(',').next().unwrap_or("");
    let primary = primary.split(';').next().unwrap_or("").trim();
    if primary.is_empty() {
        default.to_string()
    } else {
        primary.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("en-US"), "en_us");
        assert_eq!(normalize("zh_CN"), "zh_cn");
        assert_eq!(normalize("FR"), "fr");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_parse_accept_language() {
        assert_eq!(parse_accept_language("zh-CN,zh;q=0.9,en;q=0.8", "en"), "zh-CN");
        assert_eq!(parse_accept_language("en-US;q=0.7", "en"), "en-US");
        assert_eq!(parse_accept_language("", "en"), "en");
        assert_eq!(parse_accept_language("  ", "de"), "de");
    }
}
