/// Page metadata helpers for the viewer cards.
use url::Url;

/// Extract a display domain from a snap's source URL with smart TLD
/// handling.
///
/// - https://www.google.com/search → google.com
/// - https://news.bbc.co.uk/article → bbc.co.uk
/// - https://shop.example.com.au/products → example.com.au
///
/// Hosts that are not registrable names (localhost, IP literals) come back
/// unchanged.
pub fn display_domain(url: &str) -> Option<String> {
    let parsed = Url::parse(url.trim()).ok()?;
    let host = parsed.host_str()?.to_lowercase();

    if host == "localhost" || parsed.host().is_some_and(|h| !matches!(h, url::Host::Domain(_))) {
        return Some(host);
    }

    let parts: Vec<&str> = host.split('.').collect();
    if parts.len() < 2 {
        return Some(host);
    }

    // Two-letter country TLD behind "co"/"com" keeps three labels
    // (bbc.co.uk, example.com.au); everything else keeps two.
    let tld = parts[parts.len() - 1];
    let num_parts = if parts.len() >= 3
        && tld.len() == 2
        && matches!(parts[parts.len() - 2], "co" | "com")
    {
        3
    } else {
        2
    };

    Some(parts[parts.len() - num_parts..].join("."))
}

/// Truncate a selected-text passage for the collapsed card view, cutting
/// on a character boundary and appending an ellipsis.
pub fn truncate_snippet(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

/// Whether a passage needs the expand/collapse affordance at all.
pub fn needs_truncation(text: &str, max_chars: usize) -> bool {
    text.chars().count() > max_chars
}

/// Render an ISO-8601 timestamp as "YYYY-MM-DD HH:MM". Falls back to the
/// raw string when the input is not the shape the extension writes.
pub fn format_timestamp(iso: &str) -> String {
    match (iso.get(..10), iso.as_bytes().get(10), iso.get(11..16)) {
        (Some(date), Some(b'T'), Some(time)) => format!("{date} {time}"),
        _ => iso.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_domain_basic() {
        assert_eq!(display_domain("https://www.google.com"), Some("google.com".to_string()));
        assert_eq!(display_domain("http://google.com"), Some("google.com".to_string()));
    }

    #[test]
    fn test_display_domain_subdomains() {
        assert_eq!(display_domain("https://ai.microsoft.com"), Some("microsoft.com".to_string()));
        assert_eq!(display_domain("https://docs.microsoft.com/en-us"), Some("microsoft.com".to_string()));
    }

    #[test]
    fn test_display_domain_country_tlds() {
        assert_eq!(display_domain("https://news.bbc.co.uk"), Some("bbc.co.uk".to_string()));
        assert_eq!(display_domain("https://shop.example.com.au/products"), Some("example.com.au".to_string()));
    }

    #[test]
    fn test_display_domain_special_hosts() {
        assert_eq!(display_domain("https://localhost:3000"), Some("localhost".to_string()));
        assert_eq!(display_domain("http://127.0.0.1:8080"), Some("127.0.0.1".to_string()));
    }

    #[test]
    fn test_display_domain_rejects_garbage() {
        assert_eq!(display_domain(""), None);
        assert_eq!(display_domain("not-a-url"), None);
    }

    #[test]
    fn test_truncate_snippet() {
        assert_eq!(truncate_snippet("short", 20), "short");
        assert_eq!(truncate_snippet("hello world again", 11), "hello world…");
        assert!(needs_truncation("hello world again", 11));
        assert!(!needs_truncation("short", 20));
    }

    #[test]
    fn test_truncate_snippet_multibyte() {
        // Char-based cut must not split a multi-byte character.
        let s = "éééééééééé";
        assert_eq!(truncate_snippet(s, 4), "éééé…");
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp("2026-08-29T10:30:00.000Z"), "2026-08-29 10:30");
        assert_eq!(format_timestamp("yesterday"), "yesterday");
        assert_eq!(format_timestamp(""), "");
    }
}
