/// Extract the host portion of a URL string, lowercased.
/// Example: "https://GitHub.com/foo/bar" -> Some("github.com")
pub fn extract_domain(url: &str) -> Option<String> {
    let url = url.trim();

    let without_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url,
    };

    let host = without_scheme
        .split('/')
        .next()?
        .split('?')
        .next()?
        .split('#')
        .next()?;

    // Drop userinfo and port
    let host = host.rsplit('@').next()?;
    let domain = host.split(':').next()?;

    match domain.is_empty() {
        true => None,
        false => Some(domain.to_ascii_lowercase()),
    }
}

/// Domain shown next to a story title: the host with a leading "www." removed.
pub fn display_domain(url: Option<&str>) -> Option<String> {
    let domain = extract_domain(url?)?;
    match domain.strip_prefix("www.") {
        Some(rest) if !rest.is_empty() => Some(rest.to_string()),
        Some(_) => None,
        None => Some(domain),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain_with_https() {
        assert_eq!(
            extract_domain("https://github.com/user/repo"),
            Some("github.com".to_string())
        );
    }

    #[test]
    fn test_extract_domain_with_port_and_userinfo() {
        assert_eq!(
            extract_domain("https://user:pw@localhost:8080/path"),
            Some("localhost".to_string())
        );
    }

    #[test]
    fn test_extract_domain_with_query() {
        assert_eq!(
            extract_domain("https://example.com?param=value"),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_domain_empty() {
        assert_eq!(extract_domain(""), None);
    }

    #[test]
    fn display_domain_strips_leading_www() {
        assert_eq!(
            display_domain(Some("https://www.Example.com/a")),
            Some("example.com".to_string())
        );
        assert_eq!(
            display_domain(Some("https://news.ycombinator.com/item?id=123")),
            Some("news.ycombinator.com".to_string())
        );
    }

    #[test]
    fn display_domain_keeps_inner_www() {
        assert_eq!(
            display_domain(Some("https://blog.www.example.com")),
            Some("blog.www.example.com".to_string())
        );
    }

    #[test]
    fn display_domain_absent_without_url() {
        assert_eq!(display_domain(None), None);
        assert_eq!(display_domain(Some("")), None);
    }
}
