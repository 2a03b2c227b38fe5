//! Image URL resolution for backend-relative media paths

/// Relative paths live under `<base>/public/`; absolute `http` URLs pass
/// through unchanged.
pub fn resolve_image_url(base: &str, path: &str) -> String {
    let path = path.trim();
    if path.is_empty() || path.starts_with("http") {
        return path.to_string();
    }
    format!(
        "{}/public/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_path_prefixed() {
        assert_eq!(
            resolve_image_url("https://cdn.example.org/", "/uploads/a.png"),
            "https://cdn.example.org/public/uploads/a.png"
        );
        assert_eq!(
            resolve_image_url("https://cdn.example.org", "uploads/a.png"),
            "https://cdn.example.org/public/uploads/a.png"
        );
    }

    #[test]
    fn test_absolute_url_unchanged() {
        assert_eq!(
            resolve_image_url("https://cdn.example.org", "https://img.host/x.jpg"),
            "https://img.host/x.jpg"
        );
        assert_eq!(
            resolve_image_url("https://cdn.example.org", "http://img.host/x.jpg"),
            "http://img.host/x.jpg"
        );
    }

    #[test]
    fn test_empty_path_stays_empty() {
        assert_eq!(resolve_image_url("https://cdn.example.org", ""), "");
    }
}
