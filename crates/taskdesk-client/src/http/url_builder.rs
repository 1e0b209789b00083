//! URL building for request paths relative to the API base URL

use url::Url;

/// Joins request paths onto the configured base URL
pub struct UrlBuilder;

impl UrlBuilder {
    /// Join base URL with a request path
    ///
    /// The path is always appended below the base path, and a path that is
    /// already an absolute `http(s)` URL is used as-is:
    /// - `join("http://localhost:5001", "/task/")` -> `http://localhost:5001/task/`
    /// - `join("https://api.example.com/v1/", "/person/me")` -> `https://api.example.com/v1/person/me`
    /// - `join("https://api.example.com", "/task/?status=completed")` keeps the query
    pub fn join(base_url: &str, path: &str) -> Result<Url, String> {
        if Self::is_absolute(path) {
            return Url::parse(path).map_err(|e| format!("Invalid URL '{}': {}", path, e));
        }

        let combined = if path.is_empty() {
            base_url.to_string()
        } else {
            format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                path.trim_start_matches('/')
            )
        };

        Url::parse(&combined).map_err(|e| {
            format!(
                "Failed to join URL '{}' with path '{}': {}",
                base_url, path, e
            )
        })
    }

    /// Validate that a base URL is a well-formed http(s) URL
    pub fn validate_base(url: &str) -> Result<(), String> {
        let parsed = Url::parse(url).map_err(|e| format!("Invalid URL '{}': {}", url, e))?;
        match parsed.scheme() {
            "http" | "https" => Ok(()),
            other => Err(format!("Unsupported URL scheme '{}' in '{}'", other, url)),
        }
    }

    fn is_absolute(path: &str) -> bool {
        let lower = path.to_ascii_lowercase();
        lower.starts_with("http://") || lower.starts_with("https://")
    }
}
