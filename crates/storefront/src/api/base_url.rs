//! Backend base-address resolution.

use url::Url;

/// Base address used when nothing is configured and no page origin is known.
pub const DEFAULT_API_BASE: &str = "http://backend:8000/api";

/// Hostnames that only make sense from the backend host itself.
const LOOPBACK_ALIASES: &[&str] = &["localhost", "127.0.0.1", "0.0.0.0"];

/// Resolve the backend base address.
///
/// `configured` is the operator-supplied base (empty counts as unset).
/// `page_origin` is the origin pages are served from, when known; with it,
/// a configured loopback hostname is rewritten to the page's hostname so a
/// single-host deployment works behind any entry point.
///
/// The result never ends with a trailing slash.
#[must_use]
pub fn resolve_api_base(configured: Option<&str>, page_origin: Option<&Url>) -> String {
    let configured = configured.filter(|value| !value.is_empty());

    let Some(origin) = page_origin else {
        return strip_trailing_slash(configured.unwrap_or(DEFAULT_API_BASE)).to_string();
    };

    let origin_text = origin.origin().ascii_serialization();

    let Some(configured) = configured else {
        return format!("{}/api", strip_trailing_slash(&origin_text));
    };

    match origin.join(configured) {
        Ok(mut url) => {
            let is_loopback = url
                .host_str()
                .is_some_and(|host| LOOPBACK_ALIASES.contains(&host));
            if is_loopback
                && let Some(page_host) = origin.host_str()
                && url.set_host(Some(page_host)).is_err()
            {
                tracing::warn!(page_host, "could not rewrite loopback API host");
            }
            strip_trailing_slash(url.as_str()).to_string()
        }
        Err(e) => {
            tracing::debug!(error = %e, configured, "API base is not a URL, treating it as a path");
            let path = if configured.starts_with('/') {
                configured.to_string()
            } else {
                format!("/{configured}")
            };
            strip_trailing_slash(&format!("{}{path}", strip_trailing_slash(&origin_text))).to_string()
        }
    }
}

fn strip_trailing_slash(value: &str) -> &str {
    value.strip_suffix('/').unwrap_or(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn origin(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_server_side_uses_default() {
        assert_eq!(resolve_api_base(None, None), "http://backend:8000/api");
        assert_eq!(resolve_api_base(Some(""), None), "http://backend:8000/api");
    }

    #[test]
    fn test_server_side_strips_trailing_slash() {
        assert_eq!(
            resolve_api_base(Some("http://api.internal:9000/api/"), None),
            "http://api.internal:9000/api"
        );
    }

    #[test]
    fn test_page_origin_without_configuration() {
        let page = origin("https://shop.example.com/pedidos");
        assert_eq!(resolve_api_base(None, Some(&page)), "https://shop.example.com/api");
    }

    #[test]
    fn test_loopback_host_is_rewritten_to_page_host() {
        let page = origin("https://shop.example.com");
        let base = resolve_api_base(Some("http://localhost:8000/api"), Some(&page));
        let url = Url::parse(&base).unwrap();
        assert_eq!(url.host_str(), Some("shop.example.com"));
        assert_eq!(base, "http://shop.example.com:8000/api");
    }

    #[test]
    fn test_all_loopback_aliases_are_rewritten() {
        let page = origin("http://192.168.1.20:3000");
        for alias in ["http://127.0.0.1:8000/api", "http://0.0.0.0:8000/api/"] {
            assert_eq!(
                resolve_api_base(Some(alias), Some(&page)),
                "http://192.168.1.20:8000/api"
            );
        }
    }

    #[test]
    fn test_public_host_is_kept() {
        let page = origin("https://shop.example.com");
        assert_eq!(
            resolve_api_base(Some("https://api.example.com/v1/"), Some(&page)),
            "https://api.example.com/v1"
        );
    }

    #[test]
    fn test_relative_base_resolves_against_origin() {
        let page = origin("https://shop.example.com");
        assert_eq!(
            resolve_api_base(Some("/backend/api/"), Some(&page)),
            "https://shop.example.com/backend/api"
        );
    }

    #[test]
    fn test_unparseable_base_is_treated_as_path() {
        let page = origin("https://shop.example.com");
        assert_eq!(
            resolve_api_base(Some("http://[not-an-ip"), Some(&page)),
            "https://shop.example.com/http://[not-an-ip"
        );
    }
}
