use std::env;

use url::Url;

use crate::{append_startup_log, APP_URL_ENV, DEFAULT_APP_URL};

// Accepts absolute http(s) URLs only; anything else falls back to `default_url`.
pub(crate) fn normalize_app_url(raw: &str, default_url: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return default_url.to_string();
    }

    match Url::parse(trimmed) {
        Ok(mut parsed) if matches!(parsed.scheme(), "http" | "https") => {
            if parsed.path().is_empty() {
                parsed.set_path("/");
            }
            parsed.to_string()
        }
        Ok(parsed) => {
            append_startup_log(&format!(
                "ignoring app url with unsupported scheme '{}'",
                parsed.scheme()
            ));
            default_url.to_string()
        }
        Err(error) => {
            append_startup_log(&format!("ignoring invalid app url '{trimmed}': {error}"));
            default_url.to_string()
        }
    }
}

pub(crate) fn resolve_app_url() -> String {
    match env::var(APP_URL_ENV) {
        Ok(raw) => normalize_app_url(&raw, DEFAULT_APP_URL),
        Err(_) => DEFAULT_APP_URL.to_string(),
    }
}

// The injected bridge only activates on pages sharing the app url's origin.
pub(crate) fn same_origin(app_url: &str, page_url: &Url) -> bool {
    Url::parse(app_url)
        .map(|app| app.origin() == page_url.origin())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_app_url_keeps_valid_https_urls() {
        assert_eq!(
            normalize_app_url(" https://chat.example.com/app ", DEFAULT_APP_URL),
            "https://chat.example.com/app"
        );
    }

    #[test]
    fn normalize_app_url_adds_root_path() {
        assert_eq!(
            normalize_app_url("http://localhost:3000", DEFAULT_APP_URL),
            "http://localhost:3000/"
        );
    }

    #[test]
    fn normalize_app_url_falls_back_for_empty_invalid_or_unsupported() {
        assert_eq!(normalize_app_url("", DEFAULT_APP_URL), DEFAULT_APP_URL);
        assert_eq!(normalize_app_url("not a url", DEFAULT_APP_URL), DEFAULT_APP_URL);
        assert_eq!(
            normalize_app_url("file:///etc/passwd", DEFAULT_APP_URL),
            DEFAULT_APP_URL
        );
    }

    #[test]
    fn same_origin_compares_scheme_host_and_port() {
        let page = Url::parse("https://ai.acary.app/chat/123").expect("page url");
        assert!(same_origin(DEFAULT_APP_URL, &page));

        let other = Url::parse("https://accounts.example.com/login").expect("other url");
        assert!(!same_origin(DEFAULT_APP_URL, &other));
    }
}
