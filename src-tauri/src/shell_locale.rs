use std::{
    env,
    sync::{LazyLock, RwLock},
};

use serde_json::Value;

use crate::{append_desktop_log, BASE_LANGUAGE, LOCALE_ENV};

struct LanguageTable {
    code: &'static str,
    strings: Value,
}

static LANGUAGE_TABLES: LazyLock<Vec<LanguageTable>> = LazyLock::new(|| {
    [
        ("en", include_str!("../locales/en.json")),
        ("fr", include_str!("../locales/fr.json")),
    ]
    .into_iter()
    .filter_map(|(code, raw)| match serde_json::from_str::<Value>(raw) {
        Ok(strings) => Some(LanguageTable { code, strings }),
        Err(error) => {
            append_desktop_log(&format!("failed to parse {code} string table: {error}"));
            None
        }
    })
    .collect()
});

fn table_for(language: &str) -> Option<&'static Value> {
    LANGUAGE_TABLES
        .iter()
        .find(|table| table.code == language)
        .map(|table| &table.strings)
}

pub fn available_languages() -> Vec<&'static str> {
    LANGUAGE_TABLES.iter().map(|table| table.code).collect()
}

// Maps `fr`, `fr-FR`, `FR_ca.UTF-8` and the like onto a bundled language code.
pub(crate) fn normalize_language(raw: &str) -> Option<&'static str> {
    let primary = raw
        .trim()
        .split(['-', '_', '.', '@'])
        .next()?
        .to_ascii_lowercase();
    if primary.is_empty() {
        return None;
    }

    LANGUAGE_TABLES
        .iter()
        .map(|table| table.code)
        .find(|code| *code == primary)
}

pub fn host_locale_candidates() -> Vec<String> {
    let mut candidates: Vec<String> = [LOCALE_ENV, "LC_ALL", "LC_MESSAGES", "LANG"]
        .into_iter()
        .filter_map(|key| env::var(key).ok())
        .filter(|value| !value.trim().is_empty())
        .collect();
    if let Some(os_locale) = tauri_plugin_os::locale() {
        candidates.push(os_locale);
    }
    candidates
}

// Stored preference first, then host locale candidates in order, then the base language.
pub fn resolve_language<I>(stored: Option<&str>, host_locales: I) -> &'static str
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    if let Some(language) = stored.and_then(normalize_language) {
        return language;
    }

    host_locales
        .into_iter()
        .find_map(|locale| normalize_language(locale.as_ref()))
        .unwrap_or(BASE_LANGUAGE)
}

fn lookup<'a>(strings: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(strings, |node, segment| node.get(segment))?
        .as_str()
}

fn substitute_params(text: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(text.to_string(), |result, (name, value)| {
            result.replace(&format!("{{{name}}}"), value)
        })
}

pub fn translate(language: &str, key: &str, params: &[(&str, &str)]) -> String {
    let found = table_for(language)
        .and_then(|strings| lookup(strings, key))
        .or_else(|| {
            if language == BASE_LANGUAGE {
                return None;
            }
            table_for(BASE_LANGUAGE).and_then(|strings| lookup(strings, key))
        });

    match found {
        Some(text) => substitute_params(text, params),
        None => key.to_string(),
    }
}

#[derive(Debug)]
pub struct ShellI18n {
    language: RwLock<&'static str>,
}

impl ShellI18n {
    pub fn new(language: &'static str) -> Self {
        Self {
            language: RwLock::new(language),
        }
    }

    pub fn language(&self) -> &'static str {
        self.language
            .read()
            .map(|guard| *guard)
            .unwrap_or(BASE_LANGUAGE)
    }

    // Returns the normalized code when the language is bundled, leaving the
    // current language untouched otherwise.
    pub fn set_language(&self, raw: &str) -> Option<&'static str> {
        let language = normalize_language(raw)?;
        if let Ok(mut guard) = self.language.write() {
            *guard = language;
        }
        Some(language)
    }

    pub fn t(&self, key: &str) -> String {
        translate(self.language(), key, &[])
    }

    pub fn t_with(&self, key: &str, params: &[(&str, &str)]) -> String {
        translate(self.language(), key, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_tables_parse() {
        assert_eq!(available_languages(), vec!["en", "fr"]);
    }

    #[test]
    fn translate_reads_active_language() {
        assert_eq!(translate("fr", "tray.quit", &[]), "Quitter");
        assert_eq!(translate("en", "tray.quit", &[]), "Quit");
    }

    #[test]
    fn translate_falls_back_to_base_language() {
        // The French table has no `tray.language` entry.
        assert_eq!(translate("fr", "tray.language", &[]), "Language");
    }

    #[test]
    fn translate_returns_key_when_missing_everywhere() {
        assert_eq!(translate("fr", "tray.doesNotExist", &[]), "tray.doesNotExist");
        assert_eq!(translate("en", "nope", &[]), "nope");
    }

    #[test]
    fn translate_returns_key_for_branch_nodes() {
        assert_eq!(translate("en", "dialog.update", &[]), "dialog.update");
    }

    #[test]
    fn translate_substitutes_every_occurrence_of_params() {
        assert_eq!(
            translate("en", "dialog.update.newVersion", &[("version", "1.4.0")]),
            "A new version (1.4.0) is available."
        );
        assert_eq!(substitute_params("{a}-{a}-{b}", &[("a", "x")]), "x-x-{b}");
    }

    #[test]
    fn normalize_language_accepts_locale_variants() {
        assert_eq!(normalize_language("fr-FR"), Some("fr"));
        assert_eq!(normalize_language("FR_ca.UTF-8"), Some("fr"));
        assert_eq!(normalize_language("en"), Some("en"));
        assert_eq!(normalize_language("de-DE"), None);
        assert_eq!(normalize_language("  "), None);
    }

    #[test]
    fn resolve_language_prefers_stored_then_host_then_base() {
        assert_eq!(resolve_language(Some("fr"), ["en-US"]), "fr");
        assert_eq!(resolve_language(Some("de"), ["C", "fr_FR.UTF-8"]), "fr");
        assert_eq!(resolve_language(None, ["ja-JP"]), "en");
        assert_eq!(resolve_language(None, Vec::<String>::new()), "en");
    }

    #[test]
    fn shell_i18n_ignores_unknown_language() {
        let i18n = ShellI18n::new("en");
        assert_eq!(i18n.set_language("de"), None);
        assert_eq!(i18n.language(), "en");

        assert_eq!(i18n.set_language("fr"), Some("fr"));
        assert_eq!(i18n.t("context.copy"), "Copier");
    }
}
