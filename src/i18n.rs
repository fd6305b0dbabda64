//! Static translation tables for the service editor.
//!
//! Dictionaries are embedded at compile time and parsed once on first use;
//! they are read-only for the lifetime of the process.

use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::OnceLock;

use crate::models::localized::Locale;

const FALLBACK_LOCALE: Locale = Locale::En;

static DICTIONARIES: OnceLock<HashMap<Locale, JsonValue>> = OnceLock::new();

fn raw_dictionary(locale: Locale) -> &'static str {
    match locale {
        Locale::Fr => include_str!("../locales/fr.json"),
        Locale::En => include_str!("../locales/en.json"),
    }
}

fn dictionaries() -> &'static HashMap<Locale, JsonValue> {
    DICTIONARIES.get_or_init(|| {
        Locale::ALL
            .iter()
            .map(|locale| {
                let parsed = serde_json::from_str(raw_dictionary(*locale)).unwrap_or_else(|e| {
                    tracing::error!(%locale, error = %e, "Failed to parse locale dictionary");
                    JsonValue::Null
                });
                (*locale, parsed)
            })
            .collect()
    })
}

pub fn lookup(locale: Locale, path: &str) -> Option<&'static str> {
    lookup_in(dictionaries(), locale, path)
}

fn lookup_in<'a>(
    tables: &'a HashMap<Locale, JsonValue>,
    locale: Locale,
    path: &str,
) -> Option<&'a str> {
    let mut node = tables.get(&locale)?;
    for segment in path.split('.') {
        node = node.get(segment)?;
    }
    node.as_str()
}

/// Resolves `path` in `locale`, then in English, then returns the path itself.
pub fn translate(locale: Locale, path: &str) -> String {
    translate_in(dictionaries(), locale, path)
}

fn translate_in(tables: &HashMap<Locale, JsonValue>, locale: Locale, path: &str) -> String {
    lookup_in(tables, locale, path)
        .or_else(|| lookup_in(tables, FALLBACK_LOCALE, path))
        .map(str::to_string)
        .unwrap_or_else(|| path.to_string())
}

pub fn translate_with(locale: Locale, path: &str, params: &[(&str, &str)]) -> String {
    params
        .iter()
        .fold(translate(locale, path), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_nested_paths_per_locale() {
        assert_eq!(translate(Locale::Fr, "service.status.published"), "Publié");
        assert_eq!(translate(Locale::En, "service.status.published"), "Published");
    }

    #[test]
    fn falls_back_to_english_then_key() {
        let tables: HashMap<Locale, JsonValue> = [
            (Locale::Fr, serde_json::json!({"media": {"video_too_large": "Trop lourd"}})),
            (
                Locale::En,
                serde_json::json!({"media": {"video_too_large": "Too big", "document_too_large": "Doc too big"}}),
            ),
        ]
        .into_iter()
        .collect();

        assert_eq!(translate_in(&tables, Locale::Fr, "media.video_too_large"), "Trop lourd");
        assert_eq!(translate_in(&tables, Locale::Fr, "media.document_too_large"), "Doc too big");
        assert_eq!(translate_in(&tables, Locale::Fr, "does.not.exist"), "does.not.exist");
    }

    #[test]
    fn french_dictionary_covers_media_limits() {
        assert_eq!(
            lookup(Locale::Fr, "media.document_too_large"),
            Some("Le document doit faire moins de {max} Mo")
        );
        assert_eq!(translate(Locale::Fr, "does.not.exist"), "does.not.exist");
    }

    #[test]
    fn substitutes_placeholders() {
        assert_eq!(
            translate_with(Locale::En, "fields.extra", &[("title", "Express")]),
            "extra \"Express\""
        );
    }

    #[test]
    fn every_english_leaf_exists_in_some_form() {
        fn leaves(prefix: &str, node: &JsonValue, out: &mut Vec<String>) {
            match node {
                JsonValue::Object(map) => {
                    for (k, v) in map {
                        let path = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{}.{}", prefix, k)
                        };
                        leaves(&path, v, out);
                    }
                }
                _ => out.push(prefix.to_string()),
            }
        }

        let mut paths = Vec::new();
        leaves("", &dictionaries()[&Locale::En], &mut paths);
        assert!(!paths.is_empty());
        for path in paths {
            assert!(lookup(Locale::Fr, &path).is_some(), "missing French text for {}", path);
        }
    }
}
