#![forbid(unsafe_code)]

//! Locale detection and picker string catalogs.
//!
//! Locale tags are normalized the same way everywhere: codeset and modifier
//! suffixes are stripped (`fr_FR.UTF-8@euro` → `fr-FR`), underscores become
//! hyphens, and `C`/`POSIX` mean English. [`PickerLocale::resolve`] tries the
//! full tag, then its language prefix, then falls back to English.

use std::env;

/// A normalized locale tag such as `"en"` or `"zh-CN"`.
pub type Locale = String;

/// User-facing strings of the picker.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickerLocale {
    /// Toggle text when nothing is selected.
    pub placeholder: String,
    /// Search bar hint.
    pub search_placeholder: String,
    /// Shown when the keyword matches nothing.
    pub no_results_text: String,
}

impl Default for PickerLocale {
    fn default() -> Self {
        Self::english()
    }
}

impl PickerLocale {
    fn new(placeholder: &str, search_placeholder: &str, no_results_text: &str) -> Self {
        Self {
            placeholder: placeholder.to_string(),
            search_placeholder: search_placeholder.to_string(),
            no_results_text: no_results_text.to_string(),
        }
    }

    /// The English catalog.
    #[must_use]
    pub fn english() -> Self {
        Self::new("Select", "Search", "No results found")
    }

    /// Catalog for `locale`, falling back to its language, then English.
    #[must_use]
    pub fn resolve(locale: &str) -> Self {
        let tag = normalize_locale_raw(locale).unwrap_or_else(|| "en".to_string());
        catalog(&tag)
            .or_else(|| tag.split('-').next().and_then(catalog))
            .unwrap_or_else(Self::english)
    }

    /// Catalog for the locale detected from the environment.
    #[must_use]
    pub fn system() -> Self {
        Self::resolve(&detect_system_locale())
    }
}

fn catalog(tag: &str) -> Option<PickerLocale> {
    let locale = match tag.to_ascii_lowercase().as_str() {
        "en" => PickerLocale::english(),
        "zh-cn" | "zh" => PickerLocale::new("选择", "搜索", "无匹配选项"),
        "fr" => PickerLocale::new("Sélectionner", "Rechercher", "Aucun résultat"),
        "de" => PickerLocale::new("Auswählen", "Suchen", "Keine Ergebnisse gefunden"),
        "es" => PickerLocale::new("Seleccionar", "Buscar", "No se encontraron resultados"),
        "ja" => PickerLocale::new("選択してください", "検索", "該当する項目がありません"),
        _ => return None,
    };
    Some(locale)
}

/// Detect the system locale from environment variables.
///
/// Preference order: `LC_ALL`, then `LANG`. Falls back to `"en"` when unknown.
#[must_use]
pub fn detect_system_locale() -> Locale {
    let lc_all = env::var("LC_ALL").ok();
    let lang = env::var("LANG").ok();
    detect_system_locale_from(lc_all.as_deref(), lang.as_deref())
}

fn detect_system_locale_from(lc_all: Option<&str>, lang: Option<&str>) -> Locale {
    lc_all
        .and_then(normalize_locale_raw)
        .or_else(|| lang.and_then(normalize_locale_raw))
        .unwrap_or_else(|| "en".to_string())
}

fn normalize_locale_raw(raw: &str) -> Option<Locale> {
    let raw = raw.trim();
    let raw = raw.split('@').next().unwrap_or(raw);
    let raw = raw.split('.').next().unwrap_or(raw).trim();
    if raw.is_empty() {
        return None;
    }
    if raw.eq_ignore_ascii_case("c") || raw.eq_ignore_ascii_case("posix") {
        return Some("en".to_string());
    }
    Some(raw.replace('_', "-"))
}
