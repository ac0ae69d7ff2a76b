use storage::repository::{PREF_LOCALE, PreferenceRepository, StorageError};

pub const DEFAULT_LOCALE: &str = "en";
pub const SUPPORTED_LOCALES: &[&str] = &["en", "pl"];

/// Map `pl`, `pl_PL.UTF-8`, `PL-pl` and friends onto a compiled catalog.
#[must_use]
pub fn normalize(raw: &str) -> Option<&'static str> {
    let language = raw
        .trim()
        .split(['_', '-', '.', '@'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    SUPPORTED_LOCALES
        .iter()
        .copied()
        .find(|supported| *supported == language)
}

/// First non-blank source wins: flag, then persisted preference, then `LANG`.
/// `None` when nothing was requested or the request has no catalog.
#[must_use]
pub fn choose(
    flag: Option<&str>,
    persisted: Option<&str>,
    lang: Option<&str>,
) -> Option<&'static str> {
    let requested = [flag, persisted, lang]
        .into_iter()
        .flatten()
        .find(|value| !value.trim().is_empty())?;
    let locale = normalize(requested);
    if locale.is_none() {
        tracing::warn!(locale = requested, "unsupported locale, using {DEFAULT_LOCALE}");
    }
    locale
}

/// Pick the locale once at start-up and activate it. Only a supported
/// choice is remembered; the English fallback never overwrites a saved one.
///
/// # Errors
///
/// Returns `StorageError` when the preference cannot be read or written.
pub async fn init(
    preferences: &dyn PreferenceRepository,
    flag: Option<&str>,
) -> Result<&'static str, StorageError> {
    let persisted = preferences.get_preference(PREF_LOCALE).await?;
    let lang = std::env::var("LANG").ok();
    match choose(flag, persisted.as_deref(), lang.as_deref()) {
        Some(locale) => {
            activate(preferences, locale).await?;
            Ok(locale)
        }
        None => {
            rust_i18n::set_locale(DEFAULT_LOCALE);
            Ok(DEFAULT_LOCALE)
        }
    }
}

/// # Errors
///
/// Returns `StorageError` when the preference cannot be written.
pub async fn activate(
    preferences: &dyn PreferenceRepository,
    locale: &'static str,
) -> Result<(), StorageError> {
    rust_i18n::set_locale(locale);
    preferences.set_preference(PREF_LOCALE, locale).await?;
    tracing::debug!(locale, "locale selected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::repository::InMemoryRepository;

    #[test]
    fn normalize_strips_region_and_encoding() {
        assert_eq!(normalize("pl_PL.UTF-8"), Some("pl"));
        assert_eq!(normalize("EN-us"), Some("en"));
        assert_eq!(normalize("de_DE"), None);
        assert_eq!(normalize(""), None);
    }

    #[test]
    fn flag_beats_preference_beats_lang() {
        assert_eq!(choose(Some("pl"), Some("en"), Some("en_US")), Some("pl"));
        assert_eq!(choose(None, Some("pl"), Some("en_US")), Some("pl"));
        assert_eq!(choose(None, None, Some("pl_PL.UTF-8")), Some("pl"));
        assert_eq!(choose(Some("  "), None, Some("pl")), Some("pl"));
        assert_eq!(choose(None, None, None), None);
    }

    #[test]
    fn unsupported_choice_is_not_a_choice() {
        assert_eq!(choose(Some("fr"), Some("pl"), None), None);
    }

    #[tokio::test]
    async fn init_persists_the_choice() {
        let prefs = InMemoryRepository::new();
        assert_eq!(init(&prefs, Some("pl")).await.unwrap(), "pl");
        assert_eq!(
            prefs.get_preference(PREF_LOCALE).await.unwrap().as_deref(),
            Some("pl")
        );
        assert_eq!(init(&prefs, None).await.unwrap(), "pl");
    }

    #[tokio::test]
    async fn unsupported_flag_keeps_the_saved_locale() {
        let prefs = InMemoryRepository::new();
        prefs.set_preference(PREF_LOCALE, "pl").await.unwrap();
        assert_eq!(init(&prefs, Some("fr")).await.unwrap(), DEFAULT_LOCALE);
        assert_eq!(
            prefs.get_preference(PREF_LOCALE).await.unwrap().as_deref(),
            Some("pl")
        );
    }
}
