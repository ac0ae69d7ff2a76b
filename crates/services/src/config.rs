use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_API_URL: &str = "http://localhost:5001/api";
pub const DEFAULT_DB_URL: &str = "sqlite://codequest.sqlite3";

/// Where the client talks to and where it keeps its local state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Always ends with `/` so relative joins keep the `/api` prefix.
    pub api_base: Url,
    pub db_url: String,
    pub locale: Option<String>,
}

impl ClientConfig {
    /// Build a config from explicit values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL is not an absolute http(s) URL.
    pub fn new(
        api_url: &str,
        db_url: impl Into<String>,
        locale: Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: normalize_api_base(api_url)?,
            db_url: db_url.into(),
            locale: locale
                .map(|l| l.trim().to_owned())
                .filter(|l| !l.is_empty()),
        })
    }
}

fn normalize_api_base(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim();
    let mut url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidApiUrl {
        raw: trimmed.to_owned(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(trimmed.to_owned()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
