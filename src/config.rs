//! Runtime configuration, read from the environment.

use crate::constants::DEFAULT_ADDR;
use crate::messages::Locale;

/// Settings for one running service.
#[derive(Debug, Clone)]
pub(crate) struct Config {
    /// Connection string of the backing database. Checked on every invocation, not at startup.
    pub(crate) database_url: Option<String>,
    /// Listen address of the HTTP surface.
    pub(crate) addr: String,
    pub(crate) locale: Locale,
}

impl Config {
    /// Read `DATABASE_URL`, `ADDR` and `SKINS_LOCALE`.
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());
        let addr = lookup("ADDR")
            .filter(|addr| !addr.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDR.to_owned());
        let locale = match lookup("SKINS_LOCALE") {
            Some(tag) => Locale::parse(&tag).unwrap_or_else(|| {
                tracing::warn!("Unknown SKINS_LOCALE {:?}, falling back to en", tag);
                Locale::En
            }),
            None => Locale::En,
        };

        Config {
            database_url,
            addr,
            locale,
        }
    }
}
