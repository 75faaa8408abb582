use anyhow::{Context, Result, bail};
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_PEOPLE: u32 = 4;

const API_BASE_URL_VAR: &str = "RECIPE_API_BASE_URL";
const DEFAULT_PEOPLE_VAR: &str = "RECIPE_DEFAULT_PEOPLE";
const DOWNLOAD_DIR_VAR: &str = "RECIPE_DOWNLOAD_DIR";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub default_people: u32,
    /// Where exported shopping lists are written. `None` means the user's
    /// download directory.
    pub download_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            default_people: DEFAULT_PEOPLE,
            download_dir: None,
        }
    }
}

impl AppConfig {
    /// Read the process environment (after `.env` has been loaded).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = non_empty(lookup(API_BASE_URL_VAR)) {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                bail!("{API_BASE_URL_VAR} must be an http(s) URL, got {url:?}");
            }
            config.api_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(raw) = non_empty(lookup(DEFAULT_PEOPLE_VAR)) {
            let people: u32 = raw
                .parse()
                .with_context(|| format!("{DEFAULT_PEOPLE_VAR} is not a number: {raw:?}"))?;
            if people == 0 {
                bail!("{DEFAULT_PEOPLE_VAR} must be at least 1");
            }
            config.default_people = people;
        }

        config.download_dir = non_empty(lookup(DOWNLOAD_DIR_VAR)).map(PathBuf::from);
        Ok(config)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
