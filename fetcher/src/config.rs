//! Fetcher configuration loading and parsing

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::credential::Credential;
use crate::location::SearchLocation;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const CONFIG_ENV: &str = "IMPFOMAT_CONFIG";

/// Root configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct FetcherConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub request: RequestConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Either a ready-made Basic token or the booking code it is derived from.
/// `token` wins when both are set.
#[derive(Debug, Deserialize, Default)]
pub struct AuthConfig {
    pub token: Option<String>,
    pub code: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct RequestConfig {
    /// 0 or absent means no timeout.
    #[serde(default)]
    pub timeout_seconds: u64,
}

#[derive(Debug, Deserialize)]
pub struct SearchConfig {
    pub code: Option<String>,
    pub postal_code: Option<String>,
    #[serde(default = "default_vaccine_code")]
    pub vaccine_code: String,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            code: None,
            postal_code: None,
            vaccine_code: default_vaccine_code(),
        }
    }
}

fn default_base_url() -> String { "https://005-iz.impfterminservice.de".into() }
fn default_vaccine_code() -> String { "L920".into() }

impl AuthConfig {
    pub fn credential(&self) -> Result<Credential> {
        match (&self.token, &self.code) {
            (Some(token), _) if !token.trim().is_empty() => {
                Ok(Credential::from_token(token.as_str()))
            }
            (_, Some(code)) if !code.is_empty() => Ok(Credential::from_code(code)),
            _ => bail!("No credential configured: set [auth] token or [auth] code"),
        }
    }
}

impl RequestConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_seconds > 0).then(|| Duration::from_secs(self.timeout_seconds))
    }
}

impl SearchConfig {
    pub fn location(&self) -> SearchLocation {
        SearchLocation {
            code: self.code.clone(),
            postal_code: self.postal_code.clone(),
            vaccine_code: Some(self.vaccine_code.clone()),
        }
    }
}

impl FetcherConfig {
    /// Search code doubles as the auth code when `[auth]` is left empty.
    pub fn credential(&self) -> Result<Credential> {
        let token = self.auth.token.as_deref().filter(|t| !t.trim().is_empty());
        let code = self.auth.code.as_deref().filter(|c| !c.is_empty());
        if token.is_none() && code.is_none() {
            if let Some(code) = self.search.code.as_deref().filter(|c| !c.is_empty()) {
                return Ok(Credential::from_code(code));
            }
        }
        self.auth.credential()
    }
}

pub fn parse_config(content: &str) -> Result<FetcherConfig> {
    toml::from_str(content).context("Failed to parse fetcher config")
}

/// Load configuration from `path`, then `$IMPFOMAT_CONFIG`, then `config.toml`.
/// A missing file is not an error; defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<FetcherConfig> {
    let config_path = match path {
        Some(p) => p.to_path_buf(),
        None => std::env::var(CONFIG_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
            .into(),
    };

    if config_path.exists() {
        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;
        parse_config(&content)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))
    } else {
        tracing::warn!(
            "Config file not found at {}, using defaults",
            config_path.display()
        );
        Ok(FetcherConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = FetcherConfig::default();
        assert_eq!(config.service.base_url, "https://005-iz.impfterminservice.de");
        assert_eq!(config.search.vaccine_code, "L920");
        assert!(config.request.timeout().is_none());
        assert!(config.credential().is_err());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config(
            r#"
[search]
code = "VCGM-F87Z-Q7VZ"
postal_code = "75175"
"#,
        )
        .unwrap();
        assert_eq!(
            config.search.location().page_path(),
            "/terminservice/suche/VCGM-F87Z-Q7VZ/75175/L920"
        );
        assert_eq!(config.credential().unwrap().token(), "OlZDR00tRjg3Wi1RN1Za");
    }

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
[service]
base_url = "https://001-iz.impfterminservice.de/"

[auth]
token = "OlZDR00tRjg3Wi1RN1Za"
code = "IGNORED"

[request]
timeout_seconds = 15

[search]
code = "VCGM-F87Z-Q7VZ"
postal_code = "10115"
vaccine_code = "L921"
"#,
        )
        .unwrap();
        assert_eq!(config.service.base_url, "https://001-iz.impfterminservice.de/");
        assert_eq!(config.request.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.credential().unwrap().token(), "OlZDR00tRjg3Wi1RN1Za");
        assert_eq!(config.search.location().vaccine_code.as_deref(), Some("L921"));
    }

    #[test]
    fn test_auth_code_used_without_token() {
        let config = parse_config("[auth]\ncode = \"VCGM-F87Z-Q7VZ\"\n").unwrap();
        assert_eq!(config.credential().unwrap(), Credential::from_code("VCGM-F87Z-Q7VZ"));
    }

    #[test]
    fn test_empty_auth_rejected() {
        let config = parse_config("[auth]\ntoken = \"  \"\n").unwrap();
        assert!(config.credential().is_err());
    }

    #[test]
    fn test_blank_auth_falls_back_to_search_code() {
        let config = parse_config(
            r#"
[auth]
token = ""
code = ""

[search]
code = "VCGM-F87Z-Q7VZ"
"#,
        )
        .unwrap();
        assert_eq!(config.credential().unwrap().token(), "OlZDR00tRjg3Wi1RN1Za");
    }

    #[test]
    fn test_load_config_reports_path_on_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[request\ntimeout_seconds = 3").unwrap();
        let err = load_config(Some(file.path())).unwrap_err();
        assert!(format!("{err:#}").contains(&file.path().display().to_string()));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(parse_config("[service\nbase_url = 1").is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[request]\ntimeout_seconds = 3").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.request.timeout_seconds, 3);
    }

    #[test]
    fn test_load_config_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.search.vaccine_code, "L920");
    }
}
