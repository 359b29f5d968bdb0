use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_ACCESS_TOKEN_TTL_SECS, DEFAULT_HOST,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT, DEFAULT_REFRESH_TOKEN_TTL_SECS,
};

// =============================================================================
// File Config Sections
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub public_url: Option<String>,
}

/// Authentication configuration section
#[derive(Default, Clone, Deserialize)]
pub struct AuthFileConfig {
    pub access_token_secret: Option<String>,
    pub refresh_token_secret: Option<String>,
    pub access_token_ttl_secs: Option<u64>,
    pub refresh_token_ttl_secs: Option<u64>,
    pub secure_cookies: Option<bool>,
}

impl fmt::Debug for AuthFileConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthFileConfig")
            .field("access_token_secret", &self.access_token_secret.as_ref().map(|_| "***"))
            .field("refresh_token_secret", &self.refresh_token_secret.as_ref().map(|_| "***"))
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

/// Media upload section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct MediaFileConfig {
    pub max_upload_bytes: Option<usize>,
}

/// CORS section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct CorsFileConfig {
    pub origins: Option<Vec<String>>,
}

/// File-based configuration (JSON)
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub auth: Option<AuthFileConfig>,
    pub media: Option<MediaFileConfig>,
    pub cors: Option<CorsFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
            if server.public_url.is_some() {
                tracing::trace!(public_url = ?server.public_url, "Merging server.public_url");
                current.public_url = server.public_url;
            }
        }

        if let Some(auth) = other.auth {
            let current = self.auth.get_or_insert_with(AuthFileConfig::default);
            if auth.access_token_secret.is_some() {
                tracing::trace!("Merging auth.access_token_secret");
                current.access_token_secret = auth.access_token_secret;
            }
            if auth.refresh_token_secret.is_some() {
                tracing::trace!("Merging auth.refresh_token_secret");
                current.refresh_token_secret = auth.refresh_token_secret;
            }
            if auth.access_token_ttl_secs.is_some() {
                tracing::trace!(ttl = ?auth.access_token_ttl_secs, "Merging auth.access_token_ttl_secs");
                current.access_token_ttl_secs = auth.access_token_ttl_secs;
            }
            if auth.refresh_token_ttl_secs.is_some() {
                tracing::trace!(ttl = ?auth.refresh_token_ttl_secs, "Merging auth.refresh_token_ttl_secs");
                current.refresh_token_ttl_secs = auth.refresh_token_ttl_secs;
            }
            if auth.secure_cookies.is_some() {
                tracing::trace!(secure = ?auth.secure_cookies, "Merging auth.secure_cookies");
                current.secure_cookies = auth.secure_cookies;
            }
        }

        if let Some(media) = other.media {
            let current = self.media.get_or_insert_with(MediaFileConfig::default);
            if media.max_upload_bytes.is_some() {
                tracing::trace!(bytes = ?media.max_upload_bytes, "Merging media.max_upload_bytes");
                current.max_upload_bytes = media.max_upload_bytes;
            }
        }

        if let Some(cors) = other.cors {
            let current = self.cors.get_or_insert_with(CorsFileConfig::default);
            if cors.origins.is_some() {
                tracing::trace!(origins = ?cors.origins, "Merging cors.origins");
                current.origins = cors.origins;
            }
        }

        if other.debug.is_some() {
            tracing::trace!(debug = ?other.debug, "Merging debug");
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config
// =============================================================================

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL for links to stored media, without trailing slash
    pub public_url: String,
}

#[derive(Clone)]
pub struct AuthConfig {
    /// None means a random per-process key is generated at startup
    pub access_token_secret: Option<String>,
    pub refresh_token_secret: Option<String>,
    pub access_token_ttl_secs: u64,
    pub refresh_token_ttl_secs: u64,
    pub secure_cookies: bool,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &self.access_token_secret.as_ref().map(|_| "***"))
            .field("refresh_token_secret", &self.refresh_token_secret.as_ref().map(|_| "***"))
            .field("access_token_ttl_secs", &self.access_token_ttl_secs)
            .field("refresh_token_ttl_secs", &self.refresh_token_ttl_secs)
            .field("secure_cookies", &self.secure_cookies)
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: None,
            refresh_token_secret: None,
            access_token_ttl_secs: DEFAULT_ACCESS_TOKEN_TTL_SECS,
            refresh_token_ttl_secs: DEFAULT_REFRESH_TOKEN_TTL_SECS,
            secure_cookies: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub max_upload_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Allowed cross-origin callers. Empty means same-origin only.
#[derive(Debug, Clone, Default)]
pub struct CorsConfig {
    pub origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub media: MediaConfig,
    pub cors: CorsConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration: defaults -> profile file -> local/CLI file -> CLI/env
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        // 1. Load from profile dir (~/.vidhive/vidhive.json) - skip if not exists
        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        // 2. Load from CLI-specified path OR local directory
        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let config = Self::resolve(file_config, cli);
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            public_url = %config.server.public_url,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Layer CLI/env values over the merged file config, then defaults
    fn resolve(file_config: FileConfig, cli: &CliConfig) -> Self {
        let file_server = file_config.server.unwrap_or_default();
        let file_auth = file_config.auth.unwrap_or_default();
        let file_media = file_config.media.unwrap_or_default();
        let file_cors = file_config.cors.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let public_url = cli
            .public_url
            .clone()
            .or(file_server.public_url)
            .unwrap_or_else(|| default_public_url(&host, port))
            .trim_end_matches('/')
            .to_string();

        let defaults = AuthConfig::default();
        let auth = AuthConfig {
            access_token_secret: cli
                .access_token_secret
                .clone()
                .or(file_auth.access_token_secret),
            refresh_token_secret: cli
                .refresh_token_secret
                .clone()
                .or(file_auth.refresh_token_secret),
            access_token_ttl_secs: file_auth
                .access_token_ttl_secs
                .unwrap_or(defaults.access_token_ttl_secs),
            refresh_token_ttl_secs: file_auth
                .refresh_token_ttl_secs
                .unwrap_or(defaults.refresh_token_ttl_secs),
            secure_cookies: file_auth.secure_cookies.unwrap_or(defaults.secure_cookies),
        };

        let media = MediaConfig {
            max_upload_bytes: cli
                .max_upload_bytes
                .or(file_media.max_upload_bytes)
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        };

        // CLI origins replace file origins rather than extending them
        let cors = CorsConfig {
            origins: if cli.cors_origins.is_empty() {
                file_cors.origins.unwrap_or_default()
            } else {
                cli.cors_origins.clone()
            },
        };

        Self {
            server: ServerConfig {
                host,
                port,
                public_url,
            },
            auth,
            media,
            cors,
            debug: cli.debug || file_config.debug.unwrap_or(false),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        // Port must be non-zero (port 0 would cause bind failure)
        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if !(self.server.public_url.starts_with("http://")
            || self.server.public_url.starts_with("https://"))
        {
            anyhow::bail!(
                "Configuration error: server.public_url must start with http:// or https:// (got '{}')",
                self.server.public_url
            );
        }

        if self.auth.access_token_ttl_secs == 0 || self.auth.refresh_token_ttl_secs == 0 {
            anyhow::bail!("Configuration error: token lifetimes must be greater than 0");
        }

        for (name, secret) in [
            ("auth.access_token_secret", &self.auth.access_token_secret),
            ("auth.refresh_token_secret", &self.auth.refresh_token_secret),
        ] {
            if secret.as_deref().is_some_and(|s| s.trim().is_empty()) {
                anyhow::bail!("Configuration error: {} must not be empty", name);
            }
        }

        if self.media.max_upload_bytes == 0 {
            anyhow::bail!("Configuration error: media.max_upload_bytes must be greater than 0");
        }

        if let (Some(access), Some(refresh)) = (
            &self.auth.access_token_secret,
            &self.auth.refresh_token_secret,
        ) && access == refresh
        {
            tracing::warn!(
                "Access and refresh tokens share one signing secret. \
                 A leaked access secret can then mint refresh tokens."
            );
        }

        if !self.auth.secure_cookies && is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Auth cookies are sent without the Secure flag while binding to all network interfaces"
            );
        }

        Ok(())
    }
}

fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}

fn default_public_url(host: &str, port: u16) -> String {
    let host = if is_all_interfaces(host) {
        "localhost"
    } else {
        host
    };
    format!("http://{}:{}", host, port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_config_parse_full() {
        let json = r#"{
            "server": { "host": "0.0.0.0", "port": 8080, "public_url": "https://cdn.test" },
            "auth": { "access_token_ttl_secs": 60, "secure_cookies": true },
            "media": { "max_upload_bytes": 2048 },
            "cors": { "origins": ["http://localhost:5173"] }
        }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        let server = config.server.as_ref().unwrap();
        assert_eq!(server.host, Some("0.0.0.0".to_string()));
        assert_eq!(server.port, Some(8080));
        assert_eq!(server.public_url.as_deref(), Some("https://cdn.test"));

        let auth = config.auth.as_ref().unwrap();
        assert_eq!(auth.access_token_ttl_secs, Some(60));
        assert_eq!(auth.secure_cookies, Some(true));

        assert_eq!(config.media.as_ref().unwrap().max_upload_bytes, Some(2048));
        assert_eq!(
            config.cors.as_ref().unwrap().origins,
            Some(vec!["http://localhost:5173".to_string()])
        );
    }

    #[test]
    fn test_file_config_parse_empty() {
        let config: FileConfig = serde_json::from_str("{}").unwrap();
        assert!(config.server.is_none());
        assert!(config.auth.is_none());
        assert!(config.debug.is_none());
    }

    #[test]
    fn test_file_config_parse_extra_fields() {
        let json = r#"{ "server": { "host": "localhost" }, "unknown_field": 123 }"#;
        let config: FileConfig = serde_json::from_str(json).unwrap();

        assert_eq!(
            config.server.as_ref().unwrap().host,
            Some("localhost".to_string())
        );
        assert_eq!(config.extra.get("unknown_field").unwrap(), 123);
    }

    #[test]
    fn test_file_config_merge() {
        let mut base: FileConfig = serde_json::from_str(
            r#"{ "server": { "host": "127.0.0.1", "port": 8000 }, "cors": { "origins": ["http://a.test"] } }"#,
        )
        .unwrap();
        let overlay: FileConfig =
            serde_json::from_str(r#"{ "server": { "port": 9000 }, "debug": true }"#).unwrap();

        base.merge(overlay);

        let server = base.server.as_ref().unwrap();
        assert_eq!(server.host, Some("127.0.0.1".to_string()));
        assert_eq!(server.port, Some(9000));
        assert_eq!(base.debug, Some(true));
        assert_eq!(
            base.cors.as_ref().unwrap().origins,
            Some(vec!["http://a.test".to_string()])
        );
    }

    #[test]
    fn test_resolve_defaults() {
        let config = AppConfig::resolve(FileConfig::default(), &CliConfig::default());

        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.public_url, "http://127.0.0.1:8000");
        assert_eq!(
            config.auth.access_token_ttl_secs,
            DEFAULT_ACCESS_TOKEN_TTL_SECS
        );
        assert!(config.auth.access_token_secret.is_none());
        assert_eq!(config.media.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert!(config.cors.origins.is_empty());
        assert!(!config.debug);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_resolve_cli_overrides_file() {
        let file: FileConfig = serde_json::from_str(
            r#"{ "server": { "host": "10.0.0.1", "port": 8080 }, "cors": { "origins": ["http://file.test"] } }"#,
        )
        .unwrap();
        let cli = CliConfig {
            port: Some(9999),
            cors_origins: vec!["http://cli.test".to_string()],
            public_url: Some("https://videos.test/".to_string()),
            ..Default::default()
        };

        let config = AppConfig::resolve(file, &cli);
        assert_eq!(config.server.host, "10.0.0.1");
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.public_url, "https://videos.test");
        assert_eq!(config.cors.origins, vec!["http://cli.test"]);
    }

    #[test]
    fn test_public_url_for_all_interfaces() {
        let cli = CliConfig {
            host: Some("0.0.0.0".to_string()),
            ..Default::default()
        };
        let config = AppConfig::resolve(FileConfig::default(), &cli);
        assert_eq!(config.server.public_url, "http://localhost:8000");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = AppConfig::resolve(FileConfig::default(), &CliConfig::default());
        config.server.port = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::resolve(FileConfig::default(), &CliConfig::default());
        config.server.public_url = "ftp://media.test".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::resolve(FileConfig::default(), &CliConfig::default());
        config.auth.access_token_secret = Some("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_auth_debug_redacts_secrets() {
        let config = AuthConfig {
            access_token_secret: Some("super-secret".to_string()),
            ..Default::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }
}
