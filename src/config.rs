// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Email used for certificate requests when none is configured.
pub const DEFAULT_EMAIL: &str = "webmaster@example.com";

/// RSA key size requested from certbot.
const DEFAULT_RSA_KEY_SIZE: u32 = 4096;

#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Issuer email passed to certbot (overridden by --email)
    #[serde(default = "default_email")]
    pub email: String,
    #[serde(default = "default_rsa_key_size")]
    pub rsa_key_size: u32,
    /// Compose service name of the reverse proxy
    #[serde(default = "default_proxy_service")]
    pub proxy_service: String,
    /// Compose service name of the certbot container
    #[serde(default = "default_certbot_service")]
    pub certbot_service: String,
    /// Webroot path inside the certbot container
    #[serde(default = "default_webroot_path")]
    pub webroot_path: String,
}

fn default_email() -> String {
    DEFAULT_EMAIL.to_string()
}

fn default_rsa_key_size() -> u32 {
    DEFAULT_RSA_KEY_SIZE
}

fn default_proxy_service() -> String {
    "nginx".to_string()
}

fn default_certbot_service() -> String {
    "certbot".to_string()
}

fn default_webroot_path() -> String {
    "/var/www/certbot".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            email: default_email(),
            rsa_key_size: default_rsa_key_size(),
            proxy_service: default_proxy_service(),
            certbot_service: default_certbot_service(),
            webroot_path: default_webroot_path(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| Error::ReadFile {
                path: path.to_path_buf(),
                source: e,
            })?;
            toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?
        } else {
            Self::default()
        };

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.email.is_empty() || !self.email.contains('@') {
            return Err(Error::Config(format!(
                "email '{}' is not a valid address",
                self.email
            )));
        }

        // certbot rejects keys below 2048; cap at 8192 to keep issuance sane
        if self.rsa_key_size < 2048 || self.rsa_key_size > 8192 {
            return Err(Error::Config(format!(
                "rsa_key_size must be between 2048 and 8192, got {}",
                self.rsa_key_size
            )));
        }

        if self.proxy_service.is_empty() {
            return Err(Error::Config("proxy_service cannot be empty".into()));
        }
        if self.certbot_service.is_empty() {
            return Err(Error::Config("certbot_service cannot be empty".into()));
        }
        if self.webroot_path.is_empty() {
            return Err(Error::Config("webroot_path cannot be empty".into()));
        }

        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| Error::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Filesystem layout of a certup project directory.
#[derive(Debug, Clone)]
pub struct Paths {
    pub base: PathBuf,
    /// Template directory (inputs, never touched)
    pub nginx_templates: PathBuf,
    /// Active site config directory (recreated each run)
    pub nginx_sites: PathBuf,
    pub certbot_conf: PathBuf,
    pub certbot_logs: PathBuf,
    pub certbot_www: PathBuf,
    pub config: PathBuf,
}

impl Paths {
    /// Resolve the project root: explicit flag, then CERTUP_ROOT, then cwd.
    pub fn new(root: Option<&Path>) -> Result<Self> {
        let base = match root {
            Some(r) => r.to_path_buf(),
            None => Self::base_dir()?,
        };

        let nginx = base.join("nginx");
        let certbot = base.join("certbot");

        Ok(Self {
            nginx_templates: nginx.join("conf"),
            nginx_sites: nginx.join("conf.d"),
            certbot_conf: certbot.join("conf"),
            certbot_logs: certbot.join("logs"),
            certbot_www: certbot.join("www"),
            config: base.join("certup.toml"),
            base,
        })
    }

    fn base_dir() -> Result<PathBuf> {
        if let Ok(custom_root) = std::env::var("CERTUP_ROOT") {
            let path = PathBuf::from(&custom_root);

            if !path.is_absolute() {
                return Err(Error::Config(format!(
                    "CERTUP_ROOT must be an absolute path, got: {}",
                    custom_root
                )));
            }

            return Ok(path);
        }

        std::env::current_dir()
            .map_err(|e| Error::Config(format!("Cannot determine current directory: {}", e)))
    }

    /// HTTP-only site template
    pub fn http_template(&self) -> PathBuf {
        self.nginx_templates.join("default.conf")
    }

    /// HTTPS site template
    pub fn https_template(&self) -> PathBuf {
        self.nginx_templates.join("default-ssl.conf")
    }

    pub fn http_site(&self) -> PathBuf {
        self.nginx_sites.join("default.conf")
    }

    pub fn https_site(&self) -> PathBuf {
        self.nginx_sites.join("default-ssl.conf")
    }

    /// The certbot state directories reset on every run.
    pub fn certbot_dirs(&self) -> [&PathBuf; 3] {
        [&self.certbot_conf, &self.certbot_logs, &self.certbot_www]
    }
}
