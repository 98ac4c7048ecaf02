// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

//! Downloads of certbot's recommended TLS parameter files. Both files are
//! fetched once and then kept as-is; there is no freshness check, matching
//! certbot's own init-letsencrypt convention.

use crate::error::{Error, Result};
use crate::fs::atomic_write;
use std::path::Path;
use std::time::Duration;

const GIT_BASE: &str = "https://raw.githubusercontent.com/certbot/certbot/master";

/// Recommended nginx SSL options shipped with certbot-nginx.
pub const SSL_OPTIONS_NAME: &str = "options-ssl-nginx.conf";

/// Pre-generated Diffie-Hellman parameters shipped with certbot.
pub const DHPARAMS_NAME: &str = "ssl-dhparams.pem";

const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

pub fn ssl_options_url() -> String {
    format!(
        "{}/certbot-nginx/certbot_nginx/_internal/tls_configs/{}",
        GIT_BASE, SSL_OPTIONS_NAME
    )
}

pub fn dhparams_url() -> String {
    // The file lives in the certbot package dir of the certbot/certbot repo
    format!("{}/certbot/certbot/{}", GIT_BASE, DHPARAMS_NAME)
}

/// Download `url` into `dest` unless the file already exists.
/// Returns true when a download happened, false when the existing file was
/// kept. No network activity at all in the latter case.
pub fn fetch_if_missing(url: &str, dest: &Path) -> Result<bool> {
    if dest.exists() {
        return Ok(false);
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(DOWNLOAD_TIMEOUT_SECS))
        .build()
        .map_err(|e| Error::Download {
            url: url.to_string(),
            source: e,
        })?;

    let response = client.get(url).send().map_err(|e| Error::Download {
        url: url.to_string(),
        source: e,
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::DownloadStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.bytes().map_err(|e| Error::Download {
        url: url.to_string(),
        source: e,
    })?;

    atomic_write(dest, &body)?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_skips_existing_file() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let dest = temp.path().join(SSL_OPTIONS_NAME);
        std::fs::write(&dest, b"existing parameters").expect("setup should succeed");

        // The URL is unreachable on purpose: an existing destination must
        // short-circuit before any network activity.
        let fetched = fetch_if_missing("http://invalid.invalid/never", &dest)
            .expect("existing file should be kept without error");

        assert!(!fetched);
        let contents = std::fs::read_to_string(&dest).expect("file should be readable");
        assert_eq!(contents, "existing parameters");
    }

    #[test]
    fn test_fetch_missing_file_fails_on_unreachable_host() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let dest = temp.path().join(DHPARAMS_NAME);

        let result = fetch_if_missing("http://invalid.invalid/never", &dest);

        assert!(result.is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn test_urls_point_at_certbot_repo() {
        assert_eq!(
            ssl_options_url(),
            "https://raw.githubusercontent.com/certbot/certbot/master/certbot-nginx/certbot_nginx/_internal/tls_configs/options-ssl-nginx.conf"
        );
        assert_eq!(
            dhparams_url(),
            "https://raw.githubusercontent.com/certbot/certbot/master/certbot/certbot/ssl-dhparams.pem"
        );
    }
}
