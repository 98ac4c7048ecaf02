// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

//! Let's Encrypt certificate provisioning for an nginx reverse proxy
//! running under Docker Compose.
//!
//! ```rust,no_run
//! use certup::{CertRequest, Config, Paths};
//!
//! let paths = Paths::new(None)?;
//! let config = Config::load(&paths.config)?;
//!
//! let request = CertRequest {
//!     domains: vec!["example.com".into()],
//!     email: config.email.clone(),
//!     webroot_path: config.webroot_path.clone(),
//!     rsa_key_size: config.rsa_key_size,
//!     staging: true,
//! };
//! let args = certup::docker::certbot_run_args(&config.certbot_service, &request.certonly_args());
//! certup::docker::run_docker(&args)?;
//! # Ok::<(), certup::Error>(())
//! ```

/// Certificate request construction.
pub mod certbot;
/// Configuration and project paths.
pub mod config;
/// Docker Compose invocations.
pub mod docker;
/// TLS parameter file downloads.
pub mod download;
/// Error types.
pub mod error;
/// Firewall checks.
pub mod firewall;
/// Filesystem utilities.
pub mod fs;
/// nginx site config rendering.
pub mod nginx;

pub use certbot::CertRequest;
pub use config::{Config, Paths, DEFAULT_EMAIL};
pub use download::{dhparams_url, fetch_if_missing, ssl_options_url, DHPARAMS_NAME, SSL_OPTIONS_NAME};
pub use error::{Error, Result};
pub use fs::{atomic_write, dir_has_state, remove_dir_ignore_missing, reset_dir, IGNORE_MARKER};
pub use nginx::{install_site_config, render_template, SERVER_NAME_PLACEHOLDER};
