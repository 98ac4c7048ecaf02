// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

//! Site config rendering for the nginx reverse proxy. Templates live in
//! `nginx/conf/` and carry a single placeholder for the server name;
//! rendered configs are written into `nginx/conf.d/`, which nginx picks up
//! on restart.

use crate::error::{Error, Result};
use crate::fs::atomic_write;
use std::path::Path;

/// Token substituted with the primary domain when rendering a template.
pub const SERVER_NAME_PLACEHOLDER: &str = "__SERVER_NAME__";

/// Replace every placeholder occurrence with the given server name.
pub fn render_template(template: &str, server_name: &str) -> String {
    template.replace(SERVER_NAME_PLACEHOLDER, server_name)
}

/// Read a template, render it for the server name, and write the result
/// into the active config directory.
pub fn install_site_config(template: &Path, dest: &Path, server_name: &str) -> Result<()> {
    let contents = std::fs::read_to_string(template).map_err(|e| Error::ReadFile {
        path: template.to_path_buf(),
        source: e,
    })?;

    let rendered = render_template(&contents, server_name);

    atomic_write(dest, rendered.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "\
server {
    listen 80;
    server_name __SERVER_NAME__ www.__SERVER_NAME__;

    location /.well-known/acme-challenge/ {
        root /var/www/certbot;
    }
}
";

    #[test]
    fn test_render_substitutes_server_name() {
        let rendered = render_template(TEMPLATE, "example.com");

        assert!(rendered.contains("server_name example.com www.example.com;"));
        assert!(!rendered.contains(SERVER_NAME_PLACEHOLDER));
    }

    #[test]
    fn test_render_without_placeholder_is_identity() {
        let template = "server { listen 80; }\n";
        assert_eq!(render_template(template, "example.com"), template);
    }

    #[test]
    fn test_install_site_config() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let template_path = temp.path().join("default.conf");
        let dest_path = temp.path().join("conf.d").join("default.conf");
        std::fs::create_dir(temp.path().join("conf.d")).expect("setup should succeed");
        std::fs::write(&template_path, TEMPLATE).expect("setup should succeed");

        install_site_config(&template_path, &dest_path, "example.com")
            .expect("install should succeed");

        let rendered = std::fs::read_to_string(&dest_path).expect("config should be written");
        assert!(rendered.contains("example.com"));
        assert!(!rendered.contains(SERVER_NAME_PLACEHOLDER));
    }

    #[test]
    fn test_install_site_config_missing_template() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let template_path = temp.path().join("missing.conf");
        let dest_path = temp.path().join("default.conf");

        let result = install_site_config(&template_path, &dest_path, "example.com");
        assert!(result.is_err());
        assert!(!dest_path.exists());
    }
}
