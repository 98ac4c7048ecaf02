// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

/// A Let's Encrypt certificate request issued via certbot's webroot
/// challenge. Holds everything needed to build the `certonly` argument
/// list; actually running it is the caller's job (see `docker::certbot_run_args`).
#[derive(Debug, Clone)]
pub struct CertRequest {
    /// Domains to certify; the first one is the primary server name.
    pub domains: Vec<String>,
    pub email: String,
    /// Webroot path inside the certbot container
    pub webroot_path: String,
    pub rsa_key_size: u32,
    /// Use the Let's Encrypt staging endpoint
    pub staging: bool,
}

impl CertRequest {
    /// Build the full `certonly` argument list.
    pub fn certonly_args(&self) -> Vec<String> {
        let mut args: Vec<String> = vec![
            "certonly".into(),
            "--webroot".into(),
            "--webroot-path".into(),
            self.webroot_path.clone(),
            "--email".into(),
            self.email.clone(),
            "--non-interactive".into(),
            "--no-eff-email".into(),
            "--rsa-key-size".into(),
            self.rsa_key_size.to_string(),
            "--agree-tos".into(),
            "--force-renewal".into(),
        ];

        for domain in &self.domains {
            args.push("-d".into());
            args.push(domain.clone());
        }

        if self.staging {
            args.push("--staging".into());
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EMAIL;

    fn request(domains: &[&str], staging: bool) -> CertRequest {
        CertRequest {
            domains: domains.iter().map(|d| d.to_string()).collect(),
            email: DEFAULT_EMAIL.to_string(),
            webroot_path: "/var/www/certbot".to_string(),
            rsa_key_size: 4096,
            staging,
        }
    }

    #[test]
    fn test_certonly_args_contain_all_domains() {
        let args = request(&["example.com", "www.example.com"], false).certonly_args();

        let joined = args.join(" ");
        assert!(joined.contains("-d example.com"));
        assert!(joined.contains("-d www.example.com"));

        // Each domain gets its own -d flag
        assert_eq!(args.iter().filter(|a| *a == "-d").count(), 2);
    }

    #[test]
    fn test_certonly_args_default_email() {
        let args = request(&["example.com"], false).certonly_args();

        let email_pos = args
            .iter()
            .position(|a| a == "--email")
            .expect("--email flag should be present");
        assert_eq!(args[email_pos + 1], DEFAULT_EMAIL);
    }

    #[test]
    fn test_certonly_args_fixed_flags() {
        let args = request(&["example.com"], false).certonly_args();

        assert_eq!(args[0], "certonly");
        for flag in [
            "--webroot",
            "--non-interactive",
            "--no-eff-email",
            "--agree-tos",
            "--force-renewal",
        ] {
            assert!(args.contains(&flag.to_string()), "missing {}", flag);
        }

        let webroot_pos = args
            .iter()
            .position(|a| a == "--webroot-path")
            .expect("--webroot-path flag should be present");
        assert_eq!(args[webroot_pos + 1], "/var/www/certbot");

        let size_pos = args
            .iter()
            .position(|a| a == "--rsa-key-size")
            .expect("--rsa-key-size flag should be present");
        assert_eq!(args[size_pos + 1], "4096");
    }

    #[test]
    fn test_certonly_args_staging_only_when_set() {
        let staging = request(&["example.com"], true).certonly_args();
        let production = request(&["example.com"], false).certonly_args();

        assert_eq!(staging.last().map(String::as_str), Some("--staging"));
        assert!(!production.contains(&"--staging".to_string()));
    }
}
