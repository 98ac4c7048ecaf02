// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

//! ufw firewall checks. Everything here is best-effort: a host without ufw,
//! or without sudo rights, must not block certificate provisioning — the
//! ACME challenge will fail loudly on its own if port 80 is truly closed.

use std::process::Command;

/// Rule passed to `ufw allow` when ports 80/443 are closed.
pub const ALLOW_RULE: &str = "80,443/tcp";

/// Rule fragments whose presence in `ufw status` output means HTTP and
/// HTTPS traffic can reach the proxy.
const OPEN_RULES: &[&str] = &["80/tcp", "443/tcp", "80,443/tcp"];

/// Check whether the given `ufw status` output already allows web traffic.
pub fn allows_http_https(status_output: &str) -> bool {
    OPEN_RULES.iter().any(|rule| status_output.contains(rule))
}

/// Outcome of the firewall check; the caller decides how to report it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FirewallStatus {
    /// Web ports were already allowed
    AlreadyOpen,
    /// An allow rule was issued
    Opened,
    /// Status could not be determined; a warning went to stderr
    Unknown,
}

/// Make sure ports 80/443 are open, issuing an allow rule when they are not.
/// Failures are reported as warnings on stderr and otherwise ignored.
pub fn ensure_http_https_open() -> FirewallStatus {
    let output = match Command::new("sudo")
        .args(["ufw", "status", "numbered"])
        .output()
    {
        Ok(o) if o.status.success() => o,
        Ok(o) => {
            eprintln!(
                "Warning: Could not read firewall status: {}",
                String::from_utf8_lossy(&o.stderr).trim()
            );
            return FirewallStatus::Unknown;
        }
        Err(e) => {
            eprintln!("Warning: Could not read firewall status: {}", e);
            return FirewallStatus::Unknown;
        }
    };

    let status_text = String::from_utf8_lossy(&output.stdout);
    if allows_http_https(&status_text) {
        return FirewallStatus::AlreadyOpen;
    }

    match Command::new("sudo").args(["ufw", "allow", ALLOW_RULE]).output() {
        Ok(o) if o.status.success() => FirewallStatus::Opened,
        Ok(o) => {
            eprintln!(
                "Warning: Could not open firewall ports: {}",
                String::from_utf8_lossy(&o.stderr).trim()
            );
            FirewallStatus::Unknown
        }
        Err(e) => {
            eprintln!("Warning: Could not open firewall ports: {}", e);
            FirewallStatus::Unknown
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_separate_rules() {
        let status = "\
Status: active

     To                         Action      From
     --                         ------      ----
[ 1] 80/tcp                     ALLOW IN    Anywhere
[ 2] 443/tcp                    ALLOW IN    Anywhere
";
        assert!(allows_http_https(status));
    }

    #[test]
    fn test_allows_combined_rule() {
        let status = "[ 1] 80,443/tcp                 ALLOW IN    Anywhere\n";
        assert!(allows_http_https(status));
    }

    #[test]
    fn test_blocks_when_no_web_rules() {
        let status = "\
Status: active

     To                         Action      From
     --                         ------      ----
[ 1] 22/tcp                     ALLOW IN    Anywhere
";
        assert!(!allows_http_https(status));
    }

    #[test]
    fn test_blocks_on_inactive_firewall_output() {
        assert!(!allows_http_https("Status: inactive\n"));
    }
}
