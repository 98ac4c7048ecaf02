// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

use certup::{
    docker, download, firewall, fs, nginx, CertRequest, Config, Error, Paths, Result,
};
use clap::Parser;
use std::path::PathBuf;

// ============================================================================
// CLI definitions
// ============================================================================

#[derive(Parser)]
#[command(name = "certup")]
#[command(about = "Let's Encrypt certificates for nginx in Docker")]
#[command(version)]
#[command(after_help = "\
EXAMPLES:
    certup example.com www.example.com      # Certify both domains
    certup example.com --staging            # Dry run against staging
    certup example.com --email ops@example.com --force

The current directory (or --root / CERTUP_ROOT) must contain the compose
project with nginx/conf templates and the certbot service.")]
struct Cli {
    /// The domains to certify; the first is the primary server name
    #[arg(required = true)]
    domains: Vec<String>,

    /// Webmaster email address for the certificate request
    #[arg(long)]
    email: Option<String>,

    /// Force replacement of existing certificates
    #[arg(long)]
    force: bool,

    /// Use the Let's Encrypt staging environment
    #[arg(long)]
    staging: bool,

    /// Project root directory (default: CERTUP_ROOT or current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    /// Suppress non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show detailed output
    #[arg(short, long)]
    verbose: bool,
}

/// Output helper that respects --quiet and --verbose flags.
#[derive(Clone, Copy)]
struct Output {
    quiet: bool,
    verbose: bool,
}

impl Output {
    fn new(quiet: bool, verbose: bool) -> Self {
        Self { quiet, verbose }
    }

    /// Print a standard message (suppressed with --quiet)
    fn print(&self, msg: &str) {
        if !self.quiet {
            println!("{}", msg);
        }
    }

    /// Print a verbose message (only shown with --verbose)
    fn verbose(&self, msg: &str) {
        if self.verbose {
            println!("{}", msg);
        }
    }
}

fn main() {
    // Reset SIGPIPE to default behavior (exit) instead of panic
    // This prevents "broken pipe" panics when output is piped to tools like grep/head
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let out = Output::new(cli.quiet, cli.verbose);

    let paths = Paths::new(cli.root.as_deref())?;
    let config = Config::load(&paths.config)?;

    // Seed the config file with defaults so the tunables are discoverable
    if !paths.config.exists() {
        config.save(&paths.config)?;
        out.verbose(&format!("Wrote default config to {}", paths.config.display()));
    }

    preflight(out)?;

    reset_state(&paths, cli.force, &config, out)?;

    configure_http(&paths, &cli.domains[0], &config, out)?;

    request_certificates(&cli, &config, out)?;

    fetch_tls_parameters(&paths, out)?;

    configure_https(&paths, &cli.domains[0], &config, out)?;

    out.print("");
    out.print(&format!(
        "Done! {} is now serving HTTPS for {}.",
        config.proxy_service, cli.domains[0]
    ));

    Ok(())
}

// ============================================================================
// Provisioning steps
// ============================================================================

/// Docker must be present; the firewall check is best-effort.
fn preflight(out: Output) -> Result<()> {
    if !docker::is_docker_available() {
        return Err(Error::CommandNotFound {
            command: "docker".to_string(),
            hint: docker::docker_install_hint(),
        });
    }
    out.verbose("Found docker on PATH");

    match firewall::ensure_http_https_open() {
        firewall::FirewallStatus::Opened => out.print("Opened firewall ports 80/443"),
        firewall::FirewallStatus::AlreadyOpen => out.verbose("Firewall already allows 80/443"),
        firewall::FirewallStatus::Unknown => {}
    }

    Ok(())
}

/// Stop the proxy and wipe certificate state from previous runs.
fn reset_state(paths: &Paths, force: bool, config: &Config, out: Output) -> Result<()> {
    // Refuse to wipe live certificates unless the user asked for it
    if !force && fs::dir_has_state(&paths.certbot_conf)? {
        return Err(Error::ExistingState(paths.certbot_conf.clone()));
    }

    out.print(&format!("Stopping {}...", config.proxy_service));
    // The service may not be running; a non-zero exit here is fine
    let status = docker::run_docker_status(&docker::compose_down_args(&config.proxy_service))?;
    if !status.success() {
        out.verbose(&format!(
            "{} was not running (compose down exited non-zero)",
            config.proxy_service
        ));
    }

    for dir in paths.certbot_dirs() {
        out.print(&format!("Resetting {}...", dir.display()));
        fs::reset_dir(dir)?;
    }

    out.print(&format!("Removing {}...", paths.nginx_sites.display()));
    fs::remove_dir_ignore_missing(&paths.nginx_sites)?;

    Ok(())
}

/// Bring the proxy up serving plain HTTP so the ACME challenge can be served.
fn configure_http(paths: &Paths, server_name: &str, config: &Config, out: Output) -> Result<()> {
    std::fs::create_dir_all(&paths.nginx_sites).map_err(|e| Error::CreateDir {
        path: paths.nginx_sites.clone(),
        source: e,
    })?;

    out.print(&format!("Writing {}...", paths.http_site().display()));
    nginx::install_site_config(&paths.http_template(), &paths.http_site(), server_name)?;

    out.print(&format!(
        "Starting {} with HTTP only...",
        config.proxy_service
    ));
    docker::run_docker(&docker::compose_up_args(&config.proxy_service))
}

fn request_certificates(cli: &Cli, config: &Config, out: Output) -> Result<()> {
    out.print(&format!(
        "Requesting Let's Encrypt certificates for {}...",
        cli.domains[0]
    ));

    let request = CertRequest {
        domains: cli.domains.clone(),
        email: cli.email.clone().unwrap_or_else(|| config.email.clone()),
        webroot_path: config.webroot_path.clone(),
        rsa_key_size: config.rsa_key_size,
        staging: cli.staging,
    };

    let args = docker::certbot_run_args(&config.certbot_service, &request.certonly_args());
    out.verbose(&format!("docker {}", args.join(" ")));

    docker::run_docker(&args)
}

/// Fetch certbot's recommended SSL options and DH parameters, once.
fn fetch_tls_parameters(paths: &Paths, out: Output) -> Result<()> {
    let ssl_options = paths.certbot_conf.join(download::SSL_OPTIONS_NAME);
    if download::fetch_if_missing(&download::ssl_options_url(), &ssl_options)? {
        out.print("Downloaded recommended SSL options");
    } else {
        out.verbose(&format!("{} already present", ssl_options.display()));
    }

    let dhparams = paths.certbot_conf.join(download::DHPARAMS_NAME);
    if download::fetch_if_missing(&download::dhparams_url(), &dhparams)? {
        out.print("Downloaded recommended Diffie-Hellman parameters");
    } else {
        out.verbose(&format!("{} already present", dhparams.display()));
    }

    Ok(())
}

/// Switch the proxy over to HTTPS with the freshly issued certificates.
fn configure_https(paths: &Paths, server_name: &str, config: &Config, out: Output) -> Result<()> {
    out.print(&format!("Writing {}...", paths.https_site().display()));
    nginx::install_site_config(&paths.https_template(), &paths.https_site(), server_name)?;

    out.print(&format!(
        "Starting {} with HTTPS...",
        config.proxy_service
    ));
    docker::run_docker(&docker::compose_up_args(&config.proxy_service))
}
