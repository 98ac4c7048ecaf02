// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

//! Docker Compose invocations. Every container operation goes through
//! `docker compose` so the proxy and certbot services are addressed by
//! their compose service names, never by raw container ids.

use crate::error::{Error, Result};
use std::process::Command;

/// Check if docker is available on the system.
pub fn is_docker_available() -> bool {
    Command::new("which")
        .arg("docker")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Hint printed when the docker probe fails.
pub fn docker_install_hint() -> String {
    "Docker is required to run the proxy and certbot containers.\n\
     See https://docs.docker.com/engine/install/"
        .to_string()
}

/// Arguments for stopping a compose service.
pub fn compose_down_args(service: &str) -> Vec<String> {
    vec!["compose".into(), "down".into(), service.into()]
}

/// Arguments for recreating a compose service in detached mode.
pub fn compose_up_args(service: &str) -> Vec<String> {
    vec![
        "compose".into(),
        "up".into(),
        "--force-recreate".into(),
        "-d".into(),
        service.into(),
    ]
}

/// Arguments for a one-shot certbot invocation through the compose service,
/// overriding the entrypoint so arbitrary certbot subcommands can run.
pub fn certbot_run_args(service: &str, certbot_args: &[String]) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "compose".into(),
        "run".into(),
        "--rm".into(), // Remove the container when it exits
        "--entrypoint".into(),
        "certbot".into(),
        service.into(),
    ];
    args.extend_from_slice(certbot_args);
    args
}

/// Run `docker` with the given arguments, streaming output to the user,
/// and fail on a non-zero exit status.
pub fn run_docker(args: &[String]) -> Result<()> {
    let status = run_docker_status(args)?;

    if !status.success() {
        return Err(Error::CommandFailed {
            command: display_command(args),
            status,
        });
    }

    Ok(())
}

/// Run `docker` with the given arguments and return the raw exit status.
/// Used for steps where a non-zero exit is acceptable (e.g. stopping a
/// service that was never started).
pub fn run_docker_status(args: &[String]) -> Result<std::process::ExitStatus> {
    Command::new("docker")
        .args(args)
        .status()
        .map_err(|e| Error::CommandSpawn {
            command: display_command(args),
            source: e,
        })
}

fn display_command(args: &[String]) -> String {
    format!("docker {}", args.join(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_down_args() {
        assert_eq!(compose_down_args("nginx"), ["compose", "down", "nginx"]);
    }

    #[test]
    fn test_compose_up_args() {
        assert_eq!(
            compose_up_args("nginx"),
            ["compose", "up", "--force-recreate", "-d", "nginx"]
        );
    }

    #[test]
    fn test_certbot_run_args() {
        let args = certbot_run_args(
            "certbot",
            &["certonly".to_string(), "--webroot".to_string()],
        );
        assert_eq!(
            args,
            [
                "compose",
                "run",
                "--rm",
                "--entrypoint",
                "certbot",
                "certbot",
                "certonly",
                "--webroot"
            ]
        );
    }

    #[test]
    fn test_certbot_run_args_custom_service() {
        let args = certbot_run_args("acme", &[]);
        assert_eq!(
            args,
            ["compose", "run", "--rm", "--entrypoint", "certbot", "acme"]
        );
    }
}
