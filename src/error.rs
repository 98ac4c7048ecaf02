// Copyright 2025 Jayashankar
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Command '{command}' not found.\n{hint}")]
    CommandNotFound { command: String, hint: String },

    #[error("Command failed ({status}): {command}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
    },

    #[error("Failed to run command '{command}': {source}")]
    CommandSpawn {
        command: String,
        source: std::io::Error,
    },

    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to remove {path}: {source}")]
    Remove {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid path (non-UTF8): {0}")]
    InvalidPath(PathBuf),

    #[error("Existing certificate state found in {0}\nUse --force to replace it.")]
    ExistingState(PathBuf),

    #[error("Failed to download {url}: {source}")]
    Download { url: String, source: reqwest::Error },

    #[error("Download of {url} returned HTTP {status}")]
    DownloadStatus { url: String, status: u16 },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
