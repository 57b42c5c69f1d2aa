// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

use crate::pipeline::Step;

/// Where to point users when credentials are missing.
pub const CREDENTIALS_HELP_URL: &str = "https://err.sh/47ng/actions-clever-cloud/env";

#[derive(Error, Debug)]
pub enum DeployError {
    #[error("Missing {0} environment variable: {CREDENTIALS_HELP_URL}")]
    MissingCredential(&'static str),

    #[error(
        "Input does not meet YAML 1.2 \"Core Schema\" specification: {input}\n\
         Support boolean input list: `true | True | TRUE | false | False | FALSE` (got {value:?})"
    )]
    InvalidBoolean { input: String, value: String },

    #[error("Deploy path does not exist or is not a directory: {}", .0.display())]
    DeployPathNotFound(PathBuf),

    #[error("Invalid inputs file {}: {message}", .path.display())]
    InputsFile { path: PathBuf, message: String },

    #[error(
        "This repository is a shallow clone, deploying it would push an incomplete history.\n\
         Set `fetch-depth: 0` on the `actions/checkout` step to fetch the full history."
    )]
    ShallowClone,

    #[error("{step} failed with code {code}")]
    StepFailed { step: Step, code: i32 },

    #[error("Failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, DeployError>;
