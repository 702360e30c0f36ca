// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{io, result};

use thiserror::Error;

pub(crate) type Result<T, E = Error> = result::Result<T, E>;

#[derive(Error, Debug)]
pub(crate) enum Error {
    #[error("IO operation failed: {0}")]
    Io(#[from] io::Error),
    #[error("JSON format error: {0}")]
    Json(serde_json::Error),
    #[error("storage error: {0}")]
    Storage(#[from] Storage),
    #[error("{0}")]
    Analysis(#[from] Analysis),
    #[error("command execution failed")]
    Command,
    #[error("operation cancelled")]
    Cancelled,
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        // LINT: Deliberate fall-through that should catch future cases added to
        // the enum.
        #[allow(clippy::wildcard_enum_match_arm)]
        match value.classify() {
            serde_json::error::Category::Io => Self::Io(value.into()),
            _ => Self::Json(value),
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(value: tokio::task::JoinError) -> Self {
        if value.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Io(value.into())
        }
    }
}

#[derive(Error, Debug)]
pub(crate) enum Storage {
    #[error("no data directory is available on this platform")]
    NoProjectDirs,
}

/// Failures of the analysis request flow. The messages are shown to the user
/// as-is.
#[derive(Error, Debug)]
pub(crate) enum Analysis {
    #[error("{0}")]
    Invalid(String),
    #[error("Analysis failed: {0}")]
    Status(String),
    #[error("Analysis request failed: {0}")]
    Transport(Box<ureq::Transport>),
    #[error("Failed to parse analysis results. Please try again.")]
    Parse(#[source] serde_json::Error),
}

impl From<ureq::Error> for Analysis {
    fn from(value: ureq::Error) -> Self {
        match value {
            ureq::Error::Status(_, resp) => Self::Status(resp.status_text().to_owned()),
            ureq::Error::Transport(transport) => Self::Transport(Box::new(transport)),
        }
    }
}
