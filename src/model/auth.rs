// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::Duration;

use super::AccessLevel;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidationResult {
    pub(crate) is_valid: bool,
    pub(crate) message: String,
}

impl ValidationResult {
    pub(crate) fn valid() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    pub(crate) fn invalid(message: &str) -> Self {
        Self {
            is_valid: false,
            message: message.to_owned(),
        }
    }
}

/// Outcome of an authentication attempt. Failures still carry a level, which
/// is always [`AccessLevel::Guest`] and only acts as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AuthResponse {
    pub(crate) success: bool,
    pub(crate) access_level: AccessLevel,
    pub(crate) message: String,
    pub(crate) session_duration: Option<Duration>,
}

impl AuthResponse {
    pub(crate) fn granted(access_level: AccessLevel, message: &str) -> Self {
        Self {
            success: true,
            access_level,
            message: message.to_owned(),
            session_duration: Some(access_level.session_duration()),
        }
    }

    pub(crate) fn denied(message: &str) -> Self {
        Self {
            success: false,
            access_level: AccessLevel::Guest,
            message: message.to_owned(),
            session_duration: None,
        }
    }
}
