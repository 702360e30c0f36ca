// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

pub(crate) mod access_code;
pub(crate) mod auth;
pub(crate) mod session;

use std::fmt::{Display, Formatter};

use chrono::Duration;
use clap::ValueEnum;
use inflector::Inflector as _;
use serde::{Deserialize, Serialize};

pub(crate) use access_code::{AccessCode, CodeStatus};
pub(crate) use auth::{AuthResponse, ValidationResult};
pub(crate) use session::Session;

/// The closed set of privileges a session can carry.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Hash, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum AccessLevel {
    Guest,
    User,
    Admin,
}

impl AccessLevel {
    /// How long a freshly created session at this level stays valid.
    pub(crate) fn session_duration(self) -> Duration {
        match self {
            Self::Admin => Duration::hours(24),
            Self::User => Duration::hours(8),
            Self::Guest => Duration::hours(2),
        }
    }
}

impl Display for AccessLevel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let value = self.to_possible_value().ok_or(std::fmt::Error)?;
        write!(f, "{}", value.get_name().to_title_case())
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub(crate) fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_test::{assert_tokens, Token};

    use super::*;

    #[test]
    fn access_level_wire_names() {
        assert_tokens(
            &AccessLevel::Admin,
            &[Token::UnitVariant {
                name: "AccessLevel",
                variant: "admin",
            }],
        );
        assert_tokens(
            &AccessLevel::Guest,
            &[Token::UnitVariant {
                name: "AccessLevel",
                variant: "guest",
            }],
        );
    }

    #[test]
    fn session_durations_by_level() {
        assert_eq!(AccessLevel::Admin.session_duration(), Duration::hours(24));
        assert_eq!(AccessLevel::User.session_duration(), Duration::hours(8));
        assert_eq!(AccessLevel::Guest.session_duration(), Duration::hours(2));
    }

    #[test]
    fn access_level_display() {
        assert_eq!(AccessLevel::User.to_string(), "User");
    }

    #[test]
    fn theme_parse() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse(Theme::Light.as_str()), Some(Theme::Light));
        assert_eq!(Theme::parse("sepia"), None);
    }
}
