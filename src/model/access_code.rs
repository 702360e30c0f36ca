// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// A user-distributable credential managed from the admin panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Tabled)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AccessCode {
    #[tabled(rename = "ID")]
    pub(crate) id: String,
    #[tabled(rename = "Code")]
    pub(crate) code: String,
    #[serde(default)]
    #[tabled(rename = "Notes")]
    pub(crate) notes: String,
    #[tabled(rename = "Expires", display_with = "format_date")]
    pub(crate) expiry_date: DateTime<Utc>,
    #[tabled(rename = "Active")]
    pub(crate) is_active: bool,
    #[tabled(rename = "Created", display_with = "format_date")]
    pub(crate) created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[tabled(rename = "Last Used", display_with = "format_optional_date")]
    pub(crate) last_used: Option<DateTime<Utc>>,
}

fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d %H:%M").to_string()
}

fn format_optional_date(date: &Option<DateTime<Utc>>) -> String {
    date.as_ref().map(format_date).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CodeStatus {
    Active,
    Disabled,
    Expired,
}

impl Display for CodeStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Active => "Active",
            Self::Disabled => "Disabled",
            Self::Expired => "Expired",
        })
    }
}

impl AccessCode {
    /// Whether this code would currently let a user in.
    pub(crate) fn accepts_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && now < self.expiry_date
    }

    pub(crate) fn status_at(&self, now: DateTime<Utc>) -> CodeStatus {
        if now >= self.expiry_date {
            CodeStatus::Expired
        } else if self.is_active {
            CodeStatus::Active
        } else {
            CodeStatus::Disabled
        }
    }
}
