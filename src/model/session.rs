// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AccessLevel;

/// Proof of a successful login for the current store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Session {
    access_level: AccessLevel,
    login_time: DateTime<Utc>,
    expiry_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
}

impl Session {
    pub(crate) fn new(
        access_level: AccessLevel,
        login_time: DateTime<Utc>,
        user_id: Option<String>,
    ) -> Self {
        Self {
            access_level,
            login_time,
            expiry_time: login_time + access_level.session_duration(),
            user_id,
        }
    }

    pub(crate) const fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    pub(crate) const fn login_time(&self) -> DateTime<Utc> {
        self.login_time
    }

    pub(crate) const fn expiry_time(&self) -> DateTime<Utc> {
        self.expiry_time
    }

    pub(crate) fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// A session is only valid strictly before its expiry.
    pub(crate) fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expiry_time
    }
}
