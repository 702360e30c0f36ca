// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{cmp::Reverse, collections::BTreeSet};

use chrono::{DateTime, NaiveDate, TimeZone as _, Utc};
use clap::ValueEnum;

use crate::model::{AccessCode, CodeStatus};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum SortBy {
    #[default]
    CreatedAt,
    ExpiryDate,
    LastUsed,
}

/// UI-only state of the admin panel. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AdminPanelState {
    pub(crate) show_add_code_form: bool,
    pub(crate) new_code_expiry: String,
    pub(crate) selected_codes: BTreeSet<String>,
    pub(crate) sort_by: SortBy,
    pub(crate) filter_active: Option<bool>,
}

impl AdminPanelState {
    pub(crate) fn toggle_selection(&mut self, code_id: &str) {
        if !self.selected_codes.remove(code_id) {
            _ = self.selected_codes.insert(code_id.to_owned());
        }
    }

    /// Codes as the panel lists them: filtered, then newest first by the
    /// chosen key. Codes that were never used sort last under
    /// [`SortBy::LastUsed`].
    pub(crate) fn visible<'codes>(
        &self,
        codes: &'codes [AccessCode],
        now: DateTime<Utc>,
    ) -> Vec<&'codes AccessCode> {
        let mut visible = codes
            .iter()
            .filter(|code| match self.filter_active {
                Some(active) => (code.status_at(now) == CodeStatus::Active) == active,
                None => true,
            })
            .collect::<Vec<_>>();

        match self.sort_by {
            SortBy::CreatedAt => visible.sort_by_key(|code| Reverse(code.created_at)),
            SortBy::ExpiryDate => visible.sort_by_key(|code| Reverse(code.expiry_date)),
            SortBy::LastUsed => visible.sort_by_key(|code| Reverse(code.last_used)),
        }
        visible
    }
}

/// Reads an expiry typed into the add-code form: either a full RFC 3339
/// timestamp or a bare date, which means midnight UTC.
pub(crate) fn parse_expiry(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Some(timestamp.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}
