// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Access codes, sessions and the guest switch, all kept in the injected
//! [`Store`](crate::storage::Store). Nothing is cached here: every operation
//! reads what it needs and writes whole values back.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use rand::RngCore;
use subtle::ConstantTimeEq as _;

use crate::{
    clock::Clock,
    error::Result,
    metadata,
    model::{AccessCode, AccessLevel, AuthResponse, Session, Theme, ValidationResult},
    rng,
    storage::{self, Key},
};

const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const CODE_LENGTH: usize = 8;
const USER_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const USER_ID_LENGTH: usize = 9;

pub(crate) const MSG_EMPTY_CODE: &str = "Please enter an access code";
pub(crate) const MSG_SHORT_CODE: &str = "Access code must be at least 3 characters";
pub(crate) const MSG_ADMIN_GRANTED: &str = "Admin access granted";
pub(crate) const MSG_USER_GRANTED: &str = "User access granted";
pub(crate) const MSG_GUEST_GRANTED: &str = "Guest access granted";
pub(crate) const MSG_INVALID_CODE: &str = "Invalid access code";

/// Syntactic check only; no lookup happens here.
pub(crate) fn validate_code(code: &str) -> ValidationResult {
    if code.trim().is_empty() {
        ValidationResult::invalid(MSG_EMPTY_CODE)
    } else if code.chars().count() < 3 {
        ValidationResult::invalid(MSG_SHORT_CODE)
    } else {
        ValidationResult::valid()
    }
}

/// An eight character code drawn from upper-case letters and digits.
pub(crate) fn generate_code() -> String {
    rng::map(|rng| generate_code_with(rng))
}

pub(crate) fn generate_code_with(rng: &mut dyn RngCore) -> String {
    rng::string_from(rng, CODE_ALPHABET, CODE_LENGTH)
}

fn generate_user_id() -> String {
    let suffix = rng::map(|rng| rng::string_from(rng, USER_ID_ALPHABET, USER_ID_LENGTH));
    format!("user_{suffix}")
}

/// Draws codes until one is not already handed out.
fn unique_code<F>(existing: &[AccessCode], mut generate: F) -> String
where
    F: FnMut() -> String,
{
    loop {
        let candidate = generate();
        if existing.iter().all(|c| c.code != candidate) {
            return candidate;
        }
        debug!("Generated access code collided with an existing one, drawing again");
    }
}

fn unique_id(existing: &[AccessCode], now: DateTime<Utc>) -> String {
    let mut millis = now.timestamp_millis();
    loop {
        let id = format!("code_{millis}");
        if existing.iter().all(|c| c.id != id) {
            return id;
        }
        millis += 1;
    }
}

#[derive(Clone)]
pub(crate) struct AccessControl {
    store: storage::Shared,
    clock: Arc<dyn Clock>,
}

impl AccessControl {
    pub(crate) fn new(store: storage::Shared, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    async fn read(&self, key: Key) -> Option<String> {
        match self.store.lock().await.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Could not read {} from the store, treating it as absent: {}", key, e);
                None
            }
        }
    }

    async fn write(&self, key: Key, value: &str) -> Result<()> {
        self.store.lock().await.set(key, value).await
    }

    pub(crate) async fn authenticate(&self, code: &str) -> Result<AuthResponse> {
        let validation = validate_code(code);
        if !validation.is_valid {
            // A blank submission is the only way to fall back to guest
            // access; a wrong code never does.
            if code.trim().is_empty() && self.is_guest_access_enabled().await {
                return Ok(AuthResponse::granted(AccessLevel::Guest, MSG_GUEST_GRANTED));
            }
            return Ok(AuthResponse::denied(&validation.message));
        }

        if bool::from(code.as_bytes().ct_eq(metadata::ADMIN_CODE.as_bytes())) {
            info!("Admin code accepted");
            return Ok(AuthResponse::granted(AccessLevel::Admin, MSG_ADMIN_GRANTED));
        }

        let now = self.now();
        let mut codes = self.user_codes().await;
        if let Some(found) = codes.iter_mut().find(|c| c.code == code && c.accepts_at(now)) {
            found.last_used = Some(now);
            info!("Access code {} accepted", found.id);
            self.save_user_codes(&codes).await?;
            return Ok(AuthResponse::granted(AccessLevel::User, MSG_USER_GRANTED));
        }

        Ok(AuthResponse::denied(MSG_INVALID_CODE))
    }

    pub(crate) fn create_session(&self, access_level: AccessLevel) -> Session {
        let user_id = (access_level == AccessLevel::User).then(generate_user_id);
        Session::new(access_level, self.now(), user_id)
    }

    pub(crate) fn is_session_valid(&self, session: Option<&Session>) -> bool {
        session.map_or(false, |s| s.is_valid_at(self.now()))
    }

    pub(crate) async fn save_session(&self, session: &Session) -> Result<()> {
        self.write(Key::Session, &serde_json::to_string(session)?)
            .await
    }

    pub(crate) async fn load_session(&self) -> Option<Session> {
        let stored = self.read(Key::Session).await?;
        serde_json::from_str(&stored)
            .map_err(|e| debug!("Ignoring unreadable session: {}", e))
            .ok()
    }

    pub(crate) async fn clear_session(&self) -> Result<()> {
        self.store.lock().await.remove(Key::Session).await
    }

    /// Whether the store holds a session that has run out.
    pub(crate) async fn has_expired_session(&self) -> bool {
        self.load_session()
            .await
            .map_or(false, |s| !s.is_valid_at(self.now()))
    }

    pub(crate) async fn user_codes(&self) -> Vec<AccessCode> {
        let Some(stored) = self.read(Key::UserCodes).await else {
            return vec![];
        };
        serde_json::from_str(&stored).unwrap_or_else(|e| {
            warn!("Ignoring unreadable access code list: {}", e);
            vec![]
        })
    }

    pub(crate) async fn save_user_codes(&self, codes: &[AccessCode]) -> Result<()> {
        self.write(Key::UserCodes, &serde_json::to_string(codes)?)
            .await
    }

    pub(crate) async fn is_guest_access_enabled(&self) -> bool {
        self.read(Key::GuestAccess).await.as_deref() == Some("true")
    }

    pub(crate) async fn set_guest_access(&self, enabled: bool) -> Result<()> {
        self.write(Key::GuestAccess, if enabled { "true" } else { "false" })
            .await
    }

    pub(crate) async fn theme(&self) -> Option<Theme> {
        self.read(Key::Theme)
            .await
            .and_then(|value| Theme::parse(&value))
    }

    pub(crate) async fn set_theme(&self, theme: Theme) -> Result<()> {
        self.write(Key::Theme, theme.as_str()).await
    }

    pub(crate) async fn add_user_code(
        &self,
        expiry_date: DateTime<Utc>,
        notes: &str,
    ) -> Result<AccessCode> {
        let now = self.now();
        let mut codes = self.user_codes().await;
        let new_code = AccessCode {
            id: unique_id(&codes, now),
            code: unique_code(&codes, generate_code),
            notes: notes.to_owned(),
            expiry_date,
            is_active: true,
            created_at: now,
            last_used: None,
        };

        codes.push(new_code.clone());
        self.save_user_codes(&codes).await?;
        info!("Created access code {} expiring {}", new_code.id, expiry_date);
        Ok(new_code)
    }

    pub(crate) async fn remove_user_code(&self, code_id: &str) -> Result<bool> {
        let mut codes = self.user_codes().await;
        let Some(index) = codes.iter().position(|c| c.id == code_id) else {
            return Ok(false);
        };

        _ = codes.remove(index);
        self.save_user_codes(&codes).await?;
        Ok(true)
    }

    pub(crate) async fn toggle_user_code(&self, code_id: &str) -> Result<bool> {
        let mut codes = self.user_codes().await;
        let Some(code) = codes.iter_mut().find(|c| c.id == code_id) else {
            return Ok(false);
        };

        code.is_active = !code.is_active;
        self.save_user_codes(&codes).await?;
        Ok(true)
    }

    /// Time left on a session, clamped at zero.
    pub(crate) fn remaining(&self, session: &Session) -> Duration {
        (session.expiry_time() - self.now()).max(Duration::zero())
    }
}
