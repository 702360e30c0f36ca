// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! The lab's event-driven controller. Every handler runs to completion,
//! updates [`AppState`] and hands the result to the [`Render`] observer.

pub(crate) mod admin;

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::time;

use crate::{
    access::{self, AccessControl},
    error::Error,
    model::{AccessCode, AccessLevel, Session},
};

pub(crate) use admin::{AdminPanelState, SortBy};

pub(crate) const DEFAULT_AUTH_DELAY: Duration = Duration::from_millis(500);
pub(crate) const DEFAULT_EXPIRY_CHECK_PERIOD: Duration = Duration::from_secs(60);

pub(crate) const MSG_MISSING_EXPIRY: &str = "Please select an expiry date";
pub(crate) const MSG_PAST_EXPIRY: &str = "Expiry date must be in the future";
pub(crate) const MSG_ADMIN_REQUIRED: &str = "Admin access required";
pub(crate) const MSG_LOGIN_REQUIRED: &str = "Please log in first";
pub(crate) const MSG_SESSION_EXPIRED: &str = "Your session has expired";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    LoggedOut,
    LoggedIn(AccessLevel),
    Dashboard,
    AdminPanel,
}

/// The view model. Rebuilt by the handlers; what it mirrors is persisted, it
/// is not.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct AppState {
    pub(crate) is_authenticated: bool,
    pub(crate) current_session: Option<Session>,
    pub(crate) user_codes: Vec<AccessCode>,
    pub(crate) guest_access_enabled: bool,
    pub(crate) is_loading: bool,
    pub(crate) error: Option<String>,
    pub(crate) notice: Option<String>,
}

impl AppState {
    pub(crate) fn access_level(&self) -> Option<AccessLevel> {
        self.current_session
            .as_ref()
            .filter(|_| self.is_authenticated)
            .map(Session::access_level)
    }
}

/// Observer that is refreshed after every state change.
pub(crate) trait Render: Send {
    fn render(&mut self, screen: Screen, state: &AppState, admin: &AdminPanelState);
}

impl<T: Render + ?Sized> Render for Box<T> {
    fn render(&mut self, screen: Screen, state: &AppState, admin: &AdminPanelState) {
        (**self).render(screen, state, admin);
    }
}

pub(crate) struct LabApp {
    access: AccessControl,
    renderer: Box<dyn Render>,
    auth_delay: Duration,
    screen: Screen,
    state: AppState,
    admin: AdminPanelState,
}

impl LabApp {
    pub(crate) fn new<R: Render + 'static>(access: AccessControl, renderer: R) -> Self {
        Self {
            access,
            renderer: Box::new(renderer),
            auth_delay: DEFAULT_AUTH_DELAY,
            screen: Screen::LoggedOut,
            state: AppState::default(),
            admin: AdminPanelState::default(),
        }
    }

    #[cfg(test)]
    #[must_use]
    pub(crate) fn with_auth_delay(mut self, delay: Duration) -> Self {
        self.auth_delay = delay;
        self
    }

    #[cfg(test)]
    pub(crate) const fn screen(&self) -> Screen {
        self.screen
    }

    pub(crate) const fn state(&self) -> &AppState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) const fn admin(&self) -> &AdminPanelState {
        &self.admin
    }

    pub(crate) const fn access(&self) -> &AccessControl {
        &self.access
    }

    pub(crate) fn now(&self) -> DateTime<Utc> {
        self.access.now()
    }

    pub(crate) fn visible_codes(&self) -> Vec<&AccessCode> {
        self.admin.visible(&self.state.user_codes, self.now())
    }

    fn refresh(&mut self) {
        self.renderer.render(self.screen, &self.state, &self.admin);
    }

    fn fail(&mut self, e: &Error) {
        warn!("Could not save changes to the store: {}", e);
        self.state.error = Some(format!("Could not save changes: {e}"));
    }

    fn is_admin(&self) -> bool {
        self.state.access_level() == Some(AccessLevel::Admin)
    }

    /// Admin handlers bail out through this when the session is not an admin
    /// one.
    fn require_admin(&mut self) -> bool {
        if self.is_admin() {
            return true;
        }
        self.state.error = Some(MSG_ADMIN_REQUIRED.to_owned());
        self.refresh();
        false
    }

    async fn reload_codes(&mut self) {
        self.state.user_codes = self.access.user_codes().await;
    }

    pub(crate) async fn load(&mut self) {
        self.reload_codes().await;
        self.state.guest_access_enabled = self.access.is_guest_access_enabled().await;

        match self.access.load_session().await {
            Some(session) if self.access.is_session_valid(Some(&session)) => {
                debug!("Resuming {} session", session.access_level());
                self.screen = Screen::LoggedIn(session.access_level());
                self.state.current_session = Some(session);
                self.state.is_authenticated = true;
            }
            _ => {
                if let Err(e) = self.access.clear_session().await {
                    warn!("Could not clear a stale session: {}", e);
                }
                self.screen = Screen::LoggedOut;
                self.state.current_session = None;
                self.state.is_authenticated = false;
            }
        }
        self.refresh();
    }

    async fn begin_login(&mut self) {
        self.state.is_loading = true;
        self.state.error = None;
        self.state.notice = None;
        self.refresh();

        if !self.auth_delay.is_zero() {
            time::sleep(self.auth_delay).await;
        }
    }

    async fn establish(&mut self, access_level: AccessLevel, message: &str) {
        let session = self.access.create_session(access_level);
        if let Err(e) = self.access.save_session(&session).await {
            self.fail(&e);
            return;
        }

        info!("Logged in with {} access", access_level);
        self.screen = Screen::LoggedIn(access_level);
        self.state.current_session = Some(session);
        self.state.is_authenticated = true;
        self.state.notice = Some(message.to_owned());
    }

    pub(crate) async fn login(&mut self, code: &str) {
        self.begin_login().await;

        match self.access.authenticate(code).await {
            Ok(resp) if resp.success => {
                if let Some(duration) = resp.session_duration {
                    debug!("Granting a {} hour session", duration.num_hours());
                }
                self.establish(resp.access_level, &resp.message).await;
            }
            Ok(resp) => {
                debug!("Login refused: {}", resp.message);
                self.state.error = Some(resp.message);
            }
            Err(e) => self.fail(&e),
        }

        self.state.is_loading = false;
        self.refresh();
    }

    pub(crate) async fn guest_login(&mut self) {
        if !self.state.guest_access_enabled {
            return;
        }
        self.begin_login().await;
        self.establish(AccessLevel::Guest, access::MSG_GUEST_GRANTED)
            .await;
        self.state.is_loading = false;
        self.refresh();
    }

    pub(crate) async fn logout(&mut self) {
        if let Err(e) = self.access.clear_session().await {
            warn!("Could not clear the stored session: {}", e);
        }
        self.screen = Screen::LoggedOut;
        self.state.is_authenticated = false;
        self.state.current_session = None;
        self.state.error = None;
        self.state.notice = None;
        self.admin = AdminPanelState::default();
        self.refresh();
    }

    pub(crate) fn enter_lab(&mut self) {
        if self.state.is_authenticated {
            self.screen = Screen::Dashboard;
        } else {
            self.state.error = Some(MSG_LOGIN_REQUIRED.to_owned());
        }
        self.refresh();
    }

    pub(crate) fn show_welcome(&mut self) {
        if let Some(level) = self.state.access_level() {
            self.screen = Screen::LoggedIn(level);
        }
        self.refresh();
    }

    pub(crate) fn open_admin_panel(&mut self) {
        if self.require_admin() {
            self.screen = Screen::AdminPanel;
            self.refresh();
        }
    }

    pub(crate) fn toggle_add_code_form(&mut self) {
        self.admin.show_add_code_form = !self.admin.show_add_code_form;
        self.refresh();
    }

    pub(crate) fn set_draft_expiry(&mut self, value: &str) {
        value.clone_into(&mut self.admin.new_code_expiry);
    }

    pub(crate) fn set_sort(&mut self, sort_by: SortBy) {
        self.admin.sort_by = sort_by;
        self.refresh();
    }

    pub(crate) fn set_filter(&mut self, filter_active: Option<bool>) {
        self.admin.filter_active = filter_active;
        self.refresh();
    }

    pub(crate) fn toggle_selection(&mut self, code_id: &str) {
        self.admin.toggle_selection(code_id);
        self.refresh();
    }

    /// Submits the add-code form using the drafted expiry.
    pub(crate) async fn submit_add_code(&mut self, notes: &str) -> Option<AccessCode> {
        let expiry_date = admin::parse_expiry(&self.admin.new_code_expiry);
        self.add_code(expiry_date, notes).await
    }

    pub(crate) async fn add_code(
        &mut self,
        expiry_date: Option<DateTime<Utc>>,
        notes: &str,
    ) -> Option<AccessCode> {
        if !self.require_admin() {
            return None;
        }

        let checked = match expiry_date {
            None => Err(MSG_MISSING_EXPIRY),
            Some(expiry) if expiry <= self.now() => Err(MSG_PAST_EXPIRY),
            Some(expiry) => Ok(expiry),
        };
        let expiry_date = match checked {
            Ok(expiry) => expiry,
            Err(message) => {
                self.state.error = Some(message.to_owned());
                self.refresh();
                return None;
            }
        };

        let created = match self.access.add_user_code(expiry_date, notes).await {
            Ok(code) => {
                self.state.error = None;
                self.state.notice = Some(format!("New code created: {}", code.code));
                self.admin.show_add_code_form = false;
                self.admin.new_code_expiry.clear();
                Some(code)
            }
            Err(e) => {
                self.fail(&e);
                None
            }
        };
        self.reload_codes().await;
        self.refresh();
        created
    }

    pub(crate) async fn toggle_code(&mut self, code_id: &str) -> bool {
        if !self.require_admin() {
            return false;
        }
        let found = self
            .access
            .toggle_user_code(code_id)
            .await
            .unwrap_or_else(|e| {
                self.fail(&e);
                false
            });
        self.reload_codes().await;
        self.refresh();
        found
    }

    pub(crate) async fn remove_code(&mut self, code_id: &str) -> bool {
        if !self.require_admin() {
            return false;
        }
        let removed = self
            .access
            .remove_user_code(code_id)
            .await
            .unwrap_or_else(|e| {
                self.fail(&e);
                false
            });
        _ = self.admin.selected_codes.remove(code_id);
        self.reload_codes().await;
        self.refresh();
        removed
    }

    /// Removes every selected code and returns how many were removed.
    pub(crate) async fn remove_selected(&mut self) -> usize {
        if !self.require_admin() {
            return 0;
        }
        let mut removed = 0;
        for code_id in std::mem::take(&mut self.admin.selected_codes) {
            match self.access.remove_user_code(&code_id).await {
                Ok(true) => removed += 1,
                Ok(false) => debug!("Selected code {} was already gone", code_id),
                Err(e) => {
                    self.fail(&e);
                    break;
                }
            }
        }
        self.state.notice = Some(format!("Removed {removed} code(s)"));
        self.reload_codes().await;
        self.refresh();
        removed
    }

    pub(crate) async fn set_guest_access(&mut self, enabled: bool) {
        if !self.require_admin() {
            return;
        }
        match self.access.set_guest_access(enabled).await {
            Ok(()) => self.state.guest_access_enabled = enabled,
            Err(e) => self.fail(&e),
        }
        self.refresh();
    }

    /// Forces a logout when the session has run out, either in memory or in
    /// the store. Returns whether that happened.
    pub(crate) async fn check_session_expiry(&mut self) -> bool {
        if !self.state.is_authenticated {
            return false;
        }
        let expired = !self
            .access
            .is_session_valid(self.state.current_session.as_ref())
            || self.access.has_expired_session().await;
        if expired {
            info!("Session expired, logging out");
            self.logout().await;
            self.state.notice = Some(MSG_SESSION_EXPIRED.to_owned());
            self.refresh();
        }
        expired
    }
}

/// Re-checks the session once per `period` until the app is logged out.
pub(crate) async fn watch(app: &mut LabApp, period: Duration) {
    let mut interval = time::interval(period);
    loop {
        _ = interval.tick().await;
        if !app.state().is_authenticated || app.check_session_expiry().await {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex as StdMutex};

    use chrono::Duration as ChronoDuration;

    use super::*;
    use crate::{
        access::tests::{fixture, start},
        clock::{test::Manual, Clock},
        metadata,
        storage::{shared, test::Flaky, Key, Memory, Store as _},
    };

    #[derive(Clone, Default)]
    struct Recorder(Arc<StdMutex<Vec<(Screen, bool, bool)>>>);

    impl Recorder {
        fn screens(&self) -> Vec<Screen> {
            self.0.lock().unwrap().iter().map(|r| r.0).collect()
        }

        fn loading(&self) -> Vec<bool> {
            self.0.lock().unwrap().iter().map(|r| r.2).collect()
        }
    }

    impl Render for Recorder {
        fn render(&mut self, screen: Screen, state: &AppState, _admin: &AdminPanelState) {
            self.0
                .lock()
                .unwrap()
                .push((screen, state.is_authenticated, state.is_loading));
        }
    }

    async fn app() -> (LabApp, Recorder, Arc<Manual>, Memory) {
        let (access, clock, memory) = fixture();
        let recorder = Recorder::default();
        let mut app = LabApp::new(access, recorder.clone()).with_auth_delay(Duration::ZERO);
        app.load().await;
        (app, recorder, clock, memory)
    }

    async fn admin_app() -> (LabApp, Recorder, Arc<Manual>, Memory) {
        let (mut app, recorder, clock, memory) = app().await;
        app.login(metadata::ADMIN_CODE).await;
        assert_eq!(app.screen(), Screen::LoggedIn(AccessLevel::Admin));
        (app, recorder, clock, memory)
    }

    #[tokio::test]
    async fn starts_logged_out() {
        let (app, recorder, _, _) = app().await;
        assert_eq!(app.screen(), Screen::LoggedOut);
        assert!(!app.state().is_authenticated);
        assert_eq!(recorder.screens(), [Screen::LoggedOut]);
    }

    #[tokio::test]
    async fn load_resumes_valid_session_and_drops_stale_one() -> crate::error::Result<()> {
        let (access, clock, mut memory) = fixture();
        let session = access.create_session(AccessLevel::User);
        access.save_session(&session).await?;

        let mut app = LabApp::new(access.clone(), Recorder::default());
        app.load().await;
        assert_eq!(app.screen(), Screen::LoggedIn(AccessLevel::User));
        assert_eq!(app.state().current_session.as_ref(), Some(&session));

        clock.advance(ChronoDuration::hours(8));
        let mut app = LabApp::new(access, Recorder::default());
        app.load().await;
        assert_eq!(app.screen(), Screen::LoggedOut);
        assert_eq!(memory.get(Key::Session).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn load_ignores_malformed_session() -> crate::error::Result<()> {
        let (access, _, mut memory) = fixture();
        memory.set(Key::Session, "}{").await?;
        let mut app = LabApp::new(access, Recorder::default());
        app.load().await;
        assert_eq!(app.screen(), Screen::LoggedOut);
        assert_eq!(app.state().error, None);
        Ok(())
    }

    #[tokio::test]
    async fn admin_login_persists_session() -> crate::error::Result<()> {
        let (app, recorder, _, mut memory) = admin_app().await;
        assert!(app.state().is_authenticated);
        assert_eq!(app.state().notice.as_deref(), Some(access::MSG_ADMIN_GRANTED));
        assert!(memory.get(Key::Session).await?.is_some());
        assert_eq!(recorder.loading(), [false, true, false]);
        Ok(())
    }

    #[tokio::test]
    async fn failed_login_sets_error_and_clears_loading() {
        let (mut app, _, _, _) = app().await;
        app.login("wrong-code").await;
        assert_eq!(app.screen(), Screen::LoggedOut);
        assert_eq!(app.state().error.as_deref(), Some(access::MSG_INVALID_CODE));
        assert!(!app.state().is_loading);

        app.login("").await;
        assert_eq!(app.state().error.as_deref(), Some(access::MSG_EMPTY_CODE));
    }

    async fn flaky_app() -> (LabApp, Flaky) {
        let flaky = Flaky::default();
        let access = AccessControl::new(
            shared(Box::new(flaky.clone())),
            Arc::new(Manual::new(start())) as Arc<dyn Clock>,
        );
        let mut app = LabApp::new(access, Recorder::default()).with_auth_delay(Duration::ZERO);
        app.load().await;
        (app, flaky)
    }

    #[tokio::test]
    async fn login_fails_cleanly_when_session_cannot_be_saved() {
        let (mut app, flaky) = flaky_app().await;
        flaky.set_read_only(true);

        app.login(metadata::ADMIN_CODE).await;
        assert!(!app.state().is_authenticated);
        assert_eq!(app.state().current_session, None);
        assert_eq!(app.screen(), Screen::LoggedOut);
        assert!(!app.state().is_loading);
        assert!(app
            .state()
            .error
            .as_deref()
            .map_or(false, |e| e.starts_with("Could not save changes")));
        assert_eq!(app.state().notice, None);
    }

    #[tokio::test]
    async fn admin_changes_leave_codes_alone_when_store_is_read_only() {
        let (mut app, flaky) = flaky_app().await;
        app.login(metadata::ADMIN_CODE).await;
        let code = app
            .add_code(Some(start() + ChronoDuration::days(1)), "kept")
            .await
            .unwrap();
        let before = app.state().user_codes.clone();
        flaky.set_read_only(true);

        assert!(app
            .add_code(Some(start() + ChronoDuration::days(2)), "lost")
            .await
            .is_none());
        assert!(app.state().error.is_some());
        assert_eq!(app.state().user_codes, before);

        assert!(!app.toggle_code(&code.id).await);
        assert_eq!(app.state().user_codes, before);

        assert!(!app.remove_code(&code.id).await);
        app.toggle_selection(&code.id);
        assert_eq!(app.remove_selected().await, 0);
        assert_eq!(app.state().user_codes, before);

        app.set_guest_access(true).await;
        assert!(!app.state().guest_access_enabled);
        assert!(!app.access().is_guest_access_enabled().await);
    }

    #[tokio::test]
    async fn guest_login_requires_switch() {
        let (mut app, recorder, _, _) = app().await;
        app.guest_login().await;
        assert_eq!(app.screen(), Screen::LoggedOut);
        assert_eq!(recorder.screens().len(), 1);

        app.login(metadata::ADMIN_CODE).await;
        app.set_guest_access(true).await;
        assert!(app.state().guest_access_enabled);
        assert!(app.access().is_guest_access_enabled().await);
        app.logout().await;

        app.guest_login().await;
        assert_eq!(app.screen(), Screen::LoggedIn(AccessLevel::Guest));
        assert_eq!(
            app.state().notice.as_deref(),
            Some(access::MSG_GUEST_GRANTED)
        );
    }

    #[tokio::test]
    async fn add_code_then_login_with_it() {
        let (mut app, _, _, _) = admin_app().await;
        app.toggle_add_code_form();
        assert!(app.admin().show_add_code_form);

        let code = app
            .add_code(Some(start() + ChronoDuration::days(1)), "test")
            .await
            .unwrap();
        assert!(!app.admin().show_add_code_form);
        assert_eq!(
            app.state().notice.as_deref(),
            Some(format!("New code created: {}", code.code).as_str())
        );
        assert_eq!(app.state().user_codes, vec![code.clone()]);

        app.logout().await;
        app.login(&code.code).await;
        assert_eq!(app.screen(), Screen::LoggedIn(AccessLevel::User));
        assert!(app
            .state()
            .current_session
            .as_ref()
            .and_then(Session::user_id)
            .is_some());
    }

    #[tokio::test]
    async fn disabled_code_is_refused() {
        let (mut app, _, _, _) = admin_app().await;
        let code = app
            .add_code(Some(start() + ChronoDuration::days(1)), "test")
            .await
            .unwrap();
        assert!(app.toggle_code(&code.id).await);
        assert!(!app.state().user_codes[0].is_active);

        app.logout().await;
        app.login(&code.code).await;
        assert!(!app.state().is_authenticated);
        assert_eq!(app.state().error.as_deref(), Some(access::MSG_INVALID_CODE));
    }

    #[tokio::test]
    async fn add_code_validates_expiry_before_the_service() {
        let (mut app, _, _, _) = admin_app().await;

        assert!(app.add_code(None, "").await.is_none());
        assert_eq!(app.state().error.as_deref(), Some(MSG_MISSING_EXPIRY));

        assert!(app.add_code(Some(start()), "").await.is_none());
        assert_eq!(app.state().error.as_deref(), Some(MSG_PAST_EXPIRY));

        assert!(app
            .add_code(Some(start() - ChronoDuration::days(1)), "")
            .await
            .is_none());
        assert!(app.access().user_codes().await.is_empty());
    }

    #[tokio::test]
    async fn submit_uses_drafted_expiry() {
        let (mut app, _, _, _) = admin_app().await;
        app.set_draft_expiry("not a date");
        assert!(app.submit_add_code("").await.is_none());
        assert_eq!(app.state().error.as_deref(), Some(MSG_MISSING_EXPIRY));

        app.set_draft_expiry("2024-06-10");
        let code = app.submit_add_code("week").await.unwrap();
        assert_eq!(code.notes, "week");
        assert!(app.admin().new_code_expiry.is_empty());
    }

    #[tokio::test]
    async fn admin_handlers_need_admin() {
        let (mut app, _, _, _) = app().await;
        assert!(app
            .add_code(Some(start() + ChronoDuration::days(1)), "")
            .await
            .is_none());
        assert_eq!(app.state().error.as_deref(), Some(MSG_ADMIN_REQUIRED));

        app.open_admin_panel();
        assert_eq!(app.screen(), Screen::LoggedOut);
        app.set_guest_access(true).await;
        assert!(!app.access().is_guest_access_enabled().await);
    }

    #[tokio::test]
    async fn remove_and_remove_selected() {
        let (mut app, _, _, _) = admin_app().await;
        let expiry = Some(start() + ChronoDuration::days(2));
        let a = app.add_code(expiry, "a").await.unwrap();
        let b = app.add_code(expiry, "b").await.unwrap();
        let c = app.add_code(expiry, "c").await.unwrap();

        assert!(app.remove_code(&a.id).await);
        assert!(!app.remove_code(&a.id).await);
        assert_eq!(app.state().user_codes.len(), 2);

        app.toggle_selection(&b.id);
        app.toggle_selection(&c.id);
        assert_eq!(app.remove_selected().await, 2);
        assert!(app.state().user_codes.is_empty());
        assert!(app.admin().selected_codes.is_empty());
    }

    #[tokio::test]
    async fn screens_follow_navigation() {
        let (mut app, _, _, _) = app().await;
        app.enter_lab();
        assert_eq!(app.screen(), Screen::LoggedOut);
        assert_eq!(app.state().error.as_deref(), Some(MSG_LOGIN_REQUIRED));

        app.login(metadata::ADMIN_CODE).await;
        app.enter_lab();
        assert_eq!(app.screen(), Screen::Dashboard);
        app.open_admin_panel();
        assert_eq!(app.screen(), Screen::AdminPanel);
        app.show_welcome();
        assert_eq!(app.screen(), Screen::LoggedIn(AccessLevel::Admin));

        app.logout().await;
        assert_eq!(app.screen(), Screen::LoggedOut);
        assert_eq!(app.state().error, None);
        assert_eq!(app.state().notice, None);
    }

    #[tokio::test]
    async fn expiry_check_forces_logout_once() -> crate::error::Result<()> {
        let (mut app, _, clock, mut memory) = admin_app().await;
        assert!(!app.check_session_expiry().await);

        clock.advance(ChronoDuration::hours(24));
        assert!(app.check_session_expiry().await);
        assert_eq!(app.screen(), Screen::LoggedOut);
        assert_eq!(app.state().notice.as_deref(), Some(MSG_SESSION_EXPIRED));
        assert_eq!(memory.get(Key::Session).await?, None);

        assert!(!app.check_session_expiry().await);
        Ok(())
    }

    #[tokio::test]
    async fn watch_returns_after_expiry() {
        let (mut app, _, clock, _) = admin_app().await;
        clock.advance(ChronoDuration::hours(25));
        watch(&mut app, Duration::from_millis(1)).await;
        assert_eq!(app.screen(), Screen::LoggedOut);
    }
}
