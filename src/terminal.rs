// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use crate::lab::{AdminPanelState, AppState, Render, Screen};

/// Writes state changes to the terminal. Notices go to stdout and errors to
/// stderr, each only once per change.
#[derive(Debug, Default)]
pub(crate) struct Terminal {
    screen: Option<Screen>,
    loading: bool,
    notice: Option<String>,
    error: Option<String>,
}

impl Terminal {
    fn changed(last: &mut Option<String>, current: Option<&String>) -> Option<String> {
        if last.as_ref() == current {
            return None;
        }
        *last = current.cloned();
        current.cloned()
    }
}

impl Render for Terminal {
    fn render(&mut self, screen: Screen, state: &AppState, _admin: &AdminPanelState) {
        if state.is_loading && !self.loading {
            eprintln!("Checking access...");
        }
        self.loading = state.is_loading;

        let previous = self.screen.replace(screen);
        if let (Some(previous), Screen::LoggedIn(level)) = (previous, screen) {
            if previous != screen {
                println!("Access Level: {level}");
            }
        }

        if let Some(notice) = Self::changed(&mut self.notice, state.notice.as_ref()) {
            println!("{notice}");
        }
        if let Some(error) = Self::changed(&mut self.error, state.error.as_ref()) {
            eprintln!("Error: {error}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AccessLevel;

    #[test]
    fn remembers_what_it_printed() {
        let mut terminal = Terminal::default();
        let admin = AdminPanelState::default();
        let mut state = AppState {
            error: Some("Invalid access code".to_owned()),
            ..AppState::default()
        };

        terminal.render(Screen::LoggedOut, &state, &admin);
        assert_eq!(terminal.error.as_deref(), Some("Invalid access code"));
        assert_eq!(terminal.screen, Some(Screen::LoggedOut));

        state.error = None;
        state.notice = Some("Welcome!".to_owned());
        terminal.render(Screen::LoggedIn(AccessLevel::User), &state, &admin);
        assert_eq!(terminal.error, None);
        assert_eq!(terminal.notice.as_deref(), Some("Welcome!"));
        assert_eq!(terminal.screen, Some(Screen::LoggedIn(AccessLevel::User)));
        assert!(!terminal.loading);
    }

    #[test]
    fn unchanged_messages_are_not_repeated() {
        let mut last = Some("Removed 1 code(s)".to_owned());
        let same = "Removed 1 code(s)".to_owned();
        assert_eq!(Terminal::changed(&mut last, Some(&same)), None);
        assert_eq!(Terminal::changed(&mut last, None), None);
        assert_eq!(last, None);
        assert_eq!(
            Terminal::changed(&mut last, Some(&same)),
            Some(same.clone())
        );
    }
}
