// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use log::{debug, error};
use url::Url;

use crate::{
    error::{self, Result},
    lab::LabApp,
};

pub(crate) mod analyze;
pub(crate) mod codes;
pub(crate) mod guest_access;
pub(crate) mod login;
pub(crate) mod theme;
pub(crate) mod watch;
pub(crate) mod workshops;

pub(crate) struct Context {
    pub(crate) app: LabApp,
    pub(crate) endpoint: Url,
}

#[async_trait]
pub(crate) trait Command {
    async fn execute(self, ctx: &mut Context) -> Result<()>;
}

/// Turns an error left in the view state into a failed command. The
/// renderer has already shown the message.
pub(crate) fn outcome(app: &LabApp) -> Result<()> {
    match app.state().error.as_ref() {
        Some(message) => {
            debug!("Command left an error in the view state: {}", message);
            Err(error::Error::Command)
        }
        None => Ok(()),
    }
}

pub(crate) fn require_login(app: &LabApp) -> Result<()> {
    if app.state().is_authenticated {
        Ok(())
    } else {
        error!("{}", crate::lab::MSG_LOGIN_REQUIRED);
        Err(error::Error::Command)
    }
}
