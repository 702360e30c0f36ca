// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

use async_trait::async_trait;
use clap::Parser;
use log::info;

use crate::{error::Result, lab};

use super::{require_login, Context};

/// Stay attached to the current session and log out once it expires.
#[derive(Debug, Parser)]
pub(crate) struct Watch {
    /// Seconds between expiry checks.
    #[arg(long, default_value_t = lab::DEFAULT_EXPIRY_CHECK_PERIOD.as_secs())]
    every: u64,
}

#[async_trait]
impl super::Command for Watch {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        require_login(&ctx.app)?;

        info!("Checking the session every {} seconds", self.every);
        lab::watch(&mut ctx.app, Duration::from_secs(self.every.max(1))).await;
        Ok(())
    }
}
