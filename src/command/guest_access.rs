// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::{Parser, ValueEnum};

use crate::error::Result;

use super::{outcome, Context};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
}

/// Allow or forbid entering the lab without a code (admin only).
#[derive(Debug, Parser)]
pub(crate) struct GuestAccess {
    #[arg(value_enum)]
    switch: Switch,
}

#[async_trait]
impl super::Command for GuestAccess {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.app.open_admin_panel();
        outcome(&ctx.app)?;

        ctx.app
            .set_guest_access(matches!(self.switch, Switch::On))
            .await;
        outcome(&ctx.app)?;
        println!(
            "Guest access {}",
            if ctx.app.state().guest_access_enabled {
                "enabled"
            } else {
                "disabled"
            }
        );
        Ok(())
    }
}
