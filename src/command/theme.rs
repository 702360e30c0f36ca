// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;

use crate::{error::Result, model};

use super::Context;

/// Show or change the preferred color theme.
#[derive(Debug, Parser)]
pub(crate) struct Theme {
    #[arg(value_enum)]
    theme: Option<model::Theme>,
}

#[async_trait]
impl super::Command for Theme {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let access = ctx.app.access();
        if let Some(theme) = self.theme {
            access.set_theme(theme).await?;
        }
        let current = access.theme().await.unwrap_or(model::Theme::Light);
        println!("{}", current.as_str());
        Ok(())
    }
}
