// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use log::error;
use tabled::{settings::Style, Table};

use crate::{
    catalog,
    error::{self, Result},
};

use super::{outcome, Context};

/// Open the lab dashboard and list its workshops.
#[derive(Debug, Parser)]
pub(crate) struct Workshops {
    /// Only show the workshop with this ID.
    #[arg(long, short)]
    workshop: Option<String>,
}

#[async_trait]
impl super::Command for Workshops {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.app.enter_lab();
        outcome(&ctx.app)?;

        let workshops = match self.workshop.as_deref() {
            Some(id) => vec![catalog::find(id).ok_or_else(|| {
                error!("There is no workshop with ID {}", id);
                error::Error::Command
            })?],
            None => catalog::WORKSHOPS.iter().collect(),
        };

        for workshop in workshops {
            println!("{}", workshop.name);
            println!("{}", Table::new(workshop.apps).with(Style::rounded()));
        }
        Ok(())
    }
}
