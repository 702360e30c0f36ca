// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use async_trait::async_trait;
use clap::Parser;
use secrecy::{ExposeSecret as _, SecretString};
use tokio::task;

use crate::error::Result;

use super::{outcome, Context};

/// Enter the lab with an access code.
#[derive(Debug, Parser)]
pub(crate) struct Login {
    /// The access code. When omitted, it is read from the terminal without
    /// echoing.
    #[arg(env = "COACHLAB_ACCESS_CODE", hide_env_values = true)]
    code: Option<String>,
}

async fn prompt_code() -> Result<SecretString> {
    Ok(task::spawn_blocking(|| {
        rpassword::prompt_password("Access code: ").map(SecretString::new)
    })
    .await??)
}

#[async_trait]
impl super::Command for Login {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let code = match self.code {
            Some(code) => SecretString::new(code),
            None => prompt_code().await?,
        };
        ctx.app.login(code.expose_secret()).await;
        outcome(&ctx.app)
    }
}

/// Enter the lab as a guest, if an admin has allowed it.
#[derive(Debug, Parser)]
pub(crate) struct Guest;

#[async_trait]
impl super::Command for Guest {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.app.guest_login().await;
        if !ctx.app.state().is_authenticated {
            eprintln!("Error: Guest access is currently disabled");
            return Err(crate::error::Error::Command);
        }
        outcome(&ctx.app)
    }
}

/// Leave the lab and forget the stored session.
#[derive(Debug, Parser)]
pub(crate) struct Logout;

#[async_trait]
impl super::Command for Logout {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.app.logout().await;
        println!("Logged out");
        Ok(())
    }
}

/// Show the current session.
#[derive(Debug, Parser)]
pub(crate) struct Status;

#[async_trait]
impl super::Command for Status {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        ctx.app.show_welcome();
        let state = ctx.app.state();
        match state.current_session.as_ref().filter(|_| state.is_authenticated) {
            Some(session) => {
                let remaining = ctx.app.access().remaining(session);
                println!("Access level: {}", session.access_level());
                println!("Logged in:    {}", session.login_time().format("%Y-%m-%d %H:%M:%S UTC"));
                println!(
                    "Expires:      {} ({}h {}m left)",
                    session.expiry_time().format("%Y-%m-%d %H:%M:%S UTC"),
                    remaining.num_hours(),
                    remaining.num_minutes() % 60
                );
                if let Some(user_id) = session.user_id() {
                    println!("User:         {user_id}");
                }
            }
            None => println!("Not logged in"),
        }
        println!(
            "Guest access: {}",
            if state.guest_access_enabled { "enabled" } else { "disabled" }
        );
        Ok(())
    }
}
