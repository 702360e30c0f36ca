// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeSet;

use async_trait::async_trait;
use clap::{Parser, Subcommand, ValueEnum};
use log::error;
use tabled::{settings::Style, Table, Tabled};

use crate::{
    error::{self, Result},
    lab::{LabApp, SortBy},
    model::{AccessCode, CodeStatus},
};

use super::{outcome, Context};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Filter {
    All,
    Active,
    Inactive,
}

impl From<Filter> for Option<bool> {
    fn from(value: Filter) -> Self {
        match value {
            Filter::All => None,
            Filter::Active => Some(true),
            Filter::Inactive => Some(false),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Action {
    /// List access codes.
    List {
        /// The field to order codes by, newest first.
        #[arg(long, value_enum, default_value_t = SortBy::CreatedAt)]
        sort: SortBy,

        /// Restrict the list to codes that currently work (or do not).
        #[arg(long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },
    /// Create a new random access code.
    Add {
        /// When the code stops working, as YYYY-MM-DD or an RFC 3339
        /// timestamp.
        #[arg(long, short)]
        expires: String,

        /// Free-text notes kept with the code.
        #[arg(long, short, default_value = "")]
        notes: String,
    },
    /// Enable a disabled code or disable an enabled one.
    Toggle {
        /// The identifier of the code.
        id: String,
    },
    /// Delete one or more codes.
    Remove {
        /// The identifiers of the codes.
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Manage access codes (admin only).
#[derive(Debug, Parser)]
pub(crate) struct Codes {
    #[command(subcommand)]
    action: Action,
}

#[derive(Tabled)]
struct Row<'code> {
    #[tabled(inline)]
    code: &'code AccessCode,
    #[tabled(rename = "Status")]
    status: CodeStatus,
}

fn print_codes(app: &LabApp) {
    let now = app.now();
    let rows = app
        .visible_codes()
        .into_iter()
        .map(|code| Row {
            code,
            status: code.status_at(now),
        })
        .collect::<Vec<_>>();

    if rows.is_empty() {
        println!("No user codes created yet.");
    } else {
        println!("{}", Table::new(rows).with(Style::rounded()));
    }
}

#[async_trait]
impl super::Command for Codes {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        let app = &mut ctx.app;
        app.open_admin_panel();
        outcome(app)?;

        match self.action {
            Action::List { sort, filter } => {
                app.set_sort(sort);
                app.set_filter(filter.into());
                print_codes(app);
            }
            Action::Add { expires, notes } => {
                app.toggle_add_code_form();
                app.set_draft_expiry(&expires);
                _ = app.submit_add_code(&notes).await;
            }
            Action::Toggle { id } => {
                if !app.toggle_code(&id).await {
                    outcome(app)?;
                    error!("There is no access code with ID {}", id);
                    return Err(error::Error::Command);
                }
            }
            Action::Remove { ids } => {
                let ids = ids.iter().collect::<BTreeSet<_>>();
                let removed = match ids.first() {
                    Some(id) if ids.len() == 1 => usize::from(app.remove_code(id).await),
                    _ => {
                        for id in &ids {
                            app.toggle_selection(id);
                        }
                        app.remove_selected().await
                    }
                };
                outcome(app)?;
                if removed < ids.len() {
                    error!("{} of the access codes did not exist", ids.len() - removed);
                    return Err(error::Error::Command);
                }
            }
        }
        outcome(app)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Duration as ChronoDuration;
    use url::Url;

    use super::*;
    use crate::{
        access::tests::{fixture, start},
        command::Command as _,
        metadata,
        terminal::Terminal,
    };

    async fn admin_context() -> Context {
        let (access, _, _) = fixture();
        let mut app = LabApp::new(access, Terminal::default()).with_auth_delay(Duration::ZERO);
        app.load().await;
        app.login(metadata::ADMIN_CODE).await;
        Context {
            app,
            endpoint: Url::parse("http://localhost:8888/").unwrap(),
        }
    }

    async fn add(ctx: &mut Context) -> AccessCode {
        ctx.app
            .add_code(Some(start() + ChronoDuration::days(1)), "")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn unknown_ids_fail_the_command() {
        let mut ctx = admin_context().await;
        let code = add(&mut ctx).await;

        let toggle = Codes {
            action: Action::Toggle {
                id: "code_missing".to_owned(),
            },
        };
        assert!(toggle.execute(&mut ctx).await.is_err());

        let remove = Codes {
            action: Action::Remove {
                ids: vec!["code_missing".to_owned()],
            },
        };
        assert!(remove.execute(&mut ctx).await.is_err());

        let remove = Codes {
            action: Action::Remove {
                ids: vec![code.id.clone(), "code_missing".to_owned()],
            },
        };
        assert!(remove.execute(&mut ctx).await.is_err());
        assert!(ctx.app.state().user_codes.is_empty());
    }

    #[tokio::test]
    async fn known_ids_succeed() {
        let mut ctx = admin_context().await;
        let first = add(&mut ctx).await;
        let second = add(&mut ctx).await;
        let third = add(&mut ctx).await;

        let toggle = Codes {
            action: Action::Toggle {
                id: first.id.clone(),
            },
        };
        assert!(toggle.execute(&mut ctx).await.is_ok());
        assert!(!ctx.app.state().user_codes[0].is_active);

        let remove = Codes {
            action: Action::Remove {
                ids: vec![first.id.clone()],
            },
        };
        assert!(remove.execute(&mut ctx).await.is_ok());

        let remove = Codes {
            action: Action::Remove {
                ids: vec![second.id, third.id.clone(), third.id],
            },
        };
        assert!(remove.execute(&mut ctx).await.is_ok());
        assert!(ctx.app.state().user_codes.is_empty());
    }
}
