// SPDX-FileCopyrightText: 2022-2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

#![forbid(unsafe_code)]
#![deny(elided_lifetimes_in_paths)]
#![warn(
    rust_2018_idioms,
    future_incompatible,
    unused,
    unused_lifetimes,
    unused_qualifications,
    unused_results,
    anonymous_parameters,
    deprecated_in_future,
    elided_lifetimes_in_paths,
    explicit_outlives_requirements,
    keyword_idents,
    macro_use_extern_crate,
    missing_doc_code_examples,
    private_doc_tests,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::cargo,
    clippy::unseparated_literal_suffix,
    clippy::decimal_literal_representation,
    clippy::single_char_lifetime_names,
    clippy::fallible_impl_from,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::wildcard_enum_match_arm,
    clippy::deref_by_slicing,
    clippy::default_numeric_fallback,
    clippy::shadow_reuse,
    clippy::clone_on_ref_ptr,
    clippy::todo,
    clippy::string_add,
    clippy::use_debug,
    clippy::future_not_send
)]
#![cfg_attr(not(test), warn(clippy::panic_in_result_fn))]

mod access;
mod analysis;
mod catalog;
mod clock;
mod command;
mod error;
mod lab;
mod metadata;
mod model;
mod rng;
mod storage;
mod terminal;

use std::{path::PathBuf, process, sync::Arc};

use async_trait::async_trait;
use clap::{Parser, Subcommand};
use error::Result;
use log::{debug, error, warn};
use storage::{IsPersistent as _, Store};
use url::Url;

use crate::{access::AccessControl, lab::LabApp, terminal::Terminal};

#[derive(Debug, Subcommand)]
enum Command {
    Login(command::login::Login),
    Guest(command::login::Guest),
    Logout(command::login::Logout),
    Status(command::login::Status),
    Workshops(command::workshops::Workshops),
    Codes(command::codes::Codes),
    GuestAccess(command::guest_access::GuestAccess),
    Theme(command::theme::Theme),
    Analyze(command::analyze::Analyze),
    Prompt(command::analyze::Prompt),
    Watch(command::watch::Watch),
}

#[async_trait]
impl command::Command for Command {
    async fn execute(self, ctx: &mut command::Context) -> Result<()> {
        match self {
            Self::Login(cmd) => cmd.execute(ctx).await,
            Self::Guest(cmd) => cmd.execute(ctx).await,
            Self::Logout(cmd) => cmd.execute(ctx).await,
            Self::Status(cmd) => cmd.execute(ctx).await,
            Self::Workshops(cmd) => cmd.execute(ctx).await,
            Self::Codes(cmd) => cmd.execute(ctx).await,
            Self::GuestAccess(cmd) => cmd.execute(ctx).await,
            Self::Theme(cmd) => cmd.execute(ctx).await,
            Self::Analyze(cmd) => cmd.execute(ctx).await,
            Self::Prompt(cmd) => cmd.execute(ctx).await,
            Self::Watch(cmd) => cmd.execute(ctx).await,
        }
    }
}

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// The directory that holds the session, the user codes and the lab
    /// settings. Defaults to the platform data directory.
    #[arg(long, env = "COACHLAB_STORE_DIR", value_hint = clap::ValueHint::DirPath)]
    store_dir: Option<PathBuf>,

    /// Keep everything in memory. Nothing outlives the command.
    #[arg(long)]
    no_persist: bool,

    /// The URL of the function that analyzes transcripts and generates
    /// prompts.
    #[arg(
        long,
        env = "COACHLAB_ENDPOINT",
        default_value = "http://localhost:8888/.netlify/functions/generate",
        value_parser = Url::parse
    )]
    endpoint: Url,

    #[clap(subcommand)]
    command: Command,
}

fn get_store(args: &Args) -> Box<dyn Store> {
    if !args.no_persist {
        let file_store = match &args.store_dir {
            Some(dir) => Ok(storage::File::new(dir)),
            None => storage::File::in_data_dir(),
        };
        match file_store {
            Ok(file_store) => {
                debug!("Keeping lab data in {}", file_store.dir().display());
                return Box::new(file_store);
            }
            Err(e) => {
                warn!("We need to fall back to memory storage: {}", e);
            }
        }
    }

    Box::new(storage::Memory::new())
}

async fn run(args: Args) -> Result<()> {
    let store = get_store(&args);
    if !store.is_persistent() {
        debug!("Sessions and codes will be discarded when this command exits");
    }

    let access = AccessControl::new(storage::shared(store), Arc::new(clock::System));
    let mut app = LabApp::new(access, Terminal::default());
    app.load().await;

    let mut ctx = command::Context {
        app,
        endpoint: args.endpoint,
    };
    command::Command::execute(args.command, &mut ctx).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let logger_env = env_logger::Env::new()
        .filter_or("COACHLAB_LOG", "warn")
        .write_style("COACHLAB_LOG_STYLE");
    env_logger::Builder::from_env(logger_env).init();

    if let Err(e) = run(Args::parse()).await {
        error!("We encountered an error: {}", e);
        process::exit(1);
    };
}
