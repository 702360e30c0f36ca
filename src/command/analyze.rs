// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::{
    fs,
    io::{self, Read as _},
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use clap::Parser;
use tabled::{settings::Style, Table};

use crate::{
    analysis::{self, PresentationContext},
    error::Result,
};

use super::{require_login, Context};

/// Score a presentation transcript with the coaching model.
#[derive(Debug, Parser)]
pub(crate) struct Analyze {
    /// The title of the presentation.
    #[arg(long)]
    title: String,

    /// What the presentation is meant to achieve.
    #[arg(long)]
    purpose: String,

    /// Who the presentation is for.
    #[arg(long)]
    audience: String,

    /// Anything else the coach should take into account.
    #[arg(long)]
    comments: Option<String>,

    /// A file holding the transcript. Use `-` to read standard input.
    #[arg(value_hint = clap::ValueHint::FilePath)]
    transcript: PathBuf,

    /// Print the report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

fn read_transcript(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut transcript = String::new();
        _ = io::stdin().read_to_string(&mut transcript)?;
        Ok(transcript)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("\n{title}:");
    for item in items {
        println!("  - {item}");
    }
}

#[async_trait]
impl super::Command for Analyze {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        require_login(&ctx.app)?;

        let transcript = read_transcript(&self.transcript)?;
        let context = PresentationContext {
            title: self.title,
            purpose: self.purpose,
            audience: self.audience,
            comments: self.comments,
        };
        let endpoint = analysis::Http::new(ctx.endpoint.clone());
        let report = analysis::analyze(&endpoint, &context, &transcript).await?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
            return Ok(());
        }

        println!("Overall score: {}/10", report.overall_score);
        println!("{}", Table::new(report.rows()).with(Style::rounded()));
        if !report.summary.is_empty() {
            println!("\n{}", report.summary);
        }
        print_list("Strengths", &report.strengths);
        print_list("Improvements", &report.improvements);
        print_list("Recommendations", &report.recommendations);
        Ok(())
    }
}

/// Expand a short idea into a complete AI assistant system prompt.
#[derive(Debug, Parser)]
pub(crate) struct Prompt {
    /// What the assistant should help with.
    #[arg(long)]
    purpose: String,

    /// The voice the assistant should use.
    #[arg(long, default_value = "Professional")]
    tone: String,

    /// Who the assistant will talk to.
    #[arg(long)]
    audience: Option<String>,
}

#[async_trait]
impl super::Command for Prompt {
    async fn execute(self, ctx: &mut Context) -> Result<()> {
        require_login(&ctx.app)?;

        let endpoint = analysis::Http::new(ctx.endpoint.clone());
        let prompt = analysis::generate_prompt(
            &endpoint,
            &self.purpose,
            &self.tone,
            self.audience.as_deref(),
        )
        .await?;
        println!("{prompt}");
        Ok(())
    }
}
