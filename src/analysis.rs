// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

//! Client side of the hosted generation function: it takes a presentation
//! context and transcript (or a prompt idea), forwards them, and turns the
//! model's loosely formatted reply into a report.

use async_trait::async_trait;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use tabled::Tabled;
use tokio::task;
use url::Url;

use crate::error::{self, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PresentationContext {
    pub(crate) title: String,
    pub(crate) purpose: String,
    pub(crate) audience: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) comments: Option<String>,
}

impl PresentationContext {
    fn validate(&self) -> Result<(), error::Analysis> {
        let missing = [
            (&self.title, "Title is required"),
            (&self.purpose, "Purpose is required"),
            (&self.audience, "Audience is required"),
        ]
        .into_iter()
        .filter(|(value, _)| value.trim().is_empty())
        .map(|(_, message)| message)
        .collect::<Vec<_>>();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(error::Analysis::Invalid(missing.join(", ")))
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub(crate) enum Request<'req> {
    Analyze {
        context: &'req PresentationContext,
        transcript: &'req str,
    },
    Generate {
        purpose: &'req str,
        tone: &'req str,
        #[serde(skip_serializing_if = "Option::is_none")]
        audience: Option<&'req str>,
    },
}

#[derive(Debug, Deserialize)]
struct Reply {
    text: String,
}

/// Anything that can answer a [`Request`] with the model's raw text.
#[async_trait]
pub(crate) trait Endpoint: Send + Sync {
    async fn send(&self, request: &Request<'_>) -> Result<String>;
}

pub(crate) struct Http {
    url: Url,
    agent: ureq::Agent,
}

impl Http {
    pub(crate) fn new(url: Url) -> Self {
        Self {
            url,
            agent: ureq::Agent::new(),
        }
    }
}

#[async_trait]
impl Endpoint for Http {
    async fn send(&self, request: &Request<'_>) -> Result<String> {
        let body = serde_json::to_value(request)?;
        let agent = self.agent.clone();
        let url = self.url.clone();
        debug!("Posting {} request to {}", body["type"], url);

        let reply = task::spawn_blocking(move || -> Result<Reply> {
            let resp = agent
                .post(url.as_str())
                .set("Content-Type", "application/json")
                .send_json(body)
                .map_err(error::Analysis::from)?;
            Ok(resp.into_json()?)
        })
        .await??;
        Ok(reply.text)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct Criterion {
    pub(crate) score: f64,
    #[serde(default)]
    pub(crate) feedback: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Report {
    pub(crate) overall_score: f64,
    pub(crate) clarity: Criterion,
    pub(crate) engagement: Criterion,
    pub(crate) content: Criterion,
    pub(crate) delivery: Criterion,
    pub(crate) audience: Criterion,
    #[serde(default)]
    pub(crate) summary: String,
    #[serde(default)]
    pub(crate) strengths: Vec<String>,
    #[serde(default)]
    pub(crate) improvements: Vec<String>,
    #[serde(default)]
    pub(crate) recommendations: Vec<String>,
}

#[derive(Tabled)]
pub(crate) struct CriterionRow {
    #[tabled(rename = "Criterion")]
    name: &'static str,
    #[tabled(rename = "Score")]
    score: f64,
    #[tabled(rename = "Feedback")]
    feedback: String,
}

impl Report {
    pub(crate) fn rows(&self) -> Vec<CriterionRow> {
        [
            ("Clarity & Structure", &self.clarity),
            ("Engagement", &self.engagement),
            ("Content Quality", &self.content),
            ("Delivery Style", &self.delivery),
            ("Audience Connection", &self.audience),
        ]
        .into_iter()
        .map(|(name, criterion)| CriterionRow {
            name,
            score: criterion.score,
            feedback: criterion.feedback.clone(),
        })
        .collect()
    }
}

/// Strips markdown fences and backticks, then keeps only the span from the
/// first `{` to the last `}` when there is one.
pub(crate) fn clean_json(text: &str) -> String {
    let mut unfenced = String::with_capacity(text.len());
    let mut skip_until = 0;
    for (i, ch) in text.char_indices() {
        if i < skip_until {
            continue;
        }
        let rest = &text[i..];
        if rest.starts_with("```")
            && rest
                .get(3..7)
                .map_or(false, |tag| tag.eq_ignore_ascii_case("json"))
        {
            skip_until = i + 7;
            continue;
        }
        unfenced.push(ch);
    }

    let unfenced = unfenced.replace('`', "");
    let cleaned = unfenced.trim();
    match (cleaned.find('{'), cleaned.rfind('}')) {
        (Some(start), Some(end)) if end > start => cleaned[start..=end].to_owned(),
        _ => cleaned.to_owned(),
    }
}

pub(crate) fn parse_report(text: &str) -> Result<Report> {
    let cleaned = clean_json(text);
    serde_json::from_str(&cleaned).map_err(|e| {
        error!("Analysis reply was not a usable report: {}", e);
        debug!("Raw reply: {}", text);
        debug!("Cleaned reply: {}", cleaned);
        error::Analysis::Parse(e).into()
    })
}

pub(crate) async fn analyze(
    endpoint: &dyn Endpoint,
    context: &PresentationContext,
    transcript: &str,
) -> Result<Report> {
    context.validate()?;
    let transcript = transcript.trim();
    if transcript.is_empty() {
        return Err(error::Analysis::Invalid("Transcript is required".to_owned()).into());
    }

    let text = endpoint
        .send(&Request::Analyze {
            context,
            transcript,
        })
        .await?;
    parse_report(&text)
}

pub(crate) async fn generate_prompt(
    endpoint: &dyn Endpoint,
    purpose: &str,
    tone: &str,
    audience: Option<&str>,
) -> Result<String> {
    if purpose.trim().is_empty() {
        return Err(error::Analysis::Invalid(
            "Please provide a purpose for your AI assistant.".to_owned(),
        )
        .into());
    }

    let text = endpoint
        .send(&Request::Generate {
            purpose,
            tone,
            audience: audience.filter(|a| !a.trim().is_empty()),
        })
        .await?;
    Ok(text.trim().to_owned())
}
