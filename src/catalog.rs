// SPDX-FileCopyrightText: 2024 Noah Fontes
//
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{Display, Formatter};

use tabled::Tabled;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Status {
    Available(&'static str),
    ComingSoon,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available(target) => write!(f, "Available ({target})"),
            Self::ComingSoon => f.write_str("Coming soon"),
        }
    }
}

#[derive(Debug, Clone, Copy, Tabled)]
pub(crate) struct MiniApp {
    #[tabled(rename = "ID")]
    pub(crate) id: &'static str,
    #[tabled(rename = "Name")]
    pub(crate) name: &'static str,
    #[tabled(rename = "Description")]
    pub(crate) description: &'static str,
    #[tabled(rename = "Status")]
    pub(crate) status: Status,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Workshop {
    pub(crate) id: &'static str,
    pub(crate) name: &'static str,
    pub(crate) apps: &'static [MiniApp],
}

const fn soon(id: &'static str, name: &'static str, description: &'static str) -> MiniApp {
    MiniApp {
        id,
        name,
        description,
        status: Status::ComingSoon,
    }
}

pub(crate) static WORKSHOPS: &[Workshop] = &[
    Workshop {
        id: "presentations",
        name: "Presentations Workshop",
        apps: &[
            MiniApp {
                id: "prompt-generator",
                name: "AI Prompt Generator",
                description: "Create professional AI assistant prompts",
                status: Status::Available("coachlab prompt"),
            },
            MiniApp {
                id: "presentation-analyser",
                name: "Presentation Analyser",
                description: "Analyze vocal delivery, body language, and content structure",
                status: Status::Available("coachlab analyze"),
            },
            soon(
                "pitch-polisher",
                "Pitch Polisher",
                "Refines a rough pitch draft into a concise, clear elevator pitch.",
            ),
            soon(
                "audience-analyzer",
                "Audience Analyzer",
                "Captures live audience sentiment via word clouds and polls during a pitch.",
            ),
            soon(
                "verbal-analyser",
                "Verbal Analyser",
                "Reports on vocal delivery, including filler words, pace, and clarity.",
            ),
            soon(
                "presence-coach",
                "Presence Coach",
                "Gives feedback on posture, gestures, and eye contact from a live camera feed.",
            ),
            soon(
                "scorre-coach",
                "SCORRE Presentation Outline Coach",
                "Helps develop a complete presentation outline using the SCORRE framework.",
            ),
        ],
    },
    Workshop {
        id: "sustainable-development",
        name: "Sustainable Development Workshop",
        apps: &[
            soon(
                "impact-calculator",
                "Impact Calculator",
                "Visualizes a personal carbon footprint from everyday habits.",
            ),
            soon(
                "eco-designer",
                "Eco-Designer",
                "Scores the sustainability of a building designed from green materials.",
            ),
            soon(
                "sdg-expert-coach",
                "SDG Expert Coach",
                "Turns a chosen Sustainable Development Goal into actionable project ideas.",
            ),
        ],
    },
    Workshop {
        id: "artificial-intelligence",
        name: "Artificial Intelligence Workshop",
        apps: &[
            soon(
                "super-prompt-generator",
                "Super Prompt Generator",
                "Builds a copy-and-paste-ready prompt with the R.A.C.E. framework.",
            ),
            soon(
                "ai-team-roster",
                "AI Team Roster",
                "Assembles predefined AI personas into a team roster.",
            ),
            soon(
                "content-amplifier",
                "Content Amplifier",
                "Rewrites one piece of content for several social platforms.",
            ),
        ],
    },
    Workshop {
        id: "leadership-development",
        name: "Leadership Development Workshop",
        apps: &[
            soon(
                "decision-architect",
                "Decision Architect",
                "Generates candidate solutions and a SWOT analysis for a leadership problem.",
            ),
            soon(
                "role-play-assistant",
                "Role-Play Assistant",
                "Plays a difficult team member so leaders can rehearse hard conversations.",
            ),
            soon(
                "kotters-8-step-coach",
                "Kotter's 8-Step Change Coach",
                "Walks through Kotter's model to produce a change management plan.",
            ),
        ],
    },
    Workshop {
        id: "mindset-matters",
        name: "Mindset Matters Workshop",
        apps: &[
            soon(
                "mindset-mapper",
                "Mindset Mapper",
                "Challenges fixed mindset beliefs with growth-oriented perspectives.",
            ),
            soon(
                "goal-smasher",
                "Goal Smasher",
                "Breaks a big goal into small daily or weekly habits.",
            ),
        ],
    },
];

pub(crate) fn find(id: &str) -> Option<&'static Workshop> {
    WORKSHOPS.iter().find(|w| w.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn app_ids_are_unique() {
        let mut seen = HashSet::new();
        for app in WORKSHOPS.iter().flat_map(|w| w.apps) {
            assert!(seen.insert(app.id), "duplicate app id {}", app.id);
        }
    }

    #[test]
    fn presentations_has_the_available_apps() {
        let available = find("presentations")
            .map(|w| {
                w.apps
                    .iter()
                    .filter(|a| matches!(a.status, Status::Available(_)))
                    .count()
            })
            .unwrap_or_default();
        assert_eq!(available, 2);
        assert!(find("cooking").is_none());
    }
}
