// Copyright (c) 2024-2026 Martin Schröder <info@swedishembedded.com>
//
// SPDX-License-Identifier: MIT
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use planwise_core::ProfileKind;
use std::path::PathBuf;

/// Which agent answers an `ask` query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ProfileArg {
    /// Preparation guidance for a scheduled event
    #[default]
    Event,
    /// Lessons learned from a post-event note
    Reflection,
}

impl From<ProfileArg> for ProfileKind {
    fn from(p: ProfileArg) -> Self {
        match p {
            ProfileArg::Event => ProfileKind::EventUnderstanding,
            ProfileArg::Reflection => ProfileKind::Reflection,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "planwise",
    about = "Event preparation and reflection advice from a web-searching LLM agent",
    version,
    long_about = None,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config file (merged on top of auto-discovered files)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Model to use, e.g. "gemini-2.5-flash"
    #[arg(long, short = 'M', env = "PLANWISE_MODEL", global = true)]
    pub model: Option<String>,

    /// Increase verbosity (-v = debug, -vv = trace)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address, overrides `server.bind`
        #[arg(long, short = 'b', value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Send one query to an agent and print its answer.
    ///
    /// Exits non-zero unless the agent produced a final answer.
    Ask {
        /// Agent that answers the query
        #[arg(long, short = 'p', value_enum, default_value = "event")]
        profile: ProfileArg,
        /// Query text; read from stdin when omitted
        #[arg(value_name = "TEXT")]
        text: Option<String>,
    },
    /// Print the effective configuration and exit
    ShowConfig,
    /// Generate shell completion script
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "planwise", &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn ask_defaults_to_event_profile() {
        let cli = Cli::try_parse_from(["planwise", "ask", "Law exam"]).unwrap();
        match cli.command {
            Commands::Ask { profile, text } => {
                assert_eq!(profile, ProfileArg::Event);
                assert_eq!(text.as_deref(), Some("Law exam"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["planwise", "serve", "-vv", "--bind", "0.0.0.0:9000"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Serve { bind: Some(ref b) } if b == "0.0.0.0:9000"));
    }

    #[test]
    fn reflection_profile_maps_to_kind() {
        assert_eq!(ProfileKind::from(ProfileArg::Reflection), ProfileKind::Reflection);
    }
}
