// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Inspects and dry-runs the build triggers of a set of projects
#[derive(Debug, clap::Parser)]
#[command(name = crate::BINARY_NAME)]
#[command(version = crate::VERSION)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Sets the level of verbosity (repeat for more)
    #[arg(short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to the projects file
    #[arg(short = 'c', long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    /// Overrides the system time with a fixed starting point (RFC3339).
    ///
    /// Time then only moves forward by the poll interval between poll rounds.
    #[arg(long, value_name = "T", value_parser = parse_system_time, global = true)]
    pub system_time: Option<DateTime<Utc>>,

    #[command(subcommand)]
    pub command: Command,
}

pub const DEFAULT_CONFIG_PATH: &str = "cinder.yaml";

#[derive(Debug, clap::Subcommand)]
pub enum Command {
    /// Checks that every project trigger in the projects file is well-formed
    Validate(Validate),

    /// Shows when each project is next expected to build
    NextBuilds(NextBuilds),

    /// Polls project triggers and reports the build requests they raise.
    ///
    /// Integrations are not executed: a fired project is immediately reported
    /// as completed.
    Poll(Poll),
}

#[derive(Debug, clap::Args)]
pub struct Validate {}

#[derive(Debug, clap::Args)]
pub struct NextBuilds {}

#[derive(Debug, clap::Args)]
pub struct Poll {
    /// Stop after this many poll rounds instead of running until interrupted
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub rounds: Option<u64>,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn parse_system_time(s: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| format!("Expected an RFC3339 timestamp: {e}"))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
