// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use cinder_triggers::TriggerFactory;
use cinder_triggers_http::{LastModifiedResolverConfig, LastModifiedResolverImpl};
use dill::*;
use time_source::{FakeSystemTimeSource, SystemTimeSource, SystemTimeSourceDefault};

use crate::commands::OutputWriter;
use crate::error::*;
use crate::{ProjectsConfig, cli, cli_commands};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub const BINARY_NAME: &str = "cinder";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const QUIET_LOGGING_CONFIG: &str = "warn";
const DEFAULT_LOGGING_CONFIG: &str = "info";
const VERBOSE_LOGGING_CONFIG: &str = "debug";

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn run(args: cli::Cli) -> Result<(), CLIError> {
    configure_logging(args.verbose);

    tracing::info!(
        version = VERSION,
        args = ?std::env::args().collect::<Vec<_>>(),
        config = %args.config.display(),
        system_time = ?args.system_time,
        "Initializing {BINARY_NAME}"
    );

    let result = run_command(args, Box::new(std::io::stdout()));

    match &result {
        Ok(()) => {
            tracing::info!("Command successful");
        }
        Err(err) => {
            tracing::error!(
                error_dbg = ?err,
                error = %err,
                "Command failed",
            );
        }
    }

    result
}

/// Loads the projects file, wires the catalog and runs the selected command
pub fn run_command(args: cli::Cli, out: OutputWriter) -> Result<(), CLIError> {
    let projects_config = ProjectsConfig::load(&args.config)?;

    let catalog = configure_catalog(projects_config, args.system_time).build();

    let mut command = cli_commands::get_command(&catalog, args, out)?;
    command.run()
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Catalog
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn configure_catalog(
    projects_config: ProjectsConfig,
    system_time: Option<DateTime<Utc>>,
) -> CatalogBuilder {
    let mut b = CatalogBuilder::new();

    if let Some(system_time) = system_time {
        b.add_value(FakeSystemTimeSource::new_set(system_time));
        b.bind::<dyn SystemTimeSource, FakeSystemTimeSource>();
    } else {
        b.add::<SystemTimeSourceDefault>();
    }

    b.add_value(LastModifiedResolverConfig {
        request_timeout: projects_config.request_timeout(),
    });
    b.add::<LastModifiedResolverImpl>();

    b.add::<TriggerFactory>();

    b.add_value(projects_config);

    b
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
// Logging
////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

fn configure_logging(verbosity_level: u8) {
    use tracing_subscriber::EnvFilter;

    // Logging may be already initialized when running under tests
    if tracing::dispatcher::has_been_set() {
        return;
    }

    // Use configuration from RUST_LOG env var if provided
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match verbosity_level {
            0 => EnvFilter::new(QUIET_LOGGING_CONFIG),
            1 => EnvFilter::new(DEFAULT_LOGGING_CONFIG),
            _ => EnvFilter::new(VERBOSE_LOGGING_CONFIG),
        },
    };

    // Log to STDERR, STDOUT carries command output
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
