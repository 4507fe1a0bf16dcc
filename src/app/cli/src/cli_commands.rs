// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use dill::Catalog;
use time_source::{FakeSystemTimeSource, SystemTimeSource};

use crate::commands::*;
use crate::{ProjectsConfig, cli};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub fn get_command(
    catalog: &Catalog,
    args: cli::Cli,
    out: OutputWriter,
) -> Result<Box<dyn Command>, CLIError> {
    let projects_config = catalog.get_one::<ProjectsConfig>()?;
    let trigger_factory = catalog.get_one::<cinder_triggers::TriggerFactory>()?;

    let command: Box<dyn Command> = match args.command {
        cli::Command::Validate(_) => Box::new(ValidateCommand::new(
            projects_config,
            trigger_factory,
            out,
        )),

        cli::Command::NextBuilds(_) => Box::new(NextBuildsCommand::new(
            projects_config,
            trigger_factory,
            catalog.get_one::<dyn SystemTimeSource>()?,
            out,
        )),

        cli::Command::Poll(c) => {
            let clock = if args.system_time.is_some() {
                PollClock::Simulated(catalog.get_one::<FakeSystemTimeSource>()?.as_ref().clone())
            } else {
                PollClock::real()?
            };

            Box::new(PollCommand::new(
                projects_config,
                trigger_factory,
                catalog.get_one::<dyn SystemTimeSource>()?,
                clock,
                c.rounds,
                out,
            ))
        }
    };

    Ok(command)
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
