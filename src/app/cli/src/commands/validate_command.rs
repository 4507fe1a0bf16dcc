// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::io::Write;
use std::sync::Arc;

use cinder_triggers::TriggerFactory;

use super::{CLIError, Command, OutputWriter};
use crate::ProjectsConfig;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct ValidateCommand {
    projects_config: Arc<ProjectsConfig>,
    trigger_factory: Arc<TriggerFactory>,
    out: OutputWriter,
}

impl ValidateCommand {
    pub fn new(
        projects_config: Arc<ProjectsConfig>,
        trigger_factory: Arc<TriggerFactory>,
        out: OutputWriter,
    ) -> Self {
        Self {
            projects_config,
            trigger_factory,
            out,
        }
    }
}

impl Command for ValidateCommand {
    #[tracing::instrument(level = "info", name = "ValidateCommand::run", skip_all)]
    fn run(&mut self) -> Result<(), CLIError> {
        let poller = self.projects_config.build_poller(&self.trigger_factory)?;

        for next_build in poller.next_builds() {
            writeln!(
                self.out,
                "ok {} ({})",
                next_build.project_name,
                next_build.trigger_name,
            )
            .map_err(CLIError::failure)?;
        }

        writeln!(
            self.out,
            "{} project(s) validated",
            self.projects_config.projects.len()
        )
        .map_err(CLIError::failure)?;

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
