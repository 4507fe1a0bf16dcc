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

use cinder_triggers::{IntegrationRequest, ProjectTriggerPoller, TriggerFactory};
use time_source::{FakeSystemTimeSource, SystemTimeSource};

use super::{CLIError, Command, OutputWriter};
use crate::ProjectsConfig;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Dry-run integrator loop: polls every project, reports build requests and
/// immediately signals completion since nothing is actually built
pub struct PollCommand {
    projects_config: Arc<ProjectsConfig>,
    trigger_factory: Arc<TriggerFactory>,
    time_source: Arc<dyn SystemTimeSource>,
    clock: PollClock,
    max_rounds: Option<u64>,
    out: OutputWriter,
}

/// How time moves between poll rounds
pub enum PollClock {
    /// Wait for the poll interval to pass, or for Ctrl-C
    Real(tokio::runtime::Runtime),
    /// Jump the fake clock forward by the poll interval
    Simulated(FakeSystemTimeSource),
}

impl PollClock {
    /// Only waiting happens on the runtime: resolvers use a blocking client
    pub fn real() -> Result<Self, CLIError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CLIError::failure)?;

        Ok(Self::Real(runtime))
    }
}

impl PollCommand {
    pub fn new(
        projects_config: Arc<ProjectsConfig>,
        trigger_factory: Arc<TriggerFactory>,
        time_source: Arc<dyn SystemTimeSource>,
        clock: PollClock,
        max_rounds: Option<u64>,
        out: OutputWriter,
    ) -> Self {
        Self {
            projects_config,
            trigger_factory,
            time_source,
            clock,
            max_rounds,
            out,
        }
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%round))]
    fn poll_round(
        &mut self,
        poller: &mut ProjectTriggerPoller,
        round: u64,
    ) -> Result<usize, CLIError> {
        let now = self.time_source.now();
        let mut num_requests = 0;

        for outcome in poller.poll_once() {
            let Some(request) = outcome.request else {
                continue;
            };

            num_requests += 1;
            writeln!(
                self.out,
                "{} {}",
                now.to_rfc3339(),
                Self::describe(&outcome.project_name, &request)
            )
            .map_err(CLIError::failure)?;

            poller
                .integration_completed(&outcome.project_name)
                .map_err(CLIError::failure)?;
        }

        Ok(num_requests)
    }

    fn describe(project_name: &str, request: &IntegrationRequest) -> String {
        let mut line = format!(
            "{}: {} requested by {}",
            project_name,
            request.build_condition(),
            request.source(),
        );

        if !request.build_values().is_empty() {
            let values: Vec<_> = request
                .build_values()
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect();
            line.push_str(&format!(" [{}]", values.join(", ")));
        }

        line
    }

    /// Returns `false` when the loop was interrupted
    fn wait_for_next_round(&self) -> Result<bool, CLIError> {
        let interval = self.projects_config.poll_interval();

        match &self.clock {
            PollClock::Simulated(fake) => {
                fake.advance(interval);
                Ok(true)
            }
            PollClock::Real(runtime) => {
                let interval = interval.to_std().map_err(CLIError::failure)?;

                Ok(runtime.block_on(async {
                    tokio::select! {
                        () = tokio::time::sleep(interval) => true,
                        _ = tokio::signal::ctrl_c() => false,
                    }
                }))
            }
        }
    }
}

impl Command for PollCommand {
    #[tracing::instrument(level = "info", name = "PollCommand::run", skip_all, fields(max_rounds = ?self.max_rounds))]
    fn run(&mut self) -> Result<(), CLIError> {
        let mut poller = self.projects_config.build_poller(&self.trigger_factory)?;

        let mut round = 0;
        let mut total_requests = 0;

        loop {
            round += 1;
            total_requests += self.poll_round(&mut poller, round)?;

            if self.max_rounds.is_some_and(|max| round >= max) {
                break;
            }

            if !self.wait_for_next_round()? {
                tracing::info!(round, total_requests, "Polling interrupted");
                return Err(CLIError::Aborted);
            }
        }

        tracing::info!(rounds = round, total_requests, "Polling finished");
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
