// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use chrono_humanize::HumanTime;
use cinder_triggers::{ProjectNextBuild, TriggerFactory};
use prettytable::{Cell, Row, Table, row};
use time_source::SystemTimeSource;

use super::{CLIError, Command, OutputWriter};
use crate::ProjectsConfig;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub struct NextBuildsCommand {
    projects_config: Arc<ProjectsConfig>,
    trigger_factory: Arc<TriggerFactory>,
    time_source: Arc<dyn SystemTimeSource>,
    out: OutputWriter,
}

impl NextBuildsCommand {
    pub fn new(
        projects_config: Arc<ProjectsConfig>,
        trigger_factory: Arc<TriggerFactory>,
        time_source: Arc<dyn SystemTimeSource>,
        out: OutputWriter,
    ) -> Self {
        Self {
            projects_config,
            trigger_factory,
            time_source,
            out,
        }
    }

    fn humanize_next_build(next_build: DateTime<Utc>, now: DateTime<Utc>) -> String {
        if next_build == DateTime::<Utc>::MAX_UTC {
            return "never".to_owned();
        }
        format!("{}", HumanTime::from(next_build - now))
    }

    fn render_table(&self, next_builds: &[ProjectNextBuild]) -> Table {
        let now = self.time_source.now();

        let mut table = Table::new();
        table.set_format(Self::get_table_format());
        table.set_titles(row![bc->"Project", bc->"Trigger", bc->"Next Build", bc->"In"]);

        for nb in next_builds {
            let next_build = if nb.next_build == DateTime::<Utc>::MAX_UTC {
                "-".to_owned()
            } else {
                nb.next_build.to_rfc3339()
            };

            table.add_row(Row::new(vec![
                Cell::new(&nb.project_name),
                Cell::new(&nb.trigger_name),
                Cell::new(&next_build),
                Cell::new(&Self::humanize_next_build(nb.next_build, now)).style_spec("r"),
            ]));
        }

        // Header doesn't render when there are no data rows in the table
        if next_builds.is_empty() {
            table.add_row(Row::new(vec![Cell::new(""); 4]));
        }

        table
    }

    fn get_table_format() -> prettytable::format::TableFormat {
        use prettytable::format::*;

        FormatBuilder::new()
            .column_separator('│')
            .borders('│')
            .separators(&[LinePosition::Top], LineSeparator::new('─', '┬', '┌', '┐'))
            .separators(
                &[LinePosition::Title],
                LineSeparator::new('─', '┼', '├', '┤'),
            )
            .separators(
                &[LinePosition::Bottom],
                LineSeparator::new('─', '┴', '└', '┘'),
            )
            .padding(1, 1)
            .build()
    }
}

impl Command for NextBuildsCommand {
    #[tracing::instrument(level = "info", name = "NextBuildsCommand::run", skip_all)]
    fn run(&mut self) -> Result<(), CLIError> {
        let poller = self.projects_config.build_poller(&self.trigger_factory)?;

        let mut next_builds = poller.next_builds();
        next_builds.sort_by(|a, b| {
            a.next_build
                .cmp(&b.next_build)
                .then_with(|| a.project_name.cmp(&b.project_name))
        });

        self.render_table(&next_builds)
            .print(&mut self.out)
            .map_err(CLIError::failure)?;

        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
