// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::{IntegrationRequest, Trigger};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Integrator side of the trigger contract for a set of projects.
///
/// Each project owns a private trigger tree. A project with a fired request
/// keeps reporting it until [`ProjectTriggerPoller::integration_completed`] is
/// called for it.
#[derive(Default)]
pub struct ProjectTriggerPoller {
    projects: Vec<ProjectTrigger>,
}

struct ProjectTrigger {
    project_name: String,
    trigger: Box<dyn Trigger>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPollOutcome {
    pub project_name: String,
    pub request: Option<IntegrationRequest>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectNextBuild {
    pub project_name: String,
    pub trigger_name: String,
    pub next_build: DateTime<Utc>,
}

impl ProjectTriggerPoller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_project(
        &mut self,
        project_name: impl Into<String>,
        trigger: Box<dyn Trigger>,
    ) -> Result<(), DuplicateProjectError> {
        let project_name = project_name.into();

        if self.find(&project_name).is_some() {
            return Err(DuplicateProjectError { project_name });
        }

        self.projects.push(ProjectTrigger {
            project_name,
            trigger,
        });
        Ok(())
    }

    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.projects.iter().map(|p| p.project_name.as_str())
    }

    /// Polls every project's trigger once, in the order projects were added
    #[tracing::instrument(level = "debug", skip_all, fields(num_projects = self.projects.len()))]
    pub fn poll_once(&mut self) -> Vec<ProjectPollOutcome> {
        self.projects
            .iter_mut()
            .map(|project| {
                let request = project.trigger.fire();

                if let Some(request) = &request {
                    tracing::info!(
                        project_name = %project.project_name,
                        source = %request.source(),
                        build_condition = %request.build_condition(),
                        build_values = ?request.build_values(),
                        "Build requested"
                    );
                }

                ProjectPollOutcome {
                    project_name: project.project_name.clone(),
                    request,
                }
            })
            .collect()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(%project_name))]
    pub fn integration_completed(&mut self, project_name: &str) -> Result<(), ProjectNotFoundError> {
        let Some(index) = self.find(project_name) else {
            return Err(ProjectNotFoundError {
                project_name: project_name.to_string(),
            });
        };

        let project = &mut self.projects[index];
        project.trigger.integration_completed();

        tracing::debug!(
            next_build = %project.trigger.next_build(),
            "Integration completed"
        );

        Ok(())
    }

    pub fn next_builds(&self) -> Vec<ProjectNextBuild> {
        self.projects
            .iter()
            .map(|project| ProjectNextBuild {
                project_name: project.project_name.clone(),
                trigger_name: project.trigger.name().to_string(),
                next_build: project.trigger.next_build(),
            })
            .collect()
    }

    fn find(&self, project_name: &str) -> Option<usize> {
        self.projects
            .iter()
            .position(|p| p.project_name == project_name)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Project '{project_name}' is already registered")]
pub struct DuplicateProjectError {
    pub project_name: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Project '{project_name}' not found")]
pub struct ProjectNotFoundError {
    pub project_name: String,
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
