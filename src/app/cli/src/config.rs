// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Duration;
use cinder_triggers::{
    DuplicateProjectError,
    ProjectTriggerPoller,
    Timeout,
    TriggerConfig,
    TriggerConfigError,
    TriggerFactory,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Contents of the projects file: which projects exist and how each of them
/// decides that a build is due
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ProjectsConfig {
    /// Pause between two poll rounds
    #[serde(default = "ProjectsConfig::default_poll_interval")]
    pub poll_interval: Timeout,

    /// Upper bound for a single URL check
    #[serde(default = "ProjectsConfig::default_request_timeout")]
    pub request_timeout: Timeout,

    pub projects: Vec<ProjectConfig>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct ProjectConfig {
    pub name: String,
    pub trigger: TriggerConfig,
}

impl ProjectsConfig {
    pub const DEFAULT_POLL_INTERVAL: Timeout = Timeout::from_seconds(5);
    pub const DEFAULT_REQUEST_TIMEOUT: Timeout = Timeout::from_seconds(30);

    fn max_poll_interval() -> Timeout {
        Timeout::from_seconds(TriggerFactory::MAX_INTERVAL_SECONDS.unsigned_abs())
    }

    fn default_poll_interval() -> Timeout {
        Self::DEFAULT_POLL_INTERVAL
    }

    fn default_request_timeout() -> Timeout {
        Self::DEFAULT_REQUEST_TIMEOUT
    }

    #[tracing::instrument(level = "debug", fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ProjectsConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ProjectsConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, ProjectsConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval.as_duration()
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.request_timeout.millis())
    }

    fn validate(&self) -> Result<(), ProjectsConfigError> {
        if self.poll_interval.millis() == 0 {
            return Err(ProjectsConfigError::ZeroPollInterval);
        }
        if self.poll_interval > Self::max_poll_interval() {
            return Err(ProjectsConfigError::PollIntervalTooLong {
                poll_interval: self.poll_interval,
                max: Self::max_poll_interval(),
            });
        }

        let mut seen = HashSet::new();
        for project in &self.projects {
            if project.name.trim().is_empty() {
                return Err(ProjectsConfigError::EmptyProjectName);
            }
            if !seen.insert(project.name.as_str()) {
                return Err(DuplicateProjectError {
                    project_name: project.name.clone(),
                }
                .into());
            }
        }

        Ok(())
    }

    /// Builds a live trigger tree for every project, failing on the first
    /// invalid one
    pub fn build_poller(
        &self,
        trigger_factory: &TriggerFactory,
    ) -> Result<ProjectTriggerPoller, ProjectsConfigError> {
        let mut poller = ProjectTriggerPoller::new();

        for project in &self.projects {
            let trigger = trigger_factory.build(&project.trigger).map_err(|source| {
                ProjectsConfigError::InvalidTrigger {
                    project_name: project.name.clone(),
                    source,
                }
            })?;

            poller.add_project(project.name.clone(), trigger)?;
        }

        Ok(poller)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Error, Debug)]
pub enum ProjectsConfigError {
    #[error("Unable to read projects file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed projects file")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Poll interval must be positive")]
    ZeroPollInterval,

    #[error("Poll interval {poll_interval} exceeds the maximum of {max}")]
    PollIntervalTooLong { poll_interval: Timeout, max: Timeout },

    #[error("Project name must not be empty")]
    EmptyProjectName,

    #[error(transparent)]
    DuplicateProject(#[from] DuplicateProjectError),

    #[error("Invalid trigger of project '{project_name}'")]
    InvalidTrigger {
        project_name: String,
        #[source]
        source: TriggerConfigError,
    },
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
