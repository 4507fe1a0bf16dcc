// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

use crate::ProjectsConfigError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum CLIError {
    #[error(transparent)]
    Config(#[from] ProjectsConfigError),

    #[error(transparent)]
    Failure(BoxedError),

    #[error("Command was aborted")]
    Aborted,
}

impl CLIError {
    pub fn failure(e: impl Into<BoxedError>) -> Self {
        Self::Failure(e.into())
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CLIError::Config(_) => 2,
            CLIError::Failure(_) => 1,
            CLIError::Aborted => 130,
        }
    }

    /// Error message with its chain of causes, styled for the terminal
    pub fn pretty(&self) -> String {
        use std::fmt::Write;

        let mut buf = format!("{}: {}", console::style("Error").red().bold(), self);

        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            let _ = write!(buf, "\n  {} {cause}", console::style("caused by:").dim());
            source = cause.source();
        }

        buf
    }
}

impl From<dill::InjectionError> for CLIError {
    fn from(e: dill::InjectionError) -> Self {
        Self::failure(e)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
