// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod next_builds_command;
mod poll_command;
mod validate_command;

pub use next_builds_command::*;
pub use poll_command::*;
pub use validate_command::*;

pub use crate::CLIError;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

pub trait Command {
    fn run(&mut self) -> Result<(), CLIError>;
}

/// Sink for command output, stdout unless a test captures it
pub type OutputWriter = Box<dyn std::io::Write>;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
