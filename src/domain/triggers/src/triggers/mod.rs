// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod cron_trigger;
mod filter_trigger;
mod interval_trigger;
mod multiple_trigger;
mod parameter_trigger;
mod roll_up_trigger;
mod schedule_trigger;
mod trigger;
mod url_trigger;

pub use cron_trigger::*;
pub use filter_trigger::*;
pub use interval_trigger::*;
pub use multiple_trigger::*;
pub use parameter_trigger::*;
pub use roll_up_trigger::*;
pub use schedule_trigger::*;
pub use trigger::*;
pub use url_trigger::*;
