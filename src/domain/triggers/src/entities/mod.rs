// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

mod build_condition;
mod cron_expression;
mod integration_request;
mod name_value_pair;
mod time_of_day;
mod timeout;
mod week_days;

pub use build_condition::*;
pub use cron_expression::*;
pub use integration_request::*;
pub use name_value_pair::*;
pub use time_of_day::*;
pub use timeout::*;
pub use week_days::*;
