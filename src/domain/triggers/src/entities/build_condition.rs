// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::{Deserialize, Serialize};

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Build intent carried by a fired trigger.
///
/// Variants are ordered by precedence, so combining decisions of several
/// triggers is a matter of taking the maximum.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BuildCondition {
    NoBuild,
    #[default]
    IfModificationExists,
    ForceBuild,
}

impl std::fmt::Display for BuildCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BuildCondition::NoBuild => "NoBuild",
            BuildCondition::IfModificationExists => "IfModificationExists",
            BuildCondition::ForceBuild => "ForceBuild",
        };
        write!(f, "{s}")
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////


////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
