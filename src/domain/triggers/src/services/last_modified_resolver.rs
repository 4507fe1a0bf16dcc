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
use url::Url;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Modification time reported for a watched resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastModified {
    /// The resource exists but does not report when it was modified
    Unknown,
    Known(DateTime<Utc>),
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Looks up when a resource was last modified.
///
/// Implementations performing network I/O must bound the time spent on a
/// single lookup and report running out of it as [`LastModifiedError::Timeout`].
#[cfg_attr(any(feature = "testing", test), mockall::automock)]
pub trait LastModifiedResolver: Send + Sync {
    fn last_modified(&self, url: &Url) -> Result<LastModified, LastModifiedError>;
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum LastModifiedError {
    #[error("Timed out checking {url}")]
    Timeout { url: Url },

    #[error("Unexpected status {status} checking {url}")]
    UnexpectedStatus { url: Url, status: u16 },

    #[error("Unsupported URL scheme '{scheme}'")]
    UnsupportedScheme { scheme: String },

    #[error("Unable to reach {url}")]
    Unreachable {
        url: Url,
        #[source]
        source: BoxedError,
    },

    #[error("Invalid Last-Modified value '{value}' from {url}")]
    InvalidHeader { url: Url, value: String },
}

impl LastModifiedError {
    pub fn unreachable(url: &Url, source: impl Into<BoxedError>) -> Self {
        Self::Unreachable {
            url: url.clone(),
            source: source.into(),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
