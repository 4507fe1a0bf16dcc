// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use cinder_triggers::{LastModified, LastModifiedError, LastModifiedResolver};
use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use url::Url;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone)]
pub struct LastModifiedResolverConfig {
    /// Upper bound for a single check, including the fallback request
    pub request_timeout: Duration,
}

impl LastModifiedResolverConfig {
    pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
}

impl Default for LastModifiedResolverConfig {
    fn default() -> Self {
        Self {
            request_timeout: Self::DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Resolves `http(s)` resources via the `Last-Modified` response header and
/// `file` resources via their filesystem modification time.
///
/// Uses a blocking HTTP client: it must be created, used and dropped outside
/// of an async runtime's worker threads.
pub struct LastModifiedResolverImpl {
    client: Client,
    config: Arc<LastModifiedResolverConfig>,
}

#[dill::component(pub)]
#[dill::interface(dyn LastModifiedResolver)]
impl LastModifiedResolverImpl {
    pub fn new(config: Arc<LastModifiedResolverConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn http_last_modified(&self, url: &Url) -> Result<LastModified, LastModifiedError> {
        let mut response = self.send(url, self.client.head(url.clone()))?;

        // Some servers only answer GET
        if response.status() == StatusCode::METHOD_NOT_ALLOWED {
            tracing::debug!(%url, "HEAD not allowed, retrying with GET");
            response = self.send(url, self.client.get(url.clone()))?;
        }

        if !response.status().is_success() {
            return Err(LastModifiedError::UnexpectedStatus {
                url: url.clone(),
                status: response.status().as_u16(),
            });
        }

        let Some(value) = response.headers().get(reqwest::header::LAST_MODIFIED) else {
            return Ok(LastModified::Unknown);
        };

        let invalid_header = || LastModifiedError::InvalidHeader {
            url: url.clone(),
            value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
        };

        let value = value.to_str().map_err(|_| invalid_header())?;
        let t = DateTime::parse_from_rfc2822(value).map_err(|_| invalid_header())?;

        Ok(LastModified::Known(t.with_timezone(&Utc)))
    }

    fn send(&self, url: &Url, request: RequestBuilder) -> Result<Response, LastModifiedError> {
        request
            .timeout(self.config.request_timeout)
            .send()
            .map_err(|e| {
                if e.is_timeout() {
                    LastModifiedError::Timeout { url: url.clone() }
                } else {
                    LastModifiedError::unreachable(url, e)
                }
            })
    }

    fn file_last_modified(url: &Url) -> Result<LastModified, LastModifiedError> {
        let path = url
            .to_file_path()
            .map_err(|()| LastModifiedError::unreachable(url, "URL is not a local file path"))?;

        let modified = std::fs::metadata(&path)
            .and_then(|metadata| metadata.modified())
            .map_err(|e| LastModifiedError::unreachable(url, e))?;

        Ok(LastModified::Known(DateTime::<Utc>::from(modified)))
    }
}

impl LastModifiedResolver for LastModifiedResolverImpl {
    #[tracing::instrument(level = "debug", name = "LastModifiedResolverImpl::last_modified", skip_all, fields(%url))]
    fn last_modified(&self, url: &Url) -> Result<LastModified, LastModifiedError> {
        match url.scheme() {
            "http" | "https" => self.http_last_modified(url),
            "file" => Self::file_last_modified(url),
            scheme => Err(LastModifiedError::UnsupportedScheme {
                scheme: scheme.to_string(),
            }),
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
