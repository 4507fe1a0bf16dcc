// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use cinder_triggers::{LastModified, LastModifiedError, LastModifiedResolver};
use cinder_triggers_http::{LastModifiedResolverConfig, LastModifiedResolverImpl};
use pretty_assertions::assert_eq;
use url::Url;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

/// Minimal HTTP server answering each connection with the next canned
/// response. Records request lines.
struct CannedServer {
    url: Url,
    requests: Arc<Mutex<Vec<String>>>,
}

impl CannedServer {
    fn start(responses: Vec<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = Url::parse(&format!("http://{}/trigger.txt", listener.local_addr().unwrap()))
            .unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));

        let requests_inner = requests.clone();
        std::thread::spawn(move || {
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();

                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                requests_inner
                    .lock()
                    .unwrap()
                    .push(request_line.trim().to_string());

                loop {
                    let mut line = String::new();
                    if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                        break;
                    }
                }

                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
        });

        Self { url, requests }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn response(status: &str, headers: &[&str]) -> String {
    let mut response = format!("HTTP/1.1 {status}\r\nConnection: close\r\nContent-Length: 0\r\n");
    for header in headers {
        response.push_str(header);
        response.push_str("\r\n");
    }
    response.push_str("\r\n");
    response
}

fn resolver(request_timeout: Duration) -> LastModifiedResolverImpl {
    LastModifiedResolverImpl::new(Arc::new(LastModifiedResolverConfig { request_timeout }))
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test]
fn test_http_last_modified_header() {
    let server = CannedServer::start(vec![response(
        "200 OK",
        &["Last-Modified: Wed, 21 Oct 2015 07:28:00 GMT"],
    )]);

    assert_eq!(
        resolver(Duration::from_secs(5))
            .last_modified(&server.url)
            .unwrap(),
        LastModified::Known(Utc.with_ymd_and_hms(2015, 10, 21, 7, 28, 0).unwrap())
    );
    assert_eq!(server.requests(), vec!["HEAD /trigger.txt HTTP/1.1"]);
}

#[test_log::test]
fn test_http_missing_header_is_unknown() {
    let server = CannedServer::start(vec![response("200 OK", &[])]);

    assert_eq!(
        resolver(Duration::from_secs(5))
            .last_modified(&server.url)
            .unwrap(),
        LastModified::Unknown
    );
}

#[test_log::test]
fn test_http_falls_back_to_get() {
    let server = CannedServer::start(vec![
        response("405 Method Not Allowed", &[]),
        response("200 OK", &["Last-Modified: Thu, 01 Jan 2004 01:00:00 GMT"]),
    ]);

    assert_eq!(
        resolver(Duration::from_secs(5))
            .last_modified(&server.url)
            .unwrap(),
        LastModified::Known(Utc.with_ymd_and_hms(2004, 1, 1, 1, 0, 0).unwrap())
    );
    assert_eq!(
        server.requests(),
        vec!["HEAD /trigger.txt HTTP/1.1", "GET /trigger.txt HTTP/1.1"]
    );
}

#[test_log::test]
fn test_http_error_status() {
    let server = CannedServer::start(vec![response("404 Not Found", &[])]);

    let result = resolver(Duration::from_secs(5)).last_modified(&server.url);
    assert!(
        matches!(result, Err(LastModifiedError::UnexpectedStatus { status: 404, .. })),
        "{result:?}"
    );
}

#[test_log::test]
fn test_http_invalid_header() {
    let server = CannedServer::start(vec![response("200 OK", &["Last-Modified: yesterday"])]);

    let result = resolver(Duration::from_secs(5)).last_modified(&server.url);
    assert!(
        matches!(&result, Err(LastModifiedError::InvalidHeader { value, .. }) if value == "yesterday"),
        "{result:?}"
    );
}

#[test_log::test]
fn test_http_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = Url::parse(&format!("http://{}/slow", listener.local_addr().unwrap())).unwrap();
    std::thread::spawn(move || {
        let (_stream, _) = listener.accept().unwrap();
        std::thread::sleep(Duration::from_secs(3));
    });

    let result = resolver(Duration::from_millis(200)).last_modified(&url);
    assert!(
        matches!(result, Err(LastModifiedError::Timeout { .. })),
        "{result:?}"
    );
}

#[test_log::test]
fn test_file_modification_time() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("trigger.txt");
    std::fs::write(&path, "touch").unwrap();

    let url = Url::from_file_path(&path).unwrap();
    let expected = DateTime::<Utc>::from(std::fs::metadata(&path).unwrap().modified().unwrap());

    assert_eq!(
        resolver(Duration::from_secs(5)).last_modified(&url).unwrap(),
        LastModified::Known(expected)
    );

    let missing = Url::from_file_path(dir.path().join("missing.txt")).unwrap();
    assert!(matches!(
        resolver(Duration::from_secs(5)).last_modified(&missing),
        Err(LastModifiedError::Unreachable { .. })
    ));
}

#[test]
fn test_unsupported_scheme() {
    let url = Url::parse("ftp://example.com/trigger.txt").unwrap();

    assert!(matches!(
        resolver(Duration::from_secs(5)).last_modified(&url),
        Err(LastModifiedError::UnsupportedScheme { scheme }) if scheme == "ftp"
    ));
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
