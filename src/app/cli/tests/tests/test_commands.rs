// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use clap::Parser;
use cinder_cli::cli::Cli;
use cinder_cli::{CLIError, ProjectsConfigError};
use indoc::{formatdoc, indoc};
use pretty_assertions::assert_eq;

use super::utils::*;

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

const PROJECTS: &str = indoc!(
    r#"
    pollInterval: 1m
    projects:
      - name: alpha
        trigger:
          kind: interval
          seconds: 120
      - name: beta
        trigger:
          kind: schedule
          name: nightly
          time: "01:02"
          buildCondition: ForceBuild
    "#
);

fn run(projects_file: &ProjectsFile, args: &[&str]) -> (Result<(), CLIError>, String) {
    let config = projects_file.path.to_str().unwrap();

    let mut argv = vec!["cinder", "--config", config, "--system-time", SYSTEM_TIME];
    argv.extend_from_slice(args);

    let cli = Cli::try_parse_from(argv).unwrap();
    let out = SharedBuffer::default();

    let res = cinder_cli::run_command(cli, Box::new(out.clone()));
    (res, out.contents())
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[test_log::test]
fn test_validate_lists_projects() {
    let projects_file = ProjectsFile::new(PROJECTS);

    let (res, out) = run(&projects_file, &["validate"]);

    res.unwrap();
    assert_eq!(
        out,
        indoc!(
            "
            ok alpha (IntervalTrigger)
            ok beta (nightly)
            2 project(s) validated
            "
        )
    );
}

#[test_log::test]
fn test_validate_binds_file_url_trigger() {
    let data = tempfile::NamedTempFile::new().unwrap();
    let url = format!("file://{}", data.path().display());

    let projects_file = ProjectsFile::new(&formatdoc!(
        r#"
        projects:
          - name: docs
            trigger:
              kind: url
              url: "{url}"
              seconds: 60
        "#
    ));

    let (res, out) = run(&projects_file, &["validate"]);

    res.unwrap();
    assert_eq!(out, "ok docs (UrlTrigger)\n1 project(s) validated\n");
}

#[test_log::test]
fn test_validate_reports_invalid_trigger() {
    let projects_file = ProjectsFile::new(indoc!(
        r#"
        projects:
          - name: broken
            trigger:
              kind: interval
              seconds: 0
        "#
    ));

    let (res, out) = run(&projects_file, &["validate"]);

    let err = res.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(
        matches!(
            &err,
            CLIError::Config(ProjectsConfigError::InvalidTrigger { project_name, .. })
                if project_name == "broken"
        ),
        "{err:?}"
    );
    assert!(err.pretty().contains("Invalid trigger of project 'broken'"));
    assert_eq!(out, "");
}

#[test_log::test]
fn test_missing_projects_file() {
    let projects_file = ProjectsFile::new("projects: []");
    std::fs::remove_file(&projects_file.path).unwrap();

    let (res, _) = run(&projects_file, &["validate"]);

    let err = res.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(
        matches!(err, CLIError::Config(ProjectsConfigError::Io { .. })),
        "{err:?}"
    );
}

#[test_log::test]
fn test_next_builds_table() {
    let projects_file = ProjectsFile::new(PROJECTS);

    let (res, out) = run(&projects_file, &["next-builds"]);

    res.unwrap();

    let alpha = out.lines().position(|l| l.contains("alpha")).unwrap();
    let beta = out.lines().position(|l| l.contains("beta")).unwrap();
    assert!(alpha < beta, "Rows must be ordered by next build:\n{out}");

    assert!(out.contains("IntervalTrigger"), "{out}");
    assert!(out.contains("2004-01-01T01:00:00+00:00"), "{out}");
    assert!(out.contains("nightly"), "{out}");
    assert!(out.contains("2004-01-01T01:02:00+00:00"), "{out}");
    assert!(out.contains("in 2 minutes"), "{out}");
}

#[test_log::test]
fn test_poll_simulates_rounds() {
    let projects_file = ProjectsFile::new(PROJECTS);

    let (res, out) = run(&projects_file, &["poll", "--rounds", "4"]);

    res.unwrap();
    assert_eq!(
        out,
        indoc!(
            "
            2004-01-01T01:00:00+00:00 alpha: IfModificationExists requested by IntervalTrigger
            2004-01-01T01:02:00+00:00 alpha: IfModificationExists requested by IntervalTrigger
            2004-01-01T01:02:00+00:00 beta: ForceBuild requested by nightly
            "
        )
    );
}

#[test_log::test]
fn test_poll_single_round_on_real_clock() {
    let projects_file = ProjectsFile::new(PROJECTS);
    let config = projects_file.path.to_str().unwrap();

    let cli = Cli::try_parse_from(["cinder", "--config", config, "poll", "--rounds", "1"]).unwrap();
    let out = SharedBuffer::default();

    cinder_cli::run_command(cli, Box::new(out.clone())).unwrap();

    let out = out.contents();
    assert_eq!(out.lines().count(), 1, "{out}");
    assert!(
        out.ends_with(" alpha: IfModificationExists requested by IntervalTrigger\n"),
        "{out}"
    );
}

#[test_log::test]
fn test_poll_reports_parameters() {
    let projects_file = ProjectsFile::new(indoc!(
        r#"
        projects:
          - name: release
            trigger:
              kind: parameter
              parameters:
                - name: target
                  value: release
                - name: arch
                  value: x86_64
              trigger:
                kind: interval
                name: hourly
                seconds: 3600
        "#
    ));

    let (res, out) = run(&projects_file, &["poll", "--rounds", "2"]);

    res.unwrap();
    assert_eq!(
        out,
        "2004-01-01T01:00:00+00:00 release: IfModificationExists requested by hourly [arch=x86_64, \
         target=release]\n"
    );
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
