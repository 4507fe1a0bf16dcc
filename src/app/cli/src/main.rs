// Copyright Kamu Data, Inc. and contributors. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use clap::Parser;

fn main() {
    let args = cinder_cli::cli::Cli::parse();

    if let Err(err) = cinder_cli::run(args) {
        eprintln!("{}", err.pretty());
        std::process::exit(err.exit_code());
    }
}
