// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! benchscope CLI entry point.

fn main() {
    if let Err(e) = benchscope_cli::run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
