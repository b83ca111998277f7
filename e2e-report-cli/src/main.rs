// Copyright (c) The e2e-report Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use clap::Parser;
use color_eyre::Result;
use e2e_report_cli::E2eReportApp;

fn main() -> Result<()> {
    color_eyre::install()?;

    let opts = E2eReportApp::parse();
    let output = opts.init_output();

    match opts.exec(output, &mut std::io::stdout().lock()) {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            error.display_to_stderr();
            std::process::exit(error.process_exit_code())
        }
    }
}
