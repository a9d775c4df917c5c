use std::process::ExitCode;

use colored::Colorize;

use idescriptive::analyzer::{Analyzer, Config};
use idescriptive::report::{render_json, render_text, Diagnostic};
use idescriptive::source::{load_packages, LoadOptions};

use crate::cli::Cli;

/// Exit status when the run succeeded but found problems, as `go vet` does.
const EXIT_DIAGNOSTICS: u8 = 3;

pub(super) fn cmd_check(cli: &Cli) -> ExitCode {
    let diagnostics = match check(cli) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("{}", e.red());
            return ExitCode::FAILURE;
        }
    };

    if cli.json {
        match render_json(&diagnostics) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("{}", format!("Cannot encode diagnostics: {}", e).red());
                return ExitCode::FAILURE;
            }
        }
        // JSON consumers read the findings from stdout, not the status.
        return ExitCode::SUCCESS;
    }

    eprint!("{}", render_text(&diagnostics));
    if diagnostics.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(EXIT_DIAGNOSTICS)
    }
}

fn check(cli: &Cli) -> Result<Vec<Diagnostic>, String> {
    let config = Config::new(cli.strict, cli.all_types).map_err(|e| e.to_string())?;
    let options = LoadOptions {
        include_tests: cli.test,
    };
    let packages = load_packages(&cli.paths, &options).map_err(|e| e.to_string())?;
    tracing::debug!(packages = packages.len(), mode = ?config.mode(), "loaded packages");
    Analyzer::new(config)
        .run(&packages)
        .map_err(|e| e.to_string())
}
