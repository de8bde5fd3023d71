//! ctdopts-demo: a dummy tool showing the ctdopts parameter surfaces
//!
//! Entry point for the demo binary.

use std::process::ExitCode;

use ctdopts::bridge::BridgeError;
use ctdopts::{CommandLineBridge, Invocation, Outcome};

mod app;
mod demo;

use app::{exit_code, load_settings, print_bridge_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    setup_tracing();

    let settings = match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Settings error: {e}");
            return exit_code::USAGE_ERROR;
        }
    };

    let tool = match demo::declare_tool() {
        Ok(tool) => tool,
        Err(e) => {
            eprintln!("Declaration error: {e}");
            return exit_code::USAGE_ERROR;
        }
    };

    let outcome = CommandLineBridge::new(tool)
        .with_settings(settings)
        .run(std::env::args().skip(1));

    match outcome {
        Ok(Outcome::ToolDescribed(path)) => {
            println!(
                "Tool-describing {} written successfully. Exiting.",
                path.display()
            );
            exit_code::SUCCESS
        }
        Ok(Outcome::Invoked(invocation)) => run_tool(invocation),
        Err(e) => handle_bridge_error(&e),
    }
}

/// Runs the demo body, finalizing the execution log on every path.
fn run_tool(mut invocation: Invocation) -> ExitCode {
    if let Some(path) = invocation.written_path() {
        println!("Parameter container {} written successfully.", path.display());
    }

    let status = match invocation.scoped(|inv| demo::report(inv)) {
        Ok(status) => status,
        Err(e) => {
            tracing::error!("Failed to write execution log: {e}");
            return exit_code::runtime_error();
        }
    };
    if invocation.is_finalized() {
        if let Some(path) = invocation.log_path() {
            println!(
                "Parameter and log container {} written successfully.",
                path.display()
            );
        }
    }
    if status == 0 {
        exit_code::SUCCESS
    } else {
        exit_code::runtime_error()
    }
}

/// Reports a bridge failure and picks the exit code.
fn handle_bridge_error(error: &BridgeError) -> ExitCode {
    match error {
        BridgeError::Parse(e) => {
            let _ = e.print();
            if error.is_help() {
                exit_code::SUCCESS
            } else {
                exit_code::USAGE_ERROR
            }
        }
        BridgeError::MissingDirectiveValue { .. } => {
            eprintln!("Error: {error}");
            print_bridge_hint(error);
            exit_code::USAGE_ERROR
        }
        BridgeError::Document(_) => {
            eprintln!("Error: {error}");
            print_bridge_hint(error);
            exit_code::runtime_error()
        }
    }
}
