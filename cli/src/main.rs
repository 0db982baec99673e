//! nodescale - bring cluster nodes up and down through provider scripts

#![cfg_attr(test, allow(clippy::expect_used))]

use std::process::ExitCode;

use clap::Parser;
use nodescale::cli::Cli;
use nodescale::domain::ConfigError;
use nodescale::output::json::format_error;
use nodescale_common::ScalingError;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let json = cli.json;
    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            if json {
                match format_error(&format!("{e:#}"), error_code(&e)) {
                    Ok(out) => println!("{out}"),
                    Err(_) => eprintln!("Error: {e:#}"),
                }
            } else {
                eprintln!("Error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

fn error_code(e: &anyhow::Error) -> &'static str {
    if let Some(scaling) = e.downcast_ref::<ScalingError>() {
        return scaling.code();
    }
    if e.downcast_ref::<ConfigError>().is_some() {
        return "CONFIGURATION";
    }
    "ERROR"
}
