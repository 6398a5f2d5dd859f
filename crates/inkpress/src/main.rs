//! Inkpress CLI - static blog build pipeline and responsiveness checker.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "inkpress")]
#[command(about = "Static blog build pipeline and responsiveness checker")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to blog.toml config file
    #[arg(short, long, default_value = "blog.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the site into the output directory
    Build {
        /// Output directory (defaults to config or "output")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Optimize images for a production deploy
        #[arg(long)]
        production: bool,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Build, then serve the site with file watching and live reload
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "9103")]
        port: u16,

        /// Open browser on start
        #[arg(long)]
        open: bool,
    },

    /// Check that one deployed page fits a viewport width exactly
    Check {
        /// Page URL
        url: String,

        /// Expected viewport width in pixels
        width: u32,

        /// Delay after load before measuring, in milliseconds
        #[arg(long, default_value = "1000")]
        settle_ms: u64,
    },

    /// Check that many deployed pages fit a fixed viewport width
    CheckAll {
        /// Page URLs
        urls: Vec<String>,

        /// Expected viewport width in pixels
        #[arg(long, default_value = "568")]
        width: u32,

        /// Delay after load before measuring, in milliseconds
        #[arg(long, default_value = "1000")]
        settle_ms: u64,

        /// Per-page deadline in seconds
        #[arg(long, default_value = "30")]
        timeout_secs: u64,

        /// Always exit 0, reporting failures on stdout only
        #[arg(long)]
        exit_zero: bool,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // The checkers promise a usage message on stdout and exit status 1 for
    // a wrong argument shape, so clap's default exit handling (status 2,
    // stderr) is bypassed. Help and version output keeps exiting 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            print!("{}", e.render());
            return Ok(ExitCode::from(parse_failure_code(&e)));
        }
    };

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    // Execute command
    let code = match cli.command {
        Commands::Build {
            output,
            production,
            no_minify,
        } => {
            commands::build::run(&cli.config, output, production, no_minify).await?;
            ExitCode::SUCCESS
        }
        Commands::Serve { port, open } => {
            commands::serve::run(&cli.config, port, open).await?;
            ExitCode::SUCCESS
        }
        Commands::Check {
            url,
            width,
            settle_ms,
        } => commands::check::run_single(url, width, settle_ms).await,
        Commands::CheckAll {
            urls,
            width,
            settle_ms,
            timeout_secs,
            exit_zero,
        } => commands::check::run_many(urls, width, settle_ms, timeout_secs, exit_zero).await,
    };

    Ok(code)
}

/// Exit status for an argument-parsing failure: 1 for a usage error,
/// 0 when the "failure" is help or version output.
fn parse_failure_code(err: &clap::Error) -> u8 {
    use clap::error::ErrorKind;

    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_check_arguments_exit_one() {
        let err = Cli::try_parse_from(["inkpress", "check", "http://example.com/"]).unwrap_err();

        assert_eq!(parse_failure_code(&err), 1);
    }

    #[test]
    fn extra_check_arguments_exit_one() {
        let err =
            Cli::try_parse_from(["inkpress", "check", "http://example.com/", "568", "600"])
                .unwrap_err();

        assert_eq!(parse_failure_code(&err), 1);
    }

    #[test]
    fn usage_error_message_carries_usage_text() {
        let err = Cli::try_parse_from(["inkpress", "check"]).unwrap_err();

        assert!(err.render().to_string().contains("Usage"));
    }

    #[test]
    fn help_exits_zero() {
        let err = Cli::try_parse_from(["inkpress", "--help"]).unwrap_err();

        assert_eq!(parse_failure_code(&err), 0);
    }
}
