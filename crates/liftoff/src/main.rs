//! Liftoff - publish an iOS app to App Store Connect

mod cli;
mod exit_codes;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use cli::{output, Cancelled, Cli};

/// Crates whose progress is shown on the console by default
const LIFTOFF_CRATES: &[&str] = &["liftoff", "liftoff_core", "liftoff_connect", "liftoff_build"];

fn main() {
    let cli = Cli::parse();
    let guard = init_tracing(cli.verbose, cli.quiet);

    let code = match cli.execute() {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) if e.is::<Cancelled>() => {
            println!();
            output::warning("Cancelled by user");
            exit_codes::ERROR
        }
        Err(e) => {
            output::error(&format!("{:#}", e));
            exit_codes::ERROR
        }
    };

    // Flush the file layer before exiting
    drop(guard);
    std::process::exit(code);
}

/// Default console filter for the given verbosity
fn console_directives(verbose: bool, quiet: bool) -> String {
    let level = match (verbose, quiet) {
        (true, _) => "debug",
        (false, true) => "error",
        (false, false) => "info",
    };
    let mut directives = vec![if quiet { "error" } else { "warn" }.to_string()];
    directives.extend(LIFTOFF_CRATES.iter().map(|c| format!("{}={}", c, level)));
    directives.join(",")
}

/// Set up tracing with two layers:
/// - Console: controlled by RUST_LOG (default: warn, liftoff crates at info)
/// - File: always debug-level JSON to ~/.liftoff/logs/
fn init_tracing(verbose: bool, quiet: bool) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_directives(verbose, quiet)));

    if let Some(log_dir) = log_directory() {
        let file_appender = tracing_appender::rolling::daily(&log_dir, "liftoff.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_filter(console_filter),
            )
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(non_blocking)
                    .with_target(true)
                    .with_filter(EnvFilter::new("debug")),
            )
            .init();

        return Some(guard);
    }

    // Fallback: console only
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_filter(console_filter),
        )
        .init();

    None
}

/// Returns the log directory path, creating it if needed.
fn log_directory() -> Option<std::path::PathBuf> {
    let log_dir = dirs::home_dir()?.join(".liftoff").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;
    Some(log_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_directives() {
        assert_eq!(
            console_directives(false, false),
            "warn,liftoff=info,liftoff_core=info,liftoff_connect=info,liftoff_build=info"
        );
        assert!(console_directives(true, false).contains("liftoff_connect=debug"));
        assert!(console_directives(false, true).starts_with("error,"));
    }
}
