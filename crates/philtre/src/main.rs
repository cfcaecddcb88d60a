//! Philtre CLI.

use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{ArgAction, Parser};
use eyre::Result;
use tracing_subscriber::EnvFilter;

use philtre::config::{Overrides, ResolvedConfig};

/// Post-build processor for PHP templates.
#[derive(Debug, Parser)]
#[command(name = "philtre", version, about)]
struct Cli {
    /// Config file (default: .config/philtre.yaml, discovered walking up)
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Template source directory or single file
    #[arg(long)]
    source: Option<Utf8PathBuf>,

    /// Build output directory
    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// Enable (or with `--minify=false` disable) the PHP-preserving
    /// minification pass, overriding the config file either way
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    minify: Option<bool>,

    /// Asset manifest filename for the prepended include directive
    #[arg(long)]
    manifest_file: Option<String>,
}

fn main() -> ExitCode {
    match try_main() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn try_main() -> Result<ExitCode> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("philtre=info")),
        )
        .init();

    let cli = Cli::parse();
    let overrides = Overrides {
        source: cli.source,
        output: cli.output,
        minify: cli.minify,
        manifest_file: cli.manifest_file,
    };

    let config = match &cli.config {
        Some(path) => ResolvedConfig::load(path, overrides)?,
        None => ResolvedConfig::discover(overrides)?,
    };

    let report = philtre::run(&config)?;
    tracing::info!(
        written = report.written.len(),
        failed = report.failed.len(),
        "done"
    );
    for (file, error) in &report.failed {
        tracing::error!(file = %file, "{error}");
    }

    if report.is_success() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_flag_overrides_both_ways() {
        let cli = Cli::parse_from(["philtre"]);
        assert_eq!(cli.minify, None);

        let cli = Cli::parse_from(["philtre", "--minify"]);
        assert_eq!(cli.minify, Some(true));

        // A config file with `minify: true` can be overridden back off.
        let cli = Cli::parse_from(["philtre", "--minify=false"]);
        assert_eq!(cli.minify, Some(false));
    }
}
