// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI for benchscope.
//!
//! Lists suites and iterations of a results root and prints the charts the
//! viewer would draw, as Markdown tables or chart-spec JSON.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::{bail, Context};
use benchscope_adapters::SourceConfig;
use benchscope_benchmarks::{io, markdown, ChartSpec, IterationName};
use benchscope_core::{render_suite, AggregateMode, RenderOptions, ResultSource, Selection};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// benchscope CLI.
#[derive(Parser, Debug)]
#[command(name = "benchscope")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Results root: an http(s) URL or a local directory.
    #[arg(long, global = true, env = "BENCHSCOPE_ROOT", default_value = "benchmark_results")]
    pub root: String,

    /// Request timeout in seconds for HTTP roots.
    #[arg(long, global = true, default_value_t = 10)]
    pub timeout: u64,

    /// Iteration files loaded at once for combined views.
    #[arg(long, global = true, default_value_t = 4)]
    pub concurrency: usize,

    /// Verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the benchmark suites under the root.
    Suites,

    /// List the iteration files of one suite.
    Iterations {
        /// Suite directory, e.g. `ssb/`.
        suite: String,
    },

    /// Print the charts of a suite.
    ///
    /// Without `--iteration` the combined view over all iterations is shown.
    Show {
        /// Suite directory, e.g. `ssb/`.
        suite: String,

        /// Iteration file to chart instead of the combined view.
        #[arg(short, long)]
        iteration: Option<String>,

        /// Aggregation for the combined view (default depends on the suite).
        #[arg(short, long, value_enum)]
        aggregate: Option<AggregateArg>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Markdown)]
        format: OutputFormat,

        /// Also write the charts to this file.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show configuration and whether the root is reachable.
    Status {
        /// Also list the suites found.
        #[arg(short, long)]
        detailed: bool,
    },
}

/// Combined-view aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AggregateArg {
    /// Median real time per iteration, in ns
    Median,
    /// Total real time per iteration, in ms
    Sum,
}

impl From<AggregateArg> for AggregateMode {
    fn from(arg: AggregateArg) -> Self {
        match arg {
            AggregateArg::Median => AggregateMode::median_real_time(),
            AggregateArg::Sum => AggregateMode::total_real_time_ms(),
        }
    }
}

/// Chart output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Markdown tables
    Markdown,
    /// Chart-spec JSON
    Json,
}

/// Run the CLI with the process arguments.
///
/// # Returns
///
/// Returns `Ok(())` on success, or an error if the command fails.
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
    runtime.block_on(execute(cli))
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Execute a parsed command.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = SourceConfig {
        root: cli.root.clone(),
        timeout_secs: cli.timeout,
        concurrency: cli.concurrency,
    };
    let source = config.build()?;
    tracing::debug!(command = ?cli.command, root = %config.root, "Executing command");

    match cli.command {
        Commands::Suites => {
            for suite in source.list_suites().await? {
                println!("{}", suite.bold());
            }
            Ok(())
        }
        Commands::Iterations { suite } => {
            for file in source.list_iterations(&suite).await? {
                match IterationName::parse(&file) {
                    Some(name) => println!("{}  {}", file, name.display_label().dimmed()),
                    None => println!("{file}"),
                }
            }
            Ok(())
        }
        Commands::Show {
            suite,
            iteration,
            aggregate,
            format,
            output,
        } => {
            let mut options = config.render_options();
            options.aggregate = aggregate.map(AggregateMode::from);

            let charts = show(source.as_ref(), &suite, iteration.as_deref(), &options).await?;
            print!("{}", render_output(&charts, format)?);

            if let Some(path) = output {
                let written = match format {
                    OutputFormat::Markdown => io::write_charts_markdown(&charts, &path),
                    OutputFormat::Json => io::write_charts_json(&charts, &path),
                };
                written.with_context(|| format!("failed to write {}", path.display()))?;
                if cli.verbose {
                    eprintln!("Charts written to {}", path.display());
                }
            }
            Ok(())
        }
        Commands::Status { detailed } => {
            println!("benchscope");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Root: {} ({:?})", source.describe(), config.kind());

            match source.list_suites().await {
                Ok(suites) => {
                    println!("Status: {} ({} suites)", "reachable".green(), suites.len());
                    if detailed {
                        for suite in suites {
                            println!("  - {suite}");
                        }
                    }
                    Ok(())
                }
                Err(err) => {
                    println!("Status: {}", "unreachable".red());
                    bail!(err)
                }
            }
        }
    }
}

/// Charts of `suite`, combined unless an iteration file is given.
pub async fn show(
    source: &dyn ResultSource,
    suite: &str,
    iteration: Option<&str>,
    options: &RenderOptions,
) -> benchscope_core::Result<Vec<ChartSpec>> {
    let selection = Selection::from_param(iteration.unwrap_or_default());
    render_suite(source, suite, &selection, options).await
}

/// Format charts for stdout.
pub fn render_output(charts: &[ChartSpec], format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Markdown => markdown::render_charts(charts),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(charts)?;
            json.push('\n');
            json
        }
    })
}
