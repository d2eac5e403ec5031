use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_complete::Shell;

use s2c_core::config::{self, CONFIG_FILE_NAME, S2cConfig};
use s2c_core::fetch::HttpTransport;
use s2c_core::output::{DirectorySink, StreamSink};
use s2c_core::render::CaseRenderer;
use s2c_core::walk::WalkSummary;

#[derive(Parser)]
#[command(name = "s2c", about = "Swagger 2.0 to HttpRunner test case converter", version)]
struct Cli {
    /// Log debug diagnostics (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Swagger doc.json into HttpRunner YAML cases
    #[command(name = "convert-swagger", alias = "convertSwagger")]
    ConvertSwagger {
        /// URL of the Swagger 2.0 JSON document
        url: String,

        /// Directory for the generated cases; prints to stdout when omitted or empty
        path: Option<String>,

        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Accept invalid TLS certificates
        #[arg(short = 'k', long)]
        insecure: bool,
    },

    /// Initialize a new s2c configuration
    Init {
        /// Overwrite existing files
        #[arg(long)]
        force: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match cli.command {
        Commands::ConvertSwagger {
            url,
            path,
            timeout,
            insecure,
        } => cmd_convert(&url, path, timeout, insecure),

        Commands::Init { force } => cmd_init(force),

        Commands::Completions { shell } => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            clap_complete::generate(shell, &mut cmd, "s2c", &mut io::stdout());
            Ok(())
        }
    }
}

/// Try to load the project config file from the current directory.
fn try_load_config() -> Result<Option<S2cConfig>> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);
    config::load_config(&config_path).map_err(|e| anyhow::anyhow!(e))
}

/// Where cases go: the explicit path, else the configured `output`. An empty
/// path, explicit or configured, means stdout.
fn destination(path: Option<PathBuf>, cfg: &S2cConfig) -> Option<PathBuf> {
    path.or_else(|| cfg.output.as_ref().map(PathBuf::from))
        .filter(|p| !p.as_os_str().is_empty())
}

fn summary_message(summary: &WalkSummary, files: Option<(usize, &Path)>) -> String {
    let target = match files {
        Some((count, dir)) => format!("into {count} files in {}", dir.display()),
        None => "to stdout".to_string(),
    };
    let mut message = format!(
        "Generated {} cases {target} ({} operations without parameters skipped",
        summary.emitted, summary.skipped
    );
    if summary.malformed > 0 {
        message.push_str(&format!(", {} malformed entries ignored", summary.malformed));
    }
    message.push(')');
    message
}

fn cmd_convert(url: &str, path: Option<String>, timeout: Option<u64>, insecure: bool) -> Result<()> {
    let cfg = try_load_config()?.unwrap_or_default();

    let mut options = cfg.http.options();
    if let Some(secs) = timeout {
        options.timeout = Duration::from_secs(secs);
    }
    options.insecure |= insecure;

    let destination = destination(path.map(PathBuf::from), &cfg);

    let transport = HttpTransport::new(options).context("failed to set up HTTP client")?;
    let renderer = CaseRenderer::new()?.with_headers(&cfg.headers);

    match destination {
        Some(dir) => {
            let mut sink = DirectorySink::new(&dir);
            let summary = s2c_core::convert(&transport, url, &renderer, &mut sink)
                .with_context(|| format!("failed to convert {url}"))?;
            eprintln!(
                "{}",
                summary_message(&summary, Some((sink.written().count(), sink.base())))
            );
        }
        None => {
            let mut sink = StreamSink::new(io::stdout().lock());
            let summary = s2c_core::convert(&transport, url, &renderer, &mut sink)
                .with_context(|| format!("failed to convert {url}"))?;
            eprintln!("{}", summary_message(&summary, None));
        }
    }

    Ok(())
}

fn cmd_init(force: bool) -> Result<()> {
    let config_path = PathBuf::from(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, config::default_config_content())?;
    eprintln!("Created {}", config_path.display());
    Ok(())
}
