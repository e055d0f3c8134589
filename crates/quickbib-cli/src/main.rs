use std::io::{IsTerminal, Write};
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use quickbib_core::config_file::{self, ConfigFile};
use quickbib_core::{
    GithubReleaseChecker, HttpResolver, LookupRequest, LookupResult, ResultSink, UpdateChecker,
    lookup,
};

mod output;

use output::ColorMode;

/// QuickBib - fetch BibTeX for DOIs, arXiv IDs, journal URLs and titles
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// DOIs, arXiv identifiers, journal URLs or quoted titles
    #[arg(required_unless_present = "check_update")]
    identifiers: Vec<String>,

    /// Copy the last record found to the clipboard
    #[arg(short, long)]
    copy: bool,

    /// Print records exactly as the server returned them
    #[arg(long)]
    raw: bool,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Check GitHub for a newer release
    #[arg(long)]
    check_update: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner(identifier: &str) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(format!("Fetching {}", identifier));
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = config_file::load_config();
    let color = ColorMode(!cli.no_color && std::io::stderr().is_terminal());

    if cli.check_update {
        check_update(&config, color).await?;
        if cli.identifiers.is_empty() {
            return Ok(ExitCode::SUCCESS);
        }
    }

    // Resolve configuration: CLI flags > env vars > config file > defaults
    let mut resolver_config = config.resolver_config();
    if let Some(secs) = cli.timeout {
        resolver_config.timeout = Duration::from_secs(secs);
    }
    if cli.raw {
        resolver_config.tidy = false;
    }
    let resolver = HttpResolver::new(resolver_config)?;

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    let mut sink = ResultSink::new();
    let mut first = true;
    let mut failures = 0usize;

    for identifier in &cli.identifiers {
        let request = LookupRequest::new(identifier.as_str());
        let bar = spinner(identifier);
        let result = lookup(&resolver, &request).await;
        bar.finish_and_clear();

        output::print_result(
            &mut stdout.lock(),
            &mut stderr.lock(),
            identifier,
            &result,
            first,
            color,
        )?;
        match result {
            LookupResult::Found { bibtex } => {
                let key = quickbib_core::bibtex::entry_key(&bibtex);
                tracing::info!(%identifier, key = key.as_deref().unwrap_or("?"), "resolved");
                first = false;
                sink.on_result(LookupResult::Found { bibtex });
            }
            _ => failures += 1,
        }
    }
    stdout.lock().flush()?;

    if cli.copy {
        let clipboard = output::clipboard_for(config.clipboard_backend(), std::io::stderr());
        let ok = sink.copy_current_result(clipboard.as_ref());
        output::print_copy_status(&mut stderr.lock(), &sink, color)?;
        if !ok {
            failures += 1;
        }
    }

    tracing::debug!(total = cli.identifiers.len(), failures, "done");
    Ok(if failures == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn check_update(config: &ConfigFile, color: ColorMode) -> anyhow::Result<()> {
    let timeout = Duration::from_secs(config.timeout_secs().unwrap_or(10));
    let checker = GithubReleaseChecker::new(config.update_repo(), timeout)?;
    let info = checker.check().await?;
    output::print_update(&mut std::io::stderr().lock(), &info, color)?;
    Ok(())
}
