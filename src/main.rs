use clap::Parser;
use human_bytes::human_bytes;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use newznab::{
    cli::{Cli, Commands},
    client::NewznabClient,
    config::Config,
    error::{ConfigError, NewznabError},
    nzb::Nzb,
};

type Result<T> = std::result::Result<T, NewznabError>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration, then let the command line win
    let mut config = if cli.command.uses_config() {
        Config::load(cli.config.as_deref())?
    } else {
        Config::default()
    };
    config.apply_overrides(cli.get_config_overrides());

    init_logging(&cli, &config)?;

    if cli.command.uses_config() {
        match &config.source {
            Some(path) => tracing::debug!("Loaded configuration from: {}", path.display()),
            None => tracing::debug!("No configuration file found, using defaults"),
        }
    }

    match &cli.command {
        Commands::Config { init } => handle_config(*init, cli.config.as_deref()),
        Commands::Decode { file, summary } => handle_decode(file, *summary, &config).await,
        command => handle_request(command, &config).await,
    }
}

/// Initialize logging. Logs go to stderr so stdout stays clean JSON.
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let filter =
        EnvFilter::try_new(&config.logging.level).unwrap_or_else(|_| EnvFilter::new("warn"));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let log_file = cli.log_file.as_ref().or(config.logging.file.as_ref());
    if let Some(log_file) = log_file {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)?;
        subscriber
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else {
        subscriber.with_writer(std::io::stderr).init();
    }

    Ok(())
}

/// Commands that talk to the indexer
async fn handle_request(command: &Commands, config: &Config) -> Result<()> {
    if let Some(needs_key) = command.server_access() {
        config.validate_for_requests(needs_key)?;
    }

    let client = NewznabClient::from_config(&config.server)?;
    let params = command.search_params()?.unwrap_or_default();

    let body = match command {
        Commands::Caps => client.caps().await?,
        Commands::Search(_) => client.search(&params).await?,
        Commands::Tv { .. } => client.tv_search(&params).await?,
        Commands::Movie { .. } => client.movie_search(&params).await?,
        Commands::Music { .. } => client.music_search(&params).await?,
        Commands::Book { .. } => client.book_search(&params).await?,
        Commands::Get { id } => {
            let nzb = client.fetch_nzb(id).await?;
            return print_json(&nzb, config.output.pretty);
        }
        Commands::Decode { .. } | Commands::Config { .. } => return Ok(()),
    };

    println!("{}", body);
    Ok(())
}

/// Convert a local NZB file
async fn handle_decode(file: &Path, summary: bool, config: &Config) -> Result<()> {
    let data = tokio::fs::read(file).await?;
    let nzb = Nzb::from_bytes(&data)?;
    tracing::debug!(
        "Decoded {}: {} files, {} segments",
        file.display(),
        nzb.files.len(),
        nzb.total_segments()
    );

    if summary {
        print_summary(file, &nzb);
        Ok(())
    } else {
        print_json(&nzb, config.output.pretty)
    }
}

fn print_json(nzb: &Nzb, pretty: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    nzb.write_json(&mut out, pretty)?;
    writeln!(out)?;
    Ok(())
}

fn print_summary(path: &Path, nzb: &Nzb) {
    println!("{}", path.display());
    println!("{}", "─".repeat(50));

    if let Some(title) = nzb.meta("title") {
        println!("Title: {}", title);
    }
    println!("Total files: {}", nzb.files.len());
    println!("Total size: {}", human_bytes(nzb.total_bytes() as f64));
    println!("Total segments: {}", nzb.total_segments());
    println!(
        "Data files: {} | PAR2 files: {}",
        nzb.main_files().len(),
        nzb.par2_files().len()
    );

    println!("\nFiles:");
    for file in &nzb.files {
        let name = file.filename().unwrap_or(&file.subject);
        let kind = if file.is_par2() { "PAR2" } else { "DATA" };
        println!(
            "  [{:4}] {} ({})",
            kind,
            name,
            human_bytes(file.total_bytes() as f64)
        );
    }
}

/// Show or create the configuration file
fn handle_config(init: bool, explicit: Option<&Path>) -> Result<()> {
    let config_path = Config::resolve_path(explicit)?;

    if init {
        if config_path.exists() {
            eprintln!("Configuration already exists at {}", config_path.display());
            return Ok(());
        }
        Config::create_sample(&config_path)?;
        println!("Created default configuration at: {}", config_path.display());
        println!("Please edit this file with your indexer URL and API key.");
        return Ok(());
    }

    println!("Configuration file location:");
    println!("  {}", config_path.display());
    println!();

    if config_path.exists() {
        println!("Current configuration:");
        println!("{}", "─".repeat(60));
        let config = Config::from_file(&config_path)?;
        let toml = toml::to_string_pretty(&config.redacted()).map_err(|e| {
            ConfigError::ParseError(format!("Failed to serialize config: {}", e))
        })?;
        println!("{}", toml);
        println!("{}", "─".repeat(60));
    } else {
        println!("Configuration file does not exist yet.");
        println!("Run 'newznab config --init' to create it with default values.");
    }

    Ok(())
}
