mod sink;
mod table;

use std::path::PathBuf;
use std::sync::Mutex;

use clap::{Args, Parser, Subcommand};
use export_manager::config::{ConfigError, GatewayConfig};
use export_manager::format::{format_count, subtype_label};
use export_manager::gateway::HttpGateway;
use export_manager::model::ParseError;
use export_manager::session::{SessionError, StaticTokenProvider};
use export_manager::workflow::driver::{self, ArtifactSink, SinkError};
use export_manager::{ExportDate, ExportWorkflow, Gateway, GatewayError, Module, Shell, Subtype};

use crate::sink::DirectorySink;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Parse(#[from] ParseError),
    #[error("sign-in failed: {0}")]
    Session(#[from] SessionError),
    #[error("backend request failed: {0}")]
    Gateway(#[from] GatewayError),
    #[error("{0}")]
    Sink(#[from] SinkError),
    #[error("MNRL exports need --type normal|reactivated")]
    MissingSubtype,
    #[error("--type only applies to MNRL exports")]
    UnexpectedSubtype,
    #[error("export failed: {0}")]
    Export(String),
}

#[derive(Parser, Debug)]
#[command(name = "export-cli", about = "FRI/MNRL data export CLI")]
struct Cli {
    /// Backend base URL; falls back to `EXPORT_API_BASE_URL` via config.
    #[arg(long, env = "EXPORT_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "EXPORT_API_TOKEN")]
    token: Option<String>,

    #[arg(long, env = "EXPORT_USER", default_value = "cli")]
    user: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record count for a date (both lanes for MNRL).
    Count(DateArgs),
    /// Generate, save locally, and persist a spreadsheet.
    Export(ExportArgs),
    /// Saved exports for a module, newest as the backend orders them.
    List {
        #[arg(long, value_parser = parse_module)]
        module: Module,
    },
    /// Download a saved export by id.
    Download {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

#[derive(Args, Debug)]
struct DateArgs {
    #[arg(long, value_parser = parse_module)]
    module: Module,
    #[arg(long, value_parser = parse_date)]
    date: ExportDate,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    target: DateArgs,
    #[arg(long = "type", value_parser = parse_subtype)]
    data_type: Option<Subtype>,
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
}

fn parse_module(raw: &str) -> Result<Module, ParseError> {
    raw.parse()
}

fn parse_subtype(raw: &str) -> Result<Subtype, ParseError> {
    raw.parse()
}

fn parse_date(raw: &str) -> Result<ExportDate, ParseError> {
    ExportDate::parse(raw)
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = GatewayConfig::from_env()?;
    if let Some(base_url) = cli.base_url.as_deref() {
        config = config.with_base_url(base_url);
    }
    let gateway = HttpGateway::new(&config)?;

    let provider = match cli.token {
        Some(token) => StaticTokenProvider::new(token, cli.user),
        None => StaticTokenProvider::anonymous(),
    };
    let mut shell = Shell::new(provider);
    if !shell.restore().await? {
        tracing::debug!("no token configured; calling backend anonymously");
    }
    let token = shell.token();

    match cli.command {
        Command::Count(args) => run_count(&gateway, token, args).await,
        Command::Export(args) => run_export(&gateway, token, args).await,
        Command::List { module } => run_list(&gateway, token, module).await,
        Command::Download { id, name, out_dir } => run_download(&gateway, token, &id, &name, out_dir).await,
    }
}

async fn run_count(gateway: &HttpGateway, token: Option<&str>, args: DateArgs) -> Result<(), CliError> {
    let counts = driver::fetch_counts(gateway, args.module, args.date, token).await?;
    for (data_type, count) in args.module.lanes().iter().zip(counts) {
        match data_type {
            Some(subtype) => println!("{:<12} {}", subtype_label(Some(*subtype)), format_count(count)),
            None => println!("{}", format_count(count)),
        }
    }
    Ok(())
}

async fn run_export(gateway: &HttpGateway, token: Option<&str>, args: ExportArgs) -> Result<(), CliError> {
    let module = args.target.module;
    match (module, args.data_type) {
        (Module::Mnrl, None) => return Err(CliError::MissingSubtype),
        (Module::Fri, Some(_)) => return Err(CliError::UnexpectedSubtype),
        _ => {}
    }

    let cell = Mutex::new(ExportWorkflow::new(module, args.target.date));
    let sink = DirectorySink::new(args.out_dir);
    let banner = driver::trigger_export(&cell, gateway, &sink, token, args.data_type).await;

    let workflow = cell.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner);
    if banner.is_none() {
        let message = workflow
            .notices()
            .problem()
            .map_or_else(|| "export did not start".to_owned(), |n| n.message.clone());
        return Err(CliError::Export(message));
    }
    if let (Some(record), Some(path)) = (workflow.files().first(), sink.written().last()) {
        eprintln!("saved {} as {}", path.display(), record.id);
    }
    if let Some(success) = workflow.notices().success() {
        println!("{}", success.message);
    }
    Ok(())
}

async fn run_list(gateway: &HttpGateway, token: Option<&str>, module: Module) -> Result<(), CliError> {
    let records = gateway.list_exports(module, token).await?;
    if records.is_empty() {
        eprintln!("no saved {module} exports");
        return Ok(());
    }
    print!("{}", table::render(module, &records));
    Ok(())
}

async fn run_download(
    gateway: &HttpGateway,
    token: Option<&str>,
    id: &str,
    name: &str,
    out_dir: PathBuf,
) -> Result<(), CliError> {
    let bytes = gateway.download_export(id, token).await?;
    let sink = DirectorySink::new(out_dir);
    sink.deliver(name, &bytes)?;
    if let Some(path) = sink.written().last() {
        println!("{}", path.display());
    }
    Ok(())
}
