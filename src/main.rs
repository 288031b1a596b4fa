use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::runtime::Runtime;

use cuentas::cli::Output;
use cuentas::extract::{GeminiClient, VisionBackend, mime_for_path};
use cuentas::{BillLedger, ConfigLoader, CuentasError, ReceiptExtractor};

#[derive(Parser)]
#[command(name = "cuentas")]
#[command(version, about = "AI-powered receipt scanning and fair bill splitting")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, short, global = true)]
    verbose: bool,

    #[arg(long, short, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a receipt image and extract its line items
    Scan {
        /// Path to the receipt photo
        image: PathBuf,

        #[arg(long, help = "Use exactly this model, skipping the candidate roster")]
        model: Option<String>,

        #[arg(long, value_enum, default_value = "table", help = "Output format")]
        format: Format,

        #[arg(long, help = "Send the original bytes without downscaling")]
        no_normalize: bool,
    },

    /// List the models the backend currently serves, in roster order
    Models,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration (merged from all sources)
    Show,
    /// Show configuration file paths
    Path,
    /// Write the default configuration file
    Init {
        #[arg(long, help = "Overwrite existing config")]
        force: bool,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

/// Set up panic handler for graceful error reporting
fn setup_panic_handler() {
    let default_hook = std::panic::take_hook();

    std::panic::set_hook(Box::new(move |panic_info| {
        let message = if let Some(s) = panic_info.payload().downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.payload().downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        };

        eprintln!();
        eprintln!("{}", console::style("cuentas hit an unexpected error:").red().bold());
        eprintln!("  {}", message);

        if let Some(location) = panic_info.location() {
            eprintln!(
                "{}",
                console::style(format!(
                    "Location: {}:{}:{}",
                    location.file(),
                    location.line(),
                    location.column()
                ))
                .dim()
            );
        }

        // Default hook prints the backtrace when RUST_BACKTRACE=1
        default_hook(panic_info);
    }));
}

fn main() -> ExitCode {
    setup_panic_handler();

    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let out = Output::new();
            match e.downcast_ref::<CuentasError>() {
                Some(ce) => out.failure(ce),
                None => out.failure_message(&e.to_string()),
            }
            ExitCode::FAILURE
        }
    }
}

/// Pipeline logging goes to stderr so tables stay clean on stdout.
/// Quiet silences it entirely; the default only surfaces warnings
/// because `Output` already narrates the user-facing flow.
fn init_tracing(verbose: bool, quiet: bool) {
    let fallback = if verbose {
        "cuentas=debug"
    } else if quiet {
        "off"
    } else {
        "cuentas=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Scan {
            image,
            model,
            format,
            no_normalize,
        } => {
            let rt = Runtime::new()?;
            rt.block_on(run_scan(image, model, format, no_normalize))?;
        }
        Commands::Models => {
            let rt = Runtime::new()?;
            rt.block_on(run_models())?;
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => ConfigLoader::show_config()?,
            ConfigAction::Path => ConfigLoader::show_path(),
            ConfigAction::Init { force } => {
                let path = ConfigLoader::init_global(force)?;
                Output::new().done(&format!("Config written to {}", path.display()));
            }
        },
    }

    Ok(())
}

async fn run_scan(
    image: PathBuf,
    model: Option<String>,
    format: Format,
    no_normalize: bool,
) -> anyhow::Result<()> {
    let out = Output::new();
    let mut config = ConfigLoader::load()?;

    if let Some(model) = model {
        config.extraction.models = vec![model];
        config.extraction.discover_models = false;
    }
    if no_normalize {
        config.image.normalize = false;
    }

    let bytes = std::fs::read(&image)
        .map_err(|e| CuentasError::Input(format!("cannot read {}: {}", image.display(), e)))?;
    let mime = mime_for_path(&image);

    let extractor = ReceiptExtractor::from_env(&config)?;
    out.scanning(&image);
    let items = extractor.scan(&bytes, mime).await?;

    if items.is_empty() {
        // Valid extractor result, but a dead end for the user
        anyhow::bail!("No se encontraron items. Intenta con una foto más clara.");
    }

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        Format::Table => {
            let mut ledger = BillLedger::new();
            ledger.initialize(items);
            out.items_table(&ledger);
            out.settlement_table(&ledger, &ledger.totals());
        }
    }

    Ok(())
}

async fn run_models() -> anyhow::Result<()> {
    let out = Output::new();
    let config = ConfigLoader::load()?;
    let client = GeminiClient::from_env(&config.extraction)?;

    let mut models = client.list_models().await?;
    models.sort_by_key(|m| cuentas::extract::model_priority(&m.name));

    out.heading("Modelos disponibles");
    for model in &models {
        let marker = if model.supports_generation() {
            console::style("✓").green()
        } else {
            console::style("·").dim()
        };
        println!("  {} {}", marker, model.name);
    }

    Ok(())
}
