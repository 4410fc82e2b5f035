//! `dialog-manager`: serve the dialog tools over stdio or call them once.

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dialog_rs::config::{DialogConfig, LoadOptions};
use dialog_rs::{DialogManager, init_logging, server};
use log::{debug, info};
use serde_json::Value;
use std::path::PathBuf;

/// Command-line options for the dialog manager.
#[derive(Parser)]
#[command(name = "dialog-manager", version, about)]
struct Cli {
    /// Optional path to a dialog.json5 config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Storage directory override
    #[arg(long, global = true)]
    storage: Option<PathBuf>,
    /// Log level override (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Answer line-delimited JSON requests on stdin (default)
    Serve,
    /// Print tool specs as JSON
    Tools,
    /// Invoke one tool and print its result
    Call {
        /// Tool name, e.g. save_dialog
        tool: String,
        /// Tool arguments as a JSON object
        #[arg(long)]
        args: Option<String>,
    },
    /// Read one resource, e.g. dialog://20240101_120000 or dialogs://recent
    Resource { uri: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let loaded = DialogConfig::load(LoadOptions {
        config_path: cli.config.clone(),
        storage_path: cli.storage.clone(),
        log_level: cli.log_level.clone(),
    })
    .context("failed to load config")?;
    init_logging(&loaded.config.logging.level);
    match loaded.source.as_ref() {
        Some(path) => info!("loaded config (path={})", path.display()),
        None => debug!("no config file; using defaults and environment"),
    }

    let manager =
        DialogManager::from_config(loaded.config).context("failed to open dialog storage")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => server::serve_stdio(&manager)
            .await
            .context("dispatcher failed")?,
        Command::Tools => print_json(&serde_json::to_value(manager.tool_specs())?)?,
        Command::Call { tool, args } => {
            let args: Value = match args {
                Some(raw) => serde_json::from_str(&raw).context("--args must be valid JSON")?,
                None => Value::Object(Default::default()),
            };
            match manager.call_tool(&tool, args).await {
                Ok(result) => print_json(&result)?,
                Err(err) => bail!("{tool} failed ({}): {err}", err.kind_str()),
            }
        }
        Command::Resource { uri } => match manager.read_resource(&uri) {
            Ok(contents) => println!("{}", contents.text),
            Err(err) => bail!("{uri} failed ({}): {err}", err.kind_str()),
        },
    }
    Ok(())
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
