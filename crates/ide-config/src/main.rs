//! `ide-config` command-line entry point.
//!
//! Resolves the IDE's UI configuration the way the IDE does at startup and
//! prints it, or reads and writes single key-paths.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_settings()          -- storage file, namespace, query prefix, log level
//!  └─ init tracing
//!  └─ ConfigStore::new()
//!       ├─ NamespacedStore<FileBackend | MemoryBackend>
//!       └─ UrlQuery (--query)
//!  └─ run command
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use ide_config::application::resolve_config::{ConfigStore, PersistedStore};
use ide_config::infrastructure::query::UrlQuery;
use ide_config::infrastructure::storage::settings::settings_file_path;
use ide_config::infrastructure::storage::{
    load_settings, save_settings, FileBackend, MemoryBackend, NamespacedStore, Settings,
};
use ide_config_core::{key_paths, Profile, Style, WriteOutcome, DEFAULT_PROFILE};

/// Inspect and edit the IDE's layered UI configuration
#[derive(Parser, Debug)]
#[command(name = "ide-config")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long = "settings", value_name = "FILE")]
    settings: Option<PathBuf>,

    /// Page URL or query string carrying `config.*` overrides
    #[arg(long = "query", env = "IDE_CONFIG_QUERY", value_name = "URL-OR-QUERY")]
    query: Option<String>,

    /// JSON file holding persisted overrides
    #[arg(long = "storage-file", env = "IDE_CONFIG_STORAGE", value_name = "FILE")]
    storage_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the resolved configuration as JSON
    Show,

    /// Print the value at a key-path
    Get {
        /// Dotted key-path, e.g. `appOptions.ioLayout`
        key: String,
    },

    /// Write a key-path and print the value actually stored
    Set {
        key: String,
        /// JSON value; anything that is not valid JSON is taken as a string
        value: String,
        /// Also write the value to persisted storage
        #[arg(long)]
        persist: bool,
    },

    /// Remove a persisted override
    Unset { key: String },

    /// Print the overrides loaded from the query string and storage
    Loaded,

    /// List every leaf key-path of the configuration
    Keys,

    /// Print a built-in style profile
    Profile {
        /// `default`, `minimal`, `standalone`, `electron` or `puter`
        style: String,
    },

    /// Write the current settings to the settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

type Store = ConfigStore<Box<dyn PersistedStore>, UrlQuery>;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.settings.as_deref()).context("failed to load settings")?;

    // `RUST_LOG` wins over the settings file.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&settings.log_level))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    debug!(?settings, "settings loaded");

    if let Commands::Init { force } = cli.command {
        return init_settings(cli.settings.as_deref(), &settings, force);
    }

    let mut store = build_store(&cli, &settings);
    for key in store.unknown_query_keys() {
        warn!(%key, "query parameter names no configuration key; ignored");
    }

    run(cli.command, &mut store)
}

fn build_store(cli: &Cli, settings: &Settings) -> Store {
    let namespace = settings.storage.namespace.clone();
    let storage: Box<dyn PersistedStore> =
        match cli
            .storage_file
            .clone()
            .or_else(|| settings.storage_file(cli.settings.as_deref()))
        {
            Some(path) => {
                debug!(path = %path.display(), "using file storage");
                Box::new(NamespacedStore::new(FileBackend::new(path), namespace))
            }
            None => {
                info!("no storage location available; overrides will not persist");
                Box::new(NamespacedStore::new(MemoryBackend::new(), namespace))
            }
        };
    let query = cli
        .query
        .as_deref()
        .map(UrlQuery::parse)
        .unwrap_or_default();

    ConfigStore::new(storage, query).with_query_prefix(settings.query.prefix.clone())
}

fn run(command: Commands, store: &mut Store) -> Result<()> {
    match command {
        Commands::Show => print_json(&store.get_config().to_value()),
        Commands::Get { key } => print_json(&store.get(&key).unwrap_or(Value::Null)),
        Commands::Set {
            key,
            value,
            persist,
        } => {
            let value = parse_value(&value);
            let (stored, outcome) = store.set_with_outcome(&key, value, persist);
            match outcome {
                WriteOutcome::Rejected => warn!(%key, "value rejected; previous value kept"),
                WriteOutcome::StyleChanged(style) => info!(%style, "style profile applied"),
                WriteOutcome::Unchanged | WriteOutcome::Stored => {}
            }
            print_json(&stored)
        }
        Commands::Unset { key } => {
            store.storage_mut().delete(&key);
            info!(%key, "persisted override removed");
            Ok(())
        }
        Commands::Loaded => print_json(&Value::Object(store.loaded_config().clone())),
        Commands::Keys => {
            for key_path in key_paths(&DEFAULT_PROFILE.to_value(), "") {
                println!("{key_path}");
            }
            Ok(())
        }
        Commands::Profile { style } => {
            let style: Style = style.parse()?;
            print_json(&Profile::builtin(style).to_value())
        }
        Commands::Init { .. } => Ok(()),
    }
}

/// Writes `settings` to `path` (the platform settings file when `None`).
fn init_settings(path: Option<&Path>, settings: &Settings, force: bool) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => settings_file_path().context("failed to locate settings file")?,
    };
    if path.exists() && !force {
        anyhow::bail!("{} already exists; pass --force to overwrite", path.display());
    }
    save_settings(settings, Some(&path)).context("failed to write settings")?;
    info!(path = %path.display(), "settings written");
    Ok(())
}

/// Parses a command-line value as JSON, falling back to a plain string.
fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

fn print_json(value: &Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{text}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_value_accepts_json() {
        assert_eq!(parse_value("false"), json!(false));
        assert_eq!(parse_value("{\"a\":1}"), json!({"a": 1}));
    }

    #[test]
    fn test_parse_value_falls_back_to_string() {
        assert_eq!(parse_value("dark"), json!("dark"));
    }

    #[test]
    fn test_init_writes_settings_once_unless_forced() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("ide_config_test_{}", uuid::Uuid::new_v4()));
        let path = dir.join("settings.toml");
        let mut settings = Settings::default();
        settings.log_level = "debug".to_string();

        // Act / Assert
        init_settings(Some(&path), &settings, false).expect("first init");
        assert!(init_settings(Some(&path), &Settings::default(), false).is_err());
        assert_eq!(load_settings(Some(&path)).expect("load"), settings);

        init_settings(Some(&path), &Settings::default(), true).expect("forced init");
        assert_eq!(load_settings(Some(&path)).expect("load"), Settings::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_cli_parses_set_with_persist() {
        let cli = Cli::try_parse_from(["ide-config", "set", "theme", "dark", "--persist"])
            .expect("valid arguments");

        match cli.command {
            Commands::Set {
                key,
                value,
                persist,
            } => {
                assert_eq!(key, "theme");
                assert_eq!(value, "dark");
                assert!(persist);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
