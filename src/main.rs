use clap::{Parser, Subcommand};
use log::{error, info};
use std::path::{Path, PathBuf};

use recorded_store::config::StoreConfig;
use recorded_store::credentials::load_credentials;
use recorded_store::db::DbConnection;
use recorded_store::{Dialect, DialectAdapter, DynError, RecordedStore, RECORDED_SCHEMA};

#[derive(Parser, Debug)]
#[command(author, version, about = "Recorded-program persistence for PostgreSQL, MySQL, and SQLite")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect to the configured database and create the recorded table if needed
    Init {
        /// Path to config file (TOML format)
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print the CREATE TABLE statement for a dialect
    Ddl {
        #[arg(short, long, value_enum)]
        dialect: Dialect,
    },
    /// Print the column projection used by every select for a dialect
    Columns {
        #[arg(short, long, value_enum)]
        dialect: Dialect,
    },
    /// Print the dialect-independent schema as JSON
    Describe,
}

fn init(config_path: &Path) -> Result<(), DynError> {
    let config = StoreConfig::load(config_path)?;
    config.validate()?;
    let credentials = load_credentials()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let connection = DbConnection::connect(&config, &credentials).await?;
        let store = RecordedStore::new(connection.dialect(), connection)?;
        store.create().await?;
        info!("Recorded table is ready");
        Ok::<(), DynError>(())
    })
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let result = match args.command {
        Command::Init { config } => init(&config),
        Command::Ddl { dialect } => DialectAdapter::new(dialect, RECORDED_SCHEMA)
            .map(|adapter| println!("{}", adapter.render_create_table()))
            .map_err(DynError::from),
        Command::Columns { dialect } => DialectAdapter::new(dialect, RECORDED_SCHEMA)
            .map(|adapter| println!("{}", adapter.render_column_projection()))
            .map_err(DynError::from),
        Command::Describe => serde_json::to_string_pretty(&serde_json::json!({
            "table": RECORDED_SCHEMA.table_name(),
            "columns": RECORDED_SCHEMA.columns(),
        }))
        .map(|json| println!("{}", json))
        .map_err(DynError::from),
    };

    // The application cannot run without its table, so any failure aborts startup
    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}
