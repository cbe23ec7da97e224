//! `openerp-migrate` — run the pre-migration repairs on a database file.
//!
//! Usage:
//!   openerp-migrate <db-path> [--config <toml>] [--installed-version <v>] [-o table|json]
//!
//! Without `--installed-version` the version is read from the database;
//! a database with no installed `base` module is left untouched.

use std::path::{Path, PathBuf};

use clap::Parser;
use migration::{MigrationConfig, MigrationReport};
use openerp_sql::SqliteStore;
use tracing::info;

/// OpenERP pre-migration repairs.
#[derive(Parser, Debug)]
#[command(name = "openerp-migrate", about = "Run pre-migration database repairs")]
struct Cli {
    /// Path to the SQLite database.
    db: PathBuf,

    /// Repair settings (TOML). Defaults apply if omitted or missing.
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Version being upgraded from. Read from `ir_module_module` if omitted.
    #[arg(long = "installed-version")]
    installed_version: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', default_value = "table")]
    output: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let report = run(&cli)?;
    println!("{}", render(&report, &cli.output)?);
    Ok(())
}

fn run(cli: &Cli) -> anyhow::Result<MigrationReport> {
    if !cli.db.exists() {
        anyhow::bail!("database {} does not exist", cli.db.display());
    }

    let config = match &cli.config {
        Some(path) => MigrationConfig::load(path)?,
        None => MigrationConfig::default(),
    };

    let db = open(&cli.db)?;
    let installed = match &cli.installed_version {
        Some(v) => Some(v.clone()),
        None => migration::detect_installed_version(&db)?,
    };
    match &installed {
        Some(v) => info!("Installed version: {}", v),
        None => info!("No installed version found in {}", cli.db.display()),
    }

    Ok(migration::run_pre_migration(&db, installed.as_deref(), &config)?)
}

fn open(path: &Path) -> anyhow::Result<SqliteStore> {
    SqliteStore::open(path).map_err(|e| anyhow::anyhow!("failed to open {}: {}", path.display(), e))
}

fn render(report: &MigrationReport, output: &str) -> anyhow::Result<String> {
    match output {
        "json" => Ok(serde_json::to_string_pretty(report)?),
        "table" => {
            let mut out = format!("{:<28} {:>8}  {}\n", "STEP", "AFFECTED", "STATUS");
            for step in &report.steps {
                let status = if step.skipped { "skipped" } else { "done" };
                out.push_str(&format!("{:<28} {:>8}  {}\n", step.name, step.affected, status));
            }
            out.push_str(&format!("{:<28} {:>8}", "TOTAL", report.total_affected()));
            Ok(out)
        }
        other => anyhow::bail!("unknown output format: {}", other),
    }
}
