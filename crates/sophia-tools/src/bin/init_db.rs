use tracing::info;

use sophia_db::Database;
use sophia_db::migrations;
use sophia_tools::config::DbConfig;

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    sophia_tools::init_logging("sophia_tools=info,sophia_db=info");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = DbConfig::from_env(&args)?;

    if config.print_schema {
        println!("{}", migrations::SCHEMA_V1.trim());
        return Ok(());
    }

    let db = Database::open(&config.db_path)?;
    let version = db.with_conn(migrations::current_version)?;

    info!("Schema at version {} in {}", version, config.db_path.display());
    Ok(())
}
