use clap::Parser;
use recipeshare::config::setup_logging;
use recipeshare::web::AppState;
use sea_orm_migration::MigratorTrait;
use tracing::error;

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = recipeshare::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let db = match recipeshare::db::connect_db(&cli.database_path).await {
        Ok(db) => db,
        Err(err) => {
            error!("Database connection error: {}", err);
            return;
        }
    };

    if let Err(err) = recipeshare::db::migrations::Migrator::up(&db, None).await {
        error!("Database migration error: {}", err);
        return;
    }

    let state = match AppState::from_cli(&cli, db) {
        Ok(state) => state,
        Err(err) => {
            error!("Failed to configure services: {}", err);
            return;
        }
    };

    if let Err(err) =
        recipeshare::web::setup_server(&cli.listen_address, cli.port, state).await
    {
        error!("Application error: {}", err);
    }
}
