use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    let env_filter = format!("flatsheet={log_level},flatsheet_sync={log_level},flatsheet_store={log_level}");
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    let db = config::database_path(cli.db)?;
    let mut session = commands::open_session(&db).await?;

    match cli.command {
        Commands::Show { format } => commands::show(&session, format).await?,
        Commands::AddRow => commands::add_row(&mut session).await?,
        Commands::AddColumn { name } => commands::add_column(&mut session, name).await?,
        Commands::Set { row, column, value } => {
            commands::set(&mut session, row, &column, value).await?
        }
        Commands::DestroyRow { row } => commands::destroy_row(&mut session, row, cli.yes).await?,
        Commands::DestroyColumn { column } => {
            commands::destroy_column(&mut session, &column, cli.yes).await?
        }
        Commands::Reset => commands::reset(&mut session, cli.yes).await?,
    }

    Ok(())
}
