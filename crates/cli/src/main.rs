use std::path::PathBuf;

use anyhow::Context;
use bookshelf_kernel::settings::Settings;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bookshelf", version, about = "Book catalogue CRUD service")]
struct Cli {
    /// Directory holding `base.toml` and `{env}.toml` (defaults to ./config)
    #[arg(long, global = true)]
    config_dir: Option<PathBuf>,

    /// Deployment environment: local, staging or production
    #[arg(long, global = true)]
    env: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Bootstrap the schema and serve the HTTP API (default)
    Serve {
        /// Override the configured listen port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Create the books table if it does not exist, then exit
    Migrate,
    /// Print the HTTP endpoints served by the API
    Routes,
}

fn load_settings(cli: &Cli) -> anyhow::Result<Settings> {
    let settings = Settings::resolve(cli.config_dir.clone(), cli.env.clone())
        .context("failed to load bookshelf settings")?;
    bookshelf_telemetry::init(&settings.telemetry)?;
    Ok(settings)
}

fn print_routes() {
    println!("API Endpoints:");
    for (method, path, summary) in bookshelf_app::modules::books::routes::ENDPOINTS {
        println!(" {:<7}{:<16}- {}", method, path, summary);
    }
}

async fn serve(cli: &Cli, port: Option<u16>) -> anyhow::Result<()> {
    let mut settings = load_settings(cli)?;
    if let Some(port) = port {
        settings.server.port = port;
    }
    bookshelf_app::serve(&settings).await
}

async fn migrate(cli: &Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli)?;
    let pool = bookshelf_app::migrate(&settings).await?;
    pool.close().await;
    tracing::info!(db = %settings.database.url, "schema is up to date");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        None => serve(&cli, None).await,
        Some(Command::Serve { port }) => serve(&cli, *port).await,
        Some(Command::Migrate) => migrate(&cli).await,
        Some(Command::Routes) => {
            print_routes();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["bookshelf"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn serve_accepts_port_override() {
        let cli = Cli::try_parse_from(["bookshelf", "serve", "--port", "9001"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Serve { port: Some(9001) })));
    }

    #[test]
    fn global_flags_follow_subcommands() {
        let cli =
            Cli::try_parse_from(["bookshelf", "migrate", "--env", "staging"]).unwrap();
        assert_eq!(cli.env.as_deref(), Some("staging"));
        assert!(matches!(cli.command, Some(Command::Migrate)));
    }
}
