use clap::Parser;
use std::sync::Arc;
use tracing::info;

use notepad_app::cli::{run_create, run_list, Cli, Commands};
use notepad_app::logging::{self, LogConfig};
use notepad_app::{browse, AppShell, QueryCacheConfig};
use notepad_client::HttpNoteService;
use notepad_core::NoteService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let _log_guard = logging::init(&LogConfig::from_env())?;

    let service: Arc<dyn NoteService> = Arc::new(HttpNoteService::from_env()?);
    let mut stdout = std::io::stdout();

    match cli.command {
        Commands::List(args) => run_list(service, args, &mut stdout).await?,
        Commands::Create(args) => run_create(service, args, &mut stdout).await?,
        Commands::Browse => {
            println!("{}", browse::HELP);
            let mut shell = AppShell::new(service, QueryCacheConfig::default());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            browse::run(&mut shell, stdin, &mut stdout).await?;
            info!("Browse session ended");
        }
    }

    Ok(())
}
