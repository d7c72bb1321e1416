use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use fitroom::app::AppContext;
use fitroom::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new()?;

    match cli.command {
        Commands::Extract { url } => {
            commands::extract(&ctx, &url).await?;
        }
        Commands::Fetch { url, out } => {
            commands::fetch_image(&ctx, &url, &out).await?;
        }
        Commands::Tryon {
            person,
            garment,
            out,
        } => {
            commands::tryon(&ctx, &person, &garment, &out).await?;
        }
    }

    Ok(())
}
