// Puzzle pack generator: cuts an uploaded image into printable puzzle pieces.
//
//   puzzle-pack serve                      start the /generate server
//   puzzle-pack upload photo.jpg --save pack.zip

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use puzzle_pack::config::{
    ClientConfig, ServerConfig, DEFAULT_BIND, DEFAULT_OUTPUT_DIR, DEFAULT_PIECES,
    DEFAULT_SERVER_URL,
};
use puzzle_pack::console::ConsoleSurface;
use puzzle_pack::server;
use puzzle_pack::widget::{ReqwestTransport, UploadController, PIECES_FIELD};

#[derive(Parser)]
#[command(name = "puzzle-pack", version, about = "Turn an image into a printable puzzle pack")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the generate server
    Serve {
        #[arg(long, env = "PUZZLE_BIND", default_value = DEFAULT_BIND)]
        bind: SocketAddr,

        /// Directory generated packs are written to
        #[arg(long, env = "PUZZLE_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
        output_dir: PathBuf,
    },
    /// Upload an image to a running server
    Upload {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,

        #[arg(long, default_value_t = DEFAULT_PIECES)]
        pieces: u32,

        #[arg(long, env = "PUZZLE_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
        server: String,

        /// Download the finished pack to this path
        #[arg(long, value_name = "FILE")]
        save: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("puzzle_pack=info,tower_http=info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false))
        .init();
}

async fn upload(
    image: PathBuf,
    save: Option<PathBuf>,
    config: ClientConfig,
) -> anyhow::Result<()> {
    let transport = ReqwestTransport::new(&config.server_url)?;
    let mut controller = UploadController::new(transport, ConsoleSurface::new(image));
    controller
        .fields_mut()
        .set(PIECES_FIELD, config.pieces.to_string());

    controller.click().await?;
    let link = controller.submit().await?;

    if let Some(dest) = save {
        let written = controller
            .transport()
            .download(&link, &dest)
            .await
            .with_context(|| format!("downloading {link}"))?;
        info!(bytes = written, "💾 saved {}", dest.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { bind, output_dir } => {
            server::serve(ServerConfig { bind, output_dir }).await
        }
        Commands::Upload {
            image,
            pieces,
            server,
            save,
        } => {
            let config = ClientConfig {
                server_url: server,
                pieces,
            };
            upload(image, save, config).await
        }
    }
}
