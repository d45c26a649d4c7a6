use clap::{Parser, Subcommand};
use std::net::SocketAddr;

use caption_maker::store::{UploadStore, DEFAULT_UPLOAD_DIR};
use caption_maker::telemetry::{init_tracing, DEFAULT_LOG_FILE};
use caption_maker::web::{create_router, AppState};
use caption_maker::{CaptionMaker, ParserOptions, Settings};

#[derive(Parser, Debug)]
#[command(name = "caption-maker", version, about)]
struct Cli {
    /// Append log events to this file
    #[arg(long, global = true, default_value = DEFAULT_LOG_FILE)]
    log_file: String,

    /// Also ask for, and parse, a single main caption
    #[arg(long, global = true)]
    main_caption: bool,

    /// Directory where uploaded images are kept
    #[arg(long, global = true, default_value = DEFAULT_UPLOAD_DIR)]
    upload_dir: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the web tool
    Serve {
        #[arg(long, env = "CAPTION_ADDR", default_value = "127.0.0.1:8501")]
        addr: SocketAddr,
    },
    /// Caption a single image and print the result
    Describe {
        #[arg(value_name = "FILE")]
        input: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG and GROQ_API_KEY may come from .env
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(&cli.log_file)?;

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    let options = ParserOptions::new().with_main_caption(cli.main_caption);
    let store = UploadStore::local(&cli.upload_dir)?;
    let maker = CaptionMaker::with_store(settings.build_client(options), options, store);

    match cli.command {
        Command::Serve { addr } => {
            let app = create_router(AppState::new(maker)?);
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Command::Describe { input, json } => {
            let input = input.trim().to_string();
            if !std::path::Path::new(&input).exists() {
                return Err(format!("Error: File '{}' not found", input).into());
            }

            let set = match maker.caption_file(&input).await {
                Ok(set) => set,
                Err(e) => {
                    eprintln!("Error: Unable to caption '{}'. {}", input, e);
                    std::process::exit(1);
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                println!("Description: {}", set.description);
                if let Some(main) = &set.main_caption {
                    println!("Main Caption: {}", main);
                }
                println!("Captions:");
                for (idx, caption) in set.captions.iter().enumerate() {
                    println!("{}. {}", idx + 1, caption);
                }
            }
        }
    }

    Ok(())
}
