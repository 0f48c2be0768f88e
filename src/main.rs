use clap::{Parser, Subcommand};
use everest::backend::HttpChatBackend;
use everest::core::config::{self, CliOverrides, ResolvedConfig};
use everest::core::identity::{FileIdentityStore, Identity, IdentityProvider};
use everest::core::language::Language;
use everest::core::state::App;
use everest::core::widget::ChatWidget;
use everest::tui;
use log::warn;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "everest", about = "Everest View property assistant")]
struct Args {
    /// Base URL of the chat backend (the /chat endpoint lives under it)
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Conversation language
    #[arg(short, long, global = true, value_enum)]
    language: Option<Language>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Send one message and print the reply
    Ask {
        message: String,
        /// Play the reply's audio, if any
        #[arg(long)]
        play: bool,
    },
    /// Print the stored session and user ids
    Whoami,
}

fn load_identity() -> Identity {
    match FileIdentityStore::default_location().and_then(|store| store.identity()) {
        Ok(identity) => identity,
        Err(e) => {
            warn!("Identity storage unavailable ({}), using a temporary identity", e);
            Identity::generate()
        }
    }
}

fn build_app(config: &ResolvedConfig) -> App {
    let backend = Arc::new(HttpChatBackend::new(config.backend_url.clone()));
    App::from_config(backend, load_identity(), config)
}

async fn ask(config: &ResolvedConfig, message: &str, play: bool) -> std::io::Result<()> {
    let mut widget = ChatWidget::new(build_app(config));
    widget.open();

    let Some(reply) = widget.send_message(message).await.cloned() else {
        eprintln!("Nothing to send: message is empty");
        return Ok(());
    };
    println!("{}", reply.content);

    if play && !widget.play_audio(reply.audio_base64.as_deref()).await {
        eprintln!("(no audio played)");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to everest.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("everest.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().map_err(std::io::Error::other)?;
    let cli = CliOverrides {
        backend_url: args.backend_url,
        language: args.language,
    };
    let resolved = config::resolve(&file_config, &cli);

    log::info!(
        "Everest starting up: backend={}, language={}",
        resolved.backend_url,
        resolved.language
    );

    match args.command {
        Some(Command::Ask { message, play }) => ask(&resolved, &message, play).await,
        Some(Command::Whoami) => {
            let identity = load_identity();
            println!("session: {}", identity.session_id);
            println!("user:    {}", identity.user_id);
            Ok(())
        }
        None => tui::run(build_app(&resolved)),
    }
}
