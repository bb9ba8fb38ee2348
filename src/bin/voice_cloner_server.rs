//! Веб-интерфейс клонирования голоса
//!
//! Модель загружается один раз при старте (с повторами); если загрузить ее
//! не удалось, сервер не запускается.

use std::path::PathBuf;
use std::sync::Arc;
use anyhow::Context;
use clap::Parser;
use voice_cloner::cli::ModelArgs;
use voice_cloner::server;
use voice_cloner::tts::lifecycle::load_with_retry;
use voice_cloner::utils::logger::init_logger;
use voice_cloner::utils::temp::OutputFileManager;
use voice_cloner::{VoiceCloner, VoiceCloningModel, XttsModel};

#[derive(Parser, Debug)]
#[command(name = "voice-cloner-server")]
#[command(about = "Web interface for XTTS v2 voice cloning")]
struct Cli {
    /// Адрес для прослушивания
    #[arg(long)]
    host: Option<String>,

    /// Порт
    #[arg(long)]
    port: Option<u16>,

    /// Директория для сгенерированных файлов
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Не публиковать интерфейс для других машин
    #[arg(long)]
    no_share: bool,

    #[command(flatten)]
    model: ModelArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let cli = Cli::parse();

    let mut config = cli.model.resolve_config()?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(output_dir) = cli.output_dir {
        config.server.output_dir = output_dir;
    }
    if cli.no_share {
        config.server.share = false;
    }

    log::info!("XTTS Voice Cloner - web interface");

    let model = load_with_retry(&config.retry, |_| XttsModel::load(&config.model))
        .await
        .context("failed to load TTS model, server not started")?;
    let model: Arc<dyn VoiceCloningModel> = Arc::new(model);
    log::info!("Voice cloner ready!");

    let files = OutputFileManager::new(&config.server.output_dir)
        .with_context(|| format!("failed to prepare {}", config.server.output_dir.display()))?;
    let cloner = Arc::new(VoiceCloner::new(model, files));

    server::serve(&config.server, cloner)
        .await
        .context("server terminated unexpectedly")
}
