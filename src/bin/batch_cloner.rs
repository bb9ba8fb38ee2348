//! Пакетное клонирование голоса: референс + файл сценария -> один аудиофайл
//!
//! Использование:
//!   batch-cloner                                   # examples/script.md, первый аудиофайл из examples/
//!   batch-cloner -r voice.wav -s script.md -o out.wav -l de

use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use voice_cloner::batch::{BatchJob, DEFAULT_OUTPUT_PATH, DEFAULT_REFERENCE_DIR, DEFAULT_SCRIPT_PATH};
use voice_cloner::cli::ModelArgs;
use voice_cloner::tts::lifecycle::load_with_retry;
use voice_cloner::utils::logger::init_logger;
use voice_cloner::XttsModel;

#[derive(Parser, Debug)]
#[command(name = "batch-cloner")]
#[command(about = "Synthesize a script file in a cloned voice with XTTS v2")]
struct Cli {
    /// Референсное аудио (если не указано, берется первый аудиофайл из --reference-dir)
    #[arg(short, long)]
    reference: Option<PathBuf>,

    /// Директория для поиска референса
    #[arg(long, default_value = DEFAULT_REFERENCE_DIR)]
    reference_dir: PathBuf,

    /// Файл сценария (UTF-8, читается целиком)
    #[arg(short, long, default_value = DEFAULT_SCRIPT_PATH)]
    script: PathBuf,

    /// Выходной аудиофайл
    #[arg(short, long, default_value = DEFAULT_OUTPUT_PATH)]
    output: PathBuf,

    /// Код языка
    #[arg(short, long, default_value = "en")]
    language: String,

    #[command(flatten)]
    model: ModelArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logger();
    let cli = Cli::parse();

    let config = cli.model.resolve_config()?;
    let job = BatchJob {
        reference: cli.reference,
        reference_dir: cli.reference_dir,
        script: cli.script,
        output: cli.output,
        language: cli.language,
    };

    let prepared = job.prepare().context("invalid input")?;

    let model = load_with_retry(&config.retry, |_| XttsModel::load(&config.model))
        .await
        .context("failed to load TTS model")?;
    log::info!("Model loaded. Generating speech...");

    let outcome = job.run(&prepared, &model).await.context("synthesis failed")?;
    println!("{}", outcome.summary());
    println!("Output saved to: {}", outcome.output_path.display());

    Ok(())
}
