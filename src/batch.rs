//! Пакетный режим: один референс, один сценарий, один выходной файл
//!
//! Входные данные проверяются до загрузки модели, чтобы ошибка в пути
//! или пустой сценарий не стоили долгой инициализации.

use std::path::PathBuf;
use crate::error::Result;
use crate::input::{read_script, resolve_reference_audio};
use crate::media::audio::validate_audio_file;
use crate::tts::synthesis::{synthesize_to_file, SynthesisOutcome};
use crate::tts::VoiceCloningModel;

/// Сценарий по умолчанию
pub const DEFAULT_SCRIPT_PATH: &str = "examples/script.md";
/// Директория для поиска референса по умолчанию
pub const DEFAULT_REFERENCE_DIR: &str = "examples";
/// Выходной файл по умолчанию
pub const DEFAULT_OUTPUT_PATH: &str = "doutput/Reel1.wav";

/// Параметры пакетного запуска
#[derive(Debug, Clone)]
pub struct BatchJob {
    /// Явно указанное референсное аудио
    pub reference: Option<PathBuf>,
    /// Где искать референс, если он не указан
    pub reference_dir: PathBuf,
    /// Файл сценария
    pub script: PathBuf,
    /// Куда сохранить результат
    pub output: PathBuf,
    /// Код языка (передается модели без проверки)
    pub language: String,
}

impl Default for BatchJob {
    fn default() -> Self {
        Self {
            reference: None,
            reference_dir: PathBuf::from(DEFAULT_REFERENCE_DIR),
            script: PathBuf::from(DEFAULT_SCRIPT_PATH),
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            language: crate::language::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// Проверенные входные данные
#[derive(Debug, Clone)]
pub struct PreparedBatch {
    pub reference: PathBuf,
    pub text: String,
}

impl BatchJob {
    /// Найти и проверить входные данные
    pub fn prepare(&self) -> Result<PreparedBatch> {
        let reference = resolve_reference_audio(self.reference.as_deref(), &self.reference_dir)?;
        validate_audio_file(&reference)?;

        let text = read_script(&self.script)?;
        log::info!(
            "Loaded script from {} (length: {} chars)",
            self.script.display(),
            text.chars().count()
        );
        log::info!("Using reference audio: {}", reference.display());

        Ok(PreparedBatch { reference, text })
    }

    /// Синтезировать сценарий в выходной файл
    pub async fn run(&self, prepared: &PreparedBatch, model: &dyn VoiceCloningModel) -> Result<SynthesisOutcome> {
        let outcome = synthesize_to_file(
            model,
            &prepared.text,
            &prepared.reference,
            &self.language,
            &self.output,
        )
        .await?;

        log::info!("Done! Output saved to: {}", outcome.output_path.display());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClonerError;
    use crate::test_support::{MockBehavior, MockModel};

    fn job_in(dir: &std::path::Path, script: &str) -> BatchJob {
        std::fs::write(dir.join("script.md"), script).unwrap();
        std::fs::write(dir.join("voice.wav"), b"RIFF").unwrap();
        BatchJob {
            reference: None,
            reference_dir: dir.to_path_buf(),
            script: dir.join("script.md"),
            output: dir.join("out").join("Reel1.wav"),
            language: "en".to_string(),
        }
    }

    #[tokio::test]
    async fn test_whitespace_script_produces_no_output() {
        let temp_dir = tempfile::tempdir().unwrap();
        let job = job_in(temp_dir.path(), "   \n\t\n");

        let err = job.prepare().unwrap_err();
        assert!(matches!(err, ClonerError::EmptyScript(_)));
        assert!(err.to_string().contains("empty"));
        assert!(!job.output.exists());
    }

    #[tokio::test]
    async fn test_hello_world_summary() {
        let temp_dir = tempfile::tempdir().unwrap();
        let job = job_in(temp_dir.path(), "Hello world\n");
        let model = MockModel::new(MockBehavior::WriteBytes(b"RIFFdata".to_vec()));

        let prepared = job.prepare().unwrap();
        assert_eq!(prepared.reference, temp_dir.path().join("voice.wav"));
        assert_eq!(prepared.text, "Hello world");

        let outcome = job.run(&prepared, &model).await.unwrap();
        assert!(job.output.exists());
        assert!(outcome.summary().contains("2 words"));
        assert!(outcome.summary().contains("EN"));
    }

    #[tokio::test]
    async fn test_language_is_passed_through_unvalidated() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut job = job_in(temp_dir.path(), "Hola mundo");
        job.language = "xx-custom".to_string();
        let model = MockModel::new(MockBehavior::WriteBytes(b"RIFFdata".to_vec()));

        let prepared = job.prepare().unwrap();
        job.run(&prepared, &model).await.unwrap();
        assert_eq!(model.last_language().as_deref(), Some("xx-custom"));
    }

    #[tokio::test]
    async fn test_failed_synthesis_is_reported() {
        let temp_dir = tempfile::tempdir().unwrap();
        let job = job_in(temp_dir.path(), "Hello world");
        let model = MockModel::new(MockBehavior::Fail("boom".to_string()));

        let prepared = job.prepare().unwrap();
        let err = job.run(&prepared, &model).await.unwrap_err();
        assert!(matches!(err, ClonerError::Synthesis(_)));
    }

    #[test]
    fn test_reference_with_bad_extension_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let mut job = job_in(temp_dir.path(), "Hello world");
        let notes = temp_dir.path().join("notes.txt");
        std::fs::write(&notes, b"x").unwrap();
        job.reference = Some(notes);

        let err = job.prepare().unwrap_err();
        assert!(matches!(err, ClonerError::UnsupportedFormat { .. }));
    }
}
