//! Обработчик запроса на клонирование голоса из веб-интерфейса
//!
//! Линейный конвейер: проверка текста -> проверка референса -> синтез ->
//! проверка результата -> отчет. Сбой любого этапа завершает конвейер
//! сообщением вместо аудиофайла; этапы не повторяются.

use std::path::PathBuf;
use std::sync::Arc;
use serde::Serialize;
use tokio::sync::Mutex;
use crate::error::{ClonerError, Result};
use crate::language;
use crate::media::audio::process_reference_audio;
use crate::progress::{ProcessStep, ProgressTracker};
use crate::tts::synthesis::synthesize_to_file;
use crate::tts::VoiceCloningModel;
use crate::utils::temp::OutputFileManager;

/// Минимальная длина текста (после обрезки пробелов)
pub const MIN_TEXT_CHARS: usize = 5;
/// Максимальная длина текста
pub const MAX_TEXT_CHARS: usize = 1000;

/// Данные одной отправки формы
#[derive(Debug, Clone)]
pub struct CloneRequest {
    /// Загруженное референсное аудио
    pub reference_audio: Option<PathBuf>,
    /// Текст для озвучивания
    pub text: String,
    /// Код языка
    pub language: String,
}

/// Ответ для пользователя: аудиофайл (если получилось) и статус
#[derive(Debug, Clone, Serialize)]
pub struct CloneResult {
    pub audio_path: Option<PathBuf>,
    pub status: String,
}

impl CloneResult {
    pub fn is_success(&self) -> bool {
        self.audio_path.is_some()
    }
}

/// Проверить длину текста и вернуть его без пробелов по краям
pub fn validate_text(text: &str) -> Result<&str> {
    let trimmed = text.trim();
    if trimmed.chars().count() < MIN_TEXT_CHARS {
        return Err(ClonerError::TextTooShort { min: MIN_TEXT_CHARS });
    }
    if text.chars().count() > MAX_TEXT_CHARS {
        return Err(ClonerError::TextTooLong { max: MAX_TEXT_CHARS });
    }
    Ok(trimmed)
}

/// Клонирование голоса поверх общей модели
///
/// Модель передается снаружи и разделяется между запросами; вызовы синтеза
/// выполняются строго по одному.
pub struct VoiceCloner {
    model: Arc<dyn VoiceCloningModel>,
    files: OutputFileManager,
    synthesis_lock: Mutex<()>,
}

impl VoiceCloner {
    pub fn new(model: Arc<dyn VoiceCloningModel>, files: OutputFileManager) -> Self {
        Self {
            model,
            files,
            synthesis_lock: Mutex::new(()),
        }
    }

    /// Менеджер выходных файлов
    pub fn files(&self) -> &OutputFileManager {
        &self.files
    }

    /// Выполнить запрос, сообщая о прогрессе через `tracker`
    pub async fn clone_voice(&self, request: &CloneRequest, tracker: &ProgressTracker) -> CloneResult {
        match self.run_pipeline(request, tracker).await {
            Ok((audio_path, status)) => {
                tracker.complete(Some(status.clone()));
                CloneResult {
                    audio_path: Some(audio_path),
                    status,
                }
            }
            Err(e) => {
                let status = e.to_string();
                log::warn!("Voice cloning request failed: {}", status);
                tracker.fail(status.clone());
                CloneResult {
                    audio_path: None,
                    status,
                }
            }
        }
    }

    async fn run_pipeline(&self, request: &CloneRequest, tracker: &ProgressTracker) -> Result<(PathBuf, String)> {
        tracker.set_step(ProcessStep::ValidatingInputs);
        let reference = request
            .reference_audio
            .clone()
            .ok_or(ClonerError::MissingReference)?;
        let text = validate_text(&request.text)?;
        if !language::is_supported(&request.language) {
            return Err(ClonerError::UnsupportedLanguage(request.language.clone()));
        }

        tracker.set_step(ProcessStep::ProcessingAudio);
        // Декодирование аудио блокирующее
        let processed = tokio::task::spawn_blocking(move || process_reference_audio(&reference))
            .await
            .map_err(|e| ClonerError::AudioDecoding(e.to_string()))??;

        tracker.set_step(ProcessStep::GeneratingSpeech);
        let output_path = self.files.allocate_output("cloned", "wav");
        let mut outcome = {
            let _guard = self.synthesis_lock.lock().await;
            synthesize_to_file(
                self.model.as_ref(),
                text,
                &processed.path,
                &request.language,
                &output_path,
            )
            .await?
        };
        // Модель получает обрезанный текст, а отчет считает введенный как есть
        outcome.word_count = request.text.split_whitespace().count();
        outcome.char_count = request.text.chars().count();

        tracker.set_step(ProcessStep::Finalizing);
        let status = format!(
            "Voice cloning successful!\n{}\n{}\nAudio ready for playback!",
            outcome.summary(),
            processed.status
        );

        Ok((outcome.output_path, status))
    }
}
