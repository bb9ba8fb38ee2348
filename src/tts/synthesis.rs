//! Вызов синтеза и проверка результата

use std::path::{Path, PathBuf};
use crate::error::{ClonerError, Result};
use super::{SynthesisRequest, VoiceCloningModel};

/// Результат успешного синтеза
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutcome {
    /// Путь к созданному аудиофайлу
    pub output_path: PathBuf,
    /// Количество слов в тексте
    pub word_count: usize,
    /// Количество символов в тексте
    pub char_count: usize,
    /// Код языка
    pub language: String,
}

impl SynthesisOutcome {
    /// Краткая сводка для пользователя
    pub fn summary(&self) -> String {
        format!(
            "Generated {} words ({} characters)\nLanguage: {}",
            self.word_count,
            self.char_count,
            self.language.to_uppercase()
        )
    }
}

/// Синтезировать речь и убедиться, что файл создан и не пуст
///
/// Ошибка модели или пустой результат возвращаются как ошибка; повторов нет.
pub async fn synthesize_to_file(
    model: &dyn VoiceCloningModel,
    text: &str,
    reference: &Path,
    language: &str,
    output_path: &Path,
) -> Result<SynthesisOutcome> {
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    log::info!(
        "Generating speech with {} ({} chars, language {})",
        model.name(),
        text.chars().count(),
        language
    );

    let request = SynthesisRequest {
        text,
        speaker_wav: reference,
        language,
        output_path,
    };
    model.synthesize(&request).await.map_err(|e| {
        log::error!("Voice cloning error: {}", e);
        ClonerError::Synthesis(e.to_string())
    })?;

    match tokio::fs::metadata(output_path).await {
        Ok(metadata) if metadata.len() > 0 => {}
        _ => {
            log::error!("Model reported success but {} is missing or empty", output_path.display());
            return Err(ClonerError::EmptyOutput(output_path.to_path_buf()));
        }
    }

    Ok(SynthesisOutcome {
        output_path: output_path.to_path_buf(),
        word_count: text.split_whitespace().count(),
        char_count: text.chars().count(),
        language: language.to_string(),
    })
}
