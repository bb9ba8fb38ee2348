//! Модуль обработки ошибок библиотеки voice-cloner
//!
//! Текст каждой ошибки (`Display`) предназначен для пользователя: и пакетный
//! режим, и веб-интерфейс показывают его как есть.

use std::path::PathBuf;
use thiserror::Error;

/// Ошибки подготовки входных данных и синтеза
#[derive(Debug, Error)]
pub enum ClonerError {
    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Референсное аудио не загружено
    #[error("Please upload a reference audio file!")]
    MissingReference,

    /// Референсное аудио не найдено
    #[error("Reference audio not found: {}", .0.display())]
    ReferenceNotFound(PathBuf),

    /// Директория для поиска референса не найдена
    #[error("Reference directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// В директории нет аудиофайлов
    #[error("No audio files found in {}", .0.display())]
    NoAudioFiles(PathBuf),

    /// Файл сценария не найден
    #[error("Script file not found: {}", .0.display())]
    ScriptNotFound(PathBuf),

    /// Файл сценария пуст
    #[error("Script file is empty: {}", .0.display())]
    EmptyScript(PathBuf),

    /// Слишком короткий текст
    #[error("Please enter text (at least {min} characters)!")]
    TextTooShort { min: usize },

    /// Слишком длинный текст
    #[error("Text too long! Please keep it under {max} characters.")]
    TextTooLong { max: usize },

    /// Язык не поддерживается моделью
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// Файл больше допустимого размера
    #[error("File too large ({size_mb:.1}MB). Max size: {max_mb}MB")]
    FileTooLarge { size_mb: f64, max_mb: u64 },

    /// Неверный формат
    #[error("Unsupported format: {extension}. Use: {allowed}")]
    UnsupportedFormat { extension: String, allowed: String },

    /// Не удалось прочитать аудио
    #[error("Error reading audio: {0}")]
    AudioDecoding(String),

    /// Слишком короткая запись
    #[error("Audio too short ({duration:.1}s)! Use 3-30 seconds for best results.")]
    AudioTooShort { duration: f64 },

    /// Слишком длинная запись
    #[error("Audio too long ({duration:.1}s)! Use 3-30 seconds for best results.")]
    AudioTooLong { duration: f64 },

    /// Ошибка модели при загрузке
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Ошибка генерации речи
    #[error("Error during voice generation: {0}")]
    Synthesis(String),

    /// Модель не создала выходной файл
    #[error("Failed to generate audio: {} is missing or empty. Please try again.", .0.display())]
    EmptyOutput(PathBuf),

    /// Ошибка конфигурации
    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Ошибки внешней модели клонирования голоса
#[derive(Debug, Error)]
pub enum ModelError {
    /// Ошибка HTTP запроса
    #[error("Model server request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Ошибка ввода-вывода
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Сервер модели ответил ошибкой
    #[error("Model server returned {status}: {body}")]
    Request { status: u16, body: String },

    /// Сервер модели недоступен
    #[error("Model server unavailable: {0}")]
    Unavailable(String),

    /// Не удалось запустить сервер модели
    #[error("Failed to start model server: {0}")]
    Startup(String),

    /// Все попытки загрузки исчерпаны
    #[error("Failed to load model after {attempts} attempts: {source}")]
    InitializationFailed {
        attempts: u32,
        #[source]
        source: Box<ModelError>,
    },
}

/// Тип Result для библиотеки voice-cloner
pub type Result<T> = std::result::Result<T, ClonerError>;

/// Тип Result для операций с моделью
pub type ModelResult<T> = std::result::Result<T, ModelError>;
