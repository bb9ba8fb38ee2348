//! Основной файл библиотеки voice-cloner
//!
//! Библиотека предоставляет инструменты для клонирования голоса моделью XTTS v2:
//! пакетный режим (один сценарий - один файл) и веб-интерфейс с отслеживанием
//! прогресса. Сама модель - внешняя зависимость, доступная через
//! [`tts::VoiceCloningModel`].

pub mod batch;
pub mod cli;
pub mod cloner;
pub mod config;
pub mod error;
pub mod input;
pub mod language;
pub mod media;
pub mod notification;
pub mod progress;
pub mod server;
pub mod tts;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use crate::cloner::{CloneRequest, CloneResult, VoiceCloner};
pub use crate::config::ClonerConfig;
pub use crate::error::{ClonerError, ModelError, Result};
pub use crate::tts::xtts::XttsModel;
pub use crate::tts::VoiceCloningModel;
