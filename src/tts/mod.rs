//! Модуль для работы с моделью клонирования голоса
//!
//! Сама нейросеть - внешняя зависимость. Здесь описан узкий интерфейс
//! к ней, загрузка с повторами и вызов синтеза с проверкой результата.

pub mod lifecycle;
pub mod synthesis;
pub mod xtts;

use std::path::Path;
use async_trait::async_trait;
use crate::error::ModelResult;

/// Запрос на синтез речи
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    /// Текст для озвучивания
    pub text: &'a str,
    /// Референсная запись целевого голоса
    pub speaker_wav: &'a Path,
    /// Код языка
    pub language: &'a str,
    /// Куда записать результат
    pub output_path: &'a Path,
}

/// Загруженная модель клонирования голоса
#[async_trait]
pub trait VoiceCloningModel: Send + Sync {
    /// Название модели для логов
    fn name(&self) -> &str;

    /// Синтезировать речь и записать аудиофайл по `request.output_path`
    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> ModelResult<()>;
}
