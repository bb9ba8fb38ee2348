//! Модуль для реализации системы уведомлений
//!
//! Этот модуль предоставляет конкретные реализации наблюдателей для
//! системы прогресса.

use std::sync::Arc;
use parking_lot::Mutex;
use crate::progress::{ProgressInfo, ProgressObserver};

/// Наблюдатель, пишущий прогресс в лог
pub struct LogProgressObserver {
    /// Префикс для вывода (например, идентификатор задачи)
    prefix: Option<String>,
}

impl LogProgressObserver {
    /// Создать новый экземпляр LogProgressObserver
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Создать новый экземпляр LogProgressObserver с префиксом
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self { prefix: Some(prefix.into()) }
    }
}

impl Default for LogProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressObserver for LogProgressObserver {
    fn on_progress_update(&self, progress: ProgressInfo) {
        let prefix = self.prefix.as_deref().map(|p| format!("[{}] ", p)).unwrap_or_default();
        match progress.details {
            Some(details) => log::info!(
                "{}{:.0}% {} ({})",
                prefix,
                progress.progress,
                progress.step,
                details.replace('\n', " | ")
            ),
            None => log::info!("{}{:.0}% {}", prefix, progress.progress, progress.step),
        }
    }
}

/// Наблюдатель, сохраняющий информацию о прогрессе в памяти
#[derive(Clone, Default)]
pub struct MemoryProgressObserver {
    history: Arc<Mutex<Vec<ProgressInfo>>>,
}

impl MemoryProgressObserver {
    /// Создать новый экземпляр MemoryProgressObserver
    pub fn new() -> Self {
        Self::default()
    }

    /// Получить историю обновлений прогресса
    pub fn history(&self) -> Vec<ProgressInfo> {
        self.history.lock().clone()
    }

    /// Последнее обновление
    pub fn last(&self) -> Option<ProgressInfo> {
        self.history.lock().last().cloned()
    }
}

impl ProgressObserver for MemoryProgressObserver {
    fn on_progress_update(&self, progress: ProgressInfo) {
        self.history.lock().push(progress);
    }
}
