//! Модуль конфигурации библиотеки voice-cloner
//!
//! Этот модуль содержит структуры для настройки модели, политики повторов
//! и веб-сервера. Все поля имеют значения по умолчанию, поэтому JSON-файл
//! конфигурации может задавать только нужные параметры.

use std::path::{Path, PathBuf};
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::error::{ClonerError, Result};

/// Настройки доступа к модели XTTS
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Адрес сервера модели
    pub endpoint: String,
    /// Таймаут одного запроса к серверу модели в секундах
    pub request_timeout_secs: u64,
    /// Команда для запуска локального сервера модели (если не задана, сервер должен уже работать)
    pub server_command: Option<String>,
    /// Аргументы команды запуска
    pub server_args: Vec<String>,
    /// Рабочая директория сервера модели
    pub server_workdir: Option<PathBuf>,
    /// Сколько секунд ждать готовности запущенного сервера
    pub startup_timeout_secs: u64,
    /// Устройство для инференса ("auto", "cuda", "cpu", "mps")
    pub device: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:8020".to_string(),
            request_timeout_secs: 300,
            server_command: None,
            server_args: Vec::new(),
            server_workdir: None,
            startup_timeout_secs: 120,
            device: "auto".to_string(),
        }
    }
}

/// Политика повторных попыток загрузки модели
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Максимальное количество попыток
    pub max_retries: u32,
    /// Пауза между попытками в секундах
    pub retry_delay_secs: u64,
}

impl RetryPolicy {
    /// Пауза между попытками
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_secs: 10,
        }
    }
}

/// Настройки веб-интерфейса
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Адрес для прослушивания
    pub host: String,
    /// Порт
    pub port: u16,
    /// Публиковать адрес интерфейса для доступа извне
    pub share: bool,
    /// Директория для сгенерированных файлов (не очищается автоматически)
    pub output_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 7861,
            share: true,
            output_dir: std::env::temp_dir().join("voice-cloner"),
        }
    }
}

/// Конфигурация приложения
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClonerConfig {
    /// Модель
    pub model: ModelConfig,
    /// Повторные попытки загрузки модели
    pub retry: RetryPolicy,
    /// Веб-сервер
    pub server: ServerConfig,
}

impl ClonerConfig {
    /// Загрузить конфигурацию из JSON-файла
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ClonerError::Configuration(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = serde_json::from_str(&json)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Загрузить конфигурацию из файла, если он указан, иначе вернуть значения по умолчанию
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
