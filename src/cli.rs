//! Общие аргументы командной строки для обоих исполняемых файлов

use std::path::PathBuf;
use clap::Args;
use crate::config::ClonerConfig;
use crate::error::Result;

/// Настройки модели, переопределяющие файл конфигурации
#[derive(Debug, Clone, Default, Args)]
pub struct ModelArgs {
    /// JSON-файл конфигурации
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Адрес сервера модели XTTS
    #[arg(long = "model-endpoint")]
    pub endpoint: Option<String>,

    /// Команда для запуска локального сервера модели
    #[arg(long = "model-server-command")]
    pub server_command: Option<String>,

    /// Аргумент команды запуска (можно указать несколько раз)
    #[arg(long = "model-server-arg", allow_hyphen_values = true)]
    pub server_args: Vec<String>,

    /// Устройство для инференса (auto, cuda, cpu, mps)
    #[arg(long)]
    pub device: Option<String>,

    /// Таймаут запроса синтеза в секундах
    #[arg(long)]
    pub request_timeout_secs: Option<u64>,

    /// Количество попыток загрузки модели
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Пауза между попытками в секундах
    #[arg(long)]
    pub retry_delay_secs: Option<u64>,
}

impl ModelArgs {
    /// Загрузить конфигурацию и применить к ней аргументы командной строки
    pub fn resolve_config(&self) -> Result<ClonerConfig> {
        let mut config = ClonerConfig::load_or_default(self.config.as_deref())?;
        self.apply(&mut config);
        Ok(config)
    }

    fn apply(&self, config: &mut ClonerConfig) {
        if let Some(endpoint) = &self.endpoint {
            config.model.endpoint = endpoint.clone();
        }
        if let Some(command) = &self.server_command {
            config.model.server_command = Some(command.clone());
        }
        if !self.server_args.is_empty() {
            config.model.server_args = self.server_args.clone();
        }
        if let Some(device) = &self.device {
            config.model.device = device.clone();
        }
        if let Some(timeout) = self.request_timeout_secs {
            config.model.request_timeout_secs = timeout;
        }
        if let Some(retries) = self.max_retries {
            config.retry.max_retries = retries;
        }
        if let Some(delay) = self.retry_delay_secs {
            config.retry.retry_delay_secs = delay;
        }
    }
}
