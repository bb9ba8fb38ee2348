//! Клиент сервера модели XTTS v2
//!
//! Модель работает в отдельном процессе и доступна по HTTP. При наличии
//! `server_command` процесс запускается здесь же и завершается вместе с
//! хэндлом модели.

use std::process::Stdio;
use std::time::Duration;
use async_trait::async_trait;
use reqwest::{multipart, Client};
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use crate::config::ModelConfig;
use crate::error::{ModelError, ModelResult};
use super::{SynthesisRequest, VoiceCloningModel};

/// Интервал опроса готовности сервера
const HEALTH_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Ответ `/health`
#[derive(Debug, Default, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    device: Option<String>,
}

/// Хэндл загруженной модели XTTS
pub struct XttsModel {
    client: Client,
    endpoint: String,
    name: String,
    /// Запущенный нами сервер модели; `kill_on_drop` останавливает его вместе с хэндлом
    _server: Option<Child>,
}

impl XttsModel {
    /// Подключиться к серверу модели (при необходимости запустив его)
    pub async fn load(config: &ModelConfig) -> ModelResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let endpoint = config.endpoint.trim_end_matches('/').to_string();

        let mut server = match &config.server_command {
            Some(command) => Some(spawn_model_server(command, config)?),
            None => None,
        };

        // Запущенному серверу даем время на загрузку весов, внешний проверяем один раз
        let startup_timeout = if server.is_some() {
            Duration::from_secs(config.startup_timeout_secs)
        } else {
            Duration::ZERO
        };
        let health = wait_for_health(&client, &endpoint, startup_timeout, server.as_mut()).await?;

        let name = health.model.unwrap_or_else(|| "xtts_v2".to_string());
        match health.device.as_deref() {
            Some("cpu") => log::warn!("Model {} is running on CPU (slower but still works)", name),
            Some(device) => log::info!("Model {} is running on {}", name, device),
            None => log::info!("Model {} is ready at {}", name, endpoint),
        }

        Ok(Self {
            client,
            endpoint,
            name,
            _server: server,
        })
    }

    /// Адрес сервера модели
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl VoiceCloningModel for XttsModel {
    fn name(&self) -> &str {
        &self.name
    }

    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> ModelResult<()> {
        let speaker_bytes = tokio::fs::read(request.speaker_wav).await?;
        let file_name = request
            .speaker_wav
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "speaker.wav".to_string());

        let speaker_part = multipart::Part::bytes(speaker_bytes)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let form = multipart::Form::new()
            .text("text", request.text.to_string())
            .text("language", request.language.to_string())
            .part("speaker_wav", speaker_part);

        let url = format!("{}/tts_to_file", self.endpoint);
        log::debug!("POST {}", url);

        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ModelError::Request {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await?;
        tokio::fs::write(request.output_path, &bytes).await?;
        log::debug!("Wrote {} bytes to {}", bytes.len(), request.output_path.display());

        Ok(())
    }
}

/// Запустить сервер модели и перенаправить его вывод в лог
fn spawn_model_server(command: &str, config: &ModelConfig) -> ModelResult<Child> {
    log::info!("Starting XTTS model server: {} {}", command, config.server_args.join(" "));

    let mut cmd = Command::new(command);
    cmd.args(&config.server_args);

    if config.device != "auto" {
        cmd.args(["--device", config.device.as_str()]);
    }
    if let Some(workdir) = &config.server_workdir {
        cmd.current_dir(workdir);
    }

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .map_err(|e| ModelError::Startup(format!("{}: {}", command, e)))?;

    if let Some(stdout) = child.stdout.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                log::info!("XTTS server: {}", line);
            }
        });
    }

    if let Some(stderr) = child.stderr.take() {
        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                log::warn!("XTTS server: {}", line);
            }
        });
    }

    Ok(child)
}

/// Опрашивать `/health`, пока сервер не ответит успехом или не выйдет время
///
/// Если сервер запущен нами и его процесс завершился, ждать дальше нечего.
async fn wait_for_health(
    client: &Client,
    endpoint: &str,
    timeout: Duration,
    mut server: Option<&mut Child>,
) -> ModelResult<HealthResponse> {
    let url = format!("{}/health", endpoint);
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        if let Some(child) = server.as_deref_mut() {
            if let Some(status) = child.try_wait()? {
                return Err(ModelError::Startup(format!("model server exited early with {}", status)));
            }
        }


        let last_error = match client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                // Тело может быть и не JSON: достаточно успешного статуса
                let body = response.text().await.unwrap_or_default();
                return Ok(serde_json::from_str(&body).unwrap_or_default());
            }
            Ok(response) => format!("health check returned {}", response.status()),
            Err(e) => e.to_string(),
        };

        if tokio::time::Instant::now() >= deadline {
            return Err(ModelError::Unavailable(format!("{}: {}", url, last_error)));
        }
        tokio::time::sleep(HEALTH_POLL_INTERVAL).await;
    }
}
