//! Веб-интерфейс клонирования голоса
//!
//! Маршруты:
//! - GET  /                 - страница с формой
//! - GET  /health           - проверка работоспособности
//! - GET  /api/languages    - список языков
//! - GET  /api/examples     - примеры текста
//! - POST /api/clone        - отправка формы (multipart), возвращает job_id
//! - GET  /api/jobs/:id     - состояние задачи
//! - GET  /audio/:file      - сгенерированный файл

pub mod handlers;
pub mod jobs;
pub mod page;

use std::net::SocketAddr;
use std::sync::Arc;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use crate::cloner::VoiceCloner;
use crate::config::ServerConfig;
use crate::error::{ClonerError, Result};
use crate::media::audio::MAX_FILE_SIZE_MB;
use self::jobs::JobRegistry;

/// Запас сверх лимита на файл: текстовые поля формы и заголовки multipart
const FORM_OVERHEAD_BYTES: usize = 4 * 1024 * 1024;

/// Общее состояние обработчиков
#[derive(Clone)]
pub struct AppState {
    pub cloner: Arc<VoiceCloner>,
    pub jobs: JobRegistry,
}

impl AppState {
    pub fn new(cloner: Arc<VoiceCloner>) -> Self {
        Self {
            cloner,
            jobs: JobRegistry::new(),
        }
    }
}

/// Собрать маршрутизатор
pub fn router(state: AppState) -> Router {
    // Файл сверх лимита дочитывается без записи, чтобы ответить с его размером.
    // Тело запроса все равно ограничено, но с запасом.
    let body_limit = (MAX_FILE_SIZE_MB as usize * 4) * 1024 * 1024 + FORM_OVERHEAD_BYTES;

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/languages", get(handlers::languages))
        .route("/api/examples", get(handlers::examples))
        .route("/api/clone", post(handlers::submit_clone))
        .route("/api/jobs/:id", get(handlers::job_status))
        .route("/audio/:file", get(handlers::audio_file))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}

/// Запустить веб-сервер и обслуживать запросы до остановки процесса
pub async fn serve(config: &ServerConfig, cloner: Arc<VoiceCloner>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| ClonerError::Configuration(format!("Invalid listen address: {}", e)))?;

    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Voice cloner interface listening on http://{}", listener.local_addr()?);
    log::info!("Generated audio is stored in {}", cloner.files().output_dir().display());

    if config.share {
        if addr.ip().is_unspecified() {
            log::info!("Sharing enabled: interface is reachable from other machines on port {}", config.port);
        } else {
            log::warn!("Sharing enabled but server is bound to {}; use --host 0.0.0.0 to expose it", addr.ip());
        }
    }

    axum::serve(listener, router(AppState::new(cloner))).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use reqwest::multipart::{Form, Part};
    use serde_json::Value;
    use crate::test_support::{write_wav, MockBehavior, MockModel};
    use crate::utils::temp::OutputFileManager;

    struct TestServer {
        base: String,
        client: reqwest::Client,
        model: Arc<MockModel>,
        dir: tempfile::TempDir,
    }

    async fn start_server() -> TestServer {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(MockModel::new(MockBehavior::WriteBytes(b"RIFF-cloned".to_vec())));
        let files = OutputFileManager::new(dir.path().join("out")).unwrap();
        let cloner = Arc::new(VoiceCloner::new(model.clone(), files));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(AppState::new(cloner))).await.unwrap();
        });

        TestServer {
            base: format!("http://{}", addr),
            client: reqwest::Client::new(),
            model,
            dir,
        }
    }

    impl TestServer {
        fn reference_form(&self, seconds: f64, text: &str) -> Form {
            let path = self.dir.path().join("upload.wav");
            write_wav(&path, seconds, 16000);
            let bytes = std::fs::read(&path).unwrap();
            Form::new()
                .part("reference_audio", Part::bytes(bytes).file_name("my voice.wav"))
                .text("text", text.to_string())
                .text("language", "en")
        }

        async fn submit(&self, form: Form) -> String {
            let response = self
                .client
                .post(format!("{}/api/clone", self.base))
                .multipart(form)
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
            let body: Value = response.json().await.unwrap();
            body["job_id"].as_str().unwrap().to_string()
        }

        async fn wait_for(&self, job_id: &str) -> Value {
            for _ in 0..200 {
                let job: Value = self
                    .client
                    .get(format!("{}/api/jobs/{}", self.base, job_id))
                    .send()
                    .await
                    .unwrap()
                    .json()
                    .await
                    .unwrap();
                if job["done"].as_bool() == Some(true) {
                    return job;
                }
                tokio::time::sleep(Duration::from_millis(25)).await;
            }
            panic!("job {} did not finish", job_id);
        }
    }

    #[tokio::test]
    async fn test_clone_job_end_to_end() {
        let server = start_server().await;

        let job_id = server.submit(server.reference_form(4.0, "Hello world")).await;
        let job = server.wait_for(&job_id).await;

        assert_eq!(job["success"], Value::Bool(true));
        assert_eq!(job["progress"].as_f64(), Some(100.0));
        assert!(job["status"].as_str().unwrap().contains("Generated 2 words"));

        let audio_url = job["audio_url"].as_str().unwrap();
        let response = server.client.get(format!("{}{}", server.base, audio_url)).send().await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").and_then(|v| v.to_str().ok()),
            Some("audio/wav")
        );
        assert_eq!(response.bytes().await.unwrap().as_ref(), b"RIFF-cloned");
        assert_eq!(server.model.calls(), 1);
    }

    #[tokio::test]
    async fn test_short_text_fails_without_synthesis() {
        let server = start_server().await;

        let job_id = server.submit(server.reference_form(4.0, "Hey")).await;
        let job = server.wait_for(&job_id).await;

        assert_eq!(job["success"], Value::Bool(false));
        assert!(job["audio_url"].is_null());
        assert!(job["status"].as_str().unwrap().contains("at least 5 characters"));
        assert_eq!(server.model.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_upload_is_reported() {
        let server = start_server().await;

        let form = Form::new().text("text", "Hello world").text("language", "en");
        let job_id = server.submit(form).await;
        let job = server.wait_for(&job_id).await;

        assert_eq!(job["status"], Value::String("Please upload a reference audio file!".into()));
    }

    #[tokio::test]
    async fn test_oversized_upload_reports_file_size() {
        let server = start_server().await;

        let form = Form::new()
            .part("reference_audio", Part::bytes(vec![0u8; 60 * 1024 * 1024]).file_name("big.wav"))
            .text("text", "Hello world")
            .text("language", "en");
        let response = server
            .client
            .post(format!("{}/api/clone", server.base))
            .multipart(form)
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(
            body["error"],
            Value::String("File too large (60.0MB). Max size: 50MB".into())
        );
        assert_eq!(server.model.calls(), 0);

        let leftovers = std::fs::read_dir(server.dir.path().join("out").join("uploads"))
            .unwrap()
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_static_routes_and_not_found() {
        let server = start_server().await;

        let languages: Value = server
            .client
            .get(format!("{}/api/languages", server.base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(languages.as_array().map(|l| l.len()), Some(16));
        assert_eq!(languages[12]["code"], Value::String("zh-cn".into()));

        let page = server.client.get(&server.base).send().await.unwrap().text().await.unwrap();
        assert!(page.contains("XTTS Voice Cloner"));

        let response = server
            .client
            .get(format!("{}/api/jobs/{}", server.base, uuid::Uuid::new_v4()))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);

        let response = server
            .client
            .get(format!("{}/audio/missing.wav", server.base))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
