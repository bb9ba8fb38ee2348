//! Обработчики HTTP-запросов

use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;
use crate::cloner::CloneRequest;
use crate::error::ClonerError;
use crate::language::{DEFAULT_LANGUAGE, SUPPORTED_LANGUAGES};
use crate::media::audio::MAX_FILE_SIZE_MB;
use crate::notification::LogProgressObserver;
use crate::progress::{DefaultProgressReporter, ProgressTracker};
use crate::utils::temp::OutputFileManager;
use super::jobs::JobProgressObserver;
use super::page::{EXAMPLE_TEXTS, INDEX_HTML};
use super::AppState;

/// Ошибка API с HTTP-статусом
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub async fn health() -> &'static str {
    "ok"
}

pub async fn languages() -> impl IntoResponse {
    Json(SUPPORTED_LANGUAGES)
}

pub async fn examples() -> impl IntoResponse {
    Json(EXAMPLE_TEXTS)
}

/// Принять форму и запустить задачу клонирования
pub async fn submit_clone(State(state): State<AppState>, mut multipart: Multipart) -> Result<Response, ApiError> {
    let mut upload = None;
    let mut text = String::new();
    let mut language = DEFAULT_LANGUAGE.to_string();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid form data: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "reference_audio" => match receive_upload(state.cloner.files(), field).await? {
                ReceivedUpload::Stored(file) => upload = Some(file),
                ReceivedUpload::Empty => {}
                ReceivedUpload::TooLarge(size) => {
                    let err = ClonerError::FileTooLarge {
                        size_mb: size as f64 / BYTES_PER_MB as f64,
                        max_mb: MAX_FILE_SIZE_MB,
                    };
                    log::warn!("Rejected upload: {}", err);
                    return Err(ApiError::bad_request(err.to_string()));
                }
            },
            "text" => {
                text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid text field: {}", e)))?;
            }
            "language" => {
                language = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Invalid language field: {}", e)))?;
            }
            other => log::debug!("Ignoring unknown form field {}", other),
        }
    }

    let request = CloneRequest {
        reference_audio: upload.as_ref().map(|file| file.path().to_path_buf()),
        text,
        language,
    };

    let job_id = state.jobs.create();
    log::info!("Job {} accepted ({} chars, language {})", job_id, request.text.chars().count(), request.language);

    let cloner = state.cloner.clone();
    let jobs = state.jobs.clone();
    tokio::spawn(async move {
        let reporter = DefaultProgressReporter::new()
            .with_observer(Box::new(JobProgressObserver::new(jobs.clone(), job_id)))
            .with_observer(Box::new(LogProgressObserver::with_prefix(job_id.to_string())));
        let tracker = ProgressTracker::with_reporter(Box::new(reporter));

        let result = cloner.clone_voice(&request, &tracker).await;
        jobs.finish(&job_id, &result);

        // Загруженный референс удаляется только после завершения задачи
        drop(upload);
    });

    Ok((StatusCode::ACCEPTED, Json(json!({ "job_id": job_id }))).into_response())
}

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Итог чтения поля с референсом
enum ReceivedUpload {
    Stored(NamedTempFile),
    /// Браузер присылает пустое поле, когда файл не выбран
    Empty,
    /// Файл больше лимита; размер в байтах (не меньше прочитанного)
    TooLarge(u64),
}

/// Записать поле с файлом во временный файл по частям
///
/// Сверх лимита данные не записываются, а только подсчитываются, чтобы
/// сообщить пользователю размер файла.
async fn receive_upload(files: &OutputFileManager, mut field: Field<'_>) -> Result<ReceivedUpload, ApiError> {
    let file_name = field.file_name().map(|name| name.to_string());
    let max_bytes = MAX_FILE_SIZE_MB * BYTES_PER_MB;

    let upload = files
        .create_upload(file_name.as_deref())
        .map_err(|e| ApiError::internal(e.to_string()))?;
    let std_file = upload
        .as_file()
        .try_clone()
        .map_err(|e| ApiError::internal(e.to_string()))?;
    let mut writer = tokio::fs::File::from_std(std_file);

    let mut received: u64 = 0;
    loop {
        let chunk = match field.chunk().await {
            Ok(Some(chunk)) => chunk,
            Ok(None) => break,
            // Лимит тела запроса обрывает очень большие файлы: превышение уже установлено
            Err(_) if received > max_bytes => break,
            Err(e) => return Err(ApiError::bad_request(format!("Failed to read upload: {}", e))),
        };
        received += chunk.len() as u64;
        if received <= max_bytes {
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| ApiError::internal(e.to_string()))?;
        }
    }

    if received > max_bytes {
        return Ok(ReceivedUpload::TooLarge(received));
    }
    if received == 0 && file_name.as_deref().map_or(true, str::is_empty) {
        return Ok(ReceivedUpload::Empty);
    }

    writer.flush().await.map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(ReceivedUpload::Stored(upload))
}

pub async fn job_status(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, ApiError> {
    state
        .jobs
        .get(&id)
        .map(|job| Json(job).into_response())
        .ok_or_else(|| ApiError::not_found(format!("Unknown job {}", id)))
}

/// Отдать сгенерированный WAV
pub async fn audio_file(State(state): State<AppState>, Path(file_name): Path<String>) -> Result<Response, ApiError> {
    let path = state
        .cloner
        .files()
        .resolve_output(&file_name)
        .ok_or_else(|| ApiError::not_found(format!("No such audio file: {}", file_name)))?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(([(header::CONTENT_TYPE, "audio/wav")], bytes).into_response())
}
