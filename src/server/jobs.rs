//! Реестр задач веб-интерфейса
//!
//! Каждая отправка формы становится задачей; интерфейс опрашивает ее
//! состояние, пока задача не завершится.

use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use uuid::Uuid;
use crate::cloner::CloneResult;
use crate::progress::{ProgressInfo, ProgressObserver};

/// Состояние задачи для интерфейса
#[derive(Debug, Clone, Serialize)]
pub struct JobSnapshot {
    pub id: Uuid,
    /// Общий прогресс (0 - 100)
    pub progress: f32,
    /// Текущий этап
    pub stage: String,
    /// Статус для пользователя
    pub status: String,
    pub done: bool,
    pub success: bool,
    /// Ссылка на результат
    pub audio_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobSnapshot {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            progress: 0.0,
            stage: "Queued".to_string(),
            status: String::new(),
            done: false,
            success: false,
            audio_url: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }
}

/// Сколько хранится завершенная задача: интерфейсу достаточно дочитать результат
pub const FINISHED_JOB_TTL_SECS: i64 = 60 * 60;

/// Потокобезопасный реестр задач
#[derive(Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<Uuid, JobSnapshot>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Зарегистрировать новую задачу
    ///
    /// Заодно удаляются давно завершенные задачи.
    pub fn create(&self) -> Uuid {
        self.prune_finished(Duration::seconds(FINISHED_JOB_TTL_SECS));

        let id = Uuid::new_v4();
        self.jobs.write().insert(id, JobSnapshot::new(id));
        id
    }

    /// Удалить задачи, завершенные раньше чем `max_age` назад. Возвращает число удаленных.
    pub fn prune_finished(&self, max_age: Duration) -> usize {
        let cutoff = Utc::now() - max_age;
        let mut jobs = self.jobs.write();
        let before = jobs.len();
        jobs.retain(|_, job| job.finished_at.map_or(true, |finished| finished > cutoff));
        let removed = before - jobs.len();
        if removed > 0 {
            log::debug!("Pruned {} finished jobs", removed);
        }
        removed
    }

    /// Получить снимок задачи
    pub fn get(&self, id: &Uuid) -> Option<JobSnapshot> {
        self.jobs.read().get(id).cloned()
    }

    /// Обновить прогресс задачи
    pub fn update_progress(&self, id: &Uuid, progress: &ProgressInfo) {
        if let Some(job) = self.jobs.write().get_mut(id) {
            job.progress = progress.progress;
            job.stage = progress.step.clone();
            if let Some(details) = &progress.details {
                job.status = details.clone();
            }
        }
    }

    /// Завершить задачу
    pub fn finish(&self, id: &Uuid, result: &CloneResult) {
        if let Some(job) = self.jobs.write().get_mut(id) {
            job.done = true;
            job.success = result.is_success();
            job.status = result.status.clone();
            job.audio_url = result
                .audio_path
                .as_ref()
                .and_then(|path| path.file_name())
                .map(|name| format!("/audio/{}", name.to_string_lossy()));
            job.finished_at = Some(Utc::now());
        }
    }
}

/// Наблюдатель, переносящий прогресс конвейера в реестр задач
pub struct JobProgressObserver {
    registry: JobRegistry,
    id: Uuid,
}

impl JobProgressObserver {
    pub fn new(registry: JobRegistry, id: Uuid) -> Self {
        Self { registry, id }
    }
}

impl ProgressObserver for JobProgressObserver {
    fn on_progress_update(&self, progress: ProgressInfo) {
        self.registry.update_progress(&self.id, &progress);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_job_lifecycle() {
        let registry = JobRegistry::new();
        let id = registry.create();
        assert_eq!(registry.get(&id).map(|j| j.done), Some(false));

        let observer = JobProgressObserver::new(registry.clone(), id);
        observer.on_progress_update(ProgressInfo::new("Generating speech...", 40.0, None));
        let job = registry.get(&id).unwrap();
        assert_eq!(job.progress, 40.0);
        assert_eq!(job.stage, "Generating speech...");

        registry.finish(
            &id,
            &CloneResult {
                audio_path: Some(PathBuf::from("/tmp/out/cloned_abc.wav")),
                status: "ok".to_string(),
            },
        );
        let job = registry.get(&id).unwrap();
        assert!(job.done && job.success);
        assert_eq!(job.audio_url.as_deref(), Some("/audio/cloned_abc.wav"));
        assert!(job.finished_at.is_some());

        assert!(registry.get(&Uuid::new_v4()).is_none());
    }

    fn finished_result() -> CloneResult {
        CloneResult {
            audio_path: None,
            status: "failed".to_string(),
        }
    }

    #[test]
    fn test_old_finished_jobs_are_pruned() {
        let registry = JobRegistry::new();
        let stale = registry.create();
        let recent = registry.create();
        let running = registry.create();
        registry.finish(&stale, &finished_result());
        registry.finish(&recent, &finished_result());

        if let Some(job) = registry.jobs.write().get_mut(&stale) {
            job.finished_at = Some(Utc::now() - Duration::seconds(FINISHED_JOB_TTL_SECS + 60));
        }

        // Новая задача вычищает устаревшие
        let fresh = registry.create();
        assert!(registry.get(&stale).is_none());
        assert!(registry.get(&recent).is_some());
        assert!(registry.get(&running).is_some());
        assert!(registry.get(&fresh).is_some());

        assert_eq!(registry.prune_finished(Duration::zero()), 1);
        assert!(registry.get(&recent).is_none());
        assert!(registry.get(&running).is_some());
    }
}
