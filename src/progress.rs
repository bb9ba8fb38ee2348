//! Модуль для отслеживания прогресса клонирования голоса
//!
//! Этот модуль предоставляет реализацию паттерна Observer: обработчик запроса
//! сообщает о переходе между этапами, а наблюдатели (лог, веб-интерфейс)
//! получают фиксированные отметки прогресса.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Информация о прогрессе выполнения операции
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressInfo {
    /// Текущий этап операции
    pub step: String,
    /// Общий процент выполнения (0.0 - 100.0)
    pub progress: f32,
    /// Дополнительная информация о текущем этапе
    pub details: Option<String>,
}

impl ProgressInfo {
    /// Создает новый экземпляр ProgressInfo
    pub fn new(step: impl Into<String>, progress: f32, details: Option<String>) -> Self {
        Self {
            step: step.into(),
            progress: progress.clamp(0.0, 100.0),
            details,
        }
    }
}

/// Трейт для наблюдателя, получающего уведомления о прогрессе
pub trait ProgressObserver: Send + Sync {
    /// Метод, вызываемый при обновлении прогресса
    fn on_progress_update(&self, progress: ProgressInfo);
}

/// Трейт для объекта, отправляющего уведомления о прогрессе
pub trait ProgressReporter: Send + Sync {
    /// Добавить наблюдателя
    ///
    /// Возвращает уникальный идентификатор наблюдателя, который можно использовать
    /// для его удаления в будущем.
    fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> usize;

    /// Удалить наблюдателя по идентификатору
    fn remove_observer(&mut self, id: usize) -> Option<Box<dyn ProgressObserver>>;

    /// Уведомить всех наблюдателей о прогрессе
    fn notify_progress(&self, progress: ProgressInfo);
}

/// Реализация ProgressReporter, рассылающая уведомления синхронно
pub struct DefaultProgressReporter {
    observers: RwLock<HashMap<usize, Box<dyn ProgressObserver>>>,
    next_id: AtomicUsize,
}

impl DefaultProgressReporter {
    /// Создать новый экземпляр DefaultProgressReporter
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(HashMap::new()),
            next_id: AtomicUsize::new(0),
        }
    }

    /// Добавить наблюдателя (builder-вариант)
    pub fn with_observer(mut self, observer: Box<dyn ProgressObserver>) -> Self {
        self.add_observer(observer);
        self
    }
}

impl Default for DefaultProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for DefaultProgressReporter {
    fn add_observer(&mut self, observer: Box<dyn ProgressObserver>) -> usize {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.observers.write().insert(id, observer);
        id
    }

    fn remove_observer(&mut self, id: usize) -> Option<Box<dyn ProgressObserver>> {
        self.observers.write().remove(&id)
    }

    fn notify_progress(&self, progress: ProgressInfo) {
        let observers = self.observers.read();
        for observer in observers.values() {
            observer.on_progress_update(progress.clone());
        }
    }
}

/// Этапы обработки запроса на клонирование голоса
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProcessStep {
    /// Проверка входных данных
    ValidatingInputs,
    /// Проверка и анализ референсного аудио
    ProcessingAudio,
    /// Генерация речи моделью
    GeneratingSpeech,
    /// Проверка результата
    Finalizing,
    /// Готово
    Complete,
}

impl ProcessStep {
    /// Все этапы в порядке выполнения
    pub const ALL: [ProcessStep; 5] = [
        Self::ValidatingInputs,
        Self::ProcessingAudio,
        Self::GeneratingSpeech,
        Self::Finalizing,
        Self::Complete,
    ];

    /// Название этапа для пользователя
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidatingInputs => "Validating inputs...",
            Self::ProcessingAudio => "Processing reference audio...",
            Self::GeneratingSpeech => "Generating speech...",
            Self::Finalizing => "Finalizing...",
            Self::Complete => "Complete!",
        }
    }

    /// Отметка общего прогресса (в процентах) при входе в этап
    pub fn milestone(&self) -> f32 {
        match self {
            Self::ValidatingInputs => 10.0,
            Self::ProcessingAudio => 20.0,
            Self::GeneratingSpeech => 40.0,
            Self::Finalizing => 90.0,
            Self::Complete => 100.0,
        }
    }
}

/// Трекер прогресса одного запроса
pub struct ProgressTracker {
    reporter: Option<Box<dyn ProgressReporter>>,
    current_step: RwLock<Option<ProcessStep>>,
}

impl ProgressTracker {
    /// Трекер без наблюдателей
    pub fn new() -> Self {
        Self {
            reporter: None,
            current_step: RwLock::new(None),
        }
    }

    /// Создать трекер с репортером
    pub fn with_reporter(reporter: Box<dyn ProgressReporter>) -> Self {
        Self {
            reporter: Some(reporter),
            current_step: RwLock::new(None),
        }
    }

    /// Перейти к этапу и сообщить его отметку наблюдателям
    pub fn set_step(&self, step: ProcessStep) {
        *self.current_step.write() = Some(step);
        self.report(step, None);
    }

    /// Текущий этап
    pub fn current_step(&self) -> Option<ProcessStep> {
        *self.current_step.read()
    }

    /// Отметить завершение всего процесса
    pub fn complete(&self, details: Option<String>) {
        *self.current_step.write() = Some(ProcessStep::Complete);
        self.report(ProcessStep::Complete, details);
    }

    /// Сообщить о сбое на текущем этапе без изменения отметки прогресса
    pub fn fail(&self, details: String) {
        if let Some(step) = self.current_step() {
            self.report(step, Some(details));
        }
    }

    fn report(&self, step: ProcessStep, details: Option<String>) {
        if let Some(reporter) = &self.reporter {
            reporter.notify_progress(ProgressInfo::new(step.as_str(), step.milestone(), details));
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct TestObserver {
        updates: Arc<Mutex<Vec<ProgressInfo>>>,
    }

    impl TestObserver {
        fn new() -> (Self, Arc<Mutex<Vec<ProgressInfo>>>) {
            let updates = Arc::new(Mutex::new(Vec::new()));
            (Self { updates: updates.clone() }, updates)
        }
    }

    impl ProgressObserver for TestObserver {
        fn on_progress_update(&self, progress: ProgressInfo) {
            self.updates.lock().unwrap().push(progress);
        }
    }

    #[test]
    fn test_progress_tracker_milestones() {
        let mut reporter = DefaultProgressReporter::new();
        let (observer, updates) = TestObserver::new();
        reporter.add_observer(Box::new(observer));
        let tracker = ProgressTracker::with_reporter(Box::new(reporter));

        for step in ProcessStep::ALL.iter().take(4) {
            tracker.set_step(*step);
        }
        tracker.complete(Some("done".to_string()));

        let updates = updates.lock().unwrap();
        let milestones: Vec<f32> = updates.iter().map(|u| u.progress).collect();
        assert_eq!(milestones, vec![10.0, 20.0, 40.0, 90.0, 100.0]);
        assert_eq!(updates[2].step, ProcessStep::GeneratingSpeech.as_str());
        assert_eq!(updates[4].details, Some("done".to_string()));
        assert_eq!(tracker.current_step(), Some(ProcessStep::Complete));
    }

    #[test]
    fn test_fail_keeps_milestone() {
        let (observer, updates) = TestObserver::new();
        let reporter = DefaultProgressReporter::new().with_observer(Box::new(observer));
        let tracker = ProgressTracker::with_reporter(Box::new(reporter));

        tracker.set_step(ProcessStep::ProcessingAudio);
        tracker.fail("bad audio".to_string());

        let updates = updates.lock().unwrap();
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[1].progress, 20.0);
        assert_eq!(updates[1].details.as_deref(), Some("bad audio"));
    }

    #[test]
    fn test_removed_observer_is_silent() {
        let mut reporter = DefaultProgressReporter::new();
        let (observer, updates) = TestObserver::new();
        let id = reporter.add_observer(Box::new(observer));
        assert!(reporter.remove_observer(id).is_some());

        reporter.notify_progress(ProgressInfo::new("step", 150.0, None));
        assert!(updates.lock().unwrap().is_empty());
    }
}
