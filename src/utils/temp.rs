//! Модуль для работы с выходными и временными файлами
//!
//! Сгенерированные файлы остаются на диске после завершения запроса:
//! их удаление - ответственность вызывающей стороны. Загруженные
//! пользователем референсы живут только пока жив `NamedTempFile`.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use crate::error::Result;

/// Выдает уникальные пути для результатов синтеза
#[derive(Debug, Clone)]
pub struct OutputFileManager {
    /// Директория для результатов
    output_dir: PathBuf,
    /// Директория для загрузок
    upload_dir: PathBuf,
}

impl OutputFileManager {
    /// Создать менеджер и необходимые директории
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        let upload_dir = output_dir.join("uploads");
        fs::create_dir_all(&upload_dir)?;

        Ok(Self {
            output_dir,
            upload_dir,
        })
    }

    /// Путь к директории результатов
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Зарезервировать путь для нового выходного файла
    ///
    /// Файл не создается: его создает модель.
    pub fn allocate_output(&self, prefix: &str, extension: &str) -> PathBuf {
        let file_name = format!("{}_{}.{}", prefix, uuid::Uuid::new_v4().simple(), extension);
        self.output_dir.join(file_name)
    }

    /// Создать пустой временный файл для загрузки с тем же расширением
    ///
    /// Содержимое пишет вызывающая сторона. Файл удаляется, когда
    /// возвращенный `NamedTempFile` уничтожается.
    pub fn create_upload(&self, original_name: Option<&str>) -> Result<NamedTempFile> {
        let suffix = original_name
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext))
            .unwrap_or_default();

        let file = tempfile::Builder::new()
            .prefix("reference_")
            .suffix(&suffix)
            .tempfile_in(&self.upload_dir)?;

        Ok(file)
    }

    /// Найти выходной файл по имени, не выходя за пределы директории
    pub fn resolve_output(&self, file_name: &str) -> Option<PathBuf> {
        let candidate = Path::new(file_name);
        if candidate.file_name().and_then(|name| name.to_str()) != Some(file_name) {
            return None;
        }
        let path = self.output_dir.join(candidate);
        path.is_file().then_some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_output_is_unique_and_not_created() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = OutputFileManager::new(temp_dir.path()).unwrap();

        let first = manager.allocate_output("cloned", "wav");
        let second = manager.allocate_output("cloned", "wav");
        assert_ne!(first, second);
        assert_eq!(first.parent(), Some(temp_dir.path()));
        assert_eq!(first.extension().and_then(|e| e.to_str()), Some("wav"));
        assert!(!first.exists());
    }

    #[test]
    fn test_create_upload_keeps_extension_and_cleans_up() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = OutputFileManager::new(temp_dir.path()).unwrap();

        let upload = manager.create_upload(Some("my voice.MP3")).unwrap();
        let path = upload.path().to_path_buf();
        assert_eq!(path.parent(), Some(temp_dir.path().join("uploads").as_path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("MP3"));
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

        drop(upload);
        assert!(!path.exists());
    }

    #[test]
    fn test_resolve_output_rejects_traversal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let manager = OutputFileManager::new(temp_dir.path().join("out")).unwrap();
        std::fs::write(temp_dir.path().join("secret.wav"), b"x").unwrap();
        std::fs::write(manager.output_dir().join("ok.wav"), b"x").unwrap();

        assert!(manager.resolve_output("../secret.wav").is_none());
        assert!(manager.resolve_output("missing.wav").is_none());
        assert!(manager.resolve_output("ok.wav").is_some());
    }
}
