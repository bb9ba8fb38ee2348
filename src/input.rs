//! Модуль для поиска входных данных пакетного режима
//!
//! Референсное аудио берется из явно указанного пути, а если путь не задан,
//! ищется первым по имени аудиофайлом в директории.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use crate::error::{ClonerError, Result};
use crate::media::audio::has_audio_extension;

/// Найти референсное аудио
pub fn resolve_reference_audio(explicit: Option<&Path>, search_dir: &Path) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if !path.is_file() {
            return Err(ClonerError::ReferenceNotFound(path.to_path_buf()));
        }
        return Ok(path.to_path_buf());
    }

    if !search_dir.is_dir() {
        return Err(ClonerError::DirectoryNotFound(search_dir.to_path_buf()));
    }

    log::debug!("Scanning {} for reference audio", search_dir.display());

    WalkDir::new(search_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .find(|path| has_audio_extension(path))
        .ok_or_else(|| ClonerError::NoAudioFiles(search_dir.to_path_buf()))
}

/// Прочитать текст сценария целиком, без пробелов по краям
///
/// Разметка не интерпретируется, даже если файл имеет расширение `.md`.
pub fn read_script(path: &Path) -> Result<String> {
    if !path.is_file() {
        return Err(ClonerError::ScriptNotFound(path.to_path_buf()));
    }

    let text = std::fs::read_to_string(path)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(ClonerError::EmptyScript(path.to_path_buf()));
    }

    Ok(text.to_string())
}
