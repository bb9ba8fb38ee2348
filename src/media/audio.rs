//! Модуль для проверки референсного аудио
//!
//! Проверки выполняются до обращения к модели: существование файла, размер,
//! расширение и длительность записи.

use std::fs::File;
use std::path::{Path, PathBuf};
use hound::WavReader;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use crate::error::{ClonerError, Result};

/// Допустимые расширения референсного аудио
pub const AUDIO_EXTENSIONS: [&str; 5] = ["wav", "mp3", "flac", "m4a", "ogg"];

/// Максимальный размер файла в мегабайтах
pub const MAX_FILE_SIZE_MB: u64 = 50;

/// Жесткие границы длительности в секундах
pub const MIN_DURATION_SECS: f64 = 1.0;
pub const MAX_DURATION_SECS: f64 = 60.0;

/// Рекомендуемая минимальная длительность
pub const RECOMMENDED_MIN_SECS: f64 = 3.0;

/// Параметры аудиофайла
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInfo {
    /// Длительность в секундах
    pub duration: f64,
    /// Частота дискретизации
    pub sample_rate: u32,
    /// Количество каналов
    pub channels: u16,
    /// Формат (расширение в верхнем регистре)
    pub format: String,
}

/// Референсное аудио, прошедшее проверку
#[derive(Debug, Clone)]
pub struct ProcessedAudio {
    pub path: PathBuf,
    pub info: AudioInfo,
    /// Сообщение для пользователя, включая рекомендации
    pub status: String,
}

/// Расширение файла в нижнем регистре
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Проверить, что расширение входит в список допустимых
pub fn has_audio_extension(path: &Path) -> bool {
    extension_of(path)
        .map(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Проверка файла: существование, размер, расширение
pub fn validate_audio_file(path: &Path) -> Result<()> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) if metadata.is_file() => metadata,
        _ => return Err(ClonerError::ReferenceNotFound(path.to_path_buf())),
    };

    let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
    if size_mb > MAX_FILE_SIZE_MB as f64 {
        return Err(ClonerError::FileTooLarge {
            size_mb,
            max_mb: MAX_FILE_SIZE_MB,
        });
    }

    if !has_audio_extension(path) {
        let extension = extension_of(path)
            .map(|ext| format!(".{}", ext))
            .unwrap_or_else(|| "(none)".to_string());
        let allowed = AUDIO_EXTENSIONS
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ClonerError::UnsupportedFormat { extension, allowed });
    }

    Ok(())
}

/// Получить параметры аудиофайла
pub fn get_audio_info(path: &Path) -> Result<AudioInfo> {
    let format = extension_of(path).unwrap_or_default().to_ascii_uppercase();

    // Для PCM WAV используем hound; остальные кодеки внутри WAV (mu-law, A-law, ADPCM) читает symphonia
    let (duration, sample_rate, channels) = if format == "WAV" {
        match probe_wav(path) {
            Ok(probed) => probed,
            Err(e) => {
                log::debug!("hound could not read {}: {}, falling back to symphonia", path.display(), e);
                probe_with_symphonia(path)?
            }
        }
    } else {
        probe_with_symphonia(path)?
    };

    Ok(AudioInfo {
        duration,
        sample_rate,
        channels,
        format,
    })
}

fn probe_wav(path: &Path) -> Result<(f64, u32, u16)> {
    let reader = WavReader::open(path)
        .map_err(|e| ClonerError::AudioDecoding(format!("Failed to open WAV file: {}", e)))?;
    let spec = reader.spec();
    if spec.sample_rate == 0 {
        return Err(ClonerError::AudioDecoding("WAV header has zero sample rate".to_string()));
    }
    let duration = reader.duration() as f64 / spec.sample_rate as f64;
    Ok((duration, spec.sample_rate, spec.channels))
}

fn probe_with_symphonia(path: &Path) -> Result<(f64, u32, u16)> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = extension_of(path) {
        hint.with_extension(&ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| ClonerError::AudioDecoding(e.to_string()))?;
    let mut format = probed.format;

    let (track_id, sample_rate, channels, n_frames) = {
        let track = format
            .default_track()
            .ok_or_else(|| ClonerError::AudioDecoding("No audio track found".to_string()))?;
        let params = &track.codec_params;
        let sample_rate = params
            .sample_rate
            .ok_or_else(|| ClonerError::AudioDecoding("Unknown sample rate".to_string()))?;
        let channels = params.channels.map(|c| c.count() as u16).unwrap_or(1);
        (track.id, sample_rate, channels, params.n_frames)
    };

    // Если контейнер не хранит количество кадров, суммируем длительности пакетов
    let frames = match n_frames {
        Some(frames) => frames,
        None => {
            let mut frames = 0u64;
            loop {
                match format.next_packet() {
                    Ok(packet) if packet.track_id() == track_id => frames += packet.dur,
                    Ok(_) => {}
                    Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                    Err(e) => return Err(ClonerError::AudioDecoding(e.to_string())),
                }
            }
            frames
        }
    };

    Ok((frames as f64 / sample_rate as f64, sample_rate, channels))
}

/// Полная подготовка референсного аудио для клонирования
///
/// Длительность вне диапазона 1-60 секунд отклоняется; запись короче
/// рекомендуемых 3 секунд принимается с подсказкой.
pub fn process_reference_audio(path: &Path) -> Result<ProcessedAudio> {
    validate_audio_file(path)?;

    let info = get_audio_info(path)?;
    if info.duration < MIN_DURATION_SECS {
        return Err(ClonerError::AudioTooShort { duration: info.duration });
    }
    if info.duration > MAX_DURATION_SECS {
        return Err(ClonerError::AudioTooLong { duration: info.duration });
    }

    let mut status = format!(
        "Audio processed successfully!\nDuration: {:.1}s | Sample Rate: {}Hz | Channels: {} | Format: {}",
        info.duration, info.sample_rate, info.channels, info.format
    );
    if info.duration < RECOMMENDED_MIN_SECS {
        status.push_str("\nTip: 3-10 seconds of clear speech works best!");
    }

    log::debug!("Reference audio {} accepted: {:?}", path.display(), info);

    Ok(ProcessedAudio {
        path: path.to_path_buf(),
        info,
        status,
    })
}
