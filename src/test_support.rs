//! Общие вспомогательные средства для тестов

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use async_trait::async_trait;
use hound::{SampleFormat, WavSpec, WavWriter};
use parking_lot::Mutex;
use crate::error::{ModelError, ModelResult};
use crate::tts::{SynthesisRequest, VoiceCloningModel};

/// Записать моно WAV с синусом 440 Гц заданной длительности
pub fn write_wav(path: &Path, seconds: f64, sample_rate: u32) {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    let samples = (seconds * sample_rate as f64).round() as usize;
    for i in 0..samples {
        let t = i as f64 / sample_rate as f64;
        let value = (t * 440.0 * 2.0 * std::f64::consts::PI).sin() * 0.3 * i16::MAX as f64;
        writer.write_sample(value as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Поведение тестовой модели
#[derive(Debug, Clone)]
pub enum MockBehavior {
    WriteBytes(Vec<u8>),
    WriteNothing,
    Fail(String),
}

/// Модель, которая ничего не синтезирует и запоминает вызовы
pub struct MockModel {
    behavior: MockBehavior,
    calls: AtomicUsize,
    last_language: Mutex<Option<String>>,
}

impl MockModel {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_language: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_language(&self) -> Option<String> {
        self.last_language.lock().clone()
    }
}

#[async_trait]
impl VoiceCloningModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn synthesize(&self, request: &SynthesisRequest<'_>) -> ModelResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_language.lock() = Some(request.language.to_string());

        match &self.behavior {
            MockBehavior::WriteBytes(bytes) => {
                tokio::fs::write(request.output_path, bytes).await?;
                Ok(())
            }
            MockBehavior::WriteNothing => Ok(()),
            MockBehavior::Fail(message) => Err(ModelError::Request {
                status: 500,
                body: message.clone(),
            }),
        }
    }
}
