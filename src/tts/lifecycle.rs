//! Загрузка модели с ограниченным числом повторов
//!
//! Фиксированная пауза между попытками, без экспоненциального роста и jitter.

use std::future::Future;
use crate::config::RetryPolicy;
use crate::error::{ModelError, ModelResult};

/// Загрузить модель, повторяя попытки согласно политике
///
/// `loader` получает номер попытки (начиная с 1). После последней неудачной
/// попытки возвращается `ModelError::InitializationFailed` с исходной ошибкой.
pub async fn load_with_retry<M, F, Fut>(policy: &RetryPolicy, mut loader: F) -> ModelResult<M>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ModelResult<M>>,
{
    let max_attempts = policy.max_retries.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        log::info!("Loading model: attempt {}/{}...", attempt, max_attempts);

        match loader(attempt).await {
            Ok(model) => {
                log::info!("Model loaded successfully");
                return Ok(model);
            }
            Err(e) => {
                log::error!("Error loading model (attempt {}): {}", attempt, e);
                if attempt >= max_attempts {
                    log::error!("Failed to load model after all retries!");
                    return Err(ModelError::InitializationFailed {
                        attempts: attempt,
                        source: Box::new(e),
                    });
                }
                log::info!("Retrying in {} seconds...", policy.retry_delay_secs);
                tokio::time::sleep(policy.retry_delay()).await;
            }
        }
    }
}
