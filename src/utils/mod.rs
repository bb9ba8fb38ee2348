//! Вспомогательные модули

pub mod logger;
pub mod temp;
