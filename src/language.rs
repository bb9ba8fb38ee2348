//! Языки, поддерживаемые моделью XTTS v2

use serde::Serialize;

/// Язык синтеза: отображаемое имя и код, который передается модели
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct Language {
    pub name: &'static str,
    pub code: &'static str,
}

/// Язык по умолчанию
pub const DEFAULT_LANGUAGE: &str = "en";

/// Поддерживаемые языки в порядке отображения в интерфейсе
pub const SUPPORTED_LANGUAGES: [Language; 16] = [
    Language { name: "English", code: "en" },
    Language { name: "Spanish", code: "es" },
    Language { name: "French", code: "fr" },
    Language { name: "German", code: "de" },
    Language { name: "Italian", code: "it" },
    Language { name: "Portuguese", code: "pt" },
    Language { name: "Polish", code: "pl" },
    Language { name: "Turkish", code: "tr" },
    Language { name: "Russian", code: "ru" },
    Language { name: "Dutch", code: "nl" },
    Language { name: "Czech", code: "cs" },
    Language { name: "Arabic", code: "ar" },
    Language { name: "Chinese", code: "zh-cn" },
    Language { name: "Japanese", code: "ja" },
    Language { name: "Hungarian", code: "hu" },
    Language { name: "Korean", code: "ko" },
];

/// Найти язык по коду
pub fn find_language(code: &str) -> Option<&'static Language> {
    SUPPORTED_LANGUAGES.iter().find(|language| language.code == code)
}

/// Проверить, поддерживается ли код языка
pub fn is_supported(code: &str) -> bool {
    find_language(code).is_some()
}
