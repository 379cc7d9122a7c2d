//! Voice Context - 默认音色目录

use super::Voice;

/// 内置的高质量英语/西班牙语音色
///
/// 可通过配置文件中的 `voices` 覆盖
pub fn default_catalog() -> Vec<Voice> {
    vec![
        Voice::new(
            "en_US-lessac-high",
            "Lessac (Female)",
            "en_US",
            "Clear, professional female voice",
        ),
        Voice::new(
            "en_US-amy-high",
            "Amy (Female)",
            "en_US",
            "Warm, friendly female voice",
        ),
        Voice::new(
            "en_GB-alba-high",
            "Alba (Female)",
            "en_GB",
            "British accent, clear female voice",
        ),
        Voice::new(
            "es_ES-maragda-high",
            "Maragda (Female)",
            "es_ES",
            "European Spanish, female voice",
        ),
        Voice::new(
            "es_MX-ald-high",
            "Ald (Male)",
            "es_MX",
            "Mexican Spanish, male voice",
        ),
    ]
}
