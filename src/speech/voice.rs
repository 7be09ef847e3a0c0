use serde::{Deserialize, Serialize};

/// A synthesis voice as reported by the speech service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP 47 locale tag, e.g. `hi-IN`.
    pub lang: String,
    #[serde(default)]
    pub default: bool,
}

impl Voice {
    pub fn new(name: impl Into<String>, lang: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lang: lang.into(),
            default: false,
        }
    }
}

fn normalize_locale(tag: &str) -> String {
    tag.trim().replace('_', "-").to_ascii_lowercase()
}

/// Pick the voice whose locale equals `locale`, else the first voice.
/// `None` only when `voices` is empty.
pub fn select_voice<'a>(voices: &'a [Voice], locale: &str) -> Option<&'a Voice> {
    let wanted = normalize_locale(locale);
    voices
        .iter()
        .find(|voice| normalize_locale(&voice.lang) == wanted)
        .or_else(|| voices.first())
}
