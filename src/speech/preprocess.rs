use crate::config_manager::SpeechPreprocessorConfig;

/// Strips asides and symbols a speech synthesizer should not read aloud.
#[derive(Debug, Clone)]
pub struct SpeechTextFilter {
    config: SpeechPreprocessorConfig,
}

impl SpeechTextFilter {
    pub fn new(config: SpeechPreprocessorConfig) -> Self {
        Self { config }
    }

    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();

        if self.config.ignore_asterisks {
            result = filter_pattern(&result, '*', '*');
        }
        if self.config.ignore_brackets {
            result = filter_pattern(&result, '[', ']');
        }
        if self.config.ignore_parentheses {
            result = filter_pattern(&result, '(', ')');
        }
        if self.config.ignore_angle_brackets {
            result = filter_pattern(&result, '<', '>');
        }
        if self.config.remove_special_char {
            result = result
                .chars()
                .filter(|c| c.is_alphanumeric() || c.is_whitespace() || ".,!?;:'-".contains(*c))
                .collect();
        }

        collapse_whitespace(&result)
    }
}

/// Drop everything between `start` and `end`, delimiters included. Nested
/// pairs are handled when the delimiters differ; identical delimiters
/// toggle. An unclosed opener drops the rest of the text.
fn filter_pattern(text: &str, start: char, end: char) -> String {
    let mut result = String::with_capacity(text.len());
    let mut depth = 0usize;

    for ch in text.chars() {
        if start == end && ch == start {
            depth = if depth == 0 { 1 } else { 0 };
        } else if ch == start {
            depth += 1;
        } else if ch == end && depth > 0 {
            depth -= 1;
        } else if depth == 0 {
            result.push(ch);
        }
    }

    result
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_filter() -> SpeechTextFilter {
        SpeechTextFilter::new(SpeechPreprocessorConfig::default())
    }

    #[test]
    fn removes_asides() {
        let out = default_filter().apply("na-MAS-tay (stress on MAS) *softly* [formal] <b>");
        assert_eq!(out, "na-MAS-tay");
    }

    #[test]
    fn nested_parentheses() {
        assert_eq!(filter_pattern("a (b (c) d) e", '(', ')'), "a  e");
    }

    #[test]
    fn keeps_non_latin_text() {
        assert_eq!(default_filter().apply("வணக்கம் (vanakkam)"), "வணக்கம்");
    }

    #[test]
    fn optional_special_character_removal() {
        let filter = SpeechTextFilter::new(SpeechPreprocessorConfig {
            remove_special_char: true,
            ..SpeechPreprocessorConfig::default()
        });
        assert_eq!(filter.apply("OH-lah! #hola @you"), "OH-lah! hola you");
    }
}
