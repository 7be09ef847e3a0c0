use super::interface::TranslationRequest;

/// Build the single user-role instruction sent to the model.
pub fn build_prompt(request: &TranslationRequest) -> String {
    let language = &request.target_language;
    format!(
        r#"You will be provided with a sentence: "{text}". Your tasks are to:
- Detect what language the sentence is in.
- Translate the sentence into {language}, avoiding any inappropriate or offensive language.
- Provide the pronunciation of the translation in {language}, using phonetic symbols or simplified characters so that a speech synthesizer reads it accurately and naturally.
- Provide a phonetic pronunciation guide of the translation for a reader who does not know {language}.
Return only a JSON object in exactly this format, with no extra symbols or markdown:
{{
  "translation": "translated text here",
  "pronunciation": "pronunciation text here",
  "phoneticPronunciation": "phonetic pronunciation text here"
}}"#,
        text = request.source_text,
        language = language,
    )
}
