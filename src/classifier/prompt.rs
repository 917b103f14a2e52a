use crate::labels::{Emotion, Language};

fn vocabulary<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Builds the classification prompt for one song.
pub fn build_prompt(title: &str, artist: &str, album: &str) -> String {
    format!(
        r#"You are a music classification assistant. Judge the language and the emotion of the song described below.

Language options: {languages}
Emotion options: {emotions}

Rules:
- "Reflect" is only for songs with a pronounced, explicitly philosophical or introspective theme (for example "Time" by Pink Floyd). General sadness or melancholy is not enough.
- "City_Pop" is only for songs performed by a Japanese artist that belong to the Japanese bubble-era pop tradition. Never infer it from a genre tag alone.

Respond with a JSON object and nothing else. It must have exactly two fields, "language" and "emotion". "emotion" must be a single value, never a list.
Example: {{"language": "EN", "emotion": "Ease"}}

Title: {title}
Artist: {artist}
Album: {album}
"#,
        languages = vocabulary(&Language::ALL),
        emotions = vocabulary(&Emotion::ALL),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_song_metadata() {
        let prompt = build_prompt("Plastic Love", "Mariya Takeuchi", "Variety");
        assert!(prompt.contains("Title: Plastic Love"));
        assert!(prompt.contains("Artist: Mariya Takeuchi"));
        assert!(prompt.contains("Album: Variety"));
    }

    #[test]
    fn test_prompt_embeds_vocabularies() {
        let prompt = build_prompt("a", "b", "");
        assert!(prompt.contains("Language options: CN, JP, EN, Inst, Pure"));
        assert!(prompt.contains("Emotion options: Raise, Ease, Down, Reflect, City_Pop"));
    }

    #[test]
    fn test_prompt_carries_rules_and_format() {
        let prompt = build_prompt("a", "b", "c");
        assert!(prompt.contains("\"Reflect\" is only for"));
        assert!(prompt.contains("\"City_Pop\" is only for"));
        assert!(prompt.contains("Japanese artist"));
        assert!(prompt.contains("\"language\" and \"emotion\""));
        assert!(prompt.contains("never a list"));
        assert!(prompt.contains(r#"{"language": "EN", "emotion": "Ease"}"#));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        assert_eq!(build_prompt("x", "y", "z"), build_prompt("x", "y", "z"));
        assert_ne!(build_prompt("x", "y", "z"), build_prompt("x", "y", ""));
    }
}
