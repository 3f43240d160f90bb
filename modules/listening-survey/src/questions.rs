use listening_common::{ListeningError, Result};

/// A catalogued question: short key, display label, full text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetQuestion {
    pub key: &'static str,
    pub label: &'static str,
    pub text: &'static str,
}

pub const PRESET_QUESTIONS: [PresetQuestion; 10] = [
    PresetQuestion {
        key: "climate-change",
        label: "Climate change impact",
        text: "How is climate change affecting your environment and daily life?",
    },
    PresetQuestion {
        key: "biodiversity",
        label: "Biodiversity conservation",
        text: "What do you think is the most important action for protecting biodiversity?",
    },
    PresetQuestion {
        key: "habitat",
        label: "Habitat protection",
        text: "How important is habitat protection in your area?",
    },
    PresetQuestion {
        key: "sustainability",
        label: "Sustainable practices",
        text: "Which sustainable practices do you think everyone should adopt?",
    },
    PresetQuestion {
        key: "extinction",
        label: "Species extinction concern",
        text: "How worried are you about species extinction?",
    },
    PresetQuestion {
        key: "renewable-energy",
        label: "Renewable energy",
        text: "What role should renewable energy play in the future?",
    },
    PresetQuestion {
        key: "plastic",
        label: "Plastic pollution",
        text: "How is plastic pollution affecting your environment?",
    },
    PresetQuestion {
        key: "water",
        label: "Water conservation",
        text: "What do you think is the most important water conservation measure?",
    },
    PresetQuestion {
        key: "deforestation",
        label: "Stopping deforestation",
        text: "What do you think is needed to stop deforestation?",
    },
    PresetQuestion {
        key: "education",
        label: "Environmental education",
        text: "How important do you think environmental education is?",
    },
];

pub fn preset(key: &str) -> Option<&'static PresetQuestion> {
    let key = key.trim();
    PRESET_QUESTIONS
        .iter()
        .find(|q| q.key.eq_ignore_ascii_case(key) || q.label.eq_ignore_ascii_case(key))
}

/// Non-blank custom text wins; otherwise the preset's text.
pub fn resolve_question(preset_key: Option<&str>, custom: Option<&str>) -> Result<String> {
    if let Some(custom) = custom.map(str::trim).filter(|c| !c.is_empty()) {
        return Ok(custom.to_string());
    }

    match preset_key {
        Some(key) => preset(key).map(|q| q.text.to_string()).ok_or_else(|| {
            ListeningError::InvalidArgument(format!("unknown preset question '{key}'"))
        }),
        None => Err(ListeningError::InvalidArgument(
            "a preset or a custom question is required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_text_wins() {
        let q = resolve_question(Some("water"), Some("  Do you like rain? ")).unwrap();
        assert_eq!(q, "Do you like rain?");
    }

    #[test]
    fn test_blank_custom_falls_back_to_preset() {
        let q = resolve_question(Some("Plastic pollution"), Some("   ")).unwrap();
        assert_eq!(q, PRESET_QUESTIONS[6].text);
    }

    #[test]
    fn test_unknown_preset_is_invalid() {
        assert!(matches!(
            resolve_question(Some("volcanoes"), None),
            Err(ListeningError::InvalidArgument(_))
        ));
        assert!(resolve_question(None, None).is_err());
    }

    #[test]
    fn test_keys_are_unique() {
        let mut keys: Vec<_> = PRESET_QUESTIONS.iter().map(|q| q.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), PRESET_QUESTIONS.len());
    }
}
