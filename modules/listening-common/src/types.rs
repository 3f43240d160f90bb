use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ListeningError;

// --- Domain ---------------------------------------------------------------

/// The persona universe a session surveys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Domain {
    #[default]
    Humans,
    Animals,
}

impl Domain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Humans => "humans",
            Domain::Animals => "animals",
        }
    }

    /// Display title used by collaborators for the session header.
    pub fn title(&self) -> &'static str {
        match self {
            Domain::Humans => "World Listening",
            Domain::Animals => "Wild Listening",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Domain {
    type Err = ListeningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "humans" | "human" => Ok(Domain::Humans),
            "animals" | "animal" => Ok(Domain::Animals),
            other => Err(ListeningError::Configuration(format!(
                "unknown domain '{other}' (expected 'humans' or 'animals')"
            ))),
        }
    }
}

// --- Personas -------------------------------------------------------------

/// A sampled human respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanPersona {
    pub id: u32,
    pub age: u32,
    pub gender: String,
    pub country: String,
    pub occupation: String,
    pub education: String,
    pub income_level: String,
    pub family_status: String,
    pub language: String,
    pub urban_rural: String,
    /// Derived from `country`, never sampled.
    pub continent: String,
}

/// A sampled terrestrial animal respondent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnimalPersona {
    pub id: u32,
    pub species: String,
    pub habitat: String,
    pub size_category: String,
    pub diet_type: String,
    pub activity_pattern: String,
    pub social_structure: String,
    pub lifespan_category: String,
    pub conservation_status: String,
    /// Derived from `habitat`, never sampled.
    pub continent: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Persona {
    Human(HumanPersona),
    Animal(AnimalPersona),
}

impl Persona {
    pub fn id(&self) -> u32 {
        match self {
            Persona::Human(h) => h.id,
            Persona::Animal(a) => a.id,
        }
    }

    pub fn domain(&self) -> Domain {
        match self {
            Persona::Human(_) => Domain::Humans,
            Persona::Animal(_) => Domain::Animals,
        }
    }

    pub fn as_human(&self) -> Option<&HumanPersona> {
        match self {
            Persona::Human(h) => Some(h),
            Persona::Animal(_) => None,
        }
    }

    pub fn as_animal(&self) -> Option<&AnimalPersona> {
        match self {
            Persona::Animal(a) => Some(a),
            Persona::Human(_) => None,
        }
    }

    /// One-line description used in sample listings and insight prompts.
    pub fn short_description(&self) -> String {
        match self {
            Persona::Human(h) => format!("{}-year-old {} from {}", h.age, h.gender, h.country),
            Persona::Animal(a) => format!("{} of the {}", a.species, a.habitat),
        }
    }

    /// Every field by its stable name, in declaration order.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Persona::Human(h) => vec![
                ("id", h.id.to_string()),
                ("age", h.age.to_string()),
                ("gender", h.gender.clone()),
                ("country", h.country.clone()),
                ("occupation", h.occupation.clone()),
                ("education", h.education.clone()),
                ("income_level", h.income_level.clone()),
                ("family_status", h.family_status.clone()),
                ("language", h.language.clone()),
                ("urban_rural", h.urban_rural.clone()),
                ("continent", h.continent.clone()),
            ],
            Persona::Animal(a) => vec![
                ("id", a.id.to_string()),
                ("species", a.species.clone()),
                ("habitat", a.habitat.clone()),
                ("size_category", a.size_category.clone()),
                ("diet_type", a.diet_type.clone()),
                ("activity_pattern", a.activity_pattern.clone()),
                ("social_structure", a.social_structure.clone()),
                ("lifespan_category", a.lifespan_category.clone()),
                ("conservation_status", a.conservation_status.clone()),
                ("continent", a.continent.clone()),
            ],
        }
    }
}

// --- Responses ------------------------------------------------------------

/// One persona's answer to one question. Holds its own copy of the persona
/// so later batch changes never reach past responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub persona_id: u32,
    pub persona: Persona,
    pub question: String,
    pub response: String,
    pub success: bool,
    pub cost_usd: f64,
    pub tokens_used: u32,
    pub backend_id: String,
    /// Full diagnostic for failed responses; `response` carries the truncated form.
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn human() -> HumanPersona {
        HumanPersona {
            id: 7,
            age: 34,
            gender: "female".into(),
            country: "Japan".into(),
            occupation: "Education".into(),
            education: "Tertiary education".into(),
            income_level: "$15,000-30,000".into(),
            family_status: "Married".into(),
            language: "Japanese".into(),
            urban_rural: "urban".into(),
            continent: "Asia".into(),
        }
    }

    #[test]
    fn test_domain_parse() {
        assert_eq!("humans".parse::<Domain>().unwrap(), Domain::Humans);
        assert_eq!(" Animals ".parse::<Domain>().unwrap(), Domain::Animals);
        assert!(matches!(
            "plants".parse::<Domain>(),
            Err(ListeningError::Configuration(_))
        ));
    }

    #[test]
    fn test_short_description() {
        let persona = Persona::Human(human());
        assert_eq!(persona.short_description(), "34-year-old female from Japan");
    }

    #[test]
    fn test_fields_cover_every_human_attribute() {
        let fields = Persona::Human(human()).fields();
        let names: Vec<_> = fields.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            vec![
                "id",
                "age",
                "gender",
                "country",
                "occupation",
                "education",
                "income_level",
                "family_status",
                "language",
                "urban_rural",
                "continent"
            ]
        );
        assert_eq!(fields[1].1, "34");
    }

    #[test]
    fn test_persona_serializes_with_kind_tag() {
        let json = serde_json::to_value(Persona::Human(human())).unwrap();
        assert_eq!(json["kind"], "human");
        assert_eq!(json["country"], "Japan");
    }
}
