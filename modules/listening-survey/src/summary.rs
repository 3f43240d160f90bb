use std::collections::{BTreeMap, HashSet};
use std::fmt;

use listening_common::{Domain, Persona};
use serde::Serialize;

use crate::charts::{count_by, top_n};

const TOP: usize = 3;

/// Headline statistics for a generated persona batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "domain", rename_all = "lowercase")]
pub enum PersonaSummary {
    Humans {
        count: usize,
        mean_age: f64,
        genders: BTreeMap<String, usize>,
        top_countries: Vec<(String, usize)>,
        distinct_languages: usize,
    },
    Animals {
        count: usize,
        distinct_species: usize,
        top_habitats: Vec<(String, usize)>,
        diets: BTreeMap<String, usize>,
        conservation: BTreeMap<String, usize>,
    },
}

impl PersonaSummary {
    pub fn from_personas(domain: Domain, personas: &[Persona]) -> Self {
        match domain {
            Domain::Humans => {
                let humans: Vec<_> = personas.iter().filter_map(Persona::as_human).collect();
                let mean_age = if humans.is_empty() {
                    0.0
                } else {
                    humans.iter().map(|h| f64::from(h.age)).sum::<f64>() / humans.len() as f64
                };
                PersonaSummary::Humans {
                    count: humans.len(),
                    mean_age,
                    genders: count_by(humans.iter().map(|h| h.gender.as_str())),
                    top_countries: top_n(count_by(humans.iter().map(|h| h.country.as_str())), TOP),
                    distinct_languages: humans
                        .iter()
                        .map(|h| h.language.as_str())
                        .collect::<HashSet<_>>()
                        .len(),
                }
            }
            Domain::Animals => {
                let animals: Vec<_> = personas.iter().filter_map(Persona::as_animal).collect();
                PersonaSummary::Animals {
                    count: animals.len(),
                    distinct_species: animals
                        .iter()
                        .map(|a| a.species.as_str())
                        .collect::<HashSet<_>>()
                        .len(),
                    top_habitats: top_n(count_by(animals.iter().map(|a| a.habitat.as_str())), TOP),
                    diets: count_by(animals.iter().map(|a| a.diet_type.as_str())),
                    conservation: count_by(animals.iter().map(|a| a.conservation_status.as_str())),
                }
            }
        }
    }
}

fn join_counts<'a>(counts: impl IntoIterator<Item = (&'a String, &'a usize)>) -> String {
    counts
        .into_iter()
        .map(|(k, v)| format!("{k} ({v})"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl fmt::Display for PersonaSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersonaSummary::Humans {
                count,
                mean_age,
                genders,
                top_countries,
                distinct_languages,
            } => {
                writeln!(f, "\n=== Personas: {count} humans ===")?;
                writeln!(f, "Mean age:      {mean_age:.1}")?;
                writeln!(f, "Genders:       {}", join_counts(genders))?;
                writeln!(
                    f,
                    "Top countries: {}",
                    join_counts(top_countries.iter().map(|(k, v)| (k, v)))
                )?;
                writeln!(f, "Languages:     {distinct_languages}")
            }
            PersonaSummary::Animals {
                count,
                distinct_species,
                top_habitats,
                diets,
                conservation,
            } => {
                writeln!(f, "\n=== Personas: {count} animals ===")?;
                writeln!(f, "Species:       {distinct_species}")?;
                writeln!(
                    f,
                    "Top habitats:  {}",
                    join_counts(top_habitats.iter().map(|(k, v)| (k, v)))
                )?;
                writeln!(f, "Diets:         {}", join_counts(diets))?;
                writeln!(f, "Conservation:  {}", join_counts(conservation))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{animal, human};

    #[test]
    fn test_human_summary() {
        let personas = vec![human(1, 20), human(2, 31), human(3, 40)];
        match PersonaSummary::from_personas(Domain::Humans, &personas) {
            PersonaSummary::Humans {
                count,
                mean_age,
                genders,
                top_countries,
                distinct_languages,
            } => {
                assert_eq!(count, 3);
                assert!((mean_age - 30.333).abs() < 0.01);
                assert_eq!(genders.get("female"), Some(&3));
                assert_eq!(top_countries, vec![("Japan".to_string(), 3)]);
                assert_eq!(distinct_languages, 1);
            }
            other => panic!("unexpected summary {other:?}"),
        }
    }

    #[test]
    fn test_animal_summary_display() {
        let personas = vec![animal(1, "Carnivore"), animal(2, "Omnivore")];
        let summary = PersonaSummary::from_personas(Domain::Animals, &personas);
        let text = summary.to_string();
        assert!(text.contains("2 animals"));
        assert!(text.contains("Carnivore (1)"));
        assert!(text.contains("Temperate forest (2)"));
    }
}
