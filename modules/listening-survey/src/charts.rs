//! Plain series for an external chart renderer.

use std::collections::BTreeMap;

use listening_common::{Persona, SurveyResponse};
use serde::Serialize;

/// What a persona chart plots for the current batch's domain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum PersonaChart {
    /// Human ages in batch order.
    Ages(Vec<u32>),
    /// Animal species frequencies.
    Species(BTreeMap<String, usize>),
}

pub fn age_series(personas: &[Persona]) -> Vec<u32> {
    personas
        .iter()
        .filter_map(Persona::as_human)
        .map(|h| h.age)
        .collect()
}

pub fn species_counts(personas: &[Persona]) -> BTreeMap<String, usize> {
    count_by(personas.iter().filter_map(Persona::as_animal).map(|a| a.species.as_str()))
}

/// The `n` most frequent species, ties broken alphabetically.
pub fn top_species(personas: &[Persona], n: usize) -> Vec<(String, usize)> {
    top_n(species_counts(personas), n)
}

/// Response lengths in characters, in response order.
pub fn response_lengths(responses: &[SurveyResponse]) -> Vec<usize> {
    responses.iter().map(|r| r.response.chars().count()).collect()
}

pub(crate) fn count_by<'a>(values: impl Iterator<Item = &'a str>) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for value in values {
        *counts.entry(value.to_string()).or_insert(0) += 1;
    }
    counts
}

pub(crate) fn top_n(counts: BTreeMap<String, usize>, n: usize) -> Vec<(String, usize)> {
    let mut ranked: Vec<_> = counts.into_iter().collect();
    // BTreeMap order is alphabetical, and the sort is stable.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{animal, human, response_for};

    #[test]
    fn test_age_series_in_order() {
        let personas = vec![human(1, 30), human(2, 71), human(3, 18)];
        assert_eq!(age_series(&personas), vec![30, 71, 18]);
    }

    #[test]
    fn test_species_counts_for_animals() {
        let personas = vec![animal(1, "Carnivore"), animal(2, "Herbivore")];
        let counts = species_counts(&personas);
        assert_eq!(counts.get("Red fox"), Some(&2));
        assert_eq!(top_species(&personas, 3), vec![("Red fox".to_string(), 2)]);
        assert!(age_series(&personas).is_empty());
    }

    #[test]
    fn test_top_n_breaks_ties_alphabetically() {
        let counts = count_by(["b", "a", "c", "c"].into_iter());
        assert_eq!(
            top_n(counts, 2),
            vec![("c".to_string(), 2), ("a".to_string(), 1)]
        );
    }

    #[test]
    fn test_response_lengths_count_chars() {
        let responses = vec![response_for(human(1, 30), "Q", "héllo")];
        assert_eq!(response_lengths(&responses), vec![5]);
    }
}
