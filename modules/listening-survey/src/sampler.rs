//! Persona generation: one independent weighted draw per attribute, with the
//! continent derived from country (humans) or habitat (animals).

use listening_common::{AnimalPersona, Domain, HumanPersona, ListeningError, Persona, Result};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::info;

use crate::tables::{
    animal_tables, continent_for_country, continent_for_habitat, human_tables, AnimalTables,
    HumanTables, GENDERS, SETTLEMENTS,
};

/// Generates persona batches for one domain.
#[derive(Debug, Clone, Copy)]
pub struct PersonaSampler {
    domain: Domain,
}

impl PersonaSampler {
    pub fn new(domain: Domain) -> Self {
        Self { domain }
    }

    /// Sampler for a domain tag such as `"humans"`. Unknown tags are a
    /// configuration error.
    pub fn for_tag(tag: &str) -> Result<Self> {
        Ok(Self::new(tag.parse()?))
    }

    pub fn domain(&self) -> Domain {
        self.domain
    }

    /// Generate `count` personas with ids `1..=count`, using the thread RNG.
    pub fn generate(&self, count: usize) -> Result<Vec<Persona>> {
        self.generate_with(count, &mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Result<Vec<Persona>> {
        if count == 0 {
            return Err(ListeningError::InvalidArgument(
                "persona count must be at least 1".to_string(),
            ));
        }
        let count = u32::try_from(count).map_err(|_| {
            ListeningError::InvalidArgument(format!("persona count {count} is too large"))
        })?;

        let personas: Vec<Persona> = match self.domain {
            Domain::Humans => {
                let tables = human_tables();
                (1..=count)
                    .map(|id| Persona::Human(sample_human(id, tables, rng)))
                    .collect()
            }
            Domain::Animals => {
                let tables = animal_tables();
                (1..=count)
                    .map(|id| Persona::Animal(sample_animal(id, tables, rng)))
                    .collect()
            }
        };

        info!(domain = %self.domain, count = personas.len(), "Generated persona batch");
        Ok(personas)
    }
}

/// Draw one human persona. Age comes from a weighted bracket, then uniformly
/// within it; gender and settlement are 50/50.
pub fn sample_human<R: Rng + ?Sized>(id: u32, tables: &HumanTables, rng: &mut R) -> HumanPersona {
    let bracket = *tables.age.sample(rng);
    let age = rng.random_range(bracket.min..=bracket.max);
    let country = *tables.country.sample(rng);

    HumanPersona {
        id,
        age,
        gender: pick(&GENDERS, rng),
        country: country.to_string(),
        occupation: tables.occupation.sample(rng).to_string(),
        education: tables.education.sample(rng).to_string(),
        income_level: tables.income.sample(rng).to_string(),
        family_status: tables.family_status.sample(rng).to_string(),
        language: tables.language.sample(rng).to_string(),
        urban_rural: pick(&SETTLEMENTS, rng),
        continent: continent_for_country(country).to_string(),
    }
}

/// Draw one animal persona. Habitat is drawn first since the continent
/// depends on it.
pub fn sample_animal<R: Rng + ?Sized>(id: u32, tables: &AnimalTables, rng: &mut R) -> AnimalPersona {
    let habitat = *tables.habitat.sample(rng);

    AnimalPersona {
        id,
        species: tables.species.sample(rng).to_string(),
        habitat: habitat.to_string(),
        size_category: tables.size.sample(rng).to_string(),
        diet_type: tables.diet.sample(rng).to_string(),
        activity_pattern: tables.activity.sample(rng).to_string(),
        social_structure: tables.social.sample(rng).to_string(),
        lifespan_category: tables.lifespan.sample(rng).to_string(),
        conservation_status: tables.conservation.sample(rng).to_string(),
        continent: continent_for_habitat(habitat).to_string(),
    }
}

fn pick<R: Rng + ?Sized>(options: &[&'static str; 2], rng: &mut R) -> String {
    options.choose(rng).copied().unwrap_or(options[0]).to_string()
}
