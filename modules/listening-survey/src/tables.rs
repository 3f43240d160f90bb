//! Static demographic distributions for both domains, plus the deterministic
//! geography lookups. Built once per process and read-only afterwards.

use std::sync::LazyLock;

use listening_common::Result;

use crate::weighted::WeightedCategory;

/// Placeholder continent for anything the lookups do not map.
pub const WORLDWIDE: &str = "Worldwide";

pub const GENDERS: [&str; 2] = ["male", "female"];
pub const SETTLEMENTS: [&str; 2] = ["urban", "rural"];

pub const DIET_HERBIVORE: &str = "Herbivore";
pub const DIET_CARNIVORE: &str = "Carnivore";
pub const DIET_OMNIVORE: &str = "Omnivore";
pub const DIET_INSECTIVORE: &str = "Insectivore";

/// An inclusive integer age range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBracket {
    pub min: u32,
    pub max: u32,
}

impl AgeBracket {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, age: u32) -> bool {
        (self.min..=self.max).contains(&age)
    }
}

// --- Humans ---------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HumanTables {
    pub age: WeightedCategory<AgeBracket>,
    pub country: WeightedCategory<&'static str>,
    pub language: WeightedCategory<&'static str>,
    pub occupation: WeightedCategory<&'static str>,
    pub education: WeightedCategory<&'static str>,
    pub income: WeightedCategory<&'static str>,
    pub family_status: WeightedCategory<&'static str>,
}

impl HumanTables {
    /// World population shares by age, country, language and socio-economic status.
    pub fn build() -> Result<Self> {
        Ok(Self {
            age: WeightedCategory::new(
                "age",
                [
                    (AgeBracket::new(0, 14), 25.4),
                    (AgeBracket::new(15, 24), 15.5),
                    (AgeBracket::new(25, 34), 17.2),
                    (AgeBracket::new(35, 44), 13.8),
                    (AgeBracket::new(45, 54), 11.9),
                    (AgeBracket::new(55, 64), 8.7),
                    (AgeBracket::new(65, 74), 5.2),
                    (AgeBracket::new(75, 100), 2.3),
                ],
            )?,
            country: WeightedCategory::new(
                "country",
                [
                    ("China", 17.8),
                    ("India", 17.7),
                    ("United States", 4.2),
                    ("Indonesia", 3.4),
                    ("Pakistan", 2.8),
                    ("Brazil", 2.7),
                    ("Nigeria", 2.6),
                    ("Bangladesh", 2.1),
                    ("Russia", 1.9),
                    ("Mexico", 1.6),
                    ("Japan", 1.6),
                    ("Philippines", 1.4),
                    ("Ethiopia", 1.4),
                    ("Vietnam", 1.2),
                    ("Egypt", 1.3),
                    ("Turkey", 1.1),
                    ("Iran", 1.1),
                    ("Germany", 1.1),
                    ("Thailand", 0.9),
                    ("United Kingdom", 0.9),
                    ("Other", 32.8),
                ],
            )?,
            language: WeightedCategory::new(
                "language",
                [
                    ("Mandarin Chinese", 14.1),
                    ("Hindi", 6.0),
                    ("English", 5.1),
                    ("Spanish", 4.9),
                    ("Arabic", 4.2),
                    ("Bengali", 3.3),
                    ("Portuguese", 2.9),
                    ("Russian", 2.2),
                    ("Japanese", 1.7),
                    ("French", 1.3),
                    ("German", 1.0),
                    ("Korean", 0.9),
                    ("Vietnamese", 0.9),
                    ("Turkish", 0.8),
                    ("Italian", 0.7),
                    ("Other", 50.0),
                ],
            )?,
            occupation: WeightedCategory::new(
                "occupation",
                [
                    ("Agriculture and livestock", 26.2),
                    ("Services", 15.8),
                    ("Manufacturing", 12.6),
                    ("Commerce and trade", 11.0),
                    ("Construction", 6.9),
                    ("Education", 4.7),
                    ("Healthcare and care work", 4.2),
                    ("Public sector", 3.8),
                    ("IT and technology", 2.9),
                    ("Transportation", 2.8),
                    ("Finance", 2.1),
                    ("Student", 4.5),
                    ("Unemployed", 2.5),
                ],
            )?,
            education: WeightedCategory::new(
                "education",
                [
                    ("No formal schooling", 13.2),
                    ("Primary education", 28.4),
                    ("Secondary education", 35.7),
                    ("Vocational training", 8.9),
                    ("Tertiary education", 11.2),
                    ("Postgraduate", 2.6),
                ],
            )?,
            income: WeightedCategory::new(
                "income",
                [
                    ("Under $1,000", 15.3),
                    ("$1,000-5,000", 28.7),
                    ("$5,000-15,000", 26.9),
                    ("$15,000-30,000", 14.2),
                    ("$30,000-50,000", 7.8),
                    ("$50,000-75,000", 4.1),
                    ("$75,000-100,000", 1.8),
                    ("$100,000 and over", 1.2),
                ],
            )?,
            family_status: WeightedCategory::new(
                "family_status",
                [
                    ("Single", 22.8),
                    ("Married", 45.3),
                    ("Married with children", 25.5),
                    ("Single parent", 4.2),
                    ("Extended family", 2.2),
                ],
            )?,
        })
    }
}

/// Continent for a sampled country. Unmapped countries (including "Other")
/// resolve to [`WORLDWIDE`].
pub fn continent_for_country(country: &str) -> &'static str {
    match country {
        "China" | "India" | "Indonesia" | "Pakistan" | "Bangladesh" | "Japan"
        | "Philippines" | "Vietnam" | "Iran" | "Thailand" => "Asia",
        "United States" | "Mexico" => "North America",
        "Brazil" => "South America",
        "Nigeria" | "Ethiopia" | "Egypt" => "Africa",
        "Russia" | "Turkey" => "Europe/Asia",
        "Germany" | "United Kingdom" => "Europe",
        _ => WORLDWIDE,
    }
}

// --- Animals --------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AnimalTables {
    pub species: WeightedCategory<&'static str>,
    pub habitat: WeightedCategory<&'static str>,
    pub size: WeightedCategory<&'static str>,
    pub diet: WeightedCategory<&'static str>,
    pub activity: WeightedCategory<&'static str>,
    pub social: WeightedCategory<&'static str>,
    pub lifespan: WeightedCategory<&'static str>,
    pub conservation: WeightedCategory<&'static str>,
}

impl AnimalTables {
    /// Relative frequencies for major terrestrial mammals and their traits.
    pub fn build() -> Result<Self> {
        Ok(Self {
            species: WeightedCategory::new(
                "species",
                [
                    ("African elephant", 2.1),
                    ("Lion", 1.8),
                    ("Tiger", 0.8),
                    ("Brown bear", 2.3),
                    ("Gray wolf", 3.2),
                    ("Red fox", 4.5),
                    ("Deer", 5.8),
                    ("Wild boar", 3.9),
                    ("Chimpanzee", 1.2),
                    ("Gorilla", 0.6),
                    ("Orangutan", 0.4),
                    ("Leopard", 1.5),
                    ("Cheetah", 0.3),
                    ("Giraffe", 1.1),
                    ("Zebra", 2.7),
                    ("Rhinoceros", 0.5),
                    ("Hippopotamus", 1.3),
                    ("Kangaroo", 3.4),
                    ("Giant panda", 0.2),
                    ("Snow leopard", 0.3),
                    ("Jaguar", 0.7),
                    ("Puma", 1.9),
                    ("Lynx", 1.4),
                    ("Bison", 1.6),
                    ("Moose", 2.1),
                    ("Reindeer", 3.8),
                    ("Mountain goat", 1.7),
                    ("Other", 53.5),
                ],
            )?,
            habitat: WeightedCategory::new(
                "habitat",
                [
                    ("Tropical rainforest", 18.2),
                    ("Temperate forest", 15.4),
                    ("Grassland and savanna", 22.1),
                    ("Desert", 8.7),
                    ("Mountains", 12.3),
                    ("Tundra", 6.8),
                    ("Wetland", 7.2),
                    ("Coast", 4.1),
                    ("Mixed environment", 5.2),
                ],
            )?,
            size: WeightedCategory::new(
                "size",
                [
                    ("Tiny (under 1kg)", 8.2),
                    ("Small (1-10kg)", 25.4),
                    ("Medium (10-50kg)", 28.7),
                    ("Large (50-200kg)", 22.1),
                    ("Very large (200-1000kg)", 12.8),
                    ("Giant (over 1000kg)", 2.8),
                ],
            )?,
            diet: WeightedCategory::new(
                "diet",
                [
                    (DIET_HERBIVORE, 42.3),
                    (DIET_CARNIVORE, 18.7),
                    (DIET_OMNIVORE, 28.4),
                    (DIET_INSECTIVORE, 10.6),
                ],
            )?,
            activity: WeightedCategory::new(
                "activity",
                [
                    ("Diurnal", 45.2),
                    ("Nocturnal", 32.1),
                    ("Crepuscular", 15.7),
                    ("Cathemeral", 7.0),
                ],
            )?,
            social: WeightedCategory::new(
                "social",
                [
                    ("Solitary", 38.4),
                    ("Pair-bonded", 12.6),
                    ("Small group", 23.8),
                    ("Large herd", 18.2),
                    ("Complex society", 7.0),
                ],
            )?,
            lifespan: WeightedCategory::new(
                "lifespan",
                [
                    ("Short (1-5 years)", 15.2),
                    ("Moderate (5-15 years)", 35.8),
                    ("Long (15-30 years)", 28.4),
                    ("Very long (30-50 years)", 15.3),
                    ("Exceptional (50+ years)", 5.3),
                ],
            )?,
            conservation: WeightedCategory::new(
                "conservation",
                [
                    ("Least concern", 45.2),
                    ("Near threatened", 18.7),
                    ("Vulnerable", 15.8),
                    ("Endangered", 12.3),
                    ("Critically endangered", 8.0),
                ],
            )?,
        })
    }
}

/// Continent or region for a sampled habitat. Unmapped habitats resolve to
/// [`WORLDWIDE`].
pub fn continent_for_habitat(habitat: &str) -> &'static str {
    match habitat {
        "Tropical rainforest" => "Africa, South America, Asia",
        "Temperate forest" => "North America, Europe",
        "Grassland and savanna" => "Africa, Asia",
        "Desert" => "Africa, Asia, Australia",
        "Tundra" => "North America, Europe, Asia",
        _ => WORLDWIDE,
    }
}

// --- Process-wide instances -----------------------------------------------

static HUMAN_TABLES: LazyLock<HumanTables> =
    LazyLock::new(|| HumanTables::build().expect("static human tables are valid"));

static ANIMAL_TABLES: LazyLock<AnimalTables> =
    LazyLock::new(|| AnimalTables::build().expect("static animal tables are valid"));

pub fn human_tables() -> &'static HumanTables {
    &HUMAN_TABLES
}

pub fn animal_tables() -> &'static AnimalTables {
    &ANIMAL_TABLES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_build() {
        let humans = HumanTables::build().unwrap();
        assert_eq!(humans.age.len(), 8);
        assert_eq!(humans.country.len(), 21);
        let animals = AnimalTables::build().unwrap();
        assert_eq!(animals.habitat.len(), 9);
        assert_eq!(animals.diet.len(), 4);
    }

    #[test]
    fn test_every_sampled_country_except_other_is_mapped() {
        for country in human_tables().country.labels() {
            let continent = continent_for_country(country);
            if *country == "Other" {
                assert_eq!(continent, WORLDWIDE);
            } else {
                assert_ne!(continent, WORLDWIDE, "{country} is unmapped");
            }
        }
    }

    #[test]
    fn test_continent_lookup_is_deterministic() {
        assert_eq!(continent_for_country("Japan"), continent_for_country("Japan"));
        assert_eq!(continent_for_country("Atlantis"), WORLDWIDE);
        assert_eq!(continent_for_habitat("Desert"), "Africa, Asia, Australia");
        assert_eq!(continent_for_habitat("Mountains"), WORLDWIDE);
        assert_eq!(continent_for_habitat("Ocean floor"), WORLDWIDE);
    }

    #[test]
    fn test_age_brackets_are_ordered_and_inclusive() {
        let brackets = human_tables().age.labels();
        assert!(brackets.iter().all(|b| b.min <= b.max));
        assert!(brackets.windows(2).all(|w| w[0].max + 1 == w[1].min));
        assert!(AgeBracket::new(25, 34).contains(25));
        assert!(AgeBracket::new(25, 34).contains(34));
    }
}
