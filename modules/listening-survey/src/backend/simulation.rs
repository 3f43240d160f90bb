use std::time::Duration;

use async_trait::async_trait;
use listening_common::Persona;
use rand::seq::IndexedRandom;
use tracing::debug;

use super::{ResponseBackend, ResponseResult, UsageSource};
use crate::tables::{DIET_CARNIVORE, DIET_HERBIVORE};

pub const SIMULATION_BACKEND_ID: &str = "simulation";

const DEFAULT_DELAY: Duration = Duration::from_millis(100);

/// Persona bucket that selects the canned answer set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Segment {
    UnderTwentyFive,
    TwentyFiveToSixtyFive,
    OverSixtyFive,
    Carnivore,
    Herbivore,
    Omnivore,
}

impl Segment {
    /// Humans by age (`< 25`, `25..=65`, `> 65`); animals by diet, with any
    /// diet outside the carnivore/herbivore sets using the omnivore lines.
    pub fn for_persona(persona: &Persona) -> Self {
        match persona {
            Persona::Human(h) => match h.age {
                0..=24 => Segment::UnderTwentyFive,
                25..=65 => Segment::TwentyFiveToSixtyFive,
                _ => Segment::OverSixtyFive,
            },
            Persona::Animal(a) => match a.diet_type.as_str() {
                DIET_CARNIVORE => Segment::Carnivore,
                DIET_HERBIVORE => Segment::Herbivore,
                _ => Segment::Omnivore,
            },
        }
    }

    pub fn lines(&self) -> &'static [&'static str] {
        match self {
            Segment::UnderTwentyFive => &[
                "I think this really matters for future generations.",
                "From what I see on social media, we need to act on this soon.",
                "I worry it will be too late if we don't do something now.",
            ],
            Segment::TwentyFiveToSixtyFive => &[
                "In my experience we need a balanced solution.",
                "We should push environmental measures while weighing the economic impact.",
                "Thinking about my family's future, this deserves serious attention.",
            ],
            Segment::OverSixtyFive => &[
                "Having watched things change over many years, this is an important issue.",
                "For my grandchildren's sake, something has to be done.",
                "Finding a sustainable solution is what matters most.",
            ],
            Segment::Carnivore => &[
                "When the number of prey changes, hunting gets much harder.",
                "Our habitat is broken up, so my hunting range keeps shrinking.",
                "The climate is shifting where and when I can find prey.",
            ],
            Segment::Herbivore => &[
                "Plants grow in different places and seasons now, so finding food is harder.",
                "The seasons have shifted and my favourite plants ripen at different times.",
                "Human activity keeps shrinking the places where I can feed.",
            ],
            Segment::Omnivore => &[
                "I eat many kinds of food so I can adapt, but it keeps getting harder.",
                "Eating both plants and animals helps me get by, though I feel the changes.",
                "A flexible diet helps, but losing places to live is a real problem.",
            ],
        }
    }
}

/// Scripted backend: a short delay, then one canned line for the persona's
/// segment. Always succeeds and is free.
#[derive(Debug, Clone)]
pub struct SimulationBackend {
    delay: Duration,
}

impl SimulationBackend {
    pub fn new() -> Self {
        Self {
            delay: DEFAULT_DELAY,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

impl Default for SimulationBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResponseBackend for SimulationBackend {
    fn id(&self) -> &str {
        SIMULATION_BACKEND_ID
    }

    async fn respond(&self, persona: &Persona, _question: &str) -> ResponseResult {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let segment = Segment::for_persona(persona);
        let lines = segment.lines();
        let text = lines.choose(&mut rand::rng()).copied().unwrap_or(lines[0]);
        debug!(persona_id = persona.id(), ?segment, "Simulated response");

        ResponseResult::succeeded(SIMULATION_BACKEND_ID, text, 0.0, 0, UsageSource::Free)
    }
}
