//! Prompt text for persona role-play and batch insight generation.

use listening_common::{AnimalPersona, HumanPersona, Persona, SurveyResponse};

/// Answers are asked to stay within roughly this many characters.
pub const ANSWER_CHAR_HINT: usize = 150;

/// Responses included in an insight prompt.
pub const INSIGHT_SAMPLE: usize = 10;

/// System preamble that puts the model in character for `persona`.
pub fn persona_preamble(persona: &Persona) -> String {
    match persona {
        Persona::Human(h) => human_preamble(h),
        Persona::Animal(a) => animal_preamble(a),
    }
}

fn human_preamble(h: &HumanPersona) -> String {
    format!(
        "You are a {age}-year-old {gender} from {country}.\n\
         Your background:\n\
         - Occupation: {occupation}\n\
         - Education: {education}\n\
         - Language: {language}\n\
         - Family status: {family}\n\
         - Living environment: {settlement}\n\n\
         Answer the question naturally, drawing on your cultural background, values and life experience.\n\
         Reply in the voice of this person, within about {limit} characters.",
        age = h.age,
        gender = h.gender,
        country = h.country,
        occupation = h.occupation,
        education = h.education,
        language = h.language,
        family = h.family_status,
        settlement = h.urban_rural,
        limit = ANSWER_CHAR_HINT,
    )
}

fn animal_preamble(a: &AnimalPersona) -> String {
    format!(
        "You are a {species} living in the {habitat}.\n\
         Your traits:\n\
         - Size: {size}\n\
         - Diet: {diet}\n\
         - Activity pattern: {activity}\n\
         - Social structure: {social}\n\
         - Conservation status: {conservation}\n\n\
         Respond the way this species would, guided by its instincts, ecology and relationship with its environment.\n\
         Reply from this animal's point of view, within about {limit} characters.",
        species = a.species,
        habitat = a.habitat,
        size = a.size_category,
        diet = a.diet_type,
        activity = a.activity_pattern,
        social = a.social_structure,
        conservation = a.conservation_status,
        limit = ANSWER_CHAR_HINT,
    )
}

pub const INSIGHT_PREAMBLE: &str = "You are a professional survey analyst.\n\
Analyse the survey results below and produce the key insights and recommendations.\n\
Identify trends, patterns and meaningful findings, and give a comprehensive analysis \
that includes practical recommendations.";

/// User message for an insight request: the first [`INSIGHT_SAMPLE`]
/// responses as `- <persona>: <answer>` lines, then the question.
pub fn insight_input(responses: &[SurveyResponse], question: &str) -> String {
    let survey_data = responses
        .iter()
        .take(INSIGHT_SAMPLE)
        .map(|r| format!("- {}: {}", r.persona.short_description(), r.response))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Survey data:\n{survey_data}\n\nQuestion: {question}\n\n\
         Generate the key insights and recommendations this data supports."
    )
}
