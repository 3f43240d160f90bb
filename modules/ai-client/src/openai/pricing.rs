//! USD pricing for OpenAI chat models, per million tokens.

use crate::traits::TokenUsage;

struct ModelPrice {
    prefix: &'static str,
    prompt_per_million: f64,
    completion_per_million: f64,
}

// Longer prefixes first so `gpt-4o-mini` never matches `gpt-4o` or `gpt-4`.
const PRICES: &[ModelPrice] = &[
    ModelPrice {
        prefix: "gpt-4o-mini",
        prompt_per_million: 0.15,
        completion_per_million: 0.60,
    },
    ModelPrice {
        prefix: "gpt-4o",
        prompt_per_million: 2.50,
        completion_per_million: 10.00,
    },
    ModelPrice {
        prefix: "gpt-4-turbo",
        prompt_per_million: 10.00,
        completion_per_million: 30.00,
    },
    ModelPrice {
        prefix: "gpt-4",
        prompt_per_million: 30.00,
        completion_per_million: 60.00,
    },
    ModelPrice {
        prefix: "gpt-3.5-turbo",
        prompt_per_million: 0.50,
        completion_per_million: 1.50,
    },
];

/// Cost of one completion in USD. Unpriced models cost 0.
pub fn cost_usd(model: &str, usage: &TokenUsage) -> f64 {
    PRICES
        .iter()
        .find(|p| model.starts_with(p.prefix))
        .map(|p| {
            (usage.prompt_tokens as f64 * p.prompt_per_million
                + usage.completion_tokens as f64 * p.completion_per_million)
                / 1_000_000.0
        })
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mini_priced_separately_from_4o() {
        let usage = TokenUsage::new(1_000_000, 0);
        assert!((cost_usd("gpt-4o-mini", &usage) - 0.15).abs() < 1e-9);
        assert!((cost_usd("gpt-4o", &usage) - 2.50).abs() < 1e-9);
        assert!((cost_usd("gpt-4", &usage) - 30.0).abs() < 1e-9);
    }

    #[test]
    fn test_cost_combines_prompt_and_completion() {
        let usage = TokenUsage::new(100, 50);
        let expected = (100.0 * 0.15 + 50.0 * 0.60) / 1_000_000.0;
        assert!((cost_usd("gpt-4o-mini-2024-07-18", &usage) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_model_is_free() {
        assert_eq!(cost_usd("davinci", &TokenUsage::new(500, 500)), 0.0);
    }
}
