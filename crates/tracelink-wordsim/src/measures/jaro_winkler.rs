use crate::character::{self, CharacterMatch};
use crate::context::ComparisonContext;
use crate::error::{validate_threshold, ConfigError};
use crate::measure::WordSimMeasure;
use serde::{Deserialize, Serialize};

/// Jaro-Winkler similarity over lower-cased terms, using the context's
/// character match function.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JaroWinklerMeasure {
    threshold: f64,
}

impl JaroWinklerMeasure {
    pub fn new(threshold: f64) -> Result<Self, ConfigError> {
        Ok(Self {
            threshold: validate_threshold("jaroWinkler", threshold)?,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}

impl WordSimMeasure for JaroWinklerMeasure {
    fn id(&self) -> &'static str {
        "jaro_winkler"
    }

    fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool {
        self.similarity(ctx) >= self.threshold
    }

    fn similarity(&self, ctx: &ComparisonContext<'_>) -> f64 {
        let first = ctx.first_term().to_lowercase();
        let second = ctx.second_term().to_lowercase();
        match ctx.character_match() {
            CharacterMatch::Equal => strsim::jaro_winkler(&first, &second),
            matcher => character::jaro_winkler(&first, &second, matcher),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_prefix_scores_high() {
        let measure = JaroWinklerMeasure::new(0.9).unwrap();
        assert!(measure.are_words_similar(&ComparisonContext::new("Persistence", "persistency")));
        assert!(!measure.are_words_similar(&ComparisonContext::new("cache", "router")));
        assert!(JaroWinklerMeasure::new(f64::NAN).is_err());
    }

    #[test]
    fn homoglyph_matching_is_opt_in() {
        let measure = JaroWinklerMeasure::new(0.95).unwrap();
        let ctx = ComparisonContext::new("Scheduler", "Ѕсhеdulеr");
        assert!(!measure.are_words_similar(&ctx));
        let ctx = ctx.with_character_match(CharacterMatch::EqualOrHomoglyph);
        assert_eq!(measure.similarity(&ctx), 1.0);
        assert!(measure.are_words_similar(&ctx));
    }
}
