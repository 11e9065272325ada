use crate::context::ComparisonContext;
use crate::measure::WordSimMeasure;

/// Case-insensitive string equality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EqualityMeasure;

impl WordSimMeasure for EqualityMeasure {
    fn id(&self) -> &'static str {
        "equality"
    }

    fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool {
        ctx.first_term().to_lowercase() == ctx.second_term().to_lowercase()
    }

    fn similarity(&self, ctx: &ComparisonContext<'_>) -> f64 {
        if self.are_words_similar(ctx) {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_case() {
        let ctx = ComparisonContext::new("LogicServer", "logicserver");
        assert!(EqualityMeasure.are_words_similar(&ctx));
        assert_eq!(EqualityMeasure.similarity(&ctx), 1.0);
        assert_eq!(
            EqualityMeasure.similarity(&ComparisonContext::new("logic", "logics")),
            0.0
        );
    }
}
