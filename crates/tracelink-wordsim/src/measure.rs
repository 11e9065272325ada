//! The measure abstraction and the closed set of measure variants.
//!
//! Every measure answers a yes/no question for a [`ComparisonContext`] and,
//! where it has one, a graded score. Measures are built once at pipeline
//! configuration time (see [`crate::registry::MeasureRegistry`]) and shared
//! read-only afterwards, so they must be `Send + Sync`. Any caching a measure
//! does is internal and never changes its answer for the same input.

use crate::context::ComparisonContext;
use crate::measures::{
    EqualityMeasure, JaroWinklerMeasure, LevenshteinMeasure, NasariMeasure, NgramMeasure,
    SeWordSimMeasure, VectorBasedMeasure, WordNetMeasure,
};

pub trait WordSimMeasure: Send + Sync {
    /// Stable identifier used in logs and comparison statistics.
    fn id(&self) -> &'static str;

    fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool;

    /// Score in `[0, 1]`, or NaN when the measure has no graded answer for
    /// this input.
    fn similarity(&self, _ctx: &ComparisonContext<'_>) -> f64 {
        f64::NAN
    }
}

// ============================================================================
// Closed variant set
// ============================================================================

/// All measures this crate knows how to build.
#[derive(Debug)]
pub enum SimilarityMeasure {
    Equality(EqualityMeasure),
    Levenshtein(LevenshteinMeasure),
    JaroWinkler(JaroWinklerMeasure),
    Ngram(NgramMeasure),
    /// fastText, GloVe or any other plain word-vector source.
    Vector(VectorBasedMeasure),
    Nasari(NasariMeasure),
    SeWordSim(SeWordSimMeasure),
    WordNet(WordNetMeasure),
}

impl SimilarityMeasure {
    fn inner(&self) -> &dyn WordSimMeasure {
        match self {
            Self::Equality(m) => m,
            Self::Levenshtein(m) => m,
            Self::JaroWinkler(m) => m,
            Self::Ngram(m) => m,
            Self::Vector(m) => m,
            Self::Nasari(m) => m,
            Self::SeWordSim(m) => m,
            Self::WordNet(m) => m,
        }
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, Self::Equality(_))
    }
}

impl WordSimMeasure for SimilarityMeasure {
    fn id(&self) -> &'static str {
        self.inner().id()
    }

    fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool {
        self.inner().are_words_similar(ctx)
    }

    fn similarity(&self, ctx: &ComparisonContext<'_>) -> f64 {
        self.inner().similarity(ctx)
    }
}

macro_rules! impl_from_measure {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for SimilarityMeasure {
                fn from(measure: $ty) -> Self {
                    Self::$variant(measure)
                }
            }
        )*
    };
}

impl_from_measure! {
    Equality => EqualityMeasure,
    Levenshtein => LevenshteinMeasure,
    JaroWinkler => JaroWinklerMeasure,
    Ngram => NgramMeasure,
    Vector => VectorBasedMeasure,
    Nasari => NasariMeasure,
    SeWordSim => SeWordSimMeasure,
    WordNet => WordNetMeasure,
}
