use std::sync::Arc;
use tracelink_wordsim::measures::{
    JaroWinklerMeasure, LevenshteinMeasure, NasariMeasure, NgramMeasure, NgramVariant,
    RelatednessCalculator, VectorBasedMeasure, WordNetMeasure,
};
use tracelink_wordsim::{ConfigError, InMemoryVectors, Lexicon, SenseCache};

const INVALID: [f64; 3] = [1.5, -0.1, f64::NAN];

#[test]
fn every_measure_rejects_out_of_range_thresholds() {
    for threshold in INVALID {
        assert!(LevenshteinMeasure::new(2, 1, threshold).is_err());
        assert!(JaroWinklerMeasure::new(threshold).is_err());
        assert!(NgramMeasure::new(NgramVariant::Lucene, 2, threshold).is_err());
        assert!(VectorBasedMeasure::fast_text(Arc::new(InMemoryVectors::new(2)), threshold).is_err());
        assert!(NasariMeasure::new(
            Arc::new(SenseCache::default()),
            Arc::new(InMemoryVectors::new(2)),
            threshold
        )
        .is_err());
        assert!(WordNetMeasure::new(
            Arc::new(Lexicon::default()),
            [(RelatednessCalculator::WuPalmer, threshold)]
        )
        .is_err());
    }
}

#[test]
fn ngram_length_must_be_positive() {
    assert_eq!(
        NgramMeasure::new(NgramVariant::Positional, 0, 0.5),
        Err(ConfigError::InvalidNgramLength(0))
    );
}

#[test]
fn threshold_error_names_the_measure() {
    let error = JaroWinklerMeasure::new(1.5).unwrap_err();
    assert_eq!(
        error.to_string(),
        "jaroWinkler: similarity threshold outside of valid range [0, 1]: 1.5"
    );
}
