//! Positional n-gram edit distance (Kondrak 2005).
//!
//! Both terms are padded with `n - 1` prefix characters, then a Levenshtein
//! style table is filled where the substitution cost is the mismatch ratio of
//! the n-grams ending at the compared positions:
//!
//! ```text
//!          D[i-1][j] + 1
//! D[i][j] = min  D[i][j-1] + 1
//!          D[i-1][j-1] + dN(i-1, j-1)
//! ```
//!
//! The table spans the unpadded lengths; `dN` reads the padded strings.

use crate::context::ComparisonContext;
use crate::error::{validate_threshold, ConfigError};
use crate::measure::WordSimMeasure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel used for LUCENE padding. It does not occur in tokenized text.
const LUCENE_PREFIX: char = '\n';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NgramVariant {
    /// Pad with a sentinel; sentinel matches do not count towards the
    /// n-gram length.
    Lucene,
    /// Pad with copies of the first character.
    Positional,
}

impl FromStr for NgramVariant {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "LUCENE" => Ok(Self::Lucene),
            "POSITIONAL" => Ok(Self::Positional),
            _ => Err(ConfigError::UnknownVariant(s.to_string())),
        }
    }
}

impl fmt::Display for NgramVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lucene => f.write_str("LUCENE"),
            Self::Positional => f.write_str("POSITIONAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NgramMeasure {
    variant: NgramVariant,
    n: usize,
    threshold: f64,
}

impl NgramMeasure {
    pub fn new(variant: NgramVariant, n: usize, threshold: f64) -> Result<Self, ConfigError> {
        if n == 0 {
            return Err(ConfigError::InvalidNgramLength(0));
        }
        Ok(Self {
            variant,
            n,
            threshold: validate_threshold("ngram", threshold)?,
        })
    }

    pub fn variant(&self) -> NgramVariant {
        self.variant
    }

    pub fn n(&self) -> usize {
        self.n
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn calculate_distance(&self, x: &str, y: &str) -> f64 {
        let x: Vec<char> = x.chars().collect();
        let y: Vec<char> = y.chars().collect();
        if x.is_empty() || y.is_empty() {
            return x.len().max(y.len()) as f64;
        }

        let (k, l) = (x.len(), y.len());
        let x = self.pad(&x);
        let y = self.pad(&y);

        let mut d = vec![vec![0.0_f64; l + 1]; k + 1];
        for (i, row) in d.iter_mut().enumerate() {
            row[0] = i as f64;
        }
        for j in 1..=l {
            d[0][j] = j as f64;
        }

        for i in 1..=k {
            for j in 1..=l {
                let substitution = d[i - 1][j - 1] + self.ngram_cost(&x, &y, i - 1, j - 1);
                d[i][j] = (d[i - 1][j] + 1.0)
                    .min(d[i][j - 1] + 1.0)
                    .min(substitution);
            }
        }

        d[k][l]
    }

    fn pad(&self, term: &[char]) -> Vec<char> {
        let prefix = match self.variant {
            NgramVariant::Lucene => LUCENE_PREFIX,
            NgramVariant::Positional => term[0],
        };
        let mut padded = Vec::with_capacity(term.len() + self.n - 1);
        padded.extend(std::iter::repeat(prefix).take(self.n - 1));
        padded.extend_from_slice(term);
        padded
    }

    /// Mismatch ratio of the n-grams starting at `i` and `j` in the padded
    /// terms.
    fn ngram_cost(&self, x: &[char], y: &[char], i: usize, j: usize) -> f64 {
        let mut sum = 0.0;
        let mut actual_n = self.n as f64;
        for u in 0..self.n {
            let (a, b) = (x[i + u], y[j + u]);
            if a == b {
                if self.variant == NgramVariant::Lucene && a == LUCENE_PREFIX {
                    actual_n -= 1.0;
                }
            } else {
                sum += 1.0;
            }
        }
        sum / actual_n
    }
}

impl WordSimMeasure for NgramMeasure {
    fn id(&self) -> &'static str {
        "ngram"
    }

    fn are_words_similar(&self, ctx: &ComparisonContext<'_>) -> bool {
        self.similarity(ctx) >= self.threshold
    }

    /// `1 - distance / max_len`. Two empty terms give NaN, which is never
    /// similar.
    fn similarity(&self, ctx: &ComparisonContext<'_>) -> f64 {
        let (x, y) = (ctx.first_term(), ctx.second_term());
        let longest = x.chars().count().max(y.chars().count());
        1.0 - self.calculate_distance(x, y) / longest as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lucene(n: usize) -> NgramMeasure {
        NgramMeasure::new(NgramVariant::Lucene, n, 0.5).unwrap()
    }

    fn positional(n: usize) -> NgramMeasure {
        NgramMeasure::new(NgramVariant::Positional, n, 0.5).unwrap()
    }

    #[test]
    fn empty_input_costs_the_other_length() {
        assert_eq!(lucene(2).calculate_distance("", "abc"), 3.0);
        assert_eq!(lucene(2).calculate_distance("abc", ""), 3.0);
        assert_eq!(lucene(2).calculate_distance("", ""), 0.0);
        assert!(lucene(2)
            .similarity(&ComparisonContext::new("", ""))
            .is_nan());
        assert!(!lucene(2).are_words_similar(&ComparisonContext::new("", "")));
    }

    #[test]
    fn identical_terms_have_zero_distance() {
        for n in 1..=4 {
            assert_eq!(lucene(n).calculate_distance("abc", "abc"), 0.0);
            assert_eq!(positional(n).calculate_distance("abc", "abc"), 0.0);
        }
    }

    #[test]
    fn bigram_substitution_costs_half() {
        assert_eq!(lucene(2).calculate_distance("ab", "ac"), 0.5);
        assert_eq!(positional(2).calculate_distance("ab", "ac"), 0.5);
        let score = lucene(2).similarity(&ComparisonContext::new("ab", "ac"));
        assert!((score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn unigram_is_plain_levenshtein() {
        assert_eq!(lucene(1).calculate_distance("kitten", "sitting"), 3.0);
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert_eq!(
            NgramMeasure::new(NgramVariant::Lucene, 0, 0.5),
            Err(ConfigError::InvalidNgramLength(0))
        );
        assert!(NgramMeasure::new(NgramVariant::Lucene, 2, 1.5).is_err());
        assert!(NgramMeasure::new(NgramVariant::Positional, 2, -0.1).is_err());
    }

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("lucene".parse::<NgramVariant>(), Ok(NgramVariant::Lucene));
        assert_eq!("POSITIONAL".parse::<NgramVariant>(), Ok(NgramVariant::Positional));
        assert_eq!(
            "trigram".parse::<NgramVariant>(),
            Err(ConfigError::UnknownVariant("trigram".to_string()))
        );
    }
}
