//! Order-independent term pairs, used as cache and statistics keys.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Two terms stored in lexicographic order, so `WordPair::new(a, b)` and
/// `WordPair::new(b, a)` are the same value with the same hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordPair {
    first: String,
    second: String,
}

impl WordPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn contains(&self, term: &str) -> bool {
        self.first == term || self.second == term
    }
}

impl fmt::Display for WordPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    fn hash_of(pair: &WordPair) -> u64 {
        let mut hasher = DefaultHasher::new();
        pair.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn stores_terms_sorted() {
        let pair = WordPair::new("server", "cache");
        assert_eq!(pair.first(), "cache");
        assert_eq!(pair.second(), "server");
        assert!(pair.contains("server"));
        assert!(!pair.contains("logic"));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn pair_is_order_independent(a in ".{0,12}", b in ".{0,12}") {
            let ab = WordPair::new(a.clone(), b.clone());
            let ba = WordPair::new(b, a);
            prop_assert_eq!(hash_of(&ab), hash_of(&ba));
            prop_assert_eq!(ab, ba);
        }
    }
}
