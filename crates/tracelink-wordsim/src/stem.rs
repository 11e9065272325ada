//! Porter stemming and stop words.
//!
//! Precomputed similarity tables and vector tables are keyed by stemmed
//! terms, and gloss overlap compares stems, so lookups have to stem the same
//! way the tables were built.

/// Stems an English word with the Porter (1980) algorithm.
///
/// The input is lower-cased first. Words of two characters or fewer, and
/// words with anything other than ASCII letters, are returned lower-cased but
/// otherwise unchanged.
pub fn stem(word: &str) -> String {
    let lower = word.to_lowercase();
    if lower.len() <= 2 || !lower.bytes().all(|b| b.is_ascii_lowercase()) {
        return lower;
    }

    let mut stemmer = Stemmer {
        b: lower.into_bytes(),
    };
    stemmer.step1a();
    stemmer.step1b();
    stemmer.step1c();
    stemmer.step2();
    stemmer.step3();
    stemmer.step4();
    stemmer.step5();
    String::from_utf8_lossy(&stemmer.b).into_owned()
}

const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "all", "an", "and", "any", "are", "as", "at", "be",
    "because", "been", "before", "being", "between", "both", "but", "by", "can", "did", "do",
    "does", "doing", "down", "during", "each", "few", "for", "from", "further", "had", "has",
    "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in", "into",
    "is", "it", "its", "itself", "just", "me", "more", "most", "my", "no", "nor", "not", "of",
    "off", "on", "once", "only", "or", "other", "our", "ours", "out", "over", "own", "same",
    "she", "should", "so", "some", "such", "than", "that", "the", "their", "theirs", "them",
    "then", "there", "these", "they", "this", "those", "through", "to", "too", "under", "until",
    "up", "very", "was", "we", "were", "what", "when", "where", "which", "while", "who", "whom",
    "why", "will", "with", "you", "your", "yours",
];

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.binary_search(&word).is_ok()
}

/// Splits text into lower-cased alphanumeric tokens, drops stop words and
/// stems the rest.
pub fn content_stems(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
        .filter(|token| !is_stop_word(token))
        .map(|token| stem(&token))
}

struct Stemmer {
    b: Vec<u8>,
}

impl Stemmer {
    fn is_consonant(&self, i: usize) -> bool {
        match self.b[i] {
            b'a' | b'e' | b'i' | b'o' | b'u' => false,
            b'y' => i == 0 || !self.is_consonant(i - 1),
            _ => true,
        }
    }

    /// Number of vowel-consonant sequences in `b[..len]`.
    fn measure(&self, len: usize) -> usize {
        let mut m = 0;
        let mut i = 0;
        while i < len && self.is_consonant(i) {
            i += 1;
        }
        loop {
            while i < len && !self.is_consonant(i) {
                i += 1;
            }
            if i >= len {
                return m;
            }
            while i < len && self.is_consonant(i) {
                i += 1;
            }
            m += 1;
            if i >= len {
                return m;
            }
        }
    }

    fn has_vowel(&self, len: usize) -> bool {
        (0..len).any(|i| !self.is_consonant(i))
    }

    fn ends_double_consonant(&self, len: usize) -> bool {
        len >= 2 && self.b[len - 1] == self.b[len - 2] && self.is_consonant(len - 1)
    }

    /// consonant-vowel-consonant ending, last consonant not w, x or y
    fn ends_cvc(&self, len: usize) -> bool {
        len >= 3
            && self.is_consonant(len - 3)
            && !self.is_consonant(len - 2)
            && self.is_consonant(len - 1)
            && !matches!(self.b[len - 1], b'w' | b'x' | b'y')
    }

    fn ends_with(&self, suffix: &str) -> bool {
        self.b.ends_with(suffix.as_bytes())
    }

    fn replace_suffix(&mut self, suffix: &str, replacement: &str) {
        let stem_len = self.b.len() - suffix.len();
        self.b.truncate(stem_len);
        self.b.extend_from_slice(replacement.as_bytes());
    }

    /// Applies the first rule whose suffix matches, if the remaining stem
    /// has a measure above `min_measure`.
    fn apply_rules(&mut self, rules: &[(&str, &str)], min_measure: usize) {
        for &(suffix, replacement) in rules {
            if self.ends_with(suffix) {
                if self.measure(self.b.len() - suffix.len()) > min_measure {
                    self.replace_suffix(suffix, replacement);
                }
                return;
            }
        }
    }

    fn step1a(&mut self) {
        if self.ends_with("sses") {
            self.replace_suffix("sses", "ss");
        } else if self.ends_with("ies") {
            self.replace_suffix("ies", "i");
        } else if !self.ends_with("ss") && self.ends_with("s") {
            self.b.pop();
        }
    }

    fn step1b(&mut self) {
        if self.ends_with("eed") {
            if self.measure(self.b.len() - 3) > 0 {
                self.b.pop();
            }
            return;
        }

        let removed = if self.ends_with("ed") && self.has_vowel(self.b.len() - 2) {
            self.b.truncate(self.b.len() - 2);
            true
        } else if self.ends_with("ing") && self.has_vowel(self.b.len() - 3) {
            self.b.truncate(self.b.len() - 3);
            true
        } else {
            false
        };
        if !removed {
            return;
        }

        let len = self.b.len();
        if self.ends_with("at") || self.ends_with("bl") || self.ends_with("iz") {
            self.b.push(b'e');
        } else if self.ends_double_consonant(len) && !matches!(self.b[len - 1], b'l' | b's' | b'z')
        {
            self.b.pop();
        } else if self.measure(len) == 1 && self.ends_cvc(len) {
            self.b.push(b'e');
        }
    }

    fn step1c(&mut self) {
        let len = self.b.len();
        if self.ends_with("y") && self.has_vowel(len - 1) {
            self.b[len - 1] = b'i';
        }
    }

    fn step2(&mut self) {
        self.apply_rules(
            &[
                ("ational", "ate"),
                ("tional", "tion"),
                ("enci", "ence"),
                ("anci", "ance"),
                ("izer", "ize"),
                ("abli", "able"),
                ("alli", "al"),
                ("entli", "ent"),
                ("eli", "e"),
                ("ousli", "ous"),
                ("ization", "ize"),
                ("ation", "ate"),
                ("ator", "ate"),
                ("alism", "al"),
                ("iveness", "ive"),
                ("fulness", "ful"),
                ("ousness", "ous"),
                ("aliti", "al"),
                ("iviti", "ive"),
                ("biliti", "ble"),
            ],
            0,
        );
    }

    fn step3(&mut self) {
        self.apply_rules(
            &[
                ("icate", "ic"),
                ("ative", ""),
                ("alize", "al"),
                ("iciti", "ic"),
                ("ical", "ic"),
                ("ful", ""),
                ("ness", ""),
            ],
            0,
        );
    }

    fn step4(&mut self) {
        const SUFFIXES: &[&str] = &[
            "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion",
            "ou", "ism", "ate", "iti", "ous", "ive", "ize",
        ];
        for suffix in SUFFIXES {
            if self.ends_with(suffix) {
                let stem_len = self.b.len() - suffix.len();
                let ion_ok = *suffix != "ion"
                    || (stem_len > 0 && matches!(self.b[stem_len - 1], b's' | b't'));
                if ion_ok && self.measure(stem_len) > 1 {
                    self.b.truncate(stem_len);
                }
                return;
            }
        }
    }

    fn step5(&mut self) {
        let len = self.b.len();
        if self.ends_with("e") {
            let m = self.measure(len - 1);
            if m > 1 || (m == 1 && !self.ends_cvc(len - 1)) {
                self.b.pop();
            }
        }

        let len = self.b.len();
        if self.b[len - 1] == b'l' && self.ends_double_consonant(len) && self.measure(len) > 1 {
            self.b.pop();
        }
    }
}
