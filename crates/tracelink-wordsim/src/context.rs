//! The unit of work fed to similarity measures.

use crate::character::CharacterMatch;
use tracelink_model::Word;

/// An ordered pair of terms, optionally with the words they came from.
///
/// Measures only read the context. When `lemmatize` is set and a word is
/// attached, measures that honour it compare lemmas instead of surface text.
/// Character-level measures decide single-character matches with
/// `character_match`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonContext<'a> {
    first_string: &'a str,
    second_string: &'a str,
    first_word: Option<&'a Word>,
    second_word: Option<&'a Word>,
    lemmatize: bool,
    character_match: CharacterMatch,
}

impl<'a> ComparisonContext<'a> {
    pub fn new(first: &'a str, second: &'a str) -> Self {
        Self {
            first_string: first,
            second_string: second,
            first_word: None,
            second_word: None,
            lemmatize: false,
            character_match: CharacterMatch::default(),
        }
    }

    /// Context for two words; the terms are the words' surface texts.
    pub fn from_words(first: &'a Word, second: &'a Word, lemmatize: bool) -> Self {
        Self {
            first_string: &first.text,
            second_string: &second.text,
            first_word: Some(first),
            second_word: Some(second),
            lemmatize,
            character_match: CharacterMatch::default(),
        }
    }

    pub fn with_first_word(mut self, word: &'a Word) -> Self {
        self.first_word = Some(word);
        self
    }

    pub fn with_second_word(mut self, word: &'a Word) -> Self {
        self.second_word = Some(word);
        self
    }

    pub fn with_lemmatize(mut self, lemmatize: bool) -> Self {
        self.lemmatize = lemmatize;
        self
    }

    pub fn with_character_match(mut self, character_match: CharacterMatch) -> Self {
        self.character_match = character_match;
        self
    }

    pub fn first_string(&self) -> &'a str {
        self.first_string
    }

    pub fn second_string(&self) -> &'a str {
        self.second_string
    }

    pub fn first_word(&self) -> Option<&'a Word> {
        self.first_word
    }

    pub fn second_word(&self) -> Option<&'a Word> {
        self.second_word
    }

    pub fn lemmatize(&self) -> bool {
        self.lemmatize
    }

    pub fn character_match(&self) -> CharacterMatch {
        self.character_match
    }

    /// The first term, or the first word's lemma when lemmatizing.
    pub fn first_term(&self) -> &'a str {
        match (self.lemmatize, self.first_word) {
            (true, Some(word)) => &word.lemma,
            _ => self.first_string,
        }
    }

    pub fn second_term(&self) -> &'a str {
        match (self.lemmatize, self.second_word) {
            (true, Some(word)) => &word.lemma,
            _ => self.second_string,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lemmatize_uses_word_lemmas() {
        let first = Word::new("Servers", 0, 1).with_lemma("server");
        let second = Word::new("caches", 0, 3).with_lemma("cache");

        let ctx = ComparisonContext::from_words(&first, &second, false);
        assert_eq!(ctx.first_term(), "Servers");
        assert_eq!(ctx.second_term(), "caches");

        let ctx = ctx.with_lemmatize(true);
        assert_eq!(ctx.first_term(), "server");
        assert_eq!(ctx.second_term(), "cache");
    }

    #[test]
    fn lemmatize_without_words_falls_back_to_strings() {
        let ctx = ComparisonContext::new("Logic", "logics").with_lemmatize(true);
        assert_eq!(ctx.first_term(), "Logic");
        assert_eq!(ctx.second_term(), "logics");
    }
}
