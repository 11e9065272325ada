//! Words as delivered by text preprocessing.

use serde::{Deserialize, Serialize};

/// One token occurrence in the documentation text.
///
/// Field order matters: the derived ordering sorts by sentence, then by
/// position, which is the reading order of the text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Word {
    pub sentence_number: usize,
    pub position: usize,
    pub text: String,
    pub lemma: String,
    pub pos_tag: String,
}

impl Word {
    pub fn new(text: impl Into<String>, sentence_number: usize, position: usize) -> Self {
        let text = text.into();
        Self {
            sentence_number,
            position,
            lemma: text.to_lowercase(),
            text,
            pos_tag: String::new(),
        }
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = lemma.into();
        self
    }

    pub fn with_pos_tag(mut self, pos_tag: impl Into<String>) -> Self {
        self.pos_tag = pos_tag.into();
        self
    }

    /// Nouns carry the `NN*` family of Penn Treebank tags.
    pub fn is_noun(&self) -> bool {
        self.pos_tag.starts_with("NN")
    }
}
