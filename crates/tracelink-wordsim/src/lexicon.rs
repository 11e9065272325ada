//! Lexical sense data: a WordNet-style hypernym graph and sense inventories.
//!
//! ```text
//! lemma ──senses()──► [sense id] ──hypernyms──► ... ──► root
//! ```
//!
//! The lexicon is loaded once from JSON and then only read. Sense inventories
//! answer "which senses can this lemma have"; the Nasari measure uses them to
//! expand terms before comparing sense vectors.

use crate::error::DataSourceError;
use crate::stem::{content_stems, stem};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;
use tracing::info;

/// Expands a lemma into candidate sense ids.
pub trait SenseInventory: Send + Sync {
    fn senses(&self, lemma: &str) -> Result<Vec<String>, DataSourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    pub id: String,
    pub lemmas: Vec<String>,
    #[serde(default)]
    pub gloss: String,
    #[serde(default)]
    pub hypernyms: Vec<String>,
}

impl Sense {
    pub fn new(id: impl Into<String>, lemmas: &[&str]) -> Self {
        Self {
            id: id.into(),
            lemmas: lemmas.iter().map(|l| l.to_string()).collect(),
            gloss: String::new(),
            hypernyms: Vec::new(),
        }
    }

    pub fn with_gloss(mut self, gloss: impl Into<String>) -> Self {
        self.gloss = gloss.into();
        self
    }

    pub fn with_hypernym(mut self, id: impl Into<String>) -> Self {
        self.hypernyms.push(id.into());
        self
    }
}

// ============================================================================
// Lexicon
// ============================================================================

/// In-memory sense graph.
#[derive(Debug, Default)]
pub struct Lexicon {
    senses: AHashMap<String, Sense>,
    by_lemma: AHashMap<String, Vec<String>>,
}

impl Lexicon {
    /// Lemmas are indexed lower-cased and stemmed; sense order per lemma is
    /// insertion order.
    pub fn from_senses(senses: impl IntoIterator<Item = Sense>) -> Self {
        let mut lexicon = Self::default();
        for sense in senses {
            for lemma in &sense.lemmas {
                let lower = lemma.to_lowercase();
                let stemmed = stem(&lower);
                lexicon.index(lower, &sense.id);
                lexicon.index(stemmed, &sense.id);
            }
            lexicon.senses.insert(sense.id.clone(), sense);
        }
        lexicon
    }

    /// Reads a JSON array of [`Sense`] records.
    pub fn from_json_file(path: &Path) -> Result<Self, DataSourceError> {
        if !path.exists() {
            return Err(DataSourceError::MissingFile(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let senses: Vec<Sense> = serde_json::from_str(&data)?;
        let lexicon = Self::from_senses(senses);
        info!(path = %path.display(), senses = lexicon.len(), "loaded lexicon");
        Ok(lexicon)
    }

    fn index(&mut self, key: String, id: &str) {
        let ids = self.by_lemma.entry(key).or_default();
        if !ids.iter().any(|existing| existing == id) {
            ids.push(id.to_string());
        }
    }

    pub fn len(&self) -> usize {
        self.senses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senses.is_empty()
    }

    pub fn sense(&self, id: &str) -> Option<&Sense> {
        self.senses.get(id)
    }

    /// Sense ids for a lemma; falls back to the stemmed lemma.
    pub fn senses_of(&self, lemma: &str) -> &[String] {
        let lower = lemma.to_lowercase();
        if let Some(ids) = self.by_lemma.get(&lower) {
            return ids;
        }
        self.by_lemma
            .get(&stem(&lower))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Shortest upward distance from `id` to each of its ancestors, `id`
    /// itself included at distance 0.
    pub fn ancestor_distances(&self, id: &str) -> AHashMap<String, usize> {
        let mut distances = AHashMap::new();
        let mut queue = VecDeque::new();
        distances.insert(id.to_string(), 0);
        queue.push_back(id.to_string());

        while let Some(current) = queue.pop_front() {
            let distance = distances.get(&current).copied().unwrap_or(0);
            let Some(sense) = self.senses.get(&current) else {
                continue;
            };
            for parent in &sense.hypernyms {
                if !distances.contains_key(parent) {
                    distances.insert(parent.clone(), distance + 1);
                    queue.push_back(parent.clone());
                }
            }
        }
        distances
    }

    fn is_root(&self, id: &str) -> bool {
        self.senses
            .get(id)
            .map_or(true, |sense| sense.hypernyms.iter().all(|h| !self.senses.contains_key(h)))
    }

    /// Depth in the hypernym graph, counting the root as 1.
    pub fn depth(&self, id: &str) -> usize {
        self.ancestor_distances(id)
            .into_iter()
            .filter(|(ancestor, _)| self.is_root(ancestor))
            .map(|(_, distance)| distance + 1)
            .min()
            .unwrap_or(1)
    }

    /// The common ancestor with the shortest combined path, ties broken
    /// towards the deeper ancestor. Returns the ancestor and the path length.
    pub fn lowest_common_subsumer(&self, a: &str, b: &str) -> Option<(String, usize)> {
        let from_a = self.ancestor_distances(a);
        let from_b = self.ancestor_distances(b);

        from_a
            .iter()
            .filter_map(|(ancestor, da)| from_b.get(ancestor).map(|db| (ancestor, da + db)))
            .min_by(|(x, px), (y, py)| {
                px.cmp(py)
                    .then_with(|| self.depth(y).cmp(&self.depth(x)))
                    .then_with(|| x.cmp(y))
            })
            .map(|(ancestor, path)| (ancestor.clone(), path))
    }

    /// Lemma and gloss content stems of a sense.
    pub(crate) fn content_of(&self, sense: &Sense) -> (AHashSet<String>, AHashSet<String>) {
        let words = sense
            .lemmas
            .iter()
            .flat_map(|lemma| content_stems(lemma))
            .collect();
        let gloss = content_stems(&sense.gloss).collect();
        (words, gloss)
    }
}

impl SenseInventory for Lexicon {
    fn senses(&self, lemma: &str) -> Result<Vec<String>, DataSourceError> {
        Ok(self.senses_of(lemma).to_vec())
    }
}

// ============================================================================
// Sense cache
// ============================================================================

/// Lemma to sense id lookup table, e.g. a cached export of a remote sense
/// inventory. The JSON file is an object mapping lemmas to id arrays.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SenseCache {
    senses: AHashMap<String, Vec<String>>,
}

impl SenseCache {
    pub fn from_json_file(path: &Path) -> Result<Self, DataSourceError> {
        if !path.exists() {
            return Err(DataSourceError::MissingFile(path.to_path_buf()));
        }
        let data = std::fs::read_to_string(path)?;
        let raw: AHashMap<String, Vec<String>> = serde_json::from_str(&data)?;
        let cache: Self = raw.into_iter().collect();
        info!(path = %path.display(), lemmas = cache.senses.len(), "loaded sense cache");
        Ok(cache)
    }

    pub fn insert(&mut self, lemma: &str, senses: Vec<String>) {
        self.senses.insert(lemma.to_lowercase(), senses);
    }
}

impl FromIterator<(String, Vec<String>)> for SenseCache {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut cache = Self::default();
        for (lemma, senses) in iter {
            cache.insert(&lemma, senses);
        }
        cache
    }
}

impl SenseInventory for SenseCache {
    fn senses(&self, lemma: &str) -> Result<Vec<String>, DataSourceError> {
        Ok(self
            .senses
            .get(&lemma.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// entity ← artifact ← {software, device}; software ← {cache, database};
    /// device ← server
    pub(crate) fn sample_lexicon() -> Lexicon {
        Lexicon::from_senses([
            Sense::new("entity.n.01", &["entity"]).with_gloss("that which exists"),
            Sense::new("artifact.n.01", &["artifact"])
                .with_gloss("a man-made object")
                .with_hypernym("entity.n.01"),
            Sense::new("software.n.01", &["software", "program"])
                .with_gloss("written programs used by a computer")
                .with_hypernym("artifact.n.01"),
            Sense::new("device.n.01", &["device"])
                .with_gloss("an instrumentality invented for a particular purpose")
                .with_hypernym("artifact.n.01"),
            Sense::new("cache.n.01", &["cache"])
                .with_gloss("a fast storage buffer in a computer")
                .with_hypernym("software.n.01"),
            Sense::new("database.n.01", &["database", "store"])
                .with_gloss("an organized storage of data in a computer")
                .with_hypernym("software.n.01"),
            Sense::new("server.n.01", &["server", "host"])
                .with_gloss("a computer that provides services")
                .with_hypernym("device.n.01"),
        ])
    }

    #[test]
    fn lemmas_resolve_case_insensitively_and_by_stem() {
        let lexicon = sample_lexicon();
        assert_eq!(lexicon.senses_of("Cache"), ["cache.n.01"]);
        assert_eq!(lexicon.senses_of("databases"), ["database.n.01"]);
        assert!(lexicon.senses_of("router").is_empty());
    }

    #[test]
    fn depth_counts_the_root() {
        let lexicon = sample_lexicon();
        assert_eq!(lexicon.depth("entity.n.01"), 1);
        assert_eq!(lexicon.depth("software.n.01"), 3);
        assert_eq!(lexicon.depth("cache.n.01"), 4);
    }

    #[test]
    fn lowest_common_subsumer() {
        let lexicon = sample_lexicon();
        assert_eq!(
            lexicon.lowest_common_subsumer("cache.n.01", "database.n.01"),
            Some(("software.n.01".to_string(), 2))
        );
        assert_eq!(
            lexicon.lowest_common_subsumer("cache.n.01", "server.n.01"),
            Some(("artifact.n.01".to_string(), 4))
        );
        assert_eq!(lexicon.lowest_common_subsumer("cache.n.01", "unknown"), None);
    }

    #[test]
    fn sense_cache_lookup() {
        let cache: SenseCache = [(
            "Cache".to_string(),
            vec!["bn:001".to_string(), "bn:002".to_string()],
        )]
        .into_iter()
        .collect();
        assert_eq!(cache.senses("cache").unwrap(), vec!["bn:001", "bn:002"]);
        assert!(cache.senses("server").unwrap().is_empty());
    }
}
