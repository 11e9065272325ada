//! Measures backed by files and SQLite databases, built the way a pipeline
//! run builds them.

use byteorder::{LittleEndian, WriteBytesExt};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracelink_wordsim::measures::{SeWordSimDataSource, SeWordSimMeasure};
use tracelink_wordsim::vector::VectorTableImporter;
use tracelink_wordsim::{
    ComparisonContext, ComparisonStrategy, MeasureRegistry, SimilarityEngine, WordSimConfig,
    WordSimMeasure,
};

fn create_sewordsim_db(path: &Path, rows: &[(&str, &str, f64)]) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    runtime.block_on(async {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::query("CREATE TABLE wsim (term_1 TEXT, term_2 TEXT, similarity REAL)")
            .execute(&pool)
            .await
            .unwrap();
        for (a, b, similarity) in rows {
            sqlx::query("INSERT INTO wsim VALUES (?, ?, ?)")
                .bind(*a)
                .bind(*b)
                .bind(*similarity)
                .execute(&pool)
                .await
                .unwrap();
        }
        pool.close().await;
    });
}

fn write_binary_vectors(path: &Path, words: &[(&str, [f32; 2])]) {
    let mut bytes = format!("{} 2\n", words.len()).into_bytes();
    for (word, vector) in words {
        bytes.extend_from_slice(word.as_bytes());
        bytes.push(b' ');
        for x in vector {
            bytes.write_f32::<LittleEndian>(*x).unwrap();
        }
        bytes.push(b'\n');
    }
    std::fs::write(path, bytes).unwrap();
}

fn write_text_vectors(dir: &TempDir, name: &str, lines: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, lines).unwrap();
    path
}

#[test]
fn sewordsim_lookup_is_stemmed_and_order_free() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sewordsim.db");
    create_sewordsim_db(&db, &[("cach", "buffer", 0.8), ("server", "host", 0.95)]);

    let measure = SeWordSimMeasure::open(&db, 0.7).unwrap();
    assert!(measure.are_words_similar(&ComparisonContext::new("caches", "buffer")));
    assert!(measure.are_words_similar(&ComparisonContext::new("buffer", "Cache")));
    assert!(!measure.are_words_similar(&ComparisonContext::new("cache", "router")));
    assert!(measure
        .similarity(&ComparisonContext::new("cache", "router"))
        .is_nan());

    let source = measure.source();
    assert!(source.contains_word("Caches").unwrap());
    assert!(!source.contains_word("").unwrap());
    let mut words = source.all_words().unwrap();
    words.sort();
    assert_eq!(words, vec!["cach", "server"]);
}

#[test]
fn closed_source_fails_closed() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("sewordsim.db");
    create_sewordsim_db(&db, &[("cach", "buffer", 0.8)]);

    let source = SeWordSimDataSource::open(&db).unwrap();
    source.close();
    assert!(source.similarity("cache", "buffer").is_err());

    let measure = SeWordSimMeasure::new(source, 0.5).unwrap();
    assert!(!measure.are_words_similar(&ComparisonContext::new("cache", "buffer")));
}

#[test]
fn missing_database_is_reported_at_construction() {
    let dir = tempfile::tempdir().unwrap();
    assert!(SeWordSimMeasure::open(&dir.path().join("nope.db"), 0.5).is_err());
}

#[test]
fn registry_opens_every_configured_source() {
    let dir = tempfile::tempdir().unwrap();

    let sewordsim = dir.path().join("sewordsim.db");
    create_sewordsim_db(&sewordsim, &[("cach", "buffer", 0.8)]);

    let fast_text = dir.path().join("fasttext.bin");
    write_binary_vectors(&fast_text, &[("cache", [1.0, 0.0]), ("buffer", [0.9, 0.1])]);

    let glove = dir.path().join("glove.db");
    let glove_text = write_text_vectors(&dir, "glove.txt", "caches 1 0\nstores 0.95 0.05\n");
    VectorTableImporter::new(&glove_text, &glove, 2).run().unwrap();

    let nasari = dir.path().join("nasari.db");
    let nasari_text = write_text_vectors(&dir, "nasari.txt", "bn:01n 1 0\nbn:02n 0.9 0.1\n");
    VectorTableImporter::new(&nasari_text, &nasari, 2)
        .with_stemming(false)
        .run()
        .unwrap();
    let senses = dir.path().join("senses.json");
    std::fs::write(&senses, r#"{ "cache": ["bn:01n"], "memory": ["bn:02n"] }"#).unwrap();

    let lexicon = dir.path().join("lexicon.json");
    std::fs::write(
        &lexicon,
        r#"[
            { "id": "software.n.01", "lemmas": ["software"] },
            { "id": "cache.n.01", "lemmas": ["cache"], "hypernyms": ["software.n.01"] },
            { "id": "database.n.01", "lemmas": ["database"], "hypernyms": ["software.n.01"] }
        ]"#,
    )
    .unwrap();

    let path = |p: &Path| p.to_str().unwrap().to_string();
    let entries = vec![
        ("ngram_Enabled", "true".to_string()),
        ("sewordsim_Enabled", "true".to_string()),
        ("sewordsim_DatabaseFilePath", path(&sewordsim)),
        ("fastText_Enabled", "true".to_string()),
        ("fastText_ModelPath", path(&fast_text)),
        ("wordNet_Enabled", "true".to_string()),
        ("wordNet_LexiconFilePath", path(&lexicon)),
        ("wordNet_Algo_WuPalmer_Threshold", "0.5".to_string()),
        ("glove_Enabled", "true".to_string()),
        ("glove_DatabaseFilePath", path(&glove)),
        ("nasari_Enabled", "true".to_string()),
        ("nasari_DatabaseFilePath", path(&nasari)),
        ("babelNet_CacheFilePath", path(&senses)),
        ("comparisonStrategy", "AT_LEAST_ONE".to_string()),
    ];
    let config = WordSimConfig::from_map(entries).unwrap();

    let registry = MeasureRegistry::from_config(&config).unwrap();
    assert_eq!(
        registry.ids(),
        vec![
            "equality",
            "levenshtein",
            "jaro_winkler",
            "ngram",
            "sewordsim",
            "fasttext",
            "wordnet",
            "glove",
            "nasari"
        ]
    );

    let engine = SimilarityEngine::new(registry.into_measures())
        .with_comparison_strategy(ComparisonStrategy::Consensus);
    for measure in engine.measures() {
        let ctx = ComparisonContext::new("cache", "cache");
        match measure.id() {
            // no self-pair rows in these tables
            "sewordsim" => assert!(!measure.are_words_similar(&ctx)),
            _ => assert!(measure.are_words_similar(&ctx), "{}", measure.id()),
        }
    }

    let by_id = |id: &str| {
        engine
            .measures()
            .iter()
            .find(|m| m.id() == id)
            .unwrap()
    };
    assert!(by_id("fasttext").are_words_similar(&ComparisonContext::new("cache", "buffer")));
    assert!(by_id("glove").are_words_similar(&ComparisonContext::new("cache", "store")));
    assert!(by_id("nasari").are_words_similar(&ComparisonContext::new("cache", "memory")));
    assert!(by_id("wordnet").are_words_similar(&ComparisonContext::new("cache", "database")));
    assert!(!by_id("glove").are_words_similar(&ComparisonContext::new("cache", "router")));
}

#[test]
fn engine_from_config_uses_configured_strategy() {
    let config = WordSimConfig::from_map([("comparisonStrategy", "CONSENSUS")]).unwrap();
    let engine = SimilarityEngine::from_config(&config).unwrap();
    assert!(engine.are_strings_similar("cache", "Cache"));
    assert!(!engine.are_strings_similar("server", "servers"));
}
