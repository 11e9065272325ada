//! word2vec-style binary vector files (as exported by fastText).
//!
//! ```text
//! "<count> <dim>\n"
//! word ' ' f32 × dim (little endian) ['\n']
//! word ' ' f32 × dim ...
//! ```
//!
//! The file is streamed once into [`InMemoryVectors`]. The header is checked
//! against the file length before any vector is allocated.

use super::InMemoryVectors;
use crate::error::DataSourceError;
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::info;

pub fn load_binary_vectors(path: &Path) -> Result<InMemoryVectors, DataSourceError> {
    if !path.exists() {
        return Err(DataSourceError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path)?;
    let len = file.metadata()?.len();
    let vectors = read_binary_vectors(BufReader::new(file), len)?;
    info!(
        path = %path.display(),
        words = vectors.len(),
        dimension = vectors.dimension(),
        "loaded binary word vectors"
    );
    Ok(vectors)
}

pub fn parse_binary_vectors(bytes: &[u8]) -> Result<InMemoryVectors, DataSourceError> {
    read_binary_vectors(bytes, bytes.len() as u64)
}

/// Reads `len` bytes of a binary vector file from `reader`.
pub fn read_binary_vectors<R: BufRead>(mut reader: R, len: u64) -> Result<InMemoryVectors, DataSourceError> {
    let mut header = Vec::new();
    reader.read_until(b'\n', &mut header)?;
    let remaining = len.saturating_sub(header.len() as u64);
    let header = String::from_utf8_lossy(&header);
    let mut fields = header.split_whitespace().map(str::parse::<usize>);
    let (count, dimension) = match (fields.next(), fields.next()) {
        (Some(Ok(count)), Some(Ok(dimension))) => (count, dimension),
        _ => return Err(DataSourceError::Format(format!("bad header: {}", header.trim()))),
    };
    check_header(count, dimension, remaining)?;

    let mut vectors = InMemoryVectors::new(dimension);
    for index in 0..count {
        skip_separators(&mut reader)?;
        let mut word = Vec::new();
        reader.read_until(b' ', &mut word)?;
        if word.pop() != Some(b' ') {
            return Err(DataSourceError::Format(format!(
                "truncated record {index} of {count}"
            )));
        }
        let word = String::from_utf8(word)
            .map_err(|e| DataSourceError::Format(format!("record {index}: {e}")))?;

        let mut vector = vec![0.0_f32; dimension];
        reader
            .read_f32_into::<LittleEndian>(&mut vector)
            .map_err(|_| DataSourceError::Format(format!("truncated vector for {word:?}")))?;
        vectors.insert(word, vector)?;
    }
    Ok(vectors)
}

/// Every record needs at least one word byte, a space and `dimension` floats.
fn check_header(count: usize, dimension: usize, remaining: u64) -> Result<(), DataSourceError> {
    let needed = dimension
        .checked_mul(4)
        .and_then(|vector| vector.checked_add(2))
        .and_then(|record| record.checked_mul(count));
    match needed {
        Some(needed) if needed as u64 <= remaining => Ok(()),
        _ => Err(DataSourceError::Format(format!(
            "header claims {count} vectors of dimension {dimension}, but only {remaining} bytes follow"
        ))),
    }
}

fn skip_separators(reader: &mut impl BufRead) -> io::Result<()> {
    loop {
        let buf = reader.fill_buf()?;
        let skip = buf.iter().take_while(|b| matches!(b, b'\n' | b'\r')).count();
        let more = !buf.is_empty() && skip == buf.len();
        reader.consume(skip);
        if !more {
            return Ok(());
        }
    }
}
