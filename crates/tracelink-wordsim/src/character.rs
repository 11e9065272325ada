//! Character match functions for character-level measures.
//!
//! `EqualOrHomoglyph` treats visually confusable letters (Cyrillic and Greek
//! look-alikes, full-width ASCII) as their Latin counterparts, so `"сache"`
//! spelled with a Cyrillic `с` still matches `"cache"`.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharacterMatch {
    #[default]
    Equal,
    EqualOrHomoglyph,
}

impl CharacterMatch {
    pub fn matches(&self, first: char, second: char) -> bool {
        match self {
            Self::Equal => first == second,
            Self::EqualOrHomoglyph => first == second || latin_base(first) == latin_base(second),
        }
    }
}

impl FromStr for CharacterMatch {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "EQUAL" => Ok(Self::Equal),
            "EQUAL_OR_HOMOGLYPH" => Ok(Self::EqualOrHomoglyph),
            _ => Err(ConfigError::UnknownCharacterMatch(s.to_string())),
        }
    }
}

/// The Latin letter `c` is commonly mistaken for, or `c` itself.
fn latin_base(c: char) -> char {
    match c {
        // full-width ASCII
        '\u{FF01}'..='\u{FF5E}' => char::from_u32(c as u32 - 0xFEE0).unwrap_or(c),
        // Cyrillic
        'а' => 'a',
        'е' => 'e',
        'о' => 'o',
        'р' => 'p',
        'с' => 'c',
        'у' => 'y',
        'х' => 'x',
        'і' => 'i',
        'ј' => 'j',
        'ѕ' => 's',
        'ԁ' => 'd',
        'һ' => 'h',
        'ӏ' => 'l',
        'А' => 'A',
        'В' => 'B',
        'Е' => 'E',
        'К' => 'K',
        'М' => 'M',
        'Н' => 'H',
        'О' => 'O',
        'Р' => 'P',
        'С' => 'C',
        'Т' => 'T',
        'Х' => 'X',
        // Greek
        'α' => 'a',
        'ο' => 'o',
        'ν' => 'v',
        'ρ' => 'p',
        'ι' => 'i',
        'Α' => 'A',
        'Β' => 'B',
        'Ε' => 'E',
        'Ζ' => 'Z',
        'Η' => 'H',
        'Ι' => 'I',
        'Κ' => 'K',
        'Μ' => 'M',
        'Ν' => 'N',
        'Ο' => 'O',
        'Ρ' => 'P',
        'Τ' => 'T',
        'Υ' => 'Y',
        'Χ' => 'X',
        _ => c,
    }
}

/// Jaro-Winkler similarity where two characters match when `matcher` says
/// so. With [`CharacterMatch::Equal`] this is plain Jaro-Winkler.
pub fn jaro_winkler(first: &str, second: &str, matcher: CharacterMatch) -> f64 {
    const SCALING_FACTOR: f64 = 0.1;

    let first: Vec<char> = first.chars().collect();
    let second: Vec<char> = second.chars().collect();
    if first.len() == second.len()
        && first.iter().zip(&second).all(|(&a, &b)| matcher.matches(a, b))
    {
        return 1.0;
    }

    let (matches, half_transpositions, prefix) = matching(&first, &second, matcher);
    if matches == 0 {
        return 0.0;
    }
    let m = matches as f64;
    let jaro = (m / first.len() as f64
        + m / second.len() as f64
        + (m - half_transpositions as f64 / 2.0) / m)
        / 3.0;
    if jaro < 0.7 {
        jaro
    } else {
        jaro + SCALING_FACTOR * prefix as f64 * (1.0 - jaro)
    }
}

/// `(matches, half transpositions, common prefix up to 4)`
fn matching(first: &[char], second: &[char], matcher: CharacterMatch) -> (usize, usize, usize) {
    let (longer, shorter) = if first.len() > second.len() {
        (first, second)
    } else {
        (second, first)
    };
    let range = (longer.len() / 2).saturating_sub(1);

    let mut matched_short = vec![false; shorter.len()];
    let mut matched_long = vec![false; longer.len()];
    let mut matches = 0;
    for (i, &c) in shorter.iter().enumerate() {
        let window = i.saturating_sub(range)..(i + range + 1).min(longer.len());
        for j in window {
            if !matched_long[j] && matcher.matches(c, longer[j]) {
                matched_short[i] = true;
                matched_long[j] = true;
                matches += 1;
                break;
            }
        }
    }

    let short_matches = shorter.iter().zip(&matched_short).filter(|(_, m)| **m).map(|(c, _)| *c);
    let long_matches = longer.iter().zip(&matched_long).filter(|(_, m)| **m).map(|(c, _)| *c);
    let half_transpositions = short_matches
        .zip(long_matches)
        .filter(|&(a, b)| !matcher.matches(a, b))
        .count();

    let prefix = first
        .iter()
        .zip(second)
        .take(shorter.len().min(4))
        .take_while(|&(&a, &b)| matcher.matches(a, b))
        .count();

    (matches, half_transpositions, prefix)
}
