//! Word pool and the word-list provider.
//!
//! A word list is a two-column delimited text file, one `source,translation`
//! pair per row.  Rows missing either column are dropped; a list with no
//! valid rows is rejected and the caller keeps its previous pool.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, warn};
use thiserror::Error;

use crate::entities::WordPair;

pub type Result<T> = std::result::Result<T, WordListError>;

#[derive(Debug, Error)]
pub enum WordListError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed word list: {0}")]
    Csv(#[from] csv::Error),

    /// Only `.csv` uploads are accepted.
    #[error("unsupported word list '{0}', expected a .csv file")]
    UnsupportedFormat(String),

    #[error("word list has no rows with both a source and a translation")]
    NoValidRows,
}

/// The built-in pool used until a list is uploaded.
pub fn default_pairs() -> Vec<WordPair> {
    [
        ("apple", "苹果"),
        ("book", "书"),
        ("cat", "猫"),
        ("dog", "狗"),
        ("bull", "公牛"),
        ("snake", "蛇"),
        ("bird", "鸟"),
    ]
    .into_iter()
    .map(|(source, translation)| WordPair::new(source, translation))
    .collect()
}

/// Parse `source,translation` rows, one per line.  Quotes are literal text,
/// cells are trimmed and extra columns are ignored.  Blank, half-empty or
/// non-UTF-8 rows are skipped.
pub fn parse_word_list<R: Read>(reader: R) -> Result<Vec<WordPair>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut pairs = Vec::new();
    let mut dropped = 0usize;
    for record in csv_reader.byte_records() {
        let record = record?;
        let cell = |i| record.get(i).and_then(|b| std::str::from_utf8(b).ok());
        match (cell(0), cell(1)) {
            (Some(source), Some(translation)) if !source.is_empty() && !translation.is_empty() => {
                pairs.push(WordPair::new(source, translation));
            }
            _ => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("dropped {dropped} malformed word list rows");
    }
    if pairs.is_empty() {
        return Err(WordListError::NoValidRows);
    }
    Ok(pairs)
}

/// Load a word list from disk, rejecting anything that is not a `.csv` file.
pub fn load_word_file(path: &Path) -> Result<Vec<WordPair>> {
    let is_csv = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        warn!("rejected word list {}", path.display());
        return Err(WordListError::UnsupportedFormat(path.display().to_string()));
    }
    parse_word_list(File::open(path)?)
}

/// The active pool of pairs.
#[derive(Clone, Debug)]
pub struct WordPool {
    pairs: Vec<WordPair>,
}

impl Default for WordPool {
    fn default() -> Self {
        Self {
            pairs: default_pairs(),
        }
    }
}

impl WordPool {
    /// Build a pool, refusing an empty list.
    pub fn new(pairs: Vec<WordPair>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(WordListError::NoValidRows);
        }
        Ok(Self { pairs })
    }

    /// Swap in a new list.  An empty list leaves the pool untouched.
    pub fn replace(&mut self, pairs: Vec<WordPair>) -> Result<()> {
        *self = Self::new(pairs)?;
        Ok(())
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
