//! WordNet database reader.
//!
//! Reads the `index.<pos>` and `data.<pos>` files of a WordNet 3.x `dict/`
//! directory. The whole database is parsed into memory the first time it is
//! needed and kept for the lifetime of the [`WordNet`] value.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};

use camino::{Utf8Path, Utf8PathBuf};

use super::{PartOfSpeech, Synset, SynsetSource};
use crate::error::{LexiconError, LexiconResult};

/// A lazily loaded WordNet database.
///
/// Construction is cheap and never touches the filesystem. The first call to
/// [`WordNet::ensure_loaded`] (directly, or through [`SynsetSource`]) parses
/// the database; later calls reuse it. Concurrent first calls load once.
#[derive(Debug)]
pub struct WordNet {
    dir: Utf8PathBuf,
    db: OnceLock<Database>,
    load_lock: Mutex<()>,
}

impl WordNet {
    /// Point at a WordNet `dict/` directory.
    pub fn new(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            db: OnceLock::new(),
            load_lock: Mutex::new(()),
        }
    }

    /// The database directory.
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// Whether the database has been parsed already.
    pub fn is_loaded(&self) -> bool {
        self.db.get().is_some()
    }

    /// Parse the database if that has not happened yet.
    ///
    /// A failed load is not remembered; the next call tries again.
    pub fn ensure_loaded(&self) -> LexiconResult<&Database> {
        if let Some(db) = self.db.get() {
            return Ok(db);
        }

        let _guard = self.load_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(db) = self.db.get() {
            return Ok(db);
        }

        tracing::info!(dir = %self.dir, "loading wordnet database");
        let db = Database::load(&self.dir)?;
        tracing::info!(
            lemmas = db.lemma_count(),
            synsets = db.synset_count(),
            "wordnet database loaded"
        );
        Ok(self.db.get_or_init(|| db))
    }
}

impl SynsetSource for WordNet {
    fn synsets(&self, word: &str) -> Vec<Synset> {
        match self.ensure_loaded() {
            Ok(db) => db.synsets(word),
            Err(err) => {
                tracing::error!(error = %err, "wordnet database unavailable");
                Vec::new()
            }
        }
    }
}

/// Per part-of-speech index and synset tables.
#[derive(Debug, Default)]
struct Section {
    /// Lemma to synset offsets, in index-file order.
    index: HashMap<String, Vec<u64>>,
    /// Synset offset to member word forms.
    data: HashMap<u64, Vec<String>>,
}

/// A parsed WordNet database.
#[derive(Debug, Default)]
pub struct Database {
    sections: HashMap<PartOfSpeech, Section>,
}

impl Database {
    /// Parse every `index.<pos>` / `data.<pos>` pair in `dir`.
    pub fn load(dir: &Utf8Path) -> LexiconResult<Self> {
        if !dir.is_dir() {
            return Err(LexiconError::MissingDatabase(dir.to_path_buf()));
        }

        let mut sections = HashMap::new();
        for pos in PartOfSpeech::ALL {
            let index_path = dir.join(format!("index.{}", pos.file_suffix()));
            let data_path = dir.join(format!("data.{}", pos.file_suffix()));
            let section = Section {
                index: parse_index(&index_path, &read(&index_path)?)?,
                data: parse_data(&data_path, &read(&data_path)?)?,
            };
            sections.insert(pos, section);
        }
        Ok(Self { sections })
    }

    /// Synsets containing `word`, nouns first, then verbs, adjectives, adverbs.
    pub fn synsets(&self, word: &str) -> Vec<Synset> {
        let key = word.replace(' ', "_");
        let mut found = Vec::new();
        for pos in PartOfSpeech::ALL {
            let Some(section) = self.sections.get(&pos) else {
                continue;
            };
            let Some(offsets) = section.index.get(&key) else {
                continue;
            };
            for offset in offsets {
                match section.data.get(offset) {
                    Some(lemmas) => found.push(Synset {
                        pos,
                        lemmas: lemmas.clone(),
                    }),
                    None => tracing::warn!(word, offset, ?pos, "index points at missing synset"),
                }
            }
        }
        found
    }

    /// Number of distinct lemmas across all parts of speech.
    pub fn lemma_count(&self) -> usize {
        self.sections.values().map(|s| s.index.len()).sum()
    }

    /// Number of synsets across all parts of speech.
    pub fn synset_count(&self) -> usize {
        self.sections.values().map(|s| s.data.len()).sum()
    }
}

fn read(path: &Utf8Path) -> LexiconResult<String> {
    std::fs::read_to_string(path.as_std_path()).map_err(|source| LexiconError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// License and comment lines start with whitespace.
fn is_content_line(line: &str) -> bool {
    !line.is_empty() && !line.starts_with(' ')
}

fn malformed(path: &Utf8Path, line: usize, reason: impl Into<String>) -> LexiconError {
    LexiconError::Malformed {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

/// `lemma pos synset_cnt p_cnt [ptr_symbol...] sense_cnt tagsense_cnt synset_offset...`
fn parse_index(path: &Utf8Path, text: &str) -> LexiconResult<HashMap<String, Vec<u64>>> {
    let mut index = HashMap::new();
    for (n, line) in text.lines().enumerate() {
        if !is_content_line(line) {
            continue;
        }
        let line_no = n + 1;
        let fields: Vec<&str> = line.split_ascii_whitespace().collect();
        let number = |i: usize, what: &str| -> LexiconResult<usize> {
            fields
                .get(i)
                .and_then(|f| f.parse().ok())
                .ok_or_else(|| malformed(path, line_no, format!("bad {what}")))
        };

        let Some(&lemma) = fields.first() else {
            continue;
        };
        let synset_cnt = number(2, "synset_cnt")?;
        let p_cnt = number(3, "p_cnt")?;
        let offsets = p_cnt
            .checked_add(6)
            .and_then(|start| Some(start..start.checked_add(synset_cnt)?))
            .and_then(|range| fields.get(range))
            .ok_or_else(|| malformed(path, line_no, "truncated synset offsets"))?
            .iter()
            .map(|f| {
                f.parse::<u64>()
                    .map_err(|_| malformed(path, line_no, format!("bad synset offset {f:?}")))
            })
            .collect::<LexiconResult<Vec<_>>>()?;
        index.insert(lemma.to_string(), offsets);
    }
    Ok(index)
}

/// `synset_offset lex_filenum ss_type w_cnt word lex_id [word lex_id...] p_cnt ... | gloss`
///
/// `w_cnt` and `lex_id` are hexadecimal.
fn parse_data(path: &Utf8Path, text: &str) -> LexiconResult<HashMap<u64, Vec<String>>> {
    let mut data = HashMap::new();
    for (n, line) in text.lines().enumerate() {
        if !is_content_line(line) {
            continue;
        }
        let line_no = n + 1;
        let head = line.split_once(" | ").map_or(line, |(head, _gloss)| head);
        let fields: Vec<&str> = head.split_ascii_whitespace().collect();
        if fields.len() < 4 {
            return Err(malformed(path, line_no, "too few fields"));
        }

        let offset: u64 = fields[0]
            .parse()
            .map_err(|_| malformed(path, line_no, "bad synset offset"))?;
        let w_cnt = usize::from_str_radix(fields[3], 16)
            .map_err(|_| malformed(path, line_no, "bad w_cnt"))?;
        let words = w_cnt
            .checked_mul(2)
            .and_then(|n| n.checked_add(4))
            .and_then(|end| fields.get(4..end))
            .ok_or_else(|| malformed(path, line_no, "truncated word list"))?
            .chunks_exact(2)
            .map(|pair| strip_marker(pair[0]).to_string())
            .collect();
        data.insert(offset, words);
    }
    Ok(data)
}

/// Drop the syntactic marker of adjectives: `galore(ip)` -> `galore`.
fn strip_marker(word: &str) -> &str {
    match word.find('(') {
        Some(at) if word.ends_with(')') => &word[..at],
        _ => word,
    }
}
