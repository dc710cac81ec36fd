// ============================================================
// Layer 4 — Vocabulary Builder
// ============================================================
// Derives the two dense indices the model is built around:
//
//   LabelIndex: label string → id   (sorted distinct labels)
//   CharIndex:  character    → id   (sorted distinct characters
//                                    of "<>" + text, every pair)
//
// Both are pure functions of the corpus — no randomness — so
// building twice from the same corpus gives identical indices.
//
// Example corpus: greeting|Hi, farewell|Bye
//   labels: ["farewell", "greeting"]          → 0, 1
//   chars:  ['<', '>', 'B', 'H', 'e', 'i', 'y'] → 0..7
//
// Sentinels:
//   '<' starts every sequence (first input at generation time)
//   '>' ends every sequence (stop signal at generation time)
//
// Padding:
//   pad_id() == char_count(), one past the last real character.
//   It is a valid model INPUT (the embedding table has an extra
//   row) but never a model OUTPUT, so it can't be sampled.
//
// After training the indices travel inside the checkpoint and
// are never recomputed from the corpus.
//
// Reference: Karpathy (2015) char-rnn, character-level vocabulary
//            serde docs, #[serde(try_from, into)] container attributes

use anyhow::{anyhow, bail, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::domain::template_pair::TemplatePair;

/// Start-of-sequence sentinel
pub const START_CHAR: char = '<';

/// End-of-sequence sentinel
pub const END_CHAR: char = '>';

/// LabelIndex + CharIndex (and its reverse decoding table).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "VocabularyRecord", into = "VocabularyRecord")]
pub struct Vocabulary {
    /// id → label, sorted lexicographically
    labels:     Vec<String>,
    label_to_id: HashMap<String, usize>,

    /// id → character (the decoding table), sorted
    id_to_char: Vec<char>,
    char_to_id: HashMap<char, usize>,
}

impl Vocabulary {
    /// Build both indices from the corpus.
    /// An empty corpus gives an empty vocabulary (no sentinels either).
    pub fn build(pairs: &[TemplatePair]) -> Self {
        // BTreeSet gives sorted, deduplicated iteration order
        let labels: BTreeSet<&str> = pairs.iter().map(|p| p.label.as_str()).collect();

        let chars: BTreeSet<char> = pairs
            .iter()
            .flat_map(|p| [START_CHAR, END_CHAR].into_iter().chain(p.text.chars()))
            .collect();

        let vocab = Self::from_parts(
            labels.into_iter().map(str::to_string).collect(),
            chars.into_iter().collect(),
        );

        tracing::debug!(
            "Vocabulary built: {} labels, {} characters",
            vocab.label_count(),
            vocab.char_count()
        );
        vocab
    }

    /// Assemble lookup maps from ordered lists (position = id).
    fn from_parts(labels: Vec<String>, id_to_char: Vec<char>) -> Self {
        let label_to_id = labels.iter().enumerate().map(|(i, l)| (l.clone(), i)).collect();
        let char_to_id  = id_to_char.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { labels, label_to_id, id_to_char, char_to_id }
    }

    pub fn label_count(&self) -> usize {
        self.labels.len()
    }

    /// Number of real characters (the model's output width)
    pub fn char_count(&self) -> usize {
        self.id_to_char.len()
    }

    /// Labels in id order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn label_id(&self, label: &str) -> Option<usize> {
        self.label_to_id.get(label).copied()
    }

    pub fn char_id(&self, c: char) -> Option<usize> {
        self.char_to_id.get(&c).copied()
    }

    pub fn char_at(&self, id: usize) -> Option<char> {
        self.id_to_char.get(id).copied()
    }

    pub fn start_id(&self) -> Option<usize> {
        self.char_id(START_CHAR)
    }

    pub fn end_id(&self) -> Option<usize> {
        self.char_id(END_CHAR)
    }

    /// Reserved padding id, outside the character alphabet
    pub fn pad_id(&self) -> usize {
        self.char_count()
    }

    /// Encode text into character ids. Fails on a character the
    /// corpus never contained.
    pub fn encode(&self, text: &str) -> Result<Vec<usize>> {
        text.chars()
            .map(|c| {
                self.char_id(c)
                    .ok_or_else(|| anyhow!("character {c:?} is not in the vocabulary"))
            })
            .collect()
    }

    /// Decode character ids back into text. Fails on ids outside
    /// the alphabet, including the pad id.
    pub fn decode(&self, ids: &[usize]) -> Result<String> {
        ids.iter()
            .map(|&id| self.char_at(id).ok_or_else(|| anyhow!("id {id} is not a character")))
            .collect()
    }

    /// Encode `<` + text + `>` — the training target for one pair.
    pub fn encode_sequence(&self, text: &str) -> Result<Vec<usize>> {
        let mut ids = Vec::with_capacity(text.chars().count() + 2);
        ids.push(self.start_id().ok_or_else(|| anyhow!("vocabulary has no start sentinel"))?);
        ids.extend(self.encode(text)?);
        ids.push(self.end_id().ok_or_else(|| anyhow!("vocabulary has no end sentinel"))?);
        Ok(ids)
    }
}

// ─── Serialised form ──────────────────────────────────────────────────────────
// Only the ordered lists are written; the maps are rebuilt on load.
// Loading checks the lists so a hand-edited checkpoint can't produce
// an index with gaps or duplicate ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocabularyRecord {
    labels: Vec<String>,
    chars:  Vec<char>,
}

impl From<Vocabulary> for VocabularyRecord {
    fn from(v: Vocabulary) -> Self {
        Self { labels: v.labels, chars: v.id_to_char }
    }
}

impl TryFrom<VocabularyRecord> for Vocabulary {
    type Error = anyhow::Error;

    fn try_from(r: VocabularyRecord) -> Result<Self> {
        if r.labels.windows(2).any(|w| w[0] >= w[1]) {
            bail!("labels must be sorted and unique");
        }
        if r.chars.windows(2).any(|w| w[0] >= w[1]) {
            bail!("characters must be sorted and unique");
        }
        let vocab = Self::from_parts(r.labels, r.chars);
        if vocab.char_count() > 0 && (vocab.start_id().is_none() || vocab.end_id().is_none()) {
            bail!("character index is missing the '<' / '>' sentinels");
        }
        Ok(vocab)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<TemplatePair> {
        vec![
            TemplatePair::new("greeting", "Hello [name]"),
            TemplatePair::new("farewell", "Bye [name]"),
            TemplatePair::new("greeting", "Hi"),
        ]
    }

    #[test]
    fn test_labels_are_sorted_and_dense() {
        let v = Vocabulary::build(&corpus());
        assert_eq!(v.labels(), &["farewell".to_string(), "greeting".to_string()]);
        assert_eq!(v.label_id("farewell"), Some(0));
        assert_eq!(v.label_id("greeting"), Some(1));
        assert_eq!(v.label_id("unknown_label"), None);
    }

    #[test]
    fn test_chars_include_sentinels_and_are_sorted() {
        let v = Vocabulary::build(&[TemplatePair::new("a", "Hi")]);
        // '<' (0x3C) < '>' (0x3E) < 'H' < 'i'
        assert_eq!(v.char_count(), 4);
        assert_eq!(v.start_id(), Some(0));
        assert_eq!(v.end_id(), Some(1));
        assert_eq!(v.char_id('H'), Some(2));
        assert_eq!(v.char_id('i'), Some(3));
        assert_eq!(v.pad_id(), 4);
        assert_eq!(v.char_at(v.pad_id()), None);
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = serde_json::to_vec(&Vocabulary::build(&corpus())).unwrap();
        let b = serde_json::to_vec(&Vocabulary::build(&corpus())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let v    = Vocabulary::build(&corpus());
        let text = "Bye Hello [name]";
        let ids  = v.encode(text).unwrap();
        assert_eq!(v.decode(&ids).unwrap(), text);
    }

    #[test]
    fn test_encode_rejects_unknown_char() {
        let v = Vocabulary::build(&corpus());
        assert!(v.encode("Zebra").is_err());
    }

    #[test]
    fn test_encode_sequence_wraps_with_sentinels() {
        let v   = Vocabulary::build(&corpus());
        let ids = v.encode_sequence("Hi").unwrap();
        assert_eq!(ids.len(), 4);
        assert_eq!(ids[0], v.start_id().unwrap());
        assert_eq!(ids[3], v.end_id().unwrap());
        assert_eq!(v.decode(&ids).unwrap(), "<Hi>");
    }

    #[test]
    fn test_empty_corpus_gives_empty_vocabulary() {
        let v = Vocabulary::build(&[]);
        assert_eq!(v.label_count(), 0);
        assert_eq!(v.char_count(), 0);
        assert_eq!(v.start_id(), None);
        assert_eq!(v.pad_id(), 0);
        assert!(v.encode_sequence("").is_err());
    }

    #[test]
    fn test_serde_round_trip_rebuilds_lookups() {
        let v    = Vocabulary::build(&corpus());
        let json = serde_json::to_string(&v).unwrap();
        let back: Vocabulary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
        assert_eq!(back.label_id("greeting"), Some(1));
    }

    #[test]
    fn test_corrupt_record_is_rejected() {
        let dup = r#"{"labels":["a","a"],"chars":["<",">"]}"#;
        assert!(serde_json::from_str::<Vocabulary>(dup).is_err());

        let no_sentinels = r#"{"labels":["a"],"chars":["a","b"]}"#;
        assert!(serde_json::from_str::<Vocabulary>(no_sentinels).is_err());
    }
}
