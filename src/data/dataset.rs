use anyhow::{Context, Result};
use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::vocab::Vocabulary;
use crate::domain::template_pair::TemplatePair;

/// One training sample: the label id and `<` + text + `>` as character ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedSequence {
    pub label_id: usize,
    pub ids:      Vec<usize>,
}

impl EncodedSequence {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

pub struct TemplateDataset {
    samples: Vec<EncodedSequence>,
}

impl TemplateDataset {
    pub fn new(samples: Vec<EncodedSequence>) -> Self { Self { samples } }

    /// Encode every pair against the vocabulary, keeping corpus order.
    pub fn from_pairs(pairs: &[TemplatePair], vocab: &Vocabulary) -> Result<Self> {
        let samples = pairs
            .iter()
            .enumerate()
            .map(|(i, pair)| {
                let label_id = vocab
                    .label_id(&pair.label)
                    .with_context(|| format!("pair {i}: label '{}' not in vocabulary", pair.label))?;
                let ids = vocab
                    .encode_sequence(&pair.text)
                    .with_context(|| format!("pair {i}: cannot encode text"))?;
                Ok(EncodedSequence { label_id, ids })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(samples))
    }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<EncodedSequence> for TemplateDataset {
    fn get(&self, index: usize) -> Option<EncodedSequence> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pairs_encodes_every_pair() {
        let pairs = vec![
            TemplatePair::new("greeting", "Hello [name]"),
            TemplatePair::new("farewell", "Bye [name]"),
        ];
        let vocab = Vocabulary::build(&pairs);
        let ds    = TemplateDataset::from_pairs(&pairs, &vocab).unwrap();

        assert_eq!(ds.len(), 2);
        let first = ds.get(0).unwrap();
        assert_eq!(first.label_id, vocab.label_id("greeting").unwrap());
        assert_eq!(first.len(), "Hello [name]".len() + 2);
        assert_eq!(vocab.decode(&first.ids).unwrap(), "<Hello [name]>");
        assert!(ds.get(2).is_none());
    }

    #[test]
    fn test_foreign_vocabulary_is_an_error() {
        let vocab = Vocabulary::build(&[TemplatePair::new("a", "x")]);
        let pairs = vec![TemplatePair::new("b", "x")];
        assert!(TemplateDataset::from_pairs(&pairs, &vocab).is_err());
    }
}
