use indexmap::IndexSet;
use serde::{Serialize, Serializer};

use crate::error::{Axis, Error, Result};

/// Insertion-ordered, deduplicating label to index map for one table axis.
#[derive(Clone, Debug)]
pub struct LabelIndex {
    axis: Axis,
    labels: IndexSet<String>,
    frozen: bool,
}

impl LabelIndex {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            labels: IndexSet::new(),
            frozen: false,
        }
    }

    /// An axis with a fixed label order; inserting an unseen label fails.
    pub fn fixed<I, L>(axis: Axis, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        Self {
            axis,
            labels: labels.into_iter().map(Into::into).collect(),
            frozen: true,
        }
    }

    /// Index of `label`, assigning the next one on first sight.
    pub fn insert(&mut self, label: &str) -> Result<usize> {
        if let Some(idx) = self.labels.get_index_of(label) {
            return Ok(idx);
        }
        if self.frozen {
            return Err(self.unknown(label));
        }
        Ok(self.labels.insert_full(label.to_string()).0)
    }

    pub fn index_of(&self, label: &str) -> Result<usize> {
        self.labels
            .get_index_of(label)
            .ok_or_else(|| self.unknown(label))
    }

    pub fn label(&self, idx: usize) -> Option<&str> {
        self.labels.get_index(idx).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    fn unknown(&self, label: &str) -> Error {
        Error::UnknownLabel {
            axis: self.axis,
            label: label.to_string(),
            line: None,
        }
    }
}

// `IndexSet` equality ignores order; here order is the index.
impl PartialEq for LabelIndex {
    fn eq(&self, other: &Self) -> bool {
        self.axis == other.axis
            && self.frozen == other.frozen
            && self.labels.iter().eq(other.labels.iter())
    }
}

impl Eq for LabelIndex {}

impl Serialize for LabelIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.labels.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_seen_order() {
        let mut idx = LabelIndex::new(Axis::Model);
        assert_eq!(idx.insert("sponza").unwrap(), 0);
        assert_eq!(idx.insert("buddha").unwrap(), 1);
        assert_eq!(idx.insert("sponza").unwrap(), 0);
        assert_eq!(idx.len(), 2);
        assert_eq!(idx.index_of("buddha").unwrap(), 1);
        assert_eq!(idx.label(1), Some("buddha"));
        assert_eq!(idx.iter().collect::<Vec<_>>(), ["sponza", "buddha"]);
    }

    #[test]
    fn unknown_lookup() {
        let idx = LabelIndex::new(Axis::Format);
        assert!(matches!(
            idx.index_of("SVO(9)"),
            Err(Error::UnknownLabel { axis: Axis::Format, .. })
        ));
    }

    #[test]
    fn fixed_axis_rejects_new_labels() {
        let mut idx = LabelIndex::fixed(Axis::Model, ["hairball", "buddha"]);
        assert_eq!(idx.insert("buddha").unwrap(), 1);
        assert!(idx.insert("sponza").is_err());
        assert_eq!(idx.len(), 2);
    }

    #[test]
    fn equality_respects_label_order() {
        let ab = LabelIndex::fixed(Axis::Format, ["A", "B"]);
        let ba = LabelIndex::fixed(Axis::Format, ["B", "A"]);
        assert_ne!(ab, ba);
        assert_eq!(ab, LabelIndex::fixed(Axis::Format, ["A", "B"]));
        assert_ne!(ab, LabelIndex::fixed(Axis::Model, ["A", "B"]));

        let mut grown = LabelIndex::new(Axis::Format);
        grown.insert("A").unwrap();
        grown.insert("B").unwrap();
        assert_ne!(grown, ab);
    }

    #[test]
    fn serializes_as_label_list() {
        let idx = LabelIndex::fixed(Axis::Model, ["a", "b"]);
        assert_eq!(serde_json::to_string(&idx).unwrap(), r#"["a","b"]"#);
    }
}
