//! In-memory documents and ordered document collections.

use std::any::Any;
use std::collections::HashMap;

use ravel_core::{ArrayEntry, StackedArray};
use ravel_kernels::into_entry;
use uuid::Uuid;

use crate::attribute;
use crate::config::RavelConfig;
use crate::error::RavelResult;

pub const EMBEDDING: &str = "embedding";
pub const TENSOR: &str = "tensor";

/// One document: an id plus named array attributes, each optional.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: Uuid,
    attributes: HashMap<String, ArrayEntry>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    #[must_use]
    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            attributes: HashMap::new(),
        }
    }

    #[inline]
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn get(&self, attr: &str) -> Option<&ArrayEntry> {
        self.attributes.get(attr)
    }

    /// Classify and validate `value`, then store it under `attr`, replacing
    /// any previous entry.
    ///
    /// # Errors
    /// - [`RavelError::Classification`](crate::RavelError::Classification)
    ///   when `value` is not an array type.
    /// - [`RavelError::Layout`](crate::RavelError::Layout) when `value` is
    ///   structurally invalid.
    ///
    /// On error the document is left unchanged.
    pub fn set_attribute<V: Any>(&mut self, attr: &str, value: V) -> RavelResult<()> {
        let entry = into_entry(value)?;
        entry.validate()?;
        self.insert(attr, entry);
        Ok(())
    }

    pub(crate) fn insert(&mut self, attr: &str, entry: ArrayEntry) {
        self.attributes.insert(attr.to_owned(), entry);
    }

    /// Remove `attr`, returning its entry.
    pub fn clear(&mut self, attr: &str) -> Option<ArrayEntry> {
        self.attributes.remove(attr)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    #[inline]
    #[must_use]
    pub fn embedding(&self) -> Option<&ArrayEntry> {
        self.get(EMBEDDING)
    }

    /// # Errors
    /// See [`Document::set_attribute`].
    pub fn set_embedding<V: Any>(&mut self, value: V) -> RavelResult<()> {
        self.set_attribute(EMBEDDING, value)
    }

    #[inline]
    #[must_use]
    pub fn tensor(&self) -> Option<&ArrayEntry> {
        self.get(TENSOR)
    }

    /// # Errors
    /// See [`Document::set_attribute`].
    pub fn set_tensor<V: Any>(&mut self, value: V) -> RavelResult<()> {
        self.set_attribute(TENSOR, value)
    }
}

/// Ordered documents sharing one facade configuration.
#[derive(Debug, Clone, Default)]
pub struct DocumentArray {
    docs: Vec<Document>,
    config: RavelConfig,
}

impl DocumentArray {
    #[must_use]
    pub fn new(docs: Vec<Document>) -> Self {
        Self {
            docs,
            config: RavelConfig::default(),
        }
    }

    /// `n` fresh documents with no attributes.
    #[must_use]
    pub fn empty(n: usize) -> Self {
        Self::new((0..n).map(|_| Document::new()).collect())
    }

    #[must_use]
    pub fn with_config(mut self, config: RavelConfig) -> Self {
        self.config = config;
        self
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &RavelConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.docs.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> {
        self.docs.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Document> {
        self.docs.iter_mut()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Document> {
        self.docs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Document> {
        self.docs.get_mut(index)
    }

    pub fn push(&mut self, doc: Document) {
        self.docs.push(doc);
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Document] {
        &self.docs
    }

    /// # Errors
    /// See [`attribute::get_attribute`].
    pub fn get_attribute(&self, attr: &str) -> RavelResult<StackedArray> {
        attribute::get_attribute(&self.docs, attr, &self.config)
    }

    /// # Errors
    /// See [`attribute::set_attribute`].
    pub fn set_attribute<V: Any>(&mut self, attr: &str, value: V) -> RavelResult<()> {
        attribute::set_attribute(&mut self.docs, attr, value, &self.config)
    }

    /// The `"embedding"` attribute of every document, stacked.
    ///
    /// # Errors
    /// See [`attribute::get_attribute`].
    pub fn embeddings(&self) -> RavelResult<StackedArray> {
        self.get_attribute(EMBEDDING)
    }

    /// # Errors
    /// See [`attribute::set_attribute`].
    pub fn set_embeddings<V: Any>(&mut self, value: V) -> RavelResult<()> {
        self.set_attribute(EMBEDDING, value)
    }

    /// # Errors
    /// See [`attribute::get_attribute`].
    pub fn tensors(&self) -> RavelResult<StackedArray> {
        self.get_attribute(TENSOR)
    }

    /// # Errors
    /// See [`attribute::set_attribute`].
    pub fn set_tensors<V: Any>(&mut self, value: V) -> RavelResult<()> {
        self.set_attribute(TENSOR, value)
    }
}

impl FromIterator<Document> for DocumentArray {
    fn from_iter<T: IntoIterator<Item = Document>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a DocumentArray {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter {
        self.docs.iter()
    }
}

impl std::ops::Index<usize> for DocumentArray {
    type Output = Document;

    fn index(&self, index: usize) -> &Document {
        &self.docs[index]
    }
}

impl std::ops::IndexMut<usize> for DocumentArray {
    fn index_mut(&mut self, index: usize) -> &mut Document {
        &mut self.docs[index]
    }
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use ravel_core::{ClassificationError, Csc, LayoutError};

    use super::*;
    use crate::RavelError;

    #[test]
    fn unsupported_value_leaves_document_unchanged() {
        let mut doc = Document::new();
        doc.set_embedding(array![[1.0, 2.0]]).unwrap();
        let err = doc.set_embedding(vec![1.0f64, 2.0]).unwrap_err();
        assert!(matches!(
            err,
            RavelError::Classification(ClassificationError::UnsupportedType { .. })
        ));
        assert_eq!(doc.embedding(), Some(&ArrayEntry::Dense(array![[1.0, 2.0]])));
    }

    #[test]
    fn malformed_entry_rejected_per_document() {
        let mut docs = DocumentArray::empty(2);
        docs[0].set_embedding(array![[1.0, 0.0, 2.0]]).unwrap();
        // column pointer is one short for three columns
        let bad = Csc::from_parts_unchecked(1, 3, vec![0, 0], vec![], vec![]);
        let err = docs[0].set_embedding(bad).unwrap_err();
        assert!(matches!(
            err,
            RavelError::Layout(LayoutError::IndptrLength { .. })
        ));
        assert_eq!(
            docs[0].embedding(),
            Some(&ArrayEntry::Dense(array![[1.0, 0.0, 2.0]]))
        );
        assert!(docs.embeddings().is_ok());
    }

    #[test]
    fn clear_removes_entry() {
        let mut doc = Document::new();
        doc.set_tensor(array![[0.0]]).unwrap();
        assert!(doc.clear(TENSOR).is_some());
        assert!(doc.tensor().is_none());
        assert!(doc.clear(TENSOR).is_none());
    }

    #[test]
    fn empty_collection_has_distinct_ids() {
        let docs = DocumentArray::empty(3);
        assert_eq!(docs.len(), 3);
        assert_ne!(docs[0].id(), docs[1].id());
        assert_eq!(docs.iter().filter(|d| d.embedding().is_none()).count(), 3);
    }
}
