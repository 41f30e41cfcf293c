use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type DocId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    pub text: String,
}

/// A fixed document collection. Iteration follows the order documents were
/// supplied in, which is also the tie-break order for ranked results.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    docs: Vec<Document>,
    positions: HashMap<DocId, usize>,
}

impl Corpus {
    pub fn new<I, S>(documents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (DocId, S)>,
        S: Into<String>,
    {
        let mut corpus = Corpus::default();
        for (id, text) in documents {
            if corpus.positions.contains_key(&id) {
                return Err(Error::DuplicateDocument(id));
            }
            corpus.positions.insert(id, corpus.docs.len());
            corpus.docs.push(Document { id, text: text.into() });
        }
        Ok(corpus)
    }

    pub fn from_documents(documents: Vec<Document>) -> Result<Self> {
        Self::new(documents.into_iter().map(|d| (d.id, d.text)))
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.positions.get(&id).map(|&pos| &self.docs[pos])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> { self.docs.iter() }

    pub fn ids(&self) -> impl Iterator<Item = DocId> + '_ { self.docs.iter().map(|d| d.id) }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;

    fn into_iter(self) -> Self::IntoIter { self.docs.iter() }
}
