//! Grouping entries by publication type

use bib2cv_bibtex::BibTeXEntry;
use tracing::debug;

use crate::taxonomy::PublicationType;

/// The entries of one publication type, in load order
#[derive(Debug, Clone)]
pub struct Bucket<'a> {
    pub publication_type: &'static PublicationType,
    pub entries: Vec<&'a BibTeXEntry>,
}

impl Bucket<'_> {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// One bucket per publication type, in taxonomy order
#[derive(Debug, Clone)]
pub struct Buckets<'a> {
    buckets: Vec<Bucket<'a>>,
}

impl<'a> Buckets<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, Bucket<'a>> {
        self.buckets.iter()
    }

    /// Bucket by publication type name
    pub fn get(&self, name: &str) -> Option<&Bucket<'a>> {
        self.buckets.iter().find(|b| b.publication_type.name == name)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of entries across all buckets
    pub fn entry_count(&self) -> usize {
        self.buckets.iter().map(|b| b.entries.len()).sum()
    }
}

impl<'b, 'a> IntoIterator for &'b Buckets<'a> {
    type Item = &'b Bucket<'a>;
    type IntoIter = std::slice::Iter<'b, Bucket<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Group `entries` by `taxonomy`.
///
/// Every taxonomy entry gets a bucket, empty or not. An entry goes to the
/// first publication type accepting its entry type; entries no type accepts
/// are dropped.
pub fn bucketize<'a>(
    entries: &'a [BibTeXEntry],
    taxonomy: &'static [PublicationType],
) -> Buckets<'a> {
    let mut buckets: Vec<Bucket<'a>> = taxonomy
        .iter()
        .map(|publication_type| Bucket {
            publication_type,
            entries: Vec::new(),
        })
        .collect();

    for entry in entries {
        match buckets
            .iter_mut()
            .find(|b| b.publication_type.accepts(entry.entry_type))
        {
            Some(bucket) => bucket.entries.push(entry),
            None => debug!(
                key = %entry.cite_key,
                entry_type = %entry.entry_type,
                "entry type not listed, skipping"
            ),
        }
    }

    Buckets { buckets }
}
