use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Aggregated text for one fetched page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// The originating request URL
    #[serde(rename = "url")]
    pub source_url: String,

    /// Every fragment seen for the page, joined by single spaces
    pub text: String,
}

impl PageRecord {
    fn new(source_url: &str, fragment: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            text: fragment.to_string(),
        }
    }

    fn append(&mut self, fragment: &str) {
        self.text.push(' ');
        self.text.push_str(fragment);
    }
}

#[derive(Debug, Default)]
struct Inner {
    /// Position of each URL's record in `records`
    index: HashMap<String, usize>,

    /// Records in first-fragment order
    records: Vec<PageRecord>,
}

/// Per-URL record set shared by every extraction callback of a crawl
///
/// All mutation goes through [`RecordSet::merge`], which holds a single lock
/// for the lookup and the append, so concurrent callbacks can neither lose a
/// fragment nor interleave two appends to the same text.
///
/// # Example
///
/// ```
/// use wiki_reader::state::RecordSet;
///
/// let records = RecordSet::new();
/// records.merge("https://example.com/a", "  Hello ");
/// records.merge("https://example.com/a", "world");
/// records.merge("https://example.com/a", "   ");
///
/// let records = records.into_records();
/// assert_eq!(records.len(), 1);
/// assert_eq!(records[0].text, "Hello world");
/// ```
#[derive(Debug, Default)]
pub struct RecordSet {
    inner: Mutex<Inner>,
}

impl RecordSet {
    /// Creates an empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges one extracted fragment into the record for `url`
    ///
    /// The fragment is trimmed first; an empty result is discarded. The first
    /// non-empty fragment creates the record, later ones are appended after a
    /// single space in call order.
    pub fn merge(&self, url: &str, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }

        let mut inner = self.lock();
        let Inner { index, records } = &mut *inner;

        match index.get(url) {
            Some(&position) => {
                if let Some(record) = records.get_mut(position) {
                    record.append(fragment);
                }
            }
            None => {
                index.insert(url.to_string(), records.len());
                records.push(PageRecord::new(url, fragment));
            }
        }

        tracing::trace!("Merged {} bytes for {}", fragment.len(), url);
    }

    /// Returns the number of distinct URLs with at least one fragment
    pub fn len(&self) -> usize {
        self.lock().records.len()
    }

    /// Returns whether no fragment has been merged yet
    pub fn is_empty(&self) -> bool {
        self.lock().records.is_empty()
    }

    /// Returns a copy of the current records, in first-fragment order
    pub fn snapshot(&self) -> Vec<PageRecord> {
        self.lock().records.clone()
    }

    /// Consumes the set and returns the final records, in first-fragment order
    pub fn into_records(self) -> Vec<PageRecord> {
        self.inner
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .records
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // A panicking callback cannot leave a half-applied merge behind, so
        // the data behind a poisoned lock is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
