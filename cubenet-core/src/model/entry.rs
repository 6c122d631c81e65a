use serde::{Deserialize, Serialize};

/// One slot in an ordered file-layout sequence: either a typed record or a
/// raw comment string kept verbatim so an external writer can reproduce the
/// source layout. Comments are never modeled as a record subtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Entry<T> {
    Comment(String),
    Record(T),
}

impl<T> Entry<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            Entry::Record(r) => Some(r),
            Entry::Comment(_) => None,
        }
    }

    pub fn record_mut(&mut self) -> Option<&mut T> {
        match self {
            Entry::Record(r) => Some(r),
            Entry::Comment(_) => None,
        }
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Entry::Comment(_))
    }
}
