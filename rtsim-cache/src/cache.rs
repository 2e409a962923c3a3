use lazy_static::lazy_static;
use std::sync::{PoisonError, RwLock};
pub use string_cache::DefaultAtom as Atom;

lazy_static! {
    static ref LABELS: RwLock<Vec<Atom>> = RwLock::new(Vec::new());
}

/// Intern a label and return its stable id
pub fn intern_label(s: &str) -> usize {
    let atom = Atom::from(s);
    if let Some(idx) = LABELS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .position(|a| *a == atom)
    {
        return idx;
    }
    let mut v = LABELS.write().unwrap_or_else(PoisonError::into_inner);
    // another writer may have won the race between the two locks
    match v.iter().position(|a| *a == atom) {
        Some(idx) => idx,
        None => {
            v.push(atom);
            v.len() - 1
        }
    }
}

/// Current count of unique labels
pub fn label_count() -> usize {
    LABELS.read().unwrap_or_else(PoisonError::into_inner).len()
}

pub fn label(id: usize) -> Option<Atom> {
    LABELS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(id)
        .cloned()
}
