pub mod cache;

pub use cache::{Atom, intern_label, label, label_count};
