//! Bibliography record handling.
//!
//! Records are tagged by prefixed category labels in their `keywords`
//! field (`pub:journal-article`, `topic:machine-learning`, ...) and split
//! into one `.bib` file per distinct label. Record order is preserved as
//! given; bibliography records carry no priority.

pub mod keymap;
pub mod record;
pub mod splitter;

pub use keymap::{KeywordMap, DEFAULT_VALID_PREFIXES};
pub use record::{parse, BibEntry};
pub use splitter::{split, write_all, write_splits};
