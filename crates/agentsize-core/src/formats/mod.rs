//! # Formats Module
//!
//! Binary snapshot format for rules configurations and score sets.
//!
//! Only pure byte transformations live here. Reading and writing files is the
//! app layer's job; the redb store in [`crate::storage`] reuses these codecs
//! for its values.

mod persistence;

pub use persistence::*;
