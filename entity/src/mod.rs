//! Database entities
//!
//! Note that these may have to be updated by hand when the `skins` table changes.

pub mod prelude;

pub mod skin;
