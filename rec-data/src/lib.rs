//! Rating-data layer for the HPF toolkit.
//!
//! Supplies everything the trainer consumes: rating triplet files
//! (`user item value`, optionally gzipped), dense entity indexes, a
//! seeded train/validation split, and a Gamma-Poisson simulator for
//! generating synthetic implicit-count data.

pub mod common_io;
pub mod index;
pub mod simulate;
pub mod split;
pub mod triplets;

pub use index::EntityIndex;
pub use split::{RatingEntry, RatingSplit};
