use crate::index::EntityIndex;
use crate::triplets::RawTriplet;

use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One rating keyed by dense user/item positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingEntry {
    pub user: usize,
    pub item: usize,
    pub value: f64,
}

/// Training/validation partition of a rating data set, together with
/// the dense user/item indexes shared by both parts.
#[derive(Debug, Clone)]
pub struct RatingSplit {
    train: Vec<RatingEntry>,
    validation: Vec<RatingEntry>,
    user_index: EntityIndex,
    item_index: EntityIndex,
}

impl RatingSplit {
    ///
    /// Randomly partition raw triplets into training and validation
    /// parts. Ids are interned in first-appearance order and each
    /// triplet goes to validation with probability
    /// `validation_fraction`, drawn from a single seeded stream in
    /// input order, so the split is reproducible for a fixed seed.
    ///
    pub fn from_triplets(
        triplets: &[RawTriplet],
        validation_fraction: f64,
        seed: u64,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            (0.0..1.0).contains(&validation_fraction),
            "validation fraction should be within [0, 1): {}",
            validation_fraction
        );

        let mut user_index = EntityIndex::new();
        let mut item_index = EntityIndex::new();
        let mut train = vec![];
        let mut validation = vec![];

        let mut rng = StdRng::seed_from_u64(seed);

        for &(user_id, item_id, value) in triplets {
            let entry = RatingEntry {
                user: user_index.intern(user_id),
                item: item_index.intern(item_id),
                value,
            };
            if rng.random::<f64>() < validation_fraction {
                validation.push(entry);
            } else {
                train.push(entry);
            }
        }

        anyhow::ensure!(!train.is_empty(), "empty training split");
        anyhow::ensure!(
            !validation.is_empty(),
            "empty validation split; increase the validation fraction or the data size"
        );

        info!(
            "split {} ratings into {} training and {} validation ({} users x {} items)",
            triplets.len(),
            train.len(),
            validation.len(),
            user_index.len(),
            item_index.len()
        );

        Ok(Self {
            train,
            validation,
            user_index,
            item_index,
        })
    }

    /// Assemble a split from already-indexed parts.
    pub fn from_parts(
        train: Vec<RatingEntry>,
        validation: Vec<RatingEntry>,
        user_index: EntityIndex,
        item_index: EntityIndex,
    ) -> Self {
        Self {
            train,
            validation,
            user_index,
            item_index,
        }
    }

    pub fn train(&self) -> &[RatingEntry] {
        &self.train
    }

    pub fn validation(&self) -> &[RatingEntry] {
        &self.validation
    }

    pub fn num_users(&self) -> usize {
        self.user_index.len()
    }

    pub fn num_items(&self) -> usize {
        self.item_index.len()
    }

    pub fn user_index(&self) -> &EntityIndex {
        &self.user_index
    }

    pub fn item_index(&self) -> &EntityIndex {
        &self.item_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_triplets() -> Vec<RawTriplet> {
        (0..200)
            .map(|t| (t % 17, t % 13, (t % 5) as f64))
            .collect()
    }

    #[test]
    fn split_is_deterministic() {
        let triplets = toy_triplets();
        let a = RatingSplit::from_triplets(&triplets, 0.2, 42).unwrap();
        let b = RatingSplit::from_triplets(&triplets, 0.2, 42).unwrap();

        assert_eq!(a.train(), b.train());
        assert_eq!(a.validation(), b.validation());
        assert_eq!(a.num_users(), 17);
        assert_eq!(a.num_items(), 13);
        assert_eq!(a.train().len() + a.validation().len(), triplets.len());
    }

    #[test]
    fn bad_fraction_is_rejected() {
        let triplets = toy_triplets();
        assert!(RatingSplit::from_triplets(&triplets, 1.0, 42).is_err());
        assert!(RatingSplit::from_triplets(&triplets, -0.1, 42).is_err());
    }

    #[test]
    fn degenerate_split_is_rejected() {
        // fraction 0 leaves the validation part empty
        let triplets = toy_triplets();
        assert!(RatingSplit::from_triplets(&triplets, 0.0, 42).is_err());
    }
}
