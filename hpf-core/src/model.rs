use crate::Mat;

use gamma_param::io::write_factors_parquet;
use rec_data::EntityIndex;

/// Learned posterior-mean factor matrices, the only object surviving a
/// training run. Rows follow the dense positions of the bundled
/// indexes.
#[derive(Debug, Clone)]
pub struct HpfModel {
    pub user_features: Mat,
    pub item_features: Mat,
    pub user_index: EntityIndex,
    pub item_index: EntityIndex,
}

impl HpfModel {
    pub fn num_users(&self) -> usize {
        self.user_features.nrows()
    }

    pub fn num_items(&self) -> usize {
        self.item_features.nrows()
    }

    pub fn num_factors(&self) -> usize {
        self.user_features.ncols()
    }

    /// Expected Poisson rate `E[θ_u]·E[β_i]` for an external user/item
    /// id pair; `None` when either id was unseen during training.
    pub fn expected_rate(&self, user_id: u64, item_id: u64) -> Option<f64> {
        let u = self.user_index.position(user_id)?;
        let i = self.item_index.position(item_id)?;
        Some(self.user_features.row(u).dot(&self.item_features.row(i)))
    }

    ///
    /// Write the factor matrices in long format:
    /// - `{header}.user.parquet`
    /// - `{header}.item.parquet`
    ///
    pub fn to_parquet(&self, header: &str) -> anyhow::Result<()> {
        let user_names: Vec<Box<str>> = self
            .user_index
            .ids()
            .iter()
            .map(|id| id.to_string().into_boxed_str())
            .collect();
        let item_names: Vec<Box<str>> = self
            .item_index
            .ids()
            .iter()
            .map(|id| id.to_string().into_boxed_str())
            .collect();

        write_factors_parquet(
            Some(&user_names),
            &self.user_features,
            &(header.to_string() + ".user.parquet"),
        )?;
        write_factors_parquet(
            Some(&item_names),
            &self.item_features,
            &(header.to_string() + ".item.parquet"),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn expected_rate_goes_through_the_indexes() {
        let mut user_index = EntityIndex::new();
        let mut item_index = EntityIndex::new();
        user_index.intern(100);
        user_index.intern(200);
        item_index.intern(9);

        let model = HpfModel {
            user_features: Mat::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]),
            item_features: Mat::from_row_slice(1, 2, &[0.5, 0.25]),
            user_index,
            item_index,
        };

        assert_abs_diff_eq!(model.expected_rate(100, 9).unwrap(), 1.0);
        assert_abs_diff_eq!(model.expected_rate(200, 9).unwrap(), 2.5);
        assert!(model.expected_rate(300, 9).is_none());
        assert!(model.expected_rate(100, 10).is_none());
        assert_eq!(model.num_users(), 2);
        assert_eq!(model.num_items(), 1);
        assert_eq!(model.num_factors(), 2);
    }
}
