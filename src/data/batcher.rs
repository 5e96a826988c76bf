// ============================================================
// Layer 4 - Bag Batcher
// ============================================================
// Implements Burn's Batcher trait to convert a Vec<BagSample>
// into tensors.
//
// How batching works here:
//   Input:  Vec of N BagSamples, each with 4 codes and 5 features
//   Output: BagBatch with tensors of shape [N, 4] and [N, 5]
//
//   All codes are flattened into one long Vec, then reshaped:
//   [s1_c1, ..., s1_c4, s2_c1, ..., sN_c4] -> [N, 4]
//   The numerical features are stacked the same way.
//
// Targets are optional: a batch from a labelled dataset carries a
// [N, 1] price tensor, a test batch carries None. A mixed batch
// (some rows labelled, some not) also yields None, which the
// training loop treats as an error.
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::{BagSample, CATEGORICAL_COLUMNS, NUMERICAL_COLUMNS};

// ─── BagBatch ─────────────────────────────────────────────────────────────────
/// A batch of samples ready for the model forward pass.
/// All tensors have batch_size as their first dimension.
///
/// B is the Burn Backend (e.g. NdArray, Wgpu) -
/// generic so the same batcher works on any device.
#[derive(Debug, Clone)]
pub struct BagBatch<B: Backend> {
    /// Categorical codes - shape: [batch_size, 4]
    pub categoricals: Tensor<B, 2, Int>,

    /// Numerical features - shape: [batch_size, 5]
    pub numericals: Tensor<B, 2>,

    /// Target prices - shape: [batch_size, 1]; None for test batches
    pub targets: Option<Tensor<B, 2>>,
}

// ─── BagBatcher ───────────────────────────────────────────────────────────────
/// The batcher struct - holds the target device so tensors are
/// created in the right place.
#[derive(Clone, Debug)]
pub struct BagBatcher<B: Backend> {
    device: B::Device,
}

impl<B: Backend> BagBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<BagSample, BagBatch<B>> for BagBatcher<B> {
    fn batch(&self, items: Vec<BagSample>) -> BagBatch<B> {
        let batch_size = items.len();

        // ── Flatten categorical codes ─────────────────────────────────────────
        let code_flat: Vec<i32> = items
            .iter()
            .flat_map(|s| s.categoricals.iter().map(|&c| c as i32))
            .collect();

        // ── Flatten numerical features ────────────────────────────────────────
        let feature_flat: Vec<f32> = items
            .iter()
            .flat_map(|s| s.numericals)
            .collect();

        let categoricals = Tensor::<B, 1, Int>::from_ints(code_flat.as_slice(), &self.device)
            .reshape([batch_size, CATEGORICAL_COLUMNS]);

        let numericals = Tensor::<B, 1>::from_floats(feature_flat.as_slice(), &self.device)
            .reshape([batch_size, NUMERICAL_COLUMNS]);

        // ── Stack targets, if every sample has one ────────────────────────────
        let prices: Option<Vec<f32>> = items.iter().map(|s| s.price).collect();
        let targets = prices.map(|p| {
            Tensor::<B, 1>::from_floats(p.as_slice(), &self.device).reshape([batch_size, 1])
        });

        BagBatch { categoricals, numericals, targets }
    }
}
