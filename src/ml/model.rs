use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        BatchNorm, BatchNormConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation,
};

use crate::data::dataset::NUMERICAL_COLUMNS;

/// Embedding output width per categorical column, in the fixed
/// [brand, material, style, color] order.
pub const EMBED_DIMS: [usize; 4] = [3, 2, 2, 3];

/// Hidden layer widths of the fully connected stack.
const HIDDEN: [usize; 3] = [256, 128, 64];

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally - do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct PriceModelConfig {
    /// Distinct-value counts per categorical column. These must come
    /// from the fitted code tables: an embedding table sized below a
    /// column's cardinality would be indexed out of range.
    pub brand_count:    usize,
    pub material_count: usize,
    pub style_count:    usize,
    pub color_count:    usize,

    #[config(default = 0.1)]
    pub dropout: f64,
}

impl PriceModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PriceModel<B> {
        let counts = [
            self.brand_count,
            self.material_count,
            self.style_count,
            self.color_count,
        ];
        let embeddings: Vec<Embedding<B>> = counts
            .iter()
            .zip(EMBED_DIMS.iter())
            .map(|(&count, &dim)| EmbeddingConfig::new(count, dim).init(device))
            .collect();

        // Concatenated embeddings + numerical features
        let input_width: usize = EMBED_DIMS.iter().sum::<usize>() + NUMERICAL_COLUMNS;

        let fc1 = LinearConfig::new(input_width, HIDDEN[0]).init(device);
        let bn1 = BatchNormConfig::new(HIDDEN[0]).init(device);
        let fc2 = LinearConfig::new(HIDDEN[0], HIDDEN[1]).init(device);
        let bn2 = BatchNormConfig::new(HIDDEN[1]).init(device);
        let fc3 = LinearConfig::new(HIDDEN[1], HIDDEN[2]).init(device);
        let bn3 = BatchNormConfig::new(HIDDEN[2]).init(device);
        let output  = LinearConfig::new(HIDDEN[2], 1).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();

        PriceModel { embeddings, fc1, bn1, fc2, bn2, fc3, bn3, output, dropout }
    }
}

#[derive(Module, Debug)]
pub struct PriceModel<B: Backend> {
    pub embeddings: Vec<Embedding<B>>,
    pub fc1:     Linear<B>,
    pub bn1:     BatchNorm<B, 0>,
    pub fc2:     Linear<B>,
    pub bn2:     BatchNorm<B, 0>,
    pub fc3:     Linear<B>,
    pub bn3:     BatchNorm<B, 0>,
    pub output:  Linear<B>,
    pub dropout: Dropout,
}

impl<B: Backend> PriceModel<B> {
    /// categoricals: [batch, 4] Int, numericals: [batch, 5]
    /// -> predictions: [batch, 1]
    pub fn forward(
        &self,
        categoricals: Tensor<B, 2, Int>,
        numericals:   Tensor<B, 2>,
    ) -> Tensor<B, 2> {
        let [batch_size, _] = categoricals.dims();

        // One lookup per categorical column. A [batch, 1] Int slice
        // embeds to [batch, 1, dim], which flattens to [batch, dim].
        let mut features: Vec<Tensor<B, 2>> = Vec::with_capacity(EMBED_DIMS.len() + 1);
        for (column, embedding) in self.embeddings.iter().enumerate() {
            let codes = categoricals
                .clone()
                .slice([0..batch_size, column..column + 1]);
            let embedded = embedding
                .forward(codes)
                .reshape([batch_size, EMBED_DIMS[column]]);
            features.push(embedded);
        }
        features.push(numericals);

        // Fixed concatenation order: embeddings first, then numericals
        let x = Tensor::cat(features, 1);

        let x = self.dropout.forward(self.bn1.forward(activation::relu(self.fc1.forward(x))));
        let x = self.dropout.forward(self.bn2.forward(activation::relu(self.fc2.forward(x))));
        let x = self.dropout.forward(self.bn3.forward(activation::relu(self.fc3.forward(x))));

        // Single linear unit, no activation: the price prediction is
        // an unbounded scalar.
        self.output.forward(x)
    }

    /// Forward pass plus mean-squared-error loss against targets of
    /// shape [batch, 1].
    pub fn forward_loss(
        &self,
        categoricals: Tensor<B, 2, Int>,
        numericals:   Tensor<B, 2>,
        targets:      Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let predictions = self.forward(categoricals, numericals);
        let loss = MseLoss::new().forward(predictions.clone(), targets, Reduction::Mean);
        (loss, predictions)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    type TestBackend = burn::backend::NdArray;

    #[test]
    fn test_output_shape_is_batch_by_one() {
        let device = burn::backend::ndarray::NdArrayDevice::Cpu;
        let model: PriceModel<TestBackend> =
            PriceModelConfig::new(5, 3, 4, 6).init(&device);

        let batch_size = 3;
        let categoricals = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 1, 2, 3, 4, 2, 3, 5, 1, 0, 0, 1].as_slice(),
            &device,
        )
        .reshape([batch_size, 4]);
        let numericals = Tensor::<TestBackend, 1>::from_floats(
            [0.0, 3.0, 1.0, 0.0, -0.5, 1.0, 7.0, 0.0, 1.0, 0.2, -1.0, 5.0, 1.0, 1.0, 1.3]
                .as_slice(),
            &device,
        )
        .reshape([batch_size, 5]);

        let output = model.forward(categoricals, numericals);
        assert_eq!(output.dims(), [batch_size, 1]);
    }

    #[test]
    fn test_mse_loss_is_finite() {
        let device = burn::backend::ndarray::NdArrayDevice::Cpu;
        let model: PriceModel<TestBackend> =
            PriceModelConfig::new(3, 3, 3, 3).init(&device);

        let categoricals = Tensor::<TestBackend, 1, Int>::from_ints(
            [0, 1, 2, 0, 1, 2, 0, 1].as_slice(),
            &device,
        )
        .reshape([2, 4]);
        let numericals = Tensor::<TestBackend, 1>::from_floats(
            [0.0, 3.0, 1.0, 0.0, -0.5, 1.0, 7.0, 0.0, 1.0, 0.2].as_slice(),
            &device,
        )
        .reshape([2, 5]);
        let targets =
            Tensor::<TestBackend, 1>::from_floats([80.0, 120.0].as_slice(), &device)
                .reshape([2, 1]);

        let (loss, predictions) = model.forward_loss(categoricals, numericals, targets);
        assert_eq!(predictions.dims(), [2, 1]);
        assert!(loss.into_scalar().is_finite());
    }
}
