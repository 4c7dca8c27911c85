//! Dense feed-forward stacks built on `candle-nn`.
//!
//! Purpose
//! -------
//! Provide the encoder and decoder of the time-lagged autoencoder as stacks
//! of [`candle_nn::Linear`] layers whose parameters are registered as
//! [`Var`]s for the optimizer. Gradients come from candle's autograd.
//!
//! Key behaviors
//! -------------
//! - Hidden layers use one activation, the last layer an optional output
//!   activation (`None` = identity).
//! - Weights start uniform in `±1/sqrt(fan_in)` from the caller's seeded RNG;
//!   biases start at zero. No global RNG is touched.
//! - [`to_tensor`] / [`to_array`] move `f64` batches between `ndarray` and
//!   candle without changing the row order.
//!
//! Conventions
//! -----------
//! - Weight tensors are stored `[fan_out × fan_in]` (candle's `Linear`
//!   layout); batches are `[rows × units]`.
//! - Everything runs on the CPU in `f64`.
use crate::projection::errors::{TaeError, TaeResult};
use candle_core::{DType, Device, Tensor, Var};
use candle_nn::{Activation, Linear, Module};
use ndarray::{Array2, ArrayView2};
use rand::Rng;
use rand::distributions::{Distribution, Uniform};

/// Copy a row-major batch into a `[rows × cols]` tensor.
pub fn to_tensor(x: ArrayView2<'_, f64>, device: &Device) -> TaeResult<Tensor> {
    let shape = (x.nrows(), x.ncols());
    Ok(Tensor::from_vec(x.iter().copied().collect::<Vec<f64>>(), shape, device)?)
}

/// Copy a 2-D tensor back into an `ndarray` matrix.
pub fn to_array(t: &Tensor) -> TaeResult<Array2<f64>> {
    let (rows, cols) = t.dims2()?;
    let flat = t.flatten_all()?.to_vec1::<f64>()?;
    Array2::from_shape_vec((rows, cols), flat)
        .map_err(|err| TaeError::Backend { message: err.to_string() })
}

/// Feed-forward stack `a = φ(x·Wᵀ + b)` with trainable parameters.
#[derive(Debug, Clone)]
pub struct DenseNetwork {
    layers: Vec<Linear>,
    vars: Vec<Var>,
    hidden: Activation,
    output: Option<Activation>,
}

impl DenseNetwork {
    /// Build layers for `units = [in, h_1, …, out]` (at least two entries).
    ///
    /// # Errors
    /// - `TaeError::InvalidOptions` when fewer than two widths are given.
    /// - `TaeError::Backend` when candle cannot allocate a parameter.
    pub fn new<R: Rng + ?Sized>(
        units: &[usize], hidden: Activation, output: Option<Activation>, rng: &mut R,
        device: &Device,
    ) -> TaeResult<Self> {
        if units.len() < 2 {
            return Err(TaeError::InvalidOptions {
                field: "units",
                reason: "a network needs an input and an output width",
            });
        }
        let mut layers = Vec::with_capacity(units.len() - 1);
        let mut vars = Vec::with_capacity(2 * (units.len() - 1));
        for w in units.windows(2) {
            let (fan_in, fan_out) = (w[0], w[1]);
            let bound = 1.0 / (fan_in.max(1) as f64).sqrt();
            let dist = Uniform::new_inclusive(-bound, bound);
            let init: Vec<f64> = (0..fan_in * fan_out).map(|_| dist.sample(rng)).collect();
            let weight = Var::from_tensor(&Tensor::from_vec(init, (fan_out, fan_in), device)?)?;
            let bias = Var::from_tensor(&Tensor::zeros(fan_out, DType::F64, device)?)?;
            layers.push(Linear::new(weight.as_tensor().clone(), Some(bias.as_tensor().clone())));
            vars.push(weight);
            vars.push(bias);
        }
        Ok(Self { layers, vars, hidden, output })
    }

    /// Trainable parameters, weight then bias per layer.
    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    pub fn input_dim(&self) -> usize {
        self.layers.first().map_or(0, |l| l.weight().dims()[1])
    }

    pub fn output_dim(&self) -> usize {
        self.layers.last().map_or(0, |l| l.weight().dims()[0])
    }
}

impl Module for DenseNetwork {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let last = self.layers.len().saturating_sub(1);
        let mut a = xs.clone();
        for (i, layer) in self.layers.iter().enumerate() {
            a = layer.forward(&a)?;
            a = match (i == last, &self.output) {
                (false, _) => self.hidden.forward(&a)?,
                (true, Some(act)) => act.forward(&a)?,
                (true, None) => a,
            };
        }
        Ok(a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Layer shapes, parameter registration, and the init bound.
    // - Output activation behavior and ndarray/tensor round trips.
    //
    // They intentionally DO NOT cover:
    // - Gradient correctness; candle's autograd is trusted.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // A `[4, 6, 1]` logistic network maps batches to `[rows × 1]` values in
    // `[0, 1]` and registers one weight and one bias per layer.
    //
    // Given
    // -----
    // - Seeded RNG, a 3 × 4 batch.
    //
    // Expect
    // ------
    // - Output 3 × 1 in [0, 1]; 4 vars; first weight entries within ±1/2.
    fn logistic_stack_shapes_and_range() {
        // Arrange
        let mut rng = Xoshiro256Plus::seed_from_u64(5);
        let device = Device::Cpu;
        let net = DenseNetwork::new(
            &[4, 6, 1],
            Activation::Relu,
            Some(Activation::Sigmoid),
            &mut rng,
            &device,
        )
        .expect("network");
        let x = array![[0.1, 0.2, 0.3, 0.4], [1.0, -1.0, 0.5, 0.0], [3.0, 2.0, 1.0, 0.0]];

        // Act
        let xs = to_tensor(x.view(), &device).expect("tensor");
        let out = to_array(&net.forward(&xs).expect("forward")).expect("array");

        // Assert
        assert_eq!(out.dim(), (3, 1));
        assert!(out.iter().all(|&z| (0.0..=1.0).contains(&z)));
        assert_eq!(net.vars().len(), 4);
        assert_eq!((net.input_dim(), net.output_dim()), (4, 1));
        let w0 = to_array(net.vars()[0].as_tensor()).expect("array");
        assert_eq!(w0.dim(), (6, 4));
        assert!(w0.iter().all(|&w| w.abs() <= 0.5));
    }

    #[test]
    // Purpose
    // -------
    // Batches survive the ndarray → tensor → ndarray trip in row order.
    //
    // Given
    // -----
    // - A 2 × 3 matrix.
    //
    // Expect
    // ------
    // - Identical matrix back.
    fn tensor_conversion_keeps_row_order() {
        let x = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];

        let back = to_array(&to_tensor(x.view(), &Device::Cpu).expect("tensor")).expect("array");

        assert_eq!(back, x);
    }

    #[test]
    // Purpose
    // -------
    // Fewer than two widths cannot form a layer.
    //
    // Given
    // -----
    // - units = [3].
    //
    // Expect
    // ------
    // - InvalidOptions on `units`.
    fn single_width_is_rejected() {
        let mut rng = Xoshiro256Plus::seed_from_u64(0);

        let err = DenseNetwork::new(&[3], Activation::Relu, None, &mut rng, &Device::Cpu)
            .expect_err("too few widths");

        assert!(matches!(err, TaeError::InvalidOptions { field: "units", .. }));
    }
}
