//! Dense two-dimensional tensor tagged with the device it is meant to live on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LayoutError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[default]
    Cpu,
    Cuda(usize),
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cpu => f.write_str("cpu"),
            Self::Cuda(ordinal) => write!(f, "cuda:{ordinal}"),
        }
    }
}

/// Row-major `f64` tensor of rank two.
#[derive(Debug, Clone, PartialEq)]
pub struct Tensor {
    data: Vec<f64>,
    shape: [usize; 2],
    device: Device,
}

impl Tensor {
    /// # Errors
    /// Returns [`LayoutError::LengthMismatch`] when `data` does not hold
    /// exactly `rows * cols` values.
    pub fn from_vec(data: Vec<f64>, shape: [usize; 2], device: Device) -> Result<Self, LayoutError> {
        let expected = shape[0]
            .checked_mul(shape[1])
            .ok_or(LayoutError::Overflow { what: "tensor element count" })?;
        if data.len() != expected {
            return Err(LayoutError::LengthMismatch {
                what: "tensor data and shape product",
                left: data.len(),
                right: expected,
            });
        }
        Ok(Self { data, shape, device })
    }

    /// # Panics
    /// If `rows * cols` overflows `usize`, like [`ndarray::Array2::zeros`].
    #[must_use]
    pub fn zeros(shape: [usize; 2], device: Device) -> Self {
        let Some(len) = shape[0].checked_mul(shape[1]) else {
            panic!("tensor element count overflows usize for shape {shape:?}");
        };
        Self {
            data: vec![0.0; len],
            shape,
            device,
        }
    }

    #[inline]
    #[must_use]
    pub const fn shape(&self) -> [usize; 2] {
        self.shape
    }

    #[inline]
    #[must_use]
    pub const fn device(&self) -> Device {
        self.device
    }

    #[inline]
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Row `i` as a slice.
    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        let cols = self.shape[1];
        &self.data[i * cols..(i + 1) * cols]
    }

    #[inline]
    pub fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let cols = self.shape[1];
        &mut self.data[i * cols..(i + 1) * cols]
    }

    #[must_use]
    pub fn to_device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }
}
