//! Server-side posting model: valuator modes, touch event types and masks.

use serde::{Deserialize, Serialize};

/// Whether valuator values are deltas or positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisMode {
    Relative,
    Absolute,
}

/// X Input 2 touch event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TouchEventType {
    Begin,
    Update,
    End,
}

/// Synthetic touch identifier handed to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouchId(pub u32);

/// Maximum number of valuators a mask can carry.
pub const MAX_VALUATORS: usize = 36;

/// Sparse set of valuator values, indexed by valuator number.
///
/// Mirrors the server's `ValuatorMask`: only the indices that were set are
/// present, and the mask remembers how many valuators it was sized for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuatorMask {
    size: usize,
    values: Vec<Option<f64>>,
}

impl ValuatorMask {
    /// Creates an empty mask for `size` valuators (clamped to [`MAX_VALUATORS`]).
    pub fn new(size: usize) -> Self {
        let size = size.min(MAX_VALUATORS);
        Self {
            size,
            values: vec![None; size],
        }
    }

    /// Sets valuator `index`. Indices beyond the mask size are ignored.
    pub fn set_double(&mut self, index: usize, value: f64) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = Some(value);
        }
    }

    /// Returns valuator `index` if it was set.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Number of valuators the mask was created for.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of valuators that have been set.
    pub fn num_set(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}
