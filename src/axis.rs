//! X axis of a data block, computed from its parameter list.
//!
//! A binary block stores only y values. Its companion parameter list gives
//! the point count (`NPT`), the first and last x value (`FXV`, `LXV`) and
//! the x unit (`DXU`); the x values are evenly spaced between the two
//! bounds, both included.

use crate::error::{Missing, OpusError, Result, Violation};
use crate::parsing::{ParameterMap, Value};

/// Unit code for wavenumbers (cm⁻¹).
pub const WAVENUMBER_UNIT: &str = "WN";

#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub values: Vec<f64>,
    pub unit: String,
}

impl Axis {
    /// Build the axis from a decoded parameter list.
    pub fn from_parameters(params: &ParameterMap) -> Result<Self> {
        Self::from_parameters_within(params, usize::MAX)
    }

    /// Like [`Axis::from_parameters`], failing with
    /// [`OpusError::LimitExceeded`] before allocating when `NPT` is above
    /// `max_points`.
    pub fn from_parameters_within(params: &ParameterMap, max_points: usize) -> Result<Self> {
        let npt = lookup(params, "NPT", "an integer", Value::as_integer)?;
        let fxv = lookup(params, "FXV", "a real", Value::as_real)?;
        let lxv = lookup(params, "LXV", "a real", Value::as_real)?;
        let unit = lookup(params, "DXU", "text", |v| v.as_text().map(str::to_owned))?;

        let npt = usize::try_from(npt).map_err(|_| Violation::ParameterType {
            code: "NPT".into(),
            expected: "a non-negative integer",
        })?;
        if npt > max_points {
            return Err(OpusError::LimitExceeded {
                what: "axis points",
                limit: max_points,
            });
        }

        Ok(Self {
            values: linspace(fxv, lxv, npt),
            unit,
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Wavenumber axes are conventionally drawn high to low.
    pub fn is_wavenumber(&self) -> bool {
        self.unit == WAVENUMBER_UNIT
    }
}

fn lookup<T>(
    params: &ParameterMap,
    code: &str,
    expected: &'static str,
    extract: impl FnOnce(&Value) -> Option<T>,
) -> Result<T> {
    let value = params
        .get(code)
        .ok_or_else(|| OpusError::from(Missing::Parameter(code.to_string())))?;
    extract(value).ok_or_else(|| {
        Violation::ParameterType {
            code: code.to_string(),
            expected,
        }
        .into()
    })
}

/// `count` evenly spaced values from `first` to `last` inclusive.
pub fn linspace(first: f64, last: f64, count: usize) -> Vec<f64> {
    match count {
        0 => Vec::new(),
        1 => vec![first],
        _ => {
            let step = (last - first) / (count - 1) as f64;
            let mut values: Vec<f64> = (0..count).map(|i| first + step * i as f64).collect();
            // Hit the end point exactly rather than accumulating rounding error.
            values[count - 1] = last;
            values
        }
    }
}
