use crate::error::{GeometryError, Result};

use super::CurveDomain;

/// Affine map `u = a·t + b` from the external curve parameter `t` to the
/// curve's internal coordinate `u`.
///
/// The internal range `[u_start, u_end]` is fixed by the shape and may run
/// backwards. Re-parameterization only changes `a` and `b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterMap {
    domain: CurveDomain,
    u_start: f64,
    u_end: f64,
    scale: f64,
    offset: f64,
}

impl ParameterMap {
    /// Creates a map sending `[t_min, t_max]` onto `[u_start, u_end]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the interval is reversed or non-finite, or if it is
    /// a single value while the internal range is not.
    pub fn new(domain: CurveDomain, u_start: f64, u_end: f64) -> Result<Self> {
        let mut map = Self {
            domain,
            u_start,
            u_end,
            scale: 0.0,
            offset: u_start,
        };
        map.set_domain(domain.t_min, domain.t_max)?;
        Ok(map)
    }

    /// Re-parameterizes onto `[t_min, t_max]` without changing the internal range.
    ///
    /// # Errors
    ///
    /// See [`ParameterMap::new`].
    pub fn set_domain(&mut self, t_min: f64, t_max: f64) -> Result<()> {
        if !t_min.is_finite() || !t_max.is_finite() || t_min > t_max {
            return Err(GeometryError::InvalidInterval { t_min, t_max }.into());
        }
        let span = t_max - t_min;
        let u_span = self.u_end - self.u_start;
        if span <= 0.0 {
            if u_span != 0.0 {
                return Err(GeometryError::InvalidInterval { t_min, t_max }.into());
            }
            self.scale = 0.0;
        } else {
            self.scale = u_span / span;
        }
        self.offset = self.u_start - self.scale * t_min;
        self.domain = CurveDomain::new(t_min, t_max);
        Ok(())
    }

    /// Returns the external parameter domain.
    #[must_use]
    pub fn domain(&self) -> CurveDomain {
        self.domain
    }

    /// Chain-rule factor `du/dt`.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Internal coordinate at the start of the domain.
    #[must_use]
    pub fn u_start(&self) -> f64 {
        self.u_start
    }

    /// Internal coordinate at the end of the domain.
    #[must_use]
    pub fn u_end(&self) -> f64 {
        self.u_end
    }

    /// Maps an external parameter to the internal coordinate.
    #[must_use]
    pub fn to_internal(&self, t: f64) -> f64 {
        self.scale.mul_add(t, self.offset)
    }

    /// Maps an internal coordinate back to the external parameter.
    ///
    /// A single-point map sends every coordinate to `t_min`.
    #[must_use]
    pub fn to_external(&self, u: f64) -> f64 {
        if self.scale == 0.0 {
            return self.domain.t_min;
        }
        (u - self.offset) / self.scale
    }
}
