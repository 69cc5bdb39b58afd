use crate::error::Result;

use super::{Point2, Vector2};

/// Accuracy order of the central difference stencils.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilOrder {
    /// Second-order accurate stencils (reach `2h` for the third derivative).
    Second,
    /// Fourth-order accurate stencils (reach `3h` for the third derivative).
    Fourth,
}

/// Finite-difference approximation of position derivatives.
///
/// The effective step is `step * max(1, t_max - t_min)`. Samples lie on a
/// stencil of equally spaced nodes centred on `t`. Near the domain ends the
/// nodes are shifted inwards so the position function is never sampled
/// outside `[t_min, t_max]`, and the weights are recomputed for the off-centre
/// evaluation point, so the estimate stays accurate at `t` itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FiniteDifference {
    /// Relative step size.
    pub step: f64,
    /// Accuracy order.
    pub order: StencilOrder,
}

impl Default for FiniteDifference {
    fn default() -> Self {
        Self {
            step: 1e-3,
            order: StencilOrder::Fourth,
        }
    }
}

impl FiniteDifference {
    /// Approximates the `n`-th derivative (`1..=3`) of `position` at `t`.
    ///
    /// `n` is clamped into `1..=3`.
    ///
    /// # Errors
    ///
    /// Propagates errors from `position`.
    pub fn derivative<F>(&self, position: F, t: f64, t_min: f64, t_max: f64, n: u8) -> Result<Vector2>
    where
        F: Fn(f64) -> Result<Point2>,
    {
        let n = n.clamp(1, 3);
        let h = self.step * (t_max - t_min).max(1.0);
        let nodes = self.node_count(n);
        let half = nodes / 2;
        #[allow(clippy::cast_precision_loss)]
        let reach = half as f64 * h;
        let center = shifted_center(t, t_min, t_max, reach);
        let shift = (center - t) / h;

        // Node offsets from `t`, in units of `h`.
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
        let steps: Vec<f64> = (0..nodes).map(|i| (i as isize - half as isize) as f64).collect();
        let offsets: Vec<f64> = steps.iter().map(|k| shift + k).collect();
        let weights = fornberg_weights(&offsets, usize::from(n));

        let mut acc = Vector2::zeros();
        for (k, w) in steps.iter().zip(&weights) {
            let p = position(center + k * h)?;
            acc += p.coords * *w;
        }
        Ok(acc / h.powi(i32::from(n)))
    }

    /// Number of stencil nodes for the `n`-th derivative.
    fn node_count(&self, n: u8) -> usize {
        match (self.order, n) {
            (StencilOrder::Second, 1 | 2) => 3,
            (StencilOrder::Second, _) | (StencilOrder::Fourth, 1 | 2) => 5,
            (StencilOrder::Fourth, _) => 7,
        }
    }
}

/// Moves `t` inwards so that `[t - reach, t + reach]` fits in the domain, when it can.
fn shifted_center(t: f64, t_min: f64, t_max: f64, reach: f64) -> f64 {
    if t_max - t_min < 2.0 * reach {
        return t;
    }
    t.clamp(t_min + reach, t_max - reach)
}

/// Weights of the `order`-th derivative at 0 from samples at `nodes`
/// (Fornberg's recurrence over the Lagrange interpolant).
#[allow(
    clippy::cast_precision_loss,
    clippy::many_single_char_names,
    clippy::needless_range_loop
)]
fn fornberg_weights(nodes: &[f64], order: usize) -> Vec<f64> {
    let count = nodes.len();
    let mut c = vec![vec![0.0; order + 1]; count];
    c[0][0] = 1.0;
    let mut c1 = 1.0;
    let mut c4 = nodes[0];
    for i in 1..count {
        let mn = i.min(order);
        let mut c2 = 1.0;
        let c5 = c4;
        c4 = nodes[i];
        for j in 0..i {
            let c3 = nodes[i] - nodes[j];
            c2 *= c3;
            if j == i - 1 {
                for k in (1..=mn).rev() {
                    c[i][k] = c1 * (k as f64 * c[i - 1][k - 1] - c5 * c[i - 1][k]) / c2;
                }
                c[i][0] = -c1 * c5 * c[i - 1][0] / c2;
            }
            for k in (1..=mn).rev() {
                c[j][k] = (c4 * c[j][k] - k as f64 * c[j][k - 1]) / c3;
            }
            c[j][0] = c4 * c[j][0] / c3;
        }
        c1 = c2;
    }
    c.into_iter().map(|row| row[order]).collect()
}
