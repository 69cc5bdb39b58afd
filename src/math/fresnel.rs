//! Fresnel integrals in the normalized convention
//! `C(x) = ∫₀ˣ cos(πs²/2) ds`, `S(x) = ∫₀ˣ sin(πs²/2) ds`.
//!
//! Power series below `|x| = 1.5`, modified Lentz continued fraction above.
use std::f64::consts::{FRAC_PI_2, PI};

use nalgebra::Complex;

const EPS: f64 = 1e-15;
const MAX_TERMS: usize = 100;
const FP_MIN: f64 = 1e-300;
const SERIES_LIMIT: f64 = 1.5;

/// Returns `(C(x), S(x))`.
#[must_use]
pub fn fresnel(x: f64) -> (f64, f64) {
    let ax = x.abs();
    let (c, s) = if ax < FP_MIN.sqrt() {
        (ax, 0.0)
    } else if ax <= SERIES_LIMIT {
        series(ax)
    } else {
        continued_fraction(ax)
    };
    if x < 0.0 {
        (-c, -s)
    } else {
        (c, s)
    }
}

/// Alternating power series; odd terms feed `S`, even terms feed `C`.
fn series(ax: f64) -> (f64, f64) {
    let fact = FRAC_PI_2 * ax * ax;
    let mut sum = 0.0;
    let mut sum_s = 0.0;
    let mut sum_c = ax;
    let mut sign = 1.0;
    let mut odd = true;
    let mut term = ax;
    let mut n = 3.0;

    for k in 1..=MAX_TERMS {
        #[allow(clippy::cast_precision_loss)]
        let k = k as f64;
        term *= fact / k;
        sum += sign * term / n;
        let test = sum.abs() * EPS;
        if odd {
            sign = -sign;
            sum_s = sum;
            sum = sum_c;
        } else {
            sum_c = sum;
            sum = sum_s;
        }
        if term < test {
            break;
        }
        odd = !odd;
        n += 2.0;
    }

    (sum_c, sum_s)
}

/// Continued fraction for the complementary error function form.
fn continued_fraction(ax: f64) -> (f64, f64) {
    let pix2 = PI * ax * ax;
    let one = Complex::new(1.0, 0.0);
    let mut b = Complex::new(1.0, -pix2);
    let mut cc = Complex::new(1.0 / FP_MIN, 0.0);
    let mut d = one / b;
    let mut h = d;
    let mut n = -1.0;

    for _ in 2..=MAX_TERMS {
        n += 2.0;
        let a = -n * (n + 1.0);
        b += Complex::new(4.0, 0.0);
        d = one / (d * a + b);
        cc = b + Complex::new(a, 0.0) / cc;
        let del = cc * d;
        h *= del;
        if (del.re - 1.0).abs() + del.im.abs() < EPS {
            break;
        }
    }

    h *= Complex::new(ax, -ax);
    let phase = Complex::new((0.5 * pix2).cos(), (0.5 * pix2).sin());
    let cs = Complex::new(0.5, 0.5) * (one - phase * h);
    (cs.re, cs.im)
}
