/// A real polynomial `c0 + c1·x + c2·x² + ...` stored by ascending power.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from coefficients in ascending power order.
    ///
    /// Trailing zero coefficients are dropped; an empty list is the zero polynomial.
    #[must_use]
    pub fn new(coefficients: Vec<f64>) -> Self {
        let mut coefficients = coefficients;
        while coefficients.last() == Some(&0.0) {
            coefficients.pop();
        }
        Self { coefficients }
    }

    /// The identity polynomial `x`.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(vec![0.0, 1.0])
    }

    /// Coefficients by ascending power.
    #[must_use]
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Degree of the polynomial; the zero polynomial reports degree 0.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    /// Evaluates the polynomial at `x` (Horner's scheme).
    #[must_use]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc.mul_add(x, c))
    }

    /// Returns the derivative polynomial.
    #[must_use]
    pub fn derivative(&self) -> Self {
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .skip(1)
            .map(|(power, &c)| {
                #[allow(clippy::cast_precision_loss)]
                let power = power as f64;
                c * power
            })
            .collect();
        Self::new(coefficients)
    }
}
