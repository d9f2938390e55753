use ndarray::Array1;

/// Kaiser shape parameter of the fast-time window.
pub const KAISER_BETA: f64 = 12.0;

/// Window applied along fast-time, with its coherent gain.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowCoefficients {
    coefficients: Array1<f64>,
    sum: f64,
}

impl WindowCoefficients {
    /// Kaiser window of `length` points with β = [`KAISER_BETA`].
    pub fn range_window(length: usize) -> Self {
        Self::from_coefficients(kaiser(length, KAISER_BETA))
    }

    pub fn from_coefficients(coefficients: Array1<f64>) -> Self {
        let sum = coefficients.sum();
        Self { coefficients, sum }
    }

    pub fn coefficients(&self) -> &Array1<f64> {
        &self.coefficients
    }

    /// Sum of the coefficients (coherent gain reference).
    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn len(&self) -> usize {
        self.coefficients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coefficients.is_empty()
    }
}

/// Symmetric Kaiser window, `w[n] = I0(β·sqrt(1 - r²)) / I0(β)` with
/// `r = (n - (N-1)/2) / ((N-1)/2)`.
pub fn kaiser(length: usize, beta: f64) -> Array1<f64> {
    if length == 0 {
        return Array1::zeros(0);
    }
    if length == 1 {
        return Array1::ones(1);
    }

    let half = (length - 1) as f64 / 2.0;
    let i0_beta = bessel_i0(beta);
    Array1::from_shape_fn(length, |n| {
        let r = (n as f64 - half) / half;
        let arg = beta * (1.0 - r * r).max(0.0).sqrt();
        bessel_i0(arg) / i0_beta
    })
}

/// Modified Bessel function of the first kind, order 0, by power series.
pub fn bessel_i0(x: f64) -> f64 {
    let quarter_sq = x * x / 4.0;
    let mut term = 1.0;
    let mut sum = 1.0;
    let mut k = 1.0;
    while term > sum * f64::EPSILON {
        term *= quarter_sq / (k * k);
        sum += term;
        k += 1.0;
    }
    sum
}
