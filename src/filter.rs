//! Zero-phase Butterworth low-pass smoothing.
//!
//! The anomaly test should react to sustained signal shifts, not
//! single-sample jitter, so each identifier's history window is smoothed
//! before the deviation test. The filter is designed once at construction
//! (analog Butterworth prototype, bilinear transform with prewarping) and
//! applied forward-backward with odd-symmetric edge padding and steady-state
//! initial conditions, so the output has no phase lag relative to the input.
//!
//! A window shorter than the edge padding cannot be filtered; that surfaces
//! as [`MotionError::FilterDegenerate`], which the detector catches and
//! answers with the raw reading instead. Filtering is best effort, never
//! fatal.

use num_complex::Complex64;

use crate::error::MotionError;
use crate::Result;

/// Low-pass Butterworth filter with zero-phase application.
#[derive(Debug, Clone)]
pub struct ButterworthFilter {
    /// Numerator coefficients, length `order + 1`.
    b: Vec<f64>,
    /// Denominator coefficients, length `order + 1`, normalized so `a[0] = 1`.
    a: Vec<f64>,
    /// Steady-state filter state for a unit-amplitude input.
    zi: Vec<f64>,
    order: usize,
}

impl ButterworthFilter {
    /// Design a low-pass filter of the given order and normalized cutoff.
    ///
    /// `cutoff` is expressed as a fraction of the Nyquist frequency and must
    /// lie in (0, 1).
    pub fn new(order: usize, cutoff: f64) -> Result<Self> {
        if order == 0 {
            return Err(MotionError::InvalidConfig(
                "filter order must be at least 1".to_string(),
            ));
        }
        if !(cutoff > 0.0 && cutoff < 1.0) || !cutoff.is_finite() {
            return Err(MotionError::InvalidConfig(format!(
                "filter cutoff must lie in (0, 1), got {cutoff}"
            )));
        }

        let (b, a) = design_lowpass(order, cutoff);
        let zi = steady_state(&b, &a)?;

        Ok(Self { b, a, zi, order })
    }

    /// The filter order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Numerator and denominator coefficients, `a[0] = 1`.
    pub fn coefficients(&self) -> (&[f64], &[f64]) {
        (&self.b, &self.a)
    }

    /// Edge padding length required for zero-phase application.
    ///
    /// Inputs must be strictly longer than this.
    pub fn pad_len(&self) -> usize {
        3 * (self.order + 1)
    }

    /// Apply the filter forward and backward over the whole window.
    ///
    /// Returns the smoothed sequence, same length as the input. Fails with
    /// [`MotionError::FilterDegenerate`] when the input is shorter than the
    /// required edge padding or contains non-finite values.
    pub fn apply(&self, data: &[f64]) -> Result<Vec<f64>> {
        let padlen = self.pad_len();
        if data.len() <= padlen {
            return Err(MotionError::FilterDegenerate {
                reason: format!("input must exceed edge padding of {padlen}"),
                len: data.len(),
            });
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(MotionError::FilterDegenerate {
                reason: "input contains non-finite values".to_string(),
                len: data.len(),
            });
        }

        // Odd-symmetric extension at both edges keeps the forward-backward
        // passes from ringing at the window boundaries.
        let first = data[0];
        let last = data[data.len() - 1];
        let mut ext = Vec::with_capacity(data.len() + 2 * padlen);
        for i in (1..=padlen).rev() {
            ext.push(2.0 * first - data[i]);
        }
        ext.extend_from_slice(data);
        for i in 1..=padlen {
            ext.push(2.0 * last - data[data.len() - 1 - i]);
        }

        let forward = self.lfilter(&ext, ext[0]);

        let reversed: Vec<f64> = forward.into_iter().rev().collect();
        let backward = self.lfilter(&reversed, reversed[0]);

        let mut out: Vec<f64> = backward.into_iter().rev().collect();
        out.drain(..padlen);
        out.truncate(data.len());
        Ok(out)
    }

    /// Smoothed estimate of the most recent sample in the window.
    pub fn smoothed_last(&self, data: &[f64]) -> Result<f64> {
        let filtered = self.apply(data)?;
        // apply() guarantees a non-empty output for accepted inputs
        Ok(*filtered.last().unwrap_or(&0.0))
    }

    /// Single forward pass (direct form II transposed) with the steady-state
    /// initial conditions scaled to the given input level.
    fn lfilter(&self, x: &[f64], level: f64) -> Vec<f64> {
        let n = self.order;
        let mut z: Vec<f64> = self.zi.iter().map(|v| v * level).collect();
        let mut y = Vec::with_capacity(x.len());

        for &xm in x {
            let ym = self.b[0] * xm + z[0];
            for i in 0..n - 1 {
                z[i] = self.b[i + 1] * xm + z[i + 1] - self.a[i + 1] * ym;
            }
            z[n - 1] = self.b[n] * xm - self.a[n] * ym;
            y.push(ym);
        }
        y
    }
}

/// Design digital low-pass Butterworth coefficients via the bilinear
/// transform of the analog prototype.
fn design_lowpass(order: usize, cutoff: f64) -> (Vec<f64>, Vec<f64>) {
    use std::f64::consts::PI;

    // Analog prototype: poles evenly spaced on the left half of the unit
    // circle, unit gain, no zeros.
    let mut poles: Vec<Complex64> = (1..=order)
        .map(|k| {
            let theta = PI * (2 * k + order - 1) as f64 / (2 * order) as f64;
            Complex64::from_polar(1.0, theta)
        })
        .collect();

    // Prewarp the cutoff (sampling rate fixed at 2 so cutoff is already
    // normalized to Nyquist), then scale the prototype.
    let warped = 4.0 * (PI * cutoff / 2.0).tan();
    for p in poles.iter_mut() {
        *p *= warped;
    }
    let gain = warped.powi(order as i32);

    // Bilinear transform: s -> 2*fs*(z-1)/(z+1), fs = 2.
    let fs2 = Complex64::new(4.0, 0.0);
    let digital_poles: Vec<Complex64> = poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();

    let denom: Complex64 = poles
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (fs2 - p));
    let digital_gain = gain * (Complex64::new(1.0, 0.0) / denom).re;

    // All digital zeros sit at z = -1.
    let zeros = vec![Complex64::new(-1.0, 0.0); order];
    let b: Vec<f64> = poly(&zeros).iter().map(|c| digital_gain * c.re).collect();
    let a: Vec<f64> = poly(&digital_poles).iter().map(|c| c.re).collect();

    (b, a)
}

/// Expand a monic polynomial from its roots.
fn poly(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coeffs = vec![Complex64::new(1.0, 0.0)];
    for &r in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coeffs.len() + 1];
        for (i, &c) in coeffs.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * r;
        }
        coeffs = next;
    }
    coeffs
}

/// Steady-state filter state for a unit step input.
///
/// Solves `(I - C^T) zi = B` where `C` is the companion matrix of `a` and
/// `B[i] = b[i+1] - a[i+1] * b[0]`. Seeding each pass with this state scaled
/// to the first sample removes the startup transient.
fn steady_state(b: &[f64], a: &[f64]) -> Result<Vec<f64>> {
    let n = a.len() - 1;

    let mut companion = vec![vec![0.0; n]; n];
    for j in 0..n {
        companion[0][j] = -a[j + 1] / a[0];
    }
    for (i, row) in companion.iter_mut().enumerate().skip(1) {
        row[i - 1] = 1.0;
    }

    let mut m = vec![vec![0.0; n]; n];
    for i in 0..n {
        for j in 0..n {
            m[i][j] = if i == j { 1.0 } else { 0.0 };
            m[i][j] -= companion[j][i];
        }
    }

    let rhs: Vec<f64> = (0..n).map(|i| b[i + 1] - a[i + 1] * b[0]).collect();
    solve_linear(m, rhs)
}

/// Gaussian elimination with partial pivoting.
fn solve_linear(mut m: Vec<Vec<f64>>, mut rhs: Vec<f64>) -> Result<Vec<f64>> {
    let n = rhs.len();

    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&r1, &r2| {
                m[r1][col]
                    .abs()
                    .partial_cmp(&m[r2][col].abs())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .unwrap_or(col);
        m.swap(col, pivot);
        rhs.swap(col, pivot);

        if m[col][col].abs() < 1e-12 {
            return Err(MotionError::InvalidConfig(
                "filter design is numerically singular".to_string(),
            ));
        }

        for row in col + 1..n {
            let factor = m[row][col] / m[col][col];
            for c in col..n {
                m[row][c] -= factor * m[col][c];
            }
            rhs[row] -= factor * rhs[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = rhs[row];
        for c in row + 1..n {
            sum -= m[row][c] * x[c];
        }
        x[row] = sum / m[row][row];
    }
    Ok(x)
}
