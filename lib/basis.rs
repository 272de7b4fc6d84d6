//! Discretized position- and momentum-space bases related by FFT duality.
//!
//! A position basis on `[min, max)` with `n` points fixes its conjugate
//! momentum basis completely: the momentum grid is the FFT wavenumber grid
//! with spacing `dk = 2π/(max - min)`, so that `dx · dk · n = 2π` always
//! holds for a conjugate pair.

use std::f64::consts::TAU;
use ndarray as nd;
use crate::{ error::BasisError, utils::fft_wavenumbers };

pub type BResult<T> = Result<T, BasisError>;

/// Which conjugate space a [`Basis`] discretizes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BasisKind {
    Position,
    Momentum,
}

impl BasisKind {
    /// Return the other member of the conjugate pair.
    pub fn conjugate(self) -> Self {
        match self {
            Self::Position => Self::Momentum,
            Self::Momentum => Self::Position,
        }
    }
}

/// An immutable, uniformly discretized coordinate space.
///
/// Position grids run `x[j] = min + j δx`, `j ∊ {0, ..., n - 1}` with
/// `δx = (max - min) / n` (periodic FFT convention; the right endpoint is
/// excluded). Momentum grids hold the same number of points but are stored in
/// FFT order: non-negative wavenumbers ascending from zero, then negative
/// wavenumbers.
#[derive(Clone, Debug, PartialEq)]
pub struct Basis {
    kind: BasisKind,
    min: f64,
    max: f64,
    n: usize,
}

impl Basis {
    /// Create a position basis on `[min, max)` with `n` points.
    ///
    /// Fails if `max <= min` or `n < 2`; a one-point grid is degenerate and
    /// is rejected rather than silently accepted.
    pub fn position(min: f64, max: f64, n: usize) -> BResult<Self> {
        BasisError::check_range(min, max, n)?;
        Ok(Self { kind: BasisKind::Position, min, max, n })
    }

    /// Derive the conjugate momentum basis of a position basis.
    ///
    /// The result is fully determined by FFT duality: `n` points with spacing
    /// `2π/(max - min)`, bounded by the Nyquist wavenumber `±π/δx`.
    pub fn momentum_of(position: &Self) -> BResult<Self> {
        if position.kind != BasisKind::Position {
            return Err(BasisError::InvalidKind("position"));
        }
        let kmax = std::f64::consts::PI / position.spacing();
        Ok(Self {
            kind: BasisKind::Momentum,
            min: -kmax,
            max: kmax,
            n: position.n,
        })
    }

    pub fn kind(&self) -> BasisKind { self.kind }

    pub fn min(&self) -> f64 { self.min }

    pub fn max(&self) -> f64 { self.max }

    /// Number of grid points.
    pub fn len(&self) -> usize { self.n }

    pub fn is_empty(&self) -> bool { self.n == 0 }

    /// Grid spacing `(max - min) / n`.
    pub fn spacing(&self) -> f64 { (self.max - self.min) / self.n as f64 }

    /// Sample points, in storage order.
    ///
    /// Position points are ascending; momentum points are in FFT order.
    pub fn points(&self) -> nd::Array1<f64> {
        match self.kind {
            BasisKind::Position => {
                let dx = self.spacing();
                (0..self.n).map(|j| self.min + j as f64 * dx).collect()
            },
            BasisKind::Momentum => fft_wavenumbers(self.n, self.spacing()),
        }
    }

    /// Return `true` if `self` and `other` form a conjugate
    /// position/momentum pair: opposite kinds, equal point count, and
    /// `δx · δk · n = 2π` to relative tolerance.
    pub fn conjugate_pair(&self, other: &Self) -> bool {
        self.kind == other.kind.conjugate()
            && self.n == other.n
            && (self.spacing() * other.spacing() * self.n as f64 - TAU).abs()
                < 1e-9 * TAU
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_ranges_rejected() {
        assert!(matches!(
            Basis::position(1.0, 1.0, 100),
            Err(BasisError::InvalidRange(..)),
        ));
        assert!(matches!(
            Basis::position(1.0, -1.0, 100),
            Err(BasisError::InvalidRange(..)),
        ));
        assert!(matches!(
            Basis::position(-1.0, 1.0, 1),
            Err(BasisError::InvalidRange(..)),
        ));
        assert!(matches!(
            Basis::position(-1.0, 1.0, 0),
            Err(BasisError::InvalidRange(..)),
        ));
    }

    #[test]
    fn duality_invariant() {
        let xb = Basis::position(-30.0, 30.0, 200).unwrap();
        let kb = Basis::momentum_of(&xb).unwrap();
        assert_eq!(xb.len(), kb.len());
        let product = xb.spacing() * kb.spacing() * xb.len() as f64;
        assert!((product - TAU).abs() < 1e-12);
        assert!(xb.conjugate_pair(&kb));
        assert!(kb.conjugate_pair(&xb));
    }

    #[test]
    fn momentum_of_momentum_rejected() {
        let xb = Basis::position(-5.0, 5.0, 64).unwrap();
        let kb = Basis::momentum_of(&xb).unwrap();
        assert!(matches!(
            Basis::momentum_of(&kb),
            Err(BasisError::InvalidKind(_)),
        ));
    }

    #[test]
    fn non_conjugate_pairs_detected() {
        let xb = Basis::position(-5.0, 5.0, 64).unwrap();
        let xb2 = Basis::position(-5.0, 5.0, 128).unwrap();
        let kb2 = Basis::momentum_of(&xb2).unwrap();
        assert!(!xb.conjugate_pair(&xb2));
        assert!(!xb.conjugate_pair(&kb2));
    }

    #[test]
    fn momentum_points_fft_order() {
        let xb = Basis::position(0.0, TAU, 8).unwrap();
        let kb = Basis::momentum_of(&xb).unwrap();
        // dx = 2π/8, dk = 1
        let k = kb.points();
        assert_eq!(k, nd::array![0.0, 1.0, 2.0, 3.0, -4.0, -3.0, -2.0, -1.0]);
    }
}
