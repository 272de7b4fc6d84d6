//! Construction and measurement of state vectors on basis grids.
//!
//! A state vector is a plain `Array1<C64>` of amplitudes indexed by a
//! [`Basis`]; it is owned by the caller and every function here is pure.
//! Normalization convention is the discrete L2 norm `√(Σ |q[j]|²) = 1`,
//! matching the unitary transform convention in [`operator`][crate::operator].

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    basis::{ Basis, BasisKind },
    error::{ OperatorError, StateError },
    operator::Operator,
    utils::trapz,
};

pub type SResult<T> = Result<T, StateError>;

/// Calculate the discrete L2 norm of a state vector.
pub fn norm<S>(q: &Arr1<S>) -> f64
where S: nd::Data<Elem = C64>
{
    q.iter().map(|qk| qk.norm_sqr()).sum::<f64>().sqrt()
}

/// Calculate the discrete inner product `⟨q|p⟩`.
pub fn dot<S, T>(q: &Arr1<S>, p: &Arr1<T>) -> C64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
{
    q.iter().zip(p).map(|(qk, pk)| qk.conj() * pk).sum()
}

/// Return an L2-normalized copy of a state vector.
pub fn normalized<S>(q: &Arr1<S>) -> nd::Array1<C64>
where S: nd::Data<Elem = C64>
{
    let n = norm(q);
    q.mapv(|qk| qk / n)
}

/// Construct an L2-normalized minimum-uncertainty Gaussian wave packet
/// centered at `x0` with mean momentum `p0` and position width `sigma0`.
///
/// ```text
/// q(x) ∝ exp(-(x - x0)² / 4 σ₀²) exp(i p0 x)
/// ```
///
/// Fails on a non-position basis or a non-positive width.
pub fn gaussian(basis: &Basis, x0: f64, p0: f64, sigma0: f64)
    -> SResult<nd::Array1<C64>>
{
    if basis.kind() != BasisKind::Position {
        return Err(StateError::NotPositionBasis);
    }
    if sigma0 <= 0.0 {
        return Err(StateError::BadWidth(sigma0));
    }
    let q: nd::Array1<C64>
        = basis.points().mapv(|x| {
            let envelope
                = (-(x - x0).powi(2) / (4.0 * sigma0.powi(2))).exp();
            C64::from_polar(envelope, p0 * x)
        });
    // a packet centered far off the grid underflows every sample to zero;
    // normalizing it would produce all-NaN amplitudes
    let n = norm(&q);
    if !(n > 0.0) {
        return Err(StateError::NoSupport);
    }
    Ok(q.mapv(|qk| qk / n))
}

/// Calculate the normalized expectation value `⟨q|A|q⟩ / ⟨q|q⟩`.
pub fn expectation<S>(op: &Operator, q: &Arr1<S>) -> SResult<C64>
where S: nd::Data<Elem = C64>
{
    let aq = op.apply(q)?;
    Ok(dot(q, &aq) / dot(q, q))
}

/// Calculate the fraction of a state's probability mass lying on grid points
/// with coordinate in `[a, b)`.
///
/// The window mass is normalized by the total, so the ratio is insensitive
/// to normalization convention. Position grids are ascending, so a window is
/// one contiguous block and is integrated with the trapezoidal rule; a
/// position window holding fewer than two grid points carries no resolvable
/// mass and gives `0.0`. Momentum grids are stored in FFT order, where a
/// window around zero gathers non-adjacent points, so momentum windows use
/// the rectangle rule instead.
pub fn prob_window<S>(basis: &Basis, q: &Arr1<S>, a: f64, b: f64)
    -> SResult<f64>
where S: nd::Data<Elem = C64>
{
    OperatorError::check_dim(basis.len(), q.len())
        .map_err(StateError::Operator)?;
    let density: nd::Array1<f64> = q.mapv(|qk| qk.norm_sqr());
    let dx = basis.spacing();
    let x = basis.points();
    match basis.kind() {
        BasisKind::Position => {
            let window_density: nd::Array1<f64>
                = x.iter().copied().zip(density.iter().copied())
                .filter(|(xj, _)| (a..b).contains(xj))
                .map(|(_, dj)| dj)
                .collect();
            if window_density.len() < 2 {
                return Ok(0.0);
            }
            Ok(trapz(&window_density, dx) / trapz(&density, dx))
        },
        BasisKind::Momentum => {
            let window: f64
                = x.iter().copied().zip(density.iter().copied())
                .filter(|(kj, _)| (a..b).contains(kj))
                .map(|(_, dj)| dj)
                .sum();
            Ok(window / density.sum())
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_basis() -> Basis { Basis::position(-20.0, 20.0, 256).unwrap() }

    #[test]
    fn gaussian_is_normalized() {
        let xb = test_basis();
        let q = gaussian(&xb, -3.0, 2.0, 1.5).unwrap();
        assert!((norm(&q) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn gaussian_rejects_bad_args() {
        let xb = test_basis();
        let kb = Basis::momentum_of(&xb).unwrap();
        assert!(matches!(
            gaussian(&kb, 0.0, 0.0, 1.0),
            Err(StateError::NotPositionBasis),
        ));
        assert!(matches!(
            gaussian(&xb, 0.0, 0.0, 0.0),
            Err(StateError::BadWidth(_)),
        ));
        assert!(matches!(
            gaussian(&xb, 0.0, 0.0, -1.0),
            Err(StateError::BadWidth(_)),
        ));
    }

    #[test]
    fn gaussian_off_grid_rejected() {
        // every envelope sample underflows to zero; normalizing would give
        // all-NaN amplitudes
        let xb = test_basis();
        assert!(matches!(
            gaussian(&xb, 1e6, 0.0, 1.0),
            Err(StateError::NoSupport),
        ));
        let q = gaussian(&xb, 0.0, 0.0, 1.0).unwrap();
        assert!(q.iter().all(|qk| qk.re.is_finite() && qk.im.is_finite()));
    }

    #[test]
    fn position_expectation_of_packet() {
        let xb = test_basis();
        let q = gaussian(&xb, -3.0, 0.0, 1.5).unwrap();
        let x_op = Operator::position(&xb).unwrap();
        let x_mean = expectation(&x_op, &q).unwrap();
        assert!((x_mean.re - (-3.0)).abs() < 1e-6);
        assert!(x_mean.im.abs() < 1e-10);
    }

    #[test]
    fn momentum_expectation_of_packet() {
        let xb = test_basis();
        let kb = Basis::momentum_of(&xb).unwrap();
        let q = gaussian(&xb, 0.0, 1.0, 2.0).unwrap();
        let fwd = Operator::transform(&xb, &kb).unwrap();
        let qk = fwd.apply(&q).unwrap();
        let k_op = Operator::momentum(&kb).unwrap();
        let k_mean = expectation(&k_op, &qk).unwrap();
        assert!((k_mean.re - 1.0).abs() < 1e-6);
    }

    #[test]
    fn packet_mass_concentrates_around_center() {
        let xb = test_basis();
        let q = gaussian(&xb, -3.0, 0.0, 1.0).unwrap();
        let near = prob_window(&xb, &q, -6.0, 0.0).unwrap();
        let far = prob_window(&xb, &q, 5.0, 20.0).unwrap();
        assert!(near > 0.99);
        assert!(far < 1e-8);
        let all = prob_window(&xb, &q, -20.0, 20.0).unwrap();
        assert!((all - 1.0).abs() < 1e-9);
    }

    #[test]
    fn momentum_window_spans_fft_order_wrap() {
        // a zero-momentum packet concentrates around k = 0, which sits at
        // both ends of the FFT-ordered grid; the window must still catch it
        let xb = test_basis();
        let kb = Basis::momentum_of(&xb).unwrap();
        let q = gaussian(&xb, 0.0, 0.0, 2.0).unwrap();
        let fwd = Operator::transform(&xb, &kb).unwrap();
        let qk = fwd.apply(&q).unwrap();
        // σ_k = 1/(2 σ0) = 0.25, so ±0.5 is a ±2σ window
        let near_zero = prob_window(&kb, &qk, -0.5, 0.5).unwrap();
        assert!(near_zero > 0.9, "mass near k = 0 is {near_zero}");
        let positive = prob_window(&kb, &qk, 0.0, 0.5).unwrap();
        let negative = prob_window(&kb, &qk, -0.5, 0.0).unwrap();
        assert!((positive + negative - near_zero).abs() < 1e-12);
        let all = prob_window(&kb, &qk, kb.min(), kb.max()).unwrap();
        assert!((all - 1.0).abs() < 1e-12);
    }
}
