//! FFT plumbing and small numerical helpers.

use ndarray::{ self as nd, Ix1, concatenate };
use num_complex::Complex64 as C64;
use num_traits::Float;
use rustfft as fft;

/// Integrate using the trapezoidal rule.
///
/// *Panics if `y` has length less than 2*.
pub fn trapz<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Float + 'static,
{
    let n: usize = y.len();
    let two = A::one() + A::one();
    (dx / two) * (y[0] + two * y.slice(nd::s![1..n - 1]).sum() + y[n - 1])
}

/// Generate the grid of angular frequencies (wavenumbers) accompanying an
/// `n`-point FFT with conjugate-space spacing `dk`.
///
/// Points are in FFT storage order: non-negative frequencies ascending from
/// zero, then negative frequencies ascending toward zero.
pub fn fft_wavenumbers(n: usize, dk: f64) -> nd::Array1<f64> {
    let m = if n % 2 == 0 { n / 2 } else { (n + 1) / 2 };
    let kp: nd::Array1<f64>
        = (0..m)
        .map(|j| j as f64 * dk)
        .collect();
    let km: nd::Array1<f64>
        = (1..n - m + 1).rev()
        .map(|j| -(j as f64) * dk)
        .collect();
    concatenate!(nd::Axis(0), kp, km)
}

/// Perform the one-dimensional, complex-valued FFT in place, unnormalized.
pub fn fft_inplace<S>(f: &mut nd::ArrayBase<S, Ix1>)
where S: nd::DataMut<Elem = C64>
{
    let n: usize = f.len();
    let mut plan = fft::FftPlanner::new();
    let fft_plan = plan.plan_fft_forward(n);
    fft_plan.process(f.as_slice_mut().unwrap());
}

/// Perform the one-dimensional, complex-valued inverse FFT in place,
/// unnormalized.
pub fn ifft_inplace<S>(x: &mut nd::ArrayBase<S, Ix1>)
where S: nd::DataMut<Elem = C64>
{
    let n: usize = x.len();
    let mut plan = fft::FftPlanner::new();
    let ifft_plan = plan.plan_fft_inverse(n);
    ifft_plan.process(x.as_slice_mut().unwrap());
}

/// Perform the one-dimensional FFT in place with symmetric `1/√n`
/// normalization, making it unitary on the discrete L2 inner product.
pub fn fft_unitary_inplace<S>(f: &mut nd::ArrayBase<S, Ix1>)
where S: nd::DataMut<Elem = C64>
{
    let s = (f.len() as f64).sqrt().recip();
    fft_inplace(f);
    f.map_inplace(|fk| { *fk *= s; });
}

/// Perform the one-dimensional inverse FFT in place with symmetric `1/√n`
/// normalization; inverse of [`fft_unitary_inplace`].
pub fn ifft_unitary_inplace<S>(x: &mut nd::ArrayBase<S, Ix1>)
where S: nd::DataMut<Elem = C64>
{
    let s = (x.len() as f64).sqrt().recip();
    ifft_inplace(x);
    x.map_inplace(|xk| { *xk *= s; });
}
