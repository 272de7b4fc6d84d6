//! Time evolution of state vectors under a lazily-composed Hamiltonian.
//!
//! The integrator advances the time-dependent Schrödinger equation
//! ```text
//! dq
//! -- = -i H q
//! dt
//! ```
//! with fourth-order Runge-Kutta and adaptive stepsize (step doubling). The
//! Hamiltonian is accessed *only* through [`Operator::apply`], so any lazy
//! composite works and no matrix is ever formed. Requested sample times are
//! hit exactly by restricting the step, never by interpolation.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    DEF_EPSILON,
    DEF_MINSTEP,
    DEF_NORMDRIFT,
    error::{ EvolveError, OperatorError },
    operator::Operator,
    state,
};

pub type EResult<T> = Result<T, EvolveError>;

/// Sampled history of a time evolution: one state vector per requested
/// sample time. Immutable once returned.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    t: nd::Array1<f64>,
    q: nd::Array2<C64>,
}

impl Trajectory {
    /// Number of sampled times.
    pub fn len(&self) -> usize { self.t.len() }

    pub fn is_empty(&self) -> bool { self.t.is_empty() }

    /// Sample times.
    pub fn times(&self) -> &nd::Array1<f64> { &self.t }

    /// All sampled states; the first axis indexes time.
    pub fn states(&self) -> &nd::Array2<C64> { &self.q }

    /// The state sampled at `times()[i]`.
    pub fn state(&self, i: usize) -> Option<nd::ArrayView1<C64>> {
        (i < self.t.len()).then(|| self.q.slice(nd::s![i, ..]))
    }

    /// The state at the last sample time.
    pub fn final_state(&self) -> nd::ArrayView1<C64> {
        self.q.slice(nd::s![self.t.len() - 1, ..])
    }

    /// Iterate over `(time, state)` pairs.
    pub fn iter(&self)
        -> impl Iterator<Item = (f64, nd::ArrayView1<C64>)> + '_
    {
        self.t.iter().copied().zip(self.q.axis_iter(nd::Axis(0)))
    }
}

// estimate the ratio between truncation errors at different step sizes for a
// fourth-order Runge-Kutta scheme
fn error_ratio(z: C64, w: C64, err: f64) -> f64 {
    let scale: f64 = err * (z.norm() + w.norm()) / 2.0;
    let diff: f64 = (z - w).norm();
    diff / (scale + f64::EPSILON)
}

// estimate the ratio between truncation errors at different step sizes for a
// fourth-order Runge-Kutta scheme with array values
fn error_ratio_arr<S, T>(z: &Arr1<S>, w: &Arr1<T>, err: f64) -> f64
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
{
    z.iter().zip(w)
        .map(|(zk, wk)| error_ratio(*zk, *wk, err))
        .max_by(|l, r| {
            match l.partial_cmp(r) {
                Some(ord) => ord,
                None => std::cmp::Ordering::Less,
            }
        })
        .unwrap_or(0.0)
}

// perform the operation `a + v * b` succinctly
fn array_step<S, T>(a: &Arr1<S>, v: f64, b: &Arr1<T>) -> nd::Array1<C64>
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = C64>,
{
    nd::Zip::from(a).and(b)
        .map_collect(|ak, bk| ak + v * bk)
}

// return an array of differences between adjacent elements of a source array
fn array_diff<S, A>(a: &Arr1<S>) -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: std::ops::Sub<A, Output = A> + Copy,
{
    a.iter().zip(a.iter().skip(1))
        .map(|(ak, akp1)| *akp1 - *ak)
        .collect()
}

// evaluate the right-hand side of the TDSE, i.e. the action of the
// Hamiltonian on the state `q` with an added factor of `-i`
fn rhs<S>(H: &Operator, q: &Arr1<S>) -> Result<nd::Array1<C64>, OperatorError>
where S: nd::Data<Elem = C64>
{
    let mut dq = H.apply(q)?;
    dq.map_inplace(|dqk| { *dqk *= -C64::i(); });
    Ok(dq)
}

// take a single RK4 step *in place*
fn rk4_step(H: &Operator, q: &mut nd::Array1<C64>, dt: f64)
    -> Result<(), OperatorError>
{
    let k1 = rhs(H, q)?;
    let k2 = rhs(H, &array_step(q, dt / 2.0, &k1))?;
    let k3 = rhs(H, &array_step(q, dt / 2.0, &k2))?;
    let k4 = rhs(H, &array_step(q, dt, &k3))?;
    nd::Zip::from(q).and(&k1).and(&k2).and(&k3).and(&k4)
        .for_each(|qk, k1k, k2k, k3k, k4k| {
            *qk += dt / 6.0 * (k1k + 2.0 * (k2k + k3k) + k4k);
        });
    Ok(())
}

// take a single adaptive RK4 step *in place*, comparing two half-sized steps
// against one full-sized step; returns the size of the step actually taken
// along with an estimate for the next one
fn rka_step(
    H: &Operator,
    q: &mut nd::Array1<C64>,
    t: f64,
    dt0: f64,
    epsilon: f64,
    dt_min: f64,
) -> EResult<(f64, f64)> {
    // safety numbers -- particular to rk4
    const SAFE1: f64 = 0.9;
    const SAFE2: f64 = 4.0;

    let mut dt = dt0;
    let mut q_half: nd::Array1<C64>;
    let mut q_full: nd::Array1<C64>;
    let mut er: f64;
    let mut dt_new: f64;
    for _ in 0_usize..100 {
        q_half = q.to_owned();
        q_full = q.to_owned();

        // two half-sized steps against one full-sized step
        rk4_step(H, &mut q_half, dt / 2.0)?;
        rk4_step(H, &mut q_half, dt / 2.0)?;
        rk4_step(H, &mut q_full, dt)?;

        er = error_ratio_arr(&q_half, &q_full, epsilon);

        // estimate new step size (with safety factors)
        if er == 0.0 {
            q_half.move_into(q);
            return Ok((dt, dt * SAFE2));
        }
        dt_new = (dt * er.powf(-0.2) * SAFE1)
            .clamp(dt / SAFE2, dt * SAFE2);
        if er < 1.0 {
            q_half.move_into(q);
            return Ok((dt, dt_new));
        }
        dt = dt_new;
        if dt < dt_min {
            break;
        }
    }
    Err(EvolveError::StepSizeUnderflow(t))
}

/// Like [`evolve`], but with an explicit local error tolerance.
pub fn evolve_with<S, T>(
    t: &Arr1<T>,
    q0: &Arr1<S>,
    H: &Operator,
    epsilon: f64,
) -> EResult<Trajectory>
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = f64>,
{
    EvolveError::check_epsilon(epsilon)?;
    let nt = t.len();
    if nt < 2 {
        return Err(EvolveError::TooFewTimes(nt));
    }
    let dt = array_diff(t);
    if dt.iter().any(|&dtk| dtk <= 0.0) {
        return Err(EvolveError::NonMonotonicTimes);
    }
    let n = H.dim();
    OperatorError::check_dim(n, q0.len()).map_err(EvolveError::Operator)?;

    let span = t[nt - 1] - t[0];
    let dt_min = DEF_MINSTEP * span;
    let norm0 = state::norm(q0);

    let mut q: nd::Array2<C64> = nd::Array2::zeros((nt, n));
    q.slice_mut(nd::s![0, ..]).assign(q0);
    let mut q_temp: nd::Array1<C64> = q0.to_owned();
    let mut t_cur = t[0];
    let mut dt_next = dt[0] / 10.0;
    let iter = t.iter().copied().zip(q.axis_iter_mut(nd::Axis(0))).skip(1);
    for (tk, qk) in iter {
        while t_cur < tk {
            // land exactly on the sample time by clamping the step
            let dt_try = dt_next.min(tk - t_cur);
            let (dt_taken, dt_est)
                = rka_step(H, &mut q_temp, t_cur, dt_try, epsilon, dt_min)?;
            t_cur += dt_taken;
            dt_next = dt_est;
        }
        t_cur = tk;
        let drift = (state::norm(&q_temp) - norm0).abs() / norm0;
        if drift > DEF_NORMDRIFT {
            return Err(EvolveError::NonHermitian(drift, tk));
        }
        q_temp.clone().move_into(qk);
    }
    Ok(Trajectory { t: t.to_owned(), q })
}

/// Evolve `q0` over the sample times `t` under the Hamiltonian `H`,
/// returning one state per sample time.
///
/// `t` must be strictly increasing and hold at least 2 elements; `t[0]` is
/// the initial time, with `q0` copied in as the first sampled state. `H` is
/// accessed only through its lazy [`apply`][Operator::apply]. Integration is
/// adaptive fourth-order Runge-Kutta; each sample time is reached exactly by
/// step restriction. The state norm is checked at every sample time and a
/// drift beyond tolerance is reported as [`EvolveError::NonHermitian`]; no
/// renormalization is performed.
pub fn evolve<S, T>(t: &Arr1<T>, q0: &Arr1<S>, H: &Operator)
    -> EResult<Trajectory>
where
    S: nd::Data<Elem = C64>,
    T: nd::Data<Elem = f64>,
{
    evolve_with(t, q0, H, DEF_EPSILON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ basis::Basis, state };

    fn free_packet() -> (Basis, nd::Array1<C64>, Operator) {
        let xb = Basis::position(-20.0, 20.0, 128).unwrap();
        let q0 = state::gaussian(&xb, 0.0, 0.5, 2.0).unwrap();
        let H = Operator::hamiltonian(&xb, |_| 0.0).unwrap();
        (xb, q0, H)
    }

    #[test]
    fn input_validation() {
        let (_, q0, H) = free_packet();
        let t_bad: nd::Array1<f64> = nd::array![0.0, 2.0, 1.0];
        assert!(matches!(
            evolve(&t_bad, &q0, &H),
            Err(EvolveError::NonMonotonicTimes),
        ));
        let t_short: nd::Array1<f64> = nd::array![0.0];
        assert!(matches!(
            evolve(&t_short, &q0, &H),
            Err(EvolveError::TooFewTimes(1)),
        ));
        let t: nd::Array1<f64> = nd::Array1::linspace(0.0, 1.0, 5);
        assert!(matches!(
            evolve_with(&t, &q0, &H, -1.0),
            Err(EvolveError::BadEpsilon(_)),
        ));
        let q_bad: nd::Array1<C64> = nd::Array1::zeros(64);
        assert!(matches!(
            evolve(&t, &q_bad, &H),
            Err(EvolveError::Operator(OperatorError::DimensionMismatch(..))),
        ));
    }

    #[test]
    fn trajectory_shape_and_initial_state() {
        let (_, q0, H) = free_packet();
        let t: nd::Array1<f64> = nd::Array1::linspace(0.0, 0.5, 6);
        let traj = evolve(&t, &q0, &H).unwrap();
        assert_eq!(traj.len(), 6);
        assert_eq!(traj.times(), &t);
        assert_eq!(traj.states().dim(), (6, 128));
        let first = traj.state(0).unwrap();
        assert!(
            first.iter().zip(&q0).all(|(a, b)| (a - b).norm() < 1e-15)
        );
        assert!(traj.state(6).is_none());
    }

    #[test]
    fn norm_conserved_under_hermitian_hamiltonian() {
        let xb = Basis::position(-20.0, 20.0, 128).unwrap();
        let q0 = state::gaussian(&xb, -5.0, 1.0, 1.5).unwrap();
        let H = Operator::hamiltonian(
            &xb, |x| 0.05 * x.powi(2)).unwrap();
        let t: nd::Array1<f64> = nd::Array1::linspace(0.0, 2.0, 11);
        let traj = evolve_with(&t, &q0, &H, 1e-7).unwrap();
        for (_, qk) in traj.iter() {
            assert!((state::norm(&qk) - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn free_packet_drifts_at_group_velocity() {
        let xb = Basis::position(-20.0, 20.0, 128).unwrap();
        let p0 = 1.0;
        let q0 = state::gaussian(&xb, -5.0, p0, 2.0).unwrap();
        let H = Operator::hamiltonian(&xb, |_| 0.0).unwrap();
        let t: nd::Array1<f64> = nd::Array1::linspace(0.0, 4.0, 5);
        let traj = evolve(&t, &q0, &H).unwrap();
        let x_op = Operator::position(&xb).unwrap();
        let x_final
            = state::expectation(&x_op, &traj.final_state()).unwrap();
        // ⟨x⟩(t) = x0 + p0 t for a free packet
        assert!((x_final.re - (-5.0 + p0 * 4.0)).abs() < 0.05);
    }
}
