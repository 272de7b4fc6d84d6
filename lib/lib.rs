#![allow(dead_code, non_snake_case)]

//! Provides constructs for simulation of the one-dimensional, time-dependent
//! Schrödinger equation in a truncated position/momentum basis, built around
//! operators that are composed lazily: sums and products of operators defer
//! their evaluation to the moment they act on a state vector, so a
//! pseudo-spectral Hamiltonian can be applied in *O*(*N* log *N*) time without
//! a dense matrix ever being formed.
//!
//! Main pieces:
//! - [`basis`]: conjugate position/momentum grids related by FFT duality
//! - [`operator`]: diagonal, transform, and deferred sum/product operators
//!   with a recursive `apply`
//! - [`state`]: Gaussian wave packets and state measurements
//! - [`evolve`]: adaptive fourth-order Runge-Kutta time evolution driven only
//!   by the Hamiltonian's action on state vectors
//!
//! See [`docs`] for theoretical background.

pub mod error;
pub mod basis;
pub mod operator;
pub mod state;
pub mod evolve;
pub mod utils;

pub mod docs;

pub(crate) const DEF_EPSILON: f64 = 1e-6;
pub(crate) const DEF_MINSTEP: f64 = 1e-12;
pub(crate) const DEF_NORMDRIFT: f64 = 1e-2;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
pub type Arr2<S> = ndarray::ArrayBase<S, ndarray::Ix2>;
