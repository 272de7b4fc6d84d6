//! Operator representations over [`Basis`] grids, composable without ever
//! materializing a dense matrix.
//!
//! [`Operator`] is a closed expression tree. Leaves are [`Diagonal`]
//! (multiplication by a real-valued grid sample) and [`Transform`] (the
//! unitary FFT map between a conjugate basis pair); interior nodes are
//! deferred sums and products whose evaluation is driven entirely by
//! [`Operator::apply`]. Applying the pseudo-spectral kinetic operator
//! `F⁻¹ · (k²/2) · F` therefore costs two FFTs and one element-wise
//! multiplication, *O*(*N* log *N*) overall.

use ndarray as nd;
use num_complex::Complex64 as C64;
use crate::{
    Arr1,
    basis::{ Basis, BasisKind },
    error::{ BasisError, OperatorError },
    utils::{ fft_unitary_inplace, ifft_unitary_inplace },
};

pub type OpResult<T> = Result<T, OperatorError>;

/// Multiplication by a real-valued function sampled on a basis grid.
///
/// Multipliers are kept real, so every diagonal operator is Hermitian by
/// construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagonal {
    basis: Basis,
    elems: nd::Array1<f64>,
}

impl Diagonal {
    /// Create a diagonal operator from explicit multipliers.
    ///
    /// Fails if the multiplier count does not match the basis size.
    pub fn new(basis: Basis, elems: nd::Array1<f64>) -> OpResult<Self> {
        OperatorError::check_dim(basis.len(), elems.len())?;
        Ok(Self { basis, elems })
    }

    /// Sample a pure function at each basis point.
    pub fn sampled<F>(basis: &Basis, f: F) -> Self
    where F: Fn(f64) -> f64
    {
        let elems = basis.points().mapv(f);
        Self { basis: basis.clone(), elems }
    }

    pub fn basis(&self) -> &Basis { &self.basis }

    pub fn elems(&self) -> &nd::Array1<f64> { &self.elems }

    /// Multiply all multipliers by a constant.
    pub fn scaled(&self, c: f64) -> Self {
        Self { basis: self.basis.clone(), elems: self.elems.mapv(|e| c * e) }
    }

    /// Raise all multipliers to an integer power.
    pub fn powi(&self, k: i32) -> Self {
        Self {
            basis: self.basis.clone(),
            elems: self.elems.mapv(|e| e.powi(k)),
        }
    }

    /// Transform all multipliers element-wise.
    pub fn mapped<F>(&self, f: F) -> Self
    where F: Fn(f64) -> f64
    {
        Self { basis: self.basis.clone(), elems: self.elems.mapv(f) }
    }

    /// Element-wise sum with another diagonal operator.
    ///
    /// Fails unless both are defined on an identical basis.
    pub fn checked_add(&self, other: &Self) -> OpResult<Self> {
        if self.basis != other.basis {
            return Err(OperatorError::IncompatibleBasis);
        }
        Ok(Self {
            basis: self.basis.clone(),
            elems: &self.elems + &other.elems,
        })
    }

    /// Apply to a state vector, returning a fresh result.
    pub fn apply<S>(&self, q: &Arr1<S>) -> OpResult<nd::Array1<C64>>
    where S: nd::Data<Elem = C64>
    {
        OperatorError::check_dim(self.basis.len(), q.len())?;
        Ok(nd::Zip::from(&self.elems).and(q).map_collect(|ek, qk| ek * qk))
    }
}

/// The unitary FFT-based map between a conjugate position/momentum pair.
///
/// Both directions carry symmetric `1/√n` normalization, so a transform
/// composed with its inverse is the identity to floating-point tolerance and
/// the discrete L2 norm is preserved.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    from: Basis,
    to: Basis,
}

impl Transform {
    /// Create the transform taking states indexed by `from` to states indexed
    /// by `to`.
    ///
    /// Fails unless the two bases form a conjugate pair of equal size.
    pub fn new(from: &Basis, to: &Basis) -> Result<Self, BasisError> {
        if !from.conjugate_pair(to) {
            return Err(BasisError::Incompatible);
        }
        Ok(Self { from: from.clone(), to: to.clone() })
    }

    pub fn from_basis(&self) -> &Basis { &self.from }

    pub fn to_basis(&self) -> &Basis { &self.to }

    /// The transform in the opposite direction.
    pub fn inverse(&self) -> Self {
        Self { from: self.to.clone(), to: self.from.clone() }
    }

    /// Apply to a state vector, returning a fresh result.
    pub fn apply<S>(&self, q: &Arr1<S>) -> OpResult<nd::Array1<C64>>
    where S: nd::Data<Elem = C64>
    {
        OperatorError::check_dim(self.from.len(), q.len())?;
        let mut out = q.to_owned();
        match self.from.kind() {
            BasisKind::Position => fft_unitary_inplace(&mut out),
            BasisKind::Momentum => ifft_unitary_inplace(&mut out),
        }
        Ok(out)
    }
}

/// A non-empty deferred sum of operators sharing input and output bases.
///
/// The payload is private: [`Operator::sum`] is the only way to build one,
/// so the basis invariants always hold.
#[derive(Clone, Debug, PartialEq)]
pub struct DeferredSum {
    terms: Vec<Operator>,
}

impl DeferredSum {
    /// The summands.
    pub fn terms(&self) -> &[Operator] { &self.terms }
}

/// A non-empty deferred product of operators with stage-compatible bases,
/// applied right to left.
///
/// The payload is private: [`Operator::product`] is the only way to build
/// one, so the basis invariants always hold.
#[derive(Clone, Debug, PartialEq)]
pub struct DeferredProduct {
    factors: Vec<Operator>,
}

impl DeferredProduct {
    /// The factors, leftmost (applied last) first.
    pub fn factors(&self) -> &[Operator] { &self.factors }
}

/// A linear operator between basis grids, evaluated lazily.
///
/// Composite variants never materialize a matrix; their action is defined
/// recursively by [`Self::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum Operator {
    /// Multiplication by a real-valued grid sample.
    Diagonal(Diagonal),
    /// Unitary map between a conjugate position/momentum pair.
    Transform(Transform),
    /// Deferred sum; all summands share input and output bases.
    Sum(DeferredSum),
    /// Deferred product, applied right to left; adjacent stages have
    /// compatible bases.
    Product(DeferredProduct),
}

impl From<Diagonal> for Operator {
    fn from(d: Diagonal) -> Self { Self::Diagonal(d) }
}

impl From<Transform> for Operator {
    fn from(t: Transform) -> Self { Self::Transform(t) }
}

impl Operator {
    /// Sample a potential function over a basis grid as a diagonal operator.
    ///
    /// `v` must be pure and defined over the whole basis range.
    pub fn potential<F>(basis: &Basis, v: F) -> Self
    where F: Fn(f64) -> f64
    {
        Diagonal::sampled(basis, v).into()
    }

    /// The momentum operator, diagonal in a momentum basis.
    ///
    /// Fails on a position basis.
    pub fn momentum(basis: &Basis) -> OpResult<Self> {
        if basis.kind() != BasisKind::Momentum {
            return Err(BasisError::InvalidKind("momentum").into());
        }
        Ok(Diagonal::sampled(basis, |k| k).into())
    }

    /// The position operator, diagonal in a position basis.
    ///
    /// Fails on a momentum basis.
    pub fn position(basis: &Basis) -> OpResult<Self> {
        if basis.kind() != BasisKind::Position {
            return Err(BasisError::InvalidKind("position").into());
        }
        Ok(Diagonal::sampled(basis, |x| x).into())
    }

    /// The transform operator taking states from basis `a` to basis `b`.
    ///
    /// Fails unless `(a, b)` is a conjugate pair of equal size.
    pub fn transform(a: &Basis, b: &Basis) -> Result<Self, BasisError> {
        Transform::new(a, b).map(Self::Transform)
    }

    /// Build a deferred sum.
    ///
    /// Fails if `terms` is empty or the summands do not all share input and
    /// output bases.
    pub fn sum(terms: Vec<Operator>) -> OpResult<Self> {
        let Some((first, rest)) = terms.split_first() else {
            return Err(OperatorError::EmptyComposite);
        };
        let ok = rest.iter()
            .all(|term| {
                term.basis_in() == first.basis_in()
                    && term.basis_out() == first.basis_out()
            });
        ok.then_some(Self::Sum(DeferredSum { terms }))
            .ok_or(OperatorError::IncompatibleBasis)
    }

    /// Build a deferred product; `factors` are applied right to left, so the
    /// last factor acts first.
    ///
    /// Fails if `factors` is empty or any stage's output basis does not match
    /// the next stage's input basis.
    pub fn product(factors: Vec<Operator>) -> OpResult<Self> {
        if factors.is_empty() {
            return Err(OperatorError::EmptyComposite);
        }
        let ok = factors.iter().zip(factors.iter().skip(1))
            .all(|(left, right)| right.basis_out() == left.basis_in());
        ok.then_some(Self::Product(DeferredProduct { factors }))
            .ok_or(OperatorError::IncompatibleBasis)
    }

    /// The pseudo-spectral kinetic operator `F⁻¹ · (k²/2) · F` over a
    /// position basis (`ħ = m = 1`).
    pub fn kinetic(position: &Basis) -> OpResult<Self> {
        let momentum = Basis::momentum_of(position)?;
        let fwd = Transform::new(position, &momentum)?;
        let inv = fwd.inverse();
        let ksq: Self
            = Diagonal::sampled(&momentum, |k| k.powi(2) / 2.0).into();
        Self::product(vec![inv.into(), ksq, fwd.into()])
    }

    /// The full Hamiltonian `F⁻¹ · (k²/2) · F + V(x)` over a position basis,
    /// as a deferred sum.
    pub fn hamiltonian<F>(position: &Basis, v: F) -> OpResult<Self>
    where F: Fn(f64) -> f64
    {
        Self::sum(vec![Self::kinetic(position)?, Self::potential(position, v)])
    }

    /// The basis indexing states this operator accepts.
    pub fn basis_in(&self) -> &Basis {
        match self {
            Self::Diagonal(d) => d.basis(),
            Self::Transform(t) => t.from_basis(),
            // composite payloads are sealed, so non-emptiness and basis
            // agreement are guaranteed by the constructors
            Self::Sum(s) => s.terms[0].basis_in(),
            Self::Product(p) => {
                p.factors[p.factors.len() - 1].basis_in()
            },
        }
    }

    /// The basis indexing states this operator produces.
    pub fn basis_out(&self) -> &Basis {
        match self {
            Self::Diagonal(d) => d.basis(),
            Self::Transform(t) => t.to_basis(),
            Self::Sum(s) => s.terms[0].basis_out(),
            Self::Product(p) => p.factors[0].basis_out(),
        }
    }

    /// Input dimension.
    pub fn dim(&self) -> usize { self.basis_in().len() }

    /// Apply to a state vector, returning a fresh result; `q` is never
    /// mutated.
    ///
    /// Evaluation recurses on the expression tree: diagonals multiply
    /// element-wise, transforms run one FFT, products fold right to left
    /// through their stages, and sums apply every summand to the same input
    /// and accumulate. No dense matrix is ever formed.
    pub fn apply<S>(&self, q: &Arr1<S>) -> OpResult<nd::Array1<C64>>
    where S: nd::Data<Elem = C64>
    {
        match self {
            Self::Diagonal(d) => d.apply(q),
            Self::Transform(t) => t.apply(q),
            Self::Sum(s) => {
                let (first, rest) = s.terms.split_first()
                    .ok_or(OperatorError::EmptyComposite)?;
                let mut acc = first.apply(q)?;
                for term in rest {
                    acc += &term.apply(q)?;
                }
                Ok(acc)
            },
            Self::Product(p) => {
                let mut qk = q.to_owned();
                for factor in p.factors.iter().rev() {
                    qk = factor.apply(&qk)?;
                }
                Ok(qk)
            },
        }
    }
}
