//! Theoretical background.
//!
//! # Contents
//! - [Background](#background)
//! - [Conjugate bases](#conjugate-bases)
//! - [Lazy composite operators](#lazy-composite-operators)
//! - [Time evolution](#time-evolution)
//!
//! # Background
//! The time-dependent Schrödinger equation (TDSE) for a single particle in a
//! conservative potential reads, in natural units (*ħ* = *m* = 1),
//! ```text
//!   ∂ψ        1 ∂²ψ
//! i -- = H ψ = - --- + V(x) ψ
//!   ∂t        2 ∂x²
//! ```
//! On a truncated grid the second derivative is awkward to apply accurately
//! in position space, but trivial in momentum space, where it is simple
//! multiplication by *k*²/2. The pseudo-spectral approach therefore applies
//! the kinetic term as a conjugation by the discrete Fourier transform,
//! ```text
//! H = F⁻¹ (k²/2) F + V(x)
//! ```
//! with both `(k²/2)` and `V(x)` being diagonal in their respective spaces.
//! Each application of *H* then costs two FFTs and two element-wise
//! multiplications, *O*(*N* log *N*) total, compared to *O*(*N*²) for a
//! dense matrix-vector product.
//!
//! # Conjugate bases
//! A position grid of *N* points on `[xmin, xmax)` with spacing
//! `δx = (xmax - xmin)/N` fixes its conjugate momentum grid completely: the
//! momentum samples are the FFT wavenumbers with spacing
//! `δk = 2π/(xmax - xmin)`, bounded by the Nyquist wavenumber `±π/δx`. The
//! duality relation
//! ```text
//! δx δk N = 2π
//! ```
//! holds for every conjugate pair and is what makes the discrete transform
//! between them exact. Both directions of the transform here carry symmetric
//! `1/√N` normalization, which makes the map unitary on the discrete L2
//! inner product; consequently `F⁻¹ D F` is Hermitian whenever the diagonal
//! *D* is real, and a Hamiltonian built from the primitives in
//! [`operator`][crate::operator] conserves the state norm exactly up to
//! integrator error.
//!
//! # Lazy composite operators
//! Operators form a small closed expression tree: diagonals, transforms, and
//! deferred sums and products of these. A composite is never expanded into a
//! matrix; its action on a state is defined recursively:
//! ```text
//! (A + B + ...) q = A q + B q + ...
//! (A · B · ...) q = A (B (... q))
//! ```
//! with products applied right to left. Basis compatibility between summands
//! and between adjacent product stages is enforced when a composite is
//! constructed, and again (as a length check) when it is applied. For a sum
//! of Hermitian terms and a product of the conjugation form above, the
//! resulting Hamiltonian is Hermitian by construction.
//!
//! # Time evolution
//! The TDSE is integrated as an ordinary differential equation in the grid
//! amplitudes with the classic fourth-order Runge-Kutta scheme and adaptive
//! stepsize via step doubling: each trial step is taken once at size *δt*
//! and again as two steps of size *δt*/2, and the discrepancy between the
//! two results is compared against the requested local tolerance to accept
//! the step and to estimate the next step size[^1]. The integrator touches
//! the Hamiltonian only through its lazy `apply`, so per-step cost stays
//! *O*(*N* log *N*).
//!
//! Requested sample times are always landed on exactly by clamping the
//! adaptive step, never by interpolating between accepted steps, so the
//! sampled states carry no error beyond the local tolerance. The state is
//! *not* renormalized between steps; since exact evolution under a Hermitian
//! Hamiltonian is unitary, drift of the norm beyond tolerance is diagnostic
//! of a non-Hermitian generator (or a divergent integration) and is
//! reported as an error.
//!
//! [^1]: W. H. Press, S. A. Teukolsky, W. T. Vetterling, B. P. Flannery,
//! *Numerical Recipes*, 3rd ed., §17.2.
