use ndarray as nd;
use opspace::{ basis::Basis, evolve, operator::Operator, state };

// scatter a Gaussian wave packet off a square potential barrier

fn main() {
    const V0: f64 = 1.0; // barrier height
    const HALF_WIDTH: f64 = 2.5; // barrier occupies |x| <= 2.5
    const X0: f64 = -15.0; // initial packet center
    const P0: f64 = 1.0; // initial packet momentum
    const SIGMA0: f64 = 4.0; // initial packet width

    // position grid and conjugate momentum grid
    let xb = Basis::position(-30.0, 30.0, 200).expect("valid basis");
    let kb = Basis::momentum_of(&xb).expect("conjugate basis");

    // H = F⁻¹ (k²/2) F + V(x), applied lazily -- no matrix is ever built
    let barrier
        = move |x: f64| if x.abs() <= HALF_WIDTH { V0 } else { 0.0 };
    let H = Operator::hamiltonian(&xb, barrier).expect("hamiltonian");

    let q0 = state::gaussian(&xb, X0, P0, SIGMA0).expect("initial state");
    let e0 = state::expectation(&H, &q0).expect("mean energy");
    println!("mean energy: {:.6} (barrier height {})", e0.re, V0);

    // evolve long enough for the packet to traverse the grid center
    let tmax = 2.0 * X0.abs() / 1.2;
    let t: nd::Array1<f64> = nd::Array1::linspace(0.0, tmax, 20);
    let traj = evolve::evolve(&t, &q0, &H).expect("time evolution");

    println!("{:>8}  {:>10}  {:>10}  {:>10}", "t", "left", "barrier", "right");
    for (tk, qk) in traj.iter() {
        let left
            = state::prob_window(&xb, &qk, -30.0, -HALF_WIDTH).unwrap();
        let mid
            = state::prob_window(&xb, &qk, -HALF_WIDTH, HALF_WIDTH).unwrap();
        let right
            = state::prob_window(&xb, &qk, HALF_WIDTH, 30.0).unwrap();
        println!("{:8.3}  {:10.6}  {:10.6}  {:10.6}", tk, left, mid, right);
    }

    let qf = traj.final_state();
    let reflected = state::prob_window(&xb, &qf, -30.0, -HALF_WIDTH).unwrap();
    let transmitted = state::prob_window(&xb, &qf, HALF_WIDTH, 30.0).unwrap();
    println!("reflected:   {:.6}", reflected);
    println!("transmitted: {:.6}", transmitted);

    // momentum distribution of the final state
    let fwd = Operator::transform(&xb, &kb).expect("transform");
    let qf_k = fwd.apply(&qf).expect("momentum-space state");
    let k_mean = state::expectation(
        &Operator::momentum(&kb).unwrap(), &qf_k).unwrap();
    println!("final mean momentum: {:.6}", k_mean.re);
}
