#![allow(dead_code)]

use gaussian_cv::{Basis, DirectSum, GaussianState, GaussianUnitary, directsum_all};
use ndarray::{Array1, Array2, array, s};
use rand::Rng;

pub fn vacuum(nmodes: usize) -> GaussianState {
    GaussianState::new(
        Basis::interleaved(nmodes),
        Array1::zeros(2 * nmodes),
        Array2::eye(2 * nmodes),
    )
    .unwrap()
}

pub fn thermal(n: f64) -> GaussianState {
    GaussianState::new(
        Basis::interleaved(1),
        array![0.0, 0.0],
        Array2::eye(2) * (2.0 * n + 1.0),
    )
    .unwrap()
}

pub fn coherent(q: f64, p: f64) -> GaussianState {
    GaussianState::new(Basis::interleaved(1), array![q, p], Array2::eye(2)).unwrap()
}

pub fn squeezed(r: f64) -> GaussianState {
    GaussianState::new(
        Basis::interleaved(1),
        array![0.0, 0.0],
        array![[(-2.0 * r).exp(), 0.0], [0.0, (2.0 * r).exp()]],
    )
    .unwrap()
}

/// Squeezed vacuum rotated by `theta` in phase space.
pub fn rotated_squeezed(r: f64, theta: f64) -> GaussianState {
    let (sn, cs) = theta.sin_cos();
    let rotation =
        GaussianUnitary::new(Basis::interleaved(1), array![0.0, 0.0], array![[cs, sn], [-sn, cs]])
            .unwrap();
    squeezed(r).apply(&rotation).unwrap()
}

/// Two-mode squeezed vacuum.
pub fn epr(r: f64) -> GaussianState {
    let (c, s) = ((2.0 * r).cosh(), (2.0 * r).sinh());
    GaussianState::new(
        Basis::interleaved(2),
        Array1::zeros(4),
        array![
            [c, 0.0, s, 0.0],
            [0.0, c, 0.0, -s],
            [s, 0.0, c, 0.0],
            [0.0, -s, 0.0, c]
        ],
    )
    .unwrap()
}

/// Symplectic matrix acting as `local` on the 0-based `mode` of `nmodes`.
fn single_mode(nmodes: usize, mode: usize, local: &Array2<f64>) -> Array2<f64> {
    let mut s_mat = Array2::eye(2 * nmodes);
    s_mat
        .slice_mut(s![2 * mode..2 * mode + 2, 2 * mode..2 * mode + 2])
        .assign(local);
    s_mat
}

/// Beam splitter between 0-based modes `mode` and `mode + 1`.
fn beam_splitter(nmodes: usize, mode: usize, theta: f64) -> Array2<f64> {
    let (sn, cs) = theta.sin_cos();
    let mut s_mat = Array2::eye(2 * nmodes);
    let (a, b) = (2 * mode, 2 * mode + 2);
    for k in 0..2 {
        s_mat[[a + k, a + k]] = cs;
        s_mat[[b + k, b + k]] = cs;
        s_mat[[a + k, b + k]] = sn;
        s_mat[[b + k, a + k]] = -sn;
    }
    s_mat
}

/// Random displaced symplectic transformation on `nmodes` interleaved modes.
pub fn random_unitary<R: Rng>(rng: &mut R, nmodes: usize) -> GaussianUnitary {
    let mut s_mat = Array2::<f64>::eye(2 * nmodes);

    for mode in 0..nmodes {
        let r: f64 = rng.random_range(-0.8..0.8);
        let phi: f64 = rng.random_range(0.0..std::f64::consts::TAU);
        let (sn, cs) = phi.sin_cos();
        let squeeze = array![[(-r).exp(), 0.0], [0.0, r.exp()]];
        let rotate = array![[cs, sn], [-sn, cs]];
        s_mat = single_mode(nmodes, mode, &rotate.dot(&squeeze)).dot(&s_mat);
    }
    for mode in 0..nmodes.saturating_sub(1) {
        let theta = rng.random_range(0.0..std::f64::consts::PI);
        s_mat = beam_splitter(nmodes, mode, theta).dot(&s_mat);
    }

    let disp: Array1<f64> = (0..2 * nmodes).map(|_| rng.random_range(-2.0..2.0)).collect();
    GaussianUnitary::new(Basis::interleaved(nmodes), disp, s_mat).unwrap()
}

/// Random mixed state: a thermal product state passed through a random unitary.
pub fn random_state<R: Rng>(rng: &mut R, nmodes: usize) -> GaussianState {
    let thermals: Vec<GaussianState> = (0..nmodes)
        .map(|_| thermal(rng.random_range(0.0..2.0)))
        .collect();
    let product = directsum_all(&thermals).unwrap().unwrap();
    product.apply(&random_unitary(rng, nmodes)).unwrap()
}

pub fn assert_close(a: &Array2<f64>, b: &Array2<f64>, tol: f64) {
    assert_eq!(a.dim(), b.dim());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < tol, "{x} != {y}");
    }
}

pub fn assert_close_vec(a: &Array1<f64>, b: &Array1<f64>, tol: f64) {
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(b.iter()) {
        assert!((x - y).abs() < tol, "{x} != {y}");
    }
}

/// `s1 ⊕ s2` convenience for tests.
pub fn pair(a: &GaussianState, b: &GaussianState) -> GaussianState {
    a.directsum(b).unwrap()
}
