//! Phase-space bases.
//!
//! A basis fixes the number of modes `N` and the ordering of the `2N`
//! quadratures:
//! - [`Basis::Interleaved`]: $(q_1, p_1, q_2, p_2, \dots)$
//! - [`Basis::Block`]: $(q_1, \dots, q_N, p_1, \dots, p_N)$

use ndarray::Array2;

/// Quadrature layout of an `N`-mode phase space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Basis {
    /// Position and momentum of each mode are adjacent.
    Interleaved { nmodes: usize },
    /// All positions first, then all momenta.
    Block { nmodes: usize },
}

impl Basis {
    pub fn interleaved(nmodes: usize) -> Self {
        Basis::Interleaved { nmodes }
    }

    pub fn block(nmodes: usize) -> Self {
        Basis::Block { nmodes }
    }

    /// Number of bosonic modes.
    pub fn nmodes(&self) -> usize {
        match *self {
            Basis::Interleaved { nmodes } | Basis::Block { nmodes } => nmodes,
        }
    }

    /// Phase-space dimension `2N`.
    pub fn dim(&self) -> usize {
        2 * self.nmodes()
    }

    /// Same layout with a different number of modes.
    pub fn with_nmodes(&self, nmodes: usize) -> Self {
        match self {
            Basis::Interleaved { .. } => Basis::Interleaved { nmodes },
            Basis::Block { .. } => Basis::Block { nmodes },
        }
    }

    /// True when both bases order quadratures the same way, regardless of size.
    pub fn same_layout(&self, other: &Basis) -> bool {
        matches!(
            (self, other),
            (Basis::Interleaved { .. }, Basis::Interleaved { .. })
                | (Basis::Block { .. }, Basis::Block { .. })
        )
    }

    /// Row/column holding the position quadrature of the 0-based `mode`.
    pub fn q_index(&self, mode: usize) -> usize {
        match self {
            Basis::Interleaved { .. } => 2 * mode,
            Basis::Block { .. } => mode,
        }
    }

    /// Row/column holding the momentum quadrature of the 0-based `mode`.
    pub fn p_index(&self, mode: usize) -> usize {
        match *self {
            Basis::Interleaved { .. } => 2 * mode + 1,
            Basis::Block { nmodes } => nmodes + mode,
        }
    }

    /// Phase-space indices of the given 0-based modes, in the order this
    /// basis stores them.
    ///
    /// For the interleaved layout this is `q_a, p_a, q_b, p_b, ...`; for the
    /// block layout all positions come before all momenta.
    pub fn quadrature_indices(&self, modes: &[usize]) -> Vec<usize> {
        match self {
            Basis::Interleaved { .. } => modes
                .iter()
                .flat_map(|&m| [self.q_index(m), self.p_index(m)])
                .collect(),
            Basis::Block { .. } => modes
                .iter()
                .map(|&m| self.q_index(m))
                .chain(modes.iter().map(|&m| self.p_index(m)))
                .collect(),
        }
    }

    /// The symplectic form $\Omega$ of this basis.
    ///
    /// Interleaved: $\bigoplus_k \begin{pmatrix} 0 & 1 \\ -1 & 0 \end{pmatrix}$.
    /// Block: $\begin{pmatrix} 0 & I_N \\ -I_N & 0 \end{pmatrix}$.
    pub fn symplectic_form(&self) -> Array2<f64> {
        let dim = self.dim();
        let mut omega = Array2::<f64>::zeros((dim, dim));
        for mode in 0..self.nmodes() {
            let q = self.q_index(mode);
            let p = self.p_index(mode);
            omega[[q, p]] = 1.0;
            omega[[p, q]] = -1.0;
        }
        omega
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_interleaved_form() {
        let omega = Basis::interleaved(2).symplectic_form();
        let expected = array![
            [0.0, 1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0, 0.0]
        ];
        assert_eq!(omega, expected);
    }

    #[test]
    fn test_block_form() {
        let omega = Basis::block(2).symplectic_form();
        let expected = array![
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
            [-1.0, 0.0, 0.0, 0.0],
            [0.0, -1.0, 0.0, 0.0]
        ];
        assert_eq!(omega, expected);
    }

    #[test]
    fn test_form_is_antisymmetric_and_squares_to_minus_identity() {
        for basis in [Basis::interleaved(3), Basis::block(3)] {
            let omega = basis.symplectic_form();
            assert_eq!(omega.t().to_owned(), -&omega);
            assert_eq!(omega.dot(&omega), -Array2::<f64>::eye(6));
        }
    }

    #[test]
    fn test_quadrature_indices() {
        assert_eq!(
            Basis::interleaved(3).quadrature_indices(&[0, 2]),
            vec![0, 1, 4, 5]
        );
        assert_eq!(Basis::block(3).quadrature_indices(&[0, 2]), vec![0, 2, 3, 5]);
    }

    #[test]
    fn test_layout_helpers() {
        let b = Basis::block(2);
        assert_eq!(b.with_nmodes(5), Basis::block(5));
        assert!(b.same_layout(&Basis::block(7)));
        assert!(!b.same_layout(&Basis::interleaved(2)));
        assert_eq!(b.dim(), 4);
    }
}
