//! Dense nodal conductance system and its direct solve.

use crate::error::{CircuitError, Result};

/// Nodal system G·v = i.
///
/// Rows and columns are non-reference nodes. The matrix is stored row-major.
#[derive(Debug)]
pub struct ConductanceMatrix {
    /// Conductance matrix G (row-major)
    pub g: Vec<f64>,
    /// Injected current vector i
    pub i: Vec<f64>,
    /// Solution vector v
    pub v: Vec<f64>,
    /// Matrix dimension
    pub size: usize,
}

impl ConductanceMatrix {
    /// Create a zeroed system of the given dimension.
    pub fn new(size: usize) -> Self {
        Self {
            g: vec![0.0; size * size],
            i: vec![0.0; size],
            v: vec![0.0; size],
            size,
        }
    }

    /// Get matrix element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.g[row * self.size + col]
    }

    /// Add to matrix element at (row, col).
    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.g[row * self.size + col] += value;
    }

    /// Stamp a conductance between two nodes (`None` is the reference node).
    ///
    /// For a conductance G between nodes n1 and n2:
    ///   G[n1,n1] += G
    ///   G[n2,n2] += G
    ///   G[n1,n2] -= G
    ///   G[n2,n1] -= G
    pub fn stamp_conductance(&mut self, n1: Option<usize>, n2: Option<usize>, g: f64) {
        if let Some(a) = n1 {
            self.add(a, a, g);
        }
        if let Some(b) = n2 {
            self.add(b, b, g);
        }
        if let (Some(a), Some(b)) = (n1, n2) {
            self.add(a, b, -g);
            self.add(b, a, -g);
        }
    }

    /// Stamp a current source pushing `current` from `n_from` into `n_to`.
    pub fn stamp_current_source(&mut self, n_from: Option<usize>, n_to: Option<usize>, current: f64) {
        if let Some(a) = n_from {
            self.i[a] -= current;
        }
        if let Some(b) = n_to {
            self.i[b] += current;
        }
    }

    /// Solve by Gaussian elimination without pivoting.
    ///
    /// Rows are never swapped. This is only sound because every nodal matrix
    /// stamped from positive conductances, with one reference node removed
    /// per island, is symmetric and diagonally dominant. A pivot smaller
    /// than `pivot_tolerance` aborts the solve as singular.
    pub fn solve(&mut self, pivot_tolerance: f64) -> Result<()> {
        let n = self.size;
        let mut a = self.g.clone();
        let mut b = self.i.clone();

        // Forward elimination
        for k in 0..n {
            let pivot = a[k * n + k];
            if !(pivot.abs() >= pivot_tolerance) {
                return Err(CircuitError::SingularMatrix { row: k, pivot });
            }
            for r in (k + 1)..n {
                let factor = a[r * n + k] / pivot;
                if factor == 0.0 {
                    continue;
                }
                a[r * n + k] = 0.0;
                for c in (k + 1)..n {
                    a[r * n + c] -= factor * a[k * n + c];
                }
                b[r] -= factor * b[k];
            }
        }

        // Back substitution
        for r in (0..n).rev() {
            let mut sum = b[r];
            for c in (r + 1)..n {
                sum -= a[r * n + c] * self.v[c];
            }
            self.v[r] = sum / a[r * n + r];
        }

        Ok(())
    }

    /// Get the voltage at a node (`None` is the reference node).
    pub fn voltage(&self, node: Option<usize>) -> f64 {
        match node {
            Some(idx) => self.v[idx],
            None => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_divider() {
        // 1 A into node 0, 1 ohm between nodes, 1 ohm from node 1 to reference
        let mut m = ConductanceMatrix::new(2);
        m.stamp_conductance(Some(0), Some(1), 1.0);
        m.stamp_conductance(Some(1), None, 1.0);
        m.stamp_current_source(None, Some(0), 1.0);
        m.solve(1e-15).unwrap();
        assert_abs_diff_eq!(m.voltage(Some(0)), 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(m.voltage(Some(1)), 1.0, epsilon = 1e-12);
        assert_eq!(m.voltage(None), 0.0);
    }

    #[test]
    fn test_stamp_is_symmetric() {
        let mut m = ConductanceMatrix::new(2);
        m.stamp_conductance(Some(0), Some(1), 0.5);
        assert_eq!(m.get(0, 1), m.get(1, 0));
        assert_eq!(m.get(0, 0), 0.5);
    }

    #[test]
    fn test_zero_pivot_is_singular() {
        let mut m = ConductanceMatrix::new(2);
        m.stamp_conductance(Some(0), None, 1.0);
        let err = m.solve(1e-15).unwrap_err();
        assert!(matches!(err, CircuitError::SingularMatrix { row: 1, .. }));
    }

    #[test]
    fn test_extreme_conductance_ratio() {
        // Closed switch (0.001 ohm) in series with an open one (1e9 ohm)
        let mut m = ConductanceMatrix::new(2);
        m.stamp_conductance(Some(0), Some(1), 1e3);
        m.stamp_conductance(Some(1), None, 1e-9);
        m.stamp_current_source(None, Some(0), 1e-9);
        m.solve(1e-15).unwrap();
        assert_abs_diff_eq!(m.voltage(Some(1)), 1.0, epsilon = 1e-3);
    }
}
