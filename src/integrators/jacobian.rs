use nalgebra::{DMatrix, DVector};
use sprs::{CsMat, TriMat};

/// Which knot point of the (current, next) pair a column belongs to
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Knot {
    Current,
    Next,
}

/// Assembles a sparse Jacobian of shape dim x (2 z_dim) by block insertion.
///
/// Columns are addressed by a knot and the component indices within that
/// knot point. Blocks are disjoint, so insertion order does not matter.
pub struct JacobianBuilder {
    tri: TriMat<f64>,
    z_dim: usize,
}

impl JacobianBuilder {
    pub fn new(dim: usize, z_dim: usize) -> Self {
        Self { tri: TriMat::new((dim, 2 * z_dim)), z_dim }
    }

    fn col(&self, knot: Knot, c: usize) -> usize {
        match knot {
            Knot::Current => c,
            Knot::Next => self.z_dim + c,
        }
    }

    /// Inserts `block` at rows `row_offset..` and the columns `cols` of `knot`,
    /// skipping exact zeros
    pub fn add_block(&mut self, row_offset: usize, knot: Knot, cols: &[usize], block: &DMatrix<f64>) {
        debug_assert_eq!(cols.len(), block.ncols());
        for (j, &c) in cols.iter().enumerate() {
            let col = self.col(knot, c);
            for (i, &v) in block.column(j).iter().enumerate() {
                if v != 0.0 {
                    self.tri.add_triplet(row_offset + i, col, v);
                }
            }
        }
    }

    pub fn add_column(&mut self, knot: Knot, c: usize, values: &DVector<f64>) {
        let col = self.col(knot, c);
        for (i, &v) in values.iter().enumerate() {
            if v != 0.0 {
                self.tri.add_triplet(i, col, v);
            }
        }
    }

    /// Unit entries (i, cols[i])
    pub fn add_identity(&mut self, knot: Knot, cols: &[usize]) {
        for (i, &c) in cols.iter().enumerate() {
            let col = self.col(knot, c);
            self.tri.add_triplet(i, col, 1.0);
        }
    }

    pub fn build(self) -> CsMat<f64> {
        self.tri.to_csr()
    }
}

/// Dense copy of a sparse matrix
pub fn sparse_to_dense(m: &CsMat<f64>) -> DMatrix<f64> {
    let (rows, cols) = m.shape();
    let mut d = DMatrix::zeros(rows, cols);
    for (&v, (i, j)) in m.iter() {
        d[(i, j)] += v;
    }
    d
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_assembly() {
        let mut jb = JacobianBuilder::new(2, 3);
        jb.add_identity(Knot::Next, &[0, 2]);
        jb.add_block(0, Knot::Current, &[0, 2], &DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 3.0, 4.0]));
        jb.add_column(Knot::Current, 1, &DVector::from_vec(vec![5.0, 6.0]));
        let j = jb.build();
        assert_eq!(j.shape(), (2, 6));
        assert_eq!(j.nnz(), 7);

        let d = sparse_to_dense(&j);
        assert_eq!(d, DMatrix::from_row_slice(2, 6, &[
            1.0, 5.0, 0.0, 1.0, 0.0, 0.0,
            3.0, 6.0, 4.0, 0.0, 0.0, 1.0]));
    }
}
