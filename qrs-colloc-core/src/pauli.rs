use nalgebra::DMatrix;
use num_traits::{One, Zero};
use crate::c64;

pub type Op = DMatrix<c64>;

pub fn sx() -> Op {
    Op::from_row_slice(2, 2,
        &[c64::zero(), c64::one(),
          c64::one(),  c64::zero()])
}

pub fn sy() -> Op {
    Op::from_row_slice(2, 2,
        &[c64::zero(), -c64::i(),
          c64::i(),    c64::zero()])
}

pub fn sz() -> Op {
    Op::from_row_slice(2, 2,
        &[c64::one(),  c64::zero(),
          c64::zero(), -c64::one()])
}

/// Lowering operator |0><1|
pub fn sm() -> Op {
    Op::from_row_slice(2, 2,
        &[c64::zero(), c64::one(),
          c64::zero(), c64::zero()])
}

/// Raising operator |1><0|
pub fn sp() -> Op {
    sm().adjoint()
}

pub fn eye(n: usize) -> Op {
    Op::identity(n, n)
}

/// Kronecker product of the operators in order
///
/// # Panics
/// Panics if `ops` is empty
pub fn tensor_list(ops: &[Op]) -> Op {
    let (first, rest) = ops.split_first()
        .expect("tensor_list Op slice cannot be empty");
    rest.iter().fold(first.clone(), |v, u| v.kronecker(u))
}
