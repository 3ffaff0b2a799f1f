//! Resizable n-dimensional vector used for all model-native state.
//!
//! Binary `+` and `-` do not require equal dimensions: the result takes the
//! dimension of the shorter operand, so `(1, 2, 3) + (1, 2) = (2, 4)`. This
//! lets a state vector be combined with a lower-dimensional one (for example a
//! spatial position against a time-augmented state) without a copy. Use
//! [`Vector::zip_add_strict`] / [`Vector::zip_sub_strict`] when a mismatch
//! should be an error instead.

use crate::error::{DynamicsError, DynamicsResult};
use crate::traits::Scalar;
use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector<T = f64> {
    components: Vec<T>,
}

impl<T: Scalar> Vector<T> {
    pub fn zeros(dimension: usize) -> Self {
        Self::filled(dimension, T::zero())
    }

    pub fn filled(dimension: usize, value: T) -> Self {
        Self {
            components: vec![value; dimension],
        }
    }

    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    /// Resizes the vector. Slots added by growth are zero; callers are
    /// expected to initialize them before use.
    pub fn set_dimension(&mut self, dimension: usize) {
        self.components.resize(dimension, T::zero());
    }

    pub fn as_slice(&self) -> &[T] {
        &self.components
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.components
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.components.iter()
    }

    /// Bounds-checked read.
    pub fn get(&self, index: usize) -> Option<T> {
        self.components.get(index).copied()
    }

    /// Copies `other` into `self` over the shared leading components. The
    /// dimension of `self` never changes.
    pub fn copy_from(&mut self, other: &Vector<T>) {
        for (dst, src) in self.components.iter_mut().zip(other.components.iter()) {
            *dst = *src;
        }
    }

    pub fn zip_add_strict(&self, other: &Vector<T>) -> DynamicsResult<Vector<T>> {
        self.check_same_dimension(other)?;
        Ok(self + other)
    }

    pub fn zip_sub_strict(&self, other: &Vector<T>) -> DynamicsResult<Vector<T>> {
        self.check_same_dimension(other)?;
        Ok(self - other)
    }

    fn check_same_dimension(&self, other: &Vector<T>) -> DynamicsResult<()> {
        if self.dimension() != other.dimension() {
            return Err(DynamicsError::DimensionMismatch {
                left: self.dimension(),
                right: other.dimension(),
            });
        }
        Ok(())
    }

    fn zip_with(&self, other: &Vector<T>, f: impl Fn(T, T) -> T) -> Vector<T> {
        self.components
            .iter()
            .zip(other.components.iter())
            .map(|(a, b)| f(*a, *b))
            .collect()
    }

    fn map(&self, f: impl Fn(T) -> T) -> Vector<T> {
        self.components.iter().map(|a| f(*a)).collect()
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(components: Vec<T>) -> Self {
        Self { components }
    }
}

impl<T: Copy> From<&[T]> for Vector<T> {
    fn from(components: &[T]) -> Self {
        Self {
            components: components.to_vec(),
        }
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            components: iter.into_iter().collect(),
        }
    }
}

/// Bounds-checked. The per-frame RK4 path (`RungeKutta4::step_fixed`) works on
/// fixed-size arrays and does not go through this impl.
impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        &self.components[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.components[index]
    }
}

impl<T: Scalar + fmt::Display> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, value) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{value}")?;
        }
        write!(f, ")")
    }
}

// --- Arithmetic ---

impl<T: Scalar> Add for &Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: Self) -> Vector<T> {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl<T: Scalar> Add for Vector<T> {
    type Output = Vector<T>;

    fn add(self, rhs: Vector<T>) -> Vector<T> {
        &self + &rhs
    }
}

impl<T: Scalar> Sub for &Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: Self) -> Vector<T> {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl<T: Scalar> Sub for Vector<T> {
    type Output = Vector<T>;

    fn sub(self, rhs: Vector<T>) -> Vector<T> {
        &self - &rhs
    }
}

impl<T: Scalar> AddAssign<&Vector<T>> for Vector<T> {
    fn add_assign(&mut self, rhs: &Vector<T>) {
        for (a, b) in self.components.iter_mut().zip(rhs.components.iter()) {
            *a = *a + *b;
        }
    }
}

impl<T: Scalar> SubAssign<&Vector<T>> for Vector<T> {
    fn sub_assign(&mut self, rhs: &Vector<T>) {
        for (a, b) in self.components.iter_mut().zip(rhs.components.iter()) {
            *a = *a - *b;
        }
    }
}

impl<T: Scalar> MulAssign<T> for Vector<T> {
    fn mul_assign(&mut self, scalar: T) {
        for a in self.components.iter_mut() {
            *a = *a * scalar;
        }
    }
}

impl<T: Scalar> DivAssign<T> for Vector<T> {
    fn div_assign(&mut self, scalar: T) {
        for a in self.components.iter_mut() {
            *a = *a / scalar;
        }
    }
}

impl<T: Scalar> Mul<T> for &Vector<T> {
    type Output = Vector<T>;

    fn mul(self, scalar: T) -> Vector<T> {
        self.map(|a| a * scalar)
    }
}

impl<T: Scalar> Mul<T> for Vector<T> {
    type Output = Vector<T>;

    fn mul(self, scalar: T) -> Vector<T> {
        &self * scalar
    }
}

impl Mul<&Vector<f64>> for f64 {
    type Output = Vector<f64>;

    fn mul(self, v: &Vector<f64>) -> Vector<f64> {
        v.map(|a| self * a)
    }
}

impl Mul<Vector<f64>> for f64 {
    type Output = Vector<f64>;

    fn mul(self, v: Vector<f64>) -> Vector<f64> {
        self * &v
    }
}

impl<T: Scalar> Div<T> for &Vector<T> {
    type Output = Vector<T>;

    fn div(self, scalar: T) -> Vector<T> {
        self.map(|a| a / scalar)
    }
}

impl<T: Scalar> Div<T> for Vector<T> {
    type Output = Vector<T>;

    fn div(self, scalar: T) -> Vector<T> {
        &self / scalar
    }
}

impl<T: Scalar> Neg for &Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        self.map(|a| -a)
    }
}

impl<T: Scalar> Neg for Vector<T> {
    type Output = Vector<T>;

    fn neg(self) -> Vector<T> {
        -&self
    }
}

#[cfg(test)]
mod tests {
    use super::Vector;
    use crate::error::DynamicsError;

    #[test]
    fn addition_truncates_to_shorter_operand() {
        let sum = Vector::from(vec![1.0, 2.0, 3.0]) + Vector::from(vec![1.0, 2.0]);
        assert_eq!(sum, Vector::from(vec![2.0, 4.0]));
        assert_eq!(sum.dimension(), 2);
    }

    #[test]
    fn subtraction_truncates_regardless_of_operand_order() {
        let short = Vector::from(vec![5.0, 5.0]);
        let long = Vector::from(vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(&short - &long, Vector::from(vec![4.0, 3.0]));
        assert_eq!(&long - &short, Vector::from(vec![-4.0, -3.0]));
    }

    #[test]
    fn strict_variants_reject_mismatched_dimensions() {
        let a = Vector::from(vec![1.0, 2.0, 3.0]);
        let b = Vector::from(vec![1.0, 2.0]);
        assert_eq!(
            a.zip_add_strict(&b),
            Err(DynamicsError::DimensionMismatch { left: 3, right: 2 })
        );
        assert!(a.zip_sub_strict(&b).is_err());

        let c = Vector::from(vec![1.0, 1.0, 1.0]);
        assert_eq!(a.zip_sub_strict(&c).unwrap(), Vector::from(vec![0.0, 1.0, 2.0]));
    }

    #[test]
    fn equality_accounts_for_dimension() {
        let a = Vector::from(vec![1.0, 2.0]);
        let b = Vector::from(vec![1.0, 2.0, 0.0]);
        assert_ne!(a, b);
        assert_eq!(a, Vector::from(vec![1.0, 2.0]));
    }

    #[test]
    fn set_dimension_zero_fills_new_slots() {
        let mut v = Vector::from(vec![7.0]);
        v.set_dimension(3);
        assert_eq!(v.as_slice(), &[7.0, 0.0, 0.0]);
        v.set_dimension(1);
        assert_eq!(v.as_slice(), &[7.0]);
    }

    #[test]
    fn compound_assignment_and_scalar_ops() {
        let mut v = Vector::from(vec![1.0, 2.0, 3.0]);
        v += &Vector::from(vec![1.0, 1.0]);
        assert_eq!(v.as_slice(), &[2.0, 3.0, 3.0]);
        v -= &Vector::filled(3, 1.0);
        v *= 4.0;
        v /= 2.0;
        assert_eq!(v.as_slice(), &[2.0, 4.0, 4.0]);
        assert_eq!(2.0 * &v, &v * 2.0);
        assert_eq!((-&v).as_slice(), &[-2.0, -4.0, -4.0]);
        assert_eq!((&v / 2.0).as_slice(), &[1.0, 2.0, 2.0]);
    }

    #[test]
    fn copy_from_keeps_destination_dimension() {
        let mut dst = Vector::zeros(2);
        dst.copy_from(&Vector::from(vec![3.0, 4.0, 5.0]));
        assert_eq!(dst.as_slice(), &[3.0, 4.0]);
    }

    #[test]
    fn display_lists_components() {
        let v = Vector::from(vec![1.5, -2.0]);
        assert_eq!(v.to_string(), "(1.5, -2)");
        assert_eq!(Vector::<f64>::zeros(0).to_string(), "()");
    }

    #[test]
    fn works_with_single_precision() {
        let v = Vector::<f32>::filled(2, 0.5) + Vector::from(vec![1.0f32, 1.0]);
        assert_eq!(v.get(1), Some(1.5));
        assert_eq!(v.get(2), None);
    }
}
