/// Dense matrices of any size plus the transform constructors used by 3D graphics.
///
/// Every operation is non-destructive: operands are never modified and each
/// method returns a freshly allocated [`Matrix`]. Elements are stored row-major;
/// [`Matrix::to_column_major`] is the only place where the order is transposed,
/// matching what graphics APIs expect for uniform upload.

use std::ops::Index;

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use crate::error::MatrixError;

/// Clipping volume shared by the orthographic and perspective constructors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frustum {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub near: f64,
    pub far: f64,
}

impl Frustum {
    pub fn new(left: f64, right: f64, bottom: f64, top: f64, near: f64, far: f64) -> Self {
        Self {
            left,
            right,
            bottom,
            top,
            near,
            far,
        }
    }

    fn extents(&self) -> (f64, f64, f64) {
        (
            self.right - self.left,
            self.top - self.bottom,
            self.far - self.near,
        )
    }
}

/// Named graphics transforms a matrix can be built from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformDescriptor {
    Translate { x: f64, y: f64, z: f64 },
    /// Angle in degrees about an arbitrary axis
    Rotate { angle: f64, x: f64, y: f64, z: f64 },
    Scale { x: f64, y: f64, z: f64 },
    Orthographic(Frustum),
    Perspective(Frustum),
}

/// A rectangular grid of `f64` values
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    columns: usize,
    elements: Vec<f64>,
}

impl Matrix {
    /// Create a `rows` x `columns` matrix with ones on the diagonal
    pub fn new(rows: usize, columns: usize) -> Self {
        let mut elements = vec![0.0; rows * columns];
        for i in 0..rows.min(columns) {
            elements[i * columns + i] = 1.0;
        }
        Self {
            rows,
            columns,
            elements,
        }
    }

    /// Square identity matrix
    pub fn identity(size: usize) -> Self {
        Self::new(size, size)
    }

    /// Build a matrix from explicit rows
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        let columns = rows.first().map_or(0, Vec::len);
        let mut elements = Vec::with_capacity(rows.len() * columns);

        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns {
                return Err(MatrixError::NotRectangular {
                    row,
                    expected: columns,
                    found: values.len(),
                });
            }
            elements.extend_from_slice(values);
        }

        Ok(Self {
            rows: rows.len(),
            columns,
            elements,
        })
    }

    fn from_array4(rows: [[f64; 4]; 4]) -> Self {
        Self {
            rows: 4,
            columns: 4,
            elements: rows.iter().flatten().copied().collect(),
        }
    }

    /// Build the matrix a [`TransformDescriptor`] describes
    pub fn from_descriptor(descriptor: &TransformDescriptor) -> Result<Self, MatrixError> {
        match *descriptor {
            TransformDescriptor::Translate { x, y, z } => Ok(Self::translate(x, y, z)),
            TransformDescriptor::Rotate { angle, x, y, z } => Self::rotate(angle, x, y, z),
            TransformDescriptor::Scale { x, y, z } => Ok(Self::scale(x, y, z)),
            TransformDescriptor::Orthographic(frustum) => Ok(Self::orthographic(&frustum)),
            TransformDescriptor::Perspective(frustum) => Ok(Self::perspective(&frustum)),
        }
    }

    /// Homogeneous 4x4 translation
    pub fn translate(x: f64, y: f64, z: f64) -> Self {
        Self::from_array4([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Homogeneous 4x4 non-uniform scale
    pub fn scale(x: f64, y: f64, z: f64) -> Self {
        Self::from_array4([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Rotation of `angle` degrees about the axis `(x, y, z)`.
    ///
    /// The axis is normalized here, so any non-zero length works. A zero or
    /// non-finite axis has no direction and is rejected.
    pub fn rotate(angle: f64, x: f64, y: f64, z: f64) -> Result<Self, MatrixError> {
        let length = (x * x + y * y + z * z).sqrt();
        if length == 0.0 || !length.is_finite() {
            return Err(MatrixError::DegenerateAxis { x, y, z });
        }

        let (x, y, z) = (x / length, y / length, z / length);
        let (s, c) = angle.to_radians().sin_cos();
        let one_minus_c = 1.0 - c;

        let (x2, y2, z2) = (x * x, y * y, z * z);
        let (xy, yz, xz) = (x * y, y * z, x * z);
        let (xs, ys, zs) = (x * s, y * s, z * s);

        Ok(Self::from_array4([
            [x2 * one_minus_c + c, xy * one_minus_c - zs, xz * one_minus_c + ys, 0.0],
            [xy * one_minus_c + zs, y2 * one_minus_c + c, yz * one_minus_c - xs, 0.0],
            [xz * one_minus_c - ys, yz * one_minus_c + xs, z2 * one_minus_c + c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]))
    }

    /// Orthographic projection mapping the frustum onto the unit cube
    pub fn orthographic(frustum: &Frustum) -> Self {
        let (width, height, depth) = frustum.extents();
        Self::from_array4([
            [2.0 / width, 0.0, 0.0, -(frustum.right + frustum.left) / width],
            [0.0, 2.0 / height, 0.0, -(frustum.top + frustum.bottom) / height],
            [0.0, 0.0, -2.0 / depth, -(frustum.far + frustum.near) / depth],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Off-center perspective projection
    pub fn perspective(frustum: &Frustum) -> Self {
        let (width, height, depth) = frustum.extents();
        let near = frustum.near;
        Self::from_array4([
            [2.0 * near / width, 0.0, (frustum.right + frustum.left) / width, 0.0],
            [0.0, 2.0 * near / height, (frustum.top + frustum.bottom) / height, 0.0],
            [
                0.0,
                0.0,
                -(frustum.far + near) / depth,
                -2.0 * near * frustum.far / depth,
            ],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Element at `row`, `column`; panics when out of bounds like slice indexing
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self[(row, column)]
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        self.check_same_dimensions("add", other)?;
        Ok(self.zip_with(other, |a, b| a + b))
    }

    pub fn subtract(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        self.check_same_dimensions("subtract", other)?;
        Ok(self.zip_with(other, |a, b| a - b))
    }

    /// Standard matrix product `self x other`
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.columns != other.rows {
            return Err(MatrixError::DimensionMismatch {
                op: "multiply",
                left: (self.rows, self.columns),
                right: (other.rows, other.columns),
            });
        }

        let mut elements = Vec::with_capacity(self.rows * other.columns);
        for i in 0..self.rows {
            for j in 0..other.columns {
                let mut sum = 0.0;
                for k in 0..self.columns {
                    sum += self[(i, k)] * other[(k, j)];
                }
                elements.push(sum);
            }
        }

        Ok(Matrix {
            rows: self.rows,
            columns: other.columns,
            elements,
        })
    }

    /// Flatten columns-first, the layout uniform uploads expect
    pub fn to_column_major(&self) -> Vec<f64> {
        let mut result = Vec::with_capacity(self.elements.len());
        for column in 0..self.columns {
            for row in 0..self.rows {
                result.push(self[(row, column)]);
            }
        }
        result
    }

    /// Convert a 4x4 matrix for use with nalgebra-based rasterizers
    pub fn to_matrix4(&self) -> Result<Matrix4<f64>, MatrixError> {
        if self.rows != 4 || self.columns != 4 {
            return Err(MatrixError::DimensionMismatch {
                op: "convert",
                left: (self.rows, self.columns),
                right: (4, 4),
            });
        }
        Ok(Matrix4::from_column_slice(&self.to_column_major()))
    }

    fn check_same_dimensions(&self, op: &'static str, other: &Matrix) -> Result<(), MatrixError> {
        if self.rows != other.rows || self.columns != other.columns {
            return Err(MatrixError::DimensionMismatch {
                op,
                left: (self.rows, self.columns),
                right: (other.rows, other.columns),
            });
        }
        Ok(())
    }

    fn zip_with(&self, other: &Matrix, f: impl Fn(f64, f64) -> f64) -> Matrix {
        Matrix {
            rows: self.rows,
            columns: self.columns,
            elements: self
                .elements
                .iter()
                .zip(&other.elements)
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Self::identity(4)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, column): (usize, usize)) -> &f64 {
        assert!(
            row < self.rows && column < self.columns,
            "index ({row}, {column}) out of bounds for a {}x{} matrix",
            self.rows,
            self.columns
        );
        &self.elements[row * self.columns + column]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_matrix_eq(a: &Matrix, b: &Matrix) {
        assert_eq!((a.rows(), a.columns()), (b.rows(), b.columns()));
        for i in 0..a.rows() {
            for j in 0..a.columns() {
                assert_relative_eq!(a[(i, j)], b[(i, j)], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_creation_and_access() {
        let m = Matrix::default();
        let m1 = Matrix::new(6, 9);
        let m2 = Matrix::from_rows(vec![vec![0.0, 1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0, 7.0]]).unwrap();

        assert_eq!((m.rows(), m.columns()), (4, 4));
        assert_eq!((m1.rows(), m1.columns()), (6, 9));
        assert_eq!((m2.rows(), m2.columns()), (2, 4));
        assert_eq!(m.get(0, 0), 1.0);
        assert_eq!(m.get(2, 0), 0.0);
        assert_eq!(m.get(3, 3), 1.0);
        assert_eq!(m1.get(5, 5), 1.0);
        assert_eq!(m1.get(5, 8), 0.0);
        assert_eq!(m2.get(1, 0), 4.0);
        assert_eq!(m2.get(1, 3), 7.0);
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(
            result,
            Err(MatrixError::NotRectangular {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_add_and_subtract() {
        let identity = Matrix::default();
        let zeros = Matrix::from_rows(vec![vec![0.0; 4]; 4]).unwrap();

        let sum = zeros.add(&identity).unwrap().add(&identity).unwrap();
        assert_eq!(sum.get(0, 0), 2.0);
        assert_eq!(sum.get(3, 1), 0.0);
        assert_eq!(sum.get(2, 2), 2.0);

        let difference = zeros.subtract(&identity).unwrap().subtract(&identity).unwrap();
        assert_eq!(difference.get(0, 0), -2.0);
        assert_eq!(difference.get(2, 0), 0.0);
        assert_eq!(difference.get(3, 3), -2.0);

        // operands are untouched
        assert_eq!(zeros.get(0, 0), 0.0);
    }

    #[test]
    fn test_add_then_subtract_round_trips() {
        let a = Matrix::from_rows(vec![vec![1.5, -2.0, 3.25], vec![0.0, 7.0, -1.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![0.5, 4.0, -3.0], vec![2.0, 2.0, 9.5]]).unwrap();
        assert_matrix_eq(&a.add(&b).unwrap().subtract(&b).unwrap(), &a);
    }

    #[test]
    fn test_mismatched_shapes_fail() {
        let m = Matrix::default();
        let m1 = Matrix::new(6, 9);

        assert!(matches!(
            m.add(&m1),
            Err(MatrixError::DimensionMismatch { op: "add", .. })
        ));
        assert!(matches!(
            m.subtract(&m1),
            Err(MatrixError::DimensionMismatch { op: "subtract", .. })
        ));
        assert!(matches!(
            m.multiply(&m1),
            Err(MatrixError::DimensionMismatch { op: "multiply", .. })
        ));
    }

    #[test]
    fn test_multiply_shapes_and_values() {
        let identity = Matrix::default();
        let zeros = Matrix::from_rows(vec![vec![0.0; 4]; 4]).unwrap();
        let wide = Matrix::from_rows(vec![vec![0.0, 1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0, 7.0]]).unwrap();

        let product = identity.multiply(&zeros).unwrap();
        assert_eq!((product.rows(), product.columns()), (4, 4));
        assert_eq!(product.get(3, 3), 0.0);

        let product = wide.multiply(&identity).unwrap();
        assert_eq!((product.rows(), product.columns()), (2, 4));
        assert_eq!(product, wide);

        let tall = Matrix::new(4, 3);
        let product = wide.multiply(&tall).unwrap();
        assert_eq!((product.rows(), product.columns()), (2, 3));
        assert_eq!(product.get(1, 2), 6.0);
    }

    #[test]
    fn test_column_major_order() {
        let m = Matrix::from_rows(vec![vec![0.0, 1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0, 7.0]]).unwrap();
        assert_eq!(
            m.to_column_major(),
            vec![0.0, 4.0, 1.0, 5.0, 2.0, 6.0, 3.0, 7.0]
        );
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let rotation = Matrix::rotate(0.0, 0.0, 1.0, 0.0).unwrap();
        assert_matrix_eq(&rotation, &Matrix::identity(4));
    }

    #[test]
    fn test_rotation_normalizes_axis() {
        let unit = Matrix::rotate(90.0, 0.0, 0.0, 1.0).unwrap();
        let long = Matrix::rotate(90.0, 0.0, 0.0, 5.0).unwrap();
        assert_matrix_eq(&unit, &long);

        // x axis maps onto y for a quarter turn about z
        let x = Matrix::from_rows(vec![vec![1.0], vec![0.0], vec![0.0], vec![1.0]]).unwrap();
        let rotated = unit.multiply(&x).unwrap();
        assert_relative_eq!(rotated.get(0, 0), 0.0, epsilon = 1e-12);
        assert_relative_eq!(rotated.get(1, 0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_axis_rejected() {
        assert!(matches!(
            Matrix::rotate(45.0, 0.0, 0.0, 0.0),
            Err(MatrixError::DegenerateAxis { .. })
        ));
        assert!(Matrix::rotate(45.0, f64::NAN, 1.0, 0.0).is_err());
    }

    #[test]
    fn test_translation_inverse() {
        let forward = Matrix::translate(1.5, -2.0, 3.0);
        let back = Matrix::translate(-1.5, 2.0, -3.0);
        assert_matrix_eq(&forward.multiply(&back).unwrap(), &Matrix::identity(4));
    }

    #[test]
    fn test_scale_keeps_homogeneous_one() {
        let m = Matrix::scale(2.0, 3.0, 4.0);
        assert_eq!(m.get(0, 0), 2.0);
        assert_eq!(m.get(1, 1), 3.0);
        assert_eq!(m.get(2, 2), 4.0);
        assert_eq!(m.get(3, 3), 1.0);
    }

    #[test]
    fn test_projections() {
        let frustum = Frustum::new(-2.0, 2.0, -1.0, 1.0, 6.0, 200.0);

        let ortho = Matrix::orthographic(&frustum);
        assert_relative_eq!(ortho.get(0, 0), 0.5);
        assert_relative_eq!(ortho.get(1, 1), 1.0);
        assert_relative_eq!(ortho.get(2, 2), -2.0 / 194.0);
        assert_relative_eq!(ortho.get(2, 3), -206.0 / 194.0);

        let perspective = Matrix::perspective(&frustum);
        assert_relative_eq!(perspective.get(0, 0), 3.0);
        assert_relative_eq!(perspective.get(1, 1), 6.0);
        assert_relative_eq!(perspective.get(2, 3), -2400.0 / 194.0);
        assert_eq!(perspective.get(3, 2), -1.0);
        assert_eq!(perspective.get(3, 3), 0.0);
    }

    #[test]
    fn test_from_descriptor_selects_constructor() {
        let m = Matrix::from_descriptor(&TransformDescriptor::Translate {
            x: 1.0,
            y: 2.0,
            z: 3.0,
        })
        .unwrap();
        assert_eq!(m, Matrix::translate(1.0, 2.0, 3.0));

        let result = Matrix::from_descriptor(&TransformDescriptor::Rotate {
            angle: 10.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_to_matrix4() {
        let m = Matrix::translate(1.0, 2.0, 3.0).to_matrix4().unwrap();
        assert_eq!(m[(0, 3)], 1.0);
        assert_eq!(m[(2, 3)], 3.0);
        assert!(Matrix::new(2, 4).to_matrix4().is_err());
    }
}
