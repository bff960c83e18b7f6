/// Local transform records of a scene node and their matrix composition

use serde::{Deserialize, Serialize};

use crate::error::MatrixError;
use crate::matrix::Matrix;

/// Translation along the three axes
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Translation {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Translation {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Rotation of `angle` degrees about the axis `(x, y, z)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    pub angle: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Rotation {
    pub fn new(angle: f64, x: f64, y: f64, z: f64) -> Self {
        Self { angle, x, y, z }
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, 0.0)
    }
}

/// Per-axis scale factors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Scale {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn uniform(s: f64) -> Self {
        Self::new(s, s, s)
    }
}

impl Default for Scale {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

/// The scalar transform components an animation can drive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    TranslateX,
    TranslateY,
    TranslateZ,
    ScaleX,
    ScaleY,
    ScaleZ,
    RotateX,
    RotateY,
    RotateZ,
    RotateAngle,
}

impl Property {
    pub const COUNT: usize = 10;

    pub const ALL: [Property; Property::COUNT] = [
        Property::TranslateX,
        Property::TranslateY,
        Property::TranslateZ,
        Property::ScaleX,
        Property::ScaleY,
        Property::ScaleZ,
        Property::RotateX,
        Property::RotateY,
        Property::RotateZ,
        Property::RotateAngle,
    ];

    /// Stable position of this property inside [`Property::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Translate, rotate and scale of a single node, relative to its parent
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub translate: Translation,
    pub rotate: Rotation,
    pub scale: Scale,
}

impl Transform {
    pub fn new(translate: Translation, rotate: Rotation, scale: Scale) -> Self {
        Self {
            translate,
            rotate,
            scale,
        }
    }

    pub fn get(&self, property: Property) -> f64 {
        match property {
            Property::TranslateX => self.translate.x,
            Property::TranslateY => self.translate.y,
            Property::TranslateZ => self.translate.z,
            Property::ScaleX => self.scale.x,
            Property::ScaleY => self.scale.y,
            Property::ScaleZ => self.scale.z,
            Property::RotateX => self.rotate.x,
            Property::RotateY => self.rotate.y,
            Property::RotateZ => self.rotate.z,
            Property::RotateAngle => self.rotate.angle,
        }
    }

    pub fn set(&mut self, property: Property, value: f64) {
        let slot = match property {
            Property::TranslateX => &mut self.translate.x,
            Property::TranslateY => &mut self.translate.y,
            Property::TranslateZ => &mut self.translate.z,
            Property::ScaleX => &mut self.scale.x,
            Property::ScaleY => &mut self.scale.y,
            Property::ScaleZ => &mut self.scale.z,
            Property::RotateX => &mut self.rotate.x,
            Property::RotateY => &mut self.rotate.y,
            Property::RotateZ => &mut self.rotate.z,
            Property::RotateAngle => &mut self.rotate.angle,
        };
        *slot = value;
    }

    /// Create a translation matrix
    pub fn translation_matrix(&self) -> Matrix {
        let t = self.translate;
        Matrix::translate(t.x, t.y, t.z)
    }

    /// Create a rotation matrix; fails for an axis without direction
    pub fn rotation_matrix(&self) -> Result<Matrix, MatrixError> {
        let r = self.rotate;
        Matrix::rotate(r.angle, r.x, r.y, r.z)
    }

    /// Create a scale matrix
    pub fn scale_matrix(&self) -> Matrix {
        let s = self.scale;
        Matrix::scale(s.x, s.y, s.z)
    }

    /// `T x R x S`: scale first, then rotate, then translate
    pub fn local_matrix(&self) -> Result<Matrix, MatrixError> {
        let rotate_scale = self.rotation_matrix()?.multiply(&self.scale_matrix())?;
        self.translation_matrix().multiply(&rotate_scale)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix,
        view: &Matrix,
        projection: &Matrix,
    ) -> Result<Matrix, MatrixError> {
        projection.multiply(&view.multiply(model)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn apply(m: &Matrix, p: [f64; 3]) -> [f64; 3] {
        let v = Matrix::from_rows(vec![vec![p[0]], vec![p[1]], vec![p[2]], vec![1.0]]).unwrap();
        let r = m.multiply(&v).unwrap();
        [r.get(0, 0), r.get(1, 0), r.get(2, 0)]
    }

    #[test]
    fn test_defaults() {
        let transform = Transform::default();
        assert_eq!(transform.translate, Translation::new(0.0, 0.0, 0.0));
        assert_eq!(transform.rotate.angle, 0.0);
        assert_eq!(transform.rotate.y, 1.0);
        assert_eq!(transform.scale.z, 1.0);
    }

    #[test]
    fn test_identity_local_matrix() {
        let matrix = Transform::default().local_matrix().unwrap();
        assert_eq!(matrix, Matrix::identity(4));
    }

    #[test]
    fn test_scale_then_rotate_then_translate() {
        let transform = Transform::new(
            Translation::new(10.0, 0.0, 0.0),
            Rotation::new(90.0, 0.0, 0.0, 1.0),
            Scale::new(2.0, 1.0, 1.0),
        );
        let p = apply(&transform.local_matrix().unwrap(), [1.0, 0.0, 0.0]);

        // (1,0,0) -> scale (2,0,0) -> rotate (0,2,0) -> translate (10,2,0)
        assert_relative_eq!(p[0], 10.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_property_access() {
        let mut transform = Transform::default();
        for (i, property) in Property::ALL.iter().enumerate() {
            assert_eq!(property.index(), i);
            transform.set(*property, i as f64 + 0.5);
        }
        assert_eq!(transform.translate.x, 0.5);
        assert_eq!(transform.scale.y, 4.5);
        assert_eq!(transform.rotate.z, 8.5);
        assert_eq!(transform.get(Property::RotateAngle), 9.5);
    }

    #[test]
    fn test_degenerate_rotation_axis() {
        let mut transform = Transform::default();
        transform.rotate = Rotation::new(30.0, 0.0, 0.0, 0.0);
        assert!(transform.local_matrix().is_err());
    }
}
