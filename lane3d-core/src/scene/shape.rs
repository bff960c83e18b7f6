/// Scene nodes and the builder used to describe them

use log::trace;

use crate::error::SceneError;
use crate::geometry::{
    derive_color_array, derive_draw_array, derive_normals, derive_tex_coords, Color, DrawMode,
    Geometry, NormalMode,
};
use crate::transform::{Rotation, Scale, Transform, Translation};

use super::NodeId;

pub const DEFAULT_SHININESS: f64 = 2.0;

/// Flattened per-vertex streams, one entry per emitted vertex
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawArrays {
    pub positions: Vec<f64>,
    pub normals: Vec<f64>,
    pub colors: Vec<f64>,
    pub specular_colors: Vec<f64>,
    pub tex_coords: Vec<f64>,
}

impl DrawArrays {
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Description of a node (and its subtree) before it joins a graph.
///
/// Cloning a builder and inserting it twice yields two independent subtrees.
#[derive(Debug, Clone)]
pub struct ShapeBuilder {
    name: Option<String>,
    geometry: Geometry,
    transform: Transform,
    mode: DrawMode,
    normal_mode: NormalMode,
    color: Color,
    specular_color: Color,
    colors: Option<Vec<Color>>,
    specular_colors: Option<Vec<Color>>,
    shininess: f64,
    children: Vec<ShapeBuilder>,
}

impl Default for ShapeBuilder {
    fn default() -> Self {
        Self {
            name: None,
            geometry: Geometry::empty(),
            transform: Transform::default(),
            mode: DrawMode::default(),
            normal_mode: NormalMode::default(),
            color: Color::GRAY,
            specular_color: Color::WHITE,
            colors: None,
            specular_colors: None,
            shininess: DEFAULT_SHININESS,
            children: Vec::new(),
        }
    }
}

impl ShapeBuilder {
    /// A drawable node with the given geometry
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    /// A node without geometry that only groups its children
    pub fn group() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn mode(mut self, mode: DrawMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn normal_mode(mut self, normal_mode: NormalMode) -> Self {
        self.normal_mode = normal_mode;
        self
    }

    pub fn transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn translate(mut self, x: f64, y: f64, z: f64) -> Self {
        self.transform.translate = Translation::new(x, y, z);
        self
    }

    pub fn rotate(mut self, angle: f64, x: f64, y: f64, z: f64) -> Self {
        self.transform.rotate = Rotation::new(angle, x, y, z);
        self
    }

    pub fn scale(mut self, x: f64, y: f64, z: f64) -> Self {
        self.transform.scale = Scale::new(x, y, z);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn specular_color(mut self, color: Color) -> Self {
        self.specular_color = color;
        self
    }

    /// Explicit diffuse colors, one per emitted vertex
    pub fn colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = Some(colors);
        self
    }

    /// Explicit specular colors, one per emitted vertex
    pub fn specular_colors(mut self, colors: Vec<Color>) -> Self {
        self.specular_colors = Some(colors);
        self
    }

    pub fn shininess(mut self, shininess: f64) -> Self {
        self.shininess = shininess;
        self
    }

    pub fn child(mut self, child: ShapeBuilder) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = ShapeBuilder>) -> Self {
        self.children.extend(children);
        self
    }

    /// Validate the geometry and derive the draw streams of this node alone.
    /// Children are handed back untouched.
    pub(crate) fn build(self) -> Result<(Shape, Vec<ShapeBuilder>), SceneError> {
        let ShapeBuilder {
            name,
            geometry,
            transform,
            mode,
            normal_mode,
            color,
            specular_color,
            colors,
            specular_colors,
            shininess,
            children,
        } = self;

        geometry.validate()?;

        let mut shape = Shape {
            name,
            geometry,
            transform,
            mode,
            normal_mode,
            color,
            specular_color,
            colors,
            specular_colors,
            shininess,
            arrays: DrawArrays::default(),
            parent: None,
            children: Vec::new(),
        };
        shape.arrays = shape.derive_arrays()?;

        trace!(
            "built shape {:?} with {} vertices",
            shape.name,
            shape.arrays.vertex_count()
        );
        Ok((shape, children))
    }
}

/// A node of the scene graph.
///
/// Geometry, colors and topology are fixed once the node is built; only the
/// transform changes afterwards.
#[derive(Debug, Clone)]
pub struct Shape {
    name: Option<String>,
    geometry: Geometry,
    pub(crate) transform: Transform,
    mode: DrawMode,
    normal_mode: NormalMode,
    color: Color,
    specular_color: Color,
    colors: Option<Vec<Color>>,
    specular_colors: Option<Vec<Color>>,
    shininess: f64,
    arrays: DrawArrays,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Shape {
    /// A named group node; empty geometry has nothing to validate or derive
    pub(crate) fn group(name: impl Into<String>) -> Self {
        let ShapeBuilder {
            geometry,
            transform,
            mode,
            normal_mode,
            color,
            specular_color,
            colors,
            specular_colors,
            shininess,
            ..
        } = ShapeBuilder::group();
        Self {
            name: Some(name.into()),
            geometry,
            transform,
            mode,
            normal_mode,
            color,
            specular_color,
            colors,
            specular_colors,
            shininess,
            arrays: DrawArrays::default(),
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn mode(&self) -> DrawMode {
        self.mode
    }

    pub fn normal_mode(&self) -> NormalMode {
        self.normal_mode
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn specular_color(&self) -> Color {
        self.specular_color
    }

    pub fn shininess(&self) -> f64 {
        self.shininess
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Group nodes issue no draw call of their own
    pub fn nothing_to_draw(&self) -> bool {
        self.geometry.is_empty()
    }

    /// Cached streams derived when the node was built
    pub fn arrays(&self) -> &DrawArrays {
        &self.arrays
    }

    pub fn derive_draw_array(&self) -> Vec<f64> {
        derive_draw_array(&self.geometry, self.mode)
    }

    pub fn derive_normals(&self) -> Vec<f64> {
        derive_normals(&self.geometry, self.mode, self.normal_mode)
    }

    /// Diffuse and specular streams, one RGB triple per emitted vertex
    pub fn derive_color_arrays(&self) -> Result<(Vec<f64>, Vec<f64>), SceneError> {
        let vertex_count = self.geometry.emitted_vertex_count(self.mode);
        let colors = derive_color_array(
            "diffuse colors",
            self.color,
            self.colors.as_deref(),
            vertex_count,
        )?;
        let specular_colors = derive_color_array(
            "specular colors",
            self.specular_color,
            self.specular_colors.as_deref(),
            vertex_count,
        )?;
        Ok((colors, specular_colors))
    }

    fn derive_arrays(&self) -> Result<DrawArrays, SceneError> {
        let (colors, specular_colors) = self.derive_color_arrays()?;
        Ok(DrawArrays {
            positions: self.derive_draw_array(),
            normals: self.derive_normals(),
            colors,
            specular_colors,
            tex_coords: derive_tex_coords(&self.geometry, self.mode),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes;

    fn build(builder: ShapeBuilder) -> Shape {
        builder.build().unwrap().0
    }

    #[test]
    fn test_empty_node_defaults() {
        let shape = build(ShapeBuilder::group());
        assert!(shape.nothing_to_draw());
        assert_eq!(shape.mode(), DrawMode::Triangles);
        assert_eq!(shape.transform().translate.x, 0.0);
        assert_eq!(shape.transform().rotate.angle, 0.0);
        assert_eq!(shape.transform().rotate.y, 1.0);
        assert_eq!(shape.transform().scale.z, 1.0);
        assert_eq!(shape.color().r, 0.5);
        assert_eq!(shape.shininess(), DEFAULT_SHININESS);
        assert!(shape.children().is_empty());
        assert_eq!(shape.arrays(), &DrawArrays::default());
    }

    #[test]
    fn test_user_defined_fields() {
        let shape = build(
            ShapeBuilder::new(shapes::cube())
                .color(Color::new(1.0, 0.5, 0.0))
                .translate(1.0, 1.0, 1.0)
                .rotate(60.0, 1.0, 1.0, 1.0)
                .scale(0.5, 0.5, 0.5),
        );
        assert!(!shape.nothing_to_draw());
        assert_eq!(shape.color().r, 1.0);
        assert_eq!(shape.transform().scale.x, 0.5);
        assert_eq!(shape.transform().rotate.angle, 60.0);
        assert_eq!(shape.transform().translate.y, 1.0);
    }

    #[test]
    fn test_cube_streams_align() {
        let shape = build(ShapeBuilder::new(shapes::cube()).color(Color::new(1.0, 0.5, 0.0)));
        let arrays = shape.arrays();
        assert_eq!(arrays.vertex_count(), 36);
        assert_eq!(arrays.normals.len(), arrays.positions.len());
        assert_eq!(arrays.colors.len(), arrays.positions.len());
        assert_eq!(arrays.specular_colors.len(), arrays.positions.len());
        assert_eq!(arrays.colors[22], 0.5);
        assert_eq!(arrays.colors[65], 0.0);
        assert_eq!(arrays.specular_colors[0], 1.0);
        assert!(arrays.tex_coords.is_empty());
    }

    #[test]
    fn test_explicit_colors_used_verbatim() {
        let palette = [Color::new(0.9, 0.9, 0.9), Color::new(0.0, 0.0, 1.0)];
        let colors: Vec<Color> = (0..36).map(|i| palette[i / 18]).collect();
        let shape = build(ShapeBuilder::new(shapes::cube()).colors(colors));
        assert_eq!(&shape.arrays().colors[0..3], &[0.9, 0.9, 0.9]);
        assert_eq!(&shape.arrays().colors[105..108], &[0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_misaligned_colors_rejected() {
        let result = ShapeBuilder::new(shapes::cube())
            .specular_colors(vec![Color::WHITE; 8])
            .build();
        assert!(matches!(
            result,
            Err(SceneError::GeometryMismatch {
                attribute: "specular colors",
                expected: 36,
                found: 8
            })
        ));
    }

    #[test]
    fn test_line_mode_doubles_vertices() {
        let shape = build(ShapeBuilder::new(shapes::cube()).mode(DrawMode::Lines));
        assert_eq!(shape.arrays().vertex_count(), 72);
        assert_eq!(shape.arrays().colors.len(), 72 * 3);
    }

    #[test]
    fn test_builder_returns_children() {
        let (_, children) = ShapeBuilder::group()
            .child(ShapeBuilder::new(shapes::cube()))
            .child(ShapeBuilder::group())
            .build()
            .unwrap();
        assert_eq!(children.len(), 2);
    }

    #[test]
    fn test_invalid_geometry_rejected_before_flattening() {
        let short = Geometry::new(vec![[0.0; 3]; 3], vec![vec![0, 1]]);
        assert!(matches!(
            ShapeBuilder::new(short).build(),
            Err(SceneError::DegenerateFace { face: 0, len: 2 })
        ));

        let out_of_range = Geometry::new(vec![[0.0; 3]; 3], vec![vec![0, 1, 7]]);
        assert!(matches!(
            ShapeBuilder::new(out_of_range).mode(DrawMode::Lines).build(),
            Err(SceneError::IndexOutOfRange {
                face: 0,
                index: 7,
                vertex_count: 3
            })
        ));
    }
}
