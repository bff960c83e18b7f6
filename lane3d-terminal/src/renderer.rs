/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use lane3d_core::{DrawCall, DrawMode, FrameState, Light, Renderer, SceneError};
use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;

/// A vertex after projection and lighting
#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    x: f64,
    y: f64,
    depth: f64,
    color: Vector3<f64>,
}

/// ASCII renderer that turns scene draw calls into terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<char>,
    color_buffer: Vec<TermColor>,
    view_projection: Matrix4<f64>,
    eye: Point3<f64>,
    light: Light,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![TermColor::Reset; size],
            view_projection: Matrix4::identity(),
            eye: Point3::origin(),
            light: Light::default(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Width over height of the drawable area, corrected for tall cells
    pub fn aspect(&self) -> f64 {
        if self.height == 0 {
            return 1.0;
        }
        self.width as f64 / (self.height as f64 * CELL_ASPECT)
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self {
            view_projection: self.view_projection,
            eye: self.eye,
            light: self.light,
            ..Self::new(width, height)
        };
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(TermColor::Reset);
    }

    /// Character at a cell, mostly useful for inspecting a finished frame
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Number of cells covered by anything this frame
    pub fn covered_cells(&self) -> usize {
        self.char_buffer.iter().filter(|&&c| c != ' ').count()
    }

    /// Transform, project and light the `index`-th vertex of a draw call.
    /// Vertices behind the camera yield `None`.
    fn shade_vertex(
        &self,
        call: &DrawCall,
        model: &Matrix4<f64>,
        normal_matrix: &Matrix3<f64>,
        index: usize,
    ) -> Option<ScreenVertex> {
        let at = |stream: &[f64]| {
            Vector3::new(stream[3 * index], stream[3 * index + 1], stream[3 * index + 2])
        };

        let local = at(call.positions);
        let world = model * Vector4::new(local.x, local.y, local.z, 1.0);
        let clip = self.view_projection * world;
        if clip.w <= 1e-6 {
            return None;
        }

        let ndc = clip.xyz() / clip.w;
        let normal = (normal_matrix * at(call.normals))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        Some(ScreenVertex {
            x: (ndc.x + 1.0) * 0.5 * self.width as f64,
            y: (1.0 - ndc.y) * 0.5 * self.height as f64,
            depth: ndc.z,
            color: self.lighting(
                Point3::from(world.xyz()),
                normal,
                at(call.colors),
                at(call.specular_colors),
                call.shininess,
            ),
        })
    }

    /// Ambient plus Lambert diffuse plus Phong specular
    fn lighting(
        &self,
        position: Point3<f64>,
        normal: Vector3<f64>,
        diffuse: Vector3<f64>,
        specular: Vector3<f64>,
        shininess: f64,
    ) -> Vector3<f64> {
        let light = &self.light;
        let ambient = Vector3::from(light.ambient.to_array()).component_mul(&diffuse);

        let to_light = if light.is_directional() {
            Vector3::from(light.position3())
        } else {
            Point3::from(light.position3()) - position
        };
        let Some(to_light) = to_light.try_normalize(f64::EPSILON) else {
            return ambient;
        };

        let lambert = normal.dot(&to_light).max(0.0);
        let mut color =
            ambient + Vector3::from(light.diffuse.to_array()).component_mul(&diffuse) * lambert;

        if lambert > 0.0 {
            if let Some(to_eye) = (self.eye - position).try_normalize(f64::EPSILON) {
                let reflected = 2.0 * normal.dot(&to_light) * normal - to_light;
                let highlight = reflected.dot(&to_eye).max(0.0).powf(shininess);
                color += Vector3::from(light.specular.to_array()).component_mul(&specular) * highlight;
            }
        }
        color.map(|c| c.clamp(0.0, 1.0))
    }

    fn rasterize_triangle(&mut self, v: [ScreenVertex; 3]) {
        // Bounding box
        let min_x = v[0].x.min(v[1].x).min(v[2].x).floor() as i64;
        let max_x = v[0].x.max(v[1].x).max(v[2].x).ceil() as i64;
        let min_y = v[0].y.min(v[1].y).min(v[2].y).floor() as i64;
        let max_y = v[0].y.max(v[1].y).max(v[2].y).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f64 + 0.5, y as f64 + 0.5);
                let Some((w0, w1, w2)) = barycentric(
                    (v[0].x, v[0].y),
                    (v[1].x, v[1].y),
                    (v[2].x, v[2].y),
                    p,
                ) else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v[0].depth + w1 * v[1].depth + w2 * v[2].depth;
                let color = v[0].color * w0 + v[1].color * w1 + v[2].color * w2;
                self.plot(x as usize, y as usize, depth, color);
            }
        }
    }

    fn rasterize_line(&mut self, a: ScreenVertex, b: ScreenVertex) {
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil().max(1.0) as usize;
        for step in 0..=steps {
            let t = step as f64 / steps as f64;
            let x = a.x + (b.x - a.x) * t;
            let y = a.y + (b.y - a.y) * t;
            if x < 0.0 || y < 0.0 || x >= self.width as f64 || y >= self.height as f64 {
                continue;
            }
            let depth = a.depth + (b.depth - a.depth) * t;
            let color = a.color.lerp(&b.color, t);
            self.plot(x as usize, y as usize, depth, color);
        }
    }

    fn plot(&mut self, x: usize, y: usize, depth: f64, color: Vector3<f64>) {
        if !(-1.0..=1.0).contains(&depth) {
            return;
        }
        let idx = y * self.width + x;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = luminosity_char(color);
            self.color_buffer[idx] = TermColor::Rgb {
                r: (color.x * 255.0).round() as u8,
                g: (color.y * 255.0).round() as u8,
                b: (color.z * 255.0).round() as u8,
            };
        }
    }

    /// Queue the frame, one row per terminal line starting at `top`
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, top.saturating_add(y as u16)))?;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    fn begin_frame(&mut self, frame: &FrameState) -> Result<(), SceneError> {
        self.clear();
        let view = frame.view.to_matrix4()?;
        let projection = frame.projection.to_matrix4()?;
        self.view_projection = projection * view;
        self.eye = view
            .try_inverse()
            .map(|inverse| inverse.transform_point(&Point3::origin()))
            .unwrap_or_else(Point3::origin);
        self.light = *frame.light;
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall) -> Result<(), SceneError> {
        let model = call.model.to_matrix4()?;
        let linear = model.fixed_view::<3, 3>(0, 0).into_owned();
        let normal_matrix = linear
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or(linear);

        let vertices: Vec<Option<ScreenVertex>> = (0..call.vertex_count())
            .map(|i| self.shade_vertex(call, &model, &normal_matrix, i))
            .collect();

        match call.mode {
            DrawMode::Triangles => {
                for triangle in vertices.chunks_exact(3) {
                    // Triangles reaching behind the camera are clipped whole
                    if let [Some(a), Some(b), Some(c)] = *triangle {
                        self.rasterize_triangle([a, b, c]);
                    }
                }
            }
            DrawMode::Lines => {
                for segment in vertices.chunks_exact(2) {
                    if let [Some(a), Some(b)] = *segment {
                        self.rasterize_line(a, b);
                    }
                }
            }
        }
        Ok(())
    }
}

fn luminosity_char(color: Vector3<f64>) -> char {
    let luminance = 0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z;
    let last = LUMINOSITY_RAMP.len() - 1;
    // covered cells never fall back to blank
    let index = ((luminance * last as f64).round() as usize).clamp(1, last);
    LUMINOSITY_RAMP[index]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
