/// Procedural geometry generators
///
/// Each generator returns a [`Geometry`] ready to hand to a
/// [`ShapeBuilder`](crate::scene::ShapeBuilder). Band-based shapes share the
/// same grid indexing: `bands + 1` vertices per ring (the seam is duplicated so
/// texture coordinates can wrap), two triangles per grid cell.

use std::f64::consts::PI;

use crate::geometry::Geometry;

/// Axis-aligned cube spanning `-1.0..=1.0` on every axis, as 12 triangles
pub fn cube() -> Geometry {
    let vertices = vec![
        [-1.0, -1.0, 1.0],
        [1.0, -1.0, 1.0],
        [1.0, 1.0, 1.0],
        [-1.0, 1.0, 1.0],
        [-1.0, -1.0, -1.0],
        [1.0, -1.0, -1.0],
        [1.0, 1.0, -1.0],
        [-1.0, 1.0, -1.0],
    ];

    // counter-clockwise seen from outside
    let indices = vec![
        // front
        vec![0, 1, 2],
        vec![0, 2, 3],
        // back
        vec![5, 4, 7],
        vec![5, 7, 6],
        // top
        vec![3, 2, 6],
        vec![3, 6, 7],
        // bottom
        vec![4, 5, 1],
        vec![4, 1, 0],
        // right
        vec![1, 5, 6],
        vec![1, 6, 2],
        // left
        vec![4, 0, 3],
        vec![4, 3, 7],
    ];

    Geometry::new(vertices, indices)
}

/// UV sphere of `radius` centered on the origin
pub fn sphere(radius: f64, lat_bands: usize, long_bands: usize) -> Geometry {
    let lat_bands = lat_bands.max(2);
    let long_bands = long_bands.max(3);

    let mut vertices = Vec::with_capacity((lat_bands + 1) * (long_bands + 1));
    let mut tex_coords = Vec::with_capacity(vertices.capacity());

    for lat in 0..=lat_bands {
        let theta = lat as f64 * PI / lat_bands as f64;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for long in 0..=long_bands {
            let phi = long as f64 * 2.0 * PI / long_bands as f64;
            let (sin_phi, cos_phi) = phi.sin_cos();

            vertices.push([
                radius * cos_phi * sin_theta,
                radius * cos_theta,
                radius * sin_phi * sin_theta,
            ]);
            tex_coords.push([
                1.0 - long as f64 / long_bands as f64,
                1.0 - lat as f64 / lat_bands as f64,
            ]);
        }
    }

    Geometry::new(vertices, band_indices(lat_bands, long_bands)).with_tex_coords(tex_coords)
}

/// Surface of revolution around the y axis.
///
/// Each `path` point is `[radius, y]`; consecutive points are joined by a
/// ring of `long_bands` quads.
pub fn lathe(path: &[[f64; 2]], long_bands: usize) -> Geometry {
    let long_bands = long_bands.max(3);
    let rings = path.len();

    let mut vertices = Vec::with_capacity(rings * (long_bands + 1));
    let mut tex_coords = Vec::with_capacity(vertices.capacity());

    for (point, &[radius, y]) in path.iter().enumerate() {
        let v = if rings > 1 {
            point as f64 / (rings - 1) as f64
        } else {
            0.0
        };

        for long in 0..=long_bands {
            let phi = long as f64 * 2.0 * PI / long_bands as f64;
            let (sin_phi, cos_phi) = phi.sin_cos();

            vertices.push([radius * cos_phi, y, radius * sin_phi]);
            tex_coords.push([1.0 - long as f64 / long_bands as f64, 1.0 - v]);
        }
    }

    let indices = if rings > 1 {
        band_indices(rings - 1, long_bands)
    } else {
        Vec::new()
    };

    Geometry::new(vertices, indices).with_tex_coords(tex_coords)
}

fn band_indices(bands: usize, long_bands: usize) -> Vec<Vec<usize>> {
    let mut indices = Vec::with_capacity(bands * long_bands * 2);
    for band in 0..bands {
        for long in 0..long_bands {
            let first = band * (long_bands + 1) + long;
            let second = first + long_bands + 1;
            indices.push(vec![first, second, first + 1]);
            indices.push(vec![second, second + 1, first + 1]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{derive_normals, DrawMode, NormalMode};
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_faces_point_outward() {
        let cube = cube();
        assert_eq!(cube.validate(), Ok(()));
        assert_eq!(cube.indices.len(), 12);

        let normals = derive_normals(&cube, DrawMode::Triangles, NormalMode::Flat);
        // front face first
        assert_eq!(&normals[0..3], &[0.0, 0.0, 1.0]);
        // every normal agrees with the direction of its face's first vertex
        for (face, indices) in cube.indices.iter().enumerate() {
            let n = cube.face_normal(face);
            let p = cube.vertices[indices[0]];
            assert!(n.x * p[0] + n.y * p[1] + n.z * p[2] > 0.0, "face {face} points inward");
        }
    }

    #[test]
    fn test_sphere_vertices_on_radius() {
        let sphere = sphere(0.5, 15, 15);
        assert_eq!(sphere.validate(), Ok(()));
        assert_eq!(sphere.vertices.len(), 16 * 16);
        assert_eq!(sphere.indices.len(), 15 * 15 * 2);
        for v in &sphere.vertices {
            let length = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert_relative_eq!(length, 0.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_lathe_rings_and_tex_coords() {
        let path = [[0.0, 1.0], [0.5, 0.5], [0.25, 0.0]];
        let lathe = lathe(&path, 8);
        assert_eq!(lathe.validate(), Ok(()));
        assert_eq!(lathe.vertices.len(), 3 * 9);
        assert_eq!(lathe.indices.len(), 2 * 8 * 2);

        // v runs from the first path point to the last
        assert_relative_eq!(lathe.tex_coords[0][1], 1.0);
        assert_relative_eq!(lathe.tex_coords[9][1], 0.5);
        assert_relative_eq!(lathe.tex_coords[18][1], 0.0);

        // second ring sits at radius 0.5, height 0.5
        assert_relative_eq!(lathe.vertices[9][0], 0.5);
        assert_relative_eq!(lathe.vertices[9][1], 0.5);
    }

    #[test]
    fn test_single_point_lathe_is_finite() {
        let lathe = lathe(&[[0.3, 0.0]], 6);
        assert!(lathe.indices.is_empty());
        assert!(lathe.is_empty());
        assert!(lathe.tex_coords.iter().flatten().all(|t| t.is_finite()));
    }
}
