/// Geometry primitives for 3D rendering
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Point3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }

    fn at(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        Self { position, normal }
    }
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

impl Triangle {
    pub fn new(v0: Vertex, v1: Vertex, v2: Vertex) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    /// Calculate the face normal from the triangle's vertices
    pub fn calculate_normal(&self) -> Vector3<f32> {
        let v0 = self.vertices[0].position;
        let v1 = self.vertices[1].position;
        let v2 = self.vertices[2].position;

        let edge1 = v1 - v0;
        let edge2 = v2 - v0;

        edge1.cross(&edge2).normalize()
    }
}

/// Axis-aligned bounds of a mesh
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point3<f32>,
    pub max: Point3<f32>,
}

impl BoundingBox {
    pub fn center(&self) -> Point3<f32> {
        nalgebra::center(&self.min, &self.max)
    }

    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// A 3D mesh composed of triangles
#[derive(Debug, Clone)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            triangles: Vec::with_capacity(capacity),
        }
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Bounds over every vertex, or `None` for an empty mesh
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut vertices = self.triangles.iter().flat_map(|t| t.vertices.iter());
        let first = vertices.next()?.position;
        let (min, max) = vertices.fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        });
        Some(BoundingBox { min, max })
    }

    /// Move every vertex by `offset`
    pub fn translate(&mut self, offset: &Vector3<f32>) {
        for vertex in self.triangles.iter_mut().flat_map(|t| t.vertices.iter_mut()) {
            vertex.position += *offset;
        }
    }

    /// Recenter the mesh on its own bounding box
    pub fn center(&mut self) {
        if let Some(bounds) = self.bounding_box() {
            let offset = Point3::origin() - bounds.center();
            self.translate(&offset);
        }
    }

    /// Build a (possibly tapered) cylinder around the Y axis.
    ///
    /// The cylinder is centred on the origin with its top cap at
    /// `+height / 2`. A cap whose radius is zero is omitted.
    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> Self {
        let segments = segments.max(3);
        let half = height / 2.0;
        let slope = (radius_bottom - radius_top) / height;
        let mut mesh = Self::with_capacity(segments as usize * 4);

        let ring = |i: u32, radius: f32, y: f32| {
            let theta = i as f32 / segments as f32 * std::f32::consts::TAU;
            let (sin, cos) = theta.sin_cos();
            let position = Point3::new(radius * sin, y, radius * cos);
            let normal = Vector3::new(sin, slope, cos).normalize();
            Vertex::at(position, normal)
        };

        let top_center = Vertex::new(0.0, half, 0.0, 0.0, 1.0, 0.0);
        let bottom_center = Vertex::new(0.0, -half, 0.0, 0.0, -1.0, 0.0);

        for i in 0..segments {
            let t0 = ring(i, radius_top, half);
            let t1 = ring(i + 1, radius_top, half);
            let b0 = ring(i, radius_bottom, -half);
            let b1 = ring(i + 1, radius_bottom, -half);

            // Side wall
            mesh.add_triangle(Triangle::new(b0, b1, t1));
            mesh.add_triangle(Triangle::new(b0, t1, t0));

            if radius_top > 0.0 {
                let up = Vector3::y();
                mesh.add_triangle(Triangle::new(
                    top_center,
                    Vertex::at(t0.position, up),
                    Vertex::at(t1.position, up),
                ));
            }
            if radius_bottom > 0.0 {
                let down = -Vector3::y();
                mesh.add_triangle(Triangle::new(
                    bottom_center,
                    Vertex::at(b1.position, down),
                    Vertex::at(b0.position, down),
                ));
            }
        }

        mesh
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}

impl Extend<Triangle> for Mesh {
    fn extend<I: IntoIterator<Item = Triangle>>(&mut self, iter: I) {
        self.triangles.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cylinder_triangle_count() {
        let mesh = Mesh::cylinder(1.0, 2.0, 3.0, 16);
        assert_eq!(mesh.triangles.len(), 16 * 4);

        let cone = Mesh::cylinder(0.0, 1.0, 1.0, 16);
        assert_eq!(cone.triangles.len(), 16 * 3);
    }

    #[test]
    fn test_cylinder_extents() {
        let mesh = Mesh::cylinder(1.0, 2.0, 3.0, 32);
        let bounds = mesh.bounding_box().unwrap();
        assert!((bounds.max.y - 1.5).abs() < 1e-6);
        assert!((bounds.min.y + 1.5).abs() < 1e-6);
        assert!((bounds.max.x - 2.0).abs() < 1e-3);
        assert!((bounds.max.z - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_cylinder_caps_face_outward() {
        let mesh = Mesh::cylinder(1.0, 1.0, 1.0, 8);
        let up = mesh
            .triangles
            .iter()
            .filter(|t| t.vertices.iter().all(|v| (v.position.y - 0.5).abs() < 1e-6))
            .map(Triangle::calculate_normal);
        for normal in up {
            assert!((normal.y - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_center_moves_bounds_to_origin() {
        let mut mesh = Mesh::cylinder(1.0, 1.0, 1.0, 8);
        mesh.translate(&Vector3::new(3.0, -2.0, 5.0));
        mesh.center();
        let center = mesh.bounding_box().unwrap().center();
        assert!(center.coords.norm() < 1e-5);
    }

    #[test]
    fn test_empty_mesh_has_no_bounds() {
        let mut mesh = Mesh::new();
        assert!(mesh.bounding_box().is_none());
        mesh.center();
        assert!(mesh.is_empty());
    }
}
