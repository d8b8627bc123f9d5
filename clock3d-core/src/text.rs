/// Extruded text geometry built from typeface outlines
use nalgebra::{Point2, Vector3};

use crate::font::outline::{PathCommand, Point};
use crate::font::{Font, Glyph};
use crate::geometry::{BoundingBox, Mesh, Triangle, Vertex};

/// Straight segments used to approximate each curve command
pub const CURVE_SEGMENTS: usize = 6;

/// Text laid out along +X with glyphs growing towards +Y and extruded
/// towards +Z. Only the outline walls are tessellated.
#[derive(Debug, Clone)]
pub struct TextGeometry {
    pub text: String,
    pub mesh: Mesh,
}

impl TextGeometry {
    pub fn new(text: &str, font: &Font, size: f32, height: f32) -> Self {
        let scale = font.scale(size);
        let line_advance = font.line_height * scale;
        let mut mesh = Mesh::new();
        let mut origin = Point2::new(0.0, 0.0);

        for character in text.chars() {
            if character == '\n' {
                origin = Point2::new(0.0, origin.y - line_advance);
                continue;
            }
            let Some(glyph) = font.glyph(character) else {
                log::warn!("font {:?} has no glyph for {character:?}", font.family);
                continue;
            };
            for contour in glyph_contours(glyph, scale, origin) {
                extrude_contour(&mut mesh, &contour, height);
            }
            origin.x += glyph.advance * scale;
        }

        Self {
            text: text.to_string(),
            mesh,
        }
    }

    /// Recenter the geometry on its own bounding box
    pub fn center(&mut self) {
        self.mesh.center();
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        self.mesh.bounding_box()
    }
}

/// Flatten a glyph's outline into closed polylines in world units
fn glyph_contours(glyph: &Glyph, scale: f32, origin: Point2<f32>) -> Vec<Vec<Point2<f32>>> {
    let place = |(x, y): Point| Point2::new(x * scale + origin.x, y * scale + origin.y);
    let mut contours = Vec::new();
    let mut current: Vec<Point2<f32>> = Vec::new();

    for command in &glyph.commands {
        match *command {
            PathCommand::MoveTo(p) => {
                flush(&mut contours, &mut current);
                current.push(place(p));
            }
            PathCommand::LineTo(p) => current.push(place(p)),
            PathCommand::QuadTo { control, to } => {
                let start = current.last().copied().unwrap_or_else(|| place(to));
                let (c, end) = (place(control), place(to));
                current.extend((1..=CURVE_SEGMENTS).map(|i| {
                    let t = i as f32 / CURVE_SEGMENTS as f32;
                    let u = 1.0 - t;
                    Point2::from(start.coords * (u * u) + c.coords * (2.0 * u * t) + end.coords * (t * t))
                }));
            }
            PathCommand::CubicTo {
                control1,
                control2,
                to,
            } => {
                let start = current.last().copied().unwrap_or_else(|| place(to));
                let (c1, c2, end) = (place(control1), place(control2), place(to));
                current.extend((1..=CURVE_SEGMENTS).map(|i| {
                    let t = i as f32 / CURVE_SEGMENTS as f32;
                    let u = 1.0 - t;
                    Point2::from(
                        start.coords * (u * u * u)
                            + c1.coords * (3.0 * u * u * t)
                            + c2.coords * (3.0 * u * t * t)
                            + end.coords * (t * t * t),
                    )
                }));
            }
            PathCommand::Close => flush(&mut contours, &mut current),
        }
    }
    flush(&mut contours, &mut current);
    contours
}

fn flush(contours: &mut Vec<Vec<Point2<f32>>>, current: &mut Vec<Point2<f32>>) {
    let contour = std::mem::take(current);
    if contour.len() >= 2 {
        contours.push(contour);
    }
}

/// Add one wall quad per edge of the closed polyline
fn extrude_contour(mesh: &mut Mesh, points: &[Point2<f32>], height: f32) {
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        let edge = b - *a;
        if edge.norm() < 1e-6 {
            continue;
        }
        let normal = Vector3::new(edge.y, -edge.x, 0.0).normalize();
        let vertex = |p: &Point2<f32>, z: f32| Vertex::new(p.x, p.y, z, normal.x, normal.y, normal.z);
        let (a0, b0) = (vertex(a, 0.0), vertex(&b, 0.0));
        let (a1, b1) = (vertex(a, height), vertex(&b, height));
        mesh.add_triangle(Triangle::new(a0, b0, b1));
        mesh.add_triangle(Triangle::new(a0, b1, a1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::source::testing::builtin_font;

    #[test]
    fn test_text_geometry_spans_glyphs() {
        let font = builtin_font();
        let one = TextGeometry::new("1", &font, 0.5, 0.02);
        let twelve = TextGeometry::new("12", &font, 0.5, 0.02);
        assert!(!one.mesh.is_empty());

        let one_width = one.bounding_box().unwrap().size().x;
        let twelve_width = twelve.bounding_box().unwrap().size().x;
        assert!(twelve_width > one_width);

        let size = twelve.bounding_box().unwrap().size();
        assert!((size.y - 0.35).abs() < 1e-4);
        assert!((size.z - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_center_recenters_on_bounds() {
        let font = builtin_font();
        let mut text = TextGeometry::new("VIII", &font, 0.5, 0.02);
        assert!(text.bounding_box().unwrap().min.x >= 0.0);
        text.center();
        let center = text.bounding_box().unwrap().center();
        assert!(center.coords.norm() < 1e-5);
    }

    #[test]
    fn test_curves_are_flattened() {
        let font = builtin_font();
        let seven = TextGeometry::new("7", &font, 1.0, 0.1);
        // Five straight edges; the closing point coincides with the start
        let straight_edges = 5;
        assert_eq!(
            seven.mesh.triangles.len(),
            2 * (straight_edges + 2 * CURVE_SEGMENTS)
        );
    }

    #[test]
    fn test_missing_glyphs_are_skipped() {
        let font = builtin_font();
        let text = TextGeometry::new("?", &font, 0.5, 0.02);
        assert!(text.mesh.is_empty());
        assert!(text.bounding_box().is_none());
    }

    #[test]
    fn test_newline_starts_lower_line() {
        let font = builtin_font();
        let single = TextGeometry::new("1", &font, 0.5, 0.02);
        let double = TextGeometry::new("1\n1", &font, 0.5, 0.02);
        let single_height = single.bounding_box().unwrap().size().y;
        let double_height = double.bounding_box().unwrap().size().y;
        assert!(double_height > single_height * 2.0);
    }
}
