/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;
use clock3d_core::{projection, Camera, Mesh, NodeContent, NodeId, Rgb, SceneGraph};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Light reaching surfaces that face away from the camera
const AMBIENT: f32 = 0.2;

/// Text drawn over the rasterized frame
#[derive(Debug, Clone)]
struct Overlay {
    x: usize,
    y: usize,
    text: String,
    color: Rgb,
}

/// ASCII renderer that converts a scene graph to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Rgb>,
    overlays: Vec<Overlay>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Rgb::gray(0); size],
            overlays: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Rgb::gray(0));
        self.overlays.clear();
    }

    /// Rasterize `root` and everything below it
    pub fn render_scene(&mut self, scene: &SceneGraph, root: NodeId, camera: &Camera) {
        let view_projection = camera.view_projection();
        let light = camera.view_direction();

        scene.traverse(root, |_, node, world| match &node.content {
            NodeContent::Group => {}
            NodeContent::Mesh { mesh, color } => {
                self.render_mesh(mesh, world, &view_projection, &light, *color);
            }
            NodeContent::Label { text, color, .. } => {
                self.queue_label(text, world, camera, *color);
            }
        });
    }

    fn render_mesh(
        &mut self,
        mesh: &Mesh,
        model_matrix: &Matrix4<f32>,
        view_projection: &Matrix4<f32>,
        light: &Vector3<f32>,
        color: Rgb,
    ) {
        let mvp = view_projection * model_matrix;

        for triangle in &mesh.triangles {
            // Project vertices to screen space
            let mut screen_coords = [(0.0, 0.0, 0.0); 3];
            let mut visible = true;
            for (slot, vertex) in screen_coords.iter_mut().zip(&triangle.vertices) {
                match projection::project(&mvp, &vertex.position, self.width as u32, self.height as u32) {
                    Some(coords) => *slot = coords,
                    None => visible = false,
                }
            }
            if !visible {
                continue;
            }

            // Shade by the world-space face normal against the view direction
            let normal = model_matrix
                .transform_vector(&triangle.calculate_normal())
                .normalize();
            let brightness = normal.dot(light).max(0.0);
            let intensity = AMBIENT + (1.0 - AMBIENT) * brightness;

            // Map brightness to character
            let char_index = (intensity * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
            let char_index = char_index.min(LUMINOSITY_RAMP.len() - 1);
            let character = LUMINOSITY_RAMP[char_index];

            self.rasterize_triangle(&screen_coords, character, color.shade(intensity));
        }
    }

    fn queue_label(&mut self, text: &str, world: &Matrix4<f32>, camera: &Camera, color: Rgb) {
        if let Some((x, y, _)) = camera.project_to_screen(
            &Point3::origin(),
            world,
            self.width as u32,
            self.height as u32,
        ) {
            let half = text.chars().count() / 2;
            self.overlays.push(Overlay {
                x: (x as usize).saturating_sub(half),
                y: (y as usize).min(self.height.saturating_sub(1)),
                text: text.to_string(),
                color,
            });
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Rgb) {
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) = barycentric(
                    (v0.0, v0.1),
                    (v1.0, v1.1),
                    (v2.0, v2.1),
                    (px, py),
                ) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = character;
                            self.color_buffer[idx] = color;
                        }
                    }
                }
            }
        }
    }

    /// Character at a cell, `None` outside the frame
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    /// Number of cells covered by geometry this frame
    pub fn covered_cells(&self) -> usize {
        self.depth_buffer.iter().filter(|d| d.is_finite()).count()
    }

    /// Label texts queued for the overlay pass, in scene order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.overlays.iter().map(|overlay| overlay.text.as_str())
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(MoveTo(0, y as u16))?;
            let mut current = None;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(to_color(color)))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }

        // Labels sit on the face: draw them over whatever lies beneath
        for overlay in &self.overlays {
            let idx = overlay.y * self.width + overlay.x.min(self.width.saturating_sub(1));
            let beneath = self.color_buffer.get(idx).copied().unwrap_or(Rgb::gray(0));
            writer.queue(MoveTo(overlay.x as u16, overlay.y as u16))?;
            writer.queue(SetBackgroundColor(to_color(beneath)))?;
            writer.queue(SetForegroundColor(to_color(overlay.color)))?;
            writer.queue(Print(&overlay.text))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
