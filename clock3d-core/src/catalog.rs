/// Static description of the clock's visual parts
use std::f32::consts::{FRAC_PI_2, PI};

use nalgebra::Vector3;

use crate::geometry::Mesh;
use crate::scene::{NodeContent, SceneNode};
use crate::transform::RotationState;

/// Radial tessellation used for every cylinder.
pub const RADIAL_SEGMENTS: u32 = 32;

/// Height above the hub centre at which pointers and numerals sit.
pub const FACE_ELEVATION: f32 = 0.75;

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::new(level, level, level)
    }

    /// Relative luminance in `0.0..=1.0` (Rec. 709 weights)
    pub fn luminance(&self) -> f32 {
        (0.2126 * f32::from(self.r) + 0.7152 * f32::from(self.g) + 0.0722 * f32::from(self.b))
            / 255.0
    }

    /// Scale each channel by `factor`, saturating at white
    pub fn shade(&self, factor: f32) -> Self {
        let scale = |c: u8| (f32::from(c) * factor).clamp(0.0, 255.0) as u8;
        Self::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

pub mod palette {
    use super::Rgb;

    pub const WHITE: Rgb = Rgb::gray(255);
    pub const WHITE1: Rgb = Rgb::gray(204);
    pub const GRAY1: Rgb = Rgb::gray(102);
    pub const GRAY2: Rgb = Rgb::gray(68);
    pub const BLACK1: Rgb = Rgb::gray(51);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
    },
}

/// Immutable primitive descriptor with its parent-relative placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shape {
    pub name: &'static str,
    pub kind: ShapeKind,
    pub color: Rgb,
    pub position: Vector3<f32>,
    pub rotation: RotationState,
}

impl Shape {
    pub fn mesh(&self) -> Mesh {
        match self.kind {
            ShapeKind::Cylinder {
                radius_top,
                radius_bottom,
                height,
            } => Mesh::cylinder(radius_top, radius_bottom, height, RADIAL_SEGMENTS),
        }
    }

    /// Tessellate into a scene node carrying this shape's placement
    pub fn node(&self) -> SceneNode {
        SceneNode::new(
            self.name,
            NodeContent::Mesh {
                mesh: self.mesh(),
                color: self.color,
            },
        )
        .with_position(self.position)
        .with_rotation(self.rotation)
    }
}

/// The three clock hands, in hour/minute/second order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Hour,
    Minute,
    Second,
}

impl PointerKind {
    pub const ALL: [PointerKind; 3] = [PointerKind::Hour, PointerKind::Minute, PointerKind::Second];

    pub const fn index(self) -> usize {
        match self {
            PointerKind::Hour => 0,
            PointerKind::Minute => 1,
            PointerKind::Second => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            PointerKind::Hour => "hour-pointer",
            PointerKind::Minute => "minute-pointer",
            PointerKind::Second => "second-pointer",
        }
    }

    pub const fn shade(self) -> Rgb {
        POINTER_SHADES[self.index()]
    }
}

/// Pointer colours, lightest for the hour hand and darkest for the second hand.
pub const POINTER_SHADES: [Rgb; 3] = [palette::WHITE1, palette::GRAY1, palette::GRAY2];

/// Colour of numeral labels
pub const LABEL_COLOR: Rgb = palette::BLACK1;

/// Dark body of the clock; its wider top shows as the bezel around the rim.
///
/// The hub's top radius (1.5π) is kept larger than the rim's (π/0.75) so the
/// bezel stays visible; only the rim's extra height puts the face on top.
pub fn hub() -> Shape {
    Shape {
        name: "hub",
        kind: ShapeKind::Cylinder {
            radius_top: PI * 18.0 / 12.0,
            radius_bottom: 2.75,
            height: 0.999,
        },
        color: palette::BLACK1,
        position: Vector3::zeros(),
        rotation: RotationState::zero(),
    }
}

/// White face, a hair taller than the hub so it is drawn on top.
pub fn rim() -> Shape {
    Shape {
        name: "rim",
        kind: ShapeKind::Cylinder {
            radius_top: PI / 0.75,
            radius_bottom: 2.75,
            height: 1.0,
        },
        color: palette::WHITE,
        position: Vector3::zeros(),
        rotation: RotationState::zero(),
    }
}

/// Centre cap the pointers turn around.
pub fn ornament() -> Shape {
    Shape {
        name: "ornament",
        kind: ShapeKind::Cylinder {
            radius_top: PI / 16.0,
            radius_bottom: 0.1,
            height: 1.0,
        },
        color: palette::BLACK1,
        position: Vector3::new(0.0, 0.4, 0.0),
        rotation: RotationState::zero(),
    }
}

/// A hand laid flat along +X; its Y rotation is driven by the time.
pub fn pointer(kind: PointerKind) -> Shape {
    Shape {
        name: kind.name(),
        kind: ShapeKind::Cylinder {
            radius_top: 0.05,
            radius_bottom: 0.01,
            height: 4.0,
        },
        color: kind.shade(),
        position: Vector3::new(0.0, FACE_ELEVATION, 0.0),
        rotation: RotationState::new(0.0, 0.0, -FRAC_PI_2),
    }
}
