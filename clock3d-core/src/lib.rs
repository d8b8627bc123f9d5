/// Clock3D Core Library - Scene model of an animated analog clock
///
/// This library builds the clock's scene graph (body, face, pointers and a
/// swappable numeral ring), maps wall-clock time onto pointer rotations, and
/// provides the geometry, font and projection helpers the render drivers use.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod error;
pub mod font;
pub mod geometry;
pub mod labels;
pub mod model;
pub mod projection;
pub mod scene;
pub mod text;
pub mod time;
pub mod transform;

// Re-export commonly used types
pub use catalog::{PointerKind, Rgb, Shape, ShapeKind};
pub use config::ClockConfig;
pub use controller::LabelSwitchController;
pub use error::{ClockError, FontLoadError};
pub use font::{Font, FontCache, FontSource, StdFontSource, BUILTIN_FONT};
pub use geometry::{BoundingBox, Mesh, Triangle, Vertex};
pub use labels::{label_set, LabelMode};
pub use model::{ClockModel, LabelTask};
pub use projection::Camera;
pub use scene::{NodeContent, NodeId, SceneGraph, SceneNode};
pub use text::TextGeometry;
pub use time::ClockAngles;
pub use transform::{RotationState, Transform};
