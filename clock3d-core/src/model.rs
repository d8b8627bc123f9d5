/// The clock scene: body, face, pointers and the swappable numeral ring
///
/// The tree is `hub -> rim -> {ornament, hour, minute, second}` plus
/// `hub -> numerals -> label*`. Only two things ever change after
/// construction: the Y rotation of the three pointers, written once per
/// frame, and the children of the numeral group, replaced wholesale by
/// [`ClockModel::apply_label_set`].
///
/// Label rebuilds wait on an asynchronous font fetch. The model owns at most
/// one [`LabelTask`]; a newer request drops the older task before touching
/// the ring, so a stale task can never attach labels.
use std::f32::consts::PI;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use chrono::Timelike;
use futures::future::FutureExt;
use futures::ready;
use nalgebra::Vector3;

use crate::catalog::{self, PointerKind, FACE_ELEVATION, LABEL_COLOR};
use crate::config::ClockConfig;
use crate::error::{ClockError, FontLoadError};
use crate::font::{cache::FontFuture, Font, FontCache, FontSource};
use crate::labels::{label_set, HOUR_COUNT};
use crate::scene::{NodeContent, NodeId, SceneGraph, SceneNode};
use crate::text::TextGeometry;
use crate::time::ClockAngles;
use crate::transform::RotationState;

/// Radius of the circle the numerals sit on.
pub const LABEL_RADIUS: f32 = PI;
/// Glyph height of numerals.
pub const LABEL_SIZE: f32 = 0.5;
/// Extrusion depth of numerals.
pub const LABEL_DEPTH: f32 = 1.0 / 50.0;
/// Turns upright text so it lies flat on the face, reading left to right
/// with twelve at the top.
pub const LABEL_ROTATION: RotationState = RotationState::new(1.5 * PI, 0.0, -0.5 * PI);

/// Position of the numeral for hour slot `index` (0 is twelve o'clock).
pub fn label_position(index: usize) -> Vector3<f32> {
    let angle = index as f32 * PI / 6.0;
    Vector3::new(
        LABEL_RADIUS * angle.cos(),
        FACE_ELEVATION,
        LABEL_RADIUS * angle.sin(),
    )
}

/// Build the label node for hour slot `index`
pub fn build_label(index: usize, text: &str, font: &Font) -> SceneNode {
    let mut geometry = TextGeometry::new(text, font, LABEL_SIZE, LABEL_DEPTH);
    geometry.center();
    SceneNode::new(
        format!("label-{index}"),
        NodeContent::Label {
            text: text.to_string(),
            geometry: geometry.mesh,
            color: LABEL_COLOR,
        },
    )
    .with_position(label_position(index))
    .with_rotation(LABEL_ROTATION)
}

/// A scheduled numeral ring rebuild, waiting for its font.
///
/// Dropping the task cancels it.
pub struct LabelTask {
    generation: u64,
    labels: Vec<String>,
    font: FontFuture,
}

impl Future for LabelTask {
    type Output = Result<Rc<Font>, FontLoadError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.font.poll_unpin(cx)
    }
}

pub struct ClockModel {
    scene: SceneGraph,
    hub: NodeId,
    rim: NodeId,
    numerals: NodeId,
    pointers: [NodeId; 3],
    fonts: FontCache,
    font_id: String,
    pending: Option<LabelTask>,
    generation: u64,
}

impl ClockModel {
    /// Assemble the clock with an empty numeral ring
    pub fn new(fonts: FontCache, font_id: impl Into<String>) -> Result<Self, ClockError> {
        let mut scene = SceneGraph::new();
        let hub = scene.insert(catalog::hub().node());
        let rim = scene.add_child(hub, catalog::rim().node())?;
        scene.add_child(rim, catalog::ornament().node())?;

        let mut pointers = [rim; 3];
        for kind in PointerKind::ALL {
            pointers[kind.index()] = scene.add_child(rim, catalog::pointer(kind).node())?;
        }

        let numerals = scene.add_child(hub, SceneNode::group("numerals"))?;

        Ok(Self {
            scene,
            hub,
            rim,
            numerals,
            pointers,
            fonts,
            font_id: font_id.into(),
            pending: None,
            generation: 0,
        })
    }

    /// Assemble the clock and schedule the configured initial numerals
    pub fn from_config(
        config: &ClockConfig,
        source: impl FontSource + 'static,
    ) -> Result<Self, ClockError> {
        let mut model = Self::new(FontCache::new(source), config.font_id.clone())?;
        model.apply_label_set(&label_set(config.initial_labels))?;
        Ok(model)
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    /// The hub, root of the whole clock
    pub fn root(&self) -> NodeId {
        self.hub
    }

    pub fn rim(&self) -> NodeId {
        self.rim
    }

    /// Group node holding the numeral labels
    pub fn numerals(&self) -> NodeId {
        self.numerals
    }

    pub fn pointer(&self, kind: PointerKind) -> NodeId {
        self.pointers[kind.index()]
    }

    pub fn pointer_rotation(&self, kind: PointerKind) -> f32 {
        self.scene
            .get(self.pointer(kind))
            .map(|node| node.rotation.y)
            .unwrap_or_default()
    }

    /// Identifier of the font numerals are set in
    pub fn font_id(&self) -> &str {
        &self.font_id
    }

    /// Turn each pointer to its angle
    pub fn set_angles(&mut self, angles: &ClockAngles) {
        for kind in PointerKind::ALL {
            if let Some(node) = self.scene.get_mut(self.pointers[kind.index()]) {
                node.rotation.y = angles.get(kind);
            }
        }
    }

    /// Point the hands at `time` and return the angles used
    pub fn update_time<T: Timelike>(&mut self, time: &T) -> ClockAngles {
        let angles = ClockAngles::at(time);
        self.set_angles(&angles);
        angles
    }

    /// Tilt the whole clock, e.g. to inspect it from another side
    pub fn tilt(&mut self, dx: f32, dy: f32) {
        if let Some(hub) = self.scene.get_mut(self.hub) {
            hub.rotation.rotate(dx, dy, 0.0);
        }
    }

    pub fn label_count(&self) -> usize {
        self.scene.children(self.numerals).len()
    }

    /// Texts of the attached labels, in hour order
    pub fn label_texts(&self) -> Vec<&str> {
        self.scene
            .children(self.numerals)
            .iter()
            .filter_map(|&id| match &self.scene.get(id)?.content {
                NodeContent::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn has_pending_labels(&self) -> bool {
        self.pending.is_some()
    }

    /// Replace the numeral ring with `labels`.
    ///
    /// The current labels are released before this returns. A non-empty set
    /// is attached once its font is available, through [`Self::pump`] or
    /// [`Self::settle_labels`]. Any earlier rebuild still waiting for its
    /// font is cancelled.
    pub fn apply_label_set(&mut self, labels: &[String]) -> Result<(), ClockError> {
        if !labels.is_empty() && labels.len() != HOUR_COUNT {
            return Err(ClockError::InvalidLabelSetLength { len: labels.len() });
        }

        if let Some(stale) = self.pending.take() {
            log::debug!("superseding label task {}", stale.generation);
        }
        let released = self.scene.detach_children(self.numerals)?;
        self.generation += 1;
        log::debug!(
            "label task {}: released {released} labels, scheduling {}",
            self.generation,
            labels.len()
        );

        if !labels.is_empty() {
            self.pending = Some(LabelTask {
                generation: self.generation,
                labels: labels.to_vec(),
                font: self.fonts.get(&self.font_id),
            });
        }
        Ok(())
    }

    /// Drop the pending label rebuild, if any
    pub fn cancel_pending_labels(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Advance the pending label rebuild.
    ///
    /// Resolves to `None` when nothing is pending, otherwise to the number of
    /// labels attached or the font failure. On failure the ring stays empty.
    pub fn poll_labels(&mut self, cx: &mut Context<'_>) -> Poll<Option<Result<usize, ClockError>>> {
        let result = match self.pending.as_mut() {
            Some(task) => ready!(task.poll_unpin(cx)),
            None => return Poll::Ready(None),
        };
        let labels = self
            .pending
            .take()
            .map(|task| task.labels)
            .unwrap_or_default();

        Poll::Ready(Some(match result {
            Ok(font) => self.attach_labels(&labels, &font),
            Err(error) => {
                log::error!(
                    "numeral font {} failed to load, showing no labels: {error}",
                    self.font_id
                );
                Err(error.into())
            }
        }))
    }

    /// Poll the pending label rebuild once without blocking; for frame loops
    pub fn pump(&mut self) -> Option<Result<usize, ClockError>> {
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        match self.poll_labels(&mut cx) {
            Poll::Ready(outcome) => outcome,
            Poll::Pending => None,
        }
    }

    /// Wait for the pending label rebuild to finish
    pub async fn settle_labels(&mut self) -> Option<Result<usize, ClockError>> {
        futures::future::poll_fn(|cx| self.poll_labels(cx)).await
    }

    fn attach_labels(&mut self, labels: &[String], font: &Font) -> Result<usize, ClockError> {
        let nodes: Vec<SceneNode> = labels
            .iter()
            .enumerate()
            .map(|(index, text)| build_label(index, text, font))
            .collect();
        for node in nodes {
            self.scene.add_child(self.numerals, node)?;
        }
        log::debug!("label task {}: attached {} labels", self.generation, labels.len());
        Ok(labels.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::source::testing::{io_failure, GatedSource};
    use crate::font::{StdFontSource, BUILTIN_FONT};
    use crate::labels::LabelMode;
    use chrono::NaiveTime;
    use futures::executor::block_on;
    use nalgebra::Point3;

    fn model() -> ClockModel {
        ClockModel::new(FontCache::new(StdFontSource), BUILTIN_FONT).unwrap()
    }

    fn gated_model() -> (ClockModel, GatedSource) {
        let source = GatedSource::default();
        let model = ClockModel::new(FontCache::new(source.clone()), "gated").unwrap();
        (model, source)
    }

    fn show(model: &mut ClockModel, mode: LabelMode) {
        model.apply_label_set(&label_set(mode)).unwrap();
        block_on(model.settle_labels());
    }

    #[test]
    fn test_assembles_tree() {
        let model = model();
        let scene = model.scene();
        assert_eq!(scene.children(model.root()), &[model.rim(), model.numerals()]);
        // ornament plus three pointers
        assert_eq!(scene.children(model.rim()).len(), 4);
        assert_eq!(model.label_count(), 0);

        for kind in PointerKind::ALL {
            let node = scene.get(model.pointer(kind)).unwrap();
            assert_eq!(node.parent(), Some(model.rim()));
            match &node.content {
                NodeContent::Mesh { color, .. } => assert_eq!(*color, kind.shade()),
                other => panic!("pointer is not a mesh: {other:?}"),
            }
        }
    }

    #[test]
    fn test_numeric_labels_attach() {
        let mut model = model();
        model.apply_label_set(&label_set(LabelMode::Numeric)).unwrap();
        assert_eq!(block_on(model.settle_labels()), Some(Ok(12)));
        assert_eq!(model.label_count(), 12);
        assert_eq!(model.label_texts()[0], "12");
        assert_eq!(model.label_texts()[11], "11");
        assert!(!model.has_pending_labels());
    }

    #[test]
    fn test_switch_replaces_every_label() {
        let mut model = model();
        show(&mut model, LabelMode::Numeric);
        show(&mut model, LabelMode::Roman);

        let texts = model.label_texts();
        assert_eq!(texts.len(), 12);
        assert_eq!(texts, label_set(LabelMode::Roman));
        let numeric = label_set(LabelMode::Numeric);
        assert!(texts.iter().all(|text| !numeric.iter().any(|n| n == text)));
    }

    #[test]
    fn test_empty_set_is_idempotent() {
        let mut model = model();
        show(&mut model, LabelMode::Numeric);
        for _ in 0..3 {
            model.apply_label_set(&[]).unwrap();
            assert_eq!(block_on(model.settle_labels()), None);
            assert_eq!(model.label_count(), 0);
        }
    }

    #[test]
    fn test_partial_set_is_rejected_without_side_effects() {
        let mut model = model();
        show(&mut model, LabelMode::Numeric);
        let nodes_before = model.scene().len();

        let partial: Vec<String> = label_set(LabelMode::Roman).into_iter().take(5).collect();
        assert_eq!(
            model.apply_label_set(&partial),
            Err(ClockError::InvalidLabelSetLength { len: 5 })
        );
        assert_eq!(model.label_texts(), label_set(LabelMode::Numeric));
        assert_eq!(model.scene().len(), nodes_before);
        assert!(!model.has_pending_labels());
    }

    #[test]
    fn test_old_labels_leave_before_font_arrives() {
        let (mut model, source) = gated_model();
        model.apply_label_set(&label_set(LabelMode::Numeric)).unwrap();
        source.open_builtin();
        assert_eq!(model.pump(), Some(Ok(12)));

        model.apply_label_set(&label_set(LabelMode::Roman)).unwrap();
        // Font is cached, but nothing is attached until the task is driven
        assert_eq!(model.label_count(), 0);
        assert!(model.has_pending_labels());
        assert_eq!(model.pump(), Some(Ok(12)));
        assert_eq!(model.label_texts()[0], "XII");
    }

    #[test]
    fn test_pending_fetch_keeps_ring_empty() {
        let (mut model, source) = gated_model();
        model.apply_label_set(&label_set(LabelMode::Numeric)).unwrap();
        assert_eq!(model.pump(), None);
        assert_eq!(model.pump(), None);
        assert_eq!(model.label_count(), 0);

        source.open_builtin();
        assert_eq!(model.pump(), Some(Ok(12)));
        assert_eq!(model.pump(), None);
    }

    #[test]
    fn test_newer_request_supersedes_in_flight_one() {
        let (mut model, source) = gated_model();
        model.apply_label_set(&label_set(LabelMode::Numeric)).unwrap();
        assert_eq!(model.pump(), None);
        model.apply_label_set(&label_set(LabelMode::Roman)).unwrap();
        assert_eq!(model.pump(), None);

        source.open_builtin();
        assert_eq!(model.pump(), Some(Ok(12)));
        assert_eq!(model.label_texts(), label_set(LabelMode::Roman));
        assert_eq!(source.loads(), 1);
    }

    #[test]
    fn test_clearing_cancels_in_flight_request() {
        let (mut model, source) = gated_model();
        model.apply_label_set(&label_set(LabelMode::Numeric)).unwrap();
        model.apply_label_set(&[]).unwrap();
        source.open_builtin();
        assert_eq!(model.pump(), None);
        assert_eq!(model.label_count(), 0);
    }

    #[test]
    fn test_cancel_pending_labels() {
        let (mut model, source) = gated_model();
        model.apply_label_set(&label_set(LabelMode::Roman)).unwrap();
        assert!(model.cancel_pending_labels());
        assert!(!model.cancel_pending_labels());
        source.open_builtin();
        assert_eq!(model.pump(), None);
        assert_eq!(model.label_count(), 0);
    }

    #[test]
    fn test_font_failure_falls_back_to_no_labels() {
        let (mut model, source) = gated_model();
        model.apply_label_set(&label_set(LabelMode::Numeric)).unwrap();
        source.open(Err(io_failure("gated")));

        assert_eq!(
            model.pump(),
            Some(Err(ClockError::FontLoad(io_failure("gated"))))
        );
        assert_eq!(model.label_count(), 0);
        assert!(!model.has_pending_labels());

        // A later switch fetches again
        model.apply_label_set(&label_set(LabelMode::Roman)).unwrap();
        assert_eq!(source.loads(), 2);
    }

    #[test]
    fn test_labels_line_up_with_pointer_directions() {
        let mut model = model();
        show(&mut model, LabelMode::Numeric);
        let labels = model.scene().children(model.numerals()).to_vec();

        for (hour, label) in labels.into_iter().enumerate() {
            model.set_angles(&ClockAngles::from_hms(hour as u32, 0, 0));
            let pointer = model.scene().world_matrix(model.pointer(PointerKind::Hour)).unwrap();
            // The pointer's +Y tip is laid along +X before it turns
            let tip = pointer.transform_point(&Point3::new(0.0, 2.0, 0.0));
            let label_at = model
                .scene()
                .world_matrix(label)
                .unwrap()
                .transform_point(&Point3::origin());

            let tip_dir = Vector3::new(tip.x, 0.0, tip.z).normalize();
            let label_dir = Vector3::new(label_at.x, 0.0, label_at.z).normalize();
            assert!((tip_dir - label_dir).norm() < 1e-4, "hour {hour}");
            assert!((label_at.coords.xz().norm() - LABEL_RADIUS).abs() < 1e-4);
        }
    }

    #[test]
    fn test_label_geometry_is_centred() {
        let mut model = model();
        show(&mut model, LabelMode::Roman);
        for &id in model.scene().children(model.numerals()) {
            let NodeContent::Label { geometry, .. } = &model.scene().get(id).unwrap().content else {
                panic!("numeral ring holds a non-label node");
            };
            let center = geometry.bounding_box().unwrap().center();
            assert!(center.coords.norm() < 1e-4);
        }
    }

    #[test]
    fn test_update_time_turns_pointers() {
        let mut model = model();
        let time = NaiveTime::from_hms_opt(6, 30, 15).unwrap();
        let angles = model.update_time(&time);
        assert!((model.pointer_rotation(PointerKind::Hour) + PI).abs() < 1e-5);
        assert!((model.pointer_rotation(PointerKind::Minute) + PI).abs() < 1e-5);
        assert!((model.pointer_rotation(PointerKind::Second) + PI / 2.0).abs() < 1e-5);
        assert_eq!(angles.second, model.pointer_rotation(PointerKind::Second));
    }

    #[test]
    fn test_from_config_schedules_initial_labels() {
        let config = ClockConfig {
            initial_labels: LabelMode::Roman,
            ..ClockConfig::default()
        };
        let mut model = ClockModel::from_config(&config, StdFontSource).unwrap();
        assert!(model.has_pending_labels());
        assert_eq!(model.pump(), Some(Ok(12)));
        assert_eq!(model.label_texts()[1], "I");
    }
}
