//! # Rendering collaborator and scene arena
//!
//! The controller never draws anything itself. After each navigation it rebuilds a [`Scene`],
//! a flat, owned description of what the display should show, and hands it to a
//! [`RenderSink`] together with the [`EventCache`] it was derived from.
//!
//! ## Arena reset
//!
//! The scene keeps its `Vec<HitBox>` alive across events: [`Scene::clear`] resets its length to
//! zero and [`Scene::rebuild`] repopulates it, so the allocation made for the largest event seen
//! so far is reused. Hit boxes are addressed by their position in the vector, which matches the
//! index of the hit in [`EventCache::hits`].
//!
//! ## Call order
//!
//! For an in-range navigation target the controller calls
//!
//! ```text
//! invalidate() ─► (fetch + recompute) ─► present(cache, scene)
//! ```
//!
//! and on a failed recomputation it presents the previous cache and scene again.
use nalgebra::{Point3, Vector3};

use crate::{
    axis_fit::line_fit_result::BeamLine,
    constants::{Energy, NavIndex},
    display_params::{DisplayParams, PaletteRange},
    navigation::event_cache::EventCache,
};

/// One drawable box per hit.
#[derive(Debug, Clone, PartialEq)]
pub struct HitBox {
    /// Index of the hit in [`EventCache::hits`].
    pub hit_index: usize,
    /// Center of the box.
    pub origin: Point3<f64>,
    /// Full extent of the box along each axis.
    pub size: Vector3<f64>,
    /// Energy of the hit, the quantity mapped onto the palette.
    pub value: Energy,
    /// `value` normalized into the palette range, clamped to `[0, 1]`.
    pub color_level: f64,
    /// Saturated readout, drawn highlighted.
    pub saturated: bool,
    /// Tooltip text.
    pub label: String,
}

/// Everything the renderer needs for the event on display.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scene {
    pub boxes: Vec<HitBox>,
    pub beam_line: Option<BeamLine>,
    pub palette: PaletteRange,
    pub event_index: Option<NavIndex>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the content of the scene, keeping its allocation.
    pub fn clear(&mut self) {
        self.boxes.clear();
        self.beam_line = None;
        self.event_index = None;
    }

    /// Repopulate the scene from a freshly computed cache.
    ///
    /// Arguments
    /// -----------------
    /// * `cache`: The event to draw.
    /// * `params`: Palette, hit box size and detector depth used for the axis overlay.
    pub fn rebuild(&mut self, cache: &EventCache, params: &DisplayParams) {
        self.clear();
        self.palette = params.palette;
        self.event_index = Some(cache.event_index);

        self.boxes.extend(cache.hits.iter().enumerate().map(|(i, hit)| HitBox {
            hit_index: i,
            origin: hit.position(),
            size: params.hit_box_size,
            value: hit.energy,
            color_level: params.palette.level(hit.energy),
            saturated: hit.is_saturated(),
            label: hit.to_string(),
        }));

        self.beam_line = cache.beam_line(params.detector_depth);
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn saturated_count(&self) -> usize {
        self.boxes.iter().filter(|b| b.saturated).count()
    }
}

/// Consumer of the computed event, typically a 3-D or 2-D display.
pub trait RenderSink {
    /// Discard every artifact tied to the event currently drawn.
    fn invalidate(&mut self);

    /// Draw `cache` through its prepared `scene`.
    fn present(&mut self, cache: &EventCache, scene: &Scene);
}

/// A sink that draws nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn invalidate(&mut self) {}

    fn present(&mut self, _cache: &EventCache, _scene: &Scene) {}
}

impl<T: RenderSink + ?Sized> RenderSink for &mut T {
    fn invalidate(&mut self) {
        (**self).invalidate()
    }

    fn present(&mut self, cache: &EventCache, scene: &Scene) {
        (**self).present(cache, scene)
    }
}
