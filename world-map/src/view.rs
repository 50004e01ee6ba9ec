use crate::core::MapSize;

pub const MIN_ZOOM: f32 = 1.0;
pub const MAX_ZOOM: f32 = 10.0;

/// Pan/zoom state for a map viewport. The center is in map cell units.
///
/// There is no reset: callers drop the transform and build a new one.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    zoom: f32,
    center_x: f32,
    center_y: f32,
}

impl ViewTransform {
    pub fn new(size: MapSize) -> Self {
        Self {
            zoom: MIN_ZOOM,
            center_x: size.width as f32 / 2.0,
            center_y: size.height as f32 / 2.0,
        }
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn center(&self) -> (f32, f32) {
        (self.center_x, self.center_y)
    }

    pub fn zoom_by(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Moves the center by a delta in map cells, keeping it on the map.
    pub fn pan(&mut self, dx: f32, dy: f32, size: MapSize) {
        self.center_x = (self.center_x + dx).clamp(0.0, size.width as f32);
        self.center_y = (self.center_y + dy).clamp(0.0, size.height as f32);
    }

    pub fn is_default(&self, size: MapSize) -> bool {
        *self == Self::new(size)
    }
}
