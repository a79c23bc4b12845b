//! Pointer state for picking
//!
//! Converts window pixel coordinates into the NDC the camera expects.

/// Pointer position relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    /// X position in pixels from the left edge
    pub screen_x: f64,
    /// Y position in pixels from the top edge
    pub screen_y: f64,
    /// Viewport width in pixels
    pub window_width: u32,
    /// Viewport height in pixels
    pub window_height: u32,
}

impl PointerState {
    /// Pointer at the top-left corner of a viewport
    pub fn new(window_width: u32, window_height: u32) -> Self {
        Self {
            screen_x: 0.0,
            screen_y: 0.0,
            window_width,
            window_height,
        }
    }

    /// Update pointer position from window events
    pub fn update_position(&mut self, x: f64, y: f64) {
        self.screen_x = x;
        self.screen_y = y;
    }

    /// Update viewport size after a resize
    pub fn update_window_size(&mut self, width: u32, height: u32) {
        self.window_width = width;
        self.window_height = height;
    }

    /// Convert to Normalized Device Coordinates, +Y up
    ///
    /// A zero-sized viewport maps to the center.
    #[allow(clippy::cast_possible_truncation)]
    pub fn to_ndc(&self) -> (f32, f32) {
        if self.window_width == 0 || self.window_height == 0 {
            return (0.0, 0.0);
        }
        let ndc_x = (self.screen_x / f64::from(self.window_width)) * 2.0 - 1.0;
        let ndc_y = 1.0 - (self.screen_y / f64::from(self.window_height)) * 2.0;
        (ndc_x as f32, ndc_y as f32)
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_to_ndc_center() {
        let mut pointer = PointerState::new(1920, 1080);
        pointer.update_position(960.0, 540.0);
        let (ndc_x, ndc_y) = pointer.to_ndc();
        assert!(ndc_x.abs() < 0.001);
        assert!(ndc_y.abs() < 0.001);
    }

    #[test]
    fn test_screen_to_ndc_corners() {
        let mut pointer = PointerState::new(1920, 1080);
        let (ndc_x, ndc_y) = pointer.to_ndc();
        assert!((ndc_x + 1.0).abs() < 0.001); // Left edge
        assert!((ndc_y - 1.0).abs() < 0.001); // Top edge

        pointer.update_position(1920.0, 1080.0);
        let (ndc_x, ndc_y) = pointer.to_ndc();
        assert!((ndc_x - 1.0).abs() < 0.001);
        assert!((ndc_y + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_zero_viewport_maps_to_center() {
        let pointer = PointerState::new(0, 0);
        assert_eq!(pointer.to_ndc(), (0.0, 0.0));
    }
}
