use glam::Vec2;

/// Window-derived values fed to the shader every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowState {
    /// Window size in pixels.
    pub size: Vec2,
    /// Pixels per world unit.
    pub scale: f32,
    /// Position of the shape in normalized device coordinates.
    pub location: Vec2,
}

impl WindowState {
    /// Creates a state for a window of the given size, centered.
    pub fn new(width: u32, height: u32, scale: f32) -> Self {
        Self {
            size: Vec2::new(width as f32, height as f32),
            scale,
            location: Vec2::ZERO,
        }
    }

    /// Records a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.size = Vec2::new(width as f32, height as f32);
    }

    /// Applies a vertical wheel offset to the scale.
    pub fn scroll(&mut self, offset: f32) {
        self.scale += offset;
    }

    /// Moves the shape under the cursor at window pixel coordinates `(x, y)`.
    pub fn point_at(&mut self, x: f32, y: f32) {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return;
        }
        self.location = Vec2::new(x * 2.0 / self.size.x - 1.0, 1.0 - y * 2.0 / self.size.y);
    }

    /// Moves the shape by whole pixels, `+y` pointing up.
    pub fn nudge(&mut self, dx: f32, dy: f32) {
        if self.size.x <= 0.0 || self.size.y <= 0.0 {
            return;
        }
        self.location += Vec2::new(dx, dy) * 2.0 / self.size;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_at_corners() {
        let mut state = WindowState::new(640, 480, 100.0);
        state.point_at(0.0, 0.0);
        assert_eq!(state.location, Vec2::new(-1.0, 1.0));
        state.point_at(640.0, 480.0);
        assert_eq!(state.location, Vec2::new(1.0, -1.0));
        state.point_at(320.0, 240.0);
        assert_eq!(state.location, Vec2::ZERO);
    }

    #[test]
    fn test_scroll_and_resize() {
        let mut state = WindowState::new(640, 480, 100.0);
        state.scroll(1.0);
        state.scroll(-3.0);
        assert_eq!(state.scale, 98.0);

        state.resize(800, 600);
        assert_eq!(state.size, Vec2::new(800.0, 600.0));
        state.point_at(200.0, 150.0);
        assert_eq!(state.location, Vec2::new(-0.5, 0.5));
    }

    #[test]
    fn test_nudge_moves_one_pixel() {
        let mut state = WindowState::new(400, 200, 100.0);
        state.nudge(1.0, 0.0);
        state.nudge(0.0, -1.0);
        assert_eq!(state.location, Vec2::new(0.005, -0.01));
    }

    #[test]
    fn test_minimized_window_keeps_location() {
        let mut state = WindowState::new(640, 480, 100.0);
        state.point_at(0.0, 0.0);
        state.resize(0, 0);
        state.point_at(10.0, 10.0);
        state.nudge(1.0, 1.0);
        assert_eq!(state.location, Vec2::new(-1.0, 1.0));
    }
}
