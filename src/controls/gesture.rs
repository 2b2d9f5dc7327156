//! Tap-versus-drag disambiguation for the progress bar.

/// Pointer travel (in pixels) before a press becomes a drag.
pub const DRAG_THRESHOLD_PX: f64 = 5.0;

/// What a finished gesture asks for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrubAction {
    TogglePlay,
    /// Seek to this fraction (0.0 - 1.0) of the track
    Seek(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Pressed { start_x: f64 },
    Dragging { x: f64 },
}

/// Pointer state machine for a horizontal bar `width` pixels wide.
#[derive(Debug, Clone)]
pub struct ScrubGesture {
    width: f64,
    phase: Phase,
}

impl ScrubGesture {
    pub fn new(width: f64) -> Self {
        Self {
            width,
            phase: Phase::Idle,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    pub fn set_width(&mut self, width: f64) {
        self.width = width;
    }

    pub fn pointer_down(&mut self, x: f64) {
        self.phase = Phase::Pressed { start_x: x };
    }

    /// Track movement. While dragging, returns the previewed fraction.
    pub fn pointer_move(&mut self, x: f64) -> Option<f64> {
        match self.phase {
            Phase::Idle => None,
            Phase::Pressed { start_x } => {
                if (x - start_x).abs() > DRAG_THRESHOLD_PX {
                    self.phase = Phase::Dragging { x };
                    Some(self.fraction(x))
                } else {
                    None
                }
            }
            Phase::Dragging { .. } => {
                self.phase = Phase::Dragging { x };
                Some(self.fraction(x))
            }
        }
    }

    /// Finish the gesture. A release without a prior press does nothing.
    pub fn pointer_up(&mut self, x: f64) -> Option<ScrubAction> {
        let action = match self.phase {
            Phase::Idle => None,
            Phase::Pressed { start_x } if (x - start_x).abs() <= DRAG_THRESHOLD_PX => {
                Some(ScrubAction::TogglePlay)
            }
            Phase::Pressed { .. } | Phase::Dragging { .. } => {
                Some(ScrubAction::Seek(self.fraction(x)))
            }
        };
        self.phase = Phase::Idle;
        action
    }

    /// Pointer left or was captured elsewhere.
    pub fn cancel(&mut self) {
        self.phase = Phase::Idle;
    }

    fn fraction(&self, x: f64) -> f64 {
        if self.width <= 0.0 {
            return 0.0;
        }
        (x / self.width).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tap_toggles_play() {
        let mut gesture = ScrubGesture::new(200.0);
        gesture.pointer_down(100.0);
        assert_eq!(gesture.pointer_move(102.0), None);
        assert_eq!(gesture.pointer_up(103.0), Some(ScrubAction::TogglePlay));
        assert!(gesture.is_idle());
    }

    #[test]
    fn test_drag_seeks_to_release_point() {
        let mut gesture = ScrubGesture::new(200.0);
        gesture.pointer_down(20.0);
        assert_eq!(gesture.pointer_move(40.0), Some(0.2));
        assert!(gesture.is_dragging());
        // Small moves stay a drag once started
        assert_eq!(gesture.pointer_move(42.0), Some(0.21));
        assert_eq!(gesture.pointer_up(150.0), Some(ScrubAction::Seek(0.75)));
    }

    #[test]
    fn test_fraction_clamped_to_bar() {
        let mut gesture = ScrubGesture::new(100.0);
        gesture.pointer_down(50.0);
        assert_eq!(gesture.pointer_move(500.0), Some(1.0));
        assert_eq!(gesture.pointer_up(-30.0), Some(ScrubAction::Seek(0.0)));
    }

    #[test]
    fn test_cancel_discards_gesture() {
        let mut gesture = ScrubGesture::new(100.0);
        gesture.pointer_down(10.0);
        gesture.pointer_move(60.0);
        gesture.cancel();
        assert!(gesture.is_idle());
        assert_eq!(gesture.pointer_up(60.0), None);
    }

    #[test]
    fn test_move_without_press_ignored() {
        let mut gesture = ScrubGesture::new(100.0);
        assert_eq!(gesture.pointer_move(50.0), None);
        assert!(gesture.is_idle());
    }
}
