use crate::models::Direction;

/// Horizontal displacement, in pixels, a drag must exceed to commit
pub const DEFAULT_DRAG_THRESHOLD: f64 = 100.0;

/// Normalize a configured threshold to a finite, non-negative value
///
/// NaN and infinite thresholds fall back to [`DEFAULT_DRAG_THRESHOLD`].
pub fn sanitize_threshold(threshold: f64) -> f64 {
    if threshold.is_finite() {
        threshold.abs()
    } else {
        tracing::warn!(
            "Drag threshold {} is not finite, using {}",
            threshold,
            DEFAULT_DRAG_THRESHOLD
        );
        DEFAULT_DRAG_THRESHOLD
    }
}

/// Result of releasing a drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureOutcome {
    Commit(Direction),
    /// Released below the threshold; the card snaps back
    Cancelled,
}

/// Tracks one horizontal drag on the presented card
#[derive(Debug, Clone)]
pub struct DragGesture {
    threshold: f64,
    origin: Option<f64>,
    displacement: f64,
}

impl DragGesture {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: sanitize_threshold(threshold),
            origin: None,
            displacement: 0.0,
        }
    }

    pub fn begin(&mut self, x: f64) {
        self.origin = Some(x);
        self.displacement = 0.0;
    }

    /// Pointer moved; ignored unless a drag is in progress
    pub fn move_to(&mut self, x: f64) {
        if let Some(origin) = self.origin {
            self.displacement = x - origin;
        }
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    pub fn displacement(&self) -> f64 {
        self.displacement
    }

    /// Direction the card currently leans towards, for swipe hints
    pub fn leaning(&self) -> Option<Direction> {
        Direction::from_displacement(self.displacement, self.threshold)
    }

    /// End the drag and decide whether it commits
    pub fn release(&mut self) -> GestureOutcome {
        let outcome = match self.origin.take() {
            Some(_) => match Direction::from_displacement(self.displacement, self.threshold) {
                Some(direction) => GestureOutcome::Commit(direction),
                None => GestureOutcome::Cancelled,
            },
            None => GestureOutcome::Cancelled,
        };
        self.displacement = 0.0;
        outcome
    }
}

impl Default for DragGesture {
    fn default() -> Self {
        Self::new(DEFAULT_DRAG_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_right_commits_match() {
        let mut drag = DragGesture::default();
        drag.begin(200.0);
        drag.move_to(250.0);
        assert_eq!(drag.leaning(), None);
        drag.move_to(320.0);
        assert_eq!(drag.leaning(), Some(Direction::Right));

        assert_eq!(drag.release(), GestureOutcome::Commit(Direction::Right));
        assert!(!drag.is_active());
    }

    #[test]
    fn test_drag_left_commits_skip() {
        let mut drag = DragGesture::new(50.0);
        drag.begin(100.0);
        drag.move_to(40.0);

        assert_eq!(drag.release(), GestureOutcome::Commit(Direction::Left));
    }

    #[test]
    fn test_short_drag_cancels() {
        let mut drag = DragGesture::default();
        drag.begin(0.0);
        drag.move_to(100.0);

        assert_eq!(drag.release(), GestureOutcome::Cancelled);
        assert_eq!(drag.displacement(), 0.0);
    }

    #[test]
    fn test_nan_threshold_uses_default() {
        let mut drag = DragGesture::new(f64::NAN);
        drag.begin(0.0);
        drag.move_to(150.0);
        assert_eq!(drag.release(), GestureOutcome::Commit(Direction::Right));

        drag.begin(0.0);
        drag.move_to(-50.0);
        assert_eq!(drag.release(), GestureOutcome::Cancelled);
    }

    #[test]
    fn test_sanitize_threshold() {
        assert_eq!(sanitize_threshold(-80.0), 80.0);
        assert_eq!(sanitize_threshold(f64::NEG_INFINITY), DEFAULT_DRAG_THRESHOLD);
        assert_eq!(sanitize_threshold(f64::NAN), DEFAULT_DRAG_THRESHOLD);
    }

    #[test]
    fn test_release_without_begin_cancels() {
        let mut drag = DragGesture::default();
        drag.move_to(500.0);

        assert_eq!(drag.displacement(), 0.0);
        assert_eq!(drag.release(), GestureOutcome::Cancelled);
    }
}
