use geo::Point;

/// A directional change detected along a snapped route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnEvent {
    /// Snapped point at which the turn starts
    pub point: Point<f64>,
    /// Position of `point` in the snapped sequence
    pub index: usize,
    /// Absolute bearing change in [0, 180]
    pub angle_degrees: f64,
    /// `angle_degrees` reached the blind spot threshold
    pub is_blind_spot: bool,
}

impl TurnEvent {
    pub fn latitude(&self) -> f64 {
        self.point.y()
    }

    pub fn longitude(&self) -> f64 {
        self.point.x()
    }
}
