/// A single digit detection from the sequence detector.
///
/// Coordinates are pixel positions in the detector's input crop. `class_id`
/// follows the SVHN convention: 1 through 9 mean themselves, 10 means the
/// digit zero.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub confidence: f32,
    pub class_id: u32,
}

impl DetectionBox {
    /// Convenience constructor for tests and synthetic backends.
    pub fn at_x(x1: f32, class_id: u32, confidence: f32) -> Self {
        Self {
            x1,
            y1: 0.0,
            x2: x1 + 1.0,
            y2: 1.0,
            confidence,
            class_id,
        }
    }
}
