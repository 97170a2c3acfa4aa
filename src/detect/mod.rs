mod label;
mod model;
mod result;

pub mod backends;

pub use label::{label_from_boxes, LABEL_SEPARATOR};
pub use model::{NoiseClassifier, SequenceDetector};
pub use result::DetectionBox;
