pub mod candidate;
pub mod frame;
pub mod matrix;
pub mod pattern;
pub mod plane;
pub mod region;

pub use candidate::{DetectionCandidate, DetectionSource};
pub use frame::{Frame, OwnedFrame, PixelLayout};
pub use matrix::BitMatrix;
pub use pattern::{Run, RunLengthPattern, RunState};
pub use plane::GrayPlane;
pub use region::{CandidateRegion, Rect};
