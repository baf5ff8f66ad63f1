//! Region proposal
//!
//! Finds code-shaped areas inside a preprocessed variant:
//! - Ink masks are labelled into connected components
//! - Component bounding boxes are filtered by aspect ratio and size
//! - Surviving boxes are ranked by area

/// Union-find labelling of ink masks
pub mod connected_components;
/// Bar-like region filtering and ranking
pub mod region;

pub use region::{RegionProposer, propose_regions};
