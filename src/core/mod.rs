//! # Core Module
//!
//! The UI-agnostic triage engine.
//!
//! ## Modules
//! - `grid` - single-channel luminance grids
//! - `decoder` - the decode/resize collaborator seam
//! - `hasher` - DCT perceptual hashing
//! - `quality` - Laplacian sharpness estimation
//! - `clusterer` - union-find similarity clustering
//! - `aggregator` - snapshot classification over accumulated state
//! - `session` - the streaming driver and batch entry point

pub mod aggregator;
pub mod clusterer;
pub mod decoder;
pub mod grid;
pub mod hasher;
pub mod quality;
pub mod session;

// Re-export commonly used types
pub use aggregator::{CategorySummary, ClassificationSnapshot};
pub use grid::PixelGrid;
pub use hasher::{PerceptualHash, PhashEngine};
pub use session::{classify, MediaEntry, MediaKind, TriageConfig, TriageSession, TriageWorker};
