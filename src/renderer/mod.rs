//! WebGPU rendering module
//!
//! The scene is built on the CPU as a board-space triangle list and drawn
//! with a single flat-color pipeline.

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
