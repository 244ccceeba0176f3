//! Rendering module
//!
//! `canvas` holds the render step itself; `pipeline` pushes the tessellated
//! result through WebGPU.

pub mod canvas;
pub mod color;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use canvas::{Canvas, VertexCanvas, paint};
pub use pipeline::RenderState;
