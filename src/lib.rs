//! # What is This?
//!
//! `pastel` is a thin, stateful device layer over OpenGL. It mirrors the
//! device state of a native context on the CPU side (blend, depth-stencil,
//! rasterizer and sampler states, viewport and scissor box), manages the
//! framebuffer and renderbuffer objects that back render targets, and
//! submits indexed and unindexed draw calls from caller supplied vertex and
//! index data.
//!
//! Window creation, shader compilation, texture decoding and content loading
//! are left to the framework sitting on top of this crate. It hands the
//! device fully formed buffers, state objects and render-target descriptors.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pastel::prelude::*;
//!
//! let visitor = unsafe { GLVisitor::with_loader(|s| window.get_proc_address(s))? };
//! let mut device = GraphicsDevice::new(visitor, DeviceParams::default())?;
//!
//! device.set_blend_state(BlendState::alpha_blend())?;
//! device.set_vertex_buffer(Some(vertices));
//! device.draw_primitives(PrimitiveType::TriangleList, 0, 2)?;
//! device.present()?;
//! ```
//!
//! All the native calls are routed through a `Visitor`. The `HeadlessVisitor`
//! records those calls instead of issuing them, which makes it possible to run
//! the device without a context.

#[macro_use]
extern crate log;
#[macro_use]
extern crate failure;

pub extern crate cgmath;

#[macro_use]
pub mod errors;
pub mod math;
#[macro_use]
pub mod device;
pub mod backends;

pub mod prelude {
    pub use crate::backends::headless::HeadlessVisitor;
    pub use crate::backends::Visitor;

    #[cfg(not(target_arch = "wasm32"))]
    pub use crate::backends::gl::visitor::GLVisitor;

    pub use crate::device::prelude::*;
    pub use crate::errors::{Error, Result};
    pub use crate::math::prelude::*;
}
