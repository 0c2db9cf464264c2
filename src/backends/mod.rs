//! The backend of the graphics device, which should be responsible for only
//! one thing: issuing the low-level native calls the device asks for.
//!
//! Every method is `unsafe` since most of them assume a current native
//! context on the calling thread.

pub mod headless;

#[cfg(not(target_arch = "wasm32"))]
pub mod gl;

use crate::device::buffer::IndexFormat;
use crate::device::primitive::Topology;
use crate::device::state::{
    BlendState, ClearOptions, DepthStencilState, RasterizerState, SamplerState,
};
use crate::device::target::{CubeMapFace, DepthFormat};
use crate::device::vertex::VertexLayout;
use crate::device::viewport::Viewport;
use crate::errors::*;
use crate::math::{Color, Rect, Vector2};

/// The name of a native object. Zero always refers to the default object,
/// e.g. the window-system framebuffer.
pub type ObjectId = u32;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum BufferTarget {
    Vertex,
    Index,
}

/// The attachment points of a framebuffer.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Attachment {
    Color0,
    Depth,
    Stencil,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FramebufferStatus {
    Complete,
    /// Carries the native status code.
    Incomplete(u32),
}

pub trait Visitor {
    /// Forgets whatever native state has been cached, and brings a newly
    /// created context back to the defaults the device assumes.
    unsafe fn invalidate_state(&mut self) -> Result<()>;

    unsafe fn set_blend_state(&mut self, state: &BlendState) -> Result<()>;

    unsafe fn set_depth_stencil_state(&mut self, state: &DepthStencilState) -> Result<()>;

    unsafe fn set_rasterizer_state(&mut self, state: &RasterizerState) -> Result<()>;

    unsafe fn set_sampler_state(&mut self, slot: usize, state: &SamplerState) -> Result<()>;

    unsafe fn set_viewport(&mut self, viewport: &Viewport) -> Result<()>;

    /// Sets the scissor box, in window coordinates with a bottom-left origin.
    unsafe fn set_scissor(&mut self, rect: Rect) -> Result<()>;

    unsafe fn clear(
        &mut self,
        options: ClearOptions,
        color: Color<f32>,
        depth: f32,
        stencil: i32,
    ) -> Result<()>;

    unsafe fn create_framebuffer(&mut self) -> Result<ObjectId>;

    unsafe fn bind_framebuffer(&mut self, id: ObjectId) -> Result<()>;

    /// Queries the framebuffer currently bound.
    unsafe fn framebuffer_binding(&mut self) -> Result<ObjectId>;

    unsafe fn check_framebuffer_status(&mut self) -> Result<FramebufferStatus>;

    /// Attaches a texture to the bound framebuffer. Passing zero detaches
    /// whatever is attached at `attachment`.
    unsafe fn attach_texture(
        &mut self,
        attachment: Attachment,
        texture: ObjectId,
        face: Option<CubeMapFace>,
    ) -> Result<()>;

    /// Attaches a renderbuffer to the bound framebuffer. Passing zero
    /// detaches whatever is attached at `attachment`.
    unsafe fn attach_renderbuffer(&mut self, attachment: Attachment, id: ObjectId) -> Result<()>;

    unsafe fn delete_framebuffer(&mut self, id: ObjectId) -> Result<()>;

    unsafe fn create_renderbuffer(&mut self) -> Result<ObjectId>;

    unsafe fn bind_renderbuffer(&mut self, id: ObjectId) -> Result<()>;

    /// Allocates storage for the bound renderbuffer.
    unsafe fn renderbuffer_storage(
        &mut self,
        format: DepthFormat,
        dimensions: Vector2<u32>,
    ) -> Result<()>;

    unsafe fn delete_renderbuffer(&mut self, id: ObjectId) -> Result<()>;

    unsafe fn create_buffer(&mut self) -> Result<ObjectId>;

    unsafe fn bind_buffer(&mut self, target: BufferTarget, id: ObjectId) -> Result<()>;

    /// Replaces the contents of the buffer bound at `target`.
    unsafe fn buffer_data(&mut self, target: BufferTarget, bytes: &[u8]) -> Result<()>;

    unsafe fn delete_buffer(&mut self, id: ObjectId) -> Result<()>;

    /// Enables and points the vertex attribute arrays described by `layout`
    /// into the bound vertex buffer.
    unsafe fn enable_vertex_layout(&mut self, layout: &VertexLayout) -> Result<()>;

    unsafe fn disable_vertex_layout(&mut self, layout: &VertexLayout) -> Result<()>;

    unsafe fn unbind_program(&mut self) -> Result<()>;

    unsafe fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32) -> Result<()>;

    /// Draws with the bound index buffer, `offset` is in bytes.
    unsafe fn draw_elements(
        &mut self,
        topology: Topology,
        count: u32,
        format: IndexFormat,
        offset: usize,
    ) -> Result<()>;

    unsafe fn flush(&mut self) -> Result<()>;
}
