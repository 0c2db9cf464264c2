use std::collections::HashSet;

use super::{Attachment, BufferTarget, FramebufferStatus, ObjectId, Visitor};

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

/// A native call recorded by `HeadlessVisitor`.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    InvalidateState,
    SetBlendState(BlendState),
    SetDepthStencilState(DepthStencilState),
    SetRasterizerState(RasterizerState),
    SetSamplerState(usize, SamplerState),
    SetViewport(Viewport),
    SetScissor(Rect),
    Clear(ClearOptions, Color<f32>, f32, i32),
    CreateFramebuffer(ObjectId),
    BindFramebuffer(ObjectId),
    CheckFramebufferStatus,
    AttachTexture(Attachment, ObjectId, Option<CubeMapFace>),
    AttachRenderbuffer(Attachment, ObjectId),
    DeleteFramebuffer(ObjectId),
    CreateRenderbuffer(ObjectId),
    BindRenderbuffer(ObjectId),
    RenderbufferStorage(DepthFormat, Vector2<u32>),
    DeleteRenderbuffer(ObjectId),
    CreateBuffer(ObjectId),
    BindBuffer(BufferTarget, ObjectId),
    BufferData(BufferTarget, Vec<u8>),
    DeleteBuffer(ObjectId),
    EnableVertexLayout(VertexLayout),
    DisableVertexLayout,
    UnbindProgram,
    DrawArrays(Topology, u32, u32),
    DrawElements(Topology, u32, IndexFormat, usize),
    Flush,
}

/// A visitor that records native calls instead of issuing them, and keeps
/// track of the objects it handed out. Used to run the device without a
/// native context.
pub struct HeadlessVisitor {
    calls: Vec<Call>,
    next: ObjectId,
    framebuffers: HashSet<ObjectId>,
    renderbuffers: HashSet<ObjectId>,
    buffers: HashSet<ObjectId>,
    framebuffer: ObjectId,
    status: FramebufferStatus,
}

impl Default for HeadlessVisitor {
    fn default() -> Self {
        HeadlessVisitor::new()
    }
}

impl HeadlessVisitor {
    pub fn new() -> Self {
        HeadlessVisitor {
            calls: Vec::new(),
            next: 1,
            framebuffers: HashSet::new(),
            renderbuffers: HashSet::new(),
            buffers: HashSet::new(),
            framebuffer: 0,
            status: FramebufferStatus::Complete,
        }
    }

    /// Pretends the window-system framebuffer has a non-zero name, which is
    /// the case on some embedded platforms.
    pub fn with_default_framebuffer(mut self, id: ObjectId) -> Self {
        self.framebuffer = id;
        self
    }

    /// Sets the status reported by `check_framebuffer_status`.
    #[inline]
    pub fn set_framebuffer_status(&mut self, status: FramebufferStatus) {
        self.status = status;
    }

    #[inline]
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    #[inline]
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// The framebuffer currently bound.
    #[inline]
    pub fn framebuffer(&self) -> ObjectId {
        self.framebuffer
    }

    #[inline]
    pub fn live_framebuffers(&self) -> usize {
        self.framebuffers.len()
    }

    #[inline]
    pub fn live_renderbuffers(&self) -> usize {
        self.renderbuffers.len()
    }

    #[inline]
    pub fn live_buffers(&self) -> usize {
        self.buffers.len()
    }

    fn alloc(&mut self) -> ObjectId {
        let id = self.next;
        self.next += 1;
        id
    }
}

fn free(objects: &mut HashSet<ObjectId>, id: ObjectId, kind: &str) -> Result<()> {
    if !objects.remove(&id) {
        return Err(backend_err!("{} {} is not alive", kind, id));
    }

    Ok(())
}

impl Visitor for HeadlessVisitor {
    unsafe fn invalidate_state(&mut self) -> Result<()> {
        self.calls.push(Call::InvalidateState);
        Ok(())
    }

    unsafe fn set_blend_state(&mut self, state: &BlendState) -> Result<()> {
        self.calls.push(Call::SetBlendState(*state));
        Ok(())
    }

    unsafe fn set_depth_stencil_state(&mut self, state: &DepthStencilState) -> Result<()> {
        self.calls.push(Call::SetDepthStencilState(*state));
        Ok(())
    }

    unsafe fn set_rasterizer_state(&mut self, state: &RasterizerState) -> Result<()> {
        self.calls.push(Call::SetRasterizerState(*state));
        Ok(())
    }

    unsafe fn set_sampler_state(&mut self, slot: usize, state: &SamplerState) -> Result<()> {
        self.calls.push(Call::SetSamplerState(slot, *state));
        Ok(())
    }

    unsafe fn set_viewport(&mut self, viewport: &Viewport) -> Result<()> {
        self.calls.push(Call::SetViewport(*viewport));
        Ok(())
    }

    unsafe fn set_scissor(&mut self, rect: Rect) -> Result<()> {
        self.calls.push(Call::SetScissor(rect));
        Ok(())
    }

    unsafe fn clear(
        &mut self,
        options: ClearOptions,
        color: Color<f32>,
        depth: f32,
        stencil: i32,
    ) -> Result<()> {
        self.calls.push(Call::Clear(options, color, depth, stencil));
        Ok(())
    }

    unsafe fn create_framebuffer(&mut self) -> Result<ObjectId> {
        let id = self.alloc();
        self.framebuffers.insert(id);
        self.calls.push(Call::CreateFramebuffer(id));
        Ok(id)
    }

    unsafe fn bind_framebuffer(&mut self, id: ObjectId) -> Result<()> {
        self.framebuffer = id;
        self.calls.push(Call::BindFramebuffer(id));
        Ok(())
    }

    unsafe fn framebuffer_binding(&mut self) -> Result<ObjectId> {
        Ok(self.framebuffer)
    }

    unsafe fn check_framebuffer_status(&mut self) -> Result<FramebufferStatus> {
        self.calls.push(Call::CheckFramebufferStatus);
        Ok(self.status)
    }

    unsafe fn attach_texture(
        &mut self,
        attachment: Attachment,
        texture: ObjectId,
        face: Option<CubeMapFace>,
    ) -> Result<()> {
        self.calls
            .push(Call::AttachTexture(attachment, texture, face));
        Ok(())
    }

    unsafe fn attach_renderbuffer(&mut self, attachment: Attachment, id: ObjectId) -> Result<()> {
        self.calls.push(Call::AttachRenderbuffer(attachment, id));
        Ok(())
    }

    unsafe fn delete_framebuffer(&mut self, id: ObjectId) -> Result<()> {
        free(&mut self.framebuffers, id, "Framebuffer")?;
        if self.framebuffer == id {
            self.framebuffer = 0;
        }

        self.calls.push(Call::DeleteFramebuffer(id));
        Ok(())
    }

    unsafe fn create_renderbuffer(&mut self) -> Result<ObjectId> {
        let id = self.alloc();
        self.renderbuffers.insert(id);
        self.calls.push(Call::CreateRenderbuffer(id));
        Ok(id)
    }

    unsafe fn bind_renderbuffer(&mut self, id: ObjectId) -> Result<()> {
        self.calls.push(Call::BindRenderbuffer(id));
        Ok(())
    }

    unsafe fn renderbuffer_storage(
        &mut self,
        format: DepthFormat,
        dimensions: Vector2<u32>,
    ) -> Result<()> {
        self.calls.push(Call::RenderbufferStorage(format, dimensions));
        Ok(())
    }

    unsafe fn delete_renderbuffer(&mut self, id: ObjectId) -> Result<()> {
        free(&mut self.renderbuffers, id, "Renderbuffer")?;
        self.calls.push(Call::DeleteRenderbuffer(id));
        Ok(())
    }

    unsafe fn create_buffer(&mut self) -> Result<ObjectId> {
        let id = self.alloc();
        self.buffers.insert(id);
        self.calls.push(Call::CreateBuffer(id));
        Ok(id)
    }

    unsafe fn bind_buffer(&mut self, target: BufferTarget, id: ObjectId) -> Result<()> {
        self.calls.push(Call::BindBuffer(target, id));
        Ok(())
    }

    unsafe fn buffer_data(&mut self, target: BufferTarget, bytes: &[u8]) -> Result<()> {
        self.calls.push(Call::BufferData(target, bytes.to_vec()));
        Ok(())
    }

    unsafe fn delete_buffer(&mut self, id: ObjectId) -> Result<()> {
        free(&mut self.buffers, id, "Buffer")?;
        self.calls.push(Call::DeleteBuffer(id));
        Ok(())
    }

    unsafe fn enable_vertex_layout(&mut self, layout: &VertexLayout) -> Result<()> {
        self.calls.push(Call::EnableVertexLayout(*layout));
        Ok(())
    }

    unsafe fn disable_vertex_layout(&mut self, _: &VertexLayout) -> Result<()> {
        self.calls.push(Call::DisableVertexLayout);
        Ok(())
    }

    unsafe fn unbind_program(&mut self) -> Result<()> {
        self.calls.push(Call::UnbindProgram);
        Ok(())
    }

    unsafe fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32) -> Result<()> {
        self.calls.push(Call::DrawArrays(topology, first, count));
        Ok(())
    }

    unsafe fn draw_elements(
        &mut self,
        topology: Topology,
        count: u32,
        format: IndexFormat,
        offset: usize,
    ) -> Result<()> {
        self.calls
            .push(Call::DrawElements(topology, count, format, offset));
        Ok(())
    }

    unsafe fn flush(&mut self) -> Result<()> {
        self.calls.push(Call::Flush);
        Ok(())
    }
}
