use std::rc::Rc;

use crate::backends::{BufferTarget, ObjectId, Visitor};
use crate::errors::*;

use super::buffer::{self, IndexBuffer, IndexElement, VertexBuffer};
use super::primitive::PrimitiveType;
use super::vertex::{VertexLayout, VertexType};
use super::GraphicsDevice;

fn check_range(what: &str, start: usize, count: usize, len: usize) -> Result<()> {
    match start.checked_add(count) {
        Some(end) if end <= len => Ok(()),
        _ => Err(Error::OutOfBounds(format!(
            "{} [{}, {}+{}) of {}",
            what, start, start, count, len
        ))),
    }
}

/// The number of whole vertices `vb` holds when read with `layout`, which
/// might be less than the count it claims.
fn vertex_capacity(vb: &VertexBuffer, layout: &VertexLayout) -> usize {
    match layout.stride() as usize {
        0 => vb.len(),
        stride => vb.len().min(vb.as_bytes().len() / stride),
    }
}

impl<V: Visitor> GraphicsDevice<V> {
    #[inline]
    pub fn vertex_buffer(&self) -> Option<&Rc<VertexBuffer>> {
        self.vertex_buffer.as_ref()
    }

    /// Sets the vertex buffer used by `draw_primitives` and
    /// `draw_indexed_primitives`. The device only keeps a shared reference.
    #[inline]
    pub fn set_vertex_buffer(&mut self, vb: Option<Rc<VertexBuffer>>) {
        self.vertex_buffer = vb;
    }

    #[inline]
    pub fn index_buffer(&self) -> Option<&Rc<IndexBuffer>> {
        self.index_buffer.as_ref()
    }

    #[inline]
    pub fn set_index_buffer(&mut self, ib: Option<Rc<IndexBuffer>>) {
        self.index_buffer = ib;
    }

    #[inline]
    pub fn set_indices(&mut self, ib: Option<Rc<IndexBuffer>>) {
        self.set_index_buffer(ib);
    }

    /// Draws a sequence of non-indexed primitives from the current vertex
    /// buffer.
    pub fn draw_primitives(
        &mut self,
        primitive: PrimitiveType,
        vertex_start: u32,
        primitive_count: u32,
    ) -> Result<()> {
        self.check_alive()?;

        let topology = primitive.topology()?;
        let count = primitive.element_count(primitive_count)?;
        let vb = self.vertex_buffer.clone().ok_or(Error::VertexBufferMissing)?;
        let layout = self.resolve_declaration(&vb)?;
        let capacity = vertex_capacity(&vb, &layout);
        check_range("vertices", vertex_start as usize, count as usize, capacity)?;

        if count == 0 {
            warn!("Skips drawing zero {:?} primitives.", primitive);
            return Ok(());
        }

        self.submit(layout, vb.as_bytes(), None, |visitor| unsafe {
            visitor.draw_arrays(topology, vertex_start, count)
        })
    }

    /// Draws a sequence of non-indexed primitives from `vertices`.
    pub fn draw_user_primitives<T>(
        &mut self,
        primitive: PrimitiveType,
        vertices: &[T],
        vertex_offset: usize,
        primitive_count: u32,
    ) -> Result<()>
    where
        T: VertexType,
    {
        self.check_alive()?;

        let topology = primitive.topology()?;
        let count = primitive.element_count(primitive_count)?;
        check_range("vertices", vertex_offset, count as usize, vertices.len())?;

        if count == 0 {
            warn!("Skips drawing zero {:?} primitives.", primitive);
            return Ok(());
        }

        let first = vertex_offset as u32;
        self.submit(T::layout(), buffer::as_bytes(vertices), None, |visitor| unsafe {
            visitor.draw_arrays(topology, first, count)
        })
    }

    /// Draws indexed primitives from the current vertex and index buffers.
    ///
    /// Offsetting vertices with `base_vertex` or `min_vertex_index` is not
    /// supported, both must be zero.
    pub fn draw_indexed_primitives(
        &mut self,
        primitive: PrimitiveType,
        base_vertex: i32,
        min_vertex_index: i32,
        num_vertices: u32,
        start_index: u32,
        primitive_count: u32,
    ) -> Result<()> {
        self.check_alive()?;

        if base_vertex != 0 || min_vertex_index != 0 {
            unsupported!(
                "Drawing with base vertex {} and min vertex index {}",
                base_vertex,
                min_vertex_index
            );
        }

        let topology = primitive.topology()?;
        let count = primitive.element_count(primitive_count)?;
        let vb = self.vertex_buffer.clone().ok_or(Error::VertexBufferMissing)?;
        let ib = self.index_buffer.clone().ok_or(Error::IndexBufferMissing)?;
        let layout = self.resolve_declaration(&vb)?;
        let capacity = vertex_capacity(&vb, &layout);
        check_range("vertices", 0, num_vertices as usize, capacity)?;
        check_range("indices", start_index as usize, count as usize, ib.len())?;

        if count == 0 {
            warn!("Skips drawing zero {:?} primitives.", primitive);
            return Ok(());
        }

        let format = ib.format();
        let offset = start_index as usize * format.stride();
        self.submit(layout, vb.as_bytes(), Some(ib.as_bytes()), |visitor| unsafe {
            visitor.draw_elements(topology, count, format, offset)
        })
    }

    /// Draws indexed primitives from `vertices` and `indices`. Only the
    /// `vertex_count` vertices starting at `vertex_offset` get uploaded, the
    /// indices are relative to that range.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_user_indexed_primitives<T, I>(
        &mut self,
        primitive: PrimitiveType,
        vertices: &[T],
        vertex_offset: usize,
        vertex_count: usize,
        indices: &[I],
        index_offset: usize,
        primitive_count: u32,
    ) -> Result<()>
    where
        T: VertexType,
        I: IndexElement,
    {
        self.check_alive()?;

        let topology = primitive.topology()?;
        let count = primitive.element_count(primitive_count)?;
        check_range("vertices", vertex_offset, vertex_count, vertices.len())?;
        check_range("indices", index_offset, count as usize, indices.len())?;

        if count == 0 {
            warn!("Skips drawing zero {:?} primitives.", primitive);
            return Ok(());
        }

        let vertices = &vertices[vertex_offset..vertex_offset + vertex_count];
        let offset = index_offset * I::FORMAT.stride();
        self.submit(
            T::layout(),
            buffer::as_bytes(vertices),
            Some(buffer::as_bytes(indices)),
            |visitor| unsafe { visitor.draw_elements(topology, count, I::FORMAT, offset) },
        )
    }

    fn resolve_declaration(&self, vb: &VertexBuffer) -> Result<VertexLayout> {
        vb.resolve_declaration()
            .or(self.vertex_declaration)
            .ok_or(Error::VertexDeclarationMissing)
    }

    /// Uploads the vertex and index data, and issues `draw` in between the
    /// state pushes every draw call is wrapped with.
    fn submit<F>(
        &mut self,
        layout: VertexLayout,
        vertices: &[u8],
        indices: Option<&[u8]>,
        draw: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut V) -> Result<()>,
    {
        self.begin_draw()?;
        let result = self.upload_and_draw(&layout, vertices, indices, draw);
        let end = self.end_draw(&layout);
        result.and(end)
    }

    fn begin_draw(&mut self) -> Result<()> {
        self.reset_vertex_states = true;
        unsafe {
            self.visitor.set_rasterizer_state(&self.rasterizer_state)?;
            self.visitor.set_blend_state(&self.blend_state)
        }
    }

    fn end_draw(&mut self, layout: &VertexLayout) -> Result<()> {
        unsafe {
            self.visitor.unbind_program()?;
            if self.reset_vertex_states {
                self.reset_vertex_states = false;
                self.visitor.disable_vertex_layout(layout)?;
            }
        }

        Ok(())
    }

    fn upload_and_draw<F>(
        &mut self,
        layout: &VertexLayout,
        vertices: &[u8],
        indices: Option<&[u8]>,
        draw: F,
    ) -> Result<()>
    where
        F: FnOnce(&mut V) -> Result<()>,
    {
        unsafe {
            let vbo = self.reusable_buffer(BufferTarget::Vertex)?;
            self.visitor.bind_buffer(BufferTarget::Vertex, vbo)?;
            self.visitor.buffer_data(BufferTarget::Vertex, &[])?;
            self.visitor.buffer_data(BufferTarget::Vertex, vertices)?;

            if let Some(indices) = indices {
                let ibo = self.reusable_buffer(BufferTarget::Index)?;
                self.visitor.bind_buffer(BufferTarget::Index, ibo)?;
                self.visitor.buffer_data(BufferTarget::Index, &[])?;
                self.visitor.buffer_data(BufferTarget::Index, indices)?;
            }

            self.visitor.enable_vertex_layout(layout)?;
            draw(&mut self.visitor)?;

            self.visitor.bind_buffer(BufferTarget::Vertex, 0)?;
            if indices.is_some() {
                self.visitor.bind_buffer(BufferTarget::Index, 0)?;
            }
        }

        Ok(())
    }

    /// Returns the buffer object reused by every draw call for `target`,
    /// creating it on first use.
    unsafe fn reusable_buffer(&mut self, target: BufferTarget) -> Result<ObjectId> {
        let slot = match target {
            BufferTarget::Vertex => &mut self.vbo,
            BufferTarget::Index => &mut self.ibo,
        };

        if let Some(id) = *slot {
            return Ok(id);
        }

        let id = self.visitor.create_buffer()?;
        debug!("Creates {:?} buffer object {}.", target, id);
        *slot = Some(id);
        Ok(id)
    }
}
