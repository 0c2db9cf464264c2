use std::os::raw::c_void;

use gl;
use gl::types::*;

use crate::backends::{Attachment, BufferTarget, FramebufferStatus, ObjectId, Visitor};
use crate::device::buffer::IndexFormat;
use crate::device::primitive::Topology;
use crate::device::state::*;
use crate::device::target::{CubeMapFace, DepthFormat};
use crate::device::vertex::VertexLayout;
use crate::device::viewport::Viewport;
use crate::errors::*;
use crate::math::{Color, Rect, Vector2};

use super::capabilities::{Capabilities, Version};
use super::types;

const TEXTURE_MAX_ANISOTROPY_EXT: GLenum = 0x84FE;

/// The native state as last pushed, used to skip redundant calls.
struct GLMutableState {
    cull_mode: CullMode,
    fill_mode: FillMode,
    scissor_test: bool,
    depth_bias: (f32, f32),
    color_blend: Option<(Equation, BlendFactor, BlendFactor)>,
    color_write: (bool, bool, bool, bool),
    depth_test: bool,
    depth_write: bool,
    depth_func: Comparison,
    stencil_test: bool,
    viewport: Option<Viewport>,
    scissor: Option<Rect>,
}

pub struct GLVisitor {
    state: GLMutableState,
    capabilities: Capabilities,
}

impl GLVisitor {
    /// Loads the GL functions with `loader`, then creates the visitor.
    ///
    /// # Unsafe
    ///
    /// The context the functions are loaded from must be current in the
    /// calling thread, for as long as the visitor lives.
    pub unsafe fn with_loader<F>(loader: F) -> Result<Self>
    where
        F: FnMut(&'static str) -> *const c_void,
    {
        gl::load_with(loader);
        Self::new()
    }

    /// Creates a visitor on the current context, whose functions must have
    /// been loaded already.
    pub unsafe fn new() -> Result<Self> {
        let capabilities = Capabilities::parse()?;
        info!("GLVisitor {:#?}", capabilities);
        capabilities.check()?;

        let state = GLMutableState {
            cull_mode: CullMode::None,
            fill_mode: FillMode::Solid,
            scissor_test: false,
            depth_bias: (0.0, 0.0),
            color_blend: None,
            color_write: (true, true, true, true),
            depth_test: false,
            depth_write: false,
            depth_func: Comparison::Always,
            stencil_test: false,
            viewport: None,
            scissor: None,
        };

        let mut visitor = GLVisitor {
            state,
            capabilities,
        };

        visitor.bind_vertex_array()?;
        Self::reset_render_state(&mut visitor.state)?;
        Ok(visitor)
    }

    /// Core profiles refuse vertex attribute pointers without a vertex array
    /// object bound. It lives as long as the context.
    unsafe fn bind_vertex_array(&mut self) -> Result<()> {
        if self.capabilities.version >= Version::GL(3, 0) {
            let mut vao = 0;
            gl::GenVertexArrays(1, &mut vao);
            gl::BindVertexArray(vao);
            check()?;
        }

        Ok(())
    }

    #[inline]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }
}

impl Visitor for GLVisitor {
    unsafe fn invalidate_state(&mut self) -> Result<()> {
        self.bind_vertex_array()?;
        Self::reset_render_state(&mut self.state)?;

        self.state.fill_mode = FillMode::Solid;
        self.state.viewport = None;
        self.state.scissor = None;
        Ok(())
    }

    unsafe fn set_blend_state(&mut self, state: &BlendState) -> Result<()> {
        Self::set_color_blend(&mut self.state, state.color_blend)?;
        Self::set_color_write(&mut self.state, state.color_write)
    }

    unsafe fn set_depth_stencil_state(&mut self, state: &DepthStencilState) -> Result<()> {
        Self::set_depth_test(
            &mut self.state,
            state.depth_buffer_enable,
            state.depth_buffer_write_enable,
            state.depth_buffer_function,
        )?;

        Self::set_stencil_test(&mut self.state, state)
    }

    unsafe fn set_rasterizer_state(&mut self, state: &RasterizerState) -> Result<()> {
        Self::set_cull_mode(&mut self.state, state.cull_mode)?;
        self.set_fill_mode(state.fill_mode)?;
        Self::set_scissor_test(&mut self.state, state.scissor_test_enable)?;
        Self::set_depth_bias(
            &mut self.state,
            (state.slope_scale_depth_bias, state.depth_bias),
        )
    }

    unsafe fn set_sampler_state(&mut self, slot: usize, state: &SamplerState) -> Result<()> {
        if slot >= self.capabilities.max_combined_texture_image_units as usize {
            return Err(Error::Requirement(format!("texture unit {}", slot)));
        }

        gl::ActiveTexture(gl::TEXTURE0 + slot as GLuint);

        let (min, mag) = types::texture_filter(state.filter);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MIN_FILTER, min as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_MAG_FILTER, mag as GLint);

        let u: GLenum = state.address_u.into();
        let v: GLenum = state.address_v.into();
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_S, u as GLint);
        gl::TexParameteri(gl::TEXTURE_2D, gl::TEXTURE_WRAP_T, v as GLint);

        if let Some(max) = self.capabilities.max_anisotropy {
            let anisotropy = if state.filter == TextureFilter::Anisotropic {
                (state.max_anisotropy as f32).min(max).max(1.0)
            } else {
                1.0
            };

            gl::TexParameterf(gl::TEXTURE_2D, TEXTURE_MAX_ANISOTROPY_EXT, anisotropy);
        }

        gl::ActiveTexture(gl::TEXTURE0);
        check()
    }

    unsafe fn set_viewport(&mut self, vp: &Viewport) -> Result<()> {
        if self.state.viewport != Some(*vp) {
            gl::Viewport(vp.x, vp.y, vp.width, vp.height);
            gl::DepthRange(f64::from(vp.min_depth), f64::from(vp.max_depth));

            self.state.viewport = Some(*vp);
            check()?;
        }

        Ok(())
    }

    unsafe fn set_scissor(&mut self, rect: Rect) -> Result<()> {
        if self.state.scissor != Some(rect) {
            gl::Scissor(rect.x, rect.y, rect.width, rect.height);
            self.state.scissor = Some(rect);
            check()?;
        }

        Ok(())
    }

    unsafe fn clear(
        &mut self,
        options: ClearOptions,
        color: Color<f32>,
        depth: f32,
        stencil: i32,
    ) -> Result<()> {
        let mut bits = 0;

        // Clears are masked by the color and depth write masks, which are
        // lifted for the duration of the clear.
        if options.target {
            bits |= gl::COLOR_BUFFER_BIT;
            gl::ClearColor(color.r, color.g, color.b, color.a);
            gl::ColorMask(1, 1, 1, 1);
        }

        if options.depth {
            bits |= gl::DEPTH_BUFFER_BIT;
            gl::ClearDepth(f64::from(depth));
            gl::DepthMask(gl::TRUE);
        }

        if options.stencil {
            bits |= gl::STENCIL_BUFFER_BIT;
            gl::ClearStencil(stencil);
        }

        if bits == 0 {
            return Ok(());
        }

        gl::Clear(bits);

        let mask = self.state.color_write;
        gl::ColorMask(mask.0 as u8, mask.1 as u8, mask.2 as u8, mask.3 as u8);
        gl::DepthMask(self.state.depth_write as u8);
        check()
    }

    unsafe fn create_framebuffer(&mut self) -> Result<ObjectId> {
        let mut id = 0;
        gl::GenFramebuffers(1, &mut id);
        check()?;

        if id == 0 {
            return Err(backend_err!("[GL] Failed to generate framebuffer."));
        }

        Ok(id)
    }

    unsafe fn bind_framebuffer(&mut self, id: ObjectId) -> Result<()> {
        gl::BindFramebuffer(gl::FRAMEBUFFER, id);
        check()
    }

    unsafe fn framebuffer_binding(&mut self) -> Result<ObjectId> {
        let mut id = 0;
        gl::GetIntegerv(gl::FRAMEBUFFER_BINDING, &mut id);
        check()?;
        Ok(id as ObjectId)
    }

    unsafe fn check_framebuffer_status(&mut self) -> Result<FramebufferStatus> {
        let status = gl::CheckFramebufferStatus(gl::FRAMEBUFFER);
        check()?;

        if status == gl::FRAMEBUFFER_COMPLETE {
            return Ok(FramebufferStatus::Complete);
        }

        match status {
            gl::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => {
                warn!("[GL] Framebuffer is incomplete, not all attachment points are complete.")
            }
            gl::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => {
                warn!("[GL] Framebuffer is incomplete, no images are attached.")
            }
            gl::FRAMEBUFFER_UNSUPPORTED => warn!(
                "[GL] Framebuffer is incomplete, the combination of internal formats is unsupported."
            ),
            _ => warn!("[GL] Framebuffer is incomplete."),
        }

        Ok(FramebufferStatus::Incomplete(status))
    }

    unsafe fn attach_texture(
        &mut self,
        attachment: Attachment,
        texture: ObjectId,
        face: Option<CubeMapFace>,
    ) -> Result<()> {
        let target = face.map(GLenum::from).unwrap_or(gl::TEXTURE_2D);
        gl::FramebufferTexture2D(gl::FRAMEBUFFER, attachment.into(), target, texture, 0);
        check()
    }

    unsafe fn attach_renderbuffer(&mut self, attachment: Attachment, id: ObjectId) -> Result<()> {
        gl::FramebufferRenderbuffer(gl::FRAMEBUFFER, attachment.into(), gl::RENDERBUFFER, id);
        check()
    }

    unsafe fn delete_framebuffer(&mut self, id: ObjectId) -> Result<()> {
        gl::DeleteFramebuffers(1, &id);
        check()
    }

    unsafe fn create_renderbuffer(&mut self) -> Result<ObjectId> {
        let mut id = 0;
        gl::GenRenderbuffers(1, &mut id);
        check()?;

        if id == 0 {
            return Err(backend_err!("[GL] Failed to generate renderbuffer."));
        }

        Ok(id)
    }

    unsafe fn bind_renderbuffer(&mut self, id: ObjectId) -> Result<()> {
        gl::BindRenderbuffer(gl::RENDERBUFFER, id);
        check()
    }

    unsafe fn renderbuffer_storage(
        &mut self,
        format: DepthFormat,
        dimensions: Vector2<u32>,
    ) -> Result<()> {
        if format.has_stencil() && !self.capabilities.has_packed_depth_stencil() {
            return Err(Error::Requirement("packed depth stencil".into()));
        }

        gl::RenderbufferStorage(
            gl::RENDERBUFFER,
            format.into(),
            dimensions.x as GLsizei,
            dimensions.y as GLsizei,
        );

        check()
    }

    unsafe fn delete_renderbuffer(&mut self, id: ObjectId) -> Result<()> {
        gl::DeleteRenderbuffers(1, &id);
        check()
    }

    unsafe fn create_buffer(&mut self) -> Result<ObjectId> {
        let mut id = 0;
        gl::GenBuffers(1, &mut id);
        check()?;

        if id == 0 {
            return Err(backend_err!("[GL] Failed to generate buffer."));
        }

        Ok(id)
    }

    unsafe fn bind_buffer(&mut self, target: BufferTarget, id: ObjectId) -> Result<()> {
        gl::BindBuffer(target.into(), id);
        check()
    }

    unsafe fn buffer_data(&mut self, target: BufferTarget, bytes: &[u8]) -> Result<()> {
        let value = if bytes.is_empty() {
            ::std::ptr::null()
        } else {
            bytes.as_ptr() as *const c_void
        };

        gl::BufferData(
            target.into(),
            bytes.len() as GLsizeiptr,
            value,
            gl::DYNAMIC_DRAW,
        );

        check()
    }

    unsafe fn delete_buffer(&mut self, id: ObjectId) -> Result<()> {
        gl::DeleteBuffers(1, &id);
        check()
    }

    unsafe fn enable_vertex_layout(&mut self, layout: &VertexLayout) -> Result<()> {
        let stride = GLsizei::from(layout.stride());

        for (element, offset) in layout.iter() {
            let location = element.attribute.location();
            if location >= self.capabilities.max_vertex_attribs {
                return Err(Error::Requirement(format!(
                    "vertex attribute {:?}",
                    element.attribute
                )));
            }

            gl::EnableVertexAttribArray(location);
            gl::VertexAttribPointer(
                location,
                GLint::from(element.size),
                element.format.into(),
                element.normalized as u8,
                stride,
                offset as usize as *const c_void,
            );
        }

        check()
    }

    unsafe fn disable_vertex_layout(&mut self, layout: &VertexLayout) -> Result<()> {
        for (element, _) in layout.iter() {
            gl::DisableVertexAttribArray(element.attribute.location());
        }

        check()
    }

    unsafe fn unbind_program(&mut self) -> Result<()> {
        gl::UseProgram(0);
        check()
    }

    unsafe fn draw_arrays(&mut self, topology: Topology, first: u32, count: u32) -> Result<()> {
        gl::DrawArrays(topology.into(), first as GLint, count as GLsizei);
        check()
    }

    unsafe fn draw_elements(
        &mut self,
        topology: Topology,
        count: u32,
        format: IndexFormat,
        offset: usize,
    ) -> Result<()> {
        if format == IndexFormat::U32
            && self.capabilities.version < Version::ES(3, 0)
            && self.capabilities.is_es()
        {
            return Err(Error::Requirement("32-bit indices".into()));
        }

        gl::DrawElements(
            topology.into(),
            count as GLsizei,
            format.into(),
            offset as *const c_void,
        );

        check()
    }

    unsafe fn flush(&mut self) -> Result<()> {
        gl::Flush();
        check()
    }
}

impl GLVisitor {
    unsafe fn reset_render_state(state: &mut GLMutableState) -> Result<()> {
        gl::Disable(gl::CULL_FACE);
        gl::FrontFace(gl::CCW);
        state.cull_mode = CullMode::None;

        gl::Disable(gl::DEPTH_TEST);
        gl::DepthMask(gl::FALSE);
        gl::DepthFunc(gl::ALWAYS);
        state.depth_test = false;
        state.depth_write = false;
        state.depth_func = Comparison::Always;

        gl::Disable(gl::POLYGON_OFFSET_FILL);
        state.depth_bias = (0.0, 0.0);

        gl::Disable(gl::STENCIL_TEST);
        state.stencil_test = false;

        gl::Disable(gl::BLEND);
        state.color_blend = None;

        gl::ColorMask(1, 1, 1, 1);
        state.color_write = (true, true, true, true);

        gl::Disable(gl::SCISSOR_TEST);
        state.scissor_test = false;

        gl::PixelStorei(gl::UNPACK_ALIGNMENT, 1);
        check()
    }

    /// Culling counter-clockwise faces means clockwise faces are the front
    /// ones, and the other way around.
    unsafe fn set_cull_mode(state: &mut GLMutableState, mode: CullMode) -> Result<()> {
        if state.cull_mode != mode {
            match mode {
                CullMode::None => gl::Disable(gl::CULL_FACE),
                CullMode::CullClockwiseFace => {
                    gl::Enable(gl::CULL_FACE);
                    gl::CullFace(gl::BACK);
                    gl::FrontFace(gl::CCW);
                }
                CullMode::CullCounterClockwiseFace => {
                    gl::Enable(gl::CULL_FACE);
                    gl::CullFace(gl::BACK);
                    gl::FrontFace(gl::CW);
                }
            }

            state.cull_mode = mode;
            check()?;
        }

        Ok(())
    }

    unsafe fn set_fill_mode(&mut self, mode: FillMode) -> Result<()> {
        if self.state.fill_mode != mode {
            if self.capabilities.is_es() {
                return Err(Error::Requirement(format!("fill mode {:?}", mode)));
            }

            gl::PolygonMode(
                gl::FRONT_AND_BACK,
                match mode {
                    FillMode::Solid => gl::FILL,
                    FillMode::WireFrame => gl::LINE,
                },
            );

            self.state.fill_mode = mode;
            check()?;
        }

        Ok(())
    }

    unsafe fn set_scissor_test(state: &mut GLMutableState, enable: bool) -> Result<()> {
        if state.scissor_test != enable {
            if enable {
                gl::Enable(gl::SCISSOR_TEST);
            } else {
                gl::Disable(gl::SCISSOR_TEST);
            }

            state.scissor_test = enable;
            check()?;
        }

        Ok(())
    }

    /// Sets the scale and units used to calculate depth values.
    unsafe fn set_depth_bias(state: &mut GLMutableState, bias: (f32, f32)) -> Result<()> {
        if state.depth_bias != bias {
            if bias.0 != 0.0 || bias.1 != 0.0 {
                gl::Enable(gl::POLYGON_OFFSET_FILL);
                gl::PolygonOffset(bias.0, bias.1);
            } else {
                gl::Disable(gl::POLYGON_OFFSET_FILL);
            }

            state.depth_bias = bias;
            check()?;
        }

        Ok(())
    }

    /// Enable or disable writing into the depth buffer and specify the value
    /// used for depth buffer comparisons.
    unsafe fn set_depth_test(
        state: &mut GLMutableState,
        enable: bool,
        write: bool,
        comparison: Comparison,
    ) -> Result<()> {
        // The depth buffer is not updated if the depth test is disabled, even
        // with a non-zero depth mask.
        if state.depth_test != enable {
            if enable {
                gl::Enable(gl::DEPTH_TEST);
            } else {
                gl::Disable(gl::DEPTH_TEST);
            }

            state.depth_test = enable;
        }

        if state.depth_write != write {
            gl::DepthMask(write as u8);
            state.depth_write = write;
        }

        if state.depth_func != comparison {
            gl::DepthFunc(comparison.into());
            state.depth_func = comparison;
        }

        check()
    }

    unsafe fn set_stencil_test(
        state: &mut GLMutableState,
        ds: &DepthStencilState,
    ) -> Result<()> {
        if !ds.stencil_enable {
            if state.stencil_test {
                gl::Disable(gl::STENCIL_TEST);
                state.stencil_test = false;
            }

            return check();
        }

        if !state.stencil_test {
            gl::Enable(gl::STENCIL_TEST);
            state.stencil_test = true;
        }

        gl::StencilFunc(
            ds.stencil_function.into(),
            ds.reference_stencil,
            ds.stencil_mask,
        );

        gl::StencilOp(
            ds.stencil_fail.into(),
            ds.stencil_depth_buffer_fail.into(),
            ds.stencil_pass.into(),
        );

        gl::StencilMask(ds.stencil_write_mask);
        check()
    }

    /// Specifies how source and destination are combined.
    unsafe fn set_color_blend(
        state: &mut GLMutableState,
        blend: Option<(Equation, BlendFactor, BlendFactor)>,
    ) -> Result<()> {
        if state.color_blend != blend {
            if let Some((equation, src, dst)) = blend {
                if state.color_blend == None {
                    gl::Enable(gl::BLEND);
                }

                gl::BlendFunc(src.into(), dst.into());
                gl::BlendEquation(equation.into());
            } else {
                gl::Disable(gl::BLEND);
            }

            state.color_blend = blend;
            check()?;
        }

        Ok(())
    }

    /// Enable or disable writing color elements into the color buffer.
    unsafe fn set_color_write(
        state: &mut GLMutableState,
        mask: (bool, bool, bool, bool),
    ) -> Result<()> {
        if state.color_write != mask {
            gl::ColorMask(mask.0 as u8, mask.1 as u8, mask.2 as u8, mask.3 as u8);
            state.color_write = mask;
            check()?;
        }

        Ok(())
    }
}

unsafe fn check() -> Result<()> {
    match gl::GetError() {
        gl::NO_ERROR => Ok(()),

        gl::INVALID_ENUM => Err(backend_err!(
            "[GL] An unacceptable value is specified for an enumerated argument."
        )),

        gl::INVALID_VALUE => Err(backend_err!("[GL] A numeric argument is out of range.")),

        gl::INVALID_OPERATION => Err(backend_err!(
            "[GL] The specified operation is not allowed in the current state."
        )),

        gl::INVALID_FRAMEBUFFER_OPERATION => Err(backend_err!(
            "[GL] The command is trying to render to or read from the framebuffer while the \
             currently bound framebuffer is not framebuffer complete."
        )),

        gl::OUT_OF_MEMORY => Err(backend_err!(
            "[GL] There is not enough memory left to execute the command."
        )),

        v => Err(backend_err!("[GL] Unknown OpenGL error 0x{:X}.", v)),
    }
}
