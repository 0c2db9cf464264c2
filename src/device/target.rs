//! Render targets and the framebuffer objects backing them.

use std::mem;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::backends::{Attachment, FramebufferStatus, ObjectId, Visitor};
use crate::errors::*;
use crate::math::{Color, Vector2};

use super::state::ClearOptions;
use super::viewport::Viewport;
use super::GraphicsDevice;

/// The depth-stencil storage allocated for a render target.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepthFormat {
    /// No explicit request, a 24-bit depth buffer is allocated.
    None,
    Depth16,
    Depth24,
    Depth24Stencil8,
}

impl Default for DepthFormat {
    fn default() -> Self {
        DepthFormat::None
    }
}

impl DepthFormat {
    #[inline]
    pub fn has_stencil(self) -> bool {
        self == DepthFormat::Depth24Stencil8
    }
}

/// Determines what happens to the contents of a render target when it gets
/// bound to the device.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RenderTargetUsage {
    /// The contents are cleared as soon as the target is bound.
    DiscardContents,
    PreserveContents,
    PlatformContents,
}

impl Default for RenderTargetUsage {
    fn default() -> Self {
        RenderTargetUsage::DiscardContents
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeMapFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

/// A 2D texture that can be rendered into. The color texture is created by
/// the framework; the device only allocates the depth-stencil storage while
/// the target is bound.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderTarget2D {
    texture: ObjectId,
    dimensions: Vector2<u32>,
    depth_format: DepthFormat,
    usage: RenderTargetUsage,
}

impl RenderTarget2D {
    pub fn new(texture: ObjectId, width: u32, height: u32) -> Self {
        RenderTarget2D {
            texture,
            dimensions: Vector2::new(width, height),
            depth_format: DepthFormat::default(),
            usage: RenderTargetUsage::default(),
        }
    }

    #[inline]
    pub fn with_depth_format(mut self, format: DepthFormat) -> Self {
        self.depth_format = format;
        self
    }

    #[inline]
    pub fn with_usage(mut self, usage: RenderTargetUsage) -> Self {
        self.usage = usage;
        self
    }

    /// The native name of the color texture.
    #[inline]
    pub fn texture(&self) -> ObjectId {
        self.texture
    }

    #[inline]
    pub fn dimensions(&self) -> Vector2<u32> {
        self.dimensions
    }

    #[inline]
    pub fn depth_format(&self) -> DepthFormat {
        self.depth_format
    }

    #[inline]
    pub fn usage(&self) -> RenderTargetUsage {
        self.usage
    }
}

/// A render target with an optional cube face.
#[derive(Debug, Clone)]
pub struct RenderTargetBinding {
    target: Rc<RenderTarget2D>,
    face: Option<CubeMapFace>,
}

impl RenderTargetBinding {
    pub fn new(target: Rc<RenderTarget2D>) -> Self {
        RenderTargetBinding { target, face: None }
    }

    pub fn with_face(target: Rc<RenderTarget2D>, face: CubeMapFace) -> Self {
        RenderTargetBinding {
            target,
            face: Some(face),
        }
    }

    #[inline]
    pub fn target(&self) -> &Rc<RenderTarget2D> {
        &self.target
    }

    #[inline]
    pub fn face(&self) -> Option<CubeMapFace> {
        self.face
    }
}

impl PartialEq for RenderTargetBinding {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.target, &other.target) && self.face == other.face
    }
}

impl From<Rc<RenderTarget2D>> for RenderTargetBinding {
    fn from(target: Rc<RenderTarget2D>) -> Self {
        RenderTargetBinding::new(target)
    }
}

/// The objects owned by a bound set of render targets.
#[derive(Debug)]
pub(crate) struct BoundTargets {
    bindings: Vec<RenderTargetBinding>,
    framebuffers: SmallVec<[ObjectId; 4]>,
    renderbuffers: SmallVec<[ObjectId; 4]>,
    stencil: bool,
    original_framebuffer: ObjectId,
    saved_viewport: Viewport,
}

/// Render targets could only be switched through `set_render_targets` and
/// `set_render_target`, or dropped when the device gets lost.
#[derive(Debug)]
pub(crate) enum Binder {
    Unbound,
    Bound(BoundTargets),
}

impl Default for Binder {
    fn default() -> Self {
        Binder::Unbound
    }
}

impl<V: Visitor> GraphicsDevice<V> {
    /// Binds a single render target, or restores the back-buffer if `None`.
    ///
    /// Any render target set previously is unbound first, even if it is the
    /// one requested.
    pub fn set_render_target(&mut self, target: Option<Rc<RenderTarget2D>>) -> Result<()> {
        match target {
            Some(v) => self.set_render_targets(&[RenderTargetBinding::new(v)]),
            None => self.set_render_targets(&[]),
        }
    }

    /// Binds a set of render targets. An empty set unbinds the current one,
    /// restoring the default framebuffer and the viewport saved at bind time.
    pub fn set_render_targets(&mut self, bindings: &[RenderTargetBinding]) -> Result<()> {
        self.check_alive()?;

        self.unbind_render_targets()?;
        if !bindings.is_empty() {
            self.bind_render_targets(bindings.to_vec())?;
        }

        Ok(())
    }

    /// Returns the active render targets, empty when drawing into the
    /// back-buffer.
    pub fn render_targets(&self) -> &[RenderTargetBinding] {
        match self.binder {
            Binder::Bound(ref v) => &v.bindings,
            Binder::Unbound => &[],
        }
    }

    fn bind_render_targets(&mut self, bindings: Vec<RenderTargetBinding>) -> Result<()> {
        let original_framebuffer = unsafe { self.visitor.framebuffer_binding()? };
        let mut bound = BoundTargets {
            bindings,
            framebuffers: SmallVec::new(),
            renderbuffers: SmallVec::new(),
            stencil: false,
            original_framebuffer,
            saved_viewport: self.viewport,
        };

        if let Err(err) = self.attach_render_targets(&mut bound) {
            if let Err(v) = self.release_render_targets(bound) {
                warn!("Failed to release render targets, errors: {}.", v);
            }

            return Err(err);
        }

        let dimensions = bound.bindings[0].target.dimensions();
        info!(
            "Binds {} render target(s) of {}x{}.",
            bound.bindings.len(),
            dimensions.x,
            dimensions.y
        );

        self.binder = Binder::Bound(bound);
        self.set_viewport(Viewport::new(
            0,
            0,
            dimensions.x as i32,
            dimensions.y as i32,
        ))
    }

    fn attach_render_targets(&mut self, bound: &mut BoundTargets) -> Result<()> {
        unsafe {
            for binding in &bound.bindings {
                let target = &binding.target;

                let rbo = self.visitor.create_renderbuffer()?;
                bound.renderbuffers.push(rbo);
                self.visitor.bind_renderbuffer(rbo)?;

                let fbo = self.visitor.create_framebuffer()?;
                bound.framebuffers.push(fbo);
                self.visitor.bind_framebuffer(fbo)?;

                debug!("Creates framebuffer {} with renderbuffer {}.", fbo, rbo);

                let format = target.depth_format();
                self.visitor
                    .renderbuffer_storage(format, target.dimensions())?;

                let mut clear = ClearOptions::target().with_depth();
                if format.has_stencil() {
                    self.visitor.attach_renderbuffer(Attachment::Stencil, rbo)?;
                    bound.stencil = true;
                    clear = clear.with_stencil();
                }

                self.visitor
                    .attach_texture(Attachment::Color0, target.texture(), binding.face)?;
                self.visitor.attach_renderbuffer(Attachment::Depth, rbo)?;
                self.visitor.bind_renderbuffer(0)?;

                // Clearing an incomplete framebuffer fails on its own, which
                // would hide the status code.
                if let FramebufferStatus::Incomplete(code) =
                    self.visitor.check_framebuffer_status()?
                {
                    return Err(Error::FramebufferIncomplete(code));
                }

                if target.usage() == RenderTargetUsage::DiscardContents {
                    self.visitor.clear(clear, Color::transparent(), 1.0, 0)?;
                }
            }
        }

        Ok(())
    }

    /// Unbinds the current render targets if there are any, and restores the
    /// viewport saved when they were bound.
    pub(crate) fn unbind_render_targets(&mut self) -> Result<()> {
        let bound = match mem::replace(&mut self.binder, Binder::Unbound) {
            Binder::Bound(v) => v,
            Binder::Unbound => return Ok(()),
        };

        info!("Unbinds {} render target(s).", bound.bindings.len());

        let viewport = bound.saved_viewport;
        self.release_render_targets(bound)?;
        self.set_viewport(viewport)
    }

    /// Drops the bound render targets without releasing their objects, which
    /// died with the context. The viewport saved at bind time is restored
    /// into the mirror only.
    pub(crate) fn forget_render_targets(&mut self) {
        if let Binder::Bound(bound) = mem::replace(&mut self.binder, Binder::Unbound) {
            info!("Forgets {} render target(s).", bound.bindings.len());
            self.viewport = bound.saved_viewport;
        }
    }

    fn release_render_targets(&mut self, bound: BoundTargets) -> Result<()> {
        unsafe {
            if !bound.framebuffers.is_empty() {
                self.visitor.attach_renderbuffer(Attachment::Depth, 0)?;
                if bound.stencil {
                    self.visitor.attach_renderbuffer(Attachment::Stencil, 0)?;
                }

                self.visitor.attach_texture(Attachment::Color0, 0, None)?;
            }

            for &v in &bound.renderbuffers {
                debug!("Deletes renderbuffer {}.", v);
                self.visitor.delete_renderbuffer(v)?;
            }

            for &v in &bound.framebuffers {
                debug!("Deletes framebuffer {}.", v);
                self.visitor.delete_framebuffer(v)?;
            }

            self.visitor.bind_framebuffer(bound.original_framebuffer)
        }
    }
}
