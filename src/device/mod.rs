//! The stateful graphics device.
//!
//! `GraphicsDevice` keeps a CPU-side mirror of the native device state, and
//! pushes every change through its `Visitor` synchronously. Nothing is
//! deferred or batched, so reading a property always returns exactly what the
//! native context has been told.
//!
//! A device is bound to exactly one native context, and should be driven from
//! the thread owning that context.

#[macro_use]
pub mod vertex;
pub mod buffer;
pub mod events;
pub mod primitive;
pub mod settings;
pub mod state;
pub mod target;
pub mod viewport;

mod draw;

pub mod prelude {
    pub use super::buffer::{IndexBuffer, IndexElement, IndexFormat, VertexBuffer};
    pub use super::events::{ContentReloader, DeviceEvent, DeviceListener, DeviceListenerHandle};
    pub use super::primitive::{PrimitiveType, Topology};
    pub use super::settings::{DeviceParams, PresentationParameters};
    pub use super::state::*;
    pub use super::target::{
        CubeMapFace, DepthFormat, RenderTarget2D, RenderTargetBinding, RenderTargetUsage,
    };
    pub use super::vertex::{
        Attribute, VertexElement, VertexFormat, VertexLayout, VertexLayoutBuilder, VertexType,
    };
    pub use super::viewport::{DisplayOrientation, Viewport};
    pub use super::GraphicsDevice;
}

use std::rc::Rc;

use crate::backends::{ObjectId, Visitor};
use crate::errors::*;
use crate::math::{Color, Rect, Vector4};

use self::buffer::{IndexBuffer, VertexBuffer};
use self::events::{ContentReloader, DeviceEvent, DeviceListener, DeviceListenerHandle, DeviceListeners};
use self::settings::{DeviceParams, PresentationParameters};
use self::state::*;
use self::target::Binder;
use self::vertex::VertexLayout;
use self::viewport::Viewport;

pub struct GraphicsDevice<V: Visitor> {
    visitor: V,
    params: PresentationParameters,

    viewport: Viewport,
    scissor: Rect,
    blend_state: BlendState,
    depth_stencil_state: DepthStencilState,
    rasterizer_state: RasterizerState,
    sampler_states: SamplerStateCollection,

    vertex_declaration: Option<VertexLayout>,
    vertex_buffer: Option<Rc<VertexBuffer>>,
    index_buffer: Option<Rc<IndexBuffer>>,
    vbo: Option<ObjectId>,
    ibo: Option<ObjectId>,
    reset_vertex_states: bool,

    binder: Binder,

    listeners: DeviceListeners,
    content: Option<Box<dyn ContentReloader>>,
    lost: bool,
    resources_lost: bool,
    disposed: bool,
}

impl<V: Visitor> GraphicsDevice<V> {
    /// Creates a new device on top of `visitor`, and pushes the initial states
    /// described by `params`.
    pub fn new(visitor: V, params: DeviceParams) -> Result<Self> {
        let presentation = params.presentation;
        let mut device = GraphicsDevice {
            visitor,
            params: presentation,
            viewport: Viewport::new(
                0,
                0,
                presentation.back_buffer_width as i32,
                presentation.back_buffer_height as i32,
            ),
            scissor: Rect::default(),
            blend_state: params.blend_state,
            depth_stencil_state: params.depth_stencil_state,
            rasterizer_state: params.rasterizer_state,
            sampler_states: SamplerStateCollection::default(),
            vertex_declaration: None,
            vertex_buffer: None,
            index_buffer: None,
            vbo: None,
            ibo: None,
            reset_vertex_states: false,
            binder: Binder::default(),
            listeners: DeviceListeners::default(),
            content: None,
            lost: false,
            resources_lost: false,
            disposed: false,
        };

        unsafe {
            device.visitor.set_blend_state(&device.blend_state)?;
            device
                .visitor
                .set_depth_stencil_state(&device.depth_stencil_state)?;
            device
                .visitor
                .set_rasterizer_state(&device.rasterizer_state)?;
            device.visitor.set_viewport(&device.viewport)?;
        }

        info!(
            "Creates graphics device with {}x{} back-buffer.",
            presentation.back_buffer_width, presentation.back_buffer_height
        );

        Ok(device)
    }

    #[inline]
    pub fn visitor(&self) -> &V {
        &self.visitor
    }

    #[inline]
    pub fn visitor_mut(&mut self) -> &mut V {
        &mut self.visitor
    }

    #[inline]
    pub fn presentation_parameters(&self) -> &PresentationParameters {
        &self.params
    }

    /// Replaces the presentation parameters. The new back-buffer size takes
    /// effect on the next `reset`, the orientation on the next scissor write.
    #[inline]
    pub fn set_presentation_parameters(&mut self, params: PresentationParameters) {
        self.params = params;
    }

    pub(crate) fn check_alive(&self) -> Result<()> {
        if self.disposed {
            return Err(Error::Disposed);
        }

        Ok(())
    }
}

impl<V: Visitor> GraphicsDevice<V> {
    #[inline]
    pub fn blend_state(&self) -> &BlendState {
        &self.blend_state
    }

    pub fn set_blend_state(&mut self, state: BlendState) -> Result<()> {
        self.check_alive()?;
        self.blend_state = state;
        unsafe { self.visitor.set_blend_state(&self.blend_state) }
    }

    #[inline]
    pub fn depth_stencil_state(&self) -> &DepthStencilState {
        &self.depth_stencil_state
    }

    pub fn set_depth_stencil_state(&mut self, state: DepthStencilState) -> Result<()> {
        self.check_alive()?;
        self.depth_stencil_state = state;
        unsafe {
            self.visitor
                .set_depth_stencil_state(&self.depth_stencil_state)
        }
    }

    #[inline]
    pub fn rasterizer_state(&self) -> &RasterizerState {
        &self.rasterizer_state
    }

    pub fn set_rasterizer_state(&mut self, state: RasterizerState) -> Result<()> {
        self.check_alive()?;
        self.rasterizer_state = state;
        unsafe { self.visitor.set_rasterizer_state(&self.rasterizer_state) }
    }

    #[inline]
    pub fn sampler_states(&self) -> &SamplerStateCollection {
        &self.sampler_states
    }

    /// Sets the sampler state of texture unit `slot`.
    pub fn set_sampler_state(&mut self, slot: usize, state: SamplerState) -> Result<()> {
        self.check_alive()?;
        if slot >= MAX_SAMPLERS {
            return Err(Error::OutOfBounds(format!(
                "sampler slot {} of {}",
                slot, MAX_SAMPLERS
            )));
        }

        self.sampler_states.set(slot, state);
        unsafe { self.visitor.set_sampler_state(slot, &state) }
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.check_alive()?;
        self.viewport = viewport;
        unsafe { self.visitor.set_viewport(&self.viewport) }
    }

    /// Gets the scissor rectangle, in the logical space it was set in.
    #[inline]
    pub fn scissor_rectangle(&self) -> Rect {
        self.scissor
    }

    /// Sets the scissor rectangle. The rectangle is given with a top-left
    /// origin, and gets rotated by the display orientation before being
    /// pushed. Negative dimensions are passed through.
    pub fn set_scissor_rectangle(&mut self, rect: Rect) -> Result<()> {
        self.check_alive()?;
        self.scissor = rect;

        let native = self
            .params
            .display_orientation
            .orient_scissor(rect, &self.viewport);
        unsafe { self.visitor.set_scissor(native) }
    }

    /// Gets the vertex declaration used when the current vertex buffer carries
    /// none of its own.
    #[inline]
    pub fn vertex_declaration(&self) -> Option<&VertexLayout> {
        self.vertex_declaration.as_ref()
    }

    #[inline]
    pub fn set_vertex_declaration(&mut self, declaration: Option<VertexLayout>) {
        self.vertex_declaration = declaration;
    }

    /// Clears the buffers selected by `options` of the current render target.
    pub fn clear(
        &mut self,
        options: ClearOptions,
        color: Color<f32>,
        depth: f32,
        stencil: i32,
    ) -> Result<()> {
        self.check_alive()?;
        if options.is_empty() {
            return Ok(());
        }

        unsafe { self.visitor.clear(options, color, depth, stencil) }
    }

    /// Clears color, depth and stencil buffers. Depth is cleared to the max
    /// depth of the current viewport.
    pub fn clear_color(&mut self, color: Color<f32>) -> Result<()> {
        let depth = self.viewport.max_depth;
        self.clear(ClearOptions::all(), color, depth, 0)
    }

    /// Clearing a list of regions is not supported.
    pub fn clear_regions(
        &mut self,
        _: ClearOptions,
        _: Vector4<f32>,
        _: f32,
        _: i32,
        _: &[Rect],
    ) -> Result<()> {
        unsupported!("Clearing regions");
    }

    /// Presents the back-buffer. Swapping is handled by the window system, so
    /// this only flushes the native command queue.
    pub fn present(&mut self) -> Result<()> {
        self.check_alive()?;
        unsafe { self.visitor.flush() }
    }

    /// Presenting a sub-rectangle of the back-buffer is not supported.
    pub fn present_region(&mut self, src: Option<Rect>, dst: Option<Rect>) -> Result<()> {
        if src.is_some() || dst.is_some() {
            unsupported!("Presenting regions");
        }

        self.present()
    }
}

impl<V: Visitor> GraphicsDevice<V> {
    /// Registers a listener of device lifetime events. Listeners are notified
    /// synchronously, in the order they were added.
    pub fn add_listener<T>(&mut self, listener: T) -> DeviceListenerHandle
    where
        T: DeviceListener + 'static,
    {
        self.listeners.add(listener)
    }

    /// Removes a listener, returns false if it has been removed already.
    pub fn remove_listener(&mut self, handle: DeviceListenerHandle) -> bool {
        self.listeners.remove(handle)
    }

    /// Sets the collaborator reloading content on `reset` once resources have
    /// been lost.
    pub fn set_content_reloader<T>(&mut self, reloader: T)
    where
        T: ContentReloader + 'static,
    {
        self.content = Some(Box::new(reloader));
    }

    #[inline]
    pub fn is_lost(&self) -> bool {
        self.lost
    }

    #[inline]
    pub fn resources_lost(&self) -> bool {
        self.resources_lost
    }

    #[inline]
    pub fn set_resources_lost(&mut self, lost: bool) {
        self.resources_lost = lost;
    }

    /// Marks the device as lost. The native objects owned by this device went
    /// away with the context, so they are forgotten instead of deleted.
    pub fn notify_device_lost(&mut self) -> Result<()> {
        self.check_alive()?;

        info!("Graphics device lost.");
        self.lost = true;
        self.resources_lost = true;
        self.vbo = None;
        self.ibo = None;
        self.forget_render_targets();

        self.notify(DeviceEvent::Lost)
    }

    /// Resets the device after it has been lost, or the back-buffer has been
    /// resized. Content is reloaded if resources have been lost.
    pub fn reset(&mut self) -> Result<()> {
        self.check_alive()?;

        let viewport = Viewport {
            width: self.params.back_buffer_width as i32,
            height: self.params.back_buffer_height as i32,
            ..self.viewport
        };

        if self.lost {
            // The recreated context starts from its defaults, so every state
            // gets pushed again.
            self.viewport = viewport;
            unsafe { self.visitor.invalidate_state()? };
            self.push_states()?;
        } else {
            self.set_viewport(viewport)?;
        }

        self.notify(DeviceEvent::Resetting)?;

        if self.resources_lost {
            if let Some(ref mut content) = self.content {
                content
                    .reload_all_content()
                    .map_err(|err| Error::ContentReload(format!("{}", err)))?;
            }

            self.resources_lost = false;
        }

        self.lost = false;
        info!(
            "Resets graphics device with {}x{} back-buffer.",
            viewport.width, viewport.height
        );

        self.notify(DeviceEvent::Reset)
    }

    /// Resetting with a different set of presentation parameters is not
    /// supported.
    pub fn reset_with(&mut self, _: PresentationParameters) -> Result<()> {
        unsupported!("Resetting with presentation parameters");
    }

    fn push_states(&mut self) -> Result<()> {
        let scissor = self
            .params
            .display_orientation
            .orient_scissor(self.scissor, &self.viewport);

        unsafe {
            self.visitor.set_blend_state(&self.blend_state)?;
            self.visitor
                .set_depth_stencil_state(&self.depth_stencil_state)?;
            self.visitor.set_rasterizer_state(&self.rasterizer_state)?;
            self.visitor.set_viewport(&self.viewport)?;
            self.visitor.set_scissor(scissor)?;

            // Slots never assigned are left to the native defaults.
            let fallback = SamplerState::default();
            for (slot, state) in self.sampler_states.iter().enumerate() {
                if *state != fallback {
                    self.visitor.set_sampler_state(slot, state)?;
                }
            }
        }

        Ok(())
    }

    fn notify(&mut self, event: DeviceEvent) -> Result<()> {
        self.listeners
            .notify(event)
            .map_err(|err| Error::Listener(format!("{}", err)))
    }
}

impl<V: Visitor> GraphicsDevice<V> {
    /// Releases the native objects owned by this device. Any further operation
    /// fails with `Error::Disposed`.
    pub fn dispose(&mut self) -> Result<()> {
        if self.disposed {
            return Ok(());
        }

        self.unbind_render_targets()?;

        unsafe {
            if let Some(vbo) = self.vbo.take() {
                debug!("Deletes vertex buffer object {}.", vbo);
                self.visitor.delete_buffer(vbo)?;
            }

            if let Some(ibo) = self.ibo.take() {
                debug!("Deletes index buffer object {}.", ibo);
                self.visitor.delete_buffer(ibo)?;
            }
        }

        self.vertex_buffer = None;
        self.index_buffer = None;
        self.disposed = true;
        info!("Disposes graphics device.");
        Ok(())
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Content created on a disposed device is gone for good.
    #[inline]
    pub fn is_content_lost(&self) -> bool {
        self.disposed
    }
}

impl<V: Visitor> Drop for GraphicsDevice<V> {
    fn drop(&mut self) {
        if !self.disposed {
            warn!("Graphics device dropped without being disposed.");
        }
    }
}
