//! Immutable device state descriptors. Assigning one of these to the
//! `GraphicsDevice` replaces the CPU-side mirror and pushes the equivalent
//! native state immediately.

use serde::{Deserialize, Serialize};

/// The maximum number of sampler slots tracked by the device.
pub const MAX_SAMPLERS: usize = 16;

/// Specify the value used for depth or stencil buffer comparisons.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Comparison {
    Never,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    Equal,
    NotEqual,
    Always,
}

/// Specifies how incoming RGBA values (source) and the RGBA in framebuffer
/// (destination) are combined.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum Equation {
    /// Adds source and destination. Source and destination are multiplied
    /// by blending parameters before addition.
    Add,
    /// Subtracts destination from source. Source and destination are
    /// multiplied by blending parameters before subtraction.
    Subtract,
    /// Subtracts source from destination. Source and destination are
    /// multiplied by blending parameters before subtraction.
    ReverseSubtract,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum BlendValue {
    SourceColor,
    SourceAlpha,
    DestinationColor,
    DestinationAlpha,
}

/// Blend factors.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum BlendFactor {
    Zero,
    One,
    Value(BlendValue),
    OneMinusValue(BlendValue),
}

/// Describes how source and destination colors are combined.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendState {
    /// `None` disables blending.
    pub color_blend: Option<(Equation, BlendFactor, BlendFactor)>,
    /// Enable or disable writing color elements into the color buffer.
    pub color_write: (bool, bool, bool, bool),
}

impl Default for BlendState {
    fn default() -> Self {
        BlendState::opaque()
    }
}

impl BlendState {
    /// Overwrites the destination with the source.
    pub fn opaque() -> Self {
        BlendState {
            color_blend: None,
            color_write: (true, true, true, true),
        }
    }

    /// Blends premultiplied source with the destination.
    pub fn alpha_blend() -> Self {
        BlendState {
            color_blend: Some((
                Equation::Add,
                BlendFactor::One,
                BlendFactor::OneMinusValue(BlendValue::SourceAlpha),
            )),
            color_write: (true, true, true, true),
        }
    }

    /// Adds the source, weighted by its alpha, to the destination.
    pub fn additive() -> Self {
        BlendState {
            color_blend: Some((
                Equation::Add,
                BlendFactor::Value(BlendValue::SourceAlpha),
                BlendFactor::One,
            )),
            color_write: (true, true, true, true),
        }
    }

    /// Blends non-premultiplied source with the destination.
    pub fn non_premultiplied() -> Self {
        BlendState {
            color_blend: Some((
                Equation::Add,
                BlendFactor::Value(BlendValue::SourceAlpha),
                BlendFactor::OneMinusValue(BlendValue::SourceAlpha),
            )),
            color_write: (true, true, true, true),
        }
    }
}

/// The action taken on the stencil buffer.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum StencilOperation {
    Keep,
    Zero,
    Replace,
    Increment,
    Decrement,
    IncrementSaturation,
    DecrementSaturation,
    Invert,
}

/// Describes the depth and stencil tests.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthStencilState {
    pub depth_buffer_enable: bool,
    pub depth_buffer_write_enable: bool,
    pub depth_buffer_function: Comparison,
    pub stencil_enable: bool,
    pub stencil_function: Comparison,
    pub stencil_pass: StencilOperation,
    pub stencil_fail: StencilOperation,
    pub stencil_depth_buffer_fail: StencilOperation,
    pub reference_stencil: i32,
    pub stencil_mask: u32,
    pub stencil_write_mask: u32,
}

impl Default for DepthStencilState {
    fn default() -> Self {
        DepthStencilState {
            depth_buffer_enable: true,
            depth_buffer_write_enable: true,
            depth_buffer_function: Comparison::LessOrEqual,
            stencil_enable: false,
            stencil_function: Comparison::Always,
            stencil_pass: StencilOperation::Keep,
            stencil_fail: StencilOperation::Keep,
            stencil_depth_buffer_fail: StencilOperation::Keep,
            reference_stencil: 0,
            stencil_mask: u32::max_value(),
            stencil_write_mask: u32::max_value(),
        }
    }
}

impl DepthStencilState {
    /// Tests against the depth buffer without writing into it.
    pub fn depth_read() -> Self {
        DepthStencilState {
            depth_buffer_write_enable: false,
            ..Default::default()
        }
    }

    /// Disables the depth buffer entirely.
    pub fn none() -> Self {
        DepthStencilState {
            depth_buffer_enable: false,
            depth_buffer_write_enable: false,
            ..Default::default()
        }
    }
}

/// Specify whether front- or back-facing polygons can be culled.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum CullMode {
    None,
    /// Culls faces with a clockwise winding.
    CullClockwiseFace,
    /// Culls faces with a counter-clockwise winding.
    CullCounterClockwiseFace,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum FillMode {
    Solid,
    WireFrame,
}

/// Describes how primitives are rasterized.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerState {
    pub cull_mode: CullMode,
    pub fill_mode: FillMode,
    /// Enables the scissor test against `GraphicsDevice::scissor_rectangle`.
    pub scissor_test_enable: bool,
    /// Units used to offset the depth values.
    pub depth_bias: f32,
    /// Scale factor used to offset the depth values.
    pub slope_scale_depth_bias: f32,
}

impl Default for RasterizerState {
    fn default() -> Self {
        RasterizerState::cull_counter_clockwise()
    }
}

impl RasterizerState {
    pub fn cull_none() -> Self {
        RasterizerState {
            cull_mode: CullMode::None,
            fill_mode: FillMode::Solid,
            scissor_test_enable: false,
            depth_bias: 0.0,
            slope_scale_depth_bias: 0.0,
        }
    }

    pub fn cull_clockwise() -> Self {
        RasterizerState {
            cull_mode: CullMode::CullClockwiseFace,
            ..RasterizerState::cull_none()
        }
    }

    pub fn cull_counter_clockwise() -> Self {
        RasterizerState {
            cull_mode: CullMode::CullCounterClockwiseFace,
            ..RasterizerState::cull_none()
        }
    }
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum TextureFilter {
    Point,
    Linear,
    Anisotropic,
}

#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum TextureAddressMode {
    Wrap,
    Clamp,
    Mirror,
}

/// Describes how a texture unit samples its texture.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct SamplerState {
    pub filter: TextureFilter,
    pub address_u: TextureAddressMode,
    pub address_v: TextureAddressMode,
    pub address_w: TextureAddressMode,
    pub max_anisotropy: u32,
}

impl Default for SamplerState {
    fn default() -> Self {
        SamplerState::linear_wrap()
    }
}

impl SamplerState {
    fn with(filter: TextureFilter, address: TextureAddressMode) -> Self {
        SamplerState {
            filter,
            address_u: address,
            address_v: address,
            address_w: address,
            max_anisotropy: 4,
        }
    }

    pub fn point_wrap() -> Self {
        SamplerState::with(TextureFilter::Point, TextureAddressMode::Wrap)
    }

    pub fn point_clamp() -> Self {
        SamplerState::with(TextureFilter::Point, TextureAddressMode::Clamp)
    }

    pub fn linear_wrap() -> Self {
        SamplerState::with(TextureFilter::Linear, TextureAddressMode::Wrap)
    }

    pub fn linear_clamp() -> Self {
        SamplerState::with(TextureFilter::Linear, TextureAddressMode::Clamp)
    }

    pub fn anisotropic_wrap() -> Self {
        SamplerState::with(TextureFilter::Anisotropic, TextureAddressMode::Wrap)
    }

    pub fn anisotropic_clamp() -> Self {
        SamplerState::with(TextureFilter::Anisotropic, TextureAddressMode::Clamp)
    }
}

/// The sampler states of every texture unit.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct SamplerStateCollection {
    states: [SamplerState; MAX_SAMPLERS],
}

impl SamplerStateCollection {
    #[inline]
    pub fn get(&self, slot: usize) -> Option<&SamplerState> {
        self.states.get(slot)
    }

    #[inline]
    pub(crate) fn set(&mut self, slot: usize, state: SamplerState) {
        self.states[slot] = state;
    }

    #[inline]
    pub fn len(&self) -> usize {
        MAX_SAMPLERS
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &SamplerState> {
        self.states.iter()
    }
}

/// Selects the buffers a clear operation applies to.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub struct ClearOptions {
    pub target: bool,
    pub depth: bool,
    pub stencil: bool,
}

impl ClearOptions {
    pub fn target() -> Self {
        ClearOptions {
            target: true,
            depth: false,
            stencil: false,
        }
    }

    pub fn all() -> Self {
        ClearOptions {
            target: true,
            depth: true,
            stencil: true,
        }
    }

    #[inline]
    pub fn with_depth(mut self) -> Self {
        self.depth = true;
        self
    }

    #[inline]
    pub fn with_stencil(mut self) -> Self {
        self.stencil = true;
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.target || self.depth || self.stencil)
    }
}
