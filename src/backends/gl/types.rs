use gl;
use gl::types::*;

use crate::backends::{Attachment, BufferTarget};
use crate::device::buffer::IndexFormat;
use crate::device::primitive::Topology;
use crate::device::state::*;
use crate::device::target::{CubeMapFace, DepthFormat};
use crate::device::vertex::VertexFormat;

impl From<Topology> for GLenum {
    fn from(topology: Topology) -> Self {
        match topology {
            Topology::Lines => gl::LINES,
            Topology::LineStrip => gl::LINE_STRIP,
            Topology::Triangles => gl::TRIANGLES,
            Topology::TriangleStrip => gl::TRIANGLE_STRIP,
        }
    }
}

impl From<IndexFormat> for GLenum {
    fn from(format: IndexFormat) -> Self {
        match format {
            IndexFormat::U16 => gl::UNSIGNED_SHORT,
            IndexFormat::U32 => gl::UNSIGNED_INT,
        }
    }
}

impl From<Comparison> for GLenum {
    fn from(cmp: Comparison) -> Self {
        match cmp {
            Comparison::Never => gl::NEVER,
            Comparison::Less => gl::LESS,
            Comparison::LessOrEqual => gl::LEQUAL,
            Comparison::Greater => gl::GREATER,
            Comparison::GreaterOrEqual => gl::GEQUAL,
            Comparison::Equal => gl::EQUAL,
            Comparison::NotEqual => gl::NOTEQUAL,
            Comparison::Always => gl::ALWAYS,
        }
    }
}

impl From<Equation> for GLenum {
    fn from(eq: Equation) -> Self {
        match eq {
            Equation::Add => gl::FUNC_ADD,
            Equation::Subtract => gl::FUNC_SUBTRACT,
            Equation::ReverseSubtract => gl::FUNC_REVERSE_SUBTRACT,
        }
    }
}

impl From<BlendFactor> for GLenum {
    fn from(factor: BlendFactor) -> Self {
        match factor {
            BlendFactor::Zero => gl::ZERO,
            BlendFactor::One => gl::ONE,
            BlendFactor::Value(BlendValue::SourceColor) => gl::SRC_COLOR,
            BlendFactor::Value(BlendValue::SourceAlpha) => gl::SRC_ALPHA,
            BlendFactor::Value(BlendValue::DestinationColor) => gl::DST_COLOR,
            BlendFactor::Value(BlendValue::DestinationAlpha) => gl::DST_ALPHA,
            BlendFactor::OneMinusValue(BlendValue::SourceColor) => gl::ONE_MINUS_SRC_COLOR,
            BlendFactor::OneMinusValue(BlendValue::SourceAlpha) => gl::ONE_MINUS_SRC_ALPHA,
            BlendFactor::OneMinusValue(BlendValue::DestinationColor) => gl::ONE_MINUS_DST_COLOR,
            BlendFactor::OneMinusValue(BlendValue::DestinationAlpha) => gl::ONE_MINUS_DST_ALPHA,
        }
    }
}

impl From<StencilOperation> for GLenum {
    fn from(op: StencilOperation) -> Self {
        match op {
            StencilOperation::Keep => gl::KEEP,
            StencilOperation::Zero => gl::ZERO,
            StencilOperation::Replace => gl::REPLACE,
            StencilOperation::Increment => gl::INCR_WRAP,
            StencilOperation::Decrement => gl::DECR_WRAP,
            StencilOperation::IncrementSaturation => gl::INCR,
            StencilOperation::DecrementSaturation => gl::DECR,
            StencilOperation::Invert => gl::INVERT,
        }
    }
}

impl From<VertexFormat> for GLenum {
    fn from(format: VertexFormat) -> Self {
        match format {
            VertexFormat::Byte => gl::BYTE,
            VertexFormat::UByte => gl::UNSIGNED_BYTE,
            VertexFormat::Short => gl::SHORT,
            VertexFormat::UShort => gl::UNSIGNED_SHORT,
            VertexFormat::Float => gl::FLOAT,
        }
    }
}

impl From<TextureAddressMode> for GLenum {
    fn from(mode: TextureAddressMode) -> Self {
        match mode {
            TextureAddressMode::Wrap => gl::REPEAT,
            TextureAddressMode::Clamp => gl::CLAMP_TO_EDGE,
            TextureAddressMode::Mirror => gl::MIRRORED_REPEAT,
        }
    }
}

/// The renderbuffer storage of depth formats. A target without an explicit
/// depth format still gets a 24-bit depth buffer.
impl From<DepthFormat> for GLenum {
    fn from(format: DepthFormat) -> Self {
        match format {
            DepthFormat::None | DepthFormat::Depth24 => gl::DEPTH_COMPONENT24,
            DepthFormat::Depth16 => gl::DEPTH_COMPONENT16,
            DepthFormat::Depth24Stencil8 => gl::DEPTH24_STENCIL8,
        }
    }
}

impl From<CubeMapFace> for GLenum {
    fn from(face: CubeMapFace) -> Self {
        match face {
            CubeMapFace::PositiveX => gl::TEXTURE_CUBE_MAP_POSITIVE_X,
            CubeMapFace::NegativeX => gl::TEXTURE_CUBE_MAP_NEGATIVE_X,
            CubeMapFace::PositiveY => gl::TEXTURE_CUBE_MAP_POSITIVE_Y,
            CubeMapFace::NegativeY => gl::TEXTURE_CUBE_MAP_NEGATIVE_Y,
            CubeMapFace::PositiveZ => gl::TEXTURE_CUBE_MAP_POSITIVE_Z,
            CubeMapFace::NegativeZ => gl::TEXTURE_CUBE_MAP_NEGATIVE_Z,
        }
    }
}

impl From<Attachment> for GLenum {
    fn from(attachment: Attachment) -> Self {
        match attachment {
            Attachment::Color0 => gl::COLOR_ATTACHMENT0,
            Attachment::Depth => gl::DEPTH_ATTACHMENT,
            Attachment::Stencil => gl::STENCIL_ATTACHMENT,
        }
    }
}

impl From<BufferTarget> for GLenum {
    fn from(target: BufferTarget) -> Self {
        match target {
            BufferTarget::Vertex => gl::ARRAY_BUFFER,
            BufferTarget::Index => gl::ELEMENT_ARRAY_BUFFER,
        }
    }
}

/// Returns the minification and magnification filters.
pub fn texture_filter(filter: TextureFilter) -> (GLenum, GLenum) {
    match filter {
        TextureFilter::Point => (gl::NEAREST, gl::NEAREST),
        TextureFilter::Linear | TextureFilter::Anisotropic => (gl::LINEAR, gl::LINEAR),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn depth_storage() {
        assert_eq!(GLenum::from(DepthFormat::None), gl::DEPTH_COMPONENT24);
        assert_eq!(GLenum::from(DepthFormat::Depth16), gl::DEPTH_COMPONENT16);
        assert_eq!(GLenum::from(DepthFormat::Depth24), gl::DEPTH_COMPONENT24);
        assert_eq!(
            GLenum::from(DepthFormat::Depth24Stencil8),
            gl::DEPTH24_STENCIL8
        );
    }

    #[test]
    fn topology() {
        assert_eq!(GLenum::from(Topology::Lines), gl::LINES);
        assert_eq!(GLenum::from(Topology::TriangleStrip), gl::TRIANGLE_STRIP);
        assert_eq!(GLenum::from(IndexFormat::U16), gl::UNSIGNED_SHORT);
        assert_eq!(GLenum::from(IndexFormat::U32), gl::UNSIGNED_INT);
    }
}
