//! CPU-side vertex and index buffers. The device only ever holds a shared,
//! non-owning reference to the buffers currently set on it, the data is
//! uploaded into the device's own buffer objects at draw time.

use serde::{Deserialize, Serialize};

use super::vertex::{VertexLayout, VertexType};

/// Vertex indices can be either 16- or 32-bit. You should always prefer
/// 16-bit indices over 32-bit indices, since the latter may have performance
/// penalties on some platforms, and they take up twice as much memory.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, Serialize, Deserialize)]
pub enum IndexFormat {
    U16,
    U32,
}

impl IndexFormat {
    /// The size in bytes of a single index.
    #[inline]
    pub fn stride(self) -> usize {
        match self {
            IndexFormat::U16 => 2,
            IndexFormat::U32 => 4,
        }
    }
}

/// Implemented by the integer types that could be used as index elements.
pub trait IndexElement: Copy {
    const FORMAT: IndexFormat;
}

impl IndexElement for u16 {
    const FORMAT: IndexFormat = IndexFormat::U16;
}

impl IndexElement for u32 {
    const FORMAT: IndexFormat = IndexFormat::U32;
}

/// Reinterprets a slice of plain values as its raw bytes.
pub fn as_bytes<T: Copy>(values: &[T]) -> &[u8] {
    let len = values.len() * ::std::mem::size_of::<T>();
    unsafe { ::std::slice::from_raw_parts(values.as_ptr() as *const u8, len) }
}

/// A list of vertices with an optional vertex declaration attached.
///
/// The declaration used at draw time is the explicit one if set, and the one
/// inferred from the vertex structure otherwise.
#[derive(Debug, Clone)]
pub struct VertexBuffer {
    declaration: Option<VertexLayout>,
    element_layout: Option<VertexLayout>,
    bytes: Vec<u8>,
    len: usize,
}

impl VertexBuffer {
    /// Creates a vertex buffer from a slice of self-describing vertices.
    pub fn new<T: VertexType>(vertices: &[T]) -> Self {
        VertexBuffer {
            declaration: None,
            element_layout: Some(T::layout()),
            bytes: as_bytes(vertices).to_vec(),
            len: vertices.len(),
        }
    }

    /// Creates a vertex buffer from raw bytes holding `len` vertices. A buffer
    /// created this way needs an explicit declaration before being drawn.
    pub fn from_bytes(bytes: Vec<u8>, len: usize) -> Self {
        VertexBuffer {
            declaration: None,
            element_layout: None,
            bytes,
            len,
        }
    }

    /// Attaches an explicit vertex declaration.
    #[inline]
    pub fn with_declaration(mut self, declaration: VertexLayout) -> Self {
        self.declaration = Some(declaration);
        self
    }

    /// Replaces the contents with `vertices`.
    pub fn set_data<T: VertexType>(&mut self, vertices: &[T]) {
        self.element_layout = Some(T::layout());
        self.bytes = as_bytes(vertices).to_vec();
        self.len = vertices.len();
    }

    /// The explicitly attached declaration.
    #[inline]
    pub fn declaration(&self) -> Option<&VertexLayout> {
        self.declaration.as_ref()
    }

    /// Resolves the declaration of this buffer: explicit first, then the
    /// one inferred from the vertex structure.
    #[inline]
    pub fn resolve_declaration(&self) -> Option<VertexLayout> {
        self.declaration.or(self.element_layout)
    }

    /// The number of vertices in this buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A list of 16- or 32-bit indices.
#[derive(Debug, Clone)]
pub struct IndexBuffer {
    format: IndexFormat,
    bytes: Vec<u8>,
    len: usize,
}

impl IndexBuffer {
    pub fn new<I: IndexElement>(indices: &[I]) -> Self {
        IndexBuffer {
            format: I::FORMAT,
            bytes: as_bytes(indices).to_vec(),
            len: indices.len(),
        }
    }

    /// Replaces the contents with `indices`, the element width follows `I`.
    pub fn set_data<I: IndexElement>(&mut self, indices: &[I]) {
        self.format = I::FORMAT;
        self.bytes = as_bytes(indices).to_vec();
        self.len = indices.len();
    }

    #[inline]
    pub fn format(&self) -> IndexFormat {
        self.format
    }

    /// The number of indices in this buffer.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod test {
    use super::super::vertex::{Attribute, VertexFormat};
    use super::*;

    impl_vertex! {
        Vertex {
            position => [Position; Float; 2; false],
        }
    }

    #[test]
    fn declaration() {
        let vertices = [Vertex::new([0.0, 0.0]), Vertex::new([1.0, 1.0])];
        let vb = VertexBuffer::new(&vertices);
        assert_eq!(vb.len(), 2);
        assert_eq!(vb.as_bytes().len(), 16);
        assert!(vb.declaration().is_none());
        assert_eq!(vb.resolve_declaration(), Some(Vertex::layout()));

        let explicit = VertexLayout::build()
            .with(Attribute::Texcoord0, VertexFormat::Float, 2, false)
            .finish();

        let vb = vb.with_declaration(explicit);
        assert_eq!(vb.resolve_declaration(), Some(explicit));

        let vb = VertexBuffer::from_bytes(vec![0; 8], 1);
        assert_eq!(vb.resolve_declaration(), None);
    }

    #[test]
    fn indices() {
        let ib = IndexBuffer::new(&[0u16, 1, 2]);
        assert_eq!(ib.format(), IndexFormat::U16);
        assert_eq!(ib.len(), 3);
        assert_eq!(ib.as_bytes().len(), 6);

        let mut ib = ib;
        ib.set_data(&[0u32, 1, 2, 3]);
        assert_eq!(ib.format(), IndexFormat::U32);
        assert_eq!(ib.as_bytes().len(), 16);
    }
}
