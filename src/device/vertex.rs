//! Vertex declarations.
//!
//! A `VertexLayout` tells the device how to feed the generic vertex attributes
//! from a buffer of interleaved vertices. Layouts are small `Copy` values, so
//! they are passed around and compared by value.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// The maximum number of elements a vertex declaration could have.
pub const MAX_VERTEX_ATTRIBUTES: usize = 12;

/// The usage of a vertex element. The discriminant is the generic vertex
/// attribute location the element is bound to.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Attribute {
    Position = 0,
    Normal = 1,
    Tangent = 2,
    Binormal = 3,
    Color0 = 4,
    Color1 = 5,
    BlendIndices = 6,
    BlendWeight = 7,
    Texcoord0 = 8,
    Texcoord1 = 9,
    Texcoord2 = 10,
    Texcoord3 = 11,
}

impl Attribute {
    #[inline]
    pub fn location(self) -> u32 {
        self as u32
    }
}

/// The component type of a vertex element.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum VertexFormat {
    Byte,
    UByte,
    Short,
    UShort,
    Float,
}

impl VertexFormat {
    /// The size in bytes of a single component.
    #[inline]
    pub fn size(self) -> u8 {
        match self {
            VertexFormat::Byte | VertexFormat::UByte => 1,
            VertexFormat::Short | VertexFormat::UShort => 2,
            VertexFormat::Float => 4,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct VertexElement {
    pub attribute: Attribute,
    pub format: VertexFormat,
    /// Number of components, in `1..=4`.
    pub size: u8,
    /// Maps integer components into `[0, 1]` or `[-1, 1]` when fetched.
    pub normalized: bool,
}

impl VertexElement {
    /// The size in bytes of this element.
    #[inline]
    pub fn bytes(&self) -> u8 {
        self.size * self.format.size()
    }
}

impl Default for VertexElement {
    fn default() -> Self {
        VertexElement {
            attribute: Attribute::Position,
            format: VertexFormat::Float,
            size: 0,
            normalized: false,
        }
    }
}

/// Describes how a single vertex is laid out in memory: its elements with
/// their byte offsets, and the stride between consecutive vertices.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy)]
pub struct VertexLayout {
    stride: u8,
    len: u8,
    elements: [(VertexElement, u8); MAX_VERTEX_ATTRIBUTES],
}

impl VertexLayout {
    #[inline]
    pub fn build() -> VertexLayoutBuilder {
        VertexLayoutBuilder::new()
    }

    /// The distance in bytes between two consecutive vertices.
    #[inline]
    pub fn stride(&self) -> u8 {
        self.stride
    }

    #[inline]
    pub fn len(&self) -> u8 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn offset(&self, attribute: Attribute) -> Option<u8> {
        self.iter()
            .find(|(e, _)| e.attribute == attribute)
            .map(|(_, offset)| offset)
    }

    pub fn element(&self, attribute: Attribute) -> Option<VertexElement> {
        self.iter()
            .find(|(e, _)| e.attribute == attribute)
            .map(|(e, _)| e)
    }

    /// Iterates the elements and their offsets in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (VertexElement, u8)> + '_ {
        self.elements[..self.len as usize].iter().cloned()
    }
}

/// Builds a `VertexLayout`. Elements declared with `with` are packed right
/// after the previous element, `with_offset` places one explicitly.
/// Declaring an attribute twice replaces the former element.
#[derive(Default)]
pub struct VertexLayoutBuilder {
    elements: SmallVec<[(VertexElement, Option<u8>); MAX_VERTEX_ATTRIBUTES]>,
    stride: Option<u8>,
}

impl VertexLayoutBuilder {
    #[inline]
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with(
        &mut self,
        attribute: Attribute,
        format: VertexFormat,
        size: u8,
        normalized: bool,
    ) -> &mut Self {
        self.push(attribute, format, size, normalized, None)
    }

    pub fn with_offset(
        &mut self,
        attribute: Attribute,
        format: VertexFormat,
        size: u8,
        normalized: bool,
        offset: u8,
    ) -> &mut Self {
        self.push(attribute, format, size, normalized, Some(offset))
    }

    /// Overrides the stride, which defaults to the end of the last element.
    pub fn with_stride(&mut self, stride: u8) -> &mut Self {
        self.stride = Some(stride);
        self
    }

    pub fn finish(&mut self) -> VertexLayout {
        let mut layout = VertexLayout::default();
        let mut cursor = 0;
        let mut end = 0;

        for (i, &(element, offset)) in self.elements.iter().enumerate() {
            let offset = offset.unwrap_or(cursor);
            cursor = match offset.checked_add(element.bytes()) {
                Some(v) => v,
                None => panic!("{:?} ends past a 255 bytes vertex.", element.attribute),
            };
            end = end.max(cursor);
            layout.elements[i] = (element, offset);
        }

        layout.len = self.elements.len() as u8;
        layout.stride = self.stride.unwrap_or(end);
        layout
    }

    fn push(
        &mut self,
        attribute: Attribute,
        format: VertexFormat,
        size: u8,
        normalized: bool,
        offset: Option<u8>,
    ) -> &mut Self {
        assert!(size > 0 && size <= 4, "{:?} has {} components.", attribute, size);

        let element = VertexElement {
            attribute,
            format,
            size,
            normalized,
        };

        match self.elements.iter_mut().find(|(e, _)| e.attribute == attribute) {
            Some(slot) => *slot = (element, offset),
            None => {
                assert!(self.elements.len() < MAX_VERTEX_ATTRIBUTES);
                self.elements.push((element, offset));
            }
        }

        self
    }
}

/// Implemented by vertex structures that know their own memory layout, see
/// `impl_vertex!`.
pub trait VertexType: Copy {
    fn layout() -> VertexLayout;
}

#[macro_export]
macro_rules! offset_of {
    ($ty:ty, $field:ident) => {{
        let v = ::std::mem::MaybeUninit::<$ty>::uninit();
        let base = v.as_ptr() as usize;
        #[allow(unused_unsafe)]
        let field = unsafe { ::std::ptr::addr_of!((*v.as_ptr()).$field) as usize };
        field - base
    }};
}

/// Declares a `#[repr(C)]` vertex structure and implements `VertexType` for
/// it, with the offsets and stride taken from the actual structure.
///
/// ```rust,ignore
/// impl_vertex! {
///     Vertex {
///         position => [Position; Float; 3; false],
///         color => [Color0; UByte; 4; true],
///     }
/// }
/// ```
#[macro_export]
macro_rules! impl_vertex {
    ($name: ident { $($field: ident => [$attribute: tt; $format: tt; $size: tt; $normalized: tt],)* }) => (
        #[repr(C)]
        #[derive(Debug, Copy, Clone, PartialEq)]
        pub struct $name {
            $(pub $field: $crate::impl_vertex_field!{VertexFormat::$format, $size}, )*
        }

        impl $name {
            #[allow(clippy::too_many_arguments)]
            pub fn new($($field: $crate::impl_vertex_field!{VertexFormat::$format, $size}, ) *) -> Self {
                $name { $($field,)* }
            }
        }

        impl $crate::device::vertex::VertexType for $name {
            fn layout() -> $crate::device::vertex::VertexLayout {
                $crate::device::vertex::VertexLayout::build()
                    $( .with_offset(
                        $crate::device::vertex::Attribute::$attribute,
                        $crate::device::vertex::VertexFormat::$format,
                        $size,
                        $normalized,
                        $crate::offset_of!($name, $field) as u8) )*
                    .with_stride(::std::mem::size_of::<$name>() as u8)
                    .finish()
            }
        }
    )
}

#[doc(hidden)]
#[macro_export]
macro_rules! impl_vertex_field {
    (VertexFormat::Byte, 1) => (i8);
    (VertexFormat::Byte, $n: tt) => ([i8; $n]);
    (VertexFormat::UByte, 1) => (u8);
    (VertexFormat::UByte, $n: tt) => ([u8; $n]);
    (VertexFormat::Short, 1) => (i16);
    (VertexFormat::Short, $n: tt) => ([i16; $n]);
    (VertexFormat::UShort, 1) => (u16);
    (VertexFormat::UShort, $n: tt) => ([u16; $n]);
    (VertexFormat::Float, 1) => (f32);
    (VertexFormat::Float, $n: tt) => ([f32; $n]);
}
