use crate::device::primitive::PrimitiveType;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "{} is not supported.", _0)]
    Unsupported(String),
    #[fail(display = "[GL] Framebuffer is incomplete, status 0x{:X}.", _0)]
    FramebufferIncomplete(u32),
    #[fail(display = "Primitive type {:?} has no native topology.", _0)]
    InvalidTopology(PrimitiveType),
    #[fail(display = "Vertex buffer has not been set.")]
    VertexBufferMissing,
    #[fail(display = "Index buffer has not been set.")]
    IndexBufferMissing,
    #[fail(display = "Can not resolve vertex declaration.")]
    VertexDeclarationMissing,
    #[fail(display = "Out of bounds: {}.", _0)]
    OutOfBounds(String),
    #[fail(display = "OpenGL implementation doesn\'t support {}.", _0)]
    Requirement(String),
    #[fail(display = "Backend: {}", _0)]
    Backend(String),
    #[fail(display = "Graphics device has been disposed.")]
    Disposed,
    #[fail(display = "Device listener failed, errors: {}.", _0)]
    Listener(String),
    #[fail(display = "Failed to reload content, errors: {}.", _0)]
    ContentReload(String),
    #[fail(display = "Invalid device params: {}.", _0)]
    Params(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

macro_rules! unsupported {
    ($e:expr) => {
        return Err($crate::errors::Error::Unsupported($e.into()));
    };
    ($fmt:expr, $($arg:tt)+) => {
        return Err($crate::errors::Error::Unsupported(format!($fmt, $($arg)+)));
    };
}

macro_rules! backend_err {
    ($e:expr) => {
        $crate::errors::Error::Backend($e.into())
    };
    ($fmt:expr, $($arg:tt)+) => {
        $crate::errors::Error::Backend(format!($fmt, $($arg)+))
    };
}
