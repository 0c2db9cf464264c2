use std::cmp;
use std::ffi;

use gl;
use gl::types::*;

use crate::errors::*;

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the
/// same API. Both `Version::GL(3, 0) >= Version::ES(3, 0)` and
/// `Version::ES(3, 0) >= Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        match (*self, *other) {
            (Version::GL(a0, a1), Version::GL(b0, b1)) => Some((a0, a1).cmp(&(b0, b1))),
            (Version::ES(a0, a1), Version::ES(b0, b1)) => Some((a0, a1).cmp(&(b0, b1))),
            _ => None,
        }
    }
}

impl Version {
    /// Parses the string returned by `glGetString(GL_VERSION)`.
    pub fn from_desc(desc: &str) -> Result<Version> {
        let malformed = || backend_err!("[GL] Version string {:?} is malformed.", desc);

        // Profile suffixes such as "OpenGL ES-CM 1.1" are skipped.
        let (es, desc) = if desc.starts_with("OpenGL ES-") {
            (true, desc.get(13..).ok_or_else(malformed)?)
        } else if desc.starts_with("OpenGL ES ") {
            (true, &desc[10..])
        } else {
            (false, desc)
        };

        let number = desc.split(' ').next().ok_or_else(malformed)?;
        let mut iter = number.split('.');
        let major = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;
        let minor = iter
            .next()
            .and_then(|v| v.parse().ok())
            .ok_or_else(malformed)?;

        if es {
            Ok(Version::ES(major, minor))
        } else {
            Ok(Version::GL(major, minor))
        }
    }

    /// Obtains the OpenGL version of the current context using the loaded
    /// functions.
    ///
    /// # Unsafe
    ///
    /// You must ensure that the functions belong to the current context,
    /// otherwise you will get an undefined behavior.
    pub unsafe fn parse() -> Result<Version> {
        Version::from_desc(&parse_str(gl::VERSION)?)
    }
}

macro_rules! extensions {
    ($($string:expr => $field:ident,)+) => {
        /// Contains data about the list of extensions.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct Extensions {
            $(
                pub $field: bool,
            )+
        }

        impl Extensions {
            pub fn from_names<'a, T>(names: T) -> Extensions
            where
                T: IntoIterator<Item = &'a str>,
            {
                let mut extensions = Extensions::default();
                for name in names {
                    match name {
                        $(
                            $string => extensions.$field = true,
                        )+
                        _ => ()
                    }
                }

                extensions
            }

            /// Returns the list of extensions supported by the current
            /// context. The version must match the one of the context.
            pub unsafe fn parse(version: Version) -> Result<Extensions> {
                if version >= Version::GL(3, 0) || version >= Version::ES(3, 0) {
                    let mut num = 0;
                    gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut num);

                    let mut names = Vec::with_capacity(num.max(0) as usize);
                    for i in 0..num.max(0) {
                        let ext = gl::GetStringi(gl::EXTENSIONS, i as GLuint);
                        names.push(to_string(ext)?);
                    }

                    Ok(Extensions::from_names(names.iter().map(|v| &v[..])))
                } else {
                    let list = parse_str(gl::EXTENSIONS)?;
                    Ok(Extensions::from_names(list.split(' ')))
                }
            }
        }
    }
}

extensions! {
    "GL_ARB_vertex_buffer_object" => gl_arb_vertex_buffer_object,
    "GL_ARB_framebuffer_object" => gl_arb_framebuffer_object,
    "GL_EXT_framebuffer_object" => gl_ext_framebuffer_object,
    "GL_EXT_packed_depth_stencil" => gl_ext_packed_depth_stencil,
    "GL_OES_packed_depth_stencil" => gl_oes_packed_depth_stencil,
    "GL_OES_depth24" => gl_oes_depth24,
    "GL_EXT_texture_filter_anisotropic" => gl_ext_texture_filter_anisotropic,
}

const MAX_TEXTURE_MAX_ANISOTROPY_EXT: GLenum = 0x84FF;

/// Represents the capabilities of the context.
///
/// Contrary to the state, these values never change.
#[derive(Debug)]
pub struct Capabilities {
    /// Returns a version or release number. Vendor-specific information may
    /// follow the version number.
    pub version: Version,
    /// The company responsible for this GL implementation.
    pub vendor: String,
    /// The name of the renderer. This name is typically specific to a
    /// particular configuration of a hardware platform.
    pub renderer: String,
    /// The list of OpenGL extensions support by this implementation.
    pub extensions: Extensions,
    /// Maximum number of texture units, bounds the sampler slots.
    pub max_combined_texture_image_units: u32,
    /// Maximum number of vertex attributes.
    pub max_vertex_attribs: u32,
    /// Maximum anisotropy, or `None` without anisotropic filtering.
    pub max_anisotropy: Option<f32>,
}

impl Capabilities {
    pub unsafe fn parse() -> Result<Capabilities> {
        let version = Version::parse()?;
        let extensions = Extensions::parse(version)?;

        let max_anisotropy = if extensions.gl_ext_texture_filter_anisotropic {
            let mut val = 1.0;
            gl::GetFloatv(MAX_TEXTURE_MAX_ANISOTROPY_EXT, &mut val);
            Some(val)
        } else {
            None
        };

        Ok(Capabilities {
            version,
            vendor: parse_str(gl::VENDOR)?,
            renderer: parse_str(gl::RENDERER)?,
            extensions,
            max_combined_texture_image_units: parse_integer(
                gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS,
                2,
            ),
            max_vertex_attribs: parse_integer(gl::MAX_VERTEX_ATTRIBS, 8),
            max_anisotropy,
        })
    }

    #[inline]
    pub fn is_es(&self) -> bool {
        match self.version {
            Version::ES(_, _) => true,
            Version::GL(_, _) => false,
        }
    }

    pub fn has_vertex_buffer_object(&self) -> bool {
        self.version >= Version::GL(1, 5)
            || self.version >= Version::ES(2, 0)
            || self.extensions.gl_arb_vertex_buffer_object
    }

    pub fn has_framebuffer_object(&self) -> bool {
        self.version >= Version::GL(3, 0)
            || self.version >= Version::ES(2, 0)
            || self.extensions.gl_arb_framebuffer_object
            || self.extensions.gl_ext_framebuffer_object
    }

    /// Packed 24-bit depth, 8-bit stencil renderbuffers.
    pub fn has_packed_depth_stencil(&self) -> bool {
        self.version >= Version::GL(3, 0)
            || self.version >= Version::ES(3, 0)
            || self.extensions.gl_arb_framebuffer_object
            || self.extensions.gl_ext_packed_depth_stencil
            || self.extensions.gl_oes_packed_depth_stencil
    }

    /// Rejects contexts this backend can not drive.
    pub fn check(&self) -> Result<()> {
        if !self.has_vertex_buffer_object() {
            return Err(Error::Requirement("vertex buffer objects".into()));
        }

        if !self.has_framebuffer_object() {
            return Err(Error::Requirement("framebuffer objects".into()));
        }

        Ok(())
    }
}

unsafe fn to_string(s: *const GLubyte) -> Result<String> {
    if s.is_null() {
        return Err(backend_err!("[GL] String is null."));
    }

    String::from_utf8(ffi::CStr::from_ptr(s as *const _).to_bytes().to_vec())
        .map_err(|_| backend_err!("[GL] String is malformed."))
}

#[inline]
unsafe fn parse_str(id: GLenum) -> Result<String> {
    to_string(gl::GetString(id))
}

#[inline]
unsafe fn parse_integer(id: GLenum, fallback: GLint) -> u32 {
    let mut val = fallback;
    gl::GetIntegerv(id, &mut val);
    val.max(0) as u32
}
