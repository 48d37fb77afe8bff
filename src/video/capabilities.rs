//! Version and extension probing of the current OpenGL context.

use std::cmp;
use std::fmt;
use std::str::FromStr;

use failure::Error;

/// Describes a version.
///
/// A version can only be compared to another version if they belong to the same API.
/// For example, both `Version::GL(3, 0) >= Version::ES(3, 0)` and `Version::ES(3, 0) >=
/// Version::GL(3, 0)` return `false`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Version {
    /// Regular OpenGL.
    GL(u8, u8),
    /// OpenGL embedded system.
    ES(u8, u8),
}

impl PartialOrd for Version {
    #[inline]
    fn partial_cmp(&self, other: &Version) -> Option<cmp::Ordering> {
        let (es1, major1, minor1) = match *self {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        let (es2, major2, minor2) = match *other {
            Version::GL(major, minor) => (false, major, minor),
            Version::ES(major, minor) => (true, major, minor),
        };

        if es1 != es2 {
            None
        } else {
            match major1.cmp(&major2) {
                cmp::Ordering::Equal => Some(minor1.cmp(&minor2)),
                v => Some(v),
            }
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Version::GL(major, minor) => write!(f, "OpenGL {}.{}", major, minor),
            Version::ES(major, minor) => write!(f, "OpenGL ES {}.{}", major, minor),
        }
    }
}

impl Version {
    /// Versions the stock shaders are written against, most capable first.
    pub const DESKTOP_PREFERENCES: [Version; 4] = [
        Version::GL(3, 2),
        Version::GL(3, 1),
        Version::GL(3, 0),
        Version::GL(2, 1),
    ];

    pub const ES_PREFERENCES: [Version; 2] = [Version::ES(3, 0), Version::ES(2, 0)];

    #[inline]
    pub fn is_es(self) -> bool {
        match self {
            Version::ES(_, _) => true,
            Version::GL(_, _) => false,
        }
    }

    /// Returns the preference list that matches the API of this version.
    pub fn preferences(self) -> &'static [Version] {
        if self.is_es() {
            &Version::ES_PREFERENCES
        } else {
            &Version::DESKTOP_PREFERENCES
        }
    }

    /// Parses the string returned by `glGetString(GL_VERSION)`. Vendor-specific
    /// information after the version number is ignored.
    pub fn parse_str(desc: &str) -> Result<Version, Error> {
        let (es, desc) = if desc.starts_with("OpenGL ES ") {
            (true, &desc[10..])
        } else if desc.starts_with("OpenGL ES-") {
            // "OpenGL ES-CM 1.1" and friends carry the profile before the version.
            let version = desc[10..]
                .splitn(2, ' ')
                .nth(1)
                .ok_or_else(|| format_err!("[GL] Version string {:?} is unformatted.", desc))?;
            (true, version)
        } else {
            (false, desc)
        };

        let desc = desc
            .split(' ')
            .next()
            .ok_or_else(|| format_err!("[GL] Version string is unformatted."))?;

        let mut iter = desc.split('.');
        let mut next = || -> Result<u8, Error> {
            iter.next()
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| format_err!("[GL] Failed to parse version from {:?}.", desc))
        };

        let major = next()?;
        let minor = next()?;

        if es {
            Ok(Version::ES(major, minor))
        } else {
            Ok(Version::GL(major, minor))
        }
    }

    /// The `#version` directive of the shading language that goes with this version.
    pub fn glsl_directive(self) -> String {
        match self {
            Version::GL(2, 0) => "#version 110\n".into(),
            Version::GL(2, 1) => "#version 120\n".into(),
            Version::GL(3, 0) => "#version 130\n".into(),
            Version::GL(3, 1) => "#version 140\n".into(),
            Version::GL(3, 2) => "#version 150\n".into(),
            Version::GL(major, minor) => format!("#version {}{}0\n", major, minor),
            Version::ES(2, _) => "#version 100\n".into(),
            Version::ES(major, minor) => format!("#version {}{}0 es\n", major, minor),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Version {
    /// Obtains the OpenGL version of the current context using the loaded functions.
    ///
    /// # Unsafe
    ///
    /// You must ensure that the functions belong to the current context, otherwise you will get
    /// an undefined behavior.
    pub unsafe fn parse() -> Result<Version, Error> {
        let desc = parse_str(gl::VERSION)?;
        Version::parse_str(&desc)
    }
}

macro_rules! extensions {
    ($($string:expr => $variant:ident, $required:expr, $core:expr;)+) => {
        /// Extensions the shader family depends on.
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
        pub enum Extension {
            $(
                $variant,
            )+
        }

        impl Extension {
            pub const ALL: &'static [Extension] = &[$(Extension::$variant,)+];

            /// The name as advertised by the driver.
            pub fn name(self) -> &'static str {
                match self {
                    $(
                        Extension::$variant => $string,
                    )+
                }
            }

            /// The minimal version the extension can be used with.
            pub fn required_version(self) -> Version {
                match self {
                    $(
                        Extension::$variant => $required,
                    )+
                }
            }

            /// The version the extension became a core part of, if any.
            pub fn core_version(self) -> Option<Version> {
                match self {
                    $(
                        Extension::$variant => $core,
                    )+
                }
            }
        }

        impl FromStr for Extension {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Error> {
                match s {
                    $(
                        $string => Ok(Extension::$variant),
                    )+
                    _ => Err(format_err!("Extension {:?} is not tracked.", s)),
                }
            }
        }
    }
}

extensions! {
    "GL_ARB_shader_objects" => ArbShaderObjects, Version::GL(1, 1), Some(Version::GL(2, 0));
    "GL_ARB_vertex_shader" => ArbVertexShader, Version::GL(1, 1), Some(Version::GL(2, 0));
    "GL_ARB_fragment_shader" => ArbFragmentShader, Version::GL(1, 1), Some(Version::GL(2, 0));
    "GL_ARB_uniform_buffer_object" => ArbUniformBufferObject, Version::GL(2, 1), Some(Version::GL(3, 1));
    "GL_ARB_explicit_attrib_location" => ArbExplicitAttribLocation, Version::GL(2, 1), Some(Version::GL(3, 3));
    "GL_ARB_shading_language_420pack" => ArbShadingLanguage420pack, Version::GL(3, 0), Some(Version::GL(4, 2));
    "GL_ARB_explicit_uniform_location" => ArbExplicitUniformLocation, Version::GL(2, 1), Some(Version::GL(4, 3));
    "GL_ARB_shader_draw_parameters" => ArbShaderDrawParameters, Version::GL(3, 1), Some(Version::GL(4, 6));
    "GL_ANGLE_multi_draw" => AngleMultiDraw, Version::ES(3, 0), None;
}

/// Contains data about the list of extensions advertised by the driver.
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct Extensions(u32);

impl Extensions {
    pub fn new<'a, T>(extensions: T) -> Self
    where
        T: IntoIterator<Item = &'a Extension>,
    {
        let mut v = Extensions::default();
        for &extension in extensions {
            v.insert(extension);
        }
        v
    }

    #[inline]
    pub fn insert(&mut self, extension: Extension) {
        self.0 |= 1 << extension as u32;
    }

    #[inline]
    pub fn contains(&self, extension: Extension) -> bool {
        self.0 & (1 << extension as u32) != 0
    }

    pub fn iter<'a>(&'a self) -> impl Iterator<Item = Extension> + 'a {
        Extension::ALL.iter().cloned().filter(move |v| self.contains(*v))
    }
}

impl fmt::Debug for Extensions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_list().entries(self.iter().map(Extension::name)).finish()
    }
}

/// Answers which versions and extensions are usable on the current context.
pub trait Probe {
    /// The version of the current context.
    fn version(&self) -> Version;

    /// Checks whether `extension` can be used when writing shaders against `version`.
    fn is_extension_supported(&self, extension: Extension, version: Version) -> bool;

    /// Number of texture units a program can sample from.
    fn max_combined_texture_image_units(&self) -> u32;

    /// Number of indexed `GL_UNIFORM_BUFFER` binding points.
    fn max_uniform_buffer_bindings(&self) -> u32;

    fn is_version_supported(&self, version: Version) -> bool {
        self.version() >= version
    }

    /// Returns the first version in `preferences` the context supports. Falls back to the
    /// last (least capable) entry if none is.
    fn supported_version(&self, preferences: &[Version]) -> Version {
        preferences
            .iter()
            .cloned()
            .find(|&v| self.is_version_supported(v))
            .or_else(|| preferences.last().cloned())
            .unwrap_or_else(|| self.version())
    }

    /// Uniform buffer objects on the current context.
    fn has_uniform_buffers(&self) -> bool {
        let version = self.version();
        if version.is_es() {
            version >= Version::ES(3, 0)
        } else {
            self.is_extension_supported(Extension::ArbUniformBufferObject, version)
        }
    }

    /// `gl_DrawID` in shaders on the current context.
    fn has_multi_draw(&self) -> bool {
        let version = self.version();
        if version.is_es() {
            self.is_extension_supported(Extension::AngleMultiDraw, version)
        } else {
            self.is_extension_supported(Extension::ArbShaderDrawParameters, version)
        }
    }

    /// `layout(location = n)` on vertex inputs for shaders written against `version`.
    fn has_explicit_attrib_location(&self, version: Version) -> bool {
        if version.is_es() {
            version >= Version::ES(3, 0)
        } else {
            self.is_extension_supported(Extension::ArbExplicitAttribLocation, version)
        }
    }

    /// `layout(location = n)` on uniforms for shaders written against `version`.
    fn has_explicit_uniform_location(&self, version: Version) -> bool {
        if version.is_es() {
            version >= Version::ES(3, 1)
        } else {
            self.is_extension_supported(Extension::ArbExplicitUniformLocation, version)
        }
    }

    /// `layout(binding = n)` on samplers and uniform blocks for shaders written
    /// against `version`.
    fn has_explicit_binding(&self, version: Version) -> bool {
        if version.is_es() {
            version >= Version::ES(3, 1)
        } else {
            self.is_extension_supported(Extension::ArbShadingLanguage420pack, version)
        }
    }
}

/// Represents the capabilities of the context.
///
/// Contrary to the state, these values never change.
#[derive(Debug, Clone)]
pub struct Capabilities {
    /// Returns a version or release number.
    pub version: Version,

    /// The list of tracked extensions advertised by this implementation.
    pub extensions: Extensions,

    /// Maximum number of textures that can be bound to a program.
    pub max_combined_texture_image_units: u32,

    /// Number of available buffer bind points for `GL_UNIFORM_BUFFER`.
    pub max_uniform_buffer_bindings: u32,
}

impl Capabilities {
    /// Describes a context without querying any driver.
    pub fn new<'a, T>(version: Version, extensions: T) -> Self
    where
        T: IntoIterator<Item = &'a Extension>,
    {
        Capabilities {
            version,
            extensions: Extensions::new(extensions),
            max_combined_texture_image_units: 8,
            max_uniform_buffer_bindings: 8,
        }
    }

    /// Fails if the implementation can not run programmable shaders at all.
    pub fn validate(&self) -> Result<(), Error> {
        let programmable = if self.version.is_es() {
            self.version >= Version::ES(2, 0)
        } else {
            self.version >= Version::GL(2, 0)
        };

        if !programmable
            && (!self.extensions.contains(Extension::ArbShaderObjects)
                || !self.extensions.contains(Extension::ArbVertexShader)
                || !self.extensions.contains(Extension::ArbFragmentShader))
        {
            bail!("The OpenGL implementation does not supports shader objects.");
        }

        Ok(())
    }
}

impl Probe for Capabilities {
    #[inline]
    fn version(&self) -> Version {
        self.version
    }

    fn is_extension_supported(&self, extension: Extension, version: Version) -> bool {
        if !(version >= extension.required_version()) {
            return false;
        }

        self.extensions.contains(extension)
            || extension
                .core_version()
                .map_or(false, |core| self.version >= core)
    }

    #[inline]
    fn max_combined_texture_image_units(&self) -> u32 {
        self.max_combined_texture_image_units
    }

    #[inline]
    fn max_uniform_buffer_bindings(&self) -> u32 {
        self.max_uniform_buffer_bindings
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Capabilities {
    /// Queries the capabilities of the current context.
    ///
    /// *Safety*: the OpenGL context corresponding to `gl` must be current in the thread.
    pub unsafe fn parse() -> Result<Capabilities, Error> {
        let version = Version::parse()?;
        let extensions = parse_extensions(version);

        Ok(Capabilities {
            version,
            extensions,
            max_combined_texture_image_units: parse_integer(
                gl::MAX_COMBINED_TEXTURE_IMAGE_UNITS,
                2,
            ),
            max_uniform_buffer_bindings: if version >= Version::GL(3, 1)
                || version >= Version::ES(3, 0)
                || extensions.contains(Extension::ArbUniformBufferObject)
            {
                parse_integer(gl::MAX_UNIFORM_BUFFER_BINDINGS, 0)
            } else {
                0
            },
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
unsafe fn parse_str(id: gl::types::GLenum) -> Result<String, Error> {
    use std::ffi;

    let s = gl::GetString(id);
    if s.is_null() {
        bail!("[GL] String of {} is null.", id);
    }

    Ok(ffi::CStr::from_ptr(s as *const _)
        .to_string_lossy()
        .into_owned())
}

#[cfg(not(target_arch = "wasm32"))]
unsafe fn parse_extensions(version: Version) -> Extensions {
    use std::ffi;

    let strings: Vec<String> = if version >= Version::GL(3, 0) || version >= Version::ES(3, 0) {
        let mut num_extensions = 0;
        gl::GetIntegerv(gl::NUM_EXTENSIONS, &mut num_extensions);
        (0..num_extensions)
            .map(|i| {
                let ext = gl::GetStringi(gl::EXTENSIONS, i as gl::types::GLuint);
                ffi::CStr::from_ptr(ext as *const _)
                    .to_string_lossy()
                    .into_owned()
            })
            .collect()
    } else {
        let list = gl::GetString(gl::EXTENSIONS);
        if list.is_null() {
            return Extensions::default();
        }

        ffi::CStr::from_ptr(list as *const _)
            .to_string_lossy()
            .split(' ')
            .map(|e| e.to_owned())
            .collect()
    };

    let mut extensions = Extensions::default();
    for extension in strings {
        if let Ok(v) = Extension::from_str(&extension) {
            extensions.insert(v);
        }
    }

    extensions
}

#[cfg(not(target_arch = "wasm32"))]
#[inline]
unsafe fn parse_integer(id: gl::types::GLenum, fallback: i32) -> u32 {
    let mut val = fallback;
    gl::GetIntegerv(id, &mut val);
    val as u32
}
