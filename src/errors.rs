use failure::Fail;

#[derive(Debug, Fail)]
pub enum Error {
    #[fail(display = "{}", _0)]
    Backend(String),
    #[fail(display = "OpenGL implementation doesn\'t support {}.", _0)]
    Requirement(String),
    #[fail(display = "Invalid configuration, {}.", _0)]
    InvalidConfiguration(String),
    #[fail(display = "{}: the shader was created with uniform buffers enabled.", _0)]
    UniformBuffersEnabled(&'static str),
    #[fail(display = "{}: the shader was not created with uniform buffers enabled.", _0)]
    UniformBuffersDisabled(&'static str),
    #[fail(
        display = "{}: the shader was not created with texture transformation enabled.",
        _0
    )]
    TextureTransformationDisabled(&'static str),
    #[fail(
        display = "Draw offset {} is out of bounds for {} draws.",
        offset, draw_count
    )]
    DrawOffsetOutOfBounds { offset: u32, draw_count: u32 },
    #[fail(display = "Failed to create shader, errors: \n{}.", _0)]
    ShaderCreationFailure(String),
    #[fail(display = "Resource group \'{}\' is not registered.", _0)]
    GroupUndefined(String),
    #[fail(display = "Source \'{}\' is undefined in group \'{}\'.", _1, _0)]
    SourceUndefined(String, String),
    #[fail(display = "Failed to parse configurations, {}.", _0)]
    Manifest(String),
}

pub type Result<T> = ::std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Manifest(format!("{}", err))
    }
}

impl From<failure::Error> for Error {
    fn from(err: failure::Error) -> Error {
        Error::Backend(format!("{}", err))
    }
}

/// Logs a broken usage contract. With the `strict` feature the process panics,
/// otherwise the error is handed back to the caller.
pub(crate) fn violation<T>(err: Error) -> Result<T> {
    error!("{}", err);
    if cfg!(feature = "strict") {
        panic!("{}", err);
    }

    Err(err)
}

/// Rejects a call that breaks the usage contract of a shader, see `violation`.
macro_rules! contract {
    ($cond:expr, $err:expr) => {
        if !$cond {
            return $crate::errors::violation($err);
        }
    };
}
