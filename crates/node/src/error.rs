//! A bunch of wrap errors.

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors enum mapping global custom errors.
/// The error type can be expressed in decimal, where the high decs represent
/// the error category and the low decs represent the error type.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
#[repr(u32)]
pub enum Error {
    #[error("Invalid logging level: {0}")]
    InvalidLoggingLevel(String) = 100,
    #[error("Invalid simulation config: {0}")]
    InvalidConfig(String) = 101,
    #[error("Create File Error: {0}")]
    CreateFileError(String) = 200,
    #[error("Open File Error: {0}")]
    OpenFileError(String) = 201,
    #[error("Write File Error: {0}")]
    WriteFileError(String) = 202,
    #[error("Cannot find home directory")]
    HomeDirError = 203,
    #[error("Cannot find parent directory")]
    ParentDirError = 204,
    #[error("Serde json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error) = 300,
    #[error("Serde yaml error: {0}")]
    SerdeYamlError(#[from] serde_yaml::Error) = 301,
    #[error("Core error: {0}")]
    CoreError(#[from] chordsim_core::error::Error) = 400,
}

impl Error {
    fn discriminant(&self) -> u32 {
        // SAFETY: Because `Self` is marked `repr(u32)`, its layout is a `repr(C)` `union`
        // between `repr(C)` structs, each of which has the `u32` discriminant as its first
        // field, so we can read the discriminant without offsetting the pointer.
        // ref: https://doc.rust-lang.org/std/mem/fn.discriminant.html
        unsafe { *<*const _>::from(self).cast::<u32>() }
    }

    pub fn code(&self) -> u32 {
        self.discriminant()
    }
}
