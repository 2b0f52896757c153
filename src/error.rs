use core::fmt;
use std::{
    num::{ParseFloatError, ParseIntError},
    string::FromUtf8Error,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlyError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not a PLY file, magic was {0:?}")]
    BadMagic(Vec<u8>),

    #[error("Invalid ascii data: {0}")]
    InvalidAscii(#[from] FromUtf8Error),

    #[error("Invalid PLY header: {0}")]
    InvalidHeader(String),

    #[error("Unsupported PLY format: {0}")]
    UnsupportedFormat(String),

    #[error("Unknown scalar type: {0}")]
    UnknownScalarType(String),

    #[error("Property '{0}' declared outside of an element")]
    PropertyOutsideElement(String),

    #[error("Error parsing integer: {0}")]
    ParseIntError(#[from] ParseIntError),

    #[error("Error parsing float: {0}")]
    ParseFloatError(#[from] ParseFloatError),

    #[error("Record ended before all of its properties were read")]
    MissingToken,

    #[error("Invalid list count: {0}")]
    InvalidListCount(String),

    #[error("Unexpected end of data")]
    UnexpectedEof,

    #[error("Failed to decode element '{element}' record {record}: {source}")]
    Decode {
        element: String,
        record: usize,
        #[source]
        source: Box<PlyError>,
    },

    #[error("Property type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("List of length {len} does not fit count type {count_type}")]
    ListTooLong { len: usize, count_type: String },

    #[error("Record has {found} values but element '{element}' declares {expected} properties")]
    PropertyCountMismatch {
        element: String,
        expected: usize,
        found: usize,
    },

    #[error("Element '{element}' declares {declared} records but holds {found}")]
    RecordCountMismatch {
        element: String,
        declared: usize,
        found: usize,
    },

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Element '{element}' has no property '{property}'")]
    MissingProperty { element: String, property: String },

    #[error("Serde error: {0}")]
    Serde(String),
}

impl PlyError {
    /// True for failures caused by the data running out before a value was complete.
    pub fn is_truncation(&self) -> bool {
        match self {
            PlyError::UnexpectedEof => true,
            PlyError::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            PlyError::Decode { source, .. } => source.is_truncation(),
            _ => false,
        }
    }
}

impl serde::de::Error for PlyError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        PlyError::Serde(msg.to_string())
    }
}
