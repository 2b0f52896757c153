//! A PLY (Polygon File Format) document decoder with triangle mesh winding validation.
//!
//! PLY files carry a self-describing header that declares every element and the
//! type of each of its properties, so we parse the header first and replay that
//! schema to decode the body, whether it is ASCII or binary in either byte order.
//!
//! On top of the decoded [`Document`], the [`mesh`] module rebuilds vertex to face
//! adjacency and checks that every shared edge of a triangle mesh is traversed in
//! opposite directions by its two faces.
//!
//! # Example
//!
//! ```rust
//! use ply_mesh::{mesh, Document};
//!
//! let ply_data = r#"ply
//! format ascii 1.0
//! element vertex 3
//! property float x
//! property float y
//! property float z
//! element face 1
//! property list uchar int vertex_indices
//! end_header
//! 0 0 0
//! 1 0 0
//! 0 1 0
//! 3 0 1 2
//! "#;
//!
//! let doc: Document = ply_data.parse().unwrap();
//! assert_eq!(doc.element("vertex").unwrap().len(), 3);
//!
//! let report = mesh::check_winding(&doc, 0).unwrap();
//! assert_eq!(report.visited.len(), 1);
//! ```

pub mod de;
mod document;
mod error;
pub mod mesh;
pub mod ser;
mod value;

pub use document::{Document, Element, RecordRef};
pub use error::PlyError;
pub use value::{PropertyValue, Record, ScalarValue};

use std::fmt;
use std::io::{BufRead, Read};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The three leading bytes of every PLY stream, followed by a newline.
pub const MAGIC: &[u8; 4] = b"ply\n";

/// PLY file format (ascii or binary)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlyFormat {
    Ascii,
    BinaryLittleEndian,
    BinaryBigEndian,
}

impl fmt::Display for PlyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlyFormat::Ascii => write!(f, "ascii"),
            PlyFormat::BinaryLittleEndian => write!(f, "binary_little_endian"),
            PlyFormat::BinaryBigEndian => write!(f, "binary_big_endian"),
        }
    }
}

impl FromStr for PlyFormat {
    type Err = PlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ascii" => Ok(PlyFormat::Ascii),
            "binary_little_endian" => Ok(PlyFormat::BinaryLittleEndian),
            "binary_big_endian" => Ok(PlyFormat::BinaryBigEndian),
            _ => Err(PlyError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// PLY scalar data types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ScalarType {
    pub fn parse(s: &str) -> Result<Self, PlyError> {
        match s {
            "char" | "int8" => Ok(ScalarType::I8),
            "uchar" | "uint8" => Ok(ScalarType::U8),
            "short" | "int16" => Ok(ScalarType::I16),
            "ushort" | "uint16" => Ok(ScalarType::U16),
            "int" | "int32" => Ok(ScalarType::I32),
            "uint" | "uint32" => Ok(ScalarType::U32),
            "float" | "float32" => Ok(ScalarType::F32),
            "double" | "float64" => Ok(ScalarType::F64),
            _ => Err(PlyError::UnknownScalarType(s.to_string())),
        }
    }

    pub fn size_bytes(&self) -> usize {
        match self {
            ScalarType::I8 | ScalarType::U8 => 1,
            ScalarType::I16 | ScalarType::U16 => 2,
            ScalarType::I32 | ScalarType::U32 | ScalarType::F32 => 4,
            ScalarType::F64 => 8,
        }
    }

    pub fn is_integral(&self) -> bool {
        !matches!(self, ScalarType::F32 | ScalarType::F64)
    }
}

impl FromStr for ScalarType {
    type Err = PlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarType::I8 => "char",
            ScalarType::U8 => "uchar",
            ScalarType::I16 => "short",
            ScalarType::U16 => "ushort",
            ScalarType::I32 => "int",
            ScalarType::U32 => "uint",
            ScalarType::F32 => "float",
            ScalarType::F64 => "double",
        };
        f.write_str(name)
    }
}

/// Shape of a PLY property: a single value or a length-prefixed list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    /// A scalar property with a single value
    Scalar { data_type: ScalarType },
    /// A list property with variable length
    List {
        count_type: ScalarType,
        data_type: ScalarType,
    },
}

impl PropertyType {
    pub fn is_list(&self) -> bool {
        matches!(self, PropertyType::List { .. })
    }
}

/// PLY property definition
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDef {
    pub name: String,
    pub property_type: PropertyType,
}

impl PropertyDef {
    pub fn scalar(name: impl Into<String>, data_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            property_type: PropertyType::Scalar { data_type },
        }
    }

    pub fn list(name: impl Into<String>, count_type: ScalarType, data_type: ScalarType) -> Self {
        Self {
            name: name.into(),
            property_type: PropertyType::List {
                count_type,
                data_type,
            },
        }
    }
}

impl fmt::Display for PropertyDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.property_type {
            PropertyType::Scalar { data_type } => write!(f, "property {} {}", data_type, self.name),
            PropertyType::List {
                count_type,
                data_type,
            } => write!(f, "property list {} {} {}", count_type, data_type, self.name),
        }
    }
}

/// PLY element definition (e.g., vertex, face)
#[derive(Debug, Clone, PartialEq)]
pub struct ElementDef {
    pub name: String,
    pub count: usize,
    pub properties: Vec<PropertyDef>,
}

impl ElementDef {
    pub fn new(name: impl Into<String>, count: usize) -> Self {
        Self {
            name: name.into(),
            count,
            properties: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: PropertyDef) -> Self {
        self.properties.push(property);
        self
    }

    pub fn get_property(&self, name: &str) -> Option<&PropertyDef> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Position of a property in declaration order.
    pub fn property_index(&self, name: &str) -> Option<usize> {
        self.properties.iter().position(|p| p.name == name)
    }
}

impl fmt::Display for ElementDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element {} {}", self.name, self.count)?;
        for prop in &self.properties {
            write!(f, "\n{prop}")?;
        }
        Ok(())
    }
}

/// PLY header containing format information and element definitions
#[derive(Debug, Clone, PartialEq)]
pub struct PlyHeader {
    pub format: PlyFormat,
    pub version: String,
    pub elements: Vec<ElementDef>,
    pub comments: Vec<String>,
    pub obj_info: Vec<String>,
}

/// Where the header line loop currently is.
#[derive(Debug)]
enum HeaderState {
    AwaitingFormat,
    ParsingElements { current: Option<ElementDef> },
    Done,
}

/// Line-by-line header accumulator. Owns everything parsed so far and the
/// element that is still open for `property` lines.
#[derive(Debug)]
struct HeaderParser {
    state: HeaderState,
    format: Option<(PlyFormat, String)>,
    elements: Vec<ElementDef>,
    comments: Vec<String>,
    obj_info: Vec<String>,
}

impl HeaderParser {
    fn new() -> Self {
        Self {
            state: HeaderState::AwaitingFormat,
            format: None,
            elements: Vec::new(),
            comments: Vec::new(),
            obj_info: Vec::new(),
        }
    }

    fn is_done(&self) -> bool {
        matches!(self.state, HeaderState::Done)
    }

    fn handle_line(&mut self, line: &str) -> Result<(), PlyError> {
        let keyword = line.split_whitespace().next().unwrap_or("");

        match keyword {
            "comment" => {
                self.comments.push(rest_of_line(line, "comment"));
            }
            "obj_info" => {
                self.obj_info.push(rest_of_line(line, "obj_info"));
            }
            "format" => {
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() < 3 {
                    return Err(PlyError::InvalidHeader(format!("Invalid format line: {line}")));
                }
                let format = parts[1].parse::<PlyFormat>()?;
                if !is_version(parts[2]) {
                    return Err(PlyError::InvalidHeader(format!(
                        "Invalid format version: {}",
                        parts[2]
                    )));
                }
                self.format = Some((format, parts[2].to_string()));
                if let HeaderState::AwaitingFormat = self.state {
                    self.state = HeaderState::ParsingElements { current: None };
                }
            }
            "element" => {
                let HeaderState::ParsingElements { current } = &mut self.state else {
                    return Err(PlyError::InvalidHeader(
                        "Element declared before format line".to_string(),
                    ));
                };
                let parts: Vec<&str> = line.split_whitespace().collect();
                if parts.len() != 3 {
                    return Err(PlyError::InvalidHeader(format!("Invalid element line: {line}")));
                }
                let count = parts[2].parse::<usize>().map_err(|_| {
                    PlyError::InvalidHeader(format!("Invalid element count: {}", parts[2]))
                })?;

                if let Some(element) = current.take() {
                    self.elements.push(element);
                }
                *current = Some(ElementDef::new(parts[1], count));
            }
            "property" => {
                let parts: Vec<&str> = line.split_whitespace().collect();
                let name = parts.last().copied().unwrap_or_default();
                let element = match &mut self.state {
                    HeaderState::ParsingElements {
                        current: Some(element),
                    } => element,
                    _ => return Err(PlyError::PropertyOutsideElement(name.to_string())),
                };

                let property = match parts.as_slice() {
                    ["property", "list", count_type, data_type, name] => PropertyDef::list(
                        *name,
                        ScalarType::parse(count_type)?,
                        ScalarType::parse(data_type)?,
                    ),
                    ["property", data_type, name] if *data_type != "list" => {
                        PropertyDef::scalar(*name, ScalarType::parse(data_type)?)
                    }
                    _ => {
                        return Err(PlyError::InvalidHeader(format!(
                            "Invalid property line: {line}"
                        )))
                    }
                };
                element.properties.push(property);
            }
            "end_header" => {
                if let HeaderState::ParsingElements { current } = &mut self.state {
                    if let Some(element) = current.take() {
                        self.elements.push(element);
                    }
                }
                self.state = HeaderState::Done;
            }
            _ => {
                debug!("Ignoring unrecognized header line: {line:?}");
            }
        }

        Ok(())
    }

    fn finish(self) -> Result<PlyHeader, PlyError> {
        if !self.is_done() {
            return Err(PlyError::InvalidHeader(
                "Unexpected end of file".to_string(),
            ));
        }
        let (format, version) = self
            .format
            .ok_or_else(|| PlyError::InvalidHeader("Missing format specification".to_string()))?;

        Ok(PlyHeader {
            format,
            version,
            elements: self.elements,
            comments: self.comments,
            obj_info: self.obj_info,
        })
    }
}

fn rest_of_line(line: &str, keyword: &str) -> String {
    let rest = line.trim_start().strip_prefix(keyword).unwrap_or("");
    rest.strip_prefix(' ').unwrap_or(rest).to_string()
}

fn is_version(s: &str) -> bool {
    match s.split_once('.') {
        Some((major, minor)) => major.parse::<u32>().is_ok() && minor.parse::<u32>().is_ok(),
        None => false,
    }
}

impl PlyHeader {
    /// Parse a PLY header from a reader.
    ///
    /// Consumes the magic bytes and every header line up to and including
    /// `end_header`. The reader is left positioned at the first byte of the body.
    pub fn parse<R: BufRead>(reader: &mut R) -> Result<Self, PlyError> {
        let mut magic = Vec::with_capacity(MAGIC.len());
        reader.by_ref().take(MAGIC.len() as u64).read_to_end(&mut magic)?;
        if magic.as_slice() != MAGIC {
            return Err(PlyError::BadMagic(magic));
        }

        let mut parser = HeaderParser::new();
        let mut line = Vec::new();

        while !parser.is_done() {
            line.clear();
            if reader.read_until(b'\n', &mut line)? == 0 {
                break;
            }
            let text = String::from_utf8(std::mem::take(&mut line))?;
            parser.handle_line(text.trim_end_matches(['\n', '\r']))?;
        }

        parser.finish()
    }

    /// Get element definition by name. Later declarations shadow earlier ones.
    pub fn get_element(&self, name: &str) -> Option<&ElementDef> {
        self.elements.iter().rev().find(|e| e.name == name)
    }

    /// Check if this header defines an element with the given name
    pub fn has_element(&self, name: &str) -> bool {
        self.elements.iter().any(|e| e.name == name)
    }
}
