mod body;
mod row;

pub mod val_reader;

use std::fs::File;
use std::io::{BufRead, BufReader, Cursor};
use std::path::Path;

use byteorder::{BigEndian, LittleEndian};
use tracing::debug;

use crate::de::val_reader::{AsciiValReader, BinValReader};
use crate::document::{Document, Element};
use crate::{PlyError, PlyFormat, PlyHeader};

pub(crate) use row::RecordDeserializer;

/// Decode a whole PLY document: the header, then every element in header order.
///
/// Decoding stops once each element's declared record count has been read;
/// any trailing data is left unread.
pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Document, PlyError> {
    let header = PlyHeader::parse(&mut reader)?;
    debug!(
        "Parsed {} header with {} element(s)",
        header.format,
        header.elements.len()
    );

    let mut elements = Vec::with_capacity(header.elements.len());
    match header.format {
        PlyFormat::Ascii => {
            let mut val_reader = AsciiValReader::new(&mut reader);
            for elem_def in &header.elements {
                let records = body::read_element(&mut val_reader, elem_def)?;
                elements.push(Element::from_decoded(elem_def.clone(), records));
            }
        }
        PlyFormat::BinaryLittleEndian => {
            let mut val_reader = BinValReader::<_, LittleEndian>::new(&mut reader);
            for elem_def in &header.elements {
                let records = body::read_element(&mut val_reader, elem_def)?;
                elements.push(Element::from_decoded(elem_def.clone(), records));
            }
        }
        PlyFormat::BinaryBigEndian => {
            let mut val_reader = BinValReader::<_, BigEndian>::new(&mut reader);
            for elem_def in &header.elements {
                let records = body::read_element(&mut val_reader, elem_def)?;
                elements.push(Element::from_decoded(elem_def.clone(), records));
            }
        }
    }

    Ok(Document::from_parts(header, elements))
}

pub fn from_str(str: &str) -> Result<Document, PlyError> {
    from_reader(Cursor::new(str))
}

/// Open and decode a file. The handle is closed when this returns, on success or error.
pub fn from_path(path: impl AsRef<Path>) -> Result<Document, PlyError> {
    let path = path.as_ref();
    debug!("Reading {}", path.display());
    let file = File::open(path)?;
    from_reader(BufReader::new(file))
}
