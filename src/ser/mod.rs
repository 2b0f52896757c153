use std::io::Write;

use byteorder::{BigEndian, LittleEndian};
use tracing::debug;

use crate::ser::val_writer::{AsciiValWriter, BinValWriter, ScalarWriter};
use crate::{
    Document, Element, PlyError, PlyFormat, PlyHeader, PropertyDef, PropertyType, PropertyValue,
    ScalarType, ScalarValue,
};

pub mod val_writer;

/// Write the header lines, `ply` through `end_header`.
pub fn write_header<W: Write>(mut writer: W, header: &PlyHeader) -> Result<(), PlyError> {
    writeln!(writer, "ply")?;
    writeln!(writer, "format {} {}", header.format, header.version)?;
    for comment in &header.comments {
        writeln!(writer, "comment {comment}")?;
    }
    for info in &header.obj_info {
        writeln!(writer, "obj_info {info}")?;
    }
    for element in &header.elements {
        writeln!(writer, "{element}")?;
    }
    writeln!(writer, "end_header")?;
    Ok(())
}

/// Encode a document in its own format.
pub fn to_writer<W: Write>(doc: &Document, mut writer: W) -> Result<(), PlyError> {
    write_header(&mut writer, doc.header())?;

    match doc.format() {
        PlyFormat::Ascii => write_elements(doc, &mut AsciiValWriter::new(&mut writer))?,
        PlyFormat::BinaryLittleEndian => {
            write_elements(doc, &mut BinValWriter::<_, LittleEndian>::new(&mut writer))?
        }
        PlyFormat::BinaryBigEndian => {
            write_elements(doc, &mut BinValWriter::<_, BigEndian>::new(&mut writer))?
        }
    }

    writer.flush()?;
    Ok(())
}

pub fn to_bytes(doc: &Document) -> Result<Vec<u8>, PlyError> {
    let mut buf = vec![];
    to_writer(doc, &mut buf)?;
    Ok(buf)
}

/// Encode an ASCII document to a string.
pub fn to_string(doc: &Document) -> Result<String, PlyError> {
    if doc.format() != PlyFormat::Ascii {
        return Err(PlyError::UnsupportedFormat(
            "to_string only supports ASCII format - use to_bytes for binary formats".to_string(),
        ));
    }
    Ok(String::from_utf8(to_bytes(doc)?)?)
}

fn write_elements<S: ScalarWriter>(doc: &Document, val_writer: &mut S) -> Result<(), PlyError> {
    for element in doc.elements() {
        write_element(element, val_writer)?;
    }
    Ok(())
}

fn write_element<S: ScalarWriter>(element: &Element, val_writer: &mut S) -> Result<(), PlyError> {
    debug!("Writing element {} ({} records)", element.name(), element.len());

    if element.def().properties.is_empty() {
        return Ok(());
    }
    for record in element.records() {
        for (prop, value) in element.def().properties.iter().zip(record.values()) {
            write_value(prop, value, val_writer)?;
        }
        val_writer.write_row_end()?;
    }
    Ok(())
}

fn write_value<S: ScalarWriter>(
    prop: &PropertyDef,
    value: &PropertyValue,
    val_writer: &mut S,
) -> Result<(), PlyError> {
    match (prop.property_type, value) {
        (PropertyType::Scalar { data_type }, PropertyValue::Scalar(v)) => {
            check_type(data_type, v)?;
            val_writer.write_scalar(*v)
        }
        (
            PropertyType::List {
                count_type,
                data_type,
            },
            PropertyValue::List(values),
        ) => {
            let count = ScalarValue::from_len(count_type, values.len()).ok_or_else(|| {
                PlyError::ListTooLong {
                    len: values.len(),
                    count_type: count_type.to_string(),
                }
            })?;
            val_writer.write_scalar(count)?;
            for v in values {
                check_type(data_type, v)?;
                val_writer.write_scalar(*v)?;
            }
            Ok(())
        }
        (PropertyType::Scalar { data_type }, PropertyValue::List(_)) => {
            Err(PlyError::TypeMismatch {
                expected: data_type.to_string(),
                found: "list".to_string(),
            })
        }
        (PropertyType::List { .. }, PropertyValue::Scalar(v)) => Err(PlyError::TypeMismatch {
            expected: "list".to_string(),
            found: v.scalar_type().to_string(),
        }),
    }
}

fn check_type(expected: ScalarType, value: &ScalarValue) -> Result<(), PlyError> {
    if value.scalar_type() == expected {
        Ok(())
    } else {
        Err(PlyError::TypeMismatch {
            expected: expected.to_string(),
            found: value.scalar_type().to_string(),
        })
    }
}
