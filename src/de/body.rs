use tracing::debug;

use crate::de::val_reader::ScalarReader;
use crate::{ElementDef, PlyError, PropertyType, PropertyValue, Record};

/// Decode `elem_def.count` records by replaying the element's properties in
/// declaration order. Any failure is reported with the element name and the
/// index of the record that could not be completed.
pub(crate) fn read_element<S: ScalarReader>(
    val_reader: &mut S,
    elem_def: &ElementDef,
) -> Result<Vec<Record>, PlyError> {
    debug!(
        "Reading element {} ({} records, {} properties)",
        elem_def.name,
        elem_def.count,
        elem_def.properties.len()
    );

    let mut records = Vec::with_capacity(elem_def.count.min(1024));
    for index in 0..elem_def.count {
        let record = read_record(val_reader, elem_def).map_err(|source| PlyError::Decode {
            element: elem_def.name.clone(),
            record: index,
            source: Box::new(source),
        })?;
        records.push(record);
    }
    Ok(records)
}

fn read_record<S: ScalarReader>(
    val_reader: &mut S,
    elem_def: &ElementDef,
) -> Result<Record, PlyError> {
    // A record with no properties occupies no ASCII line.
    if elem_def.properties.is_empty() {
        return Ok(Record::default());
    }
    val_reader.read_row_start()?;

    let mut record = Record::new(Vec::with_capacity(elem_def.properties.len()));
    for prop in &elem_def.properties {
        let value = match prop.property_type {
            PropertyType::Scalar { data_type } => {
                PropertyValue::Scalar(val_reader.read_scalar(data_type)?)
            }
            PropertyType::List {
                count_type,
                data_type,
            } => {
                let count = val_reader.read_count(count_type)?;
                let mut values = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    values.push(val_reader.read_scalar(data_type)?);
                }
                PropertyValue::List(values)
            }
        };
        record.push(value);
    }

    val_reader.read_row_end()?;
    Ok(record)
}
