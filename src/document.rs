use std::io::{BufRead, Read};
use std::path::Path;
use std::str::FromStr;

use hashbrown::HashMap;
use serde::Deserialize;

use crate::de::RecordDeserializer;
use crate::{ElementDef, PlyError, PlyFormat, PlyHeader, PropertyValue, Record};

/// An element definition together with its decoded records.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    def: ElementDef,
    records: Vec<Record>,
}

impl Element {
    /// Pair a definition with its records, checking that every record holds one
    /// value per declared property and that the declared count is honoured.
    pub fn new(def: ElementDef, records: Vec<Record>) -> Result<Self, PlyError> {
        if records.len() != def.count {
            return Err(PlyError::RecordCountMismatch {
                element: def.name.clone(),
                declared: def.count,
                found: records.len(),
            });
        }
        if let Some(bad) = records.iter().find(|r| r.len() != def.properties.len()) {
            return Err(PlyError::PropertyCountMismatch {
                element: def.name.clone(),
                expected: def.properties.len(),
                found: bad.len(),
            });
        }
        Ok(Self { def, records })
    }

    pub(crate) fn from_decoded(def: ElementDef, records: Vec<Record>) -> Self {
        Self { def, records }
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn def(&self) -> &ElementDef {
        &self.def
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<RecordRef<'_>> {
        self.records.get(index).map(|record| RecordRef {
            def: &self.def,
            record,
            index,
        })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = RecordRef<'_>> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| RecordRef {
                def: &self.def,
                record,
                index,
            })
    }

    /// Value of property `name` in record `index`.
    pub fn get(&self, index: usize, name: &str) -> Option<&PropertyValue> {
        let prop = self.def.property_index(name)?;
        self.records.get(index)?.get(prop)
    }

    /// Deserialize every record into `T`, matching struct fields to property names.
    pub fn deserialize_records<'de, T>(&'de self) -> Result<Vec<T>, PlyError>
    where
        T: Deserialize<'de>,
    {
        self.iter().map(|record| record.deserialize()).collect()
    }
}

/// A borrowed record that resolves property names through its element.
#[derive(Debug, Clone, Copy)]
pub struct RecordRef<'a> {
    def: &'a ElementDef,
    record: &'a Record,
    index: usize,
}

impl<'a> RecordRef<'a> {
    /// Position of this record within its element.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }

    pub fn get(&self, name: &str) -> Option<&'a PropertyValue> {
        let prop = self.def.property_index(name)?;
        self.record.get(prop)
    }

    /// Property names and values in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a PropertyValue)> + 'a {
        self.def
            .properties
            .iter()
            .map(|p| p.name.as_str())
            .zip(self.record.values())
    }

    pub fn deserialize<T>(&self) -> Result<T, PlyError>
    where
        T: Deserialize<'a>,
    {
        T::deserialize(RecordDeserializer::new(self.def, self.record))
    }
}

/// A fully decoded PLY file.
#[derive(Debug, Clone)]
pub struct Document {
    header: PlyHeader,
    elements: Vec<Element>,
    by_name: HashMap<String, usize>,
}

impl Document {
    /// An empty document, ready to have elements added.
    pub fn new(format: PlyFormat) -> Self {
        Self {
            header: PlyHeader {
                format,
                version: "1.0".to_string(),
                elements: Vec::new(),
                comments: Vec::new(),
                obj_info: Vec::new(),
            },
            elements: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub(crate) fn from_parts(header: PlyHeader, elements: Vec<Element>) -> Self {
        let by_name = elements
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name().to_string(), i))
            .collect();
        Self {
            header,
            elements,
            by_name,
        }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, PlyError> {
        crate::de::from_reader(reader)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PlyError> {
        crate::de::from_reader(bytes)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlyError> {
        crate::de::from_path(path)
    }

    /// Decode from any reader, buffering it first.
    pub fn from_read<R: Read>(reader: R) -> Result<Self, PlyError> {
        crate::de::from_reader(std::io::BufReader::new(reader))
    }

    pub fn header(&self) -> &PlyHeader {
        &self.header
    }

    pub fn format(&self) -> PlyFormat {
        self.header.format
    }

    pub fn set_format(&mut self, format: PlyFormat) {
        self.header.format = format;
    }

    pub fn version(&self) -> &str {
        &self.header.version
    }

    pub fn comments(&self) -> &[String] {
        &self.header.comments
    }

    pub fn add_comment(&mut self, comment: impl Into<String>) {
        self.header.comments.push(comment.into());
    }

    pub fn obj_info(&self) -> &[String] {
        &self.header.obj_info
    }

    /// Elements in header order, duplicates included.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Look up an element by name. A later element with the same name shadows
    /// earlier ones.
    pub fn element(&self, name: &str) -> Option<&Element> {
        self.by_name.get(name).map(|&i| &self.elements[i])
    }

    pub fn require_element(&self, name: &str) -> Result<&Element, PlyError> {
        self.element(name)
            .ok_or_else(|| PlyError::MissingElement(name.to_string()))
    }

    pub fn add_element(&mut self, element: Element) {
        self.header.elements.push(element.def().clone());
        self.by_name
            .insert(element.name().to_string(), self.elements.len());
        self.elements.push(element);
    }
}

impl FromStr for Document {
    type Err = PlyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::de::from_str(s)
    }
}
