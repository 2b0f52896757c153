use serde::{
    de::{value::BorrowedStrDeserializer, DeserializeSeed, MapAccess, SeqAccess, Visitor},
    Deserializer,
};

use crate::{ElementDef, PlyError, PropertyValue, Record, ScalarValue};

/// Drives serde over one decoded record, presenting it as a map from
/// property name to value.
pub(crate) struct RecordDeserializer<'a> {
    elem_def: &'a ElementDef,
    record: &'a Record,
}

impl<'a> RecordDeserializer<'a> {
    pub fn new(elem_def: &'a ElementDef, record: &'a Record) -> Self {
        Self { elem_def, record }
    }
}

impl<'de> Deserializer<'de> for RecordDeserializer<'de> {
    type Error = PlyError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_map(RecordMapAccess {
            elem_def: self.elem_def,
            record: self.record,
            current_property: 0,
        })
    }

    serde::forward_to_deserialize_any! {
        bool i8 u8 i16 u16 i32 u32 i64 u64 f32 f64 char str string
        bytes byte_buf option unit unit_struct newtype_struct seq tuple
        tuple_struct enum identifier ignored_any
    }
}

struct RecordMapAccess<'a> {
    elem_def: &'a ElementDef,
    record: &'a Record,
    current_property: usize,
}

impl<'de> MapAccess<'de> for RecordMapAccess<'de> {
    type Error = PlyError;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>, Self::Error>
    where
        K: DeserializeSeed<'de>,
    {
        let Some(prop) = self.elem_def.properties.get(self.current_property) else {
            return Ok(None);
        };
        seed.deserialize(BorrowedStrDeserializer::<PlyError>::new(&prop.name))
            .map(Some)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value, Self::Error>
    where
        V: DeserializeSeed<'de>,
    {
        let value = self
            .record
            .get(self.current_property)
            .ok_or(PlyError::MissingToken)?;
        self.current_property += 1;
        seed.deserialize(ValueDeserializer { value })
    }

    fn size_hint(&self) -> Option<usize> {
        Some(
            self.elem_def
                .properties
                .len()
                .saturating_sub(self.current_property),
        )
    }
}

struct ValueDeserializer<'a> {
    value: &'a PropertyValue,
}

impl<'de> Deserializer<'de> for ValueDeserializer<'de> {
    type Error = PlyError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.value {
            PropertyValue::Scalar(value) => ScalarDeserializer(*value).deserialize_any(visitor),
            PropertyValue::List(values) => visitor.visit_seq(ListSeqAccess {
                values: values.iter(),
            }),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        // PLY properties are always present if defined in header
        visitor.visit_some(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 u8 i16 u16 i32 u32 f32 f64 i128 i64 u128 u64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

struct ListSeqAccess<'a> {
    values: std::slice::Iter<'a, ScalarValue>,
}

impl<'de> SeqAccess<'de> for ListSeqAccess<'de> {
    type Error = PlyError;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>, Self::Error>
    where
        T: DeserializeSeed<'de>,
    {
        match self.values.next() {
            Some(value) => seed.deserialize(ScalarDeserializer(*value)).map(Some),
            None => Ok(None),
        }
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len())
    }
}

struct ScalarDeserializer(ScalarValue);

impl<'de> Deserializer<'de> for ScalarDeserializer {
    type Error = PlyError;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        match self.0 {
            ScalarValue::I8(v) => visitor.visit_i8(v),
            ScalarValue::U8(v) => visitor.visit_u8(v),
            ScalarValue::I16(v) => visitor.visit_i16(v),
            ScalarValue::U16(v) => visitor.visit_u16(v),
            ScalarValue::I32(v) => visitor.visit_i32(v),
            ScalarValue::U32(v) => visitor.visit_u32(v),
            ScalarValue::F32(v) => visitor.visit_f32(v),
            ScalarValue::F64(v) => visitor.visit_f64(v),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value, Self::Error>
    where
        V: Visitor<'de>,
    {
        visitor.visit_some(self)
    }

    serde::forward_to_deserialize_any! {
        bool i8 u8 i16 u16 i32 u32 f32 f64 i128 i64 u128 u64 char str string
        bytes byte_buf unit unit_struct newtype_struct seq tuple
        tuple_struct map struct enum identifier ignored_any
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PropertyDef, ScalarType};
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Face {
        #[serde(alias = "vertex_index")]
        vertex_indices: Vec<u32>,
        red: Option<f32>,
    }

    fn face_def() -> ElementDef {
        ElementDef::new("face", 1)
            .with_property(PropertyDef::scalar("red", ScalarType::U8))
            .with_property(PropertyDef::list("vertex_index", ScalarType::U8, ScalarType::I32))
    }

    #[test]
    fn test_struct_with_alias_and_widening() {
        let record = Record::new(vec![200u8.into(), vec![0i32, 1, 2].into()]);
        let face = Face::deserialize(RecordDeserializer::new(&face_def(), &record)).unwrap();
        assert_eq!(
            face,
            Face {
                vertex_indices: vec![0, 1, 2],
                red: Some(200.0),
            }
        );
    }

    #[test]
    fn test_negative_index_is_rejected() {
        let record = Record::new(vec![0u8.into(), vec![-1i32].into()]);
        let res = Face::deserialize(RecordDeserializer::new(&face_def(), &record));
        assert!(matches!(res, Err(PlyError::Serde(_))));
    }

    #[test]
    fn test_map_keys_are_property_names() {
        #[derive(Deserialize, Debug)]
        #[serde(untagged)]
        enum Any {
            Num(f64),
            List(Vec<f64>),
        }

        let def = face_def();
        let record = Record::new(vec![1u8.into(), vec![4i32].into()]);
        let map: BTreeMap<&str, Any> =
            BTreeMap::deserialize(RecordDeserializer::new(&def, &record)).unwrap();
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec!["red", "vertex_index"]);
        assert!(matches!(map["vertex_index"], Any::List(ref v) if v == &[4.0]));
    }
}
