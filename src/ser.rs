//! Conversion of any `T: Serialize` into a [`Value`] tree.
//!
//! [`ValueSerializer`] is the serde `Serializer` behind [`to_value`](crate::to_value).
//! It keeps the information JSON-oriented value types throw away: `i128`,
//! `u128` and `u64` values above `i64::MAX` come out as [`Value::BigInt`]
//! instead of being rounded or rejected, so the normalizer sees them.
//!
//! Enums use the externally tagged layout serde_json uses: unit variants
//! become strings, every other variant a one-entry object keyed by the variant
//! name.
//!
//! ```rust
//! use serde::Serialize;
//! use serde_safenum::{to_value, BigInt, Value};
//!
//! #[derive(Serialize)]
//! struct Account { id: u128, owner: String }
//!
//! let value = to_value(&Account { id: 1 << 70, owner: "ops".into() }).unwrap();
//! assert_eq!(value.get("id"), Some(&Value::BigInt(BigInt::from(1u128 << 70))));
//! ```

use crate::value::BIGINT_TOKEN;
use crate::{Error, Map, Number, Result, Value};
use num_bigint::BigInt;
use serde::{ser, Serialize};

/// Serializer producing a [`Value`].
pub struct ValueSerializer;

pub struct SerializeVec {
    vec: Vec<Value>,
}

/// Collects the fields of a tuple variant under its variant name.
pub struct SerializeTupleVariant {
    name: &'static str,
    vec: Vec<Value>,
}

pub struct SerializeMap {
    map: Map,
    current_key: Option<String>,
}

/// Collects the fields of a struct variant under its variant name.
pub struct SerializeStructVariant {
    name: &'static str,
    map: Map,
}

fn tagged(name: &str, inner: Value) -> Value {
    let mut object = Map::with_capacity(1);
    object.insert(name.to_string(), inner);
    Value::Object(object)
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<Value> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Value> {
        Ok(Value::Number(Number::Integer(v)))
    }

    fn serialize_i128(self, v: i128) -> Result<Value> {
        Ok(Value::BigInt(BigInt::from(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value> {
        Ok(Value::BigInt(BigInt::from(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Value> {
        Ok(Value::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Value> {
        Ok(Value::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value> {
        Ok(Value::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value> {
        Ok(v.iter().map(|&b| Value::from(b)).collect())
    }

    fn serialize_none(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value> {
        Ok(Value::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value> {
        Ok(Value::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, name: &'static str, value: &T) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        if name == BIGINT_TOKEN {
            return bigint_from_marker(value.serialize(self)?);
        }
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value>
    where
        T: ?Sized + Serialize,
    {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_tuple(self, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_struct(self, _name: &'static str, len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::with_capacity(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeTupleVariant> {
        Ok(SerializeTupleVariant {
            name: variant,
            vec: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::with_capacity(len.unwrap_or(0)))
    }

    fn serialize_struct(self, _name: &'static str, len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::with_capacity(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<SerializeStructVariant> {
        Ok(SerializeStructVariant {
            name: variant,
            map: Map::with_capacity(len),
        })
    }
}

impl SerializeVec {
    fn with_capacity(capacity: usize) -> Self {
        SerializeVec {
            vec: Vec::with_capacity(capacity),
        }
    }
}

impl SerializeMap {
    fn with_capacity(capacity: usize) -> Self {
        SerializeMap {
            map: Map::with_capacity(capacity),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.name, Value::Array(self.vec)))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.current_key = Some(map_key(to_value(key)?)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(Value::Object(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = Value;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value> {
        Ok(tagged(self.name, Value::Object(self.map)))
    }
}

/// Rebuilds a [`Value::BigInt`] from the inner value of a marked newtype, so a
/// large integer keeps its type even when it fits in an `i64` or exceeds 128 bits.
fn bigint_from_marker(inner: Value) -> Result<Value> {
    match inner {
        Value::BigInt(bi) => Ok(Value::BigInt(bi)),
        Value::Number(Number::Integer(i)) => Ok(Value::BigInt(BigInt::from(i))),
        Value::String(s) => s
            .parse::<BigInt>()
            .map(Value::BigInt)
            .map_err(|e| Error::custom(format!("invalid large integer '{}': {}", s, e))),
        other => Err(Error::custom(format!(
            "expected large integer, found {}",
            other
        ))),
    }
}

/// Map keys must be string-like. Integers and booleans are stringified the way
/// serde_json does it; large integers keep every digit.
fn map_key(key: Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Number(Number::Integer(i)) => Ok(i.to_string()),
        Value::BigInt(bi) => Ok(bi.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null | Value::Absent => Err(Error::unsupported_key("null")),
        Value::Number(Number::Float(_)) => Err(Error::unsupported_key("float")),
        Value::Date(_) => Err(Error::unsupported_key("date")),
        Value::Array(_) => Err(Error::unsupported_key("array")),
        Value::Object(_) => Err(Error::unsupported_key("object")),
    }
}

pub(crate) fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    value.serialize(ValueSerializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Serialize)]
    enum Event {
        Ping,
        Id(u128),
        Pair(i32, i32),
        Moved { x: i64, y: i64 },
    }

    #[test]
    fn test_enum_variants_externally_tagged() {
        assert_eq!(to_value(&Event::Ping).unwrap(), Value::from("Ping"));

        let id = to_value(&Event::Id(5)).unwrap();
        assert_eq!(id.get("Id"), Some(&Value::BigInt(BigInt::from(5))));

        let pair = to_value(&Event::Pair(1, 2)).unwrap();
        assert_eq!(
            pair.get("Pair"),
            Some(&Value::Array(vec![Value::from(1), Value::from(2)]))
        );

        let moved = to_value(&Event::Moved { x: 3, y: 4 }).unwrap();
        let inner = moved.get("Moved").unwrap();
        assert_eq!(inner.get("x"), Some(&Value::from(3i64)));
        assert_eq!(inner.get("y"), Some(&Value::from(4i64)));
    }

    #[test]
    fn test_integer_map_keys_stringified() {
        let mut map = BTreeMap::new();
        map.insert(u128::MAX, true);
        map.insert(1u128, false);

        let value = to_value(&map).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["1".to_string(), u128::MAX.to_string()]);
    }

    #[test]
    fn test_unsupported_map_key() {
        let mut map = BTreeMap::new();
        map.insert(vec![1], 1);
        assert_eq!(to_value(&map), Err(Error::unsupported_key("array")));
    }

    #[test]
    fn test_value_bigint_survives_round_trip() {
        let wide = BigInt::from(2).pow(200);
        let tree = Value::Array(vec![
            Value::BigInt(BigInt::from(5)),
            Value::BigInt(-wide.clone()),
            Value::BigInt(wide),
        ]);
        assert_eq!(to_value(&tree).unwrap(), tree);
    }

    #[test]
    fn test_bytes_become_integer_array() {
        struct Blob;
        impl Serialize for Blob {
            fn serialize<S: ser::Serializer>(&self, s: S) -> std::result::Result<S::Ok, S::Error> {
                s.serialize_bytes(&[0, 255])
            }
        }
        assert_eq!(
            to_value(&Blob).unwrap(),
            Value::Array(vec![Value::from(0u8), Value::from(255u8)])
        );
    }
}
