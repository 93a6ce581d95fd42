//! Custom deserialization functions, for the provider's laxer corners.
//!
//! The stops dump encodes coordinates and location types as strings in
//! some exports and as numbers in others, and uses the empty string where
//! a parent-station reference is absent.

use serde::*;
use serde_derive::Deserialize;
use crate::types::LocationType;

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrF64 {
    Num(f64),
    Str(String)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StrOrU8 {
    Num(u8),
    Str(String)
}

pub fn de_coord<'de, D>(d: D) -> Result<f64, D::Error> where D: Deserializer<'de> {
    match StrOrF64::deserialize(d)? {
        StrOrF64::Num(n) => Ok(n),
        StrOrF64::Str(s) => {
            s.trim().parse()
                .map_err(|e| de::Error::custom(format!("failed to parse a coordinate {:?}: {}", s, e)))
        }
    }
}

pub fn de_location_type<'de, D>(d: D) -> Result<LocationType, D::Error> where D: Deserializer<'de> {
    let code = match StrOrU8::deserialize(d)? {
        StrOrU8::Num(n) => n,
        StrOrU8::Str(s) => {
            s.trim().parse()
                .map_err(|e| de::Error::custom(format!("failed to parse a location type {:?}: {}", s, e)))?
        }
    };
    Ok(LocationType::from(code))
}

pub fn ser_location_type<S>(lt: &LocationType, s: S) -> Result<S::Ok, S::Error> where S: Serializer {
    s.serialize_u8(lt.code())
}

pub fn de_nonempty_opt<'de, D>(d: D) -> Result<Option<String>, D::Error> where D: Deserializer<'de> {
    Deserialize::deserialize(d)
        .map(|x: Option<String>| {
            x.filter(|s| !s.trim().is_empty())
        })
}
