use fs_err::read_to_string;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::{
    hash::{Hash, Hasher},
    path::Path,
};

use super::error::PrepError;

/// Key shared by stations, pair entries and cities. Any JSON value is
/// accepted and keys match on JSON equality, so `1` never matches `"1"` or `1.0`.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RecordId(pub Value);

impl Hash for RecordId {
    // Equal values always print the same compact JSON.
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_string().hash(state);
    }
}

/// Lets a field tell a present `null` apart from a missing key: a missing key
/// falls back to `None`, anything present (including `null`) is `Some`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// One entry of `stations_full.json`. Only the fields needed for the join are
/// kept, everything else in the record is ignored. Values are not type-checked
/// here since most stations are never written out.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
    #[serde(default)]
    pub show_on_query: Value,
    #[serde(default, deserialize_with = "present")]
    pub city_id: Option<RecordId>,
}

impl Station {
    pub fn is_shown(&self) -> bool {
        is_truthy(&self.show_on_query)
    }
}

/// `false`, `null`, zero, and empty strings, arrays or objects are false.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// One entry of `pairs.json`. The `pairs` value is passed through untouched.
#[derive(Clone, Debug, Deserialize)]
pub struct PairEntry {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "present")]
    pub pairs: Option<Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct City {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Value>,
}

/// A shown station joined with its pairs and city name, as written to
/// `updated_stations.json`. `id` and `name` are copied as found.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatedStation {
    pub id: Value,
    pub name: Value,
    pub pairs: Value,
    pub city_name: Value,
}

impl UpdatedStation {
    /// The station bot reads `id` as an integer and `pairs` as a list of
    /// integer station ids.
    pub fn fits_bot_format(&self) -> bool {
        let integer = |value: &Value| value.is_i64() || value.is_u64();
        integer(&self.id)
            && self
                .pairs
                .as_array()
                .is_some_and(|pairs| pairs.iter().all(integer))
    }
}

#[derive(Debug)]
pub struct Inputs {
    pub stations: Vec<Station>,
    pub pairs: Vec<PairEntry>,
    pub cities: Vec<City>,
}

pub fn load(stations_path: &Path, pairs_path: &Path, cities_path: &Path) -> Result<Inputs, PrepError> {
    println!("Loading stations from {}", stations_path.display());
    let stations = read_records(stations_path)?;
    println!("Loading pairs from {}", pairs_path.display());
    let pairs = read_records(pairs_path)?;
    println!("Loading cities from {}", cities_path.display());
    let cities = read_records(cities_path)?;
    Ok(Inputs {
        stations,
        pairs,
        cities,
    })
}

/// Reads a file holding a JSON array of records.
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, PrepError> {
    let text = read_to_string(path).map_err(|e| PrepError::file_access(path, e))?;
    serde_json::from_str(&text).map_err(|e| PrepError::parse(path, e))
}
