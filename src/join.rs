use indicatif::{ProgressBar, ProgressIterator};
use serde_json::Value;
use std::{collections::HashMap, fmt};

use super::error::PrepError;
use super::records::{City, Inputs, PairEntry, RecordId, UpdatedStation};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JoinSummary {
    pub stations_read: usize,
    pub kept: usize,
    pub kept_without_pairs: usize,
    pub kept_without_city: usize,
    pub kept_outside_bot_format: usize,
}

impl fmt::Display for JoinSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stations read: {}, kept: {} ({} without pairs, {} without a city)",
            self.stations_read, self.kept, self.kept_without_pairs, self.kept_without_city
        )?;
        if self.kept_outside_bot_format > 0 {
            write!(
                f,
                "\nWarning: {} kept stations have a non-integer id or pairs",
                self.kept_outside_bot_format
            )?;
        }
        Ok(())
    }
}

/// Keeps the stations flagged `showOnQuery` and attaches the pairs and city
/// name of the first matching entry in each lookup file. Input order is kept.
pub fn join(
    inputs: &Inputs,
    progress: ProgressBar,
) -> Result<(Vec<UpdatedStation>, JoinSummary), PrepError> {
    let pair_lookup = create_pair_lookup(&inputs.pairs);
    let city_lookup = create_city_lookup(&inputs.cities);

    let mut updated_stations = Vec::new();
    let mut summary = JoinSummary {
        stations_read: inputs.stations.len(),
        ..JoinSummary::default()
    };

    for (index, station) in inputs.stations.iter().enumerate().progress_with(progress) {
        if !station.is_shown() {
            continue;
        }
        let id = station
            .id
            .as_ref()
            .ok_or(PrepError::KeyMissing { index, key: "id" })?;
        let name = station
            .name
            .clone()
            .ok_or(PrepError::KeyMissing { index, key: "name" })?;

        let pairs = pair_lookup
            .get(id)
            .map(|pairs| (*pairs).clone())
            .unwrap_or_else(|| Value::Array(Vec::new()));
        let city_name = station
            .city_id
            .as_ref()
            .and_then(|city_id| city_lookup.get(city_id))
            .map(|name| (*name).clone())
            .unwrap_or(Value::Null);

        let updated = UpdatedStation {
            id: id.0.clone(),
            name,
            pairs,
            city_name,
        };
        summary.kept += 1;
        if updated.pairs.as_array().is_none_or(Vec::is_empty) {
            summary.kept_without_pairs += 1;
        }
        if updated.city_name.is_null() {
            summary.kept_without_city += 1;
        }
        if !updated.fits_bot_format() {
            summary.kept_outside_bot_format += 1;
        }
        updated_stations.push(updated);
    }

    Ok((updated_stations, summary))
}

const EMPTY_PAIRS: &Value = &Value::Array(Vec::new());
const NO_CITY_NAME: &Value = &Value::Null;

/// Maps each station id to the `pairs` of its first entry. Later entries with
/// the same id are ignored, and an entry without `pairs` counts as empty.
fn create_pair_lookup(pairs: &[PairEntry]) -> HashMap<&RecordId, &Value> {
    let mut lookup: HashMap<&RecordId, &Value> = HashMap::new();
    for entry in pairs {
        if let Some(id) = &entry.id {
            lookup
                .entry(id)
                .or_insert_with(|| entry.pairs.as_ref().unwrap_or(EMPTY_PAIRS));
        }
    }
    lookup
}

fn create_city_lookup(cities: &[City]) -> HashMap<&RecordId, &Value> {
    let mut lookup: HashMap<&RecordId, &Value> = HashMap::new();
    for city in cities {
        if let Some(id) = &city.id {
            lookup
                .entry(id)
                .or_insert_with(|| city.name.as_ref().unwrap_or(NO_CITY_NAME));
        }
    }
    lookup
}
