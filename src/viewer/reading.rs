use glam::Vec3;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, ViewerError};

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    #[must_use]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Finite once narrowed to display precision, so coordinates past
    /// `f32::MAX` count as non-finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.to_vec3().is_finite()
    }

    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.x as f32, self.y as f32, self.z as f32)
    }
}

/// One decoded sensor sample, as delivered by the streaming collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub sensor_id: String,
    pub value: f64,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub sensor_type: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    pub timestamp: Timestamp,
}

impl Reading {
    #[must_use]
    pub fn new(sensor_id: impl Into<String>, value: f64, timestamp: Timestamp) -> Self {
        Self {
            sensor_id: sensor_id.into(),
            value,
            position: None,
            sensor_type: None,
            unit: None,
            timestamp,
        }
    }

    #[must_use]
    pub fn with_position(mut self, x: f64, y: f64, z: f64) -> Self {
        self.position = Some(Position::new(x, y, z));
        self
    }

    #[must_use]
    pub fn with_sensor_type(mut self, sensor_type: impl Into<String>) -> Self {
        self.sensor_type = Some(sensor_type.into());
        self
    }

    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Display position; readings without one sit at the origin.
    #[must_use]
    pub fn world_position(&self) -> Vec3 {
        self.position.map_or(Vec3::ZERO, Position::to_vec3)
    }

    pub fn validate(&self) -> Result<()> {
        let malformed = |reason| ViewerError::MalformedReading {
            sensor_id: self.sensor_id.clone(),
            reason,
        };
        if self.sensor_id.trim().is_empty() {
            return Err(malformed("missing sensor id"));
        }
        if !self.value.is_finite() {
            return Err(malformed("non-finite value"));
        }
        if let Some(position) = &self.position
            && !position.is_finite()
        {
            return Err(malformed("non-finite position"));
        }
        Ok(())
    }
}

/// Reduces a batch to the latest valid reading per sensor.
///
/// The newest timestamp wins; on a tie the entry appearing later in the
/// batch wins. Malformed readings are skipped. Output order follows the
/// first appearance of each sensor, so repeated batches reconcile in a
/// stable order.
#[must_use]
pub fn reduce_latest<'a, I>(readings: I) -> Vec<&'a Reading>
where
    I: IntoIterator<Item = &'a Reading>,
{
    let mut slots: FxHashMap<&'a str, usize> = FxHashMap::default();
    let mut latest: Vec<&'a Reading> = Vec::new();

    for reading in readings {
        if let Err(err) = reading.validate() {
            log::debug!("Skipping reading: {err}");
            continue;
        }
        match slots.get(reading.sensor_id.as_str()) {
            Some(&slot) => {
                if reading.timestamp >= latest[slot].timestamp {
                    latest[slot] = reading;
                }
            }
            None => {
                slots.insert(reading.sensor_id.as_str(), latest.len());
                latest.push(reading);
            }
        }
    }
    latest
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_timestamp_wins_regardless_of_order() {
        let batch = vec![
            Reading::new("S1", 2.0, 200),
            Reading::new("S1", 1.0, 100),
            Reading::new("S2", 5.0, 50),
        ];
        let latest = reduce_latest(&batch);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].value, 2.0);
        assert_eq!(latest[1].sensor_id, "S2");
    }

    #[test]
    fn equal_timestamps_prefer_later_entry() {
        let batch = vec![Reading::new("S1", 1.0, 100), Reading::new("S1", 9.0, 100)];
        assert_eq!(reduce_latest(&batch)[0].value, 9.0);
    }

    #[test]
    fn malformed_readings_are_skipped() {
        let batch = vec![
            Reading::new("", 1.0, 1),
            Reading::new("S1", f64::NAN, 1),
            Reading::new("S2", 1.0, 1).with_position(f64::INFINITY, 0.0, 0.0),
            Reading::new("S3", 1.0, 1),
        ];
        let latest = reduce_latest(&batch);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].sensor_id, "S3");
    }

    #[test]
    fn positions_beyond_f32_range_are_skipped() {
        let batch = vec![
            Reading::new("A", 1.0, 1).with_position(0.0, 0.0, 0.0),
            Reading::new("A", 2.0, 2).with_position(1e300, 0.0, 0.0),
            Reading::new("B", 1.0, 1).with_position(0.0, -1e39, 0.0),
        ];
        let latest = reduce_latest(&batch);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].value, 1.0);
        assert!(latest[0].world_position().is_finite());
    }

    #[test]
    fn deserializes_camel_case_json() {
        let json = r#"{"sensorId":"T-1","value":21.5,"position":{"x":1,"y":2,"z":3},"sensorType":"temperature","timestamp":1700000000000}"#;
        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.sensor_id, "T-1");
        assert_eq!(reading.world_position(), Vec3::new(1.0, 2.0, 3.0));
        assert!(reading.unit.is_none());
    }
}
