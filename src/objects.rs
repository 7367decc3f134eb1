//! Detected-object wire type and announcement formatting.
//!
//! The detection server reports each object as a 3-element JSON array
//! `[label, distance_in_meters, direction]`. Objects are transient: every
//! poll fully replaces the previous set, with no identity across polls.

use serde::{Deserialize, Serialize};

/// Wire shape on `/get_objects`.
type ObjectTuple = (String, f64, String);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ObjectTuple", into = "ObjectTuple")]
pub struct DetectedObject {
    pub label: String,
    /// Distance in meters, as estimated by the server.
    pub distance: f64,
    /// Direction relative to the camera, e.g. "front", "left".
    pub direction: String,
}

impl From<ObjectTuple> for DetectedObject {
    fn from((label, distance, direction): ObjectTuple) -> Self {
        Self {
            label,
            distance,
            direction,
        }
    }
}

impl From<DetectedObject> for ObjectTuple {
    fn from(obj: DetectedObject) -> Self {
        (obj.label, obj.distance, obj.direction)
    }
}

impl DetectedObject {
    /// One rendered list entry, e.g. `person - 2.5m (front)`.
    ///
    /// f64 Display drops the fraction for integral values, so a served `10`
    /// renders as `10m`, not `10.0m`.
    pub fn display_line(&self) -> String {
        format!("{} - {}m ({})", self.label, self.distance, self.direction)
    }

    /// Text submitted to the speech engine, e.g. `person is 2.5 meters on front`.
    pub fn spoken_phrase(&self) -> String {
        format!(
            "{} is {} meters on {}",
            self.label, self.distance, self.direction
        )
    }
}
