use serde::{Deserialize, Serialize};

/// Unit of work flowing through the experimental frame: an identifier plus
/// the timestamp of its last observed state change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub time: f64,
}

impl Job {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            time: 0.0,
        }
    }
}
