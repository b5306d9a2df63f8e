use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Coordinates, Priority};

/// Grid cell index of a cluster: `floor(lat / size)`, `floor(lng / size)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct CellKey {
    pub lat_index: i64,
    pub lng_index: i64,
}

impl CellKey {
    pub fn for_coordinates(coordinates: &Coordinates, cell_size_degrees: f64) -> Self {
        Self {
            lat_index: (coordinates.lat / cell_size_degrees).floor() as i64,
            lng_index: (coordinates.lng / cell_size_degrees).floor() as i64,
        }
    }
}

impl std::fmt::Display for CellKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.lat_index, self.lng_index)
    }
}

/// Map cluster of reports falling into the same grid cell
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCluster {
    pub cell_key: CellKey,
    pub center: Coordinates,
    pub count: usize,
    pub max_priority: Priority,
    pub member_ids: Vec<String>,
}
