//! GeoJSON feature collections as folded by the pipeline.
//!
//! Features are held behind `Arc` so that cloning a collection is a shallow
//! copy. Handlers that change a feature go through [`FeatureCollection::map_positions`]
//! or [`Arc::make_mut`], which copies only the features they actually touch;
//! earlier states and outcome snapshots keep seeing the unmodified values.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// `[lon, lat, ...extra]`. Extra ordinates (usually elevation) are carried
/// through untouched when a position is moved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Position(pub Vec<f64>);

impl Position {
    pub fn new(lon: f64, lat: f64) -> Self {
        Self(vec![lon, lat])
    }

    pub fn lon(&self) -> f64 {
        self.0.first().copied().unwrap_or_default()
    }

    pub fn lat(&self) -> f64 {
        self.0.get(1).copied().unwrap_or_default()
    }

    pub fn set(&mut self, lon: f64, lat: f64) {
        if self.0.len() < 2 {
            self.0.resize(2, 0.0);
        }
        self.0[0] = lon;
        self.0[1] = lat;
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: Position },
    MultiPoint { coordinates: Vec<Position> },
    LineString { coordinates: Vec<Position> },
    MultiLineString { coordinates: Vec<Vec<Position>> },
    Polygon { coordinates: Vec<Vec<Position>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<Position>>> },
}

impl Geometry {
    pub fn point(lon: f64, lat: f64) -> Self {
        Geometry::Point {
            coordinates: Position::new(lon, lat),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point { .. } => "Point",
            Geometry::MultiPoint { .. } => "MultiPoint",
            Geometry::LineString { .. } => "LineString",
            Geometry::MultiLineString { .. } => "MultiLineString",
            Geometry::Polygon { .. } => "Polygon",
            Geometry::MultiPolygon { .. } => "MultiPolygon",
        }
    }

    /// All positions in document order.
    pub fn positions(&self) -> Vec<&Position> {
        match self {
            Geometry::Point { coordinates } => vec![coordinates],
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.iter().collect()
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter().flatten().collect()
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().flatten().flatten().collect()
            }
        }
    }

    pub fn for_each_position_mut<F: FnMut(&mut Position)>(&mut self, mut f: F) {
        match self {
            Geometry::Point { coordinates } => f(coordinates),
            Geometry::MultiPoint { coordinates } | Geometry::LineString { coordinates } => {
                coordinates.iter_mut().for_each(f)
            }
            Geometry::MultiLineString { coordinates } | Geometry::Polygon { coordinates } => {
                coordinates.iter_mut().flatten().for_each(f)
            }
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter_mut().flatten().flatten().for_each(f)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Feature
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureTag {
    Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub tag: FeatureTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
}

impl Feature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            tag: FeatureTag::Feature,
            id: None,
            geometry: Some(geometry),
            properties: None,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties
            .get_or_insert_with(Map::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.as_ref().and_then(|p| p.get(key))
    }
}

// ---------------------------------------------------------------------------
// FeatureCollection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionTag {
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub tag: CollectionTag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub features: Vec<Arc<Feature>>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            tag: CollectionTag::FeatureCollection,
            name: None,
            features: features.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = &Position> {
        self.features
            .iter()
            .filter_map(|f| f.geometry.as_ref())
            .flat_map(|g| g.positions())
    }

    /// First position of the first feature that has a geometry.
    pub fn first_position(&self) -> Option<&Position> {
        self.positions().next()
    }

    /// New collection with `f` applied to every position. Features without a
    /// geometry are shared with `self`, the rest are copied.
    pub fn map_positions<F: FnMut(&mut Position)>(&self, mut f: F) -> Self {
        let mut next = self.clone();
        for feature in next.features.iter_mut() {
            if feature.geometry.is_none() {
                continue;
            }
            if let Some(geometry) = Arc::make_mut(feature).geometry.as_mut() {
                geometry.for_each_position_mut(&mut f);
            }
        }
        next
    }

    /// `(min_lon, min_lat, max_lon, max_lat)` over all positions.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.positions().fold(None, |acc, p| {
            let (lon, lat) = (p.lon(), p.lat());
            Some(match acc {
                None => (lon, lat, lon, lat),
                Some((w, s, e, n)) => (w.min(lon), s.min(lat), e.max(lon), n.max(lat)),
            })
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
