//! Polygon boundary layers for region and neighborhood lookup
//!
//! Layers are loaded from GeoJSON FeatureCollections whose features are
//! `Polygon` or `MultiPolygon` geometries in `[longitude, latitude]` order.
//! Each feature carries its name in a configurable property, plus an
//! optional secondary name (used for secondary neighborhoods).

use std::path::Path;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::errors::{BoundaryError, BoundaryResult};

/// Point lookup against a set of named areas
pub trait BoundaryLayer: Send + Sync {
    /// The first boundary containing the point, if any
    fn locate(&self, latitude: f64, longitude: f64) -> Option<&Boundary>;

    /// Number of boundaries in the layer
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named area made of one or more polygons
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub name: String,
    pub secondary_name: Option<String>,
    polygons: Vec<Polygon>,
}

impl Boundary {
    pub fn new(name: impl Into<String>, secondary_name: Option<String>, polygons: Vec<Polygon>) -> Self {
        Self {
            name: name.into(),
            secondary_name,
            polygons,
        }
    }

    /// Check whether the point lies inside any of the polygons
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        self.polygons
            .iter()
            .any(|polygon| polygon.contains(longitude, latitude))
    }
}

/// Exterior ring with optional holes, points as `(x = longitude, y = latitude)`
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    exterior: Vec<(f64, f64)>,
    holes: Vec<Vec<(f64, f64)>>,
    bbox: (f64, f64, f64, f64),
}

impl Polygon {
    pub fn new(exterior: Vec<(f64, f64)>, holes: Vec<Vec<(f64, f64)>>) -> BoundaryResult<Self> {
        if exterior.len() < 3 {
            return Err(BoundaryError::InvalidGeometry {
                reason: format!("ring needs at least 3 points, found {}", exterior.len()),
            });
        }

        let bbox = exterior.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), &(x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        );

        Ok(Self {
            exterior,
            holes,
            bbox,
        })
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        let (min_x, min_y, max_x, max_y) = self.bbox;
        if x < min_x || x > max_x || y < min_y || y > max_y {
            return false;
        }
        ring_contains(&self.exterior, x, y) && !self.holes.iter().any(|hole| ring_contains(hole, x, y))
    }
}

/// Even-odd ray casting
fn ring_contains(ring: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut previous = match ring.last() {
        Some(&point) => point,
        None => return false,
    };

    for &(xi, yi) in ring {
        let (xj, yj) = previous;
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        previous = (xi, yi);
    }

    inside
}

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<Map<String, Value>>,
    geometry: Option<Geometry>,
}

type Position = Vec<f64>;

#[derive(Debug, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
enum Geometry {
    Polygon(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

/// Boundary layer backed by GeoJSON features
#[derive(Debug, Clone, Default)]
pub struct GeoJsonLayer {
    boundaries: Vec<Boundary>,
}

impl GeoJsonLayer {
    pub fn new(boundaries: Vec<Boundary>) -> Self {
        Self { boundaries }
    }

    /// Load a layer from a GeoJSON file
    ///
    /// # Errors
    ///
    /// Returns `BoundaryError` if the file cannot be read or is not a
    /// FeatureCollection of polygons carrying `name_property`.
    pub async fn load(
        path: &Path,
        name_property: &str,
        secondary_property: Option<&str>,
    ) -> BoundaryResult<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| BoundaryError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let layer = Self::from_geojson_str(&json, name_property, secondary_property)?;
        debug!(
            "Loaded {} boundaries from {}",
            layer.boundaries.len(),
            path.display()
        );
        Ok(layer)
    }

    /// Parse a layer from GeoJSON text
    pub fn from_geojson_str(
        json: &str,
        name_property: &str,
        secondary_property: Option<&str>,
    ) -> BoundaryResult<Self> {
        let collection: FeatureCollection = serde_json::from_str(json)?;
        let mut boundaries = Vec::with_capacity(collection.features.len());

        for feature in collection.features {
            let properties = feature.properties.unwrap_or_default();
            let name = property_text(&properties, name_property).ok_or_else(|| {
                BoundaryError::MissingProperty {
                    property: name_property.to_string(),
                }
            })?;
            let secondary_name =
                secondary_property.and_then(|property| property_text(&properties, property));

            let Some(geometry) = feature.geometry else {
                warn!("Skipping boundary '{}' without geometry", name);
                continue;
            };

            boundaries.push(Boundary::new(name, secondary_name, polygons_of(geometry)?));
        }

        Ok(Self { boundaries })
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }
}

impl BoundaryLayer for GeoJsonLayer {
    fn locate(&self, latitude: f64, longitude: f64) -> Option<&Boundary> {
        self.boundaries
            .iter()
            .find(|boundary| boundary.contains(latitude, longitude))
    }

    fn len(&self) -> usize {
        self.boundaries.len()
    }
}

fn property_text(properties: &Map<String, Value>, key: &str) -> Option<String> {
    match properties.get(key)? {
        Value::String(text) => Some(text.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

fn polygons_of(geometry: Geometry) -> BoundaryResult<Vec<Polygon>> {
    match geometry {
        Geometry::Polygon(rings) => Ok(vec![polygon_from_rings(rings)?]),
        Geometry::MultiPolygon(polygons) => polygons.into_iter().map(polygon_from_rings).collect(),
    }
}

fn polygon_from_rings(rings: Vec<Vec<Position>>) -> BoundaryResult<Polygon> {
    let mut rings = rings.into_iter().map(ring_points);
    let exterior = rings.next().ok_or_else(|| BoundaryError::InvalidGeometry {
        reason: "polygon has no rings".to_string(),
    })??;
    let holes = rings.collect::<BoundaryResult<Vec<_>>>()?;
    Polygon::new(exterior, holes)
}

fn ring_points(ring: Vec<Position>) -> BoundaryResult<Vec<(f64, f64)>> {
    ring.into_iter()
        .map(|position| match position.as_slice() {
            [x, y, ..] => Ok((*x, *y)),
            _ => Err(BoundaryError::InvalidGeometry {
                reason: format!("position needs 2 coordinates, found {}", position.len()),
            }),
        })
        .collect()
}
