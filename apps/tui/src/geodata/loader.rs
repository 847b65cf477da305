use std::fs;
use std::path::{Path, PathBuf};

use geo_types::{coord, Coord, LineString, MultiPolygon, Polygon};
use geojson::{FeatureCollection, GeoJson, Value};
use thiserror::Error;

use super::feature::{base_color_for, derive_feature_id, feature_name, Greenspace, NdviPoint};

pub const ROADS_FILE: &str = "roads.geojson";
pub const POINTS_FILE: &str = "points.geojson";
pub const GREENSPACES_FILE: &str = "greenspaces.geojson";

#[derive(Debug, Error)]
pub enum GeodataError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: geojson::Error,
    },
    #[error("{} does not contain a FeatureCollection", path.display())]
    NotACollection { path: PathBuf },
}

/// Geographic bounding box over every loaded coordinate.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub const fn empty() -> Self {
        Self {
            min_lon: f64::INFINITY,
            min_lat: f64::INFINITY,
            max_lon: f64::NEG_INFINITY,
            max_lat: f64::NEG_INFINITY,
        }
    }

    /// Fallback extent when every layer is empty (central Hangzhou).
    pub const fn fallback() -> Self {
        Self {
            min_lon: 120.06,
            min_lat: 30.15,
            max_lon: 120.26,
            max_lat: 30.35,
        }
    }

    pub fn extend(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lon = self.max_lon.max(lon);
        self.max_lat = self.max_lat.max(lat);
    }

    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }
}

/// The three static layers the map renders, parsed and typed.
#[derive(Debug, Clone)]
pub struct MapLayers {
    pub roads: Vec<LineString<f64>>,
    pub points: Vec<NdviPoint>,
    pub greenspaces: Vec<Greenspace>,
    /// Point features dropped for lacking a numeric NDVI property.
    pub skipped_points: usize,
    pub bounds: Bounds,
}

/// Loads `roads.geojson`, `points.geojson` and `greenspaces.geojson` from
/// the data directory. Features are immutable once loaded.
pub fn load_layers(data_dir: &Path) -> Result<MapLayers, GeodataError> {
    let roads_fc = read_collection(&data_dir.join(ROADS_FILE))?;
    let points_fc = read_collection(&data_dir.join(POINTS_FILE))?;
    let green_fc = read_collection(&data_dir.join(GREENSPACES_FILE))?;

    let roads = parse_roads(&roads_fc);
    let (points, skipped_points) = parse_points(&points_fc);
    let greenspaces = parse_greenspaces(&green_fc);

    let mut bounds = Bounds::empty();
    for line in &roads {
        for c in line.coords() {
            bounds.extend(c.x, c.y);
        }
    }
    for point in &points {
        bounds.extend(point.lon, point.lat);
    }
    for greenspace in &greenspaces {
        for polygon in &greenspace.boundary {
            for c in polygon.exterior().coords() {
                bounds.extend(c.x, c.y);
            }
        }
    }
    if bounds.is_empty() {
        bounds = Bounds::fallback();
    }

    Ok(MapLayers {
        roads,
        points,
        greenspaces,
        skipped_points,
        bounds,
    })
}

fn read_collection(path: &Path) -> Result<FeatureCollection, GeodataError> {
    let content = fs::read_to_string(path).map_err(|source| GeodataError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_collection(&content).map_err(|err| match err {
        CollectionError::Parse(source) => GeodataError::Parse {
            path: path.to_path_buf(),
            source,
        },
        CollectionError::NotACollection => GeodataError::NotACollection {
            path: path.to_path_buf(),
        },
    })
}

enum CollectionError {
    Parse(geojson::Error),
    NotACollection,
}

fn parse_collection(content: &str) -> Result<FeatureCollection, CollectionError> {
    match content.parse::<GeoJson>() {
        Ok(GeoJson::FeatureCollection(fc)) => Ok(fc),
        Ok(_) => Err(CollectionError::NotACollection),
        Err(source) => Err(CollectionError::Parse(source)),
    }
}

/// Road features become bare polylines; anything that is not a
/// (Multi)LineString is ignored.
pub fn parse_roads(collection: &FeatureCollection) -> Vec<LineString<f64>> {
    let mut roads = Vec::new();
    for feature in &collection.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        match &geometry.value {
            Value::LineString(coords) => roads.push(line_from(coords)),
            Value::MultiLineString(lines) => {
                roads.extend(lines.iter().map(|coords| line_from(coords)));
            }
            _ => {}
        }
    }
    roads
}

/// Point features keep their NDVI sample value; non-numeric or missing
/// values skip the feature rather than rendering it.
pub fn parse_points(collection: &FeatureCollection) -> (Vec<NdviPoint>, usize) {
    let mut points = Vec::new();
    let mut skipped = 0;
    for feature in &collection.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let Value::Point(position) = &geometry.value else {
            continue;
        };
        if position.len() < 2 {
            continue;
        }
        match feature.properties.as_ref().and_then(|p| ndvi_value(p)) {
            Some(value) => points.push(NdviPoint {
                lon: position[0],
                lat: position[1],
                value,
            }),
            None => skipped += 1,
        }
    }
    (points, skipped)
}

/// Finds the vegetation-index property. Exports name it after the study
/// area (`NDVIhangzhou`), so any key starting with `ndvi` counts.
fn ndvi_value(properties: &geojson::JsonObject) -> Option<f64> {
    properties
        .iter()
        .find(|(key, _)| key.to_lowercase().starts_with("ndvi"))
        .and_then(|(_, value)| value.as_f64())
}

/// Greenspace features need a resolvable identifier for comments to
/// attach to; unnamed features without `id`/`@id` are dropped.
pub fn parse_greenspaces(collection: &FeatureCollection) -> Vec<Greenspace> {
    let mut greenspaces = Vec::new();
    for feature in &collection.features {
        let Some(geometry) = &feature.geometry else {
            continue;
        };
        let boundary = match &geometry.value {
            Value::Polygon(rings) => match polygon_from(rings) {
                Some(polygon) => MultiPolygon(vec![polygon]),
                None => continue,
            },
            Value::MultiPolygon(polygons) => MultiPolygon(
                polygons
                    .iter()
                    .filter_map(|rings| polygon_from(rings))
                    .collect(),
            ),
            _ => continue,
        };
        if boundary.0.is_empty() {
            continue;
        }

        let properties = feature.properties.clone().unwrap_or_default();
        let name = feature_name(&properties);
        let Some(id) = derive_feature_id(&properties).or_else(|| name.clone()) else {
            continue;
        };
        let base_color = base_color_for(&id);
        greenspaces.push(Greenspace {
            id,
            name,
            boundary,
            base_color,
        });
    }
    greenspaces
}

fn line_from(coords: &[Vec<f64>]) -> LineString<f64> {
    LineString::new(
        coords
            .iter()
            .filter(|position| position.len() >= 2)
            .map(|position| coord! { x: position[0], y: position[1] })
            .collect::<Vec<Coord<f64>>>(),
    )
}

fn polygon_from(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let mut rings = rings.iter();
    let exterior = line_from(rings.next()?);
    if exterior.0.len() < 3 {
        return None;
    }
    let interiors = rings.map(|ring| line_from(ring)).collect();
    Some(Polygon::new(exterior, interiors))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collection(json: &str) -> FeatureCollection {
        match json.parse::<GeoJson>() {
            Ok(GeoJson::FeatureCollection(fc)) => fc,
            _ => panic!("test fixture is not a FeatureCollection"),
        }
    }

    #[test]
    fn non_numeric_ndvi_points_are_skipped() {
        let fc = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"Point","coordinates":[120.1,30.2]},
                 "properties":{"NDVIhangzhou":0.42}},
                {"type":"Feature","geometry":{"type":"Point","coordinates":[120.2,30.3]},
                 "properties":{"NDVIhangzhou":"n/a"}},
                {"type":"Feature","geometry":{"type":"Point","coordinates":[120.3,30.4]},
                 "properties":{"kind":"bench"}}
            ]}"#,
        );

        let (points, skipped) = parse_points(&fc);
        assert_eq!(points.len(), 1);
        assert!((points[0].value - 0.42).abs() < f64::EPSILON);
        assert_eq!(skipped, 2);
    }

    #[test]
    fn greenspaces_resolve_identifiers() {
        let fc = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"Polygon","coordinates":
                  [[[120.0,30.0],[120.1,30.0],[120.1,30.1],[120.0,30.0]]]},
                 "properties":{"name":"West Lake Park","id":"way/123"}},
                {"type":"Feature","geometry":{"type":"Polygon","coordinates":
                  [[[121.0,31.0],[121.1,31.0],[121.1,31.1],[121.0,31.0]]]},
                 "properties":{"@id":"way/456"}},
                {"type":"Feature","geometry":{"type":"Polygon","coordinates":
                  [[[122.0,32.0],[122.1,32.0],[122.1,32.1],[122.0,32.0]]]},
                 "properties":{"leisure":"park"}}
            ]}"#,
        );

        let greenspaces = parse_greenspaces(&fc);
        assert_eq!(greenspaces.len(), 2);
        assert_eq!(greenspaces[0].id, "123");
        assert_eq!(greenspaces[0].label(), "West Lake Park");
        assert_eq!(greenspaces[1].id, "456");
        assert_eq!(greenspaces[1].label(), "Greenspace 456");
    }

    #[test]
    fn roads_flatten_multilinestrings() {
        let fc = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"LineString","coordinates":
                  [[120.0,30.0],[120.1,30.1]]},"properties":{}},
                {"type":"Feature","geometry":{"type":"MultiLineString","coordinates":
                  [[[120.2,30.2],[120.3,30.3]],[[120.4,30.4],[120.5,30.5]]]},"properties":{}}
            ]}"#,
        );

        assert_eq!(parse_roads(&fc).len(), 3);
    }

    #[test]
    fn hit_testing_uses_polygon_interior() {
        let fc = collection(
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","geometry":{"type":"Polygon","coordinates":
                  [[[0.0,0.0],[4.0,0.0],[4.0,4.0],[0.0,4.0],[0.0,0.0]]]},
                 "properties":{"id":"way/9"}}
            ]}"#,
        );

        let greenspaces = parse_greenspaces(&fc);
        assert!(greenspaces[0].contains(2.0, 2.0));
        assert!(!greenspaces[0].contains(5.0, 5.0));
    }
}
