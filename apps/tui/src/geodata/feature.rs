use geo::Contains;
use geo_types::{MultiPolygon, Point};
use geojson::JsonObject;

use crate::ndvi::Rgb;

/// A greenspace polygon with its derived stable identifier.
///
/// Identifiers come from OpenStreetMap-style `id` / `@id` properties
/// (`way/123456789`); only the trailing path segment is kept so the same
/// feature resolves to the same id regardless of the export tool.
#[derive(Debug, Clone)]
pub struct Greenspace {
    pub id: String,
    pub name: Option<String>,
    pub boundary: MultiPolygon<f64>,
    /// Base fill color assigned at load time; hover styling must restore
    /// this exact color, not a shared default.
    pub base_color: Rgb,
}

impl Greenspace {
    /// Display label: the `name` property, or a synthetic label embedding
    /// the id when the feature is unnamed.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Greenspace {}", self.id))
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        self.boundary.contains(&Point::new(lon, lat))
    }
}

/// An NDVI sample point. Features without a numeric vegetation-index
/// property never become one of these.
#[derive(Debug, Clone, Copy)]
pub struct NdviPoint {
    pub lon: f64,
    pub lat: f64,
    pub value: f64,
}

/// Derives the stable feature id from the `id` property, falling back to
/// `@id`, keeping only the text after the last `/`.
pub fn derive_feature_id(properties: &JsonObject) -> Option<String> {
    property_string(properties, "id")
        .or_else(|| property_string(properties, "@id"))
        .map(|raw| trailing_segment(&raw).to_string())
}

/// Reads the display name from the `name` property.
pub fn feature_name(properties: &JsonObject) -> Option<String> {
    property_string(properties, "name")
}

fn trailing_segment(raw: &str) -> &str {
    raw.rsplit('/').next().unwrap_or(raw)
}

fn property_string(properties: &JsonObject, key: &str) -> Option<String> {
    match properties.get(key)? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Assigns a per-feature base shade so neighbouring polygons are
/// distinguishable. Deterministic in the feature id.
pub fn base_color_for(id: &str) -> Rgb {
    let hash = id
        .bytes()
        .fold(0_u64, |acc, b| acc.wrapping_mul(31) + u64::from(b));
    #[allow(clippy::cast_possible_truncation)]
    let shade = (hash % 48) as u8;
    Rgb::new(3, 121 + shade, 65)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(json: serde_json::Value) -> JsonObject {
        json.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn id_keeps_trailing_path_segment() {
        let properties = props(serde_json::json!({"id": "way/123456789"}));
        assert_eq!(
            derive_feature_id(&properties),
            Some("123456789".to_string())
        );
    }

    #[test]
    fn id_falls_back_to_at_id() {
        let properties = props(serde_json::json!({"@id": "relation/42"}));
        assert_eq!(derive_feature_id(&properties), Some("42".to_string()));
    }

    #[test]
    fn plain_ids_pass_through() {
        let properties = props(serde_json::json!({"id": 77}));
        assert_eq!(derive_feature_id(&properties), Some("77".to_string()));
    }

    #[test]
    fn missing_id_yields_none() {
        let properties = props(serde_json::json!({"name": "West Lake Park"}));
        assert_eq!(derive_feature_id(&properties), None);
    }

    #[test]
    fn label_prefers_name_over_synthetic() {
        let named = Greenspace {
            id: "9".to_string(),
            name: Some("West Lake Park".to_string()),
            boundary: MultiPolygon(vec![]),
            base_color: base_color_for("9"),
        };
        assert_eq!(named.label(), "West Lake Park");

        let unnamed = Greenspace {
            id: "9".to_string(),
            name: None,
            boundary: MultiPolygon(vec![]),
            base_color: base_color_for("9"),
        };
        assert_eq!(unnamed.label(), "Greenspace 9");
    }

    #[test]
    fn base_color_is_stable_per_id() {
        assert_eq!(base_color_for("123"), base_color_for("123"));
    }
}
