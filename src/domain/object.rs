use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Geometry block of a geo-object as stored by the backend
///
/// `border` holds the coordinate payload as a JSON string. The remaining
/// fields are carried through untouched when the geometry is patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate_reference_system: Option<String>,
    pub border: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<String>,
    /// Style and alternate content fields, kept verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A geosystem record, or a proxy summary nested inside one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoObject {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryRecord>,
    /// Only present on proxy summaries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy_rank: Option<i64>,
    #[serde(default, rename = "proxyGeoSystemDtos")]
    pub proxies: Vec<GeoObject>,
}

impl GeoObject {
    /// Proxy geosystems are view-only and never enter edit mode
    pub fn is_proxy(&self) -> bool {
        self.proxy_rank.is_some()
    }

    pub fn border(&self) -> Option<&str> {
        self.geometry.as_ref().map(|g| g.border.as_str())
    }
}

/// Partial-update body for a geometry change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryPatch {
    pub id: String,
    pub geometry: GeometryRecord,
}

impl GeometryPatch {
    /// Replace the border of `object`'s geometry with `border`, keeping its
    /// other fields
    pub fn for_object(object: &GeoObject, border: String) -> Self {
        let geometry = GeometryRecord {
            border,
            ..object.geometry.clone().unwrap_or_default()
        };
        Self {
            id: object.id.clone(),
            geometry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_geo_object() {
        let json = r#"{
            "id": "35545d45",
            "name": "Lake",
            "geometry": {"border": "[[1,2]]", "coordinateReferenceSystem": "EPSG:4326"},
            "proxyGeoSystemDtos": [
                {"id": "p1", "name": "Proxy", "proxyRank": 2}
            ]
        }"#;

        let object: GeoObject = serde_json::from_str(json).unwrap();
        assert_eq!(object.border(), Some("[[1,2]]"));
        assert!(!object.is_proxy());
        assert_eq!(object.proxies.len(), 1);
        assert!(object.proxies[0].is_proxy());
        assert!(object.proxies[0].geometry.is_none());
    }

    #[test]
    fn test_patch_keeps_other_geometry_fields() {
        let object = GeoObject {
            id: "a".to_string(),
            geometry: Some(GeometryRecord {
                coordinate_reference_system: Some("EPSG:4326".to_string()),
                border: "[[1,2]]".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        };

        let patch = GeometryPatch::for_object(&object, "[[[0,0],[0,1],[1,1],[0,0]]]".to_string());
        assert_eq!(patch.id, "a");
        assert_eq!(patch.geometry.border, "[[[0,0],[0,1],[1,1],[0,0]]]");
        assert_eq!(
            patch.geometry.coordinate_reference_system.as_deref(),
            Some("EPSG:4326")
        );

        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body["geometry"]["coordinateReferenceSystem"], "EPSG:4326");
        assert!(body["geometry"].get("center").is_none());
    }

    #[test]
    fn test_patch_keeps_unknown_geometry_fields() {
        let json = r#"{
            "id": "a",
            "geometry": {
                "border": "[[1,2]]",
                "geoJsonStyle": "{\"color\":\"blue\"}",
                "gooJsonStyleType": 1,
                "altGeoContents": [{"kind": "label"}]
            }
        }"#;
        let object: GeoObject = serde_json::from_str(json).unwrap();

        let patch = GeometryPatch::for_object(&object, "[[[0,0],[0,1],[1,1],[0,0]]]".to_string());
        let body = serde_json::to_value(&patch).unwrap();
        let geometry = &body["geometry"];
        assert_eq!(geometry["border"], "[[[0,0],[0,1],[1,1],[0,0]]]");
        assert_eq!(geometry["geoJsonStyle"], "{\"color\":\"blue\"}");
        assert_eq!(geometry["gooJsonStyleType"], 1);
        assert_eq!(geometry["altGeoContents"][0]["kind"], "label");
    }
}
