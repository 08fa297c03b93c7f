use anyhow::{Context, Result, anyhow, bail};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::config::ApiConfig;
use crate::domain::{GeoObject, GeometryPatch};

const USER_AGENT: &str = "geoedit/0.1.0";

/// Storage collaborator for geo-object geometry
///
/// The editing core only produces a `GeometryPatch`; sending it and reporting
/// failures is up to the store.
pub trait GeometryStore {
    fn fetch_object(&self, id: &str) -> Result<GeoObject>;

    /// Raw border payload of an object
    fn fetch_geometry(&self, id: &str) -> Result<String> {
        let object = self.fetch_object(id)?;
        object
            .border()
            .map(str::to_string)
            .ok_or_else(|| anyhow!("Geo-object {} has no geometry", id))
    }

    fn save_geometry(&self, patch: &GeometryPatch) -> Result<()>;
}

/// Backend store speaking JSON over HTTP
///
/// Failures are reported to the caller and never retried.
pub struct HttpStore {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn object_url(&self, id: &str) -> String {
        format!("{}/api/GeoSystem/{}", self.base_url, id)
    }
}

impl GeometryStore for HttpStore {
    fn fetch_object(&self, id: &str) -> Result<GeoObject> {
        let response = self
            .client
            .get(self.object_url(id))
            .send()
            .context("Failed to send request to geosystem API")?;

        if !response.status().is_success() {
            bail!("Geosystem API returned error status: {}", response.status());
        }

        response
            .json()
            .context("Failed to parse geosystem JSON response")
    }

    fn save_geometry(&self, patch: &GeometryPatch) -> Result<()> {
        let response = self
            .client
            .patch(self.object_url(&patch.id))
            .json(patch)
            .send()
            .context("Failed to send geometry patch")?;

        if !response.status().is_success() {
            bail!("Geometry patch rejected with status: {}", response.status());
        }

        tracing::info!("Saved geometry of {}", patch.id);
        Ok(())
    }
}

/// In-process store, used offline and in tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<HashMap<String, GeoObject>>,
}

impl MemoryStore {
    pub fn new(objects: impl IntoIterator<Item = GeoObject>) -> Self {
        let objects = objects.into_iter().map(|o| (o.id.clone(), o)).collect();
        Self {
            objects: Mutex::new(objects),
        }
    }
}

impl GeometryStore for MemoryStore {
    fn fetch_object(&self, id: &str) -> Result<GeoObject> {
        let objects = self
            .objects
            .lock()
            .map_err(|_| anyhow!("Geo-object store lock poisoned"))?;
        objects
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow!("Geo-object not found: {}", id))
    }

    fn save_geometry(&self, patch: &GeometryPatch) -> Result<()> {
        let mut objects = self
            .objects
            .lock()
            .map_err(|_| anyhow!("Geo-object store lock poisoned"))?;
        let object = objects
            .get_mut(&patch.id)
            .ok_or_else(|| anyhow!("Geo-object not found: {}", patch.id))?;
        object.geometry = Some(patch.geometry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeometryRecord;

    fn lake() -> GeoObject {
        GeoObject {
            id: "lake".to_string(),
            geometry: Some(GeometryRecord {
                border: "[[0,0],[0,1],[1,1],[1,0]]".to_string(),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_object_url() {
        let store = HttpStore::new(&ApiConfig {
            base_url: "http://localhost:8080/".to_string(),
            timeout_secs: 5,
        })
        .unwrap();
        assert_eq!(
            store.object_url("35545d45"),
            "http://localhost:8080/api/GeoSystem/35545d45"
        );
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new([lake()]);
        assert_eq!(store.fetch_geometry("lake").unwrap(), "[[0,0],[0,1],[1,1],[1,0]]");

        let patch = GeometryPatch::for_object(&lake(), "[[[0,0],[0,2],[2,2],[0,0]]]".to_string());
        store.save_geometry(&patch).unwrap();
        assert_eq!(store.fetch_geometry("lake").unwrap(), "[[[0,0],[0,2],[2,2],[0,0]]]");
    }

    #[test]
    fn test_memory_store_missing() {
        let store = MemoryStore::default();
        assert!(store.fetch_object("nope").is_err());

        let patch = GeometryPatch::for_object(&lake(), "[]".to_string());
        assert!(store.save_geometry(&patch).is_err());
    }

    #[test]
    fn test_fetch_geometry_without_border() {
        let store = MemoryStore::new([GeoObject {
            id: "bare".to_string(),
            ..Default::default()
        }]);
        assert!(store.fetch_geometry("bare").is_err());
    }
}
