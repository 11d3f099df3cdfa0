//! Blocking HTTP client for the imagery service.
//!
//! Thumbnails are fetched with `GET {endpoint}/{image}:thumbnail` carrying the
//! request as query parameters; image footprints come from
//! `GET {endpoint}/{image}:bounds` as a GeoJSON polygon.

use reqwest::blocking::{Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;

use super::{ImageHandle, ImageryService, PolygonGeometry, ThumbnailRequest, ThumbnailResponse};
use crate::config::ImageryConfig;
use crate::error::{CartoeeError, Result};

/// Header naming the billing project
const PROJECT_HEADER: &str = "x-goog-user-project";

pub struct RestImageryService {
    client: Client,
    endpoint: String,
    project: Option<String>,
    token: Option<String>,
}

impl RestImageryService {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::from_config(&ImageryConfig {
            endpoint: endpoint.into(),
            ..Default::default()
        })
    }

    pub fn from_config(config: &ImageryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout_secs.map(Duration::from_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project: config.project.clone(),
            token: config.token.clone(),
        })
    }

    fn url(&self, image: &ImageHandle, method: &str) -> String {
        format!("{}/{}:{}", self.endpoint, image.id(), method)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        match &self.project {
            Some(project) => builder.header(PROJECT_HEADER, project),
            None => builder,
        }
    }
}

impl ImageryService for RestImageryService {
    fn thumbnail(
        &self,
        image: &ImageHandle,
        request: &ThumbnailRequest,
    ) -> Result<ThumbnailResponse> {
        let url = self.url(image, "thumbnail");
        let pairs = request.query_pairs()?;
        debug!(
            url = %url,
            request_id = %request.request_id,
            params = pairs.len(),
            "Requesting thumbnail"
        );

        let response = self
            .authorize(self.client.get(&url).query(&pairs))
            .send()?;
        let status = response.status().as_u16();
        let body = response.bytes()?;

        debug!(
            request_id = %request.request_id,
            status = status,
            bytes = body.len(),
            "Thumbnail response received"
        );
        Ok(ThumbnailResponse { status, body })
    }

    fn image_bounds(&self, image: &ImageHandle) -> Result<Vec<[f64; 2]>> {
        let url = self.url(image, "bounds");
        debug!(url = %url, "Requesting image bounds");

        let response = self.authorize(self.client.get(&url)).send()?;
        let status = response.status().as_u16();
        let body = ThumbnailResponse::error(status, response.bytes()?).into_image_bytes()?;

        let geometry: PolygonGeometry = serde_json::from_slice(&body)?;
        geometry
            .coordinates
            .into_iter()
            .next()
            .ok_or_else(|| CartoeeError::Upstream {
                status,
                message: format!("bounds of {} have no coordinates", image),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_layout() {
        let service = RestImageryService::new("https://imagery.example.com/v1/").unwrap();
        let image = ImageHandle::new("USGS/SRTMGL1_003");
        assert_eq!(
            service.url(&image, "thumbnail"),
            "https://imagery.example.com/v1/USGS/SRTMGL1_003:thumbnail"
        );
    }

    #[test]
    fn test_polygon_geometry_parse() {
        let body = r#"{"type": "Polygon", "coordinates": [[[-10, 0], [10, 0], [10, 5], [-10, 5], [-10, 0]]]}"#;
        let geometry: PolygonGeometry = serde_json::from_str(body).unwrap();
        assert_eq!(geometry.coordinates[0].len(), 5);
        assert_eq!(geometry.coordinates[0][2], [10.0, 5.0]);
    }
}
