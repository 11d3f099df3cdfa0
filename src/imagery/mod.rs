//! Remote imagery access.
//!
//! The imagery service renders a raster for a region and returns image bytes.
//! [`ImageryService`] is the narrow seam the plotting code talks to; the HTTP
//! implementation lives in [`rest`], tests substitute their own.

pub mod rest;

use bytes::Bytes;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use crate::error::{CartoeeError, Result};
use crate::vis_params::VisParams;

/// Opaque reference to a remote raster.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageHandle {
    id: String,
}

impl ImageHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for ImageHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

/// Requested thumbnail size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dims {
    /// Longest side; the other side scales proportionally
    Max(u32),
    /// Exact width and height
    Size(u32, u32),
}

impl Dims {
    pub fn validate(&self) -> Result<()> {
        let ok = match *self {
            Dims::Max(n) => n > 0,
            Dims::Size(w, h) => w > 0 && h > 0,
        };
        if ok {
            Ok(())
        } else {
            Err(CartoeeError::invalid(
                "dims",
                format!("dimensions must be positive, got {}", self),
            ))
        }
    }
}

impl fmt::Display for Dims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dims::Max(n) => write!(f, "{}", n),
            Dims::Size(w, h) => write!(f, "{}x{}", w, h),
        }
    }
}

impl FromStr for Dims {
    type Err = CartoeeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim().parse::<u32>().map_err(|_| {
                CartoeeError::invalid(
                    "dims",
                    format!("expected an integer or WIDTHxHEIGHT, got {}", s),
                )
            })
        };

        let dims = match s.split_once(['x', 'X', ',']) {
            Some((w, h)) => Dims::Size(parse(w)?, parse(h)?),
            None => Dims::Max(parse(s)?),
        };
        dims.validate()?;
        Ok(dims)
    }
}

/// Everything sent to the imagery service for one thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailRequest {
    /// Image encoding, always `png` for map overlays
    pub format: String,
    /// Polygon rings in `[lon, lat]` pairs; `None` renders the image footprint
    pub region: Option<Vec<Vec<[f64; 2]>>>,
    pub dimensions: Option<Dims>,
    pub vis_params: VisParams,
    /// Correlates log lines for this request
    pub request_id: String,
}

impl ThumbnailRequest {
    /// Flatten into query parameters. Visualization keys come last and are
    /// never shadowed by the fixed ones.
    pub fn query_pairs(&self) -> Result<Vec<(String, String)>> {
        let mut pairs = vec![("format".to_string(), self.format.clone())];
        if let Some(region) = &self.region {
            pairs.push(("region".to_string(), serde_json::to_string(region)?));
        }
        if let Some(dims) = &self.dimensions {
            pairs.push(("dimensions".to_string(), dims.to_string()));
        }
        pairs.extend(self.vis_params.to_query_pairs());
        Ok(pairs)
    }
}

/// Raw answer from the imagery service.
#[derive(Debug, Clone)]
pub struct ThumbnailResponse {
    pub status: u16,
    pub body: Bytes,
}

impl ThumbnailResponse {
    pub fn ok(body: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            body: body.into(),
        }
    }

    pub fn error(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Image bytes on success, otherwise the upstream error message.
    pub fn into_image_bytes(self) -> Result<Bytes> {
        if self.status == 200 {
            return Ok(self.body);
        }
        Err(CartoeeError::Upstream {
            status: self.status,
            message: upstream_message(&self.body),
        })
    }
}

/// Pull the `error` entry out of an error body; fall back to the raw text.
pub fn upstream_message(body: &[u8]) -> String {
    match serde_json::from_slice::<Value>(body) {
        Ok(json) => match json.get("error") {
            Some(Value::String(message)) => message.clone(),
            Some(Value::Object(details)) => match details.get("message") {
                Some(Value::String(message)) => message.clone(),
                _ => Value::Object(details.clone()).to_string(),
            },
            Some(other) => other.to_string(),
            None => json.to_string(),
        },
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}

/// GeoJSON polygon as returned by the bounds query.
#[derive(Debug, Deserialize)]
pub(crate) struct PolygonGeometry {
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

/// The remote raster service.
pub trait ImageryService {
    /// Render `image` as described by `request`.
    fn thumbnail(&self, image: &ImageHandle, request: &ThumbnailRequest)
        -> Result<ThumbnailResponse>;

    /// Outer ring of the image's bounding geometry.
    fn image_bounds(&self, image: &ImageHandle) -> Result<Vec<[f64; 2]>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dims_parse_and_display() {
        assert_eq!("1000".parse::<Dims>().unwrap(), Dims::Max(1000));
        assert_eq!("800x600".parse::<Dims>().unwrap(), Dims::Size(800, 600));
        assert_eq!("800, 600".parse::<Dims>().unwrap(), Dims::Size(800, 600));
        assert_eq!(Dims::Size(800, 600).to_string(), "800x600");
        assert!("0".parse::<Dims>().is_err());
        assert!("wide".parse::<Dims>().is_err());
    }

    #[test]
    fn test_query_pairs_order() {
        let request = ThumbnailRequest {
            format: "png".to_string(),
            region: Some(vec![vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]),
            dimensions: Some(Dims::Max(512)),
            vis_params: VisParams::new().with("min", 0),
            request_id: "test".to_string(),
        };
        let pairs = request.query_pairs().unwrap();
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["format", "region", "dimensions", "min"]);
        assert_eq!(pairs[1].1, "[[[0.0,0.0],[1.0,0.0],[1.0,1.0]]]");
        assert_eq!(pairs[2].1, "512");
    }

    #[test]
    fn test_upstream_message_forms() {
        assert_eq!(
            upstream_message(br#"{"error": "Image.load: asset not found"}"#),
            "Image.load: asset not found"
        );
        assert_eq!(
            upstream_message(br#"{"error": {"code": 400, "message": "bad band"}}"#),
            "bad band"
        );
        assert_eq!(upstream_message(b"Service Unavailable\n"), "Service Unavailable");
    }

    #[test]
    fn test_non_success_response() {
        let response = ThumbnailResponse::error(400, r#"{"error": "nope"}"#);
        match response.into_image_bytes() {
            Err(CartoeeError::Upstream { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "nope");
            }
            other => panic!("expected upstream error, got {:?}", other),
        }
    }
}
