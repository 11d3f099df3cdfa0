//! In-process imagery service for testing.
//!
//! Returns canned responses and records every call so tests can check that
//! rejected arguments never reach the service.

#![allow(dead_code)]

use bytes::Bytes;
use std::cell::{Cell, RefCell};

use cartoee::imagery::{ThumbnailRequest, ThumbnailResponse};
use cartoee::{ImageHandle, ImageryService, Result};

pub struct StubService {
    status: u16,
    body: Bytes,
    bounds: Vec<[f64; 2]>,
    pub thumbnail_calls: Cell<usize>,
    pub bounds_calls: Cell<usize>,
    pub last_request: RefCell<Option<ThumbnailRequest>>,
}

impl StubService {
    /// Answer every thumbnail request with `body` and status 200
    pub fn ok(body: Vec<u8>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            bounds: vec![
                [-10.0, 0.0],
                [10.0, 0.0],
                [10.0, 5.0],
                [-10.0, 5.0],
                [-10.0, 0.0],
            ],
            thumbnail_calls: Cell::new(0),
            bounds_calls: Cell::new(0),
            last_request: RefCell::new(None),
        }
    }

    /// Footprint returned by the bounds query
    pub fn with_bounds(mut self, bounds: Vec<[f64; 2]>) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn total_calls(&self) -> usize {
        self.thumbnail_calls.get() + self.bounds_calls.get()
    }

    /// Value of one query parameter of the last thumbnail request
    pub fn last_param(&self, key: &str) -> Option<String> {
        let request = self.last_request.borrow();
        let pairs = request.as_ref()?.query_pairs().ok()?;
        pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl ImageryService for StubService {
    fn thumbnail(
        &self,
        _image: &ImageHandle,
        request: &ThumbnailRequest,
    ) -> Result<ThumbnailResponse> {
        self.thumbnail_calls.set(self.thumbnail_calls.get() + 1);
        *self.last_request.borrow_mut() = Some(request.clone());
        Ok(ThumbnailResponse::error(self.status, self.body.clone()))
    }

    fn image_bounds(&self, _image: &ImageHandle) -> Result<Vec<[f64; 2]>> {
        self.bounds_calls.set(self.bounds_calls.get() + 1);
        Ok(self.bounds.clone())
    }
}
