//! Common test utilities for cartoee.
//!
//! This module provides shared utilities for testing the plotting operations
//! without a live imagery service.

pub mod assertions;
pub mod image_utils;
pub mod stub_service;
