//! Tessera - texture mosaics matched in CIE L*a*b*
//!
//! Application layer around the `lab-mosaic` core: configuration, PNG I/O,
//! pre-filters, the texture cache and the rendering pipeline.
//! This library exposes modules for integration testing.

pub mod error;
pub mod fsutil;
pub mod imaging;
pub mod models;
pub mod services;
