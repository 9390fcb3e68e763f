//! Readwise API integration.
//!
//! - [`payload`] - request types and the GoodLinks → Readwise field mapping
//! - [`client`] - the HTTP transport

pub mod client;
pub mod payload;

pub use client::{HighlightTransport, ReadwiseClient, SubmitResponse};
pub use payload::{
    map_highlight, render_preview, CreateHighlightsRequest, ReadwiseHighlight, SourceField,
    TargetField, CATEGORY, FIELD_MAP, SOURCE_TYPE,
};
