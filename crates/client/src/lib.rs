//! `posboard-client`
//!
//! **Responsibility:** the product-management screens of the POS back office.
//!
//! Line-item editors (price tiers, stock adjustments) bound to rendered grids,
//! the debounced stock lookup, submission assembly and the product listing.
//! Controllers are generic over their render target and transport so the same
//! code drives the browser frontend, the `posboard` CLI and the tests.

pub mod config;
pub mod grid;
pub mod listing;
pub mod lookup;
pub mod pages;
pub mod staging;
pub mod store;
pub mod submission;
pub mod transport;
pub mod types;

#[cfg(all(feature = "http", not(target_arch = "wasm32")))]
pub mod http;

#[cfg(target_arch = "wasm32")]
pub mod frontend;

#[cfg(test)]
mod fakes;

pub use config::{ClientConfig, Endpoints};
pub use grid::{GridBinding, GridEvent, GridOutcome, GridRow, GridSchema, GridTarget, MemoryGrid, RowKey};
pub use lookup::{Delay, LookupOutcome, LookupSettings, RemoteLookup};
pub use store::{EditorPhase, LineItemStore};
pub use submission::{Payload, SubmissionSpec, build_payload};
pub use transport::{
    CatalogTransport, LookupTransport, SubmissionTransport, TransportError, TransportResult,
};
