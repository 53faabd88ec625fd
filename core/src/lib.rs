//! Client core for the Files / Media Vault REST service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, making the core fully deterministic and testable.
//!
//! # Design
//! - `FilesClient` and `MediaVaultClient` are stateless — they hold only
//!   `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - Route URIs come from static RFC6570-style templates in [`routes`];
//!   update and remove operations instead follow the HAL `put` / `delete`
//!   links embedded in previously fetched resources.
//! - Multipart upload bodies are described as data ([`FilePart`]); the host
//!   HTTP client performs the actual multipart encoding.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod error;
pub mod files;
pub mod http;
pub mod media_vault;
pub mod routes;
pub mod types;
pub mod uritemplate;

mod client;

pub use error::ApiError;
pub use files::FilesClient;
pub use http::{FilePart, HttpMethod, HttpRequest, HttpResponse, RequestBody};
pub use media_vault::MediaVaultClient;
pub use types::{
    AclPolicy, CollectionPage, DerivedImageOptions, FileEntry, FindOptions, GetOptions, HalLink,
    HalLinks, MediaVaultEntry, MediaVaultSettings, PreprocessingProviderSettings, SortDirection,
};
pub use uritemplate::UriTemplate;
