//! Stateless client for the Files module.
//!
//! # Design
//! `FilesClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller executes the actual HTTP round-trip, keeping the core deterministic
//! and free of I/O dependencies.
//!
//! Find, get, stream, batch and ACL operations expand the templates in
//! [`crate::routes::files`]; update and remove follow the HAL `put` /
//! `delete` links of a previously fetched [`FileEntry`].

use uuid::Uuid;

use crate::client;
use crate::error::ApiError;
use crate::http::{FilePart, HttpMethod, HttpRequest, HttpResponse};
use crate::routes::files as routes;
use crate::types::{
    AclPolicy, CollectionPage, DerivedImageOptions, FileEntry, FindOptions, GetOptions,
    MediaVaultEntry,
};
use crate::uritemplate;

/// Synchronous, stateless client for the Files module.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. The caller is responsible for executing the HTTP
/// round-trip between `build_*` and `parse_*`.
#[derive(Debug, Clone)]
pub struct FilesClient {
    base_url: String,
}

impl FilesClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn absolute(&self, route: &str) -> String {
        client::join(&self.base_url, route)
    }

    // -- file descriptors ---------------------------------------------------

    pub fn build_find(&self, options: &FindOptions) -> HttpRequest {
        client::get(self.absolute(&routes::FIND.expand(&options.to_params())))
    }

    pub fn parse_find(&self, response: HttpResponse) -> Result<CollectionPage<FileEntry>, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    pub fn build_get(&self, id: Uuid, options: &GetOptions) -> HttpRequest {
        let mut params = vec![("id", id.to_string())];
        params.extend(options.to_params());
        client::get(self.absolute(&routes::GET.expand(&params)))
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<FileEntry, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    /// Update a previously fetched descriptor through its HAL `put` link.
    pub fn build_update(&self, entry: &FileEntry) -> Result<HttpRequest, ApiError> {
        let href = entry.links.href("put")?;
        client::json_request(HttpMethod::Put, self.absolute(href), entry)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<FileEntry, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    /// Remove a previously fetched descriptor through its HAL `delete` link.
    ///
    /// With `derived` dimensions only that derived variant is removed;
    /// without them the original and all of its derived variants go.
    pub fn build_remove(
        &self,
        entry: &FileEntry,
        derived: Option<DerivedImageOptions>,
    ) -> Result<HttpRequest, ApiError> {
        let href = entry.links.href("delete")?;
        let params = derived.map(|d| d.to_params()).unwrap_or_default();
        let route = uritemplate::expand(&format!("{href}{{?height,width}}"), &params);
        Ok(client::delete(self.absolute(&route)))
    }

    pub fn parse_remove(&self, response: HttpResponse) -> Result<(), ApiError> {
        client::check_status(&response, 204)
    }

    // -- binary streams -----------------------------------------------------

    /// Download a file stream; `derived` dimensions select a resized variant.
    pub fn build_stream_get(
        &self,
        id: &str,
        derived: Option<DerivedImageOptions>,
    ) -> HttpRequest {
        let mut params = vec![("id", id.to_string())];
        params.extend(derived.map(|d| d.to_params()).unwrap_or_default());
        client::get(self.absolute(&routes::STREAM_GET.expand(&params)))
    }

    pub fn parse_stream_get(&self, response: HttpResponse) -> Result<Vec<u8>, ApiError> {
        client::check_status(&response, 200)?;
        Ok(response.body)
    }

    /// Upload a new file stream to `path`.
    pub fn build_stream_create(&self, path: &str, file: FilePart) -> HttpRequest {
        let params = vec![("path", path.to_string())];
        client::multipart_request(self.absolute(&routes::STREAM_CREATE.expand(&params)), file)
    }

    pub fn parse_stream_create(&self, response: HttpResponse) -> Result<FileEntry, ApiError> {
        client::check_status(&response, 201)?;
        client::parse_json(&response)
    }

    /// Replace an existing stream, or create/replace one derived variant when
    /// `derived` dimensions are given.
    pub fn build_stream_update(
        &self,
        id: &str,
        derived: Option<DerivedImageOptions>,
        file: FilePart,
    ) -> HttpRequest {
        let mut params = vec![("id", id.to_string())];
        params.extend(derived.map(|d| d.to_params()).unwrap_or_default());
        client::multipart_request(self.absolute(&routes::STREAM_UPDATE.expand(&params)), file)
    }

    pub fn parse_stream_update(&self, response: HttpResponse) -> Result<FileEntry, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    // -- batch --------------------------------------------------------------

    pub fn build_batch_update(&self, entries: &[FileEntry]) -> Result<HttpRequest, ApiError> {
        client::json_request(
            HttpMethod::Put,
            self.absolute(&routes::BATCH_UPDATE.expand(&[])),
            entries,
        )
    }

    pub fn parse_batch_update(&self, response: HttpResponse) -> Result<Vec<FileEntry>, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    /// Remove several descriptors at once; the id list travels in the request
    /// body. `derived` dimensions restrict removal to that derived variant.
    pub fn build_batch_remove(
        &self,
        ids: &[Uuid],
        derived: Option<DerivedImageOptions>,
    ) -> Result<HttpRequest, ApiError> {
        let params = derived.map(|d| d.to_params()).unwrap_or_default();
        client::json_request(
            HttpMethod::Delete,
            self.absolute(&routes::BATCH_REMOVE.expand(&params)),
            ids,
        )
    }

    pub fn parse_batch_remove(&self, response: HttpResponse) -> Result<(), ApiError> {
        client::check_status(&response, 204)
    }

    /// Link resources from another module (e.g. Media Vault) into the Files
    /// module.
    pub fn build_batch_link(&self, entries: &[MediaVaultEntry]) -> Result<HttpRequest, ApiError> {
        client::json_request(
            HttpMethod::Post,
            self.absolute(&routes::BATCH_LINK.expand(&[])),
            entries,
        )
    }

    pub fn parse_batch_link(&self, response: HttpResponse) -> Result<Vec<FileEntry>, ApiError> {
        client::check_status(&response, 201)?;
        client::parse_json(&response)
    }

    // -- ACL ----------------------------------------------------------------

    pub fn build_acl_get(&self, id: Uuid) -> HttpRequest {
        let params = vec![("id", id.to_string())];
        client::get(self.absolute(&routes::ACL_GET.expand(&params)))
    }

    pub fn parse_acl_get(&self, response: HttpResponse) -> Result<Vec<AclPolicy>, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    pub fn build_acl_update(
        &self,
        id: Uuid,
        policies: &[AclPolicy],
    ) -> Result<HttpRequest, ApiError> {
        let params = vec![("id", id.to_string())];
        client::json_request(
            HttpMethod::Put,
            self.absolute(&routes::ACL_UPDATE.expand(&params)),
            policies,
        )
    }

    pub fn parse_acl_update(&self, response: HttpResponse) -> Result<Vec<AclPolicy>, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    /// Drop the ACL policy binding `access_action` to `user` on the entry.
    pub fn build_acl_remove_by_user(
        &self,
        id: Uuid,
        access_action: &str,
        user: &str,
    ) -> HttpRequest {
        let params = vec![
            ("id", id.to_string()),
            ("accessAction", access_action.to_string()),
            ("user", user.to_string()),
        ];
        client::delete(self.absolute(&routes::ACL_REMOVE_BY_USER.expand(&params)))
    }

    pub fn parse_acl_remove_by_user(&self, response: HttpResponse) -> Result<(), ApiError> {
        client::check_status(&response, 204)
    }

    /// Drop the ACL policy binding `access_action` to `role` on the entry.
    pub fn build_acl_remove_by_role(
        &self,
        id: Uuid,
        access_action: &str,
        role: &str,
    ) -> HttpRequest {
        let params = vec![
            ("id", id.to_string()),
            ("accessAction", access_action.to_string()),
            ("role", role.to_string()),
        ];
        client::delete(self.absolute(&routes::ACL_REMOVE_BY_ROLE.expand(&params)))
    }

    pub fn parse_acl_remove_by_role(&self, response: HttpResponse) -> Result<(), ApiError> {
        client::check_status(&response, 204)
    }
}
