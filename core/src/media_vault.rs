//! Stateless client for the Media Vault module.
//!
//! Mirrors the Files module for descriptors, streams and batch operations,
//! and adds the module-wide settings resource plus the read-mostly
//! preprocessing provider settings collection. Update and remove follow HAL
//! links; everything else expands the templates in
//! [`crate::routes::media_vault`].

use uuid::Uuid;

use crate::client;
use crate::error::ApiError;
use crate::http::{FilePart, HttpMethod, HttpRequest, HttpResponse};
use crate::routes::media_vault as routes;
use crate::types::{
    CollectionPage, DerivedImageOptions, FindOptions, GetOptions, MediaVaultEntry,
    MediaVaultSettings, PreprocessingProviderSettings,
};
use crate::uritemplate;

/// Synchronous, stateless client for the Media Vault module.
#[derive(Debug, Clone)]
pub struct MediaVaultClient {
    base_url: String,
}

impl MediaVaultClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn absolute(&self, route: &str) -> String {
        client::join(&self.base_url, route)
    }

    // -- media descriptors --------------------------------------------------

    pub fn build_find(&self, options: &FindOptions) -> HttpRequest {
        client::get(self.absolute(&routes::FIND.expand(&options.to_params())))
    }

    pub fn parse_find(
        &self,
        response: HttpResponse,
    ) -> Result<CollectionPage<MediaVaultEntry>, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    pub fn build_get(&self, id: Uuid, options: &GetOptions) -> HttpRequest {
        let mut params = vec![("id", id.to_string())];
        params.extend(options.to_params());
        client::get(self.absolute(&routes::GET.expand(&params)))
    }

    pub fn parse_get(&self, response: HttpResponse) -> Result<MediaVaultEntry, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    /// Update a previously fetched descriptor through its HAL `put` link.
    pub fn build_update(&self, entry: &MediaVaultEntry) -> Result<HttpRequest, ApiError> {
        let href = entry.links.href("put")?;
        client::json_request(HttpMethod::Put, self.absolute(href), entry)
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<MediaVaultEntry, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    /// Remove a previously fetched descriptor through its HAL `delete` link;
    /// `derived` dimensions restrict removal to that derived variant.
    pub fn build_remove(
        &self,
        entry: &MediaVaultEntry,
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

    pub fn build_stream_create(&self, path: &str, file: FilePart) -> HttpRequest {
        let params = vec![("path", path.to_string())];
        client::multipart_request(self.absolute(&routes::STREAM_CREATE.expand(&params)), file)
    }

    pub fn parse_stream_create(&self, response: HttpResponse) -> Result<MediaVaultEntry, ApiError> {
        client::check_status(&response, 201)?;
        client::parse_json(&response)
    }

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

    pub fn parse_stream_update(&self, response: HttpResponse) -> Result<MediaVaultEntry, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    // -- batch --------------------------------------------------------------

    pub fn build_batch_update(&self, entries: &[MediaVaultEntry]) -> Result<HttpRequest, ApiError> {
        client::json_request(
            HttpMethod::Put,
            self.absolute(&routes::BATCH_UPDATE.expand(&[])),
            entries,
        )
    }

    pub fn parse_batch_update(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<MediaVaultEntry>, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

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

    // -- module settings ----------------------------------------------------

    pub fn build_settings_get(&self) -> HttpRequest {
        client::get(self.absolute(&routes::SETTINGS_GET.expand(&[])))
    }

    pub fn parse_settings_get(&self, response: HttpResponse) -> Result<MediaVaultSettings, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    pub fn build_settings_update(
        &self,
        settings: &MediaVaultSettings,
    ) -> Result<HttpRequest, ApiError> {
        client::json_request(
            HttpMethod::Put,
            self.absolute(&routes::SETTINGS_UPDATE.expand(&[])),
            settings,
        )
    }

    pub fn parse_settings_update(
        &self,
        response: HttpResponse,
    ) -> Result<MediaVaultSettings, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    // -- preprocessing provider settings -------------------------------------

    pub fn build_preprocessing_find(&self, options: &FindOptions) -> HttpRequest {
        client::get(self.absolute(&routes::PREPROCESSING_FIND.expand(&options.to_params())))
    }

    pub fn parse_preprocessing_find(
        &self,
        response: HttpResponse,
    ) -> Result<CollectionPage<PreprocessingProviderSettings>, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    pub fn build_preprocessing_get(&self, id: Uuid, options: &GetOptions) -> HttpRequest {
        let mut params = vec![("id", id.to_string())];
        params.extend(options.to_params());
        client::get(self.absolute(&routes::PREPROCESSING_GET.expand(&params)))
    }

    pub fn parse_preprocessing_get(
        &self,
        response: HttpResponse,
    ) -> Result<PreprocessingProviderSettings, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }

    /// Update provider settings through the resource's HAL `put` link.
    pub fn build_preprocessing_update(
        &self,
        settings: &PreprocessingProviderSettings,
    ) -> Result<HttpRequest, ApiError> {
        let href = settings.links.href("put")?;
        client::json_request(HttpMethod::Put, self.absolute(href), settings)
    }

    pub fn parse_preprocessing_update(
        &self,
        response: HttpResponse,
    ) -> Result<PreprocessingProviderSettings, ApiError> {
        client::check_status(&response, 200)?;
        client::parse_json(&response)
    }
}
