//! Option bags and resource DTOs for the Files / Media Vault API.
//!
//! # Design
//! The option bags (`FindOptions`, `GetOptions`, `DerivedImageOptions`)
//! normalize caller-facing names into the query parameters the service
//! understands — `page_number` becomes `page`, `page_size` becomes `rpp`,
//! `order_by`/`order_direction` collapse into `sort`, `search` becomes
//! `searchQuery`. Resource DTOs mirror the service's camelCase JSON and
//! carry a HAL `_links` map; update and remove operations navigate those
//! links instead of rebuilding routes. The types are defined independently
//! from the mock-server crate; integration tests catch schema drift.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// Sort direction for `FindOptions::order_direction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Paging, sorting and search options for `find` operations.
#[derive(Debug, Clone, Default)]
pub struct FindOptions {
    pub page_number: Option<u32>,
    pub page_size: Option<u32>,
    pub order_by: Option<String>,
    pub order_direction: Option<SortDirection>,
    pub search: Option<String>,
    pub embed: Option<String>,
    pub fields: Option<String>,
}

impl FindOptions {
    /// Map the options onto the service's query parameter names.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(search) = &self.search {
            params.push(("searchQuery", search.clone()));
        }
        if let Some(page) = self.page_number {
            params.push(("page", page.to_string()));
        }
        if let Some(rpp) = self.page_size {
            params.push(("rpp", rpp.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            let sort = match self.order_direction {
                Some(direction) => format!("{order_by}|{}", direction.as_str()),
                None => order_by.clone(),
            };
            params.push(("sort", sort));
        }
        if let Some(embed) = &self.embed {
            params.push(("embed", embed.clone()));
        }
        if let Some(fields) = &self.fields {
            params.push(("fields", fields.clone()));
        }
        params
    }
}

/// Representation options for `get` operations.
#[derive(Debug, Clone, Default)]
pub struct GetOptions {
    /// Comma separated list of resources to embed in the representation.
    pub embed: Option<String>,
    /// Comma separated list of fields to include in the representation.
    pub fields: Option<String>,
}

impl GetOptions {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(embed) = &self.embed {
            params.push(("embed", embed.clone()));
        }
        if let Some(fields) = &self.fields {
            params.push(("fields", fields.clone()));
        }
        params
    }
}

/// Dimensions selecting a derived (resized) image variant instead of the
/// original resource.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivedImageOptions {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl DerivedImageOptions {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
        }
    }

    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(width) = self.width {
            params.push(("width", width.to_string()));
        }
        if let Some(height) = self.height {
            params.push(("height", height.to_string()));
        }
        params
    }
}

/// A single HAL link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalLink {
    pub href: String,
}

/// HAL `_links` map keyed by relation (`put`, `delete`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HalLinks(pub HashMap<String, HalLink>);

impl HalLinks {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Href of the link with the given relation; absent or empty links are
    /// reported as `ApiError::MissingLink`.
    pub fn href(&self, rel: &str) -> Result<&str, ApiError> {
        self.0
            .get(rel)
            .map(|link| link.href.as_str())
            .filter(|href| !href.is_empty())
            .ok_or_else(|| ApiError::MissingLink {
                rel: rel.to_string(),
            })
    }
}

/// A file descriptor resource of the Files module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub id: Uuid,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_extension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(rename = "_links", default, skip_serializing_if = "HalLinks::is_empty")]
    pub links: HalLinks,
}

/// A media descriptor resource of the Media Vault module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaVaultEntry {
    pub id: Uuid,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_user_id: Option<Uuid>,
    #[serde(rename = "_links", default, skip_serializing_if = "HalLinks::is_empty")]
    pub links: HalLinks,
}

/// One page of a `find` result collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage<T> {
    pub page: u32,
    pub records_per_page: u32,
    pub total_records: u64,
    pub item: Vec<T>,
}

/// An ACL policy granting an access action to a user or a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclPolicy {
    pub action_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
}

/// Module-wide Media Vault settings resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaVaultSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_allowed_extensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
    #[serde(rename = "_links", default, skip_serializing_if = "HalLinks::is_empty")]
    pub links: HalLinks,
}

/// Settings of a media processing provider (resizing, face detection, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessingProviderSettings {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub settings: serde_json::Value,
    #[serde(rename = "_links", default, skip_serializing_if = "HalLinks::is_empty")]
    pub links: HalLinks,
}
