//! Route templates for the Files / Media Vault REST endpoints.
//!
//! Templates are expanded to service-relative URIs; various client
//! operations use them directly while update and remove obtain their routes
//! through HAL links embedded in previously fetched resources. Route names
//! match the client method names by convention.

use crate::uritemplate::UriTemplate;

/// Routes of the Files module.
pub mod files {
    use super::UriTemplate;

    pub const FIND: UriTemplate =
        UriTemplate::new("files/{?searchQuery,page,rpp,sort,embed,fields}");
    pub const GET: UriTemplate = UriTemplate::new("files/{id}/{?embed,fields}");

    pub const STREAM_GET: UriTemplate = UriTemplate::new("file-streams/{id}/{?width,height}");
    pub const STREAM_CREATE: UriTemplate = UriTemplate::new("file-streams/{path}");
    pub const STREAM_UPDATE: UriTemplate = UriTemplate::new("file-streams/{id}/{?width,height}");

    pub const BATCH_REMOVE: UriTemplate = UriTemplate::new("files/batch/{?width,height}");
    pub const BATCH_UPDATE: UriTemplate = UriTemplate::new("files/batch");
    pub const BATCH_LINK: UriTemplate = UriTemplate::new("files/batch/link");

    pub const ACL_GET: UriTemplate = UriTemplate::new("files/{id}/acl/{?fields}");
    pub const ACL_UPDATE: UriTemplate = UriTemplate::new("files/{id}/acl/{?fields}");
    pub const ACL_REMOVE_BY_USER: UriTemplate =
        UriTemplate::new("files/{id}/acl/actions/{accessAction}/users/{user}/");
    pub const ACL_REMOVE_BY_ROLE: UriTemplate =
        UriTemplate::new("files/{id}/acl/actions/{accessAction}/roles/{role}/");
}

/// Routes of the Media Vault module.
pub mod media_vault {
    use super::UriTemplate;

    pub const FIND: UriTemplate =
        UriTemplate::new("media-vaults/{?searchQuery,page,rpp,sort,embed,fields}");
    pub const GET: UriTemplate = UriTemplate::new("media-vaults/{id}/{?embed,fields}");

    pub const STREAM_GET: UriTemplate =
        UriTemplate::new("media-vault-streams/{id}/{?width,height}");
    pub const STREAM_CREATE: UriTemplate = UriTemplate::new("media-vault-streams/{path}");
    pub const STREAM_UPDATE: UriTemplate =
        UriTemplate::new("media-vault-streams/{id}/{?width,height}");

    pub const BATCH_REMOVE: UriTemplate = UriTemplate::new("media-vaults/batch/{?width,height}");
    pub const BATCH_UPDATE: UriTemplate = UriTemplate::new("media-vaults/batch");

    pub const SETTINGS_GET: UriTemplate = UriTemplate::new("media-vault-settings");
    pub const SETTINGS_UPDATE: UriTemplate = UriTemplate::new("media-vault-settings");

    pub const PREPROCESSING_FIND: UriTemplate = UriTemplate::new(
        "media-vault-preprocessing-settings/{?searchQuery,page,rpp,sort,embed,fields}",
    );
    pub const PREPROCESSING_GET: UriTemplate =
        UriTemplate::new("media-vault-preprocessing-settings/{id}/{?embed,fields}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_find_route_exposes_paging_and_search() {
        assert_eq!(
            files::FIND.as_str(),
            "files/{?searchQuery,page,rpp,sort,embed,fields}"
        );
    }

    #[test]
    fn stream_routes_differ_between_modules() {
        assert_eq!(
            files::STREAM_CREATE.expand(&[("path", "a/b.png".to_string())]),
            "file-streams/a/b.png"
        );
        assert_eq!(
            media_vault::STREAM_CREATE.expand(&[("path", "a/b.png".to_string())]),
            "media-vault-streams/a/b.png"
        );
    }

    #[test]
    fn settings_routes_are_static() {
        assert_eq!(media_vault::SETTINGS_GET.expand(&[]), "media-vault-settings");
        assert_eq!(
            media_vault::SETTINGS_UPDATE.expand(&[]),
            "media-vault-settings"
        );
    }
}
