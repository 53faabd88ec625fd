//! In-memory mock of the Files / Media Vault REST service.
//!
//! Serves the same routes the client's URI templates expand to, including
//! trailing-slash forms, and embeds HAL `_links` (`put`, `delete`) in every
//! descriptor it returns so hypermedia-driven update/remove can be exercised.
//! DTOs are defined independently from the core crate; integration tests
//! catch schema drift.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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
    #[serde(rename = "_links", default)]
    pub links: HashMap<String, Link>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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
    #[serde(rename = "_links", default)]
    pub links: HashMap<String, Link>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AclPolicy {
    pub action_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_id: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaVaultSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_allowed_extensions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<u64>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessingProviderSettings {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub settings: serde_json::Value,
    #[serde(rename = "_links", default)]
    pub links: HashMap<String, Link>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionPage<T> {
    pub page: u32,
    pub records_per_page: u32,
    pub total_records: u64,
    pub item: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct FindQuery {
    #[serde(rename = "searchQuery")]
    pub search_query: Option<String>,
    pub page: Option<u32>,
    pub rpp: Option<u32>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DerivedQuery {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl DerivedQuery {
    fn is_derived(&self) -> bool {
        self.width.is_some() || self.height.is_some()
    }
}

#[derive(Default)]
pub struct VaultState {
    files: HashMap<Uuid, FileEntry>,
    file_blobs: HashMap<String, Vec<u8>>,
    file_acl: HashMap<Uuid, Vec<AclPolicy>>,
    media: HashMap<Uuid, MediaVaultEntry>,
    media_blobs: HashMap<String, Vec<u8>>,
    settings: MediaVaultSettings,
    providers: HashMap<Uuid, PreprocessingProviderSettings>,
}

pub type Db = Arc<RwLock<VaultState>>;

fn hal_links(resource: &str, id: Uuid) -> HashMap<String, Link> {
    let href = format!("{resource}/{id}");
    HashMap::from([
        ("put".to_string(), Link { href: href.clone() }),
        ("delete".to_string(), Link { href }),
    ])
}

fn file_extension(file_name: &str) -> Option<String> {
    file_name.rsplit_once('.').map(|(_, ext)| ext.to_string())
}

pub fn app() -> Router {
    let mut state = VaultState::default();
    state.settings = MediaVaultSettings {
        upload_allowed_extensions: Some("*".to_string()),
        max_file_size: Some(100 * 1024 * 1024),
    };
    let provider_id = Uuid::new_v4();
    state.providers.insert(
        provider_id,
        PreprocessingProviderSettings {
            id: provider_id,
            name: "imageResizer".to_string(),
            settings: serde_json::json!({"autoOrient": true, "faceDetection": false}),
            links: hal_links("media-vault-preprocessing-settings", provider_id),
        },
    );
    let db: Db = Arc::new(RwLock::new(state));

    Router::new()
        .route("/files/", get(find_files))
        .route("/files/{id}/", get(get_file))
        .route("/files/{id}", put(update_file).delete(delete_file))
        .route("/files/batch", put(batch_update_files))
        .route("/files/batch/", axum::routing::delete(batch_remove_files))
        .route("/files/batch/link", axum::routing::post(batch_link_files))
        .route("/files/{id}/acl/", get(get_file_acl).put(update_file_acl))
        .route(
            "/files/{id}/acl/actions/{action}/users/{user}/",
            axum::routing::delete(remove_file_acl_by_user),
        )
        .route(
            "/files/{id}/acl/actions/{action}/roles/{role}/",
            axum::routing::delete(remove_file_acl_by_role),
        )
        .route(
            "/file-streams/{*path}",
            get(download_file_stream).post(upload_file_stream),
        )
        .route("/media-vaults/", get(find_media))
        .route("/media-vaults/{id}/", get(get_media))
        .route("/media-vaults/{id}", put(update_media).delete(delete_media))
        .route("/media-vaults/batch", put(batch_update_media))
        .route(
            "/media-vaults/batch/",
            axum::routing::delete(batch_remove_media),
        )
        .route(
            "/media-vault-streams/{*path}",
            get(download_media_stream).post(upload_media_stream),
        )
        .route(
            "/media-vault-settings",
            get(get_settings).put(update_settings),
        )
        .route("/media-vault-preprocessing-settings/", get(find_providers))
        .route(
            "/media-vault-preprocessing-settings/{id}/",
            get(get_provider),
        )
        .route(
            "/media-vault-preprocessing-settings/{id}",
            put(update_provider),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn paginate<T>(
    mut items: Vec<T>,
    query: &FindQuery,
    name: impl Fn(&T) -> String,
) -> CollectionPage<T> {
    if let Some(search) = &query.search_query {
        items.retain(|item| name(item).contains(search.as_str()));
    }
    if let Some(sort) = &query.sort {
        if sort.starts_with("fileName") || sort.starts_with("name") {
            items.sort_by_key(|item| name(item));
            if sort.ends_with("|desc") {
                items.reverse();
            }
        }
    }
    let page = query.page.unwrap_or(1).max(1);
    let rpp = query.rpp.unwrap_or(10).max(1);
    let total_records = items.len() as u64;
    let skip = ((page - 1) as usize) * rpp as usize;
    let item: Vec<T> = items.into_iter().skip(skip).take(rpp as usize).collect();
    CollectionPage {
        page,
        records_per_page: rpp,
        total_records,
        item,
    }
}

async fn read_file_part(multipart: &mut Multipart) -> Option<(String, Vec<u8>)> {
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let file_name = field.file_name().unwrap_or("upload").to_string();
            let bytes = field.bytes().await.ok()?;
            return Some((file_name, bytes.to_vec()));
        }
    }
    None
}

// -- Files ------------------------------------------------------------------

async fn find_files(
    State(db): State<Db>,
    Query(query): Query<FindQuery>,
) -> Json<CollectionPage<FileEntry>> {
    let state = db.read().await;
    let entries: Vec<FileEntry> = state.files.values().cloned().collect();
    Json(paginate(entries, &query, |entry| entry.file_name.clone()))
}

async fn get_file(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<FileEntry>, StatusCode> {
    let state = db.read().await;
    state
        .files
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_file(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<FileEntry>,
) -> Result<Json<FileEntry>, StatusCode> {
    let mut state = db.write().await;
    let entry = state.files.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.file_name = input.file_name;
    entry.description = input.description;
    Ok(Json(entry.clone()))
}

async fn delete_file(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(derived): Query<DerivedQuery>,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    if !state.files.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    // Derived removal drops only the resized variant; the original stays.
    if !derived.is_derived() {
        let removed = state.files.remove(&id);
        if let Some(path) = removed.and_then(|entry| entry.path) {
            state.file_blobs.remove(&path);
        }
        state.file_acl.remove(&id);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn batch_update_files(
    State(db): State<Db>,
    Json(input): Json<Vec<FileEntry>>,
) -> Json<Vec<FileEntry>> {
    let mut state = db.write().await;
    let mut updated = Vec::new();
    for incoming in input {
        if let Some(entry) = state.files.get_mut(&incoming.id) {
            entry.file_name = incoming.file_name;
            entry.description = incoming.description;
            updated.push(entry.clone());
        }
    }
    Json(updated)
}

async fn batch_remove_files(
    State(db): State<Db>,
    Query(derived): Query<DerivedQuery>,
    Json(ids): Json<Vec<Uuid>>,
) -> StatusCode {
    let mut state = db.write().await;
    if !derived.is_derived() {
        for id in ids {
            if let Some(entry) = state.files.remove(&id) {
                if let Some(path) = entry.path {
                    state.file_blobs.remove(&path);
                }
                state.file_acl.remove(&id);
            }
        }
    }
    StatusCode::NO_CONTENT
}

async fn batch_link_files(
    State(db): State<Db>,
    Json(input): Json<Vec<MediaVaultEntry>>,
) -> (StatusCode, Json<Vec<FileEntry>>) {
    let mut state = db.write().await;
    let mut linked = Vec::new();
    for media in input {
        let id = Uuid::new_v4();
        let entry = FileEntry {
            id,
            file_name: media.file_name,
            path: media.path,
            description: media.description,
            file_extension: None,
            file_size: media.file_size,
            links: hal_links("files", id),
        };
        state.files.insert(id, entry.clone());
        linked.push(entry);
    }
    (StatusCode::CREATED, Json(linked))
}

async fn get_file_acl(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<AclPolicy>>, StatusCode> {
    let state = db.read().await;
    if !state.files.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(state.file_acl.get(&id).cloned().unwrap_or_default()))
}

async fn update_file_acl(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(policies): Json<Vec<AclPolicy>>,
) -> Result<Json<Vec<AclPolicy>>, StatusCode> {
    let mut state = db.write().await;
    if !state.files.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    state.file_acl.insert(id, policies.clone());
    Ok(Json(policies))
}

async fn remove_file_acl_by_user(
    State(db): State<Db>,
    Path((id, action, user)): Path<(Uuid, String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    if !state.files.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    if let Some(policies) = state.file_acl.get_mut(&id) {
        policies.retain(|policy| {
            !(policy.action_id == action && policy.user_id.as_deref() == Some(user.as_str()))
        });
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_file_acl_by_role(
    State(db): State<Db>,
    Path((id, action, role)): Path<(Uuid, String, String)>,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    if !state.files.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    if let Some(policies) = state.file_acl.get_mut(&id) {
        policies.retain(|policy| {
            !(policy.action_id == action && policy.role_id.as_deref() == Some(role.as_str()))
        });
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn download_file_stream(
    State(db): State<Db>,
    Path(path): Path<String>,
) -> Result<Vec<u8>, StatusCode> {
    let path = path.trim_end_matches('/').to_string();
    let state = db.read().await;
    state
        .file_blobs
        .get(&path)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)
}

async fn upload_file_stream(
    State(db): State<Db>,
    Path(path): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<FileEntry>), StatusCode> {
    let path = path.trim_end_matches('/').to_string();
    let (file_name, content) = read_file_part(&mut multipart)
        .await
        .ok_or(StatusCode::BAD_REQUEST)?;

    let mut state = db.write().await;
    let existing = state
        .files
        .values()
        .find(|entry| entry.path.as_deref() == Some(path.as_str()))
        .map(|entry| entry.id);

    match existing {
        Some(id) => {
            let size = content.len() as u64;
            state.file_blobs.insert(path, content);
            let entry = state.files.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
            entry.file_size = Some(size);
            Ok((StatusCode::OK, Json(entry.clone())))
        }
        None => {
            let id = Uuid::new_v4();
            let entry = FileEntry {
                id,
                file_extension: file_extension(&file_name),
                file_name,
                path: Some(path.clone()),
                description: None,
                file_size: Some(content.len() as u64),
                links: hal_links("files", id),
            };
            state.file_blobs.insert(path, content);
            state.files.insert(id, entry.clone());
            Ok((StatusCode::CREATED, Json(entry)))
        }
    }
}

// -- Media vault ------------------------------------------------------------

async fn find_media(
    State(db): State<Db>,
    Query(query): Query<FindQuery>,
) -> Json<CollectionPage<MediaVaultEntry>> {
    let state = db.read().await;
    let entries: Vec<MediaVaultEntry> = state.media.values().cloned().collect();
    Json(paginate(entries, &query, |entry| entry.file_name.clone()))
}

async fn get_media(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<MediaVaultEntry>, StatusCode> {
    let state = db.read().await;
    state
        .media
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_media(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<MediaVaultEntry>,
) -> Result<Json<MediaVaultEntry>, StatusCode> {
    let mut state = db.write().await;
    let entry = state.media.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    entry.file_name = input.file_name;
    entry.description = input.description;
    Ok(Json(entry.clone()))
}

async fn delete_media(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Query(derived): Query<DerivedQuery>,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    if !state.media.contains_key(&id) {
        return Err(StatusCode::NOT_FOUND);
    }
    if !derived.is_derived() {
        let removed = state.media.remove(&id);
        if let Some(path) = removed.and_then(|entry| entry.path) {
            state.media_blobs.remove(&path);
        }
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn batch_update_media(
    State(db): State<Db>,
    Json(input): Json<Vec<MediaVaultEntry>>,
) -> Json<Vec<MediaVaultEntry>> {
    let mut state = db.write().await;
    let mut updated = Vec::new();
    for incoming in input {
        if let Some(entry) = state.media.get_mut(&incoming.id) {
            entry.file_name = incoming.file_name;
            entry.description = incoming.description;
            updated.push(entry.clone());
        }
    }
    Json(updated)
}

async fn batch_remove_media(
    State(db): State<Db>,
    Query(derived): Query<DerivedQuery>,
    Json(ids): Json<Vec<Uuid>>,
) -> StatusCode {
    let mut state = db.write().await;
    if !derived.is_derived() {
        for id in ids {
            if let Some(entry) = state.media.remove(&id) {
                if let Some(path) = entry.path {
                    state.media_blobs.remove(&path);
                }
            }
        }
    }
    StatusCode::NO_CONTENT
}

async fn download_media_stream(
    State(db): State<Db>,
    Path(path): Path<String>,
) -> Result<Vec<u8>, StatusCode> {
    let path = path.trim_end_matches('/').to_string();
    let state = db.read().await;
    state
        .media_blobs
        .get(&path)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)
}

async fn upload_media_stream(
    State(db): State<Db>,
    Path(path): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MediaVaultEntry>), StatusCode> {
    let path = path.trim_end_matches('/').to_string();
    let (file_name, content) = read_file_part(&mut multipart)
        .await
        .ok_or(StatusCode::BAD_REQUEST)?;

    let mut state = db.write().await;
    let existing = state
        .media
        .values()
        .find(|entry| entry.path.as_deref() == Some(path.as_str()))
        .map(|entry| entry.id);

    match existing {
        Some(id) => {
            let size = content.len() as u64;
            state.media_blobs.insert(path, content);
            let entry = state.media.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
            entry.file_size = Some(size);
            Ok((StatusCode::OK, Json(entry.clone())))
        }
        None => {
            let id = Uuid::new_v4();
            let entry = MediaVaultEntry {
                id,
                file_name,
                path: Some(path.clone()),
                description: None,
                file_size: Some(content.len() as u64),
                owner_user_id: None,
                links: hal_links("media-vaults", id),
            };
            state.media_blobs.insert(path, content);
            state.media.insert(id, entry.clone());
            Ok((StatusCode::CREATED, Json(entry)))
        }
    }
}

// -- Settings ---------------------------------------------------------------

async fn get_settings(State(db): State<Db>) -> Json<MediaVaultSettings> {
    Json(db.read().await.settings.clone())
}

async fn update_settings(
    State(db): State<Db>,
    Json(input): Json<MediaVaultSettings>,
) -> Json<MediaVaultSettings> {
    let mut state = db.write().await;
    state.settings = input;
    Json(state.settings.clone())
}

async fn find_providers(
    State(db): State<Db>,
    Query(query): Query<FindQuery>,
) -> Json<CollectionPage<PreprocessingProviderSettings>> {
    let state = db.read().await;
    let providers: Vec<PreprocessingProviderSettings> = state.providers.values().cloned().collect();
    Json(paginate(providers, &query, |provider| provider.name.clone()))
}

async fn get_provider(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<PreprocessingProviderSettings>, StatusCode> {
    let state = db.read().await;
    state
        .providers
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn update_provider(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<PreprocessingProviderSettings>,
) -> Result<Json<PreprocessingProviderSettings>, StatusCode> {
    let mut state = db.write().await;
    let provider = state.providers.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    provider.name = input.name;
    provider.settings = input.settings;
    Ok(Json(provider.clone()))
}
