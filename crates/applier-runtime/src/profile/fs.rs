//! Filesystem-backed profile store.
//!
//! # TOML Format
//!
//! One file per profile, named `<id>.toml`:
//!
//! ```toml
//! [profile]
//! name = "Work"
//! state = "off"
//!
//! [actions]
//! freeze = ["com.example.game"]
//! ```
//!
//! `name` defaults to the file stem. `state` is optional. `[actions]` is
//! passed through untouched.

use super::{ProfileStore, ResolvedProfile, StoreError};
use applier_types::{ProfileId, ProfileState};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of profile definitions.
pub const PROFILE_EXTENSION: &str = "toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProfileFile {
    profile: ProfileMeta,
    actions: toml::Table,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProfileMeta {
    name: String,
    state: Option<ProfileState>,
}

/// Lightweight listing entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileEntry {
    /// Canonical ID (the file stem).
    pub id: ProfileId,
    /// Display name.
    pub name: String,
    /// Default state, if the definition has one.
    pub default_state: Option<ProfileState>,
    /// Source file.
    pub path: PathBuf,
}

/// Discovers and loads profiles from directories.
///
/// Directories are searched in order; the first directory holding a
/// given ID wins.
#[derive(Debug, Clone)]
pub struct FsProfileStore {
    search_dirs: Vec<PathBuf>,
}

impl FsProfileStore {
    /// Creates a store over explicit search directories.
    #[must_use]
    pub fn with_dirs(dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs: dirs }
    }

    /// Returns the search directories.
    #[must_use]
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Lists all readable profiles, sorted by ID.
    ///
    /// Unreadable directories and malformed files are skipped. A malformed
    /// file still shadows the same ID in later directories, since
    /// resolving that ID would load it.
    pub async fn list(&self) -> Vec<ProfileEntry> {
        let mut entries = self.scan().await;
        entries.sort_by(|a, b| a.id.cmp(&b.id));
        entries
    }

    /// Readable profiles in search order: directory priority first, then
    /// ID within a directory.
    async fn scan(&self) -> Vec<ProfileEntry> {
        let mut entries = Vec::new();
        let mut seen = HashSet::new();

        for dir in &self.search_dirs {
            let mut read_dir = match tokio::fs::read_dir(dir).await {
                Ok(rd) => rd,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "Skipping profiles dir");
                    continue;
                }
            };

            let mut found = Vec::new();
            while let Ok(Some(entry)) = read_dir.next_entry().await {
                let path = entry.path();
                if path.extension().and_then(|e| e.to_str()) != Some(PROFILE_EXTENSION) {
                    continue;
                }
                let Some(id) = path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .and_then(ProfileId::parse)
                else {
                    continue;
                };
                found.push((id, path));
            }
            found.sort_by(|a, b| a.0.cmp(&b.0));

            for (id, path) in found {
                if !seen.insert(id.clone()) {
                    continue;
                }
                match Self::load_from_path(&id, &path).await {
                    Ok(profile) => entries.push(ProfileEntry {
                        id,
                        name: profile.name,
                        default_state: profile.default_state,
                        path,
                    }),
                    Err(e) => {
                        debug!(path = %path.display(), error = %e, "Skipping malformed profile");
                    }
                }
            }
        }

        entries
    }

    /// Returns the first existing definition file for `id`.
    async fn find_path(&self, id: &ProfileId) -> Option<PathBuf> {
        if !is_plain_stem(id.as_str()) {
            return None;
        }
        let filename = format!("{id}.{PROFILE_EXTENSION}");
        for dir in &self.search_dirs {
            let path = dir.join(&filename);
            if tokio::fs::try_exists(&path).await.unwrap_or(false) {
                return Some(path);
            }
        }
        None
    }

    async fn load_from_path(id: &ProfileId, path: &Path) -> Result<ResolvedProfile, StoreError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::read(path, e))?;
        let file: ProfileFile =
            toml::from_str(&content).map_err(|e| StoreError::parse(path, e.to_string()))?;

        let name = if file.profile.name.trim().is_empty() {
            id.to_string()
        } else {
            file.profile.name
        };

        Ok(ResolvedProfile {
            id: id.clone(),
            name,
            default_state: file.profile.state,
            actions: file.actions,
        })
    }
}

#[async_trait]
impl ProfileStore for FsProfileStore {
    /// Names match in search order. Within one directory the lowest ID
    /// wins.
    async fn translate_legacy_id(&self, name_or_id: &ProfileId) -> ProfileId {
        if self.find_path(name_or_id).await.is_some() {
            return name_or_id.clone();
        }

        match self
            .scan()
            .await
            .into_iter()
            .find(|entry| entry.name == name_or_id.as_str())
        {
            Some(entry) => {
                debug!(legacy = %name_or_id, id = %entry.id, "Translated legacy profile name");
                entry.id
            }
            None => name_or_id.clone(),
        }
    }

    async fn resolve_profile(&self, id: &ProfileId) -> Result<ResolvedProfile, StoreError> {
        let path = self
            .find_path(id)
            .await
            .ok_or_else(|| StoreError::not_found(id.clone(), self.search_dirs.clone()))?;

        let profile = Self::load_from_path(id, &path).await?;
        debug!(
            id = %profile.id,
            name = %profile.name,
            path = %path.display(),
            "Loaded profile"
        );
        Ok(profile)
    }
}

/// Rejects IDs that would escape the search directory.
fn is_plain_stem(id: &str) -> bool {
    !id.contains(['/', '\\']) && id != "." && id != ".."
}

#[cfg(test)]
mod tests {
    use super::*;
    use applier_types::ErrorCode;
    use tempfile::TempDir;

    fn write_profile(dir: &Path, id: &str, content: &str) -> PathBuf {
        std::fs::create_dir_all(dir).expect("should create profiles dir");
        let path = dir.join(format!("{id}.toml"));
        std::fs::write(&path, content).expect("should write profile file");
        path
    }

    fn pid(s: &str) -> ProfileId {
        ProfileId::parse(s).expect("valid id")
    }

    #[tokio::test]
    async fn resolve_full_profile() {
        let temp = TempDir::new().expect("should create temp dir");
        write_profile(
            temp.path(),
            "1001",
            r#"
[profile]
name = "Work"
state = "off"

[actions]
freeze = ["com.example.game"]
"#,
        );

        let store = FsProfileStore::with_dirs(vec![temp.path().to_path_buf()]);
        let profile = store
            .resolve_profile(&pid("1001"))
            .await
            .expect("should resolve profile");

        assert_eq!(profile.id, pid("1001"));
        assert_eq!(profile.name, "Work");
        assert_eq!(profile.default_state, Some(ProfileState::Off));
        assert!(profile.actions.contains_key("freeze"));
    }

    #[tokio::test]
    async fn name_and_state_are_optional() {
        let temp = TempDir::new().expect("should create temp dir");
        write_profile(temp.path(), "bare", "");

        let store = FsProfileStore::with_dirs(vec![temp.path().to_path_buf()]);
        let profile = store
            .resolve_profile(&pid("bare"))
            .await
            .expect("empty file is a valid profile");

        assert_eq!(profile.name, "bare");
        assert_eq!(profile.default_state, None);
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let store = FsProfileStore::with_dirs(vec![temp.path().to_path_buf()]);

        let err = store
            .resolve_profile(&pid("ghost"))
            .await
            .expect_err("missing profile should fail");
        assert_eq!(err.code(), "STORE_NOT_FOUND");
    }

    #[tokio::test]
    async fn malformed_profile_is_parse_error() {
        let temp = TempDir::new().expect("should create temp dir");
        write_profile(temp.path(), "broken", "[profile\nname = ");

        let store = FsProfileStore::with_dirs(vec![temp.path().to_path_buf()]);
        let err = store
            .resolve_profile(&pid("broken"))
            .await
            .expect_err("malformed profile should fail");
        assert_eq!(err.code(), "STORE_PARSE_FAILED");
    }

    #[tokio::test]
    async fn invalid_state_is_parse_error() {
        let temp = TempDir::new().expect("should create temp dir");
        write_profile(temp.path(), "odd", "[profile]\nstate = \"sideways\"\n");

        let store = FsProfileStore::with_dirs(vec![temp.path().to_path_buf()]);
        let err = store
            .resolve_profile(&pid("odd"))
            .await
            .expect_err("unknown state should fail");
        assert_eq!(err.code(), "STORE_PARSE_FAILED");
    }

    #[tokio::test]
    async fn first_dir_wins() {
        let high = TempDir::new().expect("should create high dir");
        let low = TempDir::new().expect("should create low dir");
        write_profile(high.path(), "shared", "[profile]\nname = \"High\"\n");
        write_profile(low.path(), "shared", "[profile]\nname = \"Low\"\n");

        let store =
            FsProfileStore::with_dirs(vec![high.path().to_path_buf(), low.path().to_path_buf()]);
        let profile = store
            .resolve_profile(&pid("shared"))
            .await
            .expect("should resolve from high dir");
        assert_eq!(profile.name, "High");
    }

    #[tokio::test]
    async fn translate_keeps_existing_id() {
        let temp = TempDir::new().expect("should create temp dir");
        write_profile(temp.path(), "1001", "[profile]\nname = \"Work\"\n");

        let store = FsProfileStore::with_dirs(vec![temp.path().to_path_buf()]);
        assert_eq!(store.translate_legacy_id(&pid("1001")).await, pid("1001"));
    }

    #[tokio::test]
    async fn translate_maps_legacy_name() {
        let temp = TempDir::new().expect("should create temp dir");
        write_profile(temp.path(), "1001", "[profile]\nname = \"Work\"\n");
        write_profile(temp.path(), "1002", "[profile]\nname = \"Home\"\n");

        let store = FsProfileStore::with_dirs(vec![temp.path().to_path_buf()]);
        assert_eq!(store.translate_legacy_id(&pid("Home")).await, pid("1002"));
    }

    #[tokio::test]
    async fn translate_unknown_name_passes_through() {
        let temp = TempDir::new().expect("should create temp dir");
        let store = FsProfileStore::with_dirs(vec![temp.path().to_path_buf()]);
        assert_eq!(
            store.translate_legacy_id(&pid("Nowhere")).await,
            pid("Nowhere")
        );
    }

    #[tokio::test]
    async fn traversal_ids_are_never_found() {
        let temp = TempDir::new().expect("should create temp dir");
        let inner = temp.path().join("inner");
        write_profile(temp.path(), "outside", "");

        let store = FsProfileStore::with_dirs(vec![inner]);
        let err = store
            .resolve_profile(&pid("../outside"))
            .await
            .expect_err("traversal should not resolve");
        assert_eq!(err.code(), "STORE_NOT_FOUND");
    }

    #[tokio::test]
    async fn list_skips_malformed_and_sorts() {
        let temp = TempDir::new().expect("should create temp dir");
        write_profile(temp.path(), "b", "[profile]\nname = \"Beta\"\n");
        write_profile(temp.path(), "a", "[profile]\nname = \"Alpha\"\nstate = \"on\"\n");
        write_profile(temp.path(), "broken", "not = [valid");
        std::fs::write(temp.path().join("notes.txt"), "ignored").expect("should write file");

        let store = FsProfileStore::with_dirs(vec![temp.path().to_path_buf()]);
        let entries = store.list().await;

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(entries[0].default_state, Some(ProfileState::On));
    }

    #[tokio::test]
    async fn legacy_name_follows_directory_priority() {
        let high = TempDir::new().expect("should create high dir");
        let low = TempDir::new().expect("should create low dir");
        write_profile(high.path(), "z9", "[profile]\nname = \"Work\"\n");
        write_profile(low.path(), "a1", "[profile]\nname = \"Work\"\n");

        let store =
            FsProfileStore::with_dirs(vec![high.path().to_path_buf(), low.path().to_path_buf()]);
        assert_eq!(store.translate_legacy_id(&pid("Work")).await, pid("z9"));
    }

    #[tokio::test]
    async fn legacy_name_tie_in_one_dir_takes_lowest_id() {
        let temp = TempDir::new().expect("should create temp dir");
        write_profile(temp.path(), "1002", "[profile]\nname = \"Work\"\n");
        write_profile(temp.path(), "1001", "[profile]\nname = \"Work\"\n");

        let store = FsProfileStore::with_dirs(vec![temp.path().to_path_buf()]);
        assert_eq!(store.translate_legacy_id(&pid("Work")).await, pid("1001"));
    }

    #[tokio::test]
    async fn malformed_file_shadows_lower_dirs() {
        let high = TempDir::new().expect("should create high dir");
        let low = TempDir::new().expect("should create low dir");
        write_profile(high.path(), "shared", "[profile\n");
        write_profile(low.path(), "shared", "[profile]\nname = \"Low\"\n");

        let store =
            FsProfileStore::with_dirs(vec![high.path().to_path_buf(), low.path().to_path_buf()]);

        assert!(store.list().await.is_empty());
        // "Low" is only reachable through the shadowed file.
        assert_eq!(store.translate_legacy_id(&pid("Low")).await, pid("Low"));
        let err = store
            .resolve_profile(&pid("shared"))
            .await
            .expect_err("high dir file is malformed");
        assert_eq!(err.code(), "STORE_PARSE_FAILED");
    }
}
