//! Flat-file client profile store.
//!
//! Profiles live as `<client_id>.json` files in a single directory. At startup every file is
//! read into a [`ProfileSnapshot`], an immutable index shared with request handlers through an
//! `Arc`. Reloading or adding a profile builds a new snapshot and swaps the pointer; snapshots
//! already handed out are never mutated.
//!
//! ## Directory layout
//!
//! ```text
//! client_profiles/
//! ├── acme.json
//! └── summit-spine.json
//! ```
//!
//! Files that fail to parse, are not JSON objects, or lack `client_id` are skipped with a
//! warning and reported in the [`LoadReport`]; they never abort loading.

use crate::constants::{PROFILE_FILE_EXTENSION, UNKNOWN_PRACTICE_NAME};
use crate::context::synthesize;
use crate::profile::ClientProfile;
use crate::validation::validate_profile;
use crate::{CoreConfig, CoreError, CoreResult};
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Minimal client listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    pub id: String,
    pub name: String,
    pub specialty: String,
    pub location: String,
}

/// Aggregate counts over the loaded profiles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileStats {
    pub total_clients: usize,
    pub specialties: BTreeMap<String, usize>,
    pub locations: BTreeMap<String, usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_specialty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_common_location: Option<String>,
}

/// A profile file that was not loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedProfile {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of reading a profile directory.
#[derive(Debug)]
pub struct LoadReport {
    pub snapshot: ProfileSnapshot,
    pub skipped: Vec<SkippedProfile>,
}

/// Immutable index of client profiles keyed by client id.
#[derive(Debug, Clone, Default)]
pub struct ProfileSnapshot {
    profiles: HashMap<String, ClientProfile>,
}

impl ProfileSnapshot {
    /// Reads every `*.json` file in `dir` into a new snapshot.
    ///
    /// A missing directory is created and yields an empty snapshot. Files are visited in
    /// path order; when two files declare the same `client_id`, the later path wins.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `CoreError::ProfileDirCreation` if the directory is missing and cannot be created,
    /// - `CoreError::ProfileDirRead` if the directory cannot be listed.
    pub fn load_dir(dir: &Path) -> CoreResult<LoadReport> {
        if !dir.exists() {
            tracing::warn!(
                "client profiles directory '{}' not found, creating it",
                dir.display()
            );
            fs::create_dir_all(dir).map_err(CoreError::ProfileDirCreation)?;
            return Ok(LoadReport {
                snapshot: Self::default(),
                skipped: Vec::new(),
            });
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .map_err(CoreError::ProfileDirRead)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path.extension().and_then(|ext| ext.to_str()) == Some(PROFILE_FILE_EXTENSION)
            })
            .collect();
        paths.sort();

        let mut profiles = HashMap::new();
        let mut skipped = Vec::new();

        for path in paths {
            match read_profile_file(&path) {
                Ok(profile) => {
                    tracing::info!("loaded client profile: {}", profile.display_name());
                    profiles.insert(profile.id.clone(), profile);
                }
                Err(e) => {
                    tracing::warn!("skipping client profile {}: {}", path.display(), e);
                    skipped.push(SkippedProfile {
                        path,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!("loaded {} client profiles", profiles.len());

        Ok(LoadReport {
            snapshot: Self { profiles },
            skipped,
        })
    }

    /// Builds a snapshot from already-parsed profiles.
    pub fn from_profiles(profiles: impl IntoIterator<Item = ClientProfile>) -> Self {
        Self {
            profiles: profiles
                .into_iter()
                .map(|profile| (profile.id.clone(), profile))
                .collect(),
        }
    }

    pub fn get(&self, client_id: &str) -> Option<&ClientProfile> {
        self.profiles.get(client_id)
    }

    pub fn contains(&self, client_id: &str) -> bool {
        self.profiles.contains_key(client_id)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ClientProfile> {
        self.profiles.values()
    }

    /// The context block for `client_id`, or an empty string for unknown ids.
    pub fn client_context(&self, client_id: &str) -> String {
        synthesize(self.get(client_id))
    }

    /// Client listing sorted by display name, then id.
    pub fn summaries(&self) -> Vec<ClientSummary> {
        let mut list: Vec<ClientSummary> = self
            .profiles
            .values()
            .map(|profile| ClientSummary {
                id: profile.id.clone(),
                name: profile
                    .name
                    .clone()
                    .unwrap_or_else(|| UNKNOWN_PRACTICE_NAME.to_string()),
                specialty: profile.specialty.clone().unwrap_or_default(),
                location: profile.location.clone().unwrap_or_default(),
            })
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        list
    }

    /// Counts profiles per specialty and location.
    ///
    /// Profiles without a value are counted under `"Unknown"`. Ties for "most common" resolve
    /// to the alphabetically first value.
    pub fn stats(&self) -> ProfileStats {
        if self.profiles.is_empty() {
            return ProfileStats::default();
        }

        let mut specialties = BTreeMap::new();
        let mut locations = BTreeMap::new();
        for profile in self.profiles.values() {
            let specialty = profile.specialty.as_deref().unwrap_or("Unknown");
            let location = profile.location.as_deref().unwrap_or("Unknown");
            *specialties.entry(specialty.to_string()).or_insert(0) += 1;
            *locations.entry(location.to_string()).or_insert(0) += 1;
        }

        ProfileStats {
            total_clients: self.profiles.len(),
            most_common_specialty: most_common(&specialties),
            most_common_location: most_common(&locations),
            specialties,
            locations,
        }
    }
}

/// Shared handle to the current profile snapshot.
///
/// Readers take a cheap `Arc` clone of the snapshot and work against it for the rest of the
/// request. Writers build a replacement snapshot and swap it in under the write lock.
#[derive(Debug)]
pub struct ProfileStore {
    dir: PathBuf,
    current: RwLock<Arc<ProfileSnapshot>>,
}

impl ProfileStore {
    /// Opens the store and loads every profile in the configured directory.
    ///
    /// # Errors
    ///
    /// Returns the directory-level errors of [`ProfileSnapshot::load_dir`]. Individual bad
    /// files are skipped, not returned.
    pub fn open(cfg: &CoreConfig) -> CoreResult<Self> {
        let report = ProfileSnapshot::load_dir(cfg.profiles_dir())?;
        Ok(Self {
            dir: cfg.profiles_dir().to_path_buf(),
            current: RwLock::new(Arc::new(report.snapshot)),
        })
    }

    /// A store over an in-memory snapshot, writing new profiles to `dir`.
    pub fn with_snapshot(dir: PathBuf, snapshot: ProfileSnapshot) -> Self {
        Self {
            dir,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The snapshot in effect right now.
    pub fn snapshot(&self) -> Arc<ProfileSnapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-reads the profile directory and publishes the result.
    ///
    /// Requests already holding the previous snapshot keep using it.
    ///
    /// # Returns
    ///
    /// The number of profiles loaded and the files that were skipped.
    ///
    /// # Errors
    ///
    /// Returns the directory-level errors of [`ProfileSnapshot::load_dir`]; the current
    /// snapshot is left in place.
    pub fn reload(&self) -> CoreResult<(usize, Vec<SkippedProfile>)> {
        let report = ProfileSnapshot::load_dir(&self.dir)?;
        let loaded = report.snapshot.len();
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(report.snapshot);
        Ok((loaded, report.skipped))
    }

    /// Validates, saves and publishes a new client profile.
    ///
    /// The profile is written to `<dir>/<client_id>.json` (pretty-printed) before the new
    /// snapshot is published, so a failed write leaves the index unchanged.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `CoreError::ProfileValidation` with every issue found by [`validate_profile`],
    /// - `CoreError::DuplicateClient` if the id is already loaded,
    /// - `CoreError::FileWrite` or `CoreError::Serialization` if saving fails.
    pub fn add(&self, value: Value) -> CoreResult<ClientProfile> {
        let issues = validate_profile(&value);
        if !issues.is_empty() {
            return Err(CoreError::ProfileValidation(issues));
        }

        let profile = ClientProfile::from_value(value)?;

        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if current.contains(&profile.id) {
            return Err(CoreError::DuplicateClient(profile.id));
        }

        fs::create_dir_all(&self.dir).map_err(CoreError::ProfileDirCreation)?;
        let path = self
            .dir
            .join(format!("{}.{}", profile.id, PROFILE_FILE_EXTENSION));
        let contents = serde_json::to_string_pretty(&profile).map_err(CoreError::Serialization)?;
        fs::write(&path, contents).map_err(CoreError::FileWrite)?;

        let mut next = ProfileSnapshot::clone(&current);
        next.profiles.insert(profile.id.clone(), profile.clone());
        *current = Arc::new(next);

        tracing::info!("added client profile: {}", profile.display_name());
        Ok(profile)
    }
}

fn read_profile_file(path: &Path) -> CoreResult<ClientProfile> {
    let contents = fs::read_to_string(path).map_err(CoreError::FileRead)?;
    ClientProfile::from_json_str(&contents)
}

fn most_common(counts: &BTreeMap<String, usize>) -> Option<String> {
    counts
        .iter()
        .fold(None, |best: Option<(&String, usize)>, (value, &count)| match best {
            Some((_, best_count)) if best_count >= count => best,
            _ => Some((value, count)),
        })
        .map(|(value, _)| value.clone())
}
