//! Document catalog over a type-partitioned storage tree

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

use super::config::TypeDirectories;
use super::document::{DocumentRecord, DocumentType};
use super::error::{CatalogError, Result};

/// Lists and manipulates documents stored under a storage root.
///
/// The catalog holds no state besides its configuration: every listing is
/// computed from the filesystem at call time. A listing can therefore go stale
/// before a later rename or remove runs against one of its paths (another
/// process may have changed the tree in between). Mutating operations re-check
/// the target and report [`CatalogError::NotFound`] when it is gone.
#[derive(Debug, Clone)]
pub struct CatalogManager {
    root: PathBuf,
    type_directories: TypeDirectories,
}

impl CatalogManager {
    pub fn new(root: impl Into<PathBuf>, type_directories: TypeDirectories) -> Self {
        Self {
            root: root.into(),
            type_directories,
        }
    }

    /// Storage root all relative paths are resolved against
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Catalog every recognized document under the canonical subdirectories,
    /// sorted by category then name.
    ///
    /// A missing storage root yields an empty catalog.
    pub fn list_documents(&self) -> Vec<DocumentRecord> {
        if !self.root.is_dir() {
            tracing::debug!("Storage root {} does not exist", self.root.display());
            return Vec::new();
        }

        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut records = Vec::new();

        for (doc_type, subdir) in self.type_directories.iter() {
            let dir = self.root.join(subdir);
            if !dir.is_dir() {
                tracing::debug!("No {} directory at {}", doc_type, dir.display());
                continue;
            }

            for entry in WalkDir::new(&dir) {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        tracing::warn!("Skipping unreadable entry under {}: {}", dir.display(), e);
                        continue;
                    }
                };

                let path = entry.path();
                if !path.is_file() {
                    continue;
                }
                let Some(file_type) = DocumentType::from_path(path) else {
                    continue;
                };

                let relative = path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();
                if !seen.insert(relative) {
                    continue;
                }

                match DocumentRecord::inspect(&self.root, path, file_type) {
                    Ok(record) => records.push(record),
                    Err(e) => tracing::warn!("Failed to stat {}: {}", path.display(), e),
                }
            }
        }

        sort_records(&mut records);
        tracing::debug!("Catalogued {} documents", records.len());
        records
    }

    /// Catalog only the documents whose relative path lies under `subdirectory`.
    ///
    /// `subdirectory` may be relative to the root (`./` allowed) or a path that
    /// resolves inside the root.
    pub fn list_documents_under(&self, subdirectory: &Path) -> Vec<DocumentRecord> {
        let Some(subdirectory) = self.relative_to_root(subdirectory) else {
            tracing::warn!(
                "{} is not inside the storage root {}",
                subdirectory.display(),
                self.root.display()
            );
            return Vec::new();
        };

        let mut records = self.list_documents();
        records.retain(|record| record.relative_path.starts_with(&subdirectory));
        records
    }

    /// Express `path` relative to the storage root, without `.` components
    fn relative_to_root(&self, path: &Path) -> Option<PathBuf> {
        let relative = match path.strip_prefix(&self.root) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) if path.is_absolute() => {
                let root = fs::canonicalize(&self.root).ok()?;
                let path = fs::canonicalize(path).ok()?;
                path.strip_prefix(&root).ok()?.to_path_buf()
            }
            Err(_) => path.to_path_buf(),
        };
        Some(
            relative
                .components()
                .filter(|c| !matches!(c, Component::CurDir))
                .collect(),
        )
    }

    /// Copy `source` into the canonical subdirectory for its type.
    ///
    /// A file with the same name already there is replaced. Returns the new
    /// document's relative path.
    pub fn add_document(&self, source: &Path) -> Result<PathBuf> {
        let doc_type = DocumentType::from_path(source).ok_or_else(|| CatalogError::UnsupportedType {
            extension: source
                .extension()
                .map(|ext| format!(".{}", ext.to_string_lossy()))
                .unwrap_or_else(|| "(none)".to_string()),
            accepted: DocumentType::accepted_list(),
        })?;

        let metadata = fs::metadata(source).map_err(|e| CatalogError::filesystem(source, e))?;
        if !metadata.is_file() {
            return Err(CatalogError::filesystem(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }
        let file_name = source
            .file_name()
            .ok_or_else(|| CatalogError::InvalidName(source.display().to_string()))?;

        let relative_dir = self.type_directories.get(doc_type);
        let destination_dir = self.root.join(relative_dir);
        fs::create_dir_all(&destination_dir)
            .map_err(|e| CatalogError::filesystem(&destination_dir, e))?;

        let relative = relative_dir.join(file_name);
        let destination = self.root.join(&relative);

        if same_file::is_same_file(source, &destination).unwrap_or(false) {
            tracing::debug!("{} is already catalogued", source.display());
            return Ok(relative);
        }
        if destination.exists() {
            tracing::debug!("Replacing existing {}", destination.display());
        }

        fs::copy(source, &destination).map_err(|e| CatalogError::filesystem(source, e))?;
        copy_modified_time(&metadata, &destination);

        tracing::info!("Added {} as {}", source.display(), relative.display());
        Ok(relative)
    }

    /// Rename a document in place, keeping its original extension.
    ///
    /// `new_stem` never changes the type: any extension it seems to carry
    /// stays part of the stem. Returns the new relative path.
    pub fn rename_document(&self, relative_path: &Path, new_stem: &str) -> Result<PathBuf> {
        let new_stem = new_stem.trim();
        if !is_valid_stem(new_stem) {
            return Err(CatalogError::InvalidName(new_stem.to_string()));
        }

        let old_path = self.root.join(relative_path);
        if !old_path.is_file() {
            return Err(CatalogError::NotFound(relative_path.to_path_buf()));
        }

        let mut file_name = OsString::from(new_stem);
        if let Some(ext) = relative_path.extension() {
            file_name.push(".");
            file_name.push(ext);
        }
        let new_relative = relative_path.with_file_name(file_name);
        let new_path = self.root.join(&new_relative);

        fs::rename(&old_path, &new_path).map_err(|e| CatalogError::from_io(relative_path, e))?;

        tracing::info!("Renamed {} to {}", relative_path.display(), new_relative.display());
        Ok(new_relative)
    }

    /// Delete a document. Returns the removed relative path.
    pub fn remove_document(&self, relative_path: &Path) -> Result<PathBuf> {
        let path = self.root.join(relative_path);
        let metadata =
            fs::symlink_metadata(&path).map_err(|e| CatalogError::from_io(relative_path, e))?;
        if metadata.is_dir() {
            return Err(CatalogError::filesystem(
                relative_path,
                io::Error::other("is a directory, not a document"),
            ));
        }

        fs::remove_file(&path).map_err(|e| CatalogError::from_io(relative_path, e))?;

        tracing::info!("Removed {}", relative_path.display());
        Ok(relative_path.to_path_buf())
    }
}

/// Order records by category, then by name
pub fn sort_records(records: &mut [DocumentRecord]) {
    records.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
}

fn is_valid_stem(stem: &str) -> bool {
    !stem.is_empty() && stem != "." && stem != ".." && !stem.contains(['/', '\\'])
}

/// Carry the source modification time over to a fresh copy
fn copy_modified_time(source: &fs::Metadata, destination: &Path) {
    let Ok(modified) = source.modified() else {
        return;
    };
    if let Err(e) = File::open(destination).and_then(|file| file.set_modified(modified)) {
        tracing::debug!("Could not keep modification time on {}: {}", destination.display(), e);
    }
}

/// Result of a catalog operation, ready for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
}

impl OperationOutcome {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }

    /// Describe an operation result, using `describe` for the success case
    pub fn from_result<T>(result: Result<T>, describe: impl FnOnce(T) -> String) -> Self {
        match result {
            Ok(value) => Self::ok(describe(value)),
            Err(e) => {
                tracing::debug!("Operation failed: {}", e);
                Self::failed(e.to_string())
            }
        }
    }
}
