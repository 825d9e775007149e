//! Document types and the per-file records that make up a catalog listing

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

const KB: u64 = 1024;
const MB: u64 = KB * KB;

/// Category used when a file sits directly under the storage root
const UNCATEGORIZED: &str = "Uncategorized";

/// A recognized document file type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Epub,
    Txt,
}

impl DocumentType {
    /// Every recognized type, in catalog walk order
    pub const ALL: [DocumentType; 3] = [DocumentType::Pdf, DocumentType::Epub, DocumentType::Txt];

    /// Parse an extension (with or without a leading dot), ignoring case
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.strip_prefix('.').unwrap_or(ext);
        Self::ALL
            .into_iter()
            .find(|ty| ty.extension().eq_ignore_ascii_case(ext))
    }

    /// Detect the type of a path from its extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Lower-case extension without the dot
    pub fn extension(self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Epub => "epub",
            DocumentType::Txt => "txt",
        }
    }

    /// Accepted extensions formatted for messages, e.g. `.pdf, .epub, .txt`
    pub fn accepted_list() -> String {
        Self::ALL
            .iter()
            .map(|ty| format!(".{}", ty.extension()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.extension())
    }
}

/// A single catalogued file.
///
/// Records are views over the filesystem computed on every listing; nothing
/// about them is retained between calls.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    /// File name including extension
    pub name: String,
    /// Recognized type of the file
    pub extension: DocumentType,
    /// Path relative to the storage root, unique within a listing
    pub relative_path: PathBuf,
    pub size_bytes: u64,
    /// Human readable size, see [`format_size`]
    pub size_display: String,
    /// Birth time, when the platform reports one
    pub created_at: Option<DateTime<Local>>,
    pub modified_at: Option<DateTime<Local>>,
    /// Display grouping derived from the directory structure
    pub category: String,
    /// Whether the file still existed when it was inspected.
    ///
    /// Best effort only: the file may disappear right after the check.
    pub accessible: bool,
}

impl DocumentRecord {
    /// Stat `path` (which must live under `root`) and build its record
    pub fn inspect(root: &Path, path: &Path, extension: DocumentType) -> io::Result<Self> {
        let metadata = fs::metadata(path)?;

        let relative_path = path.strip_prefix(root).unwrap_or(path).to_path_buf();
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();

        let created_at = metadata.created().ok().map(DateTime::<Local>::from);
        let modified_at = metadata.modified().ok().map(DateTime::<Local>::from);
        let size_bytes = metadata.len();

        Ok(Self {
            name,
            extension,
            category: derive_category(&relative_path),
            relative_path,
            size_bytes,
            size_display: format_size(size_bytes),
            created_at,
            modified_at,
            accessible: path.exists(),
        })
    }
}

/// Format a byte count as bytes, KB or MB
pub fn format_size(bytes: u64) -> String {
    if bytes < KB {
        format!("{} bytes", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}

/// Derive the display category of a file from its root-relative path.
///
/// A parent directory named after a document type (`pdf`, `epub`, `txt`) is
/// skipped in favour of the grandparent.
pub fn derive_category(relative_path: &Path) -> String {
    let parent = relative_path.parent();
    let parent_name = parent.and_then(dir_name);

    let raw = match parent_name {
        Some(name) if DocumentType::from_extension(&name).is_some() => parent
            .and_then(Path::parent)
            .and_then(dir_name)
            .or(Some(name)),
        other => other,
    };

    raw.map(|name| capitalize(&name))
        .unwrap_or_else(|| UNCATEGORIZED.to_string())
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().map(|s| s.to_string_lossy().to_string())
}

/// Upper-case the first character and lower-case the rest
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
