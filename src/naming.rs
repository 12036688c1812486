//! Collision-free output file names.
//!
//! Names for a whole batch are allocated before any download starts, so
//! concurrent workers never race on a check-then-write of the same path.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use tracing::warn;
use uuid::Uuid;

use crate::Names;

/// Extension of every written file.
pub const EXTENSION: &str = "jpg";

/// Generates a random 32-character hexadecimal identifier.
pub fn generate_name() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Returns the path a file named `name` is written to inside `folder`.
pub fn output_path(folder: &Path, name: &str) -> PathBuf {
    folder.join(format!("{}.{}", name, EXTENSION))
}

/// Whether `name` can be used as a base name inside a folder.
///
/// Empty names, `.`/`..` and names containing a path separator would
/// resolve outside the folder or to the folder itself.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

async fn is_taken(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Generates names until one is not already present in `folder`.
pub async fn free_name(folder: &Path) -> String {
    loop {
        let name = generate_name();
        if !is_taken(&output_path(folder, &name)).await {
            return name;
        }
    }
}

/// Hands out base names for one batch of downloads into a folder.
///
/// A caller-supplied name is used when it is valid, not yet on disk and not
/// already handed out by this allocator; otherwise a generated name takes
/// its place. Generated names are unique against the folder's existing
/// files and against every name reserved or handed out by this allocator.
pub struct NameAllocator<'a> {
    folder: &'a Path,
    reserved: HashSet<String>,
    taken: HashSet<String>,
}

impl<'a> NameAllocator<'a> {
    /// Creates an allocator for `folder`.
    pub fn new(folder: &'a Path) -> Self {
        Self {
            folder,
            reserved: HashSet::new(),
            taken: HashSet::new(),
        }
    }

    /// Keeps generated names away from `name` without handing it out.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.reserved.insert(name.into());
    }

    /// Returns `requested` when it is usable, otherwise a fresh generated name.
    pub async fn allocate(&mut self, requested: Option<&str>) -> String {
        if let Some(name) = requested {
            if !is_valid_name(name) {
                warn!("Ignoring invalid file name {:?}", name);
            } else if self.taken.contains(name) || is_taken(&output_path(self.folder, name)).await {
                warn!("File name {:?} is already taken, generating one", name);
            } else {
                self.taken.insert(name.to_string());
                return name.to_string();
            }
        }

        loop {
            let name = generate_name();
            if !self.taken.contains(&name)
                && !self.reserved.contains(&name)
                && !is_taken(&output_path(self.folder, &name)).await
            {
                self.taken.insert(name.clone());
                return name;
            }
        }
    }

    /// Allocates one name per job, honoring the naming policy by position.
    pub async fn allocate_all(folder: &'a Path, names: &Names, count: usize) -> Vec<String> {
        let mut allocator = Self::new(folder);
        for index in 0..count {
            if let Some(name) = names.for_index(index) {
                allocator.reserve(name);
            }
        }
        let mut allocated = Vec::with_capacity(count);
        for index in 0..count {
            allocated.push(allocator.allocate(names.for_index(index)).await);
        }
        allocated
    }
}
