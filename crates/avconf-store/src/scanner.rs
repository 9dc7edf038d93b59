//! Recursive discovery of fragment files.

use std::path::Path;

use tracing::{debug, warn};
use walkdir::WalkDir;

use avconf_types::fragment::display_name;
use avconf_types::FragmentDescriptor;

/// List every file under `dir` whose extension is one of `extensions`
/// (compared case-insensitively), sorted by path relative to `dir`.
///
/// A missing directory yields an empty list. Entries that cannot be read are
/// skipped.
pub fn scan_fragments(dir: &Path, extensions: &[&str]) -> Vec<FragmentDescriptor> {
    if !dir.is_dir() {
        debug!(dir = %dir.display(), "fragment directory absent");
        return Vec::new();
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let wanted = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)));
        if !wanted {
            continue;
        }

        let size = match entry.metadata() {
            Ok(meta) => meta.len(),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping entry without metadata");
                continue;
            }
        };
        let relative = path.strip_prefix(dir).unwrap_or(path);

        found.push(FragmentDescriptor {
            path: path.to_path_buf(),
            relative_path: relative.to_string_lossy().into_owned(),
            name: display_name(path),
            size,
        });
    }

    found.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    debug!(dir = %dir.display(), count = found.len(), "scanned fragments");
    found
}
