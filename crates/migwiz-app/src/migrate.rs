use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use migwiz_core::session::SessionState;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::App;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Read every entry back after counting it.
    pub verify: bool,
    /// Downgrade per-entry failures to warnings instead of aborting.
    pub keep_going: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub started_at: String,
    pub finished_at: String,
    pub entries_migrated: usize,
    pub bytes_migrated: u64,
    pub warnings: Vec<String>,
}

#[derive(Debug, Default)]
struct MigrationTally {
    entries: usize,
    bytes: u64,
    warnings: Vec<String>,
}

impl<'a> App<'a> {
    /// Simulated migration over the extracted archive: walk the staging
    /// tree, count and optionally verify every file, and report totals.
    /// `on_entry` fires once per migrated file so callers can show progress.
    pub fn run_migration(
        &self,
        session: &SessionState,
        options: &MigrationOptions,
        on_entry: &mut dyn FnMut(&Path),
    ) -> Result<MigrationReport> {
        let staging = session
            .extracted_to()
            .ok_or_else(|| anyhow!("no extracted archive to migrate; extract an archive first"))?;

        let started_at = now_utc_rfc3339()
            .map_err(|error| anyhow!("failed to format start timestamp: {error}"))?;

        let mut tally = MigrationTally::default();
        migrate_tree(staging, options, on_entry, &mut tally)
            .with_context(|| format!("migration failed under {}", staging.display()))?;

        let finished_at = now_utc_rfc3339()
            .map_err(|error| anyhow!("failed to format finish timestamp: {error}"))?;

        Ok(MigrationReport {
            started_at,
            finished_at,
            entries_migrated: tally.entries,
            bytes_migrated: tally.bytes,
            warnings: tally.warnings,
        })
    }
}

fn now_utc_rfc3339() -> Result<String, time::error::Format> {
    OffsetDateTime::now_utc().format(&Rfc3339)
}

fn migrate_tree(
    dir: &Path,
    options: &MigrationOptions,
    on_entry: &mut dyn FnMut(&Path),
    tally: &mut MigrationTally,
) -> Result<()> {
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read directory {}", dir.display()))?;

    for entry in entries {
        let entry = entry.with_context(|| format!("failed to list entry in {}", dir.display()))?;
        let path = entry.path();
        let file_type = entry
            .file_type()
            .with_context(|| format!("failed to inspect entry {}", path.display()))?;

        // `file_type` comes from the directory entry and does not follow
        // symlinks; a symlinked directory could cycle back into the tree.
        if file_type.is_dir() {
            migrate_tree(&path, options, on_entry, tally)?;
            continue;
        }
        if file_type.is_symlink() && path.is_dir() {
            tally
                .warnings
                .push(format!("{}: skipped symlinked directory", path.display()));
            continue;
        }

        match migrate_file(&path, options) {
            Ok(bytes) => {
                tally.entries += 1;
                tally.bytes += bytes;
                on_entry(&path);
            }
            Err(error) if options.keep_going => {
                tally.warnings.push(format!("{}: {error:#}", path.display()));
            }
            Err(error) => return Err(error),
        }
    }

    Ok(())
}

fn migrate_file(path: &Path, options: &MigrationOptions) -> Result<u64> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("failed to inspect entry {}", path.display()))?;

    if options.verify {
        fs::read(path).with_context(|| format!("failed to verify entry {}", path.display()))?;
    }

    Ok(metadata.len())
}
