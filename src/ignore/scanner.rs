//! File selection over a whole tree with progress reporting
//!
//! A scan runs in two walks. The first builds the [`DirectoryRuleIndex`];
//! only once it is complete does the second walk enumerate files and resolve
//! a verdict for each, since a rule file anywhere in the tree can affect files
//! visited before it.

use crate::config::{SelectorConfig, UnresolvedPolicy};
use crate::core::error::{ArchignoreError, Result};
use crate::core::path::to_slash_string;
use crate::ignore::checker::{DirectoryVerdicts, IgnoreChecker, IgnoreResult, MatchedRule};
use crate::ignore::index::{DirectoryRuleIndex, UnreadableRuleFile};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Phase of file scanning operation
#[derive(Debug, Clone, PartialEq)]
pub enum ScanPhase {
    /// Locating and compiling rule files
    Indexing,
    /// Resolving a verdict for every file
    Filtering,
    /// Scan completed successfully
    Complete,
}

/// Progress information during scanning
#[derive(Debug, Clone)]
pub struct ScanProgress {
    /// Current phase of scanning
    pub phase: ScanPhase,
    /// Files discovered so far
    pub files_discovered: usize,
    /// Files kept so far
    pub files_included: usize,
    /// Files ignored by patterns
    pub files_ignored: usize,
    /// Rule files in the index
    pub rule_files: usize,
    /// Current file being processed (if any)
    pub current_file: Option<PathBuf>,
    /// Elapsed time since scan started
    pub elapsed: Duration,
}

/// A path the walk could not resolve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnresolvedEntry {
    /// Path relative to the scanned root
    pub path: PathBuf,
    /// Underlying error
    pub reason: String,
}

/// Statistics from scanning operation
#[derive(Debug, Clone, Serialize)]
pub struct ScanStats {
    /// Total files discovered
    pub total_discovered: usize,
    /// Files that passed filtering
    pub total_included: usize,
    /// Files ignored by patterns
    pub total_ignored: usize,
    /// Entries that could not be traversed
    pub total_unresolved: usize,
    /// Rule files found
    pub rule_files: usize,
    /// Patterns across all rule files
    pub patterns: usize,
    /// Percentage of discovered files that were ignored
    pub filtering_efficiency: f64,
    /// Total scanning time
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

/// Result of file scanning operation
#[derive(Debug, Serialize)]
pub struct ScanResult {
    /// Root-relative paths to hand to the archiver, in traversal order
    pub included: Vec<PathBuf>,
    /// Files that were ignored and the rule responsible
    pub ignored: Vec<(PathBuf, MatchedRule)>,
    /// Entries that could not be traversed
    pub unresolved: Vec<UnresolvedEntry>,
    /// Rule files treated as empty because they could not be read
    pub unreadable_rule_files: Vec<UnreadableRuleFile>,
    /// Final statistics
    pub stats: ScanStats,
}

impl ScanResult {
    /// Included paths as `/`-separated strings
    pub fn manifest_lines(&self) -> Vec<String> {
        self.included.iter().map(|p| to_slash_string(p)).collect()
    }

    /// Write the included paths one per line
    pub fn write_manifest<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        for line in self.manifest_lines() {
            writeln!(writer, "{}", line)?;
        }
        writer.flush()
    }
}

/// File scanner with rule-file filtering and progress reporting
pub struct FilteredFileScanner {
    /// Selection settings
    config: SelectorConfig,
    /// Progress callback function
    progress_callback: Option<Box<dyn Fn(&ScanProgress) + Send + Sync>>,
}

/// Paths sorted into the three outcomes of a scan
#[derive(Default)]
struct Selection {
    included: Vec<PathBuf>,
    ignored: Vec<(PathBuf, MatchedRule)>,
    unresolved: Vec<UnresolvedEntry>,
}

impl FilteredFileScanner {
    /// Create a new filtered file scanner
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            config,
            progress_callback: None,
        }
    }

    /// Set progress callback for real-time updates
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&ScanProgress) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Box::new(callback));
        self
    }

    /// Build the rule index for `root` without filtering
    pub fn build_index(&self, root: &Path) -> Result<DirectoryRuleIndex> {
        check_root(root)?;
        DirectoryRuleIndex::build(root, &self.config)
    }

    /// Select the files of `root` that survive its rule files
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        let start_time = Instant::now();
        check_root(root)?;

        let mut progress = ScanProgress {
            phase: ScanPhase::Indexing,
            files_discovered: 0,
            files_included: 0,
            files_ignored: 0,
            rule_files: 0,
            current_file: None,
            elapsed: Duration::default(),
        };

        // Phase 1: the index must be complete before any verdict
        self.report_progress(&progress);
        let index = DirectoryRuleIndex::build(root, &self.config)?;
        let (rule_files, patterns) = index.stats();
        let unreadable_rule_files = index.unreadable().to_vec();
        let checker = IgnoreChecker::new(index);

        // Phase 2: filtering
        progress.phase = ScanPhase::Filtering;
        progress.rule_files = rule_files;
        progress.elapsed = start_time.elapsed();
        self.report_progress(&progress);

        let mut selection = Selection::default();
        let mut verdicts = DirectoryVerdicts::new();

        let mut walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .min_depth(1)
            .sort_by(|a, b| a.file_name().cmp(b.file_name()));

        if let Some(depth) = self.config.max_depth {
            walker = walker.max_depth(depth);
        }

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let path = e.path().unwrap_or(root).to_path_buf();
                    let relative = relative_to(root, &path)?;
                    if relative.as_os_str().is_empty() {
                        return Err(ArchignoreError::traversal_failed(path, e.to_string()));
                    }

                    let is_dir = path.is_dir();
                    if !is_dir {
                        progress.files_discovered += 1;
                    }
                    self.record_unresolved(
                        &checker,
                        &mut verdicts,
                        UnresolvedEntry {
                            path: relative,
                            reason: e.to_string(),
                        },
                        is_dir,
                        &mut selection,
                        &mut progress,
                    )?;
                    continue;
                },
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }

            // Links are only reported as links when they are not followed
            if file_type.is_symlink() {
                match fs::metadata(entry.path()) {
                    Ok(metadata) if metadata.is_file() => {},
                    Ok(_) => {
                        debug!("Skipping link to a directory {}", entry.path().display());
                        continue;
                    },
                    Err(e) => {
                        progress.files_discovered += 1;
                        self.record_unresolved(
                            &checker,
                            &mut verdicts,
                            UnresolvedEntry {
                                path: relative_to(root, entry.path())?,
                                reason: format!("broken symbolic link: {}", e),
                            },
                            false,
                            &mut selection,
                            &mut progress,
                        )?;
                        continue;
                    },
                }
            } else if !file_type.is_file() {
                debug!("Skipping non-regular file {}", entry.path().display());
                continue;
            }

            let relative = relative_to(root, entry.path())?;
            progress.files_discovered += 1;
            progress.current_file = Some(relative.clone());

            match checker.is_ignored_cached(&relative, false, &mut verdicts) {
                IgnoreResult::Ignored(rule) => {
                    debug!("Ignoring {} ({})", relative.display(), rule.pattern);
                    selection.ignored.push((relative, rule));
                    progress.files_ignored += 1;
                },
                IgnoreResult::Included | IgnoreResult::IncludedByNegation(_) => {
                    selection.included.push(relative);
                    progress.files_included += 1;
                },
            }

            // Report progress every 100 files
            if progress.files_discovered % 100 == 0 {
                progress.elapsed = start_time.elapsed();
                self.report_progress(&progress);
            }
        }

        // Phase 3: complete
        progress.phase = ScanPhase::Complete;
        progress.current_file = None;
        progress.elapsed = start_time.elapsed();
        self.report_progress(&progress);

        let Selection {
            included,
            ignored,
            unresolved,
        } = selection;

        let stats = ScanStats {
            total_discovered: progress.files_discovered,
            total_included: included.len(),
            total_ignored: ignored.len(),
            total_unresolved: unresolved.len(),
            rule_files,
            patterns,
            filtering_efficiency: if progress.files_discovered > 0 {
                (progress.files_ignored as f64 / progress.files_discovered as f64) * 100.0
            } else {
                0.0
            },
            elapsed: progress.elapsed,
        };

        info!(
            "Selected {} of {} files under {} ({} ignored, {} unresolved)",
            stats.total_included,
            stats.total_discovered,
            root.display(),
            stats.total_ignored,
            stats.total_unresolved
        );

        Ok(ScanResult {
            included,
            ignored,
            unresolved,
            unreadable_rule_files,
            stats,
        })
    }

    /// Settle an entry the walk could not resolve.
    ///
    /// Rules that already exclude the path win over the policy. Excluded
    /// directories are dropped without a record; `ignored` only holds files.
    fn record_unresolved(
        &self,
        checker: &IgnoreChecker,
        verdicts: &mut DirectoryVerdicts,
        entry: UnresolvedEntry,
        is_dir: bool,
        selection: &mut Selection,
        progress: &mut ScanProgress,
    ) -> Result<()> {
        match checker.is_ignored_cached(&entry.path, is_dir, verdicts) {
            IgnoreResult::Ignored(_) if is_dir => {
                debug!("Unreadable directory {} is ignored anyway", entry.path.display());
                Ok(())
            },
            IgnoreResult::Ignored(rule) => {
                debug!("Unresolved file {} is ignored anyway", entry.path.display());
                selection.ignored.push((entry.path, rule));
                progress.files_ignored += 1;
                Ok(())
            },
            IgnoreResult::Included | IgnoreResult::IncludedByNegation(_) => self.handle_unresolved(entry, selection),
        }
    }

    /// Apply the unresolved-entry policy
    fn handle_unresolved(&self, entry: UnresolvedEntry, selection: &mut Selection) -> Result<()> {
        match self.config.unresolved_policy {
            UnresolvedPolicy::Fail => Err(ArchignoreError::traversal_failed(entry.path, entry.reason)),
            UnresolvedPolicy::Include => {
                warn!("Including unresolved path {}: {}", entry.path.display(), entry.reason);
                selection.included.push(entry.path.clone());
                selection.unresolved.push(entry);
                Ok(())
            },
            UnresolvedPolicy::Exclude => {
                warn!("Excluding unresolved path {}: {}", entry.path.display(), entry.reason);
                selection.unresolved.push(entry);
                Ok(())
            },
        }
    }

    /// Report progress to callback
    fn report_progress(&self, progress: &ScanProgress) {
        if let Some(callback) = &self.progress_callback {
            callback(progress);
        }
    }
}

/// Select the files of `root` with the given settings, as manifest lines
pub fn select_files(root: &Path, config: &SelectorConfig) -> Result<Vec<String>> {
    let scanner = FilteredFileScanner::new(config.clone());
    Ok(scanner.scan(root)?.manifest_lines())
}

fn check_root(root: &Path) -> Result<()> {
    if !root.exists() {
        return Err(ArchignoreError::root_not_found(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(ArchignoreError::not_a_directory(root.to_path_buf()));
    }
    Ok(())
}

fn relative_to(root: &Path, path: &Path) -> Result<PathBuf> {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| ArchignoreError::internal(format!("{} is outside {}", path.display(), root.display())))
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    #[test]
    fn test_scan_directory_with_ignore() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        fs::write(root.join(".7zignore"), "*.tmp\n*.log\n")?;
        fs::write(root.join("keep.txt"), "content")?;
        fs::write(root.join("ignore.tmp"), "content")?;
        fs::write(root.join("ignore.log"), "content")?;

        let progress_calls = Arc::new(Mutex::new(Vec::new()));
        let progress_calls_clone = Arc::clone(&progress_calls);

        let scanner = FilteredFileScanner::new(SelectorConfig::default()).with_progress(move |progress| {
            progress_calls_clone
                .lock()
                .unwrap()
                .push(progress.phase.clone());
        });

        let result = scanner.scan(root)?;

        assert_eq!(result.manifest_lines(), vec![".7zignore", "keep.txt"]);
        assert_eq!(result.ignored.len(), 2);
        assert_eq!(result.stats.total_discovered, 4);
        assert_eq!(result.stats.rule_files, 1);
        assert_eq!(result.stats.filtering_efficiency, 50.0);

        let calls = progress_calls.lock().unwrap();
        assert_eq!(calls.first(), Some(&ScanPhase::Indexing));
        assert!(calls.contains(&ScanPhase::Filtering));
        assert_eq!(calls.last(), Some(&ScanPhase::Complete));

        Ok(())
    }

    #[test]
    fn test_rule_file_visited_late_still_applies() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        // "a/x.tmp" is enumerated before "zz-rules"
        fs::create_dir(root.join("a"))?;
        fs::write(root.join("a/x.tmp"), "")?;
        fs::write(root.join("a/y.txt"), "")?;
        fs::write(root.join("zz-rules"), "*.tmp\n")?;

        let config = SelectorConfig::default().with_rule_file_name("zz-rules");
        let result = FilteredFileScanner::new(config).scan(root)?;

        assert_eq!(result.manifest_lines(), vec!["a/y.txt", "zz-rules"]);
        Ok(())
    }

    #[test]
    fn test_output_order_is_sorted_depth_first() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        fs::create_dir_all(root.join("b/inner"))?;
        fs::create_dir(root.join("a"))?;
        fs::write(root.join("c.txt"), "")?;
        fs::write(root.join("a/2.txt"), "")?;
        fs::write(root.join("a/1.txt"), "")?;
        fs::write(root.join("b/inner/x.txt"), "")?;
        fs::write(root.join("b/0.txt"), "")?;

        let lines = select_files(root, &SelectorConfig::default())?;

        assert_eq!(
            lines,
            vec!["a/1.txt", "a/2.txt", "b/0.txt", "b/inner/x.txt", "c.txt"]
        );
        Ok(())
    }

    #[test]
    fn test_max_depth() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        fs::create_dir_all(root.join("a/b"))?;
        fs::write(root.join("top.txt"), "")?;
        fs::write(root.join("a/mid.txt"), "")?;
        fs::write(root.join("a/b/deep.txt"), "")?;

        let config = SelectorConfig {
            max_depth: Some(2),
            ..SelectorConfig::default()
        };
        let result = FilteredFileScanner::new(config).scan(root)?;

        assert_eq!(result.manifest_lines(), vec!["a/mid.txt", "top.txt"]);
        Ok(())
    }

    #[test]
    fn test_write_manifest() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir(root.join("d"))?;
        fs::write(root.join("d/f.txt"), "")?;
        fs::write(root.join("g.txt"), "")?;

        let result = FilteredFileScanner::new(SelectorConfig::default()).scan(root)?;
        let mut buffer = Vec::new();
        result.write_manifest(&mut buffer)?;

        assert_eq!(String::from_utf8(buffer)?, "d/f.txt\ng.txt\n");
        Ok(())
    }

    #[test]
    fn test_missing_root() {
        let scanner = FilteredFileScanner::new(SelectorConfig::default());
        let err = scanner.scan(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, ArchignoreError::RootNotFound { .. }));
    }

    #[test]
    fn test_root_is_file() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "")?;

        let err = FilteredFileScanner::new(SelectorConfig::default())
            .scan(&file)
            .unwrap_err();
        assert!(matches!(err, ArchignoreError::NotADirectory { .. }));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_policies() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir(root.join("locked"))?;
        fs::write(root.join("locked/secret.txt"), "")?;
        fs::write(root.join("open.txt"), "")?;
        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o000))?;

        if fs::read_dir(root.join("locked")).is_ok() {
            fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755))?;
            // Permission bits do not apply to this user (e.g. root); the
            // broken-link tests cover the same policies
            eprintln!("skipped unreadable directory check: mode 000 directory is still readable");
            return Ok(());
        }

        let run = |policy: UnresolvedPolicy| {
            let config = SelectorConfig {
                unresolved_policy: policy,
                ..SelectorConfig::default()
            };
            FilteredFileScanner::new(config).scan(root)
        };

        let excluded = run(UnresolvedPolicy::Exclude)?;
        assert_eq!(excluded.manifest_lines(), vec!["open.txt"]);
        assert_eq!(excluded.unresolved.len(), 1);
        assert_eq!(excluded.unresolved[0].path, PathBuf::from("locked"));

        let included = run(UnresolvedPolicy::Include)?;
        assert_eq!(included.manifest_lines(), vec!["locked", "open.txt"]);

        assert!(matches!(
            run(UnresolvedPolicy::Fail),
            Err(ArchignoreError::TraversalFailed { .. })
        ));

        // An unreadable directory that the rules exclude is neither
        // unresolved nor counted among ignored files
        fs::write(root.join(".7zignore"), "locked/\n")?;
        let ignored = run(UnresolvedPolicy::Fail)?;
        assert!(ignored.unresolved.is_empty());
        assert!(ignored.ignored.is_empty());
        assert_eq!(ignored.stats.total_ignored, 0);
        assert_eq!(ignored.stats.filtering_efficiency, 0.0);
        assert_eq!(ignored.manifest_lines(), vec![".7zignore", "open.txt"]);

        fs::set_permissions(root.join("locked"), fs::Permissions::from_mode(0o755))?;
        Ok(())
    }

    #[cfg(unix)]
    fn linked_tree() -> Result<TempDir> {
        use std::os::unix::fs::symlink;

        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::create_dir(root.join("sub"))?;
        fs::write(root.join("real.txt"), "")?;
        fs::write(root.join("sub/inner.txt"), "")?;
        symlink(root.join("real.txt"), root.join("link.txt"))?;
        symlink(root.join("sub"), root.join("linkdir"))?;
        Ok(temp_dir)
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_file_selected_without_following() -> Result<()> {
        let temp_dir = linked_tree()?;

        let result = FilteredFileScanner::new(SelectorConfig::default()).scan(temp_dir.path())?;

        // The directory link is not descended into
        assert_eq!(result.manifest_lines(), vec!["link.txt", "real.txt", "sub/inner.txt"]);
        assert!(result.unresolved.is_empty());
        assert_eq!(result.stats.total_discovered, 3);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_linked_file_matched_by_its_own_name() -> Result<()> {
        let temp_dir = linked_tree()?;
        fs::write(temp_dir.path().join(".7zignore"), "link.txt\n")?;

        let result = FilteredFileScanner::new(SelectorConfig::default()).scan(temp_dir.path())?;

        assert_eq!(result.manifest_lines(), vec![".7zignore", "real.txt", "sub/inner.txt"]);
        assert_eq!(result.ignored.len(), 1);
        assert_eq!(result.ignored[0].0, PathBuf::from("link.txt"));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_follow_links_descends_into_linked_directory() -> Result<()> {
        let temp_dir = linked_tree()?;
        fs::write(temp_dir.path().join(".7zignore"), "/sub/\n")?;

        let config = SelectorConfig {
            follow_links: true,
            ..SelectorConfig::default()
        };
        let result = FilteredFileScanner::new(config).scan(temp_dir.path())?;

        // Rules apply to the link's own path, not its target
        assert_eq!(
            result.manifest_lines(),
            vec![".7zignore", "link.txt", "linkdir/inner.txt", "real.txt"]
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_link_policies() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();
        fs::write(root.join("open.txt"), "")?;
        std::os::unix::fs::symlink(root.join("missing.txt"), root.join("dangling.txt"))?;

        for follow_links in [false, true] {
            let run = |policy: UnresolvedPolicy| {
                let config = SelectorConfig {
                    follow_links,
                    unresolved_policy: policy,
                    ..SelectorConfig::default()
                };
                FilteredFileScanner::new(config).scan(root)
            };

            let excluded = run(UnresolvedPolicy::Exclude)?;
            assert_eq!(excluded.manifest_lines(), vec!["open.txt"]);
            assert_eq!(excluded.unresolved.len(), 1);
            assert_eq!(excluded.unresolved[0].path, PathBuf::from("dangling.txt"));
            assert_eq!(excluded.stats.total_discovered, 2);

            let included = run(UnresolvedPolicy::Include)?;
            assert_eq!(included.manifest_lines(), vec!["dangling.txt", "open.txt"]);
            assert_eq!(included.unresolved.len(), 1);

            assert!(matches!(
                run(UnresolvedPolicy::Fail),
                Err(ArchignoreError::TraversalFailed { .. })
            ));
        }

        // A broken link the rules exclude is an ordinary ignored file
        fs::write(root.join(".7zignore"), "dangling.txt\n")?;
        let config = SelectorConfig {
            unresolved_policy: UnresolvedPolicy::Fail,
            ..SelectorConfig::default()
        };
        let result = FilteredFileScanner::new(config).scan(root)?;
        assert!(result.unresolved.is_empty());
        assert_eq!(result.ignored.len(), 1);
        assert_eq!(result.stats.total_ignored, 1);
        assert_eq!(result.manifest_lines(), vec![".7zignore", "open.txt"]);
        Ok(())
    }
}
