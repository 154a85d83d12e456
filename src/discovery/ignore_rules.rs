// src/discovery/ignore_rules.rs

use crate::config::DiscoveryConfig;
use crate::core_types::File;
use crate::errors::{Error, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use ignore::{Match, WalkBuilder};
use log::{debug, warn};
use std::path::{Component, Path, PathBuf};

/// Decides, once per file, whether the file is left out of the analysis.
///
/// Checks run cheapest first: hidden path segments, `.gitignore` rules, the
/// size cap, then a binary sniff of the file head.
#[derive(Debug)]
pub struct IgnoreRules {
    root: PathBuf,
    config: DiscoveryConfig,
    /// Deepest directory first, so nested rules take precedence within a
    /// directory that is not itself excluded.
    gitignores: Vec<Gitignore>,
}

impl IgnoreRules {
    /// Loads every `.gitignore` under `root` (plus `.git/info/exclude`) when
    /// gitignore handling is enabled.
    pub fn new(root: &Path, config: &DiscoveryConfig) -> Result<Self> {
        let gitignores = if config.use_gitignore {
            load_gitignores(root)?
        } else {
            debug!("Gitignore handling disabled for {}", root.display());
            Vec::new()
        };
        Ok(Self {
            root: root.to_path_buf(),
            config: config.clone(),
            gitignores,
        })
    }

    /// Returns `true` if `file` must not be delivered to the analyzers.
    pub fn is_ignored(&self, file: &File) -> bool {
        if !self.config.include_hidden && is_hidden_path(&file.filename) {
            debug!("Skipping {} as it has a hidden segment in its path", file.filename.display());
            return true;
        }
        if self.is_gitignored(&file.filename, false) {
            debug!("Skipping {} as it is matched by a .gitignore rule", file.filename.display());
            return true;
        }
        if let Some(max_size) = self.config.max_size {
            if file.size().is_some_and(|size| size > max_size) {
                debug!(
                    "Skipping {} as it is larger than {} bytes",
                    file.filename.display(),
                    max_size
                );
                return true;
            }
        }
        if !self.config.include_binary {
            match file.is_binary() {
                Ok(true) => {
                    debug!("Skipping {} as it is considered a binary file", file.filename.display());
                    return true;
                }
                Ok(false) => {}
                // Left in, so the analyzers report the read failure.
                Err(e) => debug!("Could not sniff {}: {}", file.filename.display(), e),
            }
        }
        false
    }

    /// Returns `true` if nothing under the directory at `relative` can be
    /// analyzed, so a traversal may skip it entirely.
    pub fn is_excluded_dir(&self, relative: &Path) -> bool {
        if !self.config.include_hidden && is_hidden_path(relative) {
            return true;
        }
        if self.is_gitignored(relative, true) {
            debug!("Pruning {} as it is matched by a .gitignore rule", relative.display());
            return true;
        }
        false
    }

    /// Git semantics: once a directory is excluded, nothing below it can be
    /// re-included, so ancestors are checked from the root down.
    fn is_gitignored(&self, relative: &Path, is_dir: bool) -> bool {
        let mut current = self.root.clone();
        let mut components = relative.components().peekable();
        while let Some(component) = components.next() {
            current.push(component);
            let last = components.peek().is_none();
            if self.decide(&current, !last || is_dir) {
                return true;
            }
        }
        false
    }

    /// The verdict of the deepest `.gitignore` with an opinion on `path`.
    fn decide(&self, path: &Path, is_dir: bool) -> bool {
        for gitignore in &self.gitignores {
            // A directory's own .gitignore does not apply to the directory.
            if !path.starts_with(gitignore.path()) || path == gitignore.path() {
                continue;
            }
            match gitignore.matched(path, is_dir) {
                Match::Ignore(_) => return true,
                Match::Whitelist(_) => return false,
                Match::None => {}
            }
        }
        false
    }
}

/// Returns `true` if any component of `path` starts with a dot.
pub fn is_hidden_path(path: &Path) -> bool {
    path.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

fn load_gitignores(root: &Path) -> Result<Vec<Gitignore>> {
    let mut matchers = Vec::new();

    let exclude = root.join(".git").join("info").join("exclude");
    if exclude.is_file() {
        let mut builder = GitignoreBuilder::new(root);
        if let Some(e) = builder.add(&exclude) {
            warn!("Partially loaded {}: {}", exclude.display(), e);
        }
        matchers.push((0, build(builder, &exclude)?));
    }

    // Directories excluded by the rules found so far are never entered,
    // so .gitignore files inside them are not loaded.
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .git_ignore(true)
        .git_exclude(true)
        .require_git(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .filter_entry(|entry| entry.file_name() != ".git")
        .build();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping entry while collecting .gitignore files: {}", e);
                continue;
            }
        };
        let is_file = entry.file_type().is_some_and(|kind| kind.is_file());
        if !is_file || entry.file_name() != ".gitignore" {
            continue;
        }
        let (gitignore, partial) = Gitignore::new(entry.path());
        if let Some(e) = partial {
            warn!("Partially loaded {}: {}", entry.path().display(), e);
        }
        debug!("Loaded {} ignore rules from {}", gitignore.num_ignores(), entry.path().display());
        matchers.push((entry.depth(), gitignore));
    }

    // Stable sort keeps .git/info/exclude behind the root .gitignore.
    matchers.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(matchers.into_iter().map(|(_, gitignore)| gitignore).collect())
}

fn build(builder: GitignoreBuilder, path: &Path) -> Result<Gitignore> {
    builder.build().map_err(|source| Error::Ignore {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::DirTree;
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn rules(root: &Path, config: DiscoveryConfig) -> Result<IgnoreRules> {
        IgnoreRules::new(root, &config)
    }

    fn file(root: &Path, relative: &str) -> File {
        File::new(relative, Arc::new(DirTree::new(root)))
    }

    #[test]
    fn test_hidden_path_detection() {
        assert!(is_hidden_path(Path::new(".env")));
        assert!(is_hidden_path(Path::new("src/.cache/x.go")));
        assert!(!is_hidden_path(Path::new("src/main.go")));
        assert!(!is_hidden_path(Path::new("./src/main.go")));
    }

    #[test]
    fn test_nested_gitignore_and_whitelist() -> anyhow::Result<()> {
        let temp = tempdir()?;
        fs::create_dir_all(temp.path().join("sub"))?;
        fs::write(temp.path().join(".gitignore"), "*.log\nbuild/\n")?;
        fs::write(temp.path().join("sub/.gitignore"), "!keep.log\n")?;
        fs::create_dir_all(temp.path().join("build"))?;
        for name in ["a.log", "sub/keep.log", "sub/drop.log", "build/out.go", "main.go"] {
            fs::write(temp.path().join(name), "x\n")?;
        }

        let rules = rules(temp.path(), DiscoveryConfig::default())?;
        assert!(rules.is_ignored(&file(temp.path(), "a.log")));
        assert!(rules.is_ignored(&file(temp.path(), "sub/drop.log")));
        assert!(!rules.is_ignored(&file(temp.path(), "sub/keep.log")));
        assert!(rules.is_ignored(&file(temp.path(), "build/out.go")));
        assert!(!rules.is_ignored(&file(temp.path(), "main.go")));
        Ok(())
    }

    #[test]
    fn test_excluded_directory_cannot_be_reincluded() -> anyhow::Result<()> {
        let temp = tempdir()?;
        fs::create_dir_all(temp.path().join("build"))?;
        fs::write(temp.path().join(".gitignore"), "build/\n")?;
        fs::write(temp.path().join("build/.gitignore"), "!keep.txt\n")?;
        fs::write(temp.path().join("build/keep.txt"), "x\n")?;

        let rules = rules(temp.path(), DiscoveryConfig::default())?;
        assert!(rules.is_ignored(&file(temp.path(), "build/keep.txt")));
        assert!(rules.is_excluded_dir(Path::new("build")));
        Ok(())
    }

    #[test]
    fn test_gitignore_inside_excluded_directory_is_not_loaded() -> anyhow::Result<()> {
        let temp = tempdir()?;
        fs::create_dir_all(temp.path().join("vendor/lib"))?;
        fs::write(temp.path().join(".gitignore"), "vendor/\n")?;
        fs::write(temp.path().join("vendor/lib/.gitignore"), "*.go\n")?;

        let rules = rules(temp.path(), DiscoveryConfig::default())?;
        assert_eq!(rules.gitignores.len(), 1);
        Ok(())
    }

    #[test]
    fn test_hidden_directories_are_pruned() -> anyhow::Result<()> {
        let temp = tempdir()?;
        let default_rules = rules(temp.path(), DiscoveryConfig::default())?;
        assert!(default_rules.is_excluded_dir(Path::new("src/.cache")));
        assert!(!default_rules.is_excluded_dir(Path::new("src")));

        let config = DiscoveryConfig {
            include_hidden: true,
            ..DiscoveryConfig::default()
        };
        assert!(!rules(temp.path(), config)?.is_excluded_dir(Path::new("src/.cache")));
        Ok(())
    }

    #[test]
    fn test_gitignore_disabled() -> anyhow::Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join(".gitignore"), "*.log\n")?;
        fs::write(temp.path().join("a.log"), "x\n")?;

        let config = DiscoveryConfig {
            use_gitignore: false,
            ..DiscoveryConfig::default()
        };
        let rules = rules(temp.path(), config)?;
        assert!(!rules.is_ignored(&file(temp.path(), "a.log")));
        Ok(())
    }

    #[test]
    fn test_binary_and_size_filters() -> anyhow::Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join("blob.bin"), b"\x00\x01\x02binary")?;
        fs::write(temp.path().join("big.txt"), "0123456789\n")?;
        fs::write(temp.path().join("small.txt"), "ok\n")?;

        let config = DiscoveryConfig {
            max_size: Some(5),
            ..DiscoveryConfig::default()
        };
        let rules = rules(temp.path(), config)?;
        assert!(rules.is_ignored(&file(temp.path(), "blob.bin")));
        assert!(rules.is_ignored(&file(temp.path(), "big.txt")));
        assert!(!rules.is_ignored(&file(temp.path(), "small.txt")));

        let permissive = IgnoreRules::new(
            temp.path(),
            &DiscoveryConfig {
                include_binary: true,
                ..DiscoveryConfig::default()
            },
        )?;
        assert!(!permissive.is_ignored(&file(temp.path(), "blob.bin")));
        Ok(())
    }

    #[test]
    fn test_hidden_files_can_be_included() -> anyhow::Result<()> {
        let temp = tempdir()?;
        fs::write(temp.path().join(".eslintrc"), "{}\n")?;

        let default_rules = rules(temp.path(), DiscoveryConfig::default())?;
        assert!(default_rules.is_ignored(&file(temp.path(), ".eslintrc")));

        let config = DiscoveryConfig {
            include_hidden: true,
            ..DiscoveryConfig::default()
        };
        assert!(!rules(temp.path(), config)?.is_ignored(&file(temp.path(), ".eslintrc")));
        Ok(())
    }
}
