//! Locating the artifact an external program produced.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;

static PATH_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["']([^"'\r\n]+\.[A-Za-z0-9]+)["']|([^\s"'=,;()\[\]]+\.[A-Za-z0-9]+)"#)
        .expect("Valid path token regex")
});

/// Output discovery policy: stdout first, newest matching file second.
///
/// # Examples
///
/// ```
/// use montage_process::OutputDiscovery;
///
/// let videos = OutputDiscovery::new(["mp4", "webm"]);
/// assert!(videos.matches_extension(std::path::Path::new("/tmp/shot.MP4")));
/// assert!(!videos.matches_extension(std::path::Path::new("/tmp/shot.json")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDiscovery {
    extensions: Vec<String>,
}

impl OutputDiscovery {
    /// Policy accepting files with any of `extensions` (without dots).
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        }
    }

    /// Common video containers.
    pub fn videos() -> Self {
        Self::new(["mp4", "webm", "mov", "mkv"])
    }

    /// JSON reports.
    pub fn json_reports() -> Self {
        Self::new(["json"])
    }

    /// Whether `path` carries an accepted extension.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }

    /// Find the produced artifact for a program that wrote into `dir`.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn discover(&self, stdout: &str, dir: &Path) -> Option<PathBuf> {
        self.resolve(self.from_stdout(stdout, dir), dir)
    }

    /// Like [`OutputDiscovery::discover`], but stdout paths outside `dir` are
    /// ignored so a program that logs its inputs cannot redirect the result.
    #[tracing::instrument(skip_all, fields(dir = %dir.display()))]
    pub fn discover_within(&self, stdout: &str, dir: &Path) -> Option<PathBuf> {
        let announced = self
            .stdout_candidates(stdout, dir)
            .filter(|path| path.starts_with(dir))
            .last();
        self.resolve(announced, dir)
    }

    fn resolve(&self, announced: Option<PathBuf>, dir: &Path) -> Option<PathBuf> {
        if let Some(path) = announced {
            tracing::debug!(path = %path.display(), "Output path taken from stdout");
            return Some(path);
        }
        let fallback = self.newest_in(dir);
        match &fallback {
            Some(path) => tracing::debug!(path = %path.display(), "Output path found by directory scan"),
            None => tracing::debug!("No matching output found"),
        }
        fallback
    }

    /// Last existing file with an accepted extension mentioned on stdout.
    ///
    /// Relative paths are tried as given and then against `dir`.
    pub fn from_stdout(&self, stdout: &str, dir: &Path) -> Option<PathBuf> {
        self.stdout_candidates(stdout, dir).last()
    }

    fn stdout_candidates<'a>(
        &'a self,
        stdout: &'a str,
        dir: &'a Path,
    ) -> impl Iterator<Item = PathBuf> + 'a {
        PATH_TOKEN.captures_iter(stdout).filter_map(move |captures| {
            let token = captures.get(1).or_else(|| captures.get(2))?;
            let candidate = Path::new(token.as_str().trim());
            if !self.matches_extension(candidate) {
                return None;
            }
            if candidate.is_file() {
                Some(candidate.to_path_buf())
            } else if candidate.is_relative() && dir.join(candidate).is_file() {
                Some(dir.join(candidate))
            } else {
                None
            }
        })
    }

    /// Most recently modified file in `dir` with an accepted extension.
    ///
    /// Only the directory itself is scanned. Ties on modification time go to
    /// the lexically greatest name.
    pub fn newest_in(&self, dir: &Path) -> Option<PathBuf> {
        let entries = std::fs::read_dir(dir).ok()?;
        entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_file() && self.matches_extension(path))
            .map(|path| {
                let modified = std::fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                (modified, path)
            })
            .max()
            .map(|(_, path)| path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_matching_ignores_dots_and_case() {
        let policy = OutputDiscovery::new([".JSON"]);
        assert!(policy.matches_extension(Path::new("report.json")));
        assert!(!policy.matches_extension(Path::new("report")));
    }
}
