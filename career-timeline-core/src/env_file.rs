//! `KEY=VALUE` environment file consumed by the site's build tooling.
//!
//! Values are taken literally: no variable substitution, no escape
//! processing and no lookups in the process environment, so a rewrite
//! never changes a value it did not set. Blank lines, `#` comments and an
//! optional `export ` prefix are understood on the way in; one pair of
//! matching surrounding quotes is stripped; lines without `=` or with an
//! invalid key are skipped. Rendering is plain `KEY=VALUE` lines joined by
//! `\n`, so comments and blank lines do not survive a rewrite. Key order
//! does: existing keys keep their position and new keys are appended.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, trace};

#[derive(Debug, thiserror::Error)]
pub enum EnvFileError {
    #[error("failed to read env file {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write env file {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvFile {
    entries: Vec<(String, String)>,
}

impl EnvFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse env file text. A key that appears twice keeps its first
    /// position and its last value. Unparsable lines are skipped.
    pub fn parse(content: &str) -> Self {
        let mut env = Self::new();
        for (number, line) in content.lines().enumerate() {
            match parse_line(line) {
                Some((key, value)) => {
                    env.set(key, value);
                }
                None => trace!(line = number + 1, "Skipping env file line"),
            }
        }
        env
    }

    /// Best-effort load: a missing or unreadable file yields an empty map. Failures are logged, never returned.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "No existing env file found, will create new one");
            return Self::new();
        }
        match Self::read(path) {
            Ok(env) => {
                debug!(path = %path.display(), vars = env.len(), "Loaded existing env file");
                env
            }
            Err(e) => {
                info!(
                    path = %path.display(),
                    error = %e,
                    "Could not use existing env file, will create new one"
                );
                Self::new()
            }
        }
    }

    /// Strict load: read and parse `path`, propagating read failures.
    pub fn read(path: &Path) -> Result<Self, EnvFileError> {
        let content = fs::read_to_string(path).map_err(|source| EnvFileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&content))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Insert or replace `key`, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn render(&self) -> String {
        self.iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Overwrite `path` with the rendered map.
    pub fn write(&self, path: &Path) -> Result<(), EnvFileError> {
        fs::write(path, self.render()).map_err(|source| EnvFileError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), vars = self.len(), "Wrote env file");
        Ok(())
    }
}

fn parse_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line
        .strip_prefix("export ")
        .map(str::trim_start)
        .unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if !valid_key {
        return None;
    }
    Some((key, unquote(value.trim())))
}

// Strip one pair of matching surrounding quotes, nothing else.
fn unquote(value: &str) -> &str {
    for quote in ['"', '\'', '`'] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parses_comments_quotes_and_export_prefix() {
        let env = EnvFile::parse(
            "# local overrides\nFOO=bar\n\nexport QUOTED=\"hello world\"\nEMPTY=\n",
        );
        assert_eq!(env.get("FOO"), Some("bar"));
        assert_eq!(env.get("QUOTED"), Some("hello world"));
        assert_eq!(env.get("EMPTY"), Some(""));
        assert_eq!(env.len(), 3);
    }

    #[test]
    fn duplicate_keys_keep_first_position_and_last_value() {
        let env = EnvFile::parse("A=1\nB=2\nA=3");
        assert_eq!(env.render(), "A=3\nB=2");
    }

    #[test]
    fn set_replaces_in_place_and_appends_new_keys() {
        let mut env = EnvFile::parse("A=1\nB=2");
        assert_eq!(env.set("A", "10"), Some("1".to_string()));
        assert_eq!(env.set("C", "3"), None);
        assert_eq!(env.render(), "A=10\nB=2\nC=3");
    }

    #[test]
    fn render_has_no_trailing_newline() {
        let mut env = EnvFile::new();
        env.set("VITE_PUBLIC_API_URL", "https://api.example.com");
        assert_eq!(env.render(), "VITE_PUBLIC_API_URL=https://api.example.com");
    }

    #[test]
    fn load_of_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let env = EnvFile::load(&dir.path().join(".env.local"));
        assert!(env.is_empty());
    }

    #[test]
    fn values_are_taken_literally() {
        let env = EnvFile::parse(
            "DB_PASSWORD=pa$word\nCACHE=${HOME}/cache\nWIN_PATH=C:\\new\\tools\nQ=\"a\\nb\"\nURL=https://x.example.com/?a=b=c",
        );
        assert_eq!(env.get("DB_PASSWORD"), Some("pa$word"));
        assert_eq!(env.get("CACHE"), Some("${HOME}/cache"));
        assert_eq!(env.get("WIN_PATH"), Some("C:\\new\\tools"));
        assert_eq!(env.get("Q"), Some("a\\nb"));
        assert_eq!(env.get("URL"), Some("https://x.example.com/?a=b=c"));
    }

    #[test]
    fn only_one_pair_of_matching_quotes_is_stripped() {
        let env = EnvFile::parse("A='single'\nB=\"\"nested\"\"\nC=\"unbalanced\nD='x\"");
        assert_eq!(env.get("A"), Some("single"));
        assert_eq!(env.get("B"), Some("\"nested\""));
        assert_eq!(env.get("C"), Some("\"unbalanced"));
        assert_eq!(env.get("D"), Some("'x\""));
    }

    #[test]
    fn unparsable_lines_are_skipped_and_the_rest_kept() {
        let env = EnvFile::parse("KEEP=1\nthis is not an assignment\nbad key=2\n=nokey\r\nALSO=2\r\n");
        assert_eq!(env.render(), "KEEP=1\nALSO=2");
    }

    #[test]
    fn write_then_read_keeps_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env.local");
        let mut env = EnvFile::new();
        env.set("A", "1");
        env.set("URL", "https://x.example.com/prod?stage=a=b");
        env.write(&path).unwrap();

        let read_back = EnvFile::read(&path).unwrap();
        assert_eq!(read_back, env);
    }
}
