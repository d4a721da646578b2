use std::io;
use std::path::{Path, PathBuf};

/// Commands read from an rc file, run once before the first launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitScript {
    path: PathBuf,
    commands: Vec<String>,
}

impl InitScript {
    /// Where rc files are looked up: the working directory first, then home.
    /// The same file reached both ways is listed once.
    pub fn candidates(cwd: &Path, home: Option<&Path>, file_name: &str) -> Vec<PathBuf> {
        let mut paths = vec![cwd.join(file_name)];
        if let Some(home) = home {
            let home_rc = home.join(file_name);
            if !same_file(&paths[0], &home_rc) {
                paths.push(home_rc);
            }
        }
        paths
    }

    /// Read an rc file. A missing file is `Ok(None)`.
    pub fn read(path: &Path) -> io::Result<Option<Self>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(Self::parse(path, &content))),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    pub fn parse(path: &Path, content: &str) -> Self {
        let commands = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        Self {
            path: path.to_path_buf(),
            commands,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_skips_blank_lines_and_comments() {
        let script = InitScript::parse(
            Path::new(".steplinerc"),
            "# defaults\nset linetrace on\n\n   \n  set post_mortem off  \n",
        );
        assert_eq!(
            script.commands(),
            &["set linetrace on".to_string(), "set post_mortem off".to_string()]
        );
    }

    #[test]
    fn test_read_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(InitScript::read(&dir.path().join(".steplinerc")).unwrap().is_none());
    }

    #[test]
    fn test_candidates_list_cwd_before_home() {
        let cwd = TempDir::new().unwrap();
        let home = TempDir::new().unwrap();

        let paths = InitScript::candidates(cwd.path(), Some(home.path()), ".steplinerc");
        assert_eq!(
            paths,
            vec![cwd.path().join(".steplinerc"), home.path().join(".steplinerc")]
        );
    }

    #[test]
    fn test_candidates_dedupe_when_cwd_is_home() {
        let home = TempDir::new().unwrap();
        std::fs::write(home.path().join(".steplinerc"), "").unwrap();

        let paths = InitScript::candidates(home.path(), Some(home.path()), ".steplinerc");
        assert_eq!(paths, vec![home.path().join(".steplinerc")]);
    }
}
