//! File appender implementation

use crate::core::{Appender, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends rendered records to a file.
///
/// Each record is written with a single `write_all` on a file opened in
/// append mode, so lines from this process never split.
pub struct FileAppender {
    file: File,
    path: PathBuf,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::output_target(path.display().to_string(), e.to_string()))?;

        Ok(Self { file, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&mut self, rendered: &[u8]) -> Result<()> {
        self.file.write_all(rendered).map_err(|e| {
            LoggerError::io_operation("writing log file", self.path.display().to_string(), e)
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_appends_across_reopen() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("error.log");

        let mut appender = FileAppender::new(&path)?;
        appender.append(b"first\n")?;
        drop(appender);

        let mut appender = FileAppender::new(&path)?;
        appender.append(b"second\n")?;
        appender.flush()?;

        assert_eq!(fs::read_to_string(&path)?, "first\nsecond\n");
        Ok(())
    }

    #[test]
    fn test_open_error_names_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no_such_dir").join("a.log");

        let err = FileAppender::new(&path).err().expect("open should fail");
        assert!(matches!(err, LoggerError::OutputTarget { .. }));
        assert!(err.to_string().contains("no_such_dir"));
    }
}
