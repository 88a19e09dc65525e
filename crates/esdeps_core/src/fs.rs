use async_trait::async_trait;
use std::{fmt, io, path::Path};

/// Read access to module sources.
///
/// Implementations must report a missing file with
/// [`io::ErrorKind::NotFound`] so the walker can tell it apart from other
/// read failures.
#[async_trait]
pub trait FileSystem: Send + Sync + fmt::Debug {
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// [`FileSystem`] over the local disk using tokio.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeFileSystem;

#[async_trait]
impl FileSystem for NativeFileSystem {
    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_native_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.js");
        std::fs::write(&file, "export default 1;").unwrap();

        let content = NativeFileSystem.read_to_string(&file).await.unwrap();
        assert_eq!(content, "export default 1;");
    }

    #[tokio::test]
    async fn test_native_missing_file_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = NativeFileSystem.read_to_string(&temp_dir.path().join("nope.js")).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
