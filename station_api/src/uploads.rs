use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

/// Writes uploaded files under one directory with generated names.
#[derive(Debug, Clone)]
pub struct Uploads {
    dir: PathBuf,
}

impl Uploads {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stores `bytes` and returns the path it was written to. Only the
    /// extension of the client-supplied file name is kept.
    pub async fn save(&self, file_name: Option<&str>, bytes: &[u8]) -> std::io::Result<PathBuf> {
        fs::create_dir_all(&self.dir).await?;

        let mut name = Uuid::now_v7().to_string();
        if let Some(ext) = file_name.and_then(safe_extension) {
            name.push('.');
            name.push_str(&ext);
        }

        let path = self.dir.join(name);
        fs::write(&path, bytes).await?;
        debug!(path = %path.display(), size = bytes.len(), "stored upload");

        Ok(path)
    }
}

fn safe_extension(file_name: &str) -> Option<String> {
    let ext = Path::new(file_name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_sanitized() {
        assert_eq!(safe_extension("id.PDF").as_deref(), Some("pdf"));
        assert_eq!(safe_extension("../../etc/passwd"), None);
        assert_eq!(safe_extension("scan.tar.gz").as_deref(), Some("gz"));
        assert_eq!(safe_extension("weird.p$f"), None);
    }

    #[tokio::test]
    async fn save_writes_file_inside_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = Uploads::new(tmp.path().join("proofs"));

        let path = uploads.save(Some("card.png"), b"png-bytes").await.unwrap();

        assert!(path.starts_with(uploads.dir()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));
        assert_eq!(fs::read(&path).await.unwrap(), b"png-bytes");
    }
}
