//! Local file storage for uploads

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct FilesService {
    root: PathBuf,
    max_bytes: usize,
}

impl FilesService {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: PathBuf::from(&config.upload_dir),
            max_bytes: config.max_upload_bytes,
        }
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    /// Create the upload directory if needed
    pub async fn init(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    fn path_for(&self, name: &str) -> AppResult<PathBuf> {
        Ok(self.root.join(sanitize_file_name(name)?))
    }

    /// Store a file, replacing any previous file with the same name
    pub async fn store(&self, name: &str, bytes: &[u8]) -> AppResult<String> {
        if bytes.len() > self.max_bytes {
            return Err(AppError::BadRequest(format!(
                "File {} exceeds the {} byte limit",
                name, self.max_bytes
            )));
        }
        let clean = sanitize_file_name(name)?;
        self.init().await?;

        // Write next to the target, then rename over it
        let tmp = self.root.join(format!(".{}.{}", clean, uuid::Uuid::new_v4()));
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);
        tokio::fs::rename(&tmp, self.root.join(&clean)).await?;

        tracing::info!(file = %clean, size = bytes.len(), "File stored");
        Ok(clean)
    }

    /// File contents and content type
    pub async fn read(&self, name: &str) -> AppResult<(Vec<u8>, &'static str)> {
        let path = self.path_for(name)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok((bytes, content_type_for(&path))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("File {} not found", name)))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn delete(&self, name: &str) -> AppResult<()> {
        let path = self.path_for(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(AppError::NotFound(format!("File {} not found", name)))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Reduce a client-supplied name to a bare file name
pub fn sanitize_file_name(name: &str) -> AppResult<String> {
    if name.contains("..") {
        return Err(AppError::BadRequest(format!("Invalid file name: {}", name)));
    }
    let base = name.rsplit(['/', '\\']).next().unwrap_or("").trim();
    if base.is_empty() || base.starts_with('.') {
        return Err(AppError::BadRequest(format!("Invalid file name: {}", name)));
    }
    Ok(base.to_string())
}

/// Content type by extension
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") | Some("docx") => "application/msword",
        Some("xls") | Some("xlsx") => "application/vnd.ms-excel",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &Path) -> FilesService {
        FilesService::new(&StorageConfig {
            upload_dir: dir.to_string_lossy().to_string(),
            max_upload_bytes: 16,
        })
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("ems-files-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("report.pdf").unwrap(), "report.pdf");
        assert_eq!(sanitize_file_name("C:\\docs\\agenda.docx").unwrap(), "agenda.docx");
        assert_eq!(sanitize_file_name("a/b/photo.png").unwrap(), "photo.png");
        assert!(sanitize_file_name("../etc/passwd").is_err());
        assert!(sanitize_file_name("x..y").is_err());
        assert!(sanitize_file_name("dir/").is_err());
        assert!(sanitize_file_name(".env").is_err());
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("a.PDF")), "application/pdf");
        assert_eq!(content_type_for(Path::new("a.docx")), "application/msword");
        assert_eq!(content_type_for(Path::new("a.xls")), "application/vnd.ms-excel");
        assert_eq!(content_type_for(Path::new("a.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("a.png")), "image/png");
        assert_eq!(content_type_for(Path::new("a.zip")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_store_read_overwrite_delete() {
        let dir = temp_dir();
        let files = service(&dir);

        assert_eq!(files.store("notes.pdf", b"first").await.unwrap(), "notes.pdf");
        files.store("notes.pdf", b"second").await.unwrap();
        let (bytes, ctype) = files.read("notes.pdf").await.unwrap();
        assert_eq!(bytes, b"second");
        assert_eq!(ctype, "application/pdf");

        files.delete("notes.pdf").await.unwrap();
        assert!(matches!(files.read("notes.pdf").await, Err(AppError::NotFound(_))));
        assert!(matches!(files.delete("notes.pdf").await, Err(AppError::NotFound(_))));

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }

    #[tokio::test]
    async fn test_size_limit() {
        let dir = temp_dir();
        let files = service(&dir);
        let result = files.store("big.bin", &[0u8; 17]).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
