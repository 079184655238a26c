use std::path::PathBuf;
use async_trait::async_trait;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use tokio::fs;
use tokio::fs::File as TokioFile;
use tokio::io::AsyncWriteExt;
use tokio_util::codec::{BytesCodec, FramedRead};

use crate::application::ports::storage_ports::{BlobBucket, BlobReadPort, BlobWritePort};
use crate::common::errors::DomainError;

/// Filesystem implementation of the blob storage ports.
///
/// Todos los efectos quedan confinados al subárbol del root configurado;
/// cada ruta relativa se valida antes de tocar el disco, de modo que una
/// ruta manipulada nunca puede escapar del root.
pub struct BlobFsRepository {
    root_path: PathBuf,
}

impl BlobFsRepository {
    /// Creates a new filesystem-based blob repository
    pub fn new(root_path: PathBuf) -> Self {
        Self { root_path }
    }

    /// Valida una ruta relativa y la resuelve a una ruta física absoluta.
    ///
    /// Rechaza rutas absolutas, segmentos vacíos, "." y "..", y caracteres
    /// peligrosos; el resto de componentes nunca construye estas cadenas,
    /// pero la defensa se aplica igualmente a cada lectura.
    fn resolve(&self, relative_path: &str) -> Result<PathBuf, DomainError> {
        if relative_path.is_empty() || relative_path.starts_with('/') {
            return Err(DomainError::invalid_input(
                "Blob",
                format!("invalid blob path: {:?}", relative_path),
            ));
        }

        let mut path = self.root_path.clone();
        for segment in relative_path.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(DomainError::invalid_input(
                    "Blob",
                    format!("blob path escapes the storage root: {:?}", relative_path),
                ));
            }

            let dangerous = ['\\', ':', '*', '?', '"', '<', '>', '|'];
            if segment.contains(&dangerous[..]) {
                return Err(DomainError::invalid_input(
                    "Blob",
                    format!("blob path contains dangerous characters: {:?}", segment),
                ));
            }

            path.push(segment);
        }

        Ok(path)
    }

    fn map_io_error(relative_path: &str, err: std::io::Error) -> DomainError {
        if err.kind() == std::io::ErrorKind::NotFound {
            DomainError::not_found("Blob", relative_path)
        } else {
            DomainError::unavailable(
                "Blob",
                format!("blob storage failure at {}", relative_path),
            )
            .with_source(err)
        }
    }
}

#[async_trait]
impl BlobWritePort for BlobFsRepository {
    async fn put(
        &self,
        bucket: BlobBucket,
        stored_name: &str,
        content: &[u8],
    ) -> Result<String, DomainError> {
        let relative_path = format!("{}/{}", bucket.as_str(), stored_name);
        let abs_path = self.resolve(&relative_path)?;

        // El directorio del bucket se crea bajo demanda
        if let Some(parent) = abs_path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| Self::map_io_error(&relative_path, e))?;
        }

        let mut file = fs::File::create(&abs_path)
            .await
            .map_err(|e| Self::map_io_error(&relative_path, e))?;
        file.write_all(content)
            .await
            .map_err(|e| Self::map_io_error(&relative_path, e))?;
        file.flush()
            .await
            .map_err(|e| Self::map_io_error(&relative_path, e))?;

        tracing::debug!(
            "Blob escrito: {} ({} bytes)",
            relative_path,
            content.len()
        );
        Ok(relative_path)
    }

    async fn remove(&self, relative_path: &str) -> Result<(), DomainError> {
        let abs_path = self.resolve(relative_path)?;

        match fs::remove_file(&abs_path).await {
            Ok(()) => {
                tracing::debug!("Blob eliminado: {}", relative_path);
                Ok(())
            }
            // Idempotente: un blob ya ausente no es un error
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::map_io_error(relative_path, e)),
        }
    }
}

#[async_trait]
impl BlobReadPort for BlobFsRepository {
    async fn get(&self, relative_path: &str) -> Result<Vec<u8>, DomainError> {
        let abs_path = self.resolve(relative_path)?;

        fs::read(&abs_path)
            .await
            .map_err(|e| Self::map_io_error(relative_path, e))
    }

    async fn get_stream(
        &self,
        relative_path: &str,
    ) -> Result<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>, DomainError> {
        let abs_path = self.resolve(relative_path)?;

        let file = TokioFile::open(&abs_path)
            .await
            .map_err(|e| Self::map_io_error(relative_path, e))?;

        let stream = FramedRead::new(file, BytesCodec::new()).map(|chunk| chunk.map(|b| b.freeze()));
        Ok(Box::new(stream))
    }

    async fn exists(&self, relative_path: &str) -> Result<bool, DomainError> {
        let abs_path = self.resolve(relative_path)?;

        match fs::metadata(&abs_path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(Self::map_io_error(relative_path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::ErrorKind;

    fn repository() -> (tempfile::TempDir, BlobFsRepository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = BlobFsRepository::new(dir.path().to_path_buf());
        (dir, repo)
    }

    #[tokio::test]
    async fn test_put_get_round_trip() {
        let (_dir, repo) = repository();

        let path = repo
            .put(BlobBucket::Shared, "abc.txt", b"hola")
            .await
            .unwrap();
        assert_eq!(path, "shared/abc.txt");

        let content = repo.get(&path).await.unwrap();
        assert_eq!(content, b"hola");
        assert!(repo.exists(&path).await.unwrap());
    }

    #[tokio::test]
    async fn test_buckets_namespace_paths() {
        let (_dir, repo) = repository();

        let profile = repo
            .put(BlobBucket::Profiles, "a.png", b"p")
            .await
            .unwrap();
        let shared = repo.put(BlobBucket::Shared, "a.png", b"s").await.unwrap();

        assert_eq!(profile, "profiles/a.png");
        assert_eq!(shared, "shared/a.png");
        assert_eq!(repo.get(&profile).await.unwrap(), b"p");
        assert_eq!(repo.get(&shared).await.unwrap(), b"s");
    }

    #[tokio::test]
    async fn test_get_missing_blob_is_not_found() {
        let (_dir, repo) = repository();

        let err = repo.get("shared/nope.bin").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_escaping_paths_are_rejected() {
        let (_dir, repo) = repository();
        repo.put(BlobBucket::Shared, "abc.txt", b"x").await.unwrap();

        for hostile in [
            "../shared/abc.txt",
            "shared/../../etc/passwd",
            "/etc/passwd",
            "shared/./abc.txt",
            "shared//abc.txt",
            "",
        ] {
            let err = repo.get(hostile).await.unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidInput, "path: {:?}", hostile);
        }
    }

    #[tokio::test]
    async fn test_remove_is_idempotent() {
        let (_dir, repo) = repository();

        let path = repo
            .put(BlobBucket::Shared, "abc.txt", b"x")
            .await
            .unwrap();

        repo.remove(&path).await.unwrap();
        assert!(!repo.exists(&path).await.unwrap());

        // Repetir el borrado no falla
        repo.remove(&path).await.unwrap();
    }

    #[tokio::test]
    async fn test_stream_returns_full_content() {
        let (_dir, repo) = repository();

        let payload: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();
        let path = repo
            .put(BlobBucket::Shared, "big.bin", &payload)
            .await
            .unwrap();

        let stream = repo.get_stream(&path).await.unwrap();
        let chunks: Vec<_> = Box::into_pin(stream).collect::<Vec<_>>().await;

        let mut collected = Vec::new();
        for chunk in chunks {
            collected.extend_from_slice(&chunk.unwrap());
        }
        assert_eq!(collected, payload);
    }
}
