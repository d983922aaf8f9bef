use anyhow::{Context, Result, bail};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

/// MIME types accepted for cover images.
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/png", "image/jpg", "image/jpeg"];

const MAX_NAME_ATTEMPTS: usize = 64;

/// A cover image received with a form, not yet written to disk.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub original_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    #[must_use]
    pub fn has_allowed_type(&self) -> bool {
        ALLOWED_IMAGE_TYPES.contains(&self.content_type.to_ascii_lowercase().as_str())
    }
}

/// Writes cover images into the uploads directory.
pub struct UploadService {
    dir: PathBuf,
}

impl UploadService {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stores the image and returns the filename it was saved under.
    ///
    /// Names are claimed with `create_new`; a name that is already taken
    /// moves on to the next millisecond.
    pub async fn save(&self, image: &UploadedImage) -> Result<String> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir).await?;
        }

        let mut millis = chrono::Utc::now().timestamp_millis();
        for _ in 0..MAX_NAME_ATTEMPTS {
            let filename = stored_filename(&image.original_name, &image.content_type, millis);
            let file_path = self.dir.join(&filename);

            let mut file = match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&file_path)
                .await
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    millis += 1;
                    continue;
                }
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!("Failed to create image file {}", file_path.display())
                    });
                }
            };

            if let Err(e) = write_all(&mut file, &image.bytes).await {
                drop(file);
                self.discard(&filename).await;
                return Err(e)
                    .with_context(|| format!("Failed to write image to {}", file_path.display()));
            }

            info!(path = %file_path.display(), bytes = image.bytes.len(), "Stored cover image");
            return Ok(filename);
        }

        bail!(
            "No free filename for upload {} in {}",
            image.original_name,
            self.dir.display()
        )
    }

    /// Removes a file stored for a request that did not complete.
    pub async fn discard(&self, filename: &str) {
        let file_path = self.dir.join(filename);
        if let Err(e) = fs::remove_file(&file_path).await {
            warn!(path = %file_path.display(), error = %e, "Failed to remove orphaned upload");
        }
    }
}

async fn write_all(file: &mut fs::File, bytes: &[u8]) -> io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

/// Builds `<stem>-<millis><ext>` from the client's filename.
///
/// Directory components are dropped and the stem is reduced to a safe
/// character set. When the client name has no extension one is derived
/// from the MIME type.
#[must_use]
pub fn stored_filename(original_name: &str, content_type: &str, millis: i64) -> String {
    // clients may send either separator
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();
    let path = Path::new(base);

    let stem: String = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    let stem = if stem.is_empty() { "image".to_string() } else { stem };

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .map(str::to_string)
        .or_else(|| {
            mime_guess::get_mime_extensions_str(content_type)
                .and_then(|exts| exts.first())
                .map(|e| (*e).to_string())
        });

    match extension {
        Some(ext) => format!("{stem}-{millis}.{ext}"),
        None => format!("{stem}-{millis}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(content_type: &str) -> UploadedImage {
        UploadedImage {
            original_name: "cover.png".to_string(),
            content_type: content_type.to_string(),
            bytes: vec![0x89, b'P', b'N', b'G'],
        }
    }

    #[test]
    fn allowed_types() {
        assert!(image("image/png").has_allowed_type());
        assert!(image("image/jpeg").has_allowed_type());
        assert!(image("image/jpg").has_allowed_type());
        assert!(image("IMAGE/PNG").has_allowed_type());
        assert!(!image("image/gif").has_allowed_type());
        assert!(!image("application/pdf").has_allowed_type());
    }

    #[test]
    fn filename_keeps_stem_and_extension() {
        assert_eq!(
            stored_filename("frieren.png", "image/png", 123),
            "frieren-123.png"
        );
        assert_eq!(
            stored_filename("my cover.final.jpeg", "image/jpeg", 7),
            "my_cover_final-7.jpeg"
        );
    }

    #[test]
    fn filename_drops_directories() {
        assert_eq!(
            stored_filename("../../etc/passwd.png", "image/png", 1),
            "passwd-1.png"
        );
        assert_eq!(
            stored_filename("C:\\Users\\me\\poster.jpg", "image/jpeg", 2),
            "poster-2.jpg"
        );
    }

    #[test]
    fn filename_without_extension_uses_mime() {
        let name = stored_filename("poster", "image/png", 5);
        assert_eq!(name, "poster-5.png");

        assert_eq!(stored_filename("", "application/x-unknown-thing", 9), "image-9");
    }

    #[tokio::test]
    async fn save_and_discard() {
        let dir = std::env::temp_dir().join(format!("animecat-uploads-{}", uuid::Uuid::new_v4()));
        let uploads = UploadService::new(&dir);

        let filename = uploads.save(&image("image/png")).await.unwrap();
        assert!(filename.starts_with("cover-"));
        assert!(filename.ends_with(".png"));

        let stored = dir.join(&filename);
        assert_eq!(tokio::fs::read(&stored).await.unwrap(), vec![0x89, b'P', b'N', b'G']);

        uploads.discard(&filename).await;
        assert!(!stored.exists());
    }

    #[tokio::test]
    async fn concurrent_saves_of_same_name_keep_both_files() {
        let dir = std::env::temp_dir().join(format!("animecat-uploads-{}", uuid::Uuid::new_v4()));
        let uploads = UploadService::new(&dir);

        let with_bytes = |bytes: &[u8]| UploadedImage {
            original_name: "cover.png".to_string(),
            content_type: "image/png".to_string(),
            bytes: bytes.to_vec(),
        };
        let (a, b) = (with_bytes(b"A"), with_bytes(b"B"));

        for _ in 0..50 {
            let (first, second) = tokio::join!(uploads.save(&a), uploads.save(&b));
            let (first, second) = (first.unwrap(), second.unwrap());

            assert_ne!(first, second);
            assert_eq!(tokio::fs::read(dir.join(&first)).await.unwrap(), b"A");
            assert_eq!(tokio::fs::read(dir.join(&second)).await.unwrap(), b"B");
        }
    }

    #[tokio::test]
    async fn taken_name_moves_to_next_timestamp() {
        let dir = std::env::temp_dir().join(format!("animecat-uploads-{}", uuid::Uuid::new_v4()));
        let uploads = UploadService::new(&dir);

        let first = uploads.save(&image("image/png")).await.unwrap();
        let second = uploads.save(&image("image/png")).await.unwrap();

        assert_ne!(first, second);
        assert!(second.starts_with("cover-"));
        assert!(second.ends_with(".png"));
    }
}
