use std::path::{Path, PathBuf};

use anyhow::Context;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::core::config::Settings;
use crate::media;

/// A timetable image that has been written to storage.
#[derive(Debug, Clone)]
pub(crate) struct StoredMedia {
    pub(crate) filename: String,
    pub(crate) size: i64,
    pub(crate) sha256: String,
}

/// Where timetable images live. Records only keep the generated filename;
/// the backend decides how that name maps to bytes.
#[derive(Debug, Clone)]
pub(crate) enum MediaStorage {
    Local(LocalMedia),
    S3(S3Media),
}

#[derive(Debug, Clone)]
pub(crate) struct LocalMedia {
    root: PathBuf,
}

#[derive(Debug, Clone)]
pub(crate) struct S3Media {
    client: Client,
    bucket: String,
    key_prefix: String,
}

impl MediaStorage {
    pub(crate) async fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        if !settings.s3().is_configured() {
            let root = settings.storage().media_dir.clone();
            tokio::fs::create_dir_all(&root)
                .await
                .with_context(|| format!("creating media directory {}", root.display()))?;
            return Ok(Self::local(root));
        }

        let s3 = settings.s3();
        let creds = Credentials::new(
            s3.access_key.clone(),
            s3.secret_key.clone(),
            None,
            None,
            "campus-exams-static",
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(s3.region.clone()))
            .credentials_provider(creds);
        if !s3.endpoint.is_empty() {
            loader = loader.endpoint_url(s3.endpoint.clone());
        }
        let config = loader.load().await;

        Ok(Self::S3(S3Media {
            client: Client::new(&config),
            bucket: s3.bucket.clone(),
            key_prefix: s3.key_prefix.trim_matches('/').to_string(),
        }))
    }

    pub(crate) fn local(root: impl Into<PathBuf>) -> Self {
        Self::Local(LocalMedia { root: root.into() })
    }

    /// Directory to serve statically, when files are kept on local disk.
    pub(crate) fn local_root(&self) -> Option<&Path> {
        match self {
            Self::Local(local) => Some(&local.root),
            Self::S3(_) => None,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Local(_) => "local",
            Self::S3(_) => "s3",
        }
    }

    /// Writes an already validated image under a fresh filename.
    pub(crate) async fn store(
        &self,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> anyhow::Result<StoredMedia> {
        let extension = media::extension_for(content_type)
            .ok_or_else(|| anyhow::anyhow!("unsupported content type {content_type}"))?;
        let filename = generate_filename(extension);
        let size = bytes.len() as i64;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        match self {
            Self::Local(local) => {
                let path = local.root.join(&filename);
                tokio::fs::write(&path, bytes)
                    .await
                    .with_context(|| format!("writing {}", path.display()))?;
            }
            Self::S3(s3) => {
                s3.client
                    .put_object()
                    .bucket(&s3.bucket)
                    .key(s3.key_for(&filename))
                    .content_type(content_type)
                    .body(ByteStream::from(bytes))
                    .send()
                    .await?;
            }
        }

        tracing::debug!(
            filename = %filename,
            size,
            sha256 = %sha256,
            backend = self.kind(),
            "Stored timetable image"
        );
        Ok(StoredMedia { filename, size, sha256 })
    }

    /// Deletes a stored image. Missing files are not an error.
    pub(crate) async fn remove(&self, filename: &str) -> anyhow::Result<()> {
        if !is_plain_filename(filename) {
            anyhow::bail!("refusing to remove suspicious media name {filename:?}");
        }

        match self {
            Self::Local(local) => match tokio::fs::remove_file(local.root.join(filename)).await {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err.into()),
            },
            Self::S3(s3) => {
                s3.client
                    .delete_object()
                    .bucket(&s3.bucket)
                    .key(s3.key_for(filename))
                    .send()
                    .await?;
                Ok(())
            }
        }
    }
}

impl S3Media {
    fn key_for(&self, filename: &str) -> String {
        if self.key_prefix.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{filename}", self.key_prefix)
        }
    }
}

fn generate_filename(extension: &str) -> String {
    let millis = time::OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    format!("{millis}-{}.{extension}", Uuid::new_v4().simple())
}

fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && !name.contains(['/', '\\'])
        && name != "."
        && name != ".."
        && !name.starts_with('.')
}
