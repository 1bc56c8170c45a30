use crate::{env_or_default, env_parse, ConfigError, FromEnv};
use std::path::PathBuf;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Where product images are kept and how large an upload may be.
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub image_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl StorageConfig {
    pub fn new(image_dir: impl Into<PathBuf>) -> Self {
        Self {
            image_dir: image_dir.into(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl FromEnv for StorageConfig {
    /// - IMAGE_STORAGE_DIR: defaults to ./product-images
    /// - MAX_UPLOAD_BYTES: defaults to 10 MiB
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            image_dir: PathBuf::from(env_or_default("IMAGE_STORAGE_DIR", "./product-images")),
            max_upload_bytes: env_parse(
                "MAX_UPLOAD_BYTES",
                &DEFAULT_MAX_UPLOAD_BYTES.to_string(),
            )?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        temp_env::with_vars(
            [
                ("IMAGE_STORAGE_DIR", None::<&str>),
                ("MAX_UPLOAD_BYTES", None::<&str>),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.image_dir, PathBuf::from("./product-images"));
                assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
            },
        );
    }

    #[test]
    fn test_storage_config_invalid_limit() {
        temp_env::with_var("MAX_UPLOAD_BYTES", Some("-1"), || {
            let err = StorageConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("MAX_UPLOAD_BYTES"));
        });
    }
}
