use crate::{
    ApiSettings, AuthSettings, DatabaseSettings, LoggingSettings, RawSettings, SecretSettings,
    SeedSettings,
};
use color_eyre::Result;
use serde::Deserialize;
use std::path::{PathBuf, absolute};

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub api: ApiSettings,
    pub database: DatabaseSettings,
    pub secrets: SecretSettings,
    pub auth: AuthSettings,
    pub uploads: UploadSettings,
    pub seed: SeedSettings,
    pub logging: LoggingSettings,
}

/// Upload folders, resolved to absolute paths.
#[derive(Debug, Deserialize, Clone)]
pub struct UploadSettings {
    pub image_folder: PathBuf,
    pub cover_folder: PathBuf,
    pub max_upload_bytes: usize,
}

impl TryFrom<RawSettings> for AppSettings {
    type Error = color_eyre::Report;

    fn try_from(raw: RawSettings) -> Result<Self> {
        let uploads = UploadSettings {
            image_folder: absolute(&raw.uploads.image_folder)?,
            cover_folder: absolute(&raw.uploads.cover_folder)?,
            max_upload_bytes: raw.uploads.max_upload_bytes,
        };

        Ok(Self {
            api: raw.api,
            database: raw.database,
            secrets: raw.secrets,
            auth: raw.auth,
            uploads,
            seed: raw.seed,
            logging: raw.logging,
        })
    }
}

impl ApiSettings {
    /// Joins the public base url with an absolute request path.
    #[must_use]
    pub fn public_link(&self, path: &str) -> String {
        format!("{}{}", self.public_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RateLimitingSettings;

    fn api(public_url: &str) -> ApiSettings {
        ApiSettings {
            host: "127.0.0.1".to_owned(),
            port: 8080,
            allowed_origins: vec![],
            public_url: public_url.to_owned(),
            rate_limiting: RateLimitingSettings {
                req_per_second: 2,
                burst_size: 5,
            },
        }
    }

    #[test]
    fn public_link_does_not_double_slashes() {
        assert_eq!(
            api("http://localhost:8080/").public_link("/images/a.png"),
            "http://localhost:8080/images/a.png"
        );
        assert_eq!(
            api("http://localhost:8080").public_link("/covers/b.jpg"),
            "http://localhost:8080/covers/b.jpg"
        );
    }
}
