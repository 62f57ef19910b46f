use crate::{AppSettings, RawSettings};
use color_eyre::eyre::Result;
use std::fs;
use std::path::Path;
use tracing::info;

/// Loads `config/settings.yaml` relative to the working directory.
pub fn load_app_settings() -> Result<AppSettings> {
    load_settings_from_path(Path::new("config/settings.yaml"), true)
}

/// Loads settings from a yaml file, optionally layering `APP__`-prefixed environment
/// variables on top (e.g. `APP__SECRETS__JWT`).
pub fn load_settings_from_path(path: &Path, use_env: bool) -> Result<AppSettings> {
    // Need to load from dotenv to get it to overwrite the db url from env.
    dotenv::from_path(".env").ok();
    let config_path = path.canonicalize()?;

    let mut builder = config::Config::builder().add_source(config::File::from(config_path));
    if use_env {
        builder = builder.add_source(
            config::Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        );
    }

    let raw_settings = builder.build()?.try_deserialize::<RawSettings>()?;
    let settings = AppSettings::try_from(raw_settings)?;

    fs::create_dir_all(&settings.uploads.image_folder)?;
    fs::create_dir_all(&settings.uploads.cover_folder)?;
    info!(
        "Uploads stored in {} and {}",
        settings.uploads.image_folder.display(),
        settings.uploads.cover_folder.display()
    );

    Ok(settings)
}
