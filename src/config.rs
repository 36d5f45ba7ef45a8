use crate::error::Result;
use crate::schema::SchemaProfile;
use crate::utils::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_HOST, DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_PORT,
    DEFAULT_WEB_ROOT, ENV_PREFIX, UNKNOWN_SENTINEL,
};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub pipeline: PipelineSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub profile: String,
    #[serde(default)]
    pub header_row: Option<usize>,
    #[serde(default)]
    pub sheet: Option<String>,
    pub sentinel: String,
    pub write_summary: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub web_root: PathBuf,
    pub data_dir: PathBuf,
}

impl Settings {
    /// Defaults, then the TOML file, then `WINDFARM_*` environment variables
    /// (`WINDFARM_PIPELINE__PROFILE=english`). An explicitly named file must
    /// exist; the default `windfarm.toml` is optional.
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let path = config_file
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        let settings = Config::builder()
            .set_default("pipeline.input", DEFAULT_INPUT_FILE)?
            .set_default("pipeline.output_dir", DEFAULT_OUTPUT_DIR)?
            .set_default("pipeline.profile", "danish")?
            .set_default("pipeline.sentinel", UNKNOWN_SENTINEL)?
            .set_default("pipeline.write_summary", true)?
            .set_default("server.host", DEFAULT_HOST)?
            .set_default("server.port", i64::from(DEFAULT_PORT))?
            .set_default("server.web_root", DEFAULT_WEB_ROOT)?
            .set_default("server.data_dir", DEFAULT_OUTPUT_DIR)?
            .add_source(File::from(path.as_path()).required(config_file.is_some()))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// The configured profile, with the header row override applied.
    pub fn profile(&self) -> Result<SchemaProfile> {
        let profile = SchemaProfile::by_name(&self.pipeline.profile)?;
        Ok(match self.pipeline.header_row {
            Some(row) => profile.with_header_row(row),
            None => profile,
        })
    }
}
