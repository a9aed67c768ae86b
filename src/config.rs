use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::{DubStatus, ShowStatus};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub defaults: MetadataDefaults,
    #[serde(default)]
    pub links: LinkConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site origin, including the trailing slash relative hrefs are appended to
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_site_name")]
    pub name: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Stand-in metadata for fields the site never exposes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataDefaults {
    /// Number of episodes synthesized when a title page lists none.
    /// Approximate: the real count varies per title.
    #[serde(default = "default_fallback_episode_count")]
    pub fallback_episode_count: u32,
    #[serde(default = "default_tags")]
    pub tags: Vec<String>,
    #[serde(default = "default_year")]
    pub year: i32,
    #[serde(default = "default_show_status")]
    pub status: ShowStatus,
    #[serde(default = "default_dub_status")]
    pub dub_status: DubStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    #[serde(default = "default_source_label")]
    pub source_label: String,
    #[serde(default = "default_display_label")]
    pub display_label: String,
}

fn default_base_url() -> String {
    "https://www.sieutamphim.org/".to_string()
}

fn default_site_name() -> String {
    "Siêu Tầm Phim (VN)".to_string()
}

fn default_lang() -> String {
    "vi".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_fallback_episode_count() -> u32 {
    193
}

fn default_tags() -> Vec<String> {
    vec!["Hoạt Hình".to_string(), "Thuyết Minh".to_string()]
}

fn default_year() -> i32 {
    2000
}

fn default_show_status() -> ShowStatus {
    ShowStatus::Completed
}

fn default_dub_status() -> DubStatus {
    DubStatus::Dubbed
}

fn default_source_label() -> String {
    "SieuTamPhim".to_string()
}

fn default_display_label() -> String {
    "HD Thuyết Minh".to_string()
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            name: default_site_name(),
            lang: default_lang(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for MetadataDefaults {
    fn default() -> Self {
        Self {
            fallback_episode_count: default_fallback_episode_count(),
            tags: default_tags(),
            year: default_year(),
            status: default_show_status(),
            dub_status: default_dub_status(),
        }
    }
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            source_label: default_source_label(),
            display_label: default_display_label(),
        }
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("", "", "sieutamphim").ok_or(Error::NoConfigDir)
}

pub fn config_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.config_dir().to_path_buf())
}

pub fn data_dir() -> Result<PathBuf> {
    Ok(project_dirs()?.data_dir().to_path_buf())
}

pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join("config.toml"))
}

impl ProviderConfig {
    /// Load from the default config location, writing defaults on first run
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = ProviderConfig::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ProviderConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
