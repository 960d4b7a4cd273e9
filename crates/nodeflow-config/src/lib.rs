pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 設定ファイルパスを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "NODEFLOW_CONFIG_PATH";
pub const ENDPOINT_ENV: &str = "NODEFLOW_ENDPOINT";
pub const CREDENTIAL_ID_ENV: &str = "NODEFLOW_CREDENTIAL_ID";

const CANDIDATES: [&str; 2] = ["nodeflow.yaml", ".nodeflow.yaml"];

/// NodeFlow の動作設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// メタデータプロキシのオリジン (例: https://rancher.example.com)
    pub endpoint: Option<String>,

    /// クラウドクレデンシャルの ID（シークレット本体ではない）
    pub credential_id: Option<String>,

    /// HTTP リクエストのタイムアウト（秒）
    pub request_timeout_secs: u64,

    /// 通知の表示時間（ミリ秒）
    pub notify_timeout_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: None,
            credential_id: None,
            request_timeout_secs: 30,
            notify_timeout_ms: 5000,
        }
    }
}

impl Settings {
    /// YAML ファイルから読み込む
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// 環境変数で上書きする
    pub fn apply_env(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            self.endpoint = Some(endpoint);
        }
        if let Ok(credential_id) = std::env::var(CREDENTIAL_ID_ENV) {
            self.credential_id = Some(credential_id);
        }
        self
    }
}

/// 設定ファイルを探す
///
/// 以下の優先順位で設定ファイルを検索:
/// 1. 環境変数 NODEFLOW_CONFIG_PATH (直接パス指定)
/// 2. カレントディレクトリ: nodeflow.yaml, .nodeflow.yaml
/// 3. ./.nodeflow/ ディレクトリ内: 同様の順序
/// 4. ~/.config/nodeflow/nodeflow.yaml (グローバル設定)
pub fn find_settings_file() -> Result<PathBuf> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
    }

    let current_dir = std::env::current_dir()?;

    // 2. カレントディレクトリで検索
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    // 3. ./.nodeflow/ ディレクトリで検索
    let nodeflow_dir = current_dir.join(".nodeflow");
    if nodeflow_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = nodeflow_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    // 4. グローバル設定ファイル
    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("nodeflow").join("nodeflow.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::SettingsFileNotFound)
}

/// 設定を読み込む
///
/// 設定ファイルが無い場合はデフォルト値に環境変数を適用する。
pub fn load_settings() -> Result<Settings> {
    let settings = match find_settings_file() {
        Ok(path) => Settings::from_file(&path)?,
        Err(ConfigError::SettingsFileNotFound) => {
            tracing::debug!("No settings file found, using defaults");
            Settings::default()
        }
        Err(e) => return Err(e),
    };

    Ok(settings.apply_env())
}
