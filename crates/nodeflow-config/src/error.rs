use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "設定ファイルが見つかりません。以下の場所を確認してください:\n\
        - カレントディレクトリ: nodeflow.yaml, .nodeflow.yaml\n\
        - ./.nodeflow/ ディレクトリ\n\
        - ~/.config/nodeflow/nodeflow.yaml\n\
        または NODEFLOW_CONFIG_PATH 環境変数で直接指定できます"
    )]
    SettingsFileNotFound,

    #[error("設定ファイルの解析に失敗しました: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO エラー: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
