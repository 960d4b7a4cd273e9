pub mod catalog;
pub mod check;
pub mod instance_types;

use colored::Colorize;
use nodeflow_cloud::SelectableOption;
use nodeflow_cloud_hetzner::{CredentialRef, HetznerAggregator, HttpTransport};
use nodeflow_config::{CREDENTIAL_ID_ENV, ENDPOINT_ENV, Settings};
use std::time::Duration;

/// コマンドラインで指定された接続先の上書き
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub credential: Option<String>,
}

/// 設定と上書きからアグリゲーターを組み立てる
pub fn build_aggregator(
    settings: &Settings,
    overrides: &Overrides,
) -> anyhow::Result<HetznerAggregator> {
    let endpoint = overrides
        .endpoint
        .as_deref()
        .or(settings.endpoint.as_deref())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "エンドポイントが未設定です (--endpoint, {} または設定ファイルの endpoint)",
                ENDPOINT_ENV
            )
        })?;

    let credential = overrides
        .credential
        .as_deref()
        .or(settings.credential_id.as_deref())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "クレデンシャルIDが未設定です (--credential, {} または設定ファイルの credential_id)",
                CREDENTIAL_ID_ENV
            )
        })?;

    tracing::debug!("Using endpoint {} with credential {}", endpoint, credential);

    let transport = HttpTransport::new(
        endpoint,
        CredentialRef::new(credential),
        Duration::from_secs(settings.request_timeout_secs),
    )?;

    Ok(HetznerAggregator::new(transport))
}

pub fn notify_timeout(settings: &Settings) -> Duration {
    Duration::from_millis(settings.notify_timeout_ms)
}

/// 選択肢を1行ずつ表示する（グループ見出しは太字）
pub fn print_options(options: &[SelectableOption]) {
    if options.is_empty() {
        println!("  {}", "(なし)".dimmed());
        return;
    }

    for option in options {
        if option.is_header() {
            println!("  {}", option.label.bold());
        } else {
            println!("    {}  {}", option.value.to_string().cyan(), option.label);
        }
    }
}
