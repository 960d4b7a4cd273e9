mod commands;

use clap::{Parser, Subcommand};
use nodeflow_cloud::ResourceKind;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "nodeflow")]
#[command(about = "ノード構成を、クラウドの実インベントリと突き合わせる。", long_about = None)]
struct Cli {
    /// メタデータプロキシのオリジン（設定ファイル・NODEFLOW_ENDPOINT より優先）
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// クラウドクレデンシャルID（設定ファイル・NODEFLOW_CREDENTIAL_ID より優先）
    #[arg(long, global = true)]
    credential: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 全リソースのカタログを取得して表示
    Catalog {
        /// 指定した種別だけ取得 (location, instance-type, image, network, firewall, placement-group, ssh-key)
        #[arg(short, long)]
        kind: Option<ResourceKind>,
        /// JSONで出力
        #[arg(long)]
        json: bool,
    },
    /// ロケーションで絞り込んだインスタンスタイプを表示
    InstanceTypes {
        /// ロケーション名 (例: fsn1)
        #[arg(short, long)]
        location: String,
    },
    /// 構成レコード(JSON)を検証し、正規化した結果を表示
    Check {
        /// 構成レコードのパス
        record: PathBuf,
        /// 正規化した結果をファイルに書き戻す
        #[arg(long)]
        write: bool,
        /// 選択値が実インベントリに存在するかも確認する
        #[arg(long)]
        online: bool,
    },
    /// バージョン情報を表示
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // ログはstderrに出力（stdoutは結果表示に使う）
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    // Versionコマンドは設定ファイル不要
    if matches!(cli.command, Commands::Version) {
        println!("nodeflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let settings = nodeflow_config::load_settings()?;
    let overrides = commands::Overrides {
        endpoint: cli.endpoint,
        credential: cli.credential,
    };

    // コマンドディスパッチ
    match cli.command {
        Commands::Catalog { kind, json } => {
            commands::catalog::handle(&settings, &overrides, kind, json).await?;
        }
        Commands::InstanceTypes { location } => {
            commands::instance_types::handle(&settings, &overrides, &location).await?;
        }
        Commands::Check {
            record,
            write,
            online,
        } => {
            let valid =
                commands::check::handle(&settings, &overrides, &record, write, online).await?;
            if !valid {
                std::process::exit(1);
            }
        }
        Commands::Version => {}
    }

    Ok(())
}
