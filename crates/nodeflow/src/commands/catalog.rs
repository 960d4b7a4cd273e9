use super::{Overrides, build_aggregator, notify_timeout, print_options};
use colored::Colorize;
use nodeflow_cloud::{ResourceAggregator, ResourceCatalog, ResourceKind, TracingNotifier};
use nodeflow_config::Settings;
use nodeflow_node::ConfigurationReconciler;

pub async fn handle(
    settings: &Settings,
    overrides: &Overrides,
    kind: Option<ResourceKind>,
    json: bool,
) -> anyhow::Result<()> {
    let aggregator = build_aggregator(settings, overrides)?;

    if !json {
        let target = kind.map_or_else(|| "全".to_string(), |k| k.to_string());
        println!(
            "{}",
            format!("{} の{}リソースを取得中...", aggregator.name(), target).blue()
        );
    }

    let catalog = match kind {
        // 単一種別はロケーション指定なしで取得
        Some(kind) => ResourceCatalog::new().with(kind, aggregator.fetch(kind).await),
        None => {
            let mut reconciler = ConfigurationReconciler::new();
            reconciler
                .load(&aggregator, &TracingNotifier, notify_timeout(settings))
                .await;
            reconciler.catalog().clone()
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }

    for (kind, options) in catalog.iter() {
        let selectable = options.iter().filter(|o| !o.is_header()).count();
        println!();
        println!("{} ({}件)", kind.to_string().green().bold(), selectable);
        print_options(options);
    }

    if catalog.is_empty() {
        eprintln!();
        eprintln!("{}", "✗ リソースを1件も取得できませんでした".red().bold());
        eprintln!("  エンドポイントとクレデンシャルを確認してください");
    }

    Ok(())
}
