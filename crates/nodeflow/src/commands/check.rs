use super::{Overrides, build_aggregator, notify_timeout};
use colored::Colorize;
use nodeflow_cloud::{ResourceCatalog, ResourceKind, TracingNotifier};
use nodeflow_config::Settings;
use nodeflow_node::{ConfigurationReconciler, ExternalRecord, NodeConfiguration};
use std::path::Path;

/// 構成レコードを検証する
///
/// 有効なら正規化したレコードを表示し `true` を返す。
pub async fn handle(
    settings: &Settings,
    overrides: &Overrides,
    path: &Path,
    write: bool,
    online: bool,
) -> anyhow::Result<bool> {
    println!(
        "{}",
        format!("構成レコードを検証中: {}", path.display()).blue()
    );

    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("{} を読み込めません: {}", path.display(), e))?;
    let mut record = ExternalRecord::from_json_str(&content)?;

    let mut reconciler = ConfigurationReconciler::new();
    reconciler.derive_internal_from_external(&mut record);

    let mut valid = reconciler.is_valid();

    if online {
        let aggregator = build_aggregator(settings, overrides)?;
        // 読み込み時に提供されないインスタンスタイプは解除されるため、先に控えておく
        let derived = reconciler.config().clone();
        reconciler
            .load(&aggregator, &TracingNotifier, notify_timeout(settings))
            .await;

        let missing = unavailable_selections(&derived, reconciler.catalog());
        if !missing.is_empty() {
            eprintln!();
            eprintln!("{}", "✗ 利用できない選択値があります".red().bold());
            for (kind, value) in &missing {
                eprintln!("  - {}: {}", kind, value.yellow());
            }
            valid = false;
        }
    }

    let violations = reconciler.violations();
    if !violations.is_empty() {
        eprintln!();
        eprintln!("{}", "✗ 構成が無効です".red().bold());
        for violation in &violations {
            eprintln!("  - {}", violation);
        }
        return Ok(false);
    }

    if !valid {
        return Ok(false);
    }

    reconciler.project_external_from_internal(&mut record);
    let output = serde_json::to_string_pretty(&record.to_value())?;

    println!("{}", "✓ 構成は有効です".green().bold());
    println!();
    println!("{}", output);

    if write {
        std::fs::write(path, format!("{}\n", output))?;
        println!();
        println!("{}", format!("✓ {} に書き込みました", path.display()).green());
    }

    Ok(true)
}

/// カタログに存在しない選択値を列挙する
///
/// 一覧が空の種別は取得に失敗した可能性があるため判定しない。
fn unavailable_selections(
    config: &NodeConfiguration,
    catalog: &ResourceCatalog,
) -> Vec<(ResourceKind, String)> {
    let mut selections: Vec<(ResourceKind, String)> = Vec::new();

    if let Some(location) = &config.location {
        selections.push((ResourceKind::Location, location.clone()));
    }
    if let Some(instance_type) = &config.instance_type {
        selections.push((ResourceKind::InstanceType, instance_type.clone()));
    }
    if let Some(image) = config.image {
        selections.push((ResourceKind::Image, image.to_string()));
    }
    if let Some(group) = config.placement_group {
        selections.push((ResourceKind::PlacementGroup, group.to_string()));
    }
    if let Some(key) = config.ssh_key {
        selections.push((ResourceKind::SshKey, key.to_string()));
    }
    selections.extend(
        config
            .networks
            .iter()
            .map(|id| (ResourceKind::Network, id.to_string())),
    );
    selections.extend(
        config
            .firewalls
            .iter()
            .map(|id| (ResourceKind::Firewall, id.to_string())),
    );

    selections
        .into_iter()
        .filter(|(kind, value)| !catalog.get(*kind).is_empty() && !catalog.contains(*kind, value))
        .collect()
}
