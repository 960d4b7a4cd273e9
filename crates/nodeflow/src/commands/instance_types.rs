use super::{Overrides, build_aggregator, print_options};
use colored::Colorize;
use nodeflow_cloud::ResourceAggregator;
use nodeflow_config::Settings;

pub async fn handle(
    settings: &Settings,
    overrides: &Overrides,
    location: &str,
) -> anyhow::Result<()> {
    let aggregator = build_aggregator(settings, overrides)?;

    println!(
        "{}",
        format!("{} のインスタンスタイプを取得中...", location.cyan()).blue()
    );

    let options = aggregator.instance_types(Some(location)).await;

    println!();
    print_options(&options);

    Ok(())
}
