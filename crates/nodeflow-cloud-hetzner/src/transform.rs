//! Per-kind sort, filter, label and grouping rules

use crate::api::{CpuType, Image, Location, Named, Network, ServerType};
use crate::country::country_name;
use nodeflow_cloud::SelectableOption;

pub const DEDICATED_TAG: &str = "dedicated";
pub const SHARED_TAG: &str = "shared";

const DEDICATED_HEADER: &str = "Dedicated vCPU";
const SHARED_HEADER: &str = "Shared vCPU";

/// Locations sorted by network zone, then name
pub fn location_options(mut locations: Vec<Location>) -> Vec<SelectableOption> {
    locations.sort_by(|a, b| {
        a.network_zone
            .cmp(&b.network_zone)
            .then_with(|| a.name.cmp(&b.name))
    });

    locations
        .into_iter()
        .map(|l| {
            let label = location_label(&l);
            SelectableOption::new(l.name, label)
        })
        .collect()
}

/// `"<NAME> - <city>, <country>"`
pub fn location_label(location: &Location) -> String {
    format!(
        "{} - {}, {}",
        location.name.to_uppercase(),
        location.city,
        country_name(&location.country)
    )
}

/// Instance types grouped into dedicated and shared CPU classes
///
/// The dedicated header is emitted whenever that class has entries. The
/// shared header only appears when a dedicated class precedes it, so a list
/// of shared types alone carries no header.
pub fn instance_type_options(
    server_types: Vec<ServerType>,
    location: Option<&str>,
) -> Vec<SelectableOption> {
    let (mut dedicated, mut shared): (Vec<_>, Vec<_>) = server_types
        .into_iter()
        .filter(|t| !t.is_deprecated())
        .filter(|t| location.is_none_or(|loc| t.price_in(loc).is_some()))
        .partition(|t| t.cpu_type == CpuType::Dedicated);

    dedicated.sort_by(|a, b| a.name.cmp(&b.name));
    shared.sort_by(|a, b| a.name.cmp(&b.name));

    let has_dedicated = !dedicated.is_empty();
    let mut options = Vec::with_capacity(dedicated.len() + shared.len() + 2);

    if has_dedicated {
        options.push(SelectableOption::group_header(DEDICATED_TAG, DEDICATED_HEADER));
    }
    options.extend(
        dedicated
            .iter()
            .map(|t| instance_type_option(t, location).with_group(DEDICATED_TAG)),
    );

    if has_dedicated && !shared.is_empty() {
        options.push(SelectableOption::group_header(SHARED_TAG, SHARED_HEADER));
    }
    options.extend(
        shared
            .iter()
            .map(|t| instance_type_option(t, location).with_group(SHARED_TAG)),
    );

    options
}

fn instance_type_option(server_type: &ServerType, location: Option<&str>) -> SelectableOption {
    SelectableOption::new(
        server_type.name.as_str(),
        instance_type_label(server_type, location),
    )
}

/// Label with monthly gross price when a location is known
pub fn instance_type_label(server_type: &ServerType, location: Option<&str>) -> String {
    let specs = format!(
        "{}, {} cores, {} GB RAM, {} GB disk",
        server_type.architecture, server_type.cores, server_type.memory, server_type.disk
    );

    let price = location
        .and_then(|loc| server_type.price_in(loc))
        .and_then(|p| p.price_monthly.gross_value());

    match price {
        Some(price) => format!(
            "{} ({:.2} €/month) - {}",
            server_type.name.to_uppercase(),
            price,
            specs
        ),
        None => format!("{} - {}", server_type.name.to_uppercase(), specs),
    }
}

/// Images sorted by name, labelled `"<name> (<arch>) - <description>"`
pub fn image_options(mut images: Vec<Image>) -> Vec<SelectableOption> {
    images.sort_by(|a, b| a.display_name().cmp(b.display_name()));

    images
        .iter()
        .map(|i| {
            SelectableOption::new(
                i.id,
                format!(
                    "{} ({}) - {}",
                    i.display_name(),
                    i.architecture,
                    i.description
                ),
            )
        })
        .collect()
}

pub fn network_options(networks: Vec<Network>) -> Vec<SelectableOption> {
    networks
        .into_iter()
        .map(|n| SelectableOption::new(n.id, format!("{} ({})", n.name, n.ip_range)))
        .collect()
}

/// Bare-name options in server order
pub fn named_options(items: Vec<Named>) -> Vec<SelectableOption> {
    items
        .into_iter()
        .map(|n| SelectableOption::new(n.id, n.name))
        .collect()
}
