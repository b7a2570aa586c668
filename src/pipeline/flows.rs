//! Flow builder.
//!
//! Produces the ordered module names that one uplink or downlink flow
//! traverses. The result is pure data; resolving names against instantiated
//! modules is the expander's job.

use super::types::Direction;
use super::weights::ModuleKind;

const DL_PREFIX: [ModuleKind; 4] = [
    ModuleKind::MacTable,
    ModuleKind::TypeCheck,
    ModuleKind::DirSelector,
    ModuleKind::DlBrSelector,
];

const DL_USER: [ModuleKind; 5] = [
    ModuleKind::DlUserBp,
    ModuleKind::SetmdDl,
    ModuleKind::VxlanEncap,
    ModuleKind::IpEncap,
    ModuleKind::EtherEncap,
];

const DL_SUFFIX: [ModuleKind; 4] = [
    ModuleKind::UpdateTtl,
    ModuleKind::L3,
    ModuleKind::UpdateMacDl,
    ModuleKind::IpChecksumDl,
];

const UL_PREFIX: [ModuleKind; 5] = [
    ModuleKind::MacTable,
    ModuleKind::TypeCheck,
    ModuleKind::DirSelector,
    ModuleKind::VxlanDecap,
    ModuleKind::UlBrSelector,
];

const UL_USER: [ModuleKind; 2] = [ModuleKind::UlUserBp, ModuleKind::SetmdUl];

const UL_SUFFIX: [ModuleKind; 4] = [
    ModuleKind::UpdateTtl,
    ModuleKind::L3,
    ModuleKind::UpdateMacUl,
    ModuleKind::IpChecksumUl,
];

/// Name of a per-bearer module instance
pub fn bearer_module_name(kind: ModuleKind, bearer: usize) -> String {
    format!("{}_{}", kind, bearer)
}

/// Name of a per-user/bearer module instance
pub fn user_module_name(kind: ModuleKind, user: usize, bearer: usize) -> String {
    format!("{}_{}_{}", kind, user, bearer)
}

/// Name of the fault-tolerance replica `conflict_id` of a module
pub fn replica_name(name: &str, conflict_id: usize) -> String {
    format!("{}-c{}", name, conflict_id)
}

/// Generate the module names of a single flow
///
/// # Arguments
/// * `direction` - Uplink or downlink
/// * `bearer` - Bearer id
/// * `user` - User id
/// * `conflict_id` - When set, route the flow through replica `conflict_id`
///
/// # Returns
/// Module names ordered from head to tail
pub fn flow_module_names(
    direction: Direction,
    bearer: usize,
    user: usize,
    conflict_id: Option<usize>,
) -> Vec<String> {
    let (prefix, selector, per_user, suffix) = match direction {
        Direction::Down => (&DL_PREFIX[..], ModuleKind::DlUeSelector, &DL_USER[..], &DL_SUFFIX[..]),
        Direction::Up => (&UL_PREFIX[..], ModuleKind::UlUeSelector, &UL_USER[..], &UL_SUFFIX[..]),
    };

    let mut names: Vec<String> = Vec::with_capacity(prefix.len() + 1 + per_user.len() + suffix.len());
    names.extend(prefix.iter().map(|kind| kind.name().to_string()));
    names.push(bearer_module_name(selector, bearer));
    names.extend(per_user.iter().map(|kind| user_module_name(*kind, user, bearer)));
    names.extend(suffix.iter().map(|kind| kind.name().to_string()));

    match conflict_id {
        Some(id) => names.iter().map(|name| replica_name(name, id)).collect(),
        None => names,
    }
}
