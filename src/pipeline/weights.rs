//! Module kinds and their processing weights.
//!
//! Every module the expander can instantiate belongs to exactly one
//! [`ModuleKind`]. The kind vocabulary is closed, so a typo in a name list
//! is a compile error rather than a runtime lookup miss.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use super::GenerationError;

/// Canonical kind of a packet processing module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ModuleKind {
    MacTable,
    TypeCheck,
    DirSelector,
    DlBrSelector,
    DlUeSelector,
    VxlanDecap,
    UlBrSelector,
    UlUeSelector,
    UpdateTtl,
    L3,
    UpdateMacDl,
    IpChecksumDl,
    UpdateMacUl,
    IpChecksumUl,
    DlUserBp,
    SetmdDl,
    VxlanEncap,
    IpEncap,
    EtherEncap,
    UlUserBp,
    SetmdUl,
}

/// Weight table: (kind, canonical name, weight)
const WEIGHT_TABLE: [(ModuleKind, &str, u32); 21] = [
    (ModuleKind::MacTable, "mac_table", 1),
    (ModuleKind::TypeCheck, "type_check", 1),
    (ModuleKind::DirSelector, "dir_selector", 1),
    (ModuleKind::DlBrSelector, "dl_br_selector", 20),
    (ModuleKind::DlUeSelector, "dl_ue_selector", 20),
    (ModuleKind::VxlanDecap, "vxlan_decap", 10),
    (ModuleKind::UlBrSelector, "ul_br_selector", 10),
    (ModuleKind::UlUeSelector, "ul_ue_selector", 10),
    (ModuleKind::UpdateTtl, "update_ttl", 1),
    (ModuleKind::L3, "L3", 1),
    (ModuleKind::UpdateMacDl, "update_mac_dl", 1),
    (ModuleKind::IpChecksumDl, "ip_checksum_dl", 1),
    (ModuleKind::UpdateMacUl, "update_mac_ul", 1),
    (ModuleKind::IpChecksumUl, "ip_checksum_ul", 1),
    (ModuleKind::DlUserBp, "dl_user_bp", 20),
    (ModuleKind::SetmdDl, "setmd_dl", 20),
    (ModuleKind::VxlanEncap, "vxlan_encap", 20),
    (ModuleKind::IpEncap, "ip_encap", 20),
    (ModuleKind::EtherEncap, "ether_encap", 20),
    (ModuleKind::UlUserBp, "ul_user_bp", 10),
    (ModuleKind::SetmdUl, "setmd_ul", 10),
];

/// Direction-agnostic modules shared by every flow, in instantiation order
pub const SHARED_KINDS: [ModuleKind; 12] = [
    ModuleKind::MacTable,
    ModuleKind::TypeCheck,
    ModuleKind::DirSelector,
    ModuleKind::DlBrSelector,
    ModuleKind::VxlanDecap,
    ModuleKind::UlBrSelector,
    ModuleKind::UpdateTtl,
    ModuleKind::L3,
    ModuleKind::UpdateMacDl,
    ModuleKind::IpChecksumDl,
    ModuleKind::UpdateMacUl,
    ModuleKind::IpChecksumUl,
];

/// Per-bearer selectors, suffixed `_{bearer}`
pub const BEARER_KINDS: [ModuleKind; 2] = [ModuleKind::DlUeSelector, ModuleKind::UlUeSelector];

/// Per-user/bearer modules, suffixed `_{user}_{bearer}`. Uplink kinds come first.
pub const USER_KINDS: [ModuleKind; 7] = [
    ModuleKind::UlUserBp,
    ModuleKind::SetmdUl,
    ModuleKind::DlUserBp,
    ModuleKind::SetmdDl,
    ModuleKind::VxlanEncap,
    ModuleKind::IpEncap,
    ModuleKind::EtherEncap,
];

impl ModuleKind {
    fn entry(self) -> &'static (ModuleKind, &'static str, u32) {
        // The table is indexed in declaration order of the enum
        &WEIGHT_TABLE[self as usize]
    }

    /// Canonical name used in module and flow names
    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Processing weight of a single instance of this kind
    pub fn weight(self) -> u32 {
        self.entry().2
    }

    /// All known kinds, in table order
    pub fn all() -> impl Iterator<Item = ModuleKind> {
        WEIGHT_TABLE.iter().map(|(kind, _, _)| *kind)
    }
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModuleKind {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WEIGHT_TABLE
            .iter()
            .find(|(_, name, _)| *name == s)
            .map(|(kind, _, _)| *kind)
            .ok_or_else(|| GenerationError::UnknownModuleKind(s.to_string()))
    }
}

/// Instance name: canonical kind, optional `_{n}` groups, optional `-c{n}`
static INSTANCE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?P<kind>.+?)(?:_\d+)*(?:-c\d+)?$").expect("valid instance name pattern"));

/// Strip instance suffixes from a module name.
///
/// A trailing `-c{n}` replica suffix and any number of `_{n}` user/bearer
/// groups before it are removed, e.g. `dl_user_bp_0_1-c2` becomes
/// `dl_user_bp`.
pub fn canonical_kind(name: &str) -> &str {
    INSTANCE_NAME
        .captures(name)
        .and_then(|caps| caps.name("kind"))
        .map_or(name, |kind| kind.as_str())
}

/// Look up the weight of a (possibly suffixed) module name
pub fn weight_of(name: &str) -> Result<u32, GenerationError> {
    let kind: ModuleKind = canonical_kind(name)
        .parse()
        .map_err(|_| GenerationError::UnknownModuleKind(name.to_string()))?;
    Ok(kind.weight())
}
