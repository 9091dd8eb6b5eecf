/// Canonical manufacturer identifiers as they appear in the catalog.
/// The casing matches what downstream lookups already key on.
pub const AEROTECH: &str = "aerotech";
pub const AMW: &str = "AMW";
pub const APOGEE: &str = "apogee";
pub const CESARONI: &str = "cesaroni";
pub const CONTRAIL: &str = "contrail";
pub const ESTES: &str = "estes";
pub const KLIMA: &str = "klima";
pub const LOKI: &str = "loki";
pub const QUEST: &str = "quest";
pub const SCR: &str = "SCR";

/// Extension of vendor engine-list documents.
pub const DOCUMENT_EXTENSION: &str = "rse";

/// Known input documents (by file name) and the manufacturer each belongs to.
pub const KNOWN_DOCUMENTS: &[(&str, &str)] = &[
    ("AeroTech.rse", AEROTECH),
    ("AMW.rse", AMW),
    ("Apogee.rse", APOGEE),
    ("Cesaroni.rse", CESARONI),
    ("Contrail.rse", CONTRAIL),
    ("Estes.rse", ESTES),
    ("Klima.rse", KLIMA),
    ("Loki.rse", LOKI),
    ("Quest.rse", QUEST),
    ("SCR.rse", SCR),
];

// Defaults for the paths section of the config file
pub const DEFAULT_INPUT_DIR: &str = "motor-data";
pub const DEFAULT_OUTPUT: &str = "bot/resources/motors.json";
pub const DEFAULT_LOG_DIR: &str = "logs";
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Get all built-in manufacturer ids
pub fn get_supported_manufacturers() -> Vec<&'static str> {
    KNOWN_DOCUMENTS.iter().map(|(_, mfg)| *mfg).collect()
}
