//! Preset locations offered by the CLI
//!
//! The presets are the cities shown when no location is given on the
//! command line (`--all` fetches every one of them).

use super::Location;

/// Static list of preset locations as (name, region code)
pub static PRESETS: [(&str, &str); 3] = [
    ("Rio de Janeiro", "BR"),
    ("Beijing", "CN"),
    ("Los Angeles", "US"),
];

/// Index into [`PRESETS`] of the location used when none is given
const DEFAULT_PRESET: usize = 2;

/// Returns all preset locations
pub fn preset_locations() -> Vec<Location> {
    PRESETS
        .iter()
        .map(|(name, region)| Location::new(*name, *region))
        .collect()
}

/// Returns the default location
pub fn default_location() -> Location {
    let (name, region) = PRESETS[DEFAULT_PRESET];
    Location::new(name, region)
}
