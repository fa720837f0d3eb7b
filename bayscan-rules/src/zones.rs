//! Fixed geometry and structure composition of the five dock zones.

use bayscan_core::ZoneId;

/// Static description of a dock zone's structure and depth.
#[derive(Debug, Clone, Copy)]
pub struct ZoneProfile {
    /// Zone identifier.
    pub id: ZoneId,
    /// Short description of the quadrant.
    pub description: &'static str,
    /// Depth range in feet, (min, max).
    pub depth_range: (f64, f64),
    /// Whether the zone has pilings (any line, single or dual).
    pub has_pilings: bool,
    /// Whether the zone has loose rubble.
    pub has_rubble: bool,
    /// Whether the zone is open water with no structure.
    pub has_open_water: bool,
    /// Whether the zone is lit at night (dock/underwater lights).
    pub has_lights: bool,
    /// Whether this zone is one of the two "popular"/productive zones
    /// (Zone 3 and Zone 4) that receive the structure-match popularity bonus.
    pub is_popular: bool,
}

impl ZoneProfile {
    /// Midpoint depth, used as the default "recommended depth" baseline.
    pub fn mid_depth(&self) -> f64 {
        (self.depth_range.0 + self.depth_range.1) / 2.0
    }
}

const ZONE_1: ZoneProfile = ZoneProfile {
    id: ZoneId::Zone1,
    description: "Northwest quadrant, above the walkway",
    depth_range: (2.0, 4.0),
    has_pilings: true,
    has_rubble: true,
    has_open_water: false,
    has_lights: false,
    is_popular: false,
};

const ZONE_2: ZoneProfile = ZoneProfile {
    id: ZoneId::Zone2,
    description: "Southwest quadrant, below the walkway",
    depth_range: (2.0, 4.0),
    has_pilings: false,
    has_rubble: false,
    has_open_water: true,
    has_lights: false,
    is_popular: false,
};

const ZONE_3: ZoneProfile = ZoneProfile {
    id: ZoneId::Zone3,
    description: "Northeast quadrant, above the walkway",
    depth_range: (3.0, 6.0),
    has_pilings: true,
    has_rubble: false,
    has_open_water: false,
    has_lights: false,
    is_popular: true,
};

const ZONE_4: ZoneProfile = ZoneProfile {
    id: ZoneId::Zone4,
    description: "Southeast quadrant, below the walkway",
    depth_range: (3.0, 6.0),
    has_pilings: false,
    has_rubble: false,
    has_open_water: false,
    has_lights: true,
    is_popular: true,
};

const ZONE_5: ZoneProfile = ZoneProfile {
    id: ZoneId::Zone5,
    description: "Eastern zone, full width beyond zones 3 and 4",
    depth_range: (5.0, 7.0),
    has_pilings: true,
    has_rubble: false,
    has_open_water: false,
    has_lights: false,
    is_popular: false,
};

/// Look up the static profile for a zone.
pub fn profile(zone: ZoneId) -> ZoneProfile {
    match zone {
        ZoneId::Zone1 => ZONE_1,
        ZoneId::Zone2 => ZONE_2,
        ZoneId::Zone3 => ZONE_3,
        ZoneId::Zone4 => ZONE_4,
        ZoneId::Zone5 => ZONE_5,
    }
}

/// The dock-wide average depth, used by the cold-north-wind shallow-location
/// check (§4.5). All five zone midpoints averaged.
pub fn average_dock_depth() -> f64 {
    ZoneId::ALL.iter().map(|z| profile(*z).mid_depth()).sum::<f64>() / ZoneId::ALL.len() as f64
}

/// Maximum zone depth across the dock, used to cap depth-shift recommendations.
pub const MAX_ZONE_DEPTH_FT: f64 = 7.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_5_has_the_greatest_depth() {
        let deepest = ZoneId::ALL
            .iter()
            .map(|z| profile(*z).mid_depth())
            .fold(0.0_f64, f64::max);
        assert_eq!(deepest, profile(ZoneId::Zone5).mid_depth());
    }

    #[test]
    fn average_depth_is_below_six_feet() {
        assert!(average_dock_depth() < 6.0);
    }
}
