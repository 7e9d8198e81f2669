//! Static sound catalog.
//!
//! Maps content tags to asset URLs served next to the page. The sense half
//! of an ambient tag selects the bed; the age half travels along for
//! diagnostics only.

pub fn ambient_url(sense: &str) -> Option<&'static str> {
    let url = match sense {
        "city_traffic" => "/audio/ambient/city_traffic.mp3",
        "panic" => "/audio/ambient/panic_drone.mp3",
        "battle" => "/audio/ambient/battle_field.mp3",
        "storm" => "/audio/ambient/storm.mp3",
        "harbor" => "/audio/ambient/harbor.mp3",
        _ => return None,
    };
    Some(url)
}

/// Entity kinds are matched case-insensitively; content files are not
/// consistent about casing.
pub fn entity_url(kind: &str) -> Option<&'static str> {
    let url = match kind.to_ascii_lowercase().as_str() {
        "vehicle" => "/audio/sfx/vehicle.mp3",
        "vehicle_sound" => "/audio/sfx/vehicle_horn.mp3",
        "weather" => "/audio/sfx/weather.mp3",
        "animal_sound" => "/audio/sfx/animal.mp3",
        "emotion" => "/audio/sfx/heartbeat.mp3",
        "dino" => "/audio/sfx/dino_roar.mp3",
        _ => return None,
    };
    Some(url)
}
