//! Presentation formatting for platform links
//!
//! Pure functions, no state: turning raw platform keys from the lookup API
//! into human-readable labels, and ordering platforms for display.

use crate::models::PlatformEntry;

/// Display metadata for a known platform key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDisplay {
    pub display_name: &'static str,
    pub icon_slug: &'static str,
}

/// Fixed display order applied before any remaining platforms
pub const PREFERRED_ORDER: [&str; 8] = [
    "spotify",
    "appleMusic",
    "itunes",
    "amazonMusic",
    "deezer",
    "youtubeMusic",
    "youtube",
    "tidal",
];

/// Literal corrections applied after title-casing
const CORRECTIONS: [(&str, &str); 5] = [
    ("Youtube", "YouTube"),
    ("Applemusic", "Apple Music"),
    ("Amazonmusic", "Amazon Music"),
    ("Googleplay", "Google Play"),
    ("Yandexmusic", "Yandex Music"),
];

/// Static table of known platform keys.
///
/// Unknown keys fall back to [`format_platform_name`].
pub fn platform_display(key: &str) -> Option<PlatformDisplay> {
    let (display_name, icon_slug) = match key {
        "spotify" => ("Spotify", "spotify"),
        "appleMusic" => ("Apple Music", "applemusic"),
        "youtubeMusic" => ("YouTube Music", "youtubemusic"),
        "amazonMusic" => ("Amazon Music", "amazonmusic"),
        "deezer" => ("Deezer", "deezer"),
        "tidal" => ("Tidal", "tidal"),
        "soundcloud" => ("SoundCloud", "soundcloud"),
        "pandora" => ("Pandora", "pandora"),
        "itunes" => ("iTunes", "itunes"),
        "youtube" => ("YouTube", "youtube"),
        "googleplay" => ("Google Play", "googleplay"),
        "napster" => ("Napster", "napster"),
        "yandexmusic" => ("Yandex Music", "yandexmusic"),
        "vk" => ("VK", "vk"),
        "qobuz" => ("Qobuz", "qobuz"),
        "joox" => ("JOOX", "joox"),
        "kkbox" => ("KKBOX", "kkbox"),
        "audiomack" => ("Audiomack", "audiomack"),
        "bandcamp" => ("Bandcamp", "bandcamp"),
        "boomplay" => ("Boomplay", "boomplay"),
        _ => return None,
    };
    Some(PlatformDisplay {
        display_name,
        icon_slug,
    })
}

/// Human-readable label for a platform key, preferring the static table.
pub fn display_label(key: &str) -> String {
    match platform_display(key) {
        Some(info) => info.display_name.to_string(),
        None => format_platform_name(key),
    }
}

/// Format an unmapped camelCase platform key as a display label.
///
/// Inserts a space before each internal capital, title-cases each word,
/// then applies the literal corrections table.
pub fn format_platform_name(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    let mut formatted = spaced
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ");

    for (from, to) in CORRECTIONS {
        formatted = formatted.replace(from, to);
    }

    formatted
}

/// Order platform entries for display.
///
/// Platforms in [`PREFERRED_ORDER`] come first (absent ones skipped);
/// everything else follows in its original mapping order.
pub fn order_platforms(entries: &[PlatformEntry]) -> Vec<&PlatformEntry> {
    let mut ordered = Vec::with_capacity(entries.len());

    for key in PREFERRED_ORDER {
        if let Some(entry) = entries.iter().find(|e| e.platform == key) {
            ordered.push(entry);
        }
    }
    for entry in entries {
        if !PREFERRED_ORDER.contains(&entry.platform.as_str()) {
            ordered.push(entry);
        }
    }

    ordered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(platform: &str) -> PlatformEntry {
        PlatformEntry {
            platform: platform.to_string(),
            url: format!("https://example.com/{platform}"),
            entity_unique_id: None,
        }
    }

    #[test]
    fn test_format_camel_case_keys() {
        assert_eq!(format_platform_name("youtubeMusic"), "YouTube Music");
        assert_eq!(format_platform_name("appleMusic"), "Apple Music");
        assert_eq!(format_platform_name("amazonStore"), "Amazon Store");
    }

    #[test]
    fn test_format_corrections_on_single_word_keys() {
        assert_eq!(format_platform_name("youtube"), "YouTube");
        assert_eq!(format_platform_name("googleplay"), "Google Play");
        assert_eq!(format_platform_name("yandexmusic"), "Yandex Music");
    }

    #[test]
    fn test_format_unknown_key_passthrough() {
        assert_eq!(format_platform_name("spotify"), "Spotify");
        assert_eq!(format_platform_name("someNewService"), "Some New Service");
    }

    #[test]
    fn test_display_label_prefers_table() {
        assert_eq!(display_label("itunes"), "iTunes");
        assert_eq!(display_label("kkbox"), "KKBOX");
        // Not in the table, formatted instead
        assert_eq!(display_label("anghami"), "Anghami");
    }

    #[test]
    fn test_order_preferred_first_then_original_order() {
        let entries = vec![entry("itunes"), entry("spotify"), entry("foo")];
        let ordered: Vec<&str> = order_platforms(&entries)
            .iter()
            .map(|e| e.platform.as_str())
            .collect();
        assert_eq!(ordered, vec!["spotify", "itunes", "foo"]);
    }

    #[test]
    fn test_order_skips_absent_preferred_platforms() {
        let entries = vec![entry("tidal"), entry("deezer")];
        let ordered: Vec<&str> = order_platforms(&entries)
            .iter()
            .map(|e| e.platform.as_str())
            .collect();
        assert_eq!(ordered, vec!["deezer", "tidal"]);
    }

    #[test]
    fn test_order_unknown_platforms_keep_mapping_order() {
        let entries = vec![entry("zulu"), entry("alpha"), entry("spotify")];
        let ordered: Vec<&str> = order_platforms(&entries)
            .iter()
            .map(|e| e.platform.as_str())
            .collect();
        assert_eq!(ordered, vec!["spotify", "zulu", "alpha"]);
    }
}
