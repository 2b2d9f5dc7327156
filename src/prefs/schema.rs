//! Typed preference schema.
//!
//! Each preference is a fixed mapping from storage key to a value type, a
//! default, and an encode/decode pair. Values are validated on read; a
//! missing key, a failing store or a value that does not decode yields the
//! default.

use std::collections::BTreeSet;
use tracing::warn;

use super::{PreferenceStore, StorageError};
use crate::model::{RepeatMode, SongId, SortMode};

/// One typed preference.
pub struct Pref<T: 'static> {
    /// Storage key
    pub key: &'static str,
    default: fn() -> T,
    encode: fn(&T) -> String,
    decode: fn(&str) -> Option<T>,
}

impl<T> Pref<T> {
    pub fn default_value(&self) -> T {
        (self.default)()
    }

    pub fn encode(&self, value: &T) -> String {
        (self.encode)(value)
    }

    pub fn decode(&self, raw: &str) -> Option<T> {
        (self.decode)(raw)
    }

    /// Decode a stored value, reporting it as corrupt if it does not decode.
    pub fn parse(&self, raw: String) -> Result<T, StorageError> {
        match self.decode(&raw) {
            Some(value) => Ok(value),
            None => Err(StorageError::Corrupt {
                key: self.key.to_string(),
                value: raw,
            }),
        }
    }

    /// Read the preference, falling back to the default on any failure.
    pub fn read<P: PreferenceStore + ?Sized>(&self, store: &P) -> T {
        match store.get(self.key) {
            Ok(Some(raw)) => self.parse(raw).unwrap_or_else(|e| {
                warn!(target: "prefs", error = %e, "Using default");
                self.default_value()
            }),
            Ok(None) => self.default_value(),
            Err(e) => {
                warn!(target: "prefs", key = self.key, error = %e, "Failed to read preference, using default");
                self.default_value()
            }
        }
    }

    /// Persist the preference. Returns whether the write succeeded.
    pub fn write<P: PreferenceStore + ?Sized>(&self, store: &mut P, value: &T) -> bool {
        match store.set(self.key, &self.encode(value)) {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "prefs", key = self.key, error = %e, "Failed to save preference");
                false
            }
        }
    }
}

pub const FAVORITES: Pref<BTreeSet<SongId>> = Pref {
    key: "musebox-favorites",
    default: BTreeSet::new,
    encode: encode_favorites,
    decode: decode_favorites,
};

pub const VOLUME: Pref<f32> = Pref {
    key: "musebox-volume",
    default: default_volume,
    encode: encode_display,
    decode: decode_volume,
};

pub const HUE: Pref<u16> = Pref {
    key: "musebox-hue",
    default: default_hue,
    encode: encode_display,
    decode: decode_hue,
};

pub const SHUFFLE: Pref<bool> = Pref {
    key: "musebox-shuffle",
    default: default_false,
    encode: encode_display,
    decode: decode_bool,
};

pub const REPEAT: Pref<RepeatMode> = Pref {
    key: "musebox-repeat",
    default: RepeatMode::default,
    encode: encode_display,
    decode: decode_parse,
};

pub const SORT: Pref<SortMode> = Pref {
    key: "musebox-sort",
    default: SortMode::default,
    encode: encode_display,
    decode: decode_parse,
};

pub const VISUALIZATION: Pref<bool> = Pref {
    key: "musebox-sinewave",
    default: default_true,
    encode: encode_display,
    decode: decode_bool,
};

pub const DEFAULT_VOLUME: f32 = 0.75;
pub const DEFAULT_HUE: u16 = 260;
pub const MAX_HUE: u16 = 360;

fn default_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_hue() -> u16 {
    DEFAULT_HUE
}

fn default_false() -> bool {
    false
}

fn default_true() -> bool {
    true
}

fn encode_display<T: std::fmt::Display>(value: &T) -> String {
    value.to_string()
}

fn decode_parse<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

fn decode_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

fn decode_volume(raw: &str) -> Option<f32> {
    let volume: f32 = raw.trim().parse().ok()?;
    (volume.is_finite() && (0.0..=1.0).contains(&volume)).then_some(volume)
}

fn decode_hue(raw: &str) -> Option<u16> {
    let hue: u16 = raw.trim().parse().ok()?;
    (hue <= MAX_HUE).then_some(hue)
}

fn encode_favorites(favorites: &BTreeSet<SongId>) -> String {
    serde_json::to_string(favorites).unwrap_or_else(|_| "[]".to_string())
}

fn decode_favorites(raw: &str) -> Option<BTreeSet<SongId>> {
    serde_json::from_str::<Vec<SongId>>(raw)
        .ok()
        .map(|ids| ids.into_iter().collect())
}

/// Snapshot of every preference, as loaded at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Preferences {
    pub favorites: BTreeSet<SongId>,
    pub volume: f32,
    pub hue: u16,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    pub sort: SortMode,
    pub visualization: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            favorites: FAVORITES.default_value(),
            volume: VOLUME.default_value(),
            hue: HUE.default_value(),
            shuffle: SHUFFLE.default_value(),
            repeat: REPEAT.default_value(),
            sort: SORT.default_value(),
            visualization: VISUALIZATION.default_value(),
        }
    }
}

impl Preferences {
    /// Load every preference from `store`. Never fails.
    pub fn load<P: PreferenceStore + ?Sized>(store: &P) -> Self {
        Self {
            favorites: FAVORITES.read(store),
            volume: VOLUME.read(store),
            hue: HUE.read(store),
            shuffle: SHUFFLE.read(store),
            repeat: REPEAT.read(store),
            sort: SORT.read(store),
            visualization: VISUALIZATION.read(store),
        }
    }
}
