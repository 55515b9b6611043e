//! Core options exposed to the frontend as libretro variables.

use chip8_core::{clamp_instructions_per_frame, CoreConfig, Palette, Quirks};

pub const INSTRUCTIONS_PER_FRAME_KEY: &str = "chip8_instructions_per_frame";
pub const QUIRKS_KEY: &str = "chip8_quirks";
pub const PALETTE_KEY: &str = "chip8_palette";

/// One frontend-visible option: key, label and allowed values (first is
/// the default).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OptionDefinition {
    pub key: &'static str,
    pub label: &'static str,
    pub values: &'static [&'static str],
}

impl OptionDefinition {
    /// Value string in the `Label; a|b|c` form `SET_VARIABLES` expects.
    #[must_use]
    pub fn variable_value(&self) -> String {
        format!("{}; {}", self.label, self.values.join("|"))
    }
}

pub const OPTION_DEFINITIONS: [OptionDefinition; 3] = [
    OptionDefinition {
        key: INSTRUCTIONS_PER_FRAME_KEY,
        label: "Instructions per frame",
        values: &["11", "5", "8", "15", "20", "30", "50", "100"],
    },
    OptionDefinition {
        key: QUIRKS_KEY,
        label: "Interpreter quirks",
        values: &["modern", "cosmac", "schip"],
    },
    OptionDefinition {
        key: PALETTE_KEY,
        label: "Palette",
        values: &["white", "green", "amber"],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QuirksPreset {
    #[default]
    Modern,
    Cosmac,
    Schip,
}

impl QuirksPreset {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "modern" => Some(Self::Modern),
            "cosmac" => Some(Self::Cosmac),
            "schip" => Some(Self::Schip),
            _ => None,
        }
    }

    #[must_use]
    pub const fn quirks(self) -> Quirks {
        match self {
            Self::Modern => Quirks::modern(),
            Self::Cosmac => Quirks::cosmac(),
            Self::Schip => Quirks::schip(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PaletteChoice {
    #[default]
    White,
    Green,
    Amber,
}

impl PaletteChoice {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "white" => Some(Self::White),
            "green" => Some(Self::Green),
            "amber" => Some(Self::Amber),
            _ => None,
        }
    }

    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Self::White => Palette::WHITE,
            Self::Green => Palette::GREEN,
            Self::Amber => Palette::AMBER,
        }
    }
}

/// Current values of every core option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoreOptions {
    pub instructions_per_frame: u32,
    pub quirks: QuirksPreset,
    pub palette: PaletteChoice,
}

impl Default for CoreOptions {
    fn default() -> Self {
        Self {
            instructions_per_frame: chip8_core::DEFAULT_INSTRUCTIONS_PER_FRAME,
            quirks: QuirksPreset::Modern,
            palette: PaletteChoice::White,
        }
    }
}

impl CoreOptions {
    /// Applies one variable. Unknown keys and unparsable values are logged
    /// and leave the options unchanged; returns whether anything was applied.
    pub fn set(&mut self, key: &str, value: &str) -> bool {
        let applied = match key {
            INSTRUCTIONS_PER_FRAME_KEY => value.parse::<u32>().ok().map(|ipf| {
                self.instructions_per_frame = clamp_instructions_per_frame(ipf);
            }),
            QUIRKS_KEY => QuirksPreset::parse(value).map(|quirks| self.quirks = quirks),
            PALETTE_KEY => PaletteChoice::parse(value).map(|palette| self.palette = palette),
            _ => None,
        };
        if applied.is_none() {
            log::warn!("ignoring core option {key}={value}");
        }
        applied.is_some()
    }

    /// Copies the emulation-affecting options into `config`.
    pub const fn apply_to(&self, config: &mut CoreConfig) {
        config.instructions_per_frame = self.instructions_per_frame;
        config.quirks = self.quirks.quirks();
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CoreOptions, PaletteChoice, QuirksPreset, INSTRUCTIONS_PER_FRAME_KEY, OPTION_DEFINITIONS,
        PALETTE_KEY, QUIRKS_KEY,
    };
    use chip8_core::{CoreConfig, Quirks};

    #[test]
    fn defaults_match_first_listed_value() {
        let options = CoreOptions::default();
        assert_eq!(OPTION_DEFINITIONS[0].values[0], options.instructions_per_frame.to_string());
        assert_eq!(OPTION_DEFINITIONS[1].values[0], "modern");
        assert_eq!(OPTION_DEFINITIONS[2].values[0], "white");
    }

    #[test]
    fn variable_value_uses_libretro_layout() {
        assert_eq!(
            OPTION_DEFINITIONS[1].variable_value(),
            "Interpreter quirks; modern|cosmac|schip"
        );
    }

    #[test]
    fn set_parses_known_values_and_rejects_others() {
        let mut options = CoreOptions::default();
        assert!(options.set(INSTRUCTIONS_PER_FRAME_KEY, "30"));
        assert!(options.set(QUIRKS_KEY, "cosmac"));
        assert!(options.set(PALETTE_KEY, "amber"));
        assert!(!options.set(PALETTE_KEY, "purple"));
        assert!(!options.set("chip8_unknown", "1"));
        assert!(!options.set(INSTRUCTIONS_PER_FRAME_KEY, "fast"));

        assert_eq!(options.instructions_per_frame, 30);
        assert_eq!(options.quirks, QuirksPreset::Cosmac);
        assert_eq!(options.palette, PaletteChoice::Amber);
    }

    #[test]
    fn apply_to_updates_speed_and_quirks() {
        let mut options = CoreOptions::default();
        options.set(INSTRUCTIONS_PER_FRAME_KEY, "100");
        options.set(QUIRKS_KEY, "cosmac");
        let mut config = CoreConfig::default();
        options.apply_to(&mut config);
        assert_eq!(config.instructions_per_frame, 100);
        assert_eq!(config.quirks, Quirks::cosmac());

        options.set(QUIRKS_KEY, "schip");
        options.apply_to(&mut config);
        assert!(config.quirks.jump_uses_vx);
    }
}
