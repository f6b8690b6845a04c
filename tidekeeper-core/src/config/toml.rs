//! Simple TOML parser for the device configuration
//!
//! This is a minimal TOML parser that handles only the subset used by
//! device.toml. It does NOT support the full TOML grammar.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - [section] headers
//! - Comments (# ...)
//!
//! NOT supported:
//! - Arrays and inline tables
//! - Multi-line strings
//! - Dotted keys

use super::{DeviceConfig, PinConfig};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Unknown or malformed section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Invalid pin string
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Pumps,
    Sensors,
    Sequencer,
    Ui,
    Defaults,
    Display,
    Touch,
}

/// Parse TOML configuration into DeviceConfig
///
/// Keys that are not present keep their default values; unknown keys are
/// ignored.
pub fn parse_config(input: &str) -> Result<DeviceConfig, ParseError> {
    let mut config = DeviceConfig::new();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1])?;
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(section, key, value, &mut config)?;
        }
    }

    Ok(config)
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "pumps" => Ok(Section::Pumps),
        "sensors" => Ok(Section::Sensors),
        "sequencer" => Ok(Section::Sequencer),
        "ui" => Ok(Section::Ui),
        "defaults" => Ok(Section::Defaults),
        "display" => Ok(Section::Display),
        "touch" => Ok(Section::Touch),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Split `key = value`, dropping any trailing comment
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    let value = match value.find('#') {
        // A '#' inside a quoted string is not a comment
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Strip surrounding quotes
fn parse_string(value: &str) -> &str {
    if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
        &value[1..value.len() - 1]
    } else {
        value
    }
}

/// Parse an integer, allowing `_` digit separators
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    let mut digits: heapless::String<24> = heapless::String::new();
    for c in value.chars().filter(|c| *c != '_') {
        digits.push(c).map_err(|_| ParseError::InvalidValue)?;
    }
    digits.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a pin string like "gpio13", "!gpio14", "^gpio26"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let mut s = parse_string(value);
    let mut inverted = false;
    let mut pull_up = false;

    loop {
        if let Some(rest) = s.strip_prefix('!') {
            inverted = true;
            s = rest;
        } else if let Some(rest) = s.strip_prefix('^') {
            pull_up = true;
            s = rest;
        } else {
            break;
        }
    }

    let pin: u8 = s
        .strip_prefix("gpio")
        .ok_or(ParseError::InvalidPin)?
        .parse()
        .map_err(|_| ParseError::InvalidPin)?;

    Ok(PinConfig {
        pin,
        inverted,
        pull_up,
    })
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    config: &mut DeviceConfig,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {
            if key == "version" {
                config.version = parse_int(value)?;
            }
        }
        Section::Pumps => match key {
            "drain_pin" => config.pumps.drain = parse_pin(value)?,
            "fill_pin" => config.pumps.fill = parse_pin(value)?,
            _ => {}
        },
        Section::Sensors => match key {
            "bottom_pin" => config.sensors.bottom = parse_pin(value)?,
            "top_pin" => config.sensors.top = parse_pin(value)?,
            _ => {}
        },
        Section::Sequencer => {
            let s = &mut config.sequencer;
            match key {
                "poll_interval_ms" => s.poll_interval_ms = parse_int(value)?,
                "settle_ms" => s.settle_ms = parse_int(value)?,
                "drain_timeout_s" => s.drain_timeout_s = parse_int(value)?,
                "fill_timeout_s" => s.fill_timeout_s = parse_int(value)?,
                _ => {}
            }
        }
        Section::Ui => match key {
            "repeat_interval_ms" => config.ui.repeat_interval_ms = parse_int(value)?,
            "touch_poll_ms" => config.ui.touch_poll_ms = parse_int(value)?,
            "max_total_hours" => config.ui.max_total_hours = parse_int(value)?,
            _ => {}
        },
        Section::Defaults => match key {
            "ato_enabled" => config.defaults.ato_enabled = parse_bool(value)?,
            "awc_automatic" => config.defaults.awc_automatic = parse_bool(value)?,
            "total_hours" => config.defaults.total_hours = parse_int(value)?,
            _ => {}
        },
        Section::Display => match key {
            "width" => config.display.width = parse_int(value)?,
            "height" => config.display.height = parse_int(value)?,
            "spi_hz" => config.display.spi_hz = parse_int(value)?,
            _ => {}
        },
        Section::Touch => {
            let t = &mut config.touch;
            match key {
                "pressure_threshold" => t.pressure_threshold = parse_int(value)?,
                "samples" => t.samples = parse_int(value)?,
                "recalibrate" => t.recalibrate = parse_bool(value)?,
                "spi_hz" => t.spi_hz = parse_int(value)?,
                _ => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("gpio13").unwrap();
        assert_eq!(pin.pin, 13);
        assert!(!pin.inverted);
        assert!(!pin.pull_up);

        let pin = parse_pin("!gpio14").unwrap();
        assert_eq!(pin.pin, 14);
        assert!(pin.inverted);

        let pin = parse_pin("\"^!gpio26\"").unwrap();
        assert_eq!(pin.pin, 26);
        assert!(pin.inverted);
        assert!(pin.pull_up);

        assert_eq!(parse_pin("pin5"), Err(ParseError::InvalidPin));
        assert_eq!(parse_pin("gpio"), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_parse_key_value_strips_comments() {
        assert_eq!(
            parse_key_value("settle_ms = 500 # half a second"),
            Some(("settle_ms", "500"))
        );
        assert_eq!(
            parse_key_value("label = \"a # b\""),
            Some(("label", "\"a # b\""))
        );
        assert_eq!(parse_key_value("no_value ="), None);
    }

    #[test]
    fn test_parse_int_separators() {
        assert_eq!(parse_int::<u32>("32_000_000"), Ok(32_000_000));
        assert_eq!(parse_int::<u16>("70000"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_unknown_section_rejected() {
        assert_eq!(
            parse_config("[heater]\nmax_temp = 55\n"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_parse_device_config() {
        let config_str = r#"
version = 1

[pumps]
drain_pin = "!gpio2"
fill_pin = "gpio3"

[sequencer]
settle_ms = 750
drain_timeout_s = 0

[defaults]
awc_automatic = false
total_hours = 30

[touch]
recalibrate = true
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.pumps.drain.pin, 2);
        assert!(config.pumps.drain.inverted);
        assert_eq!(config.pumps.fill.pin, 3);
        assert_eq!(config.sequencer.settle_ms, 750);
        assert_eq!(config.sequencer.drain_timeout_s, 0);
        assert!(!config.defaults.awc_automatic);
        assert_eq!(config.initial_schedule().days(), 1);
        assert_eq!(config.initial_schedule().hours(), 6);
        assert!(config.touch.recalibrate);

        // Untouched sections keep their defaults
        assert_eq!(config.sensors, DeviceConfig::default().sensors);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_embedded_config_parses() {
        let config = parse_config(include_str!("../../../tidekeeper-firmware/device.toml")).unwrap();
        assert_eq!(config, DeviceConfig::default());
    }
}
