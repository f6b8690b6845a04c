//! Build script for tidekeeper-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates device.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// GPIOs wired to the SPI buses on the board
const BUS_PINS: [i64; 6] = [10, 11, 12, 16, 18, 19];

/// Fixed panel and touch control lines
const PANEL_PINS: [i64; 5] = [9, 17, 20, 21, 22];

/// Largest schedule the UI can represent (99 days 23 hours)
const MAX_TOTAL_HOURS: i64 = 2399;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate device.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=device.toml");

    let config_path = Path::new("device.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: device.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds device.toml as its default configuration.   ║\n\
            ║  Please create one in the tidekeeper-firmware directory.         ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read device.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in device.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_pins(&config);
    validate_timing(&config);
    validate_defaults(&config);
    validate_panel(&config);

    println!("cargo:warning=device.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a boxed list of errors
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Parse "gpioN" with optional `!`/`^` modifiers into the pin number
fn pin_number(value: &str) -> Option<i64> {
    let digits = value
        .trim_start_matches(|c: char| c == '!' || c == '^')
        .strip_prefix("gpio")?;
    digits.parse().ok()
}

/// Look up an integer `section.key`
fn int(config: &toml::Value, section: &str, key: &str) -> Option<i64> {
    config.get(section)?.get(key)?.as_integer()
}

/// Validate pump and float switch pins
fn validate_pins(config: &toml::Value) {
    let mut errors = Vec::new();
    let mut used: Vec<(i64, String)> = Vec::new();

    for (section, keys) in [
        ("pumps", ["drain_pin", "fill_pin"]),
        ("sensors", ["bottom_pin", "top_pin"]),
    ] {
        let Some(table) = config.get(section).and_then(|t| t.as_table()) else {
            errors.push(format!("Missing [{}] section", section));
            continue;
        };

        for key in keys {
            let Some(value) = table.get(key) else {
                errors.push(format!("[{}] missing '{}'", section, key));
                continue;
            };
            let Some(pin) = value.as_str().and_then(pin_number) else {
                errors.push(format!("[{}] {} must look like \"gpioN\"", section, key));
                continue;
            };

            let name = format!("{}.{}", section, key);
            if !(0..30).contains(&pin) {
                errors.push(format!("{} gpio{} out of range (0-29)", name, pin));
            } else if BUS_PINS.contains(&pin) {
                errors.push(format!("{} gpio{} is an SPI bus pin", name, pin));
            } else if PANEL_PINS.contains(&pin) {
                errors.push(format!("{} gpio{} drives the panel", name, pin));
            } else if let Some((_, other)) = used.iter().find(|(p, _)| *p == pin) {
                errors.push(format!("{} gpio{} already used by {}", name, pin, other));
            }
            used.push((pin, name));
        }
    }

    report("Invalid pin assignment in device.toml", &errors);
}

/// Validate sequencer and UI intervals
fn validate_timing(config: &toml::Value) {
    let mut errors = Vec::new();

    for (section, key) in [
        ("sequencer", "poll_interval_ms"),
        ("ui", "repeat_interval_ms"),
        ("ui", "touch_poll_ms"),
    ] {
        if let Some(v) = int(config, section, key) {
            if v <= 0 {
                errors.push(format!("[{}] {} must be greater than 0", section, key));
            }
        }
    }

    for (section, key) in [
        ("sequencer", "settle_ms"),
        ("sequencer", "drain_timeout_s"),
        ("sequencer", "fill_timeout_s"),
    ] {
        if let Some(v) = int(config, section, key) {
            if v < 0 {
                errors.push(format!("[{}] {} cannot be negative", section, key));
            }
        }
    }

    report("Invalid timing in device.toml", &errors);
}

/// Validate the power-on schedule against the editor bound
fn validate_defaults(config: &toml::Value) {
    let mut errors = Vec::new();

    let max = int(config, "ui", "max_total_hours").unwrap_or(MAX_TOTAL_HOURS);
    if !(0..=MAX_TOTAL_HOURS).contains(&max) {
        errors.push(format!("[ui] max_total_hours must be 0-{}", MAX_TOTAL_HOURS));
    }

    if let Some(total) = int(config, "defaults", "total_hours") {
        if total < 0 || total > max {
            errors.push(format!("[defaults] total_hours must be 0-{}", max));
        }
    }

    report("Invalid defaults in device.toml", &errors);
}

/// Validate panel dimensions
fn validate_panel(config: &toml::Value) {
    let mut errors = Vec::new();

    for key in ["width", "height"] {
        if let Some(v) = int(config, "display", key) {
            if !(1..=u16::MAX as i64).contains(&v) {
                errors.push(format!("[display] {} must be 1-65535", key));
            }
        }
    }

    if let Some(samples) = int(config, "touch", "samples") {
        if !(1..=32).contains(&samples) {
            errors.push("[touch] samples must be 1-32".to_string());
        }
    }

    report("Invalid panel configuration in device.toml", &errors);
}
