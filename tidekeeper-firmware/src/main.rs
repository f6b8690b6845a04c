//! Tidekeeper - Aquarium Water Controller Firmware
//!
//! Main firmware binary for RP2040-based aquarium controllers. Runs a
//! drain/refill water change against two float switches and exposes the
//! ATO/AWC flags and the change interval on an SPI touch panel.

#![no_std]
#![no_main]

extern crate alloc;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Timer};
use embedded_alloc::LlffHeap as Heap;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tidekeeper_core::config::DeviceConfig;
use tidekeeper_drivers::display::{GraphicsDisplay, Ili9341};
use tidekeeper_drivers::touch::{Xpt2046, Xpt2046Config};
use tidekeeper_hal_rp2040::flash::Rp2040FlashStorage;
use tidekeeper_hal_rp2040::pins::PinBank;

use crate::config::{calibrate_touch, parse_config, ConfigPersistence};

mod board;
mod config;
mod tasks;

// Heap allocator for config loading
#[global_allocator]
static HEAP: Heap = Heap::empty();

// Heap size: 8KB
const HEAP_SIZE: usize = 8 * 1024;

/// Embedded default configuration (compiled into firmware)
/// Edit device.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../device.toml");

// Configuration must live forever for the controller task
static DEVICE_CONFIG: StaticCell<DeviceConfig> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Tidekeeper firmware starting...");

    init_heap();

    let p = embassy_rp::init(Default::default());
    let (mut bank, board) = PinBank::from_peripherals(p);
    info!("Peripherals initialized");

    // Load configuration from flash (or use embedded defaults)
    let storage = Rp2040FlashStorage::new(board.flash, board.dma_ch0);
    let (config, mut storage) = load_config(storage).await;
    let config: &'static DeviceConfig = DEVICE_CONFIG.init(config);

    // Pumps come up switched off before anything else happens
    let station = match board::fluid_station(&mut bank, &config.pumps, &config.sensors) {
        Ok(station) => station,
        Err(e) => {
            // Held for as long as the firmware is parked
            let _parked = e.parked;
            halt("Pump/float pins unavailable", e.error).await
        }
    };
    info!(
        "Pumps on gpio{}/gpio{} forced off",
        config.pumps.drain.pin, config.pumps.fill.pin
    );

    let panel = match board::panel_pins(&mut bank) {
        Ok(panel) => panel,
        Err(e) => halt("Panel pins unavailable", e).await,
    };

    // Display on SPI0
    let mut lcd_spi_config = spi::Config::default();
    lcd_spi_config.frequency = config.display.spi_hz;
    let lcd_spi = Spi::new_blocking(
        board.spi0,
        board.spi0_clk,
        board.spi0_mosi,
        board.spi0_miso,
        lcd_spi_config,
    );

    let mut lcd = Ili9341::new(
        lcd_spi,
        panel.lcd_cs,
        panel.lcd_dc,
        panel.lcd_rst,
        config.display.width,
        config.display.height,
    );
    if let Err(e) = lcd.init(&mut Delay) {
        error!("Display init failed: {:?}", e);
    }
    let mut display = GraphicsDisplay::new(lcd);
    info!(
        "Display initialized ({}x{})",
        config.display.width, config.display.height
    );

    // Touch controller on SPI1
    let mut touch_spi_config = spi::Config::default();
    touch_spi_config.frequency = config.touch.spi_hz;
    let touch_spi = Spi::new_blocking(
        board.spi1,
        board.spi1_clk,
        board.spi1_mosi,
        board.spi1_miso,
        touch_spi_config,
    );
    let mut touch = Xpt2046::new(touch_spi, panel.touch_cs, Xpt2046Config::from(&config.touch));
    info!("Touch controller initialized");

    let calibration = calibrate_touch(
        &mut storage,
        &mut display,
        &mut touch,
        config.touch.recalibrate,
        config.display.width,
        config.display.height,
    )
    .await;

    spawner
        .spawn(tasks::tick_task(config.ui.touch_poll_ms))
        .unwrap();
    spawner
        .spawn(tasks::controller_task(
            config,
            display,
            touch,
            station,
            calibration,
        ))
        .unwrap();

    info!("All tasks spawned, firmware running");

    // Backlight stays on for as long as this task holds the pin
    let _backlight = panel.backlight;
    loop {
        Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Initialize the heap allocator
fn init_heap() {
    use core::mem::MaybeUninit;
    static mut HEAP_MEM: [MaybeUninit<u8>; HEAP_SIZE] = [MaybeUninit::uninit(); HEAP_SIZE];
    #[allow(static_mut_refs)]
    unsafe {
        HEAP.init(HEAP_MEM.as_ptr() as usize, HEAP_SIZE)
    }
}

/// Park the firmware after a fatal wiring error
///
/// Pins that were already claimed stay at their "off" levels.
async fn halt<E: Format>(reason: &str, detail: E) -> ! {
    loop {
        error!("{}: {:?}; controller halted", reason, detail);
        Timer::after_secs(10).await;
    }
}

/// Load configuration from flash storage
///
/// Returns the embedded default configuration if flash holds nothing
/// usable, along with the storage for calibration persistence.
async fn load_config(
    storage: Rp2040FlashStorage<'static>,
) -> (DeviceConfig, Rp2040FlashStorage<'static>) {
    let mut persistence = ConfigPersistence::new(storage);

    let config = match persistence.load().await {
        Ok(config) => {
            info!("Loaded configuration from flash");
            config
        }
        Err(e) => {
            info!(
                "No valid configuration in flash ({:?}), using embedded defaults",
                e
            );
            create_default_config()
        }
    };

    (config, persistence.into_storage())
}

/// Parse the device.toml embedded at compile time
///
/// Used when no flash config exists.
fn create_default_config() -> DeviceConfig {
    match parse_config(EMBEDDED_CONFIG).map(config::loader::check) {
        Ok(Ok(config)) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Ok(Err(e)) => {
            error!("Embedded config rejected: {:?}", e);
            error!("Using built-in defaults");
            DeviceConfig::default()
        }
        Err(e) => {
            // build.rs validates device.toml, so this is a last resort
            error!("Failed to parse embedded config: {:?}", e);
            error!("Using built-in defaults");
            DeviceConfig::default()
        }
    }
}
