//! Test doubles shared by the unit tests

use heapless::{String, Vec};
use tidekeeper_hal::{FlashError, FlashStorage, StorageKey};

use crate::geometry::{Point, Rect};
use crate::traits::display::{ButtonStyle, TextStyle};
use crate::traits::{
    Color, DisplayDriver, DisplayError, FluidIo, PumpCommand, RawTouch, TouchError, TouchPanel,
};

/// Display that records what was drawn
pub struct RecordingDisplay {
    pub clears: usize,
    pub fills: usize,
    pub texts: Vec<String<32>, 256>,
    pub buttons: Vec<(&'static str, bool), 256>,
    pub markers: Vec<Point, 16>,
    /// Fail every call with `DisplayError::Bus`
    pub fail: bool,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self {
            clears: 0,
            fills: 0,
            texts: Vec::new(),
            buttons: Vec::new(),
            markers: Vec::new(),
            fail: false,
        }
    }

    pub fn has_text(&self, text: &str) -> bool {
        self.texts.iter().any(|t| t.as_str() == text)
    }

    pub fn button_draws(&self, label: &str, pressed: bool) -> usize {
        self.buttons
            .iter()
            .filter(|(l, p)| *l == label && *p == pressed)
            .count()
    }

    fn check(&self) -> Result<(), DisplayError> {
        if self.fail {
            Err(DisplayError::Bus)
        } else {
            Ok(())
        }
    }
}

impl DisplayDriver for RecordingDisplay {
    fn size(&self) -> (u32, u32) {
        (240, 320)
    }

    fn clear(&mut self, _color: Color) -> Result<(), DisplayError> {
        self.check()?;
        self.clears += 1;
        Ok(())
    }

    fn fill_rect(&mut self, _area: Rect, _color: Color) -> Result<(), DisplayError> {
        self.check()?;
        self.fills += 1;
        Ok(())
    }

    fn draw_text(&mut self, _pos: Point, text: &str, _style: TextStyle) -> Result<(), DisplayError> {
        self.check()?;
        let mut s = String::new();
        let _ = s.push_str(text);
        let _ = self.texts.push(s);
        Ok(())
    }

    fn draw_button(
        &mut self,
        _area: Rect,
        style: &ButtonStyle,
        pressed: bool,
    ) -> Result<(), DisplayError> {
        self.check()?;
        let _ = self.buttons.push((style.label, pressed));
        Ok(())
    }

    fn draw_marker(&mut self, center: Point, _size: u32, _color: Color) -> Result<(), DisplayError> {
        self.check()?;
        let _ = self.markers.push(center);
        Ok(())
    }
}

/// Water path with settable floats
pub struct ScriptedIo {
    pub drain: bool,
    pub fill: bool,
    pub bottom: bool,
    pub top: bool,
}

impl ScriptedIo {
    pub fn new() -> Self {
        Self {
            drain: false,
            fill: false,
            bottom: false,
            top: false,
        }
    }
}

impl FluidIo for ScriptedIo {
    fn command(&mut self, command: PumpCommand) {
        self.drain = command == PumpCommand::Drain;
        self.fill = command == PumpCommand::Fill;
    }

    fn drain_running(&self) -> bool {
        self.drain
    }

    fn fill_running(&self) -> bool {
        self.fill
    }

    fn bottom_high(&mut self) -> bool {
        self.bottom
    }

    fn top_high(&mut self) -> bool {
        self.top
    }
}

/// Single-slot storage for the calibration key
pub struct MemStorage {
    pub data: Option<Vec<u8, 64>>,
    pub read_error: Option<FlashError>,
    pub write_error: Option<FlashError>,
    /// Successful writes
    pub writes: usize,
}

impl MemStorage {
    pub fn empty() -> Self {
        Self {
            data: None,
            read_error: None,
            write_error: None,
            writes: 0,
        }
    }

    pub fn with(bytes: &[u8]) -> Self {
        let mut s = Self::empty();
        s.data = Vec::from_slice(bytes).ok();
        s
    }
}

impl FlashStorage for MemStorage {
    async fn read(&mut self, _key: StorageKey, buffer: &mut [u8]) -> Result<usize, FlashError> {
        if let Some(e) = self.read_error {
            return Err(e);
        }
        let data = self.data.as_ref().ok_or(FlashError::NotFound)?;
        if data.len() > buffer.len() {
            return Err(FlashError::BufferTooSmall);
        }
        buffer[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    async fn write(&mut self, _key: StorageKey, data: &[u8]) -> Result<(), FlashError> {
        if let Some(e) = self.write_error {
            return Err(e);
        }
        self.writes += 1;
        self.data = Some(Vec::from_slice(data).map_err(|_| FlashError::Full)?);
        Ok(())
    }

    async fn exists(&mut self, _key: StorageKey) -> bool {
        self.data.is_some()
    }

    async fn erase_all(&mut self) -> Result<(), FlashError> {
        self.data = None;
        Ok(())
    }
}

/// Touch panel that replays a fixed list of samples, then reports no contact
pub struct ScriptedTouch {
    samples: Vec<Result<Option<RawTouch>, TouchError>, 128>,
    next: usize,
}

impl ScriptedTouch {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            next: 0,
        }
    }

    /// Queue a tap: `held` readings at `raw`, then a release
    pub fn tap(&mut self, raw: RawTouch, held: usize) {
        for _ in 0..held {
            let _ = self.samples.push(Ok(Some(raw)));
        }
        let _ = self.samples.push(Ok(None));
    }

    pub fn fail_once(&mut self) {
        let _ = self.samples.push(Err(TouchError::Bus));
    }

    pub fn remaining(&self) -> usize {
        self.samples.len() - self.next
    }
}

impl TouchPanel for ScriptedTouch {
    fn read_raw(&mut self) -> Result<Option<RawTouch>, TouchError> {
        match self.samples.get(self.next) {
            Some(sample) => {
                self.next += 1;
                *sample
            }
            None => Ok(None),
        }
    }
}

/// Delay that returns at once and adds up the requested time
pub struct TallyDelay {
    pub total_ns: u64,
}

impl TallyDelay {
    pub fn new() -> Self {
        Self { total_ns: 0 }
    }

    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl embedded_hal_async::delay::DelayNs for TallyDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}
