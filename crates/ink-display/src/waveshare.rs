//! Waveshare 4.01" 7-color ACeP e-paper (640x400, 4 bits per pixel).

use crate::{DisplayDriver, DisplayError};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal::spi::SpiDevice;
use ink_image::PanelFrame;
use std::time::{Duration, Instant};

pub const WIDTH: u32 = 640;
pub const HEIGHT: u32 = 400;
pub const BITS_PER_PIXEL: u8 = 4;

// controller commands
const PANEL_SETTING: u8 = 0x00;
const POWER_SETTING: u8 = 0x01;
const POWER_OFF: u8 = 0x02;
const POWER_OFF_SEQUENCE: u8 = 0x03;
const POWER_ON: u8 = 0x04;
const BOOSTER_SOFT_START: u8 = 0x06;
const DEEP_SLEEP: u8 = 0x07;
const DATA_START: u8 = 0x10;
const DISPLAY_REFRESH: u8 = 0x12;
const TEMPERATURE_SENSOR: u8 = 0x41;
const VCOM_DATA_INTERVAL: u8 = 0x50;
const TCON_SETTING: u8 = 0x60;
const RESOLUTION: u8 = 0x61;
const POWER_SAVING: u8 = 0xE3;

const DEEP_SLEEP_CHECK: u8 = 0xA5;

// spidev refuses transfers above its buffer size (4096 by default)
const SPI_CHUNK: usize = 4096;

// how often the busy line is sampled
const BUSY_POLL_MS: u32 = 10;

const INIT_SEQUENCE: &[(u8, &[u8])] = &[
    (PANEL_SETTING, &[0x2F, 0x00]),
    (POWER_SETTING, &[0x37, 0x00, 0x05, 0x05]),
    (POWER_OFF_SEQUENCE, &[0x00]),
    (BOOSTER_SOFT_START, &[0xC7, 0xC7, 0x1D]),
    (TEMPERATURE_SENSOR, &[0x00]),
    (VCOM_DATA_INTERVAL, &[0x37]),
    (TCON_SETTING, &[0x22]),
    (RESOLUTION, &[0x02, 0x80, 0x01, 0x90]),
    (POWER_SAVING, &[0xAA]),
];

/// Driver for the panel over any `embedded-hal` SPI device and pins.
///
/// The busy line reads low while the controller works. Coming out of deep
/// sleep needs a hardware reset, which `write` does on its own.
pub struct Epd4in01f<SPI, DC, RST, BUSY, DELAY> {
    spi: SPI,
    dc: DC,
    rst: RST,
    busy: BUSY,
    delay: DELAY,
    busy_timeout: Duration,
    asleep: bool,
}

fn io<E: std::fmt::Debug>(what: &'static str) -> impl FnOnce(E) -> DisplayError {
    move |e| DisplayError::Io(format!("{what}: {e:?}"))
}

impl<SPI, DC, RST, BUSY, DELAY> Epd4in01f<SPI, DC, RST, BUSY, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin,
    BUSY: InputPin,
    DELAY: DelayNs,
{
    pub fn new(spi: SPI, dc: DC, rst: RST, busy: BUSY, delay: DELAY, busy_timeout: Duration) -> Self {
        Self {
            spi,
            dc,
            rst,
            busy,
            delay,
            busy_timeout,
            asleep: false,
        }
    }

    /// Hand back the bus and pins.
    pub fn release(self) -> (SPI, DC, RST, BUSY, DELAY) {
        (self.spi, self.dc, self.rst, self.busy, self.delay)
    }

    fn reset(&mut self) -> Result<(), DisplayError> {
        self.rst.set_high().map_err(io("reset pin"))?;
        self.delay.delay_ms(200);
        self.rst.set_low().map_err(io("reset pin"))?;
        self.delay.delay_ms(2);
        self.rst.set_high().map_err(io("reset pin"))?;
        self.delay.delay_ms(200);
        Ok(())
    }

    fn command(&mut self, command: u8) -> Result<(), DisplayError> {
        self.dc.set_low().map_err(io("dc pin"))?;
        self.spi.write(&[command]).map_err(io("spi"))
    }

    fn data(&mut self, data: &[u8]) -> Result<(), DisplayError> {
        self.dc.set_high().map_err(io("dc pin"))?;
        for chunk in data.chunks(SPI_CHUNK) {
            self.spi.write(chunk).map_err(io("spi"))?;
        }
        Ok(())
    }

    fn send(&mut self, command: u8, data: &[u8]) -> Result<(), DisplayError> {
        self.command(command)?;
        if !data.is_empty() {
            self.data(data)?;
        }
        Ok(())
    }

    fn wait_until(&mut self, idle_high: bool) -> Result<(), DisplayError> {
        let started = Instant::now();
        loop {
            let high = self.busy.is_high().map_err(io("busy pin"))?;
            if high == idle_high {
                return Ok(());
            }
            if started.elapsed() >= self.busy_timeout {
                return Err(DisplayError::BusyTimeout(self.busy_timeout));
            }
            self.delay.delay_ms(BUSY_POLL_MS);
        }
    }

    fn configure(&mut self) -> Result<(), DisplayError> {
        self.reset()?;
        self.wait_until(true)?;
        for (command, data) in INIT_SEQUENCE {
            self.send(*command, data)?;
        }
        self.delay.delay_ms(100);
        self.send(VCOM_DATA_INTERVAL, &[0x37])?;
        self.asleep = false;
        Ok(())
    }
}

impl<SPI, DC, RST, BUSY, DELAY> DisplayDriver for Epd4in01f<SPI, DC, RST, BUSY, DELAY>
where
    SPI: SpiDevice + Send,
    DC: OutputPin + Send,
    RST: OutputPin + Send,
    BUSY: InputPin + Send,
    DELAY: DelayNs + Send,
{
    fn init(&mut self) -> Result<(), DisplayError> {
        self.configure()
    }

    fn write(&mut self, frame: &PanelFrame) -> Result<(), DisplayError> {
        let got = (frame.width(), frame.height(), frame.bits_per_pixel());
        if got != (WIDTH, HEIGHT, BITS_PER_PIXEL) {
            return Err(DisplayError::FrameMismatch {
                expected: (WIDTH, HEIGHT, BITS_PER_PIXEL),
                got,
            });
        }
        if self.asleep {
            self.configure()?;
        }
        self.send(RESOLUTION, &[0x02, 0x80, 0x01, 0x90])?;
        self.send(DATA_START, frame.data())?;
        self.send(POWER_ON, &[])?;
        self.wait_until(true)?;
        self.send(DISPLAY_REFRESH, &[])?;
        self.wait_until(true)?;
        self.send(POWER_OFF, &[])?;
        self.wait_until(false)?;
        self.delay.delay_ms(200);
        Ok(())
    }

    fn power_down(&mut self) -> Result<(), DisplayError> {
        self.delay.delay_ms(100);
        self.send(DEEP_SLEEP, &[DEEP_SLEEP_CHECK])?;
        self.delay.delay_ms(100);
        self.rst.set_low().map_err(io("reset pin"))?;
        self.asleep = true;
        Ok(())
    }
}

#[cfg(feature = "waveshare")]
pub use linux::{LinuxEpd4in01f, WaveshareConfig};

#[cfg(feature = "waveshare")]
mod linux {
    use super::Epd4in01f;
    use crate::DisplayError;
    use linux_embedded_hal::gpio_cdev::{Chip, LineRequestFlags};
    use linux_embedded_hal::spidev::{SpiModeFlags, SpidevOptions};
    use linux_embedded_hal::{CdevPin, Delay, SpidevDevice};
    use std::path::PathBuf;
    use std::time::Duration;

    pub type LinuxEpd4in01f = Epd4in01f<SpidevDevice, CdevPin, CdevPin, CdevPin, Delay>;

    /// Wiring of the panel HAT on a Linux board.
    #[derive(Clone, Debug)]
    pub struct WaveshareConfig {
        pub spi_path: PathBuf,
        pub gpio_chip: PathBuf,
        pub reset_pin: u32,
        pub dc_pin: u32,
        pub busy_pin: u32,
        pub spi_speed_hz: u32,
        pub busy_timeout: Duration,
    }

    impl Default for WaveshareConfig {
        fn default() -> Self {
            Self {
                spi_path: PathBuf::from("/dev/spidev0.0"),
                gpio_chip: PathBuf::from("/dev/gpiochip0"),
                reset_pin: 17,
                dc_pin: 25,
                busy_pin: 24,
                spi_speed_hz: 4_000_000,
                busy_timeout: Duration::from_secs(60),
            }
        }
    }

    fn device<E: std::fmt::Display>(what: &'static str) -> impl FnOnce(E) -> DisplayError {
        move |e| DisplayError::Io(format!("{what}: {e}"))
    }

    impl LinuxEpd4in01f {
        /// Claim the SPI device and GPIO lines.
        pub fn open(config: &WaveshareConfig) -> Result<Self, DisplayError> {
            let mut spi = SpidevDevice::open(&config.spi_path).map_err(device("opening SPI device"))?;
            let options = SpidevOptions::new()
                .bits_per_word(8)
                .max_speed_hz(config.spi_speed_hz)
                .mode(SpiModeFlags::SPI_MODE_0)
                .build();
            spi.configure(&options).map_err(device("configuring SPI"))?;

            let mut chip = Chip::new(&config.gpio_chip).map_err(device("opening GPIO chip"))?;
            let mut line = |offset: u32, flags: LineRequestFlags, default: u8, consumer: &str| {
                let handle = chip
                    .get_line(offset)
                    .and_then(|l| l.request(flags, default, consumer))
                    .map_err(device("requesting GPIO line"))?;
                CdevPin::new(handle).map_err(device("creating GPIO pin"))
            };
            let rst = line(config.reset_pin, LineRequestFlags::OUTPUT, 1, "inkframe-rst")?;
            let dc = line(config.dc_pin, LineRequestFlags::OUTPUT, 0, "inkframe-dc")?;
            let busy = line(config.busy_pin, LineRequestFlags::INPUT, 0, "inkframe-busy")?;

            Ok(Epd4in01f::new(spi, dc, rst, busy, Delay {}, config.busy_timeout))
        }
    }
}
