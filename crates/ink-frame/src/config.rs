use crate::{ConfigError, CycleSettings};
use ink_base::ViewportSpec;
use ink_image::palette::{MAX_COLORS, MIN_COLORS};
use ink_image::{Color, Palette, TranscodeOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "inkframe.json";
pub const CONFIG_ENV: &str = "INKFRAME_CONFIG";

/// Which panel backend the binary drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverKind {
    Waveshare,
    Png,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PinConfig {
    pub reset: u32,
    pub dc: u32,
    pub busy: u32,
}

impl Default for PinConfig {
    fn default() -> Self {
        Self {
            reset: 17,
            dc: 25,
            busy: 24,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub width: u32,
    pub height: u32,
    pub colors: usize,
    pub palette: Option<Vec<Color>>,
    pub driver: DriverKind,
    pub png_path: PathBuf,
    pub spi_path: PathBuf,
    pub gpio_chip: PathBuf,
    pub pins: PinConfig,
    pub refresh_timeout_secs: u64,
    pub sleep_between: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 400,
            colors: 7,
            palette: None,
            driver: DriverKind::Waveshare,
            png_path: PathBuf::from("inkframe.png"),
            spi_path: PathBuf::from("/dev/spidev0.0"),
            gpio_chip: PathBuf::from("/dev/gpiochip0"),
            pins: PinConfig::default(),
            refresh_timeout_secs: 60,
            sleep_between: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub source: String,
    pub ready_selector: String,
    pub ready_timeout_secs: u64,
    pub chromium_path: PathBuf,
    pub chromium_args: Vec<String>,
    pub poll_interval_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            source: "weather.html".to_string(),
            ready_selector: ".container".to_string(),
            ready_timeout_secs: 30,
            chromium_path: PathBuf::from("/usr/bin/chromium-browser"),
            chromium_args: vec!["--no-sandbox".to_string(), "--disable-setuid-sandbox".to_string()],
            poll_interval_ms: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeConfig {
    pub dither: bool,
    pub background: Color,
}

impl Default for TranscodeConfig {
    fn default() -> Self {
        Self {
            dither: false,
            background: Color::WHITE,
        }
    }
}

/// Everything the `inkframe` binary reads from its JSON config file.
/// Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub update_interval_secs: u64,
    pub log_dir: Option<PathBuf>,
    pub display: DisplayConfig,
    pub render: RenderConfig,
    pub transcode: TranscodeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_interval_secs: 300,
            log_dir: None,
            display: DisplayConfig::default(),
            render: RenderConfig::default(),
            transcode: TranscodeConfig::default(),
        }
    }
}

/// Config file location: first argument, then `$INKFRAME_CONFIG`, then
/// `inkframe.json` in the working directory.
pub fn config_path(mut args: impl Iterator<Item = String>) -> PathBuf {
    args.next()
        .or_else(|| std::env::var(CONFIG_ENV).ok())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl Config {
    /// Read and validate the config at `path`. A missing file means defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(e.into()),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport()
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("display size: {e}")))?;
        if self.update_interval_secs == 0 {
            return Err(ConfigError::Invalid("update_interval_secs must be positive".to_string()));
        }
        if self.render.ready_timeout_secs == 0 {
            return Err(ConfigError::Invalid("render.ready_timeout_secs must be positive".to_string()));
        }
        if self.display.refresh_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "display.refresh_timeout_secs must be positive".to_string(),
            ));
        }
        if self.render.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid("render.poll_interval_ms must be positive".to_string()));
        }
        if !(MIN_COLORS..=MAX_COLORS).contains(&self.display.colors) {
            return Err(ConfigError::Invalid(format!(
                "display.colors must be between {MIN_COLORS} and {MAX_COLORS}, got {}",
                self.display.colors
            )));
        }
        if let Some(palette) = &self.display.palette {
            if palette.len() != self.display.colors {
                return Err(ConfigError::Invalid(format!(
                    "display.palette has {} entries but display.colors is {}",
                    palette.len(),
                    self.display.colors
                )));
            }
        }
        self.palette()?;
        Ok(())
    }

    pub fn viewport(&self) -> ViewportSpec {
        ViewportSpec {
            width: self.display.width,
            height: self.display.height,
        }
    }

    /// The explicit palette if one is configured, otherwise the first
    /// `colors` entries of the built-in ACeP palette.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let palette = match &self.display.palette {
            Some(colors) => Palette::new(colors.clone())?,
            None => Palette::builtin(self.display.colors)?,
        };
        Ok(palette)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render.ready_timeout_secs)
    }

    pub fn refresh_timeout(&self) -> Duration {
        Duration::from_secs(self.display.refresh_timeout_secs)
    }

    pub fn transcode_options(&self) -> TranscodeOptions {
        TranscodeOptions {
            background: self.transcode.background,
            dither: self.transcode.dither,
        }
    }

    pub fn cycle_settings(&self) -> Result<CycleSettings, ConfigError> {
        Ok(CycleSettings {
            viewport: self.viewport(),
            source: self.render.source.clone(),
            ready_selector: self.render.ready_selector.clone(),
            render_timeout: self.render_timeout(),
            palette: self.palette()?,
            transcode: self.transcode_options(),
            sleep_between: self.display.sleep_between,
        })
    }

    #[cfg(feature = "chromium")]
    pub fn chromium_config(&self) -> ink_render::ChromiumConfig {
        ink_render::ChromiumConfig::default()
            .with_executable(self.render.chromium_path.clone())
            .with_args(self.render.chromium_args.clone())
            .with_poll_interval(Duration::from_millis(self.render.poll_interval_ms))
    }

    #[cfg(feature = "waveshare")]
    pub fn waveshare_config(&self) -> ink_display::WaveshareConfig {
        ink_display::WaveshareConfig {
            spi_path: self.display.spi_path.clone(),
            gpio_chip: self.display.gpio_chip.clone(),
            reset_pin: self.display.pins.reset,
            dc_pin: self.display.pins.dc,
            busy_pin: self.display.pins.busy,
            busy_timeout: self.refresh_timeout(),
            ..Default::default()
        }
    }
}
