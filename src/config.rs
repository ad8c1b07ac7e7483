use crate::material::SolidColor;
use crate::params::{ParameterSet, ParamsError, load_params};
use crate::pattern::LayerPolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "mosaic-logo", version, about = "Animated triangle-mosaic wordmark, live in the terminal")]
pub struct Config {
    #[arg(long, value_enum, default_value_t = RendererMode::HalfBlock)]
    pub renderer: RendererMode,

    #[arg(long, value_enum, default_value_t = SurfaceMode::Logo)]
    pub surface: SurfaceMode,

    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    #[arg(long, value_enum, default_value_t = ParamPreset::Footer)]
    pub preset: ParamPreset,

    /// Parameter file (`key = value` per line) applied on top of the preset.
    #[arg(long, value_name = "FILE")]
    pub params: Option<PathBuf>,

    /// Single override, e.g. `--set grid_density=12`. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,

    #[arg(long, value_enum, default_value_t = LayerArg::Capped)]
    pub layers: LayerArg,

    #[arg(long, value_enum, default_value_t = DotColor::Black)]
    pub dot: DotColor,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub adaptive: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,

    /// Write logs here; the terminal itself is busy drawing.
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Preset, then parameter file, then `--set` overrides; all clamped.
    pub fn initial_params(&self) -> Result<ParameterSet, ParamsError> {
        let mut params = self.preset.params();
        if let Some(path) = &self.params {
            params = load_params(path, params)?;
        }
        if !self.overrides.is_empty() {
            params = ParameterSet::from_overrides_text(params, &self.overrides.join("\n"))?;
        }
        Ok(params)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RendererMode {
    #[value(alias = "ansi", alias = "text")]
    Ascii,
    #[value(name = "half-block", alias = "halfblock", alias = "half_block", alias = "hb")]
    HalfBlock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SurfaceMode {
    /// The "SO." wordmark over the page backdrop.
    #[value(alias = "wordmark")]
    Logo,
    /// The raw pattern across the whole frame.
    #[value(alias = "pattern")]
    Full,
}

impl SurfaceMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Logo => Self::Full,
            Self::Full => Self::Logo,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Logo => "logo",
            Self::Full => "full",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParamPreset {
    /// Tuning used by the footer wordmark.
    Footer,
    /// Material defaults.
    #[value(alias = "default")]
    Base,
}

impl ParamPreset {
    pub fn params(self) -> ParameterSet {
        match self {
            Self::Footer => ParameterSet::footer(),
            Self::Base => ParameterSet::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LayerArg {
    Capped,
    #[value(alias = "full")]
    Unbounded,
}

impl From<LayerArg> for LayerPolicy {
    fn from(v: LayerArg) -> Self {
        match v {
            LayerArg::Capped => LayerPolicy::Capped,
            LayerArg::Unbounded => LayerPolicy::Unbounded,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DotColor {
    Black,
    White,
}

impl DotColor {
    pub fn material(self) -> SolidColor {
        match self {
            Self::Black => SolidColor::BLACK,
            Self::White => SolidColor::WHITE,
        }
    }
}
