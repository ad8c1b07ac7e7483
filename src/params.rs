use std::fmt;
use std::path::{Path, PathBuf};

/// One frame's worth of tunables. Copied into every frame; never mutated
/// while a frame is being shaded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSet {
    pub num_layers: u32,
    pub speed: f32,
    pub triangle_size: f32,
    pub color_intensity: f32,
    pub opacity: f32,
    pub rotation_speed: f32,
    pub scale_variation: f32,
    pub grid_density: f32,
    pub radius_variation: f32,
    pub size_variation: f32,
    pub movement_complexity: f32,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            num_layers: 12,
            speed: 0.2,
            triangle_size: 0.06,
            color_intensity: 1.4,
            opacity: 1.0,
            rotation_speed: 0.3,
            scale_variation: 0.8,
            grid_density: 8.0,
            radius_variation: 0.4,
            size_variation: 0.6,
            movement_complexity: 1.0,
        }
    }
}

impl ParameterSet {
    /// The tuning the footer logo runs with: bigger, faster, denser triangles.
    pub fn footer() -> Self {
        Self {
            num_layers: 12,
            speed: 0.56,
            triangle_size: 0.16,
            color_intensity: 1.0,
            rotation_speed: 2.0,
            scale_variation: 0.15,
            grid_density: 22.0,
            ..Self::default()
        }
    }

    pub fn get(&self, key: ParamKey) -> f32 {
        match key {
            ParamKey::NumLayers => self.num_layers as f32,
            ParamKey::Speed => self.speed,
            ParamKey::TriangleSize => self.triangle_size,
            ParamKey::ColorIntensity => self.color_intensity,
            ParamKey::Opacity => self.opacity,
            ParamKey::RotationSpeed => self.rotation_speed,
            ParamKey::ScaleVariation => self.scale_variation,
            ParamKey::GridDensity => self.grid_density,
            ParamKey::RadiusVariation => self.radius_variation,
            ParamKey::SizeVariation => self.size_variation,
            ParamKey::MovementComplexity => self.movement_complexity,
        }
    }

    /// Raw write, no clamping. Range enforcement belongs to [`ParameterStore`].
    pub fn put(&mut self, key: ParamKey, v: f32) {
        match key {
            ParamKey::NumLayers => self.num_layers = v.round().max(0.0) as u32,
            ParamKey::Speed => self.speed = v,
            ParamKey::TriangleSize => self.triangle_size = v,
            ParamKey::ColorIntensity => self.color_intensity = v,
            ParamKey::Opacity => self.opacity = v,
            ParamKey::RotationSpeed => self.rotation_speed = v,
            ParamKey::ScaleVariation => self.scale_variation = v,
            ParamKey::GridDensity => self.grid_density = v,
            ParamKey::RadiusVariation => self.radius_variation = v,
            ParamKey::SizeVariation => self.size_variation = v,
            ParamKey::MovementComplexity => self.movement_complexity = v,
        }
    }

    /// Apply `key = value` overrides on top of `self`. Values are clamped to
    /// each key's declared range.
    pub fn from_overrides_text(base: Self, text: &str) -> Result<Self, ParamsError> {
        let mut store = ParameterStore::new(base);
        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key_raw, value_raw)) = line.split_once('=') else {
                return Err(ParamsError::Parse {
                    line: line_no,
                    message: "expected <key> = <value>".to_string(),
                });
            };
            let key_raw = key_raw.trim();
            let Some(key) = ParamKey::parse(key_raw) else {
                return Err(ParamsError::Parse {
                    line: line_no,
                    message: format!("unknown parameter '{key_raw}'"),
                });
            };
            let value = value_raw
                .trim()
                .parse::<f32>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| ParamsError::Parse {
                    line: line_no,
                    message: format!("{} must be a finite number", key.name()),
                })?;
            store.set(key, value);
        }
        Ok(store.snapshot())
    }

    pub fn to_text(&self) -> String {
        let mut body = String::from("# mosaic_logo parameters v1\n");
        for key in ParamKey::ALL {
            let spec = key.spec();
            let v = self.get(key);
            if spec.integral {
                body.push_str(&format!("{} = {}\n", key.name(), v as i64));
            } else {
                body.push_str(&format!("{} = {}\n", key.name(), v));
            }
        }
        body
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKey {
    NumLayers,
    Speed,
    TriangleSize,
    ColorIntensity,
    Opacity,
    RotationSpeed,
    ScaleVariation,
    GridDensity,
    RadiusVariation,
    SizeVariation,
    MovementComplexity,
}

/// Declared range of one tunable, as a control panel would show it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSpec {
    pub default: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub integral: bool,
}

impl ControlSpec {
    const fn float(default: f32, min: f32, max: f32, step: f32) -> Self {
        Self {
            default,
            min,
            max,
            step,
            integral: false,
        }
    }

    const fn int(default: f32, min: f32, max: f32) -> Self {
        Self {
            default,
            min,
            max,
            step: 1.0,
            integral: true,
        }
    }

    pub fn clamp(&self, v: f32) -> f32 {
        let v = if v.is_nan() { self.default } else { v };
        let v = if self.integral { v.round() } else { v };
        v.clamp(self.min, self.max)
    }
}

impl ParamKey {
    pub const ALL: [Self; 11] = [
        Self::NumLayers,
        Self::Speed,
        Self::TriangleSize,
        Self::ColorIntensity,
        Self::Opacity,
        Self::RotationSpeed,
        Self::ScaleVariation,
        Self::GridDensity,
        Self::RadiusVariation,
        Self::SizeVariation,
        Self::MovementComplexity,
    ];

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim().to_ascii_lowercase().replace('-', "_");
        match s.as_str() {
            "num_layers" | "layers" => Some(Self::NumLayers),
            "speed" => Some(Self::Speed),
            "triangle_size" => Some(Self::TriangleSize),
            "color_intensity" | "intensity" => Some(Self::ColorIntensity),
            "opacity" => Some(Self::Opacity),
            "rotation_speed" => Some(Self::RotationSpeed),
            "scale_variation" => Some(Self::ScaleVariation),
            "grid_density" | "grid" => Some(Self::GridDensity),
            "radius_variation" => Some(Self::RadiusVariation),
            "size_variation" => Some(Self::SizeVariation),
            "movement_complexity" => Some(Self::MovementComplexity),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NumLayers => "num_layers",
            Self::Speed => "speed",
            Self::TriangleSize => "triangle_size",
            Self::ColorIntensity => "color_intensity",
            Self::Opacity => "opacity",
            Self::RotationSpeed => "rotation_speed",
            Self::ScaleVariation => "scale_variation",
            Self::GridDensity => "grid_density",
            Self::RadiusVariation => "radius_variation",
            Self::SizeVariation => "size_variation",
            Self::MovementComplexity => "movement_complexity",
        }
    }

    pub fn spec(self) -> ControlSpec {
        match self {
            Self::NumLayers => ControlSpec::int(12.0, 1.0, 20.0),
            Self::Speed => ControlSpec::float(0.2, 0.0, 2.0, 0.01),
            Self::TriangleSize => ControlSpec::float(0.06, 0.01, 0.3, 0.005),
            Self::ColorIntensity => ControlSpec::float(1.4, 0.0, 3.0, 0.05),
            Self::Opacity => ControlSpec::float(1.0, 0.0, 1.0, 0.05),
            Self::RotationSpeed => ControlSpec::float(0.3, 0.0, 5.0, 0.05),
            Self::ScaleVariation => ControlSpec::float(0.8, 0.0, 2.0, 0.05),
            Self::GridDensity => ControlSpec::int(8.0, 4.0, 24.0),
            Self::RadiusVariation => ControlSpec::float(0.4, 0.0, 1.0, 0.05),
            Self::SizeVariation => ControlSpec::float(0.6, 0.0, 1.0, 0.05),
            Self::MovementComplexity => ControlSpec::float(1.0, 0.0, 3.0, 0.05),
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Live, range-checked parameter values. This is the control surface's side
/// of the contract: everything written through it is clamped, and the
/// generator only ever sees [`ParameterStore::snapshot`].
#[derive(Debug, Clone)]
pub struct ParameterStore {
    current: ParameterSet,
    baseline: ParameterSet,
}

impl ParameterStore {
    pub fn new(initial: ParameterSet) -> Self {
        let mut current = initial;
        for key in ParamKey::ALL {
            current.put(key, key.spec().clamp(initial.get(key)));
        }
        Self {
            current,
            baseline: current,
        }
    }

    pub fn get(&self, key: ParamKey) -> f32 {
        self.current.get(key)
    }

    /// Returns the value actually stored.
    pub fn set(&mut self, key: ParamKey, value: f32) -> f32 {
        let v = key.spec().clamp(value);
        self.current.put(key, v);
        v
    }

    pub fn nudge(&mut self, key: ParamKey, steps: i32) -> f32 {
        let spec = key.spec();
        self.set(key, self.get(key) + spec.step * steps as f32)
    }

    /// Back to the value this store was created with.
    pub fn reset(&mut self, key: ParamKey) {
        self.current.put(key, self.baseline.get(key));
    }

    pub fn reset_all(&mut self) {
        self.current = self.baseline;
    }

    pub fn snapshot(&self) -> ParameterSet {
        self.current
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new(ParameterSet::default())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    Io(String),
    Parse { line: usize, message: String },
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
        }
    }
}

impl std::error::Error for ParamsError {}

/// Load overrides from `path` on top of `base`. A missing file is not an error.
pub fn load_params(path: &Path, base: ParameterSet) -> Result<ParameterSet, ParamsError> {
    let text = match std::fs::read_to_string(path) {
        Ok(v) => v,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("no parameter file at {}, using base set", path.display());
            return Ok(base);
        }
        Err(err) => return Err(ParamsError::Io(err.to_string())),
    };
    let params = ParameterSet::from_overrides_text(base, &text)?;
    log::info!("loaded parameters from {}", path.display());
    Ok(params)
}

pub fn save_params(path: &Path, params: &ParameterSet) -> Result<(), ParamsError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| ParamsError::Io(e.to_string()))?;
        }
    }
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, params.to_text()).map_err(|e| ParamsError::Io(e.to_string()))?;
    std::fs::rename(&tmp, path).map_err(|e| ParamsError::Io(e.to_string()))?;
    log::info!("saved parameters to {}", path.display());
    Ok(())
}

pub fn params_storage_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.trim().is_empty() {
            return Some(PathBuf::from(xdg).join("mosaic_logo").join("params.txt"));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("mosaic_logo")
            .join("params.txt"),
    )
}
