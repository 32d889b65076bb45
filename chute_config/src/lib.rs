#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and sample parsing for the fall-risk decision engine.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//!   Every section has defaults, so an empty file is a valid config.
//! - The sample CSV loader enforces headers and timestamp ordering before
//!   anything reaches the engine.
use serde::Deserialize;

/// Sample CSV schema.
///
/// Expected headers:
/// time_s,pitch_deg,altitude_m,vertical_velocity_mps,vertical_accel_mps2
///
/// Example:
/// time_s,pitch_deg,altitude_m,vertical_velocity_mps,vertical_accel_mps2
/// 0.00,0.3,1000.2,0.0,-9.79
/// 0.12,-0.4,999.9,-1.1,-9.70
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct SampleRow {
    pub time_s: f64,
    pub pitch_deg: f64,
    pub altitude_m: f64,
    pub vertical_velocity_mps: f64,
    pub vertical_accel_mps2: f64,
}

impl From<SampleRow> for chute_traits::Sample {
    fn from(r: SampleRow) -> Self {
        Self {
            time_s: r.time_s,
            pitch_deg: r.pitch_deg,
            altitude_m: r.altitude_m,
            vertical_velocity_mps: r.vertical_velocity_mps,
            vertical_accel_mps2: r.vertical_accel_mps2,
        }
    }
}

pub const SAMPLE_HEADERS: [&str; 5] = [
    "time_s",
    "pitch_deg",
    "altitude_m",
    "vertical_velocity_mps",
    "vertical_accel_mps2",
];

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PidCfg {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
}

impl Default for PidCfg {
    fn default() -> Self {
        Self {
            kp: 5.0,
            ki: 1.0,
            kd: 0.5,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TriggerCfg {
    /// Risk strictly above this arms (and keeps feeding) the deployment timer.
    pub fire_threshold: f64,
    /// Risk strictly below this resets the timer. Must be < fire_threshold.
    pub reset_threshold: f64,
    /// Seconds the timer must accumulate before deployment.
    /// Also accepts alias "min_duration_s".
    #[serde(alias = "min_duration_s")]
    pub min_sustained_s: f64,
}

impl Default for TriggerCfg {
    fn default() -> Self {
        Self {
            fire_threshold: 85.0,
            reset_threshold: 80.0,
            min_sustained_s: 2.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TrendCfg {
    /// Pitch persistence window in seconds (moving-average length).
    pub persistence_s: f64,
}

impl Default for TrendCfg {
    fn default() -> Self {
        Self { persistence_s: 3.0 }
    }
}

/// Airframe parameters used to derive the terminal velocity.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct VehicleCfg {
    pub mass_kg: f64,
    pub gravity_mps2: f64,
    pub air_density_kgpm3: f64,
    pub drag_coefficient: f64,
    pub reference_area_m2: f64,
    /// Explicit terminal velocity (m/s); takes precedence over the derived value.
    pub terminal_velocity_mps: Option<f64>,
}

impl Default for VehicleCfg {
    fn default() -> Self {
        Self {
            mass_kg: 5.0,
            gravity_mps2: 9.81,
            air_density_kgpm3: 1.225,
            drag_coefficient: 0.8,
            reference_area_m2: 0.5,
            terminal_velocity_mps: None,
        }
    }
}

/// Used when the drag equilibrium cannot be computed.
pub const FALLBACK_TERMINAL_VELOCITY_MPS: f64 = -100.0;

impl VehicleCfg {
    /// Terminal velocity (negative, falling): `-sqrt(2 m g / (rho A Cd))`.
    ///
    /// Returns the explicit override when set, and
    /// `FALLBACK_TERMINAL_VELOCITY_MPS` when the expression is not finite
    /// (e.g. zero drag area).
    pub fn terminal_velocity_mps(&self) -> f64 {
        if let Some(vt) = self.terminal_velocity_mps {
            return vt;
        }
        let den = self.air_density_kgpm3 * self.reference_area_m2 * self.drag_coefficient;
        let vt = -((2.0 * self.mass_kg * self.gravity_mps2) / den).sqrt();
        if vt.is_finite() {
            vt
        } else {
            FALLBACK_TERMINAL_VELOCITY_MPS
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

/// Explicit scenario tag. Only used to label reports; the engine never
/// branches on it.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioKind {
    LocFall,
    NormalLanding,
    Turbulence,
    FlatSpin,
    TurbulentLanding,
    #[default]
    Custom,
}

impl ScenarioKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LocFall => "loc_fall",
            Self::NormalLanding => "normal_landing",
            Self::Turbulence => "turbulence",
            Self::FlatSpin => "flat_spin",
            Self::TurbulentLanding => "turbulent_landing",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ScenarioCfg {
    pub name: Option<String>,
    pub kind: ScenarioKind,
}

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub pid: PidCfg,
    #[serde(default)]
    pub trigger: TriggerCfg,
    #[serde(default)]
    pub trend: TrendCfg,
    #[serde(default)]
    pub vehicle: VehicleCfg,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub scenario: ScenarioCfg,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // PID
        for (name, v) in [
            ("pid.kp", self.pid.kp),
            ("pid.ki", self.pid.ki),
            ("pid.kd", self.pid.kd),
        ] {
            if !v.is_finite() {
                eyre::bail!("{name} must be finite");
            }
            if v < 0.0 {
                eyre::bail!("{name} must be >= 0");
            }
        }

        // Trigger
        let t = &self.trigger;
        if !(0.0..=100.0).contains(&t.fire_threshold) {
            eyre::bail!("trigger.fire_threshold must be in [0, 100]");
        }
        if !(0.0..=100.0).contains(&t.reset_threshold) {
            eyre::bail!("trigger.reset_threshold must be in [0, 100]");
        }
        if t.reset_threshold >= t.fire_threshold {
            eyre::bail!("trigger.reset_threshold must be < trigger.fire_threshold");
        }
        if !t.min_sustained_s.is_finite() || t.min_sustained_s < 0.0 {
            eyre::bail!("trigger.min_sustained_s must be finite and >= 0");
        }
        if t.min_sustained_s > 60.0 * 60.0 {
            eyre::bail!("trigger.min_sustained_s is unreasonably large (>1h)");
        }

        // Trend
        if !self.trend.persistence_s.is_finite() || self.trend.persistence_s < 0.0 {
            eyre::bail!("trend.persistence_s must be finite and >= 0");
        }

        // Vehicle
        let v = &self.vehicle;
        if let Some(vt) = v.terminal_velocity_mps {
            if !vt.is_finite() {
                eyre::bail!("vehicle.terminal_velocity_mps must be finite");
            }
        } else {
            if v.mass_kg <= 0.0 {
                eyre::bail!("vehicle.mass_kg must be > 0");
            }
            if v.gravity_mps2 <= 0.0 {
                eyre::bail!("vehicle.gravity_mps2 must be > 0");
            }
            if v.air_density_kgpm3 < 0.0 || v.drag_coefficient < 0.0 || v.reference_area_m2 < 0.0
            {
                eyre::bail!("vehicle drag parameters must be >= 0");
            }
        }

        // Logging
        if let Some(r) = self.logging.rotation.as_deref()
            && !matches!(r, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}

/// Parse samples from any CSV reader, enforcing exact headers and strictly
/// increasing finite timestamps.
pub fn parse_samples_csv<R: std::io::Read>(reader: R) -> eyre::Result<Vec<SampleRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| eyre::eyre!("read CSV headers: {}", e))?
        .clone();
    let actual: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
    if actual != SAMPLE_HEADERS {
        eyre::bail!(
            "sample CSV must have headers '{}', got: {}",
            SAMPLE_HEADERS.join(","),
            actual.join(",")
        );
    }

    let mut rows: Vec<SampleRow> = Vec::new();
    for (idx, rec) in rdr.deserialize::<SampleRow>().enumerate() {
        // +2: header line and 1-based numbering
        let line = idx + 2;
        let row = match rec {
            Ok(row) => row,
            Err(e) => eyre::bail!("invalid CSV row {}: {}", line, e),
        };
        if !row.time_s.is_finite() {
            eyre::bail!("invalid CSV row {}: time_s must be finite", line);
        }
        if let Some(prev) = rows.last()
            && row.time_s <= prev.time_s
        {
            eyre::bail!(
                "invalid CSV row {}: time_s must be strictly increasing ({} after {})",
                line,
                row.time_s,
                prev.time_s
            );
        }
        rows.push(row);
    }

    if rows.is_empty() {
        eyre::bail!("sample CSV contains no rows");
    }
    Ok(rows)
}

pub fn load_samples_csv(path: &std::path::Path) -> eyre::Result<Vec<SampleRow>> {
    let file =
        std::fs::File::open(path).map_err(|e| eyre::eyre!("open sample CSV {:?}: {}", path, e))?;
    parse_samples_csv(file).map_err(|e| e.wrap_err(format!("sample CSV {path:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_vehicle_terminal_velocity() {
        let vt = VehicleCfg::default().terminal_velocity_mps();
        // sqrt(2*5*9.81 / (1.225*0.5*0.8)) = 14.149...
        assert!((vt + 14.1495).abs() < 1e-3, "vt = {vt}");
    }

    #[test]
    fn zero_drag_area_falls_back() {
        let v = VehicleCfg {
            reference_area_m2: 0.0,
            ..VehicleCfg::default()
        };
        assert_eq!(v.terminal_velocity_mps(), FALLBACK_TERMINAL_VELOCITY_MPS);
    }

    #[test]
    fn explicit_terminal_velocity_wins() {
        let v = VehicleCfg {
            terminal_velocity_mps: Some(-60.0),
            ..VehicleCfg::default()
        };
        assert_eq!(v.terminal_velocity_mps(), -60.0);
    }
}
