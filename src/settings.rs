use std::env;
use std::fmt;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use config::{Config, Environment, File, FileFormat};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::ENV_PREFIX;
use crate::fresnel::Convention;
use crate::medium::{Fluid, ShearMedium, Solid};
use crate::sweep::AngleSweep;

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["rtcoef"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn defaults_are_valid() {
        let settings = load_default_config().unwrap();
        assert_eq!(settings.regime, RegimeKind::Acoustic);
        assert_eq!(settings.convention, Convention::Displacement);
        assert_eq!(settings.regimes.sh.lower.s_speed, 1550.0);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn cli_overrides_sweep_and_regime() {
        let settings = load_config_with(&args(&[
            "--regime",
            "fluid-solid",
            "--start",
            "10",
            "--end",
            "60",
            "-n",
            "51",
            "--convention",
            "flipped",
        ]))
        .unwrap();
        assert_eq!(settings.regime, RegimeKind::FluidSolid);
        assert_eq!(settings.convention, Convention::Flipped);
        let sweep = settings.sweep().unwrap();
        assert_eq!(sweep.num_samples, 51);
        assert!((sweep.start - 10f64.to_radians()).abs() < 1e-15);
    }

    #[test]
    fn cli_overrides_media_of_selected_regime() {
        let settings = load_config_with(&args(&[
            "--regime", "fluid-solid", "--upper", "1480,1020", "--lower", "2000,800,1900",
        ]))
        .unwrap();
        let fs = settings.regimes.fluid_solid;
        assert_eq!(fs.fluid, Fluid::new(1480.0, 1020.0));
        assert_eq!(fs.solid, Solid::new(2000.0, 800.0, 1900.0));
        // the other regimes keep their defaults
        assert_eq!(settings.regimes.acoustic.upper, Fluid::new(1500.0, 1000.0));
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let result = load_config_with(&args(&["--regime", "sh", "--lower", "1,2,3"]));
        assert!(result.is_err());
    }

    #[test]
    fn grazing_end_is_rejected_before_running() {
        let result = load_config_with(&args(&["--end", "90"]));
        let err = result.unwrap_err().to_string();
        assert!(err.contains("pi/2"), "{err}");
    }

    #[test]
    fn config_file_layers_over_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(
            &path,
            "regime = \"sh\"\n[sweep]\nnum_samples = 7\n[regimes.sh.lower]\ns_speed = 1600.0\n",
        )
        .unwrap();
        let settings = load_config_with(&args(&["--config", path.to_str().unwrap()])).unwrap();
        assert_eq!(settings.regime, RegimeKind::Sh);
        assert_eq!(settings.sweep.num_samples, 7);
        assert_eq!(settings.sweep.end_deg, 89.9);
        assert_eq!(settings.regimes.sh.lower, ShearMedium::new(1600.0, 1000.0));
    }

    #[test]
    fn toml_round_trip() {
        let settings = load_default_config().unwrap();
        let text = settings.to_toml().unwrap();
        let back: Settings = toml::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }
}

/// Built-in defaults, always the first configuration layer.
const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Which interface to sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum RegimeKind {
    Acoustic,
    Sh,
    FluidSolid,
}

impl fmt::Display for RegimeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegimeKind::Acoustic => write!(f, "acoustic"),
            RegimeKind::Sh => write!(f, "sh"),
            RegimeKind::FluidSolid => write!(f, "fluid_solid"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcousticParams {
    pub upper: Fluid,
    pub lower: Fluid,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShParams {
    pub upper: ShearMedium,
    pub lower: ShearMedium,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FluidSolidParams {
    pub fluid: Fluid,
    pub solid: Solid,
}

/// Media for every regime. Only the selected one is used in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Regimes {
    pub acoustic: AcousticParams,
    pub sh: ShParams,
    pub fluid_solid: FluidSolidParams,
}

/// Sweep specification in degrees, as written in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepConfig {
    pub start_deg: f64,
    pub end_deg: f64,
    pub num_samples: usize,
}

/// Runtime configuration for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub regime: RegimeKind,
    #[serde(default)]
    pub convention: Convention,
    #[serde(default = "default_directory")]
    pub directory: PathBuf,
    pub sweep: SweepConfig,
    pub regimes: Regimes,
}

fn default_directory() -> PathBuf {
    PathBuf::from("output")
}

impl Settings {
    /// The sweep grid in radians.
    pub fn sweep(&self) -> crate::Result<AngleSweep> {
        AngleSweep::from_degrees(
            self.sweep.start_deg,
            self.sweep.end_deg,
            self.sweep.num_samples,
        )
    }

    /// Checks the sweep and the media of the selected regime.
    pub fn validate(&self) -> crate::Result<()> {
        self.sweep()?;
        match self.regime {
            RegimeKind::Acoustic => {
                self.regimes.acoustic.upper.validate()?;
                self.regimes.acoustic.lower.validate()
            }
            RegimeKind::Sh => {
                self.regimes.sh.upper.validate()?;
                self.regimes.sh.lower.validate()
            }
            RegimeKind::FluidSolid => {
                self.regimes.fluid_solid.fluid.validate()?;
                self.regimes.fluid_solid.solid.validate()
            }
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("failed to serialize settings")
    }

    fn apply_upper(&mut self, values: &[f64]) -> Result<()> {
        let [speed, density] = pair("upper", values)?;
        match self.regime {
            RegimeKind::Acoustic => self.regimes.acoustic.upper = Fluid::new(speed, density),
            RegimeKind::Sh => self.regimes.sh.upper = ShearMedium::new(speed, density),
            RegimeKind::FluidSolid => self.regimes.fluid_solid.fluid = Fluid::new(speed, density),
        }
        Ok(())
    }

    fn apply_lower(&mut self, values: &[f64]) -> Result<()> {
        match self.regime {
            RegimeKind::Acoustic => {
                let [speed, density] = pair("lower", values)?;
                self.regimes.acoustic.lower = Fluid::new(speed, density);
            }
            RegimeKind::Sh => {
                let [speed, density] = pair("lower", values)?;
                self.regimes.sh.lower = ShearMedium::new(speed, density);
            }
            RegimeKind::FluidSolid => {
                let [p_speed, s_speed, density]: [f64; 3] = values.try_into().map_err(|_| {
                    anyhow!(
                        "--lower for the fluid_solid regime expects P_SPEED,S_SPEED,DENSITY, got {} values",
                        values.len()
                    )
                })?;
                self.regimes.fluid_solid.solid = Solid::new(p_speed, s_speed, density);
            }
        }
        Ok(())
    }
}

fn pair(flag: &str, values: &[f64]) -> Result<[f64; 2]> {
    values
        .try_into()
        .map_err(|_| anyhow!("--{flag} expects SPEED,DENSITY, got {} values", values.len()))
}

/// Loads the built-in defaults without reading the command line or environment.
pub fn load_default_config() -> Result<Settings> {
    let settings: Config = Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
        .build()
        .context("failed to load built-in configuration")?;

    let config: Settings = settings
        .try_deserialize()
        .context("failed to deserialize built-in configuration")?;
    config.validate()?;
    Ok(config)
}

/// Loads the layered configuration and applies command-line overrides.
///
/// Layers, lowest priority first: built-in defaults, `config/local.toml` in
/// the project root if present, the file given with `--config`, then
/// `RTCOEF_*` environment variables (`__` separates nested keys).
pub fn load_config_with(args: &CliArgs) -> Result<Settings> {
    let mut builder =
        Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    if let Some(root) = retrieve_project_root() {
        let local_config = root.join("config/local.toml");
        if local_config.exists() {
            info!("Using local configuration: {:?}", local_config);
            builder = builder.add_source(File::from(local_config));
        }
    }
    if let Some(path) = &args.config {
        info!("Using configuration file: {:?}", path);
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    let settings = builder
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("failed to load configuration")?;

    let mut config: Settings = settings
        .try_deserialize()
        .context("failed to deserialize configuration")?;

    if let Some(regime) = args.regime {
        config.regime = regime;
    }
    if let Some(convention) = args.convention {
        config.convention = convention;
    }
    if let Some(start) = args.start {
        config.sweep.start_deg = start;
    }
    if let Some(end) = args.end {
        config.sweep.end_deg = end;
    }
    if let Some(num) = args.num {
        config.sweep.num_samples = num;
    }
    if let Some(dir) = &args.dir {
        config.directory = dir.clone();
    }
    if let Some(upper) = &args.upper {
        config.apply_upper(upper)?;
    }
    if let Some(lower) = &args.lower {
        config.apply_lower(lower)?;
    }

    if let Err(err) = config.validate() {
        bail!("invalid configuration: {}", err);
    }

    debug!("{:#?}", config);

    Ok(config)
}

/// Parses the process command line and loads the configuration.
pub fn load_config() -> Result<Settings> {
    load_config_with(&CliArgs::parse())
}

/// Retrieve the project root directory, used to find `config/local.toml`.
/// Tries, in order:
/// 1. the CARGO_MANIFEST_DIR environment variable (cargo run, cargo test),
/// 2. the RTCOEF_ROOT_DIR environment variable,
/// 3. the nearest ancestor of the executable containing a "config" directory.
fn retrieve_project_root() -> Option<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        return Some(PathBuf::from(manifest_dir));
    }
    if let Ok(path) = env::var("RTCOEF_ROOT_DIR") {
        return Some(PathBuf::from(path));
    }
    let exe_path = env::current_exe().ok()?;
    exe_path
        .ancestors()
        .skip(1)
        .find(|dir| dir.join("config").is_dir())
        .map(|dir| dir.to_path_buf())
}

#[derive(Parser, Debug, Default)]
#[command(
    version,
    about = "rtcoef - plane-wave reflection and transmission coefficients at a flat interface"
)]
pub struct CliArgs {
    /// Settings file layered over the built-in defaults.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Interface regime to sweep.
    #[arg(short, long, value_enum)]
    pub regime: Option<RegimeKind>,

    /// First incidence angle of the sweep, in degrees.
    #[arg(long)]
    pub start: Option<f64>,

    /// Last incidence angle of the sweep, in degrees. Must be below 90.
    #[arg(long)]
    pub end: Option<f64>,

    /// Number of evenly spaced angles, endpoints included.
    #[arg(short, long)]
    pub num: Option<usize>,

    /// Sign convention of the reflection coefficient.
    #[arg(long, value_enum)]
    pub convention: Option<Convention>,

    /// Incident-side medium as SPEED,DENSITY (the S speed for the sh regime).
    #[arg(long, num_args = 1, value_delimiter = ',')]
    pub upper: Option<Vec<f64>>,

    /// Transmitting medium as SPEED,DENSITY, or P_SPEED,S_SPEED,DENSITY for fluid-solid.
    #[arg(long, num_args = 1, value_delimiter = ',')]
    pub lower: Option<Vec<f64>>,

    /// Output directory for the coefficient series and summary.
    #[arg(short, long)]
    pub dir: Option<PathBuf>,

    /// Print the effective settings as TOML and exit.
    #[arg(long)]
    pub dump_config: bool,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Settings:")?;
        writeln!(f, "  - Regime: {}", self.regime)?;
        writeln!(f, "  - Convention: {:?}", self.convention)?;
        writeln!(
            f,
            "  - Sweep: {:.3} to {:.3} deg, {} samples",
            self.sweep.start_deg, self.sweep.end_deg, self.sweep.num_samples
        )?;
        match self.regime {
            RegimeKind::Acoustic => {
                let p = &self.regimes.acoustic;
                writeln!(f, "  - Upper: v = {:.3}, rho = {:.3}", p.upper.speed, p.upper.density)?;
                writeln!(f, "  - Lower: v = {:.3}, rho = {:.3}", p.lower.speed, p.lower.density)?;
            }
            RegimeKind::Sh => {
                let p = &self.regimes.sh;
                writeln!(f, "  - Upper: beta = {:.3}, rho = {:.3}", p.upper.s_speed, p.upper.density)?;
                writeln!(f, "  - Lower: beta = {:.3}, rho = {:.3}", p.lower.s_speed, p.lower.density)?;
            }
            RegimeKind::FluidSolid => {
                let p = &self.regimes.fluid_solid;
                writeln!(f, "  - Fluid: alpha = {:.3}, rho = {:.3}", p.fluid.speed, p.fluid.density)?;
                writeln!(
                    f,
                    "  - Solid: alpha = {:.3}, beta = {:.3}, rho = {:.3}",
                    p.solid.p_speed, p.solid.s_speed, p.solid.density
                )?;
            }
        }
        write!(f, "  - Output: {:?}", self.directory)
    }
}
