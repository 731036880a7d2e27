//! Runs the sweep described by a [`Settings`] and writes its results.

use std::time::Instant;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::config::PROGRESS_THRESHOLD;
use crate::fresnel::{AcousticInterface, ShInterface};
use crate::output;
use crate::result::SweepResult;
use crate::scattering::FluidSolidInterface;
use crate::settings::{RegimeKind, Settings};
use crate::sweep::{self, AngleSweep, Regime};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::load_default_config;

    #[test]
    fn solves_every_regime() {
        let mut settings = load_default_config().unwrap();
        settings.sweep.num_samples = 31;
        for (regime, names) in [
            (RegimeKind::Acoustic, vec!["R", "T"]),
            (RegimeKind::Sh, vec!["R", "T"]),
            (RegimeKind::FluidSolid, vec!["R_P", "T_P", "T_S"]),
        ] {
            settings.regime = regime;
            let mut problem = Problem::new(settings.clone());
            let result = problem.solve().unwrap();
            let got: Vec<_> = result.series.iter().map(|s| s.name).collect();
            assert_eq!(got, names);
            assert_eq!(result.angles.len(), 31);
            assert!(result.max_energy_residual().unwrap() < 1e-9);
        }
    }

    #[test]
    fn writeup_creates_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut settings = load_default_config().unwrap();
        settings.regime = RegimeKind::FluidSolid;
        settings.sweep.num_samples = 11;
        settings.directory = dir.path().join("out");
        let mut problem = Problem::new(settings);
        problem.solve().unwrap();
        problem.writeup().unwrap();
        for name in ["R_P.dat", "T_P.dat", "T_S.dat", "summary.json"] {
            assert!(dir.path().join("out").join(name).exists(), "{name}");
        }
    }

    #[test]
    fn writeup_before_solve_fails() {
        let problem = Problem::new(load_default_config().unwrap());
        assert!(problem.writeup().is_err());
    }
}

/// A configured sweep and, once solved, its result.
#[derive(Debug, Clone)]
pub struct Problem {
    pub settings: Settings,
    pub result: Option<SweepResult>,
}

impl Problem {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            result: None,
        }
    }

    /// Validates the settings, sweeps the selected regime and stores the result.
    pub fn solve(&mut self) -> Result<&SweepResult> {
        let start = Instant::now();
        let sweep = self.settings.sweep()?;
        let regimes = &self.settings.regimes;
        let convention = self.settings.convention;

        let result = match self.settings.regime {
            RegimeKind::Acoustic => {
                let p = regimes.acoustic;
                solve_regime(&AcousticInterface::new(p.upper, p.lower, convention)?, &sweep)?
            }
            RegimeKind::Sh => {
                let p = regimes.sh;
                solve_regime(&ShInterface::new(p.upper, p.lower, convention)?, &sweep)?
            }
            RegimeKind::FluidSolid => {
                let p = regimes.fluid_solid;
                solve_regime(&FluidSolidInterface::new(p.fluid, p.solid)?, &sweep)?
            }
        };

        info!(
            "Time taken: {:.2?} for {} angles",
            start.elapsed(),
            result.angles.len()
        );

        Ok(self.result.insert(result))
    }

    /// Writes the series and the summary into the configured directory.
    pub fn writeup(&self) -> Result<()> {
        let result = self
            .result
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("nothing to write: problem has not been solved"))?;
        let paths = output::write_series(result, &self.settings.directory)?;
        let summary = output::write_summary(result, &self.settings, &self.settings.directory)?;
        for path in paths.iter().chain(std::iter::once(&summary)) {
            info!("Wrote {:?}", path);
        }
        Ok(())
    }
}

fn solve_regime<R: Regime>(regime: &R, sweep: &AngleSweep) -> crate::Result<SweepResult> {
    if sweep.num_samples < PROGRESS_THRESHOLD {
        return sweep::run(regime, sweep);
    }

    let pb = ProgressBar::new(sweep.num_samples as u64);
    if let Ok(style) = ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {bar:40.green/blue} {pos:>7}/{len:7} {msg} ETA: {eta_precise}",
    ) {
        pb.set_style(style.progress_chars("█▇▆▅▄▃▂▁"));
    }
    pb.set_message(regime.name().to_string());
    sweep::run_with_progress(regime, sweep, &pb)
}
