//! Plot-ready output files.
//!
//! Each coefficient series is written to `<name>.dat` as whitespace-separated
//! columns `angle_deg re im abs`, one row per sample, with `NaN` in place of
//! degenerate samples. A `summary.json` records the inputs, critical angles
//! and the energy check so a plot can be annotated without recomputing.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Serialize;

use crate::powers::EnergyFlux;
use crate::result::SweepResult;


fn format_row(angle: f64, value: Option<nalgebra::Complex<f64>>) -> String {
    let columns = match value {
        Some(v) => [v.re, v.im, v.norm()],
        None => [f64::NAN; 3],
    };
    std::iter::once(format!("{:.8}", angle.to_degrees()))
        .chain(columns.iter().map(|c| format!("{}", c)))
        .join(" ")
}

/// Writes every series of `result` into `directory`, creating it if needed.
pub fn write_series(result: &SweepResult, directory: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(directory)
        .with_context(|| format!("failed to create output directory {:?}", directory))?;

    let mut paths = Vec::with_capacity(result.series.len());
    for series in &result.series {
        let path = directory.join(format!("{}.dat", series.name));
        let file = File::create(&path).with_context(|| format!("failed to create {:?}", path))?;
        let mut writer = BufWriter::new(file);

        writeln!(writer, "# {} {}", result.regime, series.name)?;
        writeln!(writer, "# angle_deg re im abs")?;
        for (angle, value) in result.angles.iter().zip(&series.values) {
            writeln!(writer, "{}", format_row(*angle, *value))?;
        }
        writer.flush()?;
        paths.push(path);
    }

    Ok(paths)
}

#[derive(Serialize)]
struct CriticalAngleDeg {
    mode: &'static str,
    degrees: f64,
}

#[derive(Serialize)]
struct Summary<'a, P: Serialize> {
    regime: &'static str,
    parameters: &'a P,
    samples: usize,
    holes: Vec<usize>,
    critical_angles: Vec<CriticalAngleDeg>,
    max_energy_residual: Option<f64>,
    mean_energy: Option<EnergyFlux>,
}

/// Writes `summary.json` describing the sweep and the `parameters` that produced it.
pub fn write_summary<P: Serialize>(
    result: &SweepResult,
    parameters: &P,
    directory: &Path,
) -> Result<PathBuf> {
    fs::create_dir_all(directory)
        .with_context(|| format!("failed to create output directory {:?}", directory))?;

    let summary = Summary {
        regime: result.regime,
        parameters,
        samples: result.angles.len(),
        holes: result.holes(),
        critical_angles: result
            .critical_angles
            .iter()
            .map(|c| CriticalAngleDeg {
                mode: c.mode,
                degrees: c.degrees(),
            })
            .collect(),
        max_energy_residual: result.max_energy_residual(),
        mean_energy: result.mean_energy(),
    };

    let path = directory.join("summary.json");
    let file = File::create(&path).with_context(|| format!("failed to create {:?}", path))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &summary)?;
    writer.flush()?;
    Ok(path)
}
