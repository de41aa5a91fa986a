//! PNG charts for the three reports.
//!
//! Glyph rendering needs the `system-fonts` feature. Without it the charts
//! carry data, zero lines and markers only: captions, axes and legends are
//! left out rather than failing at draw time.

use crate::error::{ResonanceError, Result};
use crate::series::Sample;
use crate::targets::AmplitudeClass;
use plotters::prelude::*;
use std::error::Error;
use std::path::Path;

const TEXT: bool = cfg!(feature = "system-fonts");
const GOLD: RGBColor = RGBColor(255, 215, 0);

type DrawResult = std::result::Result<(), Box<dyn Error>>;

fn finish(path: &Path, result: DrawResult) -> Result<()> {
    result.map_err(|e| ResonanceError::Plot(format!("{}: {e}", path.display())))?;
    tracing::info!(path = %path.display(), "chart written");
    Ok(())
}

fn prepare(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// `(lo, hi)` padded by 10% of the span, or ±1 around a flat series.
fn padded(lo: f64, hi: f64) -> (f64, f64) {
    if !lo.is_finite() || !hi.is_finite() {
        return (-1.0, 1.0);
    }
    let span = hi - lo;
    if span <= f64::EPSILON {
        return (lo - 1.0, hi + 1.0);
    }
    (lo - 0.1 * span, hi + 0.1 * span)
}

fn class_color(class: AmplitudeClass) -> RGBColor {
    match class {
        AmplitudeClass::Prime => RED,
        AmplitudeClass::PrimorialSingularity => GOLD,
        AmplitudeClass::Composite => BLUE,
    }
}

// ---------------------------------------------------------------------------
// Triad bar chart
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub amplitude: u64,
    pub class: AmplitudeClass,
    pub energy: f64,
}

/// Legend entry for singularity bars, e.g. `30030 Singularity`.
fn singularity_label(singularities: &[u64]) -> String {
    if singularities.is_empty() {
        return "Singularity".to_string();
    }
    let names: Vec<String> = singularities.iter().map(|s| s.to_string()).collect();
    format!("{} Singularity", names.join("/"))
}

pub fn triad_chart(path: &Path, bars: &[Bar], singularities: &[u64]) -> Result<()> {
    prepare(path)?;
    finish(path, draw_triad(path, bars, &singularity_label(singularities)))
}

fn draw_triad(path: &Path, bars: &[Bar], singular_label: &str) -> DrawResult {
    let x_lo = bars.iter().map(|b| b.amplitude).min().unwrap_or(0) as f64 - 1.0;
    let x_hi = bars.iter().map(|b| b.amplitude).max().unwrap_or(0) as f64 + 1.0;
    let y_hi = bars.iter().map(|b| b.energy).fold(0.0, f64::max);
    let y_hi = if y_hi > 0.0 { y_hi * 1.1 } else { 1.0 };

    let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15).x_label_area_size(50).y_label_area_size(80);
    if TEXT {
        builder.caption("Energy Density: The Singularity Triad", ("sans-serif", 22));
    }
    let mut chart = builder.build_cartesian_2d(x_lo..x_hi, 0.0..y_hi)?;

    if TEXT {
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(bars.len().max(2))
            .x_label_formatter(&|x| format!("{}", x.round() as i64))
            .x_desc("Amplitude (Integer)")
            .y_desc("Mean Field Energy (φ²)")
            .draw()?;
    }

    chart.draw_series(bars.iter().map(|b| {
        let a = b.amplitude as f64;
        Rectangle::new([(a - 0.4, 0.0), (a + 0.4, b.energy)], class_color(b.class).filled())
    }))?;

    if TEXT {
        for (label, color) in [("Prime", RED), ("Composite", BLUE), (singular_label, GOLD)] {
            chart
                .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
                .label(label)
                .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 15, y + 5)], color.filled()));
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Zeta map
// ---------------------------------------------------------------------------

fn dashed_vline(x: f64, y0: f64, y1: f64) -> Vec<Vec<(f64, f64)>> {
    const DASHES: usize = 40;
    let dy = (y1 - y0) / (2 * DASHES) as f64;
    (0..DASHES)
        .map(|i| {
            let a = y0 + (2 * i) as f64 * dy;
            vec![(x, a), (x, a + dy)]
        })
        .collect()
}

/// Z(t) with a zero line and a dashed marker per target.
pub fn zeta_map(
    path: &Path,
    curve: &[(f64, f64)],
    targets: &[u64],
    highlight: &[u64],
) -> Result<()> {
    prepare(path)?;
    finish(path, draw_zeta(path, curve, targets, highlight))
}

fn draw_zeta(path: &Path, curve: &[(f64, f64)], targets: &[u64], highlight: &[u64]) -> DrawResult {
    let t_lo = curve.first().map(|p| p.0).unwrap_or(0.0);
    let t_hi = curve.last().map(|p| p.0).unwrap_or(1.0);
    let (y_lo, y_hi) = padded(
        curve.iter().map(|p| p.1).fold(f64::INFINITY, f64::min),
        curve.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max),
    );

    let root = BitMapBackend::new(path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15).x_label_area_size(40).y_label_area_size(60);
    if TEXT {
        builder.caption("Zeta Function Behavior at the Singularity Triad", ("sans-serif", 20));
    }
    let mut chart = builder.build_cartesian_2d(t_lo..t_hi, y_lo..y_hi)?;

    if TEXT {
        chart
            .configure_mesh()
            .x_desc("Imaginary Part (t)")
            .y_desc("Z(t)")
            .draw()?;
    }

    chart
        .draw_series(LineSeries::new(curve.iter().copied(), &BLUE))?
        .label("Riemann-Siegel Z(t)")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart.draw_series(std::iter::once(PathElement::new(
        vec![(t_lo, 0.0), (t_hi, 0.0)],
        BLACK,
    )))?;

    for &target in targets {
        let x = target as f64;
        if x < t_lo || x > t_hi {
            continue;
        }
        let color = if highlight.contains(&target) { GOLD } else { RED };
        let style = color.mix(0.6).stroke_width(2);
        chart
            .draw_series(
                dashed_vline(x, y_lo, y_hi)
                    .into_iter()
                    .map(move |seg| PathElement::new(seg, style)),
            )?
            .label(format!("Integer {target}"))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    if TEXT {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Field profile
// ---------------------------------------------------------------------------

pub fn field_profile(path: &Path, samples: &[Sample], amplitude: u64) -> Result<()> {
    prepare(path)?;
    finish(path, draw_field(path, samples, amplitude))
}

fn draw_field(path: &Path, samples: &[Sample], amplitude: u64) -> DrawResult {
    let (x_lo, x_hi) = padded(
        samples.iter().map(|s| s.x).fold(f64::INFINITY, f64::min),
        samples.iter().map(|s| s.x).fold(f64::NEG_INFINITY, f64::max),
    );
    let (y_lo, y_hi) = padded(
        samples.iter().map(|s| s.value).fold(f64::INFINITY, f64::min),
        samples.iter().map(|s| s.value).fold(f64::NEG_INFINITY, f64::max),
    );

    let root = BitMapBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(15).x_label_area_size(40).y_label_area_size(80);
    let caption = format!("Singularity A={amplitude}: Field Evolution");
    if TEXT {
        builder.caption(&caption, ("sans-serif", 20));
    }
    let mut chart = builder.build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    if TEXT {
        chart
            .configure_mesh()
            .x_desc("Coordinate")
            .y_desc("φ (Phi)")
            .draw()?;
    }

    let line = GOLD.stroke_width(2);
    chart
        .draw_series(LineSeries::new(samples.iter().map(|s| (s.x, s.value)), line))?
        .label("Field Amplitude")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));

    if TEXT {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}
