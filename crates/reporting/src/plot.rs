// In crates/reporting/src/plot.rs

use crate::Result;
use engine::{RunObserver, TickerAnalysis};
use std::path::PathBuf;

/// Renders a close-versus-SMA chart for every successfully processed ticker.
///
/// Chart failures are logged and never affect the ticker's outcome. Without
/// the `plot` feature the plotter warns once and renders nothing.
#[derive(Debug)]
pub struct ChartPlotter {
    folder: PathBuf,
    window: usize,
    warned: bool,
}

impl ChartPlotter {
    pub fn new(folder: PathBuf, window: usize) -> Self {
        Self {
            folder,
            window,
            warned: false,
        }
    }

    /// `<folder>/<ticker>_SMA<window>.png`
    pub fn chart_path(&self, ticker: &str) -> PathBuf {
        self.folder.join(format!("{}_SMA{}.png", ticker, self.window))
    }

    /// Renders one chart. Returns `None` when rendering is unavailable.
    pub fn render(&mut self, analysis: &TickerAnalysis) -> Result<Option<PathBuf>> {
        #[cfg(feature = "plot")]
        {
            let path = self.chart_path(analysis.record.ticker.as_str());
            std::fs::create_dir_all(&self.folder)?;
            chart::draw(&path, analysis, self.window)?;
            Ok(Some(path))
        }

        #[cfg(not(feature = "plot"))]
        {
            if !self.warned {
                tracing::warn!(
                    ticker = %analysis.record.ticker,
                    "Chart rendering is not available in this build; skipping plots."
                );
                self.warned = true;
            }
            Ok(None)
        }
    }
}

impl RunObserver for ChartPlotter {
    fn on_analysis(&mut self, analysis: &TickerAnalysis) {
        match self.render(analysis) {
            Ok(Some(path)) => tracing::debug!(path = %path.display(), "Chart written."),
            Ok(None) => {}
            Err(e) => tracing::warn!(ticker = %analysis.record.ticker, error = %e, "Chart rendering failed."),
        }
    }
}

#[cfg(feature = "plot")]
mod chart {
    use crate::{Error, Result, to_f64};
    use engine::TickerAnalysis;
    use plotters::prelude::*;
    use std::fmt::Display;
    use std::path::Path;

    fn plot_err<E: Display>(e: E) -> Error {
        Error::Plot(e.to_string())
    }

    pub(super) fn draw(path: &Path, analysis: &TickerAnalysis, window: usize) -> Result<()> {
        let closes: Vec<f64> = analysis.series.prices().into_iter().map(to_f64).collect();
        let smas: Vec<(usize, f64)> = analysis
            .rolling
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, to_f64(v))))
            .collect();

        let (mut lo, mut hi) = closes
            .iter()
            .chain(smas.iter().map(|(_, v)| v))
            .fold((f64::MAX, f64::MIN), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
        if lo > hi {
            (lo, hi) = (0.0, 1.0);
        }
        let pad = ((hi - lo) * 0.05).max(0.5);

        let root = BitMapBackend::new(path, (1200, 600)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;

        let points = &analysis.series.points;
        let x_label = |i: &usize| {
            points
                .get(*i)
                .and_then(|p| p.date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| i.to_string())
        };

        let mut chart = ChartBuilder::on(&root)
            .caption(
                format!("{} Close vs SMA{}", analysis.record.ticker, window),
                ("sans-serif", 24),
            )
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(0..closes.len().max(1), (lo - pad)..(hi + pad))
            .map_err(plot_err)?;

        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&x_label)
            .y_desc("Price")
            .draw()
            .map_err(plot_err)?;

        chart
            .draw_series(LineSeries::new(closes.iter().copied().enumerate(), &BLUE))
            .map_err(plot_err)?
            .label("Close")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

        chart
            .draw_series(LineSeries::new(smas, &RED))
            .map_err(plot_err)?
            .label(format!("SMA{window}"))
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(plot_err)?;

        root.present().map_err(plot_err)?;
        Ok(())
    }
}
