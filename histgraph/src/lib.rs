use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use std::ops::Range;
use std::path::Path;

mod bins;
mod histogram;
mod summary;

pub use bins::Bins;
pub use histogram::Histogram;
pub use summary::Summary;

macro_rules! hexcolour {
    ($colour:literal) => {
        RGBColor(
            (($colour & 0xFF0000) >> 16) as u8,
            (($colour & 0x00FF00) >> 8) as u8,
            (($colour & 0x0000FF) >> 0) as u8,
        )
    };
}

const COLOURS: &[RGBColor] = &[
    hexcolour!(0x1F77B4),
    hexcolour!(0xFF7F0E),
    hexcolour!(0x2CA02C),
    hexcolour!(0xD62728),
    hexcolour!(0x9467BD),
    hexcolour!(0x8C564B),
];

const GRID_ALPHA: f64 = 0.75;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("invalid bins: {0}")]
    InvalidBins(String),

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("failed to prepare drawing area: {0}")]
    DrawingArea(String),

    #[error("failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("failed to draw chart: {0}")]
    Drawing(String),

    #[error("unsupported output format: {0} (expected .png or .svg)")]
    UnsupportedFormat(String),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OutputFormat {
    Png,
    Svg,
}

impl OutputFormat {
    pub fn from_path(path: &Path) -> Result<Self, PlotError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match extension.as_deref() {
            Some("png") => Ok(OutputFormat::Png),
            Some("svg") => Ok(OutputFormat::Svg),
            _ => Err(PlotError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

struct Series<'data> {
    label: String,
    data: &'data [f64],
}

/// A histogram chart of one or more datasets sharing the same bins.
pub struct HistogramPlot<'data> {
    x_desc: String,
    y_desc: String,
    caption: String,
    size: (u32, u32),
    grid: bool,
    density: bool,
    bins: Bins,
    x_range: Option<Range<f64>>,

    series: Vec<Series<'data>>,
}

impl<'d> Default for HistogramPlot<'d> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'d> HistogramPlot<'d> {
    pub fn new() -> Self {
        Self {
            x_desc: String::new(),
            y_desc: String::new(),
            caption: String::new(),
            size: (1280, 960),
            grid: true,
            density: false,
            bins: Bins::default(),
            x_range: None,

            series: Vec::new(),
        }
    }

    pub fn caption(&mut self, caption: impl AsRef<str>) -> &mut Self {
        self.caption = caption.as_ref().to_owned();
        self
    }

    pub fn x_desc(&mut self, x_desc: impl AsRef<str>) -> &mut Self {
        self.x_desc = x_desc.as_ref().to_owned();
        self
    }

    pub fn y_desc(&mut self, y_desc: impl AsRef<str>) -> &mut Self {
        self.y_desc = y_desc.as_ref().to_owned();
        self
    }

    pub fn size(&mut self, size: (u32, u32)) -> &mut Self {
        self.size = size;
        self
    }

    /// Horizontal gridlines at the y-axis ticks.
    pub fn grid(&mut self, grid: bool) -> &mut Self {
        self.grid = grid;
        self
    }

    pub fn density(&mut self, density: bool) -> &mut Self {
        self.density = density;
        self
    }

    pub fn bins(&mut self, bins: Bins) -> &mut Self {
        self.bins = bins;
        self
    }

    /// Restrict the visible x-axis. Defaults to the full span of the bins.
    pub fn x_range(&mut self, range: Range<f64>) -> &mut Self {
        self.x_range = Some(range);
        self
    }

    /// Adds a dataset. An empty label keeps it out of the legend.
    pub fn series(&mut self, label: impl AsRef<str>, data: &'d [f64]) -> &mut Self {
        self.series.push(Series {
            label: label.as_ref().to_owned(),
            data,
        });
        self
    }

    /// The x-axis span that will be drawn.
    pub fn visible_range(&self) -> Range<f64> {
        self.x_range
            .clone()
            .unwrap_or_else(|| self.bins.first()..self.bins.last())
    }

    /// Bins every series without drawing anything.
    pub fn histograms(&self) -> Vec<Histogram> {
        self.series
            .iter()
            .map(|series| Histogram::count(&self.bins, series.data))
            .collect()
    }

    /// Draws the chart to `path`, picking the backend from the file
    /// extension. Returns the binned series.
    pub fn render(&self, path: impl AsRef<Path>) -> Result<Vec<Histogram>, PlotError> {
        let path = path.as_ref();
        let format = OutputFormat::from_path(path)?;

        if self.series.is_empty() {
            return Err(PlotError::InvalidData("no series to plot".to_owned()));
        }

        if let Some(range) = &self.x_range {
            if !(range.start < range.end) {
                return Err(PlotError::InvalidData(format!(
                    "empty x range {}..{}",
                    range.start, range.end
                )));
            }
        }

        let histograms = self.histograms();

        match format {
            OutputFormat::Png => {
                let root = BitMapBackend::new(path, self.size).into_drawing_area();
                self.draw(root, &histograms)?;
            }
            OutputFormat::Svg => {
                let root = SVGBackend::new(path, self.size).into_drawing_area();
                self.draw(root, &histograms)?;
            }
        }

        Ok(histograms)
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: DrawingArea<DB, Shift>,
        histograms: &[Histogram],
    ) -> Result<(), PlotError> {
        root.fill(&WHITE)
            .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

        let heights: Vec<Vec<f64>> = histograms
            .iter()
            .map(|histogram| histogram.heights(self.density))
            .collect();

        let tallest = heights
            .iter()
            .flatten()
            .copied()
            .fold(0.0, f64::max);
        let y_max = if tallest > 0.0 { tallest * 1.05 } else { 1.0 };

        let mut chart = ChartBuilder::on(&root)
            .caption(&self.caption, ("sans-serif", 40))
            .margin(20)
            .set_label_area_size(LabelAreaPosition::Left, 100)
            .set_label_area_size(LabelAreaPosition::Bottom, 60)
            .build_cartesian_2d(self.visible_range(), 0.0..y_max)
            .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

        let mut mesh = chart.configure_mesh();
        mesh.y_desc(&self.y_desc)
            .x_desc(&self.x_desc)
            .label_style(("sans-serif", 20))
            .disable_x_mesh();

        if self.grid {
            mesh.bold_line_style(BLACK.mix(GRID_ALPHA)).light_line_style(WHITE);
        } else {
            mesh.disable_y_mesh();
        }

        mesh.draw().map_err(|e| PlotError::Drawing(e.to_string()))?;

        let overlaid = histograms.len() > 1;
        let mut legend = false;

        for (i, (series, heights)) in self.series.iter().zip(heights.iter()).enumerate() {
            let colour = COLOURS[i % COLOURS.len()];
            let style = if overlaid {
                colour.mix(0.5).filled()
            } else {
                colour.filled()
            };

            let bars = self
                .bins
                .ranges()
                .zip(heights.iter().copied())
                .filter(|(_, height)| *height > 0.0)
                .map(move |(range, height)| {
                    Rectangle::new([(range.start, 0.0), (range.end, height)], style)
                });

            let anno = chart
                .draw_series(bars)
                .map_err(|e| PlotError::Drawing(e.to_string()))?;

            if !series.label.is_empty() {
                anno.label(series.label.as_str()).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 15, y + 5)], colour.filled())
                });
                legend = true;
            }
        }

        if legend {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .position(SeriesLabelPosition::UpperRight)
                .draw()
                .map_err(|e| PlotError::Drawing(e.to_string()))?;
        }

        root.present()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn output_format_from_extension() {
        assert_eq!(
            OutputFormat::from_path(&PathBuf::from("lengths.png")).unwrap(),
            OutputFormat::Png
        );
        assert_eq!(
            OutputFormat::from_path(&PathBuf::from("out/lengths.SVG")).unwrap(),
            OutputFormat::Svg
        );
        assert!(OutputFormat::from_path(&PathBuf::from("lengths.pdf")).is_err());
        assert!(OutputFormat::from_path(&PathBuf::from("lengths")).is_err());
    }

    #[test]
    fn render_requires_series() {
        let plot = HistogramPlot::new();
        match plot.render("never-written.png") {
            Err(PlotError::InvalidData(_)) => {}
            other => panic!("unexpected result: {:?}", other.map(|h| h.len())),
        }
    }

    #[test]
    fn render_rejects_empty_x_range() {
        let data = [1.0, 2.0];
        let mut plot = HistogramPlot::new();
        plot.series("", &data).x_range(5.0..5.0);
        assert!(matches!(
            plot.render("never-written.png"),
            Err(PlotError::InvalidData(_))
        ));
    }

    #[test]
    fn histograms_share_bins() {
        let standard = [1.0, 2.0, 2.0];
        let honorable = [2.0, 3.0];

        let mut plot = HistogramPlot::new();
        plot.bins(Bins::integer(0, 5).unwrap())
            .series("standard", &standard)
            .series("honorable", &honorable);

        let histograms = plot.histograms();
        assert_eq!(histograms.len(), 2);
        assert_eq!(histograms[0].counts(), &[0, 1, 2, 0]);
        assert_eq!(histograms[1].counts(), &[0, 0, 1, 1]);
    }

    #[test]
    fn visible_range_defaults_to_bins() {
        let mut plot = HistogramPlot::new();
        assert_eq!(plot.visible_range(), 0.0..999.0);

        plot.x_range(0.0..300.0);
        assert_eq!(plot.visible_range(), 0.0..300.0);
    }

    #[test]
    fn render_overlaid_density_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compare.svg");

        let standard = [1.0, 2.0, 2.0, 3.0, 3.0, 3.0];
        let honorable = [2.0, 4.0, 1200.0];

        let mut plot = HistogramPlot::new();
        plot.caption("Game Lengths")
            .x_desc("# Turns")
            .y_desc("Density")
            .size((640, 480))
            .density(true)
            .series("standard", &standard)
            .series("honorable", &honorable);

        let histograms = plot.render(&path).unwrap();
        assert_eq!(histograms.len(), 2);
        assert_eq!(histograms[0].total(), 6);
        assert_eq!(histograms[1].total(), 2);
        assert_eq!(histograms[1].outside(), 1);

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(!svg.is_empty());
        assert!(svg.contains("standard"));
        assert!(svg.contains("honorable"));
        // gridlines
        assert!(svg.contains("opacity=\"0.75\""));
    }

    #[test]
    fn render_single_series_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lengths.png");

        let data = [10.0, 20.0, 20.0];
        let mut plot = HistogramPlot::new();
        plot.size((320, 240)).grid(false).series("", &data);

        let histograms = plot.render(&path).unwrap();
        assert_eq!(histograms[0].total(), 3);
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn render_empty_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.png");

        let mut plot = HistogramPlot::new();
        plot.size((320, 240)).density(true).series("", &[]);

        let histograms = plot.render(&path).unwrap();
        assert_eq!(histograms[0].total(), 0);
        assert!(histograms[0].density().iter().all(|d| *d == 0.0));
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }
}
