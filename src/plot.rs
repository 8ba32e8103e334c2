use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use crate::error::ChartError;
use crate::perf::Measurement;

pub const X_LABEL: &str = "Taxa de Ocupação (%)";
pub const Y_LABEL: &str = "Tempo de Busca (s)";
pub const SIMPLE_LABEL: &str = "Hash Simples";
pub const DOUBLE_LABEL: &str = "Hash Dupla";

const FONT: &str = "sans-serif";
pub const PLOT_WIDTH: u32 = 800;
pub const PLOT_HEIGHT: u32 = 400;
pub const DEFAULT_OUTPUT: &str = "search-time.svg";

const PALETTE: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
];

/// A labeled polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    label: String,
    points: Vec<(f64, f64)>,
}

impl Series {
    /// Pairs `x[i]` with `y[i]`. Both slices must be the same length.
    pub fn new(label: &str, x: &[f64], y: &[f64]) -> Result<Self, ChartError> {
        if x.len() != y.len() {
            return Err(ChartError::DimensionMismatch {
                x: x.len(),
                y: y.len(),
            });
        }

        Ok(Self {
            label: label.to_string(),
            points: x.iter().copied().zip(y.iter().copied()).collect(),
        })
    }

    #[cfg(test)]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[cfg(test)]
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }
}

/// A 2-D line chart: series in the order they were added, axis labels and
/// an optional legend.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Figure {
    series: Vec<Series>,
    x_label: String,
    y_label: String,
    caption: Option<String>,
    legend: bool,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plot(&mut self, x: &[f64], y: &[f64], label: &str) -> Result<&mut Self, ChartError> {
        self.series.push(Series::new(label, x, y)?);
        Ok(self)
    }

    pub fn set_xlabel(&mut self, label: &str) -> &mut Self {
        self.x_label = label.to_string();
        self
    }

    pub fn set_ylabel(&mut self, label: &str) -> &mut Self {
        self.y_label = label.to_string();
        self
    }

    pub fn set_caption(&mut self, caption: &str) -> &mut Self {
        self.caption = Some(caption.to_string());
        self
    }

    pub fn legend(&mut self) -> &mut Self {
        self.legend = true;
        self
    }

    #[cfg(test)]
    pub fn series(&self) -> &[Series] {
        &self.series
    }

    #[cfg(test)]
    pub fn x_label(&self) -> &str {
        &self.x_label
    }

    #[cfg(test)]
    pub fn y_label(&self) -> &str {
        &self.y_label
    }

    /// Legend text in drawing order; empty when the legend is off.
    #[cfg(test)]
    pub fn legend_entries(&self) -> Vec<&str> {
        if !self.legend {
            return Vec::new();
        }
        self.series.iter().map(|s| s.label()).collect()
    }

    pub fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
    ) -> Result<(), ChartError> {
        let points = || self.series.iter().flat_map(|s| s.points.iter());
        let (x_min, x_max) =
            padded_range(points().map(|p| p.0)).ok_or(ChartError::EmptySeries)?;
        let (y_min, y_max) =
            padded_range(points().map(|p| p.1)).ok_or(ChartError::EmptySeries)?;

        root.fill(&WHITE).map_err(backend)?;

        let mut builder = ChartBuilder::on(root);
        builder
            .margin(10)
            .set_label_area_size(LabelAreaPosition::Left, 80)
            .set_label_area_size(LabelAreaPosition::Bottom, 50);
        if let Some(caption) = &self.caption {
            builder.caption(caption, (FONT, 20));
        }
        let mut chart = builder
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(backend)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|v| format!("{:.0}", v))
            .y_label_formatter(&|v| format!("{:.1e}", v))
            .x_labels(10)
            .y_labels(10)
            .x_desc(self.x_label.as_str())
            .y_desc(self.y_label.as_str())
            .draw()
            .map_err(backend)?;

        for (i, series) in self.series.iter().enumerate() {
            let style = PALETTE[i % PALETTE.len()].stroke_width(2);
            chart
                .draw_series(LineSeries::new(series.points.iter().copied(), style))
                .map_err(backend)?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
        }

        if self.legend {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperRight)
                .label_font((FONT, 13))
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(backend)?;
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn to_svg_string(&self, size: (u32, u32)) -> Result<String, ChartError> {
        let mut buf = String::new();
        {
            let root = SVGBackend::with_string(&mut buf, size).into_drawing_area();
            self.draw(&root)?;
            root.present().map_err(backend)?;
        }
        Ok(buf)
    }

    pub fn save_svg(&self, path: &Path, size: (u32, u32)) -> Result<(), ChartError> {
        let root = SVGBackend::new(path, size).into_drawing_area();
        self.draw(&root)?;
        root.present().map_err(backend)?;
        tracing::info!(path = %path.display(), "chart written");
        Ok(())
    }
}

fn backend<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Backend(e.to_string())
}

/// Min and max of `values` widened by a tenth of the span, or around the
/// value itself when all values are equal.
fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (min, max) = values.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })?;

    let span = max - min;
    let pad = if span > 0.0 {
        span / 10.0
    } else if max != 0.0 {
        max.abs() / 10.0
    } else {
        1.0
    };
    Some((min - pad, max + pad))
}

/// Builds the search-time chart: one line per probing strategy over the
/// shared occupancy axis, labeled axes and a legend.
pub fn search_time_figure(
    occupancy: &[f64],
    simple: &[f64],
    double: &[f64],
) -> Result<Figure, ChartError> {
    let mut fig = Figure::new();
    fig.plot(occupancy, simple, SIMPLE_LABEL)?
        .plot(occupancy, double, DOUBLE_LABEL)?
        .set_xlabel(X_LABEL)
        .set_ylabel(Y_LABEL)
        .legend();
    Ok(fig)
}

/// Groups measurements by name, keeping the order in which each name first
/// appears, and charts one line per group.
pub fn measurements_figure(records: &[Measurement]) -> Result<Figure, ChartError> {
    let mut groups: Vec<(&str, Vec<&Measurement>)> = Vec::new();
    for record in records {
        match groups.iter().position(|(name, _)| *name == record.name) {
            Some(i) => groups[i].1.push(record),
            None => groups.push((record.name, vec![record])),
        }
    }

    let mut fig = Figure::new();
    for (name, group) in &groups {
        let x: Vec<f64> = group.iter().map(|m| m.occupancy as f64).collect();
        let y: Vec<f64> = group.iter().map(|m| m.seconds).collect();
        fig.plot(&x, &y, name)?;
    }
    fig.set_xlabel(X_LABEL).set_ylabel(Y_LABEL).legend();
    Ok(fig)
}

/// Hands a written chart to the desktop's default viewer.
pub fn show(path: &Path) -> Result<(), ChartError> {
    webbrowser::open(&path.to_string_lossy()).map_err(|source| ChartError::Viewer {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placeholder_data::{OCCUPANCY_RATES, SEARCH_TIMES_DOUBLE, SEARCH_TIMES_SIMPLE};

    fn placeholder() -> Figure {
        search_time_figure(&OCCUPANCY_RATES, &SEARCH_TIMES_SIMPLE, &SEARCH_TIMES_DOUBLE).unwrap()
    }

    #[test]
    fn two_series_with_one_point_per_rate() {
        let fig = placeholder();
        assert_eq!(fig.series().len(), 2);
        for series in fig.series() {
            assert_eq!(series.points().len(), OCCUPANCY_RATES.len());
        }
        assert_eq!(fig.series()[0].points()[9], (99.0, 0.000002));
        assert_eq!(fig.series()[1].points()[3], (40.0, 0.0));
    }

    #[test]
    fn legend_lists_series_in_insertion_order() {
        assert_eq!(placeholder().legend_entries(), vec!["Hash Simples", "Hash Dupla"]);
    }

    #[test]
    fn legend_is_empty_until_enabled() {
        let mut fig = Figure::new();
        fig.plot(&[1.0, 2.0], &[3.0, 4.0], "a").unwrap();
        assert!(fig.legend_entries().is_empty());
        fig.legend();
        assert_eq!(fig.legend_entries(), vec!["a"]);
    }

    #[test]
    fn axis_labels_are_verbatim() {
        let fig = placeholder();
        assert_eq!(fig.x_label(), "Taxa de Ocupação (%)");
        assert_eq!(fig.y_label(), "Tempo de Busca (s)");
    }

    #[test]
    fn short_series_is_a_dimension_mismatch() {
        let err =
            search_time_figure(&OCCUPANCY_RATES, &SEARCH_TIMES_SIMPLE[..9], &SEARCH_TIMES_DOUBLE)
                .unwrap_err();
        assert!(matches!(err, ChartError::DimensionMismatch { x: 10, y: 9 }));
    }

    #[test]
    fn placeholder_renders_to_svg() {
        let svg = placeholder().to_svg_string((PLOT_WIDTH, PLOT_HEIGHT)).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Hash Simples"));
        assert!(svg.contains("Hash Dupla"));
        assert!(svg.contains("Ocupação"));
        assert!(svg.contains("Tempo de Busca (s)"));
    }

    #[test]
    fn rendering_twice_gives_identical_figures() {
        let a = placeholder();
        let b = placeholder();
        assert_eq!(a, b);
        let size = (PLOT_WIDTH, PLOT_HEIGHT);
        assert_eq!(a.to_svg_string(size).unwrap(), b.to_svg_string(size).unwrap());
    }

    #[test]
    fn empty_figure_cannot_be_drawn() {
        let err = Figure::new().to_svg_string((100, 100)).unwrap_err();
        assert!(matches!(err, ChartError::EmptySeries));
    }

    #[test]
    fn padded_range_handles_flat_data() {
        assert_eq!(padded_range([0.0, 0.0].into_iter()), Some((-1.0, 1.0)));
        let (lo, hi) = padded_range([2.0, 2.0].into_iter()).unwrap();
        assert!(lo < 2.0 && hi > 2.0);
        assert_eq!(padded_range(std::iter::empty()), None);
    }

    #[test]
    fn measurements_group_by_first_appearance() {
        let point = |name, occupancy, seconds| Measurement {
            name,
            occupancy,
            seconds,
        };
        let records = [
            point("Hash Simples", 10, 0.5),
            point("Hash Dupla", 10, 0.4),
            point("Hash Simples", 20, 0.6),
            point("Hash Dupla", 20, 0.3),
        ];
        let fig = measurements_figure(&records).unwrap();
        assert_eq!(fig.legend_entries(), vec!["Hash Simples", "Hash Dupla"]);
        assert_eq!(fig.series()[1].points(), &[(10.0, 0.4), (20.0, 0.3)]);
        assert_eq!(fig.x_label(), X_LABEL);
    }
}
