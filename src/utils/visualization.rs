//! Visualization utilities for highway_planner
//!
//! Provides a unified interface for plotting planner output using gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{PlannerError, PlannerResult, Point2D, TrackedVehicle, Trajectory};
use crate::map::ReferencePath;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const GRAY: &str = "#808080";
    pub const ORANGE: &str = "#FFA500";

    // Semantic colors
    pub const REFERENCE: &str = GRAY;
    pub const TRAJECTORY: &str = GREEN;
    pub const TRAFFIC: &str = BLACK;
    pub const EGO: &str = RED;
    pub const ANCHOR: &str = ORANGE;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

/// Style for point rendering
#[derive(Debug, Clone)]
pub struct PointStyle {
    pub color: String,
    pub size: f64,
    pub symbol: char,
    pub caption: String,
}

impl PointStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            size: 1.0,
            symbol: 'O',
            caption: caption.to_string(),
        }
    }

    pub fn with_size(mut self, size: f64) -> Self {
        self.size = size;
        self
    }

    pub fn with_symbol(mut self, symbol: char) -> Self {
        self.symbol = symbol;
        self
    }
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    title: String,
    x_label: String,
    y_label: String,
    aspect_ratio: Option<f64>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            x_label: "X [road units]".to_string(),
            y_label: "Y [road units]".to_string(),
            aspect_ratio: Some(1.0),
        }
    }

    /// Set the plot title
    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Set aspect ratio (None for auto)
    pub fn set_aspect_ratio(&mut self, ratio: Option<f64>) -> &mut Self {
        self.aspect_ratio = ratio;
        self
    }

    /// Plot the reference path centerline
    pub fn plot_reference_path(&mut self, path: &ReferencePath) -> &mut Self {
        let x: Vec<f64> = path.waypoints().iter().map(|wp| wp.x).collect();
        let y: Vec<f64> = path.waypoints().iter().map(|wp| wp.y).collect();

        self.figure.axes2d().lines(
            &x,
            &y,
            &[
                Caption("Reference"),
                Color(colors::REFERENCE),
                LineWidth(1.0),
            ],
        );
        self
    }

    /// Plot a planned trajectory
    pub fn plot_trajectory(&mut self, trajectory: &Trajectory, style: &PathStyle) -> &mut Self {
        self.figure.axes2d().lines(
            &trajectory.x,
            &trajectory.y,
            &[
                Caption(&style.caption),
                Color(&style.color),
                LineWidth(style.line_width),
            ],
        );
        self
    }

    /// Plot tracked traffic
    pub fn plot_vehicles(&mut self, vehicles: &[TrackedVehicle]) -> &mut Self {
        let x: Vec<f64> = vehicles.iter().map(|v| v.x).collect();
        let y: Vec<f64> = vehicles.iter().map(|v| v.y).collect();

        self.figure.axes2d().points(
            &x,
            &y,
            &[
                Caption("Traffic"),
                Color(colors::TRAFFIC),
                PointSymbol('S'),
                PointSize(1.0),
            ],
        );
        self
    }

    /// Plot the ego vehicle position
    pub fn plot_ego(&mut self, position: Point2D) -> &mut Self {
        self.figure.axes2d().points(
            &[position.x],
            &[position.y],
            &[
                Caption("Ego"),
                Color(colors::EGO),
                PointSymbol('*'),
                PointSize(2.0),
            ],
        );
        self
    }

    /// Plot arbitrary points
    pub fn plot_points_xy(&mut self, x: &[f64], y: &[f64], style: &PointStyle) -> &mut Self {
        self.figure.axes2d().points(
            x,
            y,
            &[
                Caption(&style.caption),
                Color(&style.color),
                PointSymbol(style.symbol),
                PointSize(style.size),
            ],
        );
        self
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> PlannerResult<()> {
        self.apply_settings();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| PlannerError::VisualizationError(e.to_string()))
    }

    /// Save plot to PNG file
    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> PlannerResult<()> {
        self.apply_settings();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| PlannerError::VisualizationError(e.to_string()))
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label(&self.x_label, &[]);
        axes.set_y_label(&self.y_label, &[]);

        if let Some(ratio) = self.aspect_ratio {
            axes.set_aspect_ratio(AutoOption::Fix(ratio));
        }
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}
