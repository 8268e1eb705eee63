//! Screen rendering
//!
//! Builds a text screen for each view. Screens are fixed-size grids of
//! lines, printed to the terminal by the caller.

use std::fmt;

use heapless::String;

use ciclotron_core::config::{Label, MAX_STAGES};
use ciclotron_core::editor::ChartProjection;
use ciclotron_core::time::format_hms;

/// Characters per line
pub const SCREEN_COLS: usize = 64;

/// Lines per screen (room for a full protocol chart)
pub const SCREEN_ROWS: usize = MAX_STAGES + 8;

/// Width of the temperature and progress bars
const BAR_WIDTH: usize = 20;

/// One screen line
pub type Line = String<SCREEN_COLS>;

const EMPTY_LINE: Line = Line::new();

/// A screen buffer that can be printed
pub struct Screen {
    lines: [Line; SCREEN_ROWS],
    /// Which row is currently selected (for menu highlighting)
    selected_row: Option<usize>,
}

impl Screen {
    /// Create a new empty screen
    pub const fn new() -> Self {
        Self {
            lines: [EMPTY_LINE; SCREEN_ROWS],
            selected_row: None,
        }
    }

    /// Clear the screen
    pub fn clear(&mut self) {
        for line in &mut self.lines {
            line.clear();
        }
        self.selected_row = None;
    }

    /// Set text at a specific row, truncated to the screen width
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        let mut end = text.len().min(SCREEN_COLS);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        line.clear();
        let _ = line.push_str(&text[..end]);
    }

    /// Set formatted text at a specific row
    pub fn set_fmt(&mut self, row: usize, args: fmt::Arguments<'_>) {
        self.set_line(row, &fmt::format(args));
    }

    /// Set the selected row for highlighting
    pub fn set_selection(&mut self, row: usize) {
        if row < SCREEN_ROWS {
            self.selected_row = Some(row);
        }
    }

    /// Get a line of text
    pub fn get_line(&self, row: usize) -> &str {
        self.lines.get(row).map(|l| l.as_str()).unwrap_or("")
    }

    /// Get selected row
    pub fn selected_row(&self) -> Option<usize> {
        self.selected_row
    }

    /// Lines up to the last non-empty one
    pub fn used_lines(&self) -> &[Line] {
        let used = self
            .lines
            .iter()
            .rposition(|l| !l.is_empty())
            .map(|i| i + 1)
            .unwrap_or(0);
        &self.lines[..used]
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = "-".repeat(SCREEN_COLS + 2);
        writeln!(f, "+{}+", border)?;
        for row in 0..self.used_lines().len() {
            let marker = if self.selected_row == Some(row) { '>' } else { ' ' };
            writeln!(f, "|{}{:<width$} |", marker, self.get_line(row), width = SCREEN_COLS)?;
        }
        write!(f, "+{}+", border)
    }
}

/// Run state shown on the heating and paused screens
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStatus<'a> {
    /// Current stage number (1-indexed)
    pub stage_num: usize,
    /// Stages in the run
    pub total_stages: usize,
    /// Current stage name
    pub stage_name: &'a str,
    /// Current stage target (°C)
    pub target_c: f32,
    /// Countdown for the current stage (seconds)
    pub stage_remaining_s: u32,
    /// Elapsed run time (seconds)
    pub elapsed_s: u64,
    /// Total run time (seconds)
    pub total_s: u64,
    /// Overall progress, 0-100
    pub progress_percent: u8,
    /// Whether the run uses user-edited stages
    pub configured: bool,
}

/// Screen renderer for different views
pub struct Renderer {
    screen: Screen,
}

impl Renderer {
    /// Create a new renderer
    pub const fn new() -> Self {
        Self {
            screen: Screen::new(),
        }
    }

    /// Get the current screen buffer
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Render the splash screen
    pub fn render_welcome(&mut self) {
        self.screen.clear();
        self.screen.set_line(1, "    CICLOTRON");
        self.screen.set_line(3, "  Thermal cycler simulator");
        self.screen.set_line(5, "Press any key to continue");
    }

    /// Render the main menu
    pub fn render_menu(&mut self) {
        self.screen.clear();
        self.screen.set_line(0, "=== MENU ===");
        self.screen.set_line(2, "New Experiment");
        self.screen.set_selection(2);
        self.screen.set_line(4, "ENTER=Select  B=Back");
    }

    /// Render the protocol chart with its total time
    ///
    /// Each row shows one stage: a `+` where a new stage group begins, the
    /// disambiguated label, temperature, duration, a bar scaled to the
    /// temperature axis and the slope towards the next stage.
    pub fn render_setup(
        &mut self,
        protocol: &str,
        chart: &ChartProjection,
        total_s: u64,
        configured: bool,
    ) {
        self.screen.clear();
        self.screen.set_fmt(0, format_args!("= {} =", protocol));
        self.screen.set_fmt(
            1,
            format_args!("Total time: {}  ({})", format_hms(total_s), config_name(configured)),
        );
        self.screen.set_fmt(
            2,
            format_args!(
                "Axis {:.1}C .. {:.1}C",
                chart.axis_floor_c(),
                chart.axis_ceiling_c()
            ),
        );

        let boundaries = chart.group_boundaries();
        let span = chart.axis_ceiling_c() - chart.axis_floor_c();
        let mut row = 3;
        for point in &chart.points {
            let group = if point.index == 0 || boundaries.contains(&point.index) {
                '+'
            } else {
                ' '
            };
            let filled = bar_len(point.temperature_c - chart.axis_floor_c(), span);
            let slope = match chart.transition_ratio(point.index) {
                Some(r) if r > 1.0 => '/',
                Some(r) if r < 1.0 => '\\',
                _ => '-',
            };
            self.screen.set_fmt(
                row,
                format_args!(
                    "{}{:>2} {:<16} {:>6.1}C {} {:<bar$}{}",
                    group,
                    point.index + 1,
                    point.label.as_str(),
                    point.temperature_c,
                    point.duration_hms,
                    "#".repeat(filled),
                    slope,
                    bar = BAR_WIDTH
                ),
            );
            row += 1;
        }

        if chart.points.is_empty() {
            self.screen.set_line(row, "  (no stages)");
            row += 1;
        }

        self.screen
            .set_line(row + 1, "E<n>=Edit stage  T=Total time  R=Reset  S=Start");
    }

    /// Render the single-stage editor
    pub fn render_edit_stage(
        &mut self,
        stage_num: usize,
        name: &Label,
        temperature: &str,
        duration: &str,
    ) {
        self.screen.clear();
        self.screen.set_line(0, "=== EDIT STAGE ===");
        self.screen
            .set_fmt(1, format_args!("Stage {}: {}", stage_num, name));
        self.screen
            .set_fmt(3, format_args!("Temperature (C): {}", temperature));
        self.screen
            .set_fmt(4, format_args!("Duration (s):    {}", duration));
        self.screen.set_line(6, "S=Save  C=Cancel");
    }

    /// Render the total-time editor
    pub fn render_edit_total(
        &mut self,
        current_total_s: u64,
        hours: &str,
        minutes: &str,
        seconds: &str,
    ) {
        self.screen.clear();
        self.screen.set_line(0, "=== EDIT TOTAL TIME ===");
        self.screen.set_fmt(
            1,
            format_args!("Current total: {}", format_hms(current_total_s)),
        );
        self.screen.set_fmt(3, format_args!("Hours:   {}", hours));
        self.screen.set_fmt(4, format_args!("Minutes: {}", minutes));
        self.screen.set_fmt(5, format_args!("Seconds: {}", seconds));
        self.screen
            .set_line(6, "Stage durations scale to the new total");
        self.screen.set_line(8, "S=Save  C=Cancel");
    }

    /// Render the heating screen
    pub fn render_heating(&mut self, protocol: &str, status: &RunStatus<'_>) {
        self.screen.clear();
        self.screen.set_line(0, "=== HEATING ===");
        self.render_run_status(protocol, status);
        self.screen.set_line(9, "P=Pause  B=Back to setup");
    }

    /// Render the paused screen
    pub fn render_paused(&mut self, protocol: &str, status: &RunStatus<'_>) {
        self.screen.clear();
        self.screen.set_line(0, "    ** PAUSED **");
        self.render_run_status(protocol, status);
        self.screen.set_line(9, "P=Resume  B=Back to setup");
    }

    fn render_run_status(&mut self, protocol: &str, status: &RunStatus<'_>) {
        self.screen.set_line(1, protocol);
        self.screen.set_fmt(
            2,
            format_args!(
                "Stage {} of {}: {}",
                status.stage_num, status.total_stages, status.stage_name
            ),
        );
        self.screen
            .set_fmt(3, format_args!("Target: {:.1}C", status.target_c));
        self.screen.set_fmt(
            4,
            format_args!(
                "Stage remaining: {}",
                format_hms(status.stage_remaining_s as u64)
            ),
        );

        let filled = bar_len(status.progress_percent as f32, 100.0);
        self.screen.set_fmt(
            5,
            format_args!(
                "[{}{}] {}%",
                "#".repeat(filled),
                "-".repeat(BAR_WIDTH - filled),
                status.progress_percent
            ),
        );
        self.screen.set_fmt(
            6,
            format_args!(
                "Elapsed: {} / {}",
                format_hms(status.elapsed_s),
                format_hms(status.total_s)
            ),
        );
        self.screen.set_fmt(
            7,
            format_args!("Running {} configuration", config_name(status.configured)),
        );
    }

    /// Render the run complete screen
    pub fn render_complete(&mut self, protocol: &str, total_s: u64, results_in_s: Option<u16>) {
        self.screen.clear();
        self.screen.set_line(1, "   ** RUN COMPLETE **");
        self.screen.set_fmt(3, format_args!("  {}", protocol));
        self.screen
            .set_fmt(4, format_args!("  Time: {}", format_hms(total_s)));
        if let Some(s) = results_in_s {
            self.screen
                .set_fmt(6, format_args!("Showing results in {}s...", s));
        }
        self.screen
            .set_line(8, "V=View results  R=Restart  B=Back to setup");
    }

    /// Render the run summary
    pub fn render_results(
        &mut self,
        protocol: &str,
        stage_count: usize,
        total_s: u64,
        configured: bool,
    ) {
        self.screen.clear();
        self.screen.set_line(0, "=== RESULTS ===");
        self.screen.set_line(1, protocol);
        self.screen
            .set_fmt(3, format_args!("Stages run: {}", stage_count));
        self.screen
            .set_fmt(4, format_args!("Total time: {}", format_hms(total_s)));
        self.screen.set_fmt(
            5,
            format_args!("Configuration: {}", config_name(configured)),
        );
        self.screen.set_line(7, "N=New experiment  B=Menu");
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn config_name(configured: bool) -> &'static str {
    if configured {
        "custom"
    } else {
        "default"
    }
}

/// Bar length for `value` out of `span`, clamped to the bar width
fn bar_len(value: f32, span: f32) -> usize {
    if span <= 0.0 || !value.is_finite() {
        return 0;
    }
    ((value / span) * BAR_WIDTH as f32)
        .round()
        .clamp(0.0, BAR_WIDTH as f32) as usize
}
