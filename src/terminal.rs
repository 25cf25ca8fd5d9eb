// SPDX-License-Identifier: GPL-3.0-only

//! Terminal-based zone viewer
//!
//! Renders the classified depth view to the terminal using Unicode
//! half-block characters: ladder zones in their urgency colors, valid but
//! unclassified depth as grayscale (near = bright), invalid pixels black.
//! A keyboard cursor takes the place of the mouse: moving it and pressing
//! Enter submits a point query at that pixel.

use crate::backends::input::{ClickSender, click_channel};
use crate::backends::sensor::synthetic::SyntheticSession;
use crate::backends::sensor::{DepthFrame, DepthSession};
use crate::config::Config;
use crate::engine::classifier::ClassificationResult;
use crate::engine::query::DisplayItem;
use crate::engine::{AlertEvent, Engine};
use crate::errors::SensorError;
use crate::render::zone_color;
use crate::storage::DistanceLog;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal, backend::CrosstermBackend, buffer::Buffer, layout::Rect, style::Color,
    style::Style, widgets::Widget,
};
use std::io::{self, stdout};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Grayscale shading range for unclassified depth (mm)
const GRAY_NEAR_MM: f32 = 400.0;
const GRAY_FAR_MM: f32 = 4_000.0;

/// Cursor step per arrow key press, in frame pixels
const CURSOR_STEP_PX: u32 = 8;

/// Run the terminal zone viewer
pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, config);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if result.is_ok() {
        println!("Distance data saved to {}", config.csv_path().display());
    }
    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let ladder = config.ladder()?;
    let mut session = SyntheticSession::open(config.sensor);
    let (width, height) = session.resolution();
    let mut engine = Engine::new(
        ladder.clone(),
        width,
        height,
        config.query_ttl(),
        config.query_policy,
    );
    let mut log = DistanceLog::create(&config.csv_path())?;
    let (mut clicks_tx, mut clicks_rx) = click_channel(32);

    let legend: Vec<(String, Color)> = crate::render::legend(&ladder)
        .into_iter()
        .map(|(label, c)| (label, Color::Rgb(c[0], c[1], c[2])))
        .collect();

    let mut view = ZoneView::new(legend, (width / 2, height / 2));
    let mut status_message = build_status_message();
    let mut last_alert: Option<AlertEvent> = None;

    let run_result = loop {
        // One tick: blocking frame wait paced at the sensor rate
        let frame = match session.wait_next_frame() {
            Ok(frame) => frame,
            Err(SensorError::FrameTimeout) => continue,
            Err(e) => break Err(e.into()),
        };
        let now = Instant::now();

        for click in clicks_rx.drain() {
            if let Err(e) = engine.submit_click(click.x, click.y, click.at) {
                warn!(error = %e, "Dropping out-of-range query");
            }
        }

        let output = engine.tick(&frame, now);
        if let Some(alert) = output.alert {
            last_alert = Some(alert);
            // Terminal bell; the status bar shows the details
            let _ = std::io::Write::write_all(&mut stdout(), b"\x07");
        }
        for record in &output.records {
            if let Err(e) = log.append(record) {
                warn!(error = %e, "Failed to persist distance record");
            }
        }

        view.update(frame, output.classification, output.display);

        // Draw
        terminal.draw(|f| {
            let area = f.area();

            let view_area = Rect {
                x: area.x,
                y: area.y,
                width: area.width,
                height: area.height.saturating_sub(1),
            };
            f.render_widget(&view, view_area);

            let status_area = Rect {
                x: area.x,
                y: area.y + area.height.saturating_sub(1),
                width: area.width,
                height: 1,
            };
            let status = StatusBar {
                closest: view.result.as_ref().map(|r| (r.closest_m, r.closest_at)),
                last_alert,
                cursor: view.cursor,
                message: &status_message,
            };
            f.render_widget(status, status_area);
        })?;

        // Handle input with a short poll so frame pacing dominates
        if event::poll(Duration::from_millis(5))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            // Ctrl+C or 'q' to quit
            if key.code == KeyCode::Char('q')
                || (key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL))
            {
                break Ok(());
            }

            match key.code {
                KeyCode::Left => view.move_cursor(-(CURSOR_STEP_PX as i64), 0, width, height),
                KeyCode::Right => view.move_cursor(CURSOR_STEP_PX as i64, 0, width, height),
                KeyCode::Up => view.move_cursor(0, -(CURSOR_STEP_PX as i64), width, height),
                KeyCode::Down => view.move_cursor(0, CURSOR_STEP_PX as i64, width, height),
                KeyCode::Enter | KeyCode::Char(' ') => {
                    submit_at_cursor(&mut clicks_tx, view.cursor);
                    status_message =
                        format!("Queried ({}, {})", view.cursor.0, view.cursor.1);
                }
                KeyCode::Char('p') => match save_snapshot(&view) {
                    Ok(path) => status_message = format!("Saved: {}", path),
                    Err(e) => status_message = format!("Error: {}", e),
                },
                _ => {}
            }
        }
    };

    if let Err(e) = session.close() {
        warn!(error = %e, "Failed to close sensor session");
    }
    if let Err(e) = log.flush() {
        warn!(error = %e, "Failed to flush distance log");
    }

    run_result
}

fn submit_at_cursor(clicks: &mut ClickSender, cursor: (u32, u32)) {
    clicks.submit(cursor.0, cursor.1);
}

fn save_snapshot(view: &ZoneView) -> Result<String, Box<dyn std::error::Error>> {
    let result = view.result.as_ref().ok_or("No frame yet")?;
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let path = std::path::PathBuf::from(format!("zones_{}.png", timestamp));
    crate::render::save_snapshot(result, &path)?;
    info!(path = %path.display(), "Snapshot saved");
    Ok(path.display().to_string())
}

fn build_status_message() -> String {
    "arrows: move cursor | enter: query distance | 'p' snapshot | 'q' quit".to_string()
}

/// Widget that renders the classified depth view with half-block characters
struct ZoneView {
    frame: Option<DepthFrame>,
    result: Option<ClassificationResult>,
    display: Vec<DisplayItem>,
    legend: Vec<(String, Color)>,
    cursor: (u32, u32),
}

impl ZoneView {
    fn new(legend: Vec<(String, Color)>, cursor: (u32, u32)) -> Self {
        Self {
            frame: None,
            result: None,
            display: Vec::new(),
            legend,
            cursor,
        }
    }

    fn update(
        &mut self,
        frame: DepthFrame,
        result: ClassificationResult,
        display: Vec<DisplayItem>,
    ) {
        self.frame = Some(frame);
        self.result = Some(result);
        self.display = display;
    }

    fn move_cursor(&mut self, dx: i64, dy: i64, width: u32, height: u32) {
        let x = (self.cursor.0 as i64 + dx).clamp(0, width as i64 - 1) as u32;
        let y = (self.cursor.1 as i64 + dy).clamp(0, height as i64 - 1) as u32;
        self.cursor = (x, y);
    }
}

impl Widget for &ZoneView {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (Some(frame), Some(result)) = (&self.frame, &self.result) else {
            let msg = "Waiting for depth frames...";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };

        // Calculate display dimensions maintaining aspect ratio.
        // Each terminal cell displays 2 vertical pixels using half-blocks.
        let frame_aspect = frame.width as f64 / frame.height as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = frame.width as f64 / display_width as f64;
        let y_scale = frame.height as f64 / (display_height * 2) as f64;

        for ty in 0..display_height {
            for tx in 0..display_width {
                let term_x = x_offset + tx;
                let term_y = y_offset + ty;
                if term_x >= area.x + area.width || term_y >= area.y + area.height {
                    continue;
                }

                let src_x = (tx as f64 * x_scale) as u32;
                let src_y_top = (ty as f64 * 2.0 * y_scale) as u32;
                let src_y_bottom = ((ty as f64 * 2.0 + 1.0) * y_scale) as u32;

                let top_color = sample_color(frame, result, src_x, src_y_top);
                let bottom_color = sample_color(frame, result, src_x, src_y_bottom);

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(top_color);
                    cell.set_bg(bottom_color);
                }
            }
        }

        // Frame-to-cell transform for markers and labels
        let to_cell = |px: u32, py: u32| -> (u16, u16) {
            let cx = x_offset + ((px as f64 / x_scale) as u16).min(display_width - 1);
            let cy = y_offset + ((py as f64 / (y_scale * 2.0)) as u16).min(display_height - 1);
            (cx, cy)
        };

        // Cursor marker
        let (cx, cy) = to_cell(self.cursor.0, self.cursor.1);
        if let Some(cell) = buf.cell_mut((cx, cy)) {
            cell.set_char('+');
            cell.set_fg(Color::White);
            cell.set_bg(Color::Black);
        }

        // Resolved query labels, next to their pixel
        for item in &self.display {
            let (ix, iy) = to_cell(item.x, item.y);
            let label = format!("{:.2} m", item.distance_m);
            let lx = (ix + 1).min(area.x + area.width.saturating_sub(label.len() as u16));
            buf.set_string(lx, iy, label, Style::default().fg(Color::White));
        }

        // Legend in the top-left corner
        buf.set_string(area.x + 1, area.y, "Legend", Style::default().fg(Color::White));
        for (i, (label, color)) in self.legend.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= area.y + area.height {
                break;
            }
            buf.set_string(area.x + 1, y, "██", Style::default().fg(*color));
            buf.set_string(area.x + 4, y, label, Style::default().fg(Color::White));
        }
    }
}

/// Zone pixels get the urgency palette; valid but unclassified depth is
/// shaded near = bright, far = dark; invalid is black.
fn sample_color(frame: &DepthFrame, result: &ClassificationResult, x: u32, y: u32) -> Color {
    let x = x.min(frame.width - 1);
    let y = y.min(frame.height - 1);
    match result.zone_at(x, y) {
        Some(zone) => {
            let c = zone_color(zone as usize);
            Color::Rgb(c[0], c[1], c[2])
        }
        None => {
            let mm = frame.depth_mm[(y * frame.width + x) as usize];
            if mm == 0 {
                Color::Black
            } else {
                let t = ((mm as f32 - GRAY_NEAR_MM) / (GRAY_FAR_MM - GRAY_NEAR_MM))
                    .clamp(0.0, 1.0);
                let gray = ((1.0 - t) * 200.0) as u8;
                Color::Rgb(gray, gray, gray)
            }
        }
    }
}

/// Single-line status bar: closest distance, last alert, cursor, key hints
struct StatusBar<'a> {
    closest: Option<(f32, Option<(u32, u32)>)>,
    last_alert: Option<AlertEvent>,
    cursor: (u32, u32),
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let closest = match self.closest {
            Some((d, Some((x, y)))) if d.is_finite() => format!("closest {:.2}m @({},{})", d, x, y),
            _ => "no target".to_string(),
        };
        let alert = match self.last_alert {
            Some(a) => format!(" | alert z{} {:.2}m", a.zone, a.distance_m),
            None => String::new(),
        };
        let line = format!(
            "{}{} | cursor ({},{}) | {}",
            closest, alert, self.cursor.0, self.cursor.1, self.message
        );
        buf.set_string(area.x, area.y, line, Style::default().fg(Color::White));
    }
}
