// SPDX-License-Identifier: GPL-3.0-only

//! Terminal photo booth
//!
//! Renders the live preview to the terminal using Unicode half-block
//! characters for improved vertical resolution, with the photo wall listed
//! alongside.

use crate::app::AppModel;
use crate::backends::camera::SourceSpec;
use crate::caption::PresetCaptions;
use crate::config::Config;
use crate::effects::FilterPreset;
use crate::errors::AppResult;
use crate::pipelines::photo::PhotoPipeline;
use crate::wall::PolaroidPhoto;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::FutureExt;
use image::RgbaImage;
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget},
};
use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// How far H/J/K/L move the selected card
const NUDGE: f64 = 20.0;

/// Run the terminal photo booth
pub fn run(config: Config, source: Option<SourceSpec>) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let mut model = match source {
        Some(source) => {
            let pipeline = PhotoPipeline::from_config(&config);
            let captions = Arc::new(PresetCaptions::new(config.timings.caption_delay()));
            AppModel::with_parts(
                config,
                source.into_backend(),
                pipeline,
                captions,
                runtime.handle().clone(),
            )
        }
        None => AppModel::new(config, runtime.handle().clone()),
    };

    // Font loading would otherwise stall the first sticker shot past the flash
    let pipeline = model.pipeline.clone();
    runtime.spawn_blocking(move || pipeline.warm_up());

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the booth
    let result = run_app(&mut terminal, &mut model);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Terminal booth closed");
    result
}

/// Interactive state that only the terminal frontend cares about
struct BoothUi {
    selected: usize,
    show_help: bool,
    status_message: Option<String>,
    exports: Vec<JoinHandle<AppResult<PathBuf>>>,
}

impl BoothUi {
    fn new() -> Self {
        Self {
            selected: 0,
            show_help: false,
            status_message: None,
            exports: Vec::new(),
        }
    }

    /// Collect finished exports into the status line
    fn poll_exports(&mut self) {
        let mut pending = Vec::with_capacity(self.exports.len());
        for mut handle in self.exports.drain(..) {
            match (&mut handle).now_or_never() {
                None => pending.push(handle),
                Some(Ok(Ok(path))) => {
                    self.status_message = Some(format!("Saved: {}", path.display()));
                }
                Some(Ok(Err(e))) => {
                    error!(error = %e, "Failed to export photo");
                    self.status_message = Some(format!("Error: {}", e));
                }
                Some(Err(e)) => {
                    error!(error = %e, "Export task failed");
                    self.status_message = Some(format!("Error: {}", e));
                }
            }
        }
        self.exports = pending;
    }
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    model: &mut AppModel,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ui = BoothUi::new();

    loop {
        ui.poll_exports();
        let photos = model.photos();
        if ui.selected >= photos.len() {
            ui.selected = photos.len().saturating_sub(1);
        }

        let size = terminal.size()?;
        let (camera_area, wall_area, status_area) =
            split_screen(Rect::new(0, 0, size.width, size.height));

        // Preview is rendered at two pixel rows per cell
        let preview = model.preview(camera_area.width.into(), u32::from(camera_area.height) * 2);
        let frame_widget = FrameWidget {
            image: preview,
            flash: model.flash.is_visible(),
            error: model.camera_error(),
            sticker: model.controls.sticker.as_ref().map(|s| s.glyph().to_string()),
        };
        let wall_widget = WallWidget {
            photos: &photos,
            selected: ui.selected,
        };
        let status_message = build_status_message(model, &ui);
        let status = StatusBar {
            message: &status_message,
        };

        terminal.draw(|f| {
            f.render_widget(&frame_widget, camera_area);
            f.render_widget(wall_widget, wall_area);
            f.render_widget(status, status_area);
        })?;

        // Handle input with timeout for frame updates
        if event::poll(Duration::from_millis(16))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            // Ctrl+C to quit
            if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                break;
            }

            let selected_id = photos.get(ui.selected).map(|p| p.id);
            let selected_pos = photos.get(ui.selected).map(|p| (p.x, p.y));

            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Enter => {
                    // A press while developing is already shown in the status bar
                    ui.status_message = match model.take_picture() {
                        None if !model.is_processing() && model.camera_error().is_none() => {
                            Some("No frame yet".to_string())
                        }
                        _ => None,
                    };
                }
                KeyCode::Char('f') => {
                    model.controls.cycle_filter(true);
                }
                KeyCode::Char('F') => {
                    model.controls.cycle_filter(false);
                }
                KeyCode::Char('+') | KeyCode::Char('=') => {
                    model.controls.increase_beauty();
                }
                KeyCode::Char('-') => {
                    model.controls.decrease_beauty();
                }
                KeyCode::Char('s') => {
                    model.controls.cycle_sticker();
                }
                KeyCode::Char('r') => {
                    ui.status_message = (!model.retry_camera())
                        .then(|| "Camera request failed".to_string());
                }
                KeyCode::Char('R') => {
                    model.restart();
                    ui.selected = 0;
                    ui.status_message = Some("Restarted".to_string());
                }
                KeyCode::Char('c') => {
                    model.clear_wall();
                    ui.selected = 0;
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    ui.selected = ui.selected.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    ui.selected = (ui.selected + 1).min(photos.len().saturating_sub(1));
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    if let Some(id) = selected_id {
                        model.delete_photo(id);
                    }
                }
                KeyCode::Char('e') => {
                    if let Some(id) = selected_id {
                        match model.export_photo(id) {
                            Ok(handle) => ui.exports.push(handle),
                            Err(e) => ui.status_message = Some(format!("Error: {}", e)),
                        }
                    }
                }
                KeyCode::Char(c @ ('H' | 'J' | 'K' | 'L')) => {
                    if let (Some(id), Some((x, y))) = (selected_id, selected_pos) {
                        let (dx, dy) = match c {
                            'H' => (-NUDGE, 0.0),
                            'L' => (NUDGE, 0.0),
                            'K' => (0.0, -NUDGE),
                            _ => (0.0, NUDGE),
                        };
                        model.drag_photo(id, x + dx, y + dy);
                    }
                }
                KeyCode::Char('h') | KeyCode::Char('?') => {
                    ui.show_help = !ui.show_help;
                }
                _ => {}
            }
        }
    }

    Ok(())
}

/// Camera on the left, wall on the right, status line at the bottom
fn split_screen(area: Rect) -> (Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
        .split(rows[0]);
    (columns[0], columns[1], rows[1])
}

fn build_status_message(model: &AppModel, ui: &BoothUi) -> String {
    if ui.show_help {
        return "space: Shutter | f/F: Filter | +/-: Beauty | s: Sticker | r: Retry camera | \
                R: Restart | c: Clear wall | j/k: Select | HJKL: Move | d: Delete | e: Export | \
                q: Quit"
            .to_string();
    }

    let controls = &model.controls;
    let mut msg = format!(
        "{} | Beauty {}",
        filter_label(controls.filter),
        controls.beauty
    );
    if let Some(sticker) = &controls.sticker {
        msg.push_str(&format!(" | Sticker {}", sticker));
    }
    if model.is_processing() {
        msg.push_str(" | Developing...");
    }
    if let Some(status) = &ui.status_message {
        msg.push_str(" | ");
        msg.push_str(status);
    }
    msg.push_str(" | 'h' help");
    msg
}

fn filter_label(filter: FilterPreset) -> String {
    format!("Filter {} ({})", filter.display_name(), filter.key())
}

/// Widget that renders the preview using half-block characters
struct FrameWidget {
    image: Option<RgbaImage>,
    flash: bool,
    error: Option<&'static str>,
    /// Selected sticker, drawn over the centre of the lens
    sticker: Option<String>,
}

impl Widget for &FrameWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.flash {
            buf.set_style(area, Style::default().bg(Color::White));
            return;
        }

        let Some(image) = &self.image else {
            let msg = match self.error {
                Some(error) => format!("{} - press 'r' to retry", error),
                None => "Waiting for camera...".to_string(),
            };
            let x = area.x + (area.width.saturating_sub(msg.chars().count() as u16)) / 2;
            let y = area.y + area.height / 2;
            if y < area.y + area.height && x < area.x + area.width {
                buf.set_string(x, y, msg, Style::default());
            }
            return;
        };

        if image.width() == 0 || image.height() == 0 {
            return;
        }

        // Calculate display dimensions maintaining aspect ratio
        // Each terminal cell displays 2 vertical pixels using half-block characters
        let frame_aspect = image.width() as f64 / image.height() as f64;
        let term_width = area.width as f64;
        let term_height = (area.height * 2) as f64;

        let (display_width, display_height) = if term_width / term_height > frame_aspect {
            // Terminal is wider - fit to height
            let h = term_height;
            let w = h * frame_aspect;
            (w as u16, (h / 2.0) as u16)
        } else {
            // Terminal is taller - fit to width
            let w = term_width;
            let h = w / frame_aspect;
            (w as u16, (h / 2.0) as u16)
        };
        if display_width == 0 || display_height == 0 {
            return;
        }

        // Center the image
        let x_offset = area.x + (area.width.saturating_sub(display_width)) / 2;
        let y_offset = area.y + (area.height.saturating_sub(display_height)) / 2;

        let x_scale = image.width() as f64 / display_width as f64;
        let y_scale = image.height() as f64 / (display_height * 2) as f64;

        // Upper half (▀) colored with fg, lower half colored with bg
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

                if let Some(cell) = buf.cell_mut((term_x, term_y)) {
                    cell.set_char('▀');
                    cell.set_fg(sample_pixel(image, src_x, src_y_top));
                    cell.set_bg(sample_pixel(image, src_x, src_y_bottom));
                }
            }
        }

        if let Some(glyph) = &self.sticker {
            let glyph_width = Line::from(glyph.as_str()).width() as u16;
            if glyph_width <= display_width {
                let x = x_offset + (display_width - glyph_width) / 2;
                let y = y_offset + display_height / 2;
                // Keep the preview colour behind the glyph
                buf.set_string(x, y, glyph, Style::default());
            }
        }
    }
}

fn sample_pixel(image: &RgbaImage, x: u32, y: u32) -> Color {
    let x = x.min(image.width() - 1);
    let y = y.min(image.height() - 1);
    let [r, g, b, _] = image.get_pixel(x, y).0;
    Color::Rgb(r, g, b)
}

/// List of the cards on the wall, newest last
struct WallWidget<'a> {
    photos: &'a [PolaroidPhoto],
    selected: usize,
}

impl Widget for WallWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = format!(" Wall ({}) ", self.photos.len());
        let lines: Vec<Line> = if self.photos.is_empty() {
            vec![Line::from("No photos yet")]
        } else {
            self.photos
                .iter()
                .enumerate()
                .map(|(i, photo)| {
                    let text = format!(
                        "{} {}  {}",
                        photo.taken_at.format("%H:%M:%S"),
                        if photo.is_developing { "…" } else { "■" },
                        if photo.has_caption() {
                            photo.caption.as_str()
                        } else {
                            "(captioning)"
                        }
                    );
                    let style = if i == self.selected {
                        Style::default().add_modifier(Modifier::REVERSED)
                    } else if photo.is_developing {
                        Style::default().fg(Color::DarkGray)
                    } else {
                        Style::default()
                    };
                    Line::styled(text, style)
                })
                .collect()
        };

        Paragraph::new(lines)
            .block(Block::default().borders(Borders::LEFT).title(title))
            .render(area, buf);
    }
}

/// Status bar widget
struct StatusBar<'a> {
    message: &'a str,
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        for x in area.x..area.x + area.width {
            if let Some(cell) = buf.cell_mut((x, area.y)) {
                cell.set_char(' ');
                cell.set_bg(Color::DarkGray);
            }
        }

        // Render message
        let msg = if self.message.chars().count() > area.width as usize {
            self.message
                .chars()
                .take(area.width as usize)
                .collect::<String>()
        } else {
            self.message.to_string()
        };

        buf.set_string(
            area.x,
            area.y,
            &msg,
            Style::default().fg(Color::White).bg(Color::DarkGray),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_split_screen_reserves_status_line() {
        let (camera, wall, status) = split_screen(Rect::new(0, 0, 100, 40));
        assert_eq!(status.height, 1);
        assert_eq!(status.y, 39);
        assert_eq!(camera.height, 39);
        assert_eq!(camera.width + wall.width, 100);
    }

    #[test]
    fn test_frame_widget_draws_half_blocks() {
        let widget = FrameWidget {
            image: Some(RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 255]))),
            flash: false,
            error: None,
            sticker: None,
        };
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);
        let cell = &buf[(0, 0)];
        assert_eq!(cell.symbol(), "▀");
        assert_eq!(cell.fg, Color::Rgb(10, 20, 30));
    }

    #[test]
    fn test_frame_widget_overlays_sticker() {
        let widget = FrameWidget {
            image: Some(RgbaImage::from_pixel(8, 8, Rgba([10, 20, 30, 255]))),
            flash: false,
            error: None,
            sticker: Some("🔥".to_string()),
        };
        let area = Rect::new(0, 0, 8, 4);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);
        assert_eq!(buf[(3, 2)].symbol(), "🔥");
        assert_eq!(buf[(3, 2)].bg, Color::Rgb(10, 20, 30));
        assert_eq!(buf[(0, 0)].symbol(), "▀");
    }

    #[test]
    fn test_frame_widget_shows_camera_error() {
        let widget = FrameWidget {
            image: None,
            flash: false,
            error: Some("Permissions needed"),
            sticker: None,
        };
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);
        let row: String = (0..60).map(|x| buf[(x, 1)].symbol().to_string()).collect();
        assert!(row.contains("Permissions needed"));
    }

    #[test]
    fn test_flash_whites_out_preview() {
        let widget = FrameWidget {
            image: None,
            flash: true,
            error: None,
            sticker: None,
        };
        let area = Rect::new(0, 0, 3, 3);
        let mut buf = Buffer::empty(area);
        (&widget).render(area, &mut buf);
        assert_eq!(buf[(1, 1)].bg, Color::White);
    }
}
