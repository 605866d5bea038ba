use super::{DisplayStats, FrameRenderer};
use crate::error::{DisplayError, Result};
use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use image::imageops::{self, FilterType};
use image::RgbImage;
use std::io::{self, Stdout, Write};
use tracing::debug;

const UPPER_HALF_BLOCK: char = '\u{2580}';
const VIEW_GAP: u16 = 2;
const FIRST_ROW: u16 = 1;

/// Colored previews drawn with half-block characters, one view per label
/// placed side by side in the order labels first appear
pub struct TerminalRenderer<W: Write = Stdout> {
    out: W,
    columns: u16,
    views: Vec<String>,
    cleared: bool,
    stats: DisplayStats,
}

impl TerminalRenderer<Stdout> {
    pub fn new(columns: u16) -> Self {
        Self::with_writer(io::stdout(), columns)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn with_writer(out: W, columns: u16) -> Self {
        Self {
            out,
            columns,
            views: Vec::new(),
            cleared: false,
            stats: DisplayStats::default(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn view_column(&mut self, label: &str) -> u16 {
        let slot = match self.views.iter().position(|view| view == label) {
            Some(slot) => slot,
            None => {
                debug!("Opening terminal view '{}'", label);
                self.views.push(label.to_string());
                self.views.len() - 1
            }
        };
        slot as u16 * (self.columns + VIEW_GAP)
    }

    /// Preview size in pixels; each character cell shows two pixel rows
    fn preview_size(&self, image: &RgbImage) -> (u32, u32) {
        let width = self.columns as u32;
        let height = (width * image.height() / image.width().max(1)).max(2);
        (width, height + height % 2)
    }

    fn draw(&mut self, label: &str, image: &RgbImage) -> io::Result<()> {
        if !self.cleared {
            queue!(self.out, Clear(ClearType::All))?;
            self.cleared = true;
        }

        let column = self.view_column(label);
        let (width, height) = self.preview_size(image);
        let preview = imageops::resize(image, width, height, FilterType::Triangle);

        queue!(self.out, ResetColor, MoveTo(column, 0), Print(label))?;

        for cell_row in 0..height / 2 {
            queue!(self.out, MoveTo(column, FIRST_ROW + cell_row as u16))?;
            for x in 0..width {
                let top = preview.get_pixel(x, cell_row * 2).0;
                let bottom = preview.get_pixel(x, cell_row * 2 + 1).0;
                queue!(
                    self.out,
                    SetForegroundColor(Color::Rgb {
                        r: top[0],
                        g: top[1],
                        b: top[2]
                    }),
                    SetBackgroundColor(Color::Rgb {
                        r: bottom[0],
                        g: bottom[1],
                        b: bottom[2]
                    }),
                    Print(UPPER_HALF_BLOCK)
                )?;
            }
            queue!(self.out, ResetColor)?;
        }

        self.out.flush()
    }
}

impl<W: Write> FrameRenderer for TerminalRenderer<W> {
    fn render(&mut self, label: &str, image: &RgbImage) -> Result<()> {
        match self.draw(label, image) {
            Ok(()) => {
                self.stats.record_frame_render(label);
                Ok(())
            }
            Err(e) => {
                self.stats.record_render_error();
                Err(DisplayError::Terminal {
                    details: e.to_string(),
                }
                .into())
            }
        }
    }

    fn stats(&self) -> &DisplayStats {
        &self.stats
    }
}
