//! Terminal output for framebuffers.
//!
//! The first frame (and any frame after a resize or [`TerminalRenderer::invalidate`])
//! is painted in full. Later frames only repaint the spans of cells that
//! differ from what is already on screen. A double-width glyph is printed
//! from its lead cell; its continuation cell never produces output.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

/// Owns stdout while the game screen is up and remembers what it shows.
pub struct TerminalRenderer {
    stdout: io::Stdout,
    /// Frame currently on screen, `None` when it must be repainted.
    shown: Option<FrameBuffer>,
    out: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            shown: None,
            out: Vec::with_capacity(64 * 1024),
        }
    }

    /// Switch to raw mode on the alternate screen, with the cursor hidden and
    /// mouse clicks reported.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.send(|out| {
            out.queue(terminal::EnterAlternateScreen)?
                .queue(EnableMouseCapture)?
                .queue(cursor::Hide)?
                .queue(terminal::DisableLineWrap)?;
            Ok(())
        })
    }

    /// Undo everything [`enter`](Self::enter) changed.
    pub fn exit(&mut self) -> Result<()> {
        self.send(|out| {
            reset_style(out)?;
            out.queue(terminal::EnableLineWrap)?
                .queue(cursor::Show)?
                .queue(DisableMouseCapture)?
                .queue(terminal::LeaveAlternateScreen)?;
            Ok(())
        })?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Repaint everything on the next draw. Call after a resize.
    pub fn invalidate(&mut self) {
        self.shown = None;
    }

    /// Put `fb` on screen.
    ///
    /// On return `fb` holds the previously shown frame (resized to match),
    /// ready to be rendered into again, so no frame is ever cloned.
    pub fn draw_swap(&mut self, fb: &mut FrameBuffer) -> Result<()> {
        let (width, height) = (fb.width(), fb.height());
        let mut previous = match self.shown.take() {
            Some(shown) if shown.width() == width && shown.height() == height => {
                self.send(|out| encode_diff_into(&shown, fb, out))?;
                shown
            }
            stale => {
                self.send(|out| encode_full_into(fb, out))?;
                let mut spare = stale.unwrap_or_else(|| FrameBuffer::new(width, height));
                spare.resize(width, height);
                spare
            }
        };

        std::mem::swap(&mut previous, fb);
        self.shown = Some(previous);
        Ok(())
    }

    fn send(&mut self, encode: impl FnOnce(&mut Vec<u8>) -> Result<()>) -> Result<()> {
        self.out.clear();
        encode(&mut self.out)?;
        self.stdout.write_all(&self.out)?;
        self.stdout.flush()?;
        Ok(())
    }
}

/// Encode a clear-and-repaint of the whole frame into `out`.
pub fn encode_full_into(fb: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    let mut writer = SpanWriter::new(out);
    // One span per row: wide glyphs cannot push later rows out of place.
    for y in 0..fb.height() {
        writer.write(fb, Span { x: 0, y, len: fb.width() })?;
    }
    writer.finish()?;
    Ok(())
}

/// Encode only what changed between `prev` and `next` into `out`.
pub fn encode_diff_into(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut writer = SpanWriter::new(out);
    for span in ChangedSpans::new(prev, next) {
        writer.write(next, span)?;
    }
    writer.finish()?;
    Ok(())
}

/// Cells `x..x + len` of row `y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    x: u16,
    y: u16,
    len: u16,
}

/// Prints spans of a framebuffer, emitting style commands only when the
/// style actually changes between printed cells.
struct SpanWriter<'a> {
    out: &'a mut Vec<u8>,
    style: Option<CellStyle>,
}

impl<'a> SpanWriter<'a> {
    fn new(out: &'a mut Vec<u8>) -> Self {
        Self { out, style: None }
    }

    fn write(&mut self, fb: &FrameBuffer, span: Span) -> io::Result<()> {
        self.out.queue(cursor::MoveTo(span.x, span.y))?;
        for x in span.x..span.x.saturating_add(span.len) {
            let cell = fb.get(x, span.y).unwrap_or_default();
            if cell.is_continuation() {
                continue;
            }
            if self.style != Some(cell.style) {
                set_style(self.out, cell.style)?;
                self.style = Some(cell.style);
            }
            self.out.queue(Print(cell.ch))?;
        }
        Ok(())
    }

    fn finish(self) -> io::Result<()> {
        reset_style(self.out)
    }
}

fn set_style(out: &mut Vec<u8>, style: CellStyle) -> io::Result<()> {
    out.queue(SetForegroundColor(to_color(style.fg)))?
        .queue(SetBackgroundColor(to_color(style.bg)))?
        .queue(SetAttribute(Attribute::Reset))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn reset_style(out: &mut Vec<u8>) -> io::Result<()> {
    out.queue(ResetColor)?.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn to_color(Rgb { r, g, b }: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

/// Maximal spans of differing cells, row by row.
///
/// Frames of different sizes yield every row in full. A span whose first
/// differing cell is a continuation starts one cell earlier so the owning
/// glyph is reprinted.
struct ChangedSpans<'a> {
    prev: &'a FrameBuffer,
    next: &'a FrameBuffer,
    whole_rows: bool,
    x: u16,
    y: u16,
}

impl<'a> ChangedSpans<'a> {
    fn new(prev: &'a FrameBuffer, next: &'a FrameBuffer) -> Self {
        Self {
            prev,
            next,
            whole_rows: prev.width() != next.width() || prev.height() != next.height(),
            x: 0,
            y: 0,
        }
    }

    fn differs(&self, x: u16) -> bool {
        self.prev.get(x, self.y) != self.next.get(x, self.y)
    }
}

impl Iterator for ChangedSpans<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let width = self.next.width();
        while self.y < self.next.height() {
            let y = self.y;
            if self.whole_rows {
                self.y += 1;
                return Some(Span { x: 0, y, len: width });
            }

            while self.x < width && !self.differs(self.x) {
                self.x += 1;
            }
            if self.x < width {
                let first = self.x;
                while self.x < width && self.differs(self.x) {
                    self.x += 1;
                }
                let on_continuation = self.next.get(first, y).is_some_and(|c| c.is_continuation());
                let start = if first > 0 && on_continuation { first - 1 } else { first };
                return Some(Span { x: start, y, len: self.x - start });
            }

            self.x = 0;
            self.y += 1;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::{Cell, CellStyle, CONTINUATION};

    fn spans(a: &FrameBuffer, b: &FrameBuffer) -> Vec<(u16, u16, u16)> {
        ChangedSpans::new(a, b).map(|s| (s.x, s.y, s.len)).collect()
    }

    #[test]
    fn to_color_keeps_channels() {
        assert_eq!(to_color(Rgb::new(1, 2, 3)), Color::Rgb { r: 1, g: 2, b: 3 });
    }

    #[test]
    fn adjacent_changes_form_one_span() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(5, 1);
        let mut b = FrameBuffer::new(5, 1);
        for x in 1..=3 {
            b.set(x, 0, Cell { ch: 'X', style });
        }
        assert_eq!(spans(&a, &b), vec![(1, 0, 3)]);
    }

    #[test]
    fn separate_changes_form_separate_spans() {
        let style = CellStyle::default();
        let a = FrameBuffer::new(6, 2);
        let mut b = a.clone();
        b.set(0, 0, Cell { ch: 'a', style });
        b.set(5, 0, Cell { ch: 'b', style });
        b.set(2, 1, Cell { ch: 'c', style });
        assert_eq!(spans(&a, &b), vec![(0, 0, 1), (5, 0, 1), (2, 1, 1)]);
    }

    #[test]
    fn size_change_repaints_every_row() {
        let a = FrameBuffer::new(3, 1);
        let b = FrameBuffer::new(4, 2);
        assert_eq!(spans(&a, &b), vec![(0, 0, 4), (0, 1, 4)]);
    }

    #[test]
    fn span_starting_on_continuation_includes_glyph() {
        let style = CellStyle::default();
        let mut a = FrameBuffer::new(4, 1);
        a.put_str(0, 0, "🐶", style);
        let mut b = a.clone();
        // Same glyph, different style on the right half only.
        b.set(1, 0, style.bold().into_cell(CONTINUATION));
        assert_eq!(spans(&a, &b), vec![(0, 0, 2)]);
    }

    #[test]
    fn encoders_skip_continuation_cells() {
        let style = CellStyle::default();
        let mut fb = FrameBuffer::new(3, 1);
        fb.put_str(0, 0, "🐱x", style);

        let mut out = Vec::new();
        encode_full_into(&fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("🐱x"));
        assert!(!text.contains('\0'));

        let mut out = Vec::new();
        encode_diff_into(&FrameBuffer::new(3, 1), &fb, &mut out).unwrap();
        assert!(!out.contains(&0u8));
    }

    #[test]
    fn style_is_emitted_once_per_change() {
        let plain = CellStyle::default();
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(0, 0, "ab", plain);
        fb.put_str(2, 0, "cd", plain.bold());

        let mut out = Vec::new();
        encode_diff_into(&FrameBuffer::new(4, 1), &fb, &mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        // ESC[1m turns bold on; it appears only where the style switches.
        assert_eq!(text.matches("\u{1b}[1m").count(), 1);
        assert!(text.contains("ab"));
        assert!(text.contains("cd"));
    }

    #[test]
    fn identical_frames_encode_nothing_but_reset() {
        let mut fb = FrameBuffer::new(4, 2);
        fb.put_str(0, 1, "ab", CellStyle::default());
        assert!(spans(&fb, &fb.clone()).is_empty());

        let mut diff = Vec::new();
        encode_diff_into(&fb, &fb.clone(), &mut diff).unwrap();
        let mut reset = Vec::new();
        reset_style(&mut reset).unwrap();
        assert_eq!(diff, reset);
    }
}
