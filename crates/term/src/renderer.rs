//! Flushes framebuffers to the real terminal through crossterm.
//!
//! The first frame after `enter` (and after any `invalidate`) is a full
//! repaint; every later frame is encoded as cursor moves plus the runs of
//! cells that changed, which keeps redraw traffic tiny while gravity only
//! moves one piece per frame.

use std::io::{self, Write};
use std::mem;

use anyhow::Result;

use crossterm::{
    cursor,
    style::{
        Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
    },
    terminal, QueueableCommand,
};

use crate::fb::{CellStyle, FrameBuffer, Rgb};

pub struct TerminalRenderer {
    out: io::Stdout,
    prev: Option<FrameBuffer>,
    ansi: Vec<u8>,
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            prev: None,
            ansi: Vec::with_capacity(32 * 1024),
        }
    }

    /// Switch the terminal into game mode: raw input, alternate screen,
    /// hidden cursor, no line wrap.
    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.ansi.clear();
        self.ansi.queue(terminal::EnterAlternateScreen)?;
        self.ansi.queue(cursor::Hide)?;
        self.ansi.queue(terminal::DisableLineWrap)?;
        self.flush()
    }

    /// Restore the terminal. Safe to call after a partial `enter`.
    pub fn exit(&mut self) -> Result<()> {
        self.ansi.clear();
        self.ansi.queue(ResetColor)?;
        self.ansi.queue(SetAttribute(Attribute::Reset))?;
        self.ansi.queue(terminal::EnableLineWrap)?;
        self.ansi.queue(cursor::Show)?;
        self.ansi.queue(terminal::LeaveAlternateScreen)?;
        self.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Drop the remembered frame so the next `present` repaints everything.
    /// Needed after terminal resize events.
    pub fn invalidate(&mut self) {
        self.prev = None;
    }

    /// Write one frame to the terminal.
    ///
    /// The buffer is swapped into the renderer and the caller gets the
    /// previous one back, so a single allocation serves every frame.
    pub fn present(&mut self, frame: &mut FrameBuffer) -> Result<()> {
        self.ansi.clear();
        match self.prev.take() {
            Some(mut prev)
                if prev.width() == frame.width() && prev.height() == frame.height() =>
            {
                encode_changes(&prev, frame, &mut self.ansi)?;
                mem::swap(&mut prev, frame);
                self.prev = Some(prev);
            }
            _ => {
                encode_frame(frame, &mut self.ansi)?;
                let mut rendered = FrameBuffer::new(frame.width(), frame.height());
                mem::swap(&mut rendered, frame);
                self.prev = Some(rendered);
            }
        }
        self.flush()
    }

    fn flush(&mut self) -> Result<()> {
        self.out.write_all(&self.ansi)?;
        self.out.flush()?;
        Ok(())
    }
}

/// Encode a full repaint into `out`, clearing the screen first.
pub fn encode_frame(frame: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let mut style: Option<CellStyle> = None;
    for y in 0..frame.height() {
        out.queue(cursor::MoveTo(0, y))?;
        for x in 0..frame.width() {
            let cell = frame.get(x, y).unwrap_or_default();
            if style != Some(cell.style) {
                push_style(out, cell.style)?;
                style = Some(cell.style);
            }
            out.queue(Print(cell.ch))?;
        }
    }

    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the cells that differ between two equally sized frames.
/// Horizontally adjacent changes share one cursor move.
pub fn encode_changes(prev: &FrameBuffer, next: &FrameBuffer, out: &mut Vec<u8>) -> Result<()> {
    let mut style: Option<CellStyle> = None;
    for y in 0..next.height() {
        let mut x = 0;
        while x < next.width() {
            if next.get(x, y) == prev.get(x, y) {
                x += 1;
                continue;
            }
            out.queue(cursor::MoveTo(x, y))?;
            while x < next.width() && next.get(x, y) != prev.get(x, y) {
                let cell = next.get(x, y).unwrap_or_default();
                if style != Some(cell.style) {
                    push_style(out, cell.style)?;
                    style = Some(cell.style);
                }
                out.queue(Print(cell.ch))?;
                x += 1;
            }
        }
    }
    if style.is_some() {
        out.queue(ResetColor)?;
        out.queue(SetAttribute(Attribute::Reset))?;
    }
    Ok(())
}

fn push_style(out: &mut Vec<u8>, style: CellStyle) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(to_color(style.fg)))?;
    out.queue(SetBackgroundColor(to_color(style.bg)))?;
    if style.bold {
        out.queue(SetAttribute(Attribute::Bold))?;
    }
    if style.dim {
        out.queue(SetAttribute(Attribute::Dim))?;
    }
    Ok(())
}

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fb::Cell;

    fn text(out: &[u8]) -> String {
        String::from_utf8_lossy(out).into_owned()
    }

    #[test]
    fn full_encode_opens_with_a_clear() {
        let mut fb = FrameBuffer::new(2, 1);
        fb.put_str(0, 0, "AB", CellStyle::default());

        let mut out = Vec::new();
        encode_frame(&fb, &mut out).unwrap();
        let s = text(&out);
        assert!(s.contains("\u{1b}[2J"));
        assert!(s.contains("AB"));
    }

    #[test]
    fn unchanged_frames_encode_nothing() {
        let fb = FrameBuffer::new(4, 2);
        let mut out = Vec::new();
        encode_changes(&fb, &fb.clone(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn change_encoding_skips_identical_cells() {
        let prev = FrameBuffer::new(5, 1);
        let mut next = prev.clone();
        next.put_char(1, 0, 'X', CellStyle::default());

        let mut out = Vec::new();
        encode_changes(&prev, &next, &mut out).unwrap();
        let s = text(&out);
        // One cursor move to column 2 of row 1 (one-based), nothing else.
        assert!(s.contains("\u{1b}[1;2H"));
        assert!(!s.contains("\u{1b}[1;1H"));
        assert!(s.contains('X'));
    }

    #[test]
    fn adjacent_changes_share_one_cursor_move() {
        let prev = FrameBuffer::new(6, 1);
        let mut next = prev.clone();
        let style = CellStyle::default();
        next.set(1, 0, Cell { ch: 'X', style });
        next.set(2, 0, Cell { ch: 'Y', style });
        next.set(3, 0, Cell { ch: 'Z', style });

        let mut out = Vec::new();
        encode_changes(&prev, &next, &mut out).unwrap();
        let s = text(&out);
        // The run prints contiguously, with no cursor move between glyphs.
        assert!(s.contains("XYZ"));
        assert_eq!(s.matches('H').count(), 1);
    }
}
