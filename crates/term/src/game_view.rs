//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested, and it owns the
//! board layout so mouse clicks can be hit-tested against exactly what was
//! drawn.

use crate::core::{CardSnapshot, GameSnapshot};
use crate::fb::{text_width, CellStyle, FrameBuffer, Rgb};
use crate::types::{FaceValue, GridSize};

const HEADER_ROWS: u16 = 3;
const FOOTER_ROWS: u16 = 2;
const HELP: &str = "arrows/hjkl move  enter flip  r restart  n shuffle  +/- size  e emoji  q quit";

const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);
const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const CARD_BACK: Rgb = Rgb::new(70, 90, 160);
const CARD_FACE: Rgb = Rgb::new(235, 235, 225);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Card cell size in terminal columns/rows, chosen by board dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardLayout {
    pub card_w: u16,
    pub card_h: u16,
    pub gap_x: u16,
    pub gap_y: u16,
}

impl CardLayout {
    /// Bigger boards get smaller cards: N <= 4, N <= 8, N <= 16, larger.
    pub fn for_dimension(n: u8) -> Self {
        let (card_w, card_h, gap_x, gap_y) = match n {
            0..=4 => (10, 5, 2, 1),
            5..=8 => (6, 3, 1, 1),
            9..=16 => (4, 1, 1, 0),
            _ => (4, 1, 0, 0),
        };
        Self {
            card_w,
            card_h,
            gap_x,
            gap_y,
        }
    }
}

/// Where the board landed inside a viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    pub n: u16,
    pub card: CardLayout,
    /// Top-left corner of the first card.
    pub origin_x: u16,
    pub origin_y: u16,
}

impl BoardLayout {
    pub fn new(size: GridSize, viewport: Viewport) -> Self {
        let n = size.n() as u16;
        let card = CardLayout::for_dimension(size.n());
        let board_w = n * card.card_w + (n - 1) * card.gap_x;
        let board_h = n * card.card_h + (n - 1) * card.gap_y;

        // One column/row of frame on each side.
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;
        let free_h = viewport.height.saturating_sub(HEADER_ROWS + FOOTER_ROWS);

        let frame_x = viewport.width.saturating_sub(frame_w) / 2;
        let frame_y = HEADER_ROWS + free_h.saturating_sub(frame_h) / 2;

        Self {
            n,
            card,
            origin_x: frame_x + 1,
            origin_y: frame_y + 1,
        }
    }

    pub fn board_w(&self) -> u16 {
        self.n * self.card.card_w + (self.n - 1) * self.card.gap_x
    }

    pub fn board_h(&self) -> u16 {
        self.n * self.card.card_h + (self.n - 1) * self.card.gap_y
    }

    /// Top-left corner of the card at `index`.
    pub fn card_origin(&self, index: usize) -> (u16, u16) {
        let row = index as u16 / self.n;
        let col = index as u16 % self.n;
        (
            self.origin_x + col * (self.card.card_w + self.card.gap_x),
            self.origin_y + row * (self.card.card_h + self.card.gap_y),
        )
    }

    /// Card index under a terminal position; gaps and the frame hit nothing.
    pub fn card_at(&self, x: u16, y: u16) -> Option<usize> {
        if x < self.origin_x || y < self.origin_y {
            return None;
        }
        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let pitch_x = self.card.card_w + self.card.gap_x;
        let pitch_y = self.card.card_h + self.card.gap_y;
        let col = dx / pitch_x;
        let row = dy / pitch_y;
        if col >= self.n || row >= self.n {
            return None;
        }
        if dx % pitch_x >= self.card.card_w || dy % pitch_y >= self.card.card_h {
            return None;
        }
        Some((row * self.n + col) as usize)
    }
}

/// A lightweight terminal renderer for the memory game.
#[derive(Debug, Clone, Copy)]
pub struct GameView {
    show_help: bool,
}

impl Default for GameView {
    fn default() -> Self {
        Self::new()
    }
}

impl GameView {
    pub fn new() -> Self {
        Self { show_help: true }
    }

    pub fn with_help(mut self, show_help: bool) -> Self {
        self.show_help = show_help;
        self
    }

    pub fn layout(&self, snap: &GameSnapshot, viewport: Viewport) -> BoardLayout {
        BoardLayout::new(snap.size, viewport)
    }

    /// Card index under a terminal position for the board in `snap`.
    pub fn card_at(&self, snap: &GameSnapshot, viewport: Viewport, x: u16, y: u16) -> Option<usize> {
        self.layout(snap, viewport)
            .card_at(x, y)
            .filter(|&i| i < snap.cards.len())
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when
    /// the terminal size changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        cursor: Option<usize>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        self.render_into_with_notice(snap, cursor, None, viewport, fb);
    }

    pub fn render_into_with_notice(
        &self,
        snap: &GameSnapshot,
        cursor: Option<usize>,
        notice: Option<&str>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).into_cell(' '));

        self.draw_header(fb, snap, viewport);

        let layout = self.layout(snap, viewport);
        let frame_x = layout.origin_x - 1;
        let frame_y = layout.origin_y - 1;
        let frame_w = layout.board_w() + 2;
        let frame_h = layout.board_h() + 2;

        let board_bg = CellStyle::new(Rgb::new(80, 80, 90), BOARD_BG);
        fb.fill_rect(layout.origin_x, layout.origin_y, layout.board_w(), layout.board_h(), ' ', board_bg);
        draw_border(
            fb,
            frame_x,
            frame_y,
            frame_w,
            frame_h,
            CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG),
        );

        for (i, card) in snap.cards.iter().enumerate() {
            self.draw_card(fb, &layout, i, card, cursor == Some(i));
        }

        if self.show_help && viewport.height > 0 {
            let style = CellStyle::new(Rgb::new(140, 140, 150), SCREEN_BG).dim();
            let x = viewport.width.saturating_sub(text_width(HELP)) / 2;
            fb.put_str(x, viewport.height - 1, HELP, style);
        }

        if let Some(text) = notice {
            draw_overlay_text(fb, viewport, frame_y, frame_h, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, cursor: Option<usize>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, cursor, viewport, &mut fb);
        fb
    }

    fn draw_header(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, viewport: Viewport) {
        let label = CellStyle::default().bold();
        let value = CellStyle::default();

        let mut title = format!("MEMORY  {}", snap.size);
        if snap.selected_size != snap.size {
            title.push_str(&format!("  (next: {})", snap.selected_size));
        }
        title.push_str(if snap.use_emoji { "  emoji" } else { "  colors" });
        fb.put_str(1, 0, &title, label);

        let status = status_line(snap);
        let x = viewport.width.saturating_sub(text_width(&status)) / 2;
        fb.put_str(x.max(1), 1, &status, value);
    }

    fn draw_card(
        &self,
        fb: &mut FrameBuffer,
        layout: &BoardLayout,
        index: usize,
        card: &CardSnapshot,
        selected: bool,
    ) {
        let (x, y) = layout.card_origin(index);
        let w = layout.card.card_w;
        let h = layout.card.card_h;
        let mid_y = y + h / 2;

        let style = if !card.face_up() {
            CellStyle::new(Rgb::new(150, 170, 230), CARD_BACK)
        } else {
            let bg = match card.face.value {
                FaceValue::Color(hsl) => Rgb::from(hsl),
                FaceValue::Emoji(_) => CARD_FACE,
            };
            let style = CellStyle::new(Rgb::new(20, 20, 20), bg);
            if card.matched {
                style.dim()
            } else {
                style.bold()
            }
        };

        let fill = if card.face_up() { ' ' } else { '░' };
        fb.fill_rect(x, y, w, h, fill, style);

        if card.face_up() {
            if let FaceValue::Emoji(ch) = card.face.value {
                let gx = x + w.saturating_sub(2) / 2;
                fb.put_char(gx, mid_y, ch, style);
            }
        }

        if selected {
            let marker = CellStyle::new(Rgb::new(255, 220, 80), style.bg).bold();
            fb.put_char(x, mid_y, '▶', marker);
            fb.put_char(x + w - 1, mid_y, '◀', marker);
        }
    }
}

/// `Moves: 3  Time: 1.2 s  Found: 1 / 8  Best: 12.3 s / 14 moves`
pub fn status_line(snap: &GameSnapshot) -> String {
    let best = match snap.best {
        Some(best) => format!("{} s / {} moves", best.time_display(), best.moves),
        None => "— / —".to_string(),
    };
    format!(
        "Moves: {}  Time: {} s  Found: {}  Best: {}",
        snap.moves,
        snap.elapsed_display(),
        snap.found_display(),
        best
    )
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay_text(fb: &mut FrameBuffer, viewport: Viewport, frame_y: u16, frame_h: u16, text: &str) {
    const HINT: &str = "press r for a new game";

    let inner_w = text_width(text).max(text_width(HINT));
    let box_w = (inner_w + 4).min(viewport.width);
    let box_h = 4;
    let x = viewport.width.saturating_sub(box_w) / 2;
    let y = frame_y + frame_h.saturating_sub(box_h) / 2;

    let style = CellStyle::new(Rgb::new(255, 255, 255), Rgb::new(20, 60, 30)).bold();
    fb.fill_rect(x, y, box_w, box_h, ' ', style);
    draw_border(fb, x, y, box_w, box_h, style);

    let tx = x + box_w.saturating_sub(text_width(text)) / 2;
    fb.put_str(tx.max(x + 1), y + 1, text, style);
    let hx = x + box_w.saturating_sub(text_width(HINT)) / 2;
    fb.put_str(hx, y + 2, HINT, CellStyle { bold: false, ..style });
}
