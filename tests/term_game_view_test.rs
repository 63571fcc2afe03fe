use tui_memory::engine::{ControllerConfig, GameController};
use tui_memory::input::{handle_key_event, Cursor};
use tui_memory::records::{BestRecords, MemoryStore};
use tui_memory::term::{GameView, Viewport};
use tui_memory::types::{GridSize, MISMATCH_RESOLVE_MS};

use crossterm::event::{KeyCode, KeyEvent};

fn game(n: u8) -> GameController<MemoryStore> {
    let config = ControllerConfig {
        grid_size: GridSize::try_from(n).unwrap(),
        ..ControllerConfig::default()
    };
    GameController::with_seed(config, BestRecords::new(MemoryStore::new()), 42)
}

#[test]
fn term_view_renders_border_around_board() {
    let g = game(4);
    let snap = g.snapshot();
    let view = GameView::new();
    let vp = Viewport::new(100, 40);
    let fb = view.render(&snap, None, vp);

    let layout = view.layout(&snap, vp);
    let left = layout.origin_x - 1;
    let top = layout.origin_y - 1;
    let right = layout.origin_x + layout.board_w();
    let bottom = layout.origin_y + layout.board_h();

    assert_eq!(fb.get(left, top).unwrap().ch, '┌');
    assert_eq!(fb.get(right, top).unwrap().ch, '┐');
    assert_eq!(fb.get(left, bottom).unwrap().ch, '└');
    assert_eq!(fb.get(right, bottom).unwrap().ch, '┘');
}

#[test]
fn term_view_status_line_tracks_game() {
    let mut g = game(4);
    let view = GameView::new();
    let vp = Viewport::new(100, 40);

    let fb = view.render(&g.snapshot(), None, vp);
    assert!(fb.row_text(1).contains("Moves: 0  Time: 0.0 s  Found: 0 / 8  Best: — / —"));

    g.handle_card_click(0);
    g.handle_card_click(1);
    g.tick(MISMATCH_RESOLVE_MS);
    let fb = view.render(&g.snapshot(), None, vp);
    assert!(fb.row_text(1).contains("Moves: 1"));
    assert!(fb.row_text(1).contains("Time: 0.7 s"));
}

#[test]
fn mouse_click_position_flips_that_card() {
    let mut g = game(6);
    let view = GameView::new();
    let vp = Viewport::new(120, 50);
    let snap = g.snapshot();

    let layout = view.layout(&snap, vp);
    let (x, y) = layout.card_origin(14);
    let index = view.card_at(&snap, vp, x + 1, y).unwrap();
    assert_eq!(index, 14);

    let snap = g.handle_card_click(index);
    assert!(snap.cards[14].flipped);
    assert_eq!(Cursor::from_index(index, snap.size), Cursor::new(2, 2));
}

#[test]
fn keyboard_flip_uses_cursor_position() {
    let mut g = game(4);
    let mut cursor = Cursor::default();
    let board = g.snapshot().size;

    for code in [KeyCode::Right, KeyCode::Down, KeyCode::Enter] {
        let command = handle_key_event(KeyEvent::from(code)).unwrap();
        if let Some(action) = command.into_action(&mut cursor, board, g.selected_size()) {
            g.apply_action(action);
        }
    }

    let snap = g.snapshot();
    assert!(snap.cards[5].flipped);
    assert_eq!(snap.cards.iter().filter(|c| c.flipped).count(), 1);
}
