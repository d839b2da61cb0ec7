use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chess_session::board::{RulesEngine, Square};
use chess_session::view::TextBoard;
use chess_session::{Position, SessionController};

const SCHOLARS_MATE: [Square; 14] = [
    Square::E2, Square::E4, Square::E7, Square::E5,
    Square::D1, Square::H5, Square::B8, Square::C6,
    Square::F1, Square::C4, Square::G8, Square::F6,
    Square::H5, Square::F7,
];

fn bench_click_game(c: &mut Criterion) {
    c.bench_function("scholars_mate_by_clicks", |b| {
        b.iter(|| {
            let pos = Position::startpos();
            let view = TextBoard::new(pos.snapshot());
            let mut s = SessionController::new(pos, view);
            for sq in SCHOLARS_MATE {
                let _ = s.handle_tile_click(black_box(sq));
            }
            black_box(s.history().len())
        })
    });
}

fn bench_selection(c: &mut Criterion) {
    let pos = Position::startpos();
    let view = TextBoard::new(pos.snapshot());
    let mut s = SessionController::new(pos, view);
    c.bench_function("select_and_deselect", |b| {
        b.iter(|| {
            let _ = s.handle_tile_click(black_box(Square::G1));
            let _ = s.handle_tile_click(black_box(Square::E5));
        })
    });
}

criterion_group!(benches, bench_click_game, bench_selection);
criterion_main!(benches);
