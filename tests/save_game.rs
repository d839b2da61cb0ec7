use chess_session::board::{RulesEngine, Square};
use chess_session::save::{save, SaveError};
use chess_session::view::TextBoard;
use chess_session::{Position, SessionController};
use std::fs::{create_dir_all, read_to_string, remove_file};
use std::path::Path;

fn played_session() -> SessionController<Position, TextBoard> {
    let pos = Position::startpos();
    let view = TextBoard::new(pos.snapshot());
    let mut s = SessionController::new(pos, view);
    for sq in [Square::E2, Square::E4, Square::E7, Square::E5] {
        s.handle_tile_click(sq).unwrap();
    }
    s
}

#[test]
fn saves_transcript_once_and_refuses_overwrite() {
    let outdir = Path::new("target/save_game_test");
    create_dir_all(outdir).unwrap();
    let _ = remove_file(outdir.join("opening.txt"));

    let s = played_session();
    let path = s.save_game(outdir, " opening ").expect("first save succeeds");
    assert_eq!(path, outdir.join("opening.txt"));
    assert_eq!(read_to_string(&path).unwrap(), "1. e4 e5 ");

    let again = s.save_game(outdir, "opening");
    assert!(matches!(again, Err(SaveError::AlreadyExists(_))), "got {again:?}");
    assert_eq!(read_to_string(&path).unwrap(), "1. e4 e5 ", "existing file was touched");
}

#[test]
fn invalid_names_write_nothing() {
    let outdir = Path::new("target/save_game_invalid");
    create_dir_all(outdir).unwrap();
    let s = played_session();
    for bad in ["", "../up", "a/b", "x:y"] {
        assert!(matches!(s.save_game(outdir, bad), Err(SaveError::InvalidName(_))), "accepted {bad:?}");
    }
    assert_eq!(std::fs::read_dir(outdir).unwrap().count(), 0);
}

#[test]
fn missing_directory_is_an_io_error() {
    let err = save("1. e4 ", Path::new("target/no_such_dir_for_save/game.txt")).unwrap_err();
    assert!(matches!(err, SaveError::Io { .. }), "got {err:?}");
}
