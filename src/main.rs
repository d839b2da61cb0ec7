use anyhow::Result;
use chess_session::board::{BoardPiece, Piece, RulesEngine, Square};
use chess_session::config::SessionConfig;
use chess_session::session::promotion::{parse_promotion, Fixed, PromotionChoice};
use chess_session::view::TextBoard;
use chess_session::{ClickOutcome, SessionController};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(author, version, about = "Play a two-player chess game by clicking squares", long_about = None)]
struct Args {
    /// JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting FEN position
    #[arg(long)]
    fen: Option<String>,

    /// Directory for saved games
    #[arg(long)]
    save_dir: Option<PathBuf>,

    /// Promotion policy: 'q', 'r', 'b', 'n' or 'ask'
    #[arg(long)]
    promote_to: Option<String>,
}

fn parse_choice(s: &str) -> Result<PromotionChoice> {
    if s.eq_ignore_ascii_case("ask") {
        return Ok(PromotionChoice::Ask);
    }
    match parse_promotion(s) {
        Some(Piece::Queen) => Ok(PromotionChoice::Queen),
        Some(Piece::Rook) => Ok(PromotionChoice::Rook),
        Some(Piece::Bishop) => Ok(PromotionChoice::Bishop),
        Some(Piece::Knight) => Ok(PromotionChoice::Knight),
        _ => anyhow::bail!("Invalid promotion: use q, r, b, n or ask"),
    }
}

fn ask_promotion(pawn: &BoardPiece, target: Square) -> Piece {
    loop {
        print!("Promote pawn {} -> {} to (q/r/b/n): ", pawn.square, target);
        let _ = io::stdout().flush();
        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) | Err(_) => return Piece::Queen,
            Ok(_) => {}
        }
        if let Some(kind) = parse_promotion(&input) {
            return kind;
        }
        println!("Choose q, r, b or n");
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => SessionConfig::load(path)?,
        None => SessionConfig::default(),
    };
    if args.fen.is_some() { cfg.start_fen = args.fen.clone(); }
    if let Some(dir) = args.save_dir { cfg.save_dir = dir; }
    if let Some(p) = &args.promote_to { cfg.promotion = parse_choice(p)?; }

    let pos = cfg.start_position()?;
    let view = TextBoard::new(pos.snapshot());
    let session = SessionController::new(pos, view);
    let mut session = match cfg.promotion.piece() {
        Some(kind) => session.with_promotion(Fixed(kind)),
        None => session.with_promotion(ask_promotion),
    };

    println!("Click a square by typing it (e.g. e2). Commands: save <name>, history, quit");
    loop {
        println!("\n{}", session.view().render());
        if session.is_active() {
            print!("{:?} to move> ", session.turn_to_move());
        } else {
            print!("game over> ");
        }
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 { break; }
        let input = input.trim();

        if input == "quit" { break; }
        if input == "history" {
            println!("{}", session.history());
            continue;
        }
        if input == "save" || input.starts_with("save ") {
            match session.save_game(&cfg.save_dir, &input["save".len()..]) {
                Ok(path) => println!("Game saved to {}", path.display()),
                Err(e) => println!("Save failed: {}", e),
            }
            continue;
        }

        let sq = match Square::from_str(input) {
            Ok(sq) => sq,
            Err(_) => {
                println!("Unknown square or command: {input}");
                continue;
            }
        };
        match session.handle_tile_click(sq) {
            Ok(ClickOutcome::Moved { notation, outcome }) => {
                println!("Played {notation}");
                if let Some(o) = outcome { println!("{o}"); }
            }
            Ok(ClickOutcome::Ignored) if !session.is_active() => println!("The game is over; save or quit."),
            Ok(_) => {}
            Err(e) => println!("Move rejected: {e}"),
        }
    }

    Ok(())
}
