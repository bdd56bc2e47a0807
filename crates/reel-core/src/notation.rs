//! PGN transcript adapter: header extraction, movetext tokenising and replay.
//!
//! Legality is delegated to shakmaty; this module only strips the parts of a
//! transcript that are not moves and turns every remaining token into a
//! position snapshot.

use std::sync::LazyLock;

use chrono::{NaiveDate, Utc};
use regex::Regex;
use shakmaty::{
    fen::Fen,
    san::{San, SanPlus},
    CastlingMode, Chess, EnPassantMode, Position,
};

use crate::error::{CoreError, CoreResult};
use crate::model::{GameMetadata, ParsedGame, ParsedMove};

pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

// No escape handling: a value with an embedded quote stops at that quote.
static TAG_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\[(\w+)\s+"([^"]+)""#).unwrap());
// Whole tag-pair lines only; a value may contain brackets.
static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^\s*\[\w+\s+"[^"]*"\]\s*$"#).unwrap());
static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]*\}|;[^\n]*").unwrap());
static INNER_VARIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)").unwrap());
static MOVE_NUMBER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.+").unwrap());

const RESULTS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Parse a transcript into one snapshot per ply plus its header metadata.
///
/// Fails with [`CoreError::InvalidNotation`] when a token is not SAN or is
/// illegal in the replayed position, and with [`CoreError::EmptyGame`] when
/// the movetext holds no moves at all.
pub fn parse_transcript(pgn: &str) -> CoreResult<ParsedGame> {
    let metadata = extract_metadata(pgn);
    let mut pos = starting_position(pgn)?;
    let mut moves = Vec::new();

    for token in movetext_tokens(pgn) {
        let ply = moves.len() + 1;
        let san_plus: SanPlus = token.parse().map_err(|_| {
            CoreError::InvalidNotation(format!("unrecognised token '{token}' at ply {ply}"))
        })?;
        let mv = san_plus.san.to_move(&pos).map_err(|_| {
            CoreError::InvalidNotation(format!("illegal move '{token}' at ply {ply}"))
        })?;

        let san = San::from_move(&pos, mv.clone());
        pos = pos.play(mv).map_err(|_| {
            CoreError::InvalidNotation(format!("illegal move '{token}' at ply {ply}"))
        })?;

        let suffix = if pos.is_checkmate() {
            "#"
        } else if pos.is_check() {
            "+"
        } else {
            ""
        };

        moves.push(ParsedMove {
            index: ply as u32,
            notation: format!("{san}{suffix}"),
            fen: Fen::from_position(&pos, EnPassantMode::Legal).to_string(),
        });
    }

    if moves.is_empty() {
        return Err(CoreError::EmptyGame);
    }

    tracing::debug!(plies = moves.len(), "parsed transcript");

    Ok(ParsedGame { metadata, moves })
}

/// Check a transcript without keeping the snapshots. Returns the move count.
pub fn validate_transcript(pgn: &str) -> CoreResult<usize> {
    parse_transcript(pgn).map(|game| game.moves.len())
}

/// FEN after the 1-based move `move_number`, or `None` when out of range or
/// when the transcript does not parse.
pub fn position_at_move(pgn: &str, move_number: usize) -> Option<String> {
    if move_number == 0 {
        return None;
    }
    let game = parse_transcript(pgn).ok()?;
    game.moves.into_iter().nth(move_number - 1).map(|m| m.fen)
}

/// Movetext for the first `max_moves` plies, e.g. `1. e4 e5 2. Nf3`.
/// The input comes back unchanged when it does not parse.
pub fn trim_transcript(pgn: &str, max_moves: usize) -> String {
    let Ok(game) = parse_transcript(pgn) else {
        return pgn.to_string();
    };

    let black_first = starting_position(pgn)
        .map(|p| p.turn().is_black())
        .unwrap_or(false);
    let first_number = starting_position(pgn)
        .map(|p| p.fullmoves().get())
        .unwrap_or(1);

    let mut out = String::new();
    for (i, mv) in game.moves.iter().take(max_moves).enumerate() {
        let slot = i + usize::from(black_first);
        let number = first_number as usize + slot / 2;
        if !out.is_empty() {
            out.push(' ');
        }
        if slot % 2 == 0 {
            out.push_str(&format!("{number}. "));
        } else if i == 0 {
            out.push_str(&format!("{number}... "));
        }
        out.push_str(&mv.notation);
    }
    out
}

/// Pull the six well-known header tags out of a transcript, one tag per line.
pub fn extract_metadata(pgn: &str) -> GameMetadata {
    let mut metadata = GameMetadata::default();

    for line in pgn.lines() {
        let Some(cap) = TAG_LINE_RE.captures(line) else {
            continue;
        };
        let value = cap[2].to_string();
        match cap[1].to_ascii_lowercase().as_str() {
            "event" => metadata.event = Some(value),
            "site" => metadata.site = Some(value),
            "date" => metadata.date = Some(value),
            "white" => metadata.white = Some(value),
            "black" => metadata.black = Some(value),
            "result" => metadata.result = Some(value),
            _ => {}
        }
    }

    metadata
}

/// Default project title: both player names, then the event, then a dated
/// placeholder.
pub fn generate_title(metadata: &GameMetadata, today: NaiveDate) -> String {
    if let (Some(white), Some(black)) = (&metadata.white, &metadata.black) {
        return format!("{white} vs {black}");
    }
    if let Some(event) = &metadata.event {
        return event.clone();
    }
    format!("Chess Game {}", today.format("%-m/%-d/%Y"))
}

pub fn project_title(pgn: &str) -> String {
    generate_title(&extract_metadata(pgn), Utc::now().date_naive())
}

fn header_value(pgn: &str, name: &str) -> Option<String> {
    pgn.lines()
        .filter_map(|line| TAG_LINE_RE.captures(line))
        .find(|cap| cap[1].eq_ignore_ascii_case(name))
        .map(|cap| cap[2].to_string())
}

/// Standard start, or the `[FEN]` header position when one is present.
fn starting_position(pgn: &str) -> CoreResult<Chess> {
    let Some(fen) = header_value(pgn, "FEN") else {
        return Ok(Chess::default());
    };
    let parsed: Fen = fen
        .parse()
        .map_err(|_| CoreError::InvalidNotation(format!("bad FEN header '{fen}'")))?;
    parsed
        .into_position(CastlingMode::Standard)
        .map_err(|_| CoreError::InvalidNotation(format!("impossible FEN header '{fen}'")))
}

/// Movetext reduced to bare SAN tokens.
fn movetext_tokens(pgn: &str) -> Vec<String> {
    let no_headers = HEADER_RE.replace_all(pgn, " ");
    let mut text = COMMENT_RE.replace_all(&no_headers, " ").into_owned();

    // Peel nested variations from the inside out.
    loop {
        let next = INNER_VARIATION_RE.replace_all(&text, " ").into_owned();
        if next == text {
            break;
        }
        text = next;
    }

    text.split_whitespace()
        .filter(|t| !RESULTS.contains(t) && !t.starts_with('$') && *t != "e.p.")
        .filter_map(|t| {
            let t = MOVE_NUMBER_RE.replace(t, "");
            let t = t.trim_end_matches(['!', '?']);
            if t.is_empty() {
                return None;
            }
            Some(match t {
                "0-0" => "O-O".to_string(),
                "0-0-0" => "O-O-O".to_string(),
                other => other.replace("0-0-0", "O-O-O").replace("0-0", "O-O"),
            })
        })
        .collect()
}
