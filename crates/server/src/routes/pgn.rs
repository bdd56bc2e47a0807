use axum::Json;
use reel_core::model::DEFAULT_MOVE_DURATION_MS;
use reel_core::notation::{self, STARTING_FEN};
use reel_core::timeline::{format_duration, total_duration_ms};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use validator::Validate;

use crate::error::AppError;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePgnRequest {
    #[validate(length(min = 1))]
    pub pgn: String,
    /// Also return the movetext and position after this many plies.
    #[validate(range(min = 1))]
    pub preview_moves: Option<usize>,
}

/// POST /api/pgn/validate
/// Invalid transcripts are a 200 with `valid: false` so the editor can show
/// the message inline.
pub async fn validate_pgn(Json(req): Json<ValidatePgnRequest>) -> Result<Json<JsonValue>, AppError> {
    req.validate()?;
    Ok(Json(describe(&req)))
}

fn describe(req: &ValidatePgnRequest) -> JsonValue {
    let count = match notation::validate_transcript(&req.pgn) {
        Ok(count) => count,
        Err(e) => {
            return serde_json::json!({
                "valid": false,
                "error": e.to_string(),
            })
        }
    };

    let metadata = notation::extract_metadata(&req.pgn);
    let estimate_ms = total_duration_ms(&vec![DEFAULT_MOVE_DURATION_MS; count]);

    let mut body = serde_json::json!({
        "valid": true,
        "moveCount": count,
        "title": notation::project_title(&req.pgn),
        "metadata": metadata,
        "estimatedDuration": format_duration(estimate_ms),
    });

    if let Some(n) = req.preview_moves {
        body["preview"] = serde_json::json!({
            "movetext": notation::trim_transcript(&req.pgn, n),
            "fen": notation::position_at_move(&req.pgn, n.min(count))
                .unwrap_or_else(|| STARTING_FEN.to_string()),
        });
    }

    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(pgn: &str, preview_moves: Option<usize>) -> ValidatePgnRequest {
        ValidatePgnRequest {
            pgn: pgn.to_string(),
            preview_moves,
        }
    }

    #[test]
    fn valid_transcript_is_described() {
        let body = describe(&request(
            "[White \"Carlsen\"]\n[Black \"Nepo\"]\n\n1. e4 e5 2. Nf3 Nc6 *",
            None,
        ));
        assert_eq!(body["valid"], true);
        assert_eq!(body["moveCount"], 4);
        assert_eq!(body["title"], "Carlsen vs Nepo");
        assert_eq!(body["estimatedDuration"], "0:08");
        assert!(body.get("preview").is_none());
    }

    #[test]
    fn preview_stops_at_requested_ply() {
        let body = describe(&request("1. e4 e5 2. Nf3 Nc6", Some(3)));
        assert_eq!(body["preview"]["movetext"], "1. e4 e5 2. Nf3");
        let fen = body["preview"]["fen"].as_str().unwrap();
        assert!(fen.starts_with("rnbqkbnr/pppp1ppp/8/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R b"));
    }

    #[test]
    fn illegal_move_is_reported_not_raised() {
        let body = describe(&request("1. e4 e5 2. Ke3", None));
        assert_eq!(body["valid"], false);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid PGN format"));
    }
}
