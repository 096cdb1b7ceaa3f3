//! Wire payloads of the move service.

use serde::{Deserialize, Serialize};

/// Every response body wraps its payload in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    /// The payload.
    pub data: T,
}

/// Progress of the service's precomputed map for a game.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildStatus {
    /// Percentage from 0 (not started) to 100 (ready).
    pub progress: f64,
}

impl BuildStatus {
    /// Progress value reported once the map is ready.
    pub const READY: f64 = 100.0;

    /// No build has been started for this game.
    pub fn is_unbuilt(&self) -> bool {
        self.progress <= 0.0
    }

    /// The map is ready and moves can be requested.
    pub fn is_ready(&self) -> bool {
        self.progress >= Self::READY
    }
}

/// Opponent move as board coordinates.
///
/// Signed so that off-board answers can be told apart from malformed bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextMove {
    /// Column.
    pub x: i64,
    /// Row.
    pub y: i64,
}

/// Raw outcome weights for the local player.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Chances {
    /// Weight of a local win.
    pub win: f64,
    /// Weight of a local loss.
    pub lose: f64,
    /// Weight of a draw.
    pub draw: f64,
}

/// Chances normalized to percentages.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChancePercentages {
    /// Win percentage.
    pub win: f64,
    /// Loss percentage.
    pub lose: f64,
    /// Draw percentage.
    pub draw: f64,
}

impl Chances {
    /// Normalizes each weight as `weight / (win + lose + draw) * 100`.
    ///
    /// All percentages are zero when the weights sum to zero.
    pub fn percentages(&self) -> ChancePercentages {
        let total = self.win + self.lose + self.draw;
        if total <= 0.0 {
            return ChancePercentages::default();
        }
        ChancePercentages {
            win: self.win / total * 100.0,
            lose: self.lose / total * 100.0,
            draw: self.draw / total * 100.0,
        }
    }
}

impl std::fmt::Display for ChancePercentages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Win: {:.0}%, Lose: {:.0}%, Draw: {:.0}%",
            self.win, self.lose, self.draw
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_body_decodes() {
        let body = r#"{"status":"ok","data":{"progress":40}}"#;
        let status: Envelope<BuildStatus> = serde_json::from_str(body).unwrap();
        assert_eq!(status.data.progress, 40.0);
        assert!(!status.data.is_unbuilt());
        assert!(!status.data.is_ready());
    }

    #[test]
    fn test_next_move_body_decodes() {
        let body = r#"{"status":"ok","data":{"x":2,"y":1}}"#;
        let next: Envelope<NextMove> = serde_json::from_str(body).unwrap();
        assert_eq!(next.data, NextMove { x: 2, y: 1 });
    }

    #[test]
    fn test_percentages() {
        let chances = Chances {
            win: 1.0,
            lose: 2.0,
            draw: 1.0,
        };
        let pct = chances.percentages();
        assert_eq!(pct.win, 25.0);
        assert_eq!(pct.lose, 50.0);
        assert_eq!(pct.draw, 25.0);
        assert_eq!(pct.to_string(), "Win: 25%, Lose: 50%, Draw: 25%");
    }

    #[test]
    fn test_percentages_of_nothing() {
        assert_eq!(Chances::default().percentages(), ChancePercentages::default());
    }
}
