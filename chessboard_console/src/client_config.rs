use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use chessboard_client::board_view::{DEFAULT_PLACEHOLDER_GLYPH, PieceGlyphs};
use serde::{Deserialize, Serialize};


pub const DEFAULT_SERVER_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_PREFIX: &str = "/api/v1/chess";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    pub api_prefix: String,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    // Asset key (e.g. "w-queen") to glyph. Pieces not listed keep their pictograms.
    pub glyphs: HashMap<String, char>,
    pub placeholder_glyph: char,
    pub log_file: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server_url: DEFAULT_SERVER_URL.to_owned(),
            api_prefix: DEFAULT_API_PREFIX.to_owned(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            glyphs: HashMap::new(),
            placeholder_glyph: DEFAULT_PLACEHOLDER_GLYPH,
            log_file: None,
        }
    }
}

impl ClientConfig {
    pub fn piece_glyphs(&self) -> PieceGlyphs {
        PieceGlyphs::with_overrides(&self.glyphs, self.placeholder_glyph)
    }
}

pub fn parse_config(contents: &str) -> anyhow::Result<ClientConfig> {
    // An empty file is a valid config with all defaults.
    if contents.trim().is_empty() {
        return Ok(ClientConfig::default());
    }
    Ok(serde_yaml::from_str(contents)?)
}

pub fn read_config_file(path: &Path) -> anyhow::Result<ClientConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file '{}'.", path.display()))?;
    parse_config(&contents).with_context(|| format!("Failed to parse config file '{}'.", path.display()))
}


#[cfg(test)]
mod tests {
    use chessboard_client::force::Force;
    use chessboard_client::piece::{Piece, PieceKind};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        assert_eq!(parse_config("").unwrap(), ClientConfig::default());
        assert_eq!(parse_config("{}").unwrap(), ClientConfig::default());
    }

    #[test]
    fn full_config() {
        let config = parse_config(
            r#"
server_url: "http://chess.example.org:9000"
api_prefix: "/chess"
request_timeout: "2s 500ms"
glyphs:
  w-queen: "Q"
  b-queen: "q"
placeholder_glyph: "*"
log_file: "/tmp/chessboard.log"
"#,
        )
        .unwrap();
        assert_eq!(config.server_url, "http://chess.example.org:9000");
        assert_eq!(config.api_prefix, "/chess");
        assert_eq!(config.request_timeout, Duration::from_millis(2500));
        assert_eq!(config.placeholder_glyph, '*');
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/chessboard.log")));

        let glyphs = config.piece_glyphs();
        assert_eq!(glyphs.visual(Piece::new(PieceKind::Queen, Force::White)).glyph, 'Q');
        assert_eq!(glyphs.visual(Piece::new(PieceKind::Queen, Force::Black)).glyph, 'q');
        assert_eq!(glyphs.visual(Piece::new(PieceKind::Rook, Force::White)).glyph, '♖');
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config = parse_config("request_timeout: 30s\n").unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.api_prefix, DEFAULT_API_PREFIX);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
    }

    #[test]
    fn bad_duration_rejected() {
        assert!(parse_config("request_timeout: soon\n").is_err());
    }
}
