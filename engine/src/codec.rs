//! The state token: the only place a game lives between requests.
//!
//! Payload layout, before compression:
//!
//! ```text
//! offset  size       field
//! 0       8          start time, milliseconds since the Unix epoch (i64, little endian)
//! 8       1          '|'
//! 9       1          board width
//! 10      1          board height
//! 11      1          '|'
//! 12      w * h      tile bytes, row-major
//! ```
//!
//! The payload is gzip-compressed and then base64-encoded with the URL-safe
//! alphabet (`-` and `_` in place of `+` and `/`), keeping `=` padding.

use std::io::{Read, Write};

use base64::{
    Engine as _,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use chrono::DateTime;
use flate2::{Compression, read::GzDecoder, write::GzEncoder};
use tracing::{debug, instrument, trace};

use crate::{Board, BoardError, GameState, MAX_SIDE, Tile, TokenError};

const DELIMITER: u8 = b'|';
const TIME_LEN: usize = 8;
const FIRST_DELIMITER: usize = TIME_LEN;
const SECOND_DELIMITER: usize = TIME_LEN + 3;
const HEADER_LEN: usize = SECOND_DELIMITER + 1;
/// Header plus the tiles of the largest legal board.
const MAX_PAYLOAD_LEN: usize = HEADER_LEN + MAX_SIDE as usize * MAX_SIDE as usize;

/// Pads on encode, and tolerates routers that strip the padding on the way back.
const TOKEN_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(true)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

impl GameState {
    /// Encodes the board and start time into a URL-safe token.
    pub fn to_token(&self) -> Result<String, TokenError> {
        let board = self.board();
        let mut payload = Vec::with_capacity(HEADER_LEN + board.tiles().len());
        payload.extend_from_slice(&self.start_time().timestamp_millis().to_le_bytes());
        payload.push(DELIMITER);
        payload.push(board.width());
        payload.push(board.height());
        payload.push(DELIMITER);
        payload.extend(board.tiles().iter().map(|tile| tile.bits()));

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&payload)?;
        let compressed = encoder.finish()?;

        let token = TOKEN_BASE64.encode(compressed);
        trace!(payload = payload.len(), token = token.len(), "Encoded game state");
        Ok(token)
    }

    /// Decodes a token produced by [`GameState::to_token`].
    ///
    /// Any defect fails the whole decode; there is no partial state.
    #[instrument(level = "trace", skip(token), fields(len = token.len()))]
    pub fn from_token(token: &str) -> Result<Self, TokenError> {
        decode(token).inspect_err(|error| debug!("Rejected state token: {}", error))
    }
}

fn decode(token: &str) -> Result<GameState, TokenError> {
    let compressed = TOKEN_BASE64.decode(token.trim())?;
    // one byte past the limit is enough to tell an oversized payload apart
    let mut payload = Vec::with_capacity(MAX_PAYLOAD_LEN + 1);
    GzDecoder::new(compressed.as_slice())
        .take(MAX_PAYLOAD_LEN as u64 + 1)
        .read_to_end(&mut payload)?;

    if payload.len() > MAX_PAYLOAD_LEN {
        return Err(TokenError::Oversized(MAX_PAYLOAD_LEN));
    }
    if payload.len() < HEADER_LEN {
        return Err(TokenError::Truncated(payload.len()));
    }
    for offset in [FIRST_DELIMITER, SECOND_DELIMITER] {
        if payload[offset] != DELIMITER {
            return Err(TokenError::Delimiter { offset });
        }
    }

    let mut time = [0; TIME_LEN];
    time.copy_from_slice(&payload[..TIME_LEN]);
    let millis = i64::from_le_bytes(time);
    let start_time = DateTime::from_timestamp_millis(millis).ok_or(TokenError::Timestamp(millis))?;

    let (width, height) = (payload[FIRST_DELIMITER + 1], payload[FIRST_DELIMITER + 2]);
    let bytes = &payload[HEADER_LEN..];
    let expected = usize::from(width) * usize::from(height);
    if bytes.len() != expected {
        return Err(BoardError::TileCountMismatch {
            expected,
            actual: bytes.len(),
        }
        .into());
    }
    let tiles = bytes
        .iter()
        .copied()
        .map(Tile::from_bits)
        .collect();
    let board = Board::from_tiles(width, height, tiles)?;

    Ok(GameState::new(board, start_time))
}
