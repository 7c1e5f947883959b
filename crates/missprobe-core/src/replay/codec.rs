//! Binary replay container codec.
//!
//! # Layout
//!
//! ```text
//! u8      game mode
//! i32     format version
//! str?    map hash, player name, replay hash
//! u16 x6  300 / 100 / 50 / geki / katu / miss
//! u32     total score
//! u16     max combo
//! bool    perfect combo
//! i32     mods
//! str?    life bar "time|pct,..."
//! i64     play time (.NET ticks)
//! i32     N, compressed event blob length
//! [N]     compressed "delta|x|y|keys,..." text
//! i64     online score id (optional)
//! ```
//!
//! `str?` is a marker byte (0x00 absent, 0x0b present) followed by a
//! ULEB128 byte length and UTF-8 data.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use memchr::memchr_iter;
use tracing::{debug, warn};

use crate::constants::codec::{
    BLOB_LENGTH_ADJUSTMENT, ONLINE_SCORE_ID_SIZE, PROTOCOL_ARTIFACT_FRAMES, SEED_SENTINEL,
    SEED_SENTINEL_VALUE, STRING_ABSENT, STRING_PRESENT, TICKS_PER_SECOND, UNIX_EPOCH_TICKS,
};
use crate::error::{Error, Result};
use crate::replay::{
    Compressor, GameMode, Keys, LifeFrame, LzmaCodec, Mods, Replay, ReplayFrame, ReplayHeader,
};

/// Placeholder artifact record for replays built in memory
const PLACEHOLDER_ARTIFACT: (i32, f32, f32, u32) = (0, 256.0, -500.0, 0);

#[derive(Debug)]
enum ReadError {
    Truncated { offset: usize, needed: usize },
    StringMarker { offset: usize, marker: u8 },
    LengthOverflow { offset: usize },
    InvalidUtf8 { offset: usize },
    UnknownGameMode(u8),
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { offset, needed } => {
                write!(f, "unexpected end of data at {offset:#x} ({needed} bytes needed)")
            }
            Self::StringMarker { offset, marker } => {
                write!(f, "unexpected string marker {marker:#04x} at {offset:#x}")
            }
            Self::LengthOverflow { offset } => write!(f, "string length overflow at {offset:#x}"),
            Self::InvalidUtf8 { offset } => write!(f, "string at {offset:#x} is not UTF-8"),
            Self::UnknownGameMode(mode) => write!(f, "unknown game mode {mode}"),
        }
    }
}

impl ReadError {
    /// Any header damage is structural
    fn in_header(self) -> Error {
        Error::format(self.to_string())
    }

    /// A short body means the caller holds a partial file
    fn in_body(self) -> Error {
        match self {
            Self::Truncated { .. } => Error::incomplete(self.to_string()),
            other => Error::format(other.to_string()),
        }
    }
}

type ReadResult<T> = std::result::Result<T, ReadError>;

/// Little-endian cursor over the container bytes
struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take(&mut self, needed: usize) -> ReadResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(needed)
            .filter(|&end| end <= self.data.len())
            .ok_or(ReadError::Truncated {
                offset: self.pos,
                needed,
            })?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    fn read_u8(&mut self) -> ReadResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn read_bool(&mut self) -> ReadResult<bool> {
        Ok(self.read_u8()? != 0)
    }

    fn read_u16(&mut self) -> ReadResult<u16> {
        let b = self.take(2)?;
        Ok(u16::from_le_bytes([b[0], b[1]]))
    }

    fn read_i32(&mut self) -> ReadResult<i32> {
        let b = self.take(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u32(&mut self) -> ReadResult<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_i64(&mut self) -> ReadResult<i64> {
        let b = self.take(8)?;
        Ok(i64::from_le_bytes([
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7],
        ]))
    }

    fn read_uleb128(&mut self) -> ReadResult<usize> {
        let offset = self.pos;
        let mut value: usize = 0;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            if shift >= 35 {
                return Err(ReadError::LengthOverflow { offset });
            }
            value |= usize::from(byte & 0x7F) << shift;
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }

    fn read_optional_string(&mut self) -> ReadResult<Option<String>> {
        let offset = self.pos;
        match self.read_u8()? {
            STRING_ABSENT => Ok(None),
            STRING_PRESENT => {
                let len = self.read_uleb128()?;
                let bytes = self.take(len)?;
                String::from_utf8(bytes.to_vec())
                    .map(Some)
                    .map_err(|_| ReadError::InvalidUtf8 { offset })
            }
            marker => Err(ReadError::StringMarker { offset, marker }),
        }
    }
}

#[derive(Debug, Default)]
struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn write_i32(&mut self, value: i32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn write_i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn write_uleb128(&mut self, mut value: usize) {
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    fn write_optional_string(&mut self, value: Option<&str>) {
        match value {
            None => self.write_u8(STRING_ABSENT),
            Some(s) => {
                self.write_u8(STRING_PRESENT);
                self.write_uleb128(s.len());
                self.buf.extend_from_slice(s.as_bytes());
            }
        }
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Convert .NET ticks (100ns since 0001-01-01 UTC) to a timestamp
pub fn ticks_to_datetime(ticks: i64) -> Result<DateTime<Utc>> {
    let out_of_range = || Error::format(format!("play time of {ticks} ticks is out of range"));
    let since_epoch = ticks.checked_sub(UNIX_EPOCH_TICKS).ok_or_else(out_of_range)?;
    let secs = since_epoch.div_euclid(TICKS_PER_SECOND);
    let nanos = (since_epoch.rem_euclid(TICKS_PER_SECOND) * 100) as u32;
    DateTime::from_timestamp(secs, nanos).ok_or_else(out_of_range)
}

/// Inverse of [`ticks_to_datetime`]
pub fn datetime_to_ticks(time: &DateTime<Utc>) -> i64 {
    time.timestamp() * TICKS_PER_SECOND
        + i64::from(time.timestamp_subsec_nanos() / 100)
        + UNIX_EPOCH_TICKS
}

fn read_header(reader: &mut ByteReader) -> ReadResult<ReplayHeader> {
    let mode = reader.read_u8()?;
    let game_mode = GameMode::from_u8(mode).ok_or(ReadError::UnknownGameMode(mode))?;

    Ok(ReplayHeader {
        game_mode,
        format_version: reader.read_i32()?,
        map_hash: reader.read_optional_string()?,
        player_name: reader.read_optional_string()?,
        replay_hash: reader.read_optional_string()?,
        count_300: reader.read_u16()?,
        count_100: reader.read_u16()?,
        count_50: reader.read_u16()?,
        count_geki: reader.read_u16()?,
        count_katu: reader.read_u16()?,
        count_miss: reader.read_u16()?,
        total_score: reader.read_u32()?,
        max_combo: reader.read_u16()?,
        is_perfect: reader.read_bool()?,
        mods: Mods::from_bits(reader.read_i32()? as u32),
    })
}

fn write_header(writer: &mut ByteWriter, header: &ReplayHeader) {
    writer.write_u8(header.game_mode as u8);
    writer.write_i32(header.format_version);
    writer.write_optional_string(header.map_hash.as_deref());
    writer.write_optional_string(header.player_name.as_deref());
    writer.write_optional_string(header.replay_hash.as_deref());
    writer.write_u16(header.count_300);
    writer.write_u16(header.count_100);
    writer.write_u16(header.count_50);
    writer.write_u16(header.count_geki);
    writer.write_u16(header.count_katu);
    writer.write_u16(header.count_miss);
    writer.write_u32(header.total_score);
    writer.write_u16(header.max_combo);
    writer.write_bool(header.is_perfect);
    writer.write_i32(header.mods.bits() as i32);
}

/// Parse "time|pct,..." skipping short or non-numeric records
fn parse_life_frames(text: &str) -> Vec<LifeFrame> {
    text.split(',')
        .filter_map(|block| {
            let mut fields = block.split('|');
            let time = fields.next()?.trim().parse::<i32>().ok()?;
            let percentage = fields.next()?.trim().parse::<f32>().ok()?;
            Some(LifeFrame { time, percentage })
        })
        .collect()
}

fn format_life_frames(life_frames: &[LifeFrame]) -> String {
    life_frames
        .iter()
        .map(|l| format!("{}|{},", l.time, l.percentage))
        .collect()
}

fn parse_field<T: FromStr>(field: &str, name: &str) -> Result<T> {
    field
        .trim()
        .parse()
        .map_err(|_| Error::format(format!("invalid {name} {field:?} in event stream")))
}

/// Split the decompressed event text into frames and the RNG seed
fn parse_events(text: &[u8]) -> Result<(Vec<ReplayFrame>, i32)> {
    let mut frames = Vec::new();
    let mut seed = 0;
    let mut last_time = 0i32;
    let mut skipped = 0usize;
    let mut start = 0;

    for end in memchr_iter(b',', text).chain(std::iter::once(text.len())) {
        let record = &text[start..end];
        start = end + 1;
        if record.is_empty() {
            continue;
        }

        let record = std::str::from_utf8(record)
            .map_err(|_| Error::format("event stream is not ASCII text"))?;
        let fields: Vec<&str> = record.split('|').collect();
        if fields.len() < 4 {
            skipped += 1;
            continue;
        }

        if fields[0] == SEED_SENTINEL {
            seed = parse_field(fields[3], "seed")?;
            continue;
        }

        let time_delta: i32 = parse_field(fields[0], "time delta")?;
        let x: f32 = parse_field(fields[1], "x")?;
        let y: f32 = parse_field(fields[2], "y")?;
        let keys: i32 = parse_field(fields[3], "key mask")?;

        last_time = last_time.saturating_add(time_delta);
        frames.push(ReplayFrame::new(
            time_delta,
            last_time,
            x,
            y,
            Keys::from_bits(keys as u32),
        ));
    }

    if skipped > 0 {
        warn!("Skipped {} short event records", skipped);
    }

    Ok((frames, seed))
}

/// Size of the compressed blob given the length field and the bytes left.
///
/// The field normally holds the compressed size minus
/// `BLOB_LENGTH_ADJUSTMENT`. Containers too short for that are read with the
/// field as the exact size.
fn blob_size(length_field: usize, remaining: usize) -> Option<usize> {
    let adjusted = length_field + BLOB_LENGTH_ADJUSTMENT;
    if remaining >= adjusted {
        Some(adjusted)
    } else if remaining >= length_field {
        Some(length_field)
    } else {
        None
    }
}

fn push_event(text: &mut String, time_delta: i32, x: f32, y: f32, keys: u32) {
    text.push_str(&format!("{}|{}|{}|{},", time_delta, x, y, keys as i32));
}

impl Replay {
    /// Decode only the fixed header; frame operations will fail until
    /// [`Replay::load_frames`] is called
    pub fn decode_header(bytes: &[u8]) -> Result<Replay> {
        let mut reader = ByteReader::new(bytes);
        let header = read_header(&mut reader).map_err(ReadError::in_header)?;
        Ok(Replay::header_only(header))
    }

    /// Decode the full container, event stream included
    pub fn decode(bytes: &[u8]) -> Result<Replay> {
        Self::decode_with(bytes, &LzmaCodec)
    }

    pub fn decode_with(bytes: &[u8], codec: &dyn Compressor) -> Result<Replay> {
        let mut reader = ByteReader::new(bytes);
        let header = read_header(&mut reader).map_err(ReadError::in_header)?;
        let mut replay = Replay::header_only(header);
        replay.read_body(&mut reader, codec)?;
        Ok(replay)
    }

    /// Read a replay file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Replay> {
        let bytes = fs::read(path.as_ref())?;
        debug!("Read {} bytes from {}", bytes.len(), path.as_ref().display());
        Self::decode(&bytes)
    }

    /// Complete a header-only replay from the same container bytes
    pub fn load_frames(&mut self, bytes: &[u8]) -> Result<()> {
        self.load_frames_with(bytes, &LzmaCodec)
    }

    pub fn load_frames_with(&mut self, bytes: &[u8], codec: &dyn Compressor) -> Result<()> {
        if self.fully_loaded {
            return Ok(());
        }

        let mut reader = ByteReader::new(bytes);
        let header = read_header(&mut reader).map_err(ReadError::in_header)?;
        if header.replay_hash != self.header.replay_hash {
            return Err(Error::format(
                "container does not belong to this replay (replay hash differs)",
            ));
        }

        self.read_body(&mut reader, codec)
    }

    /// Everything after the header. Fields are only assigned once the whole
    /// body has been read, so a failure leaves the replay untouched.
    fn read_body(&mut self, reader: &mut ByteReader, codec: &dyn Compressor) -> Result<()> {
        let life_data = reader.read_optional_string().map_err(ReadError::in_body)?;
        let life_frames = life_data
            .as_deref()
            .map(parse_life_frames)
            .unwrap_or_default();

        let ticks = reader.read_i64().map_err(ReadError::in_body)?;
        let play_time = ticks_to_datetime(ticks)?;

        let length = reader.read_i32().map_err(ReadError::in_body)?;
        if length < 0 {
            return Err(Error::format(format!(
                "negative event blob length {length}"
            )));
        }
        if length == 0 {
            return Err(Error::incomplete("replay contains no event data"));
        }
        let Some(blob_size) = blob_size(length as usize, reader.remaining()) else {
            return Err(Error::incomplete(format!(
                "event blob truncated: {} of {} bytes present",
                reader.remaining(),
                length as usize + BLOB_LENGTH_ADJUSTMENT
            )));
        };

        let blob = reader.take(blob_size).map_err(ReadError::in_body)?;
        let text = codec.decompress(blob)?;
        let (mut frames, seed) = parse_events(&text)?;

        let online_score_id = if reader.remaining() >= ONLINE_SCORE_ID_SIZE {
            Some(reader.read_i64().map_err(ReadError::in_body)?)
        } else {
            None
        };

        let artifacts = PROTOCOL_ARTIFACT_FRAMES.min(frames.len());
        let preamble: Vec<ReplayFrame> = frames.drain(..artifacts).collect();

        debug!(
            "Decoded {} frames, {} life frames, seed {}",
            frames.len(),
            life_frames.len(),
            seed
        );

        self.life_frames = life_frames;
        self.play_time = play_time;
        self.seed = seed;
        self.online_score_id = online_score_id;
        self.frames = frames;
        self.preamble = preamble;
        self.fully_loaded = true;
        self.compute_kinematics();

        Ok(())
    }

    /// Encode back into the container format
    pub fn encode(&self) -> Result<Vec<u8>> {
        self.encode_with(&LzmaCodec)
    }

    pub fn encode_with(&self, codec: &dyn Compressor) -> Result<Vec<u8>> {
        let mut writer = ByteWriter::default();
        write_header(&mut writer, &self.header);

        let life = format_life_frames(&self.life_frames);
        writer.write_optional_string(Some(&life));
        writer.write_i64(datetime_to_ticks(&self.play_time));

        if self.fully_loaded {
            let compressed = codec.compress(self.event_text().as_bytes())?;
            let length = compressed
                .len()
                .checked_sub(BLOB_LENGTH_ADJUSTMENT)
                .and_then(|n| i32::try_from(n).ok())
                .ok_or_else(|| {
                    Error::format(format!(
                        "event blob of {} bytes has no valid length field",
                        compressed.len()
                    ))
                })?;
            writer.write_i32(length);
            writer.write_bytes(&compressed);
        } else {
            writer.write_i32(0);
        }

        if let Some(id) = self.online_score_id {
            writer.write_i64(id);
        }

        Ok(writer.into_inner())
    }

    /// Write the encoded replay to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.encode()?)?;
        Ok(())
    }

    fn event_text(&self) -> String {
        let mut text = String::new();

        if self.preamble.is_empty() {
            let (delta, x, y, keys) = PLACEHOLDER_ARTIFACT;
            for _ in 0..PROTOCOL_ARTIFACT_FRAMES {
                push_event(&mut text, delta, x, y, keys);
            }
        } else {
            for frame in &self.preamble {
                push_event(&mut text, frame.time_delta, frame.x, frame.y, frame.keys.bits());
            }
        }

        for frame in &self.frames {
            push_event(&mut text, frame.time_delta, frame.x, frame.y, frame.keys.bits());
        }

        text.push_str(&format!("{}|0|0|{},", SEED_SENTINEL_VALUE, self.seed));
        text
    }
}
