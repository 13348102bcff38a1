//! Cascade serialization: packed binary layout and hex-array rendering.
//!
//! The on-disk artifact is a C-style byte array in text form, embeddable
//! directly in a downstream detector runtime. It is produced in two pure
//! steps, [`encode_binary`] then [`render_hex`], composed by
//! [`to_hex_file`].
//!
//! Binary layout, native endianness, fully self-describing (every repeated
//! group is preceded by its count):
//!
//! ```text
//! f32 region.row_offset
//! f32 region.col_offset
//! f32 region.row_scale
//! f32 region.col_scale
//! i32 number_of_stages
//!   per stage:
//!     i32 number_of_learners
//!     per learner:
//!       i32      depth            (leaf level excluded)
//!       i32[d-1] internal codes
//!       f32[d]   leaf values
//!     f32 stage_threshold
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::boost::GentleBoost;
use crate::cascade::{Cascade, Detector, NormalizedRegion, RegressionTreeData, TreeLearner};

/// Hex bytes per output row.
const BYTES_PER_ROW: usize = 32;

/// Errors from encoding, decoding, or writing a cascade model.
#[derive(Debug)]
pub enum SerializeError {
    /// Underlying I/O failure while writing the artifact. Surfaced
    /// unmodified; no partial-file cleanup is attempted.
    Io(std::io::Error),
    /// The in-memory model cannot be expressed in the layout (tree framing
    /// inconsistency, or a count that overflows `i32`).
    InvalidModel(String),
    /// The byte stream does not parse as the documented layout.
    InvalidFormat(String),
}

impl fmt::Display for SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializeError::Io(err) => write!(f, "I/O error while writing model: {err}"),
            SerializeError::InvalidModel(msg) => {
                write!(f, "Model cannot be serialized: {msg}")
            }
            SerializeError::InvalidFormat(msg) => {
                write!(f, "Byte stream has invalid structure: {msg}")
            }
        }
    }
}

impl std::error::Error for SerializeError {}

impl From<std::io::Error> for SerializeError {
    fn from(err: std::io::Error) -> Self {
        SerializeError::Io(err)
    }
}

fn put_i32(buf: &mut Vec<u8>, value: i32) {
    buf.extend_from_slice(&value.to_ne_bytes());
}

fn put_f32(buf: &mut Vec<u8>, value: f32) {
    buf.extend_from_slice(&value.to_ne_bytes());
}

fn count_as_i32(count: usize, what: &str) -> Result<i32, SerializeError> {
    i32::try_from(count)
        .map_err(|_| SerializeError::InvalidModel(format!("{what} count {count} exceeds i32")))
}

/// Flatten a detector model into the packed binary layout.
pub fn encode_binary<L: TreeLearner>(detector: &Detector<L>) -> Result<Vec<u8>, SerializeError> {
    let mut bytes = Vec::new();

    let region = detector.region();
    put_f32(&mut bytes, region.row_offset);
    put_f32(&mut bytes, region.col_offset);
    put_f32(&mut bytes, region.row_scale);
    put_f32(&mut bytes, region.col_scale);

    let cascade = detector.cascade();
    put_i32(&mut bytes, count_as_i32(cascade.num_stages(), "stage")?);

    for stage in cascade.stages() {
        let learners = stage.classifier().learners();
        put_i32(&mut bytes, count_as_i32(learners.len(), "learner")?);

        for learner in learners {
            encode_tree(&mut bytes, learner)?;
        }

        put_f32(&mut bytes, stage.threshold());
    }

    Ok(bytes)
}

fn encode_tree<L: TreeLearner>(bytes: &mut Vec<u8>, learner: &L) -> Result<(), SerializeError> {
    let depth = learner.depth();
    let codes = learner.internal_codes();
    let leaves = learner.leaf_values();

    if depth < 1 || codes.len() != (depth - 1) as usize || leaves.len() != depth as usize {
        return Err(SerializeError::InvalidModel(format!(
            "tree of depth {depth} carries {} internal codes and {} leaf values",
            codes.len(),
            leaves.len(),
        )));
    }

    put_i32(bytes, depth);
    for &code in codes {
        put_i32(bytes, code);
    }
    for &leaf in leaves {
        put_f32(bytes, leaf);
    }
    Ok(())
}

/// Render a binary stream as rows of `0xhh, ` tokens.
///
/// Each row starts with a space, a newline, and a tab, holds up to 32
/// bytes, and the whole rendering ends with a lone `0x00` sentinel on its
/// own indented line. The downstream facefinder format expects exactly this
/// shape, sentinel included.
pub fn render_hex(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len() * 6 + 8);

    for (i, byte) in bytes.iter().enumerate() {
        if i % BYTES_PER_ROW == 0 {
            text.push_str(" \n\t");
        }
        text.push_str(&format!("0x{byte:02x}, "));
    }

    text.push_str("\n\t0x00\n");
    text
}

/// Encode a detector and write its hex rendering to `path`.
///
/// I/O failures propagate unmodified; callers needing atomicity should
/// write to a temporary location and rename.
pub fn to_hex_file<L, P>(detector: &Detector<L>, path: P) -> Result<(), SerializeError>
where
    L: TreeLearner,
    P: AsRef<Path>,
{
    let bytes = encode_binary(detector)?;
    let text = render_hex(&bytes);

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Byte cursor over a packed model stream.
struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn take(&mut self, n: usize, what: &str) -> Result<&'a [u8], SerializeError> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.bytes.len());
        let end = end.ok_or_else(|| {
            SerializeError::InvalidFormat(format!(
                "stream truncated reading {what} at offset {}",
                self.pos
            ))
        })?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn take_i32(&mut self, what: &str) -> Result<i32, SerializeError> {
        let raw = self.take(4, what)?;
        let mut word = [0u8; 4];
        word.copy_from_slice(raw);
        Ok(i32::from_ne_bytes(word))
    }

    fn take_f32(&mut self, what: &str) -> Result<f32, SerializeError> {
        let raw = self.take(4, what)?;
        let mut word = [0u8; 4];
        word.copy_from_slice(raw);
        Ok(f32::from_ne_bytes(word))
    }

    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }
}

fn non_negative(value: i32, what: &str) -> Result<usize, SerializeError> {
    usize::try_from(value)
        .map_err(|_| SerializeError::InvalidFormat(format!("negative {what} count {value}")))
}

/// Parse a packed model stream back into a detector.
///
/// The stream must contain exactly one model; trailing bytes are rejected.
pub fn decode_binary(bytes: &[u8]) -> Result<Detector<RegressionTreeData>, SerializeError> {
    let mut reader = Reader::new(bytes);

    let region = NormalizedRegion::new(
        reader.take_f32("region row offset")?,
        reader.take_f32("region col offset")?,
        reader.take_f32("region row scale")?,
        reader.take_f32("region col scale")?,
    );

    let n_stages = non_negative(reader.take_i32("stage count")?, "stage")?;
    let mut cascade = Cascade::new();

    for _ in 0..n_stages {
        let n_learners = non_negative(reader.take_i32("learner count")?, "learner")?;
        let mut learners = Vec::with_capacity(n_learners.min(reader.remaining() / 4));

        for _ in 0..n_learners {
            learners.push(decode_tree(&mut reader)?);
        }

        let threshold = reader.take_f32("stage threshold")?;
        cascade.push_stage(GentleBoost::from_learners(learners), threshold);
    }

    if reader.remaining() != 0 {
        return Err(SerializeError::InvalidFormat(format!(
            "{} trailing bytes after model",
            reader.remaining()
        )));
    }

    Ok(Detector::new(region, cascade))
}

fn decode_tree(reader: &mut Reader<'_>) -> Result<RegressionTreeData, SerializeError> {
    let depth = reader.take_i32("tree depth")?;
    if depth < 1 {
        return Err(SerializeError::InvalidFormat(format!(
            "tree depth {depth} out of range"
        )));
    }

    let mut codes = Vec::with_capacity((depth - 1) as usize);
    for _ in 1..depth {
        codes.push(reader.take_i32("internal node code")?);
    }

    let mut leaves = Vec::with_capacity(depth as usize);
    for _ in 0..depth {
        leaves.push(reader.take_f32("leaf value")?);
    }

    RegressionTreeData::new(depth, codes, leaves)
        .map_err(|err| SerializeError::InvalidFormat(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one_stump_detector() -> Detector<RegressionTreeData> {
        let stump = RegressionTreeData::new(2, vec![0x1234_5678], vec![-0.5, 0.5]).unwrap();
        let mut cascade = Cascade::new();
        cascade.push_stage(GentleBoost::from_learners(vec![stump]), 0.5);
        Detector::new(NormalizedRegion::default(), cascade)
    }

    #[test]
    fn round_trip_is_bit_exact() {
        let detector = one_stump_detector();
        let bytes = encode_binary(&detector).unwrap();

        // 4 region floats + stage count + learner count + depth + 1 code
        // + 2 leaves + threshold = 11 words.
        assert_eq!(bytes.len(), 44);

        let decoded = decode_binary(&bytes).unwrap();
        assert_eq!(decoded.region(), detector.region());
        assert_eq!(decoded.cascade().num_stages(), 1);

        let stage = &decoded.cascade().stages()[0];
        assert_eq!(stage.threshold().to_bits(), 0.5f32.to_bits());
        assert_eq!(
            stage.classifier().learners(),
            detector.cascade().stages()[0].classifier().learners()
        );

        let re_encoded = encode_binary(&decoded).unwrap();
        assert_eq!(re_encoded, bytes);
    }

    #[test]
    fn empty_cascade_encodes_header_only() {
        let detector: Detector<RegressionTreeData> =
            Detector::new(NormalizedRegion::new(0.1, 0.2, 0.9, 0.8), Cascade::new());
        let bytes = encode_binary(&detector).unwrap();
        assert_eq!(bytes.len(), 20);

        let decoded = decode_binary(&bytes).unwrap();
        assert!(decoded.cascade().is_empty());
        assert_eq!(decoded.region().col_scale, 0.8);
    }

    struct BadTree;

    impl TreeLearner for BadTree {
        fn depth(&self) -> i32 {
            3
        }
        fn internal_codes(&self) -> &[i32] {
            &[1]
        }
        fn leaf_values(&self) -> &[f32] {
            &[0.0, 0.0, 0.0]
        }
    }

    #[test]
    fn inconsistent_tree_framing_is_rejected() {
        let mut cascade = Cascade::new();
        cascade.push_stage(GentleBoost::from_learners(vec![BadTree]), 0.0);
        let detector = Detector::new(NormalizedRegion::default(), cascade);
        assert!(matches!(
            encode_binary(&detector),
            Err(SerializeError::InvalidModel(_))
        ));
    }

    #[test]
    fn truncated_and_padded_streams_are_rejected() {
        let bytes = encode_binary(&one_stump_detector()).unwrap();

        assert!(matches!(
            decode_binary(&bytes[..bytes.len() - 1]),
            Err(SerializeError::InvalidFormat(_))
        ));

        let mut padded = bytes.clone();
        padded.push(0);
        assert!(matches!(
            decode_binary(&padded),
            Err(SerializeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn negative_counts_are_rejected() {
        let mut bytes = Vec::new();
        for _ in 0..4 {
            put_f32(&mut bytes, 0.0);
        }
        put_i32(&mut bytes, -1);
        assert!(matches!(
            decode_binary(&bytes),
            Err(SerializeError::InvalidFormat(_))
        ));
    }

    #[test]
    fn hex_rows_hold_thirty_two_bytes() {
        let rendered = render_hex(&[0xab; 32]);
        // One full row, then the sentinel block.
        assert_eq!(
            rendered,
            format!(" \n\t{}\n\t0x00\n", "0xab, ".repeat(32))
        );

        let rendered = render_hex(&[0xab; 33]);
        assert_eq!(
            rendered,
            format!(" \n\t{} \n\t0xab, \n\t0x00\n", "0xab, ".repeat(32))
        );
    }

    #[test]
    fn hex_rendering_of_empty_stream_is_just_the_sentinel() {
        assert_eq!(render_hex(&[]), "\n\t0x00\n");
    }

    #[test]
    fn hex_bytes_are_lowercase_and_ordered() {
        let rendered = render_hex(&[0x00, 0x0f, 0xf0, 0xff]);
        assert_eq!(rendered, " \n\t0x00, 0x0f, 0xf0, 0xff, \n\t0x00\n");
    }
}
