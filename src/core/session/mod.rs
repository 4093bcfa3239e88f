//! # Session Module
//!
//! The streaming driver: feeds entries through decode, hash and sharpness
//! analysis, accumulates results, and emits classification snapshots at
//! batch boundaries.
//!
//! A session processes entries strictly in arrival order. Snapshots are
//! recomputed over the full accumulated state every `regroup_every` items
//! and once more at close when the last batch is partial. An entry whose
//! payload fails to decode is skipped and the session keeps going; that
//! best-effort policy is deliberate and visible in the `Result` branch of
//! [`TriageSession::add`].

mod worker;

pub use worker::TriageWorker;

use serde::{Deserialize, Serialize};

use crate::core::aggregator::{aggregate, ClassificationSnapshot};
use crate::core::decoder::{ImageDecoder, MediaDecoder};
use crate::core::grid::PixelGrid;
use crate::core::hasher::{PerceptualHash, PhashEngine, DEFAULT_DCT_SIZE, DEFAULT_HASH_SIZE};
use crate::core::quality::laplacian_variance;
use crate::error::{DecodeError, TriageError};
use crate::events::{snapshot_channel, SnapshotReceiver, SnapshotSender};

/// Caller-declared media classification of an entry.
///
/// Declared, never inferred: the engine copies this tag into the
/// `screenshot` and `video` snapshot categories without looking at pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
    Screenshot,
    /// A single representative frame of a video, hashed like any image
    Video,
}

/// One item of a triage batch: an identity, an encoded payload, and a
/// declared media kind.
#[derive(Debug, Clone)]
pub struct MediaEntry {
    /// Identity within the batch. Uniqueness is the caller's contract;
    /// duplicate names make category lists ambiguous but are not rejected.
    pub name: String,
    /// Encoded image bytes. The session takes the payload after processing
    /// when the release policy is on, so memory stays bounded.
    pub bytes: Option<Vec<u8>>,
    pub kind: MediaKind,
    /// Payload size captured at construction; survives payload release.
    pub size_bytes: u64,
}

impl MediaEntry {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>, kind: MediaKind) -> Self {
        Self {
            name: name.into(),
            size_bytes: bytes.len() as u64,
            bytes: Some(bytes),
            kind,
        }
    }
}

/// Analysis result for one successfully decoded entry. Never mutated after
/// creation.
#[derive(Debug, Clone)]
pub struct AnalyzedItem {
    pub name: String,
    pub hash: PerceptualHash,
    /// Raw Laplacian response variance
    pub sharpness: f64,
    /// `sharpness < blur_threshold`, decided by the session
    pub is_blurry: bool,
    pub kind: MediaKind,
    pub size_bytes: u64,
    /// Arrival position among successfully decoded entries
    pub index: usize,
}

/// Session configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// Maximum Hamming distance that still counts as similar
    pub phash_threshold: u32,
    /// Sharpness variance below this flags the entry as blurry
    pub blur_threshold: f64,
    /// Emit a snapshot every this many processed entries (clamped to >= 1)
    pub regroup_every: usize,
    /// Release entry payloads after processing
    pub discard_bytes: bool,
    /// Working edge for the DCT (hash) stage
    pub hash_size: u32,
    /// Low-frequency block edge; `dct_size^2` is the hash width in bits
    pub dct_size: u32,
    /// Edge the decoder normalizes entries to before analysis
    pub normalize_size: u32,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            phash_threshold: 10,
            blur_threshold: 250.0,
            regroup_every: 50,
            discard_bytes: true,
            hash_size: DEFAULT_HASH_SIZE,
            dct_size: DEFAULT_DCT_SIZE,
            normalize_size: 256,
        }
    }
}

/// A streaming triage session.
///
/// Owns all accumulated analysis state; only immutable snapshot values
/// leave through the channel. One session is one logical worker - entries
/// are processed sequentially in the order `add` is called, which is what
/// makes batch boundaries and snapshot contents deterministic. Independent
/// sessions share nothing and may run concurrently.
pub struct TriageSession {
    config: TriageConfig,
    engine: PhashEngine,
    decoder: Box<dyn MediaDecoder>,
    events: SnapshotSender,
    items: Vec<AnalyzedItem>,
    processed: usize,
    closed: bool,
}

impl TriageSession {
    /// Create a session with the default `image`-crate decoder.
    ///
    /// Configuration is validated eagerly: invalid hash parameters are a
    /// caller bug and fail construction instead of degrading silently.
    pub fn new(config: TriageConfig, events: SnapshotSender) -> Result<Self, TriageError> {
        Self::with_decoder(config, events, Box::new(ImageDecoder))
    }

    /// Create a session with a custom decoder collaborator.
    pub fn with_decoder(
        config: TriageConfig,
        events: SnapshotSender,
        decoder: Box<dyn MediaDecoder>,
    ) -> Result<Self, TriageError> {
        let engine = PhashEngine::new(config.hash_size, config.dct_size)?;
        if config.normalize_size == 0 {
            return Err(TriageError::Config(
                "normalize_size must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            config,
            engine,
            decoder,
            events,
            items: Vec::new(),
            processed: 0,
            closed: false,
        })
    }

    /// Process one entry.
    ///
    /// On decode failure the entry is skipped silently (logged at debug) and
    /// the session continues. On success the hash and sharpness are
    /// computed, the payload is released when the policy says so, and a
    /// snapshot is emitted if this entry lands on a batch boundary.
    /// A no-op after [`close`](Self::close).
    pub fn add(&mut self, entry: &mut MediaEntry) {
        if self.closed {
            tracing::warn!(entry = %entry.name, "add after close is ignored");
            return;
        }

        let grid = match self.decode(entry) {
            Ok(grid) => grid,
            Err(error) => {
                tracing::debug!(%error, "skipping entry");
                return;
            }
        };

        let hash = self.engine.hash(&grid);
        let sharpness = laplacian_variance(&grid);
        let is_blurry = sharpness < self.config.blur_threshold;

        self.items.push(AnalyzedItem {
            name: entry.name.clone(),
            hash,
            sharpness,
            is_blurry,
            kind: entry.kind,
            size_bytes: entry.size_bytes,
            index: self.items.len(),
        });

        if self.config.discard_bytes {
            entry.bytes = None;
        }

        self.processed += 1;
        if self.processed % self.regroup_every() == 0 {
            self.emit();
        }
    }

    /// Close the session, emitting a final snapshot if the last batch was
    /// partial. Idempotent; a session that processed nothing emits nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        if self.processed > 0 && self.processed % self.regroup_every() != 0 {
            self.emit();
        }
    }

    /// Number of successfully processed entries so far.
    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn regroup_every(&self) -> usize {
        self.config.regroup_every.max(1)
    }

    fn decode(&self, entry: &MediaEntry) -> Result<PixelGrid, DecodeError> {
        let bytes = entry.bytes.as_deref().ok_or_else(|| DecodeError::EmptyPayload {
            name: entry.name.clone(),
        })?;
        self.decoder.decode_and_resize(
            &entry.name,
            bytes,
            self.config.normalize_size,
            self.config.normalize_size,
        )
    }

    fn emit(&self) {
        let snapshot = aggregate(&self.items, self.config.phash_threshold);
        tracing::debug!(processed = self.processed, "emitting classification snapshot");
        self.events.send(snapshot);
    }
}

/// Classify a fixed batch, yielding snapshots lazily.
///
/// Each `next()` call drives the internal session just far enough to produce
/// the next emission: exactly one snapshot per full `regroup_every` batch
/// plus one for a trailing partial batch. The stream is finite and not
/// restartable; every call to `classify` starts a fresh computation.
/// Configuration errors surface here, before any processing.
pub fn classify(
    entries: Vec<MediaEntry>,
    config: TriageConfig,
) -> Result<SnapshotStream, TriageError> {
    let (sender, receiver) = snapshot_channel();
    let session = TriageSession::new(config, sender)?;
    Ok(SnapshotStream {
        session,
        entries: entries.into_iter(),
        receiver,
        finished: false,
    })
}

/// Lazy snapshot sequence over a fixed batch of entries.
pub struct SnapshotStream {
    session: TriageSession,
    entries: std::vec::IntoIter<MediaEntry>,
    receiver: SnapshotReceiver,
    finished: bool,
}

impl Iterator for SnapshotStream {
    type Item = ClassificationSnapshot;

    fn next(&mut self) -> Option<ClassificationSnapshot> {
        loop {
            if let Some(snapshot) = self.receiver.try_recv() {
                return Some(snapshot);
            }
            if self.finished {
                return None;
            }
            match self.entries.next() {
                Some(mut entry) => self.session.add(&mut entry),
                None => {
                    self.session.close();
                    self.finished = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::snapshot_channel;

    /// Deterministic decoder stub: the first payload byte becomes a flat
    /// luminance field, a payload starting with 0xFF fails to decode.
    struct StubDecoder;

    impl MediaDecoder for StubDecoder {
        fn decode_and_resize(
            &self,
            name: &str,
            bytes: &[u8],
            width: u32,
            height: u32,
        ) -> Result<PixelGrid, DecodeError> {
            match bytes.first() {
                Some(&first) if first != 0xFF => Ok(PixelGrid::new(
                    width,
                    height,
                    vec![first as f64; (width * height) as usize],
                )),
                _ => Err(DecodeError::DecodeFailed {
                    name: name.to_string(),
                    reason: "stub rejection".to_string(),
                }),
            }
        }
    }

    fn stub_session(config: TriageConfig) -> (TriageSession, SnapshotReceiver) {
        let (sender, receiver) = snapshot_channel();
        let session = TriageSession::with_decoder(config, sender, Box::new(StubDecoder)).unwrap();
        (session, receiver)
    }

    fn entry(name: &str, first_byte: u8) -> MediaEntry {
        MediaEntry::new(name, vec![first_byte, 0, 0, 0], MediaKind::Image)
    }

    fn small_config(regroup_every: usize) -> TriageConfig {
        TriageConfig {
            regroup_every,
            // Tiny working sizes keep the DCT cheap in unit tests
            normalize_size: 16,
            hash_size: 16,
            dct_size: 4,
            ..TriageConfig::default()
        }
    }

    #[test]
    fn invalid_dct_config_fails_construction() {
        let (sender, _receiver) = snapshot_channel();
        let config = TriageConfig {
            hash_size: 8,
            dct_size: 16,
            ..TriageConfig::default()
        };

        assert!(TriageSession::new(config, sender).is_err());
    }

    #[test]
    fn zero_normalize_size_fails_construction() {
        let (sender, _receiver) = snapshot_channel();
        let config = TriageConfig {
            normalize_size: 0,
            ..TriageConfig::default()
        };

        assert!(matches!(
            TriageSession::new(config, sender),
            Err(TriageError::Config(_))
        ));
    }

    #[test]
    fn snapshot_emitted_on_every_batch_boundary() {
        let (mut session, receiver) = stub_session(small_config(2));

        for i in 0..4 {
            session.add(&mut entry(&format!("p{}", i), i));
        }

        assert_eq!(receiver.try_recv().unwrap().all.count, 2);
        assert_eq!(receiver.try_recv().unwrap().all.count, 4);
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn close_emits_final_partial_batch() {
        let (mut session, receiver) = stub_session(small_config(3));

        for i in 0..5 {
            session.add(&mut entry(&format!("p{}", i), i));
        }
        session.close();

        assert_eq!(receiver.try_recv().unwrap().all.count, 3);
        assert_eq!(receiver.try_recv().unwrap().all.count, 5);
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn close_after_exact_boundary_emits_nothing_extra() {
        let (mut session, receiver) = stub_session(small_config(2));

        session.add(&mut entry("a", 1));
        session.add(&mut entry("b", 2));
        session.close();

        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn close_is_idempotent() {
        let (mut session, receiver) = stub_session(small_config(10));

        session.add(&mut entry("a", 1));
        session.close();
        session.close();

        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn add_after_close_is_a_no_op() {
        let (mut session, receiver) = stub_session(small_config(1));

        session.add(&mut entry("a", 1));
        session.close();
        session.add(&mut entry("b", 2));

        assert!(receiver.try_recv().is_some());
        assert!(receiver.try_recv().is_none());
        assert_eq!(session.processed(), 1);
    }

    #[test]
    fn session_with_no_processed_entries_emits_nothing() {
        let (mut session, receiver) = stub_session(small_config(1));

        session.add(&mut entry("broken", 0xFF));
        session.close();

        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn undecodable_entries_are_skipped_not_counted() {
        let (mut session, receiver) = stub_session(small_config(2));

        session.add(&mut entry("good", 10));
        session.add(&mut entry("broken", 0xFF));
        session.add(&mut entry("also-good", 20));
        session.close();

        let snapshot = receiver.try_recv().unwrap();
        assert_eq!(snapshot.all.count, 2);
        assert_eq!(snapshot.all.list, vec!["good", "also-good"]);
    }

    #[test]
    fn missing_payload_is_treated_as_decode_failure() {
        let (mut session, receiver) = stub_session(small_config(1));

        let mut hollow = MediaEntry::new("hollow", vec![1, 2, 3], MediaKind::Image);
        hollow.bytes = None;
        session.add(&mut hollow);
        session.close();

        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn payload_released_after_processing_by_default() {
        let (mut session, _receiver) = stub_session(small_config(10));

        let mut item = entry("a", 1);
        session.add(&mut item);

        assert!(item.bytes.is_none());
        assert_eq!(item.size_bytes, 4);
    }

    #[test]
    fn payload_kept_when_release_policy_is_off() {
        let config = TriageConfig {
            discard_bytes: false,
            ..small_config(10)
        };
        let (mut session, _receiver) = stub_session(config);

        let mut item = entry("a", 1);
        session.add(&mut item);

        assert!(item.bytes.is_some());
    }

    #[test]
    fn payload_kept_when_decode_fails() {
        let (mut session, _receiver) = stub_session(small_config(10));

        let mut item = entry("broken", 0xFF);
        session.add(&mut item);

        assert!(item.bytes.is_some());
    }

    #[test]
    fn regroup_every_zero_is_clamped_to_one() {
        let (mut session, receiver) = stub_session(small_config(0));

        session.add(&mut entry("a", 1));

        assert!(receiver.try_recv().is_some());
    }

    #[test]
    fn classify_empty_batch_yields_no_snapshots() {
        let stream = classify(Vec::new(), small_config(3)).unwrap();
        assert_eq!(stream.count(), 0);
    }

    #[test]
    fn classify_rejects_invalid_config_eagerly() {
        let config = TriageConfig {
            dct_size: 0,
            ..TriageConfig::default()
        };
        assert!(classify(Vec::new(), config).is_err());
    }
}
