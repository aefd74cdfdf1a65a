//! Batch loading of selected files
//!
//! Files selected together are committed to the playlist together. Each file
//! gets a slot when the batch opens; the host reports one terminal decode
//! outcome per file, in any order; the batch completes when every slot is
//! settled and yields the decoded tracks in selection order.
//!
//! ```text
//! begin([a, b, c])       slots: [Pending a, Pending b, Pending c]
//! resolve(c, Ready)      slots: [Pending a, Pending b, Ready c    ]
//! resolve(b, Failed)     slots: [Pending a, Failed b,  Ready c    ]   (b's handle dropped)
//! resolve(a, Ready)      slots: [Ready a,   Failed b,  Ready c    ]   -> complete
//! finish()               tracks: [a, c], errors: [b]
//! ```

use crate::error::{DecodeError, PlaybackError, Result};
use crate::types::{Track, TrackId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

/// Identifier of one file selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(u64);

impl BatchId {
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Terminal decode event reported by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DecodeOutcome {
    /// Enough data buffered to play through; duration if the host knows it
    Ready { duration: Option<Duration> },

    /// The resource could not be prepared
    Failed { message: String },
}

impl DecodeOutcome {
    /// Ready with a known duration in seconds
    ///
    /// Non-finite or negative durations (live streams, missing metadata)
    /// are recorded as unknown.
    pub fn ready_secs(secs: f64) -> Self {
        DecodeOutcome::Ready {
            duration: Duration::try_from_secs_f64(secs).ok(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        DecodeOutcome::Failed {
            message: message.into(),
        }
    }
}

/// Whether a batch is still waiting on the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchProgress {
    Pending { remaining: usize },
    Complete,
}

/// Settled contents of a batch
#[derive(Debug)]
pub struct BatchOutcome<M> {
    /// Successfully decoded tracks, in selection order
    pub tracks: Vec<Track<M>>,

    /// One entry per file that failed, in selection order
    pub errors: Vec<DecodeError>,
}

#[derive(Debug)]
enum Slot<M> {
    Pending(Track<M>),
    Ready(Track<M>),
    Failed(DecodeError),
}

impl<M> Slot<M> {
    fn id(&self) -> TrackId {
        match self {
            Slot::Pending(track) | Slot::Ready(track) => track.id,
            Slot::Failed(error) => error.id,
        }
    }

    /// Apply a decode outcome; a settled slot comes back unchanged
    ///
    /// The flag reports whether the slot moved out of `Pending`.
    fn settle(self, outcome: DecodeOutcome) -> (Self, bool) {
        let mut track = match self {
            Slot::Pending(track) => track,
            settled => return (settled, false),
        };

        let slot = match outcome {
            DecodeOutcome::Ready { duration } => {
                track.duration = duration;
                debug!(track_id = %track.id, name = %track.name, "Track decoded");
                Slot::Ready(track)
            }
            DecodeOutcome::Failed { message } => {
                warn!(track_id = %track.id, name = %track.name, %message, "Failed to decode track");
                Slot::Failed(DecodeError {
                    id: track.id,
                    name: track.name,
                    message,
                })
            }
        };
        (slot, true)
    }
}

/// One in-flight file selection
#[derive(Debug)]
pub struct LoadBatch<M> {
    id: BatchId,
    slots: Vec<Slot<M>>,
    remaining: usize,
}

impl<M> LoadBatch<M> {
    pub fn id(&self) -> BatchId {
        self.id
    }

    /// Number of files in the selection
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Files still waiting for a decode outcome
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }

    /// Whether `id` was reserved by this batch
    pub fn contains(&self, id: TrackId) -> bool {
        self.slots.iter().any(|slot| slot.id() == id)
    }

    /// Track ids in selection order
    pub fn ids(&self) -> Vec<TrackId> {
        self.slots.iter().map(Slot::id).collect()
    }

    /// Tracks still decoding (so the host can start loading them)
    pub fn pending_mut(&mut self) -> impl Iterator<Item = &mut Track<M>> + '_ {
        self.slots.iter_mut().filter_map(|slot| match slot {
            Slot::Pending(track) => Some(track),
            _ => None,
        })
    }

    /// Record the decode outcome for `id`
    ///
    /// A failed file's track is dropped here, releasing its handle. Outcomes
    /// for a slot that is already settled are ignored.
    pub fn resolve(&mut self, id: TrackId, outcome: DecodeOutcome) -> Result<BatchProgress> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.id() == id)
            .ok_or(PlaybackError::UnknownBatchItem(id))?;

        let slot = self.slots.remove(index);
        let (slot, settled) = slot.settle(outcome);
        self.slots.insert(index, slot);

        if settled {
            self.remaining -= 1;
        } else {
            debug!(track_id = %id, batch = %self.id, "Ignoring repeated decode event");
        }

        Ok(self.progress())
    }

    /// Consume a complete batch; hands the batch back if it is not complete
    pub fn finish(self) -> std::result::Result<BatchOutcome<M>, Self> {
        if !self.is_complete() {
            return Err(self);
        }

        let mut tracks = Vec::new();
        let mut errors = Vec::new();
        for slot in self.slots {
            match slot {
                Slot::Ready(track) => tracks.push(track),
                Slot::Failed(error) => errors.push(error),
                Slot::Pending(_) => {}
            }
        }

        debug!(
            batch = %self.id,
            loaded = tracks.len(),
            failed = errors.len(),
            "Batch settled"
        );
        Ok(BatchOutcome { tracks, errors })
    }

    fn progress(&self) -> BatchProgress {
        if self.remaining == 0 {
            BatchProgress::Complete
        } else {
            BatchProgress::Pending {
                remaining: self.remaining,
            }
        }
    }
}

/// Allocates track ids and opens batches
#[derive(Debug, Default)]
pub struct BatchLoader {
    next_track: u64,
    next_batch: u64,
}

impl BatchLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a batch for files selected together
    ///
    /// Every file gets a fresh track id up front. An empty selection yields
    /// a batch that is already complete.
    pub fn begin<M, S>(&mut self, files: impl IntoIterator<Item = (S, M)>) -> LoadBatch<M>
    where
        S: Into<String>,
    {
        let id = BatchId(self.next_batch);
        self.next_batch += 1;

        let slots: Vec<Slot<M>> = files
            .into_iter()
            .map(|(name, media)| {
                let track_id = TrackId::new(self.next_track);
                self.next_track += 1;
                Slot::Pending(Track::new(track_id, name, media))
            })
            .collect();

        debug!(batch = %id, files = slots.len(), "Batch opened");
        LoadBatch {
            id,
            remaining: slots.len(),
            slots,
        }
    }
}

/// In-flight selections plus the ones that settled since the last drain
///
/// Shared by every front end that feeds host decode events back by track id.
#[derive(Debug)]
pub struct PendingBatches<M> {
    loader: BatchLoader,

    // Oldest first
    open: Vec<LoadBatch<M>>,

    settled: Vec<BatchOutcome<M>>,
}

impl<M> PendingBatches<M> {
    pub fn new() -> Self {
        Self {
            loader: BatchLoader::new(),
            open: Vec::new(),
            settled: Vec::new(),
        }
    }

    /// Open a batch for files selected together
    ///
    /// An empty selection settles immediately.
    pub fn begin<S>(&mut self, files: impl IntoIterator<Item = (S, M)>) -> BatchId
    where
        S: Into<String>,
    {
        let batch = self.loader.begin(files);
        let id = batch.id();
        self.park(batch);
        id
    }

    /// Tracks of `batch` still waiting on the host
    pub fn pending_mut(&mut self, batch: BatchId) -> impl Iterator<Item = &mut Track<M>> + '_ {
        self.open
            .iter_mut()
            .filter(move |b| b.id() == batch)
            .flat_map(LoadBatch::pending_mut)
    }

    /// Track ids reserved by an open batch, in selection order
    pub fn ids(&self, batch: BatchId) -> Vec<TrackId> {
        self.open
            .iter()
            .find(|b| b.id() == batch)
            .map(LoadBatch::ids)
            .unwrap_or_default()
    }

    /// Route a decode outcome to the batch that reserved `id`
    ///
    /// A batch that completes moves to the settled list; collect it with
    /// [`take_settled`](Self::take_settled).
    pub fn resolve(&mut self, id: TrackId, outcome: DecodeOutcome) -> Result<BatchProgress> {
        let index = self
            .open
            .iter()
            .position(|b| b.contains(id))
            .ok_or(PlaybackError::UnknownBatchItem(id))?;

        let progress = self.open[index].resolve(id, outcome)?;
        if progress == BatchProgress::Complete {
            let batch = self.open.remove(index);
            self.park(batch);
        }

        Ok(progress)
    }

    /// Settled batches in completion order
    pub fn take_settled(&mut self) -> Vec<BatchOutcome<M>> {
        std::mem::take(&mut self.settled)
    }

    /// Number of selections still waiting on decode results
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    fn park(&mut self, batch: LoadBatch<M>) {
        match batch.finish() {
            Ok(outcome) => self.settled.push(outcome),
            Err(batch) => self.open.push(batch),
        }
    }
}

impl<M> Default for PendingBatches<M> {
    fn default() -> Self {
        Self::new()
    }
}
