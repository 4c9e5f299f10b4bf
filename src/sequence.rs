use std::time::Duration;

use log::debug;

use crate::config::frame_interval;
use crate::reader::ChunkSequence;
use crate::spectrum::{Frame, FrameProducer};

/// Lazily turns a loaded chunk sequence into frames, one per chunk, in order.
///
/// Frames are computed on request and handed out by value. The cursor only
/// moves forward unless [`FrameSequence::restart_from`] is called.
pub struct FrameSequence {
    chunks: ChunkSequence,
    sample_rate: u32,
    chunk_size: usize,
    next: usize,
    producer: FrameProducer,
}

impl FrameSequence {
    pub fn new(chunks: ChunkSequence, sample_rate: u32, chunk_size: usize) -> Self {
        Self {
            chunks,
            sample_rate,
            chunk_size,
            next: 0,
            producer: FrameProducer::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Index of the frame the next call to `next()` yields.
    pub fn position(&self) -> usize {
        self.next
    }

    /// Playback time of one chunk.
    pub fn interval(&self) -> Duration {
        frame_interval(self.chunk_size, self.sample_rate)
    }

    /// Frame for chunk `index`, or `None` past the end or on an empty chunk.
    pub fn next_frame(&mut self, index: usize) -> Option<Frame> {
        let chunk = self.chunks.get(index)?;
        let frame = self.producer.compute(chunk, self.sample_rate);
        if frame.is_empty() {
            debug!("empty chunk at index {index}, stopping");
            return None;
        }
        Some(frame)
    }

    pub fn restart_from(&mut self, index: usize) {
        self.next = index;
    }
}

impl Iterator for FrameSequence {
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        match self.next_frame(self.next) {
            Some(frame) => {
                self.next += 1;
                Some(frame)
            }
            None => {
                debug!("frame sequence exhausted at {}", self.next);
                None
            }
        }
    }
}
