//! Next-shape queue
//!
//! [`ShapeQueue`] sits between the engine and whatever produces shapes. It
//! keeps the preview window filled from a [`ShapeSource`] so the preview
//! always shows exactly the shapes that will be taken next.
//!
//! A source that stops producing (`take` returns `None`) is treated as
//! closed for good; from then on the queue draws uniformly random shapes.

use std::collections::VecDeque;
use std::fmt;

use arrayvec::ArrayVec;

use crate::bag::BagRandomizer;
use crate::log_event;
use crate::types::{Shape, MAX_PREVIEW_LEN};

/// Producer of shapes for the engine.
pub trait ShapeSource: Send {
    /// Next shape, blocking while the producer catches up.
    ///
    /// Returns `None` once the source is closed or interrupted.
    fn take(&mut self) -> Option<Shape>;
}

impl<S: ShapeSource + ?Sized> ShapeSource for Box<S> {
    fn take(&mut self) -> Option<Shape> {
        (**self).take()
    }
}

pub struct ShapeQueue {
    source: Box<dyn ShapeSource>,
    preview: VecDeque<Shape>,
    preview_len: usize,
    fallback: BagRandomizer,
    closed: bool,
}

impl ShapeQueue {
    /// Wrap `source`, showing `preview_len` upcoming shapes (capped at
    /// [`MAX_PREVIEW_LEN`]). The preview is filled immediately.
    pub fn new(source: impl ShapeSource + 'static, preview_len: usize) -> Self {
        let preview_len = preview_len.min(MAX_PREVIEW_LEN);
        let mut queue = Self {
            source: Box::new(source),
            preview: VecDeque::with_capacity(preview_len + 1),
            preview_len,
            fallback: BagRandomizer::from_entropy(),
            closed: false,
        };
        queue.top_up();
        queue
    }

    /// Queue fed by a local bag with a fixed seed.
    pub fn seeded(seed: u64, preview_len: usize) -> Self {
        Self::new(BagRandomizer::new(seed), preview_len)
    }

    /// Remove and return the next shape.
    pub fn take(&mut self) -> Shape {
        let shape = match self.preview.pop_front() {
            Some(shape) => shape,
            None => self.pull(),
        };
        self.top_up();
        shape
    }

    /// Upcoming shapes, soonest first.
    pub fn next_shapes(&self) -> ArrayVec<Shape, MAX_PREVIEW_LEN> {
        self.preview.iter().copied().take(MAX_PREVIEW_LEN).collect()
    }

    pub fn preview_len(&self) -> usize {
        self.preview_len
    }

    /// Whether the source has closed and random shapes are being substituted.
    pub fn is_starved(&self) -> bool {
        self.closed
    }

    fn top_up(&mut self) {
        while self.preview.len() < self.preview_len {
            let shape = self.pull();
            self.preview.push_back(shape);
        }
    }

    fn pull(&mut self) -> Shape {
        if !self.closed {
            if let Some(shape) = self.source.take() {
                return shape;
            }
            self.closed = true;
            log_event!("ShapeQueue", "shape source closed; drawing random shapes");
        }
        self.fallback.random_shape()
    }
}

impl fmt::Debug for ShapeQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShapeQueue")
            .field("preview", &self.preview)
            .field("preview_len", &self.preview_len)
            .field("closed", &self.closed)
            .finish_non_exhaustive()
    }
}
