//! InMemoryPreviewBackend - CPU-side preview targets.
//!
//! Stands in for a GPU render target: an RGBA buffer sized by the backend.
//! The backend counts allocations so leaks are observable.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ports::{PreviewBackend, PreviewResource};

#[derive(Debug)]
pub struct InMemoryPreviewBackend {
    width: u32,
    height: u32,
    created: AtomicUsize,
    live: Arc<AtomicUsize>,
}

impl InMemoryPreviewBackend {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            created: AtomicUsize::new(0),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resources created so far.
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }

    /// Resources created and not yet released.
    pub fn live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl PreviewBackend for InMemoryPreviewBackend {
    fn create(&self) -> Box<dyn PreviewResource> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);
        Box::new(InMemoryPreview {
            width: self.width,
            height: self.height,
            pixels: vec![0; self.width as usize * self.height as usize * 4],
            live: Arc::clone(&self.live),
        })
    }
}

struct InMemoryPreview {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    live: Arc<AtomicUsize>,
}

impl PreviewResource for InMemoryPreview {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Draws a progress bar: the first `percentage`% of every row is lit.
    fn render_progress(&mut self, percentage: i32) {
        let width = self.width as usize;
        let lit = width * percentage.clamp(0, 100) as usize / 100;
        for (index, pixel) in self.pixels.chunks_exact_mut(4).enumerate() {
            let value = if index % width.max(1) < lit { 0xFF } else { 0x00 };
            pixel.copy_from_slice(&[value, value, value, 0xFF]);
        }
    }

    fn release(self: Box<Self>) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
