//! Preview port - thread-affine render targets.
//!
//! Resources are created, used and released on the render thread only. The
//! entry enforces this through [`RenderThread`](crate::render::RenderThread);
//! implementations may assume it.

/// A render target holding a snapshot of worker progress.
pub trait PreviewResource: Send {
    fn size(&self) -> (u32, u32);

    /// Redraw the target for the given progress percentage.
    fn render_progress(&mut self, percentage: i32);

    /// Free the underlying allocation.
    fn release(self: Box<Self>);
}

/// Allocates preview resources.
pub trait PreviewBackend: Send + Sync {
    fn create(&self) -> Box<dyn PreviewResource>;
}
