use std::ops::{Deref, DerefMut};
use std::time::Duration;

use crossbeam::channel::{self, Receiver, RecvTimeoutError, Sender};
use sr_utils::{SkinError, SkinResult};
use tracing::{debug, warn};

/// Fixed set of render surfaces. A surface is held by one render at a time.
#[derive(Debug)]
pub struct RendererPool<B> {
    to_pool: Sender<B>,
    from_pool: Receiver<B>,
    size: usize,
}

impl<B> Clone for RendererPool<B> {
    fn clone(&self) -> Self {
        Self {
            to_pool: self.to_pool.clone(),
            from_pool: self.from_pool.clone(),
            size: self.size,
        }
    }
}

impl<B: Send> RendererPool<B> {
    pub fn new(size: usize, mut make: impl FnMut() -> B) -> Self {
        let size = size.max(1);
        let (to_pool, from_pool) = channel::bounded(size);
        for _ in 0..size {
            // Capacity equals size, so this never blocks.
            let _ = to_pool.send(make());
        }
        Self {
            to_pool,
            from_pool,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Surfaces currently idle.
    pub fn available(&self) -> usize {
        self.from_pool.len()
    }

    /// Waits up to `timeout` for a free surface.
    pub fn checkout(&self, timeout: Duration) -> SkinResult<PooledRenderer<B>> {
        match self.from_pool.recv_timeout(timeout) {
            Ok(backend) => {
                debug!(idle = self.from_pool.len(), "renderer checked out");
                Ok(PooledRenderer {
                    backend: Some(backend),
                    home: self.to_pool.clone(),
                })
            }
            Err(RecvTimeoutError::Timeout) => {
                warn!(?timeout, "no renderer free");
                Err(SkinError::timeout("waiting for a free renderer"))
            }
            Err(RecvTimeoutError::Disconnected) => {
                Err(SkinError::render_failed("renderer pool closed"))
            }
        }
    }
}

/// Exclusive use of one surface; goes back to the pool on drop.
#[derive(Debug)]
pub struct PooledRenderer<B> {
    backend: Option<B>,
    home: Sender<B>,
}

impl<B> Deref for PooledRenderer<B> {
    type Target = B;

    fn deref(&self) -> &B {
        match &self.backend {
            Some(backend) => backend,
            None => unreachable!("backend is only taken in drop"),
        }
    }
}

impl<B> DerefMut for PooledRenderer<B> {
    fn deref_mut(&mut self) -> &mut B {
        match &mut self.backend {
            Some(backend) => backend,
            None => unreachable!("backend is only taken in drop"),
        }
    }
}

impl<B> Drop for PooledRenderer<B> {
    fn drop(&mut self) {
        if let Some(backend) = self.backend.take() {
            let _ = self.home.send(backend);
        }
    }
}
