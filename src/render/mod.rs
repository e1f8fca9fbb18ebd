pub mod bars;
pub mod camera;
pub mod geo;
pub mod globe;
pub mod particles;

use log::debug;
use thiserror::Error;
use crate::render::camera::ndc_from_client;

/// A scene that mutates its own state once per animation frame
pub trait Visualization {
    /// Advances the scene one frame
    ///
    /// # Arguments
    ///
    /// * 'time_secs' - seconds since the session started
    fn frame(&mut self, time_secs: f64);

    /// Adapts the camera to a new viewport size
    fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError>;

    /// Index of the object under a point in normalized device coordinates, if any
    fn pick(&self, ndc: [f64; 2]) -> Option<usize>;
}

/// Owns one visualization from mount until dispose
pub struct RenderSession<V: Visualization> {
    visualization: Option<V>,
    width: u32,
    height: u32,
    frames: u64,
}

impl<V: Visualization> RenderSession<V> {
    /// Starts a session for the given visualization and viewport
    ///
    /// # Arguments
    ///
    /// * 'visualization' - the scene, owned by the session from now on
    /// * 'width' - viewport width in pixels
    /// * 'height' - viewport height in pixels
    pub fn start(mut visualization: V, width: u32, height: u32) -> Result<RenderSession<V>, RenderError> {
        visualization.resize(width, height)?;

        Ok(RenderSession { visualization: Some(visualization), width, height, frames: 0 })
    }

    /// Advances the visualization one frame and returns the number of frames so far
    ///
    /// # Arguments
    ///
    /// * 'time_secs' - seconds since the session started
    pub fn tick(&mut self, time_secs: f64) -> Result<u64, RenderError> {
        let visualization = self.visualization.as_mut().ok_or(RenderError::Disposed)?;
        visualization.frame(time_secs);
        self.frames += 1;

        Ok(self.frames)
    }

    /// Resizes the viewport, the old size is kept if the new one is rejected
    ///
    /// # Arguments
    ///
    /// * 'width' - viewport width in pixels
    /// * 'height' - viewport height in pixels
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        let visualization = self.visualization.as_mut().ok_or(RenderError::Disposed)?;
        visualization.resize(width, height)?;
        self.width = width;
        self.height = height;

        Ok(())
    }

    /// Picks the object under a click
    ///
    /// # Arguments
    ///
    /// * 'x' - pixels from the left edge of the viewport
    /// * 'y' - pixels from the top edge of the viewport
    pub fn click(&self, x: f64, y: f64) -> Result<Option<usize>, RenderError> {
        let visualization = self.visualization.as_ref().ok_or(RenderError::Disposed)?;

        Ok(visualization.pick(ndc_from_client(x, y, self.width, self.height)))
    }

    pub fn visualization(&self) -> Result<&V, RenderError> {
        self.visualization.as_ref().ok_or(RenderError::Disposed)
    }

    pub fn visualization_mut(&mut self) -> Result<&mut V, RenderError> {
        self.visualization.as_mut().ok_or(RenderError::Disposed)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn is_active(&self) -> bool {
        self.visualization.is_some()
    }

    /// Releases the visualization, every later call on the session fails
    pub fn dispose(&mut self) -> Result<(), RenderError> {
        self.visualization.take().ok_or(RenderError::Disposed)?;
        debug!("render session disposed after {} frames", self.frames);

        Ok(())
    }
}

impl<V: Visualization> Drop for RenderSession<V> {
    fn drop(&mut self) {
        if self.visualization.take().is_some() {
            debug!("render session dropped after {} frames", self.frames);
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("Disposed: render session is no longer active")]
    Disposed,
    #[error("InvalidViewport: {0}x{1}")]
    InvalidViewport(u32, u32),
}
