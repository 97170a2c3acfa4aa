use anyhow::{anyhow, Result};

/// An RGB crop handed to the engine by the surrounding frame pipeline.
///
/// Pixels are packed row-major, three bytes per pixel. The engine receives two
/// of these per call: a small normalized crop for the noise gate and a larger
/// raw crop for digit detection.
#[derive(Clone, Debug)]
pub struct Frame {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
}

impl Frame {
    /// Wrap packed RGB bytes, validating the length against the dimensions.
    pub fn from_rgb(pixels: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))? as usize;
        if pixels.len() != expected {
            return Err(anyhow!(
                "RGB frame length mismatch: expected {}, got {}",
                expected,
                pixels.len()
            ));
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Uniform frame, handy for synthetic sources and tests.
    pub fn filled(value: u8, width: u32, height: u32) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(3))
            .ok_or_else(|| anyhow!("frame dimensions overflow"))? as usize;
        Self::from_rgb(vec![value; len], width, height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mean of all channel bytes, 0.0 when the frame is empty.
    pub fn mean_intensity(&self) -> f32 {
        if self.pixels.is_empty() {
            return 0.0;
        }
        let sum: u64 = self.pixels.iter().map(|&p| p as u64).sum();
        sum as f32 / self.pixels.len() as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgb_validates_length() {
        assert!(Frame::from_rgb(vec![0u8; 12], 2, 2).is_ok());
        assert!(Frame::from_rgb(vec![0u8; 11], 2, 2).is_err());
        assert!(Frame::from_rgb(vec![], u32::MAX, u32::MAX).is_err());
    }

    #[test]
    fn mean_intensity_averages_channels() -> Result<()> {
        let frame = Frame::from_rgb(vec![10, 20, 30, 40, 50, 60], 2, 1)?;
        assert!((frame.mean_intensity() - 35.0).abs() < f32::EPSILON);
        Ok(())
    }
}
