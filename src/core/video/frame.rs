use crate::core::error::{ReorderError, Result};
use image::RgbaImage;

/// 帧数据结构（原始分辨率，RGBA）
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>, // RGBA 格式
    pub frame_number: u64,
}

impl Frame {
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>, frame_number: u64) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(ReorderError::InvalidFrame(format!(
                "{}x{} RGBA frame needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
            frame_number,
        })
    }

    /// 单色帧，主要用于测试
    pub fn filled(width: u32, height: u32, rgb: [u8; 3], frame_number: u64) -> Self {
        let data = std::iter::repeat([rgb[0], rgb[1], rgb[2], 255])
            .take(width as usize * height as usize)
            .flatten()
            .collect();
        Self {
            width,
            height,
            data,
            frame_number,
        }
    }

    pub fn from_image(img: RgbaImage, frame_number: u64) -> Self {
        Self {
            width: img.width(),
            height: img.height(),
            data: img.into_raw(),
            frame_number,
        }
    }

    pub fn to_image(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            ReorderError::InvalidFrame(format!(
                "buffer of {} bytes does not fit {}x{}",
                self.data.len(),
                self.width,
                self.height
            ))
        })
    }

    pub fn pixel_count(&self) -> usize {
        (self.width * self.height) as usize
    }

    pub fn to_rgb(&self) -> Vec<u8> {
        let mut rgb = Vec::with_capacity(self.pixel_count() * 3);
        for chunk in self.data.chunks_exact(4) {
            rgb.push(chunk[0]); // R
            rgb.push(chunk[1]); // G
            rgb.push(chunk[2]); // B
        }
        rgb
    }

    pub fn resize_to(&self, target_width: u32, target_height: u32) -> Result<Frame> {
        let img = self.to_image()?;
        let resized = image::imageops::resize(
            &img,
            target_width,
            target_height,
            image::imageops::FilterType::Triangle,
        );

        Ok(Frame {
            width: target_width,
            height: target_height,
            data: resized.into_raw(),
            frame_number: self.frame_number,
        })
    }
}

/// 图片序列和内存视频没有帧率信息时使用
pub const DEFAULT_FPS: f64 = 25.0;

/// 视频元数据
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub frame_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_creation() {
        let data = vec![255u8; 100 * 100 * 4];
        let frame = Frame::from_rgba(100, 100, data, 30).unwrap();

        assert_eq!(frame.width, 100);
        assert_eq!(frame.height, 100);
        assert_eq!(frame.pixel_count(), 10000);
        assert_eq!(frame.frame_number, 30);
    }

    #[test]
    fn test_frame_rejects_short_buffer() {
        let err = Frame::from_rgba(10, 10, vec![0u8; 399], 0).unwrap_err();
        assert!(matches!(err, ReorderError::InvalidFrame(_)));
    }

    #[test]
    fn test_frame_resize() {
        let frame = Frame::filled(100, 80, [10, 20, 30], 0);
        let resized = frame.resize_to(64, 64).unwrap();

        assert_eq!(resized.width, 64);
        assert_eq!(resized.height, 64);
        assert_eq!(resized.data.len(), 64 * 64 * 4);
        assert_eq!(&resized.to_rgb()[..3], &[10, 20, 30]);
    }

    #[test]
    fn test_to_rgb_drops_alpha() {
        let frame = Frame::filled(2, 2, [1, 2, 3], 0);
        assert_eq!(frame.to_rgb(), vec![1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3]);
    }
}
