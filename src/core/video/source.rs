//! 视频输入/输出抽象。真实编解码由外部完成，这里以图片序列目录代替容器格式。

use super::frame::{Frame, VideoInfo, DEFAULT_FPS};
use crate::core::error::{ReorderError, Result};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

const SEQUENCE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// 可按原始下标随机读取的视频源
pub trait VideoSource {
    fn info(&self) -> VideoInfo;

    fn read_frame(&mut self, index: usize) -> Result<Frame>;
}

/// 顺序写出的帧接收端
pub trait FrameSink {
    /// 写出第一帧之前调用，携带源视频的分辨率和帧率
    fn begin(&mut self, _info: &VideoInfo) -> Result<()> {
        Ok(())
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()>;

    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// 内存视频
pub struct MemoryVideo {
    frames: Vec<Frame>,
    fps: f64,
}

impl MemoryVideo {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            fps: DEFAULT_FPS,
        }
    }

    pub fn with_fps(mut self, fps: f64) -> Self {
        self.fps = fps;
        self
    }
}

impl VideoSource for MemoryVideo {
    fn info(&self) -> VideoInfo {
        let (width, height) = self
            .frames
            .first()
            .map(|f| (f.width, f.height))
            .unwrap_or((0, 0));
        VideoInfo {
            width,
            height,
            fps: self.fps,
            frame_count: self.frames.len(),
        }
    }

    fn read_frame(&mut self, index: usize) -> Result<Frame> {
        self.frames
            .get(index)
            .cloned()
            .ok_or(ReorderError::FrameOutOfRange {
                index,
                len: self.frames.len(),
            })
    }
}

#[derive(Debug, Default)]
pub struct MemorySink {
    /// begin 收到的源视频元数据
    pub info: Option<VideoInfo>,
    pub frames: Vec<Frame>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_numbers(&self) -> Vec<u64> {
        self.frames.iter().map(|f| f.frame_number).collect()
    }
}

impl FrameSink for MemorySink {
    fn begin(&mut self, info: &VideoInfo) -> Result<()> {
        self.info = Some(*info);
        Ok(())
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.finished = true;
        Ok(())
    }
}

/// 图片序列目录。
///
/// 文件名前缀相同时按末尾的数字排序，`frame_2.png` 排在 `frame_10.png` 之前。图片序列不带帧率，统一按 [`DEFAULT_FPS`]。
pub struct ImageSequenceSource {
    paths: Vec<PathBuf>,
    info: VideoInfo,
}

impl ImageSequenceSource {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && Self::is_supported(p))
            .collect();
        paths.sort_by_cached_key(|p| sequence_key(p));

        let (width, height) = match paths.first() {
            Some(first) => image::image_dimensions(first)?,
            None => (0, 0),
        };

        info!(
            "📂 Opened image sequence {}: {} frames ({}x{})",
            dir.display(),
            paths.len(),
            width,
            height
        );

        Ok(Self {
            info: VideoInfo {
                width,
                height,
                fps: DEFAULT_FPS,
                frame_count: paths.len(),
            },
            paths,
        })
    }

    fn is_supported(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| SEQUENCE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
            .unwrap_or(false)
    }
}

impl VideoSource for ImageSequenceSource {
    fn info(&self) -> VideoInfo {
        self.info
    }

    fn read_frame(&mut self, index: usize) -> Result<Frame> {
        let path = self.paths.get(index).ok_or(ReorderError::FrameOutOfRange {
            index,
            len: self.paths.len(),
        })?;
        let img = image::open(path)?.to_rgba8();
        Ok(Frame::from_image(img, index as u64))
    }
}

/// 排序键：(去掉末尾数字的文件名前缀, 末尾数字, 完整文件名)
fn sequence_key(path: &Path) -> (String, Option<u128>, String) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let prefix = stem.trim_end_matches(|c: char| c.is_ascii_digit());
    let number = stem[prefix.len()..].parse().ok();
    (prefix.to_string(), number, name)
}

/// 将帧写为 frame_00000.png, frame_00001.png, ...
pub struct ImageSequenceWriter {
    dir: PathBuf,
    written: usize,
}

impl ImageSequenceWriter {
    pub fn create(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir, written: 0 })
    }

    pub fn written(&self) -> usize {
        self.written
    }
}

impl FrameSink for ImageSequenceWriter {
    fn begin(&mut self, info: &VideoInfo) -> Result<()> {
        info!(
            "💾 Writing image sequence to {} ({}x{} @ {:.2} fps)",
            self.dir.display(),
            info.width,
            info.height,
            info.fps
        );
        Ok(())
    }

    fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let path = self.dir.join(format!("frame_{:05}.png", self.written));
        frame.to_image()?.save(&path)?;
        debug!("wrote frame #{} -> {}", frame.frame_number, path.display());
        self.written += 1;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        info!("💾 {} frames written to {}", self.written, self.dir.display());
        Ok(())
    }
}
