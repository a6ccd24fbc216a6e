//! 按重建顺序从原视频重新读取帧并写出（原始分辨率）

use super::source::{FrameSink, VideoSource};
use crate::core::error::{ReorderError, Result};
use crate::reorder::correspondence;
use crate::reorder::pipeline::Reconstruction;
use log::info;

/// 每个顺序条目写出一帧，返回写出的帧数
pub fn emit(
    source: &mut dyn VideoSource,
    sink: &mut dyn FrameSink,
    ordering: &[usize],
    index_map: &[usize],
) -> Result<usize> {
    let originals = correspondence::compose(ordering, index_map)?;
    write_frames(source, sink, &originals)
}

/// 先写正序，再写倒序
pub fn emit_both(
    source: &mut dyn VideoSource,
    forward_sink: &mut dyn FrameSink,
    reverse_sink: &mut dyn FrameSink,
    reconstruction: &Reconstruction,
) -> Result<(usize, usize)> {
    let forward = write_frames(source, forward_sink, reconstruction.forward())?;
    let reverse = write_frames(source, reverse_sink, reconstruction.reverse())?;
    Ok((forward, reverse))
}

fn write_frames(
    source: &mut dyn VideoSource,
    sink: &mut dyn FrameSink,
    originals: &[usize],
) -> Result<usize> {
    let info = source.info();
    info!(
        "🎞️ Writing {} frames ({}x{} @ {:.2} fps)",
        originals.len(),
        info.width,
        info.height,
        info.fps
    );

    sink.begin(&info)?;
    for &index in originals {
        if index >= info.frame_count {
            return Err(ReorderError::FrameOutOfRange {
                index,
                len: info.frame_count,
            });
        }
        let frame = source.read_frame(index)?;
        sink.write_frame(&frame)?;
    }

    sink.finish()?;
    Ok(originals.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::video::frame::Frame;
    use crate::core::video::source::{MemorySink, MemoryVideo};

    fn video(n: usize) -> MemoryVideo {
        MemoryVideo::new(
            (0..n)
                .map(|i| Frame::filled(4, 4, [i as u8, 0, 0], i as u64))
                .collect(),
        )
    }

    #[test]
    fn test_emit_follows_mapping() {
        let mut source = video(4);
        let mut sink = MemorySink::new();

        let written = emit(&mut source, &mut sink, &[2, 0, 1], &[0, 2, 3]).unwrap();

        assert_eq!(written, 3);
        assert_eq!(sink.frame_numbers(), vec![3, 0, 2]);
        assert!(sink.finished);
    }

    #[test]
    fn test_emit_keeps_original_resolution() {
        let mut source = MemoryVideo::new(vec![Frame::filled(320, 180, [1, 2, 3], 0)]);
        let mut sink = MemorySink::new();
        emit(&mut source, &mut sink, &[0], &[0]).unwrap();
        assert_eq!((sink.frames[0].width, sink.frames[0].height), (320, 180));
    }

    #[test]
    fn test_sink_receives_source_metadata() {
        let mut source =
            MemoryVideo::new(vec![Frame::filled(320, 180, [1, 2, 3], 0)]).with_fps(29.97);
        let mut forward = MemorySink::new();
        let mut reverse = MemorySink::new();

        emit(&mut source, &mut forward, &[0], &[0]).unwrap();
        emit(&mut source, &mut reverse, &[], &[]).unwrap();

        for sink in [&forward, &reverse] {
            let info = sink.info.unwrap();
            assert_eq!((info.width, info.height), (320, 180));
            assert_eq!(info.fps, 29.97);
            assert_eq!(info.frame_count, 1);
        }
    }

    #[test]
    fn test_emit_empty_still_finishes() {
        let mut source = video(2);
        let mut sink = MemorySink::new();
        assert_eq!(emit(&mut source, &mut sink, &[], &[]).unwrap(), 0);
        assert!(sink.frames.is_empty());
        assert!(sink.finished);
    }

    #[test]
    fn test_emit_rejects_index_past_source() {
        let mut source = video(2);
        let mut sink = MemorySink::new();
        let err = emit(&mut source, &mut sink, &[0], &[5]).unwrap_err();
        assert!(matches!(err, ReorderError::FrameOutOfRange { index: 5, len: 2 }));
    }
}
