pub mod emitter;
pub mod features;
pub mod frame;
pub mod source;

pub use features::{FeatureExtractor, FrameFeatures};
pub use frame::{Frame, VideoInfo, DEFAULT_FPS};
pub use source::{
    FrameSink, ImageSequenceSource, ImageSequenceWriter, MemorySink, MemoryVideo, VideoSource,
};
