//! Text processing: sentence segmentation and narration-duration handling.

pub mod duration;
pub mod segmenter;
