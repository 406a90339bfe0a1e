//! Failures of a scan run.
//!
//! The `Display` text of each variant is exactly what ends up in the
//! `{"error": ...}` line printed by the binary.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    /// No image path was given on the command line.
    #[error("No image path provided")]
    MissingArgument,

    /// The given path does not exist.
    #[error("File not found")]
    FileNotFound(PathBuf),

    /// Decoding or preprocessing the image failed; carries the underlying message.
    #[error("Image processing failed: {0}")]
    ImageProcessing(String),

    /// A recognizer returned an unusable timetable.
    #[error("Recognition failed: {0}")]
    Recognition(String),
}

impl From<image::ImageError> for ScanError {
    fn from(err: image::ImageError) -> Self {
        ScanError::ImageProcessing(err.to_string())
    }
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::ImageProcessing(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_are_the_wire_text() {
        assert_eq!(ScanError::MissingArgument.to_string(), "No image path provided");
        assert_eq!(
            ScanError::FileNotFound(PathBuf::from("nope.png")).to_string(),
            "File not found"
        );
        assert_eq!(
            ScanError::ImageProcessing("bad header".into()).to_string(),
            "Image processing failed: bad header"
        );
    }
}
