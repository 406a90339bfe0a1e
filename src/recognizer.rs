use serde::{Deserialize, Serialize};
use tract_onnx::prelude::Tensor;
use tracing::debug;

use crate::error::{Result, ScanError};

/// Subjects with the room (slot) each one is held in; index `i` of both lists
/// belongs to the same slot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognizedTimetable {
    pub subjects: Vec<String>,
    pub rooms: Vec<String>,
}

impl RecognizedTimetable {
    pub fn new(subjects: Vec<String>, rooms: Vec<String>) -> Result<Self> {
        if subjects.len() != rooms.len() {
            return Err(ScanError::Recognition(format!(
                "{} subjects but {} rooms",
                subjects.len(),
                rooms.len()
            )));
        }
        Ok(RecognizedTimetable { subjects, rooms })
    }

    pub fn slots(&self) -> impl Iterator<Item = (&str, &str)> {
        self.subjects
            .iter()
            .zip(self.rooms.iter())
            .map(|(subject, room)| (subject.as_str(), room.as_str()))
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

/// Reads a timetable out of a preprocessed image tensor.
pub trait Recognizer {
    fn recognize(&self, tensor: &Tensor) -> Result<RecognizedTimetable>;
}

const DETECTED_SUBJECTS: [&str; 5] = ["Math", "English", "Physics", "Chemistry", "CS"];
const DETECTED_ROOMS: [&str; 5] = ["A1", "B3", "C2", "Lab", "Library"];

/// Stand-in until a trained model is available: ignores the tensor and always
/// reports the same five slots.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticRecognizer;

impl Recognizer for StaticRecognizer {
    fn recognize(&self, tensor: &Tensor) -> Result<RecognizedTimetable> {
        debug!(shape = ?tensor.shape(), "static recognizer ignores its input");
        RecognizedTimetable::new(
            DETECTED_SUBJECTS.iter().map(|s| s.to_string()).collect(),
            DETECTED_ROOMS.iter().map(|s| s.to_string()).collect(),
        )
    }
}
