//! Input recording and replay
//!
//! Raw inputs are stored per tick, relative to the tick the recording
//! started at, and saved as JSON. A replay feeds them back into an
//! [`InputHandler`](crate::InputHandler) starting from any tick.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tilekit_math::Vec2;

use crate::{InputError, Key, MouseButton};

/// A raw device input, before any press/hold/click interpretation
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum RawInput {
    KeyPress(Key),
    KeyRelease(Key),
    MouseButtonPress(MouseButton),
    MouseButtonRelease(MouseButton),
    MouseMove(Vec2),
}

/// Raw inputs grouped by relative tick
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputRecord {
    ticks: BTreeMap<u64, Vec<RawInput>>,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tick: u64, input: RawInput) {
        self.ticks.entry(tick).or_default().push(input);
    }

    /// Inputs recorded `tick` ticks after the start
    pub fn at(&self, tick: u64) -> &[RawInput] {
        self.ticks.get(&tick).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Last tick holding an input
    pub fn last_tick(&self) -> Option<u64> {
        self.ticks.keys().next_back().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ticks.values().map(Vec::len).sum()
    }

    pub fn to_json(&self) -> Result<String, InputError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, InputError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), InputError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, InputError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

/// Collects inputs from the tick it was started at
#[derive(Clone, Debug)]
pub struct InputRecorder {
    start_tick: u64,
    record: InputRecord,
}

impl InputRecorder {
    pub fn new(start_tick: u64) -> Self {
        Self {
            start_tick,
            record: InputRecord::new(),
        }
    }

    pub fn start_tick(&self) -> u64 {
        self.start_tick
    }

    /// Store an input seen at absolute `tick`; inputs before the start are dropped
    pub fn record(&mut self, tick: u64, input: RawInput) {
        if let Some(relative) = tick.checked_sub(self.start_tick) {
            self.record.push(relative, input);
        }
    }

    pub fn record_ref(&self) -> &InputRecord {
        &self.record
    }

    pub fn into_record(self) -> InputRecord {
        self.record
    }
}

/// Plays a recording back from the tick it was started at
#[derive(Clone, Debug)]
pub struct InputReplay {
    start_tick: u64,
    record: InputRecord,
}

impl InputReplay {
    pub fn new(record: InputRecord, start_tick: u64) -> Self {
        Self { start_tick, record }
    }

    /// Inputs due at absolute `tick`
    pub fn inputs_at(&self, tick: u64) -> &[RawInput] {
        match tick.checked_sub(self.start_tick) {
            Some(relative) => self.record.at(relative),
            None => &[],
        }
    }

    /// Whether every recorded input has been played at `tick`
    pub fn is_finished(&self, tick: u64) -> bool {
        match self.record.last_tick() {
            Some(last) => tick > self.start_tick + last,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recorder_uses_relative_ticks() {
        let mut recorder = InputRecorder::new(100);
        recorder.record(99, RawInput::KeyPress(Key::A));
        recorder.record(100, RawInput::KeyPress(Key::B));
        recorder.record(105, RawInput::KeyRelease(Key::B));

        let record = recorder.into_record();
        assert_eq!(record.len(), 2);
        assert_eq!(record.at(0), &[RawInput::KeyPress(Key::B)]);
        assert_eq!(record.at(5), &[RawInput::KeyRelease(Key::B)]);
        assert_eq!(record.last_tick(), Some(5));
    }

    #[test]
    fn test_replay_shifts_to_start_tick() {
        let mut record = InputRecord::new();
        record.push(2, RawInput::MouseButtonPress(MouseButton::Left));
        let replay = InputReplay::new(record, 10);

        assert!(replay.inputs_at(2).is_empty());
        assert_eq!(replay.inputs_at(12), &[RawInput::MouseButtonPress(MouseButton::Left)]);
        assert!(!replay.is_finished(12));
        assert!(replay.is_finished(13));
    }

    #[test]
    fn test_json_format() {
        let mut record = InputRecord::new();
        record.push(0, RawInput::KeyPress(Key::Space));
        record.push(3, RawInput::MouseMove(Vec2::new(0.5, -0.25)));

        let json = record.to_json().unwrap();
        assert!(json.contains("\"0\""));
        assert!(json.contains("KeyPress"));
        assert_eq!(InputRecord::from_json(&json).unwrap(), record);
    }

    #[test]
    fn test_malformed_json() {
        let result = InputRecord::from_json("{\"0\": [\"Teleport\"]}");
        assert!(matches!(result, Err(InputError::Json(_))));
    }
}
