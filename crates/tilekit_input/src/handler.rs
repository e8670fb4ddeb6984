//! Input state machine
//!
//! Device callbacks only update the tracked state. Events are produced once
//! per tick by [`InputHandler::fire_events`], which is what turns a press
//! followed by a release into pressed/held/released/typed sequences.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tilekit_math::Vec2;

use crate::{InputAction, InputError, InputEvent, InputRecord, InputRecorder, InputReplay, Key, MouseButton, RawInput};

/// Thresholds separating a type from a hold and a click from a long press
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// A key released after at most this many ticks is typed
    pub duration_type: u32,
    /// A button released before this many ticks is clicked
    pub duration_click: u32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            duration_type: 20,
            duration_click: 20,
        }
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct PressState {
    duration: u32,
    released: bool,
}

/// Tracks keys, buttons and the pointer, and turns them into input events
#[derive(Debug, Default)]
pub struct InputHandler {
    config: InputConfig,
    keys: Vec<(Key, PressState)>,
    buttons: Vec<(MouseButton, PressState)>,
    mouse_position: Vec2,
    previous_position: Vec2,
    recorder: Option<InputRecorder>,
    replay: Option<InputReplay>,
    should_record: bool,
}

impl InputHandler {
    pub fn new(config: InputConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    /// Current pointer position, normalized to `[-1, 1]`
    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys.iter().any(|(k, state)| *k == key && !state.released)
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.buttons.iter().any(|(b, state)| *b == button && !state.released)
    }

    /// Start tracking a key; ignored while the key is already tracked
    pub fn key_press(&mut self, key: Key) {
        if !self.keys.iter().any(|(k, _)| *k == key) {
            self.keys.push((key, PressState::default()));
        }
    }

    /// Mark a tracked key as released; untracked keys are ignored
    pub fn key_release(&mut self, key: Key) {
        if let Some((_, state)) = self.keys.iter_mut().find(|(k, _)| *k == key) {
            state.released = true;
        }
    }

    pub fn mouse_button_press(&mut self, button: MouseButton) {
        if !self.buttons.iter().any(|(b, _)| *b == button) {
            self.buttons.push((button, PressState::default()));
        }
    }

    pub fn mouse_button_release(&mut self, button: MouseButton) {
        if let Some((_, state)) = self.buttons.iter_mut().find(|(b, _)| *b == button) {
            state.released = true;
        }
    }

    pub fn move_mouse(&mut self, position: Vec2) {
        self.mouse_position = position;
    }

    /// Apply a raw input as if it came from the device
    pub fn apply(&mut self, input: RawInput) {
        match input {
            RawInput::KeyPress(key) => self.key_press(key),
            RawInput::KeyRelease(key) => self.key_release(key),
            RawInput::MouseButtonPress(button) => self.mouse_button_press(button),
            RawInput::MouseButtonRelease(button) => self.mouse_button_release(button),
            RawInput::MouseMove(position) => self.move_mouse(position),
        }
    }

    /// Start recording at the next call to `fire_events`
    pub fn record(&mut self) {
        self.should_record = true;
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_some()
    }

    /// Inputs recorded so far
    pub fn current_record(&self) -> Option<&InputRecord> {
        self.recorder.as_ref().map(InputRecorder::record_ref)
    }

    /// Write the current recording as JSON
    pub fn export_record(&self, path: impl AsRef<Path>) -> Result<(), InputError> {
        let recorder = self.recorder.as_ref().ok_or(InputError::NotRecording)?;
        recorder.record_ref().save(path.as_ref())?;
        log::info!(
            "Exported {} recorded inputs to {}",
            recorder.record_ref().len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Play a recording back, its first tick mapped to `replay_tick`
    pub fn load_replay(&mut self, path: impl AsRef<Path>, replay_tick: u64) -> Result<(), InputError> {
        let record = InputRecord::load(path.as_ref())?;
        log::info!("Loaded replay of {} inputs from {}", record.len(), path.as_ref().display());
        self.set_replay(InputReplay::new(record, replay_tick));
        Ok(())
    }

    pub fn set_replay(&mut self, replay: InputReplay) {
        self.replay = Some(replay);
    }

    /// Emit this tick's input events into `sink`
    ///
    /// Should be called once per tick, after the world update.
    pub fn fire_events(&mut self, tick: u64, mut sink: impl FnMut(InputEvent)) {
        if let Some(replay) = self.replay.take() {
            for input in replay.inputs_at(tick) {
                self.apply(*input);
            }
            if !replay.is_finished(tick) {
                self.replay = Some(replay);
            }
        }

        if self.should_record {
            log::debug!("Recording inputs from tick {}", tick);
            self.recorder = Some(InputRecorder::new(tick));
            self.should_record = false;
        }

        let config = self.config.clone();
        let position = self.mouse_position;
        let moved = self.mouse_position != self.previous_position;

        let mut index = 0;
        while index < self.keys.len() {
            let (key, state) = self.keys[index];
            if state.released {
                sink(InputEvent::new(tick, InputAction::KeyReleased { key }));
                self.record_input(tick, RawInput::KeyRelease(key));
                if state.duration <= config.duration_type {
                    sink(InputEvent::new(tick, InputAction::KeyTyped { key }));
                }
                self.keys.remove(index);
                continue;
            }

            if state.duration == 0 {
                sink(InputEvent::new(tick, InputAction::KeyPressed { key }));
                self.record_input(tick, RawInput::KeyPress(key));
            } else {
                sink(InputEvent::new(
                    tick,
                    InputAction::KeyHeld {
                        key,
                        duration: state.duration,
                    },
                ));
            }
            self.keys[index].1.duration += 1;
            index += 1;
        }

        let mut index = 0;
        while index < self.buttons.len() {
            let (button, state) = self.buttons[index];
            if state.released {
                sink(InputEvent::new(tick, InputAction::MouseButtonReleased { button, position }));
                self.record_input(tick, RawInput::MouseButtonRelease(button));
                if state.duration < config.duration_click {
                    sink(InputEvent::new(tick, InputAction::MouseButtonClicked { button, position }));
                }
                self.buttons.remove(index);
                continue;
            }

            if state.duration == 0 {
                sink(InputEvent::new(tick, InputAction::MouseButtonPressed { button, position }));
                self.record_input(tick, RawInput::MouseButtonPress(button));
            } else if moved {
                sink(InputEvent::new(
                    tick,
                    InputAction::MouseDragged {
                        button,
                        position,
                        duration: state.duration,
                    },
                ));
            }
            self.buttons[index].1.duration += 1;
            index += 1;
        }

        if moved {
            sink(InputEvent::new(tick, InputAction::MouseMoved { position }));
            self.record_input(tick, RawInput::MouseMove(position));
        }
        self.previous_position = position;
    }

    fn record_input(&mut self, tick: u64, input: RawInput) {
        if let Some(recorder) = &mut self.recorder {
            recorder.record(tick, input);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(handler: &mut InputHandler, tick: u64) -> Vec<InputAction> {
        let mut actions = Vec::new();
        handler.fire_events(tick, |event| actions.push(event.action));
        actions
    }

    #[test]
    fn test_key_press_then_type() {
        let mut handler = InputHandler::default();
        handler.key_press(Key::A);

        assert_eq!(fire(&mut handler, 0), vec![InputAction::KeyPressed { key: Key::A }]);
        assert_eq!(
            fire(&mut handler, 1),
            vec![InputAction::KeyHeld {
                key: Key::A,
                duration: 1
            }]
        );

        handler.key_release(Key::A);
        assert_eq!(
            fire(&mut handler, 2),
            vec![InputAction::KeyReleased { key: Key::A }, InputAction::KeyTyped { key: Key::A }]
        );
        assert!(fire(&mut handler, 3).is_empty());
    }

    #[test]
    fn test_long_hold_is_not_typed() {
        let mut handler = InputHandler::new(InputConfig {
            duration_type: 2,
            duration_click: 2,
        });
        handler.key_press(Key::Space);
        for tick in 0..4 {
            fire(&mut handler, tick);
        }
        handler.key_release(Key::Space);
        assert_eq!(fire(&mut handler, 4), vec![InputAction::KeyReleased { key: Key::Space }]);
    }

    #[test]
    fn test_duplicate_press_and_stray_release_ignored() {
        let mut handler = InputHandler::default();
        handler.key_release(Key::B);
        assert!(fire(&mut handler, 0).is_empty());

        handler.key_press(Key::B);
        fire(&mut handler, 1);
        handler.key_press(Key::B);
        assert_eq!(
            fire(&mut handler, 2),
            vec![InputAction::KeyHeld {
                key: Key::B,
                duration: 1
            }]
        );
    }

    #[test]
    fn test_keys_fire_in_press_order() {
        let mut handler = InputHandler::default();
        handler.key_press(Key::Z);
        handler.key_press(Key::A);
        assert_eq!(
            fire(&mut handler, 0),
            vec![InputAction::KeyPressed { key: Key::Z }, InputAction::KeyPressed { key: Key::A }]
        );
    }

    #[test]
    fn test_drag_only_when_moving() {
        let mut handler = InputHandler::default();
        let button = MouseButton::Left;
        handler.mouse_button_press(button);
        assert_eq!(
            fire(&mut handler, 0),
            vec![InputAction::MouseButtonPressed {
                button,
                position: Vec2::ZERO
            }]
        );

        assert!(fire(&mut handler, 1).is_empty());

        let position = Vec2::new(0.5, 0.5);
        handler.move_mouse(position);
        assert_eq!(
            fire(&mut handler, 2),
            vec![
                InputAction::MouseDragged {
                    button,
                    position,
                    duration: 2
                },
                InputAction::MouseMoved { position },
            ]
        );
    }

    #[test]
    fn test_click_versus_long_press() {
        let mut handler = InputHandler::new(InputConfig {
            duration_type: 20,
            duration_click: 2,
        });
        let button = MouseButton::Right;
        let position = Vec2::ZERO;

        handler.mouse_button_press(button);
        fire(&mut handler, 0);
        handler.mouse_button_release(button);
        assert_eq!(
            fire(&mut handler, 1),
            vec![
                InputAction::MouseButtonReleased { button, position },
                InputAction::MouseButtonClicked { button, position },
            ]
        );

        handler.mouse_button_press(button);
        fire(&mut handler, 2);
        fire(&mut handler, 3);
        handler.mouse_button_release(button);
        assert_eq!(fire(&mut handler, 4), vec![InputAction::MouseButtonReleased { button, position }]);
    }

    #[test]
    fn test_export_without_recording() {
        let handler = InputHandler::default();
        let path = std::env::temp_dir().join("tilekit_input_not_recording.json");
        assert!(matches!(handler.export_record(&path), Err(InputError::NotRecording)));
    }

    #[test]
    fn test_recording_starts_on_next_fire() {
        let mut handler = InputHandler::default();
        handler.record();
        assert!(!handler.is_recording());

        handler.key_press(Key::C);
        fire(&mut handler, 5);
        assert!(handler.is_recording());

        let record = handler.current_record().unwrap();
        assert_eq!(record.at(0), &[RawInput::KeyPress(Key::C)]);
    }
}
