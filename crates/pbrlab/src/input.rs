//! Keyboard and mouse input.
//!
//! The window handler never reacts to input directly. It converts winit
//! events into [`InputEvent`]s and pushes them onto an [`InputQueue`]; the
//! demo drains the queue once per frame and applies the events to its own
//! state. [`Input`] tracks which keys or buttons are held and which went
//! down this frame.
//!
//! Releases reach the demo even when the overlay captured the event, so a
//! drag or key that ends over the panel never stays held.

use std::collections::HashSet;
use std::hash::Hash;

pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// Held keys or mouse buttons, plus the ones that went down this frame.
#[derive(Debug, Clone)]
pub struct Input<T: Eq + Hash + Copy> {
    pressed: HashSet<T>,
    just_pressed: HashSet<T>,
}

impl<T: Eq + Hash + Copy> Input<T> {
    pub fn new() -> Self {
        Self {
            pressed: HashSet::new(),
            just_pressed: HashSet::new(),
        }
    }

    pub fn pressed(&self, input: T) -> bool {
        self.pressed.contains(&input)
    }

    /// Went down since the last [`clear_just`](Self::clear_just). Key
    /// repeats do not count.
    pub fn just_pressed(&self, input: T) -> bool {
        self.just_pressed.contains(&input)
    }

    pub fn press(&mut self, input: T) {
        if self.pressed.insert(input) {
            self.just_pressed.insert(input);
        }
    }

    pub fn release(&mut self, input: T) {
        self.pressed.remove(&input);
    }

    pub fn clear_just(&mut self) {
        self.just_pressed.clear();
    }
}

impl<T: Eq + Hash + Copy> Default for Input<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Mouse cursor position in window coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorPosition {
    pub x: f32,
    pub y: f32,
}

/// One input occurrence, decoupled from the windowing library.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Key { code: KeyCode, pressed: bool },
    MouseButton { button: MouseButton, pressed: bool },
    CursorMoved { x: f32, y: f32 },
    /// Vertical scroll in lines; positive scrolls up.
    Scroll { dy: f32 },
}

impl InputEvent {
    /// Whether the event must be delivered even when the overlay consumed
    /// it. Only releases qualify.
    pub fn bypasses_overlay(&self) -> bool {
        matches!(
            self,
            InputEvent::Key { pressed: false, .. } | InputEvent::MouseButton { pressed: false, .. }
        )
    }
}

/// Events collected since the last frame.
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Take every queued event, oldest first.
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}

/// Held keys and buttons plus the cursor, fed from [`InputEvent`]s.
#[derive(Debug, Default)]
pub struct InputState {
    pub keys: Input<KeyCode>,
    pub mouse: Input<MouseButton>,
    pub cursor: CursorPosition,
    /// Cursor at the previous drag sample; `None` until the first sample
    /// after the button goes down.
    last_drag: Option<CursorPosition>,
}

impl InputState {
    /// Record `event`. Returns the look delta `(dx, dy)` when the cursor
    /// moved with the left button held and `look_allowed` is true; `dy` is
    /// positive when the cursor moves up.
    pub fn apply(&mut self, event: InputEvent, look_allowed: bool) -> Option<(f32, f32)> {
        match event {
            InputEvent::Key { code, pressed } => {
                if pressed {
                    self.keys.press(code);
                } else {
                    self.keys.release(code);
                }
                None
            }
            InputEvent::MouseButton { button, pressed } => {
                if pressed {
                    self.mouse.press(button);
                } else {
                    self.mouse.release(button);
                }
                if button == MouseButton::Left {
                    self.last_drag = None;
                }
                None
            }
            InputEvent::CursorMoved { x, y } => {
                self.cursor = CursorPosition { x, y };
                if !self.mouse.pressed(MouseButton::Left) || !look_allowed {
                    self.last_drag = None;
                    return None;
                }
                let delta = self
                    .last_drag
                    .map(|last| (x - last.x, last.y - y));
                self.last_drag = Some(self.cursor);
                delta
            }
            InputEvent::Scroll { .. } => None,
        }
    }

    pub fn end_frame(&mut self) {
        self.keys.clear_just();
        self.mouse.clear_just();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_edges() {
        let mut keys = Input::<KeyCode>::new();
        keys.press(KeyCode::KeyW);
        keys.press(KeyCode::KeyW);
        assert!(keys.pressed(KeyCode::KeyW));
        assert!(keys.just_pressed(KeyCode::KeyW));
        keys.clear_just();
        assert!(!keys.just_pressed(KeyCode::KeyW));
        keys.press(KeyCode::KeyW);
        assert!(!keys.just_pressed(KeyCode::KeyW));
        keys.release(KeyCode::KeyW);
        assert!(!keys.pressed(KeyCode::KeyW));
    }

    #[test]
    fn only_releases_bypass_the_overlay() {
        let release = InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        };
        let press = InputEvent::Key {
            code: KeyCode::KeyW,
            pressed: true,
        };
        assert!(release.bypasses_overlay());
        assert!(!press.bypasses_overlay());
        assert!(!InputEvent::Scroll { dy: 1.0 }.bypasses_overlay());
        assert!(!InputEvent::CursorMoved { x: 0.0, y: 0.0 }.bypasses_overlay());
    }

    #[test]
    fn release_over_the_panel_ends_the_drag() {
        let mut state = InputState::default();
        let down = InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        };
        let up = InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        };
        state.apply(down, true);
        state.apply(InputEvent::Key { code: KeyCode::KeyD, pressed: true }, true);
        state.apply(InputEvent::CursorMoved { x: 0.0, y: 0.0 }, true);

        // Both releases happen over the panel: look is blocked but they
        // still arrive.
        assert!(up.bypasses_overlay());
        state.apply(up, false);
        state.apply(InputEvent::Key { code: KeyCode::KeyD, pressed: false }, false);

        assert!(!state.mouse.pressed(MouseButton::Left));
        assert!(!state.keys.pressed(KeyCode::KeyD));
        assert_eq!(state.apply(InputEvent::CursorMoved { x: 4.0, y: 4.0 }, true), None);
        assert_eq!(state.apply(InputEvent::CursorMoved { x: 8.0, y: 8.0 }, true), None);
    }

    #[test]
    fn queue_drains_in_order() {
        let mut queue = InputQueue::default();
        queue.push(InputEvent::Scroll { dy: 1.0 });
        queue.push(InputEvent::CursorMoved { x: 1.0, y: 2.0 });
        assert_eq!(queue.len(), 2);
        let events = queue.drain();
        assert!(queue.is_empty());
        assert_eq!(events[0], InputEvent::Scroll { dy: 1.0 });
    }

    #[test]
    fn first_drag_sample_only_records() {
        let mut state = InputState::default();
        let down = InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        };
        assert_eq!(state.apply(down, true), None);
        assert_eq!(state.apply(InputEvent::CursorMoved { x: 10.0, y: 10.0 }, true), None);
        assert_eq!(
            state.apply(InputEvent::CursorMoved { x: 15.0, y: 4.0 }, true),
            Some((5.0, 6.0))
        );
    }

    #[test]
    fn no_look_without_button_or_over_ui() {
        let mut state = InputState::default();
        state.apply(InputEvent::CursorMoved { x: 0.0, y: 0.0 }, true);
        assert_eq!(state.apply(InputEvent::CursorMoved { x: 5.0, y: 5.0 }, true), None);

        state.apply(
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed: true,
            },
            true,
        );
        state.apply(InputEvent::CursorMoved { x: 6.0, y: 6.0 }, false);
        assert_eq!(state.apply(InputEvent::CursorMoved { x: 7.0, y: 7.0 }, false), None);
        assert_eq!(state.cursor, CursorPosition { x: 7.0, y: 7.0 });
    }
}
