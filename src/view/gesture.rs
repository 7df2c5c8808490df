//! Pointer gesture state machine.
//!
//! `Idle` --down--> `Dragging` --move--> `Dragging` (emits a pan delta)
//! `Dragging` --up/leave--> `Idle`. Moves while idle are hover probes.

/// Raw pointer input in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerInput {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    Dragging { last_x: f64, last_y: f64 },
}

/// What the engine should do in response to an input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureEffect {
    None,
    Pan { dx: f64, dy: f64 },
    Hover { x: f64, y: f64 },
    HoverLost,
}

impl GestureState {
    pub fn is_dragging(&self) -> bool {
        matches!(self, GestureState::Dragging { .. })
    }

    /// Advance the machine by one input.
    pub fn step(self, input: PointerInput) -> (GestureState, GestureEffect) {
        match (self, input) {
            (_, PointerInput::Down { x, y }) => (
                GestureState::Dragging { last_x: x, last_y: y },
                GestureEffect::None,
            ),
            (GestureState::Dragging { last_x, last_y }, PointerInput::Move { x, y }) => (
                GestureState::Dragging { last_x: x, last_y: y },
                GestureEffect::Pan {
                    dx: x - last_x,
                    dy: y - last_y,
                },
            ),
            (GestureState::Idle, PointerInput::Move { x, y }) => {
                (GestureState::Idle, GestureEffect::Hover { x, y })
            }
            (_, PointerInput::Up) => (GestureState::Idle, GestureEffect::None),
            (_, PointerInput::Leave) => (GestureState::Idle, GestureEffect::HoverLost),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_emits_incremental_deltas() {
        let s = GestureState::Idle;
        let (s, e) = s.step(PointerInput::Down { x: 10.0, y: 10.0 });
        assert_eq!(e, GestureEffect::None);
        let (s, e) = s.step(PointerInput::Move { x: 15.0, y: 8.0 });
        assert_eq!(e, GestureEffect::Pan { dx: 5.0, dy: -2.0 });
        let (s, e) = s.step(PointerInput::Move { x: 16.0, y: 8.0 });
        assert_eq!(e, GestureEffect::Pan { dx: 1.0, dy: 0.0 });
        let (s, _) = s.step(PointerInput::Up);
        assert_eq!(s, GestureState::Idle);
    }

    #[test]
    fn idle_moves_probe_hover() {
        let (s, e) = GestureState::Idle.step(PointerInput::Move { x: 3.0, y: 4.0 });
        assert_eq!(s, GestureState::Idle);
        assert_eq!(e, GestureEffect::Hover { x: 3.0, y: 4.0 });
    }

    #[test]
    fn leave_ends_drag() {
        let s = GestureState::Dragging { last_x: 0.0, last_y: 0.0 };
        let (s, e) = s.step(PointerInput::Leave);
        assert!(!s.is_dragging());
        assert_eq!(e, GestureEffect::HoverLost);
    }
}
