use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Per-frame state of one key or button.
///
/// `Pressed` and `Released` last exactly one frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ButtonPhase {
    #[default]
    Up,
    /// Went down since the previous frame.
    Pressed,
    /// Down in both this and the previous frame.
    Held,
    /// Went up since the previous frame.
    Released,
}

impl ButtonPhase {
    /// Phase for the next frame given whether the input is down at that frame.
    pub const fn next(self, down: bool) -> Self {
        match (self.is_down(), down) {
            (false, true) => ButtonPhase::Pressed,
            (true, true) => ButtonPhase::Held,
            (true, false) => ButtonPhase::Released,
            (false, false) => ButtonPhase::Up,
        }
    }

    /// Down this frame (pressed or held).
    #[inline]
    pub const fn is_down(self) -> bool {
        matches!(self, ButtonPhase::Pressed | ButtonPhase::Held)
    }

    #[inline]
    pub const fn is_pressed(self) -> bool {
        matches!(self, ButtonPhase::Pressed)
    }

    #[inline]
    pub const fn is_released(self) -> bool {
        matches!(self, ButtonPhase::Released)
    }
}

/// Edge detection over a set of inputs.
///
/// Raw press/release events may arrive at any time; [`update`] turns them
/// into one [`ButtonPhase`] per input for the coming frame. A press that is
/// released again before the next update still reports `Pressed` for one
/// frame, then `Released`.
///
/// [`update`]: ButtonTracker::update
#[derive(Debug, Clone)]
pub struct ButtonTracker<K> {
    down: HashSet<K>,
    pressed_since_update: HashSet<K>,
    phases: HashMap<K, ButtonPhase>,
}

impl<K> Default for ButtonTracker<K> {
    fn default() -> Self {
        Self {
            down: HashSet::new(),
            pressed_since_update: HashSet::new(),
            phases: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> ButtonTracker<K> {
    pub fn press(&mut self, key: K) {
        if self.down.insert(key) {
            self.pressed_since_update.insert(key);
        }
    }

    pub fn release(&mut self, key: K) {
        self.down.remove(&key);
    }

    /// Releases everything currently down (e.g. on focus loss).
    pub fn release_all(&mut self) {
        self.down.clear();
    }

    /// Advances every input to its phase for the next frame.
    pub fn update(&mut self) {
        let touched: HashSet<K> = self
            .phases
            .keys()
            .chain(self.down.iter())
            .chain(self.pressed_since_update.iter())
            .copied()
            .collect();

        for key in touched {
            let prev = self.phase(key);
            let down = self.down.contains(&key);
            let next = if self.pressed_since_update.contains(&key) {
                // A fresh press happened; a quick release afterwards shows up next frame.
                if prev.is_down() && !down {
                    ButtonPhase::Released
                } else {
                    ButtonPhase::Pressed
                }
            } else {
                prev.next(down)
            };

            if next == ButtonPhase::Up {
                self.phases.remove(&key);
            } else {
                self.phases.insert(key, next);
            }
        }

        self.pressed_since_update.clear();
    }

    #[inline]
    pub fn phase(&self, key: K) -> ButtonPhase {
        self.phases.get(&key).copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_transitions() {
        use ButtonPhase::*;
        assert_eq!(Up.next(true), Pressed);
        assert_eq!(Pressed.next(true), Held);
        assert_eq!(Held.next(true), Held);
        assert_eq!(Held.next(false), Released);
        assert_eq!(Pressed.next(false), Released);
        assert_eq!(Released.next(false), Up);
        assert_eq!(Released.next(true), Pressed);
        assert_eq!(Up.next(false), Up);
    }

    #[test]
    fn idle_to_down_is_pressed_once() {
        let mut t = ButtonTracker::default();
        t.press('w');
        t.update();
        assert_eq!(t.phase('w'), ButtonPhase::Pressed);
        t.update();
        assert_eq!(t.phase('w'), ButtonPhase::Held);
        t.update();
        assert_eq!(t.phase('w'), ButtonPhase::Held);
    }

    #[test]
    fn down_to_idle_is_released_once() {
        let mut t = ButtonTracker::default();
        t.press('w');
        t.update();
        t.update();
        t.release('w');
        t.update();
        assert_eq!(t.phase('w'), ButtonPhase::Released);
        t.update();
        assert_eq!(t.phase('w'), ButtonPhase::Up);
    }

    #[test]
    fn repeated_press_events_do_not_re_trigger() {
        let mut t = ButtonTracker::default();
        t.press('a');
        t.update();
        t.press('a');
        t.press('a');
        t.update();
        assert_eq!(t.phase('a'), ButtonPhase::Held);
    }

    #[test]
    fn tap_within_one_frame_is_seen() {
        let mut t = ButtonTracker::default();
        t.press('x');
        t.release('x');
        t.update();
        assert!(t.phase('x').is_pressed());
        t.update();
        assert!(t.phase('x').is_released());
        t.update();
        assert_eq!(t.phase('x'), ButtonPhase::Up);
    }

    #[test]
    fn release_and_repress_within_one_frame() {
        let mut t = ButtonTracker::default();
        t.press('z');
        t.update();
        t.update();
        t.release('z');
        t.press('z');
        t.update();
        assert_eq!(t.phase('z'), ButtonPhase::Pressed);
    }

    #[test]
    fn release_all_releases_next_frame() {
        let mut t = ButtonTracker::default();
        t.press(1);
        t.press(2);
        t.update();
        t.release_all();
        t.update();
        assert!(t.phase(1).is_released());
        assert!(t.phase(2).is_released());
    }

    #[test]
    fn untouched_inputs_are_up() {
        let t: ButtonTracker<u8> = ButtonTracker::default();
        assert_eq!(t.phase(3), ButtonPhase::Up);
    }
}
