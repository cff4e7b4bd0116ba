use heapless::Deque;

use crate::ConfigError;

/// Confirms a classification once it has been seen for `window` consecutive
/// frames, and does not confirm it again while it stays held.
///
/// Agreement must be unanimous over the whole window: one differing frame
/// anywhere in it restarts the streak. The same value fires again only after
/// a different value has been confirmed or the debouncer has been cleared.
///
/// `N` is the history capacity; `window` may be anything from 1 to `N`.
pub struct GestureDebouncer<T, const N: usize> {
    window: usize,
    history: Deque<T, N>,
    last_fired: Option<T>,
}

impl<T: Copy + PartialEq, const N: usize> GestureDebouncer<T, N> {
    pub fn new(window: usize) -> Result<Self, ConfigError> {
        if window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if window > N {
            return Err(ConfigError::WindowTooLarge { window, capacity: N });
        }
        Ok(Self {
            window,
            history: Deque::new(),
            last_fired: None,
        })
    }

    /// Record one frame's classification, returning it if it just became confirmed.
    pub fn update(&mut self, value: T) -> Option<T> {
        if self.history.len() >= self.window {
            self.history.pop_front();
        }
        // Cannot fail: the window never exceeds the capacity.
        self.history.push_back(value).ok();

        let stable = self.history.len() == self.window && self.history.iter().all(|v| *v == value);

        if stable && self.last_fired != Some(value) {
            self.last_fired = Some(value);
            Some(value)
        } else {
            None
        }
    }

    /// Forget the history and the last confirmed value.
    pub fn clear(&mut self) {
        self.history.clear();
        self.last_fired = None;
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn last_fired(&self) -> Option<T> {
        self.last_fired
    }
}
