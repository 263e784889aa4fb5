/// Recurring triggers delivered as ordinary events.
///
/// Each armed timer fires once its due time has passed and is immediately
/// re-scheduled with the same interval; re-arming replaces the interval.

use crate::input::GameEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerId {
    AlienFire,
    ExtraSpawn,
}

impl TimerId {
    const ALL: [TimerId; 2] = [TimerId::AlienFire, TimerId::ExtraSpawn];

    fn index(self) -> usize {
        match self {
            TimerId::AlienFire => 0,
            TimerId::ExtraSpawn => 1,
        }
    }

    fn event(self) -> GameEvent {
        match self {
            TimerId::AlienFire => GameEvent::AlienFire,
            TimerId::ExtraSpawn => GameEvent::ExtraSpawn,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Armed {
    interval_ms: u64,
    due_ms: u64,
}

#[derive(Clone, Debug, Default)]
pub struct Timers {
    slots: [Option<Armed>; 2],
}

impl Timers {
    pub fn arm(&mut self, id: TimerId, interval_ms: u64, now_ms: u64) {
        self.slots[id.index()] = Some(Armed {
            interval_ms,
            due_ms: now_ms + interval_ms,
        });
    }

    pub fn disarm(&mut self, id: TimerId) {
        self.slots[id.index()] = None;
    }

    pub fn is_armed(&self, id: TimerId) -> bool {
        self.slots[id.index()].is_some()
    }

    /// Interval of an armed timer.
    pub fn interval_ms(&self, id: TimerId) -> Option<u64> {
        self.slots[id.index()].map(|a| a.interval_ms)
    }

    /// Emit one event for every timer that is due, in fixed id order.
    pub fn poll(&mut self, now_ms: u64) -> Vec<GameEvent> {
        let mut fired = Vec::new();
        for id in TimerId::ALL {
            if let Some(armed) = self.slots[id.index()].as_mut() {
                if now_ms >= armed.due_ms {
                    armed.due_ms = now_ms + armed.interval_ms;
                    fired.push(id.event());
                }
            }
        }
        fired
    }
}
