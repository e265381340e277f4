use std::collections::HashSet;

#[derive(Debug, PartialEq)]
pub enum ScrollAction {
    Normal,
    ForcedJump,
}

/*
 Explicit run context for one lead search:
 1. `processed` claims every display name before it is evaluated, so a
    failed evaluation is never retried on a later scroll pass
 2. `found` is the qualified subset, bounded by `target_count`
 3. `scroll_attempts` is the only counter that terminates the loop besides
    the target itself; `stall_streak` is informational
*/
pub struct RunState {
    pub target_count: usize,
    pub max_scroll_attempts: u32,
    pub scroll_attempts: u32,
    pub stall_streak: u32,
    found: HashSet<String>,
    processed: HashSet<String>,
    last_feed_offset: f64,
}

impl RunState {
    pub fn new(target_count: usize, max_scroll_attempts: u32) -> Self {
        RunState {
            target_count,
            max_scroll_attempts,
            scroll_attempts: 0,
            stall_streak: 0,
            found: HashSet::new(),
            processed: HashSet::new(),
            last_feed_offset: 0.0,
        }
    }

    pub fn found_count(&self) -> usize {
        self.found.len()
    }

    pub fn checked_count(&self) -> usize {
        self.processed.len()
    }

    pub fn target_reached(&self) -> bool {
        self.found.len() >= self.target_count
    }

    pub fn scroll_budget_exhausted(&self) -> bool {
        self.scroll_attempts >= self.max_scroll_attempts
    }

    // Returns false if the name was already claimed this run
    pub fn claim(&mut self, name: &str) -> bool {
        self.processed.insert(name.to_string())
    }

    pub fn record_lead(&mut self, name: &str) {
        if !self.target_reached() {
            self.found.insert(name.to_string());
        }
    }

    /*
     Stall detection. The feed offset is read before scrolling; an iteration
     that produced no new lead and left the offset where it was is a stall,
     which asks the caller for an oversized jump to force new content.
    */
    pub fn note_feed_offset(&mut self, offset: f64, found_new_lead: bool) -> ScrollAction {
        let action = match !found_new_lead && offset == self.last_feed_offset {
            true => {
                self.stall_streak += 1;
                ScrollAction::ForcedJump
            }
            false => {
                self.stall_streak = 0;
                ScrollAction::Normal
            }
        };
        self.last_feed_offset = offset;

        action
    }

    pub fn note_scroll_attempt(&mut self) {
        self.scroll_attempts += 1;
    }

    pub fn note_scroll_failure(&mut self) {
        self.stall_streak += 1;
    }
}
