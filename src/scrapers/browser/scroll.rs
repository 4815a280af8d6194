//! Scroll-until-stable loading of lazily rendered listings.
//!
//! The page gives no completion signal, so loading is a polling loop: count
//! the rendered items, nudge the page, wait, repeat. [`ScrollTracker`] holds
//! the termination policy; [`load_until_stable`] drives it against anything
//! implementing [`ScrollTarget`].

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

/// Scroll technique applied on one iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTechnique {
    /// Send the End key to the document body.
    EndKey,
    /// `window.scrollTo` the bottom of the document.
    ScriptToBottom,
    /// Scroll the last rendered item into view.
    LastItemIntoView,
}

impl ScrollTechnique {
    const ROTATION: [ScrollTechnique; 3] = [
        ScrollTechnique::EndKey,
        ScrollTechnique::ScriptToBottom,
        ScrollTechnique::LastItemIntoView,
    ];

    /// Round-robin technique for zero-based iteration `attempt`.
    pub fn for_attempt(attempt: u32) -> Self {
        Self::ROTATION[attempt as usize % Self::ROTATION.len()]
    }
}

/// Loader state after a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    /// Below target and still inside the stagnation budget.
    Loading,
    /// Count unchanged for `stagnation_threshold` consecutive measurements.
    Stagnant,
    /// Target count reached.
    Satisfied,
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOutcome {
    TargetReached,
    Stagnated,
    /// Iteration cap hit while still loading.
    Exhausted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollSettings {
    pub target_count: usize,
    pub max_attempts: u32,
    pub stagnation_threshold: u32,
    /// Pause after each scroll for content to arrive.
    pub delay: Duration,
}

impl Default for ScrollSettings {
    fn default() -> Self {
        Self {
            target_count: 100,
            max_attempts: 50,
            stagnation_threshold: 5,
            delay: Duration::from_secs(2),
        }
    }
}

/// Result of a loading run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollReport {
    pub outcome: ScrollOutcome,
    /// Last measured item count.
    pub item_count: usize,
    /// Number of measurements taken.
    pub attempts: u32,
}

/// Count-comparison state machine behind the loader.
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    target_count: usize,
    stagnation_threshold: u32,
    last_count: usize,
    unchanged: u32,
    state: ScrollState,
}

impl ScrollTracker {
    pub fn new(target_count: usize, stagnation_threshold: u32) -> Self {
        Self {
            target_count,
            stagnation_threshold,
            last_count: 0,
            unchanged: 0,
            state: ScrollState::Loading,
        }
    }

    /// Feed a measured item count. Returns `true` in the tuple's second slot
    /// when the count moved since the previous measurement.
    pub fn observe(&mut self, count: usize) -> (ScrollState, bool) {
        let progressed = count != self.last_count;
        if progressed {
            self.last_count = count;
            self.unchanged = 0;
        } else {
            self.unchanged += 1;
        }

        self.state = if count >= self.target_count {
            ScrollState::Satisfied
        } else if self.unchanged >= self.stagnation_threshold {
            ScrollState::Stagnant
        } else {
            ScrollState::Loading
        };
        (self.state, progressed)
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn last_count(&self) -> usize {
        self.last_count
    }
}

/// Something whose rendered item count grows as it is scrolled.
#[async_trait]
pub trait ScrollTarget: Send {
    /// Number of matching items currently rendered.
    async fn count_items(&mut self) -> Result<usize>;

    /// Apply one scroll technique.
    async fn scroll(&mut self, technique: ScrollTechnique) -> Result<()>;
}

/// Scroll `target` until the target count is reached, the count stagnates,
/// or the attempt cap runs out.
///
/// Each iteration measures, checks for the target, scrolls with the next
/// technique, sleeps, and only then gives up on stagnation, so a stagnant
/// page still gets one final scroll.
pub async fn load_until_stable<T>(target: &mut T, settings: &ScrollSettings) -> Result<ScrollReport>
where
    T: ScrollTarget + ?Sized,
{
    let mut tracker = ScrollTracker::new(settings.target_count, settings.stagnation_threshold);

    for attempt in 0..settings.max_attempts {
        let count = target.count_items().await?;
        let (state, progressed) = tracker.observe(count);
        if progressed {
            info!("Scroll {}: {} items loaded", attempt + 1, count);
        }

        if state == ScrollState::Satisfied {
            info!("Reached {} items (target {})", count, settings.target_count);
            return Ok(ScrollReport {
                outcome: ScrollOutcome::TargetReached,
                item_count: count,
                attempts: attempt + 1,
            });
        }

        let technique = ScrollTechnique::for_attempt(attempt);
        debug!("Scroll {}: {:?}", attempt + 1, technique);
        target.scroll(technique).await?;
        tokio::time::sleep(settings.delay).await;

        if state == ScrollState::Stagnant {
            info!("No more items loading (total {})", count);
            return Ok(ScrollReport {
                outcome: ScrollOutcome::Stagnated,
                item_count: count,
                attempts: attempt + 1,
            });
        }
    }

    Ok(ScrollReport {
        outcome: ScrollOutcome::Exhausted,
        item_count: tracker.last_count(),
        attempts: settings.max_attempts,
    })
}
