//! Skill activation interval bookkeeping for one competitor's stream.

use std::collections::HashMap;

use crate::engine::{EventKind, Perspective, SkillEvent, SkillId, SkillMarker};
use crate::trajectory::{SkillInterval, SkillIntervalMap};

/// Records activation intervals observed while stepping one competitor.
///
/// Persists across samples; [`IntervalTracker::finish`] drains the state
/// recorded for the sample just completed.
#[derive(Debug, Clone)]
pub struct IntervalTracker {
    course_distance: f64,
    open: HashMap<SkillId, Vec<(f64, Option<f64>)>>,
    /// Signed accumulator: activation subtracts the current elapsed time,
    /// deactivation adds it back, leaving the summed duration.
    downhill: f64,
}

impl IntervalTracker {
    #[must_use]
    pub fn new(course_distance: f64) -> Self {
        Self {
            course_distance,
            open: HashMap::new(),
            downhill: 0.0,
        }
    }

    /// Feed one engine event observed at the given elapsed time and position.
    pub fn observe(&mut self, event: SkillEvent, elapsed: f64, position: f64) {
        match (event.marker, event.kind) {
            (SkillMarker::DownhillMode, EventKind::Activate) => self.downhill -= elapsed,
            (SkillMarker::DownhillMode, EventKind::Deactivate) => self.downhill += elapsed,
            (SkillMarker::Regional(_), _) => {}
            (SkillMarker::Skill(id), EventKind::Activate) => {
                if event.perspective == Perspective::Own {
                    // The final step of a race overshoots the finish, so an
                    // activation reported there must clamp like closes do or
                    // the interval inverts.
                    let start = position.min(self.course_distance);
                    self.open.entry(id).or_default().push((start, None));
                }
            }
            (SkillMarker::Skill(id), EventKind::Deactivate) => {
                if event.perspective != Perspective::Own {
                    return;
                }
                let Some(records) = self.open.get_mut(&id) else {
                    return;
                };
                // Stacked copies of one skill (speed debuffs) can re-activate
                // before the first copy ends, so close the first record still
                // open rather than the most recent one. Skills with both a
                // speed and an accel component deactivate twice; the second
                // edge finds nothing open and is dropped.
                if let Some(record) = records.iter_mut().find(|r| r.1.is_none()) {
                    record.1 = Some(position.min(self.course_distance));
                }
            }
        }
    }

    /// Drain the intervals and downhill duration recorded for the completed
    /// sample, resetting the tracker for the next one. Activations still open
    /// are closed at the course distance.
    pub fn finish(&mut self) -> (SkillIntervalMap, f64) {
        let downhill = std::mem::take(&mut self.downhill);
        let intervals = self
            .open
            .drain()
            .map(|(id, records)| {
                let closed = records
                    .into_iter()
                    .map(|(start, end)| SkillInterval {
                        start,
                        end: end.unwrap_or(self.course_distance),
                    })
                    .collect();
                (id, closed)
            })
            .collect();
        (intervals, downhill)
    }
}
