//! Dual-trajectory stepping and time alignment for one sample.

use crate::engine::{EngineError, RaceInstance, SimulationStream};
use crate::swap::RoleAssignment;
use crate::tracker::IntervalTracker;
use crate::trajectory::{SamplePair, Trajectory};

/// Fixed simulation step, 1/15 of a simulated second.
pub const STEP_SECONDS: f64 = 1.0 / 15.0;

/// One attempt's stepped output: both full trajectories plus the two
/// positions the validity check and margin are computed from.
#[derive(Debug, Clone)]
pub struct SteppedSample {
    pub pair: SamplePair,
    /// Leader's position when it crossed the finish.
    pub leader_final: f64,
    /// Follower's position at the simulated time the leader finished.
    pub follower_at_alignment: f64,
}

/// Pull one race per competitor and produce an aligned trajectory pair.
///
/// The leader runs to completion first; the follower is then stepped until
/// its clock reaches the leader's final time, where the comparison position
/// is read, and afterwards continues to its own finish so the full trajectory
/// is available for charting. Streams are pulled follower-first to keep the
/// cross-stream randomness continuation in a fixed order.
///
/// # Errors
///
/// Propagates engine failures from either stream's pull unchanged.
pub fn run_sample<S: SimulationStream>(
    streams: &mut [S; 2],
    trackers: &mut [IntervalTracker; 2],
    roles: RoleAssignment,
    retry: bool,
    course_distance: f64,
) -> Result<SteppedSample, EngineError> {
    let leader = roles.leader();
    let follower = roles.follower();

    let mut follower_race = streams[follower.index()].pull(retry)?;
    let mut leader_race = streams[leader.index()].pull(retry)?;

    let mut pair = SamplePair::default();

    while leader_race.position() < course_distance {
        step_once(
            &mut leader_race,
            &mut trackers[leader.index()],
            pair.run_mut(leader),
        );
    }
    let leader_final = leader_race.position();
    let leader_final_time = leader_race.elapsed_time();
    pair.run_mut(leader).start_delay = leader_race.start_delay();

    while follower_race.elapsed_time() < leader_final_time {
        step_once(
            &mut follower_race,
            &mut trackers[follower.index()],
            pair.run_mut(follower),
        );
    }
    let follower_at_alignment = follower_race.position();

    // Run the rest of the way so the follower's chart data is complete; the
    // comparison position above stays untouched.
    while follower_race.position() < course_distance {
        step_once(
            &mut follower_race,
            &mut trackers[follower.index()],
            pair.run_mut(follower),
        );
    }
    pair.run_mut(follower).start_delay = follower_race.start_delay();

    drop(leader_race);
    drop(follower_race);

    for who in [leader, follower] {
        let (intervals, downhill) = trackers[who.index()].finish();
        let run = pair.run_mut(who);
        run.skill_intervals = intervals;
        run.downhill_duration = downhill;
    }

    Ok(SteppedSample {
        pair,
        leader_final,
        follower_at_alignment,
    })
}

fn step_once<R: RaceInstance>(race: &mut R, tracker: &mut IntervalTracker, out: &mut Trajectory) {
    let events = race.step(STEP_SECONDS);
    let elapsed = race.elapsed_time();
    let position = race.position();
    out.push_step(elapsed, position, race.current_speed(), race.hp());
    for event in events {
        tracker.observe(event, elapsed, position);
    }
}
