//! Deterministic toy engine used by the comparison integration tests.
//!
//! Constant-ish kinematics with per-sample jitter derived from the seed and
//! sample index, so identical competitor configurations produce bit-identical
//! races on both streams.

use std::cell::Cell;
use std::rc::Rc;

use paddock_core::{
    CompareOptions, CourseInfo, EngineError, EventBatch, EventKind, Ground, HorseConfig,
    Perspective, RaceDefinition, RaceInstance, RegionalMechanic, SimulationStream, SkillEvent,
    SkillId, SkillMarker, StreamBuilder, WisdomSeedMap,
};

const BASE_SPEED: f64 = 10.0;
const SKILL_BOOST: f64 = 0.6;
const DOWNHILL_BOOST: f64 = 0.3;

fn mix(seed: u64, index: u64, salt: u64) -> u64 {
    // splitmix64 finalizer
    let mut z = seed
        .wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
        .wrapping_add(salt.wrapping_mul(0xBF58_476D_1CE4_E5B9));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn unit(seed: u64, index: u64, salt: u64) -> f64 {
    let bits = u32::try_from(mix(seed, index, salt) >> 40).unwrap_or(0);
    f64::from(bits) / f64::from(1u32 << 24)
}

/// Builder for [`ToyStream`], implementing the engine boundary.
#[derive(Clone)]
pub struct ToyBuilder {
    seed: u64,
    course: CourseInfo,
    race: RaceDefinition,
    horse: HorseConfig,
    own_skills: Vec<SkillId>,
    regional: bool,
    wisdom: Option<WisdomSeedMap>,
    jitter: f64,
    pull_log: Rc<Cell<usize>>,
    fail_after_pulls: Option<usize>,
}

impl ToyBuilder {
    pub fn new(seed: u64, course: CourseInfo, race: RaceDefinition) -> Self {
        Self {
            seed,
            course,
            race,
            horse: HorseConfig::default(),
            own_skills: Vec::new(),
            regional: false,
            wisdom: None,
            jitter: 0.0,
            pull_log: Rc::new(Cell::new(0)),
            fail_after_pulls: None,
        }
    }

    /// Per-sample speed jitter amplitude; zero keeps races fully determined
    /// by the competitor configuration.
    pub fn with_jitter(mut self, jitter: f64) -> Self {
        self.jitter = jitter;
        self
    }

    /// Fail every pull past the given total, simulating stream exhaustion.
    pub fn failing_after(mut self, pulls: usize) -> Self {
        self.fail_after_pulls = Some(pulls);
        self
    }

    /// Counter of total pulls across this builder and all of its forks.
    pub fn pull_log(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.pull_log)
    }
}

impl StreamBuilder for ToyBuilder {
    type Stream = ToyStream;

    fn fork(&self) -> Self {
        self.clone()
    }

    fn set_horse(&mut self, horse: &HorseConfig) {
        self.horse = horse.clone();
    }

    fn add_skill(&mut self, skill: SkillId, perspective: Perspective) {
        if perspective == Perspective::Own {
            self.own_skills.push(skill);
        }
    }

    fn enable_pacer(&mut self) {}

    fn enable_wisdom_checks(&mut self, seeds: &WisdomSeedMap) {
        self.wisdom = Some(seeds.clone());
    }

    fn enable_regional_mechanics(&mut self) {
        self.regional = true;
    }

    fn build(self) -> Result<ToyStream, EngineError> {
        if self.course.distance <= 0.0 {
            return Err(EngineError::Misconfigured(
                "non-positive course distance".into(),
            ));
        }
        if let Some(seeds) = &self.wisdom
            && self.own_skills.iter().any(|id| !seeds.contains_key(id))
        {
            return Err(EngineError::Misconfigured(
                "wisdom seed map missing a registered skill".into(),
            ));
        }
        let ground_factor = match self.race.ground {
            Ground::Firm => 1.0,
            Ground::Good => 0.995,
            Ground::Soft => 0.99,
            Ground::Heavy => 0.98,
        };
        let base = BASE_SPEED * f64::from(self.horse.stats.speed) / 1000.0 * ground_factor;
        Ok(ToyStream {
            seed: self.seed,
            distance: self.course.distance,
            base_speed: base,
            skills: self.own_skills,
            regional: self.regional,
            jitter: self.jitter,
            index: 0,
            pull_log: self.pull_log,
            fail_after_pulls: self.fail_after_pulls,
        })
    }
}

/// Stateful single-consumer sample stream.
pub struct ToyStream {
    seed: u64,
    distance: f64,
    base_speed: f64,
    skills: Vec<SkillId>,
    regional: bool,
    jitter: f64,
    index: u64,
    pull_log: Rc<Cell<usize>>,
    fail_after_pulls: Option<usize>,
}

impl SimulationStream for ToyStream {
    type Race = ToyRace;

    fn pull(&mut self, retry: bool) -> Result<ToyRace, EngineError> {
        let pulls = self.pull_log.get() + 1;
        self.pull_log.set(pulls);
        if let Some(limit) = self.fail_after_pulls
            && pulls > limit
        {
            return Err(EngineError::StreamExhausted);
        }
        // A retry replays the current sample's randomness under new roles
        // instead of advancing to the next draw.
        if !retry {
            self.index += 1;
        }
        // Zero jitter makes every sample bit-identical, which the tie and
        // single-sample scenarios rely on.
        let wobble = (unit(self.seed, self.index, 1) - 0.5) * 2.0 * self.jitter;
        let delay = unit(self.seed, self.index, 2) * self.jitter;
        Ok(ToyRace::new(
            self.distance,
            self.base_speed + wobble,
            delay,
            &self.skills,
            self.regional,
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    Before,
    Inside,
    Done,
}

/// One toy race: constant base speed, one activation window per skill, a
/// fixed downhill stretch, and linearly draining hp.
pub struct ToyRace {
    distance: f64,
    base_speed: f64,
    delay: f64,
    elapsed: f64,
    position: f64,
    hp: f64,
    skills: Vec<(SkillId, SegmentState)>,
    downhill: SegmentState,
    regional: Option<SegmentState>,
}

impl ToyRace {
    fn new(distance: f64, base_speed: f64, delay: f64, skills: &[SkillId], regional: bool) -> Self {
        Self {
            distance,
            base_speed,
            delay,
            elapsed: 0.0,
            position: 0.0,
            hp: 100.0,
            skills: skills
                .iter()
                .map(|&id| (id, SegmentState::Before))
                .collect(),
            downhill: SegmentState::Before,
            regional: regional.then_some(SegmentState::Before),
        }
    }

    fn skill_window(&self, slot: u32) -> (f64, f64) {
        let start = self.distance * (0.25 + 0.1 * f64::from(slot));
        (start, start + self.distance * 0.08)
    }
}

impl RaceInstance for ToyRace {
    fn step(&mut self, dt: f64) -> EventBatch {
        self.elapsed += dt;
        self.position += self.current_speed() * dt;
        self.hp = (self.hp - dt).max(0.0);

        let mut events = EventBatch::new();
        for slot in 0..self.skills.len() {
            let window = u32::try_from(slot).map(|s| self.skill_window(s));
            let Ok((start, end)) = window else { continue };
            let (id, state) = self.skills[slot];
            match state {
                SegmentState::Before if self.position >= start => {
                    self.skills[slot].1 = SegmentState::Inside;
                    events.push(SkillEvent {
                        marker: SkillMarker::Skill(id),
                        kind: EventKind::Activate,
                        perspective: Perspective::Own,
                    });
                }
                SegmentState::Inside if self.position >= end => {
                    self.skills[slot].1 = SegmentState::Done;
                    events.push(SkillEvent {
                        marker: SkillMarker::Skill(id),
                        kind: EventKind::Deactivate,
                        perspective: Perspective::Own,
                    });
                }
                _ => {}
            }
        }

        let (dh_start, dh_end) = (self.distance * 0.6, self.distance * 0.7);
        match self.downhill {
            SegmentState::Before if self.position >= dh_start => {
                self.downhill = SegmentState::Inside;
                events.push(SkillEvent {
                    marker: SkillMarker::DownhillMode,
                    kind: EventKind::Activate,
                    perspective: Perspective::Own,
                });
            }
            SegmentState::Inside if self.position >= dh_end => {
                self.downhill = SegmentState::Done;
                events.push(SkillEvent {
                    marker: SkillMarker::DownhillMode,
                    kind: EventKind::Deactivate,
                    perspective: Perspective::Own,
                });
            }
            _ => {}
        }

        if self.regional == Some(SegmentState::Before) && self.position >= self.distance * 0.9 {
            self.regional = Some(SegmentState::Done);
            events.push(SkillEvent {
                marker: SkillMarker::Regional(RegionalMechanic::FinalStretchInstinct),
                kind: EventKind::Activate,
                perspective: Perspective::Own,
            });
        }

        events
    }

    fn elapsed_time(&self) -> f64 {
        self.elapsed
    }

    fn position(&self) -> f64 {
        self.position
    }

    fn current_speed(&self) -> f64 {
        let mut speed = self.base_speed;
        if self.skills.iter().any(|(_, s)| *s == SegmentState::Inside) {
            speed += SKILL_BOOST;
        }
        if self.downhill == SegmentState::Inside {
            speed += DOWNHILL_BOOST;
        }
        speed
    }

    fn hp(&self) -> f64 {
        self.hp
    }

    fn start_delay(&self) -> f64 {
        self.delay
    }
}

pub fn course() -> CourseInfo {
    CourseInfo { distance: 120.0 }
}

pub fn options(seed: u64) -> CompareOptions {
    CompareOptions {
        seed,
        ..CompareOptions::default()
    }
}

pub fn horse_with_speed(speed: u32) -> HorseConfig {
    HorseConfig {
        stats: paddock_core::HorseStats {
            speed,
            ..paddock_core::HorseStats::default()
        },
        ..HorseConfig::default()
    }
}
