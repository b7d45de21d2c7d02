//! Orchestrator → lifecycles → ports, tick by tick.

use sortbin::app::events::AppEvent;
use sortbin::app::orchestrator::Orchestrator;
use sortbin::app::status::{StatusNotice, StatusRecord};
use sortbin::classify::ClassificationResult;
use sortbin::config::SystemConfig;
use sortbin::health::SensorKind;
use sortbin::sensors::{DistanceReading, LightLevel, SensorSample};

use crate::mock_hw::{
    Call, CallLog, MockHardware, MockImaging, RecordingEvents, RecordingStatus, sample,
    timeout_sample,
};

const TICK_MS: u64 = 200;

const NEAR: f32 = 30.0;
const FAR: f32 = 80.0;

// ── Harness ───────────────────────────────────────────────────

struct Station {
    orch: Orchestrator,
    hw: MockHardware,
    imaging: MockImaging,
    status: RecordingStatus,
    events: RecordingEvents,
    log: CallLog,
    next_tick: u64,
}

impl Station {
    fn new(config: SystemConfig) -> Self {
        config.validate().unwrap();
        let log = CallLog::new();
        let mut events = RecordingEvents::new();
        let mut orch = Orchestrator::new(config);
        orch.start(&mut events);
        Self {
            orch,
            hw: MockHardware::new(&log),
            imaging: MockImaging::new(&log),
            status: RecordingStatus::new(&log),
            events,
            log,
            next_tick: 0,
        }
    }

    /// Tick `n` at `n * TICK_MS`.
    fn tick(&mut self) -> StatusRecord {
        let now = self.next_tick * TICK_MS;
        self.next_tick += 1;
        self.orch.tick(
            now,
            &mut self.hw,
            &mut self.imaging,
            &mut self.status,
            &mut self.events,
        )
    }

    fn run(&mut self, ticks: usize) -> Vec<StatusRecord> {
        (0..ticks).map(|_| self.tick()).collect()
    }

    fn release(&mut self) {
        self.orch
            .release(&mut self.hw, &mut self.imaging, &mut self.events);
    }
}

fn config() -> SystemConfig {
    SystemConfig {
        motion_threshold_cm: 50.0,
        illumination_duration_ms: 5_000,
        imaging_duration_ms: 5_000,
        tick_interval_ms: TICK_MS as u32,
        ..SystemConfig::default()
    }
}

fn result(label: &str, confidence: f32) -> Option<ClassificationResult> {
    Some(ClassificationResult::new(label, confidence))
}

// ── End-to-end scenarios ──────────────────────────────────────

#[test]
fn brief_presence_keeps_imaging_for_one_window() {
    let mut st = Station::new(config());
    st.hw
        .push_n(sample(NEAR, LightLevel::Bright), 3)
        .push_n(sample(FAR, LightLevel::Bright), 28);

    let records = st.run(31);

    // Last qualifying tick is 2 (t=400ms); the window ends at t=5400ms.
    for (i, r) in records.iter().enumerate() {
        assert_eq!(r.imaging, i <= 26, "imaging at tick {}", i);
        assert_eq!(r.motion, i <= 2, "motion at tick {}", i);
        assert!(!r.illumination, "bright room never lights up (tick {})", i);
    }
    assert_eq!(st.log.count(&Call::Activate), 1);
    assert_eq!(st.log.count(&Call::Deactivate), 1);
    assert_eq!(st.log.count_classify(), 27);
    assert!(st.log.calls().iter().all(|c| !matches!(c, Call::SetIllumination(_))));
}

#[test]
fn flickering_motion_in_the_dark_keeps_light_on() {
    let mut st = Station::new(config());
    for i in 0..50 {
        let cm = if i % 2 == 0 { NEAR } else { FAR };
        st.hw.push(sample(cm, LightLevel::Dark));
    }

    let records = st.run(50);

    assert!(records.iter().all(|r| r.illumination));
    assert_eq!(st.log.count(&Call::SetIllumination(true)), 1);
    assert_eq!(st.log.count(&Call::SetIllumination(false)), 0);
    assert_eq!(st.log.count(&Call::Activate), 1);
}

#[test]
fn persistent_sensor_timeouts_degrade_once() {
    let mut st = Station::new(config());
    st.hw.push_n(timeout_sample(LightLevel::Dark), 100);

    let records = st.run(100);

    assert!(records.iter().all(|r| !r.motion && !r.imaging && !r.illumination));
    assert_eq!(
        st.log.calls(),
        vec![Call::Notify(StatusNotice::SensorDegraded(SensorKind::Distance))]
    );
    assert!(st.orch.health().is_degraded(SensorKind::Distance));

    st.hw.push(sample(FAR, LightLevel::Dark));
    st.tick();
    st.tick();
    assert_eq!(
        st.log.count(&Call::Notify(StatusNotice::SensorRecovered(SensorKind::Distance))),
        1
    );
}

// ── Lifecycle behaviour ───────────────────────────────────────

#[test]
fn steady_presence_issues_each_command_once() {
    let mut st = Station::new(config());
    st.hw.push_n(sample(NEAR, LightLevel::Dark), 40);

    st.run(40);

    assert_eq!(
        st.log
            .calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Classify(_)))
            .collect::<Vec<_>>(),
        vec![Call::SetIllumination(true), Call::Activate]
    );
}

#[test]
fn second_trigger_restarts_window() {
    let mut st = Station::new(SystemConfig {
        illumination_duration_ms: 5_000,
        ..config()
    });
    // Object at t=0 and t=4s only.
    st.hw.push(sample(NEAR, LightLevel::Dark));
    st.hw.push_n(sample(FAR, LightLevel::Dark), 19);
    st.hw.push(sample(NEAR, LightLevel::Dark));
    st.hw.push_n(sample(FAR, LightLevel::Dark), 40);

    let records = st.run(60);

    // On through t=8.8s (tick 44), off from t=9s (tick 45).
    assert!(records[..=44].iter().all(|r| r.illumination && r.imaging));
    assert!(records[45..].iter().all(|r| !r.illumination && !r.imaging));
    assert_eq!(st.log.count(&Call::SetIllumination(true)), 1);
    assert_eq!(st.log.count(&Call::SetIllumination(false)), 1);
}

#[test]
fn invalid_reading_never_counts_as_presence() {
    let mut st = Station::new(config());
    let bogus = SensorSample {
        distance: DistanceReading {
            distance_cm: 5.0,
            valid: false,
        },
        light: LightLevel::Dark,
        distance_fault: None,
        light_fault: None,
    };
    st.hw.push_n(bogus, 20);

    let records = st.run(20);

    assert!(records.iter().all(|r| !r.motion && !r.imaging && !r.illumination));
    assert!(st.log.calls().is_empty());
}

#[test]
fn threshold_is_strict() {
    let mut st = Station::new(config());
    st.hw.push(sample(50.0, LightLevel::Dark));
    assert!(!st.tick().motion);
    st.hw.push(sample(49.9, LightLevel::Dark));
    assert!(st.tick().motion);
}

#[test]
fn light_only_when_dark_and_present() {
    let mut st = Station::new(config());
    st.hw.push_n(sample(NEAR, LightLevel::Bright), 5);
    st.hw.push(sample(FAR, LightLevel::Dark));
    st.hw.push(sample(NEAR, LightLevel::Dark));

    let records = st.run(7);

    assert!(records[..6].iter().all(|r| !r.illumination));
    assert!(records[..6].iter().all(|r| r.imaging));
    assert!(records[6].illumination);
}

#[test]
fn light_window_outlives_light_change() {
    let mut st = Station::new(config());
    st.hw.push(sample(NEAR, LightLevel::Dark));
    st.hw.push_n(sample(NEAR, LightLevel::Bright), 30);

    let records = st.run(31);

    // Activated at t=0, never refreshed once the room is bright.
    assert!(records[..25].iter().all(|r| r.illumination));
    assert!(records[25..].iter().all(|r| !r.illumination));
    // Imaging keeps refreshing on presence alone.
    assert!(records.iter().all(|r| r.imaging));
}

#[test]
fn each_window_gets_a_new_id() {
    let mut st = Station::new(config());
    st.hw.push(sample(NEAR, LightLevel::Bright));
    st.hw.push_n(sample(FAR, LightLevel::Bright), 30);
    st.hw.push(sample(NEAR, LightLevel::Bright));
    st.run(32);

    let windows: Vec<u32> = st
        .events
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::ImagingChanged { active: true, window } => Some(*window),
            _ => None,
        })
        .collect();
    assert_eq!(windows.len(), 2);
    assert!(windows[1] > windows[0]);
    assert!(st.log.calls().contains(&Call::Classify(windows[1])));
}

// ── Classification ────────────────────────────────────────────

#[test]
fn last_result_survives_empty_frames_and_windows() {
    let mut st = Station::new(config());
    st.imaging
        .answer(None)
        .answer(result("PLASTIC", 0.91))
        .answer(None);
    st.hw.push_n(sample(NEAR, LightLevel::Bright), 3);
    st.hw.push_n(sample(FAR, LightLevel::Bright), 30);

    let records = st.run(33);

    assert_eq!(records[0].last_result, None);
    let label = |r: &StatusRecord| r.last_result.as_ref().map(|c| c.label.to_string());
    assert!(records[1..].iter().all(|r| label(r).as_deref() == Some("PLASTIC")));
    assert!(!records[32].imaging);

    // A new window keeps showing the old result until a new one arrives.
    st.imaging.answer(None).answer(result("PAPER", 0.7));
    st.hw.push_n(sample(NEAR, LightLevel::Bright), 2);
    let next = st.run(2);
    assert_eq!(label(&next[0]).as_deref(), Some("PLASTIC"));
    assert_eq!(label(&next[1]).as_deref(), Some("PAPER"));
    assert_eq!(st.orch.state().last_result, result("PAPER", 0.7));
}

#[test]
fn classify_only_inside_window() {
    let mut st = Station::new(config());
    st.hw.push_n(sample(FAR, LightLevel::Bright), 10);
    st.run(10);
    assert_eq!(st.log.count_classify(), 0);

    st.hw.push(sample(NEAR, LightLevel::Bright));
    st.hw.push_n(sample(FAR, LightLevel::Bright), 40);
    st.tick();
    assert_eq!(st.log.count_classify(), 1);

    // Window opened at t=2s closes at t=7s; `MockImaging` panics on any
    // classify while inactive.
    st.run(40);
    assert_eq!(st.log.count_classify(), 25);
}

#[test]
fn classify_interval_throttles_requests() {
    let mut st = Station::new(SystemConfig {
        classify_interval_ms: 1_000,
        ..config()
    });
    st.hw.push_n(sample(NEAR, LightLevel::Bright), 11);

    st.run(11);

    // t = 0, 1000, 2000
    assert_eq!(st.log.count_classify(), 3);
}

#[test]
fn classification_events_follow_results() {
    let mut st = Station::new(config());
    st.imaging.answer(result("GLASS", 0.88));
    st.hw.push(sample(NEAR, LightLevel::Bright));
    st.tick();

    assert_eq!(
        st.events.events,
        vec![
            AppEvent::Started,
            AppEvent::ImagingChanged {
                active: true,
                window: 1
            },
            AppEvent::Classified(ClassificationResult::new("GLASS", 0.88)),
        ]
    );
}

// ── Faults ────────────────────────────────────────────────────

#[test]
fn failed_light_command_is_retried_on_next_edge() {
    let mut st = Station::new(config());
    st.hw.fail_illumination = 1;
    st.hw.push(sample(NEAR, LightLevel::Dark));
    st.hw.push_n(sample(FAR, LightLevel::Dark), 30);

    let records = st.run(31);

    // Intended state is kept even though the strip never switched on.
    assert!(records[0].illumination);
    assert!(!st.hw.illumination_on);
    assert!(!records[30].illumination);

    st.hw.push(sample(NEAR, LightLevel::Dark));
    st.tick();
    assert!(st.hw.illumination_on);
    assert_eq!(st.log.count(&Call::SetIllumination(true)), 2);
    assert_eq!(st.log.count(&Call::SetIllumination(false)), 1);
}

#[test]
fn camera_that_failed_to_start_is_never_classified() {
    let mut st = Station::new(config());
    st.imaging.fail_activate = 1;
    st.hw
        .push_n(sample(NEAR, LightLevel::Bright), 10)
        .push_n(sample(FAR, LightLevel::Bright), 30);

    // `MockImaging` panics on classify while inactive.
    let records = st.run(40);

    // Window opened at t=0, last refreshed at t=1.8s, closed at t=6.8s.
    assert!(records[..=33].iter().all(|r| r.imaging));
    assert!(records[34..].iter().all(|r| !r.imaging));
    assert_eq!(st.log.count_classify(), 0);
    assert_eq!(st.log.count(&Call::Activate), 1);
    assert_eq!(st.log.count(&Call::Deactivate), 1);

    // The next window issues activate again and classifies.
    st.hw.push(sample(NEAR, LightLevel::Bright));
    st.tick();
    assert_eq!(st.log.count(&Call::Activate), 2);
    assert!(st.imaging.active);
    assert_eq!(st.log.count_classify(), 1);
}

#[test]
fn failed_camera_stop_does_not_block_next_window() {
    let mut st = Station::new(config());
    st.imaging.fail_deactivate = 1;
    st.hw
        .push(sample(NEAR, LightLevel::Bright))
        .push_n(sample(FAR, LightLevel::Bright), 30)
        .push(sample(NEAR, LightLevel::Bright));

    let records = st.run(32);

    assert!(!records[30].imaging);
    assert!(records[31].imaging);
    assert_eq!(st.log.count(&Call::Deactivate), 1);
    assert_eq!(st.log.count(&Call::Activate), 2);
}

#[test]
fn render_failure_does_not_stop_orchestration() {
    let mut st = Station::new(config());
    st.status.fail_render = true;
    st.hw.push_n(sample(NEAR, LightLevel::Dark), 3);

    let records = st.run(3);

    assert!(records.iter().all(|r| r.imaging && r.illumination));
    assert!(st.status.records.is_empty());
}

// ── Shutdown ──────────────────────────────────────────────────

#[test]
fn release_switches_everything_off_once() {
    let mut st = Station::new(config());
    st.hw.push_n(sample(NEAR, LightLevel::Dark), 3);
    st.run(3);
    st.log.clear();

    st.release();
    st.release();

    assert_eq!(
        st.log.calls(),
        vec![Call::SetIllumination(false), Call::Deactivate]
    );
    assert!(!st.hw.illumination_on);
    assert!(!st.imaging.active);
    assert_eq!(
        st.events
            .events
            .iter()
            .filter(|e| **e == AppEvent::Released)
            .count(),
        1
    );
    let status = st.orch.status();
    assert!(!status.illumination && !status.imaging);
}

#[test]
fn release_when_idle_sends_no_commands() {
    let mut st = Station::new(config());
    st.run(5);
    st.release();
    assert!(st.log.calls().is_empty());
    assert!(st.orch.is_released());
}
