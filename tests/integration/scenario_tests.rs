//! End-to-end scenarios: orchestrator line in, LED frame / JSON line out.

use evacguard::app::boot::BootReport;
use evacguard::app::ports::TimePort;
use evacguard::config::SystemConfig;
use evacguard::drivers::led_patterns::{AlertRenderer, Pattern};
use evacguard::drivers::led_strip::{BLACK, GREEN, GREEN_DIM, GREEN_DIMMEST};
use evacguard::state::{AlertLevel, Vec3};
use evacguard::tasks::actuator::{ActuatorTask, SWEEP_HOLD_MS, SWEEP_STEP_MS};
use evacguard::zones::{LED_COUNT, ZONES, ZONE_COUNT};
use serde_json::json;

use crate::mock_hw::{CaptureSink, MockClock, MockStrip};
use crate::rig::{send, Rig};

#[test]
fn boot_reports_components_in_order_and_sweeps_strip() {
    let rig = Rig::new();
    let clock = MockClock::new();

    let mut boot = BootReport::begin(CaptureSink::default());
    assert!(boot.component("gsm", Ok::<_, &str>(())).is_some());
    assert!(boot.component("mpu6050", Err::<(), _>("I2C bus fault")).is_none());
    assert!(boot.component("water_sensor", Ok::<_, &str>(())).is_some());
    let strip = boot
        .strip(Ok::<_, &str>(MockStrip::default()), LED_COUNT, ZONE_COUNT)
        .unwrap();

    let renderer = AlertRenderer::<LED_COUNT, ZONE_COUNT>::new(ZONES, 128).unwrap();
    let mut act = ActuatorTask::new(renderer, strip, &rig.state, &rig.zones);
    act.boot_sweep(&clock).unwrap();

    assert_eq!(boot.failures(), 1);
    let sink = boot.complete();
    assert_eq!(
        sink.events,
        vec![
            json!({"event":"boot","status":"initializing"}),
            json!({"event":"init","component":"gsm","status":"ok"}),
            json!({"event":"error","component":"mpu6050","message":"init_failed"}),
            json!({"event":"init","component":"water_sensor","status":"ok"}),
            json!({"event":"init","component":"led_strip","leds":60,"zones":4}),
            json!({"event":"boot","status":"complete","ready":true}),
        ]
    );

    // One frame per LED, each lighting one more in green, then a dark frame.
    let frames = &act.strip().frames;
    assert_eq!(frames.len(), LED_COUNT + 1);
    for (i, (pixels, _)) in frames[..LED_COUNT].iter().enumerate() {
        let lit = pixels.iter().filter(|&&p| p == GREEN).count();
        assert_eq!(lit, i + 1, "frame {i}");
        assert_eq!(pixels[i], GREEN);
    }
    assert!(frames[LED_COUNT].0.iter().all(|&p| p == BLACK));
    assert_eq!(
        clock.uptime_ms(),
        LED_COUNT as u64 * u64::from(SWEEP_STEP_MS) + u64::from(SWEEP_HOLD_MS)
    );

    // The pattern loop starts afresh after the sweep.
    assert_eq!(act.step(), 100);
    assert_eq!(act.renderer().current_pattern(), Some(Pattern::Solid));
}

#[test]
fn ping_answers_pong_with_uptime() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    send(&mut cmd, r#"{"cmd":"ping"}"#, 1_234);

    let pongs: Vec<_> = cmd.sink().with_event("pong").collect();
    assert_eq!(pongs, vec![&json!({"event":"pong","uptime":1234})]);
}

#[test]
fn every_level_selects_its_pattern_within_one_frame() {
    let expected = [
        (0, Pattern::Solid, 100),
        (1, Pattern::BreathingAmber, 20),
        (2, Pattern::BreathingBlue, 30),
        (3, Pattern::Blink, 100),
        (4, Pattern::ConvergingChase, 50),
    ];
    let rig = Rig::new();
    let mut cmd = rig.command_task();
    let mut act = rig.actuator();

    for (code, pattern, hold) in expected {
        send(&mut cmd, &format!(r#"{{"cmd":"set_alert","alert":{code}}}"#), 0);
        assert_eq!(act.step(), hold, "hold for alert {code}");
        assert_eq!(act.renderer().current_pattern(), Some(pattern));
    }
    let acks: Vec<u64> = cmd
        .sink()
        .with_event("alert_set")
        .filter_map(|e| e["alert"].as_u64())
        .collect();
    assert_eq!(acks, vec![0, 1, 2, 3, 4]);
}

#[test]
fn evacuate_runs_comets_toward_lit_exit() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();
    let mut act = rig.actuator();
    send(&mut cmd, r#"{"cmd":"set_alert","alert":4}"#, 0);

    let exit = ZONES.get(usize::from(rig.config.default_exit_zone)).unwrap();
    for tick in 0..5usize {
        act.step();
        let (pixels, _) = act.strip().last().unwrap().clone();

        assert!(exit.range().all(|i| pixels[i] == GREEN), "exit lit at tick {tick}");

        for z in 0..usize::from(rig.config.default_exit_zone) {
            let span = ZONES.get(z).unwrap();
            let lit: Vec<usize> = span.range().filter(|&i| pixels[i] != BLACK).collect();
            assert_eq!(lit.len(), (tick + 1).min(3), "zone {z} comet length");
            assert_eq!(pixels[span.start + tick], GREEN, "zone {z} head");
            if tick >= 1 {
                assert_eq!(pixels[span.start + tick - 1], GREEN_DIM);
            }
            if tick >= 2 {
                assert_eq!(pixels[span.start + tick - 2], GREEN_DIMMEST);
            }
        }
    }
}

#[test]
fn invalid_alert_changes_nothing() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    send(&mut cmd, r#"{"cmd":"set_alert","alert":2}"#, 0);
    cmd.sink_mut().clear();

    send(&mut cmd, r#"{"cmd":"set_alert","alert":9}"#, 100);
    send(&mut cmd, r#"{"cmd":"set_alert","alert":-1}"#, 200);

    assert_eq!(cmd.sink().with_event("alert_set").count(), 0);
    assert_eq!(rig.state.alert().unwrap().level, AlertLevel::Messaging);
    let frames = cmd.sink().telemetry();
    assert!(!frames.is_empty());
    assert!(frames.iter().all(|t| t["alert"] == json!(2)));
}

#[test]
fn out_of_range_is_reported_with_field_by_default() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();
    send(&mut cmd, r#"{"cmd":"set_alert","alert":9}"#, 0);
    let err = cmd.sink().with_event("error").next().unwrap().clone();
    assert_eq!(err, json!({"event":"error","message":"out_of_range","field":"alert"}));
}

#[test]
fn out_of_range_report_can_be_suppressed() {
    let rig = Rig::with_config(SystemConfig {
        report_rejected_params: false,
        ..SystemConfig::default()
    });
    let mut cmd = rig.command_task();

    send(&mut cmd, r#"{"cmd":"set_zone","zone":7,"r":1,"g":2,"b":3}"#, 0);
    assert!(cmd.sink().notices().is_empty());
    assert!(rig.zones.try_receive().is_err());

    // Malformed input is still reported.
    send(&mut cmd, "{oops", 10);
    assert_eq!(cmd.sink().errors(), vec!["json_parse_failed"]);
}

#[test]
fn missing_imu_reports_zero_motion() {
    use evacguard::sensors::flame::FlameSensor;
    use evacguard::sensors::imu::Mpu6050;
    use evacguard::sensors::water_level::WaterLevelSensor;
    use evacguard::sensors::SensorHub;
    use evacguard::tasks::sampling::SamplingTask;

    use crate::mock_hw::MockI2c;

    let rig = Rig::with_config(SystemConfig {
        flame_fitted: false,
        ..SystemConfig::default()
    });
    let imu = Mpu6050::init(MockI2c::absent()).ok();
    assert!(imu.is_none());

    let hub = SensorHub::new(
        WaterLevelSensor::new(6, rig.config.water_adc_full_scale),
        FlameSensor::new(35, rig.config.flame_polarity, rig.config.flame_fitted),
        imu,
    );
    let mut sampling = SamplingTask::new(
        evacguard::adapters::hardware::HardwareAdapter::new(hub),
        &rig.state,
        rig.config.sample_period_ms,
        0,
    );
    let mut cmd = rig.command_task();

    for t in (0..1_000).step_by(20) {
        sampling.poll(t);
        cmd.poll(t);
    }

    let frames = cmd.sink().telemetry();
    assert_eq!(frames.len(), 10);
    let zero = serde_json::to_value(Vec3::ZERO).unwrap();
    for f in frames {
        assert_eq!(f["gyro"], zero);
        assert_eq!(f["accel"], zero);
        assert!(f.get("fire").is_none(), "unfitted flame sensor omitted");
    }
    assert!(!rig.state.snapshot().unwrap().reading.imu_ok);
}
