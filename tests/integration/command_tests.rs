//! Command path: decoder → service → channels, with acks on the sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use evacguard::config::SystemConfig;
use evacguard::drivers::led_strip::BLUE;
use evacguard::error::ModemError;
use evacguard::protocol::channels::{ModemEvent, ModemJob, ZoneOverride, JOB_DEPTH};
use evacguard::state::{ActiveZone, SensorReading, SharedState, Vec3};
use evacguard::tasks::command::STATS_EVERY_FRAMES;
use serde_json::json;

use crate::rig::{send, Rig};

#[test]
fn flood_is_rate_limited() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    for _ in 0..60 {
        cmd.link_mut().feed(b"{\"cmd\":\"ping\"}\n");
    }
    // Drain in several polls; one poll reads a bounded amount.
    for _ in 0..4 {
        cmd.poll(0);
    }

    let pongs = cmd.sink().with_event("pong").count();
    let limited = cmd.sink().errors().iter().filter(|m| *m == "rate_limited").count();
    assert!(pongs >= 20, "burst allowance honoured, got {pongs}");
    assert!(pongs < 60, "flood throttled");
    assert_eq!(pongs + limited, 60);
    assert_eq!(cmd.service().stats().rate_limited as usize, limited);
}

#[test]
fn default_limit_passes_a_full_burst_of_mixed_commands() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();
    let burst = rig.config.command_burst as usize;

    for i in 0..burst {
        let line = match i % 3 {
            0 => r#"{"cmd":"set_alert","alert":1}"#,
            1 => r#"{"cmd":"set_exit","zone":2}"#,
            _ => r#"{"cmd":"ping"}"#,
        };
        cmd.link_mut().feed(line.as_bytes());
        cmd.link_mut().feed(b"\n");
    }
    for _ in 0..4 {
        cmd.poll(0);
    }

    assert!(cmd.sink().errors().is_empty(), "{:?}", cmd.sink().errors());
    assert_eq!(cmd.service().stats().accepted as usize, burst);
    assert_eq!(cmd.service().stats().rate_limited, 0);
}

#[test]
fn rate_limiting_can_be_disabled() {
    let rig = Rig::with_config(SystemConfig {
        command_rate_per_sec: 0,
        ..SystemConfig::default()
    });
    let mut cmd = rig.command_task();
    for _ in 0..50 {
        cmd.link_mut().feed(b"{\"cmd\":\"ping\"}\n");
    }
    for _ in 0..4 {
        cmd.poll(0);
    }
    assert_eq!(cmd.sink().with_event("pong").count(), 50);
}

#[test]
fn oversized_line_is_dropped_and_next_line_parses() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    let mut junk = vec![b'x'; 600];
    junk.push(b'\n');
    cmd.link_mut().feed(&junk);
    cmd.link_mut().feed(b"{\"cmd\":\"ping\"}\n");
    cmd.poll(5);

    assert_eq!(cmd.sink().errors(), vec!["line_too_long"]);
    assert_eq!(cmd.sink().with_event("pong").count(), 1);
}

#[test]
fn line_split_across_reads_is_reassembled() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    cmd.link_mut().feed(b"{\"cmd\":\"set_al");
    cmd.poll(0);
    assert_eq!(cmd.sink().with_event("alert_set").count(), 0);

    cmd.link_mut().feed(b"ert\",\"alert\":1}\r\n");
    cmd.poll(10);
    assert_eq!(cmd.sink().with_event("alert_set").count(), 1);
}

#[test]
fn set_zone_queues_override_and_acks() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    send(&mut cmd, r#"{"cmd":"set_zone","zone":1,"r":0,"g":0,"b":255}"#, 0);

    assert_eq!(
        rig.zones.try_receive().ok(),
        Some(ZoneOverride { zone: 1, colour: BLUE })
    );
    assert_eq!(cmd.sink().notices(), vec![&json!({"event":"zone_set","zone":1})]);
}

#[test]
fn set_zone_reports_busy_when_queue_full() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    for _ in 0..5 {
        send(&mut cmd, r#"{"cmd":"set_zone","zone":0,"r":9}"#, 0);
    }
    assert_eq!(cmd.sink().with_event("zone_set").count(), 4);
    assert_eq!(cmd.sink().errors(), vec!["zone_busy"]);
}

#[test]
fn set_exit_updates_state() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    send(&mut cmd, r#"{"cmd":"set_exit","zone":0}"#, 0);
    send(&mut cmd, r#"{"cmd":"set_exit","zone":-1}"#, 0);

    let zones: Vec<_> = cmd.sink().with_event("exit_set").map(|e| e["zone"].clone()).collect();
    assert_eq!(zones, vec![json!(0), json!(-1)]);
    assert_eq!(rig.state.alert().unwrap().exit, ActiveZone::All);
}

#[test]
fn set_alert_with_exit_acks_both() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    send(&mut cmd, r#"{"cmd":"set_alert","alert":4,"exit":2}"#, 0);

    let names: Vec<_> = cmd
        .sink()
        .notices()
        .iter()
        .map(|e| e["event"].as_str().unwrap().to_owned())
        .collect();
    assert_eq!(names, vec!["alert_set", "exit_set"]);
    assert_eq!(rig.state.alert().unwrap().exit, ActiveZone::Zone(2));
}

#[test]
fn malformed_missing_and_unknown_are_reported() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    send(&mut cmd, "{oops", 0);
    send(&mut cmd, r#"{"alert":1}"#, 0);
    send(&mut cmd, r#"{"cmd":"self_destruct"}"#, 0);
    send(&mut cmd, "   ", 0);

    assert_eq!(
        cmd.sink().errors(),
        vec!["json_parse_failed", "missing_field", "unknown_command"]
    );
    let missing = cmd.sink().with_event("error").nth(1).unwrap().clone();
    assert_eq!(missing["field"], json!("cmd"));
}

#[test]
fn gsm_jobs_are_queued_with_acks() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    send(&mut cmd, r#"{"cmd":"gsm_call","number":"+15550100"}"#, 0);
    send(&mut cmd, r#"{"cmd":"gsm_sms","number":"112","message":"Fire in B2"}"#, 0);

    assert_eq!(
        cmd.sink().notices(),
        vec![
            &json!({"event":"gsm_call","number":"+15550100"}),
            &json!({"event":"gsm_sms","number":"112"}),
        ]
    );
    match rig.jobs.try_receive() {
        Ok(ModemJob::Call(n)) => assert_eq!(n.as_str(), "+15550100"),
        other => panic!("expected call job, got {other:?}"),
    }
    match rig.jobs.try_receive() {
        Ok(ModemJob::Sms { number, message }) => {
            assert_eq!(number.as_str(), "112");
            assert_eq!(message.as_str(), "Fire in B2");
        }
        other => panic!("expected SMS job, got {other:?}"),
    }
}

#[test]
fn modem_queue_full_reports_busy() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    for _ in 0..JOB_DEPTH + 1 {
        send(&mut cmd, r#"{"cmd":"gsm_call","number":"999"}"#, 0);
    }
    assert_eq!(cmd.sink().with_event("gsm_call").count(), JOB_DEPTH);
    assert_eq!(cmd.sink().errors(), vec!["modem_busy"]);
}

#[test]
fn invalid_number_is_rejected_without_queueing() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    send(&mut cmd, r#"{"cmd":"gsm_call","number":"12;ATH"}"#, 0);

    assert!(rig.jobs.try_receive().is_err());
    let err = cmd.sink().with_event("error").next().unwrap().clone();
    assert_eq!(err, json!({"event":"error","message":"invalid_value","field":"number"}));
}

#[test]
fn hangup_raises_signal_without_ack() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    send(&mut cmd, r#"{"cmd":"gsm_hangup"}"#, 0);

    assert!(rig.hangup.try_take().is_some());
    assert!(cmd.sink().notices().is_empty());
}

#[test]
fn modem_progress_is_relayed() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    let n = "5550100".try_into().unwrap();
    rig.events.try_send(ModemEvent::Dialing(n)).unwrap();
    rig.events.try_send(ModemEvent::HungUp).unwrap();
    rig.events.try_send(ModemEvent::SmsSent("112".try_into().unwrap())).unwrap();
    rig.events.try_send(ModemEvent::Failed(ModemError::WriteFailed)).unwrap();
    cmd.poll(0);

    assert_eq!(
        cmd.sink().notices(),
        vec![
            &json!({"event":"gsm_dialing","number":"5550100"}),
            &json!({"event":"gsm_hangup"}),
            &json!({"event":"gsm_sms_sent","to":"112"}),
            &json!({"event":"error","component":"gsm","message":"write_failed"}),
        ]
    );
}

#[test]
fn telemetry_runs_at_its_period() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    for t in (0..=1_000).step_by(10) {
        cmd.poll(t);
    }

    let ts: Vec<u64> = cmd
        .sink()
        .telemetry()
        .iter()
        .map(|f| f["ts"].as_u64().unwrap())
        .collect();
    assert_eq!(ts, (0..=1_000).step_by(100).collect::<Vec<_>>());
}

#[test]
fn telemetry_carries_latest_reading() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();

    assert!(rig.state.write_reading(SensorReading {
        water_pct: 42.0,
        accel: Vec3::new(0.0, 0.0, 9.5),
        flame: true,
        ..SensorReading::ZERO
    }));
    cmd.poll(0);

    let frame = cmd.sink().telemetry()[0].clone();
    assert_eq!(frame["water"], json!(42.0));
    assert_eq!(frame["accel"]["z"], json!(9.5));
    assert_eq!(frame["fire"], json!(true));
    assert!(frame.get("flame").is_none());
    assert_eq!(frame["alert"], json!(0));
}

#[test]
fn stats_are_logged_once_per_minute_of_telemetry() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();
    send(&mut cmd, r#"{"cmd":"ping"}"#, 0);

    // Frames at 0, 100, .., 59_800: one short of a report.
    for t in (100..=59_800).step_by(100) {
        cmd.poll(t);
    }
    assert_eq!(cmd.sink().telemetry().len() as u32, STATS_EVERY_FRAMES - 1);
    assert_eq!(cmd.stats_reports(), 0);

    cmd.poll(59_900);
    assert_eq!(cmd.stats_reports(), 1);
    assert_eq!(cmd.service().stats().accepted, 1);
}

#[test]
fn failing_link_reads_are_counted_and_telemetry_continues() {
    let rig = Rig::new();
    let mut cmd = rig.command_task();
    cmd.link_mut().fail_reads = true;
    cmd.link_mut().feed(b"{\"cmd\":\"ping\"}\n");

    cmd.poll(0);
    cmd.poll(100);

    assert_eq!(cmd.read_errors(), 2);
    assert_eq!(cmd.sink().telemetry().len(), 2);
    assert_eq!(cmd.sink().with_event("pong").count(), 0);

    cmd.link_mut().fail_reads = false;
    cmd.poll(110);
    assert_eq!(cmd.sink().with_event("pong").count(), 1);
}

#[test]
fn snapshots_are_never_torn() {
    let state = SharedState::new(Duration::from_millis(50), 3);
    let stop = AtomicBool::new(false);

    std::thread::scope(|s| {
        s.spawn(|| {
            for i in 1..=20_000u16 {
                let v = f32::from(i);
                state.write_reading(SensorReading {
                    water_pct: v,
                    water_raw: i,
                    gyro: Vec3::new(v, v, v),
                    accel: Vec3::new(v, v, v),
                    cycle: u32::from(i),
                    ..SensorReading::ZERO
                });
            }
            stop.store(true, Ordering::SeqCst);
        });
        s.spawn(|| {
            while !stop.load(Ordering::SeqCst) {
                if let Some(snap) = state.snapshot() {
                    let r = snap.reading;
                    let v = f32::from(r.water_raw);
                    assert_eq!(r.water_pct, v);
                    assert_eq!(r.cycle, u32::from(r.water_raw));
                    assert_eq!(r.gyro, Vec3::new(v, v, v));
                    assert_eq!(r.accel, Vec3::new(v, v, v));
                }
            }
        });
    });
}
