//! Fuzz target: `commands::parse`
//!
//! Any byte string must yield either a validated command or a typed error;
//! accepted commands must respect the zone table and text limits.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use evacguard::app::commands::{parse, Command, MAX_NUMBER_LEN, MAX_SMS_LEN};
use evacguard::state::ActiveZone;
use evacguard::zones::ZONE_COUNT;
use libfuzzer_sys::fuzz_target;

fn zone_ok(z: ActiveZone) -> bool {
    match z {
        ActiveZone::Zone(i) => usize::from(i) < ZONE_COUNT,
        ActiveZone::All => true,
    }
}

fuzz_target!(|data: &[u8]| {
    let Ok(cmd) = parse(data, ZONE_COUNT) else {
        return;
    };
    match cmd {
        Command::SetAlert { exit, .. } => assert!(exit.map_or(true, zone_ok)),
        Command::SetExit(exit) => assert!(zone_ok(exit)),
        Command::SetZone { zone, .. } => assert!(usize::from(zone) < ZONE_COUNT),
        Command::GsmCall(number) => assert!(number.len() <= MAX_NUMBER_LEN),
        Command::GsmSms { number, message } => {
            assert!(number.len() <= MAX_NUMBER_LEN);
            assert!(message.len() <= MAX_SMS_LEN);
            assert!(!message.bytes().any(|b| b == 0x1A), "Ctrl-Z would end the prompt");
        }
        Command::GsmHangup | Command::Ping => {}
    }
});
