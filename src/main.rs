//! EvacGuard Firmware — Main Entry Point
//!
//! Brings up the peripherals, reports each component on the orchestrator
//! link, runs the LED self-test, then hands everything to four core-pinned
//! task threads.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                       Adapters (outer ring)                      │
//! │  HardwareAdapter   Ws2812Strip   UartLink×2   JsonLineSink  Time │
//! │                                                                  │
//! │  ─────────────────── Port Trait Boundary ─────────────────────   │
//! │                                                                  │
//! │  core 0: SamplingTask ──▶ SharedState ◀── CommandTask(AlertSvc)  │
//! │  core 1: ActuatorTask ◀── SharedState      │ ZoneOverride        │
//! │          ActuatorTask ◀────────────────────┘                     │
//! │          ModemTask    ◀── ModemJob ── CommandTask ◀── ModemEvent │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use core::time::Duration;

use anyhow::{Context, Result};
use esp_idf_hal::gpio::AnyIOPin;
use esp_idf_hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_hal::peripherals::Peripherals;
use esp_idf_hal::rmt::config::TransmitConfig;
use esp_idf_hal::rmt::TxRmtDriver;
use esp_idf_hal::uart::{config::Config as UartConfig, UartDriver};
use esp_idf_hal::units::Hertz;
use log::{error, info, warn, LevelFilter};

use evacguard::adapters::hardware::HardwareAdapter;
use evacguard::adapters::serial_sink::JsonLineSink;
use evacguard::adapters::time::Esp32TimeAdapter;
use evacguard::adapters::uart::UartLink;
use evacguard::adapters::ws2812::Ws2812Strip;
use evacguard::app::boot::BootReport;
use evacguard::app::ports::TimePort;
use evacguard::app::service::{AlertService, Links};
use evacguard::config::SystemConfig;
use evacguard::drivers::gsm::{GsmModem, GsmTiming};
use evacguard::drivers::hw_init;
use evacguard::drivers::led_patterns::AlertRenderer;
use evacguard::drivers::task_pin::{
    spawn_on_core, ACTUATOR_TASK, COMMAND_TASK, MODEM_TASK, SAMPLING_TASK,
};
use evacguard::pins;
use evacguard::protocol::channels::{HANGUP, MODEM_EVENTS, MODEM_JOBS, ZONE_OVERRIDES};
use evacguard::sensors::flame::FlameSensor;
use evacguard::sensors::imu::Mpu6050;
use evacguard::sensors::water_level::WaterLevelSensor;
use evacguard::sensors::SensorHub;
use evacguard::state::SharedState;
use evacguard::tasks::actuator::ActuatorTask;
use evacguard::tasks::command::CommandTask;
use evacguard::tasks::modem::ModemTask;
use evacguard::tasks::sampling::SamplingTask;
use evacguard::zones::{LED_COUNT, ZONES, ZONE_COUNT};

/// Board overrides baked in at build time, e.g.
/// `EVACGUARD_CONFIG='{"flame_fitted":false}' cargo build`.
fn load_config() -> SystemConfig {
    match option_env!("EVACGUARD_CONFIG").map(SystemConfig::from_json) {
        None => SystemConfig::default(),
        Some(Ok(cfg)) => {
            info!("Config: build-time overrides applied");
            cfg
        }
        Some(Err(e)) => {
            warn!("Config: {} — using defaults", e);
            SystemConfig::default()
        }
    }
}

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    log::set_max_level(LevelFilter::Info);

    info!("EvacGuard v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config();
    let clock = Esp32TimeAdapter::new();
    let peripherals = Peripherals::take()?;

    // ── 2. Orchestrator link (the only fatal dependency) ──────
    let uart0 = UartDriver::new(
        peripherals.uart0,
        peripherals.pins.gpio1, // pins::UART_TX_GPIO
        peripherals.pins.gpio3, // pins::UART_RX_GPIO
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(config.serial_baud)),
    )
    .context("orchestrator UART init failed")?;
    let link = UartLink::leak(uart0);
    let mut boot = BootReport::begin(JsonLineSink::new(link));

    // ── 3. Cellular module ────────────────────────────────────
    let uart2 = UartDriver::new(
        peripherals.uart2,
        peripherals.pins.gpio17, // pins::GSM_TX_GPIO
        peripherals.pins.gpio16, // pins::GSM_RX_GPIO
        Option::<AnyIOPin>::None,
        Option::<AnyIOPin>::None,
        &UartConfig::default().baudrate(Hertz(config.modem_baud)),
    );
    let timing = GsmTiming {
        gap_ms: config.modem_directive_gap_ms,
        submit_wait_ms: config.sms_submit_wait_ms,
    };
    let modem = boot.component(
        "gsm",
        uart2.map(|uart| GsmModem::new(UartLink::leak(uart), timing)),
    );

    // ── 4. Sensors ────────────────────────────────────────────
    let imu = boot.component(
        "mpu6050",
        I2cDriver::new(
            peripherals.i2c0,
            peripherals.pins.gpio21, // pins::I2C_SDA_GPIO
            peripherals.pins.gpio22, // pins::I2C_SCL_GPIO
            &I2cConfig::new().baudrate(Hertz(pins::I2C_FREQ_HZ)),
        )
        .map_err(anyhow::Error::from)
        .and_then(|bus| Mpu6050::init(bus).map_err(|(_bus, e)| anyhow::Error::msg(e))),
    );
    if boot.component("water_sensor", hw_init::init_peripherals()).is_none() {
        error!("water/flame inputs unreliable");
    }

    let hub = SensorHub::new(
        WaterLevelSensor::new(pins::WATER_ADC_CHANNEL, config.water_adc_full_scale),
        FlameSensor::new(pins::FLAME_GPIO, config.flame_polarity, config.flame_fitted),
        imu,
    );
    let hw = HardwareAdapter::new(hub);

    // ── 5. LED strip ──────────────────────────────────────────
    let strip = boot.strip(
        TxRmtDriver::new(
            peripherals.rmt.channel0,
            peripherals.pins.gpio5, // pins::LED_DATA_GPIO
            &TransmitConfig::new().clock_divider(1),
        )
        .and_then(Ws2812Strip::new),
        LED_COUNT,
        ZONE_COUNT,
    );

    // ── 6. Shared state ───────────────────────────────────────
    let state: &'static SharedState = Box::leak(Box::new(SharedState::new(
        Duration::from_millis(u64::from(config.lock_timeout_ms)),
        config.default_exit_zone,
    )));

    // ── 7. Strip self-test, then the task threads ─────────────
    let renderer = AlertRenderer::<LED_COUNT, ZONE_COUNT>::new(ZONES, config.led_brightness)?;
    let actuator = strip.map(|strip| ActuatorTask::new(renderer, strip, state, &ZONE_OVERRIDES));
    let actuator = actuator.map(|mut actuator| {
        if let Err(e) = actuator.boot_sweep(&clock) {
            warn!("LED self-test aborted: {}", e);
        }
        actuator
    });

    let period = config.sample_period_ms;
    spawn_on_core(SAMPLING_TASK, move || {
        SamplingTask::new(hw, state, period, clock.uptime_ms()).run(&clock)
    })?;

    if let Some(actuator) = actuator {
        spawn_on_core(ACTUATOR_TASK, move || actuator.run(&clock))?;
    }

    if let Some(modem) = modem {
        let ring_secs = config.call_ring_secs;
        spawn_on_core(MODEM_TASK, move || {
            ModemTask::new(modem, clock, &MODEM_JOBS, &MODEM_EVENTS, &HANGUP, ring_secs).run()
        })?;
    }

    // ── 8. Command task (last: it owns the sink from here on) ─
    let links = Links {
        zones: &ZONE_OVERRIDES,
        modem_jobs: &MODEM_JOBS,
        modem_events: &MODEM_EVENTS,
        hangup: &HANGUP,
    };
    let telemetry_ms = config.telemetry_period_ms;
    let sink = boot.complete();
    spawn_on_core(COMMAND_TASK, move || {
        let service = AlertService::new(state, links, &config, ZONE_COUNT);
        CommandTask::new(link, sink, service, telemetry_ms, clock.uptime_ms()).run(&clock)
    })?;

    info!("System ready, tasks running");
    log::set_max_level(LevelFilter::Warn);

    loop {
        std::thread::park();
    }
}
