//! ESP32 gate controller firmware.
//!
//! This is the main entry point for the physical gate controller board.
//! It wires the board I/O into a [`GateRunner`] and runs its fixed-rate
//! control loop forever. Each cycle:
//! - Samples limit switches, obstacle loop, buttons and remote once
//! - Runs gate tracking, pulse arbitration, security and siren logic
//! - Writes relay, siren, buzzer, traffic lamps and status LEDs once
//! - Services WiFi and the HTTP admin mailbox (if enabled)
//!
//! # Build
//!
//! ```bash
//! # GPIO only
//! cargo build --release --features esp32
//!
//! # With WiFi
//! WIFI_SSID=... WIFI_PASSWORD=... cargo build --release --features wifi
//!
//! # With WiFi + HTTP admin
//! cargo build --release --features esp32-http
//! ```

use esp_idf_hal::peripherals::Peripherals;
use esp_idf_svc::log::EspLogger;
use rs_gatekeeper::hal::esp32::{take_board_io, Esp32Clock};
use rs_gatekeeper::hal::LogEventLog;
use rs_gatekeeper::{Config, GateRunner, WebConfig, WifiConfig};

fn main() -> anyhow::Result<()> {
    // Initialize ESP-IDF
    esp_idf_hal::sys::link_patches();
    EspLogger::initialize_default();

    println!();
    println!("================================");
    println!("  rs-gatekeeper Gate Controller");
    println!("================================");
    println!();

    // =========================================================================
    // Configuration
    // =========================================================================
    let config = Config::default()
        .with_wifi(
            WifiConfig::default()
                .with_ssid(option_env!("WIFI_SSID").unwrap_or(""))
                .with_password(option_env!("WIFI_PASSWORD").unwrap_or("")),
        )
        .with_web(WebConfig::default().with_port(80));

    let peripherals = Peripherals::take()?;

    // =========================================================================
    // Board I/O
    // =========================================================================
    let (inputs, outputs) = take_board_io(peripherals.pins)?;
    println!("[OK] GPIO initialized, outputs low");

    // =========================================================================
    // Connectivity
    // =========================================================================
    #[cfg(feature = "wifi")]
    let network = {
        use esp_idf_svc::eventloop::EspSystemEventLoop;
        use esp_idf_svc::nvs::EspDefaultNvsPartition;
        use rs_gatekeeper::hal::esp32::Esp32Wifi;

        let sysloop = EspSystemEventLoop::take()?;
        let nvs = EspDefaultNvsPartition::take()?;
        let wifi = Esp32Wifi::new(peripherals.modem, sysloop, Some(nvs), &config.wifi)?;
        println!("[OK] WiFi driver ready");
        wifi
    };

    #[cfg(not(feature = "wifi"))]
    let network = {
        println!("[SKIP] WiFi disabled");
        rs_gatekeeper::Offline
    };

    // =========================================================================
    // Admin interface
    // =========================================================================
    #[cfg(feature = "esp32-http")]
    let (admin, _server) = {
        use rs_gatekeeper::hal::esp32::Esp32HttpServer;
        use rs_gatekeeper::services::{SharedGateState, WebAdmin};
        use std::sync::Arc;

        let shared = Arc::new(SharedGateState::new());
        let server = Esp32HttpServer::new(&config.web, Arc::clone(&shared))?;
        println!("[OK] HTTP admin on port {}", config.web.port);
        (WebAdmin::new(shared), server)
    };

    #[cfg(not(feature = "esp32-http"))]
    let admin = {
        println!("[SKIP] HTTP admin disabled");
        rs_gatekeeper::Offline
    };

    // =========================================================================
    // Control loop
    // =========================================================================
    let mut runner = GateRunner::new(
        &config,
        Esp32Clock::new(),
        inputs,
        outputs,
        LogEventLog::default(),
        network,
        admin,
    );
    runner.begin();

    println!();
    println!("Device:   {}", config.device.name);
    println!("Cycle:    {} ms", config.timing.cycle_interval_ms);
    println!("Program:  hold 1s learn, 5s wifi reset, 10s log reset, 15s factory reset");
    println!();

    runner.run_forever()
}
