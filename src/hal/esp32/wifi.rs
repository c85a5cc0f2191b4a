//! WiFi connection management for ESP32.
//!
//! Station-mode connectivity using esp-idf-svc, exposed through the
//! [`Connectivity`] trait so the control loop can service it without
//! blocking.
//!
//! # Example
//!
//! ```ignore
//! use rs_gatekeeper::hal::esp32::Esp32Wifi;
//! use rs_gatekeeper::config::WifiConfig;
//! use rs_gatekeeper::traits::Connectivity;
//!
//! let config = WifiConfig::default()
//!     .with_ssid("MyNetwork")
//!     .with_password("secret123");
//!
//! let mut wifi = Esp32Wifi::new(modem, sysloop, nvs, &config)?;
//! wifi.begin(); // connects and waits for DHCP
//! log::info!("IP: {:?}", wifi.ip_addr());
//! ```

use crate::config::WifiConfig;
use crate::hal::esp32::Esp32Clock;
use crate::timer::Timer;
use crate::traits::{Clock, Connectivity};
use esp_idf_hal::modem::Modem;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::{BlockingWifi, ClientConfiguration, Configuration, EspWifi};
use std::net::Ipv4Addr;

/// WiFi connection manager for ESP32.
///
/// [`begin`](Connectivity::begin) performs the initial blocking connect.
/// Afterwards [`poll`](Connectivity::poll) only issues non-blocking reconnect
/// attempts, spaced by `reconnect_interval_ms`.
pub struct Esp32Wifi<'a> {
    wifi: BlockingWifi<EspWifi<'a>>,
    config: WifiConfig,
    clock: Esp32Clock,
    last_attempt: Timer,
}

impl<'a> Esp32Wifi<'a> {
    /// Initialize the WiFi driver without connecting.
    ///
    /// # Errors
    ///
    /// Returns an error if the driver cannot be created.
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        config: &WifiConfig,
    ) -> anyhow::Result<Self> {
        let esp_wifi = EspWifi::new(modem, sysloop.clone(), nvs)?;
        let wifi = BlockingWifi::wrap(esp_wifi, sysloop)?;

        Ok(Self {
            wifi,
            config: config.clone(),
            clock: Esp32Clock::new(),
            last_attempt: Timer::unset(),
        })
    }

    /// Get the current IP address, if connected.
    pub fn ip_addr(&self) -> Option<Ipv4Addr> {
        self.wifi
            .wifi()
            .sta_netif()
            .get_ip_info()
            .ok()
            .map(|info| info.ip)
    }

    /// Check if WiFi is connected.
    pub fn is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    fn connect_blocking(&mut self) -> anyhow::Result<()> {
        // Create heapless strings for esp-idf
        let mut ssid_buf: heapless::String<32> = heapless::String::new();
        let _ = ssid_buf.push_str(self.config.ssid.as_str());

        let mut pass_buf: heapless::String<64> = heapless::String::new();
        let _ = pass_buf.push_str(self.config.password.as_str());

        self.wifi
            .set_configuration(&Configuration::Client(ClientConfiguration {
                ssid: ssid_buf,
                password: pass_buf,
                ..Default::default()
            }))?;

        log::info!("wifi: starting");
        self.wifi.start()?;

        log::info!("wifi: connecting to '{}'", self.config.ssid);
        self.wifi.connect()?;

        log::info!("wifi: waiting for DHCP");
        self.wifi.wait_netif_up()?;

        if let Some(ip) = self.ip_addr() {
            log::info!("wifi: connected, IP {}", ip);
        }
        Ok(())
    }
}

impl Connectivity for Esp32Wifi<'_> {
    fn begin(&mut self) {
        if !self.config.enabled || !self.config.is_configured() {
            log::warn!("wifi: not configured, staying offline");
            return;
        }
        self.last_attempt.start(self.clock.now_ms());
        if let Err(e) = self.connect_blocking() {
            log::warn!("wifi: initial connect failed: {:?}", e);
        }
    }

    fn poll(&mut self) {
        if !self.config.enabled || !self.config.is_configured() || self.is_connected() {
            return;
        }

        let now = self.clock.now_ms();
        if self.last_attempt.within(now, self.config.reconnect_interval_ms) {
            return;
        }
        self.last_attempt.start(now);

        log::info!("wifi: link down, reconnecting");
        if let Err(e) = self.wifi.wifi_mut().connect() {
            log::warn!("wifi: reconnect failed: {:?}", e);
        }
    }

    fn reset_credentials(&mut self) {
        log::warn!("wifi: erasing stored credentials");
        self.config = self.config.clone().with_ssid("").with_password("");
        if let Err(e) = self.wifi.wifi_mut().disconnect() {
            log::warn!("wifi: disconnect failed: {:?}", e);
        }
        let blank = Configuration::Client(ClientConfiguration::default());
        if let Err(e) = self.wifi.set_configuration(&blank) {
            log::warn!("wifi: clearing configuration failed: {:?}", e);
        }
    }
}
