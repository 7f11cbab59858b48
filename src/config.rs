use crate::errors::{ConfigError, Result};
use crate::fields::{ids, FieldDefault, FieldValue};
use crate::ini::{self, IniDocument};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// INI section names, in file order.
pub mod sections {
    pub const NETWORK: &str = "network";
    pub const DATA_UPLOAD: &str = "data upload";
    pub const SERVER: &str = "server config";
    pub const DISPLAY: &str = "display";
    pub const SENSOR: &str = "sensor";
    pub const BATTERY: &str = "battery";
}

/// Maximum stored length of each string setting, in characters.
pub mod limits {
    pub const SSID: usize = 32;
    pub const PWD: usize = 64; // WPA2-PSK
    pub const DEVICE_ID: usize = 15;
    pub const LOCATION: usize = 15;
    pub const DATA_MEASUREMENT_ORG: usize = 31;
    pub const DATA_MEASUREMENT_BUCKET: usize = 31;
    pub const DATA_MEASUREMENT_NAME: usize = 31;
    pub const SERVER_ADDRESS: usize = 255;
    pub const SERVER_AUTH_TOKEN: usize = 255;
}

/// The thermo sensor's persisted settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    // [network]
    pub wifi_enabled: bool,
    pub wifi_ap_ssid: String,
    pub wifi_ap_pwd: String,
    pub wifi_ap_bssid: [u8; 6],
    pub wifi_ap_channel: i32,
    /// Milliseconds between connection attempts.
    pub wifi_con_delay: u16,
    pub wifi_max_con_attempts: u16,

    // [data upload]
    /// Seconds between uploads.
    pub upload_freq: u16,
    /// Seconds to wait for an upload to succeed.
    pub upload_timeout: u8,
    pub device_id: String,
    pub location: String,
    pub data_measurement_org: String,
    pub data_measurement_bucket: String,
    pub data_measurement_name: String,

    // [server config]
    pub server_address: String,
    pub server_port: u16,
    pub server_auth_token: String,

    // [display]
    pub display_contrast: u8,
    /// Upside-down when set.
    pub display_rotation: bool,

    // [sensor]
    pub sensor_temp_correction: f32,

    // [battery]
    /// ADC reading at 2.75V.
    pub battery_min_level: u16,
    /// ADC reading at 4.20V.
    pub battery_max_level: u16,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            wifi_enabled: true,
            wifi_ap_ssid: String::new(),
            wifi_ap_pwd: String::new(),
            wifi_ap_bssid: [0; 6],
            wifi_ap_channel: 0,
            wifi_con_delay: 0,
            wifi_max_con_attempts: 0,
            upload_freq: 0,
            upload_timeout: 0,
            device_id: String::new(),
            location: String::new(),
            data_measurement_org: String::new(),
            data_measurement_bucket: String::new(),
            data_measurement_name: String::new(),
            server_address: String::new(),
            server_port: 0,
            server_auth_token: String::new(),
            display_contrast: 0,
            display_rotation: false,
            sensor_temp_correction: 0.0,
            battery_min_level: 0,
            battery_max_level: 0,
        }
    }
}

impl SensorConfig {
    /// The configuration the placeholder page shows.
    pub fn placeholder() -> Self {
        Self {
            wifi_enabled: true,
            wifi_ap_ssid: "*****".into(),
            wifi_ap_pwd: "*****".into(),
            wifi_con_delay: 150,
            wifi_max_con_attempts: 240,
            upload_freq: 180,
            upload_timeout: 20,
            device_id: "TSH05".into(),
            location: "usHallway".into(),
            data_measurement_org: "mine".into(),
            data_measurement_bucket: "ts_bucket".into(),
            data_measurement_name: "devThermoSensor".into(),
            server_address: "eu-central-1-1.aws.cloud2.influxdata.com".into(),
            server_port: 443,
            server_auth_token: "**".into(),
            display_contrast: 137,
            display_rotation: true,
            sensor_temp_correction: 0.0,
            battery_min_level: 527,
            battery_max_level: 856,
            ..Self::default()
        }
    }

    /// Project onto page fields. BSSID and channel have no input on the page.
    pub fn field_values(&self) -> Vec<FieldDefault> {
        fn text(id: &'static str, v: impl ToString) -> FieldDefault {
            FieldDefault { id, value: FieldValue::Text(Cow::Owned(v.to_string())) }
        }
        vec![
            FieldDefault { id: ids::WIFI_ENABLED, value: FieldValue::CheckedWithValue(self.wifi_enabled) },
            text(ids::WIFI_AP_SSID, &self.wifi_ap_ssid),
            text(ids::WIFI_AP_PWD, &self.wifi_ap_pwd),
            text(ids::WIFI_CON_DELAY, self.wifi_con_delay),
            text(ids::WIFI_MAX_CON_ATTEMPTS, self.wifi_max_con_attempts),
            text(ids::UPLOAD_FREQ, self.upload_freq),
            text(ids::UPLOAD_TIMEOUT, self.upload_timeout),
            text(ids::DEVICE_ID, &self.device_id),
            text(ids::LOCATION, &self.location),
            text(ids::DATA_MEASUREMENT_ORG, &self.data_measurement_org),
            text(ids::DATA_MEASUREMENT_BUCKET, &self.data_measurement_bucket),
            text(ids::DATA_MEASUREMENT_NAME, &self.data_measurement_name),
            text(ids::SERVER_ADDRESS, &self.server_address),
            text(ids::SERVER_PORT, self.server_port),
            text(ids::SERVER_AUTH_TOKEN, &self.server_auth_token),
            text(ids::DISPLAY_CONTRAST, self.display_contrast),
            FieldDefault { id: ids::DISPLAY_ROTATION, value: FieldValue::Checked(self.display_rotation) },
            text(ids::SENSOR_TEMP_CORRECTION, format!("{:.1}", self.sensor_temp_correction)),
            text(ids::BATTERY_MIN_LEVEL, self.battery_min_level),
            text(ids::BATTERY_MAX_LEVEL, self.battery_max_level),
        ]
    }

    /// Read every setting from a parsed INI file. All keys are required.
    pub fn from_ini(doc: &IniDocument) -> Result<Self> {
        use sections::*;
        let r = Reader { doc };
        Ok(Self {
            wifi_enabled: r.bool(NETWORK, ids::WIFI_ENABLED)?,
            wifi_ap_ssid: r.string(NETWORK, ids::WIFI_AP_SSID, limits::SSID)?,
            wifi_ap_pwd: r.string(NETWORK, ids::WIFI_AP_PWD, limits::PWD)?,
            wifi_ap_bssid: r.mac(NETWORK, ids::WIFI_AP_BSSID)?,
            wifi_ap_channel: r.number(NETWORK, ids::WIFI_AP_CHANNEL)?,
            wifi_con_delay: r.number(NETWORK, ids::WIFI_CON_DELAY)?,
            wifi_max_con_attempts: r.number(NETWORK, ids::WIFI_MAX_CON_ATTEMPTS)?,

            upload_freq: r.number(DATA_UPLOAD, ids::UPLOAD_FREQ)?,
            upload_timeout: r.number(DATA_UPLOAD, ids::UPLOAD_TIMEOUT)?,
            device_id: r.string(DATA_UPLOAD, ids::DEVICE_ID, limits::DEVICE_ID)?,
            location: r.string(DATA_UPLOAD, ids::LOCATION, limits::LOCATION)?,
            data_measurement_org: r.string(DATA_UPLOAD, ids::DATA_MEASUREMENT_ORG, limits::DATA_MEASUREMENT_ORG)?,
            data_measurement_bucket: r.string(DATA_UPLOAD, ids::DATA_MEASUREMENT_BUCKET, limits::DATA_MEASUREMENT_BUCKET)?,
            data_measurement_name: r.string(DATA_UPLOAD, ids::DATA_MEASUREMENT_NAME, limits::DATA_MEASUREMENT_NAME)?,

            server_address: r.string(SERVER, ids::SERVER_ADDRESS, limits::SERVER_ADDRESS)?,
            server_port: r.number(SERVER, ids::SERVER_PORT)?,
            server_auth_token: r.string(SERVER, ids::SERVER_AUTH_TOKEN, limits::SERVER_AUTH_TOKEN)?,

            display_contrast: r.number(DISPLAY, ids::DISPLAY_CONTRAST)?,
            display_rotation: r.bool(DISPLAY, ids::DISPLAY_ROTATION)?,

            sensor_temp_correction: r.number(SENSOR, ids::SENSOR_TEMP_CORRECTION)?,

            battery_min_level: r.number(BATTERY, ids::BATTERY_MIN_LEVEL)?,
            battery_max_level: r.number(BATTERY, ids::BATTERY_MAX_LEVEL)?,
        })
    }

    pub fn from_ini_str(text: &str) -> Result<Self> {
        Self::from_ini(&ini::parse(text)?)
    }

    /// Render the settings in the device's INI layout.
    pub fn to_ini(&self) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = self.write_ini(&mut out);
        out
    }

    pub fn write_ini<W: fmt::Write>(&self, out: &mut W) -> fmt::Result {
        use sections::*;
        writeln!(out, "[{NETWORK}]")?;
        writeln!(out, "{}={}", ids::WIFI_ENABLED, self.wifi_enabled)?;
        writeln!(out, "{}={}", ids::WIFI_AP_SSID, ini::quote_value(&self.wifi_ap_ssid))?;
        writeln!(out, "{}={}", ids::WIFI_AP_PWD, ini::quote_value(&self.wifi_ap_pwd))?;
        writeln!(out, "{}={}", ids::WIFI_AP_BSSID, ini::format_mac(&self.wifi_ap_bssid))?;
        writeln!(out, "{}={}", ids::WIFI_AP_CHANNEL, self.wifi_ap_channel)?;
        writeln!(out, "{}={}", ids::WIFI_CON_DELAY, self.wifi_con_delay)?;
        writeln!(out, "{}={}", ids::WIFI_MAX_CON_ATTEMPTS, self.wifi_max_con_attempts)?;

        writeln!(out, "[{DATA_UPLOAD}]")?;
        writeln!(out, "{}={}", ids::UPLOAD_FREQ, self.upload_freq)?;
        writeln!(out, "{}={}", ids::UPLOAD_TIMEOUT, self.upload_timeout)?;
        writeln!(out, "{}={}", ids::DEVICE_ID, ini::quote_value(&self.device_id))?;
        writeln!(out, "{}={}", ids::LOCATION, ini::quote_value(&self.location))?;
        writeln!(out, "{}={}", ids::DATA_MEASUREMENT_ORG, ini::quote_value(&self.data_measurement_org))?;
        writeln!(out, "{}={}", ids::DATA_MEASUREMENT_BUCKET, ini::quote_value(&self.data_measurement_bucket))?;
        writeln!(out, "{}={}", ids::DATA_MEASUREMENT_NAME, ini::quote_value(&self.data_measurement_name))?;

        writeln!(out, "[{SERVER}]")?;
        writeln!(out, "{}={}", ids::SERVER_ADDRESS, ini::quote_value(&self.server_address))?;
        writeln!(out, "{}={}", ids::SERVER_PORT, self.server_port)?;
        writeln!(out, "{}={}", ids::SERVER_AUTH_TOKEN, ini::quote_value(&self.server_auth_token))?;

        writeln!(out, "[{DISPLAY}]")?;
        writeln!(out, "{}={}", ids::DISPLAY_CONTRAST, self.display_contrast)?;
        writeln!(out, "{}={}", ids::DISPLAY_ROTATION, self.display_rotation)?;

        writeln!(out, "[{SENSOR}]")?;
        writeln!(out, "{}={:.1}", ids::SENSOR_TEMP_CORRECTION, self.sensor_temp_correction)?;

        writeln!(out, "[{BATTERY}]")?;
        writeln!(out, "{}={}", ids::BATTERY_MIN_LEVEL, self.battery_min_level)?;
        writeln!(out, "{}={}", ids::BATTERY_MAX_LEVEL, self.battery_max_level)
    }
}

/// Keeps at most `max` characters.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

struct Reader<'a> {
    doc: &'a IniDocument,
}

impl Reader<'_> {
    fn raw(&self, section: &str, key: &str) -> Result<&str> {
        self.doc.get(section, key).ok_or_else(|| ConfigError::Missing {
            section: section.to_string(),
            key: key.to_string(),
        })
    }

    fn invalid(section: &str, key: &str, value: &str) -> ConfigError {
        ConfigError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn string(&self, section: &str, key: &str, max: usize) -> Result<String> {
        Ok(truncate(self.raw(section, key)?, max))
    }

    fn number<T: FromStr>(&self, section: &str, key: &str) -> Result<T> {
        let raw = self.raw(section, key)?;
        raw.parse().map_err(|_| Self::invalid(section, key, raw))
    }

    fn bool(&self, section: &str, key: &str) -> Result<bool> {
        let raw = self.raw(section, key)?;
        ini::parse_bool(raw).ok_or_else(|| Self::invalid(section, key, raw))
    }

    fn mac(&self, section: &str, key: &str) -> Result<[u8; 6]> {
        let raw = self.raw(section, key)?;
        ini::parse_mac(raw).ok_or_else(|| Self::invalid(section, key, raw))
    }
}
