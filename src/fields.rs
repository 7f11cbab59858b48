use serde::Serialize;
use std::borrow::Cow;

/// Element ids of the configuration page. They double as INI keys.
pub mod ids {
    pub const WIFI_ENABLED: &str = "wifi_enabled";
    pub const WIFI_AP_SSID: &str = "wifi_ap_ssid";
    pub const WIFI_AP_PWD: &str = "wifi_ap_pwd";
    pub const WIFI_AP_BSSID: &str = "wifi_ap_bssid";
    pub const WIFI_AP_CHANNEL: &str = "wifi_ap_channel";
    pub const WIFI_CON_DELAY: &str = "wifi_con_delay";
    pub const WIFI_MAX_CON_ATTEMPTS: &str = "wifi_max_con_attempts";

    pub const UPLOAD_FREQ: &str = "upload_freq";
    pub const UPLOAD_TIMEOUT: &str = "upload_timeout";
    pub const DEVICE_ID: &str = "device_id";
    pub const LOCATION: &str = "location";
    pub const DATA_MEASUREMENT_ORG: &str = "data_measurement_org";
    pub const DATA_MEASUREMENT_BUCKET: &str = "data_measurement_bucket";
    pub const DATA_MEASUREMENT_NAME: &str = "data_measurement_name";

    pub const SERVER_ADDRESS: &str = "server_address";
    pub const SERVER_PORT: &str = "server_port";
    pub const SERVER_AUTH_TOKEN: &str = "server_auth_token";

    pub const DISPLAY_CONTRAST: &str = "display_contrast";
    pub const DISPLAY_ROTATION: &str = "display_rotation";

    pub const SENSOR_TEMP_CORRECTION: &str = "sensor_temp_correction";

    pub const BATTERY_MIN_LEVEL: &str = "battery_min_level";
    pub const BATTERY_MAX_LEVEL: &str = "battery_max_level";
}

/// What gets written into a single element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    /// The element's string value.
    Text(Cow<'static, str>),
    /// Checkbox state only.
    Checked(bool),
    /// Checkbox state, mirrored into the value as `"true"` / `"false"`.
    CheckedWithValue(bool),
}

impl FieldValue {
    pub const fn text(s: &'static str) -> Self {
        FieldValue::Text(Cow::Borrowed(s))
    }

    /// Number of element writes this value needs.
    pub fn assignments(&self) -> usize {
        match self {
            FieldValue::CheckedWithValue(_) => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDefault {
    pub id: &'static str,
    #[serde(flatten)]
    pub value: FieldValue,
}

const fn field(id: &'static str, value: FieldValue) -> FieldDefault {
    FieldDefault { id, value }
}

/// Placeholder values shown on the configuration page before the device
/// has been configured.
pub const DEFAULT_FIELDS: &[FieldDefault] = &[
    field(ids::WIFI_ENABLED, FieldValue::CheckedWithValue(true)),
    field(ids::WIFI_AP_SSID, FieldValue::text("*****")),
    field(ids::WIFI_AP_PWD, FieldValue::text("*****")),
    field(ids::WIFI_CON_DELAY, FieldValue::text("150")),
    field(ids::WIFI_MAX_CON_ATTEMPTS, FieldValue::text("240")),
    field(ids::UPLOAD_FREQ, FieldValue::text("180")),
    field(ids::UPLOAD_TIMEOUT, FieldValue::text("20")),
    field(ids::DEVICE_ID, FieldValue::text("TSH05")),
    field(ids::LOCATION, FieldValue::text("usHallway")),
    field(ids::DATA_MEASUREMENT_ORG, FieldValue::text("mine")),
    field(ids::DATA_MEASUREMENT_BUCKET, FieldValue::text("ts_bucket")),
    field(ids::DATA_MEASUREMENT_NAME, FieldValue::text("devThermoSensor")),
    field(ids::SERVER_ADDRESS, FieldValue::text("eu-central-1-1.aws.cloud2.influxdata.com")),
    field(ids::SERVER_PORT, FieldValue::text("443")),
    field(ids::SERVER_AUTH_TOKEN, FieldValue::text("**")),
    field(ids::DISPLAY_CONTRAST, FieldValue::text("137")),
    field(ids::DISPLAY_ROTATION, FieldValue::Checked(true)),
    field(ids::SENSOR_TEMP_CORRECTION, FieldValue::text("0.0")),
    field(ids::BATTERY_MIN_LEVEL, FieldValue::text("527")),
    field(ids::BATTERY_MAX_LEVEL, FieldValue::text("856")),
];

/// Ids of every default field, in table order.
pub fn default_ids() -> impl Iterator<Item = &'static str> {
    DEFAULT_FIELDS.iter().map(|f| f.id)
}
