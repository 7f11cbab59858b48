use crate::config::{limits, truncate, SensorConfig};
use crate::fields::ids;
use std::collections::HashMap;
use tracing::{debug, warn};

/// Decoded form post. `errors` lists every expected argument that was absent;
/// the corresponding settings keep their previous value.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub config: SensorConfig,
    pub errors: Vec<String>,
}

impl Submission {
    pub fn is_ok(&self) -> bool { self.errors.is_empty() }

    /// Newline-separated error text, as reported back to the browser.
    pub fn error_text(&self) -> String {
        self.errors.iter().map(|e| format!("{e}\n")).collect()
    }
}

/// Form arguments of an `application/x-www-form-urlencoded` body or query.
#[derive(Debug, Clone, Default)]
pub struct FormArgs {
    args: HashMap<String, String>,
}

impl FormArgs {
    pub fn parse(query: &str) -> Self {
        let mut args = HashMap::new();
        for pair in query.trim_start_matches('?').split('&').filter(|p| !p.is_empty()) {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            // first occurrence wins
            args.entry(url_decode(k)).or_insert_with(|| url_decode(v));
        }
        Self { args }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.args.get(name).map(String::as_str)
    }

    pub fn has(&self, name: &str) -> bool {
        self.args.contains_key(name)
    }
}

/// Apply a submitted form on top of `base`.
pub fn decode(query: &str, base: &SensorConfig) -> Submission {
    let args = FormArgs::parse(query);
    let mut d = Decoder { args: &args, errors: Vec::new() };
    let mut cfg = base.clone();

    // [network]
    cfg.wifi_enabled = d.checkbox(ids::WIFI_ENABLED);
    d.text(ids::WIFI_AP_SSID, &mut cfg.wifi_ap_ssid, limits::SSID);
    d.text(ids::WIFI_AP_PWD, &mut cfg.wifi_ap_pwd, limits::PWD);
    // the page has no BSSID input; a new AP means a new lookup
    cfg.wifi_ap_bssid = [0; 6];
    d.int(ids::WIFI_CON_DELAY, &mut cfg.wifi_con_delay, |n| n as u16);
    d.int(ids::WIFI_MAX_CON_ATTEMPTS, &mut cfg.wifi_max_con_attempts, |n| n as u16);

    // [data upload]
    d.int(ids::UPLOAD_FREQ, &mut cfg.upload_freq, |n| n as u16);
    d.int(ids::UPLOAD_TIMEOUT, &mut cfg.upload_timeout, |n| n as u8);
    d.text(ids::DEVICE_ID, &mut cfg.device_id, limits::DEVICE_ID);
    d.text(ids::LOCATION, &mut cfg.location, limits::LOCATION);
    d.text(ids::DATA_MEASUREMENT_ORG, &mut cfg.data_measurement_org, limits::DATA_MEASUREMENT_ORG);
    d.text(ids::DATA_MEASUREMENT_BUCKET, &mut cfg.data_measurement_bucket, limits::DATA_MEASUREMENT_BUCKET);
    d.text(ids::DATA_MEASUREMENT_NAME, &mut cfg.data_measurement_name, limits::DATA_MEASUREMENT_NAME);

    // [server config]
    d.text(ids::SERVER_ADDRESS, &mut cfg.server_address, limits::SERVER_ADDRESS);
    d.int(ids::SERVER_PORT, &mut cfg.server_port, |n| n as u16);
    d.text(ids::SERVER_AUTH_TOKEN, &mut cfg.server_auth_token, limits::SERVER_AUTH_TOKEN);

    // [display]
    d.int(ids::DISPLAY_CONTRAST, &mut cfg.display_contrast, |n| n as u8);
    cfg.display_rotation = d.checkbox(ids::DISPLAY_ROTATION);

    // [sensor]
    if let Some(raw) = d.arg(ids::SENSOR_TEMP_CORRECTION) {
        cfg.sensor_temp_correction = leading_float(raw) as f32;
    }

    // [battery]
    d.int(ids::BATTERY_MIN_LEVEL, &mut cfg.battery_min_level, |n| n as u16);
    d.int(ids::BATTERY_MAX_LEVEL, &mut cfg.battery_max_level, |n| n as u16);

    for e in &d.errors {
        warn!("{e}");
    }
    Submission { config: cfg, errors: d.errors }
}

struct Decoder<'a> {
    args: &'a FormArgs,
    errors: Vec<String>,
}

impl<'a> Decoder<'a> {
    fn arg(&mut self, id: &str) -> Option<&'a str> {
        let found = self.args.get(id);
        match found {
            Some(v) => {
                debug!(id, value = v, "submitted");
            }
            None => self.errors.push(format!("{id} not found")),
        }
        found
    }

    // Control characters cannot be stored in a settings line.
    fn text(&mut self, id: &str, slot: &mut String, max: usize) {
        match self.arg(id) {
            Some(v) if v.chars().any(char::is_control) => {
                self.errors.push(format!("{id} contains control characters"));
            }
            Some(v) => *slot = truncate(v, max),
            None => {}
        }
    }

    fn int<T>(&mut self, id: &str, slot: &mut T, narrow: impl Fn(i64) -> T) {
        if let Some(v) = self.arg(id) {
            *slot = narrow(leading_int(v));
        }
    }

    // An unchecked box is simply not posted.
    fn checkbox(&self, id: &str) -> bool {
        let on = self.args.has(id);
        debug!(id, on, "checkbox");
        on
    }
}

/// Integer prefix of `s` after leading whitespace; 0 when there is none.
/// Saturates instead of overflowing.
pub fn leading_int(s: &str) -> i64 {
    let s = s.trim_start();
    let (neg, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let mut n: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        n = n.saturating_mul(10).saturating_add(i64::from(b - b'0'));
    }
    if neg { -n } else { n }
}

/// Decimal prefix of `s` (`[+-]digits[.digits][e[+-]digits]`); 0.0 when
/// there is none. An exponent marker without digits is not consumed.
pub fn leading_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    let mut end = usize::from(matches!(bytes.first(), Some(b'-' | b'+')));
    let int_end = digits_from(end);
    let mut mantissa = int_end > end;
    end = int_end;
    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        mantissa |= frac_end > end + 1;
        end = frac_end;
    }
    if !mantissa {
        return 0.0;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let sign = usize::from(matches!(bytes.get(end + 1), Some(b'-' | b'+')));
        let exp_end = digits_from(end + 1 + sign);
        if exp_end > end + 1 + sign {
            end = exp_end;
        }
    }
    s[..end].parse().unwrap_or(0.0)
}

/// Form decoding of one name or value: `+` is a space, then `%XX` escapes.
/// Malformed escapes pass through; invalid UTF-8 is replaced.
pub fn url_decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_query() -> String {
        [
            "wifi_enabled=on",
            "wifi_ap_ssid=My+Home%21",
            "wifi_ap_pwd=secret",
            "wifi_con_delay=200",
            "wifi_max_con_attempts=60",
            "upload_freq=300",
            "upload_timeout=30",
            "device_id=TSH06",
            "location=usBedR",
            "data_measurement_org=mine",
            "data_measurement_bucket=ts_bucket",
            "data_measurement_name=homeThermoSensor",
            "server_address=eu-central-1-1.aws.cloud2.influxdata.com",
            "server_port=443",
            "server_auth_token=tok%3D%3D",
            "display_contrast=155",
            "sensor_temp_correction=-0.7",
            "battery_min_level=530",
            "battery_max_level=860",
        ]
        .join("&")
    }

    #[test]
    fn full_post_decodes() {
        let mut base = SensorConfig::placeholder();
        base.wifi_ap_bssid = [1, 2, 3, 4, 5, 6];
        let sub = decode(&full_query(), &base);
        assert!(sub.is_ok(), "{:?}", sub.errors);
        let cfg = sub.config;
        assert!(cfg.wifi_enabled);
        assert_eq!(cfg.wifi_ap_ssid, "My Home!");
        assert_eq!(cfg.wifi_ap_bssid, [0; 6]);
        assert_eq!(cfg.wifi_con_delay, 200);
        assert_eq!(cfg.device_id, "TSH06");
        assert_eq!(cfg.server_auth_token, "tok==");
        assert_eq!(cfg.display_contrast, 155);
        // unticked box is absent from the post
        assert!(!cfg.display_rotation);
        assert!((cfg.sensor_temp_correction + 0.7).abs() < 1e-6);
        assert_eq!(cfg.battery_max_level, 860);
    }

    #[test]
    fn missing_args_are_reported_and_keep_base() {
        let query = full_query().replace("&battery_max_level=860", "");
        let sub = decode(&query, &SensorConfig::placeholder());
        assert_eq!(sub.errors, vec!["battery_max_level not found".to_string()]);
        assert_eq!(sub.config.battery_max_level, 856);
        assert_eq!(sub.error_text(), "battery_max_level not found\n");
    }

    #[test]
    fn empty_post_reports_every_input_but_checkboxes() {
        let sub = decode("", &SensorConfig::placeholder());
        assert_eq!(sub.errors.len(), 18);
        assert!(!sub.config.wifi_enabled);
        assert!(!sub.config.display_rotation);
    }

    #[test]
    fn long_text_is_truncated() {
        let query = full_query().replace("device_id=TSH06", "device_id=ThermoSensorHome0042");
        let sub = decode(&query, &SensorConfig::default());
        assert_eq!(sub.config.device_id, "ThermoSensorHom");
    }

    #[test]
    fn numbers_follow_leading_digits() {
        assert_eq!(leading_int(" 42abc"), 42);
        assert_eq!(leading_int("-7"), -7);
        assert_eq!(leading_int("abc"), 0);
        assert_eq!(leading_int("99999999999999999999999"), i64::MAX);
        assert_eq!(leading_float("1.25C"), 1.25);
        assert_eq!(leading_float("-.5"), -0.5);
        assert_eq!(leading_float("x"), 0.0);
        assert_eq!(leading_float("."), 0.0);

        let query = full_query().replace("display_contrast=155", "display_contrast=300");
        let sub = decode(&query, &SensorConfig::default());
        assert_eq!(sub.config.display_contrast, 44);
    }

    #[test]
    fn url_decoding() {
        assert_eq!(url_decode("a+b%20c"), "a b c");
        assert_eq!(url_decode("100%"), "100%");
        assert_eq!(url_decode("%zz"), "%zz");
        assert_eq!(url_decode("%C3%A9"), "é");
        assert_eq!(url_decode("%2B1"), "+1");
        // `+` is a space before escapes are read, so `%+1` is not an escape
        assert_eq!(url_decode("%+1"), "% 1");
        assert_eq!(url_decode("%0"), "%0");
    }

    #[test]
    fn exponents_are_read() {
        assert_eq!(leading_float("1e-1"), 0.1);
        assert_eq!(leading_float("2E3x"), 2000.0);
        assert_eq!(leading_float("-2.5e+1"), -25.0);
        assert_eq!(leading_float("1e"), 1.0);
        assert_eq!(leading_float("1e+"), 1.0);
        assert_eq!(leading_float("e5"), 0.0);

        let query = full_query().replace("sensor_temp_correction=-0.7", "sensor_temp_correction=-7e-1");
        let sub = decode(&query, &SensorConfig::default());
        assert!((sub.config.sensor_temp_correction + 0.7).abs() < 1e-6);
    }

    #[test]
    fn control_characters_are_rejected() {
        let query = full_query().replace("wifi_ap_ssid=My+Home%21", "wifi_ap_ssid=a%0Ab");
        let sub = decode(&query, &SensorConfig::placeholder());
        assert_eq!(sub.errors, vec!["wifi_ap_ssid contains control characters".to_string()]);
        assert_eq!(sub.config.wifi_ap_ssid, "*****");

        let query = full_query().replace("location=usBedR", "location=x%09y%7F");
        let sub = decode(&query, &SensorConfig::placeholder());
        assert_eq!(sub.errors, vec!["location contains control characters".to_string()]);
    }

    #[test]
    fn first_duplicate_wins() {
        let args = FormArgs::parse("?a=1&a=2&b");
        assert_eq!(args.get("a"), Some("1"));
        assert_eq!(args.get("b"), Some(""));
        assert!(!args.has("c"));
    }
}
