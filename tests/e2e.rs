use thermo_sensor_config as tsc;
use pretty_assertions::assert_eq;
use std::fs;
use tsc::fields::ids;

#[test]
fn page_document_is_prefilled() {
    let json = r#"{
        "wifi_enabled": {"checked": false},
        "wifi_ap_ssid": {}, "wifi_ap_pwd": {}, "wifi_con_delay": {}, "wifi_max_con_attempts": {},
        "upload_freq": {}, "upload_timeout": {}, "device_id": {"value": "old"}, "location": {},
        "data_measurement_org": {}, "data_measurement_bucket": {}, "data_measurement_name": {},
        "server_address": {}, "server_port": {}, "server_auth_token": {},
        "display_contrast": {}, "display_rotation": {}, "sensor_temp_correction": {},
        "battery_min_level": {}, "battery_max_level": {},
        "submit": {"value": "Save"}
    }"#;
    let mut doc = tsc::Document::from_json(json).unwrap();
    let report = tsc::initialize_form(&mut doc).unwrap();
    assert!(report.is_complete());

    assert_eq!(doc.value(ids::DEVICE_ID), Some("TSH05"));
    assert_eq!(doc.is_checked(ids::WIFI_ENABLED), Some(true));
    assert_eq!(doc.value(ids::SERVER_ADDRESS), Some("eu-central-1-1.aws.cloud2.influxdata.com"));
    assert_eq!(doc.value(ids::SENSOR_TEMP_CORRECTION), Some("0.0"));
    // elements outside the table are untouched
    assert_eq!(doc.value("submit"), Some("Save"));
}

#[test]
fn stored_settings_bind_into_page() {
    let dir = tempfile::tempdir().unwrap();
    let store = tsc::ConfigStore::new(dir.path());
    let mut cfg = tsc::SensorConfig::placeholder();
    cfg.location = "usBedR".into();
    cfg.display_rotation = false;
    store.save(&cfg).unwrap();

    let loaded = store.load().unwrap();
    let mut doc = tsc::Document::for_defaults();
    tsc::apply_fields(&mut doc, &loaded.field_values(), &tsc::Context::default()).unwrap();
    assert_eq!(doc.value(ids::LOCATION), Some("usBedR"));
    assert_eq!(doc.is_checked(ids::DISPLAY_ROTATION), Some(false));
}

#[test]
fn submit_rewrites_settings_and_script() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("submit.html"), "<html>saved</html>").unwrap();
    let store = tsc::ConfigStore::new(dir.path());
    store.save(&tsc::SensorConfig::placeholder()).unwrap();

    let query = "wifi_enabled=on&wifi_ap_ssid=home&wifi_ap_pwd=pw&wifi_con_delay=150\
&wifi_max_con_attempts=60&upload_freq=180&upload_timeout=20&device_id=TSH06&location=usBedR\
&data_measurement_org=mine&data_measurement_bucket=ts_bucket&data_measurement_name=homeThermoSensor\
&server_address=example.org&server_port=8086&server_auth_token=t&display_contrast=155\
&display_rotation=on&sensor_temp_correction=0.5&battery_min_level=527&battery_max_level=856";
    let reply = tsc::web::resolve(&store, "/submit.html", query).unwrap();
    assert_eq!(reply.content_type, "text/html");
    assert_eq!(reply.body, b"<html>saved</html>");

    let cfg = store.load().unwrap();
    assert_eq!(cfg.device_id, "TSH06");
    assert_eq!(cfg.server_port, 8086);
    assert!(cfg.display_rotation);

    let js = fs::read_to_string(store.script_path()).unwrap();
    assert!(js.contains("\tdocument.getElementById(\"device_id\").value = \"TSH06\";\n"));
    assert!(js.contains("\tdocument.getElementById(\"sensor_temp_correction\").value = \"0.5\";\n"));
}
