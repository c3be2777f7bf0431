use crate::error::{AppError, Result};
use crate::thermostat::{celsius_to_fahrenheit, HvacStatus, ThermostatMode, ThermostatReading};
use serde_json::Value;

pub const THERMOSTAT_TYPE: &str = "sdm.devices.types.THERMOSTAT";

// JSON pointers into a device object. Trait keys contain dots, which a
// pointer treats as part of a single segment.
const DEVICE_TYPE: &str = "/type";
const DEVICE_NAME: &str = "/name";
const CUSTOM_NAME: &str = "/traits/sdm.devices.traits.Info/customName";
const AMBIENT_CELSIUS: &str =
    "/traits/sdm.devices.traits.Temperature/ambientTemperatureCelsius";
const HEAT_CELSIUS: &str = "/traits/sdm.devices.traits.ThermostatTemperatureSetpoint/heatCelsius";
const COOL_CELSIUS: &str = "/traits/sdm.devices.traits.ThermostatTemperatureSetpoint/coolCelsius";
const HUMIDITY_PERCENT: &str = "/traits/sdm.devices.traits.Humidity/ambientHumidityPercent";
const HVAC_STATUS: &str = "/traits/sdm.devices.traits.ThermostatHvac/status";
const MODE: &str = "/traits/sdm.devices.traits.ThermostatMode/mode";

/// Parse a device-listing response into thermostat readings, in API order.
///
/// Non-thermostat devices are skipped. A response without a single
/// thermostat is treated as malformed.
pub fn parse_thermostats(raw: &[u8]) -> Result<Vec<ThermostatReading>> {
    let json: Value = serde_json::from_slice(raw)
        .map_err(|e| AppError::Unmarshal(format!("invalid JSON: {}", e)))?;

    let devices = json
        .get("devices")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    let thermostats: Vec<ThermostatReading> = devices
        .iter()
        .filter(|device| text_at(device, DEVICE_TYPE) == THERMOSTAT_TYPE)
        .map(extract_reading)
        .collect();

    if thermostats.is_empty() {
        return Err(AppError::Unmarshal(
            "no valid thermostats in devices list".to_string(),
        ));
    }

    Ok(thermostats)
}

fn extract_reading(device: &Value) -> ThermostatReading {
    ThermostatReading {
        id: text_at(device, DEVICE_NAME).to_string(),
        label: text_at(device, CUSTOM_NAME).to_string(),
        ambient_temp_f: celsius_to_fahrenheit(float_at(device, AMBIENT_CELSIUS)),
        setpoint_heat_f: celsius_to_fahrenheit(float_at(device, HEAT_CELSIUS)),
        setpoint_cool_f: celsius_to_fahrenheit(float_at(device, COOL_CELSIUS)),
        humidity_pct: float_at(device, HUMIDITY_PERCENT),
        hvac_status: HvacStatus::parse(text_at(device, HVAC_STATUS)),
        mode: ThermostatMode::parse(text_at(device, MODE)),
    }
}

/// String at `path`, or "" when absent or not a string.
fn text_at<'a>(json: &'a Value, path: &str) -> &'a str {
    json.pointer(path)
        .and_then(Value::as_str)
        .unwrap_or_default()
}

/// Number at `path`, or 0.0 when absent or not a number.
fn float_at(json: &Value, path: &str) -> f64 {
    json.pointer(path)
        .and_then(Value::as_f64)
        .unwrap_or_default()
}
