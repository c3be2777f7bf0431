//! Prometheus metric definitions and per-scrape materialization.
//!
//! Definitions are constants; every scrape builds a fresh [`Snapshot`] with
//! its own registry so concurrent scrapes never share sample values.

use crate::error::Result;
use crate::thermostat::{HvacStatus, ThermostatMode, ThermostatReading};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Gauge, GaugeVec, Opts, Registry, TextEncoder};

pub use prometheus::TEXT_FORMAT;

const DEVICE_LABELS: &[&str] = &["id", "label"];
const MODE_LABELS: &[&str] = &["id", "label", "mode"];

/// Name, help text and label dimensions of one exported gauge.
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

impl MetricDef {
    fn gauge_vec(&self, registry: &Registry) -> Result<GaugeVec> {
        let vec = GaugeVec::new(Opts::new(self.name, self.help), self.labels)?;
        registry.register(Box::new(vec.clone()))?;
        Ok(vec)
    }
}

pub const UP: MetricDef = MetricDef {
    name: "nest_up",
    help: "Was talking to Nest API successful.",
    labels: &[],
};
pub const AMBIENT_TEMP: MetricDef = MetricDef {
    name: "nest_ambient_temperature_fahrenheit",
    help: "Inside temperature in Fahrenheit.",
    labels: DEVICE_LABELS,
};
pub const SETPOINT_TEMP: MetricDef = MetricDef {
    name: "nest_setpoint_temperature_fahrenheit",
    help: "Setpoint temperature in Fahrenheit.",
    labels: DEVICE_LABELS,
};
pub const SETPOINT_TEMP_HVAC: MetricDef = MetricDef {
    name: "nest_setpoint_temperature_hvac_fahrenheit",
    help: "Setpoint HVAC temperature in Fahrenheit.",
    labels: DEVICE_LABELS,
};
pub const HUMIDITY: MetricDef = MetricDef {
    name: "nest_humidity_percent",
    help: "Inside humidity.",
    labels: DEVICE_LABELS,
};
pub const HEATING: MetricDef = MetricDef {
    name: "nest_heating",
    help: "Is thermostat heating.",
    labels: DEVICE_LABELS,
};
pub const COOLING: MetricDef = MetricDef {
    name: "nest_cooling",
    help: "Is thermostat cooling.",
    labels: DEVICE_LABELS,
};
pub const MODE: MetricDef = MetricDef {
    name: "nest_thermostat_mode",
    help: "Current thermostat mode",
    labels: MODE_LABELS,
};
pub const MODE_OFF: MetricDef = MetricDef {
    name: "nest_thermostat_mode_off",
    help: "Thermostat mode OFF",
    labels: DEVICE_LABELS,
};
pub const MODE_HEAT: MetricDef = MetricDef {
    name: "nest_thermostat_mode_heat",
    help: "Thermostat mode HEAT",
    labels: DEVICE_LABELS,
};
pub const MODE_COOL: MetricDef = MetricDef {
    name: "nest_thermostat_mode_cool",
    help: "Thermostat mode COOL",
    labels: DEVICE_LABELS,
};
pub const MODE_HEATCOOL: MetricDef = MetricDef {
    name: "nest_thermostat_mode_heatcool",
    help: "Thermostat mode HEATCOOL",
    labels: DEVICE_LABELS,
};

/// Gauges for a single collection cycle.
pub struct Snapshot {
    registry: Registry,
    up: Gauge,
    ambient_temp: GaugeVec,
    setpoint_temp: GaugeVec,
    setpoint_temp_hvac: GaugeVec,
    humidity: GaugeVec,
    heating: GaugeVec,
    cooling: GaugeVec,
    mode: GaugeVec,
    mode_off: GaugeVec,
    mode_heat: GaugeVec,
    mode_cool: GaugeVec,
    mode_heatcool: GaugeVec,
}

impl Snapshot {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let up = Gauge::with_opts(Opts::new(UP.name, UP.help))?;
        registry.register(Box::new(up.clone()))?;

        Ok(Self {
            up,
            ambient_temp: AMBIENT_TEMP.gauge_vec(&registry)?,
            setpoint_temp: SETPOINT_TEMP.gauge_vec(&registry)?,
            setpoint_temp_hvac: SETPOINT_TEMP_HVAC.gauge_vec(&registry)?,
            humidity: HUMIDITY.gauge_vec(&registry)?,
            heating: HEATING.gauge_vec(&registry)?,
            cooling: COOLING.gauge_vec(&registry)?,
            mode: MODE.gauge_vec(&registry)?,
            mode_off: MODE_OFF.gauge_vec(&registry)?,
            mode_heat: MODE_HEAT.gauge_vec(&registry)?,
            mode_cool: MODE_COOL.gauge_vec(&registry)?,
            mode_heatcool: MODE_HEATCOOL.gauge_vec(&registry)?,
            registry,
        })
    }

    pub fn record_up(&self, up: bool) {
        self.up.set(b2f(up));
    }

    pub fn record_reading(&self, reading: &ThermostatReading) {
        let label = reading.sanitized_label();
        let labels = [reading.id.as_str(), label.as_str()];

        self.ambient_temp
            .with_label_values(&labels)
            .set(reading.ambient_temp_f);
        self.setpoint_temp
            .with_label_values(&labels)
            .set(reading.setpoint_heat_f);
        self.setpoint_temp_hvac
            .with_label_values(&labels)
            .set(reading.setpoint_cool_f);
        self.humidity
            .with_label_values(&labels)
            .set(reading.humidity_pct);
        self.heating
            .with_label_values(&labels)
            .set(b2f(reading.hvac_status == HvacStatus::Heating));
        self.cooling
            .with_label_values(&labels)
            .set(b2f(reading.hvac_status == HvacStatus::Cooling));

        self.mode_off
            .with_label_values(&labels)
            .set(b2f(reading.mode == ThermostatMode::Off));
        self.mode_heat
            .with_label_values(&labels)
            .set(b2f(reading.mode == ThermostatMode::Heat));
        self.mode_cool
            .with_label_values(&labels)
            .set(b2f(reading.mode == ThermostatMode::Cool));
        self.mode_heatcool
            .with_label_values(&labels)
            .set(b2f(reading.mode == ThermostatMode::HeatCool));

        if reading.mode.code().is_some() {
            self.mode
                .with_label_values(&[reading.id.as_str(), label.as_str(), reading.mode.as_str()])
                .set(1.0);
        }
    }

    /// Metric families with at least one sample, sorted by name.
    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }
}

/// Render metric families in the Prometheus text exposition format.
pub fn encode(families: &[MetricFamily]) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(families, &mut buffer)?;
    Ok(buffer)
}

fn b2f(b: bool) -> f64 {
    if b {
        1.0
    } else {
        0.0
    }
}
