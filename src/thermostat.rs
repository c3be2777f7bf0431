/// One thermostat's state as of the current scrape. Temperatures are Fahrenheit.
#[derive(Debug, Clone, PartialEq)]
pub struct ThermostatReading {
    pub id: String,
    pub label: String,
    pub ambient_temp_f: f64,
    pub setpoint_heat_f: f64,
    pub setpoint_cool_f: f64,
    pub humidity_pct: f64,
    pub hvac_status: HvacStatus,
    pub mode: ThermostatMode,
}

impl ThermostatReading {
    /// Display label with spaces replaced so it is usable where spaces are not.
    pub fn sanitized_label(&self) -> String {
        self.label.replace(' ', "-")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HvacStatus {
    Heating,
    Cooling,
    Off,
    Unknown,
}

impl HvacStatus {
    /// Parse the API status string; matching is exact.
    pub fn parse(status: &str) -> Self {
        match status {
            "HEATING" => Self::Heating,
            "COOLING" => Self::Cooling,
            "OFF" => Self::Off,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermostatMode {
    Off,
    Heat,
    Cool,
    HeatCool,
    Eco,
    Unknown,
}

impl ThermostatMode {
    /// Parse the API mode string; matching is exact.
    pub fn parse(mode: &str) -> Self {
        match mode {
            "OFF" => Self::Off,
            "HEAT" => Self::Heat,
            "COOL" => Self::Cool,
            "HEATCOOL" => Self::HeatCool,
            "ECO" => Self::Eco,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Heat => "HEAT",
            Self::Cool => "COOL",
            Self::HeatCool => "HEATCOOL",
            Self::Eco => "ECO",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Numeric mode code. HEATCOOL has no code, same as an unrecognized mode.
    pub fn code(&self) -> Option<u8> {
        match self {
            Self::Off => Some(0),
            Self::Heat => Some(1),
            Self::Cool => Some(2),
            Self::Eco => Some(3),
            Self::HeatCool | Self::Unknown => None,
        }
    }
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}
