use crate::client::NestClient;
use crate::config::NestConfig;
use crate::error::Result;
use crate::mapping::parse_thermostats;
use crate::metrics::Snapshot;
use crate::thermostat::ThermostatReading;
use prometheus::proto::MetricFamily;
use tracing::{debug, error};

/// Runs one fetch, parse and emit cycle per scrape.
pub struct Collector {
    client: NestClient,
}

impl Collector {
    pub fn new(cfg: &NestConfig) -> Result<Self> {
        Ok(Self {
            client: NestClient::new(cfg)?,
        })
    }

    /// Collect the current thermostat metrics.
    ///
    /// Fetch and parse failures never surface as errors: they are logged and
    /// reported through `nest_up 0` with no per-device gauges. The error path
    /// is only taken if the metric families themselves cannot be built.
    pub async fn collect(&self) -> Result<Vec<MetricFamily>> {
        let snapshot = Snapshot::new()?;

        match self.readings().await {
            Ok(thermostats) => {
                debug!(
                    thermostats = thermostats.len(),
                    "successfully collected Nest data"
                );
                snapshot.record_up(true);
                for thermostat in &thermostats {
                    snapshot.record_reading(thermostat);
                }
            }
            Err(e) => {
                error!(url = %self.client.url(), error = %e, "failed collecting Nest data");
                snapshot.record_up(false);
            }
        }

        Ok(snapshot.gather())
    }

    async fn readings(&self) -> Result<Vec<ThermostatReading>> {
        let body = self.client.fetch().await?;
        parse_thermostats(&body)
    }
}
