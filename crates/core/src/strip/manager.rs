use std::collections::HashMap;
use std::sync::Arc;

use super::controller::StripController;
use super::controls::{NumberControl, SectionControl};
use super::coordinator::{ParameterCoordinator, WaveParameter, WaveParams};
use crate::config::StripConfig;
use crate::error::StripError;
use crate::protocol::{LightOutput, UdpTransport};

/// Every surface that belongs to one configured strip.
pub struct StripEntry {
    pub config: StripConfig,
    pub controller: Arc<StripController>,
    pub coordinator: Arc<ParameterCoordinator>,
    pub amplitude: Arc<NumberControl>,
    pub speed: Arc<NumberControl>,
    pub color_flow: Arc<NumberControl>,
    pub sections: Vec<SectionControl>,
}

impl StripEntry {
    pub fn number_controls(&self) -> [&Arc<NumberControl>; 3] {
        [&self.amplitude, &self.speed, &self.color_flow]
    }
}

/// Set-up and tear-down of configured strips, keyed by host.
#[derive(Default)]
pub struct StripManager {
    strips: HashMap<String, StripEntry>,
}

impl StripManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `config`, open its UDP transport and register its surfaces.
    pub async fn add(&mut self, config: StripConfig) -> Result<&StripEntry, StripError> {
        self.precheck(&config)?;
        let transport = UdpTransport::bind(&config.host, config.port).await?;
        self.insert(config, Arc::new(transport))
    }

    /// Like [`add`](Self::add) but with a caller-provided output.
    pub fn add_with_output(
        &mut self,
        config: StripConfig,
        output: Arc<dyn LightOutput>,
    ) -> Result<&StripEntry, StripError> {
        self.precheck(&config)?;
        self.insert(config, output)
    }

    pub fn get(&self, host: &str) -> Option<&StripEntry> {
        self.strips.get(host)
    }

    pub fn hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = self.strips.keys().map(String::as_str).collect();
        hosts.sort_unstable();
        hosts
    }

    pub fn len(&self) -> usize {
        self.strips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    /// Stop the strip's loop and drop all of its surfaces.
    pub async fn remove(&mut self, host: &str) -> Result<(), StripError> {
        let entry = self
            .strips
            .remove(host)
            .ok_or_else(|| StripError::UnknownHost(host.to_string()))?;
        entry.controller.shutdown().await;
        log::info!("Removed strip {} ({})", entry.config.name, host);
        Ok(())
    }

    /// Replace a strip with a new configuration for the same host. The old
    /// strip is kept when the new configuration is invalid.
    pub async fn reload(&mut self, config: StripConfig) -> Result<&StripEntry, StripError> {
        config.validate()?;
        if !self.strips.contains_key(&config.host) {
            return Err(StripError::UnknownHost(config.host));
        }
        let transport = UdpTransport::bind(&config.host, config.port).await?;
        self.remove(&config.host).await?;
        self.insert(config, Arc::new(transport))
    }

    pub async fn shutdown_all(&mut self) {
        for (host, entry) in self.strips.drain() {
            entry.controller.shutdown().await;
            log::debug!("Shut down strip at {}", host);
        }
        log::info!("All strips shut down");
    }

    fn precheck(&self, config: &StripConfig) -> Result<(), StripError> {
        config.validate()?;
        if self.strips.contains_key(&config.host) {
            return Err(StripError::DuplicateHost(config.host.clone()));
        }
        Ok(())
    }

    fn insert(
        &mut self,
        config: StripConfig,
        output: Arc<dyn LightOutput>,
    ) -> Result<&StripEntry, StripError> {
        let coordinator = Arc::new(ParameterCoordinator::new(WaveParams::default()));
        let controller = Arc::new(StripController::new(
            &config,
            Arc::clone(&coordinator),
            output,
        ));

        let control = |parameter| {
            NumberControl::new(
                parameter,
                &config.name,
                &config.host,
                Arc::clone(&coordinator),
            )
        };
        let amplitude = control(WaveParameter::Amplitude);
        let speed = control(WaveParameter::Speed);
        let color_flow = control(WaveParameter::ColorFlowSpeed);

        let sections = (0..config.num_sections)
            .map(|index| SectionControl::new(Arc::clone(&controller), index))
            .collect();

        log::info!(
            "Added strip {} at {}:{} ({} LEDs, {} sections)",
            config.name,
            config.host,
            config.port,
            config.num_leds,
            config.num_sections
        );

        let host = config.host.clone();
        let entry = StripEntry {
            config,
            controller,
            coordinator,
            amplitude,
            speed,
            color_flow,
            sections,
        };
        Ok(self.strips.entry(host).or_insert(entry))
    }
}
