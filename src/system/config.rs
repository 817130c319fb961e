//! General system configuration

use embassy_nrf::config::{Config, Debug, HfclkSource, LfclkSource};

pub struct SystemConfig {}

impl SystemConfig {
    /// Create new system configuration
    pub fn new() -> Config {
        // Config is `non_exhaustive`, start from the default
        let mut config = Config::default();

        // Both crystals are populated on the PineTime
        config.hfclk_source = HfclkSource::ExternalXtal;
        config.lfclk_source = LfclkSource::ExternalXtal;

        // Enable DC/DC regulator to massively reduce runtime current consumption
        config.dcdc.reg1 = true;

        // Allow debugging
        config.debug = Debug::Allowed;

        config
    }
}
