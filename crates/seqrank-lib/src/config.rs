//! Parameters for k-mer encoding and minimizer extraction
//!
//! Plain structs with defaults, a `validate` step and a tracing-based `print`.
//! Constructors of [`KmerEncoder`](crate::kmer::KmerEncoder) and
//! [`WinnowingMinimizer`](crate::minimizer::WinnowingMinimizer) validate the
//! configuration they are given, so `k == 0` and `w == 0` are reported as
//! errors rather than producing unspecified output.

use thiserror::Error;

use crate::constants::{DEFAULT_K, DEFAULT_SEED, DEFAULT_WINDOW};
use crate::minimizer::DuplicatePolicy;

/// Error type for invalid parameters
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// k-mer length of zero
    #[error("k-mer length must be at least 1")]
    ZeroK,
    /// window of zero k-mers
    #[error("window size must be at least 1 k-mer")]
    ZeroWindow,
}

/// Configuration of the rolling k-mer encoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncoderConfig {
    /// K-mer length
    pub k: usize,

    /// XOR mask applied to every reported hash
    pub seed: u64,

    /// Report min(forward, reverse complement) when the alphabet can complement
    pub canonical: bool,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            k: DEFAULT_K,
            seed: DEFAULT_SEED,
            canonical: true,
        }
    }
}

impl EncoderConfig {
    /// Create a configuration for k-mer length `k`
    pub fn new(k: usize) -> Result<Self, ConfigError> {
        let config = Self {
            k,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the hash seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Enable or disable canonical k-mers
    pub fn with_canonical(mut self, canonical: bool) -> Self {
        self.canonical = canonical;
        self
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k == 0 {
            return Err(ConfigError::ZeroK);
        }
        Ok(())
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        tracing::info!("Encoder Configuration:");
        tracing::info!("  k = {}", self.k);
        tracing::info!("  canonical = {}", self.canonical);
        tracing::debug!("  seed = {:#x}", self.seed);
    }
}

/// Configuration of the winnowing minimizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimizerConfig {
    /// Parameters of the underlying k-mer encoder
    pub encoder: EncoderConfig,

    /// Number of consecutive k-mers per window
    pub w: usize,

    /// When a repeated minimum is reported again
    pub duplicates: DuplicatePolicy,
}

impl Default for MinimizerConfig {
    fn default() -> Self {
        Self {
            encoder: EncoderConfig::default(),
            w: DEFAULT_WINDOW,
            duplicates: DuplicatePolicy::default(),
        }
    }
}

impl MinimizerConfig {
    /// Create a configuration with k-mer length `k` and window `w`
    pub fn new(k: usize, w: usize) -> Result<Self, ConfigError> {
        let config = Self {
            encoder: EncoderConfig {
                k,
                ..EncoderConfig::default()
            },
            w,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the hash seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.encoder.seed = seed;
        self
    }

    /// Enable or disable canonical k-mers
    pub fn with_canonical(mut self, canonical: bool) -> Self {
        self.encoder.canonical = canonical;
        self
    }

    /// Set the duplicate policy
    pub fn with_duplicates(mut self, duplicates: DuplicatePolicy) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// Validate the configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.encoder.validate()?;
        if self.w == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }

    /// Log configuration parameters via tracing
    pub fn print(&self) {
        self.encoder.print();
        tracing::info!("  w = {}", self.w);
        tracing::info!("  duplicates = {:?}", self.duplicates);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MinimizerConfig::default();
        assert_eq!(config.encoder.k, DEFAULT_K);
        assert_eq!(config.w, DEFAULT_WINDOW);
        assert_eq!(config.encoder.seed, 0);
        assert!(config.encoder.canonical);
        assert_eq!(config.duplicates, DuplicatePolicy::Allowed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_parameters_rejected() {
        assert_eq!(EncoderConfig::new(0), Err(ConfigError::ZeroK));
        assert_eq!(MinimizerConfig::new(0, 3), Err(ConfigError::ZeroK));
        assert_eq!(MinimizerConfig::new(3, 0), Err(ConfigError::ZeroWindow));
    }

    #[test]
    fn test_setters() {
        let config = MinimizerConfig::new(15, 4)
            .unwrap()
            .with_seed(0xdead)
            .with_canonical(false)
            .with_duplicates(DuplicatePolicy::Suppressed);
        assert_eq!(config.encoder.k, 15);
        assert_eq!(config.w, 4);
        assert_eq!(config.encoder.seed, 0xdead);
        assert!(!config.encoder.canonical);
        assert_eq!(config.duplicates, DuplicatePolicy::Suppressed);

        let encoder = EncoderConfig::new(7).unwrap().with_seed(3).with_canonical(false);
        assert_eq!(encoder, EncoderConfig { k: 7, seed: 3, canonical: false });
    }
}
