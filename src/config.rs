//! Configuration management for cartoee.
//!
//! The binary resolves settings with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)
//!
//! Library functions never read the environment; they take a [`Config`] or
//! explicit options.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{CartoeeError, Result};
use crate::geo::Region;
use crate::imagery::Dims;

/// Command-line arguments for cartoee
#[derive(Parser, Debug)]
#[command(name = "cartoee")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Image identifier to render
    #[arg(short, long)]
    pub image: String,

    /// Output PNG path
    #[arg(short, long, default_value = "map.png")]
    pub output: PathBuf,

    /// Region as "west,south,east,north"; defaults to the image footprint
    #[arg(short, long, allow_hyphen_values = true)]
    pub region: Option<String>,

    /// Thumbnail size: a single maximum dimension or WIDTHxHEIGHT
    #[arg(short, long)]
    pub dims: Option<String>,

    /// Named colormap used to colorize a single-band image
    #[arg(long)]
    pub cmap: Option<String>,

    /// Visualization parameters as a JSON object
    #[arg(long)]
    pub vis: Option<String>,

    /// Colorbar location (left, right, bottom, top)
    #[arg(long)]
    pub colorbar: Option<String>,

    /// Draw a stepped colorbar from the palette
    #[arg(long)]
    pub discrete: bool,

    /// Colorbar label when the visualization parameters name no bands
    #[arg(long)]
    pub label: Option<String>,

    /// Gridline spacing in degrees, "d" or "dx,dy"
    #[arg(long)]
    pub grid_interval: Option<String>,

    /// Number of gridlines per axis, "n" or "nx,ny"
    #[arg(long)]
    pub grid_ticks: Option<String>,

    /// Pad the view by this fraction of its span
    #[arg(long)]
    pub pad: Option<f64>,

    /// Imagery service endpoint
    #[arg(long, env = "CARTOEE_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Billing project sent with each request
    #[arg(long, env = "CARTOEE_PROJECT")]
    pub project: Option<String>,

    /// Bearer token for the imagery service
    #[arg(long, env = "CARTOEE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Figure width in pixels
    #[arg(long, env = "CARTOEE_WIDTH")]
    pub width: Option<u32>,

    /// Figure height in pixels
    #[arg(long, env = "CARTOEE_HEIGHT")]
    pub height: Option<u32>,

    /// Path to JSON configuration file
    #[arg(short, long, env = "CARTOEE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CARTOEE_LOG_LEVEL")]
    pub log_level: Option<String>,
}

/// Imagery service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageryConfig {
    /// Base URL of the imagery service
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Billing project
    #[serde(default)]
    pub project: Option<String>,

    /// Bearer token
    #[serde(default, skip_serializing)]
    pub token: Option<String>,

    /// Request timeout (None = wait indefinitely)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Figure rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Figure width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Figure height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Overlay resampling (nearest, bilinear)
    #[serde(default = "default_interpolation")]
    pub interpolation: String,

    /// Colors sampled when a named colormap becomes a palette
    #[serde(default = "default_palette_size")]
    pub palette_size: usize,

    /// Default view padding factor
    #[serde(default = "default_pad_factor")]
    pub pad_factor: f64,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Imagery service configuration
    #[serde(default)]
    pub imagery: ImageryConfig,

    /// Rendering configuration
    #[serde(default)]
    pub render: RenderConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// One map to render, as requested on the command line
#[derive(Debug, Clone)]
pub struct RenderJob {
    pub image: String,
    pub output: PathBuf,
    pub region: Option<Region>,
    pub dims: Option<Dims>,
    pub cmap: Option<String>,
    pub vis: Option<String>,
    pub colorbar: Option<String>,
    pub discrete: bool,
    pub label: Option<String>,
    pub grid_interval: Option<String>,
    pub grid_ticks: Option<String>,
    pub pad: Option<f64>,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, RenderJob)> {
        Self::from_args(Args::parse())
    }

    /// Resolve configuration and the render job from parsed arguments
    pub fn from_args(args: Args) -> Result<(Self, RenderJob)> {
        let mut config = Config::default();

        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        if let Some(endpoint) = args.endpoint {
            config.imagery.endpoint = endpoint;
        }
        if args.project.is_some() {
            config.imagery.project = args.project;
        }
        if args.token.is_some() {
            config.imagery.token = args.token;
        }
        if let Some(width) = args.width {
            config.render.width = width;
        }
        if let Some(height) = args.height {
            config.render.height = height;
        }
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }

        let region = args
            .region
            .as_deref()
            .map(crate::geo::parse_bbox)
            .transpose()?;
        let dims = args.dims.as_deref().map(str::parse::<Dims>).transpose()?;

        let job = RenderJob {
            image: args.image,
            output: args.output,
            region,
            dims,
            cmap: args.cmap,
            vis: args.vis,
            colorbar: args.colorbar,
            discrete: args.discrete,
            label: args.label,
            grid_interval: args.grid_interval,
            grid_ticks: args.grid_ticks,
            pad: args.pad,
        };

        Ok((config, job))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.imagery.endpoint = other.imagery.endpoint;
        if other.imagery.project.is_some() {
            self.imagery.project = other.imagery.project;
        }
        if other.imagery.token.is_some() {
            self.imagery.token = other.imagery.token;
        }
        if other.imagery.timeout_secs.is_some() {
            self.imagery.timeout_secs = other.imagery.timeout_secs;
        }
        self.render = other.render;
        self.log_level = other.log_level;
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.imagery.endpoint.is_empty() {
            return Err(CartoeeError::Config {
                message: "Imagery endpoint cannot be empty".to_string(),
            });
        }

        if self.render.width == 0 || self.render.height == 0 {
            return Err(CartoeeError::Config {
                message: format!(
                    "Figure size must be positive, got {}x{}",
                    self.render.width, self.render.height
                ),
            });
        }

        if self.render.palette_size == 0 {
            return Err(CartoeeError::Config {
                message: "Palette size must be at least 1".to_string(),
            });
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(CartoeeError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        match self.render.interpolation.as_str() {
            "nearest" | "bilinear" => {}
            _ => {
                return Err(CartoeeError::Config {
                    message: format!(
                        "Invalid interpolation method: {}. Must be one of: nearest, bilinear",
                        self.render.interpolation
                    ),
                });
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            imagery: ImageryConfig::default(),
            render: RenderConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ImageryConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            project: None,
            token: None,
            timeout_secs: None,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            interpolation: default_interpolation(),
            palette_size: default_palette_size(),
            pad_factor: default_pad_factor(),
        }
    }
}

// Default value functions for serde
fn default_endpoint() -> String {
    "http://127.0.0.1:8000/v1".to_string()
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

fn default_interpolation() -> String {
    "nearest".to_string()
}

fn default_palette_size() -> usize {
    crate::colormaps::DEFAULT_PALETTE_SIZE
}

fn default_pad_factor() -> f64 {
    0.05
}

fn default_log_level() -> String {
    "info".to_string()
}
