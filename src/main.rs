//! cartoee - render a remote raster onto a map and save it as PNG

use anyhow::Context;
use tracing::{error, info};

use cartoee::config::RenderJob;
use cartoee::logging::{log_error, log_timed_operation, Operation};
use cartoee::{
    add_colorbar, add_gridlines, add_layer, pad_view, CartoeeError, ColorbarOptions, Config,
    GeoAxes, GridlineOptions, ImageHandle, LayerOptions, Location, Pair, RestImageryService,
    VisParams,
};

fn main() -> anyhow::Result<()> {
    let (config, job) = Config::load().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        e
    })?;

    cartoee::init_tracing(&config.log_level);
    info!("Starting cartoee v{}", env!("CARGO_PKG_VERSION"));

    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    let op = Operation::start("render", job.image.as_str());
    let result = render(&config, &job);
    if let Err(e) = &result {
        if let Some(err) = e.downcast_ref::<CartoeeError>() {
            log_error(err, "render");
        }
    }
    op.finish(&result);
    result?;

    info!(output = %job.output.display(), "Map written");
    Ok(())
}

fn render(config: &Config, job: &RenderJob) -> anyhow::Result<()> {
    let service = RestImageryService::from_config(&config.imagery)
        .context("Failed to create imagery client")?;
    let mut axes = GeoAxes::from_config(&config.render)?;

    let vis_params = match &job.vis {
        Some(json) => VisParams::from_json(json).context("Invalid --vis JSON")?,
        None => VisParams::new(),
    };

    let image = ImageHandle::new(job.image.clone());
    let layer = LayerOptions {
        dims: job.dims,
        region: job.region,
        cmap: job.cmap.clone(),
        vis_params: Some(vis_params.clone()),
        palette_size: config.render.palette_size,
    };
    add_layer(&mut axes, &service, &image, &layer)
        .with_context(|| format!("Failed to add layer for {}", image))?;

    if let Some(loc) = &job.colorbar {
        let loc: Location = loc.parse()?;
        let mut options = ColorbarOptions {
            loc: Some(loc),
            discrete: job.discrete,
            label: job.label.clone(),
            ..Default::default()
        };
        if let Some(cmap) = &job.cmap {
            options.cmap = Some(cmap.clone());
        }
        let colorbar = add_colorbar(&mut axes, &vis_params, &options)?;
        for warning in &colorbar.warnings {
            eprintln!("warning: {}", warning);
        }
    }

    if job.grid_interval.is_some() || job.grid_ticks.is_some() {
        let options = GridlineOptions {
            interval: job.grid_interval.as_deref().map(parse_pair).transpose()?,
            n_ticks: job.grid_ticks.as_deref().map(parse_pair).transpose()?,
            ..Default::default()
        };
        add_gridlines(&mut axes, &options)?;
    }

    let pad = job.pad.unwrap_or(config.render.pad_factor);
    pad_view(&mut axes, Pair::Uniform(pad));

    log_timed_operation("save_png", || axes.save_png(&job.output))
        .with_context(|| format!("Failed to write {}", job.output.display()))?;
    Ok(())
}

/// Parse "v" or "x,y"
fn parse_pair<T: std::str::FromStr>(s: &str) -> anyhow::Result<Pair<T>> {
    let parse = |part: &str| {
        part.trim()
            .parse::<T>()
            .map_err(|_| anyhow::anyhow!("Invalid value '{}' in '{}'", part, s))
    };
    match s.split_once(',') {
        Some((x, y)) => Ok(Pair::Each(parse(x)?, parse(y)?)),
        None => Ok(Pair::Uniform(parse(s)?)),
    }
}
