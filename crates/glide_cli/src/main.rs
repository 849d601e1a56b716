//! Glide CLI - run a property animation in the terminal
//!
//! Animates a single `double` property on an in-memory object with the real
//! clock and prints the value written on every frame.
//!
//! ```text
//! glide --duration 500 --fps 30 --easing ease-in-out-quad --from 0 --to 100
//! RUST_LOG=glide_animation=trace glide --config glide.toml
//! ```

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use glide_animation::{Animation, AnimationConfig, AnimationEvent, Easing};
use glide_core::{Clock, MainLoop, PropertyMap, Reactor, Value};
use tracing_subscriber::EnvFilter;

/// Run a property animation and print each frame
#[derive(Parser, Debug)]
#[command(name = "glide")]
#[command(about = "Run a property animation and print each frame")]
#[command(version)]
struct Args {
    /// Animation config file (TOML); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Duration in milliseconds
    #[arg(short, long)]
    duration: Option<u32>,

    /// Frames per second
    #[arg(long)]
    fps: Option<u32>,

    /// Easing mode (linear, ease-in-quad, ease-out-quad, ease-in-out-quad, ease-in-cubic)
    #[arg(short, long)]
    easing: Option<Easing>,

    /// Name of the animated property
    #[arg(long, default_value = "value")]
    property: String,

    /// Start value
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    from: f64,

    /// End value
    #[arg(long, default_value_t = 100.0, allow_hyphen_values = true)]
    to: f64,

    /// Log frame statistics on exit
    #[arg(long)]
    stats: bool,
}

impl Args {
    fn animation_config(&self) -> Result<AnimationConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let source = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                AnimationConfig::from_toml_str(&source)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => AnimationConfig::default(),
        };

        if let Some(duration) = self.duration {
            config.duration_ms = duration;
        }
        if let Some(fps) = self.fps {
            config.frame_rate = fps;
        }
        if let Some(easing) = self.easing {
            config.easing = easing;
        }
        config.debug |= self.stats;
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = args.animation_config()?;

    let main_loop = Rc::new(MainLoop::with_system_clock());
    let target = Rc::new(RefCell::new(
        PropertyMap::new().with(args.property.as_str(), args.from),
    ));

    let animation = Animation::builder(target.clone())
        .config(config)
        .build(&main_loop)
        .context("creating animation")?;
    animation
        .add_property(&args.property, args.to)
        .with_context(|| format!("animating {}", args.property))?;

    let clock = main_loop.clock();
    let started_at = clock.now_ms();
    let printer = target.clone();
    let name = args.property.clone();
    animation.connect(move |event| match event {
        AnimationEvent::Tick => {
            if let Some(v) = printer.borrow().value(&name).and_then(Value::as_f64) {
                println!("{:>6} ms  {} = {:.3}", clock.now_ms() - started_at, name, v);
            }
        }
        AnimationEvent::Stopped { completed } => {
            tracing::info!(completed, "animation finished");
        }
        AnimationEvent::Started => {}
    });

    tracing::info!(
        duration_ms = config.duration_ms,
        frame_rate = config.frame_rate,
        easing = %config.easing,
        "starting animation"
    );
    animation.start().context("starting animation")?;
    main_loop.run();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "glide",
            "--duration",
            "900",
            "--easing",
            "ease-in-cubic",
            "--from",
            "-5",
        ]);
        let config = args.animation_config().unwrap();
        assert_eq!(config.duration_ms, 900);
        assert_eq!(config.easing, Easing::EaseInCubic);
        assert_eq!(config.frame_rate, 60);
        assert_eq!(args.from, -5.0);
    }

    #[test]
    fn test_zero_fps_rejected() {
        let args = Args::parse_from(["glide", "--fps", "0"]);
        assert!(args.animation_config().is_err());
    }

    #[test]
    fn test_unknown_easing_rejected_by_parser() {
        assert!(Args::try_parse_from(["glide", "--easing", "bounce"]).is_err());
    }
}
