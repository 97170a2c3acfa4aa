//! labellerd - synthetic end-to-end run of the doorplate labelling engine.
//!
//! Feeds a scripted mix of noisy and lit crops through the configured
//! backends and prints the per-frame decision plus the smoothed label. Useful
//! for eyeballing the decision flow without any model files.

use anyhow::Result;
use clap::Parser;

use doorplate_labeller::detect::backends;
use doorplate_labeller::{Frame, LabellerConfig, LabellingEngine};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Number of synthetic frames to run.
    #[arg(long, default_value_t = 24)]
    frames: u32,
    /// Clear the smoothed label every N frames (simulates a subject change).
    #[arg(long, default_value_t = 12)]
    reset_every: u32,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let cfg = LabellerConfig::load()?;
    let (classifier, detector) = backends::from_config(&cfg)?;
    let mut engine = LabellingEngine::new(classifier, detector, &cfg)?;

    for frame_index in 0..args.frames {
        if args.reset_every > 0 && frame_index > 0 && frame_index % args.reset_every == 0 {
            log::info!("frame {}: subject change, clearing history", frame_index);
            engine.clear_most_frequent_label();
        }

        let (crop, context) = synthetic_pair(frame_index)?;
        let prediction = engine.predict(&crop, &context)?;
        log::info!(
            "frame {}: raw={} stabilized={:?} labelled={}",
            frame_index,
            prediction.raw,
            prediction.stabilized,
            prediction.labelled
        );
    }

    engine.close();
    Ok(())
}

/// Every third frame is a near-black noise crop; the rest are lit crops whose
/// intensity encodes a repeatable digit pattern for the stub detector.
fn synthetic_pair(frame_index: u32) -> Result<(Frame, Frame)> {
    if frame_index % 3 == 2 {
        let crop = Frame::filled(5, 48, 48)?;
        let context = Frame::filled(5, 96, 32)?;
        return Ok((crop, context));
    }
    // Band mean ends in the same digit across the crop, cycling per subject.
    let digit = 100 + (frame_index / 12) % 10;
    let value = digit as u8;
    let crop = Frame::filled(value, 48, 48)?;
    let context = Frame::filled(value, 96, 32)?;
    Ok((crop, context))
}
