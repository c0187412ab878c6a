use std::{error::Error, process, sync::Arc};

use args::Args;
use clap::Parser;
use glam::Vec3;
use log::{debug, error, info};
use skinning::{animator::Animator, uniform::JointsUniformData};
use skinning_asset::loader::gltf::load_gltf_from_path;
use skinning_perf_tracker::PerformanceTracker;
use web_time::Instant;

mod args;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        error!("{}", err);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = args.animator_config()?;

    let load_start = Instant::now();
    let model = load_gltf_from_path(&args.model)?;
    info!(
        "Loaded {} in {:?}: {} nodes, {} skins, {} animations",
        args.model.display(),
        load_start.elapsed(),
        model.nodes.len(),
        model.skins.len(),
        model.animations.len()
    );

    let mut animator = Animator::new(Arc::new(model), &config)?;
    match animator.animation_duration() {
        Some(duration) => info!(
            "Playing animation #{} ({:.03}s) with {:?}, speed {}",
            animator.animation(),
            duration,
            animator.clock().mode(),
            animator.clock().playback_speed()
        ),
        None => info!("Model has no animations, keeping the bind pose"),
    }

    let mut tracker = PerformanceTracker::new(args.frames.max(1) as usize);
    for frame in 0..args.frames {
        let time = frame as f32 / args.fps;
        tracker.measure(|| animator.update(time))?;
    }

    for (skin, joints) in animator.palette().iter().enumerate() {
        let uniform = JointsUniformData::pack(joints)?;
        info!(
            "Skin #{}: {} joints, {} byte uniform",
            skin,
            uniform.joint_count(),
            uniform.as_bytes().len()
        );
        for (joint, matrix) in joints.iter().enumerate() {
            debug!(
                "  joint #{} origin {:?}",
                joint,
                matrix.transform_point3(Vec3::ZERO)
            );
        }
    }

    if let Some(stats) = tracker.stats() {
        info!(
            "{} updates, avg {:?}, min {:?}, max {:?}, {:.0} updates/s",
            stats.samples,
            stats.avg,
            stats.min,
            stats.max,
            stats.ups.unwrap_or_default()
        );
    }
    Ok(())
}
