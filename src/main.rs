//! Fractal tree skeleton generator
//!
//! Grows a branching, tree-like 3-D skeleton by randomized recursive
//! subdivision and emits it as a flat collection of tapered beams (plus
//! optional terminal leaf spheres) for downstream solid-geometry or preview
//! tooling.
//!
//! The main entrypoint is actually in [`cli::run`] ('src/cli.rs'), which
//! handles argument parsing -- that in turn calls the `run` method on
//! [`AppSettings`]

use std::fs::File;
use std::io::{self, Write};
use std::process::exit;

use eyre::{eyre, Context};
use glam::Vec3;
use serde::Serialize;

mod cli;
mod float;
mod gen;
mod img;
mod skeleton;
mod vec_utils;

pub use float::Float;
pub use skeleton::Skeleton;

use gen::{FractalTree, GrowthConfig, GrowthParams};
use img::{rgb, rgba, ImageConfig, PixelCount, Projection};

struct AppSettings<'cli> {
    model: cli::Model<'cli>,
    seed: Option<u64>,
    display_method: cli::DisplayMethod<'cli>,
}

/// A tapered cylindrical segment of the generated skeleton
///
/// A beam's `end`/`end_radius` are the `start`/`start_radius` of every child
/// branch grown from it; the skeleton itself keeps no explicit parent/child
/// links.
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Beam {
    pub start: Vec3,
    pub start_radius: Float,
    pub end: Vec3,
    pub end_radius: Float,
}

/// A spherical marker capping a terminal branch
#[derive(Copy, Clone, Debug, PartialEq, Serialize)]
pub struct Leaf {
    pub pos: Vec3,
    pub radius: Float,
}

fn main() {
    // Internally calls `AppSettings::run`
    cli::run()
}

/// Returns the built-in sample model, used when no model file is supplied
///
/// A structured five-generation tree growing upwards; small enough that its
/// worst case (9331 beams) is nowhere near the loader's ceiling.
fn sample_config() -> GrowthConfig {
    GrowthConfig {
        iterations: 5,
        initial_length: 25.0,
        branching_angle: 30.0,
        max_divergence_angle: 45.0,
        branch_probability: 0.75,
        max_branch_attempts: 6,
        length_randomness: 0.25,
        rotation_randomness: 0.5,
        divergence_randomness: 0.2,
        reduction_factor: 0.75,
        growth_direction: Vec3::Z,
        include_leaves: true,
        structured: true,
    }
}

impl AppSettings<'_> {
    /// Runs the app until completion, using the settings filled by the `cli` module
    fn run(&self) {
        let (params, model_seed) = self.make_params().unwrap_or_else(|e| {
            eprintln!("{:?}", e.wrap_err("failed to construct growth parameters"));
            exit(1)
        });

        // The projection for `--png` needs this after `params` is moved into
        // the generator.
        let growth_direction = params.growth_direction();

        let seed = self.seed.or(model_seed);
        let skeleton = FractalTree::new(params).grow(seed);

        eprintln!(
            "info: generated {} beams and {} leaves",
            skeleton.count_beams(),
            skeleton.count_leaves()
        );

        let result = match &self.display_method {
            cli::DisplayMethod::Csv { file } => Self::write_csv(&skeleton, *file),
            cli::DisplayMethod::Json { file } => Self::write_json(&skeleton, *file),
            cli::DisplayMethod::Png { file } => Self::write_png(&skeleton, growth_direction, *file),
        };

        if let Err(e) = result {
            eprintln!("{:?}", e.wrap_err("failed to write output"));
            exit(1)
        }
    }

    /// Produces the validated growth parameters, plus the model file's seed
    /// if it supplied one
    fn make_params(&self) -> eyre::Result<(GrowthParams, Option<u64>)> {
        match &self.model {
            cli::Model::FromJson { file } => gen::from_json::from_file(file),
            cli::Model::Sample => Ok((GrowthParams::new(&sample_config()), None)),
        }
    }

    /// Opens the given file for writing, or falls back to stdout
    fn file_or_stdout(file: Option<&str>) -> eyre::Result<Box<dyn io::Write>> {
        match file {
            Some(f) => {
                let file = File::create(f)
                    .wrap_err_with(|| format!("failed to open file {:?} for writing", f))?;
                Ok(Box::new(file))
            }
            None => Ok(Box::new(io::stdout())),
        }
    }

    /// Writes the skeleton as CSV, one row per beam or leaf
    fn write_csv(skeleton: &Skeleton, file: Option<&str>) -> eyre::Result<()> {
        let mut writer = Self::file_or_stdout(file)?;

        writeln!(
            writer,
            "kind,start_x,start_y,start_z,start_radius,end_x,end_y,end_z,end_radius"
        )?;

        for b in skeleton.beams() {
            writeln!(
                writer,
                "beam,{},{},{},{},{},{},{},{}",
                b.start.x,
                b.start.y,
                b.start.z,
                b.start_radius,
                b.end.x,
                b.end.y,
                b.end.z,
                b.end_radius
            )?;
        }

        // Leaves are just a position and radius; the `end` columns stay
        // empty.
        for leaf in skeleton.leaves() {
            writeln!(
                writer,
                "leaf,{},{},{},{},,,,",
                leaf.pos.x, leaf.pos.y, leaf.pos.z, leaf.radius
            )?;
        }

        writer.flush()?;
        Ok(())
    }

    /// Writes the whole skeleton as a JSON document
    fn write_json(skeleton: &Skeleton, file: Option<&str>) -> eyre::Result<()> {
        let mut writer = Self::file_or_stdout(file)?;

        serde_json::to_writer_pretty(&mut writer, skeleton)
            .wrap_err("failed to serialize skeleton")?;
        writeln!(writer)?;

        writer.flush()?;
        Ok(())
    }

    /// Renders an orthographic preview of the skeleton and saves it as a PNG
    fn write_png(skeleton: &Skeleton, growth_direction: Vec3, file: &str) -> eyre::Result<()> {
        const MIN_DIM: PixelCount = 500;
        const PAD: PixelCount = 50;

        let (lo, hi) = skeleton
            .bounds()
            .ok_or_else(|| eyre!("cannot render an empty skeleton"))?;

        let projection = Projection::facing(growth_direction);

        // Project the corners of the bounding box to find the (conservative)
        // extent of the drawing on the view plane.
        let mut min = (Float::INFINITY, Float::INFINITY);
        let mut max = (Float::NEG_INFINITY, Float::NEG_INFINITY);
        for &x in &[lo.x, hi.x] {
            for &y in &[lo.y, hi.y] {
                for &z in &[lo.z, hi.z] {
                    let (px, py) = projection.project(Vec3::new(x, y, z));
                    min = (min.0.min(px), min.1.min(py));
                    max = (max.0.max(px), max.1.max(py));
                }
            }
        }

        let span = (max.0 - min.0, max.1 - min.1);

        let scale = match span.0 > span.1 {
            true => MIN_DIM as Float / span.0,
            false => MIN_DIM as Float / span.1,
        };

        let width = (scale * span.0) as PixelCount + PAD;
        let height = (scale * span.1) as PixelCount + PAD;

        let img_config = ImageConfig {
            projection,
            centered_at: ((min.0 + max.0) / 2.0, (min.1 + max.1) / 2.0),
            width,
            height,
            scale,
            background: rgba(0x00000000),
            beam_color: rgb(0x8b5a2b),
            leaf_color: rgb(0x2f9e44),
        };

        img_config
            .make_image(skeleton)
            .save(file)
            .wrap_err_with(|| format!("failed to write image to {:?}", file))?;

        Ok(())
    }
}
