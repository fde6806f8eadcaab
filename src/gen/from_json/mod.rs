//! The JSON model loader: parsing and eager validation of growth parameters

use super::{worst_case_beams, GrowthParams};
use eyre::{eyre, Context};
use std::fs;
use std::path::Path;

mod config;

pub use config::{GrowthConfig, ParsedConfig};

/// Practical ceiling on the worst-case number of beams a model may generate
///
/// The recursion engine itself performs no internal cap and will happily
/// exhaust memory if told to; models whose combinatorial bound exceeds this
/// are rejected here, before any generation starts.
const MAX_WORST_CASE_BEAMS: u64 = 10_000_000;

/// Loads and validates growth parameters from the JSON model file at the
/// given path
///
/// Returns the normalized parameters together with the model's optional
/// seed.
pub fn from_file(file: &Path) -> eyre::Result<(GrowthParams, Option<u64>)> {
    let file_content = fs::read_to_string(file)
        .wrap_err_with(|| format!("failed to read file at {:?}", file.to_string_lossy()))?;

    from_str(&file_content)
}

/// The part of [`from_file`] that doesn't touch the filesystem; split out so
/// that tests can feed it strings directly
fn from_str(file_content: &str) -> eyre::Result<(GrowthParams, Option<u64>)> {
    let parsed: ParsedConfig =
        serde_json::from_str(file_content).wrap_err("could not deserialize JSON model")?;

    validate(&parsed.params)?;

    Ok((GrowthParams::new(&parsed.params), parsed.seed))
}

/// Rejects malformed growth parameters before they reach the generator
fn validate(params: &GrowthConfig) -> eyre::Result<()> {
    if !(params.initial_length > 0.0 && params.initial_length.is_finite()) {
        return Err(eyre!("initial length must be a finite value > 0"))
            .context("invalid value at .params.initial_length in JSON model spec");
    }

    if !(params.reduction_factor > 0.0 && params.reduction_factor <= 1.0) {
        return Err(eyre!(
            "reduction factor {} must be within (0, 1]",
            params.reduction_factor
        ))
        .context("invalid value at .params.reduction_factor in JSON model spec");
    }

    if !(0.0..=1.0).contains(&params.branch_probability) {
        return Err(eyre!(
            "branch probability {} must be within 0..=1",
            params.branch_probability
        ))
        .context("invalid value at .params.branch_probability in JSON model spec");
    }

    if !params.branching_angle.is_finite() || !params.max_divergence_angle.is_finite() {
        return Err(eyre!("angles must be finite"))
            .context("invalid value at .params.branching_angle in JSON model spec");
    }

    for (name, value) in [
        ("length_randomness", params.length_randomness),
        ("rotation_randomness", params.rotation_randomness),
        ("divergence_randomness", params.divergence_randomness),
    ] {
        if !(value >= 0.0 && value.is_finite()) {
            return Err(eyre!("randomness factor must be >= 0"))
                .with_context(|| format!("invalid value at .params.{} in JSON model spec", name));
        }
    }

    // A jitter of 2 would allow `1 + jitter * -0.5` to reach zero, i.e. a
    // zero-length branch.
    if params.length_randomness >= 2.0 {
        return Err(eyre!(
            "length randomness {} must be less than 2 so that branch lengths stay positive",
            params.length_randomness
        ))
        .context("invalid value at .params.length_randomness in JSON model spec");
    }

    if !params.growth_direction.is_finite() || params.growth_direction.length_squared() == 0.0 {
        return Err(eyre!("growth direction must be a finite, non-zero vector"))
            .context("invalid value at .params.growth_direction in JSON model spec");
    }

    let worst_case = worst_case_beams(params.iterations, params.max_branch_attempts);
    if worst_case > MAX_WORST_CASE_BEAMS {
        return Err(eyre!(
            "model may generate up to {} beams, more than the supported maximum of {}",
            worst_case,
            MAX_WORST_CASE_BEAMS
        ))
        .context(
            "combinatorial budget exceeded by .params.iterations and \
             .params.max_branch_attempts in JSON model spec",
        );
    }

    Ok(())
}
