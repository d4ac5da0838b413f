//! Run configuration validation.

use crate::schema::RunConfig;
use smp_quad::MAX_DEPTH_LIMIT;
use std::collections::HashSet;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Duplicate entry: {id} in {context}")]
    DuplicateEntry { id: String, context: String },

    #[error("Invalid distribution for {context}: {source}")]
    Distribution {
        context: String,
        source: smp_model::ModelError,
    },
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.states == 0 {
        return Err(invalid("states", config.states, "must be at least 1"));
    }
    if !config.t_max.is_finite() || config.t_max < 0.0 {
        return Err(invalid("t_max", config.t_max, "must be finite and non-negative"));
    }
    if !config.time_step.is_finite() || config.time_step <= 0.0 {
        return Err(invalid(
            "time_step",
            config.time_step,
            "must be finite and positive",
        ));
    }
    if !config.tol.is_finite() || config.tol <= 0.0 {
        return Err(invalid("tol", config.tol, "must be finite and positive"));
    }
    if config.threads == Some(0) {
        return Err(invalid("threads", 0, "must be at least 1"));
    }
    if config.quadrature.max_depth > MAX_DEPTH_LIMIT {
        return Err(invalid(
            "quadrature.max_depth",
            config.quadrature.max_depth,
            &format!("must be at most {MAX_DEPTH_LIMIT}"),
        ));
    }
    if config.quadrature.validate().is_err() {
        return Err(invalid(
            "quadrature.min_width",
            config.quadrature.min_width,
            "must be finite and non-negative",
        ));
    }

    if let Some(distribution) = &config.sojourn {
        distribution
            .validate()
            .map_err(|source| ValidationError::Distribution {
                context: "sojourn".to_string(),
                source,
            })?;
    }

    let mut seen = HashSet::new();
    for def in &config.edge_distributions {
        let id = format!("{}->{}", def.from, def.to);
        if def.from >= config.states || def.to >= config.states {
            return Err(invalid(
                "edge_distributions",
                &id,
                "state index out of range",
            ));
        }
        if !seen.insert((def.from, def.to)) {
            return Err(ValidationError::DuplicateEntry {
                id,
                context: "edge_distributions".to_string(),
            });
        }
        def.distribution
            .validate()
            .map_err(|source| ValidationError::Distribution {
                context: format!("edge {id}"),
                source,
            })?;
    }

    Ok(())
}
