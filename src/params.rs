use anyhow::{Result, bail};
use serde::Deserialize;
use serde_json::Value;

/// Raw parameters for the basic filter operation, as delivered by a caller.
///
/// Length thresholds arrive loosely typed (a JSON number or a string) and
/// are parsed and range-checked up front, before any external lookup. The
/// error messages produced here are part of the contract: callers match on
/// the exact text.
#[derive(Clone, Debug, Deserialize)]
pub struct FilterParams {
    pub workspace_name: String,
    pub assembly_input_ref: String,
    pub min_length: Value,
}

/// Raw parameters for the extended filter operation.
#[derive(Clone, Debug, Deserialize)]
pub struct FilterMaxParams {
    pub workspace_name: String,
    pub assembly_input_ref: String,
    pub min_length: Value,
    pub max_length: Value,
}

/// Validated configuration for the basic filter operation.
#[derive(Clone, Debug)]
pub struct FilterConfig {
    pub workspace_name: String,
    pub assembly_input_ref: String,
    pub min_length: u64,
}

/// Validated configuration for the extended filter operation.
#[derive(Clone, Debug)]
pub struct FilterMaxConfig {
    pub workspace_name: String,
    pub assembly_input_ref: String,
    pub min_length: u64,
    pub max_length: u64,
}

impl FilterParams {
    pub fn validate(&self) -> Result<FilterConfig> {
        let min_length = parse_min_length(&self.min_length)?;
        let workspace_name = require_workspace_name(&self.workspace_name)?;

        Ok(FilterConfig {
            workspace_name,
            assembly_input_ref: self.assembly_input_ref.clone(),
            min_length,
        })
    }
}

impl FilterMaxParams {
    /// The check order is observable: callers see the first failing message.
    pub fn validate(&self) -> Result<FilterMaxConfig> {
        let (min_length, max_length) = parse_min_max_lengths(&self.min_length, &self.max_length)?;
        let workspace_name = require_workspace_name(&self.workspace_name)?;

        Ok(FilterMaxConfig {
            workspace_name,
            assembly_input_ref: self.assembly_input_ref.clone(),
            min_length,
            max_length,
        })
    }
}

/// Parse and range-check a minimum length threshold.
pub fn parse_min_length(value: &Value) -> Result<u64> {
    parse_length(value, "min_length")
}

/// Parse and range-check a min/max threshold pair, enforcing `max > min`.
pub fn parse_min_max_lengths(min: &Value, max: &Value) -> Result<(u64, u64)> {
    let min_length = parse_length(min, "min_length")?;
    let max_length = parse_length(max, "max_length")?;

    if max_length <= min_length {
        bail!("max_length cannot be less than or equal to min_length");
    }

    Ok((min_length, max_length))
}

fn parse_length(value: &Value, name: &str) -> Result<u64> {
    let parsed: i64 = match value {
        Value::Number(n) => match n.as_i64() {
            Some(v) => v,
            None => bail!("Cannot parse integer from {} parameter", name),
        },
        Value::String(s) => match s.trim().parse() {
            Ok(v) => v,
            Err(_) => bail!("Cannot parse integer from {} parameter", name),
        },
        _ => bail!("Cannot parse integer from {} parameter", name),
    };

    if parsed < 0 {
        bail!("{} parameter cannot be negative", name);
    }

    Ok(parsed as u64)
}

fn require_workspace_name(name: &str) -> Result<String> {
    if name.is_empty() {
        bail!("workspace_name parameter cannot be empty");
    }
    Ok(name.to_string())
}
