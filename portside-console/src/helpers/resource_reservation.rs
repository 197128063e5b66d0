//! Resource size parsing and reservation accounting
//!
//! Memory sizes move between three representations: size strings reported
//! by the cluster ("16318292Ki", "8Gi"), bytes stored on quotas, and the
//! megabyte values shown in the quota form. Size strings use 1024-based
//! units; the form uses 1000-based megabytes.

use portside_common::kubernetes::Pod;
use portside_common::{Error, Result};

const BYTES_PER_MEGABYTE: u64 = 1000 * 1000;

/// Parse a size string into bytes.
///
/// Accepts a number optionally followed by a unit: `B`, `K`/`KB`/`Ki`/`KiB`
/// and the same forms for `M`, `G`, `T` and `P` (case-insensitive). A bare
/// number is a byte count.
pub fn parse_size(value: &str) -> Result<u64> {
    let value = value.trim();
    let split = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.' || c == ','))
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);

    let number: f64 = number
        .replace(',', "")
        .parse()
        .map_err(|_| Error::Validation(format!("Invalid size: '{}'", value)))?;

    let multiplier: u64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1,
        "k" | "kb" | "ki" | "kib" => 1 << 10,
        "m" | "mb" | "mi" | "mib" => 1 << 20,
        "g" | "gb" | "gi" | "gib" => 1 << 30,
        "t" | "tb" | "ti" | "tib" => 1 << 40,
        "p" | "pb" | "pi" | "pib" => 1 << 50,
        _ => return Err(Error::Validation(format!("Invalid size unit: '{}'", value))),
    };

    Ok((number * multiplier as f64) as u64)
}

/// Bytes to whole megabytes, rounded down
pub fn mega_bytes_value(bytes: u64) -> u64 {
    bytes / BYTES_PER_MEGABYTE
}

/// Megabytes to bytes
pub fn bytes_value(mega_bytes: u64) -> Result<u64> {
    mega_bytes
        .checked_mul(BYTES_PER_MEGABYTE)
        .ok_or_else(|| Error::Validation(format!("Memory limit too large: {} MB", mega_bytes)))
}

/// Parse a CPU quantity ("250m", "2", "0.5") into cores
pub fn parse_cpu(value: &str) -> Result<f64> {
    let value = value.trim();
    let parsed = match value.strip_suffix('m') {
        Some(millis) => millis.parse::<f64>().map(|m| m / 1000.0),
        None => value.parse::<f64>(),
    };
    parsed.map_err(|_| Error::Validation(format!("Invalid CPU quantity: '{}'", value)))
}

/// CPU and memory requested by a set of pods
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ResourceReservation {
    /// Cores
    pub cpu: f64,
    /// Bytes
    pub memory: u64,
}

/// Sum the container requests of every pod. Missing requests count as zero.
pub fn compute_resource_reservation(pods: &[Pod]) -> Result<ResourceReservation> {
    let mut reservation = ResourceReservation::default();

    for container in pods.iter().flat_map(|pod| pod.containers.iter()) {
        if let Some(cpu) = &container.requests.cpu {
            reservation.cpu += parse_cpu(cpu)?;
        }
        if let Some(memory) = &container.requests.memory {
            reservation.memory += parse_size(memory)?;
        }
    }

    Ok(reservation)
}
