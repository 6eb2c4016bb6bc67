use super::{probability, round2};
use crate::error::DiagnosticError;
use crate::models::PingResult;
use rand::Rng;
use std::fmt::Write;
use tracing::debug;

pub const MIN_COUNT: u32 = 1;
pub const MAX_COUNT: u32 = 10;
pub const DEFAULT_COUNT: u32 = 3;

const RTT_MIN_MS: f64 = 15.0;
const RTT_MAX_MS: f64 = 100.0;
const REPLY_TTL: u8 = 57;

/// Fabrique un ping de `count` échantillons. Échec global avec probabilité `failure_probability`.
pub fn simulate_ping<R: Rng + ?Sized>(
    rng: &mut R,
    host: &str,
    count: u32,
    failure_probability: f64,
) -> Result<PingResult, DiagnosticError> {
    if !(MIN_COUNT..=MAX_COUNT).contains(&count) {
        return Err(DiagnosticError::InvalidParameter(format!(
            "count must be between {MIN_COUNT} and {MAX_COUNT}"
        )));
    }

    if rng.gen_bool(probability(failure_probability)) {
        debug!(host, "ping simulé: timeout");
        return Err(DiagnosticError::Timeout);
    }

    let rtts: Vec<f64> = (0..count)
        .map(|_| round2(rng.gen_range(RTT_MIN_MS..=RTT_MAX_MS)))
        .collect();

    let min_rtt = rtts.iter().copied().fold(f64::INFINITY, f64::min);
    let max_rtt = rtts.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    // la moyenne arrondie reste dans [min, max] car min et max sont déjà arrondis
    let avg_rtt = round2(rtts.iter().sum::<f64>() / rtts.len() as f64).clamp(min_rtt, max_rtt);
    let jitter = round2(max_rtt - min_rtt);

    debug!(host, count, min_rtt, avg_rtt, max_rtt, "ping simulé");

    Ok(PingResult {
        host: host.to_string(),
        success: true,
        min_rtt,
        max_rtt,
        avg_rtt,
        jitter,
        packet_loss: 0,
        packets_sent: count,
        packets_received: count,
        raw_output: render_output(host, &rtts, min_rtt, avg_rtt, max_rtt, jitter),
        rtts,
    })
}

fn render_output(host: &str, rtts: &[f64], min: f64, avg: f64, max: f64, jitter: f64) -> String {
    let mut out = String::new();
    for (i, rtt) in rtts.iter().enumerate() {
        let _ = writeln!(out, "64 bytes from {host}: icmp_seq={} ttl={REPLY_TTL} time={rtt} ms", i + 1);
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "--- {host} ping statistics ---");
    let _ = writeln!(out, "{n} packets transmitted, {n} received, 0% packet loss", n = rtts.len());
    let _ = write!(out, "rtt min/avg/max/jitter = {min:.2}/{avg:.2}/{max:.2}/{jitter:.2} ms");
    out
}
