//! Token-compression telemetry reported by the backend.

use serde::{Deserialize, Serialize};

/// Compression statistics attached to a program-scoped reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompressionStats {
    pub original_tokens: i64,
    pub compressed_tokens: i64,
    pub tokens_saved: i64,
    /// Fraction of tokens removed, `0.0..=1.0`.
    pub compression_ratio: f64,
    /// Which compressor produced the numbers (e.g. "scaledown", "fallback").
    #[serde(default)]
    pub provider: String,
}

impl CompressionStats {
    /// Reduction as a whole percentage.
    #[allow(clippy::cast_possible_truncation)]
    pub fn reduction_percent(&self) -> i64 {
        (self.compression_ratio * 100.0).round() as i64
    }

    /// Short badge text shown under a reply, if anything was saved.
    pub fn badge(&self) -> Option<String> {
        (self.tokens_saved > 0).then(|| {
            format!(
                "{} tokens saved ({}%)",
                self.tokens_saved,
                self.reduction_percent()
            )
        })
    }
}

/// Full result of `POST /api/compress`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressionResult {
    #[serde(default)]
    pub compressed_text: String,
    #[serde(default)]
    pub original_chars: usize,
    #[serde(default)]
    pub compressed_chars: usize,
    #[serde(flatten)]
    pub stats: CompressionStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(saved: i64, ratio: f64) -> CompressionStats {
        CompressionStats {
            original_tokens: 100,
            compressed_tokens: 100 - saved,
            tokens_saved: saved,
            compression_ratio: ratio,
            provider: "fallback".to_string(),
        }
    }

    #[test]
    fn badge_rounds_ratio() {
        assert_eq!(stats(42, 0.416).badge().as_deref(), Some("42 tokens saved (42%)"));
    }

    #[test]
    fn no_badge_when_nothing_saved() {
        assert!(stats(0, 0.0).badge().is_none());
    }

    #[test]
    fn compress_result_flattens_stats() {
        let json = r#"{"compressed_text":"x","original_chars":10,"compressed_chars":1,
            "original_tokens":3,"compressed_tokens":1,"compression_ratio":0.667,
            "tokens_saved":2,"provider":"scaledown"}"#;
        let result: CompressionResult = serde_json::from_str(json).unwrap();
        assert_eq!(result.stats.tokens_saved, 2);
        assert_eq!(result.stats.provider, "scaledown");
    }
}
