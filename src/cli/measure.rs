use std::time::Instant;

use tracing::debug;

use crate::error::Result;
use crate::store::RuleStore;

/// Human-readable duration from milliseconds: `μs` below one millisecond,
/// `s` from one second, always two decimals.
pub fn format_time(ms: f64) -> String {
    if ms < 1.0 {
        format!("{:.2} μs", ms * 1000.0)
    } else if ms < 1000.0 {
        format!("{:.2} ms", ms)
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

/// Rule loading timings in milliseconds, one sample per iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadTimeStats {
    pub samples: Vec<f64>,
    pub rule_count: usize,
}

impl LoadTimeStats {
    fn sorted(&self) -> Vec<f64> {
        let mut sorted = self.samples.clone();
        sorted.sort_by(f64::total_cmp);
        sorted
    }

    pub fn min(&self) -> f64 {
        self.sorted().first().copied().unwrap_or_default()
    }

    pub fn max(&self) -> f64 {
        self.sorted().last().copied().unwrap_or_default()
    }

    pub fn average(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    /// Upper median: the middle sample, or the higher of the two middle ones.
    pub fn median(&self) -> f64 {
        let sorted = self.sorted();
        sorted.get(sorted.len() / 2).copied().unwrap_or_default()
    }

    pub fn render(&self) -> String {
        let mut out = format!(
            "Measuring rule loading performance ({} rule file(s))\n\n",
            self.rule_count
        );
        for (i, sample) in self.samples.iter().enumerate() {
            out.push_str(&format!("  Iteration {}: {}\n", i + 1, format_time(*sample)));
        }
        out.push_str("\nStatistics:\n");
        out.push_str(&format!("  Min:     {}\n", format_time(self.min())));
        out.push_str(&format!("  Max:     {}\n", format_time(self.max())));
        out.push_str(&format!("  Average: {}\n", format_time(self.average())));
        out.push_str(&format!("  Median:  {}\n", format_time(self.median())));
        out
    }
}

/// Time `iterations` full loads of the rule tree after one warm-up load.
pub fn measure_load_time(store: &RuleStore, iterations: usize) -> Result<LoadTimeStats> {
    let rule_count = store.load_all_rules()?.len();
    debug!(rule_count, iterations, "Warm-up load finished");

    let mut samples = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        let start = Instant::now();
        store.load_all_rules()?;
        samples.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    Ok(LoadTimeStats {
        samples,
        rule_count,
    })
}
