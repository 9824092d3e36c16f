use std::cmp::Ordering;
use std::time::Instant;

use bd_core::extract::extract_with_rule;
use bd_core::{decide_click, is_bundle_deal_url, Settings};

pub struct BenchOptions {
    pub iterations: usize,
    pub warmup_ops: usize,
}

/// Link shapes seen on listing, search and campaign pages.
const CORPUS: &[&str] = &[
    "https://www.aliexpress.com/ssr/300000512/BundleDeals2?productIds=1005006904562409:12000038&pha_manifest=ssr",
    "https://www.aliexpress.com/gcp/300000512/BundleDeals?productIds=1005006904562409%3A12000038%2C1005005111111111",
    "https://www.aliexpress.com/item/1005006904562409.html?spm=a2g0o.home.0.0",
    "https://www.aliexpress.us/item/1005006904562409.html",
    "https://www.aliexpress.com/p/bundle?utparam-url=%7B%22x_object_id%22%3A1005006904562409%7D&x_object_id%253A1005006904562409",
    "https://m.aliexpress.com/detail?productId=1005006904562409&ts=1718000000000",
    "https://s.click.aliexpress.com/e/_DmV9?bz=1005006904562409",
    "https://www.aliexpress.com/category/100003109/women-clothing.html",
    "https://www.aliexpress.com/w/wholesale-phone-case.html?page=2",
    "/BundleDeals%zz",
];

fn percentile(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((sorted.len() - 1) as f64 * pct).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn time_op(samples: &mut Vec<f64>, op: impl Fn()) {
    let start = Instant::now();
    op();
    samples.push(start.elapsed().as_secs_f64() * 1_000_000.0);
}

fn report(name: &str, mut samples: Vec<f64>) {
    samples.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let total: f64 = samples.iter().sum();
    println!(
        "  {:<20} ops: {:>8}  mean: {:>7.2}us  p50: {:>7.2}us  p99: {:>7.2}us",
        name,
        samples.len(),
        if samples.is_empty() { 0.0 } else { total / samples.len() as f64 },
        percentile(&samples, 0.50),
        percentile(&samples, 0.99),
    );
}

pub fn run(opts: BenchOptions) -> Result<(), String> {
    if opts.iterations == 0 {
        return Err("Iterations must be at least 1".to_string());
    }

    println!("============================================================");
    println!("Extraction Benchmark");
    println!("============================================================");
    println!("Corpus: {} URLs, {} iterations", CORPUS.len(), opts.iterations);

    for i in 0..opts.warmup_ops {
        let url = CORPUS[i % CORPUS.len()];
        std::hint::black_box(extract_with_rule(Some(url)));
    }

    let settings = Settings {
        auto_redirect_enabled: true,
        ..Settings::default()
    };

    let capacity = opts.iterations * CORPUS.len();
    let mut classify = Vec::with_capacity(capacity);
    let mut extract = Vec::with_capacity(capacity);
    let mut click = Vec::with_capacity(capacity);

    for _ in 0..opts.iterations {
        for &url in CORPUS {
            time_op(&mut classify, || {
                std::hint::black_box(is_bundle_deal_url(Some(url)));
            });
            time_op(&mut extract, || {
                std::hint::black_box(extract_with_rule(Some(url)));
            });
            time_op(&mut click, || {
                std::hint::black_box(decide_click(&settings, Some(url)));
            });
        }
    }

    report("is_bundle_deal_url", classify);
    report("extract_ali_id", extract);
    report("decide_click", click);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percentile() {
        let samples = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile(&samples, 0.0), 1.0);
        assert_eq!(percentile(&samples, 0.5), 3.0);
        assert_eq!(percentile(&samples, 1.0), 5.0);
        assert_eq!(percentile(&[], 0.5), 0.0);
    }

    #[test]
    fn test_run_rejects_zero_iterations() {
        assert!(run(BenchOptions { iterations: 0, warmup_ops: 0 }).is_err());
    }
}
