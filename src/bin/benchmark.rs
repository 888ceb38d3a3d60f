use chrono::{Duration as ChronoDuration, Utc};
use colored::*;
use governor::{Quota, RateLimiter};
use hdrhistogram::Histogram;
use reqwest::Client;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_SLUG: &str = "benchmark-bistro";
const DEFAULT_STAGES: &str = "10,50,200,1000";

struct BenchSettings {
    base_url: String,
    slug: String,
    stages: Vec<NonZeroU32>,
    stage_duration: Duration,
    time: String,
    party_size: u32,
}

impl BenchSettings {
    fn from_env() -> Result<Self, String> {
        let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());

        let stages = parse_stages(&var("BENCH_STAGES", DEFAULT_STAGES))?;
        let secs: u64 = var("BENCH_DURATION_SECS", "20").parse()
            .map_err(|_| "BENCH_DURATION_SECS must be a number".to_string())?;
        let party_size = var("BENCH_PARTY_SIZE", "4").parse()
            .map_err(|_| "BENCH_PARTY_SIZE must be a number".to_string())?;

        Ok(Self {
            base_url: var("BENCH_URL", DEFAULT_BASE_URL),
            slug: var("BENCH_SLUG", DEFAULT_SLUG),
            stages,
            stage_duration: Duration::from_secs(secs),
            time: var("BENCH_TIME", "19:00:00"),
            party_size,
        })
    }

    fn availability_url(&self) -> String {
        let day = (Utc::now() + ChronoDuration::days(1)).format("%Y-%m-%d");
        format!(
            "{}/api/restaurant/{}/availability?day={}&time={}&partySize={}",
            self.base_url, self.slug, day, self.time, self.party_size
        )
    }
}

/// Comma-separated requests-per-second targets, e.g. `10,50,200`.
fn parse_stages(raw: &str) -> Result<Vec<NonZeroU32>, String> {
    let stages = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<NonZeroU32>().map_err(|_| format!("invalid stage '{}' in BENCH_STAGES", s)))
        .collect::<Result<Vec<_>, _>>()?;

    if stages.is_empty() {
        return Err("BENCH_STAGES has no stages".to_string());
    }
    Ok(stages)
}

#[derive(Default)]
struct StageReport {
    ok: u64,
    client_errors: u64,
    server_errors: u64,
    transport_errors: u64,
    latencies_us: Vec<u64>,
}

impl StageReport {
    fn record(&mut self, latency: Duration, status: Option<u16>) {
        match status {
            Some(s) if s < 400 => self.ok += 1,
            Some(s) if s < 500 => self.client_errors += 1,
            Some(_) => self.server_errors += 1,
            None => self.transport_errors += 1,
        }
        self.latencies_us.push(latency.as_micros() as u64);
    }

    fn total(&self) -> u64 {
        self.ok + self.client_errors + self.server_errors + self.transport_errors
    }

    fn success_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.ok as f64 / total as f64 * 100.0,
        }
    }

    /// (mean, p99) in milliseconds.
    fn latency_ms(&self) -> (f64, f64) {
        let Ok(mut histogram) = Histogram::<u64>::new(3) else {
            return (0.0, 0.0);
        };
        for &us in &self.latencies_us {
            let _ = histogram.record(us);
        }
        (histogram.mean() / 1000.0, histogram.value_at_quantile(0.99) as f64 / 1000.0)
    }
}

#[tokio::main]
async fn main() {
    let settings = match BenchSettings::from_env() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", format!("❌ {}", e).red().bold());
            return;
        }
    };

    println!("{}", "🚀 Starting Benchmark Suite".bold().green());
    println!("Target URL: {}", settings.base_url);

    let client = match Client::builder()
        .pool_max_idle_per_host(1000)
        .timeout(Duration::from_secs(10))
        .build()
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", format!("❌ Could not build HTTP client: {}", e).red().bold());
            return;
        }
    };

    if client.get(format!("{}/health", settings.base_url)).send().await.is_err() {
        eprintln!("{}", format!("❌ Server is NOT reachable at {}. Please start it first.", settings.base_url).red().bold());
        return;
    }

    let availability_url = settings.availability_url();
    match client.get(&availability_url).send().await {
        Ok(res) if res.status().is_success() => {
            println!("{}", "✅ Restaurant answers availability queries.".green());
        }
        Ok(res) => {
            eprintln!(
                "{}",
                format!("⚠️  Availability returned {} for slug '{}'. Seed it or set BENCH_SLUG.", res.status(), settings.slug).yellow()
            );
        }
        Err(e) => {
            eprintln!("{}", format!("❌ Availability request failed: {}", e).red());
            return;
        }
    }

    let targets = [
        ("Health Check", format!("{}/health", settings.base_url)),
        ("Availability Search", availability_url),
    ];

    for (name, url) in &targets {
        println!("\n{}", "=".repeat(72));
        println!("{} {}", name.cyan().bold(), url);
        println!("{:<8} | {:>10} | {:>10} | {:>8} | {:>6} | {:>6} | {:>6}", "RPS", "Mean ms", "P99 ms", "OK %", "4xx", "5xx", "net");

        for &rps in &settings.stages {
            let report = run_stage(&client, url, rps, settings.stage_duration).await;
            let (mean_ms, p99_ms) = report.latency_ms();
            println!(
                "{:<8} | {:>10.2} | {:>10.2} | {:>7.1}% | {:>6} | {:>6} | {:>6}",
                rps, mean_ms, p99_ms, report.success_rate(),
                report.client_errors, report.server_errors, report.transport_errors
            );
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    }
}

async fn run_stage(client: &Client, url: &str, rps: NonZeroU32, duration: Duration) -> StageReport {
    let limiter = RateLimiter::direct(Quota::per_second(rps));
    let deadline = Instant::now() + duration;
    let mut in_flight = JoinSet::new();

    while Instant::now() < deadline {
        limiter.until_ready().await;
        let request = client.get(url).send();
        in_flight.spawn(async move {
            let started = Instant::now();
            let status = request.await.ok().map(|r| r.status().as_u16());
            (started.elapsed(), status)
        });
    }

    let mut report = StageReport::default();
    while let Some(joined) = in_flight.join_next().await {
        if let Ok((latency, status)) = joined {
            report.record(latency, status);
        }
    }
    report
}
