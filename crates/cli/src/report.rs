//! Simulation report printing.

use contracts::StreamStats;
use ingestion::SimulationReport;

/// Samples sent per second across both streams
pub fn throughput(report: &SimulationReport) -> f64 {
    let secs = report.elapsed.as_secs_f64();
    if secs > 0.0 {
        (report.density_sent + report.position_sent) as f64 / secs
    } else {
        0.0
    }
}

/// Print detailed summary
pub fn print_summary(report: &SimulationReport, show_results: bool) {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Simulation Statistics                     ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    println!("📊 Overview");
    println!("   ├─ Seed: {}", report.seed);
    println!("   ├─ Duration: {:.2}s", report.elapsed.as_secs_f64());
    println!("   ├─ Density samples sent: {}", report.density_sent);
    println!("   ├─ Position samples sent: {}", report.position_sent);
    println!("   ├─ Throughput: {:.2} samples/s", throughput(report));
    println!("   └─ Stopped early: {}", report.stopped_early);

    println!("\n🗄  Buffers");
    print_stream("Density", &report.buffer_stats.density);
    print_stream("Position", &report.buffer_stats.position);
    match report.buffer_stats.clock_us {
        Some(clock) => println!("   └─ Shared clock: {} us", clock),
        None => println!("   └─ Shared clock: unset"),
    }

    println!("\n📈 {}", report.query_metrics.summary());

    if show_results && !report.results.is_empty() {
        println!("🔎 Query Results");
        let last = report.results.len() - 1;
        for (i, result) in report.results.iter().enumerate() {
            let branch = if i == last { "└─" } else { "├─" };
            println!("   {} #{:<4} {}", branch, i, result);
        }
        println!();
    }
}

fn print_stream(label: &str, stats: &StreamStats) {
    let span = match (stats.oldest_timestamp_us, stats.newest_timestamp_us) {
        (Some(oldest), Some(newest)) => format!("[{}, {}] us", oldest, newest),
        _ => "empty".to_string(),
    };
    println!(
        "   ├─ {}: depth={}, span={}, evicted={}, out_of_order={}",
        label, stats.depth, span, stats.evicted_count, stats.out_of_order_count
    );
}
