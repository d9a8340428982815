use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use netbalance::optimizer::{Distribution, TrialResult};
use netbalance::results::RunSummary;
use netbalance::workload::Workload;

fn right_align(table: &mut Table, columns: std::ops::Range<usize>) {
    for i in columns {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn print_workload_report(workload: &Workload) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);

    let widest = workload.groups().iter().map(|g| g.delta()).max().unwrap_or(0);
    table.add_row(vec![Cell::new("Groups"), Cell::new(workload.group_count())]);
    table.add_row(vec![Cell::new("Buckets"), Cell::new(workload.bucket_count())]);
    table.add_row(vec![Cell::new("Total load"), Cell::new(workload.total_load())]);
    table.add_row(vec![
        Cell::new("Ideal bucket load"),
        Cell::new(format!("{:.2}", workload.ideal_bucket_load())),
    ]);
    table.add_row(vec![Cell::new("Widest group delta"), Cell::new(widest)]);
    table.add_row(vec![
        Cell::new("Fitness lower bound"),
        Cell::new(workload.lower_bound_fitness()).fg(Color::Green),
    ]);
    right_align(&mut table, 1..2);

    println!("\n=== 📦 WORKLOAD ===");
    println!("{}", table);
}

pub fn print_bucket_totals(name: &str, distribution: &Distribution) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Bucket").add_attribute(Attribute::Bold),
        Cell::new("Total"),
        Cell::new("Deviation"),
    ]);

    let mean = distribution.mean_total();
    let max = distribution.totals().iter().copied().max().unwrap_or(0);
    let min = distribution.totals().iter().copied().min().unwrap_or(0);
    for (bucket, &total) in distribution.totals().iter().enumerate() {
        let mut total_cell = Cell::new(total);
        if total == max {
            total_cell = total_cell.fg(Color::Red);
        } else if total == min {
            total_cell = total_cell.fg(Color::Cyan);
        }
        table.add_row(vec![
            Cell::new(bucket),
            total_cell,
            Cell::new(format!("{:+.1}", total as f64 - mean)),
        ]);
    }
    right_align(&mut table, 0..3);

    println!("\n{} distribution (fitness {})", name, distribution.fitness());
    println!("{}", table);
}

pub fn print_trial_report(results: &[TrialResult]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Trial").add_attribute(Attribute::Bold),
        Cell::new("Seed"),
        Cell::new("Greedy"),
        Cell::new("Initial"),
        Cell::new("Best").fg(Color::Green),
        Cell::new("Gens"),
        Cell::new("Time (s)"),
    ]);

    for r in results {
        table.add_row(vec![
            Cell::new(r.trial),
            Cell::new(r.seed.map_or_else(|| "-".to_string(), |s| s.to_string())),
            Cell::new(r.greedy_fitness),
            Cell::new(r.initial_best),
            Cell::new(r.best_fitness).add_attribute(Attribute::Bold),
            Cell::new(r.generations_run),
            Cell::new(format!("{:.2}", r.elapsed_secs)),
        ]);
    }
    right_align(&mut table, 0..7);

    println!("\n=== 🏆 TRIALS ===");
    println!("{}", table);
}

pub fn print_run_summary(summary: &RunSummary, lower_bound: u64) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Trials").add_attribute(Attribute::Bold),
        Cell::new("Best").fg(Color::Green),
        Cell::new("Worst").fg(Color::Red),
        Cell::new("Mean best"),
        Cell::new("Mean gens"),
        Cell::new("Lower bound"),
    ]);
    table.add_row(vec![
        Cell::new(summary.trials),
        Cell::new(summary.best),
        Cell::new(summary.worst),
        Cell::new(format!("{:.2}", summary.mean_best)),
        Cell::new(format!("{:.1}", summary.mean_generations)),
        Cell::new(lower_bound),
    ]);
    right_align(&mut table, 0..6);

    println!("{}", table);
    if summary.best == lower_bound {
        println!("✨ Best distribution matches the lower bound");
    }
}
