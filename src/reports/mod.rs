use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Table};
use slapseg::config::Operation;
use slapseg::orchestrator::KindSummary;

pub fn print_run_summary(operation: Operation, seed: u64, summaries: &[KindSummary]) {
    if summaries.is_empty() {
        println!("No images were processed.");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Kind").add_attribute(Attribute::Bold),
        Cell::new("Images"),
        Cell::new("Workers"),
        Cell::new("Time (s)"),
        Cell::new("Logs"),
    ]);

    for s in summaries {
        let logs: Vec<String> = s
            .logs
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        table.add_row(vec![
            Cell::new(s.kind.to_string()).add_attribute(Attribute::Bold),
            Cell::new(s.images).set_alignment(CellAlignment::Right),
            Cell::new(s.workers).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", s.duration.as_secs_f32()))
                .set_alignment(CellAlignment::Right),
            Cell::new(logs.join("\n")),
        ]);
    }

    println!("\n=== {:?} run (seed {}) ===", operation, seed);
    println!("{}", table);
}
