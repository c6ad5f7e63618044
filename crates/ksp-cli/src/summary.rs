use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use ksp_cli::commands::{IngestReport, TrainReport};
use ksp_model::Outcome;

pub fn print_ingest_summary(report: &IngestReport) {
    println!("Store: {}", report.store.display());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Batch"),
        header_cell("Raw rows"),
        header_cell("Clean rows"),
        header_cell("Dropped"),
    ]);
    apply_summary_table_style(&mut table);
    for column in 1..=3 {
        align_column(&mut table, column, CellAlignment::Right);
    }

    let mut total_raw = 0usize;
    for batch in &report.batches {
        total_raw += batch.raw_rows;
        let dropped = batch.raw_rows - batch.clean_rows;
        table.add_row(vec![
            Cell::new(&batch.source).fg(Color::Blue),
            Cell::new(batch.raw_rows),
            Cell::new(batch.clean_rows),
            count_cell(dropped, Color::Yellow),
        ]);
    }
    let total_clean = report.clean_rows();
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_raw).add_attribute(Attribute::Bold),
        Cell::new(total_clean).add_attribute(Attribute::Bold),
        count_cell(total_raw - total_clean, Color::Yellow).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    if report.appended {
        println!("Appended {total_clean} rows.");
    }
}

pub fn print_train_summary(report: &TrainReport) {
    println!("Model: {}", report.model.display());
    println!("SHA-256: {}", report.digest);

    let mut table = Table::new();
    table.set_header(vec![header_cell("Metric"), header_cell("Value")]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);

    let confusion = report.metrics.confusion;
    let rows: Vec<(&str, String)> = vec![
        ("Rows", report.rows.to_string()),
        ("Train rows", report.train_rows.to_string()),
        ("Test rows", report.test_rows.to_string()),
        ("Encoded width", report.width.to_string()),
        ("Seed", report.options.seed.to_string()),
        ("Neighbors", report.options.neighbors.to_string()),
        ("True positive", confusion.true_positive.to_string()),
        ("False positive", confusion.false_positive.to_string()),
        ("True negative", confusion.true_negative.to_string()),
        ("False negative", confusion.false_negative.to_string()),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), Cell::new(value)]);
    }
    table.add_row(vec![
        Cell::new("Accuracy").add_attribute(Attribute::Bold),
        score_cell(report.metrics.accuracy),
    ]);
    table.add_row(vec![
        Cell::new("F1").add_attribute(Attribute::Bold),
        score_cell(report.metrics.f1),
    ]);
    println!("{table}");
}

pub fn print_prediction(outcome: Outcome) {
    let cell = match outcome {
        Outcome::Successful => Cell::new("successful")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Outcome::Failed => Cell::new("failed").fg(Color::Red),
    };
    let mut table = Table::new();
    table.set_header(vec![header_cell("Prediction"), header_cell("Outcome")]);
    apply_summary_table_style(&mut table);
    table.add_row(vec![Cell::new(outcome.label()), cell]);
    println!("{table}");
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn score_cell(score: f64) -> Cell {
    let color = if score >= 0.8 {
        Color::Green
    } else if score >= 0.6 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{score:.4}"))
        .fg(color)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color)
    } else {
        Cell::new(count).fg(Color::DarkGrey)
    }
}
