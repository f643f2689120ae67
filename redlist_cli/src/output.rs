use std::collections::BTreeMap;
use std::io::Write;

use anyhow::Result;
use redlist_lib::{ChartData, SpeciesRecord};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
    Markdown,
}

#[derive(Tabled, Serialize)]
struct SpeciesRow {
    #[tabled(rename = "Scientific Name")]
    #[serde(rename = "Scientific Name")]
    scientific_name: String,
    #[tabled(rename = "Common Name")]
    #[serde(rename = "Common Name")]
    common_name: String,
    #[tabled(rename = "Status")]
    #[serde(rename = "Status")]
    category: String,
    #[tabled(rename = "Trend")]
    #[serde(rename = "Trend")]
    population_trend: String,
    #[tabled(rename = "Habitat")]
    #[serde(rename = "Habitat")]
    habitat: String,
}

#[derive(Tabled, Serialize)]
struct FieldRow {
    #[tabled(rename = "Field")]
    #[serde(rename = "Field")]
    field: &'static str,
    #[tabled(rename = "Value")]
    #[serde(rename = "Value")]
    value: String,
}

#[derive(Tabled, Serialize)]
struct CountRow {
    #[tabled(rename = "Label")]
    #[serde(rename = "Label")]
    label: String,
    #[tabled(rename = "Count")]
    #[serde(rename = "Count")]
    count: usize,
}

// -- Row builders --

fn build_species_rows(records: &[SpeciesRecord]) -> Vec<SpeciesRow> {
    records
        .iter()
        .map(|r| SpeciesRow {
            scientific_name: r.scientific_name().to_string(),
            common_name: r.common_name().to_string(),
            category: r.category().to_string(),
            population_trend: r.population_trend().to_string(),
            habitat: r.habitat().to_string(),
        })
        .collect()
}

fn build_field_rows(record: &SpeciesRecord) -> Vec<FieldRow> {
    vec![
        FieldRow { field: "Scientific Name", value: record.scientific_name().to_string() },
        FieldRow { field: "Common Name", value: record.common_name().to_string() },
        FieldRow { field: "Conservation Status", value: record.category().to_string() },
        FieldRow { field: "Population Trend", value: record.population_trend().to_string() },
        FieldRow { field: "Habitat", value: record.habitat().to_string() },
        FieldRow { field: "Threats", value: record.threats().to_string() },
        FieldRow { field: "Conservation Measures", value: record.conservation_measures().to_string() },
    ]
}

fn build_count_rows(counts: &BTreeMap<String, usize>) -> Vec<CountRow> {
    let mut rows: Vec<CountRow> = counts
        .iter()
        .map(|(label, count)| CountRow {
            label: label.clone(),
            count: *count,
        })
        .collect();
    // Largest slice first, ties in label order
    rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    rows
}

// -- Table output --

pub fn print_species_table(records: &[SpeciesRecord]) {
    println!("{}", Table::new(build_species_rows(records)));
}

// -- Markdown output --

pub fn print_species_markdown(records: &[SpeciesRecord]) {
    let mut table = Table::new(build_species_rows(records));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- CSV output --

pub fn print_species_csv(records: &[SpeciesRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for row in build_species_rows(records) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// -- Single species --

pub fn print_species_detail(record: &SpeciesRecord, format: &OutputFormat) -> Result<()> {
    let rows = build_field_rows(record);
    match format {
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(std::io::stdout());
            for row in rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
        }
        OutputFormat::Markdown => {
            let mut table = Table::new(rows);
            table.with(Style::markdown());
            println!("{}", table);
        }
        _ => println!("{}", Table::new(rows)),
    }
    Ok(())
}

// -- Chart data --

/// Prints the count tables behind the charts. In CSV mode they go to stderr
/// so stdout stays a single CSV document of species rows.
pub fn print_chart_data(chart: &ChartData, format: &OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => write_chart_data(chart, format, &mut std::io::stderr().lock()),
        _ => write_chart_data(chart, format, &mut std::io::stdout().lock()),
    }
}

fn write_chart_data<W: Write>(chart: &ChartData, format: &OutputFormat, out: &mut W) -> Result<()> {
    let sections = [
        ("Conservation Status Distribution", &chart.status_counts),
        ("Population Trend Distribution", &chart.trend_counts),
    ];
    for (title, counts) in sections {
        let rows = build_count_rows(counts);
        match format {
            OutputFormat::Csv => {
                writeln!(out, "{}", title)?;
                let mut wtr = csv::Writer::from_writer(&mut *out);
                for row in rows {
                    wtr.serialize(row)?;
                }
                wtr.flush()?;
            }
            OutputFormat::Markdown => {
                let mut table = Table::new(rows);
                table.with(Style::markdown());
                writeln!(out, "\n#### {}\n\n{}", title, table)?;
            }
            _ => writeln!(out, "\n{}\n{}", title, Table::new(rows))?,
        }
    }
    Ok(())
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redlist_lib::map_species;
    use redlist_lib::search::build_chart_data;
    use serde_json::json;

    fn load_records() -> Vec<SpeciesRecord> {
        let entries = [
            json!({"result": [{
                "scientific_name": "Panthera leo",
                "main_common_name": "Lion",
                "category": "VU",
                "population_trend": "Decreasing",
                "habitat": "Savanna"
            }]}),
            json!({"result": [{
                "scientific_name": "Panthera tigris",
                "main_common_name": "Tiger",
                "category": "EN",
                "population_trend": "Increasing"
            }]}),
            json!({"result": [{
                "scientific_name": "Ailuropoda melanoleuca",
                "category": "VU",
                "population_trend": "Increasing"
            }]}),
        ];
        entries
            .iter()
            .map(|e| map_species(Some(e)).unwrap())
            .collect()
    }

    #[test]
    fn test_build_species_rows_mapping() {
        let records = load_records();
        let rows = build_species_rows(&records);
        assert_eq!(rows.len(), 3);

        let row = &rows[0];
        assert_eq!(row.scientific_name, "Panthera leo");
        assert_eq!(row.common_name, "Lion");
        assert_eq!(row.category, "Vulnerable");
        assert_eq!(row.population_trend, "Decreasing");
        assert_eq!(row.habitat, "Savanna");
    }

    #[test]
    fn test_build_species_rows_defaults() {
        let records = load_records();
        let rows = build_species_rows(&records);
        assert_eq!(rows[1].habitat, "Not Available");
        assert_eq!(rows[2].common_name, "Not Available");
    }

    #[test]
    fn test_build_species_rows_empty() {
        assert!(build_species_rows(&[]).is_empty());
    }

    #[test]
    fn test_build_field_rows_covers_all_fields() {
        let records = load_records();
        let rows = build_field_rows(&records[0]);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[2].field, "Conservation Status");
        assert_eq!(rows[2].value, "Vulnerable");
        assert_eq!(rows[5].value, "Not Available");
    }

    #[test]
    fn test_build_count_rows_sorted_by_count() {
        let records = load_records();
        let chart = build_chart_data(&records);

        let status = build_count_rows(&chart.status_counts);
        assert_eq!(status[0].label, "Vulnerable");
        assert_eq!(status[0].count, 2);
        assert_eq!(status[1].label, "Endangered");

        let trend = build_count_rows(&chart.trend_counts);
        assert_eq!(trend[0].label, "Increasing");
        assert_eq!(trend[0].count, 2);
    }

    #[test]
    fn test_species_table_has_headers() {
        let table = Table::new(build_species_rows(&load_records())).to_string();
        assert!(table.contains("Scientific Name"));
        assert!(table.contains("Panthera tigris"));
    }

    #[test]
    fn test_species_markdown_style() {
        let mut table = Table::new(build_species_rows(&load_records()));
        table.with(Style::markdown());
        let rendered = table.to_string();
        assert!(rendered.starts_with("| Scientific Name"));
    }

    #[test]
    fn test_species_csv_headers() {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        for row in build_species_rows(&load_records()) {
            wtr.serialize(row).unwrap();
        }
        let data = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        let first_line = data.lines().next().unwrap();
        assert_eq!(first_line, "Scientific Name,Common Name,Status,Trend,Habitat");
    }

    #[test]
    fn test_chart_csv_blocks_are_titled() {
        let chart = build_chart_data(&load_records());
        let mut buf = Vec::new();
        write_chart_data(&chart, &OutputFormat::Csv, &mut buf).unwrap();
        let data = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = data.lines().collect();
        assert_eq!(lines[0], "Conservation Status Distribution");
        assert_eq!(lines[1], "Label,Count");
        assert_eq!(lines[2], "Vulnerable,2");
        assert!(lines.contains(&"Population Trend Distribution"));
    }

    #[test]
    fn test_chart_table_sections() {
        let chart = build_chart_data(&load_records());
        let mut buf = Vec::new();
        write_chart_data(&chart, &OutputFormat::Markdown, &mut buf).unwrap();
        let data = String::from_utf8(buf).unwrap();
        assert!(data.contains("#### Conservation Status Distribution"));
        assert!(data.contains("| Label"));
    }
}
