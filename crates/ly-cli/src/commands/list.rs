use comfy_table::{ContentArrangement, Table};

use ly_core::{Trigram, hexagram};

pub fn run(trigram: Option<&str>) -> Result<(), String> {
    let filter = trigram
        .map(Trigram::parse)
        .transpose()
        .map_err(|e| e.to_string())?;

    let results: Vec<_> = hexagram::all()
        .iter()
        .filter(|h| filter.is_none_or(|t| h.upper() == t || h.lower() == t))
        .collect();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Pinyin", "English", "Upper", "Lower", "Encoding"]);

    for h in &results {
        table.add_row(vec![
            h.number.to_string(),
            h.name.to_string(),
            h.pinyin.to_string(),
            h.english.to_string(),
            h.upper().to_string(),
            h.lower().to_string(),
            h.pattern.encode(),
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} hexagrams", results.len());

    Ok(())
}
