use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use ly_core::hexagram::{self, Hexagram};
use ly_core::line::position_name;
use ly_core::{LINE_COUNT, Polarity};

pub fn run(query: &str) -> Result<(), String> {
    let query = query.trim();
    let is_encoding = query.len() == LINE_COUNT && query.chars().all(|c| matches!(c, '0' | '1'));

    let hexagram = if is_encoding {
        hexagram::lookup_encoding(query).map_err(|e| e.to_string())?
    } else if let Ok(number) = query.parse::<u32>() {
        hexagram::by_number(number).map_err(|e| e.to_string())?
    } else {
        let matches = hexagram::search(query);
        match matches.as_slice() {
            [] => return Err(format!("no hexagram matches '{query}'")),
            [only] => *only,
            _ => {
                print_matches(&matches);
                return Ok(());
            }
        }
    };

    show(hexagram);
    Ok(())
}

fn show(hexagram: &Hexagram) {
    println!("  {}", super::describe(hexagram));
    println!(
        "  {} {}",
        "Encoding:".dimmed(),
        hexagram.pattern.encode()
    );
    println!("  {}", hexagram.guaci());
    println!();
    let polarities = hexagram.pattern.polarities();
    for position in (0..LINE_COUNT).rev() {
        let stroke = match polarities[position] {
            Polarity::Yang => "━━━━━━━",
            Polarity::Yin => "━━━ ━━━",
        };
        println!("  {}  {stroke}", position_name(position));
    }
}

fn print_matches(matches: &[&Hexagram]) {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["#", "Name", "Pinyin", "English", "Encoding"]);
    for h in matches {
        table.add_row(vec![
            h.number.to_string(),
            h.name.to_string(),
            h.pinyin.to_string(),
            h.english.to_string(),
            h.pattern.encode(),
        ]);
    }
    println!("{table}");
    println!();
    println!("  {} matches", matches.len());
}
