pub mod cast;
pub mod list;
pub mod lookup;

use colored::Colorize;

use ly_core::line::position_name;
use ly_core::{Hexagram, LINE_COUNT, Lines};

/// Print a cast top line first, marking changing lines.
fn print_lines(lines: &Lines) {
    for position in (0..LINE_COUNT).rev() {
        let line = lines[position];
        let row = format!(
            "  {}  {}  {} {}",
            position_name(position),
            line.symbol(),
            line.value(),
            line.label()
        );
        if line.is_changing() {
            println!("{}", row.yellow());
        } else {
            println!("{row}");
        }
    }
}

/// One-line hexagram summary with its trigrams.
fn describe(hexagram: &Hexagram) -> String {
    format!(
        "{}  {}",
        hexagram.to_string().bold(),
        format!("{} over {}", hexagram.upper(), hexagram.lower()).dimmed()
    )
}
