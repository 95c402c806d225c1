use crate::types::{Elog, ScanWarning, Section, SectionKind};
use colored::{Color, Colorize};
use comfy_table::{Attribute, Cell, Table};

/// Terminal color for one section class. Mirrors the table-cell mapping in
/// `SectionKind::color`, but for the `colored` crate used in the detail view.
fn term_color(kind: SectionKind) -> Color {
    match kind {
        SectionKind::Error => Color::Red,
        SectionKind::Warning => Color::Yellow,
        SectionKind::Log | SectionKind::Info | SectionKind::Qa => Color::Green,
        SectionKind::Other => Color::White,
    }
}

fn file_name(elog: &Elog) -> String {
    elog.path
        .file_name()
        .map_or_else(|| elog.path.display().to_string(), |n| {
            n.to_string_lossy().to_string()
        })
}

pub fn print_list(entries: &[&Elog]) {
    if entries.is_empty() {
        println!("No elogs.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_HORIZONTAL_ONLY);
    table.set_header(vec![
        "", "!", "Category", "Package", "Version", "Class", "Date", "File",
    ]);

    for elog in entries {
        let mut row = vec![
            Cell::new(if elog.read { " " } else { "●" }),
            Cell::new(if elog.important { "★" } else { "" }).fg(comfy_table::Color::Red),
            Cell::new(&elog.category),
            Cell::new(&elog.package),
            Cell::new(&elog.version),
            Cell::new(elog.class.label()).fg(elog.class.color()),
            Cell::new(elog.timestamp.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(file_name(elog)),
        ];
        if !elog.read {
            row = row
                .into_iter()
                .map(|cell| cell.add_attribute(Attribute::Bold))
                .collect();
        }
        table.add_row(row);
    }

    println!("{table}");
}

fn section_header(section: &Section) -> String {
    if section.stage.is_empty() {
        section.tag.clone()
    } else {
        format!("{} ({})", section.tag, section.stage)
    }
}

pub fn print_detail(elog: &Elog) {
    println!(
        "{}",
        format!(
            "=== {} ({}) ===",
            elog.atom(),
            elog.timestamp.format("%Y-%m-%d %H:%M:%S")
        )
        .cyan()
    );

    if !elog.parse_ok {
        println!("{}", "(empty elog)".yellow());
        return;
    }

    for section in &elog.sections {
        let header = section_header(section);
        if !header.is_empty() {
            println!("{}", header.color(term_color(section.kind)).bold());
        }
        if !section.body.is_empty() {
            println!("{}", section.body);
        }
        println!();
    }
}

pub fn print_warnings(warnings: &[ScanWarning]) {
    for warning in warnings {
        println!(
            "{} {}: {}",
            "WARNING:".yellow(),
            warning.path.display(),
            warning.reason
        );
    }
}
