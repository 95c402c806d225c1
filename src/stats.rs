use crate::types::{Elog, SectionKind};
use comfy_table::{Attribute, Cell, Table};

// Display order: most severe class first.
const CLASSES: [SectionKind; 5] = [
    SectionKind::Error,
    SectionKind::Warning,
    SectionKind::Log,
    SectionKind::Info,
    SectionKind::Qa,
];

#[derive(Debug, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub unread: usize,
    pub important: usize,
    pub unparsed: usize,
    /// Entry count per overall class, in `CLASSES` order.
    pub per_class: Vec<(SectionKind, usize)>,
    pub total_size: u64,
}

#[must_use]
pub fn calculate_summary(entries: &[Elog]) -> Summary {
    let per_class = CLASSES
        .iter()
        .map(|class| {
            (
                *class,
                entries.iter().filter(|e| e.class == *class).count(),
            )
        })
        .collect();

    Summary {
        total: entries.len(),
        unread: entries.iter().filter(|e| !e.read).count(),
        important: entries.iter().filter(|e| e.important).count(),
        unparsed: entries.iter().filter(|e| !e.parse_ok).count(),
        per_class,
        total_size: entries.iter().map(|e| e.size).sum(),
    }
}

pub fn print_summary(summary: &Summary) {
    if summary.total == 0 {
        println!("No elogs.");
        return;
    }

    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_HORIZONTAL_ONLY);
    table.set_header(vec!["Class", "Elogs"]);

    for (class, count) in &summary.per_class {
        table.add_row(vec![
            Cell::new(class.label()).fg(class.color()),
            Cell::new(count),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL").add_attribute(Attribute::Bold),
        Cell::new(summary.total).add_attribute(Attribute::Bold),
    ]);

    println!("{table}");
    println!(
        "{} unread, {} important, {} unparseable, {} on disk",
        summary.unread,
        summary.important,
        summary.unparsed,
        human_bytes::human_bytes(summary.total_size as f64)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use std::path::PathBuf;

    fn make_entry(class: SectionKind, read: bool, size: u64) -> Elog {
        Elog {
            path: PathBuf::from("/tmp/test.log"),
            category: "sys-apps".to_string(),
            package: "dummy".to_string(),
            version: "1.0".to_string(),
            timestamp: NaiveDateTime::default(),
            size,
            sections: Vec::new(),
            class,
            parse_ok: true,
            read,
            important: false,
        }
    }

    #[test]
    fn test_summary_counts() {
        let entries = vec![
            make_entry(SectionKind::Error, false, 100),
            make_entry(SectionKind::Error, true, 50),
            make_entry(SectionKind::Info, false, 25),
        ];

        let summary = calculate_summary(&entries);

        assert_eq!(summary.total, 3);
        assert_eq!(summary.unread, 2);
        assert_eq!(summary.total_size, 175);
        assert_eq!(summary.per_class[0], (SectionKind::Error, 2));
        assert_eq!(summary.per_class[3], (SectionKind::Info, 1));
        assert_eq!(summary.per_class[4], (SectionKind::Qa, 0));
    }

    #[test]
    fn test_summary_empty() {
        let summary = calculate_summary(&[]);

        assert_eq!(summary.total, 0);
        assert_eq!(summary.total_size, 0);
        assert!(summary.per_class.iter().all(|(_, count)| *count == 0));
    }
}
