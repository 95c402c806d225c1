use chrono::NaiveDateTime;
use std::path::PathBuf;

/// Classification of one elog section. The five known tags come from the
/// package manager's elog classes; anything else a file announces is kept
/// under `Other` with its literal tag preserved on the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Error,
    Warning,
    Log,
    Info,
    Qa,
    Other,
}

impl SectionKind {
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ERROR" => Self::Error,
            "WARN" => Self::Warning,
            "LOG" => Self::Log,
            "INFO" => Self::Info,
            "QA" => Self::Qa,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Log => "log",
            Self::Info => "info",
            Self::Qa => "qa",
            Self::Other => "other",
        }
    }

    /// Rank used to pick an entry's overall class: error outranks warning,
    /// warning outranks log, and so on down to qa.
    #[must_use]
    pub fn severity(self) -> u8 {
        match self {
            Self::Error => 5,
            Self::Warning => 4,
            Self::Log => 3,
            Self::Info => 2,
            Self::Qa => 1,
            Self::Other => 0,
        }
    }

    #[must_use]
    pub fn color(self) -> comfy_table::Color {
        match self {
            Self::Error => comfy_table::Color::Red,
            Self::Warning => comfy_table::Color::Yellow,
            Self::Log | Self::Info | Self::Qa => comfy_table::Color::Green,
            Self::Other => comfy_table::Color::White,
        }
    }
}

/// One classified block of text within an elog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    /// Literal marker text, e.g. `WARN`. Empty for the synthetic section
    /// holding content that precedes any marker.
    pub tag: String,
    /// Install phase after the marker colon, e.g. `postinst`. May be empty.
    pub stage: String,
    pub body: String,
}

/// One elog file, parsed.
#[derive(Debug, Clone)]
pub struct Elog {
    pub path: PathBuf,
    pub category: String,
    pub package: String,
    pub version: String,
    pub timestamp: NaiveDateTime,
    pub size: u64,
    pub sections: Vec<Section>,
    /// Highest known section class present; `Info` when none is.
    pub class: SectionKind,
    /// False only for an empty or whitespace-only file.
    pub parse_ok: bool,
    pub read: bool,
    pub important: bool,
}

impl Elog {
    /// `category/package-version`, the name the package manager knows the
    /// build as.
    #[must_use]
    pub fn atom(&self) -> String {
        if self.version.is_empty() {
            format!("{}/{}", self.category, self.package)
        } else {
            format!("{}/{}-{}", self.category, self.package, self.version)
        }
    }
}

/// A root or file the scan had to skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWarning {
    pub path: PathBuf,
    pub reason: String,
}

/// Everything one directory scan produced.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub entries: Vec<Elog>,
    pub warnings: Vec<ScanWarning>,
}
