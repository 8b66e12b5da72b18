use std::collections::BTreeSet;

use shorthand::{ClassificationResult, LookupReport, MatchCandidate};

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";

    pub struct Palette {
        enabled: bool,
    }

    impl Palette {
        pub fn new(enabled: bool) -> Self {
            Self { enabled }
        }

        fn wrap(&self, s: &str, code: &str) -> String {
            if self.enabled { format!("{code}{s}{RESET}") } else { s.to_string() }
        }

        pub fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
            self.wrap(s.as_ref(), color)
        }

        pub fn bold(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), BOLD)
        }

        pub fn dim(&self, s: impl AsRef<str>) -> String {
            self.wrap(s.as_ref(), DIM)
        }
    }
}

pub fn print_run(
    report: &LookupReport,
    tags: Option<&BTreeSet<String>>,
    classification: &ClassificationResult,
    color: bool,
) {
    let palette = ansi::Palette::new(color);
    println!("\n{}", palette.bold(palette.paint(format!("⚙  Identifying: \"{}\"", report.text), ansi::CYAN)));
    println!(
        "  {} {}  {} {}",
        palette.dim("normalized:"),
        palette.paint(&report.normalized, ansi::YELLOW),
        palette.dim("│ rules:"),
        palette.paint(&report.table_version, ansi::BLUE),
    );

    println!("\n{}", palette.paint("━━━ Vehicle candidates ━━━", ansi::GRAY));
    if report.candidates.is_empty() {
        println!("{}", palette.dim("  No vehicle shorthand recognized"));
        println!(
            "  {}",
            palette.dim(format!(
                "{} of {} patterns tested (buckets {:?})",
                report.metrics.patterns_tested, report.metrics.patterns_total, report.buckets
            ))
        );
    } else {
        for (idx, candidate) in report.candidates.iter().enumerate() {
            print_candidate(idx, candidate, &palette);
        }
    }

    if let Some(tags) = tags {
        println!("\n{}", palette.paint("━━━ Tags (top candidate) ━━━", ansi::GRAY));
        let joined = tags.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
        println!("  {}", palette.paint(joined, ansi::GREEN));
    }

    println!("\n{}", palette.paint("━━━ Fallback category ━━━", ansi::GRAY));
    println!(
        "  {} {} {}",
        palette.bold(palette.paint(&classification.category, ansi::GREEN)),
        palette.dim("│ confidence"),
        palette.paint(classification.confidence.to_string(), ansi::YELLOW),
    );
    if let Some(pattern) = &classification.matched_pattern {
        println!("      {} {}", palette.dim("pattern:"), palette.paint(pattern, ansi::CYAN));
    }

    println!("\n{}", palette.paint("━━━ Timing ━━━", ansi::GRAY));
    println!(
        "  Total: {}  │  Matching: {}  │  Resolve: {}  │  Hits: {}",
        palette.paint(format!("{:?}", report.metrics.total), ansi::GREEN),
        palette.paint(format!("{:?}", report.metrics.matching), ansi::CYAN),
        palette.dim(format!("{:?}", report.metrics.resolve)),
        palette.dim(report.metrics.hits.to_string()),
    );
    println!();
}

fn print_candidate(idx: usize, candidate: &MatchCandidate, palette: &ansi::Palette) {
    let rule = &candidate.rule;
    let fuel = rule.fuel.as_deref().unwrap_or("-");
    println!(
        "  {} {} {} {}",
        palette.paint(format!("[{idx}]"), ansi::GRAY),
        palette.bold(palette.paint(rule.label(), ansi::GREEN)),
        palette.dim("│"),
        palette.paint(format!("confidence {}", candidate.confidence), ansi::YELLOW),
    );
    println!(
        "      {} {}  {} {}  {} {}  {} {}",
        palette.dim("pattern:"),
        palette.paint(&candidate.pattern, ansi::CYAN),
        palette.dim("│ matched:"),
        palette.paint(&candidate.matched_span, ansi::BLUE),
        palette.dim("│ fuel:"),
        fuel,
        palette.dim("│ priority:"),
        rule.priority,
    );
}
