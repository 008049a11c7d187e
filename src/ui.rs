//! Terminal rendering: tables, labelled properties and batch progress.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::time::Duration;

use crate::directory::{CleanupEvent, ScanHit};
use crate::error::RemovalResult;
use crate::formats::CATEGORIES;
use crate::formatting::format_dimensions;
use crate::inspector::ImageMetadata;
use crate::report::FileDetails;

pub fn print_property(label: &str, value: &str, color: Color) {
    let label_styled = style(format!("  {label}")).cyan().bold();
    let arrow = style("→").dim();

    let value_styled = match color {
        Color::Yellow => style(value).yellow(),
        Color::Green => style(value).green(),
        Color::Red => style(value).red(),
        _ => style(value).white(),
    };

    println!("{label_styled} {arrow} {value_styled}");
}

pub fn print_section(title: &str) {
    println!("\n{}", style(title).cyan().bold().underlined());
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", style("✗").red().bold(), style(message).red());
}

pub fn print_success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
        .add_attribute(Attribute::Underlined)
}

fn key_value_table(entries: &BTreeMap<String, String>) -> Table {
    let mut table = base_table();
    table.set_header(vec![header_cell("Tag"), header_cell("Value")]);
    for (key, value) in entries {
        table.add_row(vec![
            Cell::new(key).fg(Color::Rgb {
                r: 160,
                g: 196,
                b: 255,
            }),
            Cell::new(value),
        ]);
    }
    table
}

/// Prints the image information, EXIF tags and PNG text chunks of a file.
pub fn render_image_metadata(path: &Path, metadata: &ImageMetadata) {
    println!("\n{} {}", style("Metadata for").bold(), path.display());

    print_section("File Information");
    let info = &metadata.file_info;
    print_property("Format", &info.format, Color::White);
    print_property("Mode", &info.mode, Color::White);
    print_property(
        "Size",
        &format_dimensions(info.width, info.height),
        Color::White,
    );

    print_section("EXIF Data");
    if metadata.exif_data.is_empty() {
        println!("  {}", style("No EXIF data found").dim());
    } else {
        println!("{}", key_value_table(&metadata.exif_data));
    }

    if !metadata.png_metadata.is_empty() {
        print_section("PNG Metadata");
        println!("{}", key_value_table(&metadata.png_metadata));
    }
}

pub fn render_file_details(details: &FileDetails) {
    print_section("Filesystem");
    print_property("Path", &details.path.display().to_string(), Color::White);
    let category = details
        .category
        .map(|category| category.label())
        .unwrap_or("Unknown");
    print_property("Category", category, Color::White);
    print_property(
        "MIME",
        details.mime.as_deref().unwrap_or("Unknown"),
        Color::White,
    );
    print_property("Size", &details.size, Color::White);
    print_property("Modified", &details.modified, Color::White);
    let (readonly, color) = if details.readonly {
        ("Yes", Color::Yellow)
    } else {
        ("No", Color::Green)
    };
    print_property("Read-only", readonly, color);
    if let Some(permissions) = &details.permissions {
        print_property("Permissions", permissions, Color::White);
    }
    if let Some(owner) = &details.owner {
        print_property("Owner", owner, Color::White);
    }
    if let Some(group) = &details.group {
        print_property("Group", group, Color::White);
    }
    print_property("MD5", &details.md5, Color::White);
    print_property("SHA-256", &details.sha256, Color::White);
}

pub fn render_formats() {
    let mut table = base_table();
    table.set_header(vec![header_cell("Category"), header_cell("Extensions")]);
    for category in CATEGORIES {
        let extensions = category
            .extensions()
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![
            Cell::new(category.label()).add_attribute(Attribute::Bold),
            Cell::new(extensions),
        ]);
    }
    println!("{table}");
}

pub fn render_scan_hits(root: &Path, hits: &[ScanHit]) {
    if hits.is_empty() {
        println!(
            "{}",
            style(format!("No files with metadata under {}", root.display())).dim()
        );
        return;
    }

    let mut table = base_table();
    table.set_header(vec![
        header_cell("File"),
        header_cell("Format"),
        header_cell("EXIF tags"),
        header_cell("PNG chunks"),
    ]);
    for hit in hits {
        let shown = hit.path.strip_prefix(root).unwrap_or(&hit.path);
        table.add_row(vec![
            Cell::new(shown.display()),
            Cell::new(&hit.metadata.file_info.format),
            Cell::new(hit.metadata.exif_data.len()).fg(Color::Yellow),
            Cell::new(hit.metadata.png_metadata.len()).fg(Color::Yellow),
        ]);
    }
    println!("{table}");
    println!(
        "{}",
        style(format!("{} file(s) with metadata", hits.len())).dim()
    );
}

pub fn render_removal_result(result: &RemovalResult) {
    if result.success {
        print_success(&format!("Metadata removed: {}", result.message));
    } else {
        print_error(&result.message);
    }
}

/// Asks a yes/no question on stdin; anything but `y`/`yes` is a no.
///
/// Fails when stdin is not a terminal, so scripts get an error instead of a
/// silent "no".
pub fn confirm(prompt: &str) -> io::Result<bool> {
    if !io::stdin().is_terminal() {
        return Err(io::Error::other(
            "confirmation required but stdin is not a terminal; pass --yes",
        ));
    }

    print!("{} {} ", style(prompt).bold(), style("[y/N]").dim());
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Drives a progress bar from the events of a directory cleanup.
pub struct CleanupProgress {
    bar: Option<ProgressBar>,
    verbose: bool,
}

impl CleanupProgress {
    pub fn new(verbose: bool) -> Self {
        Self { bar: None, verbose }
    }

    pub fn handle(&mut self, event: &CleanupEvent) {
        match event {
            CleanupEvent::Started { total } => {
                let bar = ProgressBar::new(*total as u64);
                if let Ok(progress_style) = ProgressStyle::with_template(
                    "{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}",
                ) {
                    bar.set_style(
                        progress_style
                            .tick_strings(&["▹▹▹", "▸▹▹", "▹▸▹", "▹▹▸", "▹▹▹"])
                            .progress_chars("=> "),
                    );
                }
                bar.enable_steady_tick(Duration::from_millis(120));
                self.bar = Some(bar);
            }
            CleanupEvent::Processing { path, .. } => {
                if let Some(bar) = &self.bar {
                    bar.set_message(path.display().to_string());
                }
            }
            CleanupEvent::Success { path, output } => {
                if self.verbose {
                    self.println(format!(
                        "{} {} {} {}",
                        style("✓").green(),
                        path.display(),
                        style("→").dim(),
                        output
                    ));
                }
                self.tick();
            }
            CleanupEvent::Failure { path, error } => {
                self.println(format!(
                    "{} {}: {}",
                    style("✗").red(),
                    path.display(),
                    style(error).red()
                ));
                self.tick();
            }
            CleanupEvent::Finished { .. } => {
                if let Some(bar) = self.bar.take() {
                    bar.finish_and_clear();
                }
            }
        }
    }

    fn tick(&self) {
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    fn println(&self, line: String) {
        match &self.bar {
            Some(bar) => bar.println(line),
            None => println!("{line}"),
        }
    }
}
