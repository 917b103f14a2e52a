//! Terminal presentation for the `song-tagger` binary.

use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Stylize};
use unicode_width::UnicodeWidthStr;

const PANEL_WIDTH: usize = 56;

fn ansi(color: AnsiColor) -> Style {
    Style::new().bold().fg_color(Some(Color::Ansi(color)))
}

pub fn get_styles() -> Styles {
    Styles::styled()
        .usage(ansi(AnsiColor::Magenta).underline())
        .header(ansi(AnsiColor::Magenta).underline())
        .literal(ansi(AnsiColor::Cyan))
        .valid(ansi(AnsiColor::Cyan))
        .invalid(ansi(AnsiColor::Red))
        .error(ansi(AnsiColor::Red))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

mod palette {
    use crossterm::style::Color;

    pub const FRAME: Color = Color::Rgb {
        r: 190,
        g: 120,
        b: 255,
    };
    pub const LABEL: Color = Color::Rgb {
        r: 150,
        g: 150,
        b: 160,
    };
    pub const VALUE: Color = Color::Rgb {
        r: 235,
        g: 235,
        b: 240,
    };
    pub const GOOD: Color = Color::Rgb {
        r: 80,
        g: 220,
        b: 140,
    };
    pub const WARN: Color = Color::Rgb {
        r: 255,
        g: 190,
        b: 60,
    };
    pub const BAD: Color = Color::Rgb {
        r: 255,
        g: 90,
        b: 90,
    };
}

mod glyph {
    pub const H: &str = "─";
    pub const V: &str = "│";
    pub const TOP: [&str; 3] = ["╭", "┬", "╮"];
    pub const MID: [&str; 3] = ["├", "┼", "┤"];
    pub const BOTTOM: [&str; 3] = ["╰", "┴", "╯"];
    pub const ITEM: &str = "•";
    pub const STAR: &str = "★";
    pub const NONE: &str = "∅";
}

pub fn print_success(message: &str) {
    println!(" {} {}", "✓".with(palette::GOOD).bold(), message.with(palette::GOOD));
}

pub fn print_warning(message: &str) {
    println!(" {} {}", "!".with(palette::WARN).bold(), message.with(palette::WARN));
}

/// Goes to stderr so that piped output stays clean.
pub fn print_error(message: &str) {
    eprintln!(" {} {}", "✗".with(palette::BAD).bold(), message.with(palette::BAD));
}

pub fn print_section_header(title: &str) {
    let fill = PANEL_WIDTH.saturating_sub(title.width() + 3);
    println!();
    println!(
        "{}{} {} {}{}",
        glyph::TOP[0].with(palette::FRAME),
        glyph::H.with(palette::FRAME),
        title.with(palette::FRAME).bold(),
        glyph::H.repeat(fill).with(palette::FRAME),
        glyph::TOP[2].with(palette::FRAME),
    );
}

pub fn print_section_footer() {
    println!(
        "{}{}{}",
        glyph::BOTTOM[0].with(palette::FRAME),
        glyph::H.repeat(PANEL_WIDTH).with(palette::FRAME),
        glyph::BOTTOM[2].with(palette::FRAME),
    );
    println!();
}

pub fn print_key_value(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        glyph::ITEM.with(palette::FRAME),
        format!("{key}:").with(palette::LABEL),
        value.with(palette::VALUE)
    );
}

/// Key/value line for the figure a run is mainly about.
pub fn print_key_value_highlight(key: &str, value: &str) {
    println!(
        "  {} {} {}",
        glyph::STAR.with(palette::GOOD),
        format!("{key}:").with(palette::VALUE).bold(),
        value.with(palette::GOOD).bold()
    );
}

pub fn print_empty_list(message: &str) {
    println!(
        "  {} {}",
        glyph::NONE.with(palette::LABEL),
        message.with(palette::LABEL).attribute(Attribute::Italic)
    );
}

/// Boxed table; the first column is left aligned, the others right aligned.
pub struct TableBuilder {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    widths: Vec<usize>,
}

impl TableBuilder {
    pub fn new(headers: Vec<&str>) -> Self {
        Self {
            widths: headers.iter().map(|h| h.width()).collect(),
            headers: headers.into_iter().map(str::to_owned).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<&str>) {
        let row: Vec<String> = row
            .into_iter()
            .take(self.widths.len())
            .map(str::to_owned)
            .collect();
        for (width, cell) in self.widths.iter_mut().zip(&row) {
            *width = (*width).max(cell.width());
        }
        self.rows.push(row);
    }

    fn rule(&self, [left, joint, right]: [&str; 3]) -> String {
        let segments: Vec<String> = self.widths.iter().map(|w| glyph::H.repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(joint))
    }

    fn line(&self, cells: &[String], header: bool) -> String {
        let sep = glyph::V.with(palette::FRAME).to_string();
        let mut out = sep.clone();
        for (i, width) in self.widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = " ".repeat(width.saturating_sub(cell.width()));
            let text = if i == 0 {
                format!(" {cell}{pad} ")
            } else {
                format!(" {pad}{cell} ")
            };
            let styled = if header {
                text.with(palette::FRAME).bold().to_string()
            } else {
                text.with(palette::VALUE).to_string()
            };
            out.push_str(&styled);
            out.push_str(&sep);
        }
        out
    }

    pub fn print(&self) {
        if self.widths.is_empty() {
            return;
        }
        println!("{}", self.rule(glyph::TOP).with(palette::FRAME));
        println!("{}", self.line(&self.headers, true));
        println!("{}", self.rule(glyph::MID).with(palette::FRAME));
        for row in &self.rows {
            println!("{}", self.line(row, false));
        }
        println!("{}", self.rule(glyph::BOTTOM).with(palette::FRAME));
    }
}
