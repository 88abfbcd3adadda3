// Text rendering for quotes and the category picker
//
// Nothing in here touches the store; it only turns views into text.
use crate::models::{CategoryFilter, QuoteView};
use std::io::{self, Write};

pub const NO_QUOTES_MESSAGE: &str = "No quotes available. Add one to get started!";

pub fn no_matches_message(category: &str) -> String {
    format!("No quotes found for category \"{}\".", category)
}

pub fn render_quote(view: &QuoteView) -> String {
    match view {
        QuoteView::Quote(quote) => format!("\"{}\"\n({})", quote.text, quote.category),
        QuoteView::NoQuotes => NO_QUOTES_MESSAGE.to_string(),
        QuoteView::NoMatches(category) => no_matches_message(category),
    }
}

/// "All Categories" first, then each category; the selected one is marked
pub fn render_categories(categories: &[&str], selected: &CategoryFilter) -> String {
    let mark = |is_selected: bool| if is_selected { "*" } else { " " };

    let mut lines = vec![format!(
        "{} All Categories",
        mark(*selected == CategoryFilter::All)
    )];
    for category in categories {
        let is_selected = matches!(selected, CategoryFilter::Category(c) if c == category);
        lines.push(format!("{} {}", mark(is_selected), category));
    }
    lines.join("\n")
}

/// Where rendered output goes
pub trait QuoteSurface {
    fn show_quote(&mut self, view: &QuoteView) -> io::Result<()>;
    fn show_categories(&mut self, categories: &[&str], selected: &CategoryFilter) -> io::Result<()>;
    /// Short status line (sync results, import counts, errors)
    fn notify(&mut self, message: &str) -> io::Result<()>;
}

/// Plain text surface over any writer
pub struct TextSurface<W: Write> {
    out: W,
}

impl<W: Write> TextSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> QuoteSurface for TextSurface<W> {
    fn show_quote(&mut self, view: &QuoteView) -> io::Result<()> {
        writeln!(self.out, "{}", render_quote(view))
    }

    fn show_categories(&mut self, categories: &[&str], selected: &CategoryFilter) -> io::Result<()> {
        writeln!(self.out, "{}", render_categories(categories, selected))
    }

    fn notify(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)
    }
}
