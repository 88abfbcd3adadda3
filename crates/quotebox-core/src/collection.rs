// Read-only operations over a slice of quotes
use crate::models::{CategoryFilter, Quote};
use rand::Rng;

/// Uniformly random index into `items`, or `None` when there is nothing to pick
pub fn pick_random<T>(items: &[T]) -> Option<usize> {
    pick_random_with(items, &mut rand::thread_rng())
}

pub fn pick_random_with<T, R: Rng + ?Sized>(items: &[T], rng: &mut R) -> Option<usize> {
    if items.is_empty() {
        None
    } else {
        Some(rng.gen_range(0..items.len()))
    }
}

/// Quotes matching `filter`, in collection order
pub fn filter<'a>(quotes: &'a [Quote], filter: &CategoryFilter) -> Vec<&'a Quote> {
    quotes.iter().filter(|q| filter.matches(q)).collect()
}

/// Distinct categories in first-seen order
pub fn categories(quotes: &[Quote]) -> Vec<&str> {
    let mut seen = Vec::new();
    for quote in quotes {
        if !seen.contains(&quote.category.as_str()) {
            seen.push(quote.category.as_str());
        }
    }
    seen
}

/// The fixed starter set used when nothing usable is stored
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        Quote::new("The only way to do great work is to love what you do.", "Work"),
        Quote::new("Life is what happens when you're busy making other plans.", "Life"),
        Quote::new("Get busy living or get busy dying.", "Life"),
        Quote::new(
            "The future belongs to those who believe in the beauty of their dreams.",
            "Dreams",
        ),
        Quote::new(
            "The greatest glory in living lies not in never falling, but in rising every time we fall.",
            "Life",
        ),
        Quote::new(
            "Tell me and I forget. Teach me and I remember. Involve me and I learn.",
            "Education",
        ),
    ]
}
