// Output formatting — terminal display of trained topics.

pub mod terminal;

/// Render a proportion as a fixed-width text bar, e.g. `[=====     ]`.
pub fn proportion_bar(proportion: f64, width: usize) -> String {
    let filled = ((proportion.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "=".repeat(filled), " ".repeat(empty))
}
