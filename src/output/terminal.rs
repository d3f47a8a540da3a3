// Colored terminal output for trained topics.
//
// Regular and prototype topics are shown side by side so a run can be
// sanity-checked at a glance: did each prototype topic actually gather
// tokens, and do its top words look like its seeds?

use colored::Colorize;

use super::proportion_bar;
use crate::model::summary::TopicSummary;

/// Display every topic with its share of tokens and its top words.
pub fn display_topics(summaries: &[TopicSummary]) {
    if summaries.is_empty() {
        println!("No topics to display.");
        return;
    }

    let total_tokens: u64 = summaries.iter().map(|s| s.tokens as u64).sum();

    println!(
        "\n{}",
        format!(
            "=== Topics ({} topics, {} tokens) ===",
            summaries.len(),
            total_tokens
        )
        .bold()
    );
    println!();

    for (i, summary) in summaries.iter().enumerate() {
        let share = if total_tokens > 0 {
            summary.tokens as f64 / total_tokens as f64
        } else {
            0.0
        };

        let bar = proportion_bar(share, 20);
        let (label, bar) = if summary.prototype {
            (summary.label.bright_green().bold(), bar.bright_green())
        } else {
            (summary.label.bold(), bar.bright_blue())
        };

        println!("  {:>2}. {:<30} {} {:.3}", i + 1, label, bar, share);

        let words: Vec<String> = summary
            .top_words
            .iter()
            .map(|(word, p)| format!("{word} ({p:.3})"))
            .collect();
        println!("      Words: {}", words.join(", ").dimmed());
        println!();
    }

    let prototypes = summaries.iter().filter(|s| s.prototype).count();
    if prototypes > 0 {
        let empty = summaries
            .iter()
            .filter(|s| s.prototype && s.tokens == 0)
            .count();
        if empty > 0 {
            println!(
                "  {} {} of {} prototype topics received no tokens",
                "!".yellow(),
                empty,
                prototypes
            );
        }
    }
}
