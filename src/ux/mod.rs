use std::io::{self, Write};

use colored::Colorize;
use humansize::{format_size, DECIMAL};

use crate::apply::ApplySummary;
use crate::wire::GenerateResponse;

pub fn show_file_set(resp: &GenerateResponse) {
    println!("\n=== GENERATED FILES ===");
    println!("model: {}", resp.model.bold());
    if let Some(usage) = &resp.usage {
        println!(
            "usage: {} of {} requests  ({} tokens this call)",
            usage.requests, usage.limit, usage.tokens_used
        );
    } else {
        println!("{}", "degraded mode: deterministic template scaffold".yellow());
    }

    for (i, f) in resp.files.iter().enumerate() {
        let tag = match f.language.as_str() {
            "typescript" => "[TS]".green().bold(),
            "json" => "[JSON]".yellow().bold(),
            "prisma" => "[PRISMA]".magenta().bold(),
            _ => "[TEXT]".cyan().bold(),
        };
        println!(
            "{}. {}  {}  ({})",
            i + 1,
            tag,
            f.path,
            format_size(f.content.len() as u64, DECIMAL)
        );
    }
    println!();
}

pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    let _ = io::stdout().flush();
    let mut s = String::new();
    if io::stdin().read_line(&mut s).is_ok() {
        let ans = s.trim().to_lowercase();
        ans == "y" || ans == "yes"
    } else {
        false
    }
}

pub fn print_apply_dashboard(sum: &ApplySummary) {
    println!(
        "\n{}",
        "┏━━━━━━━━━━━━━━━━━━━━━━━ Apply Results ━━━━━━━━━━━━━━━━━━━┓".bold()
    );
    println!(
        "  {}: {}   {}: {}",
        "Written".green().bold(),
        sum.written,
        "Bytes".bold(),
        format_size(sum.bytes, DECIMAL)
    );
    println!("{}", "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold());

    for d in &sum.details {
        println!(" - {} ({})", d.path.display(), format_size(d.bytes, DECIMAL));
    }
    println!();
}
