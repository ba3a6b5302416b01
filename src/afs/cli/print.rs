use afs::api::FilterView;
use afs::config::{Diagnostic, ResolvedLogic, TypeLogicConfig};
use afs::model::{CategoryMode, Item, ItemId};
use colored::Colorize;
use std::collections::HashMap;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ID_WIDTH: usize = 8;
const TITLE_WIDTH: usize = 36;
const ELLIPSIS: &str = "…";

pub(crate) fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic.to_string().yellow());
    }
}

pub(crate) fn print_view(view: &FilterView, items: &[Item], mode: CategoryMode) {
    let filters = if view.active_filters.is_empty() {
        "*".to_string()
    } else {
        view.active_filters
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    };
    println!(
        "{} {} {}",
        "filters:".dimmed(),
        filters.cyan(),
        format!("({})", mode).dimmed()
    );

    if view.page_items.is_empty() {
        println!("No items match.");
        return;
    }

    let by_id: HashMap<&ItemId, &Item> = items.iter().map(|item| (&item.id, item)).collect();
    for id in &view.page_items {
        let Some(item) = by_id.get(id) else { continue };
        let title = item.field("title").unwrap_or("");
        println!(
            "{} {} {}",
            pad(id.as_str(), ID_WIDTH).yellow(),
            pad(&truncate(title, TITLE_WIDTH), TITLE_WIDTH).bold(),
            item.categories.dimmed()
        );
    }

    let page = &view.page;
    println!(
        "{}",
        format!(
            "{} of {} items, page {}/{}",
            view.page_items.len(),
            page.total_items,
            page.page,
            page.total_pages
        )
        .dimmed()
    );
}

pub(crate) fn print_logic(logic: &ResolvedLogic) {
    println!("{} {}", "category mode:".dimmed(), logic.category_mode.to_string().cyan());

    if logic.type_logic.is_empty() {
        println!("{}", "no per-type logic, every type uses OR".dimmed());
    }
    for (type_name, config) in &logic.type_logic {
        let detail = match config {
            TypeLogicConfig::Simple(mode) => mode.to_string(),
            TypeLogicConfig::Extended { mode, multi_select } if *multi_select => {
                format!("{} multi", mode)
            }
            TypeLogicConfig::Extended { mode, .. } => mode.to_string(),
        };
        let exclusive = if logic.exclusive_types.contains(type_name) {
            " exclusive".red().to_string()
        } else {
            String::new()
        };
        println!("  {} {}{}", pad(type_name, 16).bold(), detail.green(), exclusive);
    }

    for type_name in logic
        .exclusive_types
        .iter()
        .filter(|t| !logic.type_logic.contains_key(*t))
    {
        println!("  {} {}", pad(type_name, 16).bold(), "exclusive".red());
    }
}

fn pad(s: &str, width: usize) -> String {
    let used = s.width();
    if used >= width {
        return s.to_string();
    }
    format!("{}{}", s, " ".repeat(width - used))
}

fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let budget = width.saturating_sub(ELLIPSIS.width());
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push_str(ELLIPSIS);
    out
}
