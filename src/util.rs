use crate::model::Item;

pub const PENDING_HEADING: &str = "Pending:";
pub const COMPLETED_HEADING: &str = "Completed:";

pub fn format_item_line(item: &Item) -> String {
    let mark = if item.status().is_done() { "x" } else { " " };
    format!("- [{}] {} (id {})", mark, item.value, item.id)
}

/// `None` for an empty partition: an empty section has no heading either.
pub fn format_section(heading: &str, items: &[Item]) -> Option<String> {
    if items.is_empty() {
        return None;
    }
    let mut output = String::new();
    output.push_str(heading);
    output.push('\n');
    for item in items {
        output.push_str(&format_item_line(item));
        output.push('\n');
    }
    Some(output.trim_end().to_string())
}

pub fn format_item_list(items: &[Item]) -> String {
    items
        .iter()
        .map(format_item_line)
        .collect::<Vec<_>>()
        .join("\n")
}
