//! Commit-message rendering for registries kept under version control.

use regup_core::Report;

/// Renders a commit message describing one run: a header naming the updated
/// packages, the summary line, and itemized updated/errored sections.
pub fn render(report: &Report) -> String {
    let mut message = String::from("regup automatic commit");
    if !report.updated.is_empty() {
        let names: Vec<&str> = report.updated.keys().map(String::as_str).collect();
        message.push_str(": updated ");
        message.push_str(&listify(&names));
    }
    message.push_str("\n\n");
    message.push_str(&report.summary());
    message.push('\n');

    if !report.updated.is_empty() {
        message.push_str("\nUpdated:\n");
        for (name, version) in &report.updated {
            message.push_str(&format!("  - {name} ({version})\n"));
        }
    }
    if !report.errored.is_empty() {
        message.push_str("\nErrors:\n");
        for (name, error) in &report.errored {
            message.push_str(&format!("  - {name} ({error})\n"));
        }
    }
    message
}

/// Joins names into prose: `a`, `a and b`, `a, b, and c`.
fn listify(items: &[&str]) -> String {
    match items {
        [] => String::new(),
        [only] => (*only).to_string(),
        [first, second] => format!("{first} and {second}"),
        [rest @ .., last] => format!("{}, and {last}", rest.join(", ")),
    }
}
