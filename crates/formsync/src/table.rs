use formsync_core::ContainerSummary;

pub struct TableFormatter {
    id_width: usize,
    title_width: usize,
    email_width: usize,
    reference_width: usize,
    status_width: usize,
    created_width: usize,
}

impl TableFormatter {
    pub fn new(rows: &[ContainerSummary]) -> Self {
        let title_width = rows
            .iter()
            .map(|r| r.title.chars().count())
            .max()
            .unwrap_or(16)
            .clamp(5, 40); // Between "Title" header and a readable terminal width

        Self {
            id_width: 6,
            title_width,
            email_width: 28,
            reference_width: 12,
            status_width: 13,
            created_width: 16,
        }
    }

    pub fn print_table(&self, rows: &[ContainerSummary]) {
        println!("{}", self.border('┌', '┬', '┐'));
        println!(
            "{}",
            self.row(["Id", "Title", "Email", "Reference", "Status", "Created"])
        );
        println!("{}", self.border('├', '┼', '┤'));
        for container in rows {
            let id = container.id.to_string();
            let status = container.display_status();
            let created = container
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default();
            println!(
                "{}",
                self.row([
                    &id,
                    &container.title,
                    container.user_email.as_deref().unwrap_or(""),
                    container.reference.as_deref().unwrap_or(""),
                    &status,
                    &created,
                ])
            );
        }
        println!("{}", self.border('└', '┴', '┘'));
    }

    fn widths(&self) -> [usize; 6] {
        [
            self.id_width,
            self.title_width,
            self.email_width,
            self.reference_width,
            self.status_width,
            self.created_width,
        ]
    }

    fn row(&self, cells: [&str; 6]) -> String {
        let cells: Vec<String> = cells
            .iter()
            .zip(self.widths())
            .map(|(cell, width)| truncate(cell, width))
            .collect();
        format!("│ {} │", cells.join(" │ "))
    }

    fn border(&self, left: char, joint: char, right: char) -> String {
        let segments: Vec<String> = self
            .widths()
            .iter()
            .map(|w| "─".repeat(w + 2))
            .collect();
        format!("{}{}{}", left, segments.join(&joint.to_string()), right)
    }
}

/// Truncate a string to a maximum display width, adding "..." if truncated.
///
/// Uses character count (not byte count) to safely handle UTF-8 strings.
pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
