use ballot_core::Candidate;

pub struct TableFormatter {
    id_width: usize,
    name_width: usize,
    bio_width: usize,
}

impl TableFormatter {
    pub fn new(candidates: &[Candidate]) -> Self {
        let name_width = candidates
            .iter()
            .map(|c| c.display_name().chars().count())
            .max()
            .unwrap_or(16)
            .clamp(4, 40);

        let id_width = candidates
            .iter()
            .map(|c| c.candidate_id.chars().count())
            .max()
            .unwrap_or(2)
            .clamp(2, 12);

        Self {
            id_width,
            name_width,
            bio_width: 40,
        }
    }

    pub fn print_table(&self, candidates: &[Candidate]) {
        println!("{}", self.top_border());
        println!("{}", self.header_row());
        println!("{}", self.separator());
        for candidate in candidates {
            println!("{}", self.row(candidate));
        }
        println!("{}", self.bottom_border());
    }

    fn row(&self, candidate: &Candidate) -> String {
        format!(
            "│ {:<width_id$} │ {:<width_name$} │ {:<width_bio$} │",
            truncate(&candidate.candidate_id, self.id_width),
            truncate(&candidate.display_name(), self.name_width),
            truncate(candidate.bio.as_deref().unwrap_or(""), self.bio_width),
            width_id = self.id_width,
            width_name = self.name_width,
            width_bio = self.bio_width,
        )
    }

    fn header_row(&self) -> String {
        format!(
            "│ {:<width_id$} │ {:<width_name$} │ {:<width_bio$} │",
            "ID",
            "Name",
            "Bio",
            width_id = self.id_width,
            width_name = self.name_width,
            width_bio = self.bio_width,
        )
    }

    fn border(&self, left: &str, mid: &str, right: &str) -> String {
        format!(
            "{}{}{}{}{}{}{}",
            left,
            "─".repeat(self.id_width + 2),
            mid,
            "─".repeat(self.name_width + 2),
            mid,
            "─".repeat(self.bio_width + 2),
            right,
        )
    }

    fn top_border(&self) -> String {
        self.border("┌", "┬", "┐")
    }

    fn separator(&self) -> String {
        self.border("├", "┼", "┤")
    }

    fn bottom_border(&self) -> String {
        self.border("└", "┴", "┘")
    }
}

pub fn truncate(s: &str, max_len: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_len {
        format!("{:<width$}", s, width = max_len)
    } else {
        // Safely truncate at character boundaries, not byte boundaries
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{:<width$}", format!("{}...", truncated), width = max_len)
    }
}
