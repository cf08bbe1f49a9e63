#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
    /// Bare `:--`, what the ranking tables use.
    Plain,
}

impl Align {
    fn marker(&self) -> &'static str {
        match self {
            Align::Left => ":------",
            Align::Right => "------:",
            Align::Plain => ":--",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextTable {
    pub headers: Vec<String>,
    pub align: Vec<Align>,
    pub rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new(headers: Vec<String>, align: Vec<Align>) -> Self {
        Self {
            headers,
            align,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn to_markdown(&self) -> String {
        let mut lines = Vec::with_capacity(self.rows.len() + 2);
        lines.push(pipe_line(&self.headers));
        let markers: Vec<String> = (0..self.headers.len())
            .map(|i| {
                self.align
                    .get(i)
                    .copied()
                    .unwrap_or(Align::Plain)
                    .marker()
                    .to_string()
            })
            .collect();
        lines.push(pipe_line(&markers));
        lines.extend(self.rows.iter().map(|r| pipe_line(r)));
        lines.join("\n")
    }

    pub fn to_rows(&self) -> Vec<Vec<String>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(self.headers.clone());
        out.extend(self.rows.iter().cloned());
        out
    }
}

fn pipe_line(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_header_separator_and_rows() {
        let mut t = TextTable::new(
            vec!["Metric".into(), "Value".into()],
            vec![Align::Left, Align::Right],
        );
        t.push(vec!["xG".into(), "1.20".into()]);
        assert_eq!(
            t.to_markdown(),
            "| Metric | Value |\n| :------ | ------: |\n| xG | 1.20 |"
        );
    }

    #[test]
    fn missing_alignment_defaults_to_plain() {
        let t = TextTable::new(vec!["rank".into()], Vec::new());
        assert_eq!(t.to_markdown(), "| rank |\n| :-- |");
    }
}
