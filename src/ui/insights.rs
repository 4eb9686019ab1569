use eframe::egui::{RichText, Ui};

/// Static commentary shown under the charts. Not derived from the data.
pub const KEY_INSIGHTS: &str = "\
###  Ecosystem Overview
- Startup formation accelerated exponentially after 2000, reflecting the rise of the digital economy and venture capital expansion.
- The apparent recent decline may reflect incomplete reporting rather than actual slowdown.

###  Funding Dynamics
- Startup funding is highly right-skewed, with a small number of ventures capturing disproportionately large investments.
- Log transformation reveals a more structured funding distribution.
- IPO and acquired startups demonstrate significantly higher median funding compared to closed startups, indicating strong capital-performance linkage.

###  Survival Patterns
- Most startups cluster within early operational years, highlighting high ecosystem volatility.
- While higher funding shows a weak positive relationship with survival years, capital alone does not guarantee longevity.

###  Industry Risk Variation
- Failure rates vary across industries, with consumer-facing and promotion-driven sectors showing relatively higher failure proportions.
- Risk is not uniformly distributed across sectors, indicating structural sustainability differences between business models.

---

**Conclusion:**
Startup success is influenced by funding intensity, industry structure, and ecosystem dynamics. While capital improves exit probability, long-term survival depends on multiple structural factors beyond funding alone.
";

/// The handful of markdown constructs [`KEY_INSIGHTS`] uses.
#[derive(Debug, PartialEq)]
enum Block<'a> {
    Heading(&'a str),
    Bullet(&'a str),
    Rule,
    Strong(&'a str),
    Text(&'a str),
    Blank,
}

fn classify(line: &str) -> Block<'_> {
    let line = line.trim();
    if line.is_empty() {
        Block::Blank
    } else if let Some(h) = line.strip_prefix("###") {
        Block::Heading(h.trim())
    } else if let Some(b) = line.strip_prefix("- ") {
        Block::Bullet(b)
    } else if line == "---" {
        Block::Rule
    } else if let Some(s) = line.strip_prefix("**").and_then(|s| s.strip_suffix("**")) {
        Block::Strong(s)
    } else {
        Block::Text(line)
    }
}

/// Render [`KEY_INSIGHTS`].
pub fn key_insights(ui: &mut Ui) {
    for line in KEY_INSIGHTS.lines() {
        match classify(line) {
            Block::Heading(h) => {
                ui.add_space(6.0);
                ui.label(RichText::new(h).heading());
            }
            Block::Bullet(b) => {
                ui.label(format!("• {b}"));
            }
            Block::Rule => {
                ui.separator();
            }
            Block::Strong(s) => {
                ui.label(RichText::new(s).strong());
            }
            Block::Text(t) => {
                ui.label(t);
            }
            Block::Blank => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_markdown_lines() {
        assert_eq!(classify("###  Funding Dynamics"), Block::Heading("Funding Dynamics"));
        assert_eq!(classify("- one point"), Block::Bullet("one point"));
        assert_eq!(classify("---"), Block::Rule);
        assert_eq!(classify("**Conclusion:**  "), Block::Strong("Conclusion:"));
        assert_eq!(classify("   "), Block::Blank);
        assert_eq!(classify("plain"), Block::Text("plain"));
    }

    #[test]
    fn insights_have_four_sections() {
        let headings = KEY_INSIGHTS
            .lines()
            .filter(|l| matches!(classify(l), Block::Heading(_)))
            .count();
        assert_eq!(headings, 4);
    }
}
