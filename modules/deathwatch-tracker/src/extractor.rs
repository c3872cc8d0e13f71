use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use deathwatch_common::{DeathEvent, DeathwatchError, UNKNOWN_KILLER};

/// Parsed fields of one description cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedDescription {
    pub victim: String,
    pub level: String,
    pub killer_raw: String,
}

/// Parser for the free-text description column. Two grammars, tried in
/// order:
///
/// 1. `<victim> died at level <level> [by <killer>]` — the killer clause is
///    optional; without it the killer is [`UNKNOWN_KILLER`] and the level
///    is the whole remainder.
/// 2. `<victim> [by <killer>]` — rows with no level phrase at all; the
///    level becomes `"?"`.
///
/// Both split at the *first* occurrence of their phrase, matching how the
/// page composes the text. The killer text may still name several killers;
/// that split belongs to the classifier.
pub struct DescriptionParser {
    with_level: Regex,
    bare: Regex,
}

impl DescriptionParser {
    pub fn new() -> Self {
        Self {
            with_level: Regex::new(
                r"^(?P<victim>.+?)\s+died at level\s+(?P<level>.+?)(?:\s+by\s+(?P<killer>.+))?$",
            )
            .expect("level grammar regex is a tested literal"),
            bare: Regex::new(r"^(?P<victim>.+?)\s+by\s+(?P<killer>.+)$")
                .expect("bare grammar regex is a tested literal"),
        }
    }

    pub fn parse(&self, description: &str) -> ParsedDescription {
        let text = description.trim();

        if let Some(caps) = self.with_level.captures(text) {
            return ParsedDescription {
                victim: caps["victim"].trim().to_string(),
                level: caps["level"].trim().to_string(),
                killer_raw: caps
                    .name("killer")
                    .map(|m| m.as_str().trim().to_string())
                    .unwrap_or_else(|| UNKNOWN_KILLER.to_string()),
            };
        }

        if let Some(caps) = self.bare.captures(text) {
            return ParsedDescription {
                victim: caps["victim"].trim().to_string(),
                level: "?".to_string(),
                killer_raw: caps["killer"].trim().to_string(),
            };
        }

        ParsedDescription {
            victim: text.to_string(),
            level: "?".to_string(),
            killer_raw: UNKNOWN_KILLER.to_string(),
        }
    }
}

impl Default for DescriptionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Extracts death events from the kill log page markup.
///
/// The page renders events as a table, newest first: cell 1 is the
/// timestamp, cell 2 the free-text description. Row order is preserved in
/// the output.
pub struct EventExtractor {
    tbody: Selector,
    row: Selector,
    cell: Selector,
    parser: DescriptionParser,
}

impl EventExtractor {
    pub fn new() -> Self {
        Self {
            tbody: Selector::parse("tbody").expect("selector is a tested literal"),
            row: Selector::parse("tr").expect("selector is a tested literal"),
            cell: Selector::parse("td").expect("selector is a tested literal"),
            parser: DescriptionParser::new(),
        }
    }

    /// Parse the page into events, newest first. A page without the event
    /// table body is a parse error; the caller skips the cycle. Rows with
    /// fewer than two cells are skipped silently.
    pub fn extract(&self, html: &str) -> Result<Vec<DeathEvent>, DeathwatchError> {
        let document = Html::parse_document(html);

        let tbody = document
            .select(&self.tbody)
            .next()
            .ok_or_else(|| DeathwatchError::Parse("kill table body not found".to_string()))?;

        let mut events = Vec::new();
        for row in tbody.select(&self.row) {
            let cells: Vec<ElementRef> = row.select(&self.cell).collect();
            if cells.len() < 2 {
                continue;
            }

            let timestamp = cell_text(&cells[0]);
            let description = cell_text(&cells[1]);
            let parsed = self.parser.parse(&description);

            events.push(DeathEvent {
                timestamp,
                victim: parsed.victim,
                level: parsed.level,
                killer_raw: parsed.killer_raw,
                description,
            });
        }

        Ok(events)
    }
}

impl Default for EventExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Visible text of a cell with runs of whitespace collapsed, so nested
/// markup inside the description never leaks into the dedup key.
fn cell_text(cell: &ElementRef) -> String {
    let text: String = cell.text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <table>
          <tbody>
            <tr>
              <td>07.08.2026, 21:35:11</td>
              <td>Agnieszka died at level 50 by a dragon</td>
            </tr>
            <tr>
              <td>07.08.2026, 20:02:45</td>
              <td>Negocjator died at level 12 by <b>Legolas</b> and <b>Aragorn</b></td>
            </tr>
          </tbody>
        </table>
        </body></html>
    "#;

    #[test]
    fn extracts_rows_in_page_order() {
        let extractor = EventExtractor::new();
        let events = extractor.extract(PAGE).unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].victim, "Agnieszka");
        assert_eq!(events[0].level, "50");
        assert_eq!(events[0].killer_raw, "a dragon");
        assert_eq!(events[1].victim, "Negocjator");
        assert_eq!(events[1].killer_raw, "Legolas and Aragorn");
    }

    #[test]
    fn nested_markup_is_flattened_into_cell_text() {
        let extractor = EventExtractor::new();
        let events = extractor.extract(PAGE).unwrap();
        assert_eq!(
            events[1].description,
            "Negocjator died at level 12 by Legolas and Aragorn"
        );
    }

    #[test]
    fn rows_with_fewer_than_two_cells_are_skipped() {
        let html = r#"
            <table><tbody>
              <tr><td>spacer</td></tr>
              <tr>
                <td>07.08.2026, 19:00:00</td>
                <td>Astma died at level 33 by an orc warrior</td>
              </tr>
            </tbody></table>
        "#;
        let events = EventExtractor::new().extract(html).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].victim, "Astma");
    }

    #[test]
    fn page_without_table_body_is_a_parse_error() {
        let err = EventExtractor::new().extract("<html><body>maintenance</body></html>");
        assert!(matches!(err, Err(DeathwatchError::Parse(_))));
    }

    #[test]
    fn level_grammar_without_killer_clause() {
        let parsed = DescriptionParser::new().parse("Agnieszka died at level 50");
        assert_eq!(parsed.victim, "Agnieszka");
        assert_eq!(parsed.level, "50");
        assert_eq!(parsed.killer_raw, UNKNOWN_KILLER);
    }

    #[test]
    fn level_grammar_splits_at_first_by() {
        // Killer names may themselves contain the phrase; only the first
        // occurrence delimits the level.
        let parsed = DescriptionParser::new().parse("Astma died at level 30 by a troll by the river");
        assert_eq!(parsed.level, "30");
        assert_eq!(parsed.killer_raw, "a troll by the river");
    }

    #[test]
    fn bare_grammar_has_placeholder_level() {
        let parsed = DescriptionParser::new().parse("Agnieszka by Legolas");
        assert_eq!(parsed.victim, "Agnieszka");
        assert_eq!(parsed.level, "?");
        assert_eq!(parsed.killer_raw, "Legolas");
    }

    #[test]
    fn unparseable_description_keeps_whole_text_as_victim() {
        let parsed = DescriptionParser::new().parse("Agnieszka vanished mysteriously");
        assert_eq!(parsed.victim, "Agnieszka vanished mysteriously");
        assert_eq!(parsed.level, "?");
        assert_eq!(parsed.killer_raw, UNKNOWN_KILLER);
    }

    #[test]
    fn multi_word_victim_names_survive_both_grammars() {
        let parser = DescriptionParser::new();
        let parsed = parser.parse("Mistrz Negocjacji died at level 77 by the swamp troll");
        assert_eq!(parsed.victim, "Mistrz Negocjacji");
        assert_eq!(parsed.killer_raw, "the swamp troll");

        let parsed = parser.parse("Gazowany Kompot by a rotworm");
        assert_eq!(parsed.victim, "Gazowany Kompot");
        assert_eq!(parsed.killer_raw, "a rotworm");
    }
}
