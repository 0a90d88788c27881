//! Mapping table construction from the declarative TOML source.
//!
//! The source document has three optional sections (`cc_map`, `pc_map`,
//! `note_map`), each keyed by decimal number strings. Rule values come in
//! four shapes (bare integer, `"type:number"` string, array, inline table)
//! and are committed to the closed [`MappingRule`] union here, once, so
//! resolution never probes value shapes at runtime.

use std::collections::HashMap;

use serde::Deserialize;

use midimap_types::{MappingRule, MessageType, MidiEvent, RouteTarget, Transform, MAX_FAN_OUT};

/// Immutable remapping table, swapped wholesale on reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MappingTable {
    cc: HashMap<u8, MappingRule>,
    pc: HashMap<u8, MappingRule>,
    note: HashMap<u8, MappingRule>,
}

#[derive(Deserialize, Default)]
struct RawMapFile {
    #[serde(default)]
    cc_map: HashMap<String, RawRule>,
    #[serde(default)]
    pc_map: HashMap<String, RawRule>,
    #[serde(default)]
    note_map: HashMap<String, RawRule>,
}

/// Rule value as it appears in the document, before variant commitment.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawRule {
    Number(i64),
    Text(String),
    List(Vec<RawEntry>),
    Object(RawTransform),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Number(i64),
    Text(String),
}

#[derive(Deserialize)]
struct RawTransform {
    #[serde(rename = "type")]
    kind: Option<String>,
    num: Option<i64>,
    scale: Option<f64>,
    velocity: Option<f64>,
}

impl MappingTable {
    /// Parse a mapping document. Fails only on syntactically invalid TOML;
    /// out-of-range keys, unknown type tokens, and over-long fan-out lists
    /// are handled leniently with a warning.
    pub fn parse(source: &str) -> Result<MappingTable, toml::de::Error> {
        let raw: RawMapFile = toml::from_str(source)?;
        Ok(MappingTable {
            cc: build_section(MessageType::ControlChange, raw.cc_map),
            pc: build_section(MessageType::ProgramChange, raw.pc_map),
            note: build_section(MessageType::Note, raw.note_map),
        })
    }

    pub fn lookup(&self, kind: MessageType, number: u8) -> Option<&MappingRule> {
        self.section(kind).get(&number)
    }

    pub fn len(&self) -> usize {
        self.cc.len() + self.pc.len() + self.note.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One line per entry, grouped by message type, numerically ordered.
    /// Used by the `showmap` command.
    pub fn render_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for kind in MessageType::ALL {
            let section = self.section(kind);
            let mut numbers: Vec<u8> = section.keys().copied().collect();
            numbers.sort_unstable();
            for number in numbers {
                let source = MidiEvent::new(kind, number, 0);
                lines.push(format!(
                    "{} -> {}",
                    source.name(),
                    describe_rule(kind, &section[&number])
                ));
            }
        }
        lines
    }

    fn section(&self, kind: MessageType) -> &HashMap<u8, MappingRule> {
        match kind {
            MessageType::ControlChange => &self.cc,
            MessageType::ProgramChange => &self.pc,
            MessageType::Note => &self.note,
        }
    }
}

fn build_section(kind: MessageType, raw: HashMap<String, RawRule>) -> HashMap<u8, MappingRule> {
    let mut rules = HashMap::new();
    for (key, value) in raw {
        let number = match key.parse::<u8>() {
            Ok(n) if n <= 127 => n,
            _ => {
                log::warn!(
                    target: "mapping",
                    "skipping {} entry {:?}: key must be a number 0-127",
                    kind.name(),
                    key
                );
                continue;
            }
        };
        rules.insert(number, build_rule(value));
    }
    rules
}

fn build_rule(raw: RawRule) -> MappingRule {
    match raw {
        RawRule::Number(n) => MappingRule::Number(clamp_number(n)),
        RawRule::Text(text) => match text.split_once(':') {
            Some(_) => MappingRule::Redirect(parse_target(&text)),
            None => {
                log::warn!(
                    target: "mapping",
                    "rule string {:?} has no type prefix, reading it as a bare number",
                    text
                );
                MappingRule::Number(parse_number(&text))
            }
        },
        RawRule::List(entries) => {
            let mut targets: Vec<RouteTarget> = entries
                .into_iter()
                .map(|entry| match entry {
                    RawEntry::Number(n) => RouteTarget::new(None, clamp_number(n)),
                    RawEntry::Text(text) => parse_target(&text),
                })
                .collect();
            if targets.len() > MAX_FAN_OUT {
                log::warn!(
                    target: "mapping",
                    "fan-out list of {} targets truncated to {}",
                    targets.len(),
                    MAX_FAN_OUT
                );
                targets.truncate(MAX_FAN_OUT);
            }
            MappingRule::FanOut(targets)
        }
        RawRule::Object(t) => {
            let kind = t.kind.as_deref().and_then(|token| {
                let parsed = MessageType::from_token(token);
                if parsed.is_none() {
                    log::warn!(
                        target: "mapping",
                        "unknown type token {:?}, keeping source type",
                        token
                    );
                }
                parsed
            });
            // scale wins when both synonyms are present
            let scale = t.scale.or(t.velocity).map(|f| f as f32);
            MappingRule::Transform(Transform {
                kind,
                number: t.num.map(clamp_number),
                scale,
            })
        }
    }
}

/// Parse a `"type:number"` target string. A missing or unknown type token
/// keeps the source event's type; a colon-less string is read as a bare
/// number (documented leniency).
fn parse_target(text: &str) -> RouteTarget {
    match text.split_once(':') {
        Some((token, number)) => {
            let kind = MessageType::from_token(token.trim());
            if kind.is_none() {
                log::warn!(
                    target: "mapping",
                    "unknown type token {:?} in {:?}, keeping source type",
                    token,
                    text
                );
            }
            RouteTarget::new(kind, parse_number(number))
        }
        None => {
            log::warn!(
                target: "mapping",
                "target {:?} has no type prefix, reading it as a bare number",
                text
            );
            RouteTarget::new(None, parse_number(text))
        }
    }
}

fn parse_number(text: &str) -> u8 {
    match text.trim().parse::<i64>() {
        Ok(n) => clamp_number(n),
        Err(_) => {
            log::warn!(target: "mapping", "non-numeric target {:?}, using 0", text);
            0
        }
    }
}

fn clamp_number(n: i64) -> u8 {
    n.clamp(0, 127) as u8
}

fn describe_rule(source_kind: MessageType, rule: &MappingRule) -> String {
    let target_name = |kind: Option<MessageType>, number: u8| {
        MidiEvent::new(kind.unwrap_or(source_kind), number, 0).name()
    };
    match rule {
        MappingRule::Number(n) => target_name(None, *n),
        MappingRule::Redirect(t) => target_name(t.kind, t.number),
        MappingRule::FanOut(targets) => {
            let joined: Vec<String> = targets
                .iter()
                .map(|t| target_name(t.kind, t.number))
                .collect();
            format!("[{}]", joined.join(", "))
        }
        MappingRule::Transform(t) => {
            let mut out = match t.number {
                Some(n) => target_name(t.kind, n),
                None => format!("{}(src)", t.kind.unwrap_or(source_kind).name()),
            };
            if let Some(factor) = t.scale {
                out.push_str(&format!(" x{:.2}", factor));
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = r#"
[cc_map]
12 = 16
23 = "note:45"
74 = [71, 72, "note:60"]
7 = { num = 77, scale = 0.8 }

[pc_map]
5 = ["cc:74", "note:60"]

[note_map]
60 = 64
"#;

    #[test]
    fn test_parse_number_rule() {
        let table = MappingTable::parse(SOURCE).unwrap();
        assert_eq!(
            table.lookup(MessageType::ControlChange, 12),
            Some(&MappingRule::Number(16))
        );
    }

    #[test]
    fn test_parse_redirect_rule() {
        let table = MappingTable::parse(SOURCE).unwrap();
        assert_eq!(
            table.lookup(MessageType::ControlChange, 23),
            Some(&MappingRule::Redirect(RouteTarget::new(
                Some(MessageType::Note),
                45
            )))
        );
    }

    #[test]
    fn test_parse_fan_out_rule() {
        let table = MappingTable::parse(SOURCE).unwrap();
        let rule = table.lookup(MessageType::ControlChange, 74).unwrap();
        match rule {
            MappingRule::FanOut(targets) => {
                assert_eq!(targets.len(), 3);
                assert_eq!(targets[0], RouteTarget::new(None, 71));
                assert_eq!(targets[2], RouteTarget::new(Some(MessageType::Note), 60));
            }
            other => panic!("expected FanOut, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_transform_rule() {
        let table = MappingTable::parse(SOURCE).unwrap();
        let rule = table.lookup(MessageType::ControlChange, 7).unwrap();
        match rule {
            MappingRule::Transform(t) => {
                assert_eq!(t.kind, None);
                assert_eq!(t.number, Some(77));
                assert_eq!(t.scale, Some(0.8));
            }
            other => panic!("expected Transform, got {:?}", other),
        }
    }

    #[test]
    fn test_sections_are_independent() {
        let table = MappingTable::parse(SOURCE).unwrap();
        assert!(table.lookup(MessageType::Note, 60).is_some());
        assert!(table.lookup(MessageType::ProgramChange, 60).is_none());
        assert!(table.lookup(MessageType::ControlChange, 60).is_none());
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        assert!(MappingTable::parse("[cc_map\n12 = 16").is_err());
        assert!(MappingTable::parse("cc_map = [[[").is_err());
    }

    #[test]
    fn test_missing_sections_are_empty() {
        let table = MappingTable::parse("").unwrap();
        assert!(table.is_empty());
        let table = MappingTable::parse("[cc_map]\n1 = 2").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_out_of_range_keys_are_skipped() {
        let table = MappingTable::parse("[cc_map]\n128 = 1\n200 = 2\n12 = 16").unwrap();
        assert_eq!(table.len(), 1);
        assert!(table.lookup(MessageType::ControlChange, 12).is_some());
    }

    #[test]
    fn test_target_numbers_are_clamped() {
        let table = MappingTable::parse("[cc_map]\n12 = 300\n13 = -4").unwrap();
        assert_eq!(
            table.lookup(MessageType::ControlChange, 12),
            Some(&MappingRule::Number(127))
        );
        assert_eq!(
            table.lookup(MessageType::ControlChange, 13),
            Some(&MappingRule::Number(0))
        );
    }

    #[test]
    fn test_fan_out_truncated_at_construction() {
        let entries: Vec<String> = (0..15).map(|n| n.to_string()).collect();
        let source = format!("[cc_map]\n1 = [{}]", entries.join(", "));
        let table = MappingTable::parse(&source).unwrap();
        match table.lookup(MessageType::ControlChange, 1).unwrap() {
            MappingRule::FanOut(targets) => assert_eq!(targets.len(), MAX_FAN_OUT),
            other => panic!("expected FanOut, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_fan_out_list_is_kept() {
        let table = MappingTable::parse("[cc_map]\n1 = []").unwrap();
        assert_eq!(
            table.lookup(MessageType::ControlChange, 1),
            Some(&MappingRule::FanOut(Vec::new()))
        );
    }

    #[test]
    fn test_unknown_type_token_keeps_source_type() {
        let table = MappingTable::parse("[cc_map]\n1 = \"xyz:45\"").unwrap();
        assert_eq!(
            table.lookup(MessageType::ControlChange, 1),
            Some(&MappingRule::Redirect(RouteTarget::new(None, 45)))
        );
    }

    #[test]
    fn test_colon_less_string_reads_as_number() {
        let table = MappingTable::parse("[cc_map]\n1 = \"45\"").unwrap();
        assert_eq!(
            table.lookup(MessageType::ControlChange, 1),
            Some(&MappingRule::Number(45))
        );
    }

    #[test]
    fn test_non_numeric_string_falls_back_to_zero() {
        let table = MappingTable::parse("[cc_map]\n1 = \"bogus\"").unwrap();
        assert_eq!(
            table.lookup(MessageType::ControlChange, 1),
            Some(&MappingRule::Number(0))
        );
    }

    #[test]
    fn test_velocity_is_a_scale_synonym() {
        let table = MappingTable::parse("[note_map]\n60 = { velocity = 0.5 }").unwrap();
        match table.lookup(MessageType::Note, 60).unwrap() {
            MappingRule::Transform(t) => assert_eq!(t.scale, Some(0.5)),
            other => panic!("expected Transform, got {:?}", other),
        }
    }

    #[test]
    fn test_scale_wins_over_velocity() {
        let table =
            MappingTable::parse("[note_map]\n60 = { scale = 0.25, velocity = 0.5 }").unwrap();
        match table.lookup(MessageType::Note, 60).unwrap() {
            MappingRule::Transform(t) => assert_eq!(t.scale, Some(0.25)),
            other => panic!("expected Transform, got {:?}", other),
        }
    }

    #[test]
    fn test_render_lines_ordering_and_shape() {
        let table = MappingTable::parse(SOURCE).unwrap();
        let lines = table.render_lines();
        assert_eq!(lines.len(), 6);
        // CC section first, numerically ordered
        assert_eq!(lines[0], "CC7 -> CC77 x0.80");
        assert_eq!(lines[1], "CC12 -> CC16");
        assert_eq!(lines[2], "CC23 -> A2");
        assert_eq!(lines[3], "CC74 -> [CC71, CC72, C4]");
        assert_eq!(lines[4], "PC5 -> [CC74, C4]");
        assert_eq!(lines[5], "C4 -> E4");
    }

    #[test]
    fn test_render_lines_empty_table() {
        assert!(MappingTable::parse("").unwrap().render_lines().is_empty());
    }
}
