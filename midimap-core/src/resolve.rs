//! Pure mapping resolution: one input event in, a bounded list of output
//! events out. No I/O, no hidden state; identical inputs always yield
//! identical outputs.

use midimap_types::{MappingRule, MidiEvent, RouteTarget};

use crate::table::MappingTable;

/// Result of resolving one event against the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// Ordered outputs; at most [`midimap_types::MAX_FAN_OUT`] entries.
    pub outputs: Vec<MidiEvent>,
    /// False when the event passed through unchanged (mapping disabled or
    /// no rule for this source).
    pub mapped: bool,
}

impl Resolution {
    fn passthrough(event: &MidiEvent) -> Self {
        Self {
            outputs: vec![*event],
            mapped: false,
        }
    }
}

/// Resolve `event` under `table`. With mapping disabled, or when no rule
/// exists for `(event.kind, event.number)`, the event passes through
/// unchanged.
pub fn resolve(event: &MidiEvent, table: &MappingTable, mapping_enabled: bool) -> Resolution {
    if !mapping_enabled {
        return Resolution::passthrough(event);
    }
    let Some(rule) = table.lookup(event.kind, event.number) else {
        return Resolution::passthrough(event);
    };

    let outputs = match rule {
        MappingRule::Number(number) => vec![MidiEvent::new(event.kind, *number, event.value)],
        MappingRule::Redirect(target) => vec![route(event, target)],
        MappingRule::FanOut(targets) => targets.iter().map(|t| route(event, t)).collect(),
        MappingRule::Transform(t) => vec![MidiEvent::new(
            t.kind.unwrap_or(event.kind),
            t.number.unwrap_or(event.number),
            t.map_value(event.value),
        )],
    };
    Resolution { outputs, mapped: true }
}

fn route(event: &MidiEvent, target: &RouteTarget) -> MidiEvent {
    MidiEvent::new(target.kind.unwrap_or(event.kind), target.number, event.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use midimap_types::{MessageType, MAX_FAN_OUT};

    fn test_table() -> MappingTable {
        MappingTable::parse(
            r#"
[cc_map]
12 = 16
23 = "note:45"
74 = [71, 72, "note:60"]
7 = { num = 77, scale = 0.8 }
10 = { scale = 2.0 }
11 = { type = "pc" }
13 = []

[pc_map]
5 = ["cc:74", "note:60"]

[note_map]
60 = 64
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_passthrough_when_mapping_disabled() {
        let table = test_table();
        let event = MidiEvent::cc(12, 123);
        let res = resolve(&event, &table, false);
        assert_eq!(res.outputs, vec![event]);
        assert!(!res.mapped);
    }

    #[test]
    fn test_passthrough_when_no_rule() {
        let table = test_table();
        let event = MidiEvent::cc(99, 50);
        let res = resolve(&event, &table, true);
        assert_eq!(res.outputs, vec![event]);
        assert!(!res.mapped);
    }

    #[test]
    fn test_number_rule_keeps_type_and_value() {
        let table = test_table();
        let res = resolve(&MidiEvent::cc(12, 123), &table, true);
        assert_eq!(res.outputs, vec![MidiEvent::cc(16, 123)]);
        assert!(res.mapped);
    }

    #[test]
    fn test_redirect_changes_type_and_number() {
        let table = test_table();
        let res = resolve(&MidiEvent::cc(23, 99), &table, true);
        assert_eq!(res.outputs, vec![MidiEvent::note(45, 99)]);
        assert!(res.mapped);
    }

    #[test]
    fn test_fan_out_preserves_order_and_length() {
        let table = test_table();
        let res = resolve(&MidiEvent::cc(74, 42), &table, true);
        assert_eq!(
            res.outputs,
            vec![
                MidiEvent::cc(71, 42),
                MidiEvent::cc(72, 42),
                MidiEvent::note(60, 42),
            ]
        );
    }

    #[test]
    fn test_fan_out_from_program_change() {
        let table = test_table();
        let res = resolve(&MidiEvent::pc(5), &table, true);
        assert_eq!(
            res.outputs,
            vec![MidiEvent::cc(74, 0), MidiEvent::note(60, 0)]
        );
        assert!(res.mapped);
    }

    #[test]
    fn test_note_number_rule() {
        let table = test_table();
        let res = resolve(&MidiEvent::note(60, 100), &table, true);
        assert_eq!(res.outputs, vec![MidiEvent::note(64, 100)]);
    }

    #[test]
    fn test_transform_scales_and_renumbers() {
        let table = test_table();
        let res = resolve(&MidiEvent::cc(7, 80), &table, true);
        assert_eq!(res.outputs, vec![MidiEvent::cc(77, 64)]);
    }

    #[test]
    fn test_transform_clamps_to_127() {
        let table = test_table();
        let res = resolve(&MidiEvent::cc(10, 100), &table, true);
        assert_eq!(res.outputs, vec![MidiEvent::cc(10, 127)]);
    }

    #[test]
    fn test_transform_type_only_keeps_number_and_value() {
        let table = test_table();
        let res = resolve(&MidiEvent::cc(11, 64), &table, true);
        assert_eq!(
            res.outputs,
            vec![MidiEvent::new(MessageType::ProgramChange, 11, 64)]
        );
    }

    #[test]
    fn test_empty_fan_out_yields_zero_outputs() {
        let table = test_table();
        let res = resolve(&MidiEvent::cc(13, 1), &table, true);
        assert!(res.outputs.is_empty());
        assert!(res.mapped);
    }

    #[test]
    fn test_truncated_fan_out_resolves_to_ten_outputs() {
        let entries: Vec<String> = (0..15).map(|n| n.to_string()).collect();
        let source = format!("[cc_map]\n1 = [{}]", entries.join(", "));
        let table = MappingTable::parse(&source).unwrap();
        let res = resolve(&MidiEvent::cc(1, 5), &table, true);
        assert_eq!(res.outputs.len(), MAX_FAN_OUT);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let table = test_table();
        let event = MidiEvent::cc(74, 42);
        assert_eq!(resolve(&event, &table, true), resolve(&event, &table, true));
    }

    #[test]
    fn test_reload_idempotence() {
        let source = r#"
[cc_map]
12 = 16
74 = [71, "note:60"]
"#;
        let first = MappingTable::parse(source).unwrap();
        let second = MappingTable::parse(source).unwrap();
        for number in 0..=127u8 {
            for value in [0u8, 64, 127] {
                let event = MidiEvent::cc(number, value);
                assert_eq!(
                    resolve(&event, &first, true),
                    resolve(&event, &second, true)
                );
            }
        }
    }
}
