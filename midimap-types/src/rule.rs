use serde::{Deserialize, Serialize};

use crate::event::MessageType;

/// Upper bound on fan-out targets. Lists longer than this are truncated at
/// table construction, never at resolve time.
pub const MAX_FAN_OUT: usize = 10;

/// One remapping rule for a `(MessageType, number)` source. The variant is
/// decided once at parse time; resolution is exhaustive matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MappingRule {
    /// Same message type, number replaced.
    Number(u8),
    /// Type and number replaced; value untouched.
    Redirect(RouteTarget),
    /// One output per target, all resolved against the same source event.
    FanOut(Vec<RouteTarget>),
    /// Optional type/number replacement plus optional value scaling.
    Transform(Transform),
}

/// Target of a redirect or fan-out entry. `kind: None` means "keep the
/// source event's type" (the documented fallback for unknown type tokens).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTarget {
    pub kind: Option<MessageType>,
    pub number: u8,
}

impl RouteTarget {
    pub fn new(kind: Option<MessageType>, number: u8) -> Self {
        Self { kind, number }
    }
}

/// Value transform. Absent fields default to the source event's type,
/// number, and unscaled value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub kind: Option<MessageType>,
    pub number: Option<u8>,
    pub scale: Option<f32>,
}

impl Transform {
    /// Apply the scale factor to a source value, rounded and clamped to
    /// 0..=127. Pass-through when no factor is set.
    pub fn map_value(&self, value: u8) -> u8 {
        match self.scale {
            Some(factor) => (f32::from(value) * factor).round().clamp(0.0, 127.0) as u8,
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_value_clamps_high() {
        let t = Transform { kind: None, number: None, scale: Some(2.0) };
        assert_eq!(t.map_value(100), 127);
    }

    #[test]
    fn test_map_value_scales_down() {
        let t = Transform { kind: None, number: None, scale: Some(0.8) };
        assert_eq!(t.map_value(80), 64);
    }

    #[test]
    fn test_map_value_negative_factor_clamps_low() {
        let t = Transform { kind: None, number: None, scale: Some(-1.0) };
        assert_eq!(t.map_value(100), 0);
    }

    #[test]
    fn test_map_value_passthrough_without_factor() {
        let t = Transform { kind: None, number: None, scale: None };
        assert_eq!(t.map_value(99), 99);
    }
}
