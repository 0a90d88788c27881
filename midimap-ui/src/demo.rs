//! Scripted demo event generator.
//!
//! Cycles through five fixed scenarios, producing *input* events that take
//! the normal resolution path — the panel always reflects real table
//! behavior, never canned outputs.

use std::time::Duration;

use midimap_types::MidiEvent;

pub const DEMO_PERIOD: Duration = Duration::from_millis(1000);

pub struct DemoGenerator {
    scenario: u8,
    rng_state: u64,
}

impl DemoGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            scenario: 0,
            rng_state: seed,
        }
    }

    /// Next demo input event. Scenario order: CC12, CC74, random program
    /// change, note C4, note C5.
    pub fn next_event(&mut self) -> MidiEvent {
        let event = match self.scenario {
            0 => MidiEvent::cc(12, self.rand_below(128)),
            1 => MidiEvent::cc(74, self.rand_below(128)),
            2 => MidiEvent::pc(self.rand_below(128)),
            3 => MidiEvent::note(60, 60 + self.rand_below(67)),
            _ => MidiEvent::note(72, 60 + self.rand_below(67)),
        };
        self.scenario = (self.scenario + 1) % 5;
        event
    }

    fn rand_below(&mut self, bound: u8) -> u8 {
        self.rng_state = self
            .rng_state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.rng_state >> 33) % u64::from(bound)) as u8
    }
}
