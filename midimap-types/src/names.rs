//! Display names for MIDI controller and note numbers.

/// Standard controller names, indexed by CC number. Unassigned controllers
/// fall back to "CC<n>".
const CC_NAMES: [&str; 128] = [
    "Bank Sel", "Mod Wheel", "Breath", "CC3", "Foot Ctrl", "Port Time", "Data MSB", "Volume",
    "Balance", "CC9", "Pan", "Express", "Effect 1", "Effect 2", "CC14", "CC15",
    "Gen Purp1", "Gen Purp2", "Gen Purp3", "Gen Purp4", "CC20", "CC21", "CC22", "CC23",
    "CC24", "CC25", "CC26", "CC27", "CC28", "CC29", "CC30", "CC31",
    "Bank LSB", "Mod Wheel", "Breath", "CC35", "Foot Ctrl", "Port Time", "Data LSB", "Volume",
    "Balance", "CC41", "Pan", "Express", "Effect 1", "Effect 2", "CC46", "CC47",
    "Gen Purp1", "Gen Purp2", "Gen Purp3", "Gen Purp4", "CC52", "CC53", "CC54", "CC55",
    "CC56", "CC57", "CC58", "CC59", "CC60", "CC61", "CC62", "CC63",
    "Sustain", "Portamen", "Sostenuto", "Soft Ped", "Legato", "Hold 2", "Sound 1", "Sound 2",
    "Sound 3", "Sound 4", "Sound 5", "Sound 6", "Sound 7", "Sound 8", "Sound 9", "Sound 10",
    "Gen Purp5", "Gen Purp6", "Gen Purp7", "Gen Purp8", "Port Ctrl", "CC85", "CC86", "CC87",
    "CC88", "CC89", "CC90", "Reverb", "Tremolo", "Chorus", "Detune", "Phaser",
    "Data Inc", "Data Dec", "NRPN LSB", "NRPN MSB", "RPN LSB", "RPN MSB", "CC102", "CC103",
    "CC104", "CC105", "CC106", "CC107", "CC108", "CC109", "CC110", "CC111",
    "CC112", "CC113", "CC114", "CC115", "CC116", "CC117", "CC118", "CC119",
    "All Snd Off", "Reset Ctrl", "Local Ctrl", "All Nt Off", "Omni Off", "Omni On", "Mono On",
    "Poly On",
];

const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Standard controller name for a CC number ("Volume" for 7).
pub fn cc_name(cc: u8) -> &'static str {
    CC_NAMES[(cc & 0x7F) as usize]
}

/// Note name with octave, C-1 through G9 ("C4" for 60).
pub fn note_name(note: u8) -> String {
    let class = PITCH_CLASSES[(note % 12) as usize];
    let octave = i32::from(note / 12) - 1;
    format!("{}{}", class, octave)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_name_range() {
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(21), "A0");
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(64), "E4");
        assert_eq!(note_name(127), "G9");
    }

    #[test]
    fn test_cc_names() {
        assert_eq!(cc_name(1), "Mod Wheel");
        assert_eq!(cc_name(7), "Volume");
        assert_eq!(cc_name(64), "Sustain");
        assert_eq!(cc_name(91), "Reverb");
        assert_eq!(cc_name(3), "CC3");
    }
}
