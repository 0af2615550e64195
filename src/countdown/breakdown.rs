// Remaining-time arithmetic: clamped whole seconds and the d/h/m/s split.

pub const SECS_PER_MINUTE: u64 = 60;
pub const SECS_PER_HOUR: u64 = 3_600;
pub const SECS_PER_DAY: u64 = 86_400;

/// Whole seconds from `now_ms` until `target_ms`, never negative.
pub fn remaining_seconds(target_ms: i64, now_ms: i64) -> u64 {
    let diff = target_ms.saturating_sub(now_ms).max(0);
    (diff / 1000) as u64
}

/// One digit group on the display.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Unit {
    Days,
    Hours,
    Minutes,
    Seconds,
}

impl Unit {
    pub const ALL: [Unit; 4] = [Unit::Days, Unit::Hours, Unit::Minutes, Unit::Seconds];

    /// `data-unit` attribute value of the matching DOM node.
    pub fn key(self) -> &'static str {
        match self {
            Unit::Days => "days",
            Unit::Hours => "hours",
            Unit::Minutes => "minutes",
            Unit::Seconds => "seconds",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Days are unpadded (may exceed two digits); the rest are two digits.
    pub fn format(self, value: u64) -> String {
        match self {
            Unit::Days => value.to_string(),
            _ => format!("{value:02}"),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Breakdown {
    pub days: u64,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Breakdown {
    pub fn from_seconds(total: u64) -> Self {
        Self {
            days: total / SECS_PER_DAY,
            hours: (total % SECS_PER_DAY) / SECS_PER_HOUR,
            minutes: (total % SECS_PER_HOUR) / SECS_PER_MINUTE,
            seconds: total % SECS_PER_MINUTE,
        }
    }

    pub fn total_seconds(&self) -> u64 {
        self.days * SECS_PER_DAY
            + self.hours * SECS_PER_HOUR
            + self.minutes * SECS_PER_MINUTE
            + self.seconds
    }

    pub fn get(&self, unit: Unit) -> u64 {
        match unit {
            Unit::Days => self.days,
            Unit::Hours => self.hours,
            Unit::Minutes => self.minutes,
            Unit::Seconds => self.seconds,
        }
    }

    pub fn formatted(&self, unit: Unit) -> String {
        unit.format(self.get(unit))
    }
}

/// Last text pushed per unit, so unchanged groups are not re-emitted.
#[derive(Debug, Default)]
pub(crate) struct EmittedDigits {
    last: [Option<String>; 4],
}

impl EmittedDigits {
    /// Units whose formatted text differs from what was last emitted, with
    /// the new text. Records the new text as emitted.
    pub(crate) fn changes(&mut self, next: &Breakdown) -> Vec<(Unit, String)> {
        let mut out = Vec::new();
        for unit in Unit::ALL {
            let text = next.formatted(unit);
            let slot = &mut self.last[unit.index()];
            if slot.as_deref() != Some(text.as_str()) {
                *slot = Some(text.clone());
                out.push((unit, text));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_of_each_unit() {
        let b = Breakdown::from_seconds(90_061);
        assert_eq!(
            b,
            Breakdown {
                days: 1,
                hours: 1,
                minutes: 1,
                seconds: 1
            }
        );
    }

    #[test]
    fn remaining_is_clamped_and_floored() {
        assert_eq!(remaining_seconds(1_000, 5_000), 0);
        assert_eq!(remaining_seconds(5_000, 5_000), 0);
        assert_eq!(remaining_seconds(5_999, 5_000), 0);
        assert_eq!(remaining_seconds(6_000, 5_000), 1);
        assert_eq!(remaining_seconds(i64::MIN, i64::MAX), 0);
    }

    #[test]
    fn formatting_pads_all_but_days() {
        let b = Breakdown::from_seconds(123 * SECS_PER_DAY + 5);
        assert_eq!(b.formatted(Unit::Days), "123");
        assert_eq!(b.formatted(Unit::Hours), "00");
        assert_eq!(b.formatted(Unit::Seconds), "05");
    }

    #[test]
    fn only_changed_units_are_emitted() {
        let mut digits = EmittedDigits::default();
        assert_eq!(digits.changes(&Breakdown::from_seconds(3_661)).len(), 4);
        let next = digits.changes(&Breakdown::from_seconds(3_660));
        assert_eq!(next, vec![(Unit::Seconds, "00".to_string())]);
        assert!(digits.changes(&Breakdown::from_seconds(3_660)).is_empty());
    }
}
