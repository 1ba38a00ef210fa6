use std::fmt;
use std::str::FromStr;

use chrono::TimeDelta;

use crate::error::DecodeError;

/// An ISO-8601 duration (`PnYnMnWnDTnHnMnS`).
///
/// Components are kept as written so that calendar units (years, months)
/// survive a round trip; use [`IsoDuration::to_time_delta`] for arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IsoDuration {
    pub negative: bool,
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub nanoseconds: u32,
}

const DATE_DESIGNATORS: [char; 4] = ['Y', 'M', 'W', 'D'];
const TIME_DESIGNATORS: [char; 3] = ['H', 'M', 'S'];

impl IsoDuration {
    /// Converts an exact time span; the result uses days and smaller units.
    /// Returns `None` when the day count does not fit the `days` component.
    pub fn from_time_delta(delta: TimeDelta) -> Option<Self> {
        let negative = delta < TimeDelta::zero();
        let delta = if negative { -delta } else { delta };
        let total = delta.num_seconds();
        Some(IsoDuration {
            negative,
            days: u32::try_from(total / 86_400).ok()?,
            hours: ((total % 86_400) / 3_600) as u32,
            minutes: ((total % 3_600) / 60) as u32,
            seconds: (total % 60) as u32,
            nanoseconds: delta.subsec_nanos().unsigned_abs(),
            ..Default::default()
        })
    }

    /// Returns the exact span, or `None` when the duration uses calendar
    /// units (years or months) whose length depends on a reference date.
    pub fn to_time_delta(&self) -> Option<TimeDelta> {
        if self.years != 0 || self.months != 0 {
            return None;
        }
        let days = i64::from(self.weeks) * 7 + i64::from(self.days);
        let seconds = ((days * 24 + i64::from(self.hours)) * 60 + i64::from(self.minutes)) * 60
            + i64::from(self.seconds);
        let delta = TimeDelta::try_seconds(seconds)?
            .checked_add(&TimeDelta::nanoseconds(i64::from(self.nanoseconds)))?;
        Some(if self.negative { -delta } else { delta })
    }

    fn has_time(&self) -> bool {
        self.hours != 0 || self.minutes != 0 || self.seconds != 0 || self.nanoseconds != 0
    }
}

/// Splits `1Y2M` into `[("1", 'Y'), ("2", 'M')]`.
fn components(part: &str) -> Option<Vec<(&str, char)>> {
    let mut out = Vec::new();
    let mut start = 0;
    for (i, c) in part.char_indices() {
        if c.is_ascii_digit() || c == '.' || c == ',' {
            continue;
        }
        if i == start {
            return None;
        }
        out.push((&part[start..i], c));
        start = i + c.len_utf8();
    }
    if start != part.len() {
        return None;
    }
    Some(out)
}

fn parse_fraction(digits: &str) -> Option<u32> {
    if digits.is_empty() || digits.len() > 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let scale = 10u32.pow(9 - digits.len() as u32);
    digits.parse::<u32>().ok().map(|n| n * scale)
}

impl FromStr for IsoDuration {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DecodeError::InvalidLiteral {
            kind: "duration",
            value: s.to_string(),
        };

        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s.strip_prefix('+').unwrap_or(s)),
        };
        let rest = rest.strip_prefix('P').ok_or_else(invalid)?;
        let (date_part, time_part) = match rest.split_once('T') {
            Some((date, time)) if !time.is_empty() => (date, Some(time)),
            Some(_) => return Err(invalid()),
            None => (rest, None),
        };
        if date_part.is_empty() && time_part.is_none() {
            return Err(invalid());
        }

        let mut duration = IsoDuration {
            negative,
            ..Default::default()
        };

        let mut last = None;
        for (digits, designator) in components(date_part).ok_or_else(invalid)? {
            let pos = DATE_DESIGNATORS
                .iter()
                .position(|d| *d == designator)
                .ok_or_else(invalid)?;
            if last.is_some_and(|l| pos <= l) {
                return Err(invalid());
            }
            last = Some(pos);
            let n: u32 = digits.parse().map_err(|_| invalid())?;
            match designator {
                'Y' => duration.years = n,
                'M' => duration.months = n,
                'W' => duration.weeks = n,
                _ => duration.days = n,
            }
        }

        if let Some(time_part) = time_part {
            let mut last = None;
            for (digits, designator) in components(time_part).ok_or_else(invalid)? {
                let pos = TIME_DESIGNATORS
                    .iter()
                    .position(|d| *d == designator)
                    .ok_or_else(invalid)?;
                if last.is_some_and(|l| pos <= l) {
                    return Err(invalid());
                }
                last = Some(pos);
                if designator == 'S' {
                    let (whole, frac) = match digits.split_once(['.', ',']) {
                        Some((whole, frac)) => (whole, Some(frac)),
                        None => (digits, None),
                    };
                    duration.seconds = whole.parse().map_err(|_| invalid())?;
                    if let Some(frac) = frac {
                        duration.nanoseconds = parse_fraction(frac).ok_or_else(invalid)?;
                    }
                } else {
                    let n: u32 = digits.parse().map_err(|_| invalid())?;
                    if designator == 'H' {
                        duration.hours = n;
                    } else {
                        duration.minutes = n;
                    }
                }
            }
        }

        Ok(duration)
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;
        let mut wrote = false;
        for (n, d) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if n != 0 {
                write!(f, "{}{}", n, d)?;
                wrote = true;
            }
        }
        if self.has_time() || !wrote {
            f.write_str("T")?;
            if self.hours != 0 {
                write!(f, "{}H", self.hours)?;
            }
            if self.minutes != 0 {
                write!(f, "{}M", self.minutes)?;
            }
            if self.seconds != 0 || self.nanoseconds != 0 || !self.has_time() {
                write!(f, "{}", self.seconds)?;
                if self.nanoseconds != 0 {
                    let frac = format!("{:09}", self.nanoseconds);
                    write!(f, ".{}", frac.trim_end_matches('0'))?;
                }
                f.write_str("S")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> IsoDuration {
        s.parse().unwrap()
    }

    #[test]
    fn parses_full_form() {
        let d = parse("P1Y2M3W4DT5H6M7.25S");
        assert_eq!(
            d,
            IsoDuration {
                negative: false,
                years: 1,
                months: 2,
                weeks: 3,
                days: 4,
                hours: 5,
                minutes: 6,
                seconds: 7,
                nanoseconds: 250_000_000,
            }
        );
        assert_eq!(d.to_string(), "P1Y2M3W4DT5H6M7.25S");
    }

    #[test]
    fn month_and_minute_disambiguated_by_time_marker() {
        let d = parse("P1MT1M");
        assert_eq!(d.months, 1);
        assert_eq!(d.minutes, 1);
    }

    #[test]
    fn zero_duration_formats_as_zero_seconds() {
        assert_eq!(IsoDuration::default().to_string(), "PT0S");
        assert_eq!(parse("PT0S"), IsoDuration::default());
    }

    #[test]
    fn negative_durations() {
        let d = parse("-PT90M");
        assert!(d.negative);
        assert_eq!(d.to_time_delta(), Some(TimeDelta::minutes(-90)));
        assert_eq!(d.to_string(), "-PT90M");
    }

    #[test]
    fn rejects_malformed() {
        let malformed = [
            "", "P", "PT", "1D", "P1H", "PT1D", "P1D2Y", "PT1.5M", "P-1D", "PT1.1234567891S",
        ];
        for bad in malformed {
            assert!(bad.parse::<IsoDuration>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn time_delta_round_trip() {
        let delta = TimeDelta::seconds(93_784) + TimeDelta::milliseconds(5);
        let d = IsoDuration::from_time_delta(delta).unwrap();
        assert_eq!(d.to_string(), "P1DT2H3M4.005S");
        assert_eq!(d.to_time_delta(), Some(delta));
    }

    #[test]
    fn calendar_units_have_no_exact_span() {
        assert_eq!(parse("P1M").to_time_delta(), None);
        assert_eq!(parse("P2W").to_time_delta(), Some(TimeDelta::days(14)));
    }

    #[test]
    fn oversized_span_does_not_fit() {
        let days = i64::from(u32::MAX) + 1;
        assert_eq!(IsoDuration::from_time_delta(TimeDelta::days(days)), None);
        let d = IsoDuration::from_time_delta(TimeDelta::days(i64::from(u32::MAX))).unwrap();
        assert_eq!(d.days, u32::MAX);
    }
}
