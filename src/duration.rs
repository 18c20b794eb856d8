//! Duration literals such as `15`, `1d`, `24h` or `1d12h30m`.
//!
//! A literal is either a bare integer, interpreted in the target's own unit, or a
//! sequence of `<integer><unit>` tokens which are truncated one by one to the
//! target's resolution and summed up as a signed total. Text between tokens is ignored.

use std::{
    cmp::Ordering,
    fmt::{self, Debug, Formatter},
    marker::PhantomData,
};

use chrono::TimeDelta;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::DurationError;


const NANOS_PER_SECOND: i128 = 1_000_000_000;

// PANIC SAFETY: The pattern is a constant that is known to compile.
static TOKEN_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("(-?[0-9]+)([a-zA-Z]+)").unwrap());



/// Units recognised in duration literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
    Weeks,
    Months,
    Years,
}

impl TimeUnit {
    /// Maps a literal suffix (`ns`, `us`, `ms`, `s`, `m`, `h`, `d`, `w`, `M`, `mo`, `y`)
    /// to its unit. Suffixes are case-sensitive: `m` is minutes, `M` is months.
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        let unit = match suffix {
            "ns" => Self::Nanoseconds,
            "us" => Self::Microseconds,
            "ms" => Self::Milliseconds,
            "s" => Self::Seconds,
            "m" => Self::Minutes,
            "h" => Self::Hours,
            "d" => Self::Days,
            "w" => Self::Weeks,
            "M" | "mo" => Self::Months,
            "y" => Self::Years,
            _ => return None,
        };

        Some(unit)
    }

    /// Length of one unit in nanoseconds. A month is 1/12 of an average Gregorian year.
    pub const fn nanoseconds(self) -> i128 {
        match self {
            Self::Nanoseconds => 1,
            Self::Microseconds => 1_000,
            Self::Milliseconds => 1_000_000,
            Self::Seconds => NANOS_PER_SECOND,
            Self::Minutes => 60 * NANOS_PER_SECOND,
            Self::Hours => 3_600 * NANOS_PER_SECOND,
            Self::Days => 86_400 * NANOS_PER_SECOND,
            Self::Weeks => 604_800 * NANOS_PER_SECOND,
            Self::Months => 2_629_746 * NANOS_PER_SECOND,
            Self::Years => 31_556_952 * NANOS_PER_SECOND,
        }
    }
}


/// A duration representation that literals can be parsed into.
pub trait ParseableDuration: Sized + Copy {
    /// Unit of a bare integer literal such as `"15"`.
    const BARE_UNIT: TimeUnit;

    /// Resolution of this representation in nanoseconds. Every token is truncated
    /// toward zero to a whole number of ticks before it is added to the total.
    const TICK: i128;

    /// Converts a signed nanosecond total into this representation.
    fn from_nanoseconds(total: i128) -> Result<Self, DurationError>;
}


/// Parser for compound duration literals.
pub struct DurationParser;

impl DurationParser {
    /// Parses `text` into `D`.
    ///
    /// Tokens are summed as a signed total, so only the final value has to be
    /// representable. A text without any `<integer><unit>` token is a zero duration.
    pub fn parse<D: ParseableDuration>(text: &str) -> Result<D, DurationError> {
        let mut total: i128 = 0;

        for captures in TOKEN_PATTERN.captures_iter(text) {
            let quantity = &captures[1];
            let suffix = &captures[2];

            let unit = TimeUnit::from_suffix(suffix)
                .ok_or_else(|| DurationError::UnknownUnit(suffix.to_string()))?;
            let count = quantity
                .parse::<i64>()
                .map_err(|_| DurationError::QuantityOutOfRange(quantity.to_string()))?;

            let part = (count as i128)
                .checked_mul(unit.nanoseconds())
                .ok_or(DurationError::Overflow)?;
            total = total
                .checked_add(part / D::TICK * D::TICK)
                .ok_or(DurationError::Overflow)?;
        }

        D::from_nanoseconds(total)
    }

    /// Parses `text` as a bare integer in `D`'s own unit, falling back to the
    /// compound syntax when that fails.
    pub fn parse_literal<D: ParseableDuration>(text: &str) -> Result<D, DurationError> {
        match text.parse::<i64>() {
            Ok(count) => D::from_nanoseconds(count as i128 * D::BARE_UNIT.nanoseconds()),
            Err(_) => Self::parse(text),
        }
    }
}



/// Marker type naming the unit of a [`UnitDuration`].
pub trait Period: Copy + Debug {
    const UNIT: TimeUnit;
}

macro_rules! periods {
    ($($period:ident => $unit:ident, $alias:ident;)+) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub struct $period;

            impl Period for $period {
                const UNIT: TimeUnit = TimeUnit::$unit;
            }

            pub type $alias = UnitDuration<$period>;
        )+
    };
}

periods! {
    NanosecondPeriod => Nanoseconds, Nanoseconds;
    MicrosecondPeriod => Microseconds, Microseconds;
    MillisecondPeriod => Milliseconds, Milliseconds;
    SecondPeriod => Seconds, Seconds;
    MinutePeriod => Minutes, Minutes;
    HourPeriod => Hours, Hours;
    DayPeriod => Days, Days;
    WeekPeriod => Weeks, Weeks;
    MonthPeriod => Months, Months;
    YearPeriod => Years, Years;
}


/// Signed count of a fixed unit of time, e.g. [`Milliseconds`] or [`Hours`].
///
/// Durations of different units compare by the amount of time they represent,
/// so `Days::new(1) == Hours::new(24)`.
#[derive(Clone, Copy)]
pub struct UnitDuration<P: Period> {
    count: i64,
    period: PhantomData<P>,
}

impl<P: Period> UnitDuration<P> {
    pub const fn new(count: i64) -> Self {
        Self {
            count,
            period: PhantomData,
        }
    }

    pub const fn count(&self) -> i64 {
        self.count
    }

    pub fn unit(&self) -> TimeUnit {
        P::UNIT
    }

    fn total_nanoseconds(&self) -> i128 {
        self.count as i128 * P::UNIT.nanoseconds()
    }

    /// Converts into another unit, truncating toward zero.
    /// Returns `None` if the count does not fit.
    pub fn cast<Q: Period>(self) -> Option<UnitDuration<Q>> {
        UnitDuration::<Q>::from_nanoseconds(self.total_nanoseconds()).ok()
    }

    /// Converts into a [`std::time::Duration`]; `None` for negative durations.
    pub fn to_std(self) -> Option<std::time::Duration> {
        std::time::Duration::from_nanoseconds(self.total_nanoseconds()).ok()
    }
}

impl<P: Period> Debug for UnitDuration<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.count, P::UNIT)
    }
}

impl<P: Period, Q: Period> PartialEq<UnitDuration<Q>> for UnitDuration<P> {
    fn eq(&self, other: &UnitDuration<Q>) -> bool {
        self.total_nanoseconds() == other.total_nanoseconds()
    }
}

impl<P: Period> Eq for UnitDuration<P> {}

impl<P: Period, Q: Period> PartialOrd<UnitDuration<Q>> for UnitDuration<P> {
    fn partial_cmp(&self, other: &UnitDuration<Q>) -> Option<Ordering> {
        Some(self.total_nanoseconds().cmp(&other.total_nanoseconds()))
    }
}

impl<P: Period> Ord for UnitDuration<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.count.cmp(&other.count)
    }
}

impl<P: Period> ParseableDuration for UnitDuration<P> {
    const BARE_UNIT: TimeUnit = P::UNIT;
    const TICK: i128 = P::UNIT.nanoseconds();

    fn from_nanoseconds(total: i128) -> Result<Self, DurationError> {
        i64::try_from(total / Self::TICK)
            .map(Self::new)
            .map_err(|_| DurationError::Overflow)
    }
}


/// Bare integers are seconds. Negative totals are not representable.
impl ParseableDuration for std::time::Duration {
    const BARE_UNIT: TimeUnit = TimeUnit::Seconds;
    const TICK: i128 = 1;

    fn from_nanoseconds(total: i128) -> Result<Self, DurationError> {
        if total < 0 {
            return Err(DurationError::Negative);
        }

        let seconds =
            u64::try_from(total / NANOS_PER_SECOND).map_err(|_| DurationError::Overflow)?;
        let subsecond_nanoseconds = (total % NANOS_PER_SECOND) as u32;

        Ok(Self::new(seconds, subsecond_nanoseconds))
    }
}


/// Bare integers are seconds.
impl ParseableDuration for TimeDelta {
    const BARE_UNIT: TimeUnit = TimeUnit::Seconds;
    const TICK: i128 = 1;

    fn from_nanoseconds(total: i128) -> Result<Self, DurationError> {
        let seconds =
            i64::try_from(total / NANOS_PER_SECOND).map_err(|_| DurationError::Overflow)?;
        let subsecond_nanoseconds = (total % NANOS_PER_SECOND) as i64;

        TimeDelta::try_seconds(seconds)
            .and_then(|whole| whole.checked_add(&TimeDelta::nanoseconds(subsecond_nanoseconds)))
            .ok_or(DurationError::Overflow)
    }
}
