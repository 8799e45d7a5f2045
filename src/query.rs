// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! "Is this field known?" predicates.
//!
//! Every predicate dispatches on the mode bit first and then tests the
//! variant's own field against its sentinel. The prehistoric variant has no
//! century or year-of-century fields; there the year-level questions are
//! answered from the `precision` exponent instead:
//!
//! | Question | Modern | Prehistoric |
//! |----------|--------|-------------|
//! | [`has_century`](PackedTimestamp::has_century) | `century` known | `years` known, precision ≤ 2 |
//! | [`has_year`](PackedTimestamp::has_year) | `year` known | `years` known, precision ≤ 1 |
//! | [`has_age`](PackedTimestamp::has_age) | century and year known | `years` known |
//! | [`has_seconds`](PackedTimestamp::has_seconds) and finer | field known | never |

use crate::layout::{
    Field, CENTURY, DAY, HOUR, MICROSECONDS, MILLISECONDS, MINUTE, MONTH, PH_DAY, PH_HOUR,
    PH_MINUTE, PH_MONTH, PH_PRECISION, PH_YEARS, SECONDS, YEAR,
};
use crate::PackedTimestamp;

impl PackedTimestamp {
    /// Prehistoric year count known to at least `10^max_precision` years.
    #[inline]
    fn ph_years_within(self, max_precision: u64) -> bool {
        self.specified(PH_YEARS)
            && self.specified(PH_PRECISION)
            && self.raw(PH_PRECISION) <= max_precision
    }

    #[inline]
    fn has(self, modern: Field, prehistoric: Field) -> bool {
        if self.is_modern_format() {
            self.specified(modern)
        } else {
            self.specified(prehistoric)
        }
    }

    /// Century known (prehistoric: year count good to a century or better).
    pub fn has_century(self) -> bool {
        if self.is_modern_format() {
            self.specified(CENTURY)
        } else {
            self.ph_years_within(2)
        }
    }

    /// Year within the century known (prehistoric: good to a decade or better).
    pub fn has_year(self) -> bool {
        if self.is_modern_format() {
            self.specified(YEAR)
        } else {
            self.ph_years_within(1)
        }
    }

    pub fn has_century_and_year(self) -> bool {
        if self.is_modern_format() {
            self.has_century() && self.has_year()
        } else {
            self.ph_years_within(2)
        }
    }

    /// The year is known to any precision at all.
    pub fn has_age(self) -> bool {
        if self.is_modern_format() {
            self.has_century() && self.has_year()
        } else {
            self.specified(PH_YEARS)
        }
    }

    pub fn has_month(self) -> bool {
        self.has(MONTH, PH_MONTH)
    }

    pub fn has_day(self) -> bool {
        self.has(DAY, PH_DAY)
    }

    pub fn has_hour(self) -> bool {
        self.has(HOUR, PH_HOUR)
    }

    pub fn has_minute(self) -> bool {
        self.has(MINUTE, PH_MINUTE)
    }

    pub fn has_seconds(self) -> bool {
        self.is_modern_format() && self.specified(SECONDS)
    }

    pub fn has_milliseconds(self) -> bool {
        self.is_modern_format() && self.specified(MILLISECONDS)
    }

    pub fn has_microseconds(self) -> bool {
        self.is_modern_format() && self.specified(MICROSECONDS)
    }

    /// Every date field is usable as-is: year exact, month and day known.
    pub fn has_complete_date(self) -> bool {
        if self.is_modern_format() {
            self.has_century() && self.has_year() && self.has_month() && self.has_day()
        } else {
            self.ph_years_within(0) && self.has_month() && self.has_day()
        }
    }

    /// Every time field the variant has is known.
    pub fn has_time(self) -> bool {
        if self.is_modern_format() {
            self.has_hour()
                && self.has_minute()
                && self.has_seconds()
                && self.has_milliseconds()
                && self.has_microseconds()
        } else {
            self.has_hour() && self.has_minute()
        }
    }

    /// Hour, minute and (modern only) seconds known.
    pub fn has_hh_mm_ss(self) -> bool {
        if self.is_modern_format() {
            self.has_hour() && self.has_minute() && self.has_seconds()
        } else {
            self.has_hour() && self.has_minute()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_predicates(t: PackedTimestamp) -> [bool; 15] {
        [
            t.has_century(),
            t.has_year(),
            t.has_century_and_year(),
            t.has_age(),
            t.has_month(),
            t.has_day(),
            t.has_hour(),
            t.has_minute(),
            t.has_seconds(),
            t.has_milliseconds(),
            t.has_microseconds(),
            t.has_complete_date(),
            t.has_time(),
            t.has_hh_mm_ss(),
            !t.is_partial_timestamp(),
        ]
    }

    #[test]
    fn unknown_knows_nothing() {
        assert_eq!(all_predicates(PackedTimestamp::unknown()), [false; 15]);
        assert_eq!(
            all_predicates(PackedTimestamp::prehistoric().build()),
            [false; 15]
        );
    }

    #[test]
    fn epoch_knows_everything() {
        assert_eq!(all_predicates(PackedTimestamp::epoch()), [true; 15]);
    }

    #[test]
    fn day_only() {
        let t = PackedTimestamp::modern().day(15).build();
        assert!(t.has_day());
        assert!(!t.has_month());
        assert!(!t.has_complete_date());
        assert!(!t.has_time());
    }

    #[test]
    fn modern_composites_need_every_part() {
        let date = PackedTimestamp::modern().year(1999).month(12).day(31).build();
        assert!(date.has_complete_date());
        assert!(date.has_age());
        assert!(!date.has_hh_mm_ss());

        let no_century = PackedTimestamp::modern()
            .year_of_century(99)
            .month(12)
            .day(31)
            .build();
        assert!(no_century.has_year());
        assert!(!no_century.has_century());
        assert!(!no_century.has_age());
        assert!(!no_century.has_complete_date());

        let hms = PackedTimestamp::modern().hour(1).minute(2).seconds(3).build();
        assert!(hms.has_hh_mm_ss());
        assert!(!hms.has_time());
        let full = PackedTimestamp::modern()
            .hour(1)
            .minute(2)
            .seconds(3)
            .milliseconds(4)
            .microseconds(5)
            .build();
        assert!(full.has_time());
    }

    #[test]
    fn prehistoric_year_questions_follow_precision() {
        let base = PackedTimestamp::prehistoric().years_before_modern(65_000_000);

        let exact = base.precision(0).build();
        assert!(exact.has_age() && exact.has_year() && exact.has_century());

        let decade = base.precision(1).build();
        assert!(decade.has_year() && decade.has_century());

        let century = base.precision(2).build();
        assert!(!century.has_year());
        assert!(century.has_century() && century.has_century_and_year());

        let megayear = base.precision(6).build();
        assert!(megayear.has_age());
        assert!(!megayear.has_century());
        assert!(!megayear.has_century_and_year());

        let vague = base.build();
        assert!(vague.has_age());
        assert!(!vague.has_century());
    }

    #[test]
    fn prehistoric_time_stops_at_minutes() {
        let t = PackedTimestamp::prehistoric()
            .years_before_modern(10)
            .precision(0)
            .month(6)
            .day(1)
            .hour(12)
            .minute(0)
            .build();
        assert!(t.has_complete_date());
        assert!(t.has_time());
        assert!(t.has_hh_mm_ss());
        assert!(!t.has_seconds());
        assert!(!t.has_milliseconds());
        assert!(!t.has_microseconds());

        let rough = PackedTimestamp::prehistoric()
            .years_before_modern(10)
            .precision(1)
            .month(6)
            .day(1)
            .build();
        assert!(!rough.has_complete_date());
    }
}
