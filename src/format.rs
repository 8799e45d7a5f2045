// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Human-readable rendering.
//!
//! ```text
//! (Modern)2024.3.15(T)09:05:07.123.456
//! (Modern)?.?.15(T)06:??:??.???.???
//! (PreHistoric)-65048100~1e6.?.?(T)??:??
//! ```
//!
//! Prehistoric values end at the minute, the finest field they carry, and show
//! their precision exponent after the year when it is coarser than one year.

use crate::{Format, PackedTimestamp, Unspecified};
use std::fmt::{self, Write};

/// Render `t`, optionally wrapped in double quotes.
pub fn render(t: PackedTimestamp, quoted: bool) -> String {
    if quoted {
        format!("{t:#}")
    } else {
        t.to_string()
    }
}

/// One field, or a run of `?` as wide as the field would be.
fn field(
    out: &mut impl Write,
    unspecified: Unspecified,
    flag: Unspecified,
    value: impl fmt::Display,
    width: usize,
) -> fmt::Result {
    if unspecified.intersects(flag) {
        (0..width).try_for_each(|_| out.write_char('?'))
    } else {
        write!(out, "{value:0width$}")
    }
}

fn write_body(out: &mut impl Write, t: PackedTimestamp) -> fmt::Result {
    let e = t.expand();
    let u = e.unspecified;
    write!(out, "({})", t.format())?;

    match e.full_year() {
        Some(year) => write!(out, "{year}")?,
        None => out.write_char('?')?,
    }
    if t.is_prehistoric_format() && !u.contains(Unspecified::EPOCHS) {
        if u.contains(Unspecified::PRECISION) {
            out.write_str("~1e?")?;
        } else if e.precision > 0 {
            write!(out, "~1e{}", e.precision)?;
        }
    }

    out.write_char('.')?;
    field(out, u, Unspecified::MONTHS, e.month, 1)?;
    out.write_char('.')?;
    field(out, u, Unspecified::DAYS, e.day, 1)?;
    out.write_str("(T)")?;
    field(out, u, Unspecified::HOURS, e.hour, 2)?;
    out.write_char(':')?;
    field(out, u, Unspecified::MINUTES, e.minute, 2)?;

    if t.format() == Format::Modern {
        out.write_char(':')?;
        field(out, u, Unspecified::SECONDS, e.seconds, 2)?;
        out.write_char('.')?;
        field(out, u, Unspecified::MILLISECONDS, e.milliseconds, 3)?;
        out.write_char('.')?;
        field(out, u, Unspecified::MICROSECONDS, e.microseconds, 3)?;
    }
    Ok(())
}

impl fmt::Display for PackedTimestamp {
    /// `{}` renders plain text, `{:#}` wraps it in double quotes.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = f.alternate();
        if quote {
            f.write_char('"')?;
        }
        if self.is_valid() {
            write_body(f, *self)?;
        } else {
            write!(f, "(Invalid EternalTimestamp; Cannot Parse {:#018x})", self.bits())?;
        }
        if quote {
            f.write_char('"')?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::MONTH;

    #[test]
    fn full_modern() {
        let t = PackedTimestamp::modern()
            .year(2024)
            .month(3)
            .day(15)
            .hour(9)
            .minute(5)
            .seconds(7)
            .milliseconds(123)
            .microseconds(456)
            .build();
        assert_eq!(t.to_string(), "(Modern)2024.3.15(T)09:05:07.123.456");
        assert_eq!(render(t, true), "\"(Modern)2024.3.15(T)09:05:07.123.456\"");
        assert_eq!(render(t, false), t.to_string());
    }

    #[test]
    fn epoch_and_unknown() {
        assert_eq!(
            PackedTimestamp::epoch().to_string(),
            "(Modern)-48100.1.1(T)00:00:00.000.000"
        );
        assert_eq!(
            PackedTimestamp::unknown().to_string(),
            "(Modern)?.?.?(T)??:??:??.???.???"
        );
    }

    #[test]
    fn partial_modern() {
        let t = PackedTimestamp::modern().day(15).hour(6).build();
        assert_eq!(t.to_string(), "(Modern)?.?.15(T)06:??:??.???.???");
    }

    #[test]
    fn prehistoric() {
        let t = PackedTimestamp::prehistoric()
            .years_before_modern(65_000_000)
            .precision(6)
            .build();
        assert_eq!(t.to_string(), "(PreHistoric)-65048100~1e6.?.?(T)??:??");

        let exact = PackedTimestamp::prehistoric()
            .year(-50_000)
            .precision(0)
            .month(3)
            .day(1)
            .hour(6)
            .minute(0)
            .build();
        assert_eq!(exact.to_string(), "(PreHistoric)-50000.3.1(T)06:00");

        let no_precision = PackedTimestamp::prehistoric().year(-50_000).build();
        assert_eq!(no_precision.to_string(), "(PreHistoric)-50000~1e?.?.?(T)??:??");

        assert_eq!(
            PackedTimestamp::prehistoric().build().to_string(),
            "(PreHistoric)?.?.?(T)??:??"
        );
    }

    #[test]
    fn invalid_words() {
        let t = PackedTimestamp::from_bits(MONTH.set(0, 12)).unwrap();
        assert_eq!(
            t.to_string(),
            "(Invalid EternalTimestamp; Cannot Parse 0x0000300000000000)"
        );
        assert_eq!(
            format!("{t:#}"),
            "\"(Invalid EternalTimestamp; Cannot Parse 0x0000300000000000)\""
        );
    }
}
