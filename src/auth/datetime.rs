//! Millisecond-precision UTC timestamp with an explicit "unset" zero value.

// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError};
use time::{PrimitiveDateTime, UtcOffset, format_description::well_known::Rfc3339, macros};
// self
use crate::_prelude::*;

/// Errors produced while converting or parsing a [`DateTime`].
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum DateTimeError {
	/// The instant cannot be represented (year outside `1..=9998`).
	#[error("Timestamp year {year} is outside the supported range.")]
	OutOfRange {
		/// Year of the rejected instant.
		year: i32,
	},
	/// The string matches none of the accepted layouts.
	#[error("Timestamp `{value}` is not RFC 3339 or `YYYY-MM-DD HH:MM:SS.fffZ`.")]
	Unparseable {
		/// Rejected input.
		value: String,
	},
}

/// UTC timestamp used for identity expiry.
///
/// The default value is the zero timestamp, meaning "unset". It renders as an empty string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTime(Option<OffsetDateTime>);
impl DateTime {
	const MAX_YEAR: i32 = 9998;
	const MIN_YEAR: i32 = 1;

	/// Current instant.
	pub fn now() -> Self {
		Self(Some(truncate_to_millis(OffsetDateTime::now_utc())))
	}

	/// Parses RFC 3339 or `YYYY-MM-DD HH:MM:SS[.fff]Z`; blank input yields the zero value.
	pub fn parse(value: &str) -> Result<Self, DateTimeError> {
		let raw = value.trim();

		if raw.is_empty() {
			return Ok(Self::default());
		}
		if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
			return Self::try_from(instant);
		}

		let unparseable = || DateTimeError::Unparseable { value: value.to_owned() };
		let naive = raw.strip_suffix('Z').ok_or_else(unparseable)?;
		let parsed = PrimitiveDateTime::parse(
			naive,
			macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
		)
		.or_else(|_| {
			PrimitiveDateTime::parse(
				naive,
				macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
			)
		})
		.map_err(|_| unparseable())?;

		Self::try_from(parsed.assume_utc())
	}

	/// Returns true for the unset timestamp.
	pub fn is_zero(&self) -> bool {
		self.0.is_none()
	}

	/// Underlying UTC instant, if set.
	pub fn instant(&self) -> Option<OffsetDateTime> {
		self.0
	}
}
impl TryFrom<OffsetDateTime> for DateTime {
	type Error = DateTimeError;

	fn try_from(value: OffsetDateTime) -> Result<Self, Self::Error> {
		let year = value.year();

		// Keeps the UTC shift below from overflowing the representable range.
		if !(Self::MIN_YEAR..=Self::MAX_YEAR).contains(&year) {
			return Err(DateTimeError::OutOfRange { year });
		}

		Ok(Self(Some(truncate_to_millis(value.to_offset(UtcOffset::UTC)))))
	}
}
impl Display for DateTime {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let Some(instant) = self.0 else {
			return Ok(());
		};
		let rendered = instant
			.format(macros::format_description!(
				"[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]Z"
			))
			.map_err(|_| std::fmt::Error)?;

		f.write_str(&rendered)
	}
}
impl FromStr for DateTime {
	type Err = DateTimeError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl Serialize for DateTime {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.collect_str(self)
	}
}
impl<'de> Deserialize<'de> for DateTime {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		Self::parse(&raw).map_err(DeError::custom)
	}
}

fn truncate_to_millis(instant: OffsetDateTime) -> OffsetDateTime {
	let millis = instant.nanosecond() / 1_000_000;

	// Nanoseconds stay below one second, so the replacement always succeeds.
	instant.replace_nanosecond(millis * 1_000_000).unwrap_or(instant)
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros::datetime;
	// self
	use super::*;

	#[test]
	fn conversion_normalizes_to_utc_milliseconds() {
		let value = DateTime::try_from(datetime!(2025-03-01 10:30:15.123456789 +02:00))
			.expect("In-range instant should convert.");

		assert_eq!(value.instant(), Some(datetime!(2025-03-01 08:30:15.123 UTC)));
		assert_eq!(value.to_string(), "2025-03-01 08:30:15.123Z");
	}

	#[test]
	fn conversion_rejects_unrepresentable_years() {
		let err = DateTime::try_from(datetime!(9999-12-31 23:59:59 UTC))
			.expect_err("Years past the supported range must fail.");

		assert_eq!(err, DateTimeError::OutOfRange { year: 9999 });
		assert!(DateTime::try_from(datetime!(0000-01-01 00:00 UTC)).is_err());
	}

	#[test]
	fn zero_value_is_blank() {
		let zero = DateTime::default();

		assert!(zero.is_zero());
		assert_eq!(zero.to_string(), "");
		assert_eq!(DateTime::parse("  ").expect("Blank input should parse."), zero);
		assert_eq!(serde_json::to_string(&zero).expect("Zero should serialize."), "\"\"");
	}

	#[test]
	fn parse_accepts_both_layouts() {
		let rfc = DateTime::parse("2024-05-06T07:08:09.5+01:00").expect("RFC 3339 should parse.");
		let spaced = DateTime::parse("2024-05-06 06:08:09.500Z").expect("Spaced layout should parse.");
		let whole = DateTime::parse("2024-05-06 06:08:09Z").expect("Whole seconds should parse.");

		assert_eq!(rfc, spaced);
		assert_eq!(whole.instant(), Some(datetime!(2024-05-06 06:08:09 UTC)));
		assert!(matches!(DateTime::parse("yesterday"), Err(DateTimeError::Unparseable { .. })));
		assert!(DateTime::parse("2024-05-06 06:08:09").is_err());
	}

	#[test]
	fn serde_round_trips_through_display_layout() {
		let value: DateTime = serde_json::from_str("\"2024-01-02 03:04:05.006Z\"")
			.expect("Display layout should deserialize.");

		assert_eq!(
			serde_json::to_string(&value).expect("Value should serialize."),
			"\"2024-01-02 03:04:05.006Z\""
		);
	}
}
