use std::fmt;

use serde::{Deserialize, Serialize};

/// Highest part slot available within one request number. Incrementing
/// past this forces a rollover to a freshly minted number.
pub const MAX_PART: u8 = 99;

/// Structured identifier for one translation request, immutable once
/// assigned to a job.
///
/// `number` is shared across content items (distinguished by `part`),
/// `version` counts resubmissions of the same content item, and `year`
/// records when the identifier was first built, which is why a
/// resubmission can carry a year older than the current one. `product`
/// tags the request type and is not part of the display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestId {
    pub code: String,
    pub year: i32,
    pub number: i64,
    pub version: u32,
    pub part: u8,
    pub product: String,
}

impl RequestId {
    /// Returns the identifier a resubmission of the same content item
    /// must carry: everything unchanged except `version`, up by one.
    pub fn next_version(&self) -> Self {
        Self {
            version: self.version + 1,
            ..self.clone()
        }
    }

    /// Rebuilds an identifier from nullable database columns.
    ///
    /// The columns are written all-or-nothing, so a fully `NULL` set just
    /// means the row was never submitted and yields `None` quietly. A
    /// partially set or out-of-range set is corrupt; it is logged and
    /// treated as absent rather than failing the caller.
    pub fn from_columns(
        code: Option<&str>,
        year: Option<i64>,
        number: Option<i64>,
        version: Option<i64>,
        part: Option<i64>,
        product: Option<&str>,
    ) -> Option<Self> {
        match (code, year, number, version, part, product) {
            (Some(code), Some(year), Some(number), Some(version), Some(part), Some(product)) => {
                let year = i32::try_from(year).ok();
                let version = u32::try_from(version).ok().filter(|v| *v >= 1);
                let part = u8::try_from(part).ok().filter(|p| *p <= MAX_PART);
                match (year, version, part) {
                    (Some(year), Some(version), Some(part)) if number >= 1 => Some(Self {
                        code: code.to_string(),
                        year,
                        number,
                        version,
                        part,
                        product: product.to_string(),
                    }),
                    _ => {
                        log::warn!(
                            "Stored identifier for number {} has out-of-range fields, ignoring",
                            number
                        );
                        None
                    }
                }
            }
            (None, None, None, None, None, None) => None,
            _ => {
                log::warn!(
                    "Ignoring partially stored identifier (code={:?}, number={:?})",
                    code,
                    number
                );
                None
            }
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}/{}",
            self.code, self.year, self.number, self.version, self.part
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_id() -> RequestId {
        RequestId {
            code: "XYZ".to_string(),
            year: 2023,
            number: 500,
            version: 1,
            part: 0,
            product: "translation".to_string(),
        }
    }

    #[test]
    fn test_next_version_only_bumps_version() {
        let id = sample_id();
        let next = id.next_version();
        assert_eq!(next.version, 2);
        assert_eq!(next.code, id.code);
        assert_eq!(next.year, id.year);
        assert_eq!(next.number, id.number);
        assert_eq!(next.part, id.part);
        assert_eq!(next.product, id.product);
    }

    #[test]
    fn test_display_format() {
        let id = sample_id();
        assert_eq!(id.to_string(), "XYZ/2023/500/1/0");
    }

    #[test]
    fn test_from_columns_complete() {
        let id = RequestId::from_columns(
            Some("XYZ"),
            Some(2023),
            Some(500),
            Some(2),
            Some(7),
            Some("translation"),
        )
        .unwrap();
        assert_eq!(id.number, 500);
        assert_eq!(id.version, 2);
        assert_eq!(id.part, 7);
    }

    #[test]
    fn test_from_columns_all_null() {
        assert!(RequestId::from_columns(None, None, None, None, None, None).is_none());
    }

    #[test]
    fn test_from_columns_partial_is_ignored() {
        let id = RequestId::from_columns(Some("XYZ"), Some(2023), Some(500), None, None, None);
        assert!(id.is_none());
    }

    #[test]
    fn test_from_columns_out_of_range_part() {
        let id = RequestId::from_columns(
            Some("XYZ"),
            Some(2023),
            Some(500),
            Some(1),
            Some(150),
            Some("translation"),
        );
        assert!(id.is_none());
    }

    #[test]
    fn test_from_columns_zero_version() {
        let id = RequestId::from_columns(
            Some("XYZ"),
            Some(2023),
            Some(500),
            Some(0),
            Some(0),
            Some("translation"),
        );
        assert!(id.is_none());
    }
}
