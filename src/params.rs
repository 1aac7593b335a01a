//! scrypt parameters and user-facing options.
//!
//! [`UserOptions`] accepts either the long-form (`cost`, `blockSize`,
//! `parallelization`) or the short-form (`N`, `r`, `p`) name of each field,
//! plus `maxmem`. [`UserOptions::normalize`] maps it onto the canonical
//! [`ScryptParams`] tuple, filling unset fields with defaults.
//!
//! # Examples
//!
//! ```
//! use scrypt_shim::{ScryptParams, UserOptions};
//!
//! let params = UserOptions::new().with_n(1024).with_r(8).with_p(16).normalize().unwrap();
//! assert_eq!(params.cost(), 1024);
//! assert_eq!(params.max_memory(), ScryptParams::DEFAULT.max_memory());
//!
//! let parsed: UserOptions = r#"{"cost": 1024, "blockSize": 8}"#.parse().unwrap();
//! assert_eq!(parsed.normalize().unwrap().block_size(), 8);
//! ```

use crate::error::{Param, Result, ScryptError};
use crate::scrypt_config::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// The canonical scrypt tuple `(N, r, p, maxmem)`.
///
/// Serializes with the short-form names used on the wire: `N`, `r`, `p`, `maxmem`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScryptParams {
    #[serde(rename = "N")]
    pub(crate) cost: u64,
    #[serde(rename = "r")]
    pub(crate) block_size: u64,
    #[serde(rename = "p")]
    pub(crate) parallelization: u64,
    #[serde(rename = "maxmem")]
    pub(crate) max_memory: u64,
}

impl ScryptParams {
    /// `N = 16384, r = 8, p = 1, maxmem = 32 MiB`
    pub const DEFAULT: Self = Self {
        cost: DEFAULT_COST,
        block_size: DEFAULT_BLOCK_SIZE,
        parallelization: DEFAULT_PARALLELIZATION,
        max_memory: DEFAULT_MAX_MEMORY,
    };

    /// Creates a parameter set without validating it.
    ///
    /// Use [`validate`](crate::validate) (or any derive entry point, which
    /// validates for you) to check it against RFC 7914.
    #[inline]
    #[must_use]
    pub const fn new(cost: u64, block_size: u64, parallelization: u64, max_memory: u64) -> Self {
        Self {
            cost,
            block_size,
            parallelization,
            max_memory,
        }
    }

    /// CPU/memory cost parameter (N).
    #[inline]
    #[must_use]
    pub const fn cost(&self) -> u64 {
        self.cost
    }

    /// Block size parameter (r).
    #[inline]
    #[must_use]
    pub const fn block_size(&self) -> u64 {
        self.block_size
    }

    /// Parallelization parameter (p).
    #[inline]
    #[must_use]
    pub const fn parallelization(&self) -> u64 {
        self.parallelization
    }

    /// Ceiling on the backend working set, in bytes.
    #[inline]
    #[must_use]
    pub const fn max_memory(&self) -> u64 {
        self.max_memory
    }

    /// Returns a copy with a different memory ceiling.
    #[inline]
    #[must_use]
    pub const fn with_max_memory(mut self, max_memory: u64) -> Self {
        self.max_memory = max_memory;
        self
    }

    /// Working-set size in bytes: `128 * r * (N + p + 2)`.
    ///
    /// This is the `V` array plus `p` input blocks plus the `XY` scratch
    /// space. `None` if the value does not fit in a `u128`.
    #[must_use]
    pub fn memory_required(&self) -> Option<u128> {
        let blocks = u128::from(self.cost)
            .checked_add(u128::from(self.parallelization))?
            .checked_add(2)?;
        u128::from(BLOCK_UNIT)
            .checked_mul(u128::from(self.block_size))?
            .checked_mul(blocks)
    }

    /// Fails with [`ScryptError::ResourceExhausted`] if the working set
    /// exceeds `max_memory`.
    pub(crate) fn check_memory(&self) -> Result<()> {
        let required = self.memory_required().unwrap_or(u128::MAX);
        if required > u128::from(self.max_memory) {
            return Err(ScryptError::ResourceExhausted {
                required,
                max_memory: self.max_memory,
            });
        }
        Ok(())
    }
}

impl Default for ScryptParams {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Partial scrypt configuration as supplied by a caller.
///
/// Every field is optional. `cost`/`n`, `block_size`/`r` and
/// `parallelization`/`p` are aliases for the same parameter; setting both
/// members of a pair is rejected by [`normalize`](UserOptions::normalize).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserOptions {
    pub cost: Option<u64>,
    pub n: Option<u64>,
    pub block_size: Option<u64>,
    pub r: Option<u64>,
    pub parallelization: Option<u64>,
    pub p: Option<u64>,
    pub maxmem: Option<u64>,
}

impl UserOptions {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_cost(mut self, cost: u64) -> Self {
        self.cost = Some(cost);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_n(mut self, n: u64) -> Self {
        self.n = Some(n);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_block_size(mut self, block_size: u64) -> Self {
        self.block_size = Some(block_size);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_r(mut self, r: u64) -> Self {
        self.r = Some(r);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_parallelization(mut self, parallelization: u64) -> Self {
        self.parallelization = Some(parallelization);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_p(mut self, p: u64) -> Self {
        self.p = Some(p);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_maxmem(mut self, maxmem: u64) -> Self {
        self.maxmem = Some(maxmem);
        self
    }

    /// Maps the options onto the canonical tuple, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ScryptError::ConflictingAlias`] if both the long and the
    /// short name of one field are set. No other check happens here; see
    /// [`validate`](crate::validate).
    pub fn normalize(&self) -> Result<ScryptParams> {
        let defaults = ScryptParams::DEFAULT;
        Ok(ScryptParams {
            cost: pick("cost", self.cost, "N", self.n, defaults.cost)?,
            block_size: pick("blockSize", self.block_size, "r", self.r, defaults.block_size)?,
            parallelization: pick(
                "parallelization",
                self.parallelization,
                "p",
                self.p,
                defaults.parallelization,
            )?,
            max_memory: self.maxmem.unwrap_or(defaults.max_memory),
        })
    }
}

/// Long and short name of each aliased field, in checking order.
const ALIASES: [(&str, &str); 3] = [
    ("cost", "N"),
    ("blockSize", "r"),
    ("parallelization", "p"),
];

fn pick(
    long: &'static str,
    long_value: Option<u64>,
    short: &'static str,
    short_value: Option<u64>,
    default: u64,
) -> Result<u64> {
    match (long_value, short_value) {
        (Some(_), Some(_)) => Err(ScryptError::ConflictingAlias { long, short }),
        (Some(v), None) | (None, Some(v)) => Ok(v),
        (None, None) => Ok(default),
    }
}

/// Normalizes optional user options; `None` yields [`ScryptParams::DEFAULT`].
pub fn normalize(options: Option<&UserOptions>) -> Result<ScryptParams> {
    match options {
        Some(options) => options.normalize(),
        None => Ok(ScryptParams::DEFAULT),
    }
}

impl TryFrom<&Value> for UserOptions {
    type Error = ScryptError;

    /// Reads options from a JSON object. Unknown keys are ignored.
    ///
    /// Keys count as set when present, whatever their value, so a long and a
    /// short alias that are both present fail with
    /// [`ScryptError::ConflictingAlias`] even if one of them is `null`.
    /// Otherwise a recognised key whose value is not a non-negative integer
    /// (`null` included) fails with [`ScryptError::InvalidParameter`] naming
    /// the field; zero is accepted here and rejected by validation.
    fn try_from(value: &Value) -> Result<Self> {
        for (long, short) in ALIASES {
            if value.get(long).is_some() && value.get(short).is_some() {
                return Err(ScryptError::ConflictingAlias { long, short });
            }
        }

        let read = |key: &str, param: Param| -> Result<Option<u64>> {
            match value.get(key) {
                None => Ok(None),
                Some(v) => v
                    .as_u64()
                    .map(Some)
                    .ok_or(ScryptError::InvalidParameter { param }),
            }
        };

        Ok(UserOptions {
            cost: read("cost", Param::Cost)?,
            n: read("N", Param::Cost)?,
            block_size: read("blockSize", Param::BlockSize)?,
            r: read("r", Param::BlockSize)?,
            parallelization: read("parallelization", Param::Parallelization)?,
            p: read("p", Param::Parallelization)?,
            maxmem: read("maxmem", Param::MaxMemory)?,
        })
    }
}

impl FromStr for UserOptions {
    type Err = ScryptError;

    /// Parses a JSON object such as `{"N": 1024, "r": 8, "p": 16}`.
    /// `null` is read as an empty configuration.
    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        match value {
            Value::Null => Ok(UserOptions::default()),
            Value::Object(_) => UserOptions::try_from(&value),
            other => Err(ScryptError::InvalidOptions(format!(
                "expected a JSON object, got {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_options_normalize_to_defaults() {
        let params = UserOptions::new().normalize().unwrap();
        assert_eq!(params, ScryptParams::new(16_384, 8, 1, 33_554_432));
    }

    #[test]
    fn none_options_return_default_params() {
        assert_eq!(normalize(None).unwrap(), ScryptParams::DEFAULT);
    }

    #[test]
    fn long_form_names_are_used() {
        let params = UserOptions::new()
            .with_cost(1024)
            .with_block_size(4)
            .with_parallelization(2)
            .normalize()
            .unwrap();
        assert_eq!(params, ScryptParams::new(1024, 4, 2, DEFAULT_MAX_MEMORY));
    }

    #[test]
    fn short_form_names_are_used() {
        let params = UserOptions::new()
            .with_n(2048)
            .with_r(1)
            .with_p(3)
            .with_maxmem(1 << 30)
            .normalize()
            .unwrap();
        assert_eq!(params, ScryptParams::new(2048, 1, 3, 1 << 30));
    }

    #[test]
    fn mixed_forms_fill_remaining_defaults() {
        let params = UserOptions::new().with_cost(64).with_r(2).normalize().unwrap();
        assert_eq!(params.cost(), 64);
        assert_eq!(params.block_size(), 2);
        assert_eq!(params.parallelization(), DEFAULT_PARALLELIZATION);
    }

    #[test]
    fn both_aliases_are_rejected() {
        let cases = [
            (UserOptions::new().with_cost(2).with_n(2), "cost", "N"),
            (UserOptions::new().with_block_size(1).with_r(1), "blockSize", "r"),
            (UserOptions::new().with_parallelization(1).with_p(1), "parallelization", "p"),
        ];
        for (options, expected_long, expected_short) in cases {
            match options.normalize() {
                Err(ScryptError::ConflictingAlias { long, short }) => {
                    assert_eq!(long, expected_long);
                    assert_eq!(short, expected_short);
                }
                other => panic!("Expected ConflictingAlias, got {other:?}"),
            }
        }
    }

    #[test]
    fn conflict_message_names_both_keys() {
        let err = UserOptions::new().with_cost(2).with_n(4).normalize().unwrap_err();
        assert_eq!(err.to_string(), "cannot specify both cost and N");
    }

    #[test]
    fn json_options_accept_both_spellings() {
        let options = UserOptions::try_from(&json!({
            "N": 1024,
            "blockSize": 8,
            "p": 16,
            "maxmem": 67108864,
            "somethingElse": true
        }))
        .unwrap();
        assert_eq!(
            options.normalize().unwrap(),
            ScryptParams::new(1024, 8, 16, 64 << 20)
        );
    }

    #[test]
    fn json_rejects_fractional_and_negative_values() {
        let err = UserOptions::try_from(&json!({ "r": 1.5 })).unwrap_err();
        assert!(matches!(
            err,
            ScryptError::InvalidParameter {
                param: Param::BlockSize
            }
        ));

        let err = UserOptions::try_from(&json!({ "parallelization": -1 })).unwrap_err();
        assert!(matches!(
            err,
            ScryptError::InvalidParameter {
                param: Param::Parallelization
            }
        ));
    }

    #[test]
    fn json_null_alias_still_conflicts() {
        let err = r#"{"cost": null, "N": 32}"#.parse::<UserOptions>().unwrap_err();
        assert!(matches!(
            err,
            ScryptError::ConflictingAlias {
                long: "cost",
                short: "N"
            }
        ));
    }

    #[test]
    fn json_null_field_is_invalid() {
        let err = r#"{"cost": null}"#.parse::<UserOptions>().unwrap_err();
        assert!(matches!(err, ScryptError::InvalidParameter { param: Param::Cost }));

        let err = UserOptions::try_from(&json!({ "N": 16, "maxmem": null })).unwrap_err();
        assert!(matches!(
            err,
            ScryptError::InvalidParameter {
                param: Param::MaxMemory
            }
        ));
    }

    #[test]
    fn json_must_be_an_object() {
        assert!(matches!(
            "[1, 2]".parse::<UserOptions>(),
            Err(ScryptError::InvalidOptions(_))
        ));
        assert!(matches!(
            "{not json".parse::<UserOptions>(),
            Err(ScryptError::SerializationError(_))
        ));
        assert_eq!("null".parse::<UserOptions>().unwrap(), UserOptions::default());
    }

    #[test]
    fn params_serialize_with_short_names() {
        let json = serde_json::to_value(ScryptParams::DEFAULT).unwrap();
        assert_eq!(
            json,
            json!({ "N": 16384, "r": 8, "p": 1, "maxmem": 33554432 })
        );
    }

    #[test]
    fn memory_required_matches_formula() {
        let params = ScryptParams::new(1024, 8, 16, DEFAULT_MAX_MEMORY);
        assert_eq!(params.memory_required(), Some(128 * 8 * (1024 + 16 + 2)));
        assert!(params.check_memory().is_ok());

        let tight = params.with_max_memory(1024);
        assert!(matches!(
            tight.check_memory(),
            Err(ScryptError::ResourceExhausted { .. })
        ));
    }
}
