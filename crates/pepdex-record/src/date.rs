//! Header dates (`DD-Mon-YYYY`, e.g. `27-Feb-2015`).

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The on-disk date layout used by `Created` and `Post-History`.
pub const HEADER_DATE_FORMAT: &str = "%d-%b-%Y";

/// A calendar date as written in a proposal header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HeaderDate(NaiveDate);

impl HeaderDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for HeaderDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl FromStr for HeaderDate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        NaiveDate::parse_from_str(s, HEADER_DATE_FORMAT)
            .map(Self)
            .map_err(|e| format!("`{s}` is not a DD-Mon-YYYY date ({e})"))
    }
}

impl fmt::Display for HeaderDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(HEADER_DATE_FORMAT))
    }
}

impl TryFrom<String> for HeaderDate {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HeaderDate> for String {
    fn from(value: HeaderDate) -> Self {
        value.to_string()
    }
}

/// One `Post-History` entry: the date, and the discussion link when the entry
/// is written as a reST hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PostEntry {
    pub date: HeaderDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

impl PostEntry {
    pub fn linked(date: HeaderDate, link: impl Into<String>) -> Self {
        Self {
            date,
            link: Some(link.into()),
        }
    }
}

impl From<HeaderDate> for PostEntry {
    fn from(date: HeaderDate) -> Self {
        Self { date, link: None }
    }
}

/// Entries are either bare dates or anonymous reST links whose text is the
/// date: `` `14-Mar-2022 <https://discuss.python.org/t/1234>`__ ``.
impl FromStr for PostEntry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry = s.trim();
        let Some(rest) = entry.strip_prefix('`') else {
            return Ok(entry.parse::<HeaderDate>()?.into());
        };

        let close = rest
            .rfind('`')
            .ok_or_else(|| format!("unterminated link in `{entry}`"))?;
        let (inner, suffix) = (&rest[..close], &rest[close + 1..]);
        if !matches!(suffix, "_" | "__") {
            return Err(format!("`{entry}` is not a reST link"));
        }

        match inner.find('<') {
            Some(open) => {
                let link = inner[open + 1..]
                    .strip_suffix('>')
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .ok_or_else(|| format!("missing link target in `{entry}`"))?;
                Ok(Self::linked(inner[..open].parse()?, link))
            }
            None => Ok(inner.parse::<HeaderDate>()?.into()),
        }
    }
}

impl fmt::Display for PostEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.link {
            Some(link) => write!(f, "`{} <{link}>`__", self.date),
            None => write!(f, "{}", self.date),
        }
    }
}
