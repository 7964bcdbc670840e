//! Request keys identifying one published outlook resource.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{OutlookError, OutlookResult};

/// Outlook lead time, 1 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ForecastDay(u8);

impl ForecastDay {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 8;

    pub fn new(day: u8) -> OutlookResult<Self> {
        if (Self::MIN..=Self::MAX).contains(&day) {
            Ok(Self(day))
        } else {
            Err(OutlookError::invalid(
                "forecast_day",
                format!("{} is outside {}..={}", day, Self::MIN, Self::MAX),
            ))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for ForecastDay {
    type Error = OutlookError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ForecastDay> for u8 {
    fn from(day: ForecastDay) -> Self {
        day.0
    }
}

impl fmt::Display for ForecastDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// UTC issuance time of an outlook, written `HHMM` (1630 is 16:30 UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct IssuanceTime(u16);

impl IssuanceTime {
    pub fn new(hhmm: u16) -> OutlookResult<Self> {
        let hour = hhmm / 100;
        let minute = hhmm % 100;
        if hour > 23 || minute > 59 {
            return Err(OutlookError::invalid(
                "issuance_time",
                format!("{:04} is not a valid HHMM time", hhmm),
            ));
        }
        Ok(Self(hhmm))
    }

    pub fn hhmm(self) -> u16 {
        self.0
    }
}

impl TryFrom<u16> for IssuanceTime {
    type Error = OutlookError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<IssuanceTime> for u16 {
    fn from(time: IssuanceTime) -> Self {
        time.0
    }
}

impl fmt::Display for IssuanceTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// Hazard codes used in SPC outlook file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Hazard {
    // Convective
    Categorical,
    Tornado,
    Hail,
    Wind,
    SigTornado,
    SigHail,
    SigWind,
    Probabilistic,
    SigProbabilistic,
    // Fire weather
    Elevated,
    Critical,
    Extreme,
    IsolatedDryThunder,
    ScatteredDryThunder,
    DryThunder,
    DryThunderCategorical,
    WindRh,
}

impl Hazard {
    pub const ALL: [Hazard; 17] = [
        Hazard::Categorical,
        Hazard::Tornado,
        Hazard::Hail,
        Hazard::Wind,
        Hazard::SigTornado,
        Hazard::SigHail,
        Hazard::SigWind,
        Hazard::Probabilistic,
        Hazard::SigProbabilistic,
        Hazard::Elevated,
        Hazard::Critical,
        Hazard::Extreme,
        Hazard::IsolatedDryThunder,
        Hazard::ScatteredDryThunder,
        Hazard::DryThunder,
        Hazard::DryThunderCategorical,
        Hazard::WindRh,
    ];

    /// The code as it appears in file names.
    pub fn as_str(self) -> &'static str {
        match self {
            Hazard::Categorical => "cat",
            Hazard::Tornado => "torn",
            Hazard::Hail => "hail",
            Hazard::Wind => "wind",
            Hazard::SigTornado => "sigtorn",
            Hazard::SigHail => "sighail",
            Hazard::SigWind => "sigwind",
            Hazard::Probabilistic => "prob",
            Hazard::SigProbabilistic => "sigprob",
            Hazard::Elevated => "elev",
            Hazard::Critical => "crit",
            Hazard::Extreme => "extm",
            Hazard::IsolatedDryThunder => "idrt",
            Hazard::ScatteredDryThunder => "sdrt",
            Hazard::DryThunder => "dryt",
            Hazard::DryThunderCategorical => "drytcat",
            Hazard::WindRh => "windrh",
        }
    }

    /// Significant-severe layers are drawn hatched instead of filled.
    pub fn is_significant(self) -> bool {
        self.as_str().starts_with("sig")
    }

    pub fn is_dry_thunder(self) -> bool {
        matches!(self, Hazard::DryThunder | Hazard::DryThunderCategorical)
    }

    /// Probabilistic layers whose file also carries the `SIGN` polygon,
    /// which is drawn separately by the matching `sig*` layer.
    pub fn embeds_significant(self) -> bool {
        matches!(self, Hazard::Hail | Hazard::Wind | Hazard::Tornado)
    }
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Hazard {
    type Err = OutlookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Hazard::ALL
            .into_iter()
            .find(|h| h.as_str() == s)
            .ok_or_else(|| OutlookError::invalid("hazard", format!("unknown hazard code '{}'", s)))
    }
}

impl TryFrom<String> for Hazard {
    type Error = OutlookError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Hazard> for String {
    fn from(hazard: Hazard) -> Self {
        hazard.as_str().to_string()
    }
}

/// Product family an outlook resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductFamily {
    Convective,
    Fire,
    MesoscaleDiscussion,
}

impl ProductFamily {
    /// Directory name used in the local cache layout.
    pub fn product_dir(self) -> &'static str {
        match self {
            ProductFamily::Convective => "convective_outlook",
            ProductFamily::Fire => "fire_outlook",
            ProductFamily::MesoscaleDiscussion => "md",
        }
    }
}

impl fmt::Display for ProductFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.product_dir())
    }
}

/// Identifies one published outlook: forecast day, issuance time, date and hazard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestKey {
    pub forecast_day: ForecastDay,
    pub issuance_time: Option<IssuanceTime>,
    pub date: NaiveDate,
    pub hazard: Option<Hazard>,
}

impl RequestKey {
    /// Build a key from the raw integers and codes a plotting script passes in.
    pub fn new(
        forecast_day: u8,
        issuance_time: Option<u16>,
        year: i32,
        month: u32,
        day: u32,
        hazard: Option<&str>,
    ) -> OutlookResult<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            OutlookError::invalid(
                "date",
                format!("{:04}-{:02}-{:02} is not a calendar date", year, month, day),
            )
        })?;

        Ok(Self {
            forecast_day: ForecastDay::new(forecast_day)?,
            issuance_time: issuance_time.map(IssuanceTime::new).transpose()?,
            date,
            hazard: hazard.map(str::parse).transpose()?,
        })
    }

    pub fn year(&self) -> i32 {
        self.date.year()
    }

    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn day(&self) -> u32 {
        self.date.day()
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "day{}:{}:{}:{}",
            self.forecast_day,
            self.date.format("%Y%m%d"),
            self.issuance_time
                .map(|t| t.to_string())
                .unwrap_or_else(|| "-".to_string()),
            self.hazard.map(Hazard::as_str).unwrap_or("-"),
        )
    }
}

/// Cache key covering every resource the overlay service can load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    Outlook {
        family: ProductFamily,
        request: RequestKey,
    },
    Discussion {
        year: i32,
        number: u16,
    },
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKey::Outlook { family, request } => write!(f, "{}:{}", family, request),
            ResourceKey::Discussion { year, number } => write!(f, "md:{:04}:{:04}", year, number),
        }
    }
}
