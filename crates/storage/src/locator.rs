//! Resource descriptors: where each outlook product lives upstream and in the local cache.
//!
//! Every `(product family, forecast day)` pair maps to one static
//! [`ResourceDescriptor`] holding a URL template, a local path template and
//! the rules for which request fields the product actually uses. Templates
//! use `{name}` placeholders filled from [`Placeholders`].

use std::collections::BTreeMap;
use std::path::PathBuf;

use outlook_common::{
    ForecastDay, IssuanceTime, OutlookError, OutlookResult, ProductFamily, RequestKey,
};

/// Local cache files live under `<root>/geoJSON/SPC/`.
pub const LOCAL_PREFIX: &str = "geoJSON/SPC";

/// How a product uses the request's issuance time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssuanceRule {
    Required,
    /// The product has a single daily issuance and no time in its name.
    Omitted,
    /// The product is always named with this `HHMM` time.
    Fixed(u16),
}

/// How a product uses the request's hazard code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardRule {
    Required,
    Omitted,
}

/// Static description of one product's upstream and local layout.
#[derive(Debug, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub family: ProductFamily,
    pub first_day: u8,
    pub last_day: u8,
    /// Relative to the configured base URL.
    pub url_template: &'static str,
    /// Relative to `<root>/geoJSON/SPC/`.
    pub local_path_template: &'static str,
    pub issuance: IssuanceRule,
    pub hazard: HazardRule,
}

static OUTLOOK_DESCRIPTORS: [ResourceDescriptor; 4] = [
    ResourceDescriptor {
        family: ProductFamily::Convective,
        first_day: 1,
        last_day: 3,
        url_template: "products/outlook/archive/{year}/day{fday}otlk_{year}{month}{day}_{time}_{hazard}.lyr.geojson",
        local_path_template: "convective_outlook/{year}/day{fday}otlk_{year}{month}{day}_{time}_{hazard}.geojson",
        issuance: IssuanceRule::Required,
        hazard: HazardRule::Required,
    },
    ResourceDescriptor {
        family: ProductFamily::Convective,
        first_day: 4,
        last_day: 8,
        url_template: "products/exper/day4-8/archive/{year}/day{fday}prob_{year}{month}{day}.lyr.geojson",
        local_path_template: "convective_outlook/{year}/day{fday}otlk_{year}{month}{day}.geojson",
        issuance: IssuanceRule::Omitted,
        hazard: HazardRule::Omitted,
    },
    ResourceDescriptor {
        family: ProductFamily::Fire,
        first_day: 1,
        last_day: 2,
        url_template: "products/fire_wx/{year}/day{fday}fw_{year}{month}{day}_{time}_{hazard}.lyr.geojson",
        local_path_template: "fire_outlook/{year}/day{fday}fw_{year}{month}{day}_{time}_{hazard}.geojson",
        issuance: IssuanceRule::Required,
        hazard: HazardRule::Required,
    },
    ResourceDescriptor {
        family: ProductFamily::Fire,
        first_day: 3,
        last_day: 8,
        url_template: "products/exper/fire_wx/{year}/day{fday}fw_{year}{month}{day}_{time}_{hazard}.lyr.geojson",
        local_path_template: "fire_outlook/{year}/day{fday}fw_{year}{month}{day}_{time}_{hazard}.geojson",
        issuance: IssuanceRule::Fixed(1200),
        hazard: HazardRule::Required,
    },
];

/// Mesoscale discussions are keyed by year and number, not by forecast day.
pub static DISCUSSION_DESCRIPTOR: ResourceDescriptor = ResourceDescriptor {
    family: ProductFamily::MesoscaleDiscussion,
    first_day: 0,
    last_day: 0,
    url_template: "products/md/{year}/md{number}.txt",
    local_path_template: "md/{year}/md{number}.geojson",
    issuance: IssuanceRule::Omitted,
    hazard: HazardRule::Omitted,
};

/// Look up the descriptor for an outlook product.
pub fn descriptor_for(
    family: ProductFamily,
    day: ForecastDay,
) -> OutlookResult<&'static ResourceDescriptor> {
    if family == ProductFamily::MesoscaleDiscussion {
        return Err(OutlookError::invalid(
            "family",
            "mesoscale discussions are addressed by year and number",
        ));
    }

    OUTLOOK_DESCRIPTORS
        .iter()
        .find(|d| d.family == family && (d.first_day..=d.last_day).contains(&day.get()))
        .ok_or_else(|| {
            OutlookError::invalid(
                "forecast_day",
                format!("no {} product is published for day {}", family, day),
            )
        })
}

impl ResourceDescriptor {
    /// Canonical form of `key` for this product.
    ///
    /// Fields the product ignores are cleared and fixed times are filled in,
    /// so two requests for the same file always compare equal.
    pub fn normalize(&self, mut key: RequestKey) -> OutlookResult<RequestKey> {
        key.issuance_time = match self.issuance {
            IssuanceRule::Required => Some(key.issuance_time.ok_or_else(|| {
                OutlookError::invalid(
                    "issuance_time",
                    format!("required for day {} {} outlooks", key.forecast_day, self.family),
                )
            })?),
            IssuanceRule::Omitted => None,
            IssuanceRule::Fixed(hhmm) => Some(IssuanceTime::new(hhmm)?),
        };

        key.hazard = match self.hazard {
            HazardRule::Required => Some(key.hazard.ok_or_else(|| {
                OutlookError::invalid(
                    "hazard",
                    format!("required for day {} {} outlooks", key.forecast_day, self.family),
                )
            })?),
            HazardRule::Omitted => None,
        };

        Ok(key)
    }

    pub fn url(&self, base_url: &str, placeholders: &Placeholders) -> OutlookResult<String> {
        Ok(format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            render_template(self.url_template, placeholders)?
        ))
    }

    /// Path relative to a cache root.
    pub fn relative_path(&self, placeholders: &Placeholders) -> OutlookResult<PathBuf> {
        Ok(PathBuf::from(LOCAL_PREFIX).join(render_template(
            self.local_path_template,
            placeholders,
        )?))
    }
}

/// Named values substituted into descriptor templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placeholders(BTreeMap<&'static str, String>);

impl Placeholders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &'static str, value: impl ToString) -> Self {
        self.0.insert(name, value.to_string());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Values for an outlook request. Absent time or hazard leave their
    /// placeholders unset.
    pub fn for_request(key: &RequestKey) -> Self {
        let mut placeholders = Self::new()
            .with("fday", key.forecast_day)
            .with("year", format!("{:04}", key.year()))
            .with("month", format!("{:02}", key.month()))
            .with("day", format!("{:02}", key.day()));

        if let Some(time) = key.issuance_time {
            placeholders = placeholders.with("time", time);
        }
        if let Some(hazard) = key.hazard {
            placeholders = placeholders.with("hazard", hazard);
        }
        placeholders
    }

    pub fn for_discussion(year: i32, number: u16) -> Self {
        Self::new()
            .with("year", format!("{:04}", year))
            .with("number", format!("{:04}", number))
    }
}

/// Substitute every `{name}` in `template`.
///
/// A placeholder without a value is an error rather than an empty string.
pub fn render_template(template: &str, placeholders: &Placeholders) -> OutlookResult<String> {
    let mut rendered = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let close = after.find('}').ok_or_else(|| {
            OutlookError::Config(format!("Unterminated placeholder in template '{}'", template))
        })?;
        let name = &after[..close];
        let value = placeholders
            .get(name)
            .ok_or_else(|| OutlookError::MissingPlaceholder(name.to_string()))?;
        rendered.push_str(value);
        rest = &after[close + 1..];
    }
    rendered.push_str(rest);

    Ok(rendered)
}
