//! Route descriptors: what kind of page a URL is and which slugs it carries.

use crate::blocks::BlockKind;
use crate::error::GovernanceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// First path segments that always denote static core pages.
pub const CORE_SECTIONS: &[&str] = &[
    "about",
    "blog",
    "case-studies",
    "contact",
    "enhanced-demo",
    "industries",
    "locations",
    "pricing",
    "privacy",
    "resources",
    "seo-audit",
    "solutions",
    "terms",
    "tools",
    "website-speed-test",
];

/// Page families the engine knows how to govern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteType {
    Core,
    Service,
    City,
    CityService,
    CityIndustry,
    CityIndustryService,
    /// Anything a caller labelled with a route type this build does not know.
    #[serde(other)]
    Unknown,
}

impl RouteType {
    pub const KNOWN: [RouteType; 6] = [
        RouteType::Core,
        RouteType::Service,
        RouteType::City,
        RouteType::CityService,
        RouteType::CityIndustry,
        RouteType::CityIndustryService,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Service => "service",
            Self::City => "city",
            Self::CityService => "city-service",
            Self::CityIndustry => "city-industry",
            Self::CityIndustryService => "city-industry-service",
            Self::Unknown => "unknown",
        }
    }

    /// Route types indexed without a quality gate.
    pub fn is_tier1(self) -> bool {
        matches!(self, Self::Core | Self::Service | Self::City)
    }

    /// Route types stamped out across the city × service × industry matrix.
    pub fn is_programmatic(self) -> bool {
        matches!(self, Self::CityService | Self::CityIndustryService)
    }

    /// Blocks that must be present and valid for Stage A.
    pub fn required_blocks(self) -> &'static [BlockKind] {
        match self {
            Self::CityService => &[BlockKind::LocalDataCard, BlockKind::ProofSlot],
            Self::CityIndustryService => &[
                BlockKind::LocalDataCard,
                BlockKind::IndustryKpiMap,
                BlockKind::ProofSlot,
            ],
            _ => &[],
        }
    }
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RouteType {
    type Err = GovernanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::KNOWN
            .into_iter()
            .find(|route_type| route_type.as_str() == s)
            .ok_or_else(|| GovernanceError::UnknownRouteType(s.to_string()))
    }
}

/// Identifies a candidate page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDescriptor {
    pub route_type: RouteType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl RouteDescriptor {
    fn bare(route_type: RouteType) -> Self {
        Self {
            route_type,
            city: None,
            service: None,
            industry: None,
            path: None,
        }
    }

    pub fn core(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::bare(RouteType::Core)
        }
    }

    pub fn service(service: impl Into<String>) -> Self {
        Self {
            service: Some(service.into()),
            ..Self::bare(RouteType::Service)
        }
    }

    pub fn city(city: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            ..Self::bare(RouteType::City)
        }
    }

    pub fn city_service(city: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            service: Some(service.into()),
            ..Self::bare(RouteType::CityService)
        }
    }

    pub fn city_industry(city: impl Into<String>, industry: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            industry: Some(industry.into()),
            ..Self::bare(RouteType::CityIndustry)
        }
    }

    pub fn city_industry_service(
        city: impl Into<String>,
        industry: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            city: Some(city.into()),
            industry: Some(industry.into()),
            service: Some(service.into()),
            ..Self::bare(RouteType::CityIndustryService)
        }
    }

    /// Classify a pathname.
    ///
    /// Leading and trailing slashes are ignored. Paths under a known core
    /// section (and anything that matches no programmatic shape) classify as
    /// `core` with the normalized path.
    pub fn from_path(pathname: &str) -> Self {
        let normalized = pathname.trim_matches('/');
        let parts: Vec<&str> = normalized.split('/').filter(|p| !p.is_empty()).collect();

        match parts.as_slice() {
            [] => Self::core(""),
            [first, ..] if CORE_SECTIONS.contains(first) => Self::core(normalized),
            ["services"] => Self::core("services"),
            ["services", service] => Self::service(*service),
            [city, "industry", industry, service] => {
                Self::city_industry_service(*city, *industry, *service)
            }
            [city, "industry", industry] => Self::city_industry(*city, *industry),
            [city, service] if *service != "industry" => Self::city_service(*city, *service),
            [city] => Self::city(*city),
            _ => Self::core(normalized),
        }
    }

    /// Check that every identifier the route type requires is present and
    /// that `core` carries none.
    pub fn validate_shape(&self) -> Result<(), GovernanceError> {
        let present = |slot: &Option<String>| slot.as_deref().is_some_and(|s| !s.trim().is_empty());
        let (needs_city, needs_service, needs_industry) = match self.route_type {
            RouteType::Core => {
                if self.city.is_some() || self.service.is_some() || self.industry.is_some() {
                    return Err(self.shape_error("core routes carry no slugs"));
                }
                return Ok(());
            }
            RouteType::Service => (false, true, false),
            RouteType::City => (true, false, false),
            RouteType::CityService => (true, true, false),
            RouteType::CityIndustry => (true, false, true),
            RouteType::CityIndustryService => (true, true, true),
            RouteType::Unknown => return Ok(()),
        };

        let mut missing = Vec::new();
        if needs_city && !present(&self.city) {
            missing.push("city");
        }
        if needs_service && !present(&self.service) {
            missing.push("service");
        }
        if needs_industry && !present(&self.industry) {
            missing.push("industry");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(self.shape_error(&format!("missing {}", missing.join(", "))))
        }
    }

    fn shape_error(&self, detail: &str) -> GovernanceError {
        GovernanceError::InvalidRouteShape {
            route_type: self.route_type,
            detail: detail.to_string(),
        }
    }

    pub fn city_slug(&self) -> &str {
        self.city.as_deref().unwrap_or("")
    }

    pub fn service_slug(&self) -> &str {
        self.service.as_deref().unwrap_or("")
    }

    pub fn industry_slug(&self) -> &str {
        self.industry.as_deref().unwrap_or("")
    }

    /// Site-relative path of this route, always starting with `/`.
    pub fn relative_path(&self) -> String {
        match self.route_type {
            RouteType::CityIndustryService => format!(
                "/{}/industry/{}/{}",
                self.city_slug(),
                self.industry_slug(),
                self.service_slug()
            ),
            RouteType::CityIndustry => {
                format!("/{}/industry/{}", self.city_slug(), self.industry_slug())
            }
            RouteType::CityService => format!("/{}/{}", self.city_slug(), self.service_slug()),
            RouteType::City => format!("/{}", self.city_slug()),
            RouteType::Service => format!("/services/{}", self.service_slug()),
            RouteType::Core | RouteType::Unknown => {
                let path = self.path.as_deref().unwrap_or("").trim_matches('/');
                if path.is_empty() {
                    "/".to_string()
                } else {
                    format!("/{path}")
                }
            }
        }
    }
}

/// Canonical URL for a route.
///
/// Keyed only on the route type and present identifiers. Missing slugs
/// render as empty segments; shape problems are the engine's concern.
pub fn canonical_url(base_url: &str, route: &RouteDescriptor) -> String {
    let base = base_url.trim_end_matches('/');
    let path = route.relative_path();
    if path == "/" {
        base.to_string()
    } else {
        format!("{base}{path}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.example.com";

    #[test]
    fn classify_paths() {
        assert_eq!(RouteDescriptor::from_path("/"), RouteDescriptor::core(""));
        assert_eq!(
            RouteDescriptor::from_path("/about/"),
            RouteDescriptor::core("about")
        );
        assert_eq!(
            RouteDescriptor::from_path("/blog/launch-notes"),
            RouteDescriptor::core("blog/launch-notes")
        );
        assert_eq!(
            RouteDescriptor::from_path("/services/seo"),
            RouteDescriptor::service("seo")
        );
        assert_eq!(
            RouteDescriptor::from_path("/austin-tx/industry/healthcare/seo"),
            RouteDescriptor::city_industry_service("austin-tx", "healthcare", "seo")
        );
        assert_eq!(
            RouteDescriptor::from_path("/austin-tx/industry/healthcare"),
            RouteDescriptor::city_industry("austin-tx", "healthcare")
        );
        assert_eq!(
            RouteDescriptor::from_path("austin-tx/seo"),
            RouteDescriptor::city_service("austin-tx", "seo")
        );
        assert_eq!(
            RouteDescriptor::from_path("/austin-tx"),
            RouteDescriptor::city("austin-tx")
        );
        assert_eq!(
            RouteDescriptor::from_path("/austin-tx/industry"),
            RouteDescriptor::core("austin-tx/industry")
        );
    }

    #[test]
    fn canonical_templates() {
        let cases = [
            (
                RouteDescriptor::city_industry_service("boston-ma", "healthcare", "seo"),
                "https://www.example.com/boston-ma/industry/healthcare/seo",
            ),
            (
                RouteDescriptor::city_industry("boston-ma", "healthcare"),
                "https://www.example.com/boston-ma/industry/healthcare",
            ),
            (
                RouteDescriptor::city_service("boston-ma", "seo"),
                "https://www.example.com/boston-ma/seo",
            ),
            (
                RouteDescriptor::city("boston-ma"),
                "https://www.example.com/boston-ma",
            ),
            (
                RouteDescriptor::service("seo"),
                "https://www.example.com/services/seo",
            ),
            (
                RouteDescriptor::core("/pricing/"),
                "https://www.example.com/pricing",
            ),
            (RouteDescriptor::core(""), "https://www.example.com"),
        ];
        for (route, expected) in cases {
            assert_eq!(canonical_url(BASE, &route), expected, "{route:?}");
        }
    }

    #[test]
    fn canonical_tolerates_trailing_slash_on_base() {
        let route = RouteDescriptor::city("austin-tx");
        assert_eq!(
            canonical_url("https://www.example.com/", &route),
            "https://www.example.com/austin-tx"
        );
    }

    #[test]
    fn shape_validation() {
        assert!(RouteDescriptor::core("about").validate_shape().is_ok());
        assert!(
            RouteDescriptor::city_industry_service("a", "b", "c")
                .validate_shape()
                .is_ok()
        );

        let mut partial = RouteDescriptor::city_industry_service("a", "b", "c");
        partial.industry = None;
        let err = partial.validate_shape().expect_err("missing industry");
        assert!(err.to_string().contains("missing industry"));

        let mut core = RouteDescriptor::core("");
        core.city = Some("austin-tx".into());
        assert!(core.validate_shape().is_err());
    }

    #[test]
    fn unknown_route_type_deserializes() {
        let route: RouteDescriptor =
            serde_json::from_value(serde_json::json!({"routeType": "landing-page"}))
                .expect("descriptor should parse");
        assert_eq!(route.route_type, RouteType::Unknown);
        assert!("landing-page".parse::<RouteType>().is_err());
        assert_eq!(
            "city-industry-service".parse::<RouteType>().ok(),
            Some(RouteType::CityIndustryService)
        );
    }
}
