// Static Routes (hand-enumerated application pages)

use crate::domain::ChangeFrequency;

/// Fixed page that is not derived from data-store records
///
/// Priority is kept as its literal decimal and parsed when entries are built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticRoute {
    pub path: &'static str,
    pub priority: &'static str,
    pub change_frequency: ChangeFrequency,
}

pub const STATIC_ROUTES: &[StaticRoute] = &[
    StaticRoute {
        path: "/",
        priority: "1.0",
        change_frequency: ChangeFrequency::Weekly,
    },
    StaticRoute {
        path: "/apply",
        priority: "0.8",
        change_frequency: ChangeFrequency::Weekly,
    },
    StaticRoute {
        path: "/privacy",
        priority: "0.3",
        change_frequency: ChangeFrequency::Monthly,
    },
    StaticRoute {
        path: "/terms",
        priority: "0.3",
        change_frequency: ChangeFrequency::Monthly,
    },
    StaticRoute {
        path: "/contact",
        priority: "0.3",
        change_frequency: ChangeFrequency::Monthly,
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use std::collections::HashSet;

    #[test]
    fn test_static_routes_are_valid() {
        let mut paths = HashSet::new();
        for route in STATIC_ROUTES {
            assert!(route.path.starts_with('/'));
            assert!(route.priority.parse::<Priority>().is_ok());
            assert!(paths.insert(route.path), "duplicate path {}", route.path);
        }
        assert_eq!(STATIC_ROUTES.len(), 5);
    }
}
