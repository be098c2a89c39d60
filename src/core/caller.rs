//! Call-site resolution for log records

use super::record::CallerLocation;
use std::panic::Location;

/// Turns call sites into paths relative to a project directory.
///
/// The public logging methods are `#[track_caller]`, so the location they
/// observe is the first frame outside the logging API; no frame counting is
/// needed. Relativization is textual: the path is split on the first
/// `/<project>/` and the remainder is kept. When the anchor does not occur
/// the full path is used.
#[derive(Debug, Clone, Default)]
pub struct CallerResolver {
    anchor: Option<String>,
}

impl CallerResolver {
    pub fn new(project_name: impl AsRef<str>) -> Self {
        let project_name = project_name.as_ref();
        let anchor = if project_name.is_empty() {
            None
        } else {
            Some(format!("/{}/", project_name))
        };
        Self { anchor }
    }

    pub fn relative_path<'p>(&self, path: &'p str) -> &'p str {
        match &self.anchor {
            Some(anchor) => path.split_once(anchor.as_str()).map_or(path, |(_, rest)| rest),
            None => path,
        }
    }

    pub fn resolve(&self, location: &Location<'_>) -> CallerLocation {
        CallerLocation::new(self.relative_path(location.file()), location.line())
    }

    /// Location of whoever called the `#[track_caller]` chain leading here.
    #[track_caller]
    pub fn capture(&self) -> CallerLocation {
        self.resolve(Location::caller())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_to_project() {
        let resolver = CallerResolver::new("shop-api");
        assert_eq!(
            resolver.relative_path("/home/ci/src/shop-api/handlers/orders/checkout.rs"),
            "handlers/orders/checkout.rs"
        );
    }

    #[test]
    fn test_only_first_anchor_splits() {
        let resolver = CallerResolver::new("app");
        assert_eq!(resolver.relative_path("/srv/app/vendor/app/lib.rs"), "vendor/app/lib.rs");
    }

    #[test]
    fn test_missing_anchor_keeps_full_path() {
        let resolver = CallerResolver::new("app");
        assert_eq!(resolver.relative_path("/srv/other/lib.rs"), "/srv/other/lib.rs");
        // the anchor needs both slashes
        assert_eq!(resolver.relative_path("/srv/application/lib.rs"), "/srv/application/lib.rs");
    }

    #[test]
    fn test_empty_project_name() {
        let resolver = CallerResolver::new("");
        assert_eq!(resolver.relative_path("/a/b/c.rs"), "/a/b/c.rs");
    }

    #[test]
    fn test_capture_reports_this_line() {
        let resolver = CallerResolver::default();
        let expected_line = line!() + 1;
        let caller = resolver.capture();

        assert_eq!(caller.line, expected_line);
        assert!(caller.file.ends_with("caller.rs"), "got {}", caller.file);
    }

    #[test]
    fn test_deterministic() {
        let resolver = CallerResolver::new("svc");
        let path = "/build/svc/src/main.rs";
        assert_eq!(resolver.relative_path(path), resolver.relative_path(path));
    }
}
