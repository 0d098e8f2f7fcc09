//! Identity shared by named resources

/// A resource addressable both by opaque ID and by human-readable name
///
/// Implemented by organizations, projects, workspaces and registry modules.
pub trait TfeResource {
    /// Opaque API identifier (`ws-...`, `prj-...`)
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    /// True when `input` equals the ID or the name exactly
    fn matches(&self, input: &str) -> bool {
        self.id() == input || self.name() == input
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named {
        id: &'static str,
        name: &'static str,
    }

    impl TfeResource for Named {
        fn id(&self) -> &str {
            self.id
        }

        fn name(&self) -> &str {
            self.name
        }
    }

    #[test]
    fn test_matches_by_id_or_name() {
        let resource = Named {
            id: "ws-123",
            name: "prod-web",
        };
        assert!(resource.matches("ws-123"));
        assert!(resource.matches("prod-web"));
        assert!(!resource.matches("PROD-WEB"));
        assert!(!resource.matches("ws-12"));
    }
}
