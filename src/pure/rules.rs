//! Placement rules applied when a client is first managed
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A placement rule matched against a new client's class, instance and title.
///
/// Each pattern is a substring match with `None` acting as a wildcard. Rules
/// are applied in table order and every matching rule overwrites the outcome,
/// so the last match wins per field. Transient windows never go through the
/// rule table: they inherit placement from their parent.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Substring to match against the WM_CLASS class field
    pub class: Option<String>,
    /// Substring to match against the WM_CLASS instance field
    pub instance: Option<String>,
    /// Substring to match against the window title
    pub title: Option<String>,
    /// Whether matching clients start floating
    pub floating: bool,
    /// Workspace index to place matching clients on
    pub workspace: Option<usize>,
    /// Monitor ordinal to place matching clients on
    pub monitor: Option<usize>,
}

impl Rule {
    fn matches(&self, class: &str, instance: &str, title: &str) -> bool {
        let sub = |pat: &Option<String>, s: &str| pat.as_deref().map(|p| s.contains(p)).unwrap_or(true);

        sub(&self.class, class) && sub(&self.instance, instance) && sub(&self.title, title)
    }
}

/// The placement decided for a new client by the rule table.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placement {
    pub(crate) floating: bool,
    pub(crate) workspace: Option<usize>,
    pub(crate) monitor: Option<usize>,
}

/// Run a client's properties through the rule table.
///
/// Workspace overrides are dropped when out of range and monitor overrides
/// when the ordinal does not currently exist; the rest of the matching rule
/// still applies. Rules are only ever evaluated here, at client creation:
/// later topology changes do not re-classify existing clients.
pub(crate) fn classify(
    rules: &[Rule],
    class: &str,
    instance: &str,
    title: &str,
    n_workspaces: usize,
    n_monitors: usize,
) -> Placement {
    let mut p = Placement::default();

    for r in rules {
        if !r.matches(class, instance, title) {
            continue;
        }

        p.floating = r.floating;
        if let Some(ws) = r.workspace {
            if ws < n_workspaces {
                p.workspace = Some(ws);
            }
        }
        if let Some(m) = r.monitor {
            if m < n_monitors {
                p.monitor = Some(m);
            }
        }
    }

    p
}

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn rule(class: Option<&str>, floating: bool, ws: Option<usize>, mon: Option<usize>) -> Rule {
        Rule {
            class: class.map(String::from),
            floating,
            workspace: ws,
            monitor: mon,
            ..Default::default()
        }
    }

    #[test_case(Some("Gimp"), "Gimp-2.10", true; "substring")]
    #[test_case(Some("Gimp"), "firefox", false; "no match")]
    #[test_case(None, "anything", true; "wildcard")]
    #[test]
    fn matching(pat: Option<&str>, class: &str, expected: bool) {
        let r = rule(pat, false, None, None);

        assert_eq!(r.matches(class, "", ""), expected);
    }

    #[test]
    fn all_set_patterns_must_match() {
        let r = Rule {
            class: Some("term".into()),
            title: Some("scratch".into()),
            ..Default::default()
        };

        assert!(r.matches("xterm", "", "scratchpad"));
        assert!(!r.matches("xterm", "", "editor"));
    }

    #[test]
    fn last_match_wins_per_field() {
        let rules = [
            rule(Some("term"), true, Some(1), Some(1)),
            rule(Some("term"), false, Some(2), None),
        ];

        let p = classify(&rules, "xterm", "", "", 4, 2);

        // floating overwritten by the later match, ws too, monitor kept
        assert_eq!(
            p,
            Placement {
                floating: false,
                workspace: Some(2),
                monitor: Some(1)
            }
        );
    }

    #[test]
    fn non_matching_rules_leave_outcome_alone() {
        let rules = [
            rule(Some("term"), true, Some(1), None),
            rule(Some("browser"), false, Some(3), None),
        ];

        let p = classify(&rules, "xterm", "", "", 4, 1);

        assert!(p.floating);
        assert_eq!(p.workspace, Some(1));
    }

    #[test_case(Some(9), None; "workspace out of range")]
    #[test_case(Some(2), Some(2); "workspace in range")]
    #[test]
    fn workspace_bounds(ws: Option<usize>, expected: Option<usize>) {
        let rules = [rule(None, false, ws, None)];

        assert_eq!(classify(&rules, "x", "", "", 4, 1).workspace, expected);
    }

    #[test]
    fn missing_monitor_ordinal_is_dropped() {
        let rules = [rule(None, true, None, Some(3))];

        let p = classify(&rules, "x", "", "", 4, 2);

        // the rest of the rule still applied
        assert!(p.floating);
        assert_eq!(p.monitor, None);
    }
}
