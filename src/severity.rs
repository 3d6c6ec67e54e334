use std::fmt;

/// Check outcome level, mapped one-to-one onto the four-level check-plugin
/// exit contract (0/1/2/3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Severity {
    /// Exit code consumed by the monitoring scheduler.
    pub fn exit_code(self) -> i32 {
        match self {
            Severity::Ok => 0,
            Severity::Warning => 1,
            Severity::Critical => 2,
            Severity::Unknown => 3,
        }
    }

    // Worst-wins rank. CRITICAL and WARNING outrank UNKNOWN: a confirmed-bad
    // result is more actionable than a missing one. UNKNOWN still outranks OK
    // so it can never be folded away silently.
    fn rank(self) -> u8 {
        match self {
            Severity::Ok => 0,
            Severity::Unknown => 1,
            Severity::Warning => 2,
            Severity::Critical => 3,
        }
    }

    /// The worse of two severities under the worst-wins rank.
    pub fn worst(self, other: Severity) -> Severity {
        if other.rank() > self.rank() {
            other
        } else {
            self
        }
    }

    /// Fold a set of child severities into one verdict. An empty set folds
    /// to OK: a node with nothing under it has nothing wrong under it.
    pub fn fold<I>(severities: I) -> Severity
    where
        I: IntoIterator<Item = Severity>,
    {
        severities.into_iter().fold(Severity::Ok, Severity::worst)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Ok => "OK",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
            Severity::Unknown => "UNKNOWN",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(Severity::Ok.exit_code(), 0);
        assert_eq!(Severity::Warning.exit_code(), 1);
        assert_eq!(Severity::Critical.exit_code(), 2);
        assert_eq!(Severity::Unknown.exit_code(), 3);
    }

    #[test]
    fn test_worst_numeric_ladder() {
        assert_eq!(Severity::Ok.worst(Severity::Warning), Severity::Warning);
        assert_eq!(Severity::Warning.worst(Severity::Critical), Severity::Critical);
        assert_eq!(Severity::Ok.worst(Severity::Ok), Severity::Ok);
    }

    #[test]
    fn test_known_bad_outranks_unknown() {
        // A confirmed WARNING or CRITICAL wins over UNKNOWN in either order
        assert_eq!(Severity::Unknown.worst(Severity::Warning), Severity::Warning);
        assert_eq!(Severity::Warning.worst(Severity::Unknown), Severity::Warning);
        assert_eq!(Severity::Unknown.worst(Severity::Critical), Severity::Critical);
        assert_eq!(Severity::Critical.worst(Severity::Unknown), Severity::Critical);

        // But UNKNOWN never degrades to OK
        assert_eq!(Severity::Ok.worst(Severity::Unknown), Severity::Unknown);
        assert_eq!(Severity::Unknown.worst(Severity::Ok), Severity::Unknown);
    }

    #[test]
    fn test_fold_matches_pairwise_worst() {
        let all = [
            Severity::Ok,
            Severity::Warning,
            Severity::Critical,
            Severity::Unknown,
        ];
        for a in all {
            for b in all {
                assert_eq!(Severity::fold([a, b]), a.worst(b));
            }
        }
    }

    #[test]
    fn test_fold_empty_is_ok() {
        // Vacuous aggregation is an explicit policy, not an accident
        assert_eq!(Severity::fold([]), Severity::Ok);
    }

    #[test]
    fn test_fold_mixed() {
        let severities = [
            Severity::Ok,
            Severity::Unknown,
            Severity::Warning,
            Severity::Ok,
        ];
        assert_eq!(Severity::fold(severities), Severity::Warning);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Severity::Ok.to_string(), "OK");
        assert_eq!(Severity::Warning.to_string(), "WARNING");
        assert_eq!(Severity::Critical.to_string(), "CRITICAL");
        assert_eq!(Severity::Unknown.to_string(), "UNKNOWN");
    }
}
