use lazy_static::lazy_static;
use std::collections::HashSet;

lazy_static! {
    /// Commands that run with SIGINT ignored.
    static ref PROTECTED_COMMANDS: HashSet<&'static str> =
        ["sleep", "critical"].iter().copied().collect();
}

/// Whether `command` should be shielded from Ctrl+C. Exact, case-sensitive
/// match against a fixed set.
pub fn is_protected(command: &str) -> bool {
    PROTECTED_COMMANDS.contains(command)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn protected_set_matches_exactly() {
        assert!(is_protected("sleep"));
        assert!(is_protected("critical"));

        assert!(!is_protected("Sleep"));
        assert!(!is_protected("sleep "));
        assert!(!is_protected("/bin/sleep"));
        assert!(!is_protected("sle"));
        assert!(!is_protected("cat"));
        assert!(!is_protected(""));
    }

    proptest! {
        #[test]
        fn only_the_fixed_names_are_protected(name in "\\PC{0,16}") {
            let expected = name == "sleep" || name == "critical";
            prop_assert_eq!(is_protected(&name), expected);
        }
    }
}
