// tests/extra_env_properties.rs

use proptest::prelude::*;

use clever_deploy::config::extra_env::{collect_prefixed, parse_env_block};
use clever_deploy::config::resolve::parse_leading_int;
use clever_deploy::types::ExtraEnv;

fn name_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_]{1,12}"
}

// Values may contain `=` and spaces, but no line breaks and no surrounding
// whitespace (lines are trimmed before parsing).
fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9=_-]([a-z0-9= _-]{0,20}[a-z0-9=_-])?"
}

proptest! {
    #[test]
    fn declared_pairs_parse_back(
        pairs in proptest::collection::vec((name_strategy(), value_strategy()), 0..10)
    ) {
        let block: Vec<String> = pairs.iter().map(|(k, v)| format!("  {k}={v}  ")).collect();
        let env = parse_env_block(block.iter().map(String::as_str));

        let mut expected = ExtraEnv::new();
        for (k, v) in &pairs {
            expected.insert(k.clone(), v.clone());
        }
        prop_assert_eq!(env, expected);
    }

    #[test]
    fn lines_without_declarations_are_ignored(
        lines in proptest::collection::vec("[#!. a-z-]{0,20}", 0..10)
    ) {
        let env = parse_env_block(lines.iter().map(String::as_str));
        prop_assert!(env.is_empty());
    }

    #[test]
    fn allow_list_is_the_upper_bound(
        names in proptest::collection::vec(name_strategy(), 0..10),
        allowed in proptest::collection::vec(name_strategy(), 1..5),
    ) {
        let vars = names
            .iter()
            .map(|n| (format!("INPUT_SETENV_{n}"), "v".to_string()));
        let env = collect_prefixed(vars, "INPUT_SETENV_", &allowed);

        for name in env.names() {
            prop_assert!(allowed.iter().any(|a| a == name));
            prop_assert!(names.iter().any(|n| n == name));
        }
    }

    #[test]
    fn leading_integer_ignores_suffix(n in 0i64..10_000_000, suffix in "[a-z ]{0,5}") {
        prop_assert_eq!(parse_leading_int(&format!("{n}{suffix}")), Some(n));
    }
}
