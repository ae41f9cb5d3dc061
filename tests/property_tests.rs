//! Property-Based Tests for devhost
//!
//! Uses proptest for testing invariants and edge cases
//!
//! These tests verify:
//! - Enum string round-trips (to_string → parse)
//! - Distribution detection never yields a value outside the supported set
//! - ufw status parsing only matches the requested port

use proptest::prelude::*;
use strum::IntoEnumIterator;

use devhost::firewall::ufw_rule_present;
use devhost::{DatabaseEngine, Distro, HostFs, detect_distro, parse_os_release};

// =============================================================================
// Distro Property Tests
// =============================================================================

fn distro_strategy() -> impl Strategy<Value = Distro> {
    proptest::sample::select(Distro::iter().collect::<Vec<_>>())
}

proptest! {
    /// Distro: Display output is accepted by from_id and by FromStr
    #[test]
    fn distro_roundtrip(distro in distro_strategy()) {
        let s = distro.to_string();
        prop_assert_eq!(Distro::from_id(&s), Some(distro));
        let parsed: Distro = s.parse().expect("Should parse");
        prop_assert_eq!(parsed, distro);
    }

    /// Distro: serde and strum agree on the token
    #[test]
    fn distro_serde_matches_display(distro in distro_strategy()) {
        let json = serde_json::to_string(&distro).unwrap();
        prop_assert_eq!(json, format!("\"{}\"", distro));
    }

    /// Distro: from_id ignores quoting, case and surrounding whitespace
    #[test]
    fn distro_from_id_normalizes(distro in distro_strategy(), pad in " {0,3}") {
        let noisy = format!("{pad}\"{}\"{pad}", distro.to_string().to_uppercase());
        prop_assert_eq!(Distro::from_id(&noisy), Some(distro));
    }
}

// =============================================================================
// os-release Property Tests
// =============================================================================

proptest! {
    /// A supported ID is detected regardless of the other keys around it
    #[test]
    fn os_release_id_is_detected(
        distro in distro_strategy(),
        version in "[0-9]{1,2}(\\.[0-9]{1,2})?",
        extra in proptest::collection::vec("[A-Z_]{2,12}=[a-z0-9 ]{0,12}", 0..5),
    ) {
        let mut content = extra.join("\n");
        content.push_str(&format!("\nID={}\nVERSION_ID=\"{}\"\n", distro, version));
        let release = parse_os_release(&content);
        prop_assert_eq!(release.distro(), Some(distro));
        prop_assert_eq!(release.version_id, Some(version));
    }

    /// An unsupported ID falls back to the first supported ID_LIKE entry
    #[test]
    fn os_release_falls_back_to_id_like(
        id in "zz[a-z]{1,8}",
        parent in distro_strategy(),
    ) {
        let content = format!("ID={}\nID_LIKE=\"nosuchbase {}\"\n", id, parent);
        prop_assert_eq!(parse_os_release(&content).distro(), Some(parent));
    }

    /// Arbitrary text never panics the parser and never invents a distro
    #[test]
    fn os_release_garbage_is_unsupported(content in "[^=]{0,200}") {
        prop_assert_eq!(parse_os_release(&content).distro(), None);
    }

    /// Detection through the filesystem agrees with the parser
    #[test]
    fn detect_from_host_matches_parser(distro in distro_strategy()) {
        let dir = tempfile::tempdir().unwrap();
        let host = HostFs::new(dir.path());
        host.write("/etc/os-release", &format!("ID={}\n", distro)).unwrap();
        let detected = detect_distro(&host).unwrap();
        prop_assert_eq!(detected.distro, distro);
    }
}

// =============================================================================
// DatabaseEngine Property Tests
// =============================================================================

proptest! {
    /// DatabaseEngine: to_string → parse round-trip is identity
    #[test]
    fn database_engine_roundtrip(
        engine in proptest::sample::select(DatabaseEngine::iter().collect::<Vec<_>>())
    ) {
        let parsed: DatabaseEngine = engine.to_string().parse().expect("Should parse");
        prop_assert_eq!(parsed, engine);
        prop_assert_eq!(engine.service(), engine.to_string());
    }
}

// =============================================================================
// ufw Status Property Tests
// =============================================================================

proptest! {
    /// An ALLOW line for the port is always found
    #[test]
    fn ufw_allow_line_matches(port in 1u16.., bare in any::<bool>()) {
        let target = if bare { port.to_string() } else { format!("{}/tcp", port) };
        let status = format!(
            "Status: active\n\nTo                         Action      From\n{:<27}ALLOW       Anywhere\n",
            target
        );
        prop_assert!(ufw_rule_present(&status, port));
    }

    /// Rules for other ports never match
    #[test]
    fn ufw_other_port_does_not_match(port in 1u16.., other in 1u16..) {
        prop_assume!(port != other);
        let status = format!("{}/tcp                   ALLOW       Anywhere\n", other);
        prop_assert!(!ufw_rule_present(&status, port));
    }
}
