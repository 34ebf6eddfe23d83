//! Property tests for connection descriptor parsing.

#![allow(clippy::unwrap_used)]

use hedgedb_core::dsn::{DEFAULT_PORT, parse, parse_lenient};
use proptest::prelude::*;

proptest! {
    #[test]
    fn well_formed_descriptor_fields_round_trip(
        user in "[a-zA-Z0-9_]{1,16}",
        password in "[a-zA-Z0-9_!#%^&*:]{0,16}",
        host in "[a-z0-9][a-z0-9.-]{0,20}",
        port in 1u16..,
        database in "[a-zA-Z0-9_]{1,16}",
    ) {
        let descriptor = format!("{user}:{password}@{host}:{port}/{database}");

        let params = parse(&descriptor).unwrap();
        prop_assert_eq!(params.user(), user.as_str());
        prop_assert_eq!(params.password(), password.as_str());
        prop_assert_eq!(params.host(), host.as_str());
        prop_assert_eq!(params.port(), Some(port));
        prop_assert_eq!(params.database(), Some(database.as_str()));

        prop_assert_eq!(parse_lenient(&descriptor), params);
    }

    #[test]
    fn missing_port_leaves_other_fields_intact(
        user in "[a-zA-Z0-9_]{1,16}",
        password in "[a-zA-Z0-9_]{0,16}",
        host in "[a-z0-9][a-z0-9.-]{0,20}",
        database in "[a-zA-Z0-9_]{1,16}",
    ) {
        let descriptor = format!("{user}:{password}@{host}/{database}");

        let params = parse(&descriptor).unwrap();
        prop_assert_eq!(params.port(), None);
        prop_assert_eq!(params.port_or_default(), DEFAULT_PORT);
        prop_assert_eq!(params.host(), host.as_str());
        prop_assert_eq!(params.database(), Some(database.as_str()));
        prop_assert_eq!(parse_lenient(&descriptor), params);
    }

    #[test]
    fn descriptors_without_at_sign_are_rejected(s in "[a-z:/]{0,30}") {
        prop_assert!(parse(&s).is_err());
    }
}
