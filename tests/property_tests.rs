//! Property tests for replacement determinism and shape

use anonymock::anonymization::detector::PatternIdentifier;
use anonymock::anonymization::generator::{validity, VirtualDataGenerator};
use anonymock::anonymization::replacer::{stable_hash, INDEX_SPACE};
use anonymock::anonymization::{PiiCategory, Replacer};
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;
use std::sync::Arc;

fn replacer() -> Replacer {
    Replacer::new(Arc::new(PatternIdentifier::with_default_patterns().unwrap()))
}

fn category() -> impl Strategy<Value = PiiCategory> {
    prop_oneof![
        Just(PiiCategory::Name),
        Just(PiiCategory::CompanyName),
        Just(PiiCategory::Ssn),
        Just(PiiCategory::Passport),
        Just(PiiCategory::DriverLicense),
        Just(PiiCategory::BirthDate),
        Just(PiiCategory::Phone),
        Just(PiiCategory::Address),
        Just(PiiCategory::CardNumber),
        Just(PiiCategory::AccountNumber),
        Just(PiiCategory::Email),
        Just(PiiCategory::Imei),
        Just(PiiCategory::Imsi),
        Just(PiiCategory::MacAddress),
    ]
}

proptest! {
    #[test]
    fn replacement_is_a_pure_function(category in category(), original in "\\PC{1,40}") {
        let a = replacer().get_or_create(&category, &original);
        let b = replacer().get_or_create(&category, &original);
        prop_assert_eq!(a, b);
    }

    #[test]
    fn indexed_names_stay_in_range(original in "[가-힣]{2,4}") {
        let replacement = replacer().get_or_create(&PiiCategory::Name, &original);
        let index: u32 = replacement.trim_start_matches("테스트개인").parse().unwrap();
        prop_assert!((1..=INDEX_SPACE).contains(&index));
        prop_assert_eq!(index, stable_hash(&PiiCategory::Name, &original) % INDEX_SPACE + 1);
    }

    #[test]
    fn phone_shape_without_allocated_prefix(seed in any::<u64>()) {
        let mut rng = StdRng::seed_from_u64(seed);
        let phone = VirtualDataGenerator::new().generate(&PiiCategory::Phone, &mut rng);
        let parts: Vec<&str> = phone.split('-').collect();
        prop_assert_eq!(parts.len(), 3);
        prop_assert_eq!(parts[0].len(), 3);
        prop_assert_eq!(parts[1].len(), 4);
        prop_assert_eq!(parts[2].len(), 4);
        prop_assert!(!phone.starts_with('0'));
    }

    #[test]
    fn card_and_imei_fail_luhn(seed in any::<u64>()) {
        let generator = VirtualDataGenerator::new();
        let mut rng = StdRng::seed_from_u64(seed);

        let card = generator.generate(&PiiCategory::CardNumber, &mut rng);
        prop_assert_eq!(card.len(), 19);
        prop_assert!(!validity::is_luhn_valid(&card));

        let imei = generator.generate(&PiiCategory::Imei, &mut rng);
        prop_assert_eq!(imei.len(), 15);
        prop_assert!(!validity::is_luhn_valid(&imei));
    }

    #[test]
    fn ssn_and_birth_date_are_not_real_dates(seed in any::<u64>()) {
        let generator = VirtualDataGenerator::new();
        let mut rng = StdRng::seed_from_u64(seed);

        let ssn = generator.generate(&PiiCategory::Ssn, &mut rng);
        prop_assert_eq!(ssn.len(), 14);
        prop_assert_eq!(&ssn[6..7], "-");
        prop_assert!(!validity::is_rrn_valid(&ssn));

        let birth = generator.generate(&PiiCategory::BirthDate, &mut rng);
        let parts: Vec<u32> = birth.split('-').map(|p| p.parse().unwrap()).collect();
        prop_assert!(!validity::is_calendar_date(parts[0] as i32, parts[1], parts[2]));
    }

    #[test]
    fn percent_encoded_and_plain_values_agree(original in "[가-힣]{2,4}") {
        let r = replacer();
        let encoded = urlencoding::encode(&original).into_owned();

        let (plain, _) = r.rewrite_value(&json!(original), "name");
        let (reencoded, changed) = r.rewrite_value(&json!(encoded), "name");

        prop_assert!(changed);
        let decoded = urlencoding::decode(reencoded.as_str().unwrap()).unwrap().into_owned();
        prop_assert_eq!(json!(decoded), plain);
    }

    #[test]
    fn non_personal_scalars_pass_through(n in any::<i64>(), flag in any::<bool>(), text in "[a-z]{0,12}") {
        let r = replacer();
        let doc = json!({"count": n, "enabled": flag, "description": text});
        prop_assert_eq!(r.rewrite_tree(&doc), doc);
    }
}
